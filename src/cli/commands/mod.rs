//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `browse`: one-shot listings and route resolution
//! - `session`: the interactive, line-driven player session

mod browse;
mod session;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;

use crate::catalog::{Catalog, CatalogSource, load_catalog};
use crate::config::{self, Config};

pub use browse::{cmd_about, cmd_collections, cmd_filters, cmd_route, cmd_tracks};
pub use session::cmd_session;

/// Discography Player CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Catalog document: a file path or an http(s) URL
    #[arg(long, global = true, env = "DISCOGRAPHY_CATALOG")]
    pub catalog: Option<String>,

    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// List every track, newest release first
    Tracks,
    /// List albums and EPs
    Collections {
        /// Search titles, descriptions, tags and lyrics
        #[arg(short, long)]
        query: Option<String>,
        /// Only releases or tracks carrying this tag
        #[arg(short, long)]
        tag: Option<String>,
        /// Only releases from this year
        #[arg(short, long)]
        year: Option<String>,
    },
    /// Show the tags and years available for filtering
    Filters,
    /// Show the artist profile
    About,
    /// Resolve a location fragment and print the view it shows
    Route {
        /// Fragment such as `#/collection/<id>` or `#/track/<slug>`
        fragment: String,
    },
    /// Interactive player session (default)
    Session,
}

/// Run the specified CLI command. Without a subcommand the interactive
/// session starts.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => config::load_or_default(path),
        None => config::load(),
    };

    let rt = Runtime::new()?;
    let source = CatalogSource::parse(cli.catalog.as_deref().unwrap_or(&config.catalog.source));
    let catalog = fetch_catalog(&rt, &source)?;
    let data_base = data_base(&config, &source);
    tracing::debug!(source = %source, data_base = %data_base, "Catalog ready");

    match &cli.command {
        Some(Commands::Tracks) => cmd_tracks(catalog, data_base, &config),
        Some(Commands::Collections { query, tag, year }) => cmd_collections(
            catalog,
            data_base,
            &config,
            query.as_deref(),
            tag.as_deref(),
            year.as_deref(),
        ),
        Some(Commands::Filters) => cmd_filters(catalog, data_base, &config),
        Some(Commands::About) => cmd_about(catalog, data_base, &config),
        Some(Commands::Route { fragment }) => cmd_route(catalog, data_base, &config, fragment),
        Some(Commands::Session) | None => cmd_session(catalog, data_base, &config),
    }
}

// ============================================================================
// Shared helper functions
// ============================================================================

/// Load the catalog. Fetch failures leave an empty catalog; only a broken
/// http client setup is an error.
fn fetch_catalog(rt: &Runtime, source: &CatalogSource) -> anyhow::Result<Catalog> {
    let fetcher = source.fetcher()?;
    let catalog = rt.block_on(load_catalog(fetcher.as_ref()));
    if catalog.is_empty() {
        tracing::warn!(source = %source, "Catalog is empty");
    } else {
        tracing::info!(
            source = %source,
            releases = catalog.releases().len(),
            "Catalog loaded"
        );
    }
    Ok(catalog)
}

/// Base for relative asset paths: the configured URL, else the catalog's
/// own location.
fn data_base(config: &Config, source: &CatalogSource) -> String {
    if config.catalog.data_base_url.is_empty() {
        source.base_location()
    } else {
        config.catalog.data_base_url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "discography-player",
            "collections",
            "--tag",
            "rock",
            "--catalog",
            "https://example.com/data/discography.json",
        ])
        .unwrap();

        assert_eq!(
            cli.catalog.as_deref(),
            Some("https://example.com/data/discography.json")
        );
        match cli.command {
            Some(Commands::Collections { tag, query, .. }) => {
                assert_eq!(tag.as_deref(), Some("rock"));
                assert!(query.is_none());
            }
            _ => panic!("expected collections"),
        }
    }

    #[test]
    fn test_no_subcommand_means_session() {
        let cli = Cli::try_parse_from(["discography-player"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_data_base_prefers_config() {
        let source = CatalogSource::parse("https://example.com/data/discography.json");
        let mut config = Config::default();
        assert_eq!(data_base(&config, &source), "https://example.com/data");

        config.catalog.data_base_url = "https://cdn.example".to_string();
        assert_eq!(data_base(&config, &source), "https://cdn.example");
    }
}
