//! Discography Player - browse an artist's discography and play it.
//!
//! Loads a discography JSON document (local file or http(s) URL) and either
//! prints one view or runs an interactive session with a playback queue,
//! repeat/shuffle modes and fragment-based navigation.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod player;
pub mod router;
#[cfg(test)]
pub mod test_utils;
pub mod ui;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Logs go to stderr so they never interleave with rendered views
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("discography_player=info".parse()?))
        .init();

    cli::run_command(&args)
}
