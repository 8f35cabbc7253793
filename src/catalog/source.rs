//! Catalog fetching.
//!
//! The catalog document is fetched once at startup, either from a local file
//! or an http(s) URL. Fetching sits behind [`CatalogFetcher`] so tests can
//! substitute canned documents.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::Catalog;
use crate::error::{Error, Result, ResultExt};
use crate::model::Discography;

/// User agent sent with catalog requests
const USER_AGENT: &str = concat!("discography-player/", env!("CARGO_PKG_VERSION"));

/// Where a catalog document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    File(PathBuf),
    Http(String),
}

impl CatalogSource {
    /// Interpret a `--catalog` / `catalog.source` value.
    pub fn parse(location: &str) -> Self {
        if is_remote(location) {
            Self::Http(location.to_string())
        } else {
            Self::File(PathBuf::from(location))
        }
    }

    /// Base that relative asset paths resolve against when no
    /// `data_base_url` is configured: the directory holding the document.
    pub fn base_location(&self) -> String {
        match self {
            Self::File(path) => path
                .parent()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default(),
            Self::Http(url) => match url.rfind('/') {
                Some(i) if i > url.find("://").map_or(0, |s| s + 2) => url[..i].to_string(),
                _ => url.clone(),
            },
        }
    }

    /// Build the fetcher for this source.
    pub fn fetcher(&self) -> Result<Box<dyn CatalogFetcher>> {
        Ok(match self {
            Self::File(path) => Box::new(FileFetcher::new(path)),
            Self::Http(url) => Box::new(HttpFetcher::new(url)?),
        })
    }
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Http(url) => write!(f, "{}", url),
        }
    }
}

/// Trait for fetching the raw catalog document.
///
/// Implement this trait to create mock implementations for testing.
#[async_trait]
pub trait CatalogFetcher: Send + Sync {
    /// Fetch the document body.
    async fn fetch(&self) -> Result<String>;
}

/// Reads a catalog from the local filesystem.
pub struct FileFetcher {
    path: PathBuf,
}

impl FileFetcher {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl CatalogFetcher for FileFetcher {
    async fn fetch(&self) -> Result<String> {
        if !tokio::fs::try_exists(&self.path).await.unwrap_or(false) {
            return Err(Error::not_found(&self.path));
        }
        tokio::fs::read_to_string(&self.path)
            .await
            .with_context(format!("reading {}", self.path.display()))
    }
}

/// Fetches a catalog over http(s).
pub struct HttpFetcher {
    http_client: reqwest::Client,
    url: String,
}

impl HttpFetcher {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            http_client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl CatalogFetcher for HttpFetcher {
    async fn fetch(&self) -> Result<String> {
        let response = self
            .http_client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }
}

/// Fetch and parse the catalog.
///
/// Never fails: a fetch or parse error is logged and an empty catalog is
/// returned so the session can still start.
pub async fn load_catalog(fetcher: &dyn CatalogFetcher) -> Catalog {
    let body = match fetcher.fetch().await {
        Ok(body) => body,
        Err(e) => {
            tracing::error!("Failed to load catalog: {}", e);
            return Catalog::empty();
        }
    };

    match Discography::from_json(&body) {
        Ok(discography) => {
            let catalog = Catalog::new(discography);
            tracing::info!(
                releases = catalog.releases().len(),
                artist = %catalog.artist().name,
                "Catalog loaded"
            );
            catalog
        }
        Err(e) => {
            tracing::error!("Failed to parse catalog: {}", e);
            Catalog::empty()
        }
    }
}

/// Join a relative asset path onto the data base.
///
/// Absolute URLs pass through untouched; a leading `/` on the path is
/// dropped so it stays relative to the base.
pub fn resolve_data_url(base: &str, path: &str) -> String {
    if path.is_empty() || is_remote(path) {
        return path.to_string();
    }
    let relative = path.trim_start_matches('/');
    let base = base.trim_end_matches('/');
    if base.is_empty() {
        relative.to_string()
    } else {
        format!("{}/{}", base, relative)
    }
}

fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticFetcher(Result<String>);

    #[async_trait]
    impl CatalogFetcher for StaticFetcher {
        async fn fetch(&self) -> Result<String> {
            match &self.0 {
                Ok(body) => Ok(body.clone()),
                Err(_) => Err(Error::not_found("catalog.json")),
            }
        }
    }

    #[test]
    fn test_source_parse() {
        assert_eq!(
            CatalogSource::parse("https://example.com/data/discography.json"),
            CatalogSource::Http("https://example.com/data/discography.json".to_string())
        );
        assert_eq!(
            CatalogSource::parse("data/discography.json"),
            CatalogSource::File(PathBuf::from("data/discography.json"))
        );
    }

    #[test]
    fn test_base_location() {
        assert_eq!(
            CatalogSource::parse("https://example.com/data/discography.json").base_location(),
            "https://example.com/data"
        );
        assert_eq!(
            CatalogSource::parse("https://example.com").base_location(),
            "https://example.com"
        );
        assert_eq!(
            CatalogSource::parse("data/discography.json").base_location(),
            "data"
        );
        assert_eq!(CatalogSource::parse("discography.json").base_location(), "");
    }

    #[test]
    fn test_resolve_data_url() {
        assert_eq!(
            resolve_data_url("https://cdn.example.com/", "/audio/a.mp3"),
            "https://cdn.example.com/audio/a.mp3"
        );
        assert_eq!(resolve_data_url("data", "audio/a.mp3"), "data/audio/a.mp3");
        assert_eq!(resolve_data_url("", "/audio/a.mp3"), "audio/a.mp3");
        assert_eq!(
            resolve_data_url("data", "https://other.example/a.mp3"),
            "https://other.example/a.mp3"
        );
        assert_eq!(resolve_data_url("data", ""), "");
    }

    #[tokio::test]
    async fn test_load_catalog_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("discography.json");
        std::fs::write(
            &path,
            r#"{ "artist": "Mantis", "singles": [{ "id": "moth", "title": "Moth", "audioFile": "moth.mp3" }] }"#,
        )
        .unwrap();

        let catalog = load_catalog(&FileFetcher::new(&path)).await;
        assert_eq!(catalog.artist().name, "Mantis");
        assert_eq!(catalog.releases().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_file_yields_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = load_catalog(&FileFetcher::new(dir.path().join("nope.json"))).await;
        assert!(catalog.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_error_yields_empty_catalog() {
        let fetcher = StaticFetcher(Err(Error::not_found("x")));
        assert!(load_catalog(&fetcher).await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_document_yields_empty_catalog() {
        let fetcher = StaticFetcher(Ok("{ not json".to_string()));
        assert!(load_catalog(&fetcher).await.is_empty());
    }
}
