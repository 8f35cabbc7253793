//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`
//! ([`crate::player::PlayerError`], [`crate::config::ConfigError`]), while
//! the CLI uses `anyhow` for convenient error propagation.
//!
//! None of these errors are fatal to an interactive session: the controller
//! logs them and keeps the previous state.
//!
//! # Example
//!
//! ```ignore
//! use discography_player::error::{Error, Result, ResultExt};
//!
//! fn read_catalog(path: &Path) -> Result<String> {
//!     std::fs::read_to_string(path).with_context("reading catalog")
//! }
//! ```

use std::path::PathBuf;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog fetch over HTTP failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Catalog document could not be parsed
    #[error("Catalog parse error: {0}")]
    CatalogParse(#[from] serde_json::Error),

    /// Audio playback error
    #[error("Playback error: {0}")]
    Playback(#[from] crate::player::PlayerError),

    /// Catalog file not found
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a not found error.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound(path.into())
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Io(e).context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, serde_json::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::CatalogParse(e).context(ctx))
    }
}
