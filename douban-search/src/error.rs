//! Error types for the douban-search crate.
//!
//! Messages are stable strings meant for logs. None of them are rendered
//! into launcher output; failures there surface only as a fallback icon
//! or an empty list.

/// Errors that can occur while looking up, extracting, or enriching results.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// An HTTP request failed or returned a non-success status.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A cover download exceeded its deadline.
    #[error("timed out: {0}")]
    Timeout(String),

    /// The search page could not be parsed, or a selector failed to compile.
    #[error("parse error: {0}")]
    Parse(String),

    /// A cover file could not be created, written, or moved into place.
    #[error("I/O error: {0}")]
    Io(String),

    /// Invalid lookup configuration.
    #[error("config error: {0}")]
    Config(String),

    /// The requested category is not in the catalog.
    #[error("unsupported category: {0}")]
    UnsupportedCategory(String),
}

impl From<std::io::Error> for SearchError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Convenience type alias for douban-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
