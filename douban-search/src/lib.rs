//! # douban-search
//!
//! Douban lookups for launcher UIs: fetch the mobile search page for a
//! category and query, extract the matching entries, and enrich each one
//! with a locally cached cover image.
//!
//! ## Design
//!
//! - Parses the results page with CSS selectors, handling both the grouped
//!   (per-category sections) and flat result layouts
//! - Fetches every cover concurrently, then joins all of them before
//!   returning, so output order always equals extraction order
//! - Graceful degradation: a missing field becomes an empty string and a
//!   failed cover becomes a fallback icon; neither aborts the batch
//! - Covers are cached on disk by file name and reused on later lookups

pub mod assemble;
pub mod category;
pub mod config;
pub mod document;
pub mod enrich;
pub mod error;
pub mod extract;
pub mod http;
pub mod image;
pub mod types;

pub use assemble::{assemble, AlfredItem, AlfredResponse};
pub use category::{CategoryCatalog, CategorySpec};
pub use config::{ImageNaming, LookupConfig};
pub use enrich::{enrich, EnrichOptions};
pub use error::{Result, SearchError};
pub use image::{ImageFetcher, ImageSource};
pub use types::{EnrichedResult, ImageOutcome, SearchResult};

use std::sync::Arc;

/// Search douban and return enriched results in page order.
///
/// An unknown `category` returns an empty list. If `config.max_results` is
/// set, only the first results are kept and enriched.
///
/// # Errors
///
/// Returns [`SearchError::Config`] for invalid configuration,
/// [`SearchError::Http`] if the search page cannot be fetched, or
/// [`SearchError::Parse`] if it cannot be parsed. Cover failures never
/// surface here; they become [`ImageOutcome::Failed`] on their result.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> douban_search::Result<()> {
/// let config = douban_search::LookupConfig::default();
/// let results = douban_search::search("movie", "霸王别姬", &config).await?;
/// for entry in &results {
///     println!("{} {}", entry.result.title, entry.result.origin_score);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(
    category: &str,
    query: &str,
    config: &LookupConfig,
) -> Result<Vec<EnrichedResult>> {
    config.validate()?;

    let Some(spec) = config.categories.get(category) else {
        tracing::warn!(category, "unsupported category");
        return Ok(Vec::new());
    };

    let client = http::build_client(config)?;
    let url = spec.search_url(query)?;
    let html = http::fetch_page(&client, &url).await?;

    let mut results = {
        let document = document::Document::parse_str(&html)?;
        extract::extract_category(&document, spec)?
    };
    if config.max_results > 0 {
        results.truncate(config.max_results);
    }

    let fetcher = ImageFetcher::with_client(
        client,
        config.resolved_cache_dir(),
        config.image_naming,
    );
    Ok(enrich(results, Arc::new(fetcher), &EnrichOptions::from_config(config)).await)
}

/// Search douban and render the launcher response.
///
/// Never fails: configuration, network, and parse errors are logged and
/// yield an empty, well-formed response.
pub async fn lookup(category: &str, query: &str, config: &LookupConfig) -> AlfredResponse {
    let Some(spec) = config.categories.get(category) else {
        tracing::warn!(category, "unsupported category");
        return AlfredResponse::empty();
    };

    match search(category, query, config).await {
        Ok(enriched) => assemble(&enriched, spec, query, config),
        Err(err) => {
            tracing::error!(category, error = %err, "lookup failed");
            AlfredResponse::empty()
        }
    }
}
