//! Shared HTTP client with User-Agent rotation.
//!
//! Provides a configured [`reqwest::Client`] used for both the search page
//! request and cover downloads, plus the plain page GET.

use crate::config::LookupConfig;
use crate::error::SearchError;
use rand::seq::SliceRandom;
use std::time::Duration;
use url::Url;

/// Realistic browser User-Agent strings, rotated per client.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_5 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Mobile Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
];

/// Build a [`reqwest::Client`] for douban requests.
///
/// The client has:
/// - Cookie store enabled
/// - Timeout from `config.timeout_seconds`
/// - Random User-Agent from the rotation list (or custom if configured)
///
/// # Errors
///
/// Returns [`SearchError::Http`] if the client cannot be constructed.
pub fn build_client(config: &LookupConfig) -> Result<reqwest::Client, SearchError> {
    let ua = match config.user_agent {
        Some(ref custom) => custom.clone(),
        None => random_user_agent().to_owned(),
    };

    reqwest::Client::builder()
        .cookie_store(true)
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(ua)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| SearchError::Http(format!("failed to build HTTP client: {e}")))
}

/// Select a random User-Agent string from the rotation list.
pub fn random_user_agent() -> &'static str {
    let mut rng = rand::thread_rng();
    USER_AGENTS
        .choose(&mut rng)
        .copied()
        // USER_AGENTS is a non-empty const array, choose only returns None on empty slices
        .unwrap_or(USER_AGENTS[0])
}

/// GET a search page and return its body text.
///
/// # Errors
///
/// Returns [`SearchError::Http`] on transport failure, non-success status,
/// or an unreadable body.
pub async fn fetch_page(client: &reqwest::Client, url: &Url) -> Result<String, SearchError> {
    tracing::trace!(
        host = url.host_str().unwrap_or_default(),
        path = url.path(),
        "fetching search page"
    );

    let response = client
        .get(url.clone())
        .header("Accept-Language", "zh-CN,zh;q=0.9,en;q=0.8")
        .send()
        .await
        .map_err(|e| SearchError::Http(format!("search page request failed: {e}")))?
        .error_for_status()
        .map_err(|e| SearchError::Http(format!("search page HTTP error: {e}")))?;

    let html = response
        .text()
        .await
        .map_err(|e| SearchError::Http(format!("search page read failed: {e}")))?;

    tracing::trace!(bytes = html.len(), "search page received");
    Ok(html)
}
