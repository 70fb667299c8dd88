//! Cover enrichment: concurrent fan-out of one fetch per result, then a
//! barrier join back into extraction order.
//!
//! # Pipeline
//!
//! 1. Allocate one outcome slot per result, in extraction order
//! 2. Results without a cover URL get a `Failed` slot with no network work
//! 3. Every other result gets a `Pending` slot and a spawned fetch task,
//!    all started before any is awaited
//! 4. Join every task; each one reports `(index, outcome)` and only that
//!    slot is written
//! 5. Any slot still `Pending` after the join is forced to `Failed`
//!
//! A failed, timed-out, or panicking fetch only ever affects its own slot.

use crate::config::LookupConfig;
use crate::error::SearchError;
use crate::image::ImageSource;
use crate::types::{EnrichedResult, ImageOutcome, SearchResult};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Fan-out bounds for [`enrich`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnrichOptions {
    /// Maximum fetches in flight. `0` starts every fetch at once.
    pub max_concurrent: usize,
    /// Deadline per fetch. Waiting for a concurrency permit does not count.
    pub task_timeout: Option<Duration>,
}

impl EnrichOptions {
    pub fn from_config(config: &LookupConfig) -> Self {
        Self {
            max_concurrent: config.max_concurrent_fetches,
            task_timeout: Some(Duration::from_secs(config.image_timeout_seconds)),
        }
    }
}

/// Attach a terminal [`ImageOutcome`] to every result.
///
/// Returns exactly one [`EnrichedResult`] per input, in input order, and
/// only after every started fetch has finished.
pub async fn enrich<S: ImageSource>(
    results: Vec<SearchResult>,
    source: Arc<S>,
    options: &EnrichOptions,
) -> Vec<EnrichedResult> {
    let limiter = (options.max_concurrent > 0)
        .then(|| Arc::new(Semaphore::new(options.max_concurrent)));

    let mut slots: Vec<ImageOutcome> = Vec::with_capacity(results.len());
    let mut tasks = JoinSet::new();

    for (index, result) in results.iter().enumerate() {
        if !result.has_image() {
            slots.push(ImageOutcome::failed(SearchError::Http("empty image url".into())));
            continue;
        }

        slots.push(ImageOutcome::Pending);
        let source = Arc::clone(&source);
        let url = result.image_source_url.clone();
        let limiter = limiter.clone();
        let timeout = options.task_timeout;
        tasks.spawn(async move {
            let outcome = fetch_one(source.as_ref(), &url, limiter, timeout).await;
            (index, outcome)
        });
    }

    tracing::debug!(total = results.len(), started = tasks.len(), "cover fetches started");

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, outcome)) => {
                if let ImageOutcome::Failed { ref error } = outcome {
                    tracing::warn!(index, %error, "cover fetch failed");
                }
                slots[index] = outcome;
            }
            // The index is lost with the task; the slot is caught below.
            Err(err) => tracing::warn!(error = %err, "cover task did not complete"),
        }
    }

    let enriched: Vec<EnrichedResult> = results
        .into_iter()
        .zip(slots)
        .map(|(result, image)| EnrichedResult {
            result,
            image: if image.is_terminal() {
                image
            } else {
                ImageOutcome::failed(SearchError::Http("cover task did not complete".into()))
            },
        })
        .collect();

    tracing::debug!(
        ready = enriched.iter().filter(|e| e.image.is_ready()).count(),
        total = enriched.len(),
        "cover enrichment finished"
    );
    enriched
}

/// Run one fetch to a terminal outcome.
async fn fetch_one<S: ImageSource>(
    source: &S,
    url: &str,
    limiter: Option<Arc<Semaphore>>,
    timeout: Option<Duration>,
) -> ImageOutcome {
    let _permit = match limiter {
        // The semaphore is never closed, so acquire only fails if that changes.
        Some(limiter) => limiter.acquire_owned().await.ok(),
        None => None,
    };

    let fetch = AssertUnwindSafe(source.fetch(url)).catch_unwind();
    let finished = match timeout {
        Some(limit) => match tokio::time::timeout(limit, fetch).await {
            Ok(finished) => finished,
            Err(_) => {
                return ImageOutcome::failed(SearchError::Timeout(format!(
                    "cover exceeded {limit:?}"
                )))
            }
        },
        None => fetch.await,
    };

    match finished {
        Ok(Ok(local_path)) => ImageOutcome::Ready { local_path },
        Ok(Err(error)) => ImageOutcome::failed(error),
        Err(_) => ImageOutcome::failed(SearchError::Http("cover fetch panicked".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Succeeds for every URL except ones containing "fail".
    #[derive(Default)]
    struct StubSource {
        calls: AtomicUsize,
    }

    impl ImageSource for StubSource {
        async fn fetch(&self, url: &str) -> Result<PathBuf, SearchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if url.contains("fail") {
                Err(SearchError::Http(format!("stub failure for {url}")))
            } else {
                Ok(PathBuf::from(format!("/covers/{}", url.rsplit('/').next().unwrap_or(""))))
            }
        }
    }

    fn result(image: &str) -> SearchResult {
        SearchResult {
            title: image.to_owned(),
            image_source_url: image.to_owned(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn empty_input_returns_empty() {
        let source = Arc::new(StubSource::default());
        let enriched = enrich(Vec::new(), Arc::clone(&source), &EnrichOptions::default()).await;
        assert!(enriched.is_empty());
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn mixed_outcomes_keep_order() {
        let source = Arc::new(StubSource::default());
        let input = vec![
            result("https://img.test/a.jpg"),
            result(""),
            result("https://img.test/fail.jpg"),
            result("https://img.test/b.jpg"),
        ];
        let enriched = enrich(input.clone(), Arc::clone(&source), &EnrichOptions::default()).await;

        let titles: Vec<_> = enriched.iter().map(|e| e.result.title.as_str()).collect();
        let expected: Vec<_> = input.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, expected);

        assert_eq!(
            enriched[0].image.local_path(),
            Some(std::path::Path::new("/covers/a.jpg"))
        );
        assert!(matches!(enriched[1].image, ImageOutcome::Failed { .. }));
        assert!(matches!(enriched[2].image, ImageOutcome::Failed { .. }));
        assert!(enriched[3].image.is_ready());
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn options_from_config() {
        let config = LookupConfig {
            max_concurrent_fetches: 4,
            image_timeout_seconds: 3,
            ..Default::default()
        };
        let options = EnrichOptions::from_config(&config);
        assert_eq!(options.max_concurrent, 4);
        assert_eq!(options.task_timeout, Some(Duration::from_secs(3)));
    }
}
