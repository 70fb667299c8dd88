//! Cover image retrieval to local disk.
//!
//! [`ImageSource`] is the seam the enrichment coordinator fans out over;
//! [`ImageFetcher`] is the real implementation backed by `reqwest`.

use crate::config::ImageNaming;
use crate::error::SearchError;
use std::future::Future;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use url::Url;

/// Something that can turn a cover URL into a local file.
///
/// Implementations must be `Send + Sync + 'static` so the coordinator can
/// share one instance across spawned tasks.
pub trait ImageSource: Send + Sync + 'static {
    /// Retrieve `url` and return the path it was written to.
    ///
    /// # Errors
    ///
    /// Any network, status, or write failure. No retry is attempted.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<PathBuf, SearchError>> + Send;
}

/// Downloads covers into a cache directory.
pub struct ImageFetcher {
    client: reqwest::Client,
    cache_dir: PathBuf,
    naming: ImageNaming,
}

impl ImageFetcher {
    /// Build a fetcher around an existing client.
    pub fn with_client(client: reqwest::Client, cache_dir: PathBuf, naming: ImageNaming) -> Self {
        Self {
            client,
            cache_dir,
            naming,
        }
    }

    /// Local file name for a cover URL under the configured naming strategy.
    pub fn file_name_for(&self, url: &Url) -> String {
        let basename = url_basename(url);
        match (self.naming, basename) {
            (ImageNaming::UrlBasename, Some(name)) => name,
            (_, name) => {
                let ext = name
                    .as_deref()
                    .and_then(|n| Path::new(n).extension())
                    .and_then(|e| e.to_str())
                    .unwrap_or("png");
                format!("image-{}.{ext}", uuid::Uuid::new_v4())
            }
        }
    }

    async fn download(&self, url: Url, dest: &Path) -> Result<(), SearchError> {
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SearchError::Http(format!("cover request failed: {e}")))?
            .error_for_status()
            .map_err(|e| SearchError::Http(format!("cover HTTP error: {e}")))?;

        let mut file = tokio::fs::File::create(dest).await?;
        let mut written = 0usize;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| SearchError::Http(format!("cover read failed: {e}")))?
        {
            file.write_all(&chunk).await?;
            written += chunk.len();
        }
        file.flush().await?;

        tracing::trace!(bytes = written, path = %dest.display(), "cover written");
        Ok(())
    }
}

impl ImageSource for ImageFetcher {
    async fn fetch(&self, url: &str) -> Result<PathBuf, SearchError> {
        if url.trim().is_empty() {
            return Err(SearchError::Http("empty image url".into()));
        }
        let parsed = Url::parse(url.trim())
            .map_err(|e| SearchError::Http(format!("invalid image url: {e}")))?;

        tokio::fs::create_dir_all(&self.cache_dir).await?;
        let dest = self.cache_dir.join(self.file_name_for(&parsed));

        if self.naming == ImageNaming::UrlBasename && is_cached(&dest).await {
            tracing::trace!(path = %dest.display(), "cover cache hit");
            return Ok(dest);
        }

        // Unique per attempt so two results sharing a cover never write the
        // same partial file.
        let part = PartialFile::new(&dest);
        self.download(parsed, part.path()).await?;
        tokio::fs::rename(part.path(), &dest).await?;
        part.keep();
        Ok(dest)
    }
}

/// A `.part` download target removed on drop unless kept.
///
/// Dropping covers both an error return and the fetch future being
/// cancelled mid-stream by a deadline.
struct PartialFile {
    path: PathBuf,
    armed: bool,
}

impl PartialFile {
    fn new(dest: &Path) -> Self {
        Self {
            path: partial_path(dest),
            armed: true,
        }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    /// The file was renamed into place; nothing to clean up.
    fn keep(mut self) {
        self.armed = false;
    }
}

impl Drop for PartialFile {
    fn drop(&mut self) {
        if self.armed {
            if let Err(e) = std::fs::remove_file(&self.path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::debug!(
                        path = %self.path.display(),
                        error = %e,
                        "partial cover not removed"
                    );
                }
            }
        }
    }
}

async fn is_cached(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_file() && meta.len() > 0)
        .unwrap_or(false)
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(format!(".{}.part", uuid::Uuid::new_v4().simple()));
    PathBuf::from(name)
}

/// Last non-empty path segment of `url`, restricted to `[A-Za-z0-9._-]`.
fn url_basename(url: &Url) -> Option<String> {
    let segment = url.path_segments()?.rev().find(|s| !s.is_empty())?;
    let name: String = segment
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let name = name.trim_start_matches('.');
    if name.is_empty() {
        None
    } else {
        Some(name.to_owned())
    }
}
