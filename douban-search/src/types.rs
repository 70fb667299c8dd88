//! Core types for extracted results and their cover enrichment outcome.

use crate::error::SearchError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One matched entry from a search results page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Display name. Empty when the entry layout did not carry one.
    pub title: String,
    /// Rating text exactly as rendered by the page (may be "暂无评分").
    pub origin_score: String,
    /// Number of full rating-star markers on the entry.
    pub full_star_count: u32,
    /// Number of half rating-star markers on the entry.
    pub half_star_count: u32,
    /// Detail link with the category path segment removed.
    pub detail_path: String,
    /// Remote cover image URL. Empty when the entry had no image.
    pub image_source_url: String,
}

impl SearchResult {
    /// Whether enrichment should start a cover fetch for this result.
    pub fn has_image(&self) -> bool {
        !self.image_source_url.trim().is_empty()
    }
}

/// State of a single cover enrichment attempt.
///
/// Created as [`ImageOutcome::Pending`] when a fetch starts and finalised
/// exactly once as [`ImageOutcome::Ready`] or [`ImageOutcome::Failed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    /// Fetch started, not yet finished.
    Pending,
    /// Cover written to disk.
    Ready {
        /// Path of the written cover file.
        local_path: PathBuf,
    },
    /// Fetch skipped or failed.
    Failed {
        /// What went wrong.
        error: SearchError,
    },
}

impl ImageOutcome {
    /// Convenience constructor for a failed outcome.
    pub fn failed(error: SearchError) -> Self {
        Self::Failed { error }
    }

    /// Whether this outcome can no longer change.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Whether the cover is available locally.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    /// Local cover path, present only when [`ImageOutcome::Ready`].
    pub fn local_path(&self) -> Option<&Path> {
        match self {
            Self::Ready { local_path } => Some(local_path),
            _ => None,
        }
    }

    /// Failure detail, present only when [`ImageOutcome::Failed`].
    pub fn error(&self) -> Option<&SearchError> {
        match self {
            Self::Failed { error } => Some(error),
            _ => None,
        }
    }
}

/// A result paired with its terminal cover outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedResult {
    /// The extracted result, unchanged by enrichment.
    pub result: SearchResult,
    /// Terminal cover outcome.
    pub image: ImageOutcome,
}

impl EnrichedResult {
    /// Icon to show: the local cover when ready, otherwise `fallback`.
    pub fn icon_path(&self, fallback: &str) -> String {
        match self.image.local_path() {
            Some(path) => path.to_string_lossy().into_owned(),
            None => fallback.to_owned(),
        }
    }
}
