//! Lookup configuration with sensible defaults.
//!
//! [`LookupConfig`] controls timeouts, cover caching, fan-out bounds, and the
//! category catalog. Every field has a default, so a config file only needs
//! to name what it changes.

use crate::category::CategoryCatalog;
use crate::error::SearchError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How downloaded cover files are named.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageNaming {
    /// Name the file after the URL's last path segment and reuse it on
    /// later lookups.
    #[default]
    UrlBasename,
    /// A fresh uuid-based name for every fetch.
    Unique,
}

/// Configuration for a lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Search page request timeout in seconds.
    pub timeout_seconds: u64,
    /// Deadline for a single cover fetch. Hitting it forces that cover to
    /// `Failed` without touching its siblings.
    pub image_timeout_seconds: u64,
    /// Maximum cover fetches in flight. `0` means one task per result.
    pub max_concurrent_fetches: usize,
    /// Keep only the first N extracted results. `0` keeps all.
    pub max_results: usize,
    /// Directory covers are written to. `None` uses the platform cache dir.
    pub cache_dir: Option<PathBuf>,
    /// Cover file naming strategy.
    pub image_naming: ImageNaming,
    /// Custom User-Agent. If `None`, one is picked from a built-in list.
    pub user_agent: Option<String>,
    /// Directory holding the per-category fallback icons.
    pub fallback_icon_dir: String,
    /// Append a trailing "more" record linking to the full site search.
    pub include_more_link: bool,
    /// Searchable categories.
    pub categories: CategoryCatalog,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 8,
            image_timeout_seconds: 10,
            max_concurrent_fetches: 0,
            max_results: 0,
            cache_dir: None,
            image_naming: ImageNaming::default(),
            user_agent: None,
            fallback_icon_dir: "imgs".to_owned(),
            include_more_link: false,
            categories: CategoryCatalog::default(),
        }
    }
}

impl LookupConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `timeout_seconds` must be greater than 0
    /// - `image_timeout_seconds` must be greater than 0
    /// - at least one category, each with parseable URLs
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.image_timeout_seconds == 0 {
            return Err(SearchError::Config(
                "image_timeout_seconds must be greater than 0".into(),
            ));
        }
        self.categories.validate()
    }

    /// Directory covers are written to.
    pub fn resolved_cache_dir(&self) -> PathBuf {
        match self.cache_dir {
            Some(ref dir) => dir.clone(),
            None => dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("doubanq")
                .join("covers"),
        }
    }

    /// Fallback icon for a category, e.g. `imgs/movie.png`.
    pub fn fallback_icon(&self, category: &str) -> String {
        format!(
            "{}/{category}.png",
            self.fallback_icon_dir.trim_end_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sensible_values() {
        let config = LookupConfig::default();
        assert_eq!(config.timeout_seconds, 8);
        assert_eq!(config.image_timeout_seconds, 10);
        assert_eq!(config.max_concurrent_fetches, 0);
        assert_eq!(config.max_results, 0);
        assert_eq!(config.image_naming, ImageNaming::UrlBasename);
        assert!(config.user_agent.is_none());
        assert!(!config.include_more_link);
        assert_eq!(config.categories.len(), 4);
    }

    #[test]
    fn valid_config_passes_validation() {
        assert!(LookupConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = LookupConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_seconds"));
    }

    #[test]
    fn zero_image_timeout_rejected() {
        let config = LookupConfig {
            image_timeout_seconds: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("image_timeout_seconds"));
    }

    #[test]
    fn empty_catalog_rejected() {
        let config = LookupConfig {
            categories: CategoryCatalog::empty(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn fallback_icon_uses_category_name() {
        let config = LookupConfig::default();
        assert_eq!(config.fallback_icon("movie"), "imgs/movie.png");

        let config = LookupConfig {
            fallback_icon_dir: "icons/".into(),
            ..Default::default()
        };
        assert_eq!(config.fallback_icon("book"), "icons/book.png");
    }

    #[test]
    fn explicit_cache_dir_wins() {
        let config = LookupConfig {
            cache_dir: Some(PathBuf::from("/var/cache/covers")),
            ..Default::default()
        };
        assert_eq!(
            config.resolved_cache_dir(),
            PathBuf::from("/var/cache/covers")
        );
    }

    #[test]
    fn default_cache_dir_is_namespaced() {
        let dir = LookupConfig::default().resolved_cache_dir();
        assert!(dir.ends_with("doubanq/covers"));
    }

    #[test]
    fn image_naming_serde_snake_case() {
        let json = serde_json::to_string(&ImageNaming::UrlBasename).expect("serialize");
        assert_eq!(json, "\"url_basename\"");
        let decoded: ImageNaming = serde_json::from_str("\"unique\"").expect("deserialize");
        assert_eq!(decoded, ImageNaming::Unique);
    }
}
