//! Configuration loading for the doubanq application.
//!
//! Configuration is resolved in this order:
//! 1. `--config <path>` (must exist)
//! 2. `config_dir()/config.toml`, if present
//! 3. Built-in defaults
//!
//! `DOUBANQ_CACHE_DIR` then overrides the cover directory.

use crate::doubanq_dirs;
use crate::error::{AppError, Result};
use douban_search::LookupConfig;
use std::path::Path;

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid TOML.
pub fn from_file(path: &Path) -> Result<LookupConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| AppError::Config(format!("{}: {e}", path.display())))
}

/// Resolve, load, and validate the effective configuration.
///
/// # Errors
///
/// Returns an error if an explicit path cannot be loaded, the default file
/// exists but is invalid, or the resulting configuration fails validation.
pub fn load(explicit: Option<&Path>) -> Result<LookupConfig> {
    let mut config = match explicit {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            from_file(path)?
        }
        None => {
            let path = doubanq_dirs::config_file();
            if path.is_file() {
                tracing::debug!(path = %path.display(), "loading config");
                from_file(&path)?
            } else {
                LookupConfig::default()
            }
        }
    };

    if std::env::var_os(doubanq_dirs::CACHE_DIR_ENV).is_some() || config.cache_dir.is_none() {
        config.cache_dir = Some(doubanq_dirs::covers_dir());
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("config.toml");
        std::fs::write(&path, content).expect("write config");
        path
    }

    #[test]
    fn from_file_nonexistent_returns_error() {
        let result = from_file(Path::new("/nonexistent/path/config.toml"));
        assert!(matches!(result, Err(AppError::Io(_))));
    }

    #[test]
    fn from_file_invalid_toml_returns_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(dir.path(), "this is not valid toml {{{");
        assert!(matches!(from_file(&path), Err(AppError::Config(_))));
    }

    #[test]
    fn empty_file_gives_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(dir.path(), "");
        assert_eq!(from_file(&path).expect("config"), LookupConfig::default());
    }

    #[test]
    fn partial_file_overrides_fields() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(
            dir.path(),
            r#"
timeout_seconds = 3
max_concurrent_fetches = 4
image_naming = "unique"
include_more_link = true
cache_dir = "/srv/covers"

[categories.movie]
code = "1002"
label = "电影"
detail_base_url = "https://movie.douban.com"
search_endpoint = "http://127.0.0.1:9999/search/"
"#,
        );
        let config = from_file(&path).expect("config");
        assert_eq!(config.timeout_seconds, 3);
        assert_eq!(config.max_concurrent_fetches, 4);
        assert_eq!(config.image_naming, douban_search::ImageNaming::Unique);
        assert!(config.include_more_link);
        assert_eq!(config.image_timeout_seconds, 10);
        assert_eq!(config.categories.len(), 4);
        let movie = config.categories.get("movie").expect("movie");
        assert_eq!(movie.name, "movie");
        assert_eq!(movie.search_endpoint, "http://127.0.0.1:9999/search/");
    }

    #[test]
    fn load_explicit_path_validates() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(dir.path(), "timeout_seconds = 0");
        let err = load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("timeout_seconds"));
    }

    #[test]
    fn load_fills_cover_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(dir.path(), "max_results = 5");
        let config = load(Some(&path)).expect("config");
        assert_eq!(config.max_results, 5);
        assert!(config.cache_dir.is_some());
    }
}
