//! Application directory paths for doubanq.
//!
//! Uses the [`dirs`] crate for platform-appropriate directory resolution.
//!
//! | Purpose | macOS | Linux |
//! |---------|-------|-------|
//! | Config | `~/Library/Application Support/doubanq/` | `~/.config/doubanq/` |
//! | Cache | `~/Library/Caches/doubanq/` | `~/.cache/doubanq/` |
//!
//! # Environment Overrides
//!
//! - `DOUBANQ_CONFIG_DIR` overrides [`config_dir`]
//! - `DOUBANQ_CACHE_DIR` overrides [`cache_dir`]

use std::path::PathBuf;

/// Environment variable overriding [`config_dir`].
pub const CONFIG_DIR_ENV: &str = "DOUBANQ_CONFIG_DIR";
/// Environment variable overriding [`cache_dir`].
pub const CACHE_DIR_ENV: &str = "DOUBANQ_CACHE_DIR";

/// Application config directory, holding `config.toml`.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os(CONFIG_DIR_ENV) {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join("doubanq"))
        .unwrap_or_else(|| PathBuf::from("/tmp/doubanq-config"))
}

/// Application cache directory.
#[must_use]
pub fn cache_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os(CACHE_DIR_ENV) {
        return PathBuf::from(override_dir);
    }
    dirs::cache_dir()
        .map(|d| d.join("doubanq"))
        .unwrap_or_else(|| PathBuf::from("/tmp/doubanq-cache"))
}

/// Downloaded cover directory (`cache_dir()/covers/`).
#[must_use]
pub fn covers_dir() -> PathBuf {
    cache_dir().join("covers")
}

/// Default config file (`config_dir()/config.toml`).
#[must_use]
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covers_dir_is_under_cache_dir() {
        assert!(covers_dir().starts_with(cache_dir()));
        assert!(covers_dir().ends_with("covers"));
    }

    #[test]
    fn config_file_is_under_config_dir() {
        assert_eq!(config_file(), config_dir().join("config.toml"));
    }
}
