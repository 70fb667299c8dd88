//! doubanq: douban lookups for Alfred-style launchers.
//!
//! The heavy lifting lives in [`douban_search`]; this crate owns the
//! application shell: where configuration and covers live on disk and how
//! configuration is loaded.

pub mod config;
pub mod doubanq_dirs;
pub mod error;

pub use error::{AppError, Result};
