//! Launcher output: Alfred script-filter JSON records.

use crate::category::CategorySpec;
use crate::config::LookupConfig;
use crate::types::EnrichedResult;
use serde::{Deserialize, Serialize};
use url::Url;

/// Glyph repeated once per full rating star.
pub const FULL_STAR: &str = "⭐";
/// Glyph repeated once per half rating star.
pub const HALF_STAR: &str = "⚡";

/// Icon reference of an [`AlfredItem`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlfredIcon {
    pub path: String,
}

/// One launcher record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlfredItem {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub subtitle: String,
    pub arg: String,
    pub icon: AlfredIcon,
}

/// Top-level launcher document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlfredResponse {
    pub items: Vec<AlfredItem>,
}

impl AlfredResponse {
    /// A well-formed response with no records.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Star glyphs followed by the raw score text.
pub fn star_line(full: u32, half: u32, origin_score: &str) -> String {
    let mut line = FULL_STAR.repeat(full as usize);
    line.push_str(&HALF_STAR.repeat(half as usize));
    line.push_str(origin_score);
    line
}

/// Map enriched results to launcher records, preserving order.
///
/// The icon is the local cover when it was fetched, otherwise the
/// category fallback icon from `config`.
pub fn assemble(
    enriched: &[EnrichedResult],
    spec: &CategorySpec,
    query: &str,
    config: &LookupConfig,
) -> AlfredResponse {
    let fallback = config.fallback_icon(&spec.name);

    let mut items: Vec<AlfredItem> = enriched
        .iter()
        .map(|entry| AlfredItem {
            kind: "file".to_owned(),
            title: entry.result.title.clone(),
            subtitle: star_line(
                entry.result.full_star_count,
                entry.result.half_star_count,
                &entry.result.origin_score,
            ),
            arg: spec.detail_url(&entry.result.detail_path),
            icon: AlfredIcon {
                path: entry.icon_path(&fallback),
            },
        })
        .collect();

    if config.include_more_link {
        match more_link(spec, query) {
            Some(arg) => items.push(AlfredItem {
                kind: "file".to_owned(),
                title: "more".to_owned(),
                subtitle: String::new(),
                arg,
                icon: AlfredIcon {
                    path: config.fallback_icon("more"),
                },
            }),
            None => tracing::warn!(category = %spec.name, "could not build full search link"),
        }
    }

    AlfredResponse { items }
}

/// Full-site search page for `query` in this category.
fn more_link(spec: &CategorySpec, query: &str) -> Option<String> {
    let base = format!("{}/subject_search", spec.detail_base_url.trim_end_matches('/'));
    Url::parse_with_params(&base, &[("search_text", query), ("cat", spec.code.as_str())])
        .ok()
        .map(String::from)
}
