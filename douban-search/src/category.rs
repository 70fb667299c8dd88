//! Category catalog: which endpoint, section label, and detail site each
//! searchable category maps to.
//!
//! The catalog is plain configuration data. Extraction only ever reads a
//! [`CategorySpec`], so entries can be overridden from TOML without touching
//! the extractor.

use crate::error::{Result, SearchError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

/// Mobile search endpoint shared by every built-in category.
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://m.douban.com/search/";

/// How one category is searched and linked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySpec {
    /// Catalog key, also the path segment stripped from detail links.
    #[serde(skip)]
    pub name: String,
    /// Value sent as the `type` query parameter.
    pub code: String,
    /// Section heading used by the grouped results layout.
    pub label: String,
    /// Search page endpoint.
    #[serde(default = "default_search_endpoint")]
    pub search_endpoint: String,
    /// Site the detail path is joined onto.
    pub detail_base_url: String,
    /// Leading path fragment dropped before joining onto `detail_base_url`.
    #[serde(default)]
    pub detail_strip_prefix: String,
}

fn default_search_endpoint() -> String {
    DEFAULT_SEARCH_ENDPOINT.to_owned()
}

impl CategorySpec {
    fn builtin(name: &str, code: &str, label: &str, detail_base_url: &str) -> Self {
        Self {
            name: name.to_owned(),
            code: code.to_owned(),
            label: label.to_owned(),
            search_endpoint: default_search_endpoint(),
            detail_base_url: detail_base_url.to_owned(),
            detail_strip_prefix: String::new(),
        }
    }

    /// Build the search page URL for `query`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `search_endpoint` is not a valid URL.
    pub fn search_url(&self, query: &str) -> Result<Url> {
        Url::parse_with_params(
            &self.search_endpoint,
            &[("type", self.code.as_str()), ("query", query)],
        )
        .map_err(|e| {
            SearchError::Config(format!(
                "invalid search endpoint for {}: {e}",
                self.name
            ))
        })
    }

    /// Join a normalised detail path onto this category's detail site.
    pub fn detail_url(&self, detail_path: &str) -> String {
        let path = match detail_path.strip_prefix(self.detail_strip_prefix.as_str()) {
            Some(rest) if !self.detail_strip_prefix.is_empty()
                && (rest.is_empty() || rest.starts_with('/')) =>
            {
                rest
            }
            _ => detail_path,
        };
        format!("{}{path}", self.detail_base_url.trim_end_matches('/'))
    }

    /// Remove every path segment equal to the category name.
    ///
    /// `/movie/subject/123/` becomes `/subject/123/` for `movie`.
    pub fn strip_category_segment(&self, href: &str) -> String {
        if self.name.is_empty() {
            return href.to_owned();
        }
        href.split('/')
            .filter(|segment| *segment != self.name)
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Check the URLs in this entry parse.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.code.trim().is_empty() {
            return Err(SearchError::Config(format!(
                "category {} has an empty code",
                self.name
            )));
        }
        self.search_url("")?;
        Url::parse(&self.detail_base_url).map_err(|e| {
            SearchError::Config(format!(
                "invalid detail base URL for {}: {e}",
                self.name
            ))
        })?;
        Ok(())
    }
}

/// Mapping from category name to [`CategorySpec`].
///
/// Deserialising starts from the built-in entries and layers the given
/// ones on top, so a config file only lists what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, CategorySpec>",
    into = "BTreeMap<String, CategorySpec>"
)]
pub struct CategoryCatalog {
    entries: BTreeMap<String, CategorySpec>,
}

impl Default for CategoryCatalog {
    fn default() -> Self {
        let mut game = CategorySpec::builtin("game", "1004", "游戏", "https://www.douban.com/game");
        game.detail_strip_prefix = "/subject".to_owned();

        Self::empty()
            .with(CategorySpec::builtin(
                "book",
                "1001",
                "读书",
                "https://book.douban.com",
            ))
            .with(CategorySpec::builtin(
                "movie",
                "1002",
                "电影",
                "https://movie.douban.com",
            ))
            .with(CategorySpec::builtin(
                "music",
                "1003",
                "音乐",
                "https://music.douban.com",
            ))
            .with(game)
    }
}

impl CategoryCatalog {
    /// A catalog with no categories.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Add or replace an entry, keyed by `spec.name`.
    pub fn with(mut self, spec: CategorySpec) -> Self {
        self.insert(spec);
        self
    }

    /// Add or replace an entry, keyed by `spec.name`.
    pub fn insert(&mut self, spec: CategorySpec) {
        self.entries.insert(spec.name.clone(), spec);
    }

    /// Look up a category. Unknown names yield `None`.
    pub fn get(&self, name: &str) -> Option<&CategorySpec> {
        self.entries.get(name)
    }

    /// Category names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(SearchError::Config(
                "at least one category must be configured".into(),
            ));
        }
        self.entries.values().try_for_each(CategorySpec::validate)
    }
}

impl From<BTreeMap<String, CategorySpec>> for CategoryCatalog {
    fn from(overrides: BTreeMap<String, CategorySpec>) -> Self {
        let mut catalog = Self::default();
        for (name, mut spec) in overrides {
            spec.name = name;
            catalog.insert(spec);
        }
        catalog
    }
}

impl From<CategoryCatalog> for BTreeMap<String, CategorySpec> {
    fn from(catalog: CategoryCatalog) -> Self {
        catalog.entries
    }
}
