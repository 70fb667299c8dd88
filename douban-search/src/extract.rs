//! Result extraction from a douban mobile search page.
//!
//! The page comes in two shapes. The combined search groups entries under
//! `li.search-module` sections headed by a category label; a category-only
//! search renders a flat `ul.search_results_subjects`. Both are handled here
//! without the caller knowing which one it got.

use crate::category::{CategoryCatalog, CategorySpec};
use crate::document::{self, Document};
use crate::error::Result;
use crate::types::SearchResult;
use scraper::{ElementRef, Selector};

/// Compiled selectors for one extraction pass.
struct EntrySelectors {
    module: Selector,
    module_name: Selector,
    entry: Selector,
    link: Selector,
    image: Selector,
    score: Selector,
    title: Selector,
    full_star: Selector,
    half_star: Selector,
}

impl EntrySelectors {
    fn new() -> Result<Self> {
        Ok(Self {
            module: document::compile("li.search-module")?,
            module_name: document::compile("span.search-results-modules-name")?,
            entry: document::compile("ul.search_results_subjects > li")?,
            link: document::compile("a")?,
            image: document::compile("a > img")?,
            score: document::compile("a > div > p > span")?,
            title: document::compile("a > div > span")?,
            full_star: document::compile(".rating-star-small-full")?,
            half_star: document::compile(".rating-star-small-half")?,
        })
    }
}

/// Extract results for `category` in document order.
///
/// An unknown category yields an empty list. The caller decides how to
/// report it.
///
/// # Errors
///
/// Returns [`crate::SearchError::Parse`] only if a built-in selector fails
/// to compile. Missing fields on an entry never fail the batch.
pub fn extract(
    page: &Document,
    category: &str,
    catalog: &CategoryCatalog,
) -> Result<Vec<SearchResult>> {
    match catalog.get(category) {
        Some(spec) => extract_category(page, spec),
        None => {
            tracing::debug!(category, "unknown category, nothing to extract");
            Ok(Vec::new())
        }
    }
}

/// Parse raw page text and extract results for `category`.
///
/// Extracted as a separate function for testability with fixture HTML.
///
/// # Errors
///
/// Returns [`crate::SearchError::Parse`] if the page cannot be parsed at all.
pub fn parse_results(
    html: &str,
    category: &str,
    catalog: &CategoryCatalog,
) -> Result<Vec<SearchResult>> {
    let page = Document::parse_str(html)?;
    extract(&page, category, catalog)
}

/// Extract results for an already resolved category.
///
/// # Errors
///
/// Same as [`extract`].
pub fn extract_category(page: &Document, spec: &CategorySpec) -> Result<Vec<SearchResult>> {
    let sel = EntrySelectors::new()?;

    let results: Vec<SearchResult> = select_entries(page, spec, &sel)
        .into_iter()
        .map(|entry| read_entry(entry, spec, &sel))
        .collect();

    tracing::debug!(category = %spec.name, count = results.len(), "results extracted");
    Ok(results)
}

/// Pick the entry nodes for `spec`, from the matching section when the page
/// is grouped, or from the flat list otherwise.
fn select_entries<'a>(
    page: &'a Document,
    spec: &CategorySpec,
    sel: &'a EntrySelectors,
) -> Vec<ElementRef<'a>> {
    let modules: Vec<ElementRef<'a>> = page.select(&sel.module).collect();
    if modules.is_empty() {
        return page.select(&sel.entry).collect();
    }

    let matching: Vec<ElementRef<'a>> = modules
        .into_iter()
        .filter(|module| {
            document::text_of(*module, &sel.module_name).as_deref() == Some(spec.label.as_str())
        })
        .collect();

    if matching.is_empty() {
        // Label text drifted or the category had no hits. Either way the
        // answer is an empty list.
        tracing::debug!(
            category = %spec.name,
            label = %spec.label,
            "no result section matches category label"
        );
    }

    matching
        .into_iter()
        .flat_map(|module| module.select(&sel.entry))
        .collect()
}

fn read_entry(entry: ElementRef<'_>, spec: &CategorySpec, sel: &EntrySelectors) -> SearchResult {
    let href = field(document::attr_of(entry, &sel.link, "href"), "href");
    let title = field(document::text_of(entry, &sel.title), "title");
    let origin_score = field(document::text_of(entry, &sel.score), "score");
    let image_source_url = field(document::attr_of(entry, &sel.image, "src"), "image");

    SearchResult {
        title,
        origin_score,
        full_star_count: star_count(entry, &sel.full_star),
        half_star_count: star_count(entry, &sel.half_star),
        detail_path: spec.strip_category_segment(&href),
        image_source_url,
    }
}

fn field(value: Option<String>, name: &'static str) -> String {
    value.unwrap_or_else(|| {
        tracing::trace!(field = name, "entry field missing");
        String::new()
    })
}

fn star_count(entry: ElementRef<'_>, selector: &Selector) -> u32 {
    u32::try_from(document::count(entry, selector)).unwrap_or(u32::MAX)
}
