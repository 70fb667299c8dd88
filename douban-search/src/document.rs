//! Thin adapter over [`scraper::Html`] answering the structural queries the
//! extractor needs: select nodes, read attributes, read text, count matches.

use crate::error::{Result, SearchError};
use scraper::{ElementRef, Html, Selector};

/// A parsed search results page.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parse raw page bytes. Invalid UTF-8 is replaced, not rejected.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Parse`] if the page is empty or carries no
    /// elements beyond the implied `html`/`head`/`body` skeleton.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        Self::parse_str(&String::from_utf8_lossy(bytes))
    }

    /// Parse a page already held as text.
    ///
    /// # Errors
    ///
    /// Same as [`Document::parse`].
    pub fn parse_str(html: &str) -> Result<Self> {
        if html.trim().is_empty() {
            return Err(SearchError::Parse("empty document".into()));
        }
        let html = Html::parse_document(html);
        let body = compile("body > *")?;
        if html.select(&body).next().is_none() {
            return Err(SearchError::Parse("document has no content".into()));
        }
        Ok(Self { html })
    }

    /// All elements matching `selector`, in document order.
    pub fn select<'a>(&'a self, selector: &'a Selector) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        self.html.select(selector)
    }
}

/// Compile a CSS selector, mapping failures to [`SearchError::Parse`].
pub fn compile(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| SearchError::Parse(format!("invalid selector {css:?}: {e:?}")))
}

/// Concatenated, trimmed text of every match under `scope`.
///
/// `None` when nothing matches, so callers can tell "absent" from "empty".
pub fn text_of(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    let mut matches = scope.select(selector).peekable();
    matches.peek()?;
    let text: String = matches.flat_map(|el| el.text()).collect();
    Some(text.trim().to_owned())
}

/// Attribute `name` of the first match under `scope`.
pub fn attr_of(scope: ElementRef<'_>, selector: &Selector, name: &str) -> Option<String> {
    scope
        .select(selector)
        .next()
        .and_then(|el| el.value().attr(name))
        .map(|value| value.trim().to_owned())
}

/// Number of matches under `scope`.
pub fn count(scope: ElementRef<'_>, selector: &Selector) -> usize {
    scope.select(selector).count()
}
