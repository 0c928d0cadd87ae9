//! Markup helpers shared by the HTML extractors.

use crate::error::{Result, ScraperError};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};
use url::Url;

static BACKGROUND_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"url\(\s*['"]?([^'")]+)['"]?\s*\)"#).expect("background url pattern"));

/// Compile a CSS selector, reporting bad syntax as an extractor error.
pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScraperError::Selector {
        selector: css.to_string(),
        message: format!("{:?}", e),
    })
}

/// Visible text of an element with whitespace runs collapsed.
pub fn element_text(element: &ElementRef<'_>) -> String {
    element.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" ")
}

/// Text of the first descendant matching `sel`, if any and non-empty.
pub fn select_text(element: &ElementRef<'_>, sel: &Selector) -> Option<String> {
    element
        .select(sel)
        .next()
        .map(|e| element_text(&e))
        .filter(|t| !t.is_empty())
}

/// First non-empty value among `attrs` on the first descendant matching `sel`.
pub fn select_attr(element: &ElementRef<'_>, sel: &Selector, attrs: &[&str]) -> Option<String> {
    let found = element.select(sel).next()?;
    first_attr(&found, attrs)
}

pub fn first_attr(element: &ElementRef<'_>, attrs: &[&str]) -> Option<String> {
    attrs
        .iter()
        .filter_map(|a| element.value().attr(a))
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(str::to_string)
}

/// Resolve `href` against `base`. Handles absolute, root-relative,
/// page-relative and protocol-relative (`//cdn...`) links.
pub fn resolve_url(base: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with("javascript:") || href.starts_with('#') {
        return None;
    }
    let base = Url::parse(base).ok()?;
    base.join(href).ok().map(String::from)
}

/// Extract the URL from an inline `background-image: url(...)` style.
pub fn background_image_url(style: &str) -> Option<String> {
    BACKGROUND_URL
        .captures(style)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}
