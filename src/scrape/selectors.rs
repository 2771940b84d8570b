//! DOM markers for review pages.
//!
//! Review blocks and the pagination control are owned by the external site.
//! Update the defaults here when its markup changes.

use anyhow::{anyhow, Result};
use scraper::Selector;
use std::sync::LazyLock;

/// CSS selector for a review text block.
pub const DEFAULT_REVIEW_SELECTOR: &str = ".ZmyHeo";

/// Visible text of the pagination control.
pub const DEFAULT_NEXT_LABEL: &str = "Next";

/// Review text block.
pub static REVIEW: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(DEFAULT_REVIEW_SELECTOR).unwrap());

/// Candidate elements for the pagination control in static HTML.
pub static NEXT_LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

/// Review and pagination markers for one site layout.
#[derive(Debug, Clone)]
pub struct ReviewMarkup {
    css: String,
    review: Selector,
    next_label: String,
}

impl ReviewMarkup {
    /// Builds markers from a CSS selector and the "Next" control label.
    pub fn new(review_css: &str, next_label: impl Into<String>) -> Result<Self> {
        let review = Selector::parse(review_css)
            .map_err(|e| anyhow!("Invalid review selector '{}': {}", review_css, e))?;

        Ok(Self { css: review_css.to_string(), review, next_label: next_label.into() })
    }

    /// Selector matching review text blocks.
    pub fn review(&self) -> &Selector {
        &self.review
    }

    /// The CSS source of the review selector.
    pub fn review_css(&self) -> &str {
        &self.css
    }

    /// Visible text of the "Next" control.
    pub fn next_label(&self) -> &str {
        &self.next_label
    }

    /// XPath locating the "Next" control in a live DOM.
    pub fn next_xpath(&self) -> String {
        format!("//span[text()={}]", xpath_literal(&self.next_label))
    }
}

/// Quotes `value` as an XPath 1.0 string literal.
///
/// XPath has no escape sequences, so a value holding both quote kinds is
/// split into pieces joined with `concat()`.
fn xpath_literal(value: &str) -> String {
    if !value.contains('\'') {
        return format!("'{}'", value);
    }
    if !value.contains('"') {
        return format!("\"{}\"", value);
    }

    let parts: Vec<String> =
        value.split('\'').map(|part| format!("'{}'", part)).collect();
    format!("concat({})", parts.join(", \"'\", "))
}

impl Default for ReviewMarkup {
    fn default() -> Self {
        Self {
            css: DEFAULT_REVIEW_SELECTOR.to_string(),
            review: REVIEW.clone(),
            next_label: DEFAULT_NEXT_LABEL.to_string(),
        }
    }
}
