//! Extracts review text from page HTML into a de-duplicated set.

use super::selectors::ReviewMarkup;
use crate::analysis::Review;
use scraper::{ElementRef, Html};
use std::collections::HashSet;
use tracing::trace;

/// Reviews collected during one scrape, unique by exact text.
///
/// Insertion order is kept so that sampling is reproducible for identical input.
#[derive(Debug, Default)]
pub struct ReviewSet {
    reviews: Vec<Review>,
    seen: HashSet<String>,
}

impl ReviewSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts raw review text. Blank and duplicate text is ignored.
    ///
    /// Returns true if the review was new.
    pub fn insert(&mut self, raw: &str) -> bool {
        let Some(review) = Review::new(raw) else {
            return false;
        };

        if !self.seen.insert(review.text.clone()) {
            trace!("Duplicate review skipped");
            return false;
        }

        self.reviews.push(review);
        true
    }

    /// Number of unique reviews.
    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }

    /// Freezes the set into its reviews, in insertion order.
    pub fn into_reviews(self) -> Vec<Review> {
        self.reviews
    }
}

impl<'a> Extend<&'a str> for ReviewSet {
    fn extend<T: IntoIterator<Item = &'a str>>(&mut self, iter: T) {
        for raw in iter {
            self.insert(raw);
        }
    }
}

/// Elements rendered on their own line by a browser.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "figcaption", "figure",
    "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav", "ol", "p",
    "pre", "section", "table", "tr", "ul",
];

/// Elements whose content is never visible text.
const HIDDEN_TAGS: &[&str] = &["script", "style", "template", "noscript"];

/// Text of an element as a browser lays it out: `<br>` and block boundaries
/// become line breaks, runs of whitespace collapse to one space.
pub fn rendered_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    push_text(element, &mut raw);

    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn push_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            continue;
        }

        let Some(child) = ElementRef::wrap(child) else {
            continue;
        };
        let name = child.value().name();

        if name == "br" {
            out.push('\n');
        } else if !HIDDEN_TAGS.contains(&name) {
            let block = BLOCK_TAGS.contains(&name);
            if block {
                out.push('\n');
            }
            push_text(child, out);
            if block {
                out.push('\n');
            }
        }
    }
}

/// Pulls review text out of page HTML.
pub struct Collector {
    markup: ReviewMarkup,
}

impl Collector {
    pub fn new(markup: ReviewMarkup) -> Self {
        Self { markup }
    }

    /// Returns the rendered text of every review element on the page, in DOM order.
    pub fn extract(&self, html: &str) -> Vec<String> {
        let document = Html::parse_document(html);

        document.select(self.markup.review()).map(rendered_text).collect()
    }

    /// Adds every review on the page to the set and returns how many were new.
    pub fn collect_into(&self, html: &str, set: &mut ReviewSet) -> usize {
        self.extract(html).iter().filter(|raw| set.insert(raw)).count()
    }
}

impl Default for Collector {
    fn default() -> Self {
        Self::new(ReviewMarkup::default())
    }
}
