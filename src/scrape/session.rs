//! Page session abstraction shared by the browser and HTTP backends.

use super::error::FetchError;
use super::selectors::ReviewMarkup;
use async_trait::async_trait;
use std::time::Duration;

/// An exclusively owned page driver: one browser tab or one HTTP "cursor".
///
/// Implementations are driven strictly in sequence by the fetcher and are
/// released exactly once through [`PageSession::quit`].
#[async_trait]
pub trait PageSession: Send {
    /// Navigates to the given URL.
    async fn open(&mut self, url: &str) -> Result<(), FetchError>;

    /// Blocks until at least one review element is present, up to `timeout`.
    async fn wait_for_reviews(
        &mut self,
        markup: &ReviewMarkup,
        timeout: Duration,
    ) -> Result<(), FetchError>;

    /// Returns the HTML of the current page.
    async fn page_source(&mut self) -> Result<String, FetchError>;

    /// Triggers the "Next" control. Returns `false` if the page has none.
    async fn click_next(&mut self, markup: &ReviewMarkup) -> Result<bool, FetchError>;

    /// Releases the underlying browser or connection.
    async fn quit(&mut self) -> Result<(), FetchError>;

    /// Backend name for log lines.
    fn name(&self) -> &'static str;
}
