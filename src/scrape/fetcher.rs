//! Page-by-page scrape loop with bounded pagination.

use super::collector::{Collector, ReviewSet};
use super::error::FetchError;
use super::selectors::ReviewMarkup;
use super::session::PageSession;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Timing and limits for one scrape.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Maximum number of pages to load.
    pub max_pages: usize,
    /// Warm-up delay after the first navigation.
    pub page_load_delay: Duration,
    /// Delay after triggering "Next".
    pub settle_delay: Duration,
    /// Bound on waiting for review elements per page.
    pub wait_timeout: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            max_pages: 10,
            page_load_delay: Duration::from_secs(5),
            settle_delay: Duration::from_secs(3),
            wait_timeout: Duration::from_secs(10),
        }
    }
}

/// States of the scrape loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeState {
    Loading,
    Scraping,
    Paginating,
    Done,
    Aborted,
}

/// Why pagination ended.
#[derive(Debug)]
pub enum StopReason {
    /// `max_pages` pages were scraped.
    PageLimit,
    /// The last page had no "Next" control.
    NoNextPage,
    /// A fetch error ended the loop early.
    Aborted { state: ScrapeState, error: FetchError },
}

impl StopReason {
    /// True for the normal terminations.
    pub fn is_done(&self) -> bool {
        !matches!(self, StopReason::Aborted { .. })
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::PageLimit => write!(f, "page limit reached"),
            StopReason::NoNextPage => write!(f, "no more pages"),
            StopReason::Aborted { state, error } => {
                write!(f, "aborted while {:?} ({}): {}", state, error.kind(), error)
            }
        }
    }
}

/// Outcome of a scrape: whatever was collected plus why it stopped.
#[derive(Debug)]
pub struct ScrapeReport {
    pub reviews: ReviewSet,
    pub pages_scraped: usize,
    pub stop: StopReason,
}

/// Drives a [`PageSession`] through the review pages of one product.
pub struct PageFetcher {
    markup: ReviewMarkup,
    collector: Collector,
    settings: FetchSettings,
}

impl PageFetcher {
    pub fn new(markup: ReviewMarkup, settings: FetchSettings) -> Self {
        Self { collector: Collector::new(markup.clone()), markup, settings }
    }

    /// Scrapes `url` with an owned session and always releases it afterwards.
    pub async fn scrape(&self, mut session: Box<dyn PageSession>, url: &str) -> ScrapeReport {
        let report = self.run(session.as_mut(), url).await;

        debug!("Releasing {} session", session.name());
        if let Err(e) = session.quit().await {
            warn!("Failed to release {} session: {}", session.name(), e);
        }

        report
    }

    /// Runs the scrape loop against a borrowed session.
    ///
    /// Fetch errors never escape: they end pagination and are reported in
    /// [`ScrapeReport::stop`] alongside the reviews collected so far.
    pub async fn run(&self, session: &mut dyn PageSession, url: &str) -> ScrapeReport {
        let mut reviews = ReviewSet::new();
        let mut pages_scraped = 0;

        let stop = match self.paginate(session, url, &mut reviews, &mut pages_scraped).await {
            Ok(reason) => {
                info!("Scraping finished: {}", reason);
                reason
            }
            Err((state, error)) => {
                let reason = StopReason::Aborted { state, error };
                warn!("Error encountered: {}", reason);
                reason
            }
        };

        ScrapeReport { reviews, pages_scraped, stop }
    }

    async fn paginate(
        &self,
        session: &mut dyn PageSession,
        url: &str,
        reviews: &mut ReviewSet,
        pages_scraped: &mut usize,
    ) -> Result<StopReason, (ScrapeState, FetchError)> {
        let mut state = ScrapeState::Loading;
        debug!("State: {:?}", state);

        session.open(url).await.map_err(|e| (state, e))?;
        sleep(self.settings.page_load_delay).await;

        for page in 1..=self.settings.max_pages {
            state = ScrapeState::Scraping;
            debug!("State: {:?} (page {})", state, page);

            session
                .wait_for_reviews(&self.markup, self.settings.wait_timeout)
                .await
                .map_err(|e| (state, e))?;

            let html = session.page_source().await.map_err(|e| (state, e))?;
            let added = self.collector.collect_into(&html, reviews);
            *pages_scraped += 1;
            debug!("Page {} added {} new reviews", page, added);
            info!("Collected {} reviews so far...", reviews.len());

            if page == self.settings.max_pages {
                break;
            }

            state = ScrapeState::Paginating;
            debug!("State: {:?}", state);

            if !session.click_next(&self.markup).await.map_err(|e| (state, e))? {
                debug!("State: {:?}", ScrapeState::Done);
                return Ok(StopReason::NoNextPage);
            }

            sleep(self.settings.settle_delay).await;
        }

        debug!("State: {:?}", ScrapeState::Done);
        Ok(StopReason::PageLimit)
    }
}

async fn sleep(delay: Duration) {
    if !delay.is_zero() {
        debug!("Waiting {}ms", delay.as_millis());
        tokio::time::sleep(delay).await;
    }
}
