//! Scrape → sample → score → export → chart pipeline.

use crate::analysis::{Sampler, ScoredReview, SentimentScorer};
use crate::charts;
use crate::config::{Backend, Config};
use crate::export;
use crate::scrape::{
    HttpSession, PageFetcher, PageSession, ReviewMarkup, StopReason, WebDriverSession,
};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info, warn};

/// Result of a pipeline run.
#[derive(Debug)]
pub enum Outcome {
    /// Nothing was scraped; no files were written.
    NoReviews { stop: StopReason },
    /// Reviews were scored and exported.
    Completed(RunSummary),
}

#[derive(Debug)]
pub struct RunSummary {
    pub collected: usize,
    pub scored: Vec<ScoredReview>,
    pub csv_path: PathBuf,
    pub chart_paths: Vec<PathBuf>,
    pub stop: StopReason,
}

/// Runs the full review analysis.
pub struct AnalyzeCommand {
    config: Config,
}

impl AnalyzeCommand {
    /// Creates a new analyze command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Opens the configured session and runs the pipeline.
    pub async fn execute(&self) -> Result<Outcome> {
        let markup = self.markup()?;
        let session = self.open_session().await?;
        self.run(markup, session).await
    }

    fn markup(&self) -> Result<ReviewMarkup> {
        ReviewMarkup::new(&self.config.review_selector, &self.config.next_label)
    }

    async fn open_session(&self) -> Result<Box<dyn PageSession>> {
        let session: Box<dyn PageSession> = match self.config.backend {
            Backend::WebDriver => Box::new(
                WebDriverSession::connect(&self.config.webdriver_url, self.config.headless)
                    .await
                    .context("Failed to start browser session")?,
            ),
            Backend::Http => Box::new(
                HttpSession::new(
                    self.config.proxy.as_deref(),
                    Duration::from_secs(self.config.wait_timeout_secs),
                )
                .context("Failed to create HTTP client")?,
            ),
        };

        Ok(session)
    }

    /// Runs the pipeline with a provided session (for testing).
    ///
    /// The session is released even when the configured markup is invalid.
    pub async fn execute_with_session(&self, mut session: Box<dyn PageSession>) -> Result<Outcome> {
        let markup = match self.markup() {
            Ok(markup) => markup,
            Err(e) => {
                if let Err(quit_err) = session.quit().await {
                    warn!("Failed to release {} session: {}", session.name(), quit_err);
                }
                return Err(e);
            }
        };
        self.run(markup, session).await
    }

    async fn run(&self, markup: ReviewMarkup, session: Box<dyn PageSession>) -> Result<Outcome> {
        let fetcher = PageFetcher::new(markup, self.config.fetch_settings());

        info!("Scraping reviews from {}", self.config.url);
        let report = fetcher.scrape(session, &self.config.url).await;

        if report.reviews.is_empty() {
            error!("No reviews found! The website structure may have changed.");
            return Ok(Outcome::NoReviews { stop: report.stop });
        }

        let collected = report.reviews.len();
        info!("Total {} Reviews Scraped Successfully!", collected);

        let sampler = Sampler::new(self.config.sample_size, self.config.seed);
        let sample = sampler.sample(report.reviews.into_reviews());
        info!("Randomly selected {} reviews.", sample.len());

        let scored = SentimentScorer::new().score_all(sample);

        info!("Extracted Reviews & Sentiment Analysis:\n{}", export::preview(&scored, 5));

        let csv_path = self.config.output.clone();
        export::write_csv(&csv_path, &scored)
            .with_context(|| format!("Failed to export {}", csv_path.display()))?;
        info!("Data saved as '{}'", csv_path.display());

        let chart_paths = if self.config.charts {
            charts::render_all(&scored, &self.config.chart_dir, &self.config.extra_stopwords)?
        } else {
            Vec::new()
        };

        Ok(Outcome::Completed(RunSummary {
            collected,
            scored,
            csv_path,
            chart_paths,
            stop: report.stop,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrape::FetchError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    /// Session serving a single static page.
    struct SinglePage(String, Arc<AtomicBool>);

    impl SinglePage {
        fn new(html: impl Into<String>) -> Self {
            Self(html.into(), Arc::new(AtomicBool::new(false)))
        }
    }

    #[async_trait]
    impl PageSession for SinglePage {
        async fn open(&mut self, _url: &str) -> Result<(), FetchError> {
            Ok(())
        }

        async fn wait_for_reviews(
            &mut self,
            markup: &ReviewMarkup,
            _timeout: Duration,
        ) -> Result<(), FetchError> {
            if self.0.contains("ZmyHeo") {
                Ok(())
            } else {
                Err(FetchError::ElementNotFound(markup.review_css().to_string()))
            }
        }

        async fn page_source(&mut self) -> Result<String, FetchError> {
            Ok(self.0.clone())
        }

        async fn click_next(&mut self, _markup: &ReviewMarkup) -> Result<bool, FetchError> {
            Ok(false)
        }

        async fn quit(&mut self) -> Result<(), FetchError> {
            self.1.store(true, Ordering::SeqCst);
            Ok(())
        }

        fn name(&self) -> &'static str {
            "single-page"
        }
    }

    fn make_test_config(dir: &TempDir) -> Config {
        Config {
            page_load_delay_ms: 0,
            settle_delay_ms: 0,
            output: dir.path().join("random_reviews.csv"),
            chart_dir: dir.path().to_path_buf(),
            charts: false,
            ..Config::default()
        }
    }

    fn make_page(reviews: &[&str]) -> String {
        let mut html = String::from("<html><body>");
        for review in reviews {
            html.push_str(&format!(r#"<div class="ZmyHeo"><div>{}</div></div>"#, review));
        }
        html.push_str("</body></html>");
        html
    }

    #[tokio::test]
    async fn test_pipeline_exports_scored_reviews() {
        let dir = TempDir::new().unwrap();
        let config = make_test_config(&dir);
        let cmd = AnalyzeCommand::new(config);

        let page = make_page(&["Excellent laptop, I love it", "Terrible heating issues", "Good"]);
        let outcome = cmd.execute_with_session(Box::new(SinglePage::new(page))).await.unwrap();

        let Outcome::Completed(summary) = outcome else {
            panic!("expected a completed run");
        };
        assert_eq!(summary.collected, 3);
        assert_eq!(summary.scored.len(), 3);
        assert!(matches!(summary.stop, StopReason::NoNextPage));
        assert!(summary.chart_paths.is_empty());

        let exported = export::read_csv(&summary.csv_path).unwrap();
        assert_eq!(exported.len(), 3);
        assert!(exported.iter().any(|r| r.review == "Terrible heating issues"));
    }

    #[tokio::test]
    async fn test_pipeline_samples_down() {
        let dir = TempDir::new().unwrap();
        let mut config = make_test_config(&dir);
        config.sample_size = 5;
        let cmd = AnalyzeCommand::new(config);

        let texts: Vec<String> = (0..12).map(|i| format!("Review number {}", i)).collect();
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let outcome = cmd.execute_with_session(Box::new(SinglePage::new(make_page(&refs)))).await.unwrap();

        let Outcome::Completed(summary) = outcome else {
            panic!("expected a completed run");
        };
        assert_eq!(summary.collected, 12);
        assert_eq!(summary.scored.len(), 5);
    }

    #[tokio::test]
    async fn test_no_reviews_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let config = make_test_config(&dir);
        let output = config.output.clone();
        let cmd = AnalyzeCommand::new(config);

        let outcome = cmd
            .execute_with_session(Box::new(SinglePage::new("<html></html>")))
            .await
            .unwrap();

        match outcome {
            Outcome::NoReviews { stop } => assert!(!stop.is_done()),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_no_reviews_keeps_existing_file() {
        let dir = TempDir::new().unwrap();
        let config = make_test_config(&dir);
        std::fs::write(&config.output, "previous run").unwrap();
        let output = config.output.clone();
        let cmd = AnalyzeCommand::new(config);

        let outcome = cmd
            .execute_with_session(Box::new(SinglePage::new("<html></html>")))
            .await
            .unwrap();

        assert!(matches!(outcome, Outcome::NoReviews { .. }));
        assert_eq!(std::fs::read_to_string(output).unwrap(), "previous run");
    }

    #[tokio::test]
    async fn test_invalid_selector_is_an_error() {
        let dir = TempDir::new().unwrap();
        let mut config = make_test_config(&dir);
        config.review_selector = "div[[".to_string();
        let cmd = AnalyzeCommand::new(config);

        let session = SinglePage::new(make_page(&["Good"]));
        let released = session.1.clone();

        let result = cmd.execute_with_session(Box::new(session)).await;
        assert!(result.is_err());
        assert!(released.load(Ordering::SeqCst));
        assert!(!dir.path().join("random_reviews.csv").exists());
    }
}
