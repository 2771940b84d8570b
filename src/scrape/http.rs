//! Static-HTML session using wreq for TLS fingerprint emulation.
//!
//! Works for pages that server-render their reviews. "Next" is followed
//! through the `href` of the matching anchor instead of a DOM click.

use super::error::FetchError;
use super::selectors::{ReviewMarkup, NEXT_LINK};
use super::session::PageSession;
use async_trait::async_trait;
use scraper::Html;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;
use wreq::Client;
use wreq_util::Emulation;

/// HTTP page session with browser impersonation.
pub struct HttpSession {
    client: Client,
    current: Option<Url>,
    html: String,
    timeout: Duration,
}

impl HttpSession {
    /// Builds the HTTP client. `timeout` bounds every request.
    pub fn new(proxy: Option<&str>, timeout: Duration) -> Result<Self, FetchError> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy =
                wreq::Proxy::all(proxy_url).map_err(|e| FetchError::Session(e.to_string()))?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(|e| FetchError::Session(e.to_string()))?;

        Ok(Self { client, current: None, html: String::new(), timeout })
    }

    async fn get(&mut self, url: Url) -> Result<(), FetchError> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url.as_str())
            .emulation(Emulation::Chrome131)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8")
            .header("Accept-Language", "en-IN,en;q=0.9")
            .header("Cache-Control", "no-cache")
            .header("Upgrade-Insecure-Requests", "1")
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        debug!("Response status: {}", status);

        if status == 429 || status == 503 {
            warn!("Throttled by the site ({})", status);
        }

        if !status.is_success() {
            return Err(FetchError::Navigation(format!("request failed with status: {}", status)));
        }

        let html = response.text().await.map_err(|e| self.classify(e))?;
        self.html = html;
        self.current = Some(url);
        Ok(())
    }

    fn classify(&self, err: wreq::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            err.into()
        }
    }

    /// Finds the href of the anchor whose visible text is the "Next" label.
    fn next_href(&self, markup: &ReviewMarkup) -> Option<String> {
        let document = Html::parse_document(&self.html);

        document
            .select(&NEXT_LINK)
            .find(|a| a.text().collect::<String>().trim() == markup.next_label())
            .and_then(|a| a.value().attr("href"))
            .map(String::from)
    }
}

#[async_trait]
impl PageSession for HttpSession {
    async fn open(&mut self, url: &str) -> Result<(), FetchError> {
        let url = Url::parse(url).map_err(|e| FetchError::Navigation(e.to_string()))?;
        self.get(url).await
    }

    async fn wait_for_reviews(
        &mut self,
        markup: &ReviewMarkup,
        _timeout: Duration,
    ) -> Result<(), FetchError> {
        // Static HTML never grows, so presence is checked once.
        let document = Html::parse_document(&self.html);
        if document.select(markup.review()).next().is_some() {
            Ok(())
        } else {
            Err(FetchError::ElementNotFound(markup.review_css().to_string()))
        }
    }

    async fn page_source(&mut self) -> Result<String, FetchError> {
        Ok(self.html.clone())
    }

    async fn click_next(&mut self, markup: &ReviewMarkup) -> Result<bool, FetchError> {
        let Some(href) = self.next_href(markup) else {
            return Ok(false);
        };

        let base = self
            .current
            .clone()
            .ok_or_else(|| FetchError::Navigation("no page loaded".to_string()))?;
        let next = base.join(&href).map_err(|e| FetchError::Navigation(e.to_string()))?;

        self.get(next).await?;
        Ok(true)
    }

    async fn quit(&mut self) -> Result<(), FetchError> {
        self.current = None;
        self.html.clear();
        Ok(())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
