//! Headless Chrome session over W3C WebDriver.

use super::error::FetchError;
use super::selectors::ReviewMarkup;
use super::session::PageSession;
use async_trait::async_trait;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{json, Map, Value};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Browser session driving Chrome through a WebDriver endpoint (e.g. chromedriver).
///
/// Dropping an open session schedules `close` on the current tokio runtime,
/// so the browser is not leaked when the scrape unwinds early.
pub struct WebDriverSession {
    client: Option<Client>,
}

impl WebDriverSession {
    /// Starts a new Chrome session.
    pub async fn connect(webdriver_url: &str, headless: bool) -> Result<Self, FetchError> {
        info!("Starting browser session via {}", webdriver_url);

        let client = ClientBuilder::native()
            .capabilities(chrome_capabilities(headless))
            .connect(webdriver_url)
            .await?;

        Ok(Self { client: Some(client) })
    }

    fn client(&self) -> Result<&Client, FetchError> {
        self.client.as_ref().ok_or_else(|| FetchError::Session("session already closed".into()))
    }
}

/// Chrome options matching a sandboxless headless container run.
fn chrome_capabilities(headless: bool) -> Map<String, Value> {
    let mut args = vec!["--no-sandbox", "--disable-dev-shm-usage"];
    if headless {
        args.push("--headless");
    }

    let mut caps = Map::new();
    caps.insert("browserName".to_string(), json!("chrome"));
    caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
    caps
}

#[async_trait]
impl PageSession for WebDriverSession {
    async fn open(&mut self, url: &str) -> Result<(), FetchError> {
        debug!("GET {}", url);
        self.client()?.goto(url).await.map_err(|e| FetchError::Navigation(e.to_string()))
    }

    async fn wait_for_reviews(
        &mut self,
        markup: &ReviewMarkup,
        timeout: Duration,
    ) -> Result<(), FetchError> {
        let result = self
            .client()?
            .wait()
            .at_most(timeout)
            .for_element(Locator::Css(markup.review_css()))
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(CmdError::WaitTimeout) => Err(FetchError::Timeout(timeout)),
            Err(e) => Err(e.into()),
        }
    }

    async fn page_source(&mut self) -> Result<String, FetchError> {
        Ok(self.client()?.source().await?)
    }

    async fn click_next(&mut self, markup: &ReviewMarkup) -> Result<bool, FetchError> {
        let client = self.client()?;
        let xpath = markup.next_xpath();
        let buttons = client.find_all(Locator::XPath(&xpath)).await?;

        let Some(button) = buttons.first() else {
            return Ok(false);
        };

        // A script click avoids interception by sticky headers and overlays.
        let arg = serde_json::to_value(button).map_err(|e| FetchError::Navigation(e.to_string()))?;
        client.execute("arguments[0].click();", vec![arg]).await?;
        Ok(true)
    }

    async fn quit(&mut self) -> Result<(), FetchError> {
        match self.client.take() {
            Some(client) => {
                debug!("Closing browser session");
                client.close().await.map_err(|e| FetchError::Session(e.to_string()))
            }
            None => Ok(()),
        }
    }

    fn name(&self) -> &'static str {
        "webdriver"
    }
}

impl Drop for WebDriverSession {
    fn drop(&mut self) {
        let Some(client) = self.client.take() else {
            return;
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                warn!("Browser session dropped without quit; closing in background");
                handle.spawn(async move {
                    let _ = client.close().await;
                });
            }
            Err(_) => warn!("Browser session dropped outside a runtime; it may be leaked"),
        }
    }
}
