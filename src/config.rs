//! Configuration management with TOML, environment variables, and CLI overrides.

use crate::analysis::sampler::{DEFAULT_SAMPLE_SIZE, DEFAULT_SEED};
use crate::export::DEFAULT_OUTPUT;
use crate::scrape::selectors::{DEFAULT_NEXT_LABEL, DEFAULT_REVIEW_SELECTOR};
use crate::scrape::FetchSettings;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Product-review page scraped when no URL is configured.
pub const DEFAULT_URL: &str = "https://www.flipkart.com/hp-amd-ryzen-5-hexa-core-5500u-8-gb-512-gb-ssd-windows-11-home-15s-eq2144au-thin-light-laptop/product-reviews/itmd57b41ed8750a?pid=COMGBH9JDPVGD8BH&lid=LSTCOMGBH9JDPVGD8BHIZPQIL&marketplace=FLIPKART";

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Product-review page URL
    #[serde(default = "default_url")]
    pub url: String,

    /// Page session backend
    #[serde(default)]
    pub backend: Backend,

    /// WebDriver endpoint (chromedriver)
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Run the browser without a window
    #[serde(default = "default_true")]
    pub headless: bool,

    /// Proxy URL for the HTTP backend (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// CSS selector of review text blocks
    #[serde(default = "default_review_selector")]
    pub review_selector: String,

    /// Visible text of the pagination control
    #[serde(default = "default_next_label")]
    pub next_label: String,

    /// Maximum number of pages to scrape
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Warm-up delay after opening the first page, in milliseconds
    #[serde(default = "default_page_load_delay_ms")]
    pub page_load_delay_ms: u64,

    /// Delay after clicking "Next", in milliseconds
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Maximum wait for review elements per page, in seconds
    #[serde(default = "default_wait_timeout_secs")]
    pub wait_timeout_secs: u64,

    /// Number of reviews to sample
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,

    /// Sampling seed
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// CSV output path
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Directory for chart images
    #[serde(default = "default_chart_dir")]
    pub chart_dir: PathBuf,

    /// Render charts after export
    #[serde(default = "default_true")]
    pub charts: bool,

    /// Extra words excluded from the word cloud
    #[serde(default)]
    pub extra_stopwords: Vec<String>,
}

fn default_url() -> String {
    DEFAULT_URL.to_string()
}

fn default_webdriver_url() -> String {
    "http://localhost:9515".to_string()
}

fn default_true() -> bool {
    true
}

fn default_review_selector() -> String {
    DEFAULT_REVIEW_SELECTOR.to_string()
}

fn default_next_label() -> String {
    DEFAULT_NEXT_LABEL.to_string()
}

fn default_max_pages() -> usize {
    10
}

fn default_page_load_delay_ms() -> u64 {
    5000
}

fn default_settle_delay_ms() -> u64 {
    3000
}

fn default_wait_timeout_secs() -> u64 {
    10
}

fn default_sample_size() -> usize {
    DEFAULT_SAMPLE_SIZE
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT)
}

fn default_chart_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: default_url(),
            backend: Backend::WebDriver,
            webdriver_url: default_webdriver_url(),
            headless: true,
            proxy: None,
            review_selector: default_review_selector(),
            next_label: default_next_label(),
            max_pages: default_max_pages(),
            page_load_delay_ms: default_page_load_delay_ms(),
            settle_delay_ms: default_settle_delay_ms(),
            wait_timeout_secs: default_wait_timeout_secs(),
            sample_size: default_sample_size(),
            seed: default_seed(),
            output: default_output(),
            chart_dir: default_chart_dir(),
            charts: true,
            extra_stopwords: Vec::new(),
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        // 1. Explicit path takes precedence
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        // 2. Try current directory
        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        // 3. Try XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("review-sentiment").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        // 4. Return default config
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(url) = std::env::var("REVIEWS_URL") {
            self.url = url;
        }

        if let Ok(webdriver) = std::env::var("REVIEWS_WEBDRIVER") {
            self.webdriver_url = webdriver;
        }

        if let Ok(pages) = std::env::var("REVIEWS_MAX_PAGES") {
            if let Ok(p) = pages.parse() {
                self.max_pages = p;
            }
        }

        if let Ok(proxy) = std::env::var("REVIEWS_PROXY") {
            self.proxy = Some(proxy);
        }

        self
    }

    /// Pagination limits and delays for the page fetcher.
    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            max_pages: self.max_pages,
            page_load_delay: Duration::from_millis(self.page_load_delay_ms),
            settle_delay: Duration::from_millis(self.settle_delay_ms),
            wait_timeout: Duration::from_secs(self.wait_timeout_secs),
        }
    }
}

/// How pages are loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Real headless Chrome driven over WebDriver.
    #[default]
    WebDriver,
    /// Plain HTTP requests; only for server-rendered pages.
    Http,
}

impl std::str::FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "webdriver" | "browser" => Ok(Backend::WebDriver),
            "http" => Ok(Backend::Http),
            _ => Err(format!("Unknown backend: {}. Use: webdriver, http", s)),
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::WebDriver => write!(f, "webdriver"),
            Backend::Http => write!(f, "http"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.url, DEFAULT_URL);
        assert_eq!(config.backend, Backend::WebDriver);
        assert!(config.headless);
        assert!(config.proxy.is_none());
        assert_eq!(config.review_selector, ".ZmyHeo");
        assert_eq!(config.next_label, "Next");
        assert_eq!(config.max_pages, 10);
        assert_eq!(config.page_load_delay_ms, 5000);
        assert_eq!(config.settle_delay_ms, 3000);
        assert_eq!(config.wait_timeout_secs, 10);
        assert_eq!(config.sample_size, 50);
        assert_eq!(config.seed, 42);
        assert_eq!(config.output, PathBuf::from("random_reviews.csv"));
        assert!(config.charts);
        assert!(config.extra_stopwords.is_empty());
    }

    #[test]
    fn test_fetch_settings() {
        let settings = Config::default().fetch_settings();
        assert_eq!(settings.max_pages, 10);
        assert_eq!(settings.page_load_delay, Duration::from_secs(5));
        assert_eq!(settings.settle_delay, Duration::from_secs(3));
        assert_eq!(settings.wait_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_backend_parsing() {
        assert_eq!("webdriver".parse::<Backend>().unwrap(), Backend::WebDriver);
        assert_eq!("Browser".parse::<Backend>().unwrap(), Backend::WebDriver);
        assert_eq!("HTTP".parse::<Backend>().unwrap(), Backend::Http);

        let err = "curl".parse::<Backend>().unwrap_err();
        assert!(err.contains("Unknown backend"));
    }

    #[test]
    fn test_backend_display() {
        assert_eq!(Backend::WebDriver.to_string(), "webdriver");
        assert_eq!(Backend::Http.to_string(), "http");
    }

    #[test]
    fn test_config_from_toml() {
        let toml = r#"
            url = "https://shop.example/reviews/123"
            backend = "http"
            max_pages = 3
            sample_size = 20
            extra_stopwords = ["ryzen", "amd"]
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.url, "https://shop.example/reviews/123");
        assert_eq!(config.backend, Backend::Http);
        assert_eq!(config.max_pages, 3);
        assert_eq!(config.sample_size, 20);
        assert_eq!(config.extra_stopwords, vec!["ryzen", "amd"]);
        assert_eq!(config.seed, 42);
        assert!(config.headless);
    }

    #[test]
    fn test_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            review_selector = "div.review-text"
            charts = false
            "#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.review_selector, "div.review-text");
        assert!(!config.charts);
    }

    #[test]
    fn test_config_from_file_not_found() {
        let result = Config::from_file("/nonexistent/path/config.toml");
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Failed to read config file"));
    }

    #[test]
    fn test_config_from_file_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid toml {{{{").unwrap();

        let err = Config::from_file(file.path()).unwrap_err().to_string();
        assert!(err.contains("Failed to parse config file"));
    }

    #[test]
    fn test_config_load_explicit_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "max_pages = 2").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.max_pages, 2);
    }

    #[test]
    fn test_config_with_env() {
        let orig_url = std::env::var("REVIEWS_URL").ok();
        let orig_pages = std::env::var("REVIEWS_MAX_PAGES").ok();

        std::env::set_var("REVIEWS_URL", "https://shop.example/r");
        std::env::set_var("REVIEWS_MAX_PAGES", "not_a_number");

        let config = Config::new().with_env();
        assert_eq!(config.url, "https://shop.example/r");
        // Invalid numbers are ignored
        assert_eq!(config.max_pages, 10);

        match orig_url {
            Some(v) => std::env::set_var("REVIEWS_URL", v),
            None => std::env::remove_var("REVIEWS_URL"),
        }
        match orig_pages {
            Some(v) => std::env::set_var("REVIEWS_MAX_PAGES", v),
            None => std::env::remove_var("REVIEWS_MAX_PAGES"),
        }
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config {
            backend: Backend::Http,
            proxy: Some("socks5://localhost:1080".to_string()),
            sample_size: 25,
            ..Config::default()
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.backend, config.backend);
        assert_eq!(parsed.proxy, config.proxy);
        assert_eq!(parsed.sample_size, config.sample_size);
        assert_eq!(parsed.url, config.url);
    }
}
