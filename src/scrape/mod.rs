//! Review scraping: page sessions, pagination and text collection.

pub mod collector;
pub mod error;
pub mod fetcher;
pub mod http;
pub mod selectors;
pub mod session;
pub mod webdriver;

pub use collector::{Collector, ReviewSet};
pub use error::FetchError;
pub use fetcher::{FetchSettings, PageFetcher, ScrapeReport, ScrapeState, StopReason};
pub use http::HttpSession;
pub use selectors::ReviewMarkup;
pub use session::PageSession;
pub use webdriver::WebDriverSession;
