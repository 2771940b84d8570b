//! review-sentiment - Scrape product reviews and chart their sentiment
//!
//! Collects review texts from a paginated product-review page, samples
//! them, scores each with VADER, exports a CSV and renders summary charts.

pub mod analysis;
pub mod charts;
pub mod commands;
pub mod config;
pub mod export;
pub mod scrape;

pub use analysis::{Polarity, Review, ScoredReview, StarRating};
pub use config::{Backend, Config};
pub use scrape::{PageSession, StopReason};
