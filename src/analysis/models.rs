//! Data models for reviews, sentiment labels and star ratings.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A single scraped review (trimmed text).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Review {
    pub text: String,
}

impl Review {
    /// Creates a review from raw element text. Returns `None` for blank text.
    pub fn new(raw: &str) -> Option<Self> {
        let text = raw.trim();
        if text.is_empty() {
            None
        } else {
            Some(Self { text: text.to_string() })
        }
    }
}

/// Coarse three-way sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    Positive,
    Neutral,
    Negative,
}

impl Polarity {
    /// Score above which a review is labelled positive.
    pub const POSITIVE_THRESHOLD: f64 = 0.05;
    /// Score below which a review is labelled negative.
    pub const NEGATIVE_THRESHOLD: f64 = -0.05;

    /// Labels a compound score. Both thresholds map to `Neutral`.
    pub fn from_compound(score: f64) -> Self {
        if score > Self::POSITIVE_THRESHOLD {
            Polarity::Positive
        } else if score < Self::NEGATIVE_THRESHOLD {
            Polarity::Negative
        } else {
            Polarity::Neutral
        }
    }

    /// All labels, in chart order.
    pub fn all() -> [Polarity; 3] {
        [Polarity::Positive, Polarity::Neutral, Polarity::Negative]
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Polarity::Positive => write!(f, "Positive"),
            Polarity::Neutral => write!(f, "Neutral"),
            Polarity::Negative => write!(f, "Negative"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("star rating must be between 1 and 5, got {0}")]
pub struct StarRatingError(pub u8);

/// 1-5 ordinal rating derived from a compound score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct StarRating(u8);

impl StarRating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Returns the numeric value (1-5).
    pub fn value(self) -> u8 {
        self.0
    }

    /// All ratings from 1 to 5.
    pub fn all() -> impl Iterator<Item = StarRating> {
        (Self::MIN..=Self::MAX).map(StarRating)
    }
}

impl TryFrom<u8> for StarRating {
    type Error = StarRatingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(StarRating(value))
        } else {
            Err(StarRatingError(value))
        }
    }
}

impl From<StarRating> for u8 {
    fn from(rating: StarRating) -> Self {
        rating.0
    }
}

impl fmt::Display for StarRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A sampled review with its sentiment score, label and star rating.
///
/// Field names serialize to the CSV header `Review,Sentiment_Score,Polarity,Star_Rating`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredReview {
    #[serde(rename = "Review")]
    pub review: String,
    #[serde(rename = "Sentiment_Score")]
    pub sentiment_score: f64,
    #[serde(rename = "Polarity")]
    pub polarity: Polarity,
    #[serde(rename = "Star_Rating")]
    pub star_rating: StarRating,
}
