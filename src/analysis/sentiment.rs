//! Lexicon-based sentiment scoring (VADER).

use super::models::{Polarity, Review, ScoredReview};
use super::rating::assign_star_rating;
use tracing::trace;
use vader_sentiment::SentimentIntensityAnalyzer;

/// Computes a compound polarity score in [-1, 1] for a piece of text.
pub trait PolarityAnalyzer {
    fn compound(&self, text: &str) -> f64;
}

/// VADER analyzer with its bundled lexicon.
pub struct VaderAnalyzer {
    inner: SentimentIntensityAnalyzer<'static>,
}

impl VaderAnalyzer {
    pub fn new() -> Self {
        Self { inner: SentimentIntensityAnalyzer::new() }
    }
}

impl Default for VaderAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl PolarityAnalyzer for VaderAnalyzer {
    fn compound(&self, text: &str) -> f64 {
        self.inner.polarity_scores(text).get("compound").copied().unwrap_or(0.0)
    }
}

/// Scores reviews and derives their polarity label and star rating.
pub struct SentimentScorer<A = VaderAnalyzer> {
    analyzer: A,
}

impl SentimentScorer<VaderAnalyzer> {
    /// Creates a scorer backed by VADER.
    pub fn new() -> Self {
        Self { analyzer: VaderAnalyzer::new() }
    }
}

impl Default for SentimentScorer<VaderAnalyzer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: PolarityAnalyzer> SentimentScorer<A> {
    /// Creates a scorer backed by a custom analyzer.
    pub fn with_analyzer(analyzer: A) -> Self {
        Self { analyzer }
    }

    /// Returns the compound score and polarity label for a text.
    pub fn score_text(&self, text: &str) -> (f64, Polarity) {
        let compound = self.analyzer.compound(text);
        (compound, Polarity::from_compound(compound))
    }

    /// Scores a single review.
    pub fn score(&self, review: Review) -> ScoredReview {
        let (sentiment_score, polarity) = self.score_text(&review.text);
        trace!("Scored {:.4} ({}): {}", sentiment_score, polarity, review.text);

        ScoredReview {
            star_rating: assign_star_rating(sentiment_score),
            review: review.text,
            sentiment_score,
            polarity,
        }
    }

    /// Scores every review, preserving order.
    pub fn score_all(&self, reviews: Vec<Review>) -> Vec<ScoredReview> {
        reviews.into_iter().map(|r| self.score(r)).collect()
    }
}
