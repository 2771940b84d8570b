//! Sampling, sentiment scoring and star-rating assignment.

pub mod models;
pub mod rating;
pub mod sampler;
pub mod sentiment;

pub use models::{Polarity, Review, ScoredReview, StarRating};
pub use rating::assign_star_rating;
pub use sampler::Sampler;
pub use sentiment::{PolarityAnalyzer, SentimentScorer, VaderAnalyzer};
