//! Chart rendering: polarity pie, star-rating bars and word cloud.
//!
//! Charts are written as PNG files so the tool works without a display.

pub mod bars;
pub mod pie;
pub mod stopwords;
pub mod wordcloud;

use crate::analysis::{Polarity, ScoredReview, StarRating};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

pub const PIE_FILE: &str = "sentiment_distribution.png";
pub const BARS_FILE: &str = "star_rating_distribution.png";
pub const WORDCLOUD_FILE: &str = "review_wordcloud.png";

/// Number of reviews per polarity label, in `Polarity::all()` order.
pub fn polarity_counts(records: &[ScoredReview]) -> Vec<(Polarity, usize)> {
    Polarity::all()
        .into_iter()
        .map(|p| (p, records.iter().filter(|r| r.polarity == p).count()))
        .collect()
}

/// Number of reviews per star rating, 1 through 5.
pub fn star_counts(records: &[ScoredReview]) -> Vec<(StarRating, usize)> {
    StarRating::all()
        .map(|s| (s, records.iter().filter(|r| r.star_rating == s).count()))
        .collect()
}

/// Renders all three charts into `dir` and returns the written paths.
pub fn render_all(
    records: &[ScoredReview],
    dir: &Path,
    extra_stopwords: &[String],
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create chart directory: {}", dir.display()))?;

    let pie_path = dir.join(PIE_FILE);
    pie::render(records, &pie_path).context("Failed to render sentiment pie chart")?;

    let bars_path = dir.join(BARS_FILE);
    bars::render(records, &bars_path).context("Failed to render star rating chart")?;
    info!("Visualization completed successfully!");

    let cloud_path = dir.join(WORDCLOUD_FILE);
    let stop = stopwords::build(extra_stopwords);
    wordcloud::render(records, &stop, &cloud_path).context("Failed to render word cloud")?;
    info!("WordCloud visualization completed!");

    Ok(vec![pie_path, bars_path, cloud_path])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::assign_star_rating;

    fn record(score: f64) -> ScoredReview {
        ScoredReview {
            review: format!("review {}", score),
            sentiment_score: score,
            polarity: Polarity::from_compound(score),
            star_rating: assign_star_rating(score),
        }
    }

    #[test]
    fn test_polarity_counts() {
        let records = vec![record(0.9), record(0.4), record(0.0), record(-0.6)];
        let counts = polarity_counts(&records);

        assert_eq!(
            counts,
            vec![(Polarity::Positive, 2), (Polarity::Neutral, 1), (Polarity::Negative, 1)]
        );
    }

    #[test]
    fn test_star_counts_include_empty_ratings() {
        let records = vec![record(0.9), record(0.7), record(-0.9)];
        let counts: Vec<(u8, usize)> =
            star_counts(&records).into_iter().map(|(s, c)| (s.value(), c)).collect();

        assert_eq!(counts, vec![(1, 1), (2, 0), (3, 0), (4, 0), (5, 2)]);
    }
}
