//! CSV export of scored reviews and a log-friendly table preview.

use crate::analysis::ScoredReview;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Default export file name.
pub const DEFAULT_OUTPUT: &str = "random_reviews.csv";

/// Column names, matching the serde names of [`ScoredReview`].
pub const HEADER: [&str; 4] = ["Review", "Sentiment_Score", "Polarity", "Star_Rating"];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("invalid record {row}: {reason}")]
    InvalidRecord { row: usize, reason: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Checks a record before it is written.
fn validate(row: usize, record: &ScoredReview) -> Result<(), ExportError> {
    let invalid = |reason: &str| ExportError::InvalidRecord { row, reason: reason.to_string() };

    if record.review.trim().is_empty() {
        return Err(invalid("empty review text"));
    }
    if !record.sentiment_score.is_finite() {
        return Err(invalid("sentiment score is not finite"));
    }
    if !(-1.0..=1.0).contains(&record.sentiment_score) {
        return Err(invalid("sentiment score outside [-1, 1]"));
    }

    Ok(())
}

/// Writes the scored table with a header row, replacing any existing file.
///
/// All records are validated first so an invalid row leaves the target untouched.
pub fn write_csv(path: impl AsRef<Path>, records: &[ScoredReview]) -> Result<(), ExportError> {
    let path = path.as_ref();

    for (row, record) in records.iter().enumerate() {
        validate(row, record)?;
    }

    // The header is written up front so an empty table still has one.
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(HEADER)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    debug!("Wrote {} rows to {}", records.len(), path.display());
    Ok(())
}

/// Reads a table previously written by [`write_csv`].
pub fn read_csv(path: impl AsRef<Path>) -> Result<Vec<ScoredReview>, ExportError> {
    let mut reader = csv::Reader::from_path(path)?;
    let records = reader.deserialize().collect::<Result<Vec<ScoredReview>, _>>()?;
    Ok(records)
}

/// Renders the first `limit` rows as a fixed-width table.
pub fn preview(records: &[ScoredReview], limit: usize) -> String {
    let review_width = 50;
    let score_width = 15;
    let polarity_width = 8;

    let mut lines = Vec::new();

    lines.push(format!(
        "{:<review_width$}  {:>score_width$}  {:<polarity_width$}  {}",
        "Review", "Sentiment_Score", "Polarity", "Star_Rating"
    ));

    for record in records.iter().take(limit) {
        let text = record.review.replace('\n', " ");
        let review = if text.chars().count() > review_width {
            let cut: String = text.chars().take(review_width - 3).collect();
            format!("{}...", cut)
        } else {
            text
        };

        lines.push(format!(
            "{:<review_width$}  {:>score_width$.4}  {:<polarity_width$}  {}",
            review,
            record.sentiment_score,
            record.polarity.to_string(),
            record.star_rating
        ));
    }

    lines.join("\n")
}
