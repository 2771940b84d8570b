//! Compound score to star rating.

use super::models::StarRating;

/// Lower bounds (inclusive) for ratings 5, 4, 3 and 2. Anything below is 1.
const THRESHOLDS: [(f64, u8); 4] = [(0.6, 5), (0.3, 4), (0.0, 3), (-0.3, 2)];

/// Maps a compound score to a 1-5 star rating.
///
/// Total over the real line: scores above 1.0 still give 5, and NaN falls
/// through every comparison to 1.
pub fn assign_star_rating(score: f64) -> StarRating {
    let stars = THRESHOLDS
        .iter()
        .find(|(lower, _)| score >= *lower)
        .map(|(_, stars)| *stars)
        .unwrap_or(StarRating::MIN);

    StarRating::try_from(stars).unwrap_or_else(|_| unreachable!("thresholds are within 1..=5"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stars(score: f64) -> u8 {
        assign_star_rating(score).value()
    }

    #[test]
    fn test_exact_boundaries() {
        assert_eq!(stars(0.6), 5);
        assert_eq!(stars(0.3), 4);
        assert_eq!(stars(0.0), 3);
        assert_eq!(stars(-0.3), 2);
    }

    #[test]
    fn test_just_below_boundaries() {
        assert_eq!(stars(0.5999), 4);
        assert_eq!(stars(0.2999), 3);
        assert_eq!(stars(-0.0001), 2);
        assert_eq!(stars(-0.3001), 1);
    }

    #[test]
    fn test_extremes() {
        assert_eq!(stars(1.0), 5);
        assert_eq!(stars(-1.0), 1);
        assert_eq!(stars(f64::INFINITY), 5);
        assert_eq!(stars(f64::NEG_INFINITY), 1);
        assert_eq!(stars(f64::NAN), 1);
    }

    #[test]
    fn test_total_over_grid() {
        let mut score = -1.5;
        while score <= 1.5 {
            let value = stars(score);
            assert!((1..=5).contains(&value), "score {} gave {}", score, value);
            score += 0.01;
        }
    }
}
