//! Seeded random sampling of collected reviews.

use super::models::Review;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

/// Default sample size.
pub const DEFAULT_SAMPLE_SIZE: usize = 50;

/// Default RNG seed.
pub const DEFAULT_SEED: u64 = 42;

/// Draws a bounded, reproducible subset of reviews.
#[derive(Debug, Clone, Copy)]
pub struct Sampler {
    size: usize,
    seed: u64,
}

impl Sampler {
    /// Creates a sampler drawing at most `size` reviews with the given seed.
    pub fn new(size: usize, seed: u64) -> Self {
        Self { size, seed }
    }

    /// Returns the maximum sample size.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Samples without replacement when there are more than `size` reviews,
    /// otherwise returns all reviews in their original order.
    ///
    /// The output order is the draw order; identical input and seed always
    /// produce identical output.
    pub fn sample(&self, reviews: Vec<Review>) -> Vec<Review> {
        if reviews.len() <= self.size {
            debug!("Keeping all {} reviews (sample size {})", reviews.len(), self.size);
            return reviews;
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let picked = rand::seq::index::sample(&mut rng, reviews.len(), self.size);

        let mut slots: Vec<Option<Review>> = reviews.into_iter().map(Some).collect();
        picked.into_iter().filter_map(|i| slots[i].take()).collect()
    }
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_SIZE, DEFAULT_SEED)
    }
}
