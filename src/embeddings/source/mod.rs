
use rand::RngCore;

use super::vector::{DEFAULT_DIMENSION, generate_vector};

/// Anything that can turn a piece of text into a vector.
///
/// Randomness is supplied by the caller so that a whole pipeline run shares
/// one source; implementations backed by a real model simply ignore it.
pub trait VectorSource: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &str;
    /// Dimensionality of every vector this source produces
    fn dimension(&self) -> usize;
    /// Produce the vector for one text
    fn embed(&self, text: &str, rng: &mut dyn RngCore) -> Vec<f64>;

    fn embed_batch(&self, texts: &[&str], rng: &mut dyn RngCore) -> Vec<Vec<f64>> {
        texts.iter().map(|text| self.embed(text, rng)).collect()
    }
}

/// Placeholder embedder returning uniform random vectors regardless of input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomVectorSource {
    dimension: usize,
}

impl RandomVectorSource {
    #[inline]
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl Default for RandomVectorSource {
    #[inline]
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

impl VectorSource for RandomVectorSource {
    #[inline]
    fn name(&self) -> &str {
        "random"
    }

    #[inline]
    fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    fn embed(&self, _text: &str, rng: &mut dyn RngCore) -> Vec<f64> {
        generate_vector(rng, self.dimension)
    }
}
