
pub mod response;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chunking::Chunk;
use crate::embeddings::cosine_similarity;

pub use self::response::{RESPONSE_EXCERPT_CHARS, synthesize};

/// A chunk paired with its similarity to a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    /// Cosine similarity in [-1, 1]
    pub similarity: f64,
}

impl ScoredChunk {
    /// Similarity as a percentage rounded to `decimals` places
    #[inline]
    pub fn percent(&self, decimals: usize) -> String {
        format!("{:.*}%", decimals, self.similarity * 100.0)
    }
}

/// Score chunks against a query vector and order them from most to least similar.
///
/// Chunks without a vector, with a different dimensionality, or whose score is
/// undefined are left out. Equal scores keep their input order. `top_k`
/// truncates the result when given.
#[inline]
pub fn rank(query_vector: &[f64], chunks: &[Chunk], top_k: Option<usize>) -> Vec<ScoredChunk> {
    let mut scored = chunks
        .iter()
        .filter_map(|chunk| {
            let vector = chunk.vector.as_deref()?;
            if vector.len() != query_vector.len() {
                return None;
            }
            let similarity = cosine_similarity(query_vector, vector);
            (!similarity.is_nan()).then(|| ScoredChunk {
                chunk: chunk.clone(),
                similarity,
            })
        })
        .collect::<Vec<_>>();

    let eligible = scored.len();

    // sort_by is stable, so ties stay in document order
    scored.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    if let Some(k) = top_k {
        scored.truncate(k);
    }

    debug!(
        "Ranked {} of {} chunks against query, returning {}",
        eligible,
        chunks.len(),
        scored.len()
    );

    scored
}
