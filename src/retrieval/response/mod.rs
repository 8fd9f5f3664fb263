
use crate::retrieval::ScoredChunk;
use crate::{RagError, Result};

/// How much of the best chunk is quoted in a response, in characters
pub const RESPONSE_EXCERPT_CHARS: usize = 150;

/// Build a canned answer around the best retrieved chunk.
///
/// Nothing is generated: the wording only changes depending on whether the
/// query asks "how". Fails with [`RagError::NoRetrievedChunks`] when
/// `top_chunks` is empty.
#[inline]
pub fn synthesize(query: &str, top_chunks: &[ScoredChunk]) -> Result<String> {
    let best = top_chunks.first().ok_or(RagError::NoRetrievedChunks)?;

    let lead = if query.to_lowercase().contains("how") {
        "the process involves"
    } else {
        "we can understand that"
    };
    let excerpt = best
        .chunk
        .text
        .chars()
        .take(RESPONSE_EXCERPT_CHARS)
        .collect::<String>();

    Ok(format!(
        "Based on the retrieved context, {} the information from the most relevant chunks. {}... This demonstrates the key concepts related to your query.",
        lead, excerpt
    ))
}
