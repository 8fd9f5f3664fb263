//! RAG pipeline
//!
//! Ties chunking, vector generation, ranking and response synthesis together
//! behind one engine that owns the configuration, the vector source and the
//! single randomness source every step draws from.

#[cfg(test)]
mod tests;

pub mod projection;
pub mod sample;

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::chunking::{Chunk, ChunkStrategy, ChunkingConfig, chunk_text};
use crate::config::{Config, RetrievalConfig};
use crate::embeddings::{RandomVectorSource, VectorSource};
use crate::retrieval::{ScoredChunk, rank, synthesize};
use crate::{RagError, Result};

pub use self::projection::{EmbeddingPoint, project_points};
pub use self::sample::{SAMPLE_QUERIES, SAMPLE_TEXT};

/// A question together with the vector it was given
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub text: String,
    pub vector: Vec<f64>,
}

/// One answered question: what was asked, what came back, and why
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub query: String,
    pub response: String,
    pub retrieved: Vec<ScoredChunk>,
    pub created_at: DateTime<Utc>,
}

/// Append-only history of a session, owned by the caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    entries: Vec<ConversationEntry>,
}

impl Conversation {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, entry: ConversationEntry) {
        self.entries.push(entry);
    }

    #[inline]
    pub fn entries(&self) -> &[ConversationEntry] {
        &self.entries
    }

    #[inline]
    pub fn last(&self) -> Option<&ConversationEntry> {
        self.entries.last()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct RagEngine {
    chunking: ChunkingConfig,
    retrieval: RetrievalConfig,
    source: Box<dyn VectorSource>,
    rng: StdRng,
}

impl RagEngine {
    #[inline]
    pub fn new(
        chunking: ChunkingConfig,
        retrieval: RetrievalConfig,
        source: Box<dyn VectorSource>,
        rng: StdRng,
    ) -> Self {
        Self {
            chunking,
            retrieval,
            source,
            rng,
        }
    }

    /// Random vectors of the configured dimension, seeded when a seed is set
    #[inline]
    pub fn from_config(config: &Config) -> Self {
        let rng = match config.retrieval.seed {
            Some(seed) => {
                debug!("Using fixed seed {}", seed);
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_entropy(),
        };

        Self::new(
            config.chunking.clone(),
            config.retrieval.clone(),
            Box::new(RandomVectorSource::new(config.retrieval.dimension)),
            rng,
        )
    }

    #[inline]
    pub fn chunking_config(&self) -> &ChunkingConfig {
        &self.chunking
    }

    #[inline]
    pub fn retrieval_config(&self) -> &RetrievalConfig {
        &self.retrieval
    }

    /// Chunk a document from scratch; every call produces fresh vectors
    #[inline]
    pub fn chunk(&mut self, text: &str, strategy: ChunkStrategy) -> Vec<Chunk> {
        let chunks = chunk_text(
            text,
            strategy,
            &self.chunking,
            self.source.as_ref(),
            &mut self.rng,
        );
        info!("Created {} chunks using the {} strategy", chunks.len(), strategy);
        chunks
    }

    #[inline]
    pub fn embed_query(&mut self, text: &str) -> Query {
        Query {
            text: text.to_string(),
            vector: self.source.embed(text, &mut self.rng),
        }
    }

    /// Embed a query and score it against every chunk
    #[inline]
    pub fn score_all(&mut self, text: &str, chunks: &[Chunk]) -> (Query, Vec<ScoredChunk>) {
        let query = self.embed_query(text);
        let scored = rank(&query.vector, chunks, None);
        (query, scored)
    }

    /// Answer a question from `chunks` using the top-k most similar ones
    #[inline]
    pub fn ask(&mut self, query: &str, chunks: &[Chunk]) -> Result<ConversationEntry> {
        if query.trim().is_empty() {
            return Err(RagError::EmptyQuery);
        }

        let embedded = self.embed_query(query);
        let retrieved = rank(&embedded.vector, chunks, Some(self.retrieval.top_k));
        if retrieved.is_empty() {
            return Err(RagError::NoRetrievedChunks);
        }

        let response = synthesize(query, &retrieved)?;
        debug!(
            "Answered '{}' from {} chunks (best similarity {:.3})",
            query,
            retrieved.len(),
            retrieved[0].similarity
        );

        Ok(ConversationEntry {
            query: query.to_string(),
            response,
            retrieved,
            created_at: Utc::now(),
        })
    }
}
