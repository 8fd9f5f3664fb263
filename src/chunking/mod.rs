
pub mod overlap;

use fancy_regex::Regex;
use itertools::Itertools;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

use crate::embeddings::VectorSource;

pub use self::overlap::{Overlap, find_overlap};

static SENTENCE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^.!?]+[.!?]+").expect("valid regex"));

static PARAGRAPH_SEPARATOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t\r]*\n").expect("valid regex"));

/// Separator placed between paragraphs that share a chunk
const PARAGRAPH_JOINER: &str = "\n\n";

/// Bounds for the simulated topic length of the semantic strategy, in sentences
const MIN_TOPIC_SENTENCES: usize = 2;
const MAX_TOPIC_SENTENCES: usize = 4;

/// Sliding windows carry one word for every this many units of `overlap_size`
const SLIDING_WINDOW_DIVISOR: usize = 5;

/// One contiguous, possibly overlapping, unit of source text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Stable identifier, `chunk-<index>`
    pub id: String,
    /// Position of this chunk within the document
    pub index: usize,
    /// Trimmed, never empty
    pub text: String,
    /// Assigned after segmentation by a [`VectorSource`]
    pub vector: Option<Vec<f64>>,
    /// Word run shared with the previous chunk, if any
    pub overlap: Option<Overlap>,
}

impl Chunk {
    #[inline]
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            id: format!("chunk-{}", index),
            index,
            text: text.into(),
            vector: None,
            overlap: None,
        }
    }

    #[inline]
    pub fn with_vector(mut self, vector: Vec<f64>) -> Self {
        self.vector = Some(vector);
        self
    }

    #[inline]
    pub fn with_overlap(mut self, overlap: Option<Overlap>) -> Self {
        self.overlap = overlap;
        self
    }

    /// Number of characters in the chunk text
    #[inline]
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Configuration for text chunking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Target chunk length in characters
    pub chunk_size: usize,
    /// Words carried from one chunk into the next by the overlapping strategies
    pub overlap_size: usize,
    /// Longest word run considered when detecting overlap between chunks
    pub max_overlap_words: usize,
    /// Whether the sentence strategy seeds each chunk with the tail of the previous one
    pub carry_sentence_overlap: bool,
}

impl Default for ChunkingConfig {
    #[inline]
    fn default() -> Self {
        Self {
            chunk_size: 200,
            overlap_size: 30,
            max_overlap_words: 20,
            carry_sentence_overlap: false,
        }
    }
}

/// The closed set of chunking algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChunkStrategy {
    FixedSize,
    #[default]
    Sentence,
    Paragraph,
    SlidingWindow,
    Semantic,
}

/// Every strategy shares this signature so they can be picked from a table
type Splitter = fn(&str, &ChunkingConfig, &mut dyn RngCore) -> Vec<Chunk>;

impl ChunkStrategy {
    pub const ALL: [Self; 5] = [
        Self::FixedSize,
        Self::Sentence,
        Self::Paragraph,
        Self::SlidingWindow,
        Self::Semantic,
    ];

    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FixedSize => "fixed-size",
            Self::Sentence => "sentence",
            Self::Paragraph => "paragraph",
            Self::SlidingWindow => "sliding-window",
            Self::Semantic => "semantic",
        }
    }

    /// One-line explanation shown next to the strategy name
    #[inline]
    pub fn description(self) -> &'static str {
        match self {
            Self::FixedSize => "Equal-length character slices, ignoring sentence boundaries",
            Self::Sentence => "Whole sentences packed up to the chunk size",
            Self::Paragraph => "Whole paragraphs packed up to the chunk size",
            Self::SlidingWindow => "Sentences with a few words repeated across boundaries",
            Self::Semantic => "Sentences grouped into simulated topics of 2-4 sentences",
        }
    }

    fn splitter(self) -> Splitter {
        match self {
            Self::FixedSize => split_fixed_size,
            Self::Sentence => split_sentence,
            Self::Paragraph => split_paragraph,
            Self::SlidingWindow => split_sliding_window,
            Self::Semantic => split_semantic,
        }
    }
}

impl fmt::Display for ChunkStrategy {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown chunking strategy: {0} (expected fixed-size, sentence, paragraph, sliding-window or semantic)")]
pub struct ParseStrategyError(String);

impl FromStr for ChunkStrategy {
    type Err = ParseStrategyError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseStrategyError(s.to_string()))
    }
}

/// Segment text into ordered chunks without assigning vectors.
///
/// `rng` is only consumed by [`ChunkStrategy::Semantic`].
#[inline]
pub fn split_text(
    text: &str,
    strategy: ChunkStrategy,
    config: &ChunkingConfig,
    rng: &mut dyn RngCore,
) -> Vec<Chunk> {
    (strategy.splitter())(text, config, rng)
}

/// Segment text with the chosen strategy and give every chunk a fresh vector
#[inline]
pub fn chunk_text(
    text: &str,
    strategy: ChunkStrategy,
    config: &ChunkingConfig,
    source: &dyn VectorSource,
    rng: &mut dyn RngCore,
) -> Vec<Chunk> {
    let mut chunks = split_text(text, strategy, config, rng);
    for chunk in &mut chunks {
        chunk.vector = Some(source.embed(&chunk.text, rng));
    }

    debug!(
        "Chunked {} chars with '{}' into {} chunks (avg {} chars, {} with overlap, vectors from {})",
        text.chars().count(),
        strategy,
        chunks.len(),
        chunks.iter().map(Chunk::char_count).sum::<usize>() / chunks.len().max(1),
        chunks.iter().filter(|c| c.overlap.is_some()).count(),
        source.name()
    );

    chunks
}

/// Collects flushed buffers into numbered chunks
struct ChunkBuilder<'a> {
    config: &'a ChunkingConfig,
    detect_overlap: bool,
    chunks: Vec<Chunk>,
}

impl<'a> ChunkBuilder<'a> {
    fn new(config: &'a ChunkingConfig, detect_overlap: bool) -> Self {
        Self {
            config,
            detect_overlap,
            chunks: Vec::new(),
        }
    }

    /// Trim and record a buffer; blank buffers are dropped
    fn push(&mut self, buffer: &str) {
        let text = buffer.trim();
        if text.is_empty() {
            return;
        }

        let overlap = if self.detect_overlap {
            self.chunks
                .last()
                .and_then(|prev| find_overlap(&prev.text, text, self.config.max_overlap_words))
        } else {
            None
        };

        let chunk = Chunk::new(self.chunks.len(), text).with_overlap(overlap);
        self.chunks.push(chunk);
    }

    fn finish(self) -> Vec<Chunk> {
        self.chunks
    }
}

/// How many trailing words of a flushed chunk seed the next buffer
#[derive(Debug, Clone, Copy)]
enum CarryOver {
    Disabled,
    /// Carry at most this many words, and never more than half the chunk
    UpTo(usize),
}

impl CarryOver {
    fn seed(self, flushed: &str) -> String {
        let Self::UpTo(limit) = self else {
            return String::new();
        };

        let words = flushed.split_whitespace().collect::<Vec<_>>();
        let count = limit.min(words.len() / 2);
        words[words.len() - count..].join(" ")
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Split text into sentences ending in `.`, `!` or `?`.
///
/// Units are contiguous so nothing is lost: leading punctuation joins the first
/// sentence and unterminated trailing text becomes a final unit. Text with no
/// terminator at all is returned whole.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut consumed = 0;

    for found in SENTENCE_REGEX.find_iter(text).flatten() {
        if let Some(sentence) = text.get(consumed..found.end()) {
            sentences.push(sentence);
        }
        consumed = found.end();
    }

    if let Some(rest) = text.get(consumed..) {
        if !rest.trim().is_empty() {
            sentences.push(rest);
        }
    }

    sentences
}

/// Split text on blank lines, dropping empty blocks
fn split_paragraphs(text: &str) -> Vec<&str> {
    let mut paragraphs = Vec::new();
    let mut start = 0;

    for separator in PARAGRAPH_SEPARATOR_REGEX.find_iter(text).flatten() {
        if let Some(paragraph) = text.get(start..separator.start()) {
            paragraphs.push(paragraph);
        }
        start = separator.end();
    }
    if let Some(rest) = text.get(start..) {
        paragraphs.push(rest);
    }

    paragraphs
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

fn split_fixed_size(text: &str, config: &ChunkingConfig, _rng: &mut dyn RngCore) -> Vec<Chunk> {
    let mut builder = ChunkBuilder::new(config, false);

    for slice in &text.chars().chunks(config.chunk_size.max(1)) {
        builder.push(&slice.collect::<String>());
    }

    builder.finish()
}

fn split_sentence(text: &str, config: &ChunkingConfig, _rng: &mut dyn RngCore) -> Vec<Chunk> {
    let carry = if config.carry_sentence_overlap {
        CarryOver::UpTo(config.overlap_size)
    } else {
        CarryOver::Disabled
    };
    pack_sentences(text, config, carry)
}

fn split_sliding_window(
    text: &str,
    config: &ChunkingConfig,
    _rng: &mut dyn RngCore,
) -> Vec<Chunk> {
    pack_sentences(
        text,
        config,
        CarryOver::UpTo(config.overlap_size / SLIDING_WINDOW_DIVISOR),
    )
}

/// Greedily pack sentences into chunks of at most `chunk_size` characters
fn pack_sentences(text: &str, config: &ChunkingConfig, carry: CarryOver) -> Vec<Chunk> {
    let mut builder = ChunkBuilder::new(config, true);
    let mut buffer = String::new();

    for sentence in split_sentences(text) {
        if !buffer.is_empty() && char_len(&buffer) + char_len(sentence) > config.chunk_size {
            builder.push(&buffer);
            buffer = carry.seed(&buffer);
            if !buffer.is_empty() {
                buffer.push(' ');
                buffer.push_str(sentence.trim_start());
                continue;
            }
        }
        buffer.push_str(sentence);
    }
    builder.push(&buffer);

    builder.finish()
}

fn split_paragraph(text: &str, config: &ChunkingConfig, rng: &mut dyn RngCore) -> Vec<Chunk> {
    if !PARAGRAPH_SEPARATOR_REGEX.is_match(text).unwrap_or(false) {
        debug!("No paragraph separators found, falling back to sentence chunking");
        return split_sentence(text, config, rng);
    }

    let mut builder = ChunkBuilder::new(config, true);
    let mut buffer = String::new();

    for paragraph in split_paragraphs(text) {
        if !buffer.is_empty()
            && char_len(&buffer) + PARAGRAPH_JOINER.len() + char_len(paragraph) > config.chunk_size
        {
            builder.push(&buffer);
            buffer.clear();
        }
        if !buffer.is_empty() {
            buffer.push_str(PARAGRAPH_JOINER);
        }
        buffer.push_str(paragraph);
    }
    builder.push(&buffer);

    builder.finish()
}

/// Group sentences into pretend topics of a random length.
///
/// The random group size only imitates what a real semantic chunker would
/// decide from content; it carries no signal about the text.
fn split_semantic(text: &str, config: &ChunkingConfig, rng: &mut dyn RngCore) -> Vec<Chunk> {
    let sentences = split_sentences(text);
    let last = sentences.len().saturating_sub(1);

    let mut builder = ChunkBuilder::new(config, true);
    let mut buffer = String::new();
    let mut in_topic = 0;
    let mut topic_len = 0;

    for (i, sentence) in sentences.into_iter().enumerate() {
        if !buffer.is_empty() && char_len(&buffer) + char_len(sentence) > config.chunk_size {
            builder.push(&buffer);
            buffer.clear();
            in_topic = 0;
        }
        if in_topic == 0 {
            topic_len = rng.gen_range(MIN_TOPIC_SENTENCES..=MAX_TOPIC_SENTENCES);
        }

        buffer.push_str(sentence);
        in_topic += 1;

        if in_topic >= topic_len || i == last {
            builder.push(&buffer);
            buffer.clear();
            in_topic = 0;
        }
    }

    builder.finish()
}
