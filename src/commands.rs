
use anyhow::{Context, Result};
use console::style;
use dialoguer::Input;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::RagError;
use crate::chunking::{Chunk, ChunkStrategy};
use crate::config::{Config, ConfigError};
use crate::pipeline::{
    Conversation, ConversationEntry, RagEngine, SAMPLE_QUERIES, SAMPLE_TEXT, project_points,
};

/// Where a document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    Sample,
    Stdin,
    File(PathBuf),
}

impl DocumentSource {
    /// `--sample` wins; `-` means stdin; no path at all falls back to the sample
    #[inline]
    pub fn from_args(file: Option<PathBuf>, sample: bool) -> Self {
        match file {
            _ if sample => Self::Sample,
            Some(path) if path.as_os_str() == "-" => Self::Stdin,
            Some(path) => Self::File(path),
            None => Self::Sample,
        }
    }

    /// Read the document as UTF-8 text
    #[inline]
    pub fn read(&self) -> Result<String> {
        match self {
            Self::Sample => Ok(SAMPLE_TEXT.to_string()),
            Self::Stdin => {
                let mut text = String::new();
                std::io::stdin()
                    .read_to_string(&mut text)
                    .context("Failed to read document from stdin")?;
                Ok(text)
            }
            Self::File(path) => {
                ensure_plain_text(path)?;
                std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read document: {}", path.display()))
            }
        }
    }
}

/// Only plain-text documents are accepted
fn ensure_plain_text(path: &Path) -> Result<()> {
    match path.extension().and_then(|ext| ext.to_str()) {
        None => Ok(()),
        Some(ext) if ext.eq_ignore_ascii_case("txt") || ext.eq_ignore_ascii_case("text") => Ok(()),
        Some(ext) => Err(RagError::UnsupportedInput(format!(
            "{} (expected a .txt file, got .{})",
            path.display(),
            ext
        ))
        .into()),
    }
}

/// Command-line overrides layered on top of the saved configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub strategy: Option<ChunkStrategy>,
    pub chunk_size: Option<usize>,
    pub overlap_size: Option<usize>,
    pub carry_overlap: bool,
    pub top_k: Option<usize>,
    pub seed: Option<u64>,
}

impl Overrides {
    #[inline]
    pub fn apply(&self, config: &mut Config) -> Result<(), ConfigError> {
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if let Some(chunk_size) = self.chunk_size {
            config.set_chunk_size(chunk_size)?;
        }
        if let Some(overlap_size) = self.overlap_size {
            config.set_overlap_size(overlap_size)?;
        }
        if self.carry_overlap {
            config.chunking.carry_sentence_overlap = true;
        }
        if let Some(top_k) = self.top_k {
            config.retrieval.set_top_k(top_k)?;
        }
        if self.seed.is_some() {
            config.retrieval.seed = self.seed;
        }
        Ok(())
    }
}

/// Load the saved configuration and apply overrides
#[inline]
pub fn resolve_config(overrides: &Overrides) -> Result<Config> {
    let mut config = Config::load_default().context("Failed to load configuration")?;
    overrides
        .apply(&mut config)
        .map_err(|e| RagError::Config(e.to_string()))?;
    Ok(config)
}

/// Chunk a document and print the chunks with their overlap and vectors
#[inline]
pub fn chunk_document(source: &DocumentSource, config: &Config, json: bool) -> Result<()> {
    let text = source.read()?;
    let mut engine = RagEngine::from_config(config);
    let chunks = engine.chunk(&text, config.strategy);

    if json {
        println!("{}", serde_json::to_string_pretty(&chunks)?);
        return Ok(());
    }

    print_chunks(&chunks, config.strategy);
    Ok(())
}

/// Chunk a document, then answer each query in turn
#[inline]
pub fn ask_questions(
    source: &DocumentSource,
    queries: &[String],
    config: &Config,
    json: bool,
) -> Result<()> {
    let text = source.read()?;
    let mut engine = RagEngine::from_config(config);
    let chunks = engine.chunk(&text, config.strategy);

    if chunks.is_empty() {
        warn!("Document produced no chunks; nothing to retrieve from");
        println!("The document is empty, so there is nothing to retrieve.");
        return Ok(());
    }

    let queries = if queries.is_empty() {
        SAMPLE_QUERIES.iter().map(ToString::to_string).collect()
    } else {
        queries.to_vec()
    };

    let mut conversation = Conversation::new();
    for query in &queries {
        match engine.ask(query, &chunks) {
            Ok(entry) => conversation.push(entry),
            Err(RagError::EmptyQuery) => warn!("Skipping empty query"),
            Err(e) => return Err(e.into()),
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&conversation)?);
        return Ok(());
    }

    for entry in conversation.entries() {
        print_entry(entry);
    }
    Ok(())
}

/// Print embedding-space coordinates for every chunk and, optionally, a query
#[inline]
pub fn show_points(
    source: &DocumentSource,
    query: Option<&str>,
    config: &Config,
    json: bool,
) -> Result<()> {
    let text = source.read()?;
    let mut engine = RagEngine::from_config(config);
    let chunks = engine.chunk(&text, config.strategy);

    let scored_query = query.map(|q| engine.score_all(q, &chunks));
    let points = project_points(&chunks, scored_query.as_ref().map(|(q, _)| q));

    if json {
        println!("{}", serde_json::to_string_pretty(&points)?);
        return Ok(());
    }

    println!("{}", style("Embedding Space").bold().cyan());
    for point in &points {
        let name = if point.is_query {
            style(point.name.as_str()).magenta().bold()
        } else {
            style(point.name.as_str()).cyan()
        };
        println!(
            "  {:<10} x={:>7.3} y={:>7.3} z={:>7.3}",
            name, point.x, point.y, point.z
        );
    }

    if let Some((_, scored)) = scored_query {
        println!();
        println!("{}", style("Similarity Scores").bold().cyan());
        for item in &scored {
            println!(
                "  Chunk {:<3} {:>7}  {}",
                item.chunk.index + 1,
                item.percent(1),
                preview(&item.chunk.text, 60)
            );
        }
    }

    Ok(())
}

/// Interactive question loop over one chunked document; an empty line ends it
#[inline]
pub fn run_chat(source: &DocumentSource, config: &Config) -> Result<()> {
    let text = source.read()?;
    let mut engine = RagEngine::from_config(config);
    let chunks = engine.chunk(&text, config.strategy);

    eprintln!(
        "{}",
        style(format!(
            "💬 {} chunks ready ({} strategy). Ask a question, or press enter to quit.",
            chunks.len(),
            config.strategy
        ))
        .bold()
        .cyan()
    );
    eprintln!("Try: {}", style(SAMPLE_QUERIES.join(" | ")).dim());

    let mut conversation = Conversation::new();
    loop {
        let query: String = Input::new()
            .with_prompt("Question")
            .allow_empty(true)
            .interact_text()?;

        if query.trim().is_empty() {
            break;
        }

        match engine.ask(&query, &chunks) {
            Ok(entry) => {
                print_entry(&entry);
                conversation.push(entry);
            }
            Err(RagError::NoRetrievedChunks) => {
                eprintln!("{}", style("No chunks to retrieve from.").yellow());
            }
            Err(e) => return Err(e.into()),
        }
    }

    info!("Chat ended after {} questions", conversation.len());
    Ok(())
}

fn print_chunks(chunks: &[Chunk], strategy: ChunkStrategy) {
    if chunks.is_empty() {
        println!("No chunks generated.");
        return;
    }

    println!(
        "{} ({} chunks, {} strategy)",
        style("Generated Chunks").bold().cyan(),
        chunks.len(),
        strategy
    );
    println!();

    for chunk in chunks {
        println!(
            "{} {} ({} chars)",
            style(format!("#{}", chunk.index + 1)).bold(),
            style(&chunk.id).dim(),
            chunk.char_count()
        );
        println!("   {}", chunk.text);
        if let Some(overlap) = &chunk.overlap {
            println!("   {} \"{}\"", style("Overlap:").yellow(), overlap.start);
        }
        if let Some(vector) = &chunk.vector {
            let formatted = vector
                .iter()
                .map(|v| format!("{:.3}", v))
                .collect::<Vec<_>>()
                .join(", ");
            println!("   {} [{}]", style("Vector:").dim(), formatted);
        }
        println!();
    }
}

fn print_entry(entry: &ConversationEntry) {
    println!("{} {}", style("Q:").bold().cyan(), entry.query);
    for (rank, item) in entry.retrieved.iter().enumerate() {
        println!(
            "   {} {} match  {}",
            style(format!("Rank {}", rank + 1)).bold(),
            item.percent(0),
            preview(&item.chunk.text, 70)
        );
    }
    println!("{} {}", style("A:").bold().green(), entry.response);
    println!();
}

/// First `max_chars` characters of `text`, with an ellipsis when cut
fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head = chars.by_ref().take(max_chars).collect::<String>();
    if chars.next().is_some() {
        format!("{}…", head)
    } else {
        head
    }
}
