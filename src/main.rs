use clap::{Args, Parser, Subcommand};
use ragviz::Result;
use ragviz::chunking::ChunkStrategy;
use ragviz::commands::{
    DocumentSource, Overrides, ask_questions, chunk_document, resolve_config, run_chat,
    show_points,
};
use ragviz::config::{run_interactive_config, show_config};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ragviz")]
#[command(about = "Walk through the chunk, embed and retrieve stages of a RAG pipeline")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct DocumentArgs {
    /// Plain-text document to process, or "-" for stdin
    file: Option<PathBuf>,
    /// Use the built-in sample document
    #[arg(long)]
    sample: bool,
    /// Chunking strategy: fixed-size, sentence, paragraph, sliding-window or semantic
    #[arg(long, short)]
    strategy: Option<ChunkStrategy>,
    /// Target chunk size in characters
    #[arg(long)]
    chunk_size: Option<usize>,
    /// Words carried between chunks by the overlapping strategies
    #[arg(long)]
    overlap_size: Option<usize>,
    /// Seed the sentence strategy with the tail of the previous chunk
    #[arg(long)]
    carry_overlap: bool,
    /// Seed for reproducible vectors
    #[arg(long)]
    seed: Option<u64>,
    /// Print JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

impl DocumentArgs {
    fn source(&self) -> DocumentSource {
        DocumentSource::from_args(self.file.clone(), self.sample)
    }

    fn overrides(&self, top_k: Option<usize>) -> Overrides {
        Overrides {
            strategy: self.strategy,
            chunk_size: self.chunk_size,
            overlap_size: self.overlap_size,
            carry_overlap: self.carry_overlap,
            top_k,
            seed: self.seed,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Configure chunking and retrieval defaults
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
    /// Split a document into chunks and show their vectors and overlap
    Chunk {
        #[command(flatten)]
        document: DocumentArgs,
    },
    /// Answer questions from the most similar chunks of a document
    Ask {
        #[command(flatten)]
        document: DocumentArgs,
        /// Question to answer; repeat for a multi-turn conversation
        #[arg(long = "query", short)]
        queries: Vec<String>,
        /// Number of chunks retrieved per question
        #[arg(long)]
        top_k: Option<usize>,
    },
    /// Show chunk and query positions in embedding space
    Points {
        #[command(flatten)]
        document: DocumentArgs,
        /// Query to place alongside the chunks
        #[arg(long, short)]
        query: Option<String>,
    },
    /// Ask questions interactively about a document
    Chat {
        #[command(flatten)]
        document: DocumentArgs,
        /// Number of chunks retrieved per question
        #[arg(long)]
        top_k: Option<usize>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config { show } => {
            if show {
                show_config()?;
            } else {
                run_interactive_config()?;
            }
        }
        Commands::Chunk { document } => {
            let config = resolve_config(&document.overrides(None))?;
            chunk_document(&document.source(), &config, document.json)?;
        }
        Commands::Ask {
            document,
            queries,
            top_k,
        } => {
            let config = resolve_config(&document.overrides(top_k))?;
            ask_questions(&document.source(), &queries, &config, document.json)?;
        }
        Commands::Points { document, query } => {
            let config = resolve_config(&document.overrides(None))?;
            show_points(
                &document.source(),
                query.as_deref(),
                &config,
                document.json,
            )?;
        }
        Commands::Chat { document, top_k } => {
            let config = resolve_config(&document.overrides(top_k))?;
            run_chat(&document.source(), &config)?;
        }
    }

    Ok(())
}
