
use anyhow::{Context, Result};
use console::style;
use dialoguer::{Confirm, Input, Select};

use super::{Config, RetrievalConfig};
use crate::chunking::ChunkStrategy;

#[inline]
pub fn run_interactive_config() -> Result<()> {
    eprintln!("{}", style("🔧 RAG Visualizer Configuration Setup").bold().cyan());
    eprintln!();

    let mut config = load_existing_config()?;

    eprintln!("{}", style("Chunking").bold().yellow());
    eprintln!("Choose how documents are split before they are embedded.");
    eprintln!();

    configure_chunking(&mut config)?;

    eprintln!();
    eprintln!("{}", style("Retrieval").bold().yellow());
    eprintln!("Choose how many chunks answer a question and how vectors are generated.");
    eprintln!();

    configure_retrieval(&mut config.retrieval)?;

    eprintln!();
    if Confirm::new()
        .with_prompt("Save configuration?")
        .default(true)
        .interact()?
    {
        config.save().context("Failed to save configuration")?;
        eprintln!("{}", style("✓ Configuration saved successfully!").green());
        eprintln!(
            "Configuration saved to: {}",
            style(config.config_file_path().display()).cyan()
        );
    } else {
        eprintln!("Configuration not saved.");
    }

    Ok(())
}

#[inline]
pub fn show_config() -> Result<()> {
    let config = Config::load_default().context("Failed to load configuration")?;

    eprintln!("{}", style("📋 Current Configuration").bold().cyan());
    eprintln!();

    eprintln!("{}", style("Chunking Settings:").bold().yellow());
    eprintln!(
        "  Strategy: {} ({})",
        style(config.strategy).cyan(),
        config.strategy.description()
    );
    eprintln!("  Chunk Size: {}", style(config.chunking.chunk_size).cyan());
    eprintln!("  Overlap Size: {}", style(config.chunking.overlap_size).cyan());
    eprintln!(
        "  Max Overlap Words: {}",
        style(config.chunking.max_overlap_words).cyan()
    );
    eprintln!(
        "  Carry Sentence Overlap: {}",
        style(config.chunking.carry_sentence_overlap).cyan()
    );

    eprintln!();
    eprintln!("{}", style("Retrieval Settings:").bold().yellow());
    eprintln!("  Top K: {}", style(config.retrieval.top_k).cyan());
    eprintln!("  Vector Dimension: {}", style(config.retrieval.dimension).cyan());
    match config.retrieval.seed {
        Some(seed) => eprintln!("  Seed: {}", style(seed).cyan()),
        None => eprintln!("  Seed: {}", style("random").dim()),
    }

    eprintln!();
    eprintln!(
        "Config file: {}",
        style(config.config_file_path().display()).dim()
    );

    Ok(())
}

fn load_existing_config() -> Result<Config> {
    Config::load_default().map_or_else(
        |_| {
            eprintln!(
                "{}",
                style("No existing configuration found. Using defaults.").yellow()
            );
            Ok(Config::default())
        },
        |config| {
            eprintln!("{}", style("Found existing configuration.").green());
            Ok(config)
        },
    )
}

fn configure_chunking(config: &mut Config) -> Result<()> {
    let labels = ChunkStrategy::ALL
        .iter()
        .map(|s| format!("{:<15} {}", s.as_str(), s.description()))
        .collect::<Vec<_>>();
    let default_index = ChunkStrategy::ALL
        .iter()
        .position(|&s| s == config.strategy)
        .unwrap_or(0);

    let strategy_index = Select::new()
        .with_prompt("Default chunking strategy")
        .default(default_index)
        .items(&labels)
        .interact()?;

    let chunk_size: usize = Input::new()
        .with_prompt("Chunk size (characters)")
        .default(config.chunking.chunk_size)
        .validate_with(|input: &usize| -> Result<(), &str> {
            if (20..=4096).contains(input) {
                Ok(())
            } else {
                Err("Chunk size must be between 20 and 4096")
            }
        })
        .interact_text()?;

    let overlap_size: usize = Input::new()
        .with_prompt("Overlap size (words carried between chunks)")
        .default(config.chunking.overlap_size)
        .validate_with(|input: &usize| -> Result<(), &str> {
            if *input > 512 {
                Err("Overlap size must be 512 or less")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    let carry_sentence_overlap = Confirm::new()
        .with_prompt("Carry words between chunks in the sentence strategy?")
        .default(config.chunking.carry_sentence_overlap)
        .interact()?;

    config.strategy = ChunkStrategy::ALL[strategy_index];
    config.set_chunk_size(chunk_size)?;
    config.set_overlap_size(overlap_size)?;
    config.chunking.carry_sentence_overlap = carry_sentence_overlap;

    Ok(())
}

fn configure_retrieval(retrieval: &mut RetrievalConfig) -> Result<()> {
    let top_k: usize = Input::new()
        .with_prompt("Chunks retrieved per question")
        .default(retrieval.top_k)
        .validate_with(|input: &usize| -> Result<(), &str> {
            if (1..=50).contains(input) {
                Ok(())
            } else {
                Err("Top K must be between 1 and 50")
            }
        })
        .interact_text()?;

    let seed: String = Input::new()
        .with_prompt("Random seed (leave empty for fresh vectors every run)")
        .default(retrieval.seed.map(|s| s.to_string()).unwrap_or_default())
        .allow_empty(true)
        .validate_with(|input: &String| -> Result<(), &str> {
            parse_seed(input).map(|_| ()).ok_or("Seed must be a non-negative integer")
        })
        .interact_text()?;

    retrieval.set_top_k(top_k)?;
    retrieval.seed = parse_seed(&seed).flatten();

    Ok(())
}

/// `Some(None)` for an empty answer, `None` when the answer is not a number
fn parse_seed(input: &str) -> Option<Option<u64>> {
    let input = input.trim();
    if input.is_empty() {
        Some(None)
    } else {
        input.parse().ok().map(Some)
    }
}
