// Configuration management module
// TOML-backed settings for chunking and retrieval, plus the interactive editor

pub mod interactive;
pub mod settings;


pub use interactive::{run_interactive_config, show_config};
pub use settings::{Config, ConfigError, RetrievalConfig};
