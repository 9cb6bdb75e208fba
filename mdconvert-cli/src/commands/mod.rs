//! CLI command implementations.

pub mod convert;
pub mod inspect;
pub mod serve;
pub mod toc;

pub use convert::{convert_files, ConvertOptions};
pub use inspect::inspect_document;
pub use serve::serve;
pub use toc::print_toc;

use anyhow::{Context, Result};
use mdconvert_core::{Config, MarkdownConverter, MarkdownParser};
use std::fs;
use std::path::Path;

/// Load the config file, falling back to defaults when it is absent
pub fn load_config(config_path: &Path) -> Result<Config> {
    Config::load_or_default(config_path)
        .with_context(|| format!("Failed to load configuration from {:?}", config_path))
}

/// Parser honouring the highlighting settings
pub fn parser_for(config: &Config) -> MarkdownParser {
    MarkdownParser::with_converter(
        MarkdownConverter::new()
            .with_highlighting(config.highlight.enabled)
            .with_theme(config.highlight.theme.clone()),
    )
}

pub fn read_document(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))
}
