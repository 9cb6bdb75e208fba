//! Toc command implementation.

use super::{load_config, parser_for, read_document};
use anyhow::Result;
use std::path::Path;

pub fn print_toc(config_path: &Path, input: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let content = read_document(input)?;

    match parser_for(&config).table_of_contents(&content) {
        Some(toc) => println!("{}", toc),
        None => tracing::info!("{:?} has no headings", input),
    }

    Ok(())
}
