//! # mdconvert-core
//!
//! Core library for the mdconvert document converter.
//!
//! This crate parses Markdown documents: it lifts the front-matter header
//! into [`DocumentMetadata`], classifies fenced code, diagram and ASCII-art
//! blocks, and converts the body to HTML for the output generators.

pub mod blocks;
pub mod config;
pub mod frontmatter;
pub mod heuristics;
pub mod line_index;
pub mod markdown;
pub mod models;
pub mod parser;
pub mod slug;

pub use blocks::{extract_ascii_blocks, extract_code_blocks, extract_diagram_blocks};
pub use config::{AsciiMode, Config, ImageFormat, OutputFormat, StyleName};
pub use frontmatter::{extract_metadata, parse_front_matter, strip_front_matter, FrontmatterError};
pub use heuristics::{connector_count, connector_count_with, is_ascii_art, is_diagram_like};
pub use line_index::LineIndex;
pub use markdown::{html_escape, BlockEmbedder, MarkdownConverter};
pub use models::{AsciiBlock, CodeBlock, DiagramBlock, DiagramKind, DocumentMetadata, ParsedDocument};
pub use parser::MarkdownParser;
pub use slug::slugify;
