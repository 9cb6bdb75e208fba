//! Front-matter extraction from markdown documents.
//!
//! A header is recognised only at the very start of the document: a line
//! holding `---`, a YAML mapping, and a closing `---` line.

use crate::models::DocumentMetadata;
use regex::Regex;
use serde_yaml::Value;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontmatterError {
    #[error("Invalid YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Front matter is not a key-value mapping")]
    NotAMapping,
}

static FRONTMATTER_REGEX: OnceLock<Regex> = OnceLock::new();

fn frontmatter_regex() -> &'static Regex {
    FRONTMATTER_REGEX.get_or_init(|| {
        Regex::new(r"(?s)\A---[ \t]*\r?\n(.*?)\r?\n---[ \t]*(?:\r?\n|\z)")
            .expect("front matter pattern is valid")
    })
}

/// Split a document into its raw header body (if any) and the remaining text
pub fn split_front_matter(content: &str) -> (Option<&str>, &str) {
    match frontmatter_regex().captures(content) {
        Some(caps) => {
            let header = caps.get(1).map(|m| m.as_str());
            let end = caps.get(0).map(|m| m.end()).unwrap_or(0);
            (header, &content[end..])
        }
        None => (None, content),
    }
}

/// Parse the front-matter header strictly
///
/// Returns `Ok(None)` when the document has no header, and an error when a
/// header is present but is not a YAML mapping.
///
/// # Example
///
/// ```
/// use mdconvert_core::frontmatter::parse_front_matter;
///
/// let meta = parse_front_matter("---\ntitle: Hello\n---\nBody\n").unwrap().unwrap();
/// assert_eq!(meta.title.as_deref(), Some("Hello"));
/// ```
pub fn parse_front_matter(content: &str) -> Result<Option<DocumentMetadata>, FrontmatterError> {
    let Some(header) = split_front_matter(content).0 else {
        return Ok(None);
    };

    match serde_yaml::from_str::<Value>(header)? {
        Value::Mapping(mapping) => Ok(Some(lift_mapping(mapping))),
        _ => Err(FrontmatterError::NotAMapping),
    }
}

/// Extract document metadata, falling back to empty metadata on any problem
pub fn extract_metadata(content: &str) -> DocumentMetadata {
    match parse_front_matter(content) {
        Ok(Some(meta)) => meta,
        Ok(None) => DocumentMetadata::default(),
        Err(err) => {
            tracing::debug!("Ignoring malformed front matter: {}", err);
            DocumentMetadata::default()
        }
    }
}

/// Remove the front-matter header, returning the body that follows it
pub fn strip_front_matter(content: &str) -> &str {
    split_front_matter(content).1
}

fn lift_mapping(mapping: serde_yaml::Mapping) -> DocumentMetadata {
    let mut meta = DocumentMetadata::default();

    for (key, value) in mapping {
        let Some(key) = key_text(&key) else {
            continue;
        };

        match key.as_str() {
            "title" => meta.title = scalar_text(&value),
            "author" => meta.author = scalar_text(&value),
            "date" => meta.date = scalar_text(&value),
            "order" => meta.order = scalar_number(&value),
            _ => {
                meta.custom.insert(key, value);
            }
        }
    }

    meta
}

fn key_text(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        _ => None,
    }
}

fn scalar_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
