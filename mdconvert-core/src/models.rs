//! Value records produced by one parse call.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Metadata lifted from a document's front-matter header
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub order: Option<f64>,

    #[serde(default)]
    pub author: Option<String>,

    #[serde(default)]
    pub date: Option<String>,

    /// Every header key other than the four above, kept verbatim
    #[serde(default)]
    pub custom: BTreeMap<String, serde_yaml::Value>,
}

impl DocumentMetadata {
    /// True when no header was found or nothing could be lifted from it
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.order.is_none()
            && self.author.is_none()
            && self.date.is_none()
            && self.custom.is_empty()
    }

    /// Title for display, falling back to the given placeholder
    pub fn display_title<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.title.as_deref().unwrap_or(fallback)
    }
}

/// A fenced code block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    /// Fence tag, or `"text"` when the fence carries none
    pub language: String,
    pub code: String,
    pub line_start: usize,
    pub line_end: usize,
}

/// Diagram languages with an external renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramKind {
    Mermaid,
    Graphviz,
}

impl DiagramKind {
    /// Map a fence tag to a diagram kind (`dot` and `graphviz` are the same)
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "mermaid" => Some(DiagramKind::Mermaid),
            "dot" | "graphviz" => Some(DiagramKind::Graphviz),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DiagramKind::Mermaid => "mermaid",
            DiagramKind::Graphviz => "graphviz",
        }
    }

    /// Human-readable name used in placeholders
    pub fn label(&self) -> &'static str {
        match self {
            DiagramKind::Mermaid => "Mermaid",
            DiagramKind::Graphviz => "GraphViz",
        }
    }
}

impl fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A fenced diagram block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramBlock {
    #[serde(rename = "type")]
    pub kind: DiagramKind,
    pub content: String,
    pub line_start: usize,
    pub line_end: usize,
}

/// A run of line-drawing text found outside any fence analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsciiBlock {
    pub content: String,
    pub line_start: usize,
    pub line_end: usize,
    /// Advisory: the block reads as a flow diagram rather than a box or table
    pub is_diagram: bool,
}

/// Everything one parse call produces
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub html: String,
    pub metadata: DocumentMetadata,
    pub code_blocks: Vec<CodeBlock>,
    pub diagram_blocks: Vec<DiagramBlock>,
    pub ascii_blocks: Vec<AsciiBlock>,
    pub toc_html: Option<String>,
}
