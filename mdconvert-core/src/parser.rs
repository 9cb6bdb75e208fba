//! Document parsing: front matter, block classification, HTML.

use crate::blocks::{extract_ascii_blocks, extract_code_blocks, extract_diagram_blocks};
use crate::frontmatter::{extract_metadata, strip_front_matter};
use crate::markdown::{BlockEmbedder, MarkdownConverter, NoEmbed};
use crate::models::ParsedDocument;
use std::borrow::Cow;

/// Parser for markdown documents
///
/// Wraps a [`MarkdownConverter`]; each call is independent of the last.
#[derive(Debug, Clone, Default)]
pub struct MarkdownParser {
    converter: MarkdownConverter,
}

impl MarkdownParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_converter(converter: MarkdownConverter) -> Self {
        Self { converter }
    }

    pub fn converter(&self) -> &MarkdownConverter {
        &self.converter
    }

    /// Parse a document
    ///
    /// Metadata comes from the original text. Block line numbers refer to
    /// the body left after the front-matter header is removed.
    pub fn parse(&self, content: &str) -> ParsedDocument {
        let content = normalize_newlines(content);
        let metadata = extract_metadata(&content);
        let body = strip_front_matter(&content);

        let code_blocks = extract_code_blocks(body);
        let diagram_blocks = extract_diagram_blocks(body);
        let ascii_blocks = extract_ascii_blocks(body);

        tracing::debug!(
            code = code_blocks.len(),
            diagrams = diagram_blocks.len(),
            ascii = ascii_blocks.len(),
            "Classified document blocks"
        );

        let rendered = self.converter.convert(body, &NoEmbed);

        ParsedDocument {
            html: rendered.html,
            metadata,
            code_blocks,
            diagram_blocks,
            ascii_blocks,
            toc_html: rendered.toc_html,
        }
    }

    /// HTML of the document body with `embedder` consulted for code blocks
    pub fn render_body(&self, content: &str, embedder: &dyn BlockEmbedder) -> String {
        let content = normalize_newlines(content);
        self.converter
            .convert(strip_front_matter(&content), embedder)
            .html
    }

    /// Table of contents HTML for the document body
    pub fn table_of_contents(&self, content: &str) -> Option<String> {
        let content = normalize_newlines(content);
        self.converter
            .table_of_contents(strip_front_matter(&content))
    }
}

/// Replace CRLF line endings with LF
pub fn normalize_newlines(content: &str) -> Cow<'_, str> {
    if content.contains("\r\n") {
        Cow::Owned(content.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DiagramKind;

    const SAMPLE: &str = r#"---
title: Architecture
author: Bob
team: platform
---
# Overview

```python
def main():
    pass
```

```mermaid
graph TD; A-->B
```

+------+      +------+
| api  | ---> | db   |
+------+      +------+
"#;

    #[test]
    fn test_parse_sample() {
        let doc = MarkdownParser::new().parse(SAMPLE);

        assert_eq!(doc.metadata.title.as_deref(), Some("Architecture"));
        assert_eq!(doc.metadata.author.as_deref(), Some("Bob"));
        assert_eq!(doc.metadata.custom.len(), 1);

        assert_eq!(doc.code_blocks.len(), 2);
        assert_eq!(doc.code_blocks[0].language, "python");
        assert_eq!(doc.code_blocks[0].line_start, 3);
        assert_eq!(doc.code_blocks[0].line_end, 4);
        assert_eq!(doc.code_blocks[1].language, "mermaid");

        assert_eq!(doc.diagram_blocks.len(), 1);
        assert_eq!(doc.diagram_blocks[0].kind, DiagramKind::Mermaid);
        assert_eq!(doc.diagram_blocks[0].line_start, 8);

        assert_eq!(doc.ascii_blocks.len(), 1);
        assert_eq!(doc.ascii_blocks[0].line_start, 12);
        assert_eq!(doc.ascii_blocks[0].line_end, 14);
        assert!(!doc.ascii_blocks[0].is_diagram);

        assert!(doc.html.contains(r#"<h1 id="overview">"#));
        assert!(!doc.html.contains("title: Architecture"));
        assert!(doc.toc_html.is_some());
    }

    #[test]
    fn test_crlf_input_matches_lf() {
        let lf = MarkdownParser::new().parse(SAMPLE);
        let crlf = MarkdownParser::new().parse(&SAMPLE.replace('\n', "\r\n"));
        assert_eq!(lf.metadata, crlf.metadata);
        assert_eq!(lf.code_blocks, crlf.code_blocks);
        assert_eq!(lf.diagram_blocks, crlf.diagram_blocks);
        assert_eq!(lf.ascii_blocks, crlf.ascii_blocks);
    }

    #[test]
    fn test_empty_document() {
        let doc = MarkdownParser::new().parse("");
        assert!(doc.metadata.is_empty());
        assert!(doc.code_blocks.is_empty());
        assert!(doc.diagram_blocks.is_empty());
        assert!(doc.ascii_blocks.is_empty());
        assert!(doc.html.is_empty());
        assert!(doc.toc_html.is_none());
    }

    #[test]
    fn test_render_body_uses_embedder() {
        struct Stamp;
        impl BlockEmbedder for Stamp {
            fn embed(&self, language: Option<&str>, _code: &str) -> Option<String> {
                language.map(|l| format!("<div data-lang=\"{}\"></div>", l))
            }
        }

        let html = MarkdownParser::new().render_body(SAMPLE, &Stamp);
        assert!(html.contains(r#"<div data-lang="python"></div>"#));
        assert!(html.contains(r#"<div data-lang="mermaid"></div>"#));
    }
}
