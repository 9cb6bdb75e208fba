//! Askama template for standalone HTML documents.

use crate::assemble::AssembledDocument;
use crate::error::RenderError;
use crate::style::Style;
use askama::Template;
use chrono::NaiveDate;
use mdconvert_core::config::OutputConfig;

const UNTITLED: &str = "Document";

/// Presentation settings shared by all output formats
#[derive(Debug, Clone)]
pub struct DocumentOptions {
    pub style: Style,
    pub lang: String,
    pub include_toc: bool,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            style: Style::default(),
            lang: String::from("en"),
            include_toc: false,
        }
    }
}

impl From<&OutputConfig> for DocumentOptions {
    fn from(config: &OutputConfig) -> Self {
        Self {
            style: Style::new(config.style),
            lang: config.lang.clone(),
            include_toc: config.toc,
        }
    }
}

/// Complete HTML page around a rendered body
#[derive(Template)]
#[template(path = "document.html")]
pub struct DocumentTemplate {
    pub title: String,
    pub author: Option<String>,
    pub date: Option<String>,
    /// Show the title block; only documents with a title get one
    pub has_header: bool,
    pub toc_html: Option<String>,
    pub content: String,
    pub stylesheet: String,
    pub lang: String,
}

impl DocumentTemplate {
    pub fn new(doc: &AssembledDocument, options: &DocumentOptions) -> Self {
        let meta = &doc.parsed.metadata;
        let toc_html = if options.include_toc {
            doc.parsed.toc_html.clone()
        } else {
            None
        };

        Self {
            title: meta.display_title(UNTITLED).to_string(),
            author: meta.author.clone().filter(|a| !a.is_empty()),
            date: meta.date.as_deref().map(display_date),
            has_header: meta.title.is_some(),
            toc_html,
            content: doc.body_html.clone(),
            stylesheet: options.style.stylesheet(),
            lang: options.lang.clone(),
        }
    }
}

/// Render the full HTML page for a document
pub fn render_document(
    doc: &AssembledDocument,
    options: &DocumentOptions,
) -> Result<String, RenderError> {
    Ok(DocumentTemplate::new(doc, options).render()?)
}

/// Spell out ISO dates (`2024-03-05` becomes `March 5, 2024`); anything
/// else is shown as written
pub fn display_date(raw: &str) -> String {
    match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        Ok(date) => date.format("%B %-d, %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdconvert_core::{DocumentMetadata, ParsedDocument, StyleName};

    fn document(metadata: DocumentMetadata, body: &str) -> AssembledDocument {
        AssembledDocument {
            parsed: ParsedDocument {
                metadata,
                toc_html: Some(r#"<nav class="toc-nav"></nav>"#.to_string()),
                ..ParsedDocument::default()
            },
            body_html: body.to_string(),
            assets: Vec::new(),
        }
    }

    #[test]
    fn test_display_date() {
        assert_eq!(display_date("2024-03-05"), "March 5, 2024");
        assert_eq!(display_date("spring 2024"), "spring 2024");
    }

    #[test]
    fn test_header_only_with_title() {
        let untitled = render_document(&document(DocumentMetadata::default(), "<p>x</p>"), &DocumentOptions::default()).unwrap();
        assert!(untitled.contains("<title>Document</title>"));
        assert!(!untitled.contains("document-header"));
        assert!(untitled.contains("<p>x</p>"));

        let meta = DocumentMetadata {
            title: Some("Report & Plan".to_string()),
            author: Some("Ann".to_string()),
            date: Some("2024-01-31".to_string()),
            ..DocumentMetadata::default()
        };
        let html = render_document(&document(meta, "<p>y</p>"), &DocumentOptions::default()).unwrap();
        assert!(html.contains(r#"<h1 class="document-title">Report &amp; Plan</h1>"#));
        assert!(html.contains(r#"<p class="document-author">Ann</p>"#));
        assert!(html.contains("January 31, 2024"));
    }

    #[test]
    fn test_toc_and_lang_options() {
        let options = DocumentOptions {
            style: Style::new(StyleName::Minimal),
            lang: "ru".to_string(),
            include_toc: true,
        };
        let html = render_document(&document(DocumentMetadata::default(), ""), &options).unwrap();
        assert!(html.contains(r#"<html lang="ru">"#));
        assert!(html.contains(r#"<nav class="toc-nav"></nav>"#));

        let html = render_document(&document(DocumentMetadata::default(), ""), &DocumentOptions::default()).unwrap();
        assert!(!html.contains("toc-nav\"></nav>"));
    }
}
