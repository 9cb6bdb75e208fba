//! Putting a document together: parse, render diagrams, embed images.

use crate::ascii::{AsciiProcessor, ProcessedAscii};
use crate::diagram::{DiagramArtifact, DiagramRenderer};
use crate::error::RenderError;
use mdconvert_core::{html_escape, is_ascii_art, BlockEmbedder, DiagramKind, MarkdownParser, ParsedDocument};
use std::cell::RefCell;
use std::path::{Path, PathBuf};

/// A parsed document with its final body HTML
///
/// `assets` lists every image file the body refers to. The files live in
/// the renderers' working directories and disappear with them.
#[derive(Debug, Clone)]
pub struct AssembledDocument {
    pub parsed: ParsedDocument,
    pub body_html: String,
    pub assets: Vec<PathBuf>,
}

/// Builds [`AssembledDocument`]s from markdown text
pub struct DocumentAssembler<'r> {
    parser: &'r MarkdownParser,
    diagrams: &'r DiagramRenderer,
    ascii: &'r AsciiProcessor,
}

impl<'r> DocumentAssembler<'r> {
    pub fn new(
        parser: &'r MarkdownParser,
        diagrams: &'r DiagramRenderer,
        ascii: &'r AsciiProcessor,
    ) -> Self {
        Self {
            parser,
            diagrams,
            ascii,
        }
    }

    pub fn assemble(&self, content: &str) -> Result<AssembledDocument, RenderError> {
        let parsed = self.parser.parse(content);
        let artifacts = self.diagrams.render_all(&parsed.diagram_blocks)?;

        let embedder = ArtifactEmbedder {
            artifacts: &artifacts,
            ascii: self.ascii,
            assets: RefCell::new(Vec::new()),
            error: RefCell::new(None),
        };
        let body_html = self.parser.render_body(content, &embedder);

        if let Some(e) = embedder.error.into_inner() {
            return Err(e);
        }

        let fallbacks = artifacts.iter().filter(|a| a.fallback).count();
        if fallbacks > 0 {
            tracing::warn!("{} diagram(s) replaced by placeholders", fallbacks);
        }

        Ok(AssembledDocument {
            parsed,
            body_html,
            assets: embedder.assets.into_inner(),
        })
    }
}

/// Swaps diagram and ASCII-art code blocks for their rendered form
struct ArtifactEmbedder<'a> {
    artifacts: &'a [DiagramArtifact],
    ascii: &'a AsciiProcessor,
    assets: RefCell<Vec<PathBuf>>,
    error: RefCell<Option<RenderError>>,
}

impl ArtifactEmbedder<'_> {
    fn use_asset(&self, path: &Path) {
        let mut assets = self.assets.borrow_mut();
        if !assets.iter().any(|p| p == path) {
            assets.push(path.to_path_buf());
        }
    }

    fn embed_diagram(&self, kind: DiagramKind, code: &str) -> Option<String> {
        let artifact = self
            .artifacts
            .iter()
            .find(|a| a.kind == kind && a.source == code)?;
        self.use_asset(&artifact.path);
        Some(diagram_figure(artifact))
    }

    fn embed_ascii(&self, code: &str) -> Option<String> {
        match self.ascii.process(code) {
            Ok(ProcessedAscii::Image(path)) => {
                self.use_asset(&path);
                Some(format!(
                    r#"<figure class="ascii-art-figure"><img class="ascii-art-image" src="{}" alt="ASCII diagram"></figure>"#,
                    html_escape(&path.display().to_string())
                ))
            }
            Ok(ProcessedAscii::Text(html)) => Some(html),
            Err(e) => {
                self.error.borrow_mut().get_or_insert(e);
                None
            }
        }
    }
}

impl BlockEmbedder for ArtifactEmbedder<'_> {
    fn embed(&self, language: Option<&str>, code: &str) -> Option<String> {
        match language {
            Some(tag) => match DiagramKind::from_tag(tag) {
                Some(kind) => self.embed_diagram(kind, code),
                None if tag == "text" && is_ascii_art(code) => self.embed_ascii(code),
                None => None,
            },
            None if is_ascii_art(code) => self.embed_ascii(code),
            None => None,
        }
    }
}

fn diagram_figure(artifact: &DiagramArtifact) -> String {
    let class = if artifact.fallback {
        format!("diagram diagram-{} diagram-placeholder", artifact.kind)
    } else {
        format!("diagram diagram-{}", artifact.kind)
    };
    format!(
        r#"<figure class="{class}"><img src="{}" alt="{} diagram"></figure>"#,
        html_escape(&artifact.path.display().to_string()),
        artifact.kind.label()
    )
}
