//! DOCX output through pandoc.

use crate::assemble::AssembledDocument;
use crate::error::RenderError;
use crate::templates::{render_document, DocumentOptions};
use crate::tools::{resolve_tool, run_tool};
use crate::OutputGenerator;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

pub const PANDOC_ENV_VAR: &str = "MDCONVERT_PANDOC_BIN";

/// Writes documents as Word files
#[derive(Debug, Clone, Default)]
pub struct WordGenerator {
    options: DocumentOptions,
    pandoc: Option<PathBuf>,
    reference_doc: Option<PathBuf>,
}

impl WordGenerator {
    pub fn new(options: DocumentOptions) -> Self {
        Self {
            options,
            pandoc: None,
            reference_doc: None,
        }
    }

    pub fn with_pandoc(mut self, pandoc: Option<PathBuf>) -> Self {
        self.pandoc = pandoc;
        self
    }

    /// Copy paragraph and heading styles from this `.docx`
    pub fn with_reference_doc(mut self, reference_doc: Option<PathBuf>) -> Self {
        self.reference_doc = reference_doc;
        self
    }

    fn pandoc_args(&self, doc: &AssembledDocument, input: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-f".into(),
            "html".into(),
            "-t".into(),
            "docx".into(),
            "--standalone".into(),
            "-o".into(),
            output.into(),
        ];

        let meta = &doc.parsed.metadata;
        if let Some(title) = &meta.title {
            args.push(format!("--metadata=title:{title}").into());
        }
        if let Some(author) = &meta.author {
            args.push(format!("--metadata=author:{author}").into());
        }
        if let Some(date) = &meta.date {
            args.push(format!("--metadata=date:{date}").into());
        }
        if let Some(reference) = &self.reference_doc {
            let mut arg = OsString::from("--reference-doc=");
            arg.push(reference);
            args.push(arg);
        }

        args.push(input.into());
        args
    }
}

impl OutputGenerator for WordGenerator {
    fn name(&self) -> &'static str {
        "docx"
    }

    fn extension(&self) -> &'static str {
        "docx"
    }

    fn generate(&self, doc: &AssembledDocument, output: &Path) -> Result<(), RenderError> {
        let pandoc = resolve_tool(self.pandoc.as_deref(), PANDOC_ENV_VAR, &["pandoc"])
            .ok_or_else(|| RenderError::ToolNotFound("pandoc".to_string()))?;

        let html = render_document(doc, &self.options)?;
        let workdir = tempfile::Builder::new().prefix("md_docx_").tempdir()?;
        let html_path = workdir.path().join("document.html");
        fs::write(&html_path, html)?;

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        run_tool(&pandoc, self.pandoc_args(doc, &html_path, output))?;
        tracing::info!("Wrote {:?}", output);
        Ok(())
    }
}
