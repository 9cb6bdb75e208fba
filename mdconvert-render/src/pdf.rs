//! PDF output through an external HTML-to-PDF engine.
//!
//! The document page is written to a temporary HTML file and printed by
//! WeasyPrint when it is installed, otherwise by headless Chrome/Chromium.
//! `MDCONVERT_PDF_ENGINE` overrides the detection.

use crate::assemble::AssembledDocument;
use crate::error::RenderError;
use crate::templates::{render_document, DocumentOptions};
use crate::tools::{resolve_tool, run_tool};
use crate::OutputGenerator;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENGINE_ENV_VAR: &str = "MDCONVERT_PDF_ENGINE";

const WEASYPRINT: &[&str] = &["weasyprint"];

const CHROME: &[&str] = &[
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
    "chrome",
];

/// An HTML-to-PDF program and how to drive it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfEngine {
    WeasyPrint(PathBuf),
    Chrome(PathBuf),
}

impl PdfEngine {
    /// Classify a binary by its file name
    pub fn from_path(path: PathBuf) -> Self {
        let is_weasyprint = path
            .file_name()
            .map(|name| name.to_string_lossy().to_lowercase().contains("weasyprint"))
            .unwrap_or(false);

        if is_weasyprint {
            PdfEngine::WeasyPrint(path)
        } else {
            PdfEngine::Chrome(path)
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            PdfEngine::WeasyPrint(path) | PdfEngine::Chrome(path) => path,
        }
    }

    fn print(&self, html: &Path, pdf: &Path) -> Result<(), RenderError> {
        match self {
            PdfEngine::WeasyPrint(program) => {
                run_tool(
                    program,
                    [
                        OsStr::new("--presentational-hints"),
                        html.as_os_str(),
                        pdf.as_os_str(),
                    ],
                )?;
            }
            PdfEngine::Chrome(program) => {
                let print_arg = format!("--print-to-pdf={}", pdf.display());
                let url = format!("file://{}", html.display());
                run_tool(
                    program,
                    [
                        "--headless",
                        "--disable-gpu",
                        "--no-sandbox",
                        "--disable-dev-shm-usage",
                        "--print-to-pdf-no-header",
                        print_arg.as_str(),
                        url.as_str(),
                    ],
                )?;
            }
        }
        Ok(())
    }
}

/// Writes documents as PDF
#[derive(Debug, Clone, Default)]
pub struct PdfGenerator {
    options: DocumentOptions,
    engine: Option<PathBuf>,
}

impl PdfGenerator {
    pub fn new(options: DocumentOptions) -> Self {
        Self {
            options,
            engine: None,
        }
    }

    /// Use this engine binary instead of searching for one
    pub fn with_engine(mut self, engine: Option<PathBuf>) -> Self {
        self.engine = engine;
        self
    }

    pub fn resolve_engine(&self) -> Result<PdfEngine, RenderError> {
        if let Some(path) = resolve_tool(self.engine.as_deref(), ENGINE_ENV_VAR, WEASYPRINT) {
            return Ok(PdfEngine::from_path(path));
        }

        if let Some(path) = resolve_tool(None, ENGINE_ENV_VAR, CHROME).or_else(installed_chrome) {
            return Ok(PdfEngine::Chrome(path));
        }

        Err(RenderError::ToolNotFound(format!(
            "PDF engine (weasyprint or Chrome; set {ENGINE_ENV_VAR} to override)"
        )))
    }
}

impl OutputGenerator for PdfGenerator {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn extension(&self) -> &'static str {
        "pdf"
    }

    fn generate(&self, doc: &AssembledDocument, output: &Path) -> Result<(), RenderError> {
        let engine = self.resolve_engine()?;
        let html = render_document(doc, &self.options)?;

        let workdir = tempfile::Builder::new().prefix("md_pdf_").tempdir()?;
        let html_path = workdir.path().join("document.html");
        let pdf_path = workdir.path().join("document.pdf");
        fs::write(&html_path, html)?;

        tracing::debug!("Printing PDF with {:?}", engine.path());
        engine.print(&html_path, &pdf_path)?;

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&pdf_path, output)?;
        tracing::info!("Wrote {:?}", output);
        Ok(())
    }
}

fn installed_chrome() -> Option<PathBuf> {
    let candidates: &[&str] = if cfg!(target_os = "macos") {
        &["/Applications/Google Chrome.app/Contents/MacOS/Google Chrome"]
    } else {
        &[
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium-browser",
            "/usr/bin/chromium",
        ]
    };

    candidates
        .iter()
        .map(PathBuf::from)
        .find(|path| path.exists())
}
