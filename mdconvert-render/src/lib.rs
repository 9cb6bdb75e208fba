//! # mdconvert-render
//!
//! Turns parsed documents into output files.
//!
//! Diagrams are rendered by external tools (`mmdc`, `dot`), ASCII art is
//! re-laid out or rasterised to SVG, and the assembled HTML is handed to an
//! external PDF engine or to pandoc for DOCX.

pub mod ascii;
pub mod assemble;
pub mod diagram;
pub mod docx;
pub mod error;
pub mod html;
pub mod pdf;
pub mod style;
pub mod templates;
mod tools;

pub use ascii::{AsciiProcessor, ProcessedAscii};
pub use assemble::{AssembledDocument, DocumentAssembler};
pub use diagram::{DiagramArtifact, DiagramRenderer};
pub use docx::WordGenerator;
pub use error::RenderError;
pub use html::HtmlGenerator;
pub use pdf::PdfGenerator;
pub use style::Style;
pub use templates::{DocumentOptions, DocumentTemplate};

use std::path::Path;

/// A writer for one output format
pub trait OutputGenerator {
    /// Short name used in reports (`pdf`, `docx`, `html`)
    fn name(&self) -> &'static str;

    /// File extension of generated documents
    fn extension(&self) -> &'static str;

    fn generate(&self, doc: &AssembledDocument, output: &Path) -> Result<(), RenderError>;
}
