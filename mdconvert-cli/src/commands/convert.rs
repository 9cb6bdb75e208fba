//! Convert command implementation.

use super::{load_config, parser_for, read_document};
use anyhow::{bail, Context, Result};
use mdconvert_core::{AsciiMode, Config, OutputFormat, StyleName};
use mdconvert_render::{
    AsciiProcessor, AssembledDocument, DiagramRenderer, DocumentAssembler, DocumentOptions,
    HtmlGenerator, OutputGenerator, PdfGenerator, Style, WordGenerator,
};
use serde::Serialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions picked up when walking directories
pub const INPUT_EXTENSIONS: &[&str] = &["md", "markdown", "txt"];

const UNTITLED: &str = "Untitled";

pub struct ConvertOptions {
    pub output: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub style: Option<StyleName>,
    pub ascii_mode: Option<AsciiMode>,
    pub batch: bool,
}

/// One written output file
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedFile {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub path: PathBuf,
}

/// Block counts reported after a conversion
#[derive(Debug, Clone, Serialize)]
pub struct ConversionStats {
    pub code_blocks: usize,
    pub diagrams: usize,
    pub ascii_art: usize,
    pub title: String,
}

impl ConversionStats {
    fn of(doc: &AssembledDocument) -> Self {
        let parsed = &doc.parsed;
        Self {
            code_blocks: parsed.code_blocks.len(),
            diagrams: parsed.diagram_blocks.len(),
            ascii_art: parsed.ascii_blocks.len(),
            title: parsed.metadata.display_title(UNTITLED).to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub files: Vec<GeneratedFile>,
    pub stats: ConversionStats,
}

/// Settings for one conversion run, with command-line overrides applied
#[derive(Debug, Clone)]
pub struct Conversion {
    config: Config,
    format: OutputFormat,
    style: StyleName,
    ascii_mode: AsciiMode,
}

impl Conversion {
    pub fn new(config: Config) -> Self {
        Self {
            format: config.output.format,
            style: config.output.style,
            ascii_mode: config.output.ascii_mode,
            config,
        }
    }

    pub fn with_format(mut self, format: Option<OutputFormat>) -> Self {
        if let Some(format) = format {
            self.format = format;
        }
        self
    }

    pub fn with_style(mut self, style: Option<StyleName>) -> Self {
        if let Some(style) = style {
            self.style = style;
        }
        self
    }

    pub fn with_ascii_mode(mut self, ascii_mode: Option<AsciiMode>) -> Self {
        if let Some(ascii_mode) = ascii_mode {
            self.ascii_mode = ascii_mode;
        }
        self
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    fn document_options(&self) -> DocumentOptions {
        DocumentOptions {
            style: Style::new(self.style),
            ..DocumentOptions::from(&self.config.output)
        }
    }

    fn generators(&self) -> Vec<Box<dyn OutputGenerator>> {
        let options = self.document_options();
        let mut generators: Vec<Box<dyn OutputGenerator>> = Vec::new();

        if self.format.wants_pdf() {
            generators.push(Box::new(
                PdfGenerator::new(options.clone()).with_engine(self.config.pdf.engine.clone()),
            ));
        }
        if self.format.wants_docx() {
            generators.push(Box::new(
                WordGenerator::new(options.clone())
                    .with_pandoc(self.config.docx.pandoc_bin.clone())
                    .with_reference_doc(self.config.reference_doc()),
            ));
        }
        if self.format.wants_html() {
            generators.push(Box::new(HtmlGenerator::new(options)));
        }

        generators
    }

    /// Convert markdown text, writing `<output_base>.<ext>` per output format
    pub fn run(&self, content: &str, output_base: &Path) -> Result<ConversionReport> {
        let parser = parser_for(&self.config);
        let diagrams = DiagramRenderer::new(&self.config.diagrams)
            .context("Failed to create diagram working directory")?;
        let ascii = AsciiProcessor::new(self.ascii_mode)
            .context("Failed to create ASCII working directory")?;

        let doc = DocumentAssembler::new(&parser, &diagrams, &ascii)
            .assemble(content)
            .context("Failed to assemble document")?;
        let stats = ConversionStats::of(&doc);

        let mut files = Vec::new();
        for generator in self.generators() {
            let path = append_extension(output_base, generator.extension());
            generator
                .generate(&doc, &path)
                .with_context(|| format!("Failed to write {} output {:?}", generator.name(), path))?;
            files.push(GeneratedFile {
                kind: generator.name(),
                path,
            });
        }

        Ok(ConversionReport { files, stats })
    }
}

/// Convert every input, continuing past failures
pub fn convert_files(config_path: &Path, inputs: &[PathBuf], opts: ConvertOptions) -> Result<()> {
    let config = load_config(config_path)?;
    let conversion = Conversion::new(config)
        .with_format(opts.format)
        .with_style(opts.style)
        .with_ascii_mode(opts.ascii_mode);

    let files = collect_inputs(inputs, opts.batch)?;
    if files.is_empty() {
        bail!("No markdown files found");
    }

    let single = files.len() == 1 && !opts.batch;
    if opts.output.is_some() && !single {
        tracing::warn!("--output only applies to a single input; writing next to each input");
    }

    tracing::info!("Converting {} file(s) to {}", files.len(), conversion.format());

    let mut failed = 0;
    for input in &files {
        let base = match (&opts.output, single) {
            (Some(output), true) => output_base_for(output, input),
            _ => input.with_extension(""),
        };

        match convert_one(&conversion, input, &base) {
            Ok(report) => {
                for file in &report.files {
                    println!("✓ {} → {}", input.display(), file.path.display());
                }
                tracing::info!(
                    "{}: {} code block(s), {} diagram(s), {} ASCII block(s)",
                    report.stats.title,
                    report.stats.code_blocks,
                    report.stats.diagrams,
                    report.stats.ascii_art
                );
            }
            Err(e) => {
                failed += 1;
                tracing::error!("Failed to convert {:?}: {:#}", input, e);
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} file(s) failed to convert", failed, files.len());
    }

    Ok(())
}

fn convert_one(conversion: &Conversion, input: &Path, base: &Path) -> Result<ConversionReport> {
    let content = read_document(input)?;
    conversion.run(&content, base)
}

/// Expand directories (with `batch`) into the markdown files under them
pub fn collect_inputs(inputs: &[PathBuf], batch: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        if !input.is_dir() {
            files.push(input.clone());
            continue;
        }

        if !batch {
            bail!("{:?} is a directory; pass --batch to convert its contents", input);
        }

        let mut found: Vec<PathBuf> = WalkDir::new(input)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && has_input_extension(e.path()))
            .map(|e| e.into_path())
            .collect();
        found.sort();

        tracing::debug!("Found {} file(s) under {:?}", found.len(), input);
        files.extend(found);
    }

    Ok(files)
}

fn has_input_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            INPUT_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Output base for `-o`: a directory receives the input's stem, a file name
/// loses a trailing output extension
fn output_base_for(output: &Path, input: &Path) -> PathBuf {
    if output.is_dir() {
        let stem = input.file_stem().unwrap_or_else(|| "document".as_ref());
        return output.join(stem);
    }

    match output.extension().and_then(|ext| ext.to_str()) {
        Some("pdf" | "docx" | "html") => output.with_extension(""),
        _ => output.to_path_buf(),
    }
}

fn append_extension(base: &Path, extension: &str) -> PathBuf {
    let mut path = OsString::from(base.as_os_str());
    path.push(".");
    path.push(extension);
    PathBuf::from(path)
}
