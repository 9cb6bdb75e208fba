//! Carrying ASCII art into generated documents.

use crate::error::RenderError;
use mdconvert_core::{html_escape, AsciiMode};
use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const FONT_SIZE: f64 = 12.0;
const CHAR_WIDTH: f64 = FONT_SIZE * 0.6;
const LINE_HEIGHT: f64 = FONT_SIZE * 1.2;
const PADDING: f64 = 10.0;

/// Result of processing one piece of ASCII art
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessedAscii {
    /// Rasterised to an image file in the processor's working directory
    Image(PathBuf),
    /// HTML fragment to insert in place of the block
    Text(String),
}

/// Applies the configured [`AsciiMode`] to blocks of ASCII art
pub struct AsciiProcessor {
    mode: AsciiMode,
    workdir: TempDir,
}

impl AsciiProcessor {
    pub fn new(mode: AsciiMode) -> Result<Self, RenderError> {
        let workdir = tempfile::Builder::new().prefix("md_ascii_").tempdir()?;
        Ok(Self { mode, workdir })
    }

    pub fn mode(&self) -> AsciiMode {
        self.mode
    }

    pub fn workdir(&self) -> &Path {
        self.workdir.path()
    }

    pub fn process(&self, content: &str) -> Result<ProcessedAscii, RenderError> {
        match self.mode {
            AsciiMode::Image => self.convert_to_image(content).map(ProcessedAscii::Image),
            AsciiMode::Optimize => Ok(ProcessedAscii::Text(optimize(content))),
            AsciiMode::Preserve => Ok(ProcessedAscii::Text(preserve(content))),
        }
    }

    /// Draw the art as monospaced text in an SVG file
    pub fn convert_to_image(&self, content: &str) -> Result<PathBuf, RenderError> {
        let mut hasher = DefaultHasher::new();
        content.hash(&mut hasher);
        let path = self
            .workdir()
            .join(format!("ascii_{:016x}.svg", hasher.finish()));

        if !path.exists() {
            fs::write(&path, render_svg(content))?;
            tracing::debug!("Wrote ASCII image {:?}", path);
        }
        Ok(path)
    }
}

/// Width in characters of the longest line and the number of lines
pub fn estimate_dimensions(content: &str) -> (usize, usize) {
    let lines: Vec<&str> = content.split('\n').collect();
    let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    (width, lines.len())
}

/// SVG drawing of the text on a white background
pub fn render_svg(content: &str) -> String {
    let (columns, rows) = estimate_dimensions(content);
    let width = (columns as f64 * CHAR_WIDTH) as u32 + (2.0 * PADDING) as u32;
    let height = (rows as f64 * LINE_HEIGHT) as u32 + (2.0 * PADDING) as u32;

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    svg.push_str(r#"<rect width="100%" height="100%" fill="white"/>"#);
    svg.push_str(&format!(
        r#"<g font-family="Courier New, Courier, monospace" font-size="{FONT_SIZE}" fill="black">"#
    ));

    for (i, line) in content.split('\n').enumerate() {
        if line.is_empty() {
            continue;
        }
        let y = PADDING + FONT_SIZE + i as f64 * LINE_HEIGHT;
        svg.push_str(&format!(
            r#"<text x="{PADDING}" y="{y:.1}" xml:space="preserve">{}</text>"#,
            html_escape(line)
        ));
    }

    svg.push_str("</g></svg>\n");
    svg
}

/// Re-lay the art for print: tabs expanded, trailing space and blank edges removed
pub fn optimize(content: &str) -> String {
    let lines: Vec<String> = content
        .split('\n')
        .map(|line| line.replace('\t', "    ").trim_end().to_string())
        .collect();

    let first = lines.iter().position(|l| !l.is_empty());
    let last = lines.iter().rposition(|l| !l.is_empty());
    let body = match (first, last) {
        (Some(first), Some(last)) => lines[first..=last].join("\n"),
        _ => String::new(),
    };

    format!(
        r#"<pre class="ascii-art ascii-optimized">{}</pre>"#,
        html_escape(&body)
    )
}

/// The art exactly as written
pub fn preserve(content: &str) -> String {
    format!(r#"<pre class="ascii-art">{}</pre>"#, html_escape(content))
}
