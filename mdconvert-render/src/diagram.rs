//! Rendering diagram blocks to images with external tools.

use crate::error::RenderError;
use crate::tools::{run_tool, tool_name};
use mdconvert_core::config::DiagramConfig;
use mdconvert_core::{DiagramBlock, DiagramKind};
use std::collections::hash_map::DefaultHasher;
use std::ffi::OsStr;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const PLACEHOLDER_WIDTH: u32 = 800;
const PLACEHOLDER_HEIGHT: u32 = 400;

/// An image produced for one diagram block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramArtifact {
    pub kind: DiagramKind,
    /// Diagram source the image was rendered from
    pub source: String,
    pub path: PathBuf,
    /// The renderer failed and `path` holds a placeholder
    pub fallback: bool,
}

/// Renders mermaid and graphviz diagrams into a private working directory
///
/// The directory and every image in it are removed when the renderer is
/// dropped, so artifacts must be consumed before that.
pub struct DiagramRenderer {
    config: DiagramConfig,
    workdir: TempDir,
}

impl DiagramRenderer {
    pub fn new(config: &DiagramConfig) -> Result<Self, RenderError> {
        let workdir = tempfile::Builder::new().prefix("md_diagrams_").tempdir()?;
        tracing::debug!("Diagram workdir: {:?}", workdir.path());

        Ok(Self {
            config: config.clone(),
            workdir,
        })
    }

    pub fn workdir(&self) -> &Path {
        self.workdir.path()
    }

    /// Render every block, in order
    pub fn render_all(&self, blocks: &[DiagramBlock]) -> Result<Vec<DiagramArtifact>, RenderError> {
        blocks.iter().map(|block| self.render(block)).collect()
    }

    /// Render one block
    ///
    /// A missing or failing renderer yields a placeholder image rather than
    /// an error; only I/O on the working directory is fatal.
    pub fn render(&self, block: &DiagramBlock) -> Result<DiagramArtifact, RenderError> {
        let stem = format!("{}_{:016x}", block.kind, source_hash(&block.content));
        let output = self
            .workdir()
            .join(format!("{stem}.{}", self.config.format.extension()));

        if output.exists() {
            return Ok(self.artifact(block, output, false));
        }

        let input = self.workdir().join(format!("{stem}.{}", source_extension(block.kind)));
        fs::write(&input, &block.content)?;

        match self.run_renderer(block.kind, &input, &output) {
            Ok(()) if output.exists() => Ok(self.artifact(block, output, false)),
            Ok(()) => {
                tracing::warn!(
                    "{} renderer produced no image for line {}",
                    block.kind.label(),
                    block.line_start
                );
                self.placeholder(block, &stem)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to render {} diagram at line {}: {}",
                    block.kind.label(),
                    block.line_start,
                    e
                );
                self.placeholder(block, &stem)
            }
        }
    }

    fn run_renderer(&self, kind: DiagramKind, input: &Path, output: &Path) -> Result<(), RenderError> {
        match kind {
            DiagramKind::Mermaid => {
                let program = &self.config.mermaid_bin;
                tracing::debug!("Rendering mermaid diagram with {}", tool_name(program));
                run_tool(
                    program,
                    [
                        OsStr::new("-i"),
                        input.as_os_str(),
                        OsStr::new("-o"),
                        output.as_os_str(),
                        OsStr::new("-b"),
                        OsStr::new("transparent"),
                    ],
                )?;
            }
            DiagramKind::Graphviz => {
                let program = &self.config.dot_bin;
                let format = format!("-T{}", self.config.format.as_str());
                tracing::debug!("Rendering graphviz diagram with {}", tool_name(program));
                run_tool(
                    program,
                    [
                        OsStr::new(&format),
                        input.as_os_str(),
                        OsStr::new("-o"),
                        output.as_os_str(),
                    ],
                )?;
            }
        }
        Ok(())
    }

    fn placeholder(&self, block: &DiagramBlock, stem: &str) -> Result<DiagramArtifact, RenderError> {
        let path = self.workdir().join(format!("{stem}_placeholder.svg"));
        fs::write(&path, placeholder_svg(block.kind))?;
        Ok(self.artifact(block, path, true))
    }

    fn artifact(&self, block: &DiagramBlock, path: PathBuf, fallback: bool) -> DiagramArtifact {
        DiagramArtifact {
            kind: block.kind,
            source: block.content.clone(),
            path,
            fallback,
        }
    }
}

fn source_extension(kind: DiagramKind) -> &'static str {
    match kind {
        DiagramKind::Mermaid => "mmd",
        DiagramKind::Graphviz => "dot",
    }
}

fn source_hash(source: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    source.hash(&mut hasher);
    hasher.finish()
}

/// Grey box standing in for a diagram that could not be rendered
pub fn placeholder_svg(kind: DiagramKind) -> String {
    let (w, h) = (PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT);
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
<rect x="1" y="1" width="{rw}" height="{rh}" fill="#ffffff" stroke="#808080" stroke-width="2"/>
<text x="{cx}" y="{cy}" font-family="sans-serif" font-size="20" fill="#404040" text-anchor="middle">{label} Diagram</text>
<text x="{cx}" y="{cy2}" font-family="sans-serif" font-size="14" fill="#808080" text-anchor="middle">(Rendering failed)</text>
</svg>
"##,
        rw = w - 2,
        rh = h - 2,
        cx = w / 2,
        cy = h / 2 - 10,
        cy2 = h / 2 + 20,
        label = kind.label(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_without_tools() -> DiagramConfig {
        DiagramConfig {
            mermaid_bin: PathBuf::from("mdconvert-missing-mmdc"),
            dot_bin: PathBuf::from("mdconvert-missing-dot"),
            ..DiagramConfig::default()
        }
    }

    fn block(kind: DiagramKind, content: &str) -> DiagramBlock {
        DiagramBlock {
            kind,
            content: content.to_string(),
            line_start: 1,
            line_end: 3,
        }
    }

    #[test]
    fn test_missing_renderer_writes_placeholder() {
        let renderer = DiagramRenderer::new(&config_without_tools()).unwrap();
        let artifact = renderer
            .render(&block(DiagramKind::Mermaid, "graph TD; A-->B"))
            .unwrap();

        assert!(artifact.fallback);
        assert_eq!(artifact.kind, DiagramKind::Mermaid);
        assert!(artifact.path.starts_with(renderer.workdir()));
        let svg = fs::read_to_string(&artifact.path).unwrap();
        assert!(svg.contains("Mermaid Diagram"));
        assert!(svg.contains("(Rendering failed)"));
    }

    #[test]
    fn test_render_all_keeps_order() {
        let renderer = DiagramRenderer::new(&config_without_tools()).unwrap();
        let blocks = [
            block(DiagramKind::Graphviz, "digraph { a -> b }"),
            block(DiagramKind::Mermaid, "graph LR; X-->Y"),
        ];
        let artifacts = renderer.render_all(&blocks).unwrap();

        assert_eq!(artifacts.len(), 2);
        assert_eq!(artifacts[0].kind, DiagramKind::Graphviz);
        assert_eq!(artifacts[0].source, "digraph { a -> b }");
        assert_eq!(artifacts[1].kind, DiagramKind::Mermaid);
    }

    #[test]
    fn test_workdir_removed_on_drop() {
        let renderer = DiagramRenderer::new(&config_without_tools()).unwrap();
        let dir = renderer.workdir().to_path_buf();
        assert!(dir.exists());
        drop(renderer);
        assert!(!dir.exists());
    }

    #[test]
    fn test_placeholder_labels() {
        assert!(placeholder_svg(DiagramKind::Graphviz).contains("GraphViz Diagram"));
        assert!(placeholder_svg(DiagramKind::Mermaid).contains(r#"width="800""#));
    }
}
