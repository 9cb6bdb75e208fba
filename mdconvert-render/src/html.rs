//! Standalone HTML output.

use crate::assemble::AssembledDocument;
use crate::error::RenderError;
use crate::templates::{render_document, DocumentOptions};
use crate::OutputGenerator;
use mdconvert_core::html_escape;
use std::fs;
use std::path::Path;

/// Writes the document page plus a `<name>_files/` directory of images
#[derive(Debug, Clone, Default)]
pub struct HtmlGenerator {
    options: DocumentOptions,
}

impl HtmlGenerator {
    pub fn new(options: DocumentOptions) -> Self {
        Self { options }
    }
}

impl OutputGenerator for HtmlGenerator {
    fn name(&self) -> &'static str {
        "html"
    }

    fn extension(&self) -> &'static str {
        "html"
    }

    fn generate(&self, doc: &AssembledDocument, output: &Path) -> Result<(), RenderError> {
        let mut html = render_document(doc, &self.options)?;

        let parent = output.parent().filter(|p| !p.as_os_str().is_empty());
        if let Some(parent) = parent {
            fs::create_dir_all(parent)?;
        }

        if !doc.assets.is_empty() {
            let stem = output
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "document".to_string());
            let assets_name = format!("{stem}_files");
            let assets_dir = match parent {
                Some(parent) => parent.join(&assets_name),
                None => assets_name.clone().into(),
            };
            fs::create_dir_all(&assets_dir)?;

            for asset in &doc.assets {
                let Some(file_name) = asset.file_name() else {
                    continue;
                };
                fs::copy(asset, assets_dir.join(file_name))?;

                let original = html_escape(&asset.display().to_string());
                let relative = format!("{assets_name}/{}", file_name.to_string_lossy());
                html = html.replace(&original, &html_escape(&relative));
            }
        }

        fs::write(output, html)?;
        tracing::info!("Wrote {:?}", output);
        Ok(())
    }
}
