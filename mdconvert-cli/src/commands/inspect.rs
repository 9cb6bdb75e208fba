//! Inspect command: show what the parser found in a document.

use super::{load_config, parser_for, read_document};
use anyhow::Result;
use mdconvert_core::{AsciiBlock, CodeBlock, DiagramBlock, DocumentMetadata, ParsedDocument};
use serde::Serialize;
use std::fmt::Write;
use std::path::Path;

#[derive(Serialize)]
struct InspectReport<'a> {
    metadata: &'a DocumentMetadata,
    code_blocks: &'a [CodeBlock],
    diagram_blocks: &'a [DiagramBlock],
    ascii_blocks: &'a [AsciiBlock],
}

pub fn inspect_document(config_path: &Path, input: &Path, json: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let content = read_document(input)?;
    let parsed = parser_for(&config).parse(&content);

    if json {
        let report = InspectReport {
            metadata: &parsed.metadata,
            code_blocks: &parsed.code_blocks,
            diagram_blocks: &parsed.diagram_blocks,
            ascii_blocks: &parsed.ascii_blocks,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", summary(&parsed));
    }

    Ok(())
}

fn summary(parsed: &ParsedDocument) -> String {
    let meta = &parsed.metadata;
    let mut out = String::new();

    let _ = writeln!(out, "Title:   {}", meta.title.as_deref().unwrap_or("-"));
    let _ = writeln!(out, "Author:  {}", meta.author.as_deref().unwrap_or("-"));
    let _ = writeln!(out, "Date:    {}", meta.date.as_deref().unwrap_or("-"));
    if let Some(order) = meta.order {
        let _ = writeln!(out, "Order:   {}", order);
    }
    for key in meta.custom.keys() {
        let _ = writeln!(out, "Custom:  {}", key);
    }

    let _ = writeln!(out, "\nCode blocks: {}", parsed.code_blocks.len());
    for block in &parsed.code_blocks {
        let _ = writeln!(
            out,
            "  {:<10} lines {}-{}",
            block.language, block.line_start, block.line_end
        );
    }

    let _ = writeln!(out, "Diagrams: {}", parsed.diagram_blocks.len());
    for block in &parsed.diagram_blocks {
        let _ = writeln!(
            out,
            "  {:<10} lines {}-{}",
            block.kind, block.line_start, block.line_end
        );
    }

    let _ = writeln!(out, "ASCII blocks: {}", parsed.ascii_blocks.len());
    for block in &parsed.ascii_blocks {
        let _ = writeln!(
            out,
            "  {:<10} lines {}-{}",
            if block.is_diagram { "diagram" } else { "art" },
            block.line_start,
            block.line_end
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdconvert_core::MarkdownParser;

    #[test]
    fn test_summary_lists_blocks() {
        let content = "---\ntitle: Guide\ntags: [a]\n---\n```rust\nfn main() {}\n```\n\n```mermaid\ngraph TD\n```\n\n+--+\n|  |\n+--+\n";
        let parsed = MarkdownParser::new().parse(content);

        insta::assert_snapshot!(summary(&parsed), @r"
        Title:   Guide
        Author:  -
        Date:    -
        Custom:  tags

        Code blocks: 2
          rust       lines 1-1
          mermaid    lines 5-5
        Diagrams: 1
          mermaid    lines 5-5
        ASCII blocks: 1
          art        lines 9-11
        ");
    }
}
