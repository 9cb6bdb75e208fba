//! Fenced diagram block extraction (Mermaid, GraphViz).

use super::{fence_pattern, scan_fences};
use crate::line_index::LineIndex;
use crate::models::{DiagramBlock, DiagramKind};
use regex::Regex;
use std::sync::OnceLock;

static MERMAID_REGEX: OnceLock<Regex> = OnceLock::new();
static GRAPHVIZ_REGEX: OnceLock<Regex> = OnceLock::new();

fn mermaid_regex() -> &'static Regex {
    MERMAID_REGEX.get_or_init(|| fence_pattern("mermaid"))
}

fn graphviz_regex() -> &'static Regex {
    GRAPHVIZ_REGEX.get_or_init(|| fence_pattern("dot|graphviz"))
}

/// Extract diagram fences
///
/// Mermaid fences come first, then GraphViz (`dot` or `graphviz`) fences,
/// each group in document order. These fences are also reported by
/// [`extract_code_blocks`](super::extract_code_blocks).
pub fn extract_diagram_blocks(content: &str) -> Vec<DiagramBlock> {
    let index = LineIndex::new(content);

    [
        (mermaid_regex(), DiagramKind::Mermaid),
        (graphviz_regex(), DiagramKind::Graphviz),
    ]
    .into_iter()
    .flat_map(|(pattern, kind)| {
        scan_fences(pattern, content, &index)
            .into_iter()
            .map(move |fence| DiagramBlock {
                kind,
                content: fence.body.to_string(),
                line_start: fence.line_start,
                line_end: fence.line_end,
            })
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::extract_code_blocks;

    #[test]
    fn test_mermaid_fence() {
        let content = "Intro\n\n```mermaid\ngraph TD; A-->B\n```\n";
        let blocks = extract_diagram_blocks(content);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, DiagramKind::Mermaid);
        assert_eq!(blocks[0].content, "graph TD; A-->B");
        assert_eq!(blocks[0].line_start, 3);
        assert_eq!(blocks[0].line_end, 3);
    }

    #[test]
    fn test_dot_and_graphviz_share_kind() {
        let content = "```dot\ndigraph { a -> b }\n```\n\n```graphviz\ngraph { c -- d }\n```\n";
        let blocks = extract_diagram_blocks(content);
        assert_eq!(blocks.len(), 2);
        assert!(blocks.iter().all(|b| b.kind == DiagramKind::Graphviz));
        assert_eq!(blocks[1].line_start, 5);
    }

    #[test]
    fn test_mermaid_listed_before_graphviz() {
        let content = "```dot\ndigraph { a -> b }\n```\n\n```mermaid\nflowchart LR\n```\n";
        let kinds: Vec<_> = extract_diagram_blocks(content)
            .into_iter()
            .map(|b| b.kind)
            .collect();
        assert_eq!(kinds, vec![DiagramKind::Mermaid, DiagramKind::Graphviz]);
    }

    #[test]
    fn test_diagram_also_reported_as_code() {
        let content = "```mermaid\ngraph TD; A-->B\n```";
        let code = extract_code_blocks(content);
        let diagrams = extract_diagram_blocks(content);
        assert_eq!(code.len(), 1);
        assert_eq!(code[0].language, "mermaid");
        assert_eq!(diagrams.len(), 1);
        assert_eq!(diagrams[0].kind.as_str(), "mermaid");
        assert_eq!(code[0].code, diagrams[0].content);
    }

    #[test]
    fn test_other_tags_ignored() {
        let content = "```plantuml\n@startuml\n@enduml\n```\n```python\nx = 1\n```";
        assert!(extract_diagram_blocks(content).is_empty());
    }
}
