//! Block extraction from document bodies.
//!
//! Each extractor scans the body independently. Their results overlap on
//! purpose: a `mermaid` fence is both a code block and a diagram block, and
//! line-drawing text inside any fence is also reported as an ASCII block.

pub mod ascii;
pub mod code;
pub mod diagram;

pub use ascii::extract_ascii_blocks;
pub use code::extract_code_blocks;
pub use diagram::extract_diagram_blocks;

use crate::line_index::LineIndex;
use regex::Regex;

/// A fence located in a body
#[derive(Debug, Clone, Copy)]
pub(crate) struct Fence<'a> {
    pub tag: Option<&'a str>,
    pub body: &'a str,
    pub line_start: usize,
    pub line_end: usize,
}

/// Build a fence pattern restricted to the given tag alternation
///
/// The body group is non-greedy and spans newlines, so an opening fence
/// without a closing one never matches.
pub(crate) fn fence_pattern(tag: &str) -> Regex {
    Regex::new(&format!(r"(?s)```({tag})\n(.*?)\n```")).expect("fence pattern is valid")
}

/// Scan `content` for fences matching `pattern`
pub(crate) fn scan_fences<'a>(
    pattern: &Regex,
    content: &'a str,
    index: &LineIndex,
) -> Vec<Fence<'a>> {
    pattern
        .captures_iter(content)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let body = caps.get(2)?.as_str();
            let tag = caps.get(1).map(|m| m.as_str()).filter(|t| !t.is_empty());
            let line_start = index.line_of(whole.start());
            let line_end = line_start + body.matches('\n').count();

            Some(Fence {
                tag,
                body,
                line_start,
                line_end,
            })
        })
        .collect()
}
