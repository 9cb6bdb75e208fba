//! Fenced code block extraction.

use super::{fence_pattern, scan_fences};
use crate::line_index::LineIndex;
use crate::models::CodeBlock;
use regex::Regex;
use std::sync::OnceLock;

/// Language recorded for fences without a tag
pub const DEFAULT_LANGUAGE: &str = "text";

static CODE_FENCE_REGEX: OnceLock<Regex> = OnceLock::new();

fn code_fence_regex() -> &'static Regex {
    CODE_FENCE_REGEX.get_or_init(|| fence_pattern(r"\w*"))
}

/// Extract every fenced code block in document order
///
/// Line numbers are 1-based: `line_start` is the line of the opening fence
/// and `line_end` adds the number of newlines inside the body.
pub fn extract_code_blocks(content: &str) -> Vec<CodeBlock> {
    let index = LineIndex::new(content);

    scan_fences(code_fence_regex(), content, &index)
        .into_iter()
        .map(|fence| CodeBlock {
            language: fence.tag.unwrap_or(DEFAULT_LANGUAGE).to_string(),
            code: fence.body.to_string(),
            line_start: fence.line_start,
            line_end: fence.line_end,
        })
        .collect()
}
