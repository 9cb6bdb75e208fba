//! ASCII-art block detection over plain text.

use crate::heuristics::{is_ascii_line, is_diagram_like};
use crate::models::AsciiBlock;

/// Minimum number of consecutive drawing lines that form a block
pub const MIN_ASCII_RUN_LINES: usize = 3;

/// Extract runs of line-drawing text
///
/// A run is a maximal sequence of at least [`MIN_ASCII_RUN_LINES`] lines
/// that each contain a drawing symbol. Fences are not consulted, so art
/// inside a fenced block is reported here as well.
pub fn extract_ascii_blocks(content: &str) -> Vec<AsciiBlock> {
    let mut blocks = Vec::new();
    // (first line number, byte offset of first line, number of lines)
    let mut run: Option<(usize, usize, usize)> = None;
    let mut offset = 0;

    for (idx, line) in content.split_inclusive('\n').enumerate() {
        let line_no = idx + 1;

        if is_ascii_line(line) {
            run = Some(match run {
                Some((start, start_offset, len)) => (start, start_offset, len + 1),
                None => (line_no, offset, 1),
            });
        } else if let Some(finished) = run.take() {
            push_run(&mut blocks, content, finished, offset);
        }

        offset += line.len();
    }

    if let Some(finished) = run {
        push_run(&mut blocks, content, finished, offset);
    }

    blocks
}

fn push_run(
    blocks: &mut Vec<AsciiBlock>,
    content: &str,
    (line_start, start_offset, len): (usize, usize, usize),
    end_offset: usize,
) {
    if len < MIN_ASCII_RUN_LINES {
        return;
    }

    let text = &content[start_offset..end_offset];
    blocks.push(AsciiBlock {
        content: text.to_string(),
        line_start,
        line_end: line_start + len - 1,
        is_diagram: is_diagram_like(text),
    });
}
