//! Text classifiers for line-drawing content.
//!
//! Two independent heuristics live here and are not meant to agree:
//!
//! - the connector heuristic decides whether an extracted ASCII block reads
//!   as a flow diagram (arrows and connecting strokes);
//! - the density heuristic decides whether an arbitrary span of text is
//!   ASCII art at all, by the share of drawing symbols it contains.
//!
//! Both are pure functions over their thresholds and symbol sets so callers
//! can test the boundaries directly.

/// Characters that mark a line as part of an ASCII block
pub const ASCII_LINE_SYMBOLS: &[char] = &[
    '+', '-', '|', '/', '\\', '<', '>', '[', ']', '{', '}', '=',
];

/// Arrow glyphs counted as connectors
pub const CONNECTOR_GLYPHS: &[char] = &['→', '←', '↑', '↓'];

/// Two-character arrows counted as connectors
pub const CONNECTOR_ARROWS: &[&str] = &["->", "<-"];

/// Stroke characters whose doubled form (`--`, `==`, `~~`) is a connector
pub const CONNECTOR_STROKES: &[char] = &['-', '=', '~'];

/// An ASCII block is a diagram when its connector count exceeds this
pub const DIAGRAM_CONNECTOR_THRESHOLD: usize = 5;

/// Characters counted by the density heuristic
pub const ART_DENSITY_SYMBOLS: &[char] = &[
    '+', '-', '|', '/', '\\', '<', '>', '[', ']', '{', '}', '=', '*', '#', '@',
];

/// Text is ASCII art when its symbol density exceeds this ratio
pub const ART_DENSITY_THRESHOLD: f64 = 0.1;

/// Count connector tokens in `text`
///
/// Arrow glyphs and `->`/`<-` count wherever they occur (non-overlapping per
/// pattern). A doubled stroke counts once when it stands as an exact pair;
/// longer runs of the same stroke are box edges and count nothing, so
/// `+---+` contributes no connectors while `-->` contributes two.
pub fn connector_count(text: &str) -> usize {
    connector_count_with(text, CONNECTOR_GLYPHS, CONNECTOR_ARROWS, CONNECTOR_STROKES)
}

/// Count connector tokens in `text` over the given glyph, arrow and stroke sets
pub fn connector_count_with(
    text: &str,
    glyphs: &[char],
    arrows: &[&str],
    strokes: &[char],
) -> usize {
    let glyph_count = text.chars().filter(|c| glyphs.contains(c)).count();
    let arrow_count: usize = arrows
        .iter()
        .filter(|arrow| !arrow.is_empty())
        .map(|arrow| text.matches(arrow).count())
        .sum();

    glyph_count + arrow_count + doubled_stroke_count(text, strokes)
}

fn doubled_stroke_count(text: &str, strokes: &[char]) -> usize {
    let mut count = 0;
    let mut run_char: Option<char> = None;
    let mut run_len = 0usize;

    let mut close_run = |ch: Option<char>, len: usize| {
        if ch.is_some_and(|c| strokes.contains(&c)) && len == 2 {
            count += 1;
        }
    };

    for c in text.chars() {
        if Some(c) == run_char {
            run_len += 1;
        } else {
            close_run(run_char, run_len);
            run_char = Some(c);
            run_len = 1;
        }
    }
    close_run(run_char, run_len);

    count
}

/// Whether the connector count of `text` exceeds `threshold`
pub fn exceeds_connector_threshold(text: &str, threshold: usize) -> bool {
    connector_count(text) > threshold
}

/// Block-level diagram heuristic with the fixed threshold
pub fn is_diagram_like(text: &str) -> bool {
    exceeds_connector_threshold(text, DIAGRAM_CONNECTOR_THRESHOLD)
}

/// Whether a line belongs to an ASCII block
pub fn is_ascii_line(line: &str) -> bool {
    line.trim_start().chars().any(|c| ASCII_LINE_SYMBOLS.contains(&c))
}

/// Share of non-whitespace characters in `text` that belong to `symbols`
///
/// `None` when the text has no non-whitespace characters.
pub fn symbol_density(text: &str, symbols: &[char]) -> Option<f64> {
    let (total, hits) = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .fold((0usize, 0usize), |(total, hits), c| {
            (total + 1, hits + usize::from(symbols.contains(&c)))
        });

    if total == 0 {
        None
    } else {
        Some(hits as f64 / total as f64)
    }
}

/// Whether the symbol density of `text` exceeds `threshold`
pub fn exceeds_density(text: &str, symbols: &[char], threshold: f64) -> bool {
    symbol_density(text, symbols).is_some_and(|ratio| ratio > threshold)
}

/// Density heuristic with the fixed symbol set and threshold
pub fn is_ascii_art(text: &str) -> bool {
    exceeds_density(text, ART_DENSITY_SYMBOLS, ART_DENSITY_THRESHOLD)
}
