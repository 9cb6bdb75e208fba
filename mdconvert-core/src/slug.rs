//! Slug generation for heading anchors and output file names.

use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;
use unicode_segmentation::UnicodeSegmentation;

static HYPHEN_RUNS: OnceLock<Regex> = OnceLock::new();

fn hyphen_runs() -> &'static Regex {
    HYPHEN_RUNS.get_or_init(|| Regex::new(r"-+").expect("hyphen pattern is valid"))
}

/// Convert a string to a URL-safe slug
///
/// Lowercases, turns whitespace and underscores into hyphens, drops
/// punctuation, keeps Unicode letters, and collapses repeated hyphens.
///
/// # Examples
///
/// ```
/// use mdconvert_core::slugify;
///
/// assert_eq!(slugify("Hello World"), "hello-world");
/// assert_eq!(slugify("C++ Programming"), "c-programming");
/// ```
pub fn slugify(input: &str) -> String {
    let cleaned = input
        .to_lowercase()
        .graphemes(true)
        .filter_map(|g| match g {
            " " | "_" | "\t" | "\n" => Some("-"),
            _ => {
                let c = g.chars().next()?;
                (c.is_alphanumeric() || c == '-').then_some(g)
            }
        })
        .collect::<String>();

    hyphen_runs()
        .replace_all(&cleaned, "-")
        .trim_matches('-')
        .to_string()
}

/// Hands out slugs that are unique within one document
///
/// The first use of a slug is returned as is; later uses get `-1`, `-2`, ...
#[derive(Debug, Default)]
pub struct SlugRegistry {
    seen: HashMap<String, usize>,
}

impl SlugRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unique(&mut self, text: &str) -> String {
        let base = match slugify(text) {
            s if s.is_empty() => "section".to_string(),
            s => s,
        };

        let count = self.seen.entry(base.clone()).or_insert(0);
        let slug = if *count == 0 {
            base
        } else {
            format!("{}-{}", base, count)
        };
        *count += 1;
        slug
    }
}

/// ASCII-only file stem derived from an uploaded or input file name
///
/// Falls back to `document` when nothing usable remains.
pub fn file_stem_slug(name: &str) -> String {
    let file_name = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let stem = file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(file_name);

    let ascii: String = slugify(stem)
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    let ascii = ascii.trim_matches('-');

    if ascii.is_empty() {
        "document".to_string()
    } else {
        ascii.to_string()
    }
}
