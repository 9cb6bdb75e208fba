//! Code syntax highlighting using syntect.

use super::embed::fence_language;
use super::html_escape;
use pulldown_cmark::{CodeBlockKind, CowStr, Event, Tag, TagEnd};
use std::sync::OnceLock;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

/// Dark theme close to the monokai look of printed code listings
pub const DEFAULT_THEME: &str = "base16-ocean.dark";

static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();

fn syntax_set() -> &'static SyntaxSet {
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme_set() -> &'static ThemeSet {
    THEME_SET.get_or_init(ThemeSet::load_defaults)
}

fn theme(name: &str) -> Option<&'static Theme> {
    let themes = &theme_set().themes;
    themes.get(name).or_else(|| themes.get(DEFAULT_THEME))
}

/// Transformer for syntax highlighting tagged code fences
pub struct HighlightTransformer {
    theme: Option<&'static Theme>,
}

impl HighlightTransformer {
    pub fn new() -> Self {
        Self::with_theme(DEFAULT_THEME)
    }

    /// Highlight with a named theme, falling back to the default theme
    pub fn with_theme(name: &str) -> Self {
        Self { theme: theme(name) }
    }

    /// Replace tagged fences with highlighted HTML; other blocks pass through
    pub fn transform<'a>(&self, events: Vec<Event<'a>>) -> Vec<Event<'a>> {
        let mut result = Vec::with_capacity(events.len());
        let mut code_lang: Option<String> = None;
        let mut code_content = String::new();

        for event in events {
            match event {
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(ref info)))
                    if code_lang.is_none() && fence_language(info).is_some() =>
                {
                    code_lang = fence_language(info);
                    code_content.clear();
                }
                Event::Text(text) if code_lang.is_some() => {
                    code_content.push_str(text.as_ref());
                }
                Event::End(TagEnd::CodeBlock) if code_lang.is_some() => {
                    let lang = code_lang.take().unwrap_or_default();
                    let highlighted = self.highlight_code(&code_content, &lang);
                    result.push(Event::Html(CowStr::from(highlighted)));
                }
                other => result.push(other),
            }
        }

        result
    }

    fn highlight_code(&self, code: &str, lang: &str) -> String {
        let plain = || {
            format!(
                "<pre><code class=\"language-{}\">{}</code></pre>\n",
                html_escape(lang),
                html_escape(code)
            )
        };

        let Some(theme) = self.theme else {
            return plain();
        };

        let ss = syntax_set();
        let syntax = ss
            .find_syntax_by_token(lang)
            .or_else(|| ss.find_syntax_by_extension(lang))
            .unwrap_or_else(|| ss.find_syntax_plain_text());

        highlighted_html_for_string(code, ss, syntax, theme).unwrap_or_else(|err| {
            tracing::debug!("Highlighting failed for {}: {}", lang, err);
            plain()
        })
    }
}

impl Default for HighlightTransformer {
    fn default() -> Self {
        Self::new()
    }
}
