//! Markdown to HTML conversion with block hooks.
//!
//! Structural Markdown (headings, lists, tables, emphasis) is handled by
//! pulldown-cmark. This module adds heading ids, a table of contents,
//! syntax highlighting, and a hook that lets callers replace code blocks
//! with rendered artifacts.

pub mod embed;
pub mod highlight;

use crate::slug::SlugRegistry;
use pulldown_cmark::{html, Event, Options, Parser, Tag, TagEnd};

pub use embed::{BlockEmbedder, EmbedTransformer, NoEmbed};
pub use highlight::{HighlightTransformer, DEFAULT_THEME};

#[derive(Debug, Clone)]
struct TocItem {
    level: u32,
    title: String,
    id: String,
}

/// Result of one conversion
#[derive(Debug, Clone, Default)]
pub struct Rendered {
    pub html: String,
    pub toc_html: Option<String>,
}

/// Markdown converter
///
/// Holds only options; every call starts from fresh state, so one value can
/// be shared between documents.
#[derive(Debug, Clone)]
pub struct MarkdownConverter {
    options: Options,
    hard_breaks: bool,
    highlight: bool,
    theme: String,
}

impl MarkdownConverter {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

        Self {
            options,
            hard_breaks: true,
            highlight: true,
            theme: DEFAULT_THEME.to_string(),
        }
    }

    /// Render single newlines inside paragraphs as `<br />`
    pub fn with_hard_breaks(mut self, enabled: bool) -> Self {
        self.hard_breaks = enabled;
        self
    }

    /// Toggle syntect highlighting of tagged code fences
    pub fn with_highlighting(mut self, enabled: bool) -> Self {
        self.highlight = enabled;
        self
    }

    /// Use a named syntect theme for highlighting
    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = theme.into();
        self
    }

    /// Convert markdown to HTML, letting `embedder` replace code blocks
    pub fn convert(&self, markdown: &str, embedder: &dyn BlockEmbedder) -> Rendered {
        let events: Vec<Event> = Parser::new_ext(markdown, self.options).collect();

        let headings = collect_headings(&events);
        let events = attach_heading_ids(events, &headings);

        let events = if self.hard_breaks {
            soft_to_hard_breaks(events)
        } else {
            events
        };

        let events = EmbedTransformer::new(embedder).transform(events);

        let events = if self.highlight {
            HighlightTransformer::with_theme(&self.theme).transform(events)
        } else {
            events
        };

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        let toc_html = if headings.is_empty() {
            None
        } else {
            Some(render_toc(&headings))
        };

        Rendered {
            html: html_output,
            toc_html,
        }
    }

    /// Convert markdown to HTML without any block hooks
    pub fn convert_simple(&self, markdown: &str) -> String {
        self.convert(markdown, &NoEmbed).html
    }

    /// Table of contents for `markdown`, if it has any headings
    pub fn table_of_contents(&self, markdown: &str) -> Option<String> {
        let events: Vec<Event> = Parser::new_ext(markdown, self.options).collect();
        let headings = collect_headings(&events);
        (!headings.is_empty()).then(|| render_toc(&headings))
    }
}

impl Default for MarkdownConverter {
    fn default() -> Self {
        Self::new()
    }
}

fn collect_headings(events: &[Event]) -> Vec<TocItem> {
    let mut toc = Vec::new();
    let mut registry = SlugRegistry::new();
    let mut current: Option<(u32, Option<String>, String)> = None;

    for event in events {
        match event {
            Event::Start(Tag::Heading { level, id, .. }) => {
                current = Some((*level as u32, id.as_ref().map(|s| s.to_string()), String::new()));
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, _, ref mut title)) = current {
                    title.push_str(text.as_ref());
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, explicit_id, title)) = current.take() {
                    let id = explicit_id.unwrap_or_else(|| registry.unique(&title));
                    toc.push(TocItem { level, title, id });
                }
            }
            _ => {}
        }
    }

    toc
}

fn attach_heading_ids<'a>(events: Vec<Event<'a>>, headings: &[TocItem]) -> Vec<Event<'a>> {
    let mut heading_iter = headings.iter();

    events
        .into_iter()
        .map(|event| match event {
            Event::Start(Tag::Heading {
                level,
                id,
                classes,
                attrs,
            }) => {
                let next = heading_iter.next();
                let id = id.or_else(|| next.map(|h| h.id.clone().into()));
                Event::Start(Tag::Heading {
                    level,
                    id,
                    classes,
                    attrs,
                })
            }
            other => other,
        })
        .collect()
}

fn soft_to_hard_breaks(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut in_code_block = false;

    events
        .into_iter()
        .map(|event| match event {
            Event::Start(Tag::CodeBlock(_)) => {
                in_code_block = true;
                event
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                event
            }
            Event::SoftBreak if !in_code_block => Event::HardBreak,
            other => other,
        })
        .collect()
}

fn render_toc(headings: &[TocItem]) -> String {
    let mut html = String::from(r#"<nav class="toc-nav"><h3>Contents</h3><ul class="toc-list">"#);
    for h in headings {
        html.push_str(&format!(
            r##"<li class="toc-level-{}"><a href="#{}">{}</a></li>"##,
            h.level,
            html_escape(&h.id),
            html_escape(&h.title)
        ));
    }
    html.push_str("</ul></nav>");
    html
}

/// Escape text for HTML content and attribute values
pub fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
