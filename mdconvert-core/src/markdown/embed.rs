//! Hook for replacing code blocks with rendered artifacts.

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Tag, TagEnd};

/// Supplies replacement HTML for code blocks
///
/// `language` is the first word of the fence info string, or `None` for
/// untagged and indented blocks. `code` is the block body without its final
/// newline, matching the text recorded by the block extractors.
pub trait BlockEmbedder {
    fn embed(&self, language: Option<&str>, code: &str) -> Option<String>;
}

/// Embedder that never replaces anything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoEmbed;

impl BlockEmbedder for NoEmbed {
    fn embed(&self, _language: Option<&str>, _code: &str) -> Option<String> {
        None
    }
}

/// Transformer that swaps code blocks for embedder output
pub struct EmbedTransformer<'e> {
    embedder: &'e dyn BlockEmbedder,
}

impl<'e> EmbedTransformer<'e> {
    pub fn new(embedder: &'e dyn BlockEmbedder) -> Self {
        Self { embedder }
    }

    pub fn transform<'a>(&self, events: Vec<Event<'a>>) -> Vec<Event<'a>> {
        let mut result = Vec::with_capacity(events.len());
        let mut pending: Option<(Event<'a>, Option<String>, Vec<Event<'a>>)> = None;

        for event in events {
            let Some((_, _, body)) = pending.as_mut() else {
                let language = match &event {
                    Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                        Some(fence_language(info))
                    }
                    Event::Start(Tag::CodeBlock(CodeBlockKind::Indented)) => Some(None),
                    _ => None,
                };
                match language {
                    Some(language) => pending = Some((event, language, Vec::new())),
                    None => result.push(event),
                }
                continue;
            };

            if !matches!(event, Event::End(TagEnd::CodeBlock)) {
                body.push(event);
                continue;
            }

            let Some((start, language, body)) = pending.take() else {
                continue;
            };
            let code = code_text(&body);
            let code = code.strip_suffix('\n').unwrap_or(&code);

            match self.embedder.embed(language.as_deref(), code) {
                Some(html) => result.push(Event::Html(CowStr::from(html))),
                None => {
                    result.push(start);
                    result.extend(body);
                    result.push(event);
                }
            }
        }

        if let Some((start, _, body)) = pending {
            result.push(start);
            result.extend(body);
        }

        result
    }
}

/// First word of a fence info string, if any
pub fn fence_language(info: &str) -> Option<String> {
    info.split_whitespace().next().map(str::to_string)
}

fn code_text(body: &[Event<'_>]) -> String {
    body.iter()
        .filter_map(|event| match event {
            Event::Text(text) => Some(text.as_ref()),
            _ => None,
        })
        .collect()
}
