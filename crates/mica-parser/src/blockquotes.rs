//! Blockquote extraction
//!
//! The nesting level of a quoted line is the count of its consecutive
//! leading `>` markers. Consecutive lines at the same level merge into one
//! blockquote element; a change in `>` count starts a new element.

use crate::code_spans::CodeSpans;
use crate::error::ExtractResult;
use crate::extractor::Extractor;
use mica_core::{ContentElement, Document, DocumentRegistry, ElementKind, ElementMetadata, Span};
use regex::Regex;
use std::sync::{Arc, LazyLock};

static QUOTE_LINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*((?:>[ \t]?)*>)[ \t]?(.*)$").expect("quote line regex"));

/// Blockquote extractor
pub struct BlockquoteExtractor;

impl BlockquoteExtractor {
    /// Create a new blockquote extractor
    pub fn new() -> Self {
        Self
    }
}

impl Default for BlockquoteExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for BlockquoteExtractor {
    fn name(&self) -> &'static str {
        "blockquotes"
    }

    fn description(&self) -> &'static str {
        "Blockquotes with `>`-count nesting, same-level lines merged"
    }

    fn can_handle(&self, body: &str) -> bool {
        body.contains('>')
    }

    fn extract(
        &self,
        document: &Document,
        _registry: &DocumentRegistry,
    ) -> ExtractResult<Vec<ContentElement>> {
        let body = document.body();
        let base = document.body_start;
        let code = CodeSpans::scan(body);

        let mut elements = Vec::new();
        let mut index = 0;
        // (depth, merged text, span)
        let mut current: Option<(u8, String, Span)> = None;

        let flush = |current: &mut Option<(u8, String, Span)>, index: &mut usize| {
            if let Some((depth, text, span)) = current.take() {
                if !text.trim().is_empty() {
                    let element = ContentElement::new(
                        format!("quote-{index}"),
                        ElementKind::Blockquote,
                        span,
                        text.trim().to_string(),
                        ElementMetadata::Blockquote { depth },
                    );
                    *index += 1;
                    return Some(element);
                }
            }
            None
        };

        let mut offset = 0;
        for line in body.split_inclusive('\n') {
            let trimmed = line.strip_suffix('\n').unwrap_or(line);
            let trimmed = trimmed.strip_suffix('\r').unwrap_or(trimmed);

            let captures = if code.in_fenced(offset) {
                None
            } else {
                QUOTE_LINE_REGEX.captures(trimmed)
            };

            match captures {
                Some(cap) => {
                    let markers = cap.get(1).unwrap().as_str();
                    let depth = markers.chars().filter(|&c| c == '>').count() as u8;
                    let text = cap.get(2).unwrap().as_str();
                    let line_span = Span::new(base + offset, base + offset + trimmed.len());

                    match current.as_mut() {
                        Some((open_depth, merged, span)) if *open_depth == depth => {
                            if !merged.is_empty() && !text.is_empty() {
                                merged.push(' ');
                            }
                            merged.push_str(text);
                            span.end = line_span.end;
                        }
                        _ => {
                            // Depth change or fresh quote: close the open one
                            elements.extend(flush(&mut current, &mut index));
                            current = Some((depth, text.to_string(), line_span));
                        }
                    }
                }
                None => {
                    elements.extend(flush(&mut current, &mut index));
                }
            }
            offset += line.len();
        }
        elements.extend(flush(&mut current, &mut index));

        Ok(elements)
    }
}

/// Create a blockquote extractor
pub fn create_blockquote_extractor() -> Arc<dyn Extractor> {
    Arc::new(BlockquoteExtractor::new())
}
