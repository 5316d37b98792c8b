//! Cross-document link extraction
//!
//! Wikilinks are `[[target]]` or `[[target|alias]]`. Matching is
//! non-greedy and never crosses an already-closed `]]`: a malformed or
//! unterminated opening is abandoned in favor of the next opening inside
//! it, so `[[Not closed or [[Nested|Display]]]]` yields exactly the
//! `Nested` link.
//!
//! Each target is looked up in the document registry at extraction time;
//! a miss leaves the resolved identifier empty and is not an error. The
//! registry must be fully populated (and sealed) before this extractor
//! runs for any document in the batch.

use crate::code_spans::CodeSpans;
use crate::error::ExtractResult;
use crate::extractor::Extractor;
use mica_core::{ContentElement, Document, DocumentRegistry, ElementKind, ElementMetadata, Span};
use std::sync::Arc;

/// Cross-document link extractor
pub struct WikiLinkExtractor;

impl WikiLinkExtractor {
    /// Create a new wikilink extractor
    pub fn new() -> Self {
        Self
    }
}

impl Default for WikiLinkExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for WikiLinkExtractor {
    fn name(&self) -> &'static str {
        "wikilinks"
    }

    fn description(&self) -> &'static str {
        "Cross-document [[target]] links resolved against the registry"
    }

    fn can_handle(&self, body: &str) -> bool {
        body.contains("[[")
    }

    fn extract(
        &self,
        document: &Document,
        registry: &DocumentRegistry,
    ) -> ExtractResult<Vec<ContentElement>> {
        let body = document.body();
        let base = document.body_start;
        let code = CodeSpans::scan(body);

        let mut elements = Vec::new();
        let mut index = 0;
        let mut cursor = 0;

        while let Some(open_rel) = body[cursor..].find("[[") {
            let open = cursor + open_rel;
            let inner_start = open + 2;

            let Some(close_rel) = body[inner_start..].find("]]") else {
                break; // unterminated opening, nothing more to find
            };
            let inner = &body[inner_start..inner_start + close_rel];

            // An opening inside the candidate means this one never closed;
            // restart at the nested opening.
            if let Some(nested_rel) = inner.find("[[") {
                cursor = inner_start + nested_rel;
                continue;
            }

            let close_end = inner_start + close_rel + 2;
            if code.contains(open) {
                cursor = close_end;
                continue;
            }

            let (target, alias) = match inner.split_once('|') {
                Some((target, alias)) => (target.trim(), Some(alias.trim().to_string())),
                None => (inner.trim(), None),
            };

            if !target.is_empty() {
                let resolved = registry.find_by_path(target).map(str::to_string);
                let raw = &body[open..close_end];
                let display = alias.clone().unwrap_or_else(|| target.to_string());

                elements.push(ContentElement::new(
                    format!("wikilink-{index}"),
                    ElementKind::WikiLink,
                    Span::new(base + open, base + close_end),
                    display,
                    ElementMetadata::WikiLink {
                        target: target.to_string(),
                        alias,
                        raw: raw.to_string(),
                        resolved,
                    },
                ));
                index += 1;
            }

            cursor = close_end;
        }

        Ok(elements)
    }
}

/// Create a wikilink extractor
pub fn create_wikilink_extractor() -> Arc<dyn Extractor> {
    Arc::new(WikiLinkExtractor::new())
}
