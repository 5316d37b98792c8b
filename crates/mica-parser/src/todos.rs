//! Todo item extraction
//!
//! A todo is a list item whose text begins with a checkbox token `[ ]` or
//! `[x]`/`[X]`. Leading whitespace before the list marker never
//! disqualifies an item, whatever its depth.

use crate::code_spans::CodeSpans;
use crate::error::ExtractResult;
use crate::extractor::Extractor;
use mica_core::{ContentElement, Document, DocumentRegistry, ElementKind, ElementMetadata, Span};
use regex::Regex;
use std::sync::{Arc, LazyLock};

static TODO_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*(?:[-*+]|\d+\.)[ \t]+\[( |[xX])\](?:[ \t]+(.*))?$").expect("todo regex")
});

/// Todo item extractor
pub struct TodoExtractor;

impl TodoExtractor {
    /// Create a new todo extractor
    pub fn new() -> Self {
        Self
    }
}

impl Default for TodoExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for TodoExtractor {
    fn name(&self) -> &'static str {
        "todos"
    }

    fn description(&self) -> &'static str {
        "Checkbox list items (`- [ ]`, `- [x]`)"
    }

    fn can_handle(&self, body: &str) -> bool {
        body.contains('[')
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
        let mut offset = 0;

        for line in body.split_inclusive('\n') {
            let trimmed = line.strip_suffix('\n').unwrap_or(line);
            let trimmed = trimmed.strip_suffix('\r').unwrap_or(trimmed);

            if !code.in_fenced(offset) {
                if let Some(cap) = TODO_REGEX.captures(trimmed) {
                    let checked = cap
                        .get(1)
                        .unwrap()
                        .as_str()
                        .eq_ignore_ascii_case("x");
                    let text = cap
                        .get(2)
                        .map(|m| m.as_str().trim())
                        .unwrap_or("")
                        .to_string();

                    elements.push(ContentElement::new(
                        format!("todo-{index}"),
                        ElementKind::TodoItem,
                        Span::new(base + offset, base + offset + trimmed.len()),
                        text,
                        ElementMetadata::TodoItem { checked },
                    ));
                    index += 1;
                }
            }
            offset += line.len();
        }

        Ok(elements)
    }
}

/// Create a todo extractor
pub fn create_todo_extractor() -> Arc<dyn Extractor> {
    Arc::new(TodoExtractor::new())
}
