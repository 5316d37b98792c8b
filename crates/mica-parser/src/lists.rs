//! List and list item extraction
//!
//! Items are recognized line-by-line: an optional indent, a marker
//! (`-`, `*`, `+`, or `digits.`), whitespace, then the item text.
//! Nesting level is derived from the leading indentation, counting a tab
//! or two spaces as one level. Consecutive item lines form one list; a
//! top-level marker class change (ordered vs unordered) or any non-item
//! line closes the current list.

use crate::code_spans::CodeSpans;
use crate::error::ExtractResult;
use crate::extractor::Extractor;
use mica_core::{ContentElement, Document, DocumentRegistry, ElementKind, ElementMetadata, Span};
use regex::Regex;
use std::sync::{Arc, LazyLock};

static LIST_ITEM_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([ \t]*)([-*+]|\d+\.)[ \t]+(\S.*)$").expect("list item regex"));

/// List extractor
pub struct ListExtractor;

impl ListExtractor {
    /// Create a new list extractor
    pub fn new() -> Self {
        Self
    }

    /// Nesting level from leading indentation: one tab or two spaces per level
    fn indent_level(indent: &str) -> usize {
        let tabs = indent.chars().filter(|&c| c == '\t').count();
        let spaces = indent.chars().filter(|&c| c == ' ').count();
        tabs + spaces / 2
    }

    /// Ordered markers are `digit+.`
    fn is_ordered_marker(marker: &str) -> bool {
        marker.ends_with('.')
    }
}

impl Default for ListExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// One recognized item line, pending list assembly
struct RawItem {
    text: String,
    level: usize,
    ordered: bool,
    span: Span,
}

impl Extractor for ListExtractor {
    fn name(&self) -> &'static str {
        "lists"
    }

    fn description(&self) -> &'static str {
        "Ordered and unordered lists with indentation-derived nesting"
    }

    fn can_handle(&self, body: &str) -> bool {
        body.contains("- ")
            || body.contains("* ")
            || body.contains("+ ")
            || body.lines().any(|l| LIST_ITEM_REGEX.is_match(l))
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
        let mut pending: Vec<RawItem> = Vec::new();
        let mut list_index = 0;
        let mut item_index = 0;
        let mut offset = 0;

        let flush =
            |pending: &mut Vec<RawItem>, list_index: &mut usize, item_index: &mut usize| {
                if pending.is_empty() {
                    return Vec::new();
                }
                let items = std::mem::take(pending);
                let ordered = items[0].ordered;
                let list_id = format!("list-{list_index}");
                let span = Span::new(items[0].span.start, items.last().unwrap().span.end);

                let mut out = Vec::with_capacity(items.len() + 1);
                out.push(ContentElement::new(
                    list_id.clone(),
                    ElementKind::List,
                    span,
                    String::new(),
                    ElementMetadata::List {
                        ordered,
                        item_count: items.len(),
                    },
                ));
                for item in items {
                    out.push(
                        ContentElement::new(
                            format!("list-item-{item_index}"),
                            ElementKind::ListItem,
                            item.span,
                            item.text,
                            ElementMetadata::ListItem {
                                ordered: item.ordered,
                                level: item.level,
                            },
                        )
                        .with_parent(list_id.clone()),
                    );
                    *item_index += 1;
                }
                *list_index += 1;
                out
            };

        for line in body.split_inclusive('\n') {
            let trimmed = line.strip_suffix('\n').unwrap_or(line);
            let trimmed = trimmed.strip_suffix('\r').unwrap_or(trimmed);

            let captures = if code.in_fenced(offset) {
                None
            } else {
                LIST_ITEM_REGEX.captures(trimmed)
            };

            match captures {
                Some(cap) => {
                    let indent = cap.get(1).unwrap().as_str();
                    let marker = cap.get(2).unwrap().as_str();
                    let text = strip_checkbox(cap.get(3).unwrap().as_str().trim()).to_string();
                    let level = Self::indent_level(indent);
                    let ordered = Self::is_ordered_marker(marker);

                    // A top-level switch between ordered and unordered
                    // starts a new list; nested items continue the current
                    // one regardless of marker.
                    let marker_switch = level == 0
                        && pending.first().map(|f| f.ordered != ordered).unwrap_or(false);
                    if marker_switch {
                        elements.extend(flush(&mut pending, &mut list_index, &mut item_index));
                    }

                    pending.push(RawItem {
                        text,
                        level,
                        ordered,
                        span: Span::new(base + offset, base + offset + trimmed.len()),
                    });
                }
                None => {
                    elements.extend(flush(&mut pending, &mut list_index, &mut item_index));
                }
            }
            offset += line.len();
        }
        elements.extend(flush(&mut pending, &mut list_index, &mut item_index));

        Ok(elements)
    }
}

/// Item text with a leading checkbox token removed; todo extraction owns
/// the checkbox itself
fn strip_checkbox(text: &str) -> &str {
    for token in ["[ ]", "[x]", "[X]"] {
        if let Some(rest) = text.strip_prefix(token) {
            return rest.trim_start();
        }
    }
    text
}

/// Create a list extractor
pub fn create_list_extractor() -> Arc<dyn Extractor> {
    Arc::new(ListExtractor::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(content: &str) -> Vec<ContentElement> {
        let doc = Document::new("test.md", content);
        ListExtractor::new()
            .extract(&doc, &DocumentRegistry::new())
            .unwrap()
    }

    fn items(elements: &[ContentElement]) -> Vec<&ContentElement> {
        elements
            .iter()
            .filter(|e| e.kind == ElementKind::ListItem)
            .collect()
    }

    #[test]
    fn test_unordered_list() {
        let elements = extract("- one\n- two\n- three\n");
        let lists: Vec<&ContentElement> = elements
            .iter()
            .filter(|e| e.kind == ElementKind::List)
            .collect();
        assert_eq!(lists.len(), 1);
        assert!(matches!(
            lists[0].metadata,
            ElementMetadata::List { ordered: false, item_count: 3 }
        ));

        let items = items(&elements);
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].content, "one");
        assert_eq!(items[0].parent.as_deref(), Some("list-0"));
    }

    #[test]
    fn test_ordered_list() {
        let elements = extract("1. first\n2. second\n");
        assert!(matches!(
            elements[0].metadata,
            ElementMetadata::List { ordered: true, item_count: 2 }
        ));
    }

    #[test]
    fn test_nesting_levels() {
        let content = "- top\n  - two spaces\n\t- tab\n    - four spaces\n";
        let elements = extract(content);
        let items = items(&elements);
        let levels: Vec<usize> = items
            .iter()
            .map(|i| match i.metadata {
                ElementMetadata::ListItem { level, .. } => level,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(levels, vec![0, 1, 1, 2]);
    }

    #[test]
    fn test_marker_switch_starts_new_list() {
        let elements = extract("- a\n- b\n1. c\n2. d\n");
        let lists: Vec<&ContentElement> = elements
            .iter()
            .filter(|e| e.kind == ElementKind::List)
            .collect();
        assert_eq!(lists.len(), 2);
    }

    #[test]
    fn test_blank_line_closes_list() {
        let elements = extract("- a\n\n- b\n");
        let lists: Vec<&ContentElement> = elements
            .iter()
            .filter(|e| e.kind == ElementKind::List)
            .collect();
        assert_eq!(lists.len(), 2);
        assert_eq!(items(&elements).len(), 2);
    }

    #[test]
    fn test_list_inside_fence_ignored() {
        let elements = extract("```\n- not an item\n```\n");
        assert!(elements.is_empty());
    }

    #[test]
    fn test_item_spans() {
        let content = "- alpha\n- beta\n";
        let elements = extract(content);
        let items = items(&elements);
        assert_eq!(&content[items[0].span.start..items[0].span.end], "- alpha");
        assert_eq!(&content[items[1].span.start..items[1].span.end], "- beta");
    }
}
