//! Integration tests running the full extractor set over realistic
//! documents.

use mica_core::{Document, DocumentRegistry, ElementKind, ElementMetadata};
use mica_parser::ExtractorRegistry;

const SAMPLE: &str = r##"---
title: Release Planning
tags:
  - planning
---
# Release Planning

Kickoff notes for the next cycle. See [[adr-001|the storage decision]]
and the [tracker](https://tracker.example.com/project "Tracker").

## Tasks

- [ ] Draft announcement due:2024-07-01 @mara
- [x] Freeze dependencies
- regular item

## Reference

| Area | Owner |
| ---- | ----- |
| docs | mara  |
| infra | jonas |

> Measure twice, cut once.

```rust
fn main() { println!("#notatag"); }
```

Wrap-up discussed in (Fowler, 2018) and filed under @ops/release. #planning
"##;

fn extract_all(content: &str, registry: &DocumentRegistry) -> Vec<mica_core::ContentElement> {
    let doc = Document::new("notes/release.md", content);
    let mut elements = Vec::new();
    for extractor in ExtractorRegistry::with_defaults().iter() {
        if extractor.can_handle(doc.body()) {
            elements.extend(extractor.extract(&doc, registry).unwrap());
        }
    }
    elements
}

fn kinds(elements: &[mica_core::ContentElement], kind: ElementKind) -> Vec<&mica_core::ContentElement> {
    elements.iter().filter(|e| e.kind == kind).collect()
}

#[test]
fn test_full_document_extraction() {
    let mut registry = DocumentRegistry::new();
    registry.register("adr-001.md", "doc-adr-001").unwrap();
    registry.seal();

    let elements = extract_all(SAMPLE, &registry);

    let headings = kinds(&elements, ElementKind::Heading);
    assert_eq!(headings.len(), 3);
    assert_eq!(headings[0].content, "Release Planning");
    assert_eq!(headings[1].parent.as_deref(), Some("heading-0"));
    assert_eq!(headings[2].parent.as_deref(), Some("heading-0"));

    assert_eq!(kinds(&elements, ElementKind::Section).len(), 3);

    let todos = kinds(&elements, ElementKind::TodoItem);
    assert_eq!(todos.len(), 2);
    assert!(todos[0].content.starts_with("Draft announcement"));

    let tables = kinds(&elements, ElementKind::Table);
    assert_eq!(tables.len(), 1);
    match &tables[0].metadata {
        ElementMetadata::Table { headers, row_count, column_count, .. } => {
            assert_eq!(headers, &vec!["Area".to_string(), "Owner".to_string()]);
            assert_eq!(*row_count, 3);
            assert_eq!(*column_count, 2);
        }
        _ => panic!("expected table metadata"),
    }

    let quotes = kinds(&elements, ElementKind::Blockquote);
    assert_eq!(quotes.len(), 1);
    assert_eq!(quotes[0].content, "Measure twice, cut once.");

    let code = kinds(&elements, ElementKind::CodeBlock);
    assert_eq!(code.len(), 1);
    assert!(matches!(
        &code[0].metadata,
        ElementMetadata::CodeBlock { language: Some(lang) } if lang == "rust"
    ));

    let links = kinds(&elements, ElementKind::Link);
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].content, "tracker");

    let citations = kinds(&elements, ElementKind::Citation);
    assert_eq!(citations.len(), 1);
    assert_eq!(citations[0].content, "Fowler, 2018");

    let wikilinks = kinds(&elements, ElementKind::WikiLink);
    assert_eq!(wikilinks.len(), 1);
    match &wikilinks[0].metadata {
        ElementMetadata::WikiLink { target, alias, resolved, .. } => {
            assert_eq!(target, "adr-001");
            assert_eq!(alias.as_deref(), Some("the storage decision"));
            assert_eq!(resolved.as_deref(), Some("doc-adr-001"));
        }
        _ => panic!("expected wikilink metadata"),
    }
}

#[test]
fn test_tags_across_sources() {
    let registry = DocumentRegistry::new();
    let elements = extract_all(SAMPLE, &registry);

    let tag_names: Vec<String> = kinds(&elements, ElementKind::Tag)
        .iter()
        .map(|e| match &e.metadata {
            ElementMetadata::Tag { name, .. } => name.clone(),
            _ => unreachable!(),
        })
        .collect();

    // Front matter, the @ops/release category token, and the trailing
    // hashtag; the `#notatag` literal stays inside the code fence.
    assert!(tag_names.contains(&"planning".to_string()));
    assert!(tag_names.contains(&"release".to_string()));
    assert!(!tag_names.contains(&"notatag".to_string()));

    let category_tag = kinds(&elements, ElementKind::Tag)
        .into_iter()
        .find(|e| matches!(&e.metadata, ElementMetadata::Tag { category: Some(_), .. }))
        .expect("category tag present");
    match &category_tag.metadata {
        ElementMetadata::Tag { name, category, .. } => {
            assert_eq!(name, "release");
            assert_eq!(category.as_deref(), Some("ops"));
        }
        _ => unreachable!(),
    }
}

#[test]
fn test_all_spans_are_well_formed_and_siblings_disjoint() {
    let registry = DocumentRegistry::new();
    let doc = Document::new("notes/release.md", SAMPLE);
    let elements = extract_all(SAMPLE, &registry);

    for element in &elements {
        assert!(
            element.span.is_valid_for(&doc.content),
            "span {:?} of {} out of bounds",
            element.span,
            element.local_id
        );
    }

    // Same-kind siblings never overlap.
    for kind in [
        ElementKind::Heading,
        ElementKind::TodoItem,
        ElementKind::Table,
        ElementKind::CodeBlock,
        ElementKind::Tag,
        ElementKind::WikiLink,
    ] {
        let mut spans: Vec<_> = kinds(&elements, kind)
            .iter()
            .map(|e| e.span)
            .filter(|s| !s.is_empty())
            .collect();
        spans.sort_by_key(|s| s.start);
        for pair in spans.windows(2) {
            assert!(
                pair[0].end <= pair[1].start,
                "overlapping {kind:?} spans: {:?} and {:?}",
                pair[0],
                pair[1]
            );
        }
    }
}

#[test]
fn test_extraction_is_restartable() {
    // Same input, same output: extractors keep no state between runs.
    let registry = DocumentRegistry::new();
    let first = extract_all(SAMPLE, &registry);
    let second = extract_all(SAMPLE, &registry);
    assert_eq!(first, second);
}
