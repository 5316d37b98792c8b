//! Heading and section extraction
//!
//! Headings are ATX style (`#` through `######`). Hierarchy is rebuilt
//! from the flat line stream with a stack of open headings: a heading of
//! level L pops every open heading of level >= L, and the new top of
//! stack (if any) becomes its parent. Level skipping is permitted; an H3
//! under an H1 is parented to the H1.
//!
//! Every heading opens a section that runs from just after the heading
//! line to just before the next heading of equal-or-lower level, or to
//! the end of the document.

use crate::code_spans::CodeSpans;
use crate::error::ExtractResult;
use crate::extractor::Extractor;
use mica_core::{ContentElement, Document, DocumentRegistry, ElementKind, ElementMetadata, Span};
use regex::Regex;
use std::sync::{Arc, LazyLock};

static HEADING_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})[ \t]+(.*)$").expect("heading regex"));

/// Heading and section extractor
pub struct HeadingExtractor;

impl HeadingExtractor {
    /// Create a new heading extractor
    pub fn new() -> Self {
        Self
    }
}

impl Default for HeadingExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// A heading found during the line scan, before hierarchy assignment
struct RawHeading {
    level: u8,
    text: String,
    /// Absolute span of the heading line
    span: Span,
}

impl Extractor for HeadingExtractor {
    fn name(&self) -> &'static str {
        "headings"
    }

    fn description(&self) -> &'static str {
        "ATX headings with stack-based hierarchy, and the sections they bound"
    }

    fn can_handle(&self, body: &str) -> bool {
        body.contains('#')
    }

    fn extract(
        &self,
        document: &Document,
        _registry: &DocumentRegistry,
    ) -> ExtractResult<Vec<ContentElement>> {
        let body = document.body();
        let base = document.body_start;
        let code = CodeSpans::scan(body);

        // Pass 1: collect headings in document order.
        let mut headings: Vec<RawHeading> = Vec::new();
        let mut offset = 0;
        for line in body.split_inclusive('\n') {
            let trimmed = line.strip_suffix('\n').unwrap_or(line);
            let trimmed = trimmed.strip_suffix('\r').unwrap_or(trimmed);

            if !code.in_fenced(offset) {
                if let Some(cap) = HEADING_REGEX.captures(trimmed) {
                    let level = cap.get(1).unwrap().as_str().len() as u8;
                    let text = cap.get(2).unwrap().as_str().trim().to_string();
                    headings.push(RawHeading {
                        level,
                        text,
                        span: Span::new(base + offset, base + offset + trimmed.len()),
                    });
                }
            }
            offset += line.len();
        }

        // Pass 2: parent assignment via the stack-pop rule.
        let mut parents: Vec<Option<usize>> = Vec::with_capacity(headings.len());
        let mut stack: Vec<usize> = Vec::new();
        for (idx, heading) in headings.iter().enumerate() {
            while let Some(&top) = stack.last() {
                if headings[top].level >= heading.level {
                    stack.pop();
                } else {
                    break;
                }
            }
            parents.push(stack.last().copied());
            stack.push(idx);
        }

        // Pass 3: emit headings interleaved with their sections, which
        // keeps the output in document order of element start.
        let doc_end = document.content.len();
        let mut elements = Vec::with_capacity(headings.len() * 2);
        for (idx, heading) in headings.iter().enumerate() {
            let heading_id = format!("heading-{idx}");

            let mut element = ContentElement::new(
                heading_id.clone(),
                ElementKind::Heading,
                heading.span,
                heading.text.clone(),
                ElementMetadata::Heading { level: heading.level },
            );
            if let Some(parent_idx) = parents[idx] {
                element = element.with_parent(format!("heading-{parent_idx}"));
            }
            elements.push(element);

            // Section: from just past the heading line to the next heading
            // of equal-or-lower level, or the end of the document.
            let section_start = (heading.span.end + 1).min(doc_end);
            let section_end = headings[idx + 1..]
                .iter()
                .find(|h| h.level <= heading.level)
                .map(|h| h.span.start)
                .unwrap_or(doc_end);
            let section_end = section_end.max(section_start);

            let content = document.content[section_start..section_end].trim();
            elements.push(
                ContentElement::new(
                    format!("section-{idx}"),
                    ElementKind::Section,
                    Span::new(section_start, section_end),
                    content,
                    ElementMetadata::Section {
                        heading_level: heading.level,
                    },
                )
                .with_parent(heading_id),
            );
        }

        Ok(elements)
    }
}

/// Create a heading extractor
pub fn create_heading_extractor() -> Arc<dyn Extractor> {
    Arc::new(HeadingExtractor::new())
}
