//! Link, reference, and citation extraction
//!
//! Recognized forms:
//! - inline links `[text](url "title")`
//! - reference links `[text][key]` and shorthand `[key][]`
//! - bare references `[key]`, only when a matching definition exists
//! - definitions `[key]: url "title"` anywhere in the document; forward
//!   references are allowed
//! - citations: parenthetical `(Author, 2020; Other, 2021)` and `[@key]`
//!
//! A link is internal when its URL carries no scheme. Images (`![..]`) and
//! definition lines produce no elements.

use crate::code_spans::CodeSpans;
use crate::error::ExtractResult;
use crate::extractor::Extractor;
use mica_core::{
    ContentElement, Document, DocumentRegistry, ElementKind, ElementMetadata, LinkStyle, Span,
};
use regex::Regex;
use std::collections::HashMap;
use std::ops::Range;
use std::sync::{Arc, LazyLock};

static DEFINITION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^[ \t]*\[([^\]]+)\]:[ \t]*(\S+)(?:[ \t]+"([^"]*)")?[ \t]*$"#)
        .expect("definition regex")
});

static INLINE_LINK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(!?)\[([^\[\]]*)\]\(([^()\s]+)(?:[ \t]+"([^"]*)")?\)"#).expect("inline link regex")
});

static REFERENCE_LINK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(!?)\[([^\[\]]+)\]\[([^\[\]]*)\]").expect("reference link regex"));

static BARE_REFERENCE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\[\]]+)\]").expect("bare reference regex"));

static AT_CITATION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[@([A-Za-z0-9_:.-]+)\]").expect("at citation regex"));

static PAREN_CITATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(([A-Z][A-Za-z.'\- ]*,[ \t]*\d{4}[a-z]?(?:[ \t]*;[ \t]*[A-Z][A-Za-z.'\- ]*,[ \t]*\d{4}[a-z]?)*)\)")
        .expect("parenthetical citation regex")
});

static SCHEME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*:").expect("scheme regex"));

/// Link and citation extractor
pub struct LinkExtractor;

impl LinkExtractor {
    /// Create a new link extractor
    pub fn new() -> Self {
        Self
    }

    /// A URL with no scheme separator is an internal (relative) link
    fn is_internal(url: &str) -> bool {
        !SCHEME_REGEX.is_match(url)
    }

    /// Collect `[key]: url "title"` definitions from the whole body.
    /// Keys fold to lowercase; forward references resolve through this map.
    fn collect_definitions(body: &str, code: &CodeSpans) -> HashMap<String, (String, Option<String>)> {
        let mut definitions = HashMap::new();
        let mut offset = 0;
        for line in body.split_inclusive('\n') {
            let trimmed = line.strip_suffix('\n').unwrap_or(line);
            let trimmed = trimmed.strip_suffix('\r').unwrap_or(trimmed);
            if !code.in_fenced(offset) {
                if let Some(cap) = DEFINITION_REGEX.captures(trimmed) {
                    let key = cap.get(1).unwrap().as_str().to_lowercase();
                    let url = cap.get(2).unwrap().as_str().to_string();
                    let title = cap.get(3).map(|m| m.as_str().to_string());
                    definitions.insert(key, (url, title));
                }
            }
            offset += line.len();
        }
        definitions
    }
}

impl Default for LinkExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// A link or citation found on one line, pending ordering
struct Candidate {
    start: usize,
    end: usize,
    kind: ElementKind,
    content: String,
    metadata: ElementMetadata,
}

impl Extractor for LinkExtractor {
    fn name(&self) -> &'static str {
        "links"
    }

    fn description(&self) -> &'static str {
        "Inline, reference, and bare links plus citations"
    }

    fn can_handle(&self, body: &str) -> bool {
        body.contains('[') || body.contains('(')
    }

    fn extract(
        &self,
        document: &Document,
        _registry: &DocumentRegistry,
    ) -> ExtractResult<Vec<ContentElement>> {
        let body = document.body();
        let base = document.body_start;
        let code = CodeSpans::scan(body);
        let definitions = Self::collect_definitions(body, &code);

        let mut elements = Vec::new();
        let mut link_index = 0;
        let mut citation_index = 0;

        let mut offset = 0;
        for line in body.split_inclusive('\n') {
            let trimmed = line.strip_suffix('\n').unwrap_or(line);
            let trimmed = trimmed.strip_suffix('\r').unwrap_or(trimmed);

            if code.in_fenced(offset) || DEFINITION_REGEX.is_match(trimmed) {
                offset += line.len();
                continue;
            }

            let mut consumed: Vec<Range<usize>> = Vec::new();
            let mut candidates: Vec<Candidate> = Vec::new();
            let overlaps = |consumed: &[Range<usize>], range: &Range<usize>| {
                consumed
                    .iter()
                    .any(|c| range.start < c.end && c.start < range.end)
            };

            // Inline links first; their text/url shape is the most specific.
            for cap in INLINE_LINK_REGEX.captures_iter(trimmed) {
                let full = cap.get(0).unwrap();
                consumed.push(full.range());
                if !cap.get(1).unwrap().as_str().is_empty() {
                    continue; // image, not a link element
                }
                if code.in_inline(offset + full.start()) {
                    continue;
                }
                let url = cap.get(3).unwrap().as_str().to_string();
                candidates.push(Candidate {
                    start: full.start(),
                    end: full.end(),
                    kind: ElementKind::Link,
                    content: cap.get(2).unwrap().as_str().to_string(),
                    metadata: ElementMetadata::Link {
                        internal: Self::is_internal(&url),
                        url,
                        title: cap.get(4).map(|m| m.as_str().to_string()),
                        style: LinkStyle::Inline,
                    },
                });
            }

            // `[@key]` citations before bare references would swallow them.
            for cap in AT_CITATION_REGEX.captures_iter(trimmed) {
                let full = cap.get(0).unwrap();
                if overlaps(&consumed, &full.range()) || code.in_inline(offset + full.start()) {
                    continue;
                }
                consumed.push(full.range());
                let key = cap.get(1).unwrap().as_str().to_string();
                candidates.push(Candidate {
                    start: full.start(),
                    end: full.end(),
                    kind: ElementKind::Citation,
                    content: key.clone(),
                    metadata: ElementMetadata::Citation { key },
                });
            }

            // Reference links `[text][key]` and shorthand `[key][]`.
            for cap in REFERENCE_LINK_REGEX.captures_iter(trimmed) {
                let full = cap.get(0).unwrap();
                if overlaps(&consumed, &full.range()) {
                    continue;
                }
                consumed.push(full.range());
                if !cap.get(1).unwrap().as_str().is_empty() {
                    continue; // image form
                }
                if code.in_inline(offset + full.start()) {
                    continue;
                }
                let text = cap.get(2).unwrap().as_str();
                let key = cap.get(3).unwrap().as_str();
                let lookup = if key.is_empty() { text } else { key };
                if let Some((url, title)) = definitions.get(&lookup.to_lowercase()) {
                    candidates.push(Candidate {
                        start: full.start(),
                        end: full.end(),
                        kind: ElementKind::Link,
                        content: text.to_string(),
                        metadata: ElementMetadata::Link {
                            url: url.clone(),
                            title: title.clone(),
                            internal: Self::is_internal(url),
                            style: LinkStyle::Reference,
                        },
                    });
                }
            }

            // Bare `[key]` references: only keys with a known definition,
            // and never inside another form or a wikilink.
            for cap in BARE_REFERENCE_REGEX.captures_iter(trimmed) {
                let full = cap.get(0).unwrap();
                if overlaps(&consumed, &full.range()) {
                    continue;
                }
                let before = trimmed[..full.start()].chars().next_back();
                let after = trimmed[full.end()..].chars().next();
                if matches!(before, Some('[') | Some('!') | Some(']')) {
                    continue;
                }
                if matches!(after, Some('(') | Some('[') | Some(':') | Some(']')) {
                    continue;
                }
                if code.in_inline(offset + full.start()) {
                    continue;
                }
                let key = cap.get(1).unwrap().as_str();
                if let Some((url, title)) = definitions.get(&key.to_lowercase()) {
                    consumed.push(full.range());
                    candidates.push(Candidate {
                        start: full.start(),
                        end: full.end(),
                        kind: ElementKind::Link,
                        content: key.to_string(),
                        metadata: ElementMetadata::Link {
                            url: url.clone(),
                            title: title.clone(),
                            internal: Self::is_internal(url),
                            style: LinkStyle::Reference,
                        },
                    });
                }
            }

            // Parenthetical citations.
            for cap in PAREN_CITATION_REGEX.captures_iter(trimmed) {
                let full = cap.get(0).unwrap();
                if overlaps(&consumed, &full.range()) || code.in_inline(offset + full.start()) {
                    continue;
                }
                let inner = cap.get(1).unwrap().as_str().to_string();
                candidates.push(Candidate {
                    start: full.start(),
                    end: full.end(),
                    kind: ElementKind::Citation,
                    content: inner.clone(),
                    metadata: ElementMetadata::Citation { key: inner },
                });
            }

            candidates.sort_by_key(|c| c.start);
            for candidate in candidates {
                let (local_id, counter) = match candidate.kind {
                    ElementKind::Citation => {
                        let id = format!("citation-{citation_index}");
                        (id, &mut citation_index)
                    }
                    _ => {
                        let id = format!("link-{link_index}");
                        (id, &mut link_index)
                    }
                };
                *counter += 1;
                elements.push(ContentElement::new(
                    local_id,
                    candidate.kind,
                    Span::new(base + offset + candidate.start, base + offset + candidate.end),
                    candidate.content,
                    candidate.metadata,
                ));
            }

            offset += line.len();
        }

        Ok(elements)
    }
}

/// Create a link extractor
pub fn create_link_extractor() -> Arc<dyn Extractor> {
    Arc::new(LinkExtractor::new())
}
