//! Tag extraction
//!
//! Three independent sources produce the same element kind:
//! 1. Hashtag tokens `#word`, accepted only at start of line or after
//!    whitespace, with the tag text being the maximal run of ASCII word
//!    characters after `#`. Occurrences inside code, link URLs, or title
//!    strings are rejected.
//! 2. Category tokens `@category/tag`, yielding one tag named after the
//!    segment past the `/` with the category carried as metadata.
//! 3. Front matter `tags`/`categories` keys, marked `source = "frontmatter"`.
//!
//! A line opening with `#` runs and a space is a heading, not a hashtag.
//! The degenerate single-`#` form is the exception: `# hashtag` yields the
//! tag `hashtag` when the token is an all-lowercase word. Bracketed tokens
//! like `[Conversion]` are not tags.

use crate::code_spans::CodeSpans;
use crate::error::ExtractResult;
use crate::extractor::Extractor;
use mica_core::{ContentElement, Document, DocumentRegistry, ElementKind, ElementMetadata, Span};
use regex::Regex;
use std::ops::Range;
use std::sync::{Arc, LazyLock};

static HASHTAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([A-Za-z0-9_]+)").expect("hashtag regex"));

static CATEGORY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([A-Za-z0-9_]+)/([A-Za-z0-9_]+)").expect("category regex"));

static HEADING_LINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#+[ \t]").expect("heading line regex"));

// Single `#`, whitespace, then a lowercase word token: the one heading
// shape that doubles as a tag.
static DEGENERATE_HEADING_TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[ \t]+([a-z0-9_]+)([ \t]|$)").expect("degenerate heading regex"));

// URL-and-title portion of an inline link or image: `](...)`.
static LINK_TARGET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\]\([^)]*\)").expect("link target regex"));

// Reference definition line: `[key]: url "title"`.
static REF_DEF_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*\[[^\]]+\]:").expect("reference definition regex"));

/// Tag extractor
pub struct TagExtractor;

impl TagExtractor {
    /// Create a new tag extractor
    pub fn new() -> Self {
        Self
    }

    /// Whether the character before `pos` permits a tag to start there
    fn preceded_by_boundary(line: &str, pos: usize) -> bool {
        if pos == 0 {
            return true;
        }
        line[..pos]
            .chars()
            .next_back()
            .map(char::is_whitespace)
            .unwrap_or(true)
    }

    fn in_ranges(ranges: &[Range<usize>], pos: usize) -> bool {
        ranges.iter().any(|r| r.contains(&pos))
    }
}

impl Default for TagExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for TagExtractor {
    fn name(&self) -> &'static str {
        "tags"
    }

    fn description(&self) -> &'static str {
        "Hashtags, @category/tag tokens, and front matter tags"
    }

    fn can_handle(&self, _body: &str) -> bool {
        // Front matter alone can carry tags, so there is no cheap skip.
        true
    }

    fn extract(
        &self,
        document: &Document,
        _registry: &DocumentRegistry,
    ) -> ExtractResult<Vec<ContentElement>> {
        let mut elements = Vec::new();
        let mut index = 0;

        let mut push = |name: &str, category: Option<String>, source: Option<String>, span: Span| {
            elements.push(ContentElement::new(
                format!("tag-{index}"),
                ElementKind::Tag,
                span,
                name,
                ElementMetadata::Tag {
                    name: name.to_string(),
                    category,
                    source,
                },
            ));
            index += 1;
        };

        // Source 3 first: front matter tags precede the body.
        if let Some(front_matter) = &document.front_matter {
            for key in ["tags", "categories"] {
                for name in front_matter.string_list(key) {
                    push(&name, None, Some("frontmatter".to_string()), Span::new(0, 0));
                }
            }
        }

        let body = document.body();
        let base = document.body_start;
        let code = CodeSpans::scan(body);

        let mut offset = 0;
        for line in body.split_inclusive('\n') {
            let trimmed = line.strip_suffix('\n').unwrap_or(line);
            let trimmed = trimmed.strip_suffix('\r').unwrap_or(trimmed);

            // URL and title portions never carry tags.
            if REF_DEF_REGEX.is_match(trimmed) {
                offset += line.len();
                continue;
            }
            let excluded: Vec<Range<usize>> = LINK_TARGET_REGEX
                .find_iter(trimmed)
                .map(|m| m.range())
                .collect();

            if HEADING_LINE_REGEX.is_match(trimmed) {
                if !code.in_fenced(offset) {
                    if let Some(cap) = DEGENERATE_HEADING_TAG_REGEX.captures(trimmed) {
                        let token = cap.get(1).unwrap();
                        let span =
                            Span::new(base + offset + token.start(), base + offset + token.end());
                        push(token.as_str(), None, None, span);
                    }
                }
            }

            // Source 1: inline hashtags.
            for cap in HASHTAG_REGEX.captures_iter(trimmed) {
                let full = cap.get(0).unwrap();
                let absolute = base + offset + full.start();

                if !Self::preceded_by_boundary(trimmed, full.start()) {
                    continue;
                }
                if code.contains(absolute - base) {
                    continue;
                }
                if Self::in_ranges(&excluded, full.start()) {
                    continue;
                }

                let name = cap.get(1).unwrap().as_str();
                push(
                    name,
                    None,
                    None,
                    Span::new(absolute, absolute + full.as_str().len()),
                );
            }

            // Source 2: category tokens. One tag per token, named after the
            // segment past the slash.
            for cap in CATEGORY_REGEX.captures_iter(trimmed) {
                let full = cap.get(0).unwrap();
                let absolute = base + offset + full.start();

                if !Self::preceded_by_boundary(trimmed, full.start()) {
                    continue;
                }
                if code.contains(absolute - base) || Self::in_ranges(&excluded, full.start()) {
                    continue;
                }

                let category = cap.get(1).unwrap().as_str().to_string();
                let name = cap.get(2).unwrap().as_str();
                push(
                    name,
                    Some(category),
                    None,
                    Span::new(absolute, absolute + full.as_str().len()),
                );
            }

            offset += line.len();
        }

        Ok(elements)
    }
}

/// Create a tag extractor
pub fn create_tag_extractor() -> Arc<dyn Extractor> {
    Arc::new(TagExtractor::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn tag_names(content: &str) -> Vec<String> {
        let doc = Document::new("test.md", content);
        TagExtractor::new()
            .extract(&doc, &DocumentRegistry::new())
            .unwrap()
            .into_iter()
            .map(|e| match e.metadata {
                ElementMetadata::Tag { name, .. } => name,
                _ => panic!("expected tag metadata"),
            })
            .collect()
    }

    // The fixture table: these rows are authoritative.
    #[test_case("#hashtag", &["hashtag"]; "plain hashtag")]
    #[test_case("#HasHTAg", &["HasHTAg"]; "case preserved")]
    #[test_case("#t-a_g", &["t"]; "hyphen stops the word run")]
    #[test_case("#äöüß", &[]; "non ascii letters rejected")]
    #[test_case("#<3", &[]; "symbol after hash rejected")]
    #[test_case("word#notatag", &[]; "preceded by word character")]
    #[test_case("# hashtag", &["hashtag"]; "degenerate heading form")]
    #[test_case("  [Conversion]  ", &[]; "bracketed token is not a tag")]
    #[test_case("`#foo`", &[]; "inline code rejected")]
    #[test_case("```\n#foo\n```", &[]; "fenced code rejected")]
    #[test_case("[link](https://example.com#foo)", &[]; "url fragment rejected")]
    #[test_case("![image](assets/#foo.png)", &[]; "image url rejected")]
    #[test_case("[link](https://example.com \"about #foo\")", &[]; "title rejected")]
    fn test_hashtag_fixtures(content: &str, expected: &[&str]) {
        assert_eq!(tag_names(content), expected);
    }

    #[test]
    fn test_heading_title_is_not_a_tag() {
        assert_eq!(tag_names("# Title"), Vec::<String>::new());
        assert_eq!(tag_names("## hashtag"), Vec::<String>::new());
    }

    #[test]
    fn test_hashtag_after_whitespace() {
        assert_eq!(tag_names("fix this #urgent today"), vec!["urgent"]);
        assert_eq!(tag_names("two #a #b"), vec!["a", "b"]);
    }

    #[test]
    fn test_category_token_yields_one_tag() {
        let doc = Document::new("test.md", "filed under @work/report today");
        let elements = TagExtractor::new()
            .extract(&doc, &DocumentRegistry::new())
            .unwrap();
        assert_eq!(elements.len(), 1);
        match &elements[0].metadata {
            ElementMetadata::Tag { name, category, source } => {
                assert_eq!(name, "report");
                assert_eq!(category.as_deref(), Some("work"));
                assert!(source.is_none());
            }
            _ => panic!("expected tag metadata"),
        }
    }

    #[test]
    fn test_front_matter_tags() {
        let content = "---\ntags:\n  - alpha\n  - beta\ncategories: ops\n---\nbody\n";
        let doc = Document::new("test.md", content);
        let elements = TagExtractor::new()
            .extract(&doc, &DocumentRegistry::new())
            .unwrap();
        assert_eq!(elements.len(), 3);
        for element in &elements {
            match &element.metadata {
                ElementMetadata::Tag { source, .. } => {
                    assert_eq!(source.as_deref(), Some("frontmatter"));
                }
                _ => panic!("expected tag metadata"),
            }
        }
    }

    #[test]
    fn test_reference_definition_line_rejected() {
        assert_eq!(tag_names("[key]: https://example.com#foo \"t\""), Vec::<String>::new());
    }

    #[test]
    fn test_tag_spans() {
        let content = "note #urgent now\n";
        let doc = Document::new("test.md", content);
        let elements = TagExtractor::new()
            .extract(&doc, &DocumentRegistry::new())
            .unwrap();
        let span = elements[0].span;
        assert_eq!(&content[span.start..span.end], "#urgent");
    }
}
