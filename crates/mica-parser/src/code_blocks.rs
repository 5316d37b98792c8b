//! Fenced code block extraction
//!
//! Blocks fenced by triple backticks. The language is the token
//! immediately following the opening fence on the same line, absent when
//! the info string is empty. Indented code blocks are not elements; they
//! only participate in the code mask.

use crate::error::ExtractResult;
use crate::extractor::Extractor;
use mica_core::{ContentElement, Document, DocumentRegistry, ElementKind, ElementMetadata, Span};
use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};
use std::sync::Arc;

/// Code block extractor
pub struct CodeBlockExtractor;

impl CodeBlockExtractor {
    /// Create a new code block extractor
    pub fn new() -> Self {
        Self
    }
}

impl Default for CodeBlockExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for CodeBlockExtractor {
    fn name(&self) -> &'static str {
        "code-blocks"
    }

    fn description(&self) -> &'static str {
        "Triple-backtick fenced code blocks with language tokens"
    }

    fn can_handle(&self, body: &str) -> bool {
        body.contains("```")
    }

    fn extract(
        &self,
        document: &Document,
        _registry: &DocumentRegistry,
    ) -> ExtractResult<Vec<ContentElement>> {
        let body = document.body();
        let base = document.body_start;

        let mut elements = Vec::new();
        let mut index = 0;
        let mut current: Option<(Span, Option<String>, String)> = None;

        for (event, range) in Parser::new(body).into_offset_iter() {
            match event {
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                    // The Start range covers the whole fenced block.
                    let language = info
                        .split_whitespace()
                        .next()
                        .map(|token| token.to_string());
                    let end = range.end.min(body.len());
                    let span = Span::new(base + range.start, base + end);
                    current = Some((span, language, String::new()));
                }
                Event::Text(text) => {
                    if let Some((_, _, code)) = current.as_mut() {
                        code.push_str(&text);
                    }
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((span, language, code)) = current.take() {
                        elements.push(ContentElement::new(
                            format!("code-{index}"),
                            ElementKind::CodeBlock,
                            span,
                            code,
                            ElementMetadata::CodeBlock { language },
                        ));
                        index += 1;
                    }
                }
                _ => {}
            }
        }

        Ok(elements)
    }
}

/// Create a code block extractor
pub fn create_code_block_extractor() -> Arc<dyn Extractor> {
    Arc::new(CodeBlockExtractor::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(content: &str) -> Vec<ContentElement> {
        let doc = Document::new("test.md", content);
        CodeBlockExtractor::new()
            .extract(&doc, &DocumentRegistry::new())
            .unwrap()
    }

    #[test]
    fn test_language_token() {
        let elements = extract("```rust\nlet x = 42;\n```\n");
        assert_eq!(elements.len(), 1);
        assert!(matches!(
            &elements[0].metadata,
            ElementMetadata::CodeBlock { language: Some(lang) } if lang == "rust"
        ));
        assert_eq!(elements[0].content, "let x = 42;\n");
    }

    #[test]
    fn test_no_language() {
        let elements = extract("```\nplain\n```\n");
        assert!(matches!(
            &elements[0].metadata,
            ElementMetadata::CodeBlock { language: None }
        ));
    }

    #[test]
    fn test_only_first_info_token_is_language() {
        let elements = extract("```python linenums\nprint()\n```\n");
        assert!(matches!(
            &elements[0].metadata,
            ElementMetadata::CodeBlock { language: Some(lang) } if lang == "python"
        ));
    }

    #[test]
    fn test_multiple_blocks() {
        let elements = extract("```a\n1\n```\n\ntext\n\n```b\n2\n```\n");
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].local_id, "code-0");
        assert_eq!(elements[1].local_id, "code-1");
    }

    #[test]
    fn test_indented_code_is_not_an_element() {
        let elements = extract("para\n\n    indented code\n");
        assert!(elements.is_empty());
    }

    #[test]
    fn test_span_covers_fences() {
        let content = "before\n```rust\ncode\n```\nafter\n";
        let elements = extract(content);
        let span = elements[0].span;
        let text = &content[span.start..span.end];
        assert!(text.starts_with("```rust"));
        assert!(text.contains("code"));
    }
}
