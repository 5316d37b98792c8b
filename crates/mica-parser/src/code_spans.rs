//! Code span mask
//!
//! Several extractors must ignore matches that fall inside code: hashtags
//! in a fenced block are not tags, `[[links]]` in inline code are not
//! links. This module computes the byte ranges of fenced code blocks and
//! inline code spans once per document so those extractors share one
//! consistent notion of "inside code".

use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag};
use std::ops::Range;

/// Byte ranges of code within a document body
#[derive(Debug, Clone, Default)]
pub struct CodeSpans {
    fenced: Vec<Range<usize>>,
    inline: Vec<Range<usize>>,
}

impl CodeSpans {
    /// Scan `body` and record every fenced block and inline code span.
    ///
    /// Offsets are relative to `body`.
    pub fn scan(body: &str) -> Self {
        let mut fenced = Vec::new();
        let mut inline = Vec::new();

        for (event, range) in Parser::new(body).into_offset_iter() {
            match event {
                // The range of a Start event covers the whole element.
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(_)))
                | Event::Start(Tag::CodeBlock(CodeBlockKind::Indented)) => {
                    fenced.push(range);
                }
                Event::Code(_) => inline.push(range),
                _ => {}
            }
        }

        Self { fenced, inline }
    }

    /// Whether `offset` falls inside a fenced (or indented) code block
    pub fn in_fenced(&self, offset: usize) -> bool {
        self.fenced.iter().any(|r| r.contains(&offset))
    }

    /// Whether `offset` falls inside an inline code span
    pub fn in_inline(&self, offset: usize) -> bool {
        self.inline.iter().any(|r| r.contains(&offset))
    }

    /// Whether `offset` falls inside any code
    pub fn contains(&self, offset: usize) -> bool {
        self.in_fenced(offset) || self.in_inline(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_block_detected() {
        let body = "before\n```rust\nlet x = 1; // #nottag\n```\nafter\n";
        let spans = CodeSpans::scan(body);

        let inside = body.find("#nottag").unwrap();
        assert!(spans.in_fenced(inside));
        assert!(spans.contains(inside));
        assert!(!spans.contains(body.find("before").unwrap()));
        assert!(!spans.contains(body.find("after").unwrap()));
    }

    #[test]
    fn test_inline_code_detected() {
        let body = "text `#nottag` more #realtag\n";
        let spans = CodeSpans::scan(body);

        assert!(spans.in_inline(body.find("#nottag").unwrap()));
        assert!(!spans.contains(body.find("#realtag").unwrap()));
    }

    #[test]
    fn test_no_code() {
        let spans = CodeSpans::scan("plain text only\n");
        assert!(!spans.contains(0));
        assert!(!spans.contains(5));
    }
}
