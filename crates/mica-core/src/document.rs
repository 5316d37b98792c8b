//! Document: the unit of input
//!
//! A document is created when a file is read, mutated by the processor
//! (title resolution, element collection population), and immutable once
//! handed to the graph assembler.

use crate::element::ContentElement;
use crate::frontmatter::FrontMatter;
use serde::{Deserialize, Serialize};

/// A single markdown document under processing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Path of the source file; unique key within a processing run
    pub path: String,

    /// Raw text content, front matter included
    pub content: String,

    /// Resolved display title, set by the processor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Parsed front matter, if the document carries any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub front_matter: Option<FrontMatter>,

    /// Byte offset where the body begins (0 when there is no front matter)
    pub body_start: usize,

    /// Extracted elements, in extractor-registration then document order
    pub elements: Vec<ContentElement>,
}

impl Document {
    /// Create a document from a path and its raw text.
    ///
    /// Front matter is split off immediately so extractors can operate on
    /// the body. A malformed front matter block is treated as absent; the
    /// full text then counts as body.
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        let (front_matter, body_start) = FrontMatter::extract(&content);
        Self {
            path: path.into(),
            content,
            title: None,
            front_matter,
            body_start,
            elements: Vec::new(),
        }
    }

    /// The document body: everything after the front matter block
    pub fn body(&self) -> &str {
        &self.content[self.body_start..]
    }

    /// Path without its final extension, used for resolution-by-stem
    pub fn stem(&self) -> &str {
        match self.path.rfind('.') {
            // A dot inside the final path segment strips the extension
            Some(idx) if !self.path[idx + 1..].contains('/') => &self.path[..idx],
            _ => &self.path,
        }
    }

    /// Human-readable form of the filename: final segment, extension
    /// stripped, `-`/`_` separators replaced by spaces
    pub fn humanized_filename(&self) -> String {
        let stem = self.stem();
        let name = stem.rsplit('/').next().unwrap_or(stem);
        name.replace(['-', '_'], " ").trim().to_string()
    }
}
