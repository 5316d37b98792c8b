//! Content element types for extracted markdown structure
//!
//! Every structural unit an extractor produces is a [`ContentElement`]: a
//! kind tag, a byte span into the raw document text, the textual content,
//! an optional parent reference by local identifier, and kind-specific
//! metadata. Elements are stored flat per document; hierarchy is expressed
//! through `parent`, never through pointers.

use serde::{Deserialize, Serialize};

/// Half-open byte range into a document's raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Offset of the first byte of the element
    pub start: usize,
    /// Offset one past the last byte of the element
    pub end: usize,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length of the span in bytes
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span covers no bytes
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Well-formedness against the source text: `start <= end <= len`
    pub fn is_valid_for(&self, text: &str) -> bool {
        self.start <= self.end && self.end <= text.len()
    }

    /// Whether `offset` falls inside this span
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }
}

/// Element kind enumeration
///
/// Closed set of structural units the extractors can produce. The graph
/// assembler matches exhaustively on the corresponding entity kinds, so
/// adding a variant here is a compile-time-checked, localized change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    /// Heading (`#` through `######`)
    Heading,
    /// Section bounded by a heading and the next heading of equal-or-lower level
    Section,
    /// Ordered or unordered list
    List,
    /// Single list item
    ListItem,
    /// Pipe table
    Table,
    /// Fenced code block
    CodeBlock,
    /// Blockquote (`>` prefixed lines)
    Blockquote,
    /// Checkbox list item (`- [ ]` / `- [x]`)
    TodoItem,
    /// Hashtag, category, or front-matter tag
    Tag,
    /// Inline or reference-style markdown link
    Link,
    /// Parenthetical or `[@key]` citation
    Citation,
    /// Cross-document `[[target]]` link
    WikiLink,
}

impl ElementKind {
    /// Stable lowercase name, used as the kind segment of generated identifiers
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Heading => "heading",
            ElementKind::Section => "section",
            ElementKind::List => "list",
            ElementKind::ListItem => "list-item",
            ElementKind::Table => "table",
            ElementKind::CodeBlock => "code",
            ElementKind::Blockquote => "quote",
            ElementKind::TodoItem => "todo",
            ElementKind::Tag => "tag",
            ElementKind::Link => "link",
            ElementKind::Citation => "citation",
            ElementKind::WikiLink => "wikilink",
        }
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Style of a markdown link element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkStyle {
    /// `[text](url "title")`
    Inline,
    /// `[text][key]`, `[key][]`, or bare `[key]` resolved against a definition
    Reference,
}

/// Kind-specific element metadata
///
/// One variant per [`ElementKind`] that needs fields beyond content and span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ElementMetadata {
    /// Heading metadata
    Heading {
        /// Heading level (1-6)
        level: u8,
    },

    /// Section metadata
    Section {
        /// Level of the heading that opens this section
        heading_level: u8,
    },

    /// List metadata
    List {
        /// Ordered (`1.`) vs unordered (`-`/`*`/`+`)
        ordered: bool,
        /// Number of items in the list
        item_count: usize,
    },

    /// List item metadata
    ListItem {
        /// Whether the enclosing list is ordered
        ordered: bool,
        /// Nesting level derived from leading indentation (0-based)
        level: usize,
    },

    /// Table metadata
    Table {
        /// Header row cells
        headers: Vec<String>,
        /// Data rows (header row excluded)
        rows: Vec<Vec<String>>,
        /// Row count including the header row
        row_count: usize,
        /// Column count
        column_count: usize,
    },

    /// Code block metadata
    CodeBlock {
        /// Language token following the opening fence, if any
        language: Option<String>,
    },

    /// Blockquote metadata
    Blockquote {
        /// Nesting depth: count of leading `>` markers (1-based)
        depth: u8,
    },

    /// Todo item metadata
    TodoItem {
        /// Whether the checkbox is checked (`[x]` / `[X]`)
        checked: bool,
    },

    /// Tag metadata
    Tag {
        /// Tag name (word characters only)
        name: String,
        /// Category segment for `@category/tag` tokens
        category: Option<String>,
        /// `"frontmatter"` for tags read from front matter, absent otherwise
        source: Option<String>,
    },

    /// Link metadata
    Link {
        /// Link destination
        url: String,
        /// Optional title string
        title: Option<String>,
        /// True when the URL has no scheme (relative path)
        internal: bool,
        /// Inline vs reference style
        style: LinkStyle,
    },

    /// Citation metadata
    Citation {
        /// Citation key (`[@key]`) or `Author, Year` literal
        key: String,
    },

    /// Cross-document link metadata
    WikiLink {
        /// Target path as written
        target: String,
        /// Display alias after `|`, if any
        alias: Option<String>,
        /// Original literal text including brackets
        raw: String,
        /// Registry-resolved document identifier; `None` on a miss
        resolved: Option<String>,
    },
}

/// A single extracted structural unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentElement {
    /// Identifier unique within the owning document, assigned at extraction time
    pub local_id: String,

    /// Kind tag
    pub kind: ElementKind,

    /// Byte span into the raw document text
    pub span: Span,

    /// Textual content of the element
    pub content: String,

    /// Local identifier of the parent element, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    /// Kind-specific metadata
    pub metadata: ElementMetadata,
}

impl ContentElement {
    /// Create a new element with no parent
    pub fn new(
        local_id: impl Into<String>,
        kind: ElementKind,
        span: Span,
        content: impl Into<String>,
        metadata: ElementMetadata,
    ) -> Self {
        Self {
            local_id: local_id.into(),
            kind,
            span,
            content: content.into(),
            parent: None,
            metadata,
        }
    }

    /// Builder method: set the parent local identifier
    #[must_use = "builder methods consume self and return a new value"]
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Heading level if this is a heading element
    pub fn heading_level(&self) -> Option<u8> {
        match &self.metadata {
            ElementMetadata::Heading { level } => Some(*level),
            _ => None,
        }
    }

    /// Whether this element is a heading
    pub fn is_heading(&self) -> bool {
        matches!(self.kind, ElementKind::Heading)
    }
}
