//! Entity layer: the exported, identifier-addressed model
//!
//! Every structural element, tag, link, and recognized name becomes an
//! [`Entity`]: a global identifier, timestamps, an optional label, the
//! owning document's URI, the originating span, and a kind-specific
//! payload. The kind payload is a closed sum type so the graph assembler
//! can match exhaustively.
//!
//! Ownership: an entity belongs to exactly one source document. A wikilink
//! entity may additionally hold the URI of the document it resolves to;
//! that is a weak reference denoting relation, not lifetime.

use crate::element::Span;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Typed property value carried on a document entity
///
/// Front-matter values are mapped here with light type inference: dates in
/// `YYYY-MM-DD` form become [`PropertyValue::Date`], everything structured
/// stays JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    /// Plain text
    Text(String),
    /// Numeric value
    Number(f64),
    /// Boolean flag
    Bool(bool),
    /// Calendar date
    Date(NaiveDate),
    /// Structured value kept as JSON
    Json(Value),
}

impl PropertyValue {
    /// Infer a typed value from a JSON front-matter value
    pub fn infer(value: &Value) -> Self {
        match value {
            Value::String(s) => {
                if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                    return PropertyValue::Date(date);
                }
                if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                    return PropertyValue::Date(dt.date_naive());
                }
                PropertyValue::Text(s.clone())
            }
            Value::Number(n) => PropertyValue::Number(n.as_f64().unwrap_or(0.0)),
            Value::Bool(b) => PropertyValue::Bool(*b),
            Value::Null => PropertyValue::Text(String::new()),
            Value::Array(_) | Value::Object(_) => PropertyValue::Json(value.clone()),
        }
    }
}

/// Named key/value property on a document entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// Property key as written in front matter
    pub key: String,
    /// Inferred value
    pub value: PropertyValue,
}

/// Kind-specific entity payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    /// The document itself
    Document {
        /// Source file path
        path: String,
        /// Front-matter properties beyond title/tags
        properties: Vec<Property>,
    },

    /// Heading entity
    Heading {
        /// Heading level (1-6)
        level: u8,
        /// Identifier of the parent heading, if nested
        parent: Option<String>,
    },

    /// Section bounded by its heading
    Section {
        /// Identifier of the owning heading
        heading: Option<String>,
        /// Level of the owning heading
        heading_level: u8,
    },

    /// List entity
    List {
        /// Ordered vs unordered
        ordered: bool,
        /// Number of items
        item_count: usize,
    },

    /// List item entity
    ListItem {
        /// Nesting level (0-based)
        level: usize,
        /// Identifier of the enclosing list
        list: Option<String>,
    },

    /// Table entity
    Table {
        /// Header cells
        headers: Vec<String>,
        /// Row count including the header row
        row_count: usize,
        /// Column count
        column_count: usize,
    },

    /// Code block entity
    CodeBlock {
        /// Language token, if any
        language: Option<String>,
    },

    /// Blockquote entity
    Quote {
        /// Nesting depth (1-based)
        depth: u8,
    },

    /// Task-like entity
    Todo {
        /// Task description with inline markers stripped
        description: String,
        /// Completion flag
        completed: bool,
        /// Optional due date parsed from a `due:YYYY-MM-DD` marker
        due: Option<NaiveDate>,
        /// Optional priority parsed from a `priority:<word>` marker
        priority: Option<String>,
        /// Assignee identifiers parsed from `@name` markers
        assignees: Vec<String>,
    },

    /// Tag entity
    Tag {
        /// Tag name
        name: String,
        /// Category for `@category/tag` tokens
        category: Option<String>,
    },

    /// Markdown link entity
    Link {
        /// Destination URL, when known
        url: Option<String>,
        /// Title string, if any
        title: Option<String>,
        /// True when the URL has no scheme
        internal: bool,
    },

    /// Citation entity
    Citation {
        /// Citation key or `Author, Year` literal
        key: String,
    },

    /// Cross-document link entity
    WikiLink {
        /// Target path as written
        target: String,
        /// Display alias, if any
        alias: Option<String>,
        /// Resolved document URI; weak reference, `None` on a miss
        resolved: Option<String>,
    },

    /// Person-like entity from recognition
    Person {
        /// Full name as recognized
        name: String,
        /// Alternate names
        aliases: Vec<String>,
    },

    /// Generic recognized entity
    Named {
        /// Recognizer label (organization, place, date, ...)
        label: String,
    },
}

impl EntityKind {
    /// Stable lowercase kind name, matching the identifier kind segment
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Document { .. } => "document",
            EntityKind::Heading { .. } => "heading",
            EntityKind::Section { .. } => "section",
            EntityKind::List { .. } => "list",
            EntityKind::ListItem { .. } => "list-item",
            EntityKind::Table { .. } => "table",
            EntityKind::CodeBlock { .. } => "code",
            EntityKind::Quote { .. } => "quote",
            EntityKind::Todo { .. } => "todo",
            EntityKind::Tag { .. } => "tag",
            EntityKind::Link { .. } => "link",
            EntityKind::Citation { .. } => "citation",
            EntityKind::WikiLink { .. } => "wikilink",
            EntityKind::Person { .. } => "person",
            EntityKind::Named { .. } => "entity",
        }
    }
}

/// An exported entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Global identifier (URI string); deterministic for unchanged input
    pub id: String,

    /// Creation timestamp of this in-memory record
    pub created_at: DateTime<Utc>,

    /// Modification timestamp of this in-memory record
    pub modified_at: DateTime<Utc>,

    /// Human-readable label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// URI of the owning source document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_document: Option<String>,

    /// Originating byte span in the source document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,

    /// Kind-specific payload
    pub kind: EntityKind,
}

impl Entity {
    /// Create a new entity stamped with the current time
    pub fn new(id: impl Into<String>, kind: EntityKind) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            created_at: now,
            modified_at: now,
            label: None,
            source_document: None,
            span: None,
            kind,
        }
    }

    /// Builder method: set the label
    #[must_use = "builder methods consume self and return a new value"]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Builder method: set the owning document URI
    #[must_use = "builder methods consume self and return a new value"]
    pub fn with_source_document(mut self, uri: impl Into<String>) -> Self {
        self.source_document = Some(uri.into());
        self
    }

    /// Builder method: set the originating span
    #[must_use = "builder methods consume self and return a new value"]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_inference() {
        assert_eq!(
            PropertyValue::infer(&Value::String("2024-03-01".into())),
            PropertyValue::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
        );
        assert_eq!(
            PropertyValue::infer(&Value::String("plain".into())),
            PropertyValue::Text("plain".into())
        );
        assert_eq!(PropertyValue::infer(&Value::Bool(true)), PropertyValue::Bool(true));
        assert!(matches!(
            PropertyValue::infer(&serde_json::json!([1, 2])),
            PropertyValue::Json(_)
        ));
    }

    #[test]
    fn test_entity_builder() {
        let entity = Entity::new(
            "https://kb.example.org/documents/a.md/todo/fix-the-bug",
            EntityKind::Todo {
                description: "Fix the bug".into(),
                completed: false,
                due: None,
                priority: None,
                assignees: Vec::new(),
            },
        )
        .with_label("Fix the bug")
        .with_source_document("https://kb.example.org/documents/a.md")
        .with_span(Span::new(10, 32));

        assert_eq!(entity.kind.as_str(), "todo");
        assert_eq!(entity.label.as_deref(), Some("Fix the bug"));
        assert!(entity.span.is_some());
    }
}
