//! Collaborator traits
//!
//! The pipeline's external collaborators are injected as trait objects so
//! the merge/dedup logic stays independently testable:
//! - [`EntityRecognizer`]: the natural-language entity-recognition service
//! - [`DocumentStore`]: the persistence consumer with its round-trip
//!   contract
//!
//! Both are blocking, stateless-per-call operations from the core's point
//! of view; implementations own their I/O.

use crate::entity::Entity;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

/// One named-entity span returned by recognition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedSpan {
    /// Matched text
    pub text: String,
    /// Open-ended short label (person, organization, place, date, ...)
    pub label: String,
    /// Start character offset into the recognized text
    pub start: usize,
    /// End character offset (half-open)
    pub end: usize,
    /// Optional model confidence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

/// Entity-recognition collaborator
///
/// Must be safe to call repeatedly with identical input; the core does not
/// memoize. May return an empty sequence. A failing implementation is
/// treated as "no entities found" by the processor, never as fatal.
#[async_trait]
pub trait EntityRecognizer: Send + Sync {
    /// Recognize named entities in `text`, in document order
    async fn recognize(&self, text: &str) -> anyhow::Result<Vec<RecognizedSpan>>;
}

/// Recognizer that finds nothing; the default when no model is wired up
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRecognizer;

#[async_trait]
impl EntityRecognizer for NullRecognizer {
    async fn recognize(&self, _text: &str) -> anyhow::Result<Vec<RecognizedSpan>> {
        Ok(Vec::new())
    }
}

/// Per-document shape handed to the persistence store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Document identifier (URI)
    pub document_id: String,
    /// Resolved display title
    pub title: Option<String>,
    /// Tag names attached to the document
    pub tags: Vec<String>,
    /// Outgoing link URLs
    pub links: Vec<String>,
    /// Outgoing cross-document link targets
    pub wikilinks: Vec<String>,
    /// Full entity list
    pub entities: Vec<Entity>,
}

/// Persistence consumer
///
/// Round-trip contract: `get` returns the same shape `store` was given.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persist one document's record, replacing any previous version
    async fn store(&self, record: DocumentRecord) -> anyhow::Result<()>;

    /// Fetch a record by document identifier
    async fn get(&self, document_id: &str) -> anyhow::Result<Option<DocumentRecord>>;
}

/// In-memory store used by tests and small runs
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    records: RwLock<HashMap<String, DocumentRecord>>,
}

impl InMemoryDocumentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.read().expect("store lock poisoned").len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn store(&self, record: DocumentRecord) -> anyhow::Result<()> {
        self.records
            .write()
            .expect("store lock poisoned")
            .insert(record.document_id.clone(), record);
        Ok(())
    }

    async fn get(&self, document_id: &str) -> anyhow::Result<Option<DocumentRecord>> {
        Ok(self
            .records
            .read()
            .expect("store lock poisoned")
            .get(document_id)
            .cloned())
    }
}
