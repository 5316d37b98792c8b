//! Extractor trait and registry
//!
//! One operation per extractor: `extract(document, registry)` producing a
//! finite, ordered, materialized collection of content elements. Order
//! within one extractor's output matches document order; order across
//! extractors is registration order in the [`ExtractorRegistry`].

use crate::error::ExtractResult;
use mica_core::{ContentElement, Document, DocumentRegistry};
use std::sync::Arc;

/// A single structural extractor
///
/// Extractors are pure with respect to the document: no side effects
/// beyond reading it and (for cross-document links) querying the sealed
/// registry.
pub trait Extractor: Send + Sync {
    /// Short stable name, used in failure reports
    fn name(&self) -> &'static str;

    /// One-line description of what this extractor produces
    fn description(&self) -> &'static str;

    /// Cheap pre-check; `false` skips [`extract`](Self::extract) entirely
    fn can_handle(&self, _body: &str) -> bool {
        true
    }

    /// Extract elements from the document, in document order
    fn extract(
        &self,
        document: &Document,
        registry: &DocumentRegistry,
    ) -> ExtractResult<Vec<ContentElement>>;
}

/// Ordered collection of registered extractors
#[derive(Clone, Default)]
pub struct ExtractorRegistry {
    extractors: Vec<Arc<dyn Extractor>>,
}

impl ExtractorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in extractor, in the order
    /// their output should appear: structure first, references last.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(crate::headings::create_heading_extractor());
        registry.register(crate::lists::create_list_extractor());
        registry.register(crate::tables::create_table_extractor());
        registry.register(crate::code_blocks::create_code_block_extractor());
        registry.register(crate::blockquotes::create_blockquote_extractor());
        registry.register(crate::todos::create_todo_extractor());
        registry.register(crate::tags::create_tag_extractor());
        registry.register(crate::links::create_link_extractor());
        registry.register(crate::wikilinks::create_wikilink_extractor());
        registry
    }

    /// Append an extractor; registration order is output order
    pub fn register(&mut self, extractor: Arc<dyn Extractor>) {
        self.extractors.push(extractor);
    }

    /// Iterate extractors in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Extractor>> {
        self.extractors.iter()
    }

    /// Number of registered extractors
    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    /// Whether no extractors are registered
    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }
}

impl std::fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.extractors.iter().map(|e| e.name()))
            .finish()
    }
}
