//! Mica Core
//!
//! Core domain model for the mica knowledge extraction pipeline:
//! - Content element model (structural units extracted from markdown)
//! - Entity model (the exported, identifier-addressed layer)
//! - Deterministic identifier generation
//! - Document registry for cross-document link resolution
//! - Front matter handling
//! - Collaborator traits (entity recognition, document store)
//!
//! This crate has no knowledge of extraction or graph assembly; it defines
//! the types those layers exchange.

pub mod document;
pub mod element;
pub mod entity;
pub mod frontmatter;
pub mod identity;
pub mod registry;
pub mod traits;

// Re-export main types for convenience
pub use document::Document;
pub use element::{ContentElement, ElementKind, ElementMetadata, LinkStyle, Span};
pub use entity::{Entity, EntityKind, Property, PropertyValue};
pub use frontmatter::{FrontMatter, FrontMatterFormat};
pub use registry::{DocumentRegistry, RegistryError};
pub use traits::{
    DocumentRecord, DocumentStore, EntityRecognizer, InMemoryDocumentStore, NullRecognizer,
    RecognizedSpan,
};
