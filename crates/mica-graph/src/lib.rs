//! Mica Graph Assembly
//!
//! Maps typed entity collections onto subject-predicate-object statements
//! under a fixed vocabulary namespace, one graph per document:
//! - **vocab**: the vocabulary terms and their configurable base URI
//! - **triple**: IRI, literal, term, triple, and graph types
//! - **assembler**: polymorphic entity-to-statement mapping
//! - **turtle**: Turtle and N-Triples writers
//! - **reader**: a reader for the writer's Turtle subset, backing the
//!   round-trip guarantees
//!
//! Graphs from different documents are disjoint by construction; subjects
//! are scoped under their document's namespace segment and only cross it
//! through intentional references (resolved wikilinks, assignees).

pub mod assembler;
pub mod reader;
pub mod triple;
pub mod turtle;
pub mod vocab;

pub use assembler::GraphAssembler;
pub use reader::{read_turtle, ReadError};
pub use triple::{Graph, Iri, Literal, Term, Triple};
pub use turtle::{to_ntriples, to_turtle};
pub use vocab::Vocabulary;

use async_trait::async_trait;

/// Consumer of assembled graphs (serialization target, sync client)
///
/// Implementations own their I/O; the core hands over finished graphs and
/// nothing else.
#[async_trait]
pub trait GraphSink: Send + Sync {
    /// Accept one document's graph
    async fn publish(&self, graph: &Graph) -> anyhow::Result<()>;
}
