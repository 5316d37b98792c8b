//! Mica Processing Pipeline
//!
//! Orchestration layer between extraction and graph assembly:
//!
//! 1. **Register**: every document in the run is entered into the
//!    document registry, which is then sealed
//! 2. **Extract**: all registered extractors run over each document
//! 3. **Recognize**: the injected entity-recognition collaborator is
//!    invoked on the body and on cross-document link labels
//! 4. **Convert**: the merged element collection becomes the typed
//!    entity collection, identifiers assigned deterministically
//!
//! The pipeline coordinates; extraction and identity logic live in
//! `mica-parser` and `mica-core`. A failure in one extractor or one
//! document never aborts the rest of the batch.

pub mod batch;
pub mod config;
pub mod processor;

pub use batch::{BatchReport, DocumentError};
pub use config::ProcessorConfig;
pub use processor::{LinkMention, ProcessedDocument, Processor};
