//! Batch processing
//!
//! Two phases, in the order the registry contract demands:
//! 1. every document is registered (single writer), then the registry is
//!    sealed
//! 2. each document is processed against the sealed, read-only registry
//!
//! No single malformed document prevents any other document from being
//! processed and emitted; failures are counted and reported per document.

use crate::processor::{ProcessedDocument, Processor};
use mica_core::{Document, DocumentRegistry};
use tracing::{error, info};

/// One per-document failure or recorded warning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentError {
    /// Path of the affected document
    pub path: String,
    /// What went wrong
    pub message: String,
}

/// Result summary for one batch run
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Documents processed and emitted
    pub succeeded: usize,
    /// Documents excluded from the output set
    pub failed: usize,
    /// Per-document error and warning messages
    pub errors: Vec<DocumentError>,
}

impl Processor {
    /// Process a batch of documents.
    ///
    /// Returns the processed documents (failed ones excluded) together
    /// with the batch report.
    pub async fn process_batch(
        &self,
        documents: Vec<Document>,
    ) -> (Vec<ProcessedDocument>, BatchReport) {
        let mut registry = DocumentRegistry::new();
        for document in &documents {
            // The registry is fresh and unsealed; registration cannot fail.
            let uri = self.document_uri(&document.path);
            registry
                .register(document.path.clone(), uri)
                .expect("registration before sealing");
        }
        registry.seal();
        info!(documents = documents.len(), "registry sealed, processing batch");

        let mut report = BatchReport::default();
        let mut processed = Vec::with_capacity(documents.len());
        for document in documents {
            let path = document.path.clone();
            match self.process(document, &registry).await {
                Ok(result) => {
                    for warning in &result.warnings {
                        report.errors.push(DocumentError {
                            path: path.clone(),
                            message: warning.clone(),
                        });
                    }
                    report.succeeded += 1;
                    processed.push(result);
                }
                Err(err) => {
                    error!(path = %path, %err, "document failed, continuing batch");
                    report.failed += 1;
                    report.errors.push(DocumentError {
                        path,
                        message: err.to_string(),
                    });
                }
            }
        }

        (processed, report)
    }
}
