//! Document registry
//!
//! Lookup table from document path (and path-without-extension) to the
//! document's generated identifier. The registry is two-phase: a single
//! writer populates it for every document in the run, then [`seal`]s it
//! before any cross-document link extraction begins. After sealing it is
//! read-only; a lookup miss at extraction time is permanent for the run.
//!
//! [`seal`]: DocumentRegistry::seal

use std::collections::HashMap;
use thiserror::Error;

/// Registry error type
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Registration attempted after the registry was sealed
    #[error("registry is sealed; cannot register '{0}'")]
    Sealed(String),
}

/// Path → document identifier lookup table
#[derive(Debug, Default, Clone)]
pub struct DocumentRegistry {
    entries: HashMap<String, String>,
    sealed: bool,
}

impl DocumentRegistry {
    /// Create an empty, unsealed registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document under its path and its stem.
    ///
    /// Idempotent: re-registering the same path overwrites silently.
    /// Fails once the registry has been sealed.
    pub fn register(
        &mut self,
        path: impl Into<String>,
        document_id: impl Into<String>,
    ) -> Result<(), RegistryError> {
        let path = path.into();
        if self.sealed {
            return Err(RegistryError::Sealed(path));
        }
        let document_id = document_id.into();
        let stem = stem_of(&path).to_string();
        if stem != path {
            self.entries.insert(stem, document_id.clone());
        }
        self.entries.insert(path, document_id);
        Ok(())
    }

    /// Exact-match lookup by path or by path-without-extension.
    ///
    /// No fuzzy or partial matching; no normalization beyond the stem key
    /// stored at registration time.
    pub fn find_by_path(&self, path_or_stem: &str) -> Option<&str> {
        self.entries.get(path_or_stem).map(String::as_str)
    }

    /// Mark the registry resolution-ready. Further registration is
    /// rejected; concurrent reads need no coordination from here on.
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    /// Whether [`seal`](Self::seal) has been called
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Number of lookup keys (paths plus distinct stems)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Path with a trailing extension stripped; dots in directory names are
/// left alone.
fn stem_of(path: &str) -> &str {
    match path.rfind('.') {
        Some(idx) if !path[idx + 1..].contains('/') => &path[..idx],
        _ => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_find() {
        let mut registry = DocumentRegistry::new();
        registry.register("notes/adr-001.md", "doc1").unwrap();

        assert_eq!(registry.find_by_path("notes/adr-001.md"), Some("doc1"));
        assert_eq!(registry.find_by_path("notes/adr-001"), Some("doc1"));
        assert_eq!(registry.find_by_path("adr-001"), None);
        assert_eq!(registry.find_by_path("missing-doc"), None);
    }

    #[test]
    fn test_reregistration_overwrites() {
        let mut registry = DocumentRegistry::new();
        registry.register("a.md", "first").unwrap();
        registry.register("a.md", "second").unwrap();
        assert_eq!(registry.find_by_path("a.md"), Some("second"));
        assert_eq!(registry.find_by_path("a"), Some("second"));
    }

    #[test]
    fn test_sealed_rejects_registration() {
        let mut registry = DocumentRegistry::new();
        registry.register("a.md", "doc-a").unwrap();
        registry.seal();
        assert!(registry.is_sealed());

        let err = registry.register("b.md", "doc-b").unwrap_err();
        assert!(matches!(err, RegistryError::Sealed(path) if path == "b.md"));

        // Reads keep working after sealing
        assert_eq!(registry.find_by_path("a.md"), Some("doc-a"));
    }

    #[test]
    fn test_no_fuzzy_matching() {
        let mut registry = DocumentRegistry::new();
        registry.register("notes/adr-001.md", "doc1").unwrap();
        assert_eq!(registry.find_by_path("ADR-001"), None);
        assert_eq!(registry.find_by_path("notes/adr-001.MD"), None);
    }

    #[test]
    fn test_dotted_directory_names() {
        let mut registry = DocumentRegistry::new();
        registry.register("v1.2/readme", "doc").unwrap();
        assert_eq!(registry.find_by_path("v1.2/readme"), Some("doc"));
        assert_eq!(registry.len(), 1);
    }
}
