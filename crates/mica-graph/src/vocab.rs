//! Vocabulary terms
//!
//! The vocabulary base URI is external, versioned configuration: it is
//! never computed by the assembler and may be overridden through the
//! environment. Term and class names themselves are fixed; every graph in
//! a deployment shares them.

use crate::triple::Iri;

/// Default vocabulary base URI
pub const DEFAULT_VOCABULARY_BASE: &str = "https://mica.example.org/vocab#";

/// Environment variable overriding the vocabulary base
pub const VOCABULARY_BASE_ENV: &str = "MICA_VOCABULARY_BASE";

/// Standard RDF `type` predicate
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

/// Standard RDFS `label` predicate
pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";

/// XSD namespace
pub const XSD_BASE: &str = "http://www.w3.org/2001/XMLSchema#";

/// `xsd:integer`
pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";

/// `xsd:boolean`
pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";

/// `xsd:date`
pub const XSD_DATE: &str = "http://www.w3.org/2001/XMLSchema#date";

/// `xsd:dateTime`
pub const XSD_DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";

/// The fixed vocabulary bound to a configurable base URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    base: String,
    prefix: String,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_VOCABULARY_BASE)
    }
}

impl Vocabulary {
    /// Vocabulary under an explicit base URI
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            prefix: "mica".to_string(),
        }
    }

    /// Default vocabulary with the `MICA_VOCABULARY_BASE` environment
    /// override applied when present
    pub fn from_env() -> Self {
        match std::env::var(VOCABULARY_BASE_ENV) {
            Ok(value) if !value.trim().is_empty() => Self::new(value.trim()),
            _ => Self::default(),
        }
    }

    /// The base URI this vocabulary is bound to
    pub fn base(&self) -> &str {
        &self.base
    }

    /// The prefix bound in serialized output
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// A predicate term under this vocabulary
    pub fn term(&self, local: &str) -> Iri {
        Iri::new(format!("{}{local}", self.base))
    }

    /// A class term under this vocabulary
    pub fn class(&self, name: &str) -> Iri {
        Iri::new(format!("{}{name}", self.base))
    }

    /// Predicate for one named front-matter property
    pub fn property(&self, key_slug: &str) -> Iri {
        Iri::new(format!("{}property-{key_slug}", self.base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terms_share_the_base() {
        let vocab = Vocabulary::new("https://vocab.example/v1#");
        assert_eq!(vocab.term("level").as_str(), "https://vocab.example/v1#level");
        assert_eq!(vocab.class("Heading").as_str(), "https://vocab.example/v1#Heading");
        assert_eq!(
            vocab.property("due-date").as_str(),
            "https://vocab.example/v1#property-due-date"
        );
    }

    #[test]
    fn test_default_base() {
        assert_eq!(Vocabulary::default().base(), DEFAULT_VOCABULARY_BASE);
        assert_eq!(Vocabulary::default().prefix(), "mica");
    }
}
