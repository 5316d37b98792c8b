//! Triple and graph types
//!
//! Plain owned data: an IRI newtype, literals with optional datatype,
//! terms, triples, and the per-document graph. No blank nodes exist in
//! this model, so graph isomorphism reduces to set equality over
//! canonicalized statements.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// An IRI reference
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Iri(String);

impl Iri {
    /// Wrap an IRI string
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The IRI as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Iri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Iri {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A literal value with an optional datatype
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Literal {
    /// Lexical value
    pub value: String,
    /// Datatype IRI; plain string when absent
    pub datatype: Option<Iri>,
}

impl Literal {
    /// Plain string literal
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: None,
        }
    }

    /// Typed literal
    pub fn typed(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: Some(Iri::new(datatype)),
        }
    }

    /// `xsd:integer` literal
    pub fn integer(value: i64) -> Self {
        Self::typed(value.to_string(), crate::vocab::XSD_INTEGER)
    }

    /// `xsd:boolean` literal
    pub fn boolean(value: bool) -> Self {
        Self::typed(value.to_string(), crate::vocab::XSD_BOOLEAN)
    }
}

/// Object position of a statement
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Term {
    /// IRI object
    Iri(Iri),
    /// Literal object
    Literal(Literal),
}

impl Term {
    /// IRI term from a string
    pub fn iri(value: impl Into<String>) -> Self {
        Term::Iri(Iri::new(value))
    }

    /// Plain string literal term
    pub fn string(value: impl Into<String>) -> Self {
        Term::Literal(Literal::string(value))
    }
}

/// One subject-predicate-object statement
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Triple {
    /// Subject IRI
    pub subject: Iri,
    /// Predicate IRI
    pub predicate: Iri,
    /// Object term
    pub object: Term,
}

impl Triple {
    /// Create a statement
    pub fn new(subject: Iri, predicate: Iri, object: Term) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }
}

/// One document's statement set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    /// URI of the document this graph was assembled from
    pub document_uri: String,
    triples: Vec<Triple>,
}

impl Graph {
    /// Empty graph for a document
    pub fn new(document_uri: impl Into<String>) -> Self {
        Self {
            document_uri: document_uri.into(),
            triples: Vec::new(),
        }
    }

    /// Append a statement, skipping exact duplicates
    pub fn insert(&mut self, triple: Triple) {
        if !self.triples.contains(&triple) {
            self.triples.push(triple);
        }
    }

    /// Statements in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Number of statements
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Whether the graph holds no statements
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Subjects in first-appearance order, deduplicated
    pub fn subjects(&self) -> Vec<&Iri> {
        let mut seen = BTreeSet::new();
        let mut out = Vec::new();
        for triple in &self.triples {
            if seen.insert(&triple.subject) {
                out.push(&triple.subject);
            }
        }
        out
    }

    /// Canonical statement set, with statements under any of the ignored
    /// predicates dropped
    fn canonical(&self, ignored_predicates: &[&Iri]) -> BTreeSet<&Triple> {
        self.triples
            .iter()
            .filter(|t| !ignored_predicates.contains(&&t.predicate))
            .collect()
    }

    /// Set equality over statements, ignoring the given predicates.
    ///
    /// Without blank nodes this is exactly graph isomorphism.
    pub fn is_isomorphic_ignoring(&self, other: &Graph, ignored_predicates: &[&Iri]) -> bool {
        self.canonical(ignored_predicates) == other.canonical(ignored_predicates)
    }
}
