//! Turtle and N-Triples writers
//!
//! Turtle output binds the vocabulary prefix plus the standard `rdf`,
//! `rdfs`, and `xsd` prefixes, groups statements by subject, and uses
//! `;` continuation. N-Triples output is one fully-expanded statement
//! per line for consumers that want the lowest common denominator.

use crate::triple::{Graph, Iri, Literal, Term};
use crate::vocab::{Vocabulary, XSD_BASE};
use std::fmt::Write;

const RDF_BASE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
const RDFS_BASE: &str = "http://www.w3.org/2000/01/rdf-schema#";

/// Serialize a graph as Turtle with the vocabulary prefix bound
pub fn to_turtle(graph: &Graph, vocab: &Vocabulary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "@prefix {}: <{}> .", vocab.prefix(), vocab.base());
    let _ = writeln!(out, "@prefix rdf: <{RDF_BASE}> .");
    let _ = writeln!(out, "@prefix rdfs: <{RDFS_BASE}> .");
    let _ = writeln!(out, "@prefix xsd: <{XSD_BASE}> .");

    for subject in graph.subjects() {
        let _ = writeln!(out);
        let statements: Vec<_> = graph.iter().filter(|t| &t.subject == subject).collect();
        let _ = writeln!(out, "{}", iri_text(subject, vocab));
        for (i, triple) in statements.iter().enumerate() {
            let terminator = if i + 1 == statements.len() { "." } else { ";" };
            let _ = writeln!(
                out,
                "    {} {} {terminator}",
                iri_text(&triple.predicate, vocab),
                term_text(&triple.object, vocab),
            );
        }
    }
    out
}

/// Serialize a graph as N-Triples
pub fn to_ntriples(graph: &Graph) -> String {
    let mut out = String::new();
    for triple in graph.iter() {
        let object = match &triple.object {
            Term::Iri(iri) => format!("<{iri}>"),
            Term::Literal(literal) => literal_text(literal, None),
        };
        let _ = writeln!(
            out,
            "<{}> <{}> {object} .",
            triple.subject, triple.predicate
        );
    }
    out
}

/// An IRI as a prefixed name when a known prefix covers it, else `<...>`
fn iri_text(iri: &Iri, vocab: &Vocabulary) -> String {
    for (base, prefix) in [
        (vocab.base(), vocab.prefix()),
        (RDF_BASE, "rdf"),
        (RDFS_BASE, "rdfs"),
        (XSD_BASE, "xsd"),
    ] {
        if let Some(local) = iri.as_str().strip_prefix(base) {
            if is_safe_local(local) {
                return format!("{prefix}:{local}");
            }
        }
    }
    format!("<{iri}>")
}

/// Local names safe to emit without escaping
fn is_safe_local(local: &str) -> bool {
    !local.is_empty()
        && !local.starts_with('-')
        && local
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

fn term_text(term: &Term, vocab: &Vocabulary) -> String {
    match term {
        Term::Iri(iri) => iri_text(iri, vocab),
        Term::Literal(literal) => literal_text(literal, Some(vocab)),
    }
}

fn literal_text(literal: &Literal, vocab: Option<&Vocabulary>) -> String {
    let escaped = escape_literal(&literal.value);
    match &literal.datatype {
        None => format!("\"{escaped}\""),
        Some(datatype) => {
            let datatype_text = match vocab {
                Some(vocab) => iri_text(datatype, vocab),
                None => format!("<{datatype}>"),
            };
            format!("\"{escaped}\"^^{datatype_text}")
        }
    }
}

/// Escape a literal for double-quoted form
pub(crate) fn escape_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}
