//! Graph assembly
//!
//! Maps one document's entity collection onto statements. Subjects are
//! resolved uniformly: an identifier carrying a scheme separator is used
//! verbatim, anything else is joined to the configured base namespace.
//! Relationship statements reference the target entity's resolved
//! identifier, never a structural pointer.

use crate::triple::{Graph, Iri, Literal, Term, Triple};
use crate::vocab::{Vocabulary, RDFS_LABEL, RDF_TYPE, XSD_DATE, XSD_DATE_TIME};
use chrono::{DateTime, Utc};
use mica_core::{identity, Entity, EntityKind, PropertyValue};
use tracing::debug;

/// Assembles entity collections into per-document graphs
#[derive(Debug, Clone)]
pub struct GraphAssembler {
    vocab: Vocabulary,
    base_namespace: String,
}

impl GraphAssembler {
    /// Create an assembler over a vocabulary and base namespace
    pub fn new(vocab: Vocabulary, base_namespace: impl Into<String>) -> Self {
        Self {
            vocab,
            base_namespace: base_namespace.into(),
        }
    }

    /// The vocabulary this assembler emits under
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Predicates whose objects change between otherwise identical runs
    pub fn volatile_predicates(&self) -> Vec<Iri> {
        vec![self.vocab.term("createdAt"), self.vocab.term("modifiedAt")]
    }

    /// Resolve an identifier to a subject/object IRI
    fn resolve(&self, id: &str) -> Iri {
        if id.contains("://") {
            Iri::new(id)
        } else {
            let base = self.base_namespace.trim_end_matches('/');
            Iri::new(format!("{base}/{}", id.trim_start_matches('/')))
        }
    }

    /// Assemble one graph for a document's entities.
    ///
    /// `mentions` pairs a wikilink entity identifier with an entity
    /// recognized in its display text.
    pub fn assemble(
        &self,
        document_uri: &str,
        entities: &[Entity],
        mentions: &[(String, String)],
    ) -> Graph {
        let mut graph = Graph::new(document_uri);

        for entity in entities {
            self.emit_entity(&mut graph, entity);
        }
        for (wikilink, entity) in mentions {
            graph.insert(Triple::new(
                self.resolve(wikilink),
                self.vocab.term("mentions"),
                Term::Iri(self.resolve(entity)),
            ));
        }

        debug!(
            document = document_uri,
            statements = graph.len(),
            "assembled graph"
        );
        graph
    }

    fn emit_entity(&self, graph: &mut Graph, entity: &Entity) {
        let subject = self.resolve(&entity.id);

        // Statements common to all entities.
        graph.insert(Triple::new(
            subject.clone(),
            Iri::new(RDF_TYPE),
            Term::Iri(self.vocab.class(type_name(&entity.kind))),
        ));
        if let Some(label) = &entity.label {
            graph.insert(Triple::new(
                subject.clone(),
                Iri::new(RDFS_LABEL),
                Term::string(label.clone()),
            ));
        }
        if let Some(source) = &entity.source_document {
            graph.insert(Triple::new(
                subject.clone(),
                self.vocab.term("inDocument"),
                Term::Iri(self.resolve(source)),
            ));
        }
        if let Some(span) = &entity.span {
            graph.insert(Triple::new(
                subject.clone(),
                self.vocab.term("spanStart"),
                Term::Literal(Literal::integer(span.start as i64)),
            ));
            graph.insert(Triple::new(
                subject.clone(),
                self.vocab.term("spanEnd"),
                Term::Literal(Literal::integer(span.end as i64)),
            ));
        }
        graph.insert(self.timestamp(&subject, "createdAt", entity.created_at));
        graph.insert(self.timestamp(&subject, "modifiedAt", entity.modified_at));

        // Kind-specific statements, matched exhaustively.
        match &entity.kind {
            EntityKind::Document { path, properties } => {
                graph.insert(Triple::new(
                    subject.clone(),
                    self.vocab.term("path"),
                    Term::string(path.clone()),
                ));
                for property in properties {
                    let predicate = self.vocab.property(&identity::slug_or_unnamed(
                        &property.key,
                        "property",
                    ));
                    graph.insert(Triple::new(
                        subject.clone(),
                        predicate,
                        property_term(&property.value),
                    ));
                }
            }
            EntityKind::Heading { level, parent } => {
                self.emit_integer(graph, &subject, "level", *level as i64);
                if let Some(parent) = parent {
                    graph.insert(Triple::new(
                        subject.clone(),
                        self.vocab.term("parentHeading"),
                        Term::Iri(self.resolve(parent)),
                    ));
                }
            }
            EntityKind::Section {
                heading,
                heading_level,
            } => {
                self.emit_integer(graph, &subject, "level", *heading_level as i64);
                if let Some(heading) = heading {
                    graph.insert(Triple::new(
                        subject.clone(),
                        self.vocab.term("belongsToHeading"),
                        Term::Iri(self.resolve(heading)),
                    ));
                }
            }
            EntityKind::List {
                ordered,
                item_count,
            } => {
                self.emit_boolean(graph, &subject, "ordered", *ordered);
                self.emit_integer(graph, &subject, "itemCount", *item_count as i64);
            }
            EntityKind::ListItem { level, list } => {
                self.emit_integer(graph, &subject, "level", *level as i64);
                if let Some(list) = list {
                    graph.insert(Triple::new(
                        subject.clone(),
                        self.vocab.term("inList"),
                        Term::Iri(self.resolve(list)),
                    ));
                }
            }
            EntityKind::Table {
                headers,
                row_count,
                column_count,
            } => {
                self.emit_integer(graph, &subject, "rowCount", *row_count as i64);
                self.emit_integer(graph, &subject, "columnCount", *column_count as i64);
                for header in headers {
                    graph.insert(Triple::new(
                        subject.clone(),
                        self.vocab.term("header"),
                        Term::string(header.clone()),
                    ));
                }
            }
            EntityKind::CodeBlock { language } => {
                if let Some(language) = language {
                    graph.insert(Triple::new(
                        subject.clone(),
                        self.vocab.term("language"),
                        Term::string(language.clone()),
                    ));
                }
            }
            EntityKind::Quote { depth } => {
                self.emit_integer(graph, &subject, "depth", *depth as i64);
            }
            EntityKind::Todo {
                description,
                completed,
                due,
                priority,
                assignees,
            } => {
                graph.insert(Triple::new(
                    subject.clone(),
                    self.vocab.term("description"),
                    Term::string(description.clone()),
                ));
                self.emit_boolean(graph, &subject, "completed", *completed);
                if let Some(due) = due {
                    graph.insert(Triple::new(
                        subject.clone(),
                        self.vocab.term("dueDate"),
                        Term::Literal(Literal::typed(due.format("%Y-%m-%d").to_string(), XSD_DATE)),
                    ));
                }
                if let Some(priority) = priority {
                    graph.insert(Triple::new(
                        subject.clone(),
                        self.vocab.term("priority"),
                        Term::string(priority.clone()),
                    ));
                }
                for assignee in assignees {
                    // Resolved like any subject: scheme kept verbatim,
                    // bare names joined to the namespace.
                    graph.insert(Triple::new(
                        subject.clone(),
                        self.vocab.term("assignedTo"),
                        Term::Iri(self.resolve(&format!("people/{}", identity::slug_or_unnamed(assignee, "person")))),
                    ));
                }
            }
            EntityKind::Tag { name, category } => {
                graph.insert(Triple::new(
                    subject.clone(),
                    self.vocab.term("tagName"),
                    Term::string(name.clone()),
                ));
                if let Some(category) = category {
                    graph.insert(Triple::new(
                        subject.clone(),
                        self.vocab.term("category"),
                        Term::string(category.clone()),
                    ));
                }
            }
            EntityKind::Link {
                url,
                title,
                internal,
            } => {
                if let Some(url) = url {
                    graph.insert(Triple::new(
                        subject.clone(),
                        self.vocab.term("url"),
                        Term::string(url.clone()),
                    ));
                }
                if let Some(title) = title {
                    graph.insert(Triple::new(
                        subject.clone(),
                        self.vocab.term("title"),
                        Term::string(title.clone()),
                    ));
                }
                self.emit_boolean(graph, &subject, "internal", *internal);
            }
            EntityKind::Citation { key } => {
                graph.insert(Triple::new(
                    subject.clone(),
                    self.vocab.term("citationKey"),
                    Term::string(key.clone()),
                ));
            }
            EntityKind::WikiLink {
                target,
                alias,
                resolved,
            } => {
                graph.insert(Triple::new(
                    subject.clone(),
                    self.vocab.term("target"),
                    Term::string(target.clone()),
                ));
                if let Some(alias) = alias {
                    graph.insert(Triple::new(
                        subject.clone(),
                        self.vocab.term("alias"),
                        Term::string(alias.clone()),
                    ));
                }
                if let Some(resolved) = resolved {
                    graph.insert(Triple::new(
                        subject.clone(),
                        self.vocab.term("resolvesTo"),
                        Term::Iri(self.resolve(resolved)),
                    ));
                }
            }
            EntityKind::Person { name, aliases } => {
                graph.insert(Triple::new(
                    subject.clone(),
                    self.vocab.term("name"),
                    Term::string(name.clone()),
                ));
                for alias in aliases {
                    graph.insert(Triple::new(
                        subject.clone(),
                        self.vocab.term("alias"),
                        Term::string(alias.clone()),
                    ));
                }
            }
            EntityKind::Named { label } => {
                graph.insert(Triple::new(
                    subject.clone(),
                    self.vocab.term("entityLabel"),
                    Term::string(label.clone()),
                ));
            }
        }
    }

    fn timestamp(&self, subject: &Iri, term: &str, at: DateTime<Utc>) -> Triple {
        Triple::new(
            subject.clone(),
            self.vocab.term(term),
            Term::Literal(Literal::typed(at.to_rfc3339(), XSD_DATE_TIME)),
        )
    }

    fn emit_integer(&self, graph: &mut Graph, subject: &Iri, term: &str, value: i64) {
        graph.insert(Triple::new(
            subject.clone(),
            self.vocab.term(term),
            Term::Literal(Literal::integer(value)),
        ));
    }

    fn emit_boolean(&self, graph: &mut Graph, subject: &Iri, term: &str, value: bool) {
        graph.insert(Triple::new(
            subject.clone(),
            self.vocab.term(term),
            Term::Literal(Literal::boolean(value)),
        ));
    }
}

/// Class name for an entity kind
fn type_name(kind: &EntityKind) -> &'static str {
    match kind {
        EntityKind::Document { .. } => "Document",
        EntityKind::Heading { .. } => "Heading",
        EntityKind::Section { .. } => "Section",
        EntityKind::List { .. } => "List",
        EntityKind::ListItem { .. } => "ListItem",
        EntityKind::Table { .. } => "Table",
        EntityKind::CodeBlock { .. } => "CodeBlock",
        EntityKind::Quote { .. } => "Quote",
        EntityKind::Todo { .. } => "Todo",
        EntityKind::Tag { .. } => "Tag",
        EntityKind::Link { .. } => "Link",
        EntityKind::Citation { .. } => "Citation",
        EntityKind::WikiLink { .. } => "WikiLink",
        EntityKind::Person { .. } => "Person",
        EntityKind::Named { .. } => "NamedEntity",
    }
}

/// Object term for a typed front-matter property value
fn property_term(value: &PropertyValue) -> Term {
    match value {
        PropertyValue::Text(text) => Term::string(text.clone()),
        PropertyValue::Number(n) => Term::Literal(Literal::typed(
            n.to_string(),
            "http://www.w3.org/2001/XMLSchema#double",
        )),
        PropertyValue::Bool(b) => Term::Literal(Literal::boolean(*b)),
        PropertyValue::Date(d) => {
            Term::Literal(Literal::typed(d.format("%Y-%m-%d").to_string(), XSD_DATE))
        }
        PropertyValue::Json(json) => Term::string(json.to_string()),
    }
}
