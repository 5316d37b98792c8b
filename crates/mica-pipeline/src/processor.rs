//! Document processor
//!
//! Runs every registered extractor over a document, resolves the display
//! title, invokes the entity-recognition collaborator, merges and
//! deduplicates its output, and converts the element collection into the
//! typed entity collection with deterministic identifiers.

use crate::config::ProcessorConfig;
use anyhow::Result;
use mica_core::{
    identity, ContentElement, Document, DocumentRecord, DocumentRegistry, ElementKind,
    ElementMetadata, Entity, EntityKind, EntityRecognizer, Property, PropertyValue, RecognizedSpan,
    Span,
};
use mica_parser::ExtractorRegistry;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, LazyLock};
use tracing::{debug, warn};

static DUE_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"due:(\d{4}-\d{2}-\d{2})").expect("due marker regex"));

static PRIORITY_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"priority:([A-Za-z0-9]+)").expect("priority marker regex"));

static ASSIGNEE_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([A-Za-z0-9_-]+)").expect("assignee marker regex"));

/// Association between a wikilink entity and an entity recognized in its
/// display text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkMention {
    /// Identifier of the wikilink entity
    pub wikilink: String,
    /// Identifier of the recognized entity
    pub entity: String,
}

/// Output of processing one document
#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    /// The document, title resolved and elements populated
    pub document: Document,
    /// Generated document identifier
    pub document_uri: String,
    /// Typed entity collection, document entity first
    pub entities: Vec<Entity>,
    /// Wikilink-label recognition results
    pub link_mentions: Vec<LinkMention>,
    /// Non-fatal problems recorded against this document
    pub warnings: Vec<String>,
}

impl ProcessedDocument {
    /// Shape this result for the persistence store
    pub fn to_record(&self) -> DocumentRecord {
        let mut tags = Vec::new();
        let mut links = Vec::new();
        let mut wikilinks = Vec::new();
        for entity in &self.entities {
            match &entity.kind {
                EntityKind::Tag { name, .. } => tags.push(name.clone()),
                EntityKind::Link { url: Some(url), .. } => links.push(url.clone()),
                EntityKind::WikiLink { target, .. } => wikilinks.push(target.clone()),
                _ => {}
            }
        }
        DocumentRecord {
            document_id: self.document_uri.clone(),
            title: self.document.title.clone(),
            tags,
            links,
            wikilinks,
            entities: self.entities.clone(),
        }
    }
}

/// The document processor
///
/// Extractors and the recognizer are injected; the processor owns only
/// the merge, dedup, and conversion logic.
pub struct Processor {
    extractors: ExtractorRegistry,
    recognizer: Arc<dyn EntityRecognizer>,
    config: ProcessorConfig,
}

impl Processor {
    /// Create a processor with the default extractor set and config
    pub fn new(recognizer: Arc<dyn EntityRecognizer>) -> Self {
        Self::with_config(
            ExtractorRegistry::with_defaults(),
            recognizer,
            ProcessorConfig::default(),
        )
    }

    /// Create a processor with explicit extractors and config
    pub fn with_config(
        extractors: ExtractorRegistry,
        recognizer: Arc<dyn EntityRecognizer>,
        config: ProcessorConfig,
    ) -> Self {
        Self {
            extractors,
            recognizer,
            config,
        }
    }

    /// Identifier for a document path under this processor's namespace
    pub fn document_uri(&self, path: &str) -> String {
        identity::document_uri(&self.config.base_namespace, path)
    }

    /// Process one document against a sealed registry.
    ///
    /// Extractor failures and recognizer failures are recorded as warnings
    /// and do not fail the document; only a panic-free total conversion
    /// remains, so the result is `Err` only for unrecoverable conditions.
    pub async fn process(
        &self,
        mut document: Document,
        registry: &DocumentRegistry,
    ) -> Result<ProcessedDocument> {
        let document_uri = self.document_uri(&document.path);
        debug!(path = %document.path, "processing document");

        // Title precedence: front matter, then humanized filename.
        let resolved_title = document
            .front_matter
            .as_ref()
            .and_then(|fm| fm.title())
            .or_else(|| Some(document.humanized_filename()).filter(|t| !t.is_empty()));
        document.title = resolved_title;

        // Run every extractor; a failing one is skipped, not fatal.
        let mut warnings = Vec::new();
        let mut elements = Vec::new();
        for extractor in self.extractors.iter() {
            if !extractor.can_handle(document.body()) {
                continue;
            }
            match extractor.extract(&document, registry) {
                Ok(mut extracted) => elements.append(&mut extracted),
                Err(err) => {
                    let message = format!("extractor '{}' failed: {err}", extractor.name());
                    warn!(path = %document.path, %err, extractor = extractor.name(), "extractor failed");
                    warnings.push(message);
                }
            }
        }
        document.elements = elements;

        // Convert elements into entities, parents preserved by identifier.
        let mut entities = self.convert_elements(&document, &document_uri);

        // Recognition over the full body; a failing collaborator counts as
        // "no entities found".
        let body_spans = match self.recognizer.recognize(document.body()).await {
            Ok(spans) => spans,
            Err(err) => {
                warn!(path = %document.path, %err, "entity recognition failed, continuing without");
                warnings.push(format!("entity recognition failed: {err}"));
                Vec::new()
            }
        };

        let char_to_byte: Vec<usize> = document.body().char_indices().map(|(b, _)| b).collect();
        let byte_at = |char_offset: usize| -> usize {
            char_to_byte
                .get(char_offset)
                .copied()
                .unwrap_or_else(|| document.body().len())
        };

        let mut seen_texts: HashSet<String> = HashSet::new();
        let mut seen_ids: HashSet<String> = entities.iter().map(|e| e.id.clone()).collect();
        for span in &body_spans {
            // Dedup by exact text equality: already-present text is not
            // re-added.
            if !seen_texts.insert(span.text.clone()) {
                continue;
            }
            let entity = self.recognized_entity(
                span,
                &document_uri,
                Span::new(
                    document.body_start + byte_at(span.start),
                    document.body_start + byte_at(span.end),
                ),
            );
            if seen_ids.insert(entity.id.clone()) {
                entities.push(entity);
            }
        }

        // Recognition over each wikilink's display text, attached to the
        // originating link.
        let mut link_mentions = Vec::new();
        let wikilinks: Vec<(String, String, Span)> = document
            .elements
            .iter()
            .filter(|e| e.kind == ElementKind::WikiLink)
            .map(|e| {
                let id = identity::entity_uri(&document_uri, e.kind.as_str(), &wikilink_discriminator(e));
                (id, e.content.clone(), e.span)
            })
            .collect();

        for (wikilink_id, label, span) in wikilinks {
            let label_spans = match self.recognizer.recognize(&label).await {
                Ok(spans) => spans,
                Err(err) => {
                    warn!(path = %document.path, %err, "recognition failed for link label");
                    Vec::new()
                }
            };
            for recognized in &label_spans {
                let entity = self.recognized_entity(recognized, &document_uri, span);
                link_mentions.push(LinkMention {
                    wikilink: wikilink_id.clone(),
                    entity: entity.id.clone(),
                });
                if seen_ids.insert(entity.id.clone()) {
                    entities.push(entity);
                }
            }
        }

        Ok(ProcessedDocument {
            document,
            document_uri,
            entities,
            link_mentions,
            warnings,
        })
    }

    /// Build the entity for one recognized span
    fn recognized_entity(&self, span: &RecognizedSpan, document_uri: &str, origin: Span) -> Entity {
        let person_like = matches!(span.label.to_lowercase().as_str(), "person" | "per");
        let (kind_segment, kind) = if person_like {
            (
                "person",
                EntityKind::Person {
                    name: span.text.clone(),
                    aliases: Vec::new(),
                },
            )
        } else {
            (
                "entity",
                EntityKind::Named {
                    label: span.label.clone(),
                },
            )
        };
        Entity::new(identity::entity_uri(document_uri, kind_segment, &span.text), kind)
            .with_label(span.text.clone())
            .with_source_document(document_uri)
            .with_span(origin)
    }

    /// Convert the element collection into entities.
    ///
    /// Identifier assignment happens in a first pass so parent references
    /// can be mapped from local identifiers in the second.
    fn convert_elements(&self, document: &Document, document_uri: &str) -> Vec<Entity> {
        let by_local_id: HashMap<&str, &ContentElement> = document
            .elements
            .iter()
            .map(|e| (e.local_id.as_str(), e))
            .collect();

        let mut id_map: HashMap<&str, String> = HashMap::new();
        for element in &document.elements {
            let discriminator = element_discriminator(element, &by_local_id);
            id_map.insert(
                element.local_id.as_str(),
                identity::entity_uri(document_uri, element.kind.as_str(), &discriminator),
            );
        }

        let mut entities = Vec::with_capacity(document.elements.len() + 1);
        entities.push(self.document_entity(document, document_uri));

        for element in &document.elements {
            let id = id_map[element.local_id.as_str()].clone();
            let parent_id = element
                .parent
                .as_deref()
                .and_then(|p| id_map.get(p).cloned());

            let kind = match &element.metadata {
                ElementMetadata::Heading { level } => EntityKind::Heading {
                    level: *level,
                    parent: parent_id,
                },
                ElementMetadata::Section { heading_level } => EntityKind::Section {
                    heading: parent_id,
                    heading_level: *heading_level,
                },
                ElementMetadata::List { ordered, item_count } => EntityKind::List {
                    ordered: *ordered,
                    item_count: *item_count,
                },
                ElementMetadata::ListItem { level, .. } => EntityKind::ListItem {
                    level: *level,
                    list: parent_id,
                },
                ElementMetadata::Table {
                    headers,
                    row_count,
                    column_count,
                    ..
                } => EntityKind::Table {
                    headers: headers.clone(),
                    row_count: *row_count,
                    column_count: *column_count,
                },
                ElementMetadata::CodeBlock { language } => EntityKind::CodeBlock {
                    language: language.clone(),
                },
                ElementMetadata::Blockquote { depth } => EntityKind::Quote { depth: *depth },
                ElementMetadata::TodoItem { checked } => {
                    let markers = TodoMarkers::parse(&element.content);
                    EntityKind::Todo {
                        description: markers.description,
                        completed: *checked,
                        due: markers.due,
                        priority: markers.priority,
                        assignees: markers.assignees,
                    }
                }
                ElementMetadata::Tag { name, category, .. } => EntityKind::Tag {
                    name: name.clone(),
                    category: category.clone(),
                },
                ElementMetadata::Link { url, title, internal, .. } => EntityKind::Link {
                    url: Some(url.clone()),
                    title: title.clone(),
                    internal: *internal,
                },
                ElementMetadata::Citation { key } => EntityKind::Citation { key: key.clone() },
                ElementMetadata::WikiLink {
                    target,
                    alias,
                    resolved,
                    ..
                } => EntityKind::WikiLink {
                    target: target.clone(),
                    alias: alias.clone(),
                    resolved: resolved.clone(),
                },
            };

            let label = element_label(element);
            let mut entity = Entity::new(id, kind)
                .with_source_document(document_uri)
                .with_span(element.span);
            if !label.is_empty() {
                entity = entity.with_label(label);
            }
            entities.push(entity);
        }

        entities
    }

    /// The document's own entity, carrying its typed front-matter
    /// properties (title and tag keys excluded; those surface elsewhere)
    fn document_entity(&self, document: &Document, document_uri: &str) -> Entity {
        let properties: Vec<Property> = document
            .front_matter
            .as_ref()
            .map(|fm| {
                fm.properties
                    .iter()
                    .filter(|(key, _)| !matches!(key.as_str(), "title" | "tags" | "categories"))
                    .map(|(key, value)| Property {
                        key: key.clone(),
                        value: PropertyValue::infer(value),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let mut entity = Entity::new(
            document_uri,
            EntityKind::Document {
                path: document.path.clone(),
                properties,
            },
        )
        .with_span(Span::new(0, document.content.len()));
        if let Some(title) = &document.title {
            entity = entity.with_label(title.clone());
        }
        entity
    }
}

/// Markers parsed out of a todo's text
struct TodoMarkers {
    description: String,
    due: Option<chrono::NaiveDate>,
    priority: Option<String>,
    assignees: Vec<String>,
}

impl TodoMarkers {
    fn parse(text: &str) -> Self {
        let due = DUE_MARKER_REGEX
            .captures(text)
            .and_then(|cap| chrono::NaiveDate::parse_from_str(&cap[1], "%Y-%m-%d").ok());
        let priority = PRIORITY_MARKER_REGEX
            .captures(text)
            .map(|cap| cap[1].to_lowercase());

        let mut assignees = Vec::new();
        for m in ASSIGNEE_MARKER_REGEX.find_iter(text) {
            // `@category/tag` tokens belong to the tag extractor
            if text[m.end()..].starts_with('/') {
                continue;
            }
            assignees.push(text[m.start() + 1..m.end()].to_string());
        }

        let mut description = DUE_MARKER_REGEX.replace_all(text, "").to_string();
        description = PRIORITY_MARKER_REGEX.replace_all(&description, "").to_string();
        for assignee in &assignees {
            description = description.replace(&format!("@{assignee}"), "");
        }
        let description = description.split_whitespace().collect::<Vec<_>>().join(" ");

        Self {
            description,
            due,
            priority,
            assignees,
        }
    }
}

/// Discriminator text feeding identifier generation for one element
fn element_discriminator(
    element: &ContentElement,
    by_local_id: &HashMap<&str, &ContentElement>,
) -> String {
    match &element.metadata {
        // Sections are addressed by their heading's text
        ElementMetadata::Section { .. } => element
            .parent
            .as_deref()
            .and_then(|p| by_local_id.get(p))
            .map(|heading| heading.content.clone())
            .unwrap_or_default(),
        // Structure without usable text is addressed positionally
        ElementMetadata::List { .. } | ElementMetadata::CodeBlock { .. } => {
            element.local_id.clone()
        }
        ElementMetadata::Table { headers, .. } => headers.join(" "),
        ElementMetadata::Tag { name, .. } => name.clone(),
        ElementMetadata::Citation { key } => key.clone(),
        ElementMetadata::WikiLink { .. } => wikilink_discriminator(element),
        ElementMetadata::TodoItem { .. } => TodoMarkers::parse(&element.content).description,
        ElementMetadata::Link { url, .. } => {
            if element.content.is_empty() {
                url.clone()
            } else {
                element.content.clone()
            }
        }
        _ => element.content.clone(),
    }
}

fn wikilink_discriminator(element: &ContentElement) -> String {
    match &element.metadata {
        ElementMetadata::WikiLink { target, .. } => target.clone(),
        _ => element.content.clone(),
    }
}

/// Label shown for an element's entity
fn element_label(element: &ContentElement) -> String {
    match &element.metadata {
        ElementMetadata::Tag { name, .. } => name.clone(),
        ElementMetadata::Section { .. } => String::new(),
        ElementMetadata::TodoItem { .. } => element.content.clone(),
        _ => element.content.clone(),
    }
}
