//! End-to-end pipeline tests: raw text through extraction, recognition,
//! entity conversion, graph assembly, and serialization.

use mica_core::{
    Document, DocumentStore, Entity, EntityKind, InMemoryDocumentStore, NullRecognizer,
};
use mica_graph::{read_turtle, to_turtle, GraphAssembler, Iri, Vocabulary};
use mica_pipeline::{Processor, ProcessorConfig};
use mica_parser::ExtractorRegistry;
use std::sync::Arc;

fn processor() -> Processor {
    Processor::with_config(
        ExtractorRegistry::with_defaults(),
        Arc::new(NullRecognizer),
        ProcessorConfig::new("https://kb.example.org"),
    )
}

fn entities_of<'a>(entities: &'a [Entity], pred: impl Fn(&EntityKind) -> bool) -> Vec<&'a Entity> {
    entities.iter().filter(|e| pred(&e.kind)).collect()
}

#[tokio::test]
async fn test_end_to_end_scenario() {
    // One heading, a section under it, two todos, one tag.
    let content = "# Title\n\n- [ ] Task A\n- [x] Task B\n\n#urgent";
    let processor = processor();
    let (processed, report) = processor
        .process_batch(vec![Document::new("doc1", content)])
        .await;

    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failed, 0);
    let doc = &processed[0];

    let headings = entities_of(&doc.entities, |k| matches!(k, EntityKind::Heading { .. }));
    assert_eq!(headings.len(), 1);
    assert_eq!(headings[0].label.as_deref(), Some("Title"));
    match &headings[0].kind {
        EntityKind::Heading { level, parent } => {
            assert_eq!(*level, 1);
            assert!(parent.is_none());
        }
        _ => unreachable!(),
    }

    let sections = entities_of(&doc.entities, |k| matches!(k, EntityKind::Section { .. }));
    assert_eq!(sections.len(), 1);
    match &sections[0].kind {
        EntityKind::Section { heading, .. } => {
            assert_eq!(heading.as_deref(), Some(headings[0].id.as_str()));
        }
        _ => unreachable!(),
    }

    let todos = entities_of(&doc.entities, |k| matches!(k, EntityKind::Todo { .. }));
    assert_eq!(todos.len(), 2);
    match (&todos[0].kind, &todos[1].kind) {
        (
            EntityKind::Todo {
                description: a,
                completed: done_a,
                ..
            },
            EntityKind::Todo {
                description: b,
                completed: done_b,
                ..
            },
        ) => {
            assert_eq!(a, "Task A");
            assert!(!done_a);
            assert_eq!(b, "Task B");
            assert!(*done_b);
        }
        _ => unreachable!(),
    }

    let tags = entities_of(&doc.entities, |k| matches!(k, EntityKind::Tag { .. }));
    assert_eq!(tags.len(), 1);
    match &tags[0].kind {
        EntityKind::Tag { name, .. } => assert_eq!(name, "urgent"),
        _ => unreachable!(),
    }

    // The graph carries a type statement and a label statement for each.
    let vocab = Vocabulary::default();
    let assembler = GraphAssembler::new(vocab.clone(), "https://kb.example.org");
    let mentions: Vec<(String, String)> = doc
        .link_mentions
        .iter()
        .map(|m| (m.wikilink.clone(), m.entity.clone()))
        .collect();
    let graph = assembler.assemble(&doc.document_uri, &doc.entities, &mentions);

    let type_predicate = Iri::new(mica_graph::vocab::RDF_TYPE);
    let label_predicate = Iri::new(mica_graph::vocab::RDFS_LABEL);
    for entity in &doc.entities {
        let subject = Iri::new(entity.id.clone());
        assert!(
            graph
                .iter()
                .any(|t| t.subject == subject && t.predicate == type_predicate),
            "missing type statement for {}",
            entity.id
        );
    }
    for entity in headings.iter().chain(todos.iter()).chain(tags.iter()) {
        let subject = Iri::new(entity.id.clone());
        let expected = entity.label.clone().unwrap();
        assert!(
            graph.iter().any(|t| t.subject == subject
                && t.predicate == label_predicate
                && matches!(&t.object, mica_graph::Term::Literal(l) if l.value == expected)),
            "missing label statement for {}",
            entity.id
        );
    }
}

#[tokio::test]
async fn test_identifiers_are_deterministic_across_runs() {
    let content = "# Planning\n\n- [ ] Fix  the   bug!\n#urgent\n";
    let processor = processor();

    let (first, _) = processor
        .process_batch(vec![Document::new("notes/a.md", content)])
        .await;
    let (second, _) = processor
        .process_batch(vec![Document::new("notes/a.md", content)])
        .await;

    let ids = |docs: &[mica_pipeline::ProcessedDocument]| -> Vec<String> {
        docs[0].entities.iter().map(|e| e.id.clone()).collect()
    };
    assert_eq!(ids(&first), ids(&second));

    // The normalized todo identifier matches its hand-written form.
    assert!(ids(&first)
        .iter()
        .any(|id| id == "https://kb.example.org/documents/notes/a.md/todo/fix-the-bug"));
}

#[tokio::test]
async fn test_turtle_round_trip_ignoring_timestamps() {
    let content = "# Notes\n\nSee [[other]] and call [home](tel:123).\n\n- [x] Done due:2024-02-02\n";
    let processor = processor();
    let (processed, _) = processor
        .process_batch(vec![
            Document::new("other.md", "# Other\n"),
            Document::new("notes.md", content),
        ])
        .await;

    let vocab = Vocabulary::default();
    let assembler = GraphAssembler::new(vocab.clone(), "https://kb.example.org");

    for doc in &processed {
        let graph = assembler.assemble(&doc.document_uri, &doc.entities, &[]);
        let turtle = to_turtle(&graph, &vocab);
        let reread = read_turtle(&turtle).expect("writer output parses");

        let volatile = assembler.volatile_predicates();
        let ignored: Vec<&Iri> = volatile.iter().collect();
        assert!(
            graph.is_isomorphic_ignoring(&reread, &ignored),
            "round trip changed the graph for {}",
            doc.document.path
        );
    }
}

#[tokio::test]
async fn test_graphs_are_disjoint_per_document() {
    let processor = processor();
    let (processed, _) = processor
        .process_batch(vec![
            Document::new("a.md", "# Same Heading\n"),
            Document::new("b.md", "# Same Heading\n"),
        ])
        .await;

    let vocab = Vocabulary::default();
    let assembler = GraphAssembler::new(vocab, "https://kb.example.org");
    let graph_a = assembler.assemble(&processed[0].document_uri, &processed[0].entities, &[]);
    let graph_b = assembler.assemble(&processed[1].document_uri, &processed[1].entities, &[]);

    let subjects_a: Vec<String> = graph_a.subjects().iter().map(|s| s.as_str().to_string()).collect();
    let subjects_b: Vec<String> = graph_b.subjects().iter().map(|s| s.as_str().to_string()).collect();
    for subject in &subjects_a {
        assert!(
            !subjects_b.contains(subject),
            "subject {subject} appears in both graphs"
        );
    }
}

#[tokio::test]
async fn test_store_round_trip() {
    let processor = processor();
    let (processed, _) = processor
        .process_batch(vec![Document::new(
            "a.md",
            "#urgent\n\n[docs](https://example.com)\n\n[[other]]\n",
        )])
        .await;

    let store = InMemoryDocumentStore::new();
    let record = processed[0].to_record();
    store.store(record.clone()).await.unwrap();

    let fetched = store
        .get(&processed[0].document_uri)
        .await
        .unwrap()
        .expect("record stored");
    assert_eq!(fetched, record);
}

#[tokio::test]
async fn test_malformed_document_does_not_poison_batch() {
    // Unterminated fences, dangling brackets, raw control characters: the
    // extractors must either produce elements or record a warning, never
    // abort the other document.
    let processor = processor();
    let (processed, report) = processor
        .process_batch(vec![
            Document::new("broken.md", "```rust\nfn main( {\n# [ [[ >>\n"),
            Document::new("fine.md", "# Fine\n"),
        ])
        .await;

    assert_eq!(processed.len(), report.succeeded);
    assert!(processed.iter().any(|d| d.document.path == "fine.md"));
}
