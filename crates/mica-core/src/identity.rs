//! Deterministic identifier generation
//!
//! Pure, total functions mapping document paths and discriminator text to
//! URI strings. Re-running extraction on unchanged input yields
//! byte-identical identifiers, which is what makes re-processing
//! idempotent and cross-references stable.
//!
//! Identifier shapes:
//! - documents: `<base-namespace>/documents/<path>`
//! - document-scoped entities: `<document-uri>/<kind>/<slug>`

/// Normalize arbitrary text into a URL-safe lowercase slug.
///
/// Rules:
/// - case-fold to lowercase
/// - letters (including non-ASCII), digits, and existing hyphens are kept
/// - each whitespace run becomes a single hyphen
/// - punctuation, symbols, and emoji are dropped without introducing a
///   hyphen (`C++` → `c`, `config.yaml` → `configyaml`, `#123` → `123`)
/// - repeated hyphens collapse to one; leading/trailing hyphens are
///   stripped
///
/// The result may be empty; use [`slug_or_unnamed`] where a non-empty
/// identifier segment is required.
pub fn slug(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.to_lowercase().chars() {
        if ch.is_alphanumeric() || ch == '-' {
            out.push(ch);
        } else if ch.is_whitespace() {
            out.push('-');
        }
        // Everything else separates word runs without leaving a mark.
    }

    let mut collapsed = String::with_capacity(out.len());
    let mut prev_hyphen = true; // strips leading hyphens
    for ch in out.chars() {
        if ch == '-' {
            if !prev_hyphen {
                collapsed.push('-');
            }
            prev_hyphen = true;
        } else {
            collapsed.push(ch);
            prev_hyphen = false;
        }
    }
    while collapsed.ends_with('-') {
        collapsed.pop();
    }
    collapsed
}

/// [`slug`] with the documented fallback for input that normalizes to
/// nothing: `unnamed-<kind>`.
pub fn slug_or_unnamed(text: &str, kind: &str) -> String {
    let s = slug(text);
    if s.is_empty() {
        format!("unnamed-{kind}")
    } else {
        s
    }
}

/// Identifier for a document, derived from its file path.
///
/// Content-independent: `<base>/documents/<path>`. The base namespace
/// loses any trailing slash, the path any leading `./` or `/`.
pub fn document_uri(base_namespace: &str, path: &str) -> String {
    let base = base_namespace.trim_end_matches('/');
    let path = path.trim_start_matches("./").trim_start_matches('/');
    format!("{base}/documents/{path}")
}

/// Identifier for a document-scoped entity.
///
/// The owning document URI is always part of the key: equal discriminator
/// text under different documents yields different identifiers.
pub fn entity_uri(document_uri: &str, kind: &str, discriminator: &str) -> String {
    format!("{document_uri}/{kind}/{}", slug_or_unnamed(discriminator, kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_slug_basics() {
        assert_eq!(slug("Fix  the   bug!"), "fix-the-bug");
        assert_eq!(slug("Hello World"), "hello-world");
        assert_eq!(slug("already-hyphenated"), "already-hyphenated");
    }

    #[test]
    fn test_separators_do_not_introduce_hyphens() {
        assert_eq!(slug("C++"), "c");
        assert_eq!(slug("#123"), "123");
        assert_eq!(slug("config.yaml"), "configyaml");
        assert_eq!(slug("a@b"), "ab");
        assert_eq!(slug("50%!"), "50");
    }

    #[test]
    fn test_separators_between_whitespace() {
        // The whitespace supplies the hyphen, not the symbol
        assert_eq!(slug("one / two"), "one-two");
        assert_eq!(slug("a . b"), "a-b");
    }

    #[test]
    fn test_non_latin_letters_kept() {
        assert_eq!(slug("Überblick"), "überblick");
        assert_eq!(slug("café noir"), "café-noir");
    }

    #[test]
    fn test_emoji_dropped_silently() {
        assert_eq!(slug("task 🎉 done"), "task-done");
        assert_eq!(slug("🎉"), "");
    }

    #[test]
    fn test_hyphen_collapse_and_trim() {
        assert_eq!(slug("--a---b--"), "a-b");
        assert_eq!(slug(" - leading"), "leading");
    }

    #[test]
    fn test_unnamed_fallback() {
        assert_eq!(slug_or_unnamed("!!!", "todo"), "unnamed-todo");
        assert_eq!(slug_or_unnamed("", "tag"), "unnamed-tag");
        assert_eq!(slug_or_unnamed("real", "todo"), "real");
    }

    #[test]
    fn test_document_uri() {
        assert_eq!(
            document_uri("https://kb.example.org/", "notes/adr-001.md"),
            "https://kb.example.org/documents/notes/adr-001.md"
        );
        assert_eq!(
            document_uri("https://kb.example.org", "./a.md"),
            "https://kb.example.org/documents/a.md"
        );
    }

    #[test]
    fn test_entity_uri_scoping() {
        let doc1 = document_uri("https://kb.example.org", "a.md");
        let doc2 = document_uri("https://kb.example.org", "b.md");
        assert_ne!(
            entity_uri(&doc1, "todo", "Fix the bug"),
            entity_uri(&doc2, "todo", "Fix the bug")
        );
    }

    #[test]
    fn test_todo_id_normalization_idempotence() {
        let doc = document_uri("https://kb.example.org", "a.md");
        assert_eq!(
            entity_uri(&doc, "todo", "Fix  the   bug!"),
            entity_uri(&doc, "todo", "fix the bug")
        );
    }

    proptest! {
        #[test]
        fn prop_slug_is_idempotent(text in ".{0,64}") {
            let once = slug(&text);
            prop_assert_eq!(slug(&once), once.clone());
        }

        #[test]
        fn prop_slug_is_deterministic(text in ".{0,64}") {
            prop_assert_eq!(slug(&text), slug(&text));
        }

        #[test]
        fn prop_entity_uri_document_scoped(
            text in "[a-z ]{1,24}",
            p1 in "[a-z]{1,12}\\.md",
            p2 in "[a-z]{1,12}\\.md",
        ) {
            prop_assume!(p1 != p2);
            let d1 = document_uri("https://kb.example.org", &p1);
            let d2 = document_uri("https://kb.example.org", &p2);
            prop_assert_ne!(
                entity_uri(&d1, "todo", &text),
                entity_uri(&d2, "todo", &text)
            );
        }
    }
}
