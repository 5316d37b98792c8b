//! Table extraction
//!
//! Pipe tables: a header row, a dash separator row, and zero or more data
//! rows. Header cells are kept apart from data cells; row and column
//! counts include the header row (the separator is syntax, not data).

use crate::code_spans::CodeSpans;
use crate::error::ExtractResult;
use crate::extractor::Extractor;
use mica_core::{ContentElement, Document, DocumentRegistry, ElementKind, ElementMetadata, Span};
use regex::Regex;
use std::sync::{Arc, LazyLock};

static SEPARATOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*\|?[ \t]*:?-+:?[ \t]*(\|[ \t]*:?-+:?[ \t]*)*\|?[ \t]*$").expect("separator regex"));

/// Table extractor
pub struct TableExtractor;

impl TableExtractor {
    /// Create a new table extractor
    pub fn new() -> Self {
        Self
    }

    /// Split a row line into trimmed cells, dropping the empty fragments
    /// produced by leading/trailing pipes
    fn split_cells(line: &str) -> Vec<String> {
        let trimmed = line.trim();
        let trimmed = trimmed.strip_prefix('|').unwrap_or(trimmed);
        let trimmed = trimmed.strip_suffix('|').unwrap_or(trimmed);
        trimmed.split('|').map(|c| c.trim().to_string()).collect()
    }

    fn is_row(line: &str) -> bool {
        line.contains('|')
    }
}

impl Default for TableExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for TableExtractor {
    fn name(&self) -> &'static str {
        "tables"
    }

    fn description(&self) -> &'static str {
        "Pipe tables with flagged header cells"
    }

    fn can_handle(&self, body: &str) -> bool {
        body.contains('|')
    }

    fn extract(
        &self,
        document: &Document,
        _registry: &DocumentRegistry,
    ) -> ExtractResult<Vec<ContentElement>> {
        let body = document.body();
        let base = document.body_start;
        let code = CodeSpans::scan(body);

        // Collect line boundaries first; the scan below is windowed.
        let mut lines: Vec<(usize, &str)> = Vec::new();
        let mut offset = 0;
        for line in body.split_inclusive('\n') {
            let trimmed = line.strip_suffix('\n').unwrap_or(line);
            let trimmed = trimmed.strip_suffix('\r').unwrap_or(trimmed);
            lines.push((offset, trimmed));
            offset += line.len();
        }

        let mut elements = Vec::new();
        let mut table_index = 0;
        let mut i = 0;
        while i + 1 < lines.len() {
            let (header_offset, header_line) = lines[i];
            let (_, separator_line) = lines[i + 1];

            let starts_table = !code.in_fenced(header_offset)
                && Self::is_row(header_line)
                && !SEPARATOR_REGEX.is_match(header_line)
                && SEPARATOR_REGEX.is_match(separator_line)
                && separator_line.contains('|');

            if !starts_table {
                i += 1;
                continue;
            }

            let headers = Self::split_cells(header_line);
            let mut rows: Vec<Vec<String>> = Vec::new();
            let mut j = i + 2;
            let mut end = lines[i + 1].0 + separator_line.len();
            while j < lines.len() && Self::is_row(lines[j].1) && !code.in_fenced(lines[j].0) {
                rows.push(Self::split_cells(lines[j].1));
                end = lines[j].0 + lines[j].1.len();
                j += 1;
            }

            let span = Span::new(base + header_offset, base + end);
            let column_count = headers.len();
            let row_count = rows.len() + 1; // header row included
            let content = body[header_offset..end].to_string();

            elements.push(ContentElement::new(
                format!("table-{table_index}"),
                ElementKind::Table,
                span,
                content,
                ElementMetadata::Table {
                    headers,
                    rows,
                    row_count,
                    column_count,
                },
            ));
            table_index += 1;
            i = j;
        }

        Ok(elements)
    }
}

/// Create a table extractor
pub fn create_table_extractor() -> Arc<dyn Extractor> {
    Arc::new(TableExtractor::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(content: &str) -> Vec<ContentElement> {
        let doc = Document::new("test.md", content);
        TableExtractor::new()
            .extract(&doc, &DocumentRegistry::new())
            .unwrap()
    }

    #[test]
    fn test_basic_table() {
        let content = "| Name | Age |\n| --- | --- |\n| Ada | 36 |\n| Alan | 41 |\n";
        let elements = extract(content);
        assert_eq!(elements.len(), 1);

        match &elements[0].metadata {
            ElementMetadata::Table {
                headers,
                rows,
                row_count,
                column_count,
            } => {
                assert_eq!(headers, &vec!["Name".to_string(), "Age".to_string()]);
                assert_eq!(rows.len(), 2);
                assert_eq!(rows[0], vec!["Ada".to_string(), "36".to_string()]);
                // Header row counts toward the total
                assert_eq!(*row_count, 3);
                assert_eq!(*column_count, 2);
            }
            other => panic!("expected table metadata, got {other:?}"),
        }
    }

    #[test]
    fn test_headerless_data_is_allowed() {
        // Header + separator with no data rows is still a table
        let elements = extract("| A | B |\n|---|---|\n");
        assert_eq!(elements.len(), 1);
        match &elements[0].metadata {
            ElementMetadata::Table { row_count, .. } => assert_eq!(*row_count, 1),
            _ => panic!("expected table metadata"),
        }
    }

    #[test]
    fn test_alignment_separators() {
        let elements = extract("| L | C | R |\n|:---|:---:|---:|\n| a | b | c |\n");
        assert_eq!(elements.len(), 1);
    }

    #[test]
    fn test_pipe_without_separator_is_not_table() {
        let elements = extract("a | b\nplain text\n");
        assert!(elements.is_empty());
    }

    #[test]
    fn test_two_tables() {
        let content = "| A |\n|---|\n| 1 |\n\n| B |\n|---|\n| 2 |\n";
        let elements = extract(content);
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].local_id, "table-0");
        assert_eq!(elements[1].local_id, "table-1");
    }

    #[test]
    fn test_table_span_covers_all_rows() {
        let content = "intro\n| A |\n|---|\n| 1 |\ntail\n";
        let elements = extract(content);
        let span = elements[0].span;
        assert_eq!(&content[span.start..span.end], "| A |\n|---|\n| 1 |");
    }

    #[test]
    fn test_table_inside_fence_ignored() {
        let elements = extract("```\n| A |\n|---|\n```\n");
        assert!(elements.is_empty());
    }
}
