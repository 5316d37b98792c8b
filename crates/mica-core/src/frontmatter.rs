//! Front matter handling
//!
//! Documents may open with a metadata block delimited by `---` (YAML) or
//! `+++` (TOML). The block is split from the body at document construction
//! and exposed as a flat key/value mapping. A malformed block is treated as
//! absent rather than failing the document.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Front matter serialization format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrontMatterFormat {
    /// `---` delimited YAML block
    Yaml,
    /// `+++` delimited TOML block
    Toml,
}

/// Parsed front matter block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrontMatter {
    /// Format the block was written in
    pub format: FrontMatterFormat,
    /// Key/value properties as parsed
    pub properties: Map<String, Value>,
}

impl FrontMatter {
    /// Split front matter off the start of `content`.
    ///
    /// Returns the parsed block (if present and well-formed) and the byte
    /// offset where the body begins. Without front matter, or when the
    /// block fails to parse, the body offset is 0 and the whole text is
    /// body.
    pub fn extract(content: &str) -> (Option<Self>, usize) {
        for (marker, format) in [("---", FrontMatterFormat::Yaml), ("+++", FrontMatterFormat::Toml)] {
            if let Some((block, body_start)) = split_delimited_block(content, marker) {
                match parse_block(block, format) {
                    Some(properties) => {
                        return (Some(Self { format, properties }), body_start);
                    }
                    None => {
                        tracing::warn!(
                            format = ?format,
                            "malformed front matter block, treating as body"
                        );
                        return (None, 0);
                    }
                }
            }
        }
        (None, 0)
    }

    /// Look up a raw property value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// The `title` property, when it is a string
    pub fn title(&self) -> Option<String> {
        match self.properties.get("title") {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        }
    }

    /// Read a property as a list of strings.
    ///
    /// Accepts list form (string items collected, others skipped) and
    /// string form (split on commas when present, else on whitespace).
    pub fn string_list(&self, key: &str) -> Vec<String> {
        match self.properties.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            Some(Value::String(s)) => {
                let parts: Vec<&str> = if s.contains(',') {
                    s.split(',').collect()
                } else {
                    s.split_whitespace().collect()
                };
                parts
                    .into_iter()
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty())
                    .collect()
            }
            _ => Vec::new(),
        }
    }
}

/// Locate a `marker`-delimited block opening on the first line.
///
/// Returns the block text (between the delimiter lines) and the byte
/// offset of the first body byte after the closing delimiter line.
fn split_delimited_block<'a>(content: &'a str, marker: &str) -> Option<(&'a str, usize)> {
    let first_line_end = content.find('\n')?;
    if content[..first_line_end].trim_end_matches('\r') != marker {
        return None;
    }

    let block_start = first_line_end + 1;
    let mut offset = block_start;
    for line in content[block_start..].split_inclusive('\n') {
        if line.trim_end() == marker {
            let body_start = offset + line.len();
            return Some((&content[block_start..offset], body_start));
        }
        offset += line.len();
    }
    None
}

fn parse_block(block: &str, format: FrontMatterFormat) -> Option<Map<String, Value>> {
    let value: Value = match format {
        FrontMatterFormat::Yaml => serde_yaml::from_str(block).ok()?,
        FrontMatterFormat::Toml => {
            let parsed: toml::Value = toml::from_str(block).ok()?;
            serde_json::to_value(parsed).ok()?
        }
    };
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_front_matter() {
        let content = "---\ntitle: My Note\ntags:\n  - rust\n  - parsing\n---\nBody here.\n";
        let (fm, body_start) = FrontMatter::extract(content);
        let fm = fm.expect("front matter present");
        assert_eq!(fm.format, FrontMatterFormat::Yaml);
        assert_eq!(fm.title(), Some("My Note".to_string()));
        assert_eq!(fm.string_list("tags"), vec!["rust", "parsing"]);
        assert_eq!(&content[body_start..], "Body here.\n");
    }

    #[test]
    fn test_toml_front_matter() {
        let content = "+++\ntitle = \"Config\"\ntags = [\"a\", \"b\"]\n+++\nBody.";
        let (fm, body_start) = FrontMatter::extract(content);
        let fm = fm.expect("front matter present");
        assert_eq!(fm.format, FrontMatterFormat::Toml);
        assert_eq!(fm.title(), Some("Config".to_string()));
        assert_eq!(fm.string_list("tags"), vec!["a", "b"]);
        assert_eq!(&content[body_start..], "Body.");
    }

    #[test]
    fn test_no_front_matter() {
        let (fm, body_start) = FrontMatter::extract("# Just a heading\n");
        assert!(fm.is_none());
        assert_eq!(body_start, 0);
    }

    #[test]
    fn test_unterminated_block_is_body() {
        let (fm, body_start) = FrontMatter::extract("---\ntitle: dangling\n");
        assert!(fm.is_none());
        assert_eq!(body_start, 0);
    }

    #[test]
    fn test_malformed_yaml_is_body() {
        let (fm, body_start) = FrontMatter::extract("---\n: [ not yaml\n---\nBody\n");
        assert!(fm.is_none());
        assert_eq!(body_start, 0);
    }

    #[test]
    fn test_string_form_tag_lists() {
        let content = "---\ntags: alpha, beta\ncategories: one two\n---\n";
        let (fm, _) = FrontMatter::extract(content);
        let fm = fm.unwrap();
        assert_eq!(fm.string_list("tags"), vec!["alpha", "beta"]);
        assert_eq!(fm.string_list("categories"), vec!["one", "two"]);
    }

    #[test]
    fn test_closing_marker_at_end_of_input() {
        let content = "---\ntitle: x\n---";
        let (fm, body_start) = FrontMatter::extract(content);
        assert!(fm.is_some());
        assert_eq!(body_start, content.len());
    }
}
