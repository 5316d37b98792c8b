//! Mica Markdown Extractors
//!
//! Structural extraction for the mica knowledge pipeline. Each module
//! implements one [`Extractor`] over a document's body:
//! - Headings and the sections they bound
//! - Lists and list items with indentation nesting
//! - Pipe tables
//! - Fenced code blocks
//! - Blockquotes
//! - Todo items (checkbox list entries)
//! - Tags (hashtags, `@category/tag` tokens, front matter)
//! - Links, reference links, and citations
//! - Cross-document `[[wikilinks]]` resolved against the document registry
//!
//! Extractors are independent, composable, and side-effect free; the
//! processor runs all registered extractors over the same document and
//! concatenates their output in registration order.

pub mod blockquotes;
pub mod code_blocks;
pub mod code_spans;
pub mod error;
pub mod extractor;
pub mod headings;
pub mod links;
pub mod lists;
pub mod tables;
pub mod tags;
pub mod todos;
pub mod wikilinks;

// Re-export main types for convenience
pub use code_spans::CodeSpans;
pub use error::{ExtractError, ExtractResult};
pub use extractor::{Extractor, ExtractorRegistry};

// Convenience factory functions
pub use blockquotes::create_blockquote_extractor;
pub use code_blocks::create_code_block_extractor;
pub use headings::create_heading_extractor;
pub use links::create_link_extractor;
pub use lists::create_list_extractor;
pub use tables::create_table_extractor;
pub use tags::create_tag_extractor;
pub use todos::create_todo_extractor;
pub use wikilinks::create_wikilink_extractor;
