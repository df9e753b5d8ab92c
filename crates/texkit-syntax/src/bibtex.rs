//! Structured BibTeX extraction.
//!
//! ## Overview
//!
//! For callers that want plain data rather than a syntax tree, this module
//! flattens a parsed `.bib` file into [`BibEntry`] records (type, key, fields).
//!
//! ## Strategy
//!
//! Extraction runs on top of the fault-tolerant [`parse`](crate::parse):
//!
//! - Only `@type{key, ...}` blocks with a key become entries; `@comment`,
//!   `@preamble` and `@string` are skipped
//! - Text and comments outside entries are ignored
//! - Field values lose their outer `{...}` or `"..."` delimiters, and `#`
//!   concatenations are joined
//!
//! ## Examples
//!
//! ```
//! use texkit_syntax::bibtex::parse_bibtex;
//!
//! let input = r#"
//!     @article{knuth84,
//!         author = {Donald Knuth},
//!         title = {Literate Programming},
//!         year = 1984
//!     }
//! "#;
//!
//! let file = parse_bibtex(input);
//! assert_eq!(file.entries.len(), 1);
//! assert_eq!(file.entries[0].key, "knuth84");
//! ```

use rowan::TextRange;
use std::collections::HashMap;

use crate::ast::{AstNode, BibtexFile};
use crate::parse;

/// Represents a single BibTeX entry (e.g., `@article{...}`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibEntry {
    /// The type of the entry, lowercased (e.g., "article", "book").
    pub entry_type: String,
    /// The citation key (e.g., "knuth1984").
    pub key: String,
    /// Field name (lowercased) to value (e.g., "author" -> "Knuth").
    pub fields: HashMap<String, String>,
    /// The full range of the entry in the source file.
    pub range: TextRange,
}

/// Represents a parsed BibTeX file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibFile {
    /// The list of entries found in the file.
    pub entries: Vec<BibEntry>,
}

/// Parses a BibTeX input string into a structured [`BibFile`].
///
/// Never fails: malformed entries yield whatever fields could be recovered,
/// and entries without a key are dropped.
pub fn parse_bibtex(input: &str) -> BibFile {
    let file = BibtexFile::new(parse(input).syntax());
    let mut entries = Vec::new();

    for entry in file.entries() {
        let Some(id) = entry.id() else {
            continue;
        };
        let fields = entry
            .fields()
            .filter_map(|field| Some((field.name()?.to_lowercase(), field.value()?)))
            .collect();
        entries.push(BibEntry {
            entry_type: entry.entry_type().unwrap_or_default(),
            key: id.identifier(),
            fields,
            range: entry.syntax().text_range(),
        });
    }

    BibFile { entries }
}
