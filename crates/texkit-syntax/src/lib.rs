//! # texkit syntax
//!
//! Fault-tolerant BibTeX syntax tree for texkit.
//!
//! The [`lexer`] turns `.bib` source into a flat token stream, the [`parser`]
//! folds it into a lossless [rowan] tree, and the [`ast`] module layers typed
//! views on top of that tree. Entry keys are exposed as [`BibtexId`], which can
//! be backed either by a live tree node or by a persisted [`stub::IdStub`].
//!
//! ```
//! use texkit_syntax::{ast::BibtexFile, parse};
//!
//! let result = parse("@article{knuth84, title = {Literate Programming}}");
//! let file = BibtexFile::new(result.syntax());
//! let id = file.entries().next().and_then(|e| e.id()).unwrap();
//! assert_eq!(id.to_string(), "Id{knuth84}");
//! ```

pub mod ast;
pub mod bibtex;
pub mod lexer;
pub mod parser;
pub mod stub;
pub mod visitor;


pub use ast::{BibtexComment, BibtexEntry, BibtexId, NamedElement};
pub use parser::{parse, ParseResult, SyntaxError};
use rowan::Language;
pub use rowan::{TextRange, TextSize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    // Tokens
    At = 0,
    LBrace,
    RBrace,
    LParen,
    RParen,
    Comma,
    Equals,
    Concat, // #
    Quote,  // "
    Number,
    Ident, // keys, entry types, field names, bare words
    Whitespace,
    CommentText, // % ...

    // Composite Nodes
    Root,
    Entry,         // @type{id, ...}
    EntryType,     // article, book, ...
    Id,            // the entry key, including its separator
    Field,         // name = value
    FieldName,
    Value,         // one or more pieces joined by #
    BracedString,  // { ... }
    QuotedString,  // " ... "
    Comment,       // wraps a CommentText token
    Error,

    // Technical
    Eof,
}

impl SyntaxKind {
    /// Whitespace and comments, which the parser lets float between structure.
    pub fn is_trivia(self) -> bool {
        matches!(self, SyntaxKind::Whitespace | SyntaxKind::CommentText)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BibtexLanguage {}

impl Language for BibtexLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 <= SyntaxKind::Eof as u16);
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

pub type SyntaxNode = rowan::SyntaxNode<BibtexLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<BibtexLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<BibtexLanguage>;
