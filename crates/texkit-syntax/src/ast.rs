//! Typed views over the BibTeX syntax tree.
//!
//! Most wrappers here are thin: they hold a [`SyntaxNode`] of a known kind and
//! read everything else from the tree on demand. [`BibtexId`] is the exception,
//! since an entry key can also be restored from a persisted [`IdStub`] without
//! any tree behind it.

use std::fmt;

use rowan::{NodeOrToken, TextRange};

use crate::stub::{IdStub, StubElementType};
use crate::visitor::{BibtexElement, ElementVisitor};
use crate::{SyntaxKind, SyntaxNode};

/// A typed wrapper around a [`SyntaxNode`] of one particular kind.
pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(node: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;
}

/// Anything the rename and navigation tooling can address by name.
pub trait NamedElement {
    fn name(&self) -> String;
    fn set_name(&mut self, name: impl Into<String>) -> &mut Self;
}

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name {
            syntax: SyntaxNode,
        }

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$kind
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self { syntax: node })
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.syntax
            }
        }
    };
}

ast_node!(BibtexFile, Root);
ast_node!(BibtexEntry, Entry);
ast_node!(BibtexField, Field);
ast_node!(BibtexComment, Comment);

impl BibtexFile {
    /// Wraps a parse result's root node.
    ///
    /// # Panics
    ///
    /// Panics if `root` is not a [`SyntaxKind::Root`] node.
    pub fn new(root: SyntaxNode) -> Self {
        assert_eq!(root.kind(), SyntaxKind::Root);
        Self { syntax: root }
    }

    pub fn entries(&self) -> impl Iterator<Item = BibtexEntry> + '_ {
        self.syntax.children().filter_map(BibtexEntry::cast)
    }

    /// Every entry key in the file, in document order.
    pub fn ids(&self) -> impl Iterator<Item = BibtexId> + '_ {
        self.entries().filter_map(|entry| entry.id())
    }

    /// Every `%` comment in the file, at any depth.
    pub fn comments(&self) -> impl Iterator<Item = BibtexComment> + '_ {
        self.syntax.descendants().filter_map(BibtexComment::cast)
    }
}

impl BibtexEntry {
    /// The entry type, lowercased (`article`, `book`, `string`, ...).
    pub fn entry_type(&self) -> Option<String> {
        self.syntax
            .children()
            .find(|n| n.kind() == SyntaxKind::EntryType)
            .map(|n| n.text().to_string().to_lowercase())
    }

    pub fn id(&self) -> Option<BibtexId> {
        self.syntax.children().find_map(BibtexId::cast)
    }

    pub fn fields(&self) -> impl Iterator<Item = BibtexField> + '_ {
        self.syntax.children().filter_map(BibtexField::cast)
    }

    pub fn field(&self, name: &str) -> Option<BibtexField> {
        self.fields()
            .find(|f| f.name().is_some_and(|n| n.eq_ignore_ascii_case(name)))
    }
}

impl BibtexField {
    pub fn name(&self) -> Option<String> {
        self.syntax
            .children()
            .find(|n| n.kind() == SyntaxKind::FieldName)
            .map(|n| n.text().to_string())
    }

    /// The field value with its delimiters removed and `#` concatenations
    /// joined. Braces nested inside a value are kept.
    pub fn value(&self) -> Option<String> {
        let value = self
            .syntax
            .children()
            .find(|n| n.kind() == SyntaxKind::Value)?;

        let mut text = String::new();
        for piece in value.children_with_tokens() {
            match piece {
                NodeOrToken::Node(node) => {
                    let delimiter = match node.kind() {
                        SyntaxKind::BracedString => ('{', '}'),
                        SyntaxKind::QuotedString => ('"', '"'),
                        _ => continue,
                    };
                    let raw = node.text().to_string();
                    let inner = raw.strip_prefix(delimiter.0).unwrap_or(&raw);
                    text.push_str(inner.strip_suffix(delimiter.1).unwrap_or(inner));
                }
                NodeOrToken::Token(token) => {
                    if matches!(token.kind(), SyntaxKind::Number | SyntaxKind::Ident) {
                        text.push_str(token.text());
                    }
                }
            }
        }
        Some(text)
    }
}

impl BibtexComment {
    /// Full comment text, including the leading `%`.
    pub fn text(&self) -> String {
        self.syntax.text().to_string()
    }

    pub fn text_range(&self) -> TextRange {
        self.syntax.text_range()
    }
}

/// Where a [`BibtexId`] gets its data from. Fixed when the id is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdOrigin {
    /// Freshly parsed: an [`SyntaxKind::Id`] node in a live tree.
    Live(SyntaxNode),
    /// Restored from a persisted stub; there is no tree behind it.
    Stub {
        stub: IdStub,
        element_type: StubElementType,
    },
}

/// The key of a BibTeX entry, e.g. `knuth84` in `@book{knuth84, ...}`.
///
/// The identifier is read from the origin on demand. [`set_name`](Self::set_name)
/// is the only way to change it; once renamed, the new name shadows whatever
/// the tree or stub says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibtexId {
    origin: IdOrigin,
    renamed: Option<String>,
}

impl BibtexId {
    /// Wraps a live `Id` node.
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        if node.kind() != SyntaxKind::Id {
            return None;
        }
        Some(Self {
            origin: IdOrigin::Live(node),
            renamed: None,
        })
    }

    pub fn from_stub(stub: IdStub, element_type: StubElementType) -> Self {
        Self {
            origin: IdOrigin::Stub { stub, element_type },
            renamed: None,
        }
    }

    pub fn origin(&self) -> &IdOrigin {
        &self.origin
    }

    pub fn is_stub_backed(&self) -> bool {
        matches!(self.origin, IdOrigin::Stub { .. })
    }

    /// The underlying tree node, if this id was built from one.
    pub fn syntax(&self) -> Option<&SyntaxNode> {
        match &self.origin {
            IdOrigin::Live(node) => Some(node),
            IdOrigin::Stub { .. } => None,
        }
    }

    pub fn text_range(&self) -> TextRange {
        match &self.origin {
            IdOrigin::Live(node) => node.text_range(),
            IdOrigin::Stub { stub, .. } => stub.range(),
        }
    }

    /// The current key. Empty if the source has none.
    pub fn identifier(&self) -> String {
        if let Some(name) = &self.renamed {
            return name.clone();
        }
        match &self.origin {
            IdOrigin::Live(node) => node
                .children_with_tokens()
                .filter_map(|element| element.into_token())
                .filter(|token| matches!(token.kind(), SyntaxKind::Ident | SyntaxKind::Number))
                .map(|token| token.text().to_string())
                .collect(),
            IdOrigin::Stub { stub, .. } => stub.identifier.clone(),
        }
    }

    /// Overwrites the identifier. No validation happens here.
    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.renamed = Some(name.into());
        self
    }

    /// All comments anywhere under this key, in document order.
    ///
    /// Stub-backed ids carry no subtree and always return an empty list.
    pub fn comment_list(&self) -> Vec<BibtexComment> {
        match &self.origin {
            IdOrigin::Live(node) => node.descendants().filter_map(BibtexComment::cast).collect(),
            IdOrigin::Stub { .. } => Vec::new(),
        }
    }

    pub fn accept(&self, visitor: &mut dyn ElementVisitor) {
        match visitor.as_bibtex_visitor() {
            Some(bibtex) => bibtex.visit_id(self),
            None => visitor.visit_element(&BibtexElement::Id(self.clone())),
        }
    }
}

impl NamedElement for BibtexId {
    fn name(&self) -> String {
        self.identifier()
    }

    fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        BibtexId::set_name(self, name)
    }
}

impl fmt::Display for BibtexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id{{{}}}", self.name())
    }
}
