//! Dispatch over the closed set of BibTeX element kinds.
//!
//! [`BibtexElement`] is the sum of all typed nodes a visitor can see. A visitor
//! always implements [`ElementVisitor`]; one that also wants per-kind callbacks
//! exposes a [`BibtexVisitor`] through
//! [`as_bibtex_visitor`](ElementVisitor::as_bibtex_visitor). Elements route to
//! the per-kind method when that capability is present and to
//! [`visit_element`](ElementVisitor::visit_element) otherwise.

use crate::ast::{AstNode, BibtexComment, BibtexEntry, BibtexField, BibtexId};
use crate::SyntaxNode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BibtexElement {
    Entry(BibtexEntry),
    Id(BibtexId),
    Field(BibtexField),
    Comment(BibtexComment),
}

impl BibtexElement {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        if let Some(id) = BibtexId::cast(node.clone()) {
            return Some(Self::Id(id));
        }
        BibtexEntry::cast(node.clone())
            .map(Self::Entry)
            .or_else(|| BibtexField::cast(node.clone()).map(Self::Field))
            .or_else(|| BibtexComment::cast(node).map(Self::Comment))
    }

    pub fn accept(&self, visitor: &mut dyn ElementVisitor) {
        if let Self::Id(id) = self {
            return id.accept(visitor);
        }
        match visitor.as_bibtex_visitor() {
            Some(bibtex) => match self {
                Self::Entry(entry) => bibtex.visit_entry(entry),
                Self::Field(field) => bibtex.visit_field(field),
                Self::Comment(comment) => bibtex.visit_comment(comment),
                Self::Id(id) => bibtex.visit_id(id),
            },
            None => visitor.visit_element(self),
        }
    }
}

/// The generic visitor every consumer implements.
pub trait ElementVisitor {
    fn visit_element(&mut self, element: &BibtexElement);

    /// Opt-in to per-kind callbacks.
    fn as_bibtex_visitor(&mut self) -> Option<&mut dyn BibtexVisitor> {
        None
    }
}

/// Per-kind callbacks. All default to doing nothing.
pub trait BibtexVisitor {
    fn visit_entry(&mut self, _entry: &BibtexEntry) {}
    fn visit_id(&mut self, _id: &BibtexId) {}
    fn visit_field(&mut self, _field: &BibtexField) {}
    fn visit_comment(&mut self, _comment: &BibtexComment) {}
}

/// Visits every element under `root` (inclusive) in document order.
pub fn walk(root: &SyntaxNode, visitor: &mut dyn ElementVisitor) {
    for node in root.descendants() {
        if let Some(element) = BibtexElement::cast(node) {
            element.accept(visitor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    const BIB: &str = "% header\n@book{knuth84, % key\n title = {T}}\n@misc{x}";

    #[derive(Default)]
    struct Generic {
        seen: Vec<&'static str>,
    }

    impl ElementVisitor for Generic {
        fn visit_element(&mut self, element: &BibtexElement) {
            self.seen.push(match element {
                BibtexElement::Entry(_) => "entry",
                BibtexElement::Id(_) => "id",
                BibtexElement::Field(_) => "field",
                BibtexElement::Comment(_) => "comment",
            });
        }
    }

    #[derive(Default)]
    struct KeyCollector {
        keys: Vec<String>,
        fallbacks: usize,
    }

    impl ElementVisitor for KeyCollector {
        fn visit_element(&mut self, _element: &BibtexElement) {
            self.fallbacks += 1;
        }

        fn as_bibtex_visitor(&mut self) -> Option<&mut dyn BibtexVisitor> {
            Some(self)
        }
    }

    impl BibtexVisitor for KeyCollector {
        fn visit_id(&mut self, id: &BibtexId) {
            self.keys.push(id.identifier());
        }
    }

    #[test]
    fn test_generic_visitor_sees_every_kind_in_order() {
        let mut visitor = Generic::default();
        walk(&parse(BIB).syntax(), &mut visitor);
        assert_eq!(
            visitor.seen,
            vec!["comment", "entry", "id", "comment", "field", "entry", "id"]
        );
    }

    #[test]
    fn test_bibtex_capability_routes_to_visit_id() {
        let mut visitor = KeyCollector::default();
        walk(&parse(BIB).syntax(), &mut visitor);
        assert_eq!(visitor.keys, vec!["knuth84", "x"]);
        assert_eq!(visitor.fallbacks, 0);
    }

    #[test]
    fn test_id_accept_without_capability_falls_back() {
        let root = parse(BIB).syntax();
        let id = root.descendants().find_map(BibtexId::cast).unwrap();
        let mut visitor = Generic::default();
        id.accept(&mut visitor);
        assert_eq!(visitor.seen, vec!["id"]);
    }
}
