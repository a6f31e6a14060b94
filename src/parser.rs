//! HTML5 parsing into the arena via html5ever's TreeSink.
//!
//! Two entry points:
//! - [`parse`] builds a fresh [`Document`] from a full HTML string;
//! - [`Document::parse_markup`] parses a markup string as a `<body>`-context
//!   fragment *into the live document's arena*, so the resulting nodes share
//!   ids with the tree they are about to be spliced into. The fragment
//!   builder in `insert` relies on this.
//!
//! Parse errors are ignored - html5ever recovers the way browsers do.

use html5ever::tree_builder::{ElemName, ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute, LocalName, QualName, parse_document, parse_fragment};
use html5ever::{local_name, namespace_url, ns};
use indexmap::IndexMap;
use indextree::{Arena, NodeId};
use std::borrow::Cow;
use std::cell::RefCell;
use tendril::{StrTendril, TendrilSink};

use crate::dom::{Document, ElementData, Namespace, NodeData, NodeKind};

/// Parse a full HTML string into an arena-based [`Document`].
pub fn parse(html: &str) -> Document {
    let sink = ArenaSink::new();
    // html5ever creates subtendrils sharing this buffer via refcounting
    let tendril = StrTendril::from(html);
    parse_document(sink, Default::default()).one(tendril)
}

/// Scratch ids from a fragment parse: `container` holds the parsed nodes as
/// children, `scratch` is the subtree to delete once they have been moved out.
pub(crate) struct ParsedMarkup {
    pub scratch: NodeId,
    pub container: NodeId,
}

impl Document {
    /// Parse markup as a `<body>`-context fragment into this document's arena.
    ///
    /// The arena is temporarily moved into the sink and moved back afterwards;
    /// existing node ids stay valid throughout.
    pub(crate) fn parse_markup(&mut self, markup: &str) -> ParsedMarkup {
        let arena = std::mem::replace(&mut self.arena, Arena::new());
        let sink = ArenaSink::with_arena(arena);
        let context = QualName::new(None, ns!(html), local_name!("body"));
        let parsed = parse_fragment(sink, Default::default(), context, Vec::new())
            .one(StrTendril::from(markup));

        // Fragment parsing appends a synthetic root element under the document
        // node; the parsed nodes are its children.
        let container = parsed.root;
        let scratch = parsed.arena[container].parent().unwrap_or(container);
        self.arena = parsed.arena;
        ParsedMarkup { scratch, container }
    }
}

/// Owned element name wrapper
#[derive(Debug, Clone)]
struct OwnedElemName(QualName);

impl ElemName for OwnedElemName {
    fn ns(&self) -> &html5ever::Namespace {
        &self.0.ns
    }

    fn local_name(&self) -> &LocalName {
        &self.0.local
    }
}

/// TreeSink implementation for building the arena-based DOM
struct ArenaSink {
    /// Wrapped in RefCell for interior mutability - TreeSink methods take `&self`
    arena: RefCell<Arena<NodeData>>,

    /// Document node (parent of `<html>`, or of the fragment container)
    document: NodeId,

    /// DOCTYPE encountered during parse
    doctype: RefCell<Option<StrTendril>>,
}

impl ArenaSink {
    fn new() -> Self {
        Self::with_arena(Arena::new())
    }

    fn with_arena(mut arena: Arena<NodeData>) -> Self {
        let document = arena.new_node(NodeData {
            kind: NodeKind::Document,
            ns: Namespace::Html,
        });

        ArenaSink {
            arena: RefCell::new(arena),
            document,
            doctype: RefCell::new(None),
        }
    }
}

impl TreeSink for ArenaSink {
    type Handle = NodeId;
    type Output = Document;
    type ElemName<'a>
        = OwnedElemName
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        let arena = self.arena.into_inner();

        // Root is the document node's first child (usually `<html>`)
        let root = self
            .document
            .children(&arena)
            .next()
            .unwrap_or(self.document);

        Document {
            arena,
            root,
            doctype: self.doctype.into_inner(),
        }
    }

    fn parse_error(&self, _msg: Cow<'static, str>) {
        // html5ever recovers automatically
    }

    fn get_document(&self) -> Self::Handle {
        self.document
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn same_node(&self, a: &Self::Handle, b: &Self::Handle) -> bool {
        a == b
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> OwnedElemName {
        let arena = self.arena.borrow();
        let node = arena[*target].get();

        if let NodeKind::Element(elem) = &node.kind {
            let ns = match node.ns {
                Namespace::Html => ns!(html),
                Namespace::Svg => ns!(svg),
                Namespace::MathMl => ns!(mathml),
            };

            OwnedElemName(QualName {
                prefix: None,
                ns,
                local: LocalName::from(elem.tag.as_ref()),
            })
        } else {
            OwnedElemName(QualName {
                prefix: None,
                ns: ns!(html),
                local: local_name!(""),
            })
        }
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        let tag = StrTendril::from(name.local.as_ref());
        let ns = Namespace::from_url(name.ns.as_ref());

        // IndexMap preserves attribute order from the source
        let attr_map: IndexMap<_, _> = attrs
            .into_iter()
            .map(|attr| (attr.name.local.to_string(), attr.value))
            .collect();

        self.arena.borrow_mut().new_node(NodeData {
            kind: NodeKind::Element(ElementData {
                tag,
                attrs: attr_map,
            }),
            ns,
        })
    }

    fn create_comment(&self, text: StrTendril) -> Self::Handle {
        self.arena.borrow_mut().new_node(NodeData {
            kind: NodeKind::Comment(text),
            ns: Namespace::Html,
        })
    }

    fn create_pi(&self, _target: StrTendril, _data: StrTendril) -> Self::Handle {
        // Processing instructions become empty comments
        self.arena.borrow_mut().new_node(NodeData {
            kind: NodeKind::Comment(StrTendril::new()),
            ns: Namespace::Html,
        })
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        let mut arena = self.arena.borrow_mut();
        match child {
            NodeOrText::AppendNode(node) => {
                parent.append(node, &mut arena);
            }
            NodeOrText::AppendText(text) => {
                // Merge with a trailing text node (html5ever behavior)
                let last_child = arena[*parent].last_child();
                if let Some(last_child) = last_child
                    && let NodeKind::Text(existing) = &mut arena[last_child].get_mut().kind
                {
                    existing.push_tendril(&text);
                    return;
                }

                let text_node = arena.new_node(NodeData::text(text));
                parent.append(text_node, &mut arena);
            }
        }
    }

    fn append_before_sibling(&self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>) {
        let mut arena = self.arena.borrow_mut();
        match new_node {
            NodeOrText::AppendNode(node) => {
                sibling.insert_before(node, &mut arena);
            }
            NodeOrText::AppendText(text) => {
                let text_node = arena.new_node(NodeData::text(text));
                sibling.insert_before(text_node, &mut arena);
            }
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        _prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        self.append(element, child);
    }

    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        *self.doctype.borrow_mut() = Some(name);
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        // `<template>` contents are kept inline under the element
        *target
    }

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<Attribute>) {
        let mut arena = self.arena.borrow_mut();
        if let NodeKind::Element(elem) = &mut arena[*target].get_mut().kind {
            for attr in attrs {
                elem.attrs
                    .entry(attr.name.local.to_string())
                    .or_insert(attr.value);
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        target.detach(&mut self.arena.borrow_mut());
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        let mut arena = self.arena.borrow_mut();
        let children: Vec<NodeId> = node.children(&arena).collect();
        for child in children {
            child.detach(&mut arena);
            new_parent.append(child, &mut arena);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let doc = parse("<html><body><p>Hello</p></body></html>");
        assert_eq!(doc.tag_of(doc.root), Some("html"));

        let body = doc.body().expect("should have body");
        let p = doc.first_child_of(body).expect("body should have child");
        assert_eq!(doc.tag_of(p), Some("p"));
        assert_eq!(doc.text_content(p), "Hello");
    }

    #[test]
    fn test_parse_doctype() {
        let doc = parse("<!DOCTYPE html><html><body></body></html>");
        assert_eq!(doc.doctype.as_ref().map(|d| d.as_ref()), Some("html"));
    }

    #[test]
    fn test_parse_recovers_from_stray_markup() {
        // Row-level elements outside a table are dropped, the way browsers do
        let doc = parse("<html><body><tr><td>cell</td></tr></body></html>");
        let body = doc.body().unwrap();
        let children: Vec<_> = doc.children(body).collect();
        assert_eq!(children.len(), 1);
        assert_eq!(doc.text_of(children[0]), Some("cell"));
    }

    #[test]
    fn test_parse_markup_into_live_arena() {
        let mut doc = parse("<html><body><div id=\"keep\"></div></body></html>");
        let body = doc.body().unwrap();
        let div = doc.first_child_of(body).unwrap();

        let parsed = doc.parse_markup("<span>one</span>two");
        let nodes: Vec<_> = doc.children(parsed.container).collect();
        assert_eq!(nodes.len(), 2);
        assert_eq!(doc.tag_of(nodes[0]), Some("span"));
        assert_eq!(doc.text_of(nodes[1]), Some("two"));

        // Ids from before the parse are still valid
        assert_eq!(doc.get_attr(div, "id"), Some("keep"));
        assert_eq!(doc.parent_of(div), Some(body));
    }

    #[test]
    fn test_parse_markup_keeps_leading_whitespace() {
        let mut doc = parse("<html><body></body></html>");
        let parsed = doc.parse_markup("  <b>x</b>");
        let nodes: Vec<_> = doc.children(parsed.container).collect();
        assert_eq!(nodes.len(), 2);
        assert_eq!(doc.text_of(nodes[0]), Some("  "));
        assert_eq!(doc.tag_of(nodes[1]), Some("b"));
    }

    #[test]
    fn test_parse_markup_strips_row_without_table_context() {
        // Same browser rule as in document parsing: in body context a bare
        // <tr> is dropped and only its text survives
        let mut doc = parse("<html><body></body></html>");
        let parsed = doc.parse_markup("<tr><td>cell</td></tr>");
        let nodes: Vec<_> = doc.children(parsed.container).collect();
        assert_eq!(nodes.len(), 1);
        assert_eq!(doc.text_of(nodes[0]), Some("cell"));
    }
}
