//! Arena-based DOM with refcounted strings.
//!
//! All nodes live in one `indextree` arena; a [`NodeId`] is an opaque handle
//! whose structural links (parent, siblings, children) the arena owns. The
//! manipulation layer only rearranges links - detached nodes stay alive in the
//! arena (callers may still hold their ids) until the `Document` is dropped.

use indexmap::IndexMap;
use indextree::{Arena, NodeId};
use tendril::StrTendril;

/// Document = arena + root (strings are StrTendrils with refcounted sharing)
#[derive(Debug, Clone)]
pub struct Document {
    /// THE tree - all nodes live here
    pub arena: Arena<NodeData>,

    /// Root node (usually `<html>` element)
    pub root: NodeId,

    /// DOCTYPE if present (usually "html")
    pub doctype: Option<StrTendril>,
}

/// What goes in each arena slot
#[derive(Debug, Clone)]
pub struct NodeData {
    pub kind: NodeKind,
    pub ns: Namespace,
}

impl NodeData {
    pub(crate) fn element(tag: StrTendril, ns: Namespace) -> Self {
        NodeData {
            kind: NodeKind::Element(ElementData {
                tag,
                attrs: IndexMap::new(),
            }),
            ns,
        }
    }

    pub(crate) fn text(text: StrTendril) -> Self {
        NodeData {
            kind: NodeKind::Text(text),
            ns: Namespace::Html,
        }
    }
}

/// Node types
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Document root (invisible, parent of `<html>`)
    Document,
    /// Detached container used as a carry-vehicle for insertion; never
    /// attached to a parent
    Fragment,
    /// Element with tag and attributes
    Element(ElementData),
    /// Text content
    Text(StrTendril),
    /// HTML comment
    Comment(StrTendril),
}

/// Element data (tag + attributes)
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Tag name (lowercase for HTML)
    pub tag: StrTendril,

    /// Attributes; IndexMap preserves insertion order for consistent
    /// serialization
    pub attrs: IndexMap<String, StrTendril>,
}

/// XML namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Html,
    Svg,
    MathMl,
}

impl Namespace {
    pub fn from_url(url: &str) -> Self {
        match url {
            "http://www.w3.org/2000/svg" => Namespace::Svg,
            "http://www.w3.org/1998/Math/MathML" => Namespace::MathMl,
            _ => Namespace::Html,
        }
    }

    pub fn url(&self) -> &'static str {
        match self {
            Namespace::Html => "http://www.w3.org/1999/xhtml",
            Namespace::Svg => "http://www.w3.org/2000/svg",
            Namespace::MathMl => "http://www.w3.org/1998/Math/MathML",
        }
    }
}

impl Document {
    /// Get immutable reference to node data
    pub fn get(&self, id: NodeId) -> &NodeData {
        self.arena[id].get()
    }

    /// Get mutable reference to node data
    pub fn get_mut(&mut self, id: NodeId) -> &mut NodeData {
        self.arena[id].get_mut()
    }

    /// Iterate children of a node
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        id.children(&self.arena)
    }

    /// Immediate parent, if attached
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].parent()
    }

    /// Next sibling pointer (any node kind)
    pub fn next_sibling_of(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].next_sibling()
    }

    /// Previous sibling pointer (any node kind)
    pub fn prev_sibling_of(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].previous_sibling()
    }

    /// First child pointer (any node kind)
    pub fn first_child_of(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].first_child()
    }

    /// True for element-kind nodes
    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.get(id).kind, NodeKind::Element(_))
    }

    /// Tag name of an element node
    pub fn tag_of(&self, id: NodeId) -> Option<&str> {
        match &self.get(id).kind {
            NodeKind::Element(elem) => Some(elem.tag.as_ref()),
            _ => None,
        }
    }

    /// Text of a text node
    pub fn text_of(&self, id: NodeId) -> Option<&str> {
        match &self.get(id).kind {
            NodeKind::Text(text) => Some(text.as_ref()),
            _ => None,
        }
    }

    /// Attribute value of an element node
    pub fn get_attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.get(id).kind {
            NodeKind::Element(elem) => elem.attrs.get(name).map(|v| v.as_ref()),
            _ => None,
        }
    }

    /// Set an attribute on an element node; ignored for other kinds
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let NodeKind::Element(elem) = &mut self.get_mut(id).kind {
            elem.attrs.insert(name.to_string(), StrTendril::from(value));
        }
    }

    /// Concatenated text of the node and all its descendants
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in id.descendants(&self.arena) {
            if let NodeKind::Text(text) = &self.get(node).kind {
                out.push_str(text);
            }
        }
        out
    }

    /// Create a detached HTML element node
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.arena
            .new_node(NodeData::element(StrTendril::from(tag), Namespace::Html))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.arena.new_node(NodeData::text(StrTendril::from(text)))
    }

    /// Create a detached fragment container
    pub fn new_fragment(&mut self) -> NodeId {
        self.arena.new_node(NodeData {
            kind: NodeKind::Fragment,
            ns: Namespace::Html,
        })
    }

    /// Get the `<body>` element if present
    pub fn body(&self) -> Option<NodeId> {
        self.root
            .children(&self.arena)
            .find(|&id| self.tag_of(id) == Some("body"))
    }

    /// Get the `<head>` element if present
    pub fn head(&self) -> Option<NodeId> {
        self.root
            .children(&self.arena)
            .find(|&id| self.tag_of(id) == Some("head"))
    }
}
