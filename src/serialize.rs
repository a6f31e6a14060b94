//! HTML5-correct serialization of arena subtrees.
//!
//! Follows HTML5 serialization rules:
//! - Void elements never get end tags
//! - Text content and attribute values are escaped
//! - Raw text elements (script, style) are not escaped
//! - RCDATA elements (title, textarea) escape only `&` and `<`
//! - Foreign content (SVG/MathML) may use self-closing syntax

use indextree::NodeId;

use crate::dom::{Document, ElementData, Namespace, NodeKind};

/// HTML5 void elements - these never have end tags.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Raw text elements - content is not escaped.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// RCDATA elements - only `&` and `<` are escaped.
const RCDATA_ELEMENTS: &[&str] = &["title", "textarea"];

fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

fn is_raw_text_element(tag: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(&tag)
}

fn is_rcdata_element(tag: &str) -> bool {
    RCDATA_ELEMENTS.contains(&tag)
}

impl Document {
    /// Serialize the node's children to an HTML string.
    ///
    /// For document and fragment nodes this is the whole visible content.
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(id) {
            self.write_node(&mut out, child);
        }
        out
    }

    /// Serialize the node itself (opening tag, content, end tag).
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(&mut out, id);
        out
    }

    fn write_node(&self, out: &mut String, id: NodeId) {
        match &self.get(id).kind {
            // invisible containers
            NodeKind::Document | NodeKind::Fragment => {
                for child in self.children(id) {
                    self.write_node(out, child);
                }
            }
            NodeKind::Element(elem) => self.write_element(out, id, elem),
            NodeKind::Text(text) => write_text_escaped(out, text),
            NodeKind::Comment(text) => {
                out.push_str("<!--");
                // escape -- to prevent early closing
                out.push_str(&text.replace("--", "- -"));
                out.push_str("-->");
            }
        }
    }

    fn write_element(&self, out: &mut String, id: NodeId, elem: &ElementData) {
        let tag = elem.tag.as_ref();

        out.push('<');
        out.push_str(tag);
        for (name, value) in &elem.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            write_attr_escaped(out, value);
            out.push('"');
        }

        if is_void_element(tag) {
            out.push('>');
            return;
        }

        let is_foreign = self.get(id).ns != Namespace::Html;
        if is_foreign && self.first_child_of(id).is_none() {
            out.push_str("/>");
            return;
        }

        out.push('>');

        if is_raw_text_element(tag) || is_rcdata_element(tag) {
            let rcdata = is_rcdata_element(tag);
            for child in self.children(id) {
                if let NodeKind::Text(text) = &self.get(child).kind {
                    if rcdata {
                        write_rcdata_escaped(out, text);
                    } else {
                        out.push_str(text);
                    }
                }
            }
        } else {
            for child in self.children(id) {
                self.write_node(out, child);
            }
        }

        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }
}

fn write_text_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn write_rcdata_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            _ => out.push(c),
        }
    }
}

fn write_attr_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
