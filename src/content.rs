//! Content model for insertion: what gets inserted, where, and what happens
//! to embedded scripts.
//!
//! [`Content`] is resolved once at the facade boundary - downstream code
//! dispatches on the variant instead of re-inspecting values at every call
//! site. [`Position`] is a closed set; unknown keywords fall back to
//! `Bottom` rather than failing.

use indextree::NodeId;
use memchr::memchr;
use smallvec::SmallVec;

use crate::dom::Document;

/// Where new content lands relative to a target node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    /// Before the target's first child
    Top,
    /// As the target's last child
    #[default]
    Bottom,
    /// Immediately preceding the target
    Before,
    /// Immediately following the target
    After,
    /// Replacing the target
    Instead,
}

impl Position {
    /// Normalize an optional keyword: case-insensitive, absent or
    /// unrecognized keywords mean `Bottom`.
    pub fn parse(keyword: Option<&str>) -> Self {
        keyword.map_or(Position::Bottom, Position::from_keyword)
    }

    pub fn from_keyword(keyword: &str) -> Self {
        match keyword.to_ascii_lowercase().as_str() {
            "top" => Position::Top,
            "before" => Position::Before,
            "after" => Position::After,
            "instead" => Position::Instead,
            _ => Position::Bottom,
        }
    }
}

/// A value that can be inserted into the tree.
#[derive(Debug, Clone)]
pub enum Content {
    /// Raw markup text, parsed in the destination's wrap context
    Markup(String),
    /// A single node, moved out of any prior parent
    Node(NodeId),
    /// A fixed-length snapshot of nodes, inserted in order
    Nodes(Vec<NodeId>),
    /// An already-built detached fragment container
    Fragment(NodeId),
    /// One independent insertion per entry, in entry order
    Map(Vec<(Position, Content)>),
}

impl From<&str> for Content {
    fn from(markup: &str) -> Self {
        Content::Markup(markup.to_string())
    }
}

impl From<String> for Content {
    fn from(markup: String) -> Self {
        Content::Markup(markup)
    }
}

impl From<i64> for Content {
    fn from(n: i64) -> Self {
        Content::Markup(n.to_string())
    }
}

impl From<f64> for Content {
    fn from(n: f64) -> Self {
        Content::Markup(n.to_string())
    }
}

impl From<NodeId> for Content {
    fn from(node: NodeId) -> Self {
        Content::Node(node)
    }
}

impl From<Vec<NodeId>> for Content {
    fn from(nodes: Vec<NodeId>) -> Self {
        Content::Nodes(nodes)
    }
}

impl From<&[NodeId]> for Content {
    fn from(nodes: &[NodeId]) -> Self {
        Content::Nodes(nodes.to_vec())
    }
}

impl From<Vec<(Position, Content)>> for Content {
    fn from(entries: Vec<(Position, Content)>) -> Self {
        Content::Map(entries)
    }
}

/// Synthetic wrapper markup needed before a text payload parses under a given
/// destination tag, plus how many first-child levels to descend afterwards.
///
/// Exists purely to satisfy markup-parsing constraints - row/cell/option
/// elements cannot be the root of a body-context fragment. After unwrapping,
/// only the originally intended nodes remain.
#[derive(Debug, Clone, Copy)]
pub(crate) struct WrapContext {
    pub prefix: &'static str,
    pub suffix: &'static str,
    pub depth: usize,
}

const IDENTITY_WRAP: WrapContext = WrapContext {
    prefix: "",
    suffix: "",
    depth: 0,
};

/// Wrap context for a destination tag; aliases resolve to their canonical
/// entry, everything unlisted gets the identity context.
pub(crate) fn wrap_context(tag: &str) -> WrapContext {
    let canonical = match tag {
        "thead" | "tfoot" => "tbody",
        "th" => "td",
        other => other,
    };
    match canonical {
        "table" => WrapContext {
            prefix: "<table>",
            suffix: "</table>",
            depth: 1,
        },
        "tbody" => WrapContext {
            prefix: "<table><tbody>",
            suffix: "</tbody></table>",
            depth: 2,
        },
        "tr" => WrapContext {
            prefix: "<table><tbody><tr>",
            suffix: "</tr></tbody></table>",
            depth: 3,
        },
        "td" => WrapContext {
            prefix: "<table><tbody><tr><td>",
            suffix: "</td></tr></tbody></table>",
            depth: 4,
        },
        "select" => WrapContext {
            prefix: "<select>",
            suffix: "</select>",
            depth: 1,
        },
        _ => IDENTITY_WRAP,
    }
}

/// Script payloads extracted from markup, in document order.
pub(crate) type Scripts = SmallVec<[String; 1]>;

/// Pull complete `<script ...>...</script>` elements out of markup text.
///
/// Returns the script-free markup and the inner payloads in extraction order.
/// An opening tag without its closing tag is left in place untouched.
pub(crate) fn strip_scripts(markup: &str) -> (String, Scripts) {
    const OPEN: &[u8] = b"<script";
    const CLOSE: &[u8] = b"</script>";

    let bytes = markup.as_bytes();
    let mut out = String::with_capacity(markup.len());
    let mut scripts = Scripts::new();
    // everything before `copied` is already in `out`
    let mut copied = 0;
    let mut pos = 0;

    while let Some(offset) = memchr(b'<', &bytes[pos..]) {
        let start = pos + offset;
        if !starts_with_ci(&bytes[start..], OPEN) {
            pos = start + 1;
            continue;
        }
        // the opening tag runs to the next '>'
        let Some(gt) = memchr(b'>', &bytes[start + OPEN.len()..]) else {
            break;
        };
        let body_start = start + OPEN.len() + gt + 1;
        let Some(end) = find_ci(&bytes[body_start..], CLOSE) else {
            pos = start + 1;
            continue;
        };
        let body_end = body_start + end;

        out.push_str(&markup[copied..start]);
        scripts.push(markup[body_start..body_end].to_string());
        copied = body_end + CLOSE.len();
        pos = copied;
    }

    out.push_str(&markup[copied..]);
    (out, scripts)
}

fn starts_with_ci(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.len() >= needle.len() && haystack[..needle.len()].eq_ignore_ascii_case(needle)
}

fn find_ci(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    debug_assert_eq!(needle[0], b'<');
    let mut pos = 0;
    while pos < haystack.len() {
        let Some(offset) = memchr(b'<', &haystack[pos..]) else {
            return None;
        };
        let at = pos + offset;
        if starts_with_ci(&haystack[at..], needle) {
            return Some(at);
        }
        pos = at + 1;
    }
    None
}

/// External script-execution hook.
///
/// Invoked once per extracted script, in extraction order, strictly after the
/// structural mutation of the call has completed. The host receives the
/// document mutably, so scripts may re-enter the mutation facade before the
/// original call returns.
pub trait ScriptHost {
    fn execute(&mut self, doc: &mut Document, script: &str);
}

/// Discards extracted scripts.
pub struct InertScripts;

impl ScriptHost for InertScripts {
    fn execute(&mut self, _doc: &mut Document, _script: &str) {}
}

impl<F> ScriptHost for F
where
    F: FnMut(&mut Document, &str),
{
    fn execute(&mut self, doc: &mut Document, script: &str) {
        self(doc, script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_keywords() {
        assert_eq!(Position::parse(None), Position::Bottom);
        assert_eq!(Position::parse(Some("TOP")), Position::Top);
        assert_eq!(Position::parse(Some("Instead")), Position::Instead);
        assert_eq!(Position::parse(Some("sideways")), Position::Bottom);
    }

    #[test]
    fn test_wrap_aliases() {
        let tbody = wrap_context("tbody");
        let thead = wrap_context("thead");
        assert_eq!(thead.prefix, tbody.prefix);
        assert_eq!(thead.depth, tbody.depth);

        let td = wrap_context("td");
        let th = wrap_context("th");
        assert_eq!(th.suffix, td.suffix);
        assert_eq!(th.depth, 4);
    }

    #[test]
    fn test_wrap_identity_fallback() {
        let div = wrap_context("div");
        assert_eq!(div.prefix, "");
        assert_eq!(div.suffix, "");
        assert_eq!(div.depth, 0);
    }

    #[test]
    fn test_strip_single_script() {
        let (clean, scripts) = strip_scripts("<span>x</span><script>MARK=1</script>");
        assert_eq!(clean, "<span>x</span>");
        assert_eq!(scripts.as_slice(), ["MARK=1"]);
    }

    #[test]
    fn test_strip_multiple_scripts_in_order() {
        let (clean, scripts) = strip_scripts("a<script>one</script>b<SCRIPT>two</SCRIPT>c");
        assert_eq!(clean, "abc");
        assert_eq!(scripts.as_slice(), ["one", "two"]);
    }

    #[test]
    fn test_strip_script_with_attributes() {
        let (clean, scripts) = strip_scripts("<script type=\"text/javascript\">go()</script>rest");
        assert_eq!(clean, "rest");
        assert_eq!(scripts.as_slice(), ["go()"]);
    }

    #[test]
    fn test_unterminated_script_left_alone() {
        let (clean, scripts) = strip_scripts("before<script>half");
        assert_eq!(clean, "before<script>half");
        assert!(scripts.is_empty());
    }

    #[test]
    fn test_no_scripts() {
        let (clean, scripts) = strip_scripts("<b>plain</b>");
        assert_eq!(clean, "<b>plain</b>");
        assert!(scripts.is_empty());
    }
}
