//! Filtered traversal of the parent and sibling pointer chains.
//!
//! All the collecting walks only produce element nodes; text and comment
//! nodes are traversed *through* but never collected. When a rule is given,
//! each candidate element is additionally filtered by it.
//!
//! The structural-match predicate is an external capability: this engine
//! calls [`Matcher::matches`] and defines no selector grammar of its own.

use indextree::NodeId;

use crate::dom::Document;

/// Which pointer chain a walk follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Parent,
    NextSibling,
    PrevSibling,
}

/// Structural-match predicate used to filter traversal results.
///
/// Implemented for any `Fn(&Document, NodeId) -> bool`, so ad-hoc rules can
/// be written as closures; a selector engine can provide richer impls.
pub trait Matcher {
    fn matches(&self, doc: &Document, node: NodeId) -> bool;
}

impl<F> Matcher for F
where
    F: Fn(&Document, NodeId) -> bool,
{
    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        self(doc, node)
    }
}

impl Document {
    fn step(&self, from: NodeId, direction: Direction) -> Option<NodeId> {
        let node = &self.arena[from];
        match direction {
            Direction::Parent => node.parent(),
            Direction::NextSibling => node.next_sibling(),
            Direction::PrevSibling => node.previous_sibling(),
        }
    }

    fn collect_chain(
        &self,
        start: NodeId,
        direction: Direction,
        rule: Option<&dyn Matcher>,
    ) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut cursor = self.step(start, direction);
        while let Some(node) = cursor {
            if self.is_element(node) && rule.is_none_or(|r| r.matches(self, node)) {
                found.push(node);
            }
            cursor = self.step(node, direction);
        }
        found
    }

    fn first_in_chain(
        &self,
        start: NodeId,
        direction: Direction,
        rule: Option<&dyn Matcher>,
    ) -> Option<NodeId> {
        let mut cursor = self.step(start, direction);
        while let Some(node) = cursor {
            if self.is_element(node) && rule.is_none_or(|r| r.matches(self, node)) {
                return Some(node);
            }
            cursor = self.step(node, direction);
        }
        None
    }

    /// Collect every element along a pointer chain, starting after `start`.
    pub fn walk(&self, start: NodeId, direction: Direction) -> Vec<NodeId> {
        self.collect_chain(start, direction, None)
    }

    /// Like [`walk`](Self::walk), keeping only elements the rule accepts.
    pub fn walk_matching(
        &self,
        start: NodeId,
        direction: Direction,
        rule: &dyn Matcher,
    ) -> Vec<NodeId> {
        self.collect_chain(start, direction, Some(rule))
    }

    /// Element ancestors, nearest first.
    pub fn parents(&self, start: NodeId) -> Vec<NodeId> {
        self.walk(start, Direction::Parent)
    }

    pub fn parents_matching(&self, start: NodeId, rule: &dyn Matcher) -> Vec<NodeId> {
        self.walk_matching(start, Direction::Parent, rule)
    }

    /// The immediate parent pointer, whatever its kind.
    pub fn parent(&self, start: NodeId) -> Option<NodeId> {
        self.parent_of(start)
    }

    /// Nearest ancestor element the rule accepts.
    pub fn parent_matching(&self, start: NodeId, rule: &dyn Matcher) -> Option<NodeId> {
        self.first_in_chain(start, Direction::Parent, Some(rule))
    }

    /// Element siblings after `start`, in document order.
    pub fn next_siblings(&self, start: NodeId) -> Vec<NodeId> {
        self.walk(start, Direction::NextSibling)
    }

    pub fn next_siblings_matching(&self, start: NodeId, rule: &dyn Matcher) -> Vec<NodeId> {
        self.walk_matching(start, Direction::NextSibling, rule)
    }

    /// Element siblings before `start`, nearest first.
    pub fn prev_siblings(&self, start: NodeId) -> Vec<NodeId> {
        self.walk(start, Direction::PrevSibling)
    }

    pub fn prev_siblings_matching(&self, start: NodeId, rule: &dyn Matcher) -> Vec<NodeId> {
        self.walk_matching(start, Direction::PrevSibling, rule)
    }

    /// All element siblings in document order, `start` excluded.
    pub fn siblings(&self, start: NodeId) -> Vec<NodeId> {
        let mut all = self.prev_siblings(start);
        all.reverse();
        all.extend(self.next_siblings(start));
        all
    }

    pub fn siblings_matching(&self, start: NodeId, rule: &dyn Matcher) -> Vec<NodeId> {
        let mut all = self.prev_siblings_matching(start, rule);
        all.reverse();
        all.extend(self.next_siblings_matching(start, rule));
        all
    }

    /// First element sibling after `start`.
    pub fn next(&self, start: NodeId) -> Option<NodeId> {
        self.first_in_chain(start, Direction::NextSibling, None)
    }

    pub fn next_matching(&self, start: NodeId, rule: &dyn Matcher) -> Option<NodeId> {
        self.first_in_chain(start, Direction::NextSibling, Some(rule))
    }

    /// First element sibling before `start`.
    pub fn prev(&self, start: NodeId) -> Option<NodeId> {
        self.first_in_chain(start, Direction::PrevSibling, None)
    }

    pub fn prev_matching(&self, start: NodeId, rule: &dyn Matcher) -> Option<NodeId> {
        self.first_in_chain(start, Direction::PrevSibling, Some(rule))
    }

    /// Element children of `start` - not a pointer walk, a direct-child query.
    pub fn sub_nodes(&self, start: NodeId) -> Vec<NodeId> {
        self.children(start)
            .filter(|&id| self.is_element(id))
            .collect()
    }

    pub fn sub_nodes_matching(&self, start: NodeId, rule: &dyn Matcher) -> Vec<NodeId> {
        self.children(start)
            .filter(|&id| self.is_element(id) && rule.matches(self, id))
            .collect()
    }
}
