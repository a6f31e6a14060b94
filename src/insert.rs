//! Content insertion pipeline and mutation facade.
//!
//! Content flows top-down: facade (`insert`, `update`, ...) -> position
//! dispatch (`place`) -> fragment builder (`build_fragment`) -> arena
//! primitives. The facade raises no recoverable errors: adjacency operations
//! on a parentless target are deliberate silent no-ops, and structurally
//! invalid requests (a node into its own descendant) surface whatever the
//! arena primitives raise.
//!
//! All operations return the id they were called on, except [`Document::insert_to`]
//! which returns the inserted node's id.

use indextree::NodeId;

use crate::content::{Content, InertScripts, Position, ScriptHost, Scripts, strip_scripts, wrap_context};
use crate::dom::Document;
use crate::tracing_macros::debug;

/// A detached fragment container plus the scripts extracted while building it.
struct BuiltFragment {
    container: NodeId,
    scripts: Scripts,
}

impl Document {
    /// Insert content relative to `target`.
    ///
    /// `position` is a case-insensitive keyword (`top`, `bottom`, `before`,
    /// `after`, `instead`); absent or unrecognized keywords mean `bottom`.
    /// A [`Content::Map`] performs one independent insertion per entry and
    /// ignores `position`. Extracted scripts are discarded; use
    /// [`insert_scripted`](Self::insert_scripted) to execute them.
    pub fn insert(
        &mut self,
        target: NodeId,
        content: impl Into<Content>,
        position: Option<&str>,
    ) -> NodeId {
        self.insert_scripted(target, content, position, &mut InertScripts)
    }

    /// [`insert`](Self::insert) with a host for embedded scripts.
    ///
    /// Each script extracted from markup content is handed to `host` in
    /// extraction order, strictly after the structural mutation completes.
    pub fn insert_scripted(
        &mut self,
        target: NodeId,
        content: impl Into<Content>,
        position: Option<&str>,
        host: &mut dyn ScriptHost,
    ) -> NodeId {
        self.insert_resolved(target, content.into(), Position::parse(position), host)
    }

    /// [`insert`](Self::insert) with an already-resolved position.
    pub fn insert_at(
        &mut self,
        target: NodeId,
        content: impl Into<Content>,
        position: Position,
    ) -> NodeId {
        self.insert_resolved(target, content.into(), position, &mut InertScripts)
    }

    fn insert_resolved(
        &mut self,
        target: NodeId,
        content: Content,
        position: Position,
        host: &mut dyn ScriptHost,
    ) -> NodeId {
        if let Content::Map(entries) = content {
            for (entry_position, entry) in entries {
                self.insert_resolved(target, entry, entry_position, host);
            }
            return target;
        }

        // For top/bottom the fragment lands inside the target; for the
        // adjacency positions it lands as a sibling, inside the parent's
        // markup context. A parentless target keeps its own context (the
        // placement will be a no-op anyway).
        let destination = match position {
            Position::Top | Position::Bottom => target,
            _ => self.parent_of(target).unwrap_or(target),
        };

        let BuiltFragment { container, scripts } = self.build_fragment(destination, content);
        self.place(target, container, position);
        for script in &scripts {
            host.execute(self, script);
        }
        target
    }

    /// Insert this node into `target` at the given position.
    ///
    /// Convenience inverse of [`insert`](Self::insert); returns the
    /// *inserted* node's id.
    pub fn insert_to(&mut self, node: NodeId, target: NodeId, position: Option<&str>) -> NodeId {
        self.insert(target, Content::Node(node), position);
        node
    }

    /// Replace `target` with the given content.
    pub fn replace(&mut self, target: NodeId, content: impl Into<Content>) -> NodeId {
        self.insert_at(target, content, Position::Instead)
    }

    pub fn replace_scripted(
        &mut self,
        target: NodeId,
        content: impl Into<Content>,
        host: &mut dyn ScriptHost,
    ) -> NodeId {
        self.insert_resolved(target, content.into(), Position::Instead, host)
    }

    /// Replace all of `target`'s content.
    ///
    /// Markup and number content becomes the node's sole markup; any other
    /// content is inserted after a [`clean`](Self::clean).
    pub fn update(&mut self, target: NodeId, content: impl Into<Content>) -> NodeId {
        self.update_scripted(target, content, &mut InertScripts)
    }

    pub fn update_scripted(
        &mut self,
        target: NodeId,
        content: impl Into<Content>,
        host: &mut dyn ScriptHost,
    ) -> NodeId {
        match content.into() {
            markup @ Content::Markup(_) => {
                // the target itself is the markup context here
                let BuiltFragment { container, scripts } = self.build_fragment(target, markup);
                self.clean(target);
                self.place(target, container, Position::Bottom);
                for script in &scripts {
                    host.execute(self, script);
                }
            }
            other => {
                self.clean(target);
                self.insert_resolved(target, other, Position::Bottom, host);
            }
        }
        target
    }

    /// Detach `target` from its parent; no-op when it has none.
    pub fn remove(&mut self, target: NodeId) -> NodeId {
        if self.parent_of(target).is_some() {
            target.detach(&mut self.arena);
        }
        target
    }

    /// Put `wrapper` in `target`'s place and move `target` inside it.
    ///
    /// Strictly detach-and-reinsert: the wrapper is pulled out of wherever it
    /// was. No-op when `target` has no parent.
    pub fn wrap(&mut self, target: NodeId, wrapper: NodeId) -> NodeId {
        if self.parent_of(target).is_some() {
            wrapper.detach(&mut self.arena);
            target.insert_before(wrapper, &mut self.arena);
            target.detach(&mut self.arena);
            wrapper.append(target, &mut self.arena);
        }
        target
    }

    /// Detach all of `target`'s children.
    pub fn clean(&mut self, target: NodeId) -> NodeId {
        while let Some(child) = self.first_child_of(target) {
            child.detach(&mut self.arena);
        }
        target
    }

    /// True when the serialized content is blank (whitespace-only or absent).
    pub fn empty(&self, target: NodeId) -> bool {
        self.inner_html(target).trim().is_empty()
    }

    /// Structural visibility query: false when the element carries a `hidden`
    /// attribute or an inline `display: none`.
    pub fn visible(&self, target: NodeId) -> bool {
        if self.get_attr(target, "hidden").is_some() {
            return false;
        }
        self.get_attr(target, "style").is_none_or(|style| !style_hides(style))
    }

    /// Normalize content into a single detached fragment container.
    fn build_fragment(&mut self, destination: NodeId, content: Content) -> BuiltFragment {
        match content {
            Content::Markup(markup) => {
                let (stripped, scripts) = strip_scripts(&markup);
                let tag = self
                    .tag_of(destination)
                    .map(str::to_ascii_lowercase)
                    .unwrap_or_default();
                let wrap = wrap_context(&tag);
                debug!(
                    "building markup fragment for <{}> (wrap depth {})",
                    tag.as_str(),
                    wrap.depth
                );

                let parsed =
                    self.parse_markup(&format!("{}{}{}", wrap.prefix, stripped, wrap.suffix));
                let mut cursor = parsed.container;
                for _ in 0..wrap.depth {
                    match self.first_child_of(cursor) {
                        Some(child) => cursor = child,
                        None => break,
                    }
                }

                let container = self.new_fragment();
                // live collection: the source shrinks as nodes move out, so
                // always take the first remaining child until exhausted
                while let Some(child) = self.take_first_child(cursor) {
                    container.append(child, &mut self.arena);
                }
                parsed.scratch.remove_subtree(&mut self.arena);

                BuiltFragment { container, scripts }
            }
            Content::Node(node) => {
                let container = self.new_fragment();
                node.detach(&mut self.arena);
                container.append(node, &mut self.arena);
                BuiltFragment {
                    container,
                    scripts: Scripts::new(),
                }
            }
            Content::Nodes(nodes) => {
                let container = self.new_fragment();
                // fixed-length snapshot: advance over it in original order
                for node in nodes {
                    node.detach(&mut self.arena);
                    container.append(node, &mut self.arena);
                }
                BuiltFragment {
                    container,
                    scripts: Scripts::new(),
                }
            }
            Content::Fragment(container) => BuiltFragment {
                container,
                scripts: Scripts::new(),
            },
            Content::Map(_) => {
                // maps are expanded by the facade before fragments are built
                BuiltFragment {
                    container: self.new_fragment(),
                    scripts: Scripts::new(),
                }
            }
        }
    }

    /// Splice the fragment's children relative to `target`, then discard the
    /// container. No-op strategies leave the content detached but alive.
    fn place(&mut self, target: NodeId, fragment: NodeId, position: Position) {
        debug!("placing fragment {:?} at {:?} of {:?}", fragment, position, target);
        match position {
            Position::Bottom => {
                while let Some(child) = self.take_first_child(fragment) {
                    target.append(child, &mut self.arena);
                }
            }
            Position::Top => match self.first_child_of(target) {
                Some(first) => {
                    while let Some(child) = self.take_first_child(fragment) {
                        first.insert_before(child, &mut self.arena);
                    }
                }
                None => {
                    while let Some(child) = self.take_first_child(fragment) {
                        target.append(child, &mut self.arena);
                    }
                }
            },
            Position::Before => {
                if self.parent_of(target).is_some() {
                    while let Some(child) = self.take_first_child(fragment) {
                        target.insert_before(child, &mut self.arena);
                    }
                }
            }
            Position::After => {
                if let Some(parent) = self.parent_of(target) {
                    match self.next_sibling_of(target) {
                        Some(sibling) => {
                            while let Some(child) = self.take_first_child(fragment) {
                                sibling.insert_before(child, &mut self.arena);
                            }
                        }
                        None => {
                            while let Some(child) = self.take_first_child(fragment) {
                                parent.append(child, &mut self.arena);
                            }
                        }
                    }
                }
            }
            Position::Instead => {
                if self.parent_of(target).is_some() {
                    while let Some(child) = self.take_first_child(fragment) {
                        target.insert_before(child, &mut self.arena);
                    }
                    target.detach(&mut self.arena);
                }
            }
        }

        // a no-op strategy left its content behind; keep the nodes alive,
        // drop only the scratch container
        while self.take_first_child(fragment).is_some() {}
        fragment.remove_subtree(&mut self.arena);
    }

    /// Detach and return the first child, if any.
    fn take_first_child(&mut self, id: NodeId) -> Option<NodeId> {
        let child = self.first_child_of(id)?;
        child.detach(&mut self.arena);
        Some(child)
    }
}

fn style_hides(style: &str) -> bool {
    style.split(';').any(|declaration| {
        let mut parts = declaration.splitn(2, ':');
        match (parts.next(), parts.next()) {
            (Some(property), Some(value)) => {
                property.trim().eq_ignore_ascii_case("display")
                    && value.trim().eq_ignore_ascii_case("none")
            }
            _ => false,
        }
    })
}
