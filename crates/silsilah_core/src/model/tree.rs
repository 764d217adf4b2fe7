//! Resolved family tree model.
//!
//! # Responsibility
//! - Hold the single-rooted tree produced by the hierarchy resolver.
//! - Offer read-only traversal and lookup for renderers.
//!
//! # Invariants
//! - Children are owned exclusively by their parent; a node cannot be shared
//!   or revisited, so the structure is acyclic by construction.
//! - Child order equals input record order.
//! - Node ids are unique within one tree.

use crate::model::person::PersonRecord;
use serde::Serialize;
use std::collections::VecDeque;

/// Partner annotation without a tree position of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Spouse {
    pub name: String,
    pub photo: Option<String>,
}

/// One person placed in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonNode {
    #[serde(rename = "data")]
    record: PersonRecord,
    children: Vec<PersonNode>,
    spouse: Option<Spouse>,
}

impl PersonNode {
    pub(crate) fn new(
        record: PersonRecord,
        children: Vec<PersonNode>,
        spouse: Option<Spouse>,
    ) -> Self {
        Self {
            record,
            children,
            spouse,
        }
    }

    pub fn id(&self) -> &str {
        &self.record.id
    }

    pub fn record(&self) -> &PersonRecord {
        &self.record
    }

    /// Direct children in input order.
    pub fn children(&self) -> &[PersonNode] {
        &self.children
    }

    pub fn spouse(&self) -> Option<&Spouse> {
        self.spouse.as_ref()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Single-rooted family tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FamilyTree {
    root: PersonNode,
    #[serde(skip)]
    len: usize,
}

impl FamilyTree {
    pub(crate) fn new(root: PersonNode) -> Self {
        let len = Preorder::new(&root).count();
        Self { root, len }
    }

    pub fn root(&self) -> &PersonNode {
        &self.root
    }

    /// Number of nodes reachable from the root, root included.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false`; a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Depth-first, parent-before-children traversal.
    pub fn iter_preorder(&self) -> Preorder<'_> {
        Preorder::new(&self.root)
    }

    /// Breadth-first traversal, root first, siblings in input order.
    pub fn descendants(&self) -> Vec<&PersonNode> {
        let mut ordered = Vec::with_capacity(self.len);
        let mut queue = VecDeque::from([&self.root]);
        while let Some(node) = queue.pop_front() {
            ordered.push(node);
            queue.extend(node.children.iter());
        }
        ordered
    }

    pub fn find(&self, id: &str) -> Option<&PersonNode> {
        let id = id.trim();
        self.iter_preorder().find(|node| node.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Returns the parent node; `None` for the root and for unknown ids.
    pub fn parent_of(&self, id: &str) -> Option<&PersonNode> {
        let id = id.trim();
        self.iter_preorder()
            .find(|node| node.children.iter().any(|child| child.id() == id))
    }

    /// Distance from the root (root is `0`).
    pub fn depth_of(&self, id: &str) -> Option<usize> {
        let id = id.trim();
        let mut stack = vec![(&self.root, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            if node.id() == id {
                return Some(depth);
            }
            stack.extend(node.children.iter().rev().map(|child| (child, depth + 1)));
        }
        None
    }
}

/// Pre-order iterator over a subtree.
pub struct Preorder<'a> {
    stack: Vec<&'a PersonNode>,
}

impl<'a> Preorder<'a> {
    fn new(root: &'a PersonNode) -> Self {
        Self { stack: vec![root] }
    }
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a PersonNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
