//! Arena storage for points and the attachment tree built over them.
//!
//! Points live in a generational arena and are referred to by [`PointId`]
//! handles everywhere else. The tree owns every child list directly, keyed by
//! handle, so nothing outside it can alias or mutate a child sequence.

use std::collections::HashMap;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::point::Point;

/// Stable handle to a point in a [`PointArena`].
pub type PointId = Index;

/// Point set in insertion order.
///
/// The arena reuses freed slots, so insertion order is tracked separately.
#[derive(Debug, Default)]
pub struct PointArena {
    arena: Arena<Point>,
    order: Vec<PointId>,
}

impl PointArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            order: Vec::new(),
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub fn insert(&mut self, point: Point) -> PointId {
        let id = self.arena.insert(point);
        self.order.push(id);
        id
    }

    /// Removes the most recently inserted point.
    #[instrument(level = "trace", skip(self))]
    pub fn pop_last(&mut self) -> Option<(PointId, Point)> {
        let id = self.order.pop()?;
        self.arena.remove(id).map(|point| (id, point))
    }

    pub fn get(&self, id: PointId) -> Option<Point> {
        self.arena.get(id).copied()
    }

    /// First inserted point, the start of every tour.
    pub fn first(&self) -> Option<PointId> {
        self.order.first().copied()
    }

    /// Handles in insertion order.
    pub fn ids(&self) -> &[PointId] {
        &self.order
    }

    /// Points in insertion order.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.order.iter().filter_map(|&id| self.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.order.clear();
    }
}

/// Attachment record of one point in the tree.
#[derive(Debug, Clone, Default)]
pub struct TreeNode {
    /// Point this one was attached to, None for the root
    pub parent: Option<PointId>,
    /// Points attached directly to this one, in attachment order
    pub children: Vec<PointId>,
}

/// Tree links over the attached subset of a [`PointArena`].
#[derive(Debug, Default)]
pub struct TreeLinks {
    nodes: HashMap<PointId, TreeNode>,
    root: Option<PointId>,
    /// Attached handles in attachment order, root first
    attached: Vec<PointId>,
}

impl TreeLinks {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            root: None,
            attached: Vec::new(),
        }
    }

    /// Starts the tree at `root`.
    ///
    /// # Panics
    /// If the tree already has nodes.
    #[instrument(level = "trace", skip(self))]
    pub fn set_root(&mut self, root: PointId) {
        assert!(
            self.nodes.is_empty(),
            "tree root set on a non-empty tree"
        );
        self.nodes.insert(root, TreeNode::default());
        self.root = Some(root);
        self.attached.push(root);
    }

    /// Appends `child` to the children of `parent`.
    ///
    /// # Panics
    /// If `parent` is not attached or `child` already is: either would make
    /// the pre-order walk visit a point twice or miss one.
    #[instrument(level = "trace", skip(self))]
    pub fn attach(&mut self, parent: PointId, child: PointId) {
        assert!(
            !self.nodes.contains_key(&child),
            "point {child:?} attached twice"
        );
        let Some(parent_node) = self.nodes.get_mut(&parent) else {
            panic!("parent {parent:?} is not attached");
        };
        parent_node.children.push(child);
        self.nodes.insert(
            child,
            TreeNode {
                parent: Some(parent),
                children: Vec::new(),
            },
        );
        self.attached.push(child);
    }

    pub fn contains(&self, id: PointId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get_node(&self, id: PointId) -> Option<&TreeNode> {
        self.nodes.get(&id)
    }

    pub fn root(&self) -> Option<PointId> {
        self.root
    }

    pub fn children(&self, id: PointId) -> &[PointId] {
        self.nodes
            .get(&id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// Attached handles in attachment order.
    pub fn attached(&self) -> &[PointId] {
        &self.attached
    }

    /// `(parent, child)` links in attachment order.
    pub fn edges(&self) -> impl Iterator<Item = (PointId, PointId)> + '_ {
        self.attached.iter().filter_map(|&child| {
            self.get_node(child)
                .and_then(|node| node.parent)
                .map(|parent| (parent, child))
        })
    }

    pub fn len(&self) -> usize {
        self.attached.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attached.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.attached.clear();
    }

    /// Pre-order walk from the root, children in attachment order.
    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self) -> PreOrderIterator<'_> {
        PreOrderIterator::new(self)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        if let Some(root) = self.root {
            self.calculate_depth(root)
        } else {
            0
        }
    }

    fn calculate_depth(&self, id: PointId) -> usize {
        1 + self
            .children(id)
            .iter()
            .map(|&child| self.calculate_depth(child))
            .max()
            .unwrap_or(0)
    }

    /// Attached points with no children, in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_nodes(&self) -> Vec<PointId> {
        self.iter()
            .filter(|&id| self.children(id).is_empty())
            .collect()
    }
}

pub struct PreOrderIterator<'a> {
    tree: &'a TreeLinks,
    stack: Vec<PointId>,
}

impl<'a> PreOrderIterator<'a> {
    fn new(tree: &'a TreeLinks) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push(root);
        }
        Self { tree, stack }
    }
}

impl Iterator for PreOrderIterator<'_> {
    type Item = PointId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        // reverse push keeps children left-to-right
        for &child in self.tree.children(current).iter().rev() {
            self.stack.push(child);
        }
        Some(current)
    }
}
