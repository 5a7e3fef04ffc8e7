//! Rooted trees with ordered children.
//!
//! Children are owned, so a `TreeNode` cannot contain a cycle. Node ids are
//! expected to be unique within one tree; duplicates are visited as distinct
//! nodes but become indistinguishable in snapshots.

use std::collections::HashMap;

use crate::step::NodeId;

/// A node and its children in declared left-to-right order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeNode {
    #[cfg_attr(feature = "serde", serde(alias = "value"))]
    pub id: NodeId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Create a node with the given children.
    pub fn new(id: u64, children: Vec<TreeNode>) -> Self {
        Self {
            id: NodeId(id),
            children,
        }
    }

    /// Create a childless node.
    pub fn leaf(id: u64) -> Self {
        Self::new(id, Vec::new())
    }

    /// Number of nodes in this subtree.
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(TreeNode::len).sum::<usize>()
    }

    /// A tree always has its root.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Depth of every node, root at depth 0.
    pub fn depths(&self) -> HashMap<NodeId, usize> {
        let mut depths = HashMap::new();
        let mut stack = vec![(self, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            depths.insert(node.id, depth);
            stack.extend(node.children.iter().map(|child| (child, depth + 1)));
        }
        depths
    }
}

/// Flattened tree: node ids plus child index lists, root at index 0.
#[derive(Debug, Clone, Default)]
pub(crate) struct Arena {
    pub ids: Vec<NodeId>,
    pub children: Vec<Vec<usize>>,
}

impl Arena {
    pub fn from_root(root: &TreeNode) -> Self {
        let mut arena = Arena::default();
        arena.push(root);
        arena
    }

    fn push(&mut self, node: &TreeNode) -> usize {
        let index = self.ids.len();
        self.ids.push(node.id);
        self.children.push(Vec::with_capacity(node.children.len()));
        for child in &node.children {
            let child_index = self.push(child);
            self.children[index].push(child_index);
        }
        index
    }
}
