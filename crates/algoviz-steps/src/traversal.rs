//! Breadth-first tree traversal, one visit per step.

use std::collections::VecDeque;
use std::iter::FusedIterator;

use crate::step::{AlgorithmStep, NodeId};
use crate::tree::{Arena, TreeNode};

/// Level-order walk of a rooted tree.
///
/// Each step dequeues one node, records it as visited, and then enqueues its
/// children in declared order. The queue in a step's snapshot is taken
/// before that node's children are added.
#[derive(Debug, Clone)]
pub struct BreadthFirstProcess {
    arena: Arena,
    queue: VecDeque<usize>,
    visited: Vec<NodeId>,
}

impl BreadthFirstProcess {
    /// An absent root produces an empty traversal.
    pub fn new(root: Option<&TreeNode>) -> Self {
        let arena = root.map(Arena::from_root).unwrap_or_default();
        let queue = if arena.ids.is_empty() {
            VecDeque::new()
        } else {
            VecDeque::from([0])
        };
        Self {
            visited: Vec::with_capacity(arena.ids.len()),
            arena,
            queue,
        }
    }

    /// Nodes visited so far, in visit order.
    pub fn visited(&self) -> &[NodeId] {
        &self.visited
    }

    /// True once the queue has drained.
    pub fn is_finished(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Iterator for BreadthFirstProcess {
    type Item = AlgorithmStep;

    fn next(&mut self) -> Option<AlgorithmStep> {
        let index = self.queue.pop_front()?;
        let node = self.arena.ids[index];
        self.visited.push(node);

        let queued = self.queue.iter().map(|&i| self.arena.ids[i]).collect();
        let step = AlgorithmStep::visit(node, &self.visited, queued);

        self.queue.extend(self.arena.children[index].iter().copied());
        Some(step)
    }
}

impl FusedIterator for BreadthFirstProcess {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::Snapshot;

    fn demo_tree() -> TreeNode {
        TreeNode::new(
            1,
            vec![
                TreeNode::new(2, vec![TreeNode::leaf(4), TreeNode::leaf(5)]),
                TreeNode::new(3, vec![TreeNode::leaf(6), TreeNode::leaf(7)]),
            ],
        )
    }

    fn order(process: BreadthFirstProcess) -> Vec<u64> {
        process.filter_map(|s| s.node()).map(|n| n.0).collect()
    }

    #[test]
    fn visits_demo_tree_in_level_order() {
        let tree = demo_tree();
        assert_eq!(order(BreadthFirstProcess::new(Some(&tree))), vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn absent_root_yields_nothing() {
        let mut process = BreadthFirstProcess::new(None);
        assert!(process.is_finished());
        assert!(process.next().is_none());
    }

    #[test]
    fn uneven_tree_respects_sibling_order() {
        let tree = TreeNode::new(
            10,
            vec![
                TreeNode::new(20, vec![TreeNode::new(40, vec![TreeNode::leaf(80)])]),
                TreeNode::leaf(30),
                TreeNode::new(35, vec![TreeNode::leaf(50), TreeNode::leaf(60)]),
            ],
        );
        assert_eq!(
            order(BreadthFirstProcess::new(Some(&tree))),
            vec![10, 20, 30, 35, 40, 50, 60, 80]
        );
    }

    #[test]
    fn snapshot_tracks_visited_and_queue() {
        let tree = demo_tree();
        let steps: Vec<_> = BreadthFirstProcess::new(Some(&tree)).collect();

        match steps[1].snapshot() {
            Snapshot::Traversal { visited, queue } => {
                assert_eq!(visited, &[NodeId(1), NodeId(2)]);
                assert_eq!(queue, &[NodeId(3)]);
            }
            other => panic!("unexpected snapshot {:?}", other),
        }
        match steps.last().unwrap().snapshot() {
            Snapshot::Traversal { visited, queue } => {
                assert_eq!(visited.len(), 7);
                assert!(queue.is_empty());
            }
            other => panic!("unexpected snapshot {:?}", other),
        }
    }

    #[test]
    fn single_node_finishes_after_one_visit() {
        let tree = TreeNode::leaf(1);
        let mut process = BreadthFirstProcess::new(Some(&tree));
        assert!(!process.is_finished());
        assert_eq!(process.next().and_then(|s| s.node()), Some(NodeId(1)));
        assert!(process.is_finished());
        assert_eq!(process.visited(), &[NodeId(1)]);
    }
}
