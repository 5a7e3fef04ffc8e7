//! Descriptions and demo inputs for the built-in algorithms.

use crate::kind::AlgorithmKind;
use crate::process::AlgorithmInput;
use crate::tree::TreeNode;

/// Display metadata for one algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AlgorithmInfo {
    pub kind: AlgorithmKind,
    pub name: &'static str,
    pub time_complexity: &'static str,
    pub space_complexity: &'static str,
    pub description: &'static str,
    pub pseudocode: &'static str,
}

const BUBBLE_SORT: AlgorithmInfo = AlgorithmInfo {
    kind: AlgorithmKind::BubbleSort,
    name: "Bubble Sort",
    time_complexity: "O(n²)",
    space_complexity: "O(1)",
    description: "Repeatedly steps through the list, compares adjacent elements and swaps them if they are in the wrong order.",
    pseudocode: "for i = 0 to n-2:\n    for j = 0 to n-i-2:\n        if arr[j] > arr[j+1]:\n            swap arr[j] and arr[j+1]",
};

const BINARY_SEARCH: AlgorithmInfo = AlgorithmInfo {
    kind: AlgorithmKind::BinarySearch,
    name: "Binary Search",
    time_complexity: "O(log n)",
    space_complexity: "O(1)",
    description: "Finds the position of a target value within a sorted array by repeatedly dividing the search interval in half.",
    pseudocode: "left = 0, right = n-1\nwhile left <= right:\n    mid = (left + right) / 2\n    if arr[mid] == target: return mid\n    elif arr[mid] < target: left = mid + 1\n    else: right = mid - 1",
};

const BREADTH_FIRST: AlgorithmInfo = AlgorithmInfo {
    kind: AlgorithmKind::BreadthFirstTraversal,
    name: "BFS Tree Traversal",
    time_complexity: "O(n)",
    space_complexity: "O(w)",
    description: "Explores the tree level by level, visiting all nodes at the current depth before moving to nodes at the next depth.",
    pseudocode: "queue = [root]\nwhile queue not empty:\n    node = queue.dequeue()\n    visit(node)\n    for child in node.children:\n        queue.enqueue(child)",
};

impl AlgorithmKind {
    /// Display metadata for this kind.
    pub const fn info(&self) -> &'static AlgorithmInfo {
        match self {
            AlgorithmKind::BubbleSort => &BUBBLE_SORT,
            AlgorithmKind::BinarySearch => &BINARY_SEARCH,
            AlgorithmKind::BreadthFirstTraversal => &BREADTH_FIRST,
        }
    }
}

/// Metadata for every kind, in menu order.
pub fn catalog() -> [&'static AlgorithmInfo; 3] {
    AlgorithmKind::ALL.map(|kind| kind.info())
}

impl AlgorithmInput {
    /// The demo input shown for `kind` when the user supplies none.
    pub fn preset(kind: AlgorithmKind) -> Self {
        match kind {
            AlgorithmKind::BubbleSort => AlgorithmInput::Array(vec![64, 34, 25, 12, 22, 11, 90]),
            AlgorithmKind::BinarySearch => AlgorithmInput::Search {
                values: vec![1, 3, 5, 7, 9, 11, 13, 15, 17, 19],
                target: 7,
            },
            AlgorithmKind::BreadthFirstTraversal => AlgorithmInput::Tree(Some(TreeNode::new(
                1,
                vec![
                    TreeNode::new(2, vec![TreeNode::leaf(4), TreeNode::leaf(5)]),
                    TreeNode::new(3, vec![TreeNode::leaf(6), TreeNode::leaf(7)]),
                ],
            ))),
        }
    }
}
