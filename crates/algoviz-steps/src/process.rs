//! Process construction and the closed set of process variants.

use std::iter::FusedIterator;

use crate::bubble::BubbleSortProcess;
use crate::error::{Error, Result};
use crate::kind::AlgorithmKind;
use crate::search::BinarySearchProcess;
use crate::step::AlgorithmStep;
use crate::traversal::BreadthFirstProcess;
use crate::tree::TreeNode;

/// Problem input, captured by value when a process is created.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum AlgorithmInput {
    /// Array to sort
    Array(Vec<i64>),
    /// Ascending array and the value to find
    Search { values: Vec<i64>, target: i64 },
    /// Tree root, or `None` for an empty tree
    Tree(Option<TreeNode>),
}

impl AlgorithmInput {
    /// Short name of the input shape.
    pub fn shape(&self) -> &'static str {
        match self {
            AlgorithmInput::Array(_) => "array",
            AlgorithmInput::Search { .. } => "search",
            AlgorithmInput::Tree(_) => "tree",
        }
    }
}

/// A single run of one algorithm over fixed input.
///
/// Processes cannot be rewound. To replay, build a new one from the same
/// input; identical input always yields an identical step sequence.
#[derive(Debug, Clone)]
pub enum AlgorithmProcess {
    BubbleSort(BubbleSortProcess),
    BinarySearch(BinarySearchProcess),
    BreadthFirstTraversal(BreadthFirstProcess),
}

/// Build a process for `kind` over `input`.
pub fn create_process(kind: AlgorithmKind, input: AlgorithmInput) -> Result<AlgorithmProcess> {
    AlgorithmProcess::new(kind, input)
}

impl AlgorithmProcess {
    /// Build a process, rejecting inputs whose shape does not fit `kind`.
    pub fn new(kind: AlgorithmKind, input: AlgorithmInput) -> Result<Self> {
        match (kind, input) {
            (AlgorithmKind::BubbleSort, AlgorithmInput::Array(values)) => {
                Ok(AlgorithmProcess::BubbleSort(BubbleSortProcess::new(values)))
            }
            (AlgorithmKind::BinarySearch, AlgorithmInput::Search { values, target }) => Ok(
                AlgorithmProcess::BinarySearch(BinarySearchProcess::new(values, target)),
            ),
            (AlgorithmKind::BreadthFirstTraversal, AlgorithmInput::Tree(root)) => Ok(
                AlgorithmProcess::BreadthFirstTraversal(BreadthFirstProcess::new(root.as_ref())),
            ),
            (kind, _) => Err(Error::InputMismatch {
                kind,
                expected: expected_shape(kind),
            }),
        }
    }

    pub fn kind(&self) -> AlgorithmKind {
        match self {
            AlgorithmProcess::BubbleSort(_) => AlgorithmKind::BubbleSort,
            AlgorithmProcess::BinarySearch(_) => AlgorithmKind::BinarySearch,
            AlgorithmProcess::BreadthFirstTraversal(_) => AlgorithmKind::BreadthFirstTraversal,
        }
    }

    /// True exactly when the next pull would yield nothing.
    pub fn is_finished(&self) -> bool {
        match self {
            AlgorithmProcess::BubbleSort(p) => p.is_finished(),
            AlgorithmProcess::BinarySearch(p) => p.is_finished(),
            AlgorithmProcess::BreadthFirstTraversal(p) => p.is_finished(),
        }
    }
}

fn expected_shape(kind: AlgorithmKind) -> &'static str {
    match kind {
        AlgorithmKind::BubbleSort => "array",
        AlgorithmKind::BinarySearch => "search",
        AlgorithmKind::BreadthFirstTraversal => "tree",
    }
}

impl Iterator for AlgorithmProcess {
    type Item = AlgorithmStep;

    fn next(&mut self) -> Option<AlgorithmStep> {
        match self {
            AlgorithmProcess::BubbleSort(p) => p.next(),
            AlgorithmProcess::BinarySearch(p) => p.next(),
            AlgorithmProcess::BreadthFirstTraversal(p) => p.next(),
        }
    }
}

impl FusedIterator for AlgorithmProcess {}
