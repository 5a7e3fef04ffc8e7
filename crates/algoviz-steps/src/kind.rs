//! The closed set of built-in algorithms.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Algorithm selected for playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum AlgorithmKind {
    /// Adjacent compare-and-swap sort
    BubbleSort,
    /// Halving search over a sorted array
    BinarySearch,
    /// Level-order walk of a rooted tree
    BreadthFirstTraversal,
}

impl AlgorithmKind {
    /// Every kind, in menu order.
    pub const ALL: [AlgorithmKind; 3] = [
        AlgorithmKind::BubbleSort,
        AlgorithmKind::BinarySearch,
        AlgorithmKind::BreadthFirstTraversal,
    ];

    /// Canonical kebab-case name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            AlgorithmKind::BubbleSort => "bubble-sort",
            AlgorithmKind::BinarySearch => "binary-search",
            AlgorithmKind::BreadthFirstTraversal => "breadth-first-traversal",
        }
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlgorithmKind {
    type Err = Error;

    /// Accepts the kebab-case names plus the legacy UI identifiers
    /// (`bubbleSort`, `binarySearch`, `bfsTree`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "bubble-sort" | "bubble_sort" | "bubbleSort" => Ok(AlgorithmKind::BubbleSort),
            "binary-search" | "binary_search" | "binarySearch" => Ok(AlgorithmKind::BinarySearch),
            "breadth-first-traversal" | "breadth_first_traversal" | "bfs" | "bfsTree" => {
                Ok(AlgorithmKind::BreadthFirstTraversal)
            }
            other => Err(Error::UnknownAlgorithm(other.to_string())),
        }
    }
}
