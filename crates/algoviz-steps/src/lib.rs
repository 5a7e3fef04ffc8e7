//! Algoviz Steps
//!
//! Deterministic, step-at-a-time executions of the visualizer's algorithms.
//!
//! # Model
//!
//! An [`AlgorithmProcess`] is an iterator over [`AlgorithmStep`]s. Each step
//! is one observable operation (a comparison, a swap, a probe of the search
//! window, a visit) together with a full [`Snapshot`] of the state after that
//! operation, so a renderer never has to replay history.
//!
//! Processes know nothing about time or drawing. Pacing belongs to the
//! playback controller in `algoviz-vis`.
//!
//! # Determinism
//!
//! Identical input always produces an identical sequence. A process is not
//! rewindable; replaying means building a new one with [`create_process`].
//!
//! # Example
//!
//! ```
//! use algoviz_steps::{create_process, AlgorithmInput, AlgorithmKind, StepKind};
//!
//! let input = AlgorithmInput::Array(vec![3, 1, 2]);
//! let steps: Vec<_> = create_process(AlgorithmKind::BubbleSort, input)?.collect();
//!
//! assert_eq!(steps.iter().filter(|s| s.kind() == StepKind::Compare).count(), 3);
//! assert_eq!(steps.last().and_then(|s| s.values()), Some(&[1, 2, 3][..]));
//! # Ok::<(), algoviz_steps::Error>(())
//! ```

mod bubble;
mod catalog;
mod error;
mod kind;
mod process;
mod search;
mod step;
mod traversal;
mod tree;

pub use bubble::{compare_count, BubbleSortProcess};
pub use catalog::{catalog, AlgorithmInfo};
pub use error::{Error, Result};
pub use kind::AlgorithmKind;
pub use process::{create_process, AlgorithmInput, AlgorithmProcess};
pub use search::BinarySearchProcess;
pub use step::{AlgorithmStep, Involved, NodeId, SearchWindow, Snapshot, StepKind};
pub use traversal::BreadthFirstProcess;
pub use tree::TreeNode;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_play_to_the_documented_outcomes() {
        let sorted = create_process(
            AlgorithmKind::BubbleSort,
            AlgorithmInput::preset(AlgorithmKind::BubbleSort),
        )
        .unwrap()
        .last()
        .unwrap();
        assert_eq!(sorted.values(), Some(&[11, 12, 22, 25, 34, 64, 90][..]));

        let found = create_process(
            AlgorithmKind::BinarySearch,
            AlgorithmInput::preset(AlgorithmKind::BinarySearch),
        )
        .unwrap()
        .last()
        .unwrap();
        assert_eq!(found.kind(), StepKind::Found);
        assert_eq!(found.indices(), &[3]);

        let visits: Vec<_> = create_process(
            AlgorithmKind::BreadthFirstTraversal,
            AlgorithmInput::preset(AlgorithmKind::BreadthFirstTraversal),
        )
        .unwrap()
        .filter_map(|s| s.node())
        .map(|n| n.0)
        .collect();
        assert_eq!(visits, (1..=7).collect::<Vec<u64>>());
    }
}
