//! Observable units of algorithm progress.

use std::fmt;

/// A tree node identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StepKind {
    /// Two adjacent elements were compared
    Compare,
    /// Two adjacent elements were exchanged
    Swap,
    /// A tree node was dequeued and visited
    Visit,
    /// The search window was probed at its midpoint
    BoundsUpdate,
    /// The search target was located
    Found,
}

/// Positions or nodes a step concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", content = "value", rename_all = "snake_case"))]
pub enum Involved {
    /// Array indices, in ascending order
    Indices(Vec<usize>),
    /// A single tree node
    Node(NodeId),
}

/// Binary search window at the moment a step was emitted.
///
/// `left`/`right` are the inclusive bounds that were probed at `mid`;
/// `next_left`/`next_right` are the bounds after comparing `values[mid]`
/// with the target. `right` is signed because it drops to `-1` when the
/// target is smaller than every element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchWindow {
    pub left: isize,
    pub right: isize,
    pub mid: usize,
    pub next_left: isize,
    pub next_right: isize,
    pub found: bool,
}

impl SearchWindow {
    /// True once the narrowed window is empty.
    pub fn is_exhausted(&self) -> bool {
        self.next_left > self.next_right
    }
}

/// Full state needed to render a step, captured after the step's mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum Snapshot {
    /// Working array of a sort
    Array { values: Vec<i64> },
    /// Search array, target and window
    Search {
        values: Vec<i64>,
        target: i64,
        window: SearchWindow,
    },
    /// Nodes visited so far and nodes still queued
    Traversal {
        visited: Vec<NodeId>,
        queue: Vec<NodeId>,
    },
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Snapshot::Array { values } => write!(f, "{:?}", values),
            Snapshot::Search { values, target, window } => write!(
                f,
                "{:?} target={} left={} right={} mid={}",
                values, target, window.left, window.right, window.mid
            ),
            Snapshot::Traversal { visited, queue } => {
                write!(f, "visited={:?} queue={:?}", ids(visited), ids(queue))
            }
        }
    }
}

fn ids(nodes: &[NodeId]) -> Vec<u64> {
    nodes.iter().map(|n| n.0).collect()
}

/// One unit of observable progress.
///
/// Steps carry no timestamp. Their position in the sequence is the order in
/// which the process emitted them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlgorithmStep {
    kind: StepKind,
    involved: Involved,
    snapshot: Snapshot,
}

impl AlgorithmStep {
    /// `values[j]` was compared with `values[j + 1]`.
    pub fn compare(j: usize, values: &[i64]) -> Self {
        Self::adjacent(StepKind::Compare, j, values)
    }

    /// `values[j]` and `values[j + 1]` were exchanged; `values` is post-swap.
    pub fn swap(j: usize, values: &[i64]) -> Self {
        Self::adjacent(StepKind::Swap, j, values)
    }

    fn adjacent(kind: StepKind, j: usize, values: &[i64]) -> Self {
        Self {
            kind,
            involved: Involved::Indices(vec![j, j + 1]),
            snapshot: Snapshot::Array { values: values.to_vec() },
        }
    }

    /// The window `[left, right]` was probed at `window.mid`.
    pub fn bounds_update(values: &[i64], target: i64, window: SearchWindow) -> Self {
        Self {
            kind: StepKind::BoundsUpdate,
            involved: Involved::Indices(vec![window.mid]),
            snapshot: Snapshot::Search {
                values: values.to_vec(),
                target,
                window,
            },
        }
    }

    /// The target sits at `window.mid`.
    pub fn found(values: &[i64], target: i64, window: SearchWindow) -> Self {
        Self {
            kind: StepKind::Found,
            involved: Involved::Indices(vec![window.mid]),
            snapshot: Snapshot::Search {
                values: values.to_vec(),
                target,
                window,
            },
        }
    }

    /// `node` was visited.
    pub fn visit(node: NodeId, visited: &[NodeId], queue: Vec<NodeId>) -> Self {
        Self {
            kind: StepKind::Visit,
            involved: Involved::Node(node),
            snapshot: Snapshot::Traversal {
                visited: visited.to_vec(),
                queue,
            },
        }
    }

    /// What kind of operation this step records.
    pub fn kind(&self) -> StepKind {
        self.kind
    }

    /// Indices or node highlighted by this step.
    pub fn involved(&self) -> &Involved {
        &self.involved
    }

    /// State after this step was applied.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Highlighted array indices, empty for tree visits.
    pub fn indices(&self) -> &[usize] {
        match &self.involved {
            Involved::Indices(indices) => indices,
            Involved::Node(_) => &[],
        }
    }

    /// Visited node, if this is a traversal step.
    pub fn node(&self) -> Option<NodeId> {
        match self.involved {
            Involved::Node(node) => Some(node),
            Involved::Indices(_) => None,
        }
    }

    /// Array contents for sort and search steps.
    pub fn values(&self) -> Option<&[i64]> {
        match &self.snapshot {
            Snapshot::Array { values } | Snapshot::Search { values, .. } => Some(values),
            Snapshot::Traversal { .. } => None,
        }
    }

    /// Search window for search steps.
    pub fn window(&self) -> Option<&SearchWindow> {
        match &self.snapshot {
            Snapshot::Search { window, .. } => Some(window),
            _ => None,
        }
    }
}
