//! Binary search, one probe per step.

use std::cmp::Ordering;
use std::iter::FusedIterator;

use crate::step::{AlgorithmStep, SearchWindow};

/// Binary search for `target` in an ascending array.
///
/// The array is assumed sorted; ordering is not checked. When the target is
/// absent the sequence simply ends after the last `BoundsUpdate`, whose
/// narrowed window is empty.
#[derive(Debug, Clone)]
pub struct BinarySearchProcess {
    values: Vec<i64>,
    target: i64,
    left: isize,
    right: isize,
    pending_found: Option<SearchWindow>,
    found: Option<usize>,
}

impl BinarySearchProcess {
    pub fn new(values: Vec<i64>, target: i64) -> Self {
        let right = values.len() as isize - 1;
        Self {
            values,
            target,
            left: 0,
            right,
            pending_found: None,
            found: None,
        }
    }

    /// Value being searched for.
    pub fn target(&self) -> i64 {
        self.target
    }

    /// Index of the target once the `Found` step has been emitted.
    pub fn found_index(&self) -> Option<usize> {
        self.found
    }

    pub fn is_finished(&self) -> bool {
        self.pending_found.is_none() && (self.found.is_some() || self.left > self.right)
    }
}

impl Iterator for BinarySearchProcess {
    type Item = AlgorithmStep;

    fn next(&mut self) -> Option<AlgorithmStep> {
        if let Some(window) = self.pending_found.take() {
            self.found = Some(window.mid);
            return Some(AlgorithmStep::found(&self.values, self.target, window));
        }
        if self.is_finished() {
            return None;
        }

        let (left, right) = (self.left, self.right);
        let mid = (left + (right - left) / 2) as usize;
        let (next_left, next_right) = match self.values[mid].cmp(&self.target) {
            Ordering::Equal => (left, right),
            Ordering::Less => (mid as isize + 1, right),
            Ordering::Greater => (left, mid as isize - 1),
        };
        let window = SearchWindow {
            left,
            right,
            mid,
            next_left,
            next_right,
            found: false,
        };

        if self.values[mid] == self.target {
            self.pending_found = Some(SearchWindow { found: true, ..window });
        } else {
            self.left = next_left;
            self.right = next_right;
        }
        Some(AlgorithmStep::bounds_update(&self.values, self.target, window))
    }
}

impl FusedIterator for BinarySearchProcess {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::StepKind;

    fn odds() -> Vec<i64> {
        vec![1, 3, 5, 7, 9, 11, 13, 15, 17, 19]
    }

    #[test]
    fn finds_demo_target() {
        let mut process = BinarySearchProcess::new(odds(), 7);
        let steps: Vec<_> = process.by_ref().collect();

        let last = steps.last().unwrap();
        assert_eq!(last.kind(), StepKind::Found);
        assert_eq!(last.indices(), &[3]);
        assert!(last.window().unwrap().found);
        assert_eq!(process.found_index(), Some(3));

        let probes = steps.iter().filter(|s| s.kind() == StepKind::BoundsUpdate).count();
        assert!(probes <= 4, "took {} probes", probes);
    }

    #[test]
    fn midpoint_sequence_for_demo() {
        let mids: Vec<_> = BinarySearchProcess::new(odds(), 7)
            .filter(|s| s.kind() == StepKind::BoundsUpdate)
            .map(|s| s.window().unwrap().mid)
            .collect();
        assert_eq!(mids, vec![4, 1, 2, 3]);
    }

    #[test]
    fn absent_target_ends_without_found() {
        let steps: Vec<_> = BinarySearchProcess::new(odds(), 8).collect();
        assert!(steps.iter().all(|s| s.kind() == StepKind::BoundsUpdate));
        assert!(steps.last().unwrap().window().unwrap().is_exhausted());
    }

    #[test]
    fn target_below_every_element() {
        let steps: Vec<_> = BinarySearchProcess::new(odds(), 0).collect();
        let window = steps.last().unwrap().window().copied().unwrap();
        assert_eq!(window.mid, 0);
        assert_eq!(window.next_right, -1);
        assert!(window.is_exhausted());
    }

    #[test]
    fn empty_array_yields_nothing() {
        let mut process = BinarySearchProcess::new(vec![], 3);
        assert!(process.is_finished());
        assert!(process.next().is_none());
        assert_eq!(process.found_index(), None);
    }

    #[test]
    fn single_element_hit() {
        let kinds: Vec<_> = BinarySearchProcess::new(vec![4], 4).map(|s| s.kind()).collect();
        assert_eq!(kinds, vec![StepKind::BoundsUpdate, StepKind::Found]);
    }

    #[test]
    fn not_finished_between_match_and_found() {
        let mut process = BinarySearchProcess::new(vec![4], 4);
        process.next();
        assert!(!process.is_finished());
        process.next();
        assert!(process.is_finished());
        assert!(process.next().is_none());
    }
}
