//! Bubble sort, one comparison or swap per step.

use std::iter::FusedIterator;

use crate::step::AlgorithmStep;

/// Number of `Compare` steps bubble sort emits for `n` elements.
pub const fn compare_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Bubble sort over an owned working copy.
///
/// Pass `i` compares `j, j + 1` for every `j < n - 1 - i`. There is no
/// early exit on an already sorted array, so the comparison count depends
/// only on the length.
#[derive(Debug, Clone)]
pub struct BubbleSortProcess {
    values: Vec<i64>,
    pass: usize,
    cursor: usize,
    pending_swap: bool,
}

impl BubbleSortProcess {
    pub fn new(values: Vec<i64>) -> Self {
        Self {
            values,
            pass: 0,
            cursor: 0,
            pending_swap: false,
        }
    }

    /// Current working array.
    pub fn values(&self) -> &[i64] {
        &self.values
    }

    /// True exactly when the next pull yields nothing.
    pub fn is_finished(&self) -> bool {
        !self.pending_swap && self.pass + 1 >= self.values.len()
    }

    fn advance(&mut self) {
        self.cursor += 1;
        if self.cursor + 1 + self.pass >= self.values.len() {
            self.pass += 1;
            self.cursor = 0;
        }
    }
}

impl Iterator for BubbleSortProcess {
    type Item = AlgorithmStep;

    fn next(&mut self) -> Option<AlgorithmStep> {
        if self.pending_swap {
            self.pending_swap = false;
            let j = self.cursor;
            self.values.swap(j, j + 1);
            let step = AlgorithmStep::swap(j, &self.values);
            self.advance();
            return Some(step);
        }
        if self.is_finished() {
            return None;
        }

        let j = self.cursor;
        let step = AlgorithmStep::compare(j, &self.values);
        // Strict: equal neighbours stay put.
        if self.values[j] > self.values[j + 1] {
            self.pending_swap = true;
        } else {
            self.advance();
        }
        Some(step)
    }
}

impl FusedIterator for BubbleSortProcess {}
