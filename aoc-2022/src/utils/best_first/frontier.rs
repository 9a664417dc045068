//! Max-priority frontier ordered by bound.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// An open node waiting to be expanded.
#[derive(Debug)]
pub(super) struct Node<S, V> {
    pub(super) bound: V,
    pub(super) state: S,
    pub(super) budget: u32,
    seq: u64,
}

// Ordering looks at (bound, seq) only: the highest bound pops first and,
// among equal bounds, the most recently pushed node does.
impl<S, V: Ord> PartialEq for Node<S, V> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<S, V: Ord> Eq for Node<S, V> {}

impl<S, V: Ord> PartialOrd for Node<S, V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S, V: Ord> Ord for Node<S, V> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.bound
            .cmp(&other.bound)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Best-first frontier backed by a `BinaryHeap`.
///
/// Insertion sequence numbers make the pop order fully deterministic, so two
/// runs over the same problem expand the same nodes in the same order.
pub(super) struct Frontier<S, V> {
    heap: BinaryHeap<Node<S, V>>,
    next_seq: u64,
    high_water: usize,
}

impl<S, V: Ord> Frontier<S, V> {
    pub(super) fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
            high_water: 0,
        }
    }

    pub(super) fn push(&mut self, bound: V, state: S, budget: u32) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Node {
            bound,
            state,
            budget,
            seq,
        });
        self.high_water = self.high_water.max(self.heap.len());
    }

    pub(super) fn pop(&mut self) -> Option<Node<S, V>> {
        self.heap.pop()
    }

    pub(super) fn len(&self) -> usize {
        self.heap.len()
    }

    /// Largest size the frontier has reached.
    pub(super) fn high_water(&self) -> usize {
        self.high_water
    }
}
