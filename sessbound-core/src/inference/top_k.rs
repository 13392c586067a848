//! Bounded selection of the lowest-scoring candidates

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A pool position with its score
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    /// Lower is a stronger boundary
    pub score: f64,
    /// Position in the stream
    pub position: usize,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then(self.position.cmp(&other.position))
    }
}

/// Keeps the `capacity` smallest items pushed into it
///
/// Backed by a max-heap: once full, each push evicts the current maximum.
#[derive(Debug)]
pub struct TopK<T: Ord> {
    capacity: usize,
    heap: BinaryHeap<T>,
}

impl<T: Ord> TopK<T> {
    /// Create an empty selection
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            heap: BinaryHeap::with_capacity(capacity.saturating_add(1).min(1 << 16)),
        }
    }

    /// Offer one item
    pub fn push(&mut self, item: T) {
        if self.capacity == 0 {
            return;
        }
        self.heap.push(item);
        if self.heap.len() > self.capacity {
            self.heap.pop();
        }
    }

    /// Number of items kept
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether nothing is kept
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// The kept items, smallest first
    pub fn into_sorted_vec(self) -> Vec<T> {
        self.heap.into_sorted_vec()
    }
}
