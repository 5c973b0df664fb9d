use celf_core::{NodeId, F};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Cached evaluation of one candidate.
///
/// `valid_at` is the seed-set size the gain was computed against; the entry
/// is fresh only while the seed set still has that size.
#[derive(Clone, Copy, Debug)]
pub struct CandidateEntry {
    pub key: F,
    pub node: NodeId,
    pub gain: F,
    pub cost: F,
    pub valid_at: usize,
}

impl CandidateEntry {
    pub fn new(key: F, node: NodeId, gain: F, cost: F, valid_at: usize) -> Self {
        Self { key, node, gain, cost, valid_at }
    }

    pub fn is_fresh(&self, selected: usize) -> bool {
        self.valid_at == selected
    }
}

// Max by key; equal keys pop the lower node id first.
impl Ord for CandidateEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key
            .total_cmp(&other.key)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for CandidateEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for CandidateEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CandidateEntry {}

/// Max-priority queue of candidates.
#[derive(Clone, Debug, Default)]
pub struct CandidateQueue {
    heap: BinaryHeap<CandidateEntry>,
}

impl CandidateQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: CandidateEntry) {
        self.heap.push(entry);
    }

    pub fn pop(&mut self) -> Option<CandidateEntry> {
        self.heap.pop()
    }

    pub fn peek(&self) -> Option<&CandidateEntry> {
        self.heap.peek()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl From<Vec<CandidateEntry>> for CandidateQueue {
    fn from(entries: Vec<CandidateEntry>) -> Self {
        Self { heap: BinaryHeap::from(entries) }
    }
}

impl FromIterator<CandidateEntry> for CandidateQueue {
    fn from_iter<I: IntoIterator<Item = CandidateEntry>>(iter: I) -> Self {
        Self { heap: iter.into_iter().collect() }
    }
}
