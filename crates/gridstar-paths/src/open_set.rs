use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::policy::Cost;

/// An open-set entry: a cell index plus the values it was pushed with.
///
/// Entries are never updated in place. A cheaper path to a cell pushes a
/// fresh entry and the old one goes stale; stale entries are recognised on
/// pop by comparing `g` with the best cost on file.
#[derive(Clone, Copy, Debug)]
pub(crate) struct OpenEntry {
    pub(crate) idx: usize,
    pub(crate) g: Cost,
    pub(crate) h: Cost,
    pub(crate) f: f64,
    pub(crate) seq: u64,
}

impl OpenEntry {
    #[inline]
    pub(crate) fn is_live(&self, best_g: &[Cost], closed: &[bool]) -> bool {
        !closed[self.idx] && self.g <= best_g[self.idx]
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse so BinaryHeap (max-heap) pops smallest f first, then
        // smallest h, then the earliest push.
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.h.cmp(&self.h))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

/// Priority queue of [`OpenEntry`] with lazy deletion.
#[derive(Debug, Default)]
pub(crate) struct OpenSet {
    heap: BinaryHeap<OpenEntry>,
    next_seq: u64,
}

impl OpenSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Push a new entry; the insertion sequence number is assigned here.
    pub(crate) fn push(&mut self, idx: usize, g: Cost, h: Cost, f: f64) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(OpenEntry { idx, g, h, f, seq });
    }

    #[inline]
    pub(crate) fn pop(&mut self) -> Option<OpenEntry> {
        self.heap.pop()
    }

    /// Number of entries, stale ones included.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }

    /// Live entries in pop order.
    pub(crate) fn live(&self, best_g: &[Cost], closed: &[bool]) -> Vec<OpenEntry> {
        let mut v: Vec<OpenEntry> = self
            .heap
            .iter()
            .filter(|e| e.is_live(best_g, closed))
            .copied()
            .collect();
        v.sort_unstable_by(|a, b| b.cmp(a));
        v
    }
}
