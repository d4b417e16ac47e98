//! Summary of an output set consumed by the subsumption tests.
//!
//! For every cluster `k` the accumulators record which wires carry a one in
//! at least one sequence (`ones[k]`) and which carry a zero in at least one
//! sequence (`zeros[k]`). A permutation mapping set A into set B must map
//! every position of `A.ones[k]` into `B.ones[k]`, and likewise for zeros.

use std::cmp::Ordering;

use crate::sequence::Sequence;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    /// Id of the network this set belongs to.
    pub net_id: u64,
    pub ones: Vec<Sequence>,
    pub ones_count: Vec<u8>,
    pub zeros: Vec<Sequence>,
    pub zeros_count: Vec<u8>,
    /// Number of sequences per cluster.
    pub sizes: Vec<u32>,
    /// Proven redundant, pending removal.
    pub marked: bool,
}

impl Metadata {
    pub fn new(clusters: usize) -> Self {
        Self {
            net_id: 0,
            ones: vec![0; clusters],
            ones_count: vec![0; clusters],
            zeros: vec![0; clusters],
            zeros_count: vec![0; clusters],
            sizes: vec![0; clusters],
            marked: false,
        }
    }

    pub fn clusters(&self) -> usize {
        self.sizes.len()
    }

    /// Accounts for a new sequence `s` in cluster `k`.
    ///
    /// Popcounts are stale until [`compute`][Metadata::compute] is called.
    #[inline]
    pub fn record(&mut self, k: usize, s: Sequence, mask: Sequence) {
        self.ones[k] |= s;
        self.zeros[k] |= !s & mask;
        self.sizes[k] += 1;
    }

    /// Refreshes the accumulator popcounts.
    pub fn compute(&mut self) {
        for k in 0..self.clusters() {
            self.ones_count[k] = self.ones[k].count_ones() as u8;
            self.zeros_count[k] = self.zeros[k].count_ones() as u8;
        }
    }

    pub fn clear(&mut self) {
        self.net_id = 0;
        self.ones.fill(0);
        self.ones_count.fill(0);
        self.zeros.fill(0);
        self.zeros_count.fill(0);
        self.sizes.fill(0);
        self.marked = false;
    }

    /// Total number of sequences.
    pub fn total(&self) -> usize {
        self.sizes.iter().map(|&s| s as usize).sum()
    }

    /// Ordering that places structurally similar sets next to each other:
    /// cluster sizes first, then accumulator popcounts.
    pub fn sort_key_cmp(&self, other: &Self) -> Ordering {
        self.sizes
            .cmp(&other.sizes)
            .then_with(|| self.ones_count.cmp(&other.ones_count))
            .then_with(|| self.zeros_count.cmp(&other.zeros_count))
    }
}
