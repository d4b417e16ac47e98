//! Output sets: the sequences a network can still produce.
//!
//! Sequences are kept in one list per cluster, so membership tests cost
//! O(cluster size). The sets in a search are small enough that this beats
//! hashing, and lists can be cleared and refilled without reallocating.

use std::fmt::{Display, Formatter};

use crate::bitset::BitSet;
use crate::comparator::Comparator;
use crate::metadata::Metadata;
use crate::sequence::{self, cluster_index, Domain, Sequence};

#[derive(Debug, Clone)]
pub struct OutputSet {
    n: u8,
    mask: Sequence,
    clusters: Vec<Vec<Sequence>>,
    meta: Metadata,
}

impl OutputSet {
    /// Creates an empty set for `n` inputs.
    pub fn new(n: u8) -> Self {
        let clusters = n as usize - 1;
        Self {
            n,
            mask: sequence::mask(n),
            clusters: vec![Vec::new(); clusters],
            meta: Metadata::new(clusters),
        }
    }

    /// Creates an empty set whose clusters can hold the whole domain without
    /// reallocating.
    pub fn with_capacity(domain: &Domain) -> Self {
        let mut set = Self::new(domain.n());
        for (cluster, &size) in set.clusters.iter_mut().zip(domain.cluster_sizes()) {
            cluster.reserve_exact(size);
        }
        set
    }

    /// The output set of the empty network: every non-trivial sequence.
    pub fn full(domain: &Domain) -> Self {
        let mut set = Self::with_capacity(domain);
        for &s in domain.sequences() {
            set.push_unchecked(cluster_index(s), s);
        }
        set.compute_meta();
        set
    }

    pub fn n(&self) -> u8 {
        self.n
    }

    pub fn meta(&self) -> &Metadata {
        &self.meta
    }
    pub fn meta_mut(&mut self) -> &mut Metadata {
        &mut self.meta
    }

    pub fn net_id(&self) -> u64 {
        self.meta.net_id
    }
    pub fn set_net_id(&mut self, id: u64) {
        self.meta.net_id = id;
    }

    pub fn is_marked(&self) -> bool {
        self.meta.marked
    }
    pub fn mark(&mut self) {
        self.meta.marked = true;
    }

    /// Total number of sequences.
    pub fn len(&self) -> usize {
        self.clusters.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.iter().all(Vec::is_empty)
    }

    pub fn cluster(&self, k: usize) -> &[Sequence] {
        &self.clusters[k]
    }

    /// Iterates over all sequences, cluster by cluster.
    pub fn iter(&self) -> impl Iterator<Item = Sequence> + '_ {
        self.clusters.iter().flat_map(|c| c.iter().copied())
    }

    /// Adds `s` to its cluster. Returns false if it was already present or is
    /// one of the trivially sorted all-zero and all-one sequences.
    pub fn insert(&mut self, s: Sequence) -> bool {
        if s == 0 || s == self.mask {
            return false;
        }
        self.insert_in(cluster_index(s), s)
    }

    /// Adds `s` to cluster `k`. Returns false if it was already present.
    pub fn insert_in(&mut self, k: usize, s: Sequence) -> bool {
        debug_assert_eq!(k, cluster_index(s));
        if self.contains_in(k, s) {
            return false;
        }
        self.push_unchecked(k, s);
        true
    }

    /// Appends without the membership check. The caller guarantees `s` is new.
    #[inline]
    pub(crate) fn push_unchecked(&mut self, k: usize, s: Sequence) {
        self.clusters[k].push(s);
        self.meta.record(k, s, self.mask);
    }

    pub fn contains(&self, s: Sequence) -> bool {
        s != 0 && s != self.mask && self.contains_in(cluster_index(s), s)
    }

    #[inline]
    pub fn contains_in(&self, k: usize, s: Sequence) -> bool {
        self.clusters[k].contains(&s)
    }

    /// Returns true if every sequence of `self` is in `other`, without any
    /// relabeling of wires.
    pub fn subsumes(&self, other: &OutputSet) -> bool {
        self.len() <= other.len()
            && self
                .clusters
                .iter()
                .enumerate()
                .all(|(k, c)| c.iter().all(|&s| other.contains_in(k, s)))
    }

    pub fn compute_meta(&mut self) {
        self.meta.compute();
    }

    /// Empties the set and resets its metadata, keeping allocations.
    pub fn clear(&mut self) {
        for c in self.clusters.iter_mut() {
            c.clear();
        }
        self.meta.clear();
    }

    /// Returns true if comparator `c` maps the set onto itself.
    ///
    /// Moved sequences leave a `1 0` pattern on the comparator's wires, which
    /// no image can have, so the set is unchanged iff no sequence moves.
    pub fn is_fixed_by(&self, c: Comparator) -> bool {
        self.iter().all(|s| c.apply(s) == s)
    }

    /// Fills `dest` with the images of this set under comparator `c`.
    ///
    /// `seen` is scratch space indexed by sequence; it is cleared first.
    pub fn apply_into(&self, c: Comparator, dest: &mut OutputSet, seen: &mut BitSet) {
        dest.clear();
        seen.clear();
        for (k, cluster) in self.clusters.iter().enumerate() {
            for &s in cluster {
                let t = c.apply(s);
                if seen.insert(t as usize) {
                    dest.push_unchecked(k, t);
                }
            }
        }
        dest.compute_meta();
    }

    /// Replaces the contents with `sequences`, as read back from storage.
    pub(crate) fn refill(&mut self, meta: Metadata, sequences: &[Sequence]) {
        for c in self.clusters.iter_mut() {
            c.clear();
        }
        for &s in sequences {
            self.clusters[cluster_index(s)].push(s);
        }
        self.meta = meta;
    }
}

impl PartialEq for OutputSet {
    fn eq(&self, other: &Self) -> bool {
        self.n == other.n
            && self
                .clusters
                .iter()
                .zip(other.clusters.iter())
                .all(|(a, b)| a.len() == b.len())
            && self.subsumes(other)
    }
}

impl Eq for OutputSet {}

impl Display for OutputSet {
    /// Paper notation: `({0001, 0010}, {0011, 0110}, {0111, 1011})`.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (k, cluster) in self.clusters.iter().enumerate() {
            if k > 0 {
                write!(f, ", ")?;
            }
            let mut sorted = cluster.clone();
            sorted.sort_unstable();
            write!(f, "{{")?;
            for (i, &s) in sorted.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", sequence::to_string(s, self.n))?;
            }
            write!(f, "}}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_of(n: u8, sequences: &[Sequence]) -> OutputSet {
        let mut set = OutputSet::new(n);
        for &s in sequences {
            set.insert(s);
        }
        set.compute_meta();
        set
    }

    #[test]
    fn test_insert_dedups() {
        let mut set = OutputSet::new(4);
        assert!(set.insert(0b0011));
        assert!(!set.insert(0b0011));
        assert!(set.insert(0b0101));
        assert_eq!(set.len(), 2);
        assert_eq!(set.meta().sizes, vec![0, 2, 0]);
    }

    #[test]
    fn test_insert_rejects_sentinels() {
        let mut set = OutputSet::new(4);
        assert!(!set.insert(0));
        assert!(!set.insert(0b1111));
        assert!(set.is_empty());
        assert!(!set.contains(0));
    }

    #[test]
    fn test_contains() {
        let set = set_of(4, &[0b0001, 0b0110]);
        assert!(set.contains(0b0001));
        assert!(set.contains_in(1, 0b0110));
        assert!(!set.contains(0b0010));
    }

    #[test]
    fn test_subsumes_is_reflexive() {
        let set = set_of(4, &[0b0001, 0b0010, 0b0011, 0b0111]);
        assert!(set.subsumes(&set));
    }

    #[test]
    fn test_subsumes_subset() {
        let small = set_of(4, &[0b0001, 0b0011]);
        let large = set_of(4, &[0b0001, 0b0010, 0b0011]);
        assert!(small.subsumes(&large));
        assert!(!large.subsumes(&small));
    }

    #[test]
    fn test_equality_ignores_order() {
        let a = set_of(4, &[0b0001, 0b0010, 0b0011]);
        let b = set_of(4, &[0b0011, 0b0010, 0b0001]);
        let c = set_of(4, &[0b0011, 0b0010]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let domain = Domain::new(4).unwrap();
        let mut set = OutputSet::full(&domain);
        let capacity = set.clusters[1].capacity();
        set.mark();
        set.clear();
        assert!(set.is_empty());
        assert!(!set.is_marked());
        assert_eq!(set.meta().total(), 0);
        assert_eq!(set.clusters[1].capacity(), capacity);
    }

    #[test]
    fn test_full() {
        let domain = Domain::new(4).unwrap();
        let set = OutputSet::full(&domain);
        assert_eq!(set.len(), 14);
        assert_eq!(set.meta().sizes, vec![4, 6, 4]);
        assert_eq!(set.meta().ones_count, vec![4, 4, 4]);
    }

    #[test]
    fn test_apply_into() {
        let domain = Domain::new(3).unwrap();
        let full = OutputSet::full(&domain);
        let mut dest = OutputSet::new(3);
        let mut seen = BitSet::new(8);
        full.apply_into(Comparator::new(2, 1), &mut dest, &mut seen);
        // 100 -> 010 and 101 -> 011 merge with existing sequences.
        assert_eq!(dest, set_of(3, &[0b001, 0b010, 0b011, 0b110]));
        assert_eq!(dest.meta().sizes, vec![2, 2]);
        assert!(!full.is_fixed_by(Comparator::new(2, 1)));
    }

    #[test]
    fn test_is_fixed_by_matches_equality() {
        let domain = Domain::new(4).unwrap();
        let set = set_of(4, &[0b0001, 0b0011, 0b0101, 0b0111]);
        let mut dest = OutputSet::new(4);
        let mut seen = BitSet::new(16);
        for &c in domain.comparators() {
            set.apply_into(c, &mut dest, &mut seen);
            assert_eq!(set.is_fixed_by(c), dest == set, "comparator {:?}", c);
        }
    }

    #[test]
    fn test_display() {
        let set = set_of(4, &[0b0010, 0b0001, 0b0011, 0b0110, 0b0111, 0b1011]);
        assert_eq!(
            set.to_string(),
            "({0001, 0010}, {0011, 0110}, {0111, 1011})"
        );
    }
}
