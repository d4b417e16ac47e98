//! Binary sequences and the precomputed tables of a problem size.
//!
//! A sequence is a bit vector: bit `i` is the value on wire `i`. Sorted
//! sequences have all their ones in the least significant positions.
//!
//! Only sequences with `1..n` set bits are meaningful; the all-zero and
//! all-one sequences are trivially sorted and never stored. A sequence with
//! `p` set bits belongs to cluster `p - 1`, so there are `n - 1` clusters.

use crate::comparator::Comparator;
use crate::error::{Error, Result};

pub type Sequence = u32;

/// Largest supported number of inputs.
pub const MAX_INPUTS: usize = 17;

/// Cluster index of a (non-zero) sequence: its number of set bits minus one.
#[inline]
pub fn cluster_index(s: Sequence) -> usize {
    debug_assert_ne!(s, 0, "the all-zero sequence has no cluster");
    s.count_ones() as usize - 1
}

/// Returns true if all ones of `s` are in the least significant positions.
#[inline]
pub fn is_sorted(s: Sequence) -> bool {
    (s >> s.count_ones()) == 0
}

/// Mask with the `n` lowest bits set.
#[inline]
pub const fn mask(n: u8) -> Sequence {
    if n as u32 >= Sequence::BITS {
        Sequence::MAX
    } else {
        (1 << n) - 1
    }
}

/// Binary rendering, most significant wire first.
pub fn to_string(s: Sequence, n: u8) -> String {
    format!("{:0width$b}", s, width = n as usize)
}

/// Immutable tables derived from the number of inputs.
///
/// Built once per search and shared by reference with every component.
#[derive(Debug, Clone)]
pub struct Domain {
    n: u8,
    mask: Sequence,
    sequences: Vec<Sequence>,
    cluster_sizes: Vec<usize>,
    comparators: Vec<Comparator>,
}

impl Domain {
    pub fn new(n: u8) -> Result<Self> {
        if n < 2 || n as usize > MAX_INPUTS {
            return Err(Error::UnsupportedSize(n));
        }

        let mask = mask(n);
        let sequences: Vec<Sequence> = (1..mask).collect();

        let mut cluster_sizes = vec![0; n as usize - 1];
        for &s in sequences.iter() {
            cluster_sizes[cluster_index(s)] += 1;
        }

        // Canonical orientation: from > to, highest wire first.
        let mut comparators = Vec::with_capacity(n as usize * (n as usize - 1) / 2);
        for from in (1..n).rev() {
            for to in (0..from).rev() {
                comparators.push(Comparator::new(from, to));
            }
        }

        Ok(Self {
            n,
            mask,
            sequences,
            cluster_sizes,
            comparators,
        })
    }

    pub fn n(&self) -> u8 {
        self.n
    }
    pub fn mask(&self) -> Sequence {
        self.mask
    }
    /// Number of clusters, `n - 1`.
    pub fn clusters(&self) -> usize {
        self.n as usize - 1
    }

    /// All non-trivial sequences, in ascending order.
    pub fn sequences(&self) -> &[Sequence] {
        &self.sequences
    }

    /// Number of non-trivial sequences in each cluster.
    pub fn cluster_sizes(&self) -> &[usize] {
        &self.cluster_sizes
    }

    /// All comparators in canonical orientation.
    pub fn comparators(&self) -> &[Comparator] {
        &self.comparators
    }

    /// Returns true if the comparator is valid for this domain.
    pub fn is_valid(&self, c: Comparator) -> bool {
        c.from() < self.n && c.to() < self.n && c.from() > c.to()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_index() {
        assert_eq!(cluster_index(0b001), 0);
        assert_eq!(cluster_index(0b101), 1);
        assert_eq!(cluster_index(0b111), 2);
    }

    #[test]
    fn test_is_sorted() {
        assert!(is_sorted(0b0001));
        assert!(is_sorted(0b0111));
        assert!(!is_sorted(0b0010));
        assert!(!is_sorted(0b1011));
    }

    #[test]
    fn test_domain_n4() {
        let domain = Domain::new(4).unwrap();
        assert_eq!(domain.mask(), 0b1111);
        assert_eq!(domain.sequences().len(), 14);
        assert_eq!(domain.cluster_sizes(), &[4, 6, 4]);
        assert_eq!(domain.comparators().len(), 6);
        assert_eq!(domain.comparators()[0], Comparator::new(3, 2));
        assert_eq!(domain.comparators()[5], Comparator::new(1, 0));
        assert!(domain.comparators().iter().all(|&c| domain.is_valid(c)));
    }

    #[test]
    fn test_domain_rejects_sizes() {
        assert!(matches!(Domain::new(1), Err(Error::UnsupportedSize(1))));
        assert!(Domain::new(18).is_err());
        assert!(Domain::new(17).is_ok());
    }

    #[test]
    fn test_to_string() {
        assert_eq!(to_string(0b0110, 4), "0110");
        assert_eq!(to_string(0b1, 3), "001");
    }
}
