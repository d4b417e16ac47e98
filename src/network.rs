use std::fmt::{Display, Formatter};

use crate::comparator::Comparator;
use crate::error::{Error, Result};
use crate::sequence::{is_sorted, Domain, Sequence};
use crate::set::OutputSet;

/// An ordered list of at most `capacity` comparators on `n` wires.
///
/// The `id` joins a network to its output set record in storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    pub id: u64,
    n: u8,
    capacity: u8,
    comparators: Vec<Comparator>,
}

impl Network {
    pub fn new(n: u8, capacity: u8) -> Self {
        Self {
            id: 0,
            n,
            capacity,
            comparators: Vec::with_capacity(capacity as usize),
        }
    }

    pub fn n(&self) -> u8 {
        self.n
    }
    pub fn capacity(&self) -> u8 {
        self.capacity
    }
    pub fn len(&self) -> usize {
        self.comparators.len()
    }
    pub fn is_empty(&self) -> bool {
        self.comparators.is_empty()
    }
    pub fn comparators(&self) -> &[Comparator] {
        &self.comparators
    }

    /// Appends a comparator after checking the capacity and the canonical
    /// `from > to` orientation.
    pub fn push_back(&mut self, c: Comparator) -> Result<()> {
        if self.comparators.len() >= self.capacity as usize {
            return Err(Error::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        if c.is_empty() || c.from() >= self.n || c.to() >= self.n || c.from() <= c.to() {
            return Err(Error::InvalidComparator {
                from: c.from(),
                to: c.to(),
                n: self.n,
            });
        }
        self.comparators.push(c);
        Ok(())
    }

    /// Appends a comparator without validation.
    #[inline]
    pub fn push_back_unchecked(&mut self, c: Comparator) {
        debug_assert!(self.comparators.len() < self.capacity as usize);
        self.comparators.push(c);
    }

    pub fn pop_back(&mut self) -> Option<Comparator> {
        self.comparators.pop()
    }

    /// Last comparator, or the empty `(0, 0)` placeholder for an empty network.
    pub fn last(&self) -> Comparator {
        self.comparators.last().copied().unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.id = 0;
        self.comparators.clear();
    }

    #[inline]
    pub fn run(&self, s: Sequence) -> Sequence {
        self.comparators.iter().fold(s, |s, c| c.apply(s))
    }

    /// Runs every non-trivial sequence of the domain through the network.
    pub fn output_set(&self, domain: &Domain) -> OutputSet {
        let mut set = OutputSet::with_capacity(domain);
        for &s in domain.sequences() {
            set.insert(self.run(s));
        }
        set.set_net_id(self.id);
        set.compute_meta();
        set
    }

    /// Returns true if the network sorts every input.
    pub fn is_sorting(&self, domain: &Domain) -> bool {
        domain.sequences().iter().all(|&s| is_sorted(self.run(s)))
    }
}

impl Display for Network {
    /// Paper notation: `(0, 1); (1, 2); (0, 3);`.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, c) in self.comparators.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{};", c.paper(self.n))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(n: u8, pairs: &[(u8, u8)]) -> Network {
        let mut network = Network::new(n, pairs.len() as u8);
        for &(a, b) in pairs {
            network.push_back(Comparator::from_paper(n, a, b)).unwrap();
        }
        network
    }

    #[test]
    fn test_push_back_validates() {
        let mut network = Network::new(4, 2);
        assert!(matches!(
            network.push_back(Comparator::new(1, 2)),
            Err(Error::InvalidComparator { from: 1, to: 2, n: 4 })
        ));
        assert!(network.push_back(Comparator::new(4, 0)).is_err());
        assert!(network.push_back(Comparator::new(2, 2)).is_err());
        assert!(network.push_back(Comparator::default()).is_err());
        assert!(network.is_empty());

        network.push_back(Comparator::new(3, 0)).unwrap();
        network.push_back(Comparator::new(2, 1)).unwrap();
        assert!(matches!(
            network.push_back(Comparator::new(1, 0)),
            Err(Error::CapacityExceeded { capacity: 2 })
        ));
    }

    #[test]
    fn test_pop_back_and_last() {
        let mut network = Network::new(3, 3);
        assert_eq!(network.last(), Comparator::default());
        network.push_back(Comparator::new(2, 1)).unwrap();
        network.push_back(Comparator::new(1, 0)).unwrap();
        assert_eq!(network.last(), Comparator::new(1, 0));
        assert_eq!(network.pop_back(), Some(Comparator::new(1, 0)));
        assert_eq!(network.last(), Comparator::new(2, 1));
    }

    #[test]
    fn test_run_order_matters() {
        let a = paper(4, &[(1, 2), (0, 1)]);
        let b = paper(4, &[(0, 1), (1, 2)]);
        // A single one on the top wire.
        let s = 0b1000;
        assert_ne!(a.run(s), b.run(s));
    }

    #[test]
    fn test_independent_comparators_commute() {
        let a = paper(4, &[(1, 2), (0, 3)]);
        let b = paper(4, &[(0, 3), (1, 2)]);
        for s in 0..16 {
            assert_eq!(a.run(s), b.run(s));
        }
    }

    #[test]
    fn test_output_set() {
        let domain = Domain::new(4).unwrap();
        let network = paper(4, &[(0, 1), (1, 2), (0, 3)]);
        let set = network.output_set(&domain);
        assert_eq!(
            set.to_string(),
            "({0001, 0010}, {0011, 0110}, {0111, 1011})"
        );
    }

    #[test]
    fn test_is_sorting() {
        let domain = Domain::new(3).unwrap();
        let sorter = paper(3, &[(0, 1), (1, 2), (0, 1)]);
        assert!(sorter.is_sorting(&domain));
        assert_eq!(sorter.output_set(&domain).len(), 2);

        let partial = paper(3, &[(0, 1), (1, 2)]);
        assert!(!partial.is_sorting(&domain));
    }

    #[test]
    fn test_display() {
        let network = paper(4, &[(0, 1), (1, 2), (0, 3)]);
        assert_eq!(network.to_string(), "(0, 1); (1, 2); (0, 3);");
    }
}
