//! In-memory pruning kernels.
//!
//! Set A *subsumes* set B when some wire relabeling maps every sequence of A
//! into B. Any sorting network extending B's network then yields one for A of
//! the same size, so B is redundant and gets marked. Marked sets are removed
//! with [`shift_redundant`] before the segment is written back.

use log::trace;

use crate::bitset::BitSet;
use crate::metrics::{Counter, Counters};
use crate::permutation::{self, Constraints};
use crate::set::OutputSet;

/// Subsumption test with counting.
#[derive(Copy, Clone)]
pub struct Subsumption<'a> {
    counters: &'a Counters,
}

impl<'a> Subsumption<'a> {
    pub fn new(counters: &'a Counters) -> Self {
        Self { counters }
    }

    /// Cheap necessary conditions: ST1, ST2 and ST3.
    fn conditions(&self, a: &OutputSet, b: &OutputSet) -> bool {
        self.counters.increment(Counter::St1Calls);
        if !permutation::st1(a, b) {
            return false;
        }
        self.counters.increment(Counter::St1Passed);
        self.counters.increment(Counter::St2Calls);
        if !permutation::st2(a, b) {
            return false;
        }
        self.counters.increment(Counter::St2Passed);
        self.counters.increment(Counter::St3Calls);
        if !permutation::st3(a, b) {
            return false;
        }
        self.counters.increment(Counter::St3Passed);
        true
    }

    /// Returns true if `a` subsumes `b`.
    pub fn test(&self, a: &OutputSet, b: &OutputSet) -> bool {
        if !self.conditions(a, b) {
            return false;
        }
        self.counters.increment(Counter::ValidFastCalls);
        let constraints = Constraints::derive(a, b);
        if !constraints.valid_fast() {
            return false;
        }
        self.counters.increment(Counter::ValidFastPassed);
        self.counters.increment(Counter::GeneratorCalls);

        let mut tried = 0;
        let found = permutation::generate(&constraints, |p| {
            tried += 1;
            permutation::subsumes(p, a, b)
        });
        self.counters.add(Counter::PermutationsTried, tried);

        match found {
            Some(p) => {
                trace!("network {} subsumes {} by {}", a.net_id(), b.net_id(), p);
                self.counters.increment(Counter::Subsumptions);
                true
            }
            None => {
                self.counters.increment(Counter::NoPermutation);
                false
            }
        }
    }

    /// Tests both directions and marks the loser. Returns true if `a` was
    /// marked, so the caller can stop comparing it.
    pub fn mark_pair(&self, a: &mut OutputSet, b: &mut OutputSet) -> bool {
        if self.test(a, b) {
            b.mark();
            false
        } else if self.test(b, a) {
            a.mark();
            true
        } else {
            false
        }
    }
}

/// Marks redundant sets among `sets`, comparing every pair once. Returns the
/// number of newly marked sets.
pub fn mark_within(tester: Subsumption<'_>, sets: &mut [OutputSet]) -> usize {
    let mut marked = 0;
    for i in 0..sets.len() {
        let (head, tail) = sets.split_at_mut(i + 1);
        let a = &mut head[i];
        if a.is_marked() {
            continue;
        }
        for b in tail.iter_mut() {
            if b.is_marked() {
                continue;
            }
            if tester.mark_pair(a, b) {
                marked += 1;
                break;
            }
            if b.is_marked() {
                marked += 1;
            }
        }
    }
    marked
}

/// Compares every set of `a` with every set of `b`, where both may lose.
///
/// `a` is shared between concurrent calls, so its losers are recorded by
/// position in `a_marks` instead of being marked in place. Returns the number
/// of sets marked in `b`.
pub fn mark_between(
    tester: Subsumption<'_>,
    a: &[OutputSet],
    a_marks: &mut BitSet,
    b: &mut [OutputSet],
) -> usize {
    let mut marked = 0;
    for (i, set_a) in a.iter().enumerate() {
        if set_a.is_marked() || a_marks.contains(i) {
            continue;
        }
        for set_b in b.iter_mut() {
            if set_b.is_marked() {
                continue;
            }
            if tester.test(set_a, set_b) {
                set_b.mark();
                marked += 1;
            } else if tester.test(set_b, set_a) {
                a_marks.insert(i);
                break;
            }
        }
    }
    marked
}

/// Marks every set of `b` subsumed by some set of `a`. Sets of `a` are never
/// larger than those of `b`, so only `b` can lose.
pub fn mark_across(tester: Subsumption<'_>, a: &[OutputSet], b: &mut [OutputSet]) -> usize {
    let mut marked = 0;
    for set_b in b.iter_mut() {
        if set_b.is_marked() {
            continue;
        }
        if a
            .iter()
            .any(|set_a| !set_a.is_marked() && tester.test(set_a, set_b))
        {
            set_b.mark();
            marked += 1;
        }
    }
    marked
}

/// Moves unmarked sets to the front, keeping their relative order, and
/// returns how many there are.
pub fn shift_redundant(sets: &mut [OutputSet]) -> usize {
    let mut kept = 0;
    for i in 0..sets.len() {
        if sets[i].is_marked() {
            continue;
        }
        if i != kept {
            sets.swap(i, kept);
        }
        kept += 1;
    }
    kept
}

/// Orders sets so that similar ones end up next to each other.
pub fn sort_by_metadata(sets: &mut [OutputSet]) {
    sets.sort_by(|a, b| a.meta().sort_key_cmp(b.meta()));
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::comparator::Comparator;
    use crate::network::Network;
    use crate::sequence::{Domain, Sequence};

    fn paper_set(domain: &Domain, id: u64, pairs: &[(u8, u8)]) -> OutputSet {
        let n = domain.n();
        let mut network = Network::new(n, pairs.len() as u8);
        network.id = id;
        for &(a, b) in pairs {
            network.push_back(Comparator::from_paper(n, a, b)).unwrap();
        }
        network.output_set(domain)
    }

    fn set_of(n: u8, id: u64, sequences: &[Sequence]) -> OutputSet {
        let mut set = OutputSet::new(n);
        set.set_net_id(id);
        for &s in sequences {
            set.insert(s);
        }
        set.compute_meta();
        set
    }

    #[test]
    fn test_subsumption_counts() {
        let domain = Domain::new(4).unwrap();
        let ca = paper_set(&domain, 1, &[(0, 1), (1, 2), (0, 3)]);
        let cb = paper_set(&domain, 2, &[(0, 1), (0, 2), (1, 3)]);
        let counters = Counters::new();
        let tester = Subsumption::new(&counters);

        assert!(tester.test(&ca, &cb));
        for (calls, passed) in [
            (Counter::St1Calls, Counter::St1Passed),
            (Counter::St2Calls, Counter::St2Passed),
            (Counter::St3Calls, Counter::St3Passed),
            (Counter::ValidFastCalls, Counter::ValidFastPassed),
        ] {
            assert_eq!(counters.get(calls), 1, "{}", calls.name());
            assert_eq!(counters.get(passed), 1, "{}", passed.name());
        }
        assert_eq!(counters.get(Counter::Subsumptions), 1);
        assert!(counters.get(Counter::PermutationsTried) >= 1);
    }

    #[test]
    fn test_st1_short_circuits() {
        let counters = Counters::new();
        let tester = Subsumption::new(&counters);
        let large = set_of(4, 1, &[0b0001, 0b0010]);
        let small = set_of(4, 2, &[0b0001]);
        assert!(!tester.test(&large, &small));
        assert_eq!(counters.get(Counter::St1Calls), 1);
        assert_eq!(counters.get(Counter::St1Passed), 0);
        assert_eq!(counters.get(Counter::St2Calls), 0);
        assert_eq!(counters.get(Counter::St3Calls), 0);
        assert_eq!(counters.get(Counter::ValidFastCalls), 0);
        assert_eq!(counters.get(Counter::GeneratorCalls), 0);
    }

    #[test]
    fn test_mark_pair_marks_the_loser() {
        let counters = Counters::new();
        let tester = Subsumption::new(&counters);

        let mut small = set_of(4, 1, &[0b0001, 0b0011]);
        let mut large = set_of(4, 2, &[0b0010, 0b0001, 0b0110]);
        assert!(!tester.mark_pair(&mut small, &mut large));
        assert!(large.is_marked());
        assert!(!small.is_marked());

        let mut small = set_of(4, 1, &[0b0001, 0b0011]);
        let mut large = set_of(4, 2, &[0b0010, 0b0001, 0b0110]);
        assert!(tester.mark_pair(&mut large, &mut small));
        assert!(large.is_marked());
    }

    #[test]
    fn test_mark_within_keeps_one_of_equivalent() {
        let domain = Domain::new(4).unwrap();
        let counters = Counters::new();
        let mut sets = vec![
            paper_set(&domain, 1, &[(0, 1), (1, 2), (0, 3)]),
            paper_set(&domain, 2, &[(0, 1), (0, 2), (1, 3)]),
        ];
        let marked = mark_within(Subsumption::new(&counters), &mut sets);
        assert_eq!(marked, 1);
        assert!(!sets[0].is_marked());
        assert!(sets[1].is_marked());
    }

    #[test]
    fn test_mark_between_records_a_side() {
        let counters = Counters::new();
        let tester = Subsumption::new(&counters);
        let a = vec![
            set_of(4, 1, &[0b0001, 0b0010, 0b0100]),
            set_of(4, 2, &[0b1000]),
        ];
        let mut b = vec![set_of(4, 3, &[0b0001])];
        let mut marks = BitSet::new(a.len());

        let marked = mark_between(tester, &a, &mut marks, &mut b);
        // a[0] is subsumed by b[0]; a[1] then subsumes b[0] by relabeling.
        assert_eq!(marks.iter().collect::<Vec<_>>(), vec![0]);
        assert_eq!(marked, 1);
        assert!(b[0].is_marked());
    }

    #[test]
    fn test_mark_across_only_marks_b() {
        let counters = Counters::new();
        let tester = Subsumption::new(&counters);
        let a = vec![set_of(4, 1, &[0b0001])];
        let mut b = vec![
            set_of(4, 2, &[0b0001, 0b0010]),
            set_of(4, 3, &[0b0011, 0b0101]),
        ];
        assert_eq!(mark_across(tester, &a, &mut b), 1);
        assert!(b[0].is_marked());
        assert!(!b[1].is_marked());
        assert!(!a[0].is_marked());
    }

    #[test]
    fn test_shift_redundant_is_stable() {
        let mut sets: Vec<OutputSet> = (1..=6).map(|id| set_of(3, id, &[0b001])).collect();
        for i in [0, 2, 3] {
            sets[i].mark();
        }
        let kept = shift_redundant(&mut sets);
        assert_eq!(kept, 3);
        let ids: Vec<u64> = sets[..kept].iter().map(OutputSet::net_id).collect();
        assert_eq!(ids, vec![2, 5, 6]);
        assert!(sets[kept..].iter().all(OutputSet::is_marked));
    }

    #[test]
    fn test_shift_redundant_nothing_marked() {
        let mut sets: Vec<OutputSet> = (1..=3).map(|id| set_of(3, id, &[0b001])).collect();
        assert_eq!(shift_redundant(&mut sets), 3);
        assert_eq!(sets[2].net_id(), 3);
    }

    #[test]
    fn test_sort_by_metadata() {
        let mut sets = vec![
            set_of(4, 1, &[0b0001, 0b0010]),
            set_of(4, 2, &[0b0001]),
            set_of(4, 3, &[0b0001, 0b0011]),
        ];
        sort_by_metadata(&mut sets);
        let ids: Vec<u64> = sets.iter().map(OutputSet::net_id).collect();
        // Cluster sizes [1,0,0] < [1,1,0] < [2,0,0].
        assert_eq!(ids, vec![2, 3, 1]);
    }
}
