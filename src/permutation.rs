//! Wire relabelings and the search for one that embeds an output set into
//! another.
//!
//! Permutations are written source-to-destination: `p[i]` is the wire that bit
//! `i` is moved to. Searching all `n!` relabelings is hopeless beyond a few
//! wires, so the search is narrowed in stages:
//!
//! 1. [`st1`], [`st2`] and [`st3`] compare cardinalities and accumulator
//!    popcounts, rejecting most pairs in O(n).
//! 2. [`Constraints::derive`] intersects, for every source wire, the set of
//!    destination wires compatible with the per-cluster accumulators.
//!    [`Constraints::valid_fast`] rejects when some wire has no candidate.
//! 3. [`generate`] enumerates the bijections allowed by the constraints and
//!    stops at the first one the caller accepts.

use std::fmt::{Display, Formatter};

use crate::sequence::{self, Sequence, MAX_INPUTS};
use crate::set::OutputSet;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Permutation {
    n: u8,
    p: [u8; MAX_INPUTS],
}

impl Permutation {
    pub fn identity(n: u8) -> Self {
        let mut p = [0; MAX_INPUTS];
        for (i, v) in p.iter_mut().enumerate().take(n as usize) {
            *v = i as u8;
        }
        Self { n, p }
    }

    /// Builds a permutation from its image list, `p[i]` being the destination
    /// of wire `i`.
    pub fn from_slice(p: &[u8]) -> Self {
        assert!(p.len() <= MAX_INPUTS, "too many wires: {}", p.len());
        let mut arr = [0; MAX_INPUTS];
        arr[..p.len()].copy_from_slice(p);
        Self {
            n: p.len() as u8,
            p: arr,
        }
    }

    /// Builds a permutation from paper notation, where wires are numbered
    /// from the most significant bit.
    pub fn from_paper(paper: &[u8]) -> Self {
        let n = paper.len();
        assert!(n <= MAX_INPUTS, "too many wires: {}", n);
        let mut p = [0; MAX_INPUTS];
        for (i, &v) in paper.iter().enumerate() {
            p[n - 1 - i] = (n - 1) as u8 - v;
        }
        Self { n: n as u8, p }
    }

    pub fn n(&self) -> u8 {
        self.n
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.p[..self.n as usize]
    }

    #[inline]
    pub fn apply(&self, s: Sequence) -> Sequence {
        let mut product = 0;
        let mut rest = s;
        while rest != 0 {
            let i = rest.trailing_zeros() as usize;
            product |= 1 << self.p[i];
            rest &= rest - 1;
        }
        product
    }

    /// Fills `dest` with the image of `set`.
    pub fn apply_to_set(&self, set: &OutputSet, dest: &mut OutputSet) {
        dest.clear();
        for s in set.iter() {
            dest.insert(self.apply(s));
        }
        dest.compute_meta();
    }
}

impl Display for Permutation {
    /// Paper notation, e.g. `(0,1,3,2)`.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let last = self.n - 1;
        write!(f, "(")?;
        for i in (0..self.n as usize).rev() {
            write!(f, "{}", last - self.p[i])?;
            if i > 0 {
                write!(f, ",")?;
            }
        }
        write!(f, ")")
    }
}

/// Candidate destination wires for every source wire.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Constraints {
    n: u8,
    c: [Sequence; MAX_INPUTS],
}

impl Constraints {
    /// No restriction: every wire may go anywhere.
    pub fn new(n: u8) -> Self {
        let mut c = [0; MAX_INPUTS];
        c[..n as usize].fill(sequence::mask(n));
        Self { n, c }
    }

    pub fn from_slice(c: &[Sequence]) -> Self {
        assert!(c.len() <= MAX_INPUTS, "too many wires: {}", c.len());
        let mut arr = [0; MAX_INPUTS];
        arr[..c.len()].copy_from_slice(c);
        Self {
            n: c.len() as u8,
            c: arr,
        }
    }

    /// Restrictions on a permutation mapping `a` into `b`.
    ///
    /// In every cluster, a wire carrying a one somewhere in `a` must land on
    /// a wire carrying a one somewhere in `b`. Same for zeros.
    pub fn derive(a: &OutputSet, b: &OutputSet) -> Self {
        let mut constraints = Self::new(a.n());
        let (ma, mb) = (a.meta(), b.meta());
        for k in 0..ma.clusters() {
            constraints.restrict(ma.ones[k], mb.ones[k]);
            constraints.restrict(ma.zeros[k], mb.zeros[k]);
        }
        constraints
    }

    /// Every wire set in `base` must map into `goal`.
    pub fn restrict(&mut self, base: Sequence, goal: Sequence) {
        let mut rest = base;
        while rest != 0 {
            let i = rest.trailing_zeros() as usize;
            self.c[i] &= goal;
            rest &= rest - 1;
        }
    }

    /// False if some wire has no candidate destination left.
    pub fn valid_fast(&self) -> bool {
        self.as_slice().iter().all(|&c| c != 0)
    }

    pub fn as_slice(&self) -> &[Sequence] {
        &self.c[..self.n as usize]
    }
}

/// Enumerates the permutations allowed by `constraints` in lexicographic
/// order, returning the first one `accept` approves.
pub fn generate<F>(constraints: &Constraints, mut accept: F) -> Option<Permutation>
where
    F: FnMut(&Permutation) -> bool,
{
    let n = constraints.n as usize;
    if n == 0 {
        return None;
    }
    let mut perm = Permutation {
        n: constraints.n,
        p: [0; MAX_INPUTS],
    };
    // Destinations not yet tried at each depth.
    let mut remaining = [0 as Sequence; MAX_INPUTS];
    let mut used: Sequence = 0;
    let mut depth = 0;
    remaining[0] = constraints.c[0];

    loop {
        let candidates = remaining[depth] & !used;
        if candidates == 0 {
            if depth == 0 {
                return None;
            }
            depth -= 1;
            used &= !(1 << perm.p[depth]);
            continue;
        }

        let dest = candidates.trailing_zeros();
        remaining[depth] &= !(1 << dest);
        perm.p[depth] = dest as u8;

        if depth + 1 == n {
            if accept(&perm) {
                return Some(perm);
            }
            continue;
        }

        used |= 1 << dest;
        depth += 1;
        remaining[depth] = constraints.c[depth];
    }
}

/// True if every sequence of `a`, relabeled by `p`, is in `b`.
pub fn subsumes(p: &Permutation, a: &OutputSet, b: &OutputSet) -> bool {
    (0..a.meta().clusters()).all(|k| a.cluster(k).iter().all(|&s| b.contains_in(k, p.apply(s))))
}

/// Total size test: `|a| <= |b|`.
pub fn st1(a: &OutputSet, b: &OutputSet) -> bool {
    a.meta().total() <= b.meta().total()
}

/// Per-cluster size test.
pub fn st2(a: &OutputSet, b: &OutputSet) -> bool {
    a.meta().sizes.iter().zip(&b.meta().sizes).all(|(x, y)| x <= y)
}

/// Accumulator popcount test.
pub fn st3(a: &OutputSet, b: &OutputSet) -> bool {
    let (ma, mb) = (a.meta(), b.meta());
    ma.ones_count.iter().zip(&mb.ones_count).all(|(x, y)| x <= y)
        && ma.zeros_count.iter().zip(&mb.zeros_count).all(|(x, y)| x <= y)
}

/// Finds a permutation `p` with `p(a) ⊆ b`, if any.
pub fn find_embedding(a: &OutputSet, b: &OutputSet) -> Option<Permutation> {
    if !st1(a, b) || !st2(a, b) || !st3(a, b) {
        return None;
    }
    let constraints = Constraints::derive(a, b);
    if !constraints.valid_fast() {
        return None;
    }
    generate(&constraints, |p| subsumes(p, a, b))
}
