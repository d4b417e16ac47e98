use std::fmt::{Display, Formatter};

use crate::sequence::Sequence;

/// A compare-and-swap element on two wires.
///
/// If wire `from` carries a one and wire `to` carries a zero, the two values
/// are swapped. With the canonical `from > to` orientation ones move towards
/// the least significant wires, which is the sorted order.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Comparator {
    from: u8,
    to: u8,
}

impl Comparator {
    pub const fn new(from: u8, to: u8) -> Self {
        Self { from, to }
    }

    /// Creates a comparator from the top-down wire numbering used in papers,
    /// where wire 0 is the most significant bit.
    pub const fn from_paper(n: u8, from: u8, to: u8) -> Self {
        Self::new(n - 1 - from, n - 1 - to)
    }

    pub const fn from(self) -> u8 {
        self.from
    }
    pub const fn to(self) -> u8 {
        self.to
    }

    /// The placeholder `(0, 0)` comparator.
    pub const fn is_empty(self) -> bool {
        self.from == 0 && self.to == 0
    }

    /// Returns true if the comparator touches the given wire.
    pub const fn touches(self, wire: u8) -> bool {
        self.from == wire || self.to == wire
    }

    #[inline]
    pub const fn apply(self, s: Sequence) -> Sequence {
        let pattern: Sequence = 1 << self.from;
        let wires: Sequence = pattern | (1 << self.to);
        if s & wires == pattern {
            s ^ wires
        } else {
            s
        }
    }

    /// Paper notation for a network with `n` inputs.
    pub fn paper(self, n: u8) -> PaperComparator {
        PaperComparator { c: self, n }
    }
}

/// Display adapter printing `(a, b)` in paper wire numbering.
pub struct PaperComparator {
    c: Comparator,
    n: u8,
}

impl Display for PaperComparator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let bottom = self.n - 1;
        write!(f, "({}, {})", bottom - self.c.from, bottom - self.c.to)
    }
}
