//! Nimber is a number that represents a Nim heap of a given size.

use ahash::AHashSet;
use auto_ops::impl_op_ex;
use std::fmt::Display;

/// Number that represents a Nim heap of given size.
///
/// Addition is overloaded to Nim sum.
#[repr(transparent)]
#[derive(Debug, Hash, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Nimber(u32);

impl Nimber {
    /// Construct new nimber
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the underlying nimber value
    pub const fn value(&self) -> u32 {
        self.0
    }

    /// Compute the minimum excluded value from a collection of nimbers.
    /// See <https://en.wikipedia.org/wiki/Mex_(mathematics)>
    pub fn mex<I>(nimbers: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        nimbers.into_iter().collect::<NimberSet>().mex()
    }
}

// xor is correct, that's how nimbers additon works
impl_op_ex!(+|lhs: &Nimber, rhs: &Nimber| -> Nimber { Nimber(lhs.0 ^ rhs.0) });
impl_op_ex!(+=|lhs: &mut Nimber, rhs: &Nimber| { lhs.0 ^= rhs.0 });

impl Display for Nimber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0 == 0 {
            write!(f, "0")
        } else if self.0 == 1 {
            write!(f, "*")
        } else {
            write!(f, "*{}", self.0)
        }
    }
}

/// Set of distinct nimbers reachable from a position. Only membership matters, so repeated
/// insertions of the same value are no-ops.
#[derive(Debug, Clone, Default)]
pub struct NimberSet {
    nimbers: AHashSet<Nimber>,
}

impl NimberSet {
    /// Create an empty set
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add nimber to the set
    #[inline]
    pub fn insert(&mut self, nimber: Nimber) {
        self.nimbers.insert(nimber);
    }

    /// Check if nimber is in the set
    #[inline]
    pub fn contains(&self, nimber: Nimber) -> bool {
        self.nimbers.contains(&nimber)
    }

    /// Number of distinct nimbers in the set
    #[inline]
    pub fn len(&self) -> usize {
        self.nimbers.len()
    }

    /// Check if set is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nimbers.is_empty()
    }

    /// Smallest nimber absent from the set
    pub fn mex(&self) -> Nimber {
        let mut current = Nimber::new(0);
        while self.contains(current) {
            current.0 += 1;
        }
        current
    }
}

impl FromIterator<Nimber> for NimberSet {
    fn from_iter<T: IntoIterator<Item = Nimber>>(iter: T) -> Self {
        Self {
            nimbers: iter.into_iter().collect(),
        }
    }
}

impl Extend<Nimber> for NimberSet {
    fn extend<T: IntoIterator<Item = Nimber>>(&mut self, iter: T) {
        self.nimbers.extend(iter);
    }
}
