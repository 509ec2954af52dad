use std::fmt;

/// Bit-per-index set of point indices. Bit `i` set means index `i` is in the set.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct VisitMask(u32);

impl VisitMask {
    /// Largest index count a mask can hold.
    pub const CAPACITY: usize = u32::BITS as usize;

    pub const EMPTY: Self = Self(0);

    /// All indices in `0..n`.
    pub fn full(n: usize) -> Self {
        debug_assert!(n <= Self::CAPACITY, "mask capacity exceeded: n={n}");
        if n >= Self::CAPACITY {
            Self(u32::MAX)
        } else {
            Self((1u32 << n) - 1)
        }
    }

    /// All indices in `0..n` except `idx`.
    pub fn full_except(n: usize, idx: usize) -> Self {
        Self::full(n).without(idx)
    }

    pub fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn contains(self, idx: usize) -> bool {
        idx < Self::CAPACITY && self.0 & (1 << idx) != 0
    }

    #[must_use]
    pub fn with(self, idx: usize) -> Self {
        Self(self.0 | (1 << idx))
    }

    #[must_use]
    pub fn without(self, idx: usize) -> Self {
        Self(self.0 & !(1 << idx))
    }

    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[must_use]
    pub fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Member indices in ascending order.
    pub fn iter(self) -> Indices {
        Indices(self.0)
    }
}

impl fmt::Display for VisitMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#b}", self.0)
    }
}

impl IntoIterator for VisitMask {
    type Item = usize;
    type IntoIter = Indices;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Ascending iterator over the set bits of a [`VisitMask`].
#[derive(Clone, Debug)]
pub struct Indices(u32);

impl Iterator for Indices {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.0 == 0 {
            return None;
        }
        let idx = self.0.trailing_zeros() as usize;
        // clear lowest set bit
        self.0 &= self.0 - 1;
        Some(idx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Indices {}
