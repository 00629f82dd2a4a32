//! Thread safe transposition table for nim values

use crate::numeric::nimber::Nimber;
use dashmap::DashMap;
use std::{fmt::Debug, hash::Hash};

/// Interface of a transposition table
pub trait TranspositionTable<K> {
    /// Lookup a position value if exists
    fn lookup_position(&self, position: &K) -> Option<Nimber>;

    /// Save position and its nim value
    fn insert_position(&self, position: K, value: Nimber);
}

/// Transposition table (cache) of position keys and their nim values.
///
/// Nim value is a pure function of the position, so a key is written at most once and an
/// existing value is never replaced. Concurrent inserts of the same key are safe.
pub struct ParallelTranspositionTable<K> {
    positions: DashMap<K, Nimber, ahash::RandomState>,
}

impl<K> ParallelTranspositionTable<K>
where
    K: Eq + Hash,
{
    /// Create new empty transposition table.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get number of saved positions
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Check if table stores any position
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Remove all saved positions
    #[inline]
    pub fn clear(&self) {
        self.positions.clear();
    }

    /// Visit every saved position with its value, in no particular order
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&K, Nimber),
    {
        for entry in &self.positions {
            f(entry.key(), *entry.value());
        }
    }
}

impl<K> Debug for ParallelTranspositionTable<K>
where
    K: Debug + Hash + Eq,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ParallelTranspositionTable { positions } = self;

        f.debug_struct("ParallelTranspositionTable")
            .field("positions", positions)
            .finish()
    }
}

impl<K> Default for ParallelTranspositionTable<K>
where
    K: Hash + Eq,
{
    #[inline]
    fn default() -> Self {
        Self {
            positions: DashMap::default(),
        }
    }
}

impl<K> TranspositionTable<K> for ParallelTranspositionTable<K>
where
    K: Eq + Hash,
{
    #[inline]
    fn lookup_position(&self, position: &K) -> Option<Nimber> {
        self.positions.get(position).map(|value| *value)
    }

    #[inline]
    fn insert_position(&self, position: K, value: Nimber) {
        let stored = *self.positions.entry(position).or_insert(value);
        debug_assert_eq!(stored, value, "Position value changed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_and_clears() {
        let tt = ParallelTranspositionTable::new();
        assert!(tt.is_empty());
        assert_eq!(tt.lookup_position(&(0_usize, vec![1_u32])), None);

        tt.insert_position((0, vec![1]), Nimber::new(1));
        tt.insert_position((1, vec![1]), Nimber::new(0));
        assert_eq!(tt.len(), 2);
        assert_eq!(tt.lookup_position(&(0, vec![1])), Some(Nimber::new(1)));
        assert_eq!(tt.lookup_position(&(1, vec![1])), Some(Nimber::new(0)));

        let mut visited = 0;
        tt.for_each(|_, _| visited += 1);
        assert_eq!(visited, 2);

        tt.clear();
        assert!(tt.is_empty());
        assert_eq!(tt.lookup_position(&(0, vec![1])), None);
    }

    #[test]
    fn redundant_writes_are_harmless() {
        let tt = ParallelTranspositionTable::new();
        tt.insert_position("position", Nimber::new(3));
        tt.insert_position("position", Nimber::new(3));
        assert_eq!(tt.len(), 1);
        assert_eq!(tt.lookup_position(&"position"), Some(Nimber::new(3)));
    }
}
