//! Adjacency matrix of piles

use core::ops::Range;
use std::fmt::Display;

/// Directed graph of piles stored as a flat adjacency matrix.
///
/// Entry `(from, to)` is set when pile `to` may be played right after pile `from`.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawAdjacencyMatrix"))]
pub struct AdjacencyMatrix {
    size: usize,
    adjacency_matrix: Vec<bool>,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawAdjacencyMatrix {
    size: usize,
    adjacency_matrix: Vec<bool>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawAdjacencyMatrix> for AdjacencyMatrix {
    type Error = &'static str;

    fn try_from(raw: RawAdjacencyMatrix) -> Result<Self, Self::Error> {
        Self::from_vec(raw.size, raw.adjacency_matrix)
            .ok_or("Adjacency matrix does not have size * size entries")
    }
}

impl Display for AdjacencyMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (idx, elem) in self.adjacency_matrix.iter().enumerate() {
            write!(f, "{}", u8::from(*elem))?;
            if (idx + 1) % self.size == 0 {
                writeln!(f)?;
            }
        }

        Ok(())
    }
}

impl AdjacencyMatrix {
    /// Create a graph without any edges between piles
    #[inline]
    pub fn empty(size: usize) -> Self {
        Self {
            size,
            adjacency_matrix: vec![false; size * size],
        }
    }

    /// Create a graph from flattened, row-major adjacency matrix. Must be correct length
    #[inline]
    pub fn from_vec(size: usize, vec: Vec<bool>) -> Option<Self> {
        if vec.len() != size * size {
            return None;
        }

        Some(Self {
            size,
            adjacency_matrix: vec,
        })
    }

    /// Create a graph from adjacency matrix rows. Every row must have `size` entries
    #[inline]
    pub fn from_matrix(size: usize, matrix: &[Vec<bool>]) -> Option<Self> {
        if matrix.len() != size || matrix.iter().any(|row| row.len() != size) {
            return None;
        }
        let vec: Vec<bool> = matrix.iter().flatten().copied().collect();
        Self::from_vec(size, vec)
    }

    /// Piles connected in a line: `0 - 1 - ... - (size - 1)`
    pub fn path(size: usize) -> Self {
        let mut graph = Self::empty(size);
        for pile in 1..size {
            graph.connect_both(pile - 1, pile, true);
        }
        graph
    }

    /// Path with the last pile connected back to the first one
    pub fn cycle(size: usize) -> Self {
        let mut graph = Self::path(size);
        if size > 2 {
            graph.connect_both(size - 1, 0, true);
        }
        graph
    }

    /// Every pile connected to every other pile, without self loops
    pub fn complete(size: usize) -> Self {
        let mut graph = Self::complete_with_loops(size);
        for pile in graph.vertices() {
            graph.connect(pile, pile, false);
        }
        graph
    }

    /// Every pile connected to every pile including itself. Nim on such graph is the classic Nim.
    pub fn complete_with_loops(size: usize) -> Self {
        Self {
            size,
            adjacency_matrix: vec![true; size * size],
        }
    }

    /// Get number of piles in the graph.
    #[inline]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Check if `to` may be played after `from`.
    #[inline]
    pub fn are_adjacent(&self, from: usize, to: usize) -> bool {
        self.adjacency_matrix[self.size * from + to]
    }

    /// Set or clear the edge `from -> to`.
    #[inline]
    pub fn connect(&mut self, from: usize, to: usize, connect: bool) {
        self.adjacency_matrix[self.size * from + to] = connect;
    }

    /// Set or clear both `lhs -> rhs` and `rhs -> lhs`.
    #[inline]
    pub fn connect_both(&mut self, lhs: usize, rhs: usize, connect: bool) {
        self.connect(lhs, rhs, connect);
        self.connect(rhs, lhs, connect);
    }

    /// Get piles that may be played after `from`.
    #[inline]
    pub fn adjacent_to(&self, from: usize) -> impl Iterator<Item = usize> + '_ {
        self.adjacency_matrix[self.size * from..self.size * (from + 1)]
            .iter()
            .enumerate()
            .filter_map(|(to, connected)| connected.then_some(to))
    }

    /// Get iterator over piles
    #[inline]
    pub const fn vertices(&self) -> Range<usize> {
        0..self.size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// ```text
    /// 1 -> 3 -> 2
    ///  \   |
    ///   \  v
    ///    > 0
    /// ```
    fn test_matrix() -> AdjacencyMatrix {
        let mut m = AdjacencyMatrix::empty(4);
        m.connect(3, 0, true);
        m.connect(3, 2, true);
        m.connect(1, 3, true);
        m.connect(1, 0, true);
        m
    }

    #[test]
    fn set_adjacency_matrix() {
        let m = test_matrix();
        assert_eq!(
            m,
            AdjacencyMatrix::from_vec(
                4,
                vec![
                    false, false, false, false, true, false, false, true, false, false, false,
                    false, true, false, true, false
                ]
            )
            .unwrap()
        );
        assert_eq!(&format!("{m}"), "0000\n1001\n0000\n1010\n");
    }

    #[test]
    fn test_adjacency() {
        let m = test_matrix();
        assert_eq!(m.adjacent_to(0).collect::<Vec<_>>(), Vec::<usize>::new());
        assert_eq!(m.adjacent_to(1).collect::<Vec<_>>(), vec![0, 3]);
        assert_eq!(m.adjacent_to(3).collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn rejects_wrong_sizes() {
        assert_eq!(AdjacencyMatrix::from_vec(2, vec![true; 3]), None);
        assert_eq!(
            AdjacencyMatrix::from_matrix(2, &[vec![true, false], vec![true]]),
            None
        );
        assert_eq!(
            AdjacencyMatrix::from_matrix(2, &[vec![false, true], vec![true, false]]),
            Some(AdjacencyMatrix::path(2))
        );
    }

    #[test]
    fn topologies() {
        assert_eq!(&format!("{}", AdjacencyMatrix::path(3)), "010\n101\n010\n");
        assert_eq!(&format!("{}", AdjacencyMatrix::cycle(3)), "011\n101\n110\n");
        assert_eq!(AdjacencyMatrix::cycle(2), AdjacencyMatrix::path(2));
        assert_eq!(AdjacencyMatrix::complete(3), AdjacencyMatrix::cycle(3));
        assert_eq!(
            &format!("{}", AdjacencyMatrix::complete_with_loops(2)),
            "11\n11\n"
        );
        assert_eq!(
            AdjacencyMatrix::cycle(5).adjacent_to(4).collect::<Vec<_>>(),
            vec![0, 3]
        );
        assert_eq!(AdjacencyMatrix::path(0).size(), 0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_checks_size() {
        let graph: AdjacencyMatrix =
            serde_json::from_str(r#"{"size":2,"adjacency_matrix":[false,true,true,false]}"#)
                .unwrap();
        assert_eq!(graph, AdjacencyMatrix::path(2));

        assert!(
            serde_json::from_str::<AdjacencyMatrix>(r#"{"size":2,"adjacency_matrix":[true]}"#)
                .is_err()
        );
    }
}
