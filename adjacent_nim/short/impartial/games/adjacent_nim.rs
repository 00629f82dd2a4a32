//! Nim played on a graph of piles. A move removes any positive number of stones from a single
//! pile, but only piles adjacent to the pile reduced by the previous move may be played.
//!
//! The position is over when no pile adjacent to the last played one holds any stones, even if
//! other piles are still non-empty.
//!
//! The pile played "last" is not known for a freshly set up game, so
//! [`AdjacentNim::solve`] reports the highest value over all possible last played piles.

use crate::{
    display,
    graph::AdjacencyMatrix,
    parsing::{self, Parser},
    short::impartial::impartial_game::ImpartialGame,
};
use std::{error::Error, fmt::Display};

pub mod solver;

pub use solver::{Solution, Solver, StartingPosition, StartingPositions, Stats};

/// Reason why piles and adjacency matrix do not describe a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Adjacency matrix is not square or its size does not match the number of piles.
    /// `row` is `None` when the number of rows is wrong, otherwise it points to the row of wrong
    /// length.
    InvalidDimension {
        /// Number of piles
        expected: usize,
        /// Number of rows, or length of the offending row
        found: usize,
        /// Offending row
        row: Option<usize>,
    },

    /// Pile size is negative or does not fit in `u32`
    InvalidPileValue {
        /// Pile index
        index: usize,
        /// Rejected size
        value: i64,
    },

    /// Adjacency matrix entry other than 0 or 1
    InvalidAdjacencyValue {
        /// Row of the entry
        row: usize,
        /// Column of the entry
        column: usize,
        /// Rejected entry
        value: i64,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDimension {
                expected,
                found,
                row: None,
            } => write!(
                f,
                "Adjacency matrix has {found} rows, expected one row per pile ({expected})"
            ),
            Self::InvalidDimension {
                expected,
                found,
                row: Some(row),
            } => write!(
                f,
                "Row {row} of adjacency matrix has {found} entries, expected {expected}"
            ),
            Self::InvalidPileValue { index, value } => {
                write!(f, "Pile {index} has invalid size {value}")
            }
            Self::InvalidAdjacencyValue { row, column, value } => write!(
                f,
                "Adjacency matrix entry ({row}, {column}) is {value}, expected 0 or 1"
            ),
        }
    }
}

impl Error for ValidationError {}

/// Error of reading a game from text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseGameError {
    /// Input is not a list of numbers
    Syntax(&'static str),

    /// Input is well formed but does not describe a game
    Invalid(ValidationError),
}

impl Display for ParseGameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Syntax(err) => write!(f, "{err}"),
            Self::Invalid(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ParseGameError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Syntax(_) => None,
            Self::Invalid(err) => Some(err),
        }
    }
}

impl From<ValidationError> for ParseGameError {
    fn from(err: ValidationError) -> Self {
        Self::Invalid(err)
    }
}

/// Validated game setup: initial pile sizes and the graph of piles
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawAdjacentNim"))]
pub struct AdjacentNim {
    piles: Vec<u32>,
    graph: AdjacencyMatrix,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawAdjacentNim {
    piles: Vec<u32>,
    graph: AdjacencyMatrix,
}

#[cfg(feature = "serde")]
impl TryFrom<RawAdjacentNim> for AdjacentNim {
    type Error = ValidationError;

    fn try_from(raw: RawAdjacentNim) -> Result<Self, Self::Error> {
        Self::new(raw.piles, raw.graph)
    }
}

impl Display for AdjacentNim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AdjacentNim")?;
        display::brackets(f, |f| display::commas(f, self.piles()))?;
        writeln!(f)?;
        write!(f, "{}", self.graph())
    }
}

impl AdjacentNim {
    /// Create new game. Fails if graph size differs from the number of piles.
    pub fn new(piles: Vec<u32>, graph: AdjacencyMatrix) -> Result<Self, ValidationError> {
        if graph.size() != piles.len() {
            return Err(ValidationError::InvalidDimension {
                expected: piles.len(),
                found: graph.size(),
                row: None,
            });
        }

        Ok(Self { piles, graph })
    }

    /// Create new game from unchecked numbers, e.g. collected from user input.
    ///
    /// Checks dimensions first, then pile sizes, then matrix entries, and reports the first
    /// problem found.
    pub fn from_raw(piles: &[i64], adjacency: &[Vec<i64>]) -> Result<Self, ValidationError> {
        let size = piles.len();
        if adjacency.len() != size {
            return Err(ValidationError::InvalidDimension {
                expected: size,
                found: adjacency.len(),
                row: None,
            });
        }
        if let Some((row, entries)) = adjacency
            .iter()
            .enumerate()
            .find(|(_, entries)| entries.len() != size)
        {
            return Err(ValidationError::InvalidDimension {
                expected: size,
                found: entries.len(),
                row: Some(row),
            });
        }

        let piles = validate_piles(piles)?;

        let matrix = adjacency
            .iter()
            .enumerate()
            .map(|(row, entries)| {
                entries
                    .iter()
                    .enumerate()
                    .map(|(column, &value)| match value {
                        0 => Ok(false),
                        1 => Ok(true),
                        _ => Err(ValidationError::InvalidAdjacencyValue { row, column, value }),
                    })
                    .collect::<Result<Vec<bool>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        let graph = AdjacencyMatrix::from_matrix(size, &matrix).ok_or(
            ValidationError::InvalidDimension {
                expected: size,
                found: matrix.len(),
                row: None,
            },
        )?;

        Self::new(piles, graph)
    }

    /// Read game from text.
    ///
    /// Piles are either a bracketed list `[3, 5]` or bare numbers `3,5`. Adjacency matrix is
    /// either a list of rows `[[0, 1], [1, 0]]` or rows of digits `01,10`.
    pub fn parse(piles: &str, adjacency: &str) -> Result<Self, ParseGameError> {
        let piles = parse_piles(piles).map_err(ParseGameError::Syntax)?;
        let adjacency = parse_adjacency(adjacency).map_err(ParseGameError::Syntax)?;
        Ok(Self::from_raw(&piles, &adjacency)?)
    }

    /// Read pile sizes from text and play them on a graph built for their count
    pub fn parse_with_graph<F>(piles: &str, graph: F) -> Result<Self, ParseGameError>
    where
        F: FnOnce(usize) -> AdjacencyMatrix,
    {
        let piles = parse_piles(piles).map_err(ParseGameError::Syntax)?;
        let piles = validate_piles(&piles)?;
        let graph = graph(piles.len());
        Ok(Self::new(piles, graph)?)
    }

    /// Initial pile sizes
    #[inline]
    pub fn piles(&self) -> &[u32] {
        &self.piles
    }

    /// Graph of piles
    #[inline]
    pub const fn graph(&self) -> &AdjacencyMatrix {
        &self.graph
    }

    /// Number of piles
    #[inline]
    pub fn size(&self) -> usize {
        self.piles.len()
    }

    /// Initial position assuming `last_played` was the pile reduced most recently
    #[inline]
    pub fn starting_position(&self, last_played: usize) -> Position<'_> {
        Position::new(&self.graph, self.piles.clone(), last_played)
    }

    /// Evaluate every starting position with a fresh cache and report the highest value
    pub fn solve(&self) -> Solution {
        let mut solver = Solver::new(self);
        let nim_value = solver.max_nim_value();
        let starting_positions = solver.starting_positions(self.piles());
        Solution {
            nim_value,
            starting_positions,
            stats: solver.stats(),
        }
    }
}

fn validate_piles(piles: &[i64]) -> Result<Vec<u32>, ValidationError> {
    piles
        .iter()
        .enumerate()
        .map(|(index, &value)| {
            u32::try_from(value).map_err(|_| ValidationError::InvalidPileValue { index, value })
        })
        .collect()
}

fn parse_piles(input: &str) -> Result<Vec<i64>, &'static str> {
    let p = Parser::new(input);
    if p.peek_ascii_char('[') {
        parsing::finish(p.parse_list(Parser::parse_i64))
    } else {
        parsing::finish(p.parse_separated(',', Parser::parse_i64))
    }
}

fn parse_adjacency(input: &str) -> Result<Vec<Vec<i64>>, &'static str> {
    let p = Parser::new(input);
    if p.peek_ascii_char('[') {
        parsing::finish(p.parse_list(|p| p.parse_list(Parser::parse_i64)))
    } else {
        parsing::finish(p.parse_separated(',', parse_digit_row))
    }
}

fn parse_digit_row(p: Parser<'_>) -> Option<(Parser<'_>, Vec<i64>)> {
    let (mut p, first) = p.parse_digit()?;
    let mut row = vec![first];
    while let Some((next, digit)) = p.parse_digit() {
        row.push(digit);
        p = next;
    }
    Some((p, row))
}

/// Lookup key of a [`Position`]. Two positions have equal keys iff they have the same last
/// played pile and the same pile sizes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionKey {
    last_played: usize,
    piles: Box<[u32]>,
}

impl PositionKey {
    /// Pile reduced most recently
    #[inline]
    pub const fn last_played(&self) -> usize {
        self.last_played
    }

    /// Pile sizes
    #[inline]
    pub const fn piles(&self) -> &[u32] {
        &self.piles
    }
}

/// Position of [adjacent nim](self): pile sizes and the pile reduced most recently
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position<'g> {
    graph: &'g AdjacencyMatrix,
    piles: Vec<u32>,
    last_played: usize,
}

impl Display for Position<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        display::brackets(f, |f| display::commas(f, self.piles()))?;
        write!(f, "@{}", self.last_played())
    }
}

impl<'g> Position<'g> {
    /// Create new position. `last_played` must be a pile of the graph and the graph must have
    /// one vertex per pile.
    #[inline]
    pub fn new(graph: &'g AdjacencyMatrix, piles: Vec<u32>, last_played: usize) -> Self {
        debug_assert_eq!(graph.size(), piles.len(), "Graph does not match piles");
        debug_assert!(last_played < piles.len(), "Pile out of range");
        Self {
            graph,
            piles,
            last_played,
        }
    }

    /// Pile sizes
    #[inline]
    pub fn piles(&self) -> &[u32] {
        &self.piles
    }

    /// Pile reduced most recently
    #[inline]
    pub const fn last_played(&self) -> usize {
        self.last_played
    }

    /// Total number of stones on all piles
    #[inline]
    pub fn stones(&self) -> u64 {
        self.piles.iter().map(|&pile| u64::from(pile)).sum()
    }

    /// Lookup key of the position
    #[inline]
    pub fn key(&self) -> PositionKey {
        PositionKey {
            last_played: self.last_played,
            piles: self.piles.as_slice().into(),
        }
    }

    /// Piles that can be reduced in the next move
    #[inline]
    pub fn playable_piles(&self) -> impl Iterator<Item = usize> + '_ {
        self.graph
            .adjacent_to(self.last_played)
            .filter(|&pile| self.piles[pile] > 0)
    }

    /// Check if there are no moves left
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.playable_piles().next().is_none()
    }

    /// Position after removing `stones` from `pile`
    #[must_use]
    #[inline]
    pub fn take(&self, pile: usize, stones: u32) -> Self {
        debug_assert!(
            (1..=self.piles[pile]).contains(&stones),
            "Invalid number of stones"
        );
        let mut piles = self.piles.clone();
        piles[pile] -= stones;
        Self {
            graph: self.graph,
            piles,
            last_played: pile,
        }
    }
}

impl ImpartialGame for Position<'_> {
    fn moves(&self) -> Vec<Self> {
        let mut moves = Vec::new();
        for pile in self.playable_piles() {
            for stones in 1..=self.piles[pile] {
                moves.push(self.take(pile, stones));
            }
        }
        moves
    }
}

#[cfg(any(test, feature = "quickcheck"))]
impl quickcheck::Arbitrary for AdjacentNim {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        // Keep the state space small enough for uncached recursion
        let size = usize::arbitrary(g) % 4;
        let piles = (0..size)
            .map(|_| u32::arbitrary(g) % 4)
            .collect::<Vec<_>>();
        let mut graph = AdjacencyMatrix::empty(size);
        for from in graph.vertices() {
            for to in graph.vertices() {
                graph.connect(from, to, bool::arbitrary(g));
            }
        }
        Self { piles, graph }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let graph = self.graph.clone();
        Box::new(self.piles.shrink().filter_map(move |piles| {
            (piles.len() == graph.size()).then(|| Self {
                piles,
                graph: graph.clone(),
            })
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::nimber::Nimber;
    use quickcheck::QuickCheck;

    #[test]
    fn validates_dimensions() {
        assert_eq!(
            AdjacentNim::from_raw(&[1, 2], &[vec![0, 1]]),
            Err(ValidationError::InvalidDimension {
                expected: 2,
                found: 1,
                row: None
            })
        );
        assert_eq!(
            AdjacentNim::from_raw(&[1, 2], &[vec![0, 1], vec![1]]),
            Err(ValidationError::InvalidDimension {
                expected: 2,
                found: 1,
                row: Some(1)
            })
        );
        assert_eq!(
            AdjacentNim::new(vec![1, 2], AdjacencyMatrix::path(3)),
            Err(ValidationError::InvalidDimension {
                expected: 2,
                found: 3,
                row: None
            })
        );
    }

    #[test]
    fn validates_values() {
        assert_eq!(
            AdjacentNim::from_raw(&[1, -2], &[vec![0, 1], vec![1, 0]]),
            Err(ValidationError::InvalidPileValue {
                index: 1,
                value: -2
            })
        );
        assert_eq!(
            AdjacentNim::from_raw(&[1, 2], &[vec![0, 1], vec![2, 0]]),
            Err(ValidationError::InvalidAdjacencyValue {
                row: 1,
                column: 0,
                value: 2
            })
        );
        assert_eq!(
            AdjacentNim::from_raw(&[3, 5], &[vec![0, 1], vec![1, 0]]),
            AdjacentNim::new(vec![3, 5], AdjacencyMatrix::path(2))
        );
        assert_eq!(
            AdjacentNim::from_raw(&[], &[]),
            AdjacentNim::new(vec![], AdjacencyMatrix::empty(0))
        );
    }

    #[test]
    fn parses_games() {
        let expected = AdjacentNim::new(vec![3, 5], AdjacencyMatrix::path(2)).unwrap();
        assert_eq!(
            AdjacentNim::parse("[3, 5]", "[[0, 1], [1, 0]]"),
            Ok(expected.clone())
        );
        assert_eq!(AdjacentNim::parse("3,5", "01,10"), Ok(expected));
        assert_eq!(
            AdjacentNim::parse("[3, -5]", "01,10"),
            Err(ParseGameError::Invalid(
                ValidationError::InvalidPileValue {
                    index: 1,
                    value: -5
                }
            ))
        );
        assert_eq!(
            AdjacentNim::parse("3,5", "012,10"),
            Err(ParseGameError::Invalid(
                ValidationError::InvalidDimension {
                    expected: 2,
                    found: 3,
                    row: Some(0)
                }
            ))
        );
        assert!(matches!(
            AdjacentNim::parse("3;5", "01,10"),
            Err(ParseGameError::Syntax(_))
        ));
        assert_eq!(
            AdjacentNim::parse_with_graph("[1, 2, 3]", AdjacencyMatrix::cycle),
            AdjacentNim::new(vec![1, 2, 3], AdjacencyMatrix::cycle(3)).map_err(ParseGameError::Invalid)
        );
        assert_eq!(
            AdjacentNim::parse_with_graph("1,-2", AdjacencyMatrix::path),
            Err(ParseGameError::Invalid(
                ValidationError::InvalidPileValue {
                    index: 1,
                    value: -2
                }
            ))
        );
    }

    #[test]
    fn position_keys() {
        let graph = AdjacencyMatrix::path(3);
        let position = Position::new(&graph, vec![1, 2, 3], 1);
        assert_eq!(position.key(), Position::new(&graph, vec![1, 2, 3], 1).key());
        assert_ne!(position.key(), Position::new(&graph, vec![1, 2, 3], 2).key());
        assert_ne!(position.key(), Position::new(&graph, vec![1, 2, 4], 1).key());
        assert_ne!(
            Position::new(&AdjacencyMatrix::path(2), vec![12, 3], 0).key(),
            Position::new(&AdjacencyMatrix::path(2), vec![1, 23], 0).key()
        );
        assert_eq!(position.to_string(), "[1, 2, 3]@1");
    }

    #[test]
    fn keys_are_not_limited_in_pile_count() {
        let graph = AdjacencyMatrix::cycle(40);
        let keys = graph
            .vertices()
            .map(|last_played| Position::new(&graph, vec![1; 40], last_played).key())
            .collect::<std::collections::HashSet<_>>();
        assert_eq!(keys.len(), 40);
    }

    #[test]
    fn generates_moves() {
        let graph = AdjacencyMatrix::path(3);
        let position = Position::new(&graph, vec![2, 7, 1], 1);
        let moves = position
            .moves()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        assert_eq!(moves, vec!["[1, 7, 1]@0", "[0, 7, 1]@0", "[2, 7, 0]@2"]);

        let position = Position::new(&graph, vec![0, 7, 0], 1);
        assert!(position.is_terminal());
        assert!(position.moves().is_empty());
    }

    #[test]
    fn terminal_iff_no_moves() {
        let mut qc = QuickCheck::new();
        let test = |game: AdjacentNim| {
            for last_played in game.graph().vertices() {
                let position = game.starting_position(last_played);
                assert_eq!(position.is_terminal(), position.moves().is_empty());
                if position.is_terminal() {
                    assert_eq!(position.nim_value(), Nimber::new(0));
                }
            }
        };
        qc.quickcheck(test as fn(AdjacentNim));
    }

    #[test]
    fn moves_remove_stones() {
        let mut qc = QuickCheck::new();
        let test = |game: AdjacentNim| {
            for last_played in game.graph().vertices() {
                let position = game.starting_position(last_played);
                for m in position.moves() {
                    assert!(m.stones() < position.stones());
                    assert!(game.graph().are_adjacent(last_played, m.last_played()));
                }
            }
        };
        qc.quickcheck(test as fn(AdjacentNim));
    }

    #[test]
    fn display() {
        let game = AdjacentNim::new(vec![3, 5], AdjacencyMatrix::path(2)).unwrap();
        assert_eq!(game.to_string(), "AdjacentNim[3, 5]\n01\n10\n");
        assert_eq!(
            ValidationError::InvalidPileValue {
                index: 0,
                value: -1
            }
            .to_string(),
            "Pile 0 has invalid size -1"
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_validates_game() {
        let game = AdjacentNim::new(vec![3, 5], AdjacencyMatrix::path(2)).unwrap();
        let json = serde_json::to_string(&game).unwrap();
        assert_eq!(serde_json::from_str::<AdjacentNim>(&json).unwrap(), game);

        let err = serde_json::from_str::<AdjacentNim>(
            r#"{"piles":[1,2],"graph":{"size":1,"adjacency_matrix":[true]}}"#,
        )
        .unwrap_err();
        assert!(
            err.to_string().starts_with(
                &ValidationError::InvalidDimension {
                    expected: 2,
                    found: 1,
                    row: None
                }
                .to_string()
            )
        );

        assert!(
            serde_json::from_str::<AdjacentNim>(
                r#"{"piles":[1,1],"graph":{"size":2,"adjacency_matrix":[true]}}"#,
            )
            .is_err()
        );
    }
}
