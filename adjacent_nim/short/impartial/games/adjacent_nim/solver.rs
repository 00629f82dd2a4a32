//! Memoized evaluation of [adjacent nim](super) positions

use crate::{
    display,
    numeric::nimber::{Nimber, NimberSet},
    short::impartial::{
        games::adjacent_nim::{AdjacentNim, Position, PositionKey},
        impartial_game::ImpartialGame,
        transposition_table::{ParallelTranspositionTable, TranspositionTable},
    },
};
use itertools::Itertools;
use std::{cmp::Reverse, fmt::Display};

/// Counters collected during evaluation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stats {
    /// Positions whose value was computed, including terminal ones
    pub positions_evaluated: usize,

    /// Positions reached again and answered from the cache
    pub cache_hits: usize,

    /// Positions without moves
    pub terminal_positions: usize,

    /// Longest chain of moves followed from a starting position
    pub max_depth: usize,
}

impl Display for Stats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "positions evaluated: {}, cache hits: {}, terminal positions: {}, max depth: {}",
            self.positions_evaluated, self.cache_hits, self.terminal_positions, self.max_depth
        )
    }
}

/// Cached value of a position with the initial pile sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StartingPosition {
    /// Pile assumed to be played last
    pub last_played: usize,

    /// Value of the position
    pub nim_value: Nimber,
}

/// All cached positions with given pile sizes, highest value first
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StartingPositions {
    piles: Vec<u32>,
    positions: Vec<StartingPosition>,
}

impl StartingPositions {
    /// Pile sizes the positions were filtered by
    #[inline]
    pub fn piles(&self) -> &[u32] {
        &self.piles
    }

    /// Matching positions, highest value first, ties broken by lower pile index
    #[inline]
    pub fn positions(&self) -> &[StartingPosition] {
        &self.positions
    }

    /// Check if no cached position matched
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl Display for StartingPositions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Starting Positions:")?;
        if self.is_empty() {
            return writeln!(f, "No matching starting positions found.");
        }

        let mut piles = String::new();
        display::brackets(&mut piles, |w| display::commas(w, self.piles()))?;
        writeln!(
            f,
            "{}",
            self.positions.iter().format_with("\n", |p, f| f(&format_args!(
                "{}@{} = {}",
                piles,
                p.last_played,
                p.nim_value.value()
            )))
        )
    }
}

/// Result of [`AdjacentNim::solve`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    /// Highest value over all starting positions
    pub nim_value: Nimber,

    /// Values of starting positions
    pub starting_positions: StartingPositions,

    /// Evaluation counters
    pub stats: Stats,
}

/// Position waiting for values of its moves
struct Frame<'g> {
    key: PositionKey,
    pending: Vec<Position<'g>>,
    options: NimberSet,
}

enum Visit<'g> {
    Resolved(Nimber),
    Pending(Frame<'g>),
}

/// Evaluator of [`AdjacentNim`] positions. Owns the cache, so values never leak between
/// separate computations.
#[derive(Debug)]
pub struct Solver<'g> {
    game: &'g AdjacentNim,
    transposition_table: ParallelTranspositionTable<PositionKey>,
    stats: Stats,
}

impl<'g> Solver<'g> {
    /// Create solver with an empty cache
    pub fn new(game: &'g AdjacentNim) -> Self {
        Self {
            game,
            transposition_table: ParallelTranspositionTable::new(),
            stats: Stats::default(),
        }
    }

    /// Cache of evaluated positions
    #[inline]
    pub const fn transposition_table(&self) -> &ParallelTranspositionTable<PositionKey> {
        &self.transposition_table
    }

    /// Counters since the last reset
    #[inline]
    pub const fn stats(&self) -> Stats {
        self.stats
    }

    /// Forget all cached values and counters
    pub fn reset(&mut self) {
        self.transposition_table.clear();
        self.stats = Stats::default();
    }

    /// Evaluate the initial piles for every possible last played pile, starting from an empty
    /// cache, and return the highest value. Game without piles has value 0.
    pub fn max_nim_value(&mut self) -> Nimber {
        self.reset();

        let game = self.game;
        let nim_value = game
            .graph()
            .vertices()
            .map(|last_played| {
                let position = game.starting_position(last_played);
                let value = self.evaluate(&position);
                log::trace!("{position} = {value}");
                value
            })
            .max()
            .unwrap_or_default();

        log::debug!(
            "Evaluated {} starting positions: {}",
            game.size(),
            self.stats
        );
        nim_value
    }

    /// Evaluate position by depth-first recursion, reusing and filling the cache.
    ///
    /// Recursion depth is bounded by the number of stones in the position.
    pub fn evaluate(&mut self, position: &Position<'_>) -> Nimber {
        self.evaluate_at(position, 0)
    }

    fn evaluate_at(&mut self, position: &Position<'_>, depth: usize) -> Nimber {
        match self.visit(position, depth) {
            Visit::Resolved(value) => value,
            Visit::Pending(Frame {
                key,
                pending,
                mut options,
            }) => {
                for m in &pending {
                    options.insert(self.evaluate_at(m, depth + 1));
                }
                self.finish(key, &options)
            }
        }
    }

    /// Evaluate position using an explicit stack instead of the call stack. Gives the same
    /// values as [`Solver::evaluate`] and shares its cache, but visits moves in reverse order.
    pub fn evaluate_iterative(&mut self, position: &Position<'_>) -> Nimber {
        let mut stack = match self.visit(position, 0) {
            Visit::Resolved(value) => return value,
            Visit::Pending(frame) => vec![frame],
        };

        while let Some(mut frame) = stack.pop() {
            if let Some(next) = frame.pending.pop() {
                let depth = stack.len() + 1;
                match self.visit(&next, depth) {
                    Visit::Resolved(value) => {
                        frame.options.insert(value);
                        stack.push(frame);
                    }
                    Visit::Pending(child) => {
                        stack.push(frame);
                        stack.push(child);
                    }
                }
            } else {
                let value = self.finish(frame.key, &frame.options);
                match stack.last_mut() {
                    Some(parent) => parent.options.insert(value),
                    None => return value,
                }
            }
        }

        unreachable!("Root frame returns before the stack is emptied")
    }

    /// Resolve position from the cache or as terminal, otherwise prepare its moves
    fn visit<'p>(&mut self, position: &Position<'p>, depth: usize) -> Visit<'p> {
        self.stats.max_depth = self.stats.max_depth.max(depth);

        let key = position.key();
        if let Some(value) = self.transposition_table.lookup_position(&key) {
            self.stats.cache_hits += 1;
            return Visit::Resolved(value);
        }

        if position.is_terminal() {
            self.stats.positions_evaluated += 1;
            self.stats.terminal_positions += 1;
            self.transposition_table.insert_position(key, Nimber::new(0));
            return Visit::Resolved(Nimber::new(0));
        }

        Visit::Pending(Frame {
            key,
            pending: position.moves(),
            options: NimberSet::new(),
        })
    }

    fn finish(&mut self, key: PositionKey, options: &NimberSet) -> Nimber {
        let value = options.mex();
        self.stats.positions_evaluated += 1;
        self.transposition_table.insert_position(key, value);
        value
    }

    /// Cached values of every position with exactly `piles`, highest value first
    pub fn starting_positions(&self, piles: &[u32]) -> StartingPositions {
        let mut positions = Vec::new();
        self.transposition_table.for_each(|key, nim_value| {
            if key.piles() == piles {
                positions.push(StartingPosition {
                    last_played: key.last_played(),
                    nim_value,
                });
            }
        });
        positions.sort_unstable_by_key(|p| (Reverse(p.nim_value), p.last_played));

        StartingPositions {
            piles: piles.to_vec(),
            positions,
        }
    }
}
