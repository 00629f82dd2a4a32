use adjacent_nim::{graph::AdjacencyMatrix, short::impartial::games::adjacent_nim::AdjacentNim};
use anyhow::{Result, bail};
use clap::ValueEnum;

/// Largest number of piles accepted from the command line
pub const MAX_PILES: usize = 10;

/// Largest pile size accepted from the command line
pub const MAX_PILE_SIZE: u32 = 20;

/// Named graphs of piles
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Topology {
    /// No pile can be played after any other
    Empty,
    /// Consecutive piles are adjacent
    Path,
    /// Path with the last pile adjacent to the first one
    Cycle,
    /// Every two distinct piles are adjacent
    Complete,
    /// Every pile is adjacent to every pile, including itself
    CompleteWithLoops,
}

impl Topology {
    pub fn graph(self, size: usize) -> AdjacencyMatrix {
        match self {
            Self::Empty => AdjacencyMatrix::empty(size),
            Self::Path => AdjacencyMatrix::path(size),
            Self::Cycle => AdjacencyMatrix::cycle(size),
            Self::Complete => AdjacencyMatrix::complete(size),
            Self::CompleteWithLoops => AdjacencyMatrix::complete_with_loops(size),
        }
    }
}

pub fn check_pile_count(piles: usize) -> Result<()> {
    if piles > MAX_PILES {
        bail!("Too many piles: {piles}, at most {MAX_PILES} are supported");
    }
    Ok(())
}

pub fn check_pile_size(pile: u32) -> Result<()> {
    if pile > MAX_PILE_SIZE {
        bail!("Pile of size {pile} is too big, at most {MAX_PILE_SIZE} stones are supported");
    }
    Ok(())
}

/// Reject games too big to be solved in reasonable time
pub fn check_bounds(game: &AdjacentNim) -> Result<()> {
    check_pile_count(game.size())?;
    for &pile in game.piles() {
        check_pile_size(pile)?;
    }
    Ok(())
}
