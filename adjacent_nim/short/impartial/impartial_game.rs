//! Impartial game - both players have the same moves

use crate::numeric::nimber::{Nimber, NimberSet};

/// Impartial game
pub trait ImpartialGame: Sized {
    /// Get a list of moves from the position
    fn moves(&self) -> Vec<Self>;

    /// Calculate the Nim value of the position by plain recursion over all moves, without
    /// any caching. Exponential, use only on small positions or as a reference.
    fn nim_value(&self) -> Nimber {
        self.moves()
            .iter()
            .map(ImpartialGame::nim_value)
            .collect::<NimberSet>()
            .mex()
    }
}
