//! Impartial games

pub mod games;
pub mod impartial_game;
pub mod transposition_table;
