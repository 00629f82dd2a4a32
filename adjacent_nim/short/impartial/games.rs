//! Impartial games implementations

pub mod adjacent_nim;
