//! Short games, i.e. games that always end after a finite number of moves

pub mod impartial;
