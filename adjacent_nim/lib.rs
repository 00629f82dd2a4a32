//! Nim played on a graph of piles.
//!
//! A move reduces one pile by any positive amount, but only piles
//! [adjacent](crate::graph::AdjacencyMatrix) to the most recently reduced pile may be played.
//! The crate computes Sprague-Grundy values of such positions, see
//! [`AdjacentNim`](crate::short::impartial::games::adjacent_nim::AdjacentNim).

#![warn(missing_docs)]

pub mod graph;
pub mod numeric;
pub mod parsing;
pub mod short;

mod display;
