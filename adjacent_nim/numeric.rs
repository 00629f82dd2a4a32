//! Numeric types used as game values

pub mod nimber;
