pub mod common;
pub mod evaluate;
pub mod range;
