//! Mathematical utilities.

pub mod grid;

pub use grid::*;
