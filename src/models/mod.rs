//! 4-parameter logistic model.
//!
//! The model is implemented as small, pure functions so that fitting and plotting
//! code can stay generic.

pub mod model;

pub use model::*;
