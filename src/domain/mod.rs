//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the 4PL parameter vector and the named constants of the demo
//! - synthetic observations (`SamplePoint`, `SampleSet`)
//! - fit outputs (`FitResult`, `Termination`)

pub mod types;

pub use types::*;
