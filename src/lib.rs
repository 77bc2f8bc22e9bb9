//! `fourpl-fit` library crate.
//!
//! Generates a noisy four-parameter logistic sample, recovers the parameters with
//! Levenberg-Marquardt least squares, and renders the result as a PNG chart.
//!
//! The binary (`fourpl`) is a thin HTTP wrapper around this library so that the
//! fit pipeline is testable without a socket.

pub mod app;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
pub mod server;
pub mod telemetry;
