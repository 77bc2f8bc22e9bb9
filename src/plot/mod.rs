//! Chart construction and PNG rendering.

pub mod chart;
pub mod png;

pub use chart::*;
pub use png::render_png;
