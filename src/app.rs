//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - installs logging
//! - reads configuration from the environment
//! - binds the HTTP listener and serves until shutdown

use tracing::{debug, info};

use crate::config::ServerConfig;
use crate::error::AppError;
use crate::server::Server;

pub mod pipeline;

/// Entry point for the `fourpl` binary.
pub fn run() -> Result<(), AppError> {
    if !crate::telemetry::init_tracing() {
        debug!("tracing subscriber already installed");
    }

    let config = ServerConfig::from_env()?;
    let server = Server::bind(config)?;

    match server.local_addr() {
        Some(addr) => info!("listening on http://{addr}/"),
        None => info!("listening"),
    }

    server.serve()
}
