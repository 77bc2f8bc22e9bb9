//! Tracing setup for the binary.
//!
//! `RUST_LOG` overrides the default `info` filter.

/// Install a compact `tracing` subscriber.
///
/// Returns `false` if a global subscriber was already set.
#[must_use]
pub fn init_tracing() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .try_init()
        .is_ok()
}
