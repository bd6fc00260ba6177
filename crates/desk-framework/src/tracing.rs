//! # Observability
//!
//! Structured, leveled logging for the desk. The runtime emits:
//!
//! - actor lifecycle (`Actor started`, `Shutdown`) at `info`;
//! - every request with its payload at `debug`;
//! - outcomes (`Created`, `Updated`, `Action ok`) at `info`;
//! - failures with the entity id and error at `warn`.
//!
//! ```bash
//! RUST_LOG=info cargo run
//! RUST_LOG=landed_cost::calc=debug cargo run   # per-component arithmetic
//! ```
//!
//! Without `RUST_LOG`, debug builds log at `info` and release builds only at `warn`,
//! so calculation chatter never reaches production output.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
pub fn default_directive() -> &'static str {
    if cfg!(debug_assertions) {
        "info"
    } else {
        "warn"
    }
}

/// Installs the global fmt subscriber. Call once, at process start.
pub fn setup_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_directive_matches_build_profile() {
        let expected = if cfg!(debug_assertions) { "info" } else { "warn" };
        assert_eq!(default_directive(), expected);
    }
}
