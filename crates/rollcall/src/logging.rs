//! Tracing setup for binaries built on Rollcall.
//!
//! The library crates only emit events through `tracing`; installing a
//! subscriber is left to the application. These helpers do it with the
//! usual `RUST_LOG` filter.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or unparseable.
const DEFAULT_DIRECTIVE: &str = "info";

/// Installs a formatting subscriber filtered by `RUST_LOG` (default `info`).
///
/// Does nothing if a global subscriber is already installed.
pub fn init_tracing() {
    try_init_tracing(DEFAULT_DIRECTIVE);
}

/// Installs a formatting subscriber, falling back to `default_directive`
/// when `RUST_LOG` is unset.
///
/// Returns `false` if a global subscriber was already installed.
pub fn try_init_tracing(default_directive: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok()
}
