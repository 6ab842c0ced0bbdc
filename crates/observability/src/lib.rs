//! Tracing/logging setup shared by binaries and test harnesses.
//!
//! Synchronization runs are long-lived batch processes; every per-command
//! failure is reported through `tracing` with structured fields (adapter,
//! object type, identifiers), so the subscriber configured here is the
//! user-visible error channel.

use tracing_subscriber::EnvFilter;

/// Initialize process-wide tracing/logging.
///
/// JSON logs, filterable via `RUST_LOG`, defaulting to `info`. Safe to call
/// multiple times (subsequent calls are no-ops), which matters for tests
/// that each try to initialize.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
