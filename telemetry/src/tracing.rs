//! Tracing initialization shared by tests across the workspace.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Initializes a process-wide tracing subscriber for tests.
///
/// Safe to call at the top of every test; only the first call installs the
/// subscriber. The filter is taken from `RUST_LOG`, defaulting to `info`.
/// Output goes through the test writer so it is captured per test.
pub fn init_test_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_test_writer()
            .init();
    });
}
