//! Test logging for every Tombola test binary.
//!
//! Integration tests call [`init`] from a `ctor` hook in their `common`
//! module, so individual tests never set up tracing themselves.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static SUBSCRIBER: OnceCell<()> = OnceCell::new();

/// Level used when neither `TEST_LOG` nor `RUST_LOG` is set.
pub const DEFAULT_FILTER: &str = "warn";

/// Install a test-writer subscriber once per process.
///
/// Safe to call from many tests and threads. The filter is read from
/// `TEST_LOG`, then `RUST_LOG`, then [`DEFAULT_FILTER`]. If another
/// subscriber is already global this is a no-op.
pub fn init() {
    SUBSCRIBER.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .with_target(true)
            .try_init()
            .ok();
    });
}
