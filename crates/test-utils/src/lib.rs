pub mod fake_executable;

use std::sync::{Mutex, Once};
use std::time::{Duration, Instant};

use go_mod_vendor::clock::Clock;
use tracing_subscriber::{fmt, EnvFilter};

pub use fake_executable::{FakeExecutable, ReceivedExecution};

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer() // print only for failing tests unless --nocapture
            .with_target(true)
            .init();
    });
}

/// A clock that hands out `times` in order, then falls back to
/// `Instant::now`.
pub fn sequence_clock(times: Vec<Instant>) -> Clock {
    let remaining = Mutex::new(times.into_iter());
    Clock::new(move || remaining.lock().unwrap().next().unwrap_or_else(Instant::now))
}

/// A clock whose first measurement takes exactly `elapsed`.
pub fn fixed_step_clock(elapsed: Duration) -> Clock {
    let start = Instant::now();
    sequence_clock(vec![start, start + elapsed])
}
