// src/clock.rs

//! Wall-clock measurement with an injectable time source.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

type NowFn = dyn Fn() -> Instant + Send + Sync;

/// Measures how long an operation takes.
///
/// The time source is injected so tests can script the instants returned.
#[derive(Clone)]
pub struct Clock {
    now: Arc<NowFn>,
}

impl Clock {
    pub fn new(now: impl Fn() -> Instant + Send + Sync + 'static) -> Self {
        Self { now: Arc::new(now) }
    }

    /// Clock backed by [`Instant::now`].
    pub fn system() -> Self {
        Self::new(Instant::now)
    }

    pub fn now(&self) -> Instant {
        (self.now)()
    }

    /// Run `f` and return how long it took along with its result.
    ///
    /// The duration is measured even when `f` fails, and is zero rather than
    /// negative if the time source goes backwards.
    pub fn measure<T, E>(&self, f: impl FnOnce() -> Result<T, E>) -> (Duration, Result<T, E>) {
        let start = self.now();
        let result = f();
        let end = self.now();
        (end.saturating_duration_since(start), result)
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::system()
    }
}

impl fmt::Debug for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Clock").finish_non_exhaustive()
    }
}

/// Round to the nearest whole millisecond, halves away from zero.
pub fn round_to_millis(duration: Duration) -> Duration {
    let nanos = duration.as_nanos();
    let millis = (nanos + 500_000) / 1_000_000;
    Duration::from_millis(u64::try_from(millis).unwrap_or(u64::MAX))
}

/// Formats a duration the way Go's `time.Duration` prints: `0s`, `250ms`,
/// `1s`, `1.5s`, `2m3.004s`, `1h0m0.001s`.
///
/// Only millisecond precision is rendered; callers round first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoDuration(pub Duration);

impl fmt::Display for GoDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_ms = self.0.as_millis();
        if total_ms == 0 {
            return f.write_str("0s");
        }
        if total_ms < 1_000 {
            return write!(f, "{total_ms}ms");
        }

        let hours = total_ms / 3_600_000;
        let minutes = (total_ms / 60_000) % 60;
        let seconds = (total_ms / 1_000) % 60;
        let millis = total_ms % 1_000;

        if hours > 0 {
            write!(f, "{hours}h{minutes}m")?;
        } else if minutes > 0 {
            write!(f, "{minutes}m")?;
        }

        if millis == 0 {
            write!(f, "{seconds}s")
        } else {
            let fraction = format!("{millis:03}");
            write!(f, "{seconds}.{}s", fraction.trim_end_matches('0'))
        }
    }
}
