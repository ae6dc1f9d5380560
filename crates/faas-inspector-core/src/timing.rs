//! Invocation timing.

use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};

/// Start of an inspection.
///
/// The wall-clock start is kept for reporting; elapsed values come from a
/// monotonic clock so they can never go negative.
#[derive(Debug, Clone, Copy)]
pub struct InvocationClock {
    started_at: DateTime<Utc>,
    started: Instant,
}

impl InvocationClock {
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            started: Instant::now(),
        }
    }

    /// Wall-clock time of construction.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Whole milliseconds since construction.
    pub fn elapsed_ms(&self) -> i64 {
        i64::try_from(self.elapsed().as_millis()).unwrap_or(i64::MAX)
    }
}

/// Time spent in each collector during the last `inspect_all`.
#[derive(Debug, Clone, Default)]
pub struct InspectionTiming {
    pub total: Duration,
    pub cpu: Duration,
    pub container: Duration,
    pub linux: Duration,
    pub platform: Duration,
}
