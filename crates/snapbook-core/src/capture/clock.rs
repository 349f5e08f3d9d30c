use std::{fmt::Write as _, sync::Mutex};

use chrono::{DateTime, Local, TimeDelta};
use tracing::warn;

/// Default capture timestamp pattern (`31/12/2024 23:59:59`).
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Wall-clock source for ids, timestamps and download names.
pub trait Clock: Send + Sync {
    /// Current local time.
    fn now(&self) -> DateTime<Local>;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock frozen at a given instant until advanced.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Local>>,
}

impl FixedClock {
    /// Clock stopped at `now`.
    pub fn new(now: DateTime<Local>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Move the frozen instant forward by `delta`.
    pub fn advance(&self, delta: TimeDelta) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += delta;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Render `time` with a strftime `pattern`, falling back to
/// [`DEFAULT_TIMESTAMP_FORMAT`] when the pattern is invalid.
pub fn format_timestamp(time: &DateTime<Local>, pattern: &str) -> String {
    let mut rendered = String::new();
    if write!(rendered, "{}", time.format(pattern)).is_ok() {
        return rendered;
    }

    warn!(pattern, "Invalid timestamp format, using default");
    time.format(DEFAULT_TIMESTAMP_FORMAT).to_string()
}
