//! Wall-clock time source for cache expiry.

use std::cell::Cell;
use std::time::Duration;

/// Source of the current wall-clock time in milliseconds since the Unix epoch.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Real time, via `web_time` so it works on `wasm32-unknown-unknown`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        web_time::SystemTime::now()
            .duration_since(web_time::UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(0)
    }
}

/// Deterministic clock controlled by the caller.
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    /// Create a clock starting at `start_ms`.
    #[must_use]
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    /// Set current time.
    pub fn set(&self, now_ms: u64) {
        self.now.set(now_ms);
    }

    /// Advance time by `dt`.
    pub fn advance(&self, dt: Duration) {
        let dt = u64::try_from(dt.as_millis()).unwrap_or(u64::MAX);
        self.now.set(self.now.get().saturating_add(dt));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}
