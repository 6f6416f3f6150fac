//! Fixed-window request counter.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    reset_at: Instant,
}

/// Outcome of counting one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed { limit: u32, remaining: u32 },
    Limited { limit: u32, retry_after: u64 },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

/// Counts requests per key in fixed windows.
///
/// The first request for a key opens a window ending `window` later. A
/// request after the reset instant opens a fresh window; otherwise the
/// counter increments and requests beyond `max` are limited until reset.
/// Counters never decrease inside a window.
#[derive(Debug, Default)]
pub struct FixedWindowLimiter {
    windows: Mutex<HashMap<String, Window>>,
}

impl FixedWindowLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&self, key: &str, max: u32, window: Duration) -> Decision {
        self.check_at(key, max, window, Instant::now())
    }

    pub fn check_at(&self, key: &str, max: u32, window: Duration, now: Instant) -> Decision {
        let mut windows = self.windows.lock();

        let entry = windows.entry(key.to_string()).or_insert(Window {
            count: 0,
            reset_at: now + window,
        });
        if now > entry.reset_at {
            *entry = Window {
                count: 0,
                reset_at: now + window,
            };
        }
        entry.count = entry.count.saturating_add(1);

        if entry.count > max {
            Decision::Limited {
                limit: max,
                retry_after: seconds_until(entry.reset_at, now),
            }
        } else {
            Decision::Allowed {
                limit: max,
                remaining: max - entry.count,
            }
        }
    }

    /// Drops windows whose reset instant has passed. Returns how many.
    pub fn sweep_at(&self, now: Instant) -> usize {
        let mut windows = self.windows.lock();
        let before = windows.len();
        windows.retain(|_, w| now <= w.reset_at);
        before - windows.len()
    }

    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    /// Number of keys with a live or not yet swept window.
    pub fn tracked(&self) -> usize {
        self.windows.lock().len()
    }
}

/// Whole seconds until `reset_at`, rounded up, at least 1.
fn seconds_until(reset_at: Instant, now: Instant) -> u64 {
    let left = reset_at.saturating_duration_since(now);
    let secs = left.as_secs() + u64::from(left.subsec_nanos() > 0);
    secs.max(1)
}
