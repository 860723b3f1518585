//! Cross-cutting middleware for the tool-call path.
//!
//! The handler applies these in a fixed order: error translation wraps the
//! entire dispatch, the rate limiter runs before any tool work, and timing
//! plus structured logging record every call. See
//! [`crate::handler`] for the wiring.

use parking_lot::Mutex;
use std::time::{Duration, Instant};

/// Default ceiling on tool calls per second.
pub const DEFAULT_MAX_REQUESTS_PER_SECOND: usize = 10;

/// Sliding-window rate limiter over a single tool-call stream.
///
/// Safe for concurrent use; the lock is held only long enough to prune the
/// window and record the new request.
#[derive(Debug)]
pub struct SlidingWindowRateLimiter {
    window: Duration,
    max_requests: usize,
    timestamps: Mutex<Vec<Instant>>,
}

impl SlidingWindowRateLimiter {
    pub fn new(window: Duration, max_requests: usize) -> Self {
        Self {
            window,
            max_requests,
            timestamps: Mutex::new(Vec::new()),
        }
    }

    /// A limiter with a one-second window.
    pub fn per_second(max_requests: usize) -> Self {
        Self::new(Duration::from_secs(1), max_requests)
    }

    pub fn max_requests(&self) -> usize {
        self.max_requests
    }

    /// Check whether another request is allowed right now, recording it if
    /// so. On rejection, returns how long until the oldest recorded request
    /// leaves the window.
    pub fn check_and_record(&self) -> Result<(), Duration> {
        let now = Instant::now();
        let mut timestamps = self.timestamps.lock();
        timestamps.retain(|&t| now.duration_since(t) < self.window);

        if timestamps.len() >= self.max_requests {
            let retry_after = timestamps
                .first()
                .map(|&oldest| self.window.saturating_sub(now.duration_since(oldest)))
                .unwrap_or(self.window);
            return Err(retry_after);
        }

        timestamps.push(now);
        Ok(())
    }

    /// Requests currently inside the window.
    pub fn current_count(&self) -> usize {
        let now = Instant::now();
        let timestamps = self.timestamps.lock();
        timestamps
            .iter()
            .filter(|&&t| now.duration_since(t) < self.window)
            .count()
    }
}
