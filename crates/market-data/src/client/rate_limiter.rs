//! Minimum-interval rate limiter for the rate site.
//!
//! Every request to the site goes through one gate, so request pacing is
//! global no matter how many tasks fetch concurrently. Waiters queue on a
//! fair async mutex and are released one `delay` apart.

use std::time::Duration;

use log::debug;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Default pause between two requests.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_secs(1);

/// Rate limiter enforcing a minimum delay between consecutive requests.
///
/// The clock starts at construction, so the very first request is paced too.
#[derive(Debug)]
pub struct RateLimiter {
    /// Minimum time between two `wait()` calls returning.
    delay: Duration,
    /// When the previous `wait()` returned.
    last_request: Mutex<Instant>,
}

impl RateLimiter {
    /// Create a rate limiter with the given minimum delay.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_request: Mutex::new(Instant::now()),
        }
    }

    /// The configured minimum delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait until at least `delay` has elapsed since the previous call returned.
    ///
    /// The lock is held while sleeping so concurrent callers are released
    /// strictly one after another.
    pub async fn wait(&self) {
        let mut last_request = self.last_request.lock().await;

        let elapsed = last_request.elapsed();
        if elapsed < self.delay {
            let wait_time = self.delay - elapsed;
            debug!("Rate limiter: waiting {:?}", wait_time);
            tokio::time::sleep(wait_time).await;
        }

        *last_request = Instant::now();
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_REQUEST_DELAY)
    }
}
