//! Sliding-window limiter shared by every outbound request.

use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Admits at most `max_requests` acquisitions per `window`.
///
/// Callers over the limit wait rather than fail.
#[derive(Debug)]
pub struct RateLimiter {
    requests: Mutex<VecDeque<Instant>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            requests: Mutex::new(VecDeque::new()),
            max_requests: max_requests.max(1) as usize,
            window,
        }
    }

    pub fn per_second(max_requests: u32) -> Self {
        Self::new(max_requests, Duration::from_secs(1))
    }

    /// Wait until a request slot is free and claim it.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut requests = self.requests.lock().await;
                let now = Instant::now();

                while let Some(&front) = requests.front() {
                    if now.duration_since(front) >= self.window {
                        requests.pop_front();
                    } else {
                        break;
                    }
                }

                if requests.len() < self.max_requests {
                    requests.push_back(now);
                    return;
                }

                // Full: the oldest entry decides when a slot frees up.
                match requests.front() {
                    Some(&oldest) => self.window.saturating_sub(now.duration_since(oldest)),
                    None => Duration::ZERO,
                }
            };
            tokio::time::sleep(wait).await;
        }
    }
}
