use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Hourly window used for guest submissions.
pub const HOUR: Duration = Duration::from_secs(3600);

/// What a guest is trying to do; each has its own allowance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Rsvp,
    Wishes,
}

impl Bucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Rsvp => "rsvp",
            Bucket::Wishes => "wishes",
        }
    }
}

/// `<bucket>:<profile>:<ip_hash>`, so one guest's limit on one invitation
/// doesn't touch another invitation.
pub fn key(bucket: Bucket, profile_id: &str, ip_hash: &str) -> String {
    format!("{}:{}:{}", bucket.as_str(), profile_id, ip_hash)
}

/// In-memory sliding-window rate limiter.
pub struct RateLimiter {
    entries: Mutex<HashMap<String, Vec<Instant>>>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiter {
    pub fn new() -> Self {
        RateLimiter {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Record an attempt and return true if it is under the limit.
    pub fn check_and_record(&self, key: &str, max_attempts: u64, window: Duration) -> bool {
        self.check_and_record_at(key, max_attempts, window, Instant::now())
    }

    fn check_and_record_at(&self, key: &str, max_attempts: u64, window: Duration, now: Instant) -> bool {
        let mut map = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let attempts = map.entry(key.to_string()).or_default();

        // Prune attempts outside the window
        attempts.retain(|t| now.duration_since(*t) < window);

        if (attempts.len() as u64) < max_attempts {
            attempts.push(now);
            true
        } else {
            false
        }
    }

    /// Attempts left in the current window, without recording one.
    pub fn remaining(&self, key: &str, max_attempts: u64, window: Duration) -> u64 {
        let mut map = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();

        let attempts = map.entry(key.to_string()).or_default();
        attempts.retain(|t| now.duration_since(*t) < window);

        max_attempts.saturating_sub(attempts.len() as u64)
    }

    /// Drop attempts older than `max_age` and forget keys with none left.
    pub fn cleanup(&self, max_age: Duration) -> usize {
        let mut map = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        let before = map.len();
        map.retain(|_, attempts| {
            attempts.retain(|t| now.duration_since(*t) < max_age);
            !attempts.is_empty()
        });
        before - map.len()
    }
}
