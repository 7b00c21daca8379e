//! Attempt counting with lockout windows.
//!
//! One shared primitive serves every throttle in the system — login and
//! 2FA failures in the external auth layer, post-spam detection, and the
//! daily follower-mention cap — with distinct thresholds and windows but
//! identical semantics: an expiring counter per `(action, identity)`.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

use flock_cache::keys;
use flock_core::result::AppResult;
use flock_core::traits::store::EphemeralStore;

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    /// Whether the action is blocked until the window expires.
    pub blocked: bool,
    /// Attempts left before the threshold blocks, after this one.
    pub remaining: i64,
}

/// Counter-based rate limiter over the ephemeral store.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    store: Arc<dyn EphemeralStore>,
}

impl RateLimiter {
    /// Create a new rate limiter.
    pub fn new(store: Arc<dyn EphemeralStore>) -> Self {
        Self { store }
    }

    /// Count one qualifying attempt and decide whether it may proceed.
    ///
    /// Strictly-below semantics: with a threshold of 10, the 10th call in a
    /// window passes and the 11th blocks. A blocked call is not counted, so
    /// the window is not extended by further attempts. The TTL is armed by
    /// the first increment of a window and clears the counter on its own.
    pub async fn check(
        &self,
        action: &str,
        identity: &str,
        threshold: i64,
        window: Duration,
    ) -> AppResult<RateDecision> {
        let key = keys::attempts(action, identity);
        let current = self.peek(action, identity).await?;
        if current >= threshold {
            debug!(action, identity, current, threshold, "Attempt blocked");
            return Ok(RateDecision {
                blocked: true,
                remaining: 0,
            });
        }

        let count = self.store.incr(&key).await?;
        if count == 1 {
            self.store.expire(&key, window).await?;
        }
        Ok(RateDecision {
            blocked: false,
            remaining: (threshold - count).max(0),
        })
    }

    /// Current attempt count without counting a new one.
    pub async fn peek(&self, action: &str, identity: &str) -> AppResult<i64> {
        let key = keys::attempts(action, identity);
        Ok(self
            .store
            .get(&key)
            .await?
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(0))
    }

    /// Count one attempt, arming the lockout window on the first of a
    /// window. Used where the attempt is recorded after the action
    /// succeeded rather than before.
    pub async fn record(&self, action: &str, identity: &str, window: Duration) -> AppResult<i64> {
        let key = keys::attempts(action, identity);
        let count = self.store.incr(&key).await?;
        if count == 1 {
            self.store.expire(&key, window).await?;
        }
        Ok(count)
    }

    /// Clear the counter immediately, forgiving prior attempts (used on a
    /// successful authentication).
    pub async fn reset(&self, action: &str, identity: &str) -> AppResult<()> {
        self.store.delete(&keys::attempts(action, identity)).await
    }
}

/// Seconds from `now` until the end of the UTC day, at least one.
///
/// Day-scoped windows (the follower-mention cap) expire at midnight rather
/// than a rolling 24 hours.
pub fn seconds_until_midnight_utc(now: DateTime<Utc>) -> Duration {
    let next_midnight = (now + chrono::Duration::days(1))
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .expect("midnight is a valid time")
        .and_utc();
    let secs = (next_midnight - now).num_seconds().max(1);
    Duration::from_secs(secs as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flock_cache::memory::MemoryStore;

    fn limiter() -> RateLimiter {
        RateLimiter::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_threshold_boundary() {
        let limiter = limiter();
        let window = Duration::from_secs(60);

        for i in 1..=10 {
            let decision = limiter.check("login", "ada", 10, window).await.unwrap();
            assert!(!decision.blocked, "call {i} should pass");
            assert_eq!(decision.remaining, 10 - i);
        }

        let decision = limiter.check("login", "ada", 10, window).await.unwrap();
        assert!(decision.blocked);
        assert_eq!(decision.remaining, 0);
    }

    #[tokio::test]
    async fn test_window_expiry_unblocks() {
        let limiter = limiter();
        let window = Duration::from_millis(40);

        for _ in 0..2 {
            assert!(!limiter.check("otp", "ada", 2, window).await.unwrap().blocked);
        }
        assert!(limiter.check("otp", "ada", 2, window).await.unwrap().blocked);

        tokio::time::sleep(Duration::from_millis(70)).await;
        assert!(!limiter.check("otp", "ada", 2, window).await.unwrap().blocked);
    }

    #[tokio::test]
    async fn test_reset_forgives() {
        let limiter = limiter();
        let window = Duration::from_secs(60);

        for _ in 0..3 {
            limiter.check("login", "ada", 3, window).await.unwrap();
        }
        assert!(limiter.check("login", "ada", 3, window).await.unwrap().blocked);

        limiter.reset("login", "ada").await.unwrap();
        assert!(!limiter.check("login", "ada", 3, window).await.unwrap().blocked);
    }

    #[tokio::test]
    async fn test_identities_and_actions_are_isolated() {
        let limiter = limiter();
        let window = Duration::from_secs(60);

        assert!(!limiter.check("login", "ada", 1, window).await.unwrap().blocked);
        assert!(limiter.check("login", "ada", 1, window).await.unwrap().blocked);
        // Different identity, same action.
        assert!(!limiter.check("login", "grace", 1, window).await.unwrap().blocked);
        // Different action, same identity.
        assert!(!limiter.check("resend", "ada", 1, window).await.unwrap().blocked);
    }

    #[tokio::test]
    async fn test_peek_and_record() {
        let limiter = limiter();
        assert_eq!(limiter.peek("posts", "ada").await.unwrap(), 0);
        limiter
            .record("posts", "ada", Duration::from_secs(60))
            .await
            .unwrap();
        limiter
            .record("posts", "ada", Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(limiter.peek("posts", "ada").await.unwrap(), 2);
    }

    #[test]
    fn test_seconds_until_midnight() {
        let now = DateTime::parse_from_rfc3339("2025-06-01T23:59:30Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(seconds_until_midnight_utc(now), Duration::from_secs(30));

        let start_of_day = DateTime::parse_from_rfc3339("2025-06-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(
            seconds_until_midnight_utc(start_of_day),
            Duration::from_secs(86_400)
        );
    }
}
