//! Rate limit storage
//!
//! Fixed-window counters keyed by `client:route`. The in-memory store keeps
//! every entry behind one mutex so that sweep, lookup, admission check and
//! increment form a single critical section with no suspension point.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use super::clock::{Clock, SystemClock};
use super::config::RateLimitConfig;

/// Storage backend failure
#[derive(Debug, Clone, Error)]
pub enum RateLimitError {
    #[error("Rate limit backend error: {0}")]
    Backend(String),
}

/// Counter for one key in the current window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitEntry {
    /// Requests admitted in this window
    pub count: u32,
    /// Epoch ms at which the window ends
    pub reset_at_ms: i64,
}

impl RateLimitEntry {
    fn open(now_ms: i64, window_ms: i64) -> Self {
        Self {
            count: 0,
            reset_at_ms: now_ms.saturating_add(window_ms),
        }
    }

    /// Expired once `now` reaches `reset_at_ms`
    pub fn is_expired(&self, now_ms: i64) -> bool {
        now_ms >= self.reset_at_ms
    }
}

/// Rate limit check result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitResult {
    pub allowed: bool,
    /// Configured maximum for the window
    pub limit: u32,
    /// `limit - count` after this request
    pub remaining: u32,
    pub reset_at_ms: i64,
    /// Seconds until the window resets, rounded up. Zero when allowed.
    pub retry_after_secs: u64,
}

impl RateLimitResult {
    /// Window end in epoch seconds, rounded up
    pub fn reset_at_secs(&self) -> i64 {
        ceil_div_1000(self.reset_at_ms)
    }
}

/// Trait for rate limit storage backends
#[trait_variant::make(RateLimitStore: Send)]
pub trait LocalRateLimitStore {
    /// Admit or reject one request for `key`, reserving quota on admission
    async fn check_and_increment(
        &self,
        key: &str,
        config: &RateLimitConfig,
    ) -> Result<RateLimitResult, RateLimitError>;

    /// Give back one unit of quota reserved in the window ending at `reset_at_ms`
    async fn refund(&self, key: &str, reset_at_ms: i64) -> Result<(), RateLimitError>;
}

/// Process-local store. Quota is per process and lost on restart.
pub struct MemoryRateLimitStore {
    entries: Mutex<HashMap<String, RateLimitEntry>>,
    clock: Arc<dyn Clock>,
}

impl Default for MemoryRateLimitStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRateLimitStore {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock: Arc::new(clock),
        }
    }

    /// Synchronous admission check.
    ///
    /// Expired entries are swept first, so an entry found afterwards always
    /// belongs to the live window.
    pub fn hit(&self, key: &str, config: &RateLimitConfig) -> RateLimitResult {
        let now = self.clock.now_ms();
        let limit = config.max_requests;

        let mut entries = self.entries.lock();

        let swept = sweep(&mut entries, now);
        if swept > 0 {
            tracing::trace!(
                swept,
                remaining_entries = entries.len(),
                "Swept expired rate limit entries"
            );
        }

        let entry = entries
            .entry(key.to_owned())
            .or_insert_with(|| RateLimitEntry::open(now, config.window_ms()));

        if entry.count >= limit {
            return RateLimitResult {
                allowed: false,
                limit,
                remaining: 0,
                reset_at_ms: entry.reset_at_ms,
                retry_after_secs: ceil_div_1000(entry.reset_at_ms - now).max(0) as u64,
            };
        }

        entry.count += 1;

        RateLimitResult {
            allowed: true,
            limit,
            remaining: limit - entry.count,
            reset_at_ms: entry.reset_at_ms,
            retry_after_secs: 0,
        }
    }

    /// Decrement `key` by one, floored at zero.
    ///
    /// No-op when the window that admitted the request has already been replaced.
    pub fn give_back(&self, key: &str, reset_at_ms: i64) -> bool {
        let mut entries = self.entries.lock();
        match entries.get_mut(key) {
            Some(entry) if entry.reset_at_ms == reset_at_ms => {
                entry.count = entry.count.saturating_sub(1);
                true
            }
            _ => false,
        }
    }

    /// Remove every expired entry; returns how many were removed
    pub fn sweep_expired(&self) -> usize {
        let now = self.clock.now_ms();
        sweep(&mut self.entries.lock(), now)
    }

    /// Snapshot of the entry for `key`, if any
    pub fn get(&self, key: &str) -> Option<RateLimitEntry> {
        self.entries.lock().get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl RateLimitStore for MemoryRateLimitStore {
    async fn check_and_increment(
        &self,
        key: &str,
        config: &RateLimitConfig,
    ) -> Result<RateLimitResult, RateLimitError> {
        Ok(self.hit(key, config))
    }

    async fn refund(&self, key: &str, reset_at_ms: i64) -> Result<(), RateLimitError> {
        if !self.give_back(key, reset_at_ms) {
            tracing::trace!(key, reset_at_ms, "Refund skipped, window already replaced");
        }
        Ok(())
    }
}

fn sweep(entries: &mut HashMap<String, RateLimitEntry>, now_ms: i64) -> usize {
    let before = entries.len();
    entries.retain(|_, entry| !entry.is_expired(now_ms));
    before - entries.len()
}

fn ceil_div_1000(ms: i64) -> i64 {
    ms.div_euclid(1000) + i64::from(ms.rem_euclid(1000) != 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate_limit::clock::ManualClock;
    use std::time::Duration;

    fn store_at(start_ms: i64) -> (MemoryRateLimitStore, ManualClock) {
        let clock = ManualClock::new(start_ms);
        (MemoryRateLimitStore::with_clock(clock.clone()), clock)
    }

    fn config(max: u32, window_ms: u64) -> RateLimitConfig {
        RateLimitConfig::new(max, Duration::from_millis(window_ms))
    }

    #[test]
    fn test_remaining_decreases_until_limit() {
        let (store, _clock) = store_at(0);
        let config = config(5, 60_000);

        let remaining: Vec<u32> = (0..5)
            .map(|_| {
                let result = store.hit("10.0.0.1:/api/auth/login", &config);
                assert!(result.allowed);
                result.remaining
            })
            .collect();

        assert_eq!(remaining, vec![4, 3, 2, 1, 0]);
        assert!(!store.hit("10.0.0.1:/api/auth/login", &config).allowed);
    }

    #[test]
    fn test_rejection_does_not_increment() {
        let (store, _clock) = store_at(0);
        let config = config(1, 1_000);
        let key = "1.2.3.4:/login";

        assert!(store.hit(key, &config).allowed);
        assert!(!store.hit(key, &config).allowed);
        assert!(!store.hit(key, &config).allowed);
        assert_eq!(store.get(key).unwrap().count, 1);
    }

    #[test]
    fn test_login_scenario() {
        let (store, clock) = store_at(0);
        let config = config(2, 1_000);
        let key = "1.2.3.4:/login";

        let r1 = store.hit(key, &config);
        assert!(r1.allowed);
        assert_eq!(r1.remaining, 1);

        clock.set(100);
        let r2 = store.hit(key, &config);
        assert!(r2.allowed);
        assert_eq!(r2.remaining, 0);

        clock.set(200);
        let r3 = store.hit(key, &config);
        assert!(!r3.allowed);
        assert_eq!(r3.retry_after_secs, 1);
        assert_eq!(r3.reset_at_ms, 1_000);

        clock.set(1_100);
        let r4 = store.hit(key, &config);
        assert!(r4.allowed);
        assert_eq!(r4.remaining, 1);
        assert_eq!(store.get(key).unwrap().count, 1);
        assert_eq!(r4.reset_at_ms, 2_100);
    }

    #[test]
    fn test_window_expires_exactly_at_reset_time() {
        let (store, clock) = store_at(0);
        let config = config(1, 1_000);

        assert!(store.hit("k", &config).allowed);
        clock.set(999);
        assert!(!store.hit("k", &config).allowed);
        clock.set(1_000);
        assert!(store.hit("k", &config).allowed);
    }

    #[test]
    fn test_retry_after_never_exceeds_window() {
        let (store, clock) = store_at(5_000);
        let config = config(1, 3_000);

        assert!(store.hit("k", &config).allowed);
        for offset in [0, 1, 999, 1_000, 2_999] {
            clock.set(5_000 + offset);
            let result = store.hit("k", &config);
            assert!(!result.allowed);
            assert!(result.retry_after_secs >= 1);
            assert!(result.retry_after_secs <= 3);
        }
    }

    #[test]
    fn test_keys_are_independent() {
        let (store, _clock) = store_at(0);
        let config = config(1, 60_000);

        assert!(store.hit("1.1.1.1:/login", &config).allowed);
        assert!(store.hit("2.2.2.2:/login", &config).allowed);
        assert!(store.hit("1.1.1.1:/register", &config).allowed);
        assert!(!store.hit("1.1.1.1:/login", &config).allowed);
        assert_eq!(store.get("2.2.2.2:/login").unwrap().count, 1);
    }

    #[test]
    fn test_lazy_sweep_removes_other_expired_keys() {
        let (store, clock) = store_at(0);
        let short = config(10, 1_000);

        store.hit("a", &short);
        store.hit("b", &short);
        assert_eq!(store.len(), 2);

        clock.set(1_500);
        store.hit("c", &short);
        assert_eq!(store.len(), 1);
        assert!(store.get("a").is_none());
    }

    #[test]
    fn test_sweep_expired() {
        let (store, clock) = store_at(0);
        store.hit("a", &config(10, 1_000));
        store.hit("b", &config(10, 5_000));

        clock.set(2_000);
        assert_eq!(store.sweep_expired(), 1);
        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
    }

    #[test]
    fn test_give_back_floors_at_zero() {
        let (store, _clock) = store_at(0);
        let config = config(3, 1_000);

        let result = store.hit("k", &config);
        assert!(store.give_back("k", result.reset_at_ms));
        assert!(store.give_back("k", result.reset_at_ms));
        assert_eq!(store.get("k").unwrap().count, 0);
    }

    #[test]
    fn test_give_back_ignores_replaced_window() {
        let (store, clock) = store_at(0);
        let config = config(3, 1_000);

        let old = store.hit("k", &config);
        clock.set(1_200);
        store.hit("k", &config);

        assert!(!store.give_back("k", old.reset_at_ms));
        assert_eq!(store.get("k").unwrap().count, 1);
    }

    #[test]
    fn test_oversized_window_still_limits() {
        let (store, _clock) = store_at(1_000);
        let config = RateLimitConfig::new(1, Duration::MAX);

        assert!(store.hit("k", &config).allowed);
        let blocked = store.hit("k", &config);
        assert!(!blocked.allowed);
        assert_eq!(blocked.reset_at_ms, i64::MAX);
    }

    #[tokio::test]
    async fn test_refund_into_replaced_window_is_ok() {
        let (store, clock) = store_at(0);
        let config = config(3, 1_000);

        let old = store.hit("k", &config);
        clock.set(1_500);
        store.hit("k", &config);
        store.hit("k", &config);

        RateLimitStore::refund(&store, "k", old.reset_at_ms).await.unwrap();
        assert_eq!(store.get("k").unwrap().count, 2);

        RateLimitStore::refund(&store, "missing", old.reset_at_ms).await.unwrap();
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn test_reset_at_secs_rounds_up() {
        let (store, _clock) = store_at(1_700_000_000_500);
        let result = store.hit("k", &config(1, 1_000));
        assert_eq!(result.reset_at_ms, 1_700_000_001_500);
        assert_eq!(result.reset_at_secs(), 1_700_000_002);
    }

    #[test]
    fn test_ceil_div_1000() {
        assert_eq!(ceil_div_1000(0), 0);
        assert_eq!(ceil_div_1000(1), 1);
        assert_eq!(ceil_div_1000(800), 1);
        assert_eq!(ceil_div_1000(1_000), 1);
        assert_eq!(ceil_div_1000(1_001), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_admission_is_exact() {
        let store = Arc::new(MemoryRateLimitStore::with_clock(ManualClock::new(0)));
        let config = Arc::new(config(25, 60_000));

        let handles: Vec<_> = (0..100)
            .map(|_| {
                let store = store.clone();
                let config = config.clone();
                tokio::spawn(async move {
                    RateLimitStore::check_and_increment(
                        store.as_ref(),
                        "9.9.9.9:/api/contact-requests",
                        &config,
                    )
                    .await
                    .unwrap()
                    .allowed
                })
            })
            .collect();

        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                admitted += 1;
            }
        }

        assert_eq!(admitted, 25);
        assert_eq!(store.get("9.9.9.9:/api/contact-requests").unwrap().count, 25);
    }
}
