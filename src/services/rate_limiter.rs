// src/services/rate_limiter.rs
// DOCUMENTATION: Fixed-window rate limiting
// PURPOSE: Bound accepted operations per key within a window, with a pluggable counter store

use crate::errors::ApiError;
use actix_web::HttpRequest;
use async_trait::async_trait;
use serde::Serialize;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

/// Counter, budget and remaining lifetime of one window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowState {
    pub count: u32,
    pub limit: u32,
    pub reset_in: Duration,
}

/// Backing store for fixed-window counters
/// DOCUMENTATION: Injected into handlers through web::Data so tests and
/// deployments choose their own store
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Add one to the counter for `key`, opening a new window of length
    /// `window` when none is active. `limit` is recorded with the window.
    async fn increment(
        &self,
        key: &str,
        window: Duration,
        limit: u32,
    ) -> Result<WindowState, ApiError>;

    /// Current window for `key`, or None when absent or expired
    async fn usage(&self, key: &str) -> Result<Option<WindowState>, ApiError>;

    /// Drop expired windows, returning how many were removed
    async fn sweep(&self) -> Result<usize, ApiError>;
}

pub type SharedRateLimitStore = Arc<dyn RateLimitStore>;

#[derive(Debug, Clone)]
struct WindowEntry {
    count: u32,
    limit: u32,
    reset_at: Instant,
}

impl WindowEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now > self.reset_at
    }

    fn state(&self, now: Instant) -> WindowState {
        WindowState {
            count: self.count,
            limit: self.limit,
            reset_in: self.reset_at.saturating_duration_since(now),
        }
    }
}

/// In-process counter store
/// DOCUMENTATION: Counters live in this process only. Several instances
/// behind a load balancer each enforce their own budget; use
/// PgRateLimitStore for a shared budget.
pub struct MemoryRateLimitStore {
    windows: RwLock<HashMap<String, WindowEntry>>,
    max_keys: usize,
}

impl MemoryRateLimitStore {
    pub fn new(max_keys: usize) -> Self {
        Self {
            windows: RwLock::new(HashMap::new()),
            max_keys: max_keys.max(1),
        }
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.windows.read().await.len()
    }

    /// Make room for one more key: expired entries first, then the window
    /// closest to its reset
    fn make_room(windows: &mut HashMap<String, WindowEntry>, max_keys: usize, now: Instant) {
        if windows.len() < max_keys {
            return;
        }
        windows.retain(|_, entry| !entry.is_expired(now));
        if windows.len() < max_keys {
            return;
        }
        let oldest = windows
            .iter()
            .min_by_key(|(_, entry)| entry.reset_at)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            log::debug!("Rate limit store full, evicting window for {}", key);
            windows.remove(&key);
        }
    }
}

#[async_trait]
impl RateLimitStore for MemoryRateLimitStore {
    async fn increment(
        &self,
        key: &str,
        window: Duration,
        limit: u32,
    ) -> Result<WindowState, ApiError> {
        let now = Instant::now();
        let mut windows = self.windows.write().await;

        if let Some(entry) = windows.get_mut(key) {
            entry.limit = limit;
            if entry.is_expired(now) {
                entry.count = 1;
                entry.reset_at = now + window;
            } else {
                entry.count = entry.count.saturating_add(1);
            }
            return Ok(entry.state(now));
        }

        Self::make_room(&mut windows, self.max_keys, now);
        let entry = WindowEntry {
            count: 1,
            limit,
            reset_at: now + window,
        };
        let state = entry.state(now);
        windows.insert(key.to_string(), entry);
        Ok(state)
    }

    async fn usage(&self, key: &str) -> Result<Option<WindowState>, ApiError> {
        let now = Instant::now();
        let windows = self.windows.read().await;
        Ok(windows
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.state(now)))
    }

    async fn sweep(&self) -> Result<usize, ApiError> {
        let now = Instant::now();
        let mut windows = self.windows.write().await;
        let before = windows.len();
        windows.retain(|_, entry| !entry.is_expired(now));
        Ok(before - windows.len())
    }
}

/// Counter store shared through the `rate_limits` table
/// DOCUMENTATION: One upsert increments the counter and sets the expiry
/// only when the row is new or its window has elapsed, so an existing key
/// never loses its expiry
pub struct PgRateLimitStore {
    pool: PgPool,
}

impl PgRateLimitStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct WindowRow {
    count: i32,
    max_count: i32,
    reset_in_ms: i64,
}

impl WindowRow {
    fn state(&self) -> WindowState {
        WindowState {
            count: self.count.max(0) as u32,
            limit: self.max_count.max(0) as u32,
            reset_in: Duration::from_millis(self.reset_in_ms.max(0) as u64),
        }
    }
}

#[async_trait]
impl RateLimitStore for PgRateLimitStore {
    async fn increment(
        &self,
        key: &str,
        window: Duration,
        limit: u32,
    ) -> Result<WindowState, ApiError> {
        let row: WindowRow = sqlx::query_as(
            r#"
            INSERT INTO rate_limits (key, count, max_count, expires_at)
            VALUES ($1, 1, $3, NOW() + make_interval(secs => $2))
            ON CONFLICT (key) DO UPDATE SET
                max_count = EXCLUDED.max_count,
                count = CASE
                    WHEN rate_limits.expires_at <= NOW() THEN 1
                    ELSE rate_limits.count + 1
                END,
                expires_at = CASE
                    WHEN rate_limits.expires_at <= NOW() THEN EXCLUDED.expires_at
                    ELSE rate_limits.expires_at
                END
            RETURNING
                count,
                max_count,
                GREATEST(0, (EXTRACT(EPOCH FROM (expires_at - NOW())) * 1000))::BIGINT AS reset_in_ms
            "#,
        )
        .bind(key)
        .bind(window.as_secs_f64())
        .bind(i32::try_from(limit).unwrap_or(i32::MAX))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            log::error!("Failed to increment rate limit window {}: {}", key, e);
            ApiError::DatabaseError(e.to_string())
        })?;

        Ok(row.state())
    }

    async fn usage(&self, key: &str) -> Result<Option<WindowState>, ApiError> {
        let row: Option<WindowRow> = sqlx::query_as(
            r#"
            SELECT
                count,
                max_count,
                (EXTRACT(EPOCH FROM (expires_at - NOW())) * 1000)::BIGINT AS reset_in_ms
            FROM rate_limits
            WHERE key = $1 AND expires_at > NOW()
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        Ok(row.map(|r| r.state()))
    }

    async fn sweep(&self) -> Result<usize, ApiError> {
        let result = sqlx::query("DELETE FROM rate_limits WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?;
        Ok(result.rows_affected() as usize)
    }
}

/// Outcome of an accepted check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateLimitDecision {
    pub limit: u32,
    pub remaining: u32,
    #[serde(rename = "reset_ms", serialize_with = "serialize_millis")]
    pub reset_in: Duration,
}

/// Current consumption of a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Usage {
    pub count: u32,
    /// Budget recorded by the latest check on the key
    pub limit: u32,
    #[serde(rename = "reset_ms", serialize_with = "serialize_millis")]
    pub reset_in: Duration,
}

impl Usage {
    pub fn is_exhausted(&self) -> bool {
        self.count >= self.limit
    }

    fn exceeded(&self) -> ApiError {
        ApiError::RateLimitExceeded {
            limit: self.limit,
            retry_after_secs: retry_after_secs(self.reset_in),
        }
    }
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

/// Whole seconds until the window resets, never zero
fn retry_after_secs(reset_in: Duration) -> u64 {
    let secs = reset_in.as_secs() + u64::from(reset_in.subsec_nanos() > 0);
    secs.max(1)
}

/// Fixed-window limiter over an injected store
/// DOCUMENTATION: Accepts the usual boundary burst (up to twice the limit
/// across a window edge); does not retry, queue, or back off
#[derive(Clone)]
pub struct RateLimiter {
    store: SharedRateLimitStore,
    window: Duration,
}

impl RateLimiter {
    pub fn new(store: SharedRateLimitStore, window: Duration) -> Self {
        Self { store, window }
    }

    /// Count one operation for `key`
    /// Fails with RateLimitExceeded once the count passes `limit`
    pub async fn check(&self, limit: u32, key: &str) -> Result<RateLimitDecision, ApiError> {
        let state = self.store.increment(key, self.window, limit).await?;

        if state.count > limit {
            log::warn!(
                "Rate limit exceeded for {} ({} > {})",
                key,
                state.count,
                limit
            );
            return Err(ApiError::RateLimitExceeded {
                limit,
                retry_after_secs: retry_after_secs(state.reset_in),
            });
        }

        Ok(RateLimitDecision {
            limit,
            remaining: limit - state.count,
            reset_in: state.reset_in,
        })
    }

    /// Count, limit and time remaining for `key` without consuming budget
    pub async fn get_usage(&self, key: &str) -> Result<Option<Usage>, ApiError> {
        Ok(self.store.usage(key).await?.map(|state| Usage {
            count: state.count,
            limit: state.limit,
            reset_in: state.reset_in,
        }))
    }
}

/// Named per-route budget
#[derive(Debug, Clone, Copy)]
pub struct RateLimitPolicy {
    pub name: &'static str,
    pub limit: u32,
    pub window: Duration,
}

impl RateLimitPolicy {
    pub const FORGOT_PASSWORD: RateLimitPolicy = RateLimitPolicy {
        name: "auth:forgot-password",
        limit: 5,
        window: Duration::from_secs(60),
    };
    pub const FAVORITES_LIST: RateLimitPolicy = RateLimitPolicy {
        name: "favorites:GET",
        limit: 60,
        window: Duration::from_secs(60),
    };
    pub const FAVORITES_ADD: RateLimitPolicy = RateLimitPolicy {
        name: "favorites:POST",
        limit: 30,
        window: Duration::from_secs(60),
    };
    pub const FAVORITES_REMOVE: RateLimitPolicy = RateLimitPolicy {
        name: "favorites:DELETE",
        limit: 30,
        window: Duration::from_secs(60),
    };

    pub fn key(&self, subject: &str) -> String {
        format!("{}:{}", self.name, subject)
    }

    pub async fn enforce(
        &self,
        store: &SharedRateLimitStore,
        subject: &str,
    ) -> Result<RateLimitDecision, ApiError> {
        RateLimiter::new(store.clone(), self.window)
            .check(self.limit, &self.key(subject))
            .await
    }

    pub async fn usage(
        &self,
        store: &SharedRateLimitStore,
        subject: &str,
    ) -> Result<Option<Usage>, ApiError> {
        RateLimiter::new(store.clone(), self.window)
            .get_usage(&self.key(subject))
            .await
    }

    /// Like `enforce`, but a subject whose window is already exhausted is
    /// rejected without being counted again
    pub async fn enforce_unless_exhausted(
        &self,
        store: &SharedRateLimitStore,
        subject: &str,
    ) -> Result<RateLimitDecision, ApiError> {
        if let Some(usage) = self.usage(store, subject).await? {
            if usage.is_exhausted() {
                log::warn!("Rate limit exhausted for {}", self.key(subject));
                return Err(usage.exceeded());
            }
        }
        self.enforce(store, subject).await
    }
}

/// Client address for rate-limit keys
/// DOCUMENTATION: First X-Forwarded-For hop, then X-Real-IP, then the peer
pub fn client_ip(req: &HttpRequest) -> String {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|h| h.to_str().ok())
            .map(|v| v.split(',').next().unwrap_or("").trim().to_string())
            .filter(|v| !v.is_empty())
    };

    header("x-forwarded-for")
        .or_else(|| header("x-real-ip"))
        .or_else(|| req.peer_addr().map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Start background sweep task
/// DOCUMENTATION: Periodically removes expired windows to bound memory
pub fn start_sweep_task(store: SharedRateLimitStore, interval_seconds: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds.max(1)));

        loop {
            interval.tick().await;
            match store.sweep().await {
                Ok(0) => {}
                Ok(removed) => log::debug!("Rate limit sweep removed {} expired windows", removed),
                Err(e) => log::warn!("Rate limit sweep failed: {}", e),
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use tokio_test::{assert_err, assert_ok};

    fn limiter(window_secs: u64) -> RateLimiter {
        let store: SharedRateLimitStore = Arc::new(MemoryRateLimitStore::new(100));
        RateLimiter::new(store, Duration::from_secs(window_secs))
    }

    #[tokio::test(start_paused = true)]
    async fn test_limit_then_reset_after_window() {
        let limiter = limiter(60);
        let key = "ip:1.2.3.4";

        for n in 1..=5 {
            let decision = assert_ok!(limiter.check(5, key).await);
            assert_eq!(decision.remaining, 5 - n);
        }

        let err = assert_err!(limiter.check(5, key).await);
        assert!(matches!(
            err,
            ApiError::RateLimitExceeded {
                limit: 5,
                retry_after_secs: 60
            }
        ));

        tokio::time::advance(Duration::from_secs(61)).await;

        let decision = assert_ok!(limiter.check(5, key).await);
        assert_eq!(decision.remaining, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_usage_after_failed_check() {
        let limiter = limiter(60);
        let key = "fp:10.0.0.1";

        for _ in 0..3 {
            let _ = limiter.check(2, key).await;
        }
        tokio::time::advance(Duration::from_secs(15)).await;

        let usage = limiter.get_usage(key).await.unwrap().expect("active window");
        assert_eq!(usage.count, 3);
        assert_eq!(usage.limit, 2);
        assert!(usage.is_exhausted());
        assert!(usage.reset_in > Duration::ZERO);
        assert_eq!(usage.reset_in, Duration::from_secs(45));
    }

    #[tokio::test(start_paused = true)]
    async fn test_usage_absent_key_and_expired_window() {
        let limiter = limiter(10);
        assert!(limiter.get_usage("nobody").await.unwrap().is_none());

        limiter.check(1, "k").await.unwrap();
        tokio::time::advance(Duration::from_secs(11)).await;
        assert!(limiter.get_usage("k").await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_keys_are_independent() {
        let limiter = limiter(60);

        limiter.check(1, "a").await.unwrap();
        assert!(limiter.check(1, "a").await.is_err());

        // "b" is untouched by "a" being exhausted
        assert_ok!(limiter.check(1, "b").await);
        assert_eq!(limiter.get_usage("a").await.unwrap().unwrap().count, 2);
        assert_eq!(limiter.get_usage("b").await.unwrap().unwrap().count, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_is_not_extended_by_later_calls() {
        let limiter = limiter(60);

        limiter.check(10, "k").await.unwrap();
        tokio::time::advance(Duration::from_secs(40)).await;
        let decision = limiter.check(10, "k").await.unwrap();

        assert_eq!(decision.reset_in, Duration::from_secs(20));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_removes_only_expired() {
        let store = Arc::new(MemoryRateLimitStore::new(100));
        store.increment("old", Duration::from_secs(5), 1).await.unwrap();
        store.increment("new", Duration::from_secs(60), 1).await.unwrap();

        tokio::time::advance(Duration::from_secs(6)).await;

        assert_eq!(store.sweep().await.unwrap(), 1);
        assert_eq!(store.len().await, 1);
        assert!(store.usage("new").await.unwrap().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_evicts_when_full() {
        let store = MemoryRateLimitStore::new(2);
        store.increment("first", Duration::from_secs(30), 1).await.unwrap();
        store.increment("second", Duration::from_secs(60), 1).await.unwrap();
        store.increment("third", Duration::from_secs(60), 1).await.unwrap();

        assert_eq!(store.len().await, 2);
        assert!(store.usage("first").await.unwrap().is_none());
        assert!(store.usage("third").await.unwrap().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_policy_keys_are_namespaced() {
        let store: SharedRateLimitStore = Arc::new(MemoryRateLimitStore::new(100));
        let policy = RateLimitPolicy {
            name: "test",
            limit: 1,
            window: Duration::from_secs(60),
        };

        assert_eq!(policy.key("1.2.3.4"), "test:1.2.3.4");
        assert_ok!(policy.enforce(&store, "1.2.3.4").await);
        assert_err!(policy.enforce(&store, "1.2.3.4").await);

        // A different policy on the same subject has its own budget
        assert_ok!(RateLimitPolicy::FAVORITES_ADD.enforce(&store, "1.2.3.4").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_subject_is_not_counted_again() {
        let store: SharedRateLimitStore = Arc::new(MemoryRateLimitStore::new(100));
        let policy = RateLimitPolicy {
            name: "fp",
            limit: 2,
            window: Duration::from_secs(60),
        };

        assert_ok!(policy.enforce_unless_exhausted(&store, "ip").await);
        assert_ok!(policy.enforce_unless_exhausted(&store, "ip").await);
        tokio::time::advance(Duration::from_secs(10)).await;

        let err = assert_err!(policy.enforce_unless_exhausted(&store, "ip").await);
        assert!(matches!(
            err,
            ApiError::RateLimitExceeded {
                limit: 2,
                retry_after_secs: 50
            }
        ));

        let usage = policy.usage(&store, "ip").await.unwrap().expect("active window");
        assert_eq!(usage.count, 2);
        assert_eq!(usage.limit, 2);

        tokio::time::advance(Duration::from_secs(51)).await;
        assert_ok!(policy.enforce_unless_exhausted(&store, "ip").await);
    }

    #[test]
    fn test_retry_after_rounds_up() {
        assert_eq!(retry_after_secs(Duration::from_millis(1500)), 2);
        assert_eq!(retry_after_secs(Duration::from_secs(60)), 60);
        assert_eq!(retry_after_secs(Duration::ZERO), 1);
    }

    #[test]
    fn test_client_ip_prefers_forwarded_for() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "203.0.113.7, 10.0.0.1"))
            .insert_header(("X-Real-IP", "10.0.0.2"))
            .to_http_request();
        assert_eq!(client_ip(&req), "203.0.113.7");

        let req = TestRequest::default()
            .insert_header(("X-Real-IP", "10.0.0.2"))
            .to_http_request();
        assert_eq!(client_ip(&req), "10.0.0.2");

        let req = TestRequest::default()
            .peer_addr("192.0.2.1:4321".parse().unwrap())
            .to_http_request();
        assert_eq!(client_ip(&req), "192.0.2.1");

        let req = TestRequest::default().to_http_request();
        assert_eq!(client_ip(&req), "unknown");
    }
}
