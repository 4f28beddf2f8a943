// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-client token-bucket rate limiting.
//!
//! Each client key (forwarded IP, real IP, or socket address) owns one
//! token bucket. Buckets refill continuously at the configured rate up to
//! the burst capacity; one token is consumed per request. A background
//! sweeper evicts buckets that have been idle for two cleanup intervals,
//! so the map does not grow with one-off clients.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::state::AppState;

const HEADER_X_FORWARDED_FOR: &str = "x-forwarded-for";
const HEADER_X_REAL_IP: &str = "x-real-ip";

/// Idle buckets older than this many cleanup intervals are evicted.
const CLEANUP_MULTIPLIER: u32 = 2;

struct TokenBucket {
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucket {
    fn new(burst: u32) -> Self {
        Self {
            tokens: f64::from(burst),
            last_refill: Instant::now(),
        }
    }

    /// Refill by elapsed time, then try to take one token.
    fn allow(&mut self, rate: f64, burst: u32) -> bool {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * rate).min(f64::from(burst));
        self.last_refill = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

struct ClientEntry {
    bucket: TokenBucket,
    last_seen: Instant,
}

/// Shared rate limiter keyed by client address.
pub struct RateLimiter {
    rate: f64,
    burst: u32,
    cleanup_interval: Duration,
    clients: Mutex<HashMap<String, ClientEntry>>,
}

impl RateLimiter {
    pub fn new(requests_per_second: f64, burst: u32, cleanup_interval: Duration) -> Self {
        Self {
            rate: requests_per_second,
            burst,
            cleanup_interval,
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Whether a request from `key` is allowed right now.
    pub fn allow(&self, key: &str) -> bool {
        let mut clients = self.clients.lock().unwrap();
        let entry = clients
            .entry(key.to_string())
            .or_insert_with(|| ClientEntry {
                bucket: TokenBucket::new(self.burst),
                last_seen: Instant::now(),
            });
        entry.last_seen = Instant::now();
        entry.bucket.allow(self.rate, self.burst)
    }

    /// Evict buckets idle for longer than two cleanup intervals.
    fn sweep(&self) {
        let cutoff = self.cleanup_interval * CLEANUP_MULTIPLIER;
        let mut clients = self.clients.lock().unwrap();
        let before = clients.len();
        clients.retain(|_, entry| entry.last_seen.elapsed() < cutoff);
        let evicted = before - clients.len();
        if evicted > 0 {
            debug!(evicted, remaining = clients.len(), "evicted idle rate-limit buckets");
        }
    }

    /// Number of currently tracked clients.
    pub fn tracked_clients(&self) -> usize {
        self.clients.lock().unwrap().len()
    }

    /// Run the sweep loop until the cancellation token is triggered.
    ///
    /// Should be spawned as a background task:
    /// ```rust,ignore
    /// tokio::spawn(limiter.clone().run_sweeper(shutdown.clone()));
    /// ```
    pub async fn run_sweeper(self: Arc<Self>, shutdown: CancellationToken) {
        info!(
            interval_secs = self.cleanup_interval.as_secs(),
            "rate-limit sweeper starting"
        );

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.cleanup_interval) => {},
                _ = shutdown.cancelled() => {
                    info!("rate-limit sweeper shutting down");
                    return;
                }
            }

            self.sweep();
        }
    }
}

/// Derive the rate-limit key for a request.
///
/// Order: first entry of `X-Forwarded-For`, then `X-Real-IP`, then the
/// peer address with the port stripped.
fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    if let Some(xff) = headers.get(HEADER_X_FORWARDED_FOR).and_then(|v| v.to_str().ok()) {
        let first = xff.split(',').next().unwrap_or(xff).trim();
        if !first.is_empty() {
            return first.to_string();
        }
    }

    if let Some(xri) = headers.get(HEADER_X_REAL_IP).and_then(|v| v.to_str().ok()) {
        let trimmed = xri.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    match peer {
        Some(addr) => addr.ip().to_string(),
        None => "unknown".to_string(),
    }
}

/// Axum middleware enforcing the per-client limit.
pub async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0);
    let key = client_key(request.headers(), peer);

    if !state.rate_limiter.allow(&key) {
        warn!(client = key, path = %request.uri().path(), "rate limit exceeded");
        return ApiError::too_many_requests("Rate limit exceeded. Please try again later.")
            .into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn burst_is_honored_then_exhausted() {
        let limiter = RateLimiter::new(1.0, 3, Duration::from_secs(60));
        assert!(limiter.allow("10.0.0.1"));
        assert!(limiter.allow("10.0.0.1"));
        assert!(limiter.allow("10.0.0.1"));
        assert!(!limiter.allow("10.0.0.1"));
    }

    #[test]
    fn clients_are_limited_independently() {
        let limiter = RateLimiter::new(1.0, 1, Duration::from_secs(60));
        assert!(limiter.allow("10.0.0.1"));
        assert!(!limiter.allow("10.0.0.1"));
        assert!(limiter.allow("10.0.0.2"));
    }

    #[test]
    fn bucket_refills_over_time() {
        let limiter = RateLimiter::new(1000.0, 1, Duration::from_secs(60));
        assert!(limiter.allow("10.0.0.1"));
        assert!(!limiter.allow("10.0.0.1"));
        std::thread::sleep(Duration::from_millis(10));
        assert!(limiter.allow("10.0.0.1"));
    }

    #[test]
    fn tokens_never_exceed_burst() {
        let limiter = RateLimiter::new(1000.0, 2, Duration::from_secs(60));
        std::thread::sleep(Duration::from_millis(20));
        // Despite a long idle period, only `burst` requests pass
        assert!(limiter.allow("10.0.0.1"));
        assert!(limiter.allow("10.0.0.1"));
        assert!(!limiter.allow("10.0.0.1"));
    }

    #[test]
    fn sweep_evicts_idle_clients() {
        let limiter = RateLimiter::new(1.0, 1, Duration::ZERO);
        limiter.allow("10.0.0.1");
        assert_eq!(limiter.tracked_clients(), 1);
        limiter.sweep();
        assert_eq!(limiter.tracked_clients(), 0);
    }

    #[test]
    fn sweep_keeps_active_clients() {
        let limiter = RateLimiter::new(1.0, 1, Duration::from_secs(60));
        limiter.allow("10.0.0.1");
        limiter.sweep();
        assert_eq!(limiter.tracked_clients(), 1);
    }

    #[test]
    fn forwarded_for_takes_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            HEADER_X_FORWARDED_FOR,
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        assert_eq!(client_key(&headers, None), "203.0.113.7");
    }

    #[test]
    fn real_ip_is_second_choice() {
        let mut headers = HeaderMap::new();
        headers.insert(HEADER_X_REAL_IP, HeaderValue::from_static("198.51.100.4"));
        assert_eq!(client_key(&headers, None), "198.51.100.4");
    }

    #[test]
    fn peer_address_is_port_stripped() {
        let headers = HeaderMap::new();
        let peer: SocketAddr = "192.0.2.9:54321".parse().unwrap();
        assert_eq!(client_key(&headers, Some(peer)), "192.0.2.9");
    }

    #[test]
    fn missing_everything_falls_back() {
        assert_eq!(client_key(&HeaderMap::new(), None), "unknown");
    }

    #[tokio::test]
    async fn sweeper_stops_on_cancellation() {
        let limiter = Arc::new(RateLimiter::new(1.0, 1, Duration::from_millis(5)));
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(limiter.clone().run_sweeper(shutdown.clone()));

        shutdown.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("sweeper should stop promptly")
            .unwrap();
    }
}
