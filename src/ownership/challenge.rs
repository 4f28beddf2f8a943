// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Challenge generation and the issued-challenge store.
//!
//! Challenges are `"{unix_seconds}.{nanosecond_nonce}.{domain}.{address}"`.
//! The domain is the gateway's own identity, so a challenge issued here
//! cannot be replayed against another service. Issued challenges live in a
//! short-lived in-memory store and are single-use: verification succeeds
//! only for a challenge this process issued, within its TTL, at most once.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use chrono::Utc;

/// Store of issued, not-yet-consumed challenges.
pub struct ChallengeStore {
    ttl: Duration,
    issued: Mutex<HashMap<String, Instant>>,
}

impl ChallengeStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            issued: Mutex::new(HashMap::new()),
        }
    }

    /// Build and record a new challenge for `public_key`.
    ///
    /// Expired entries are pruned here rather than by a background task;
    /// issuance is the only path that grows the map.
    pub fn issue(&self, domain: &str, public_key: &str) -> String {
        let now = Utc::now();
        let nonce =
            now.timestamp() * 1_000_000_000 + i64::from(now.timestamp_subsec_nanos());
        let challenge = format!("{}.{}.{}.{}", now.timestamp(), nonce, domain, public_key);

        let mut issued = self.issued.lock().unwrap();
        let ttl = self.ttl;
        issued.retain(|_, issued_at| issued_at.elapsed() < ttl);
        issued.insert(challenge.clone(), Instant::now());

        challenge
    }

    /// Whether `challenge` was issued by this process and is still fresh.
    pub fn is_active(&self, challenge: &str) -> bool {
        let issued = self.issued.lock().unwrap();
        issued
            .get(challenge)
            .is_some_and(|issued_at| issued_at.elapsed() < self.ttl)
    }

    /// Remove `challenge` from the store. Returns whether it was present
    /// and still fresh. A consumed challenge can never verify again.
    pub fn consume(&self, challenge: &str) -> bool {
        let mut issued = self.issued.lock().unwrap();
        match issued.remove(challenge) {
            Some(issued_at) => issued_at.elapsed() < self.ttl,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDRESS: &str = "GABCDEFGHIJKLMNOPQRSTUVWXYZ234567ABCDEFGHIJKLMNOPQRSTUVW";

    #[test]
    fn issued_challenge_has_expected_shape() {
        let store = ChallengeStore::new(Duration::from_secs(300));
        let challenge = store.issue("localhost", ADDRESS);

        assert!(challenge.contains(".localhost."));
        assert!(challenge.ends_with(ADDRESS));
        // timestamp, nonce, domain, address; the domain itself may carry dots
        assert_eq!(challenge.matches('.').count(), 3);

        let dotted = store.issue("api.example.com", ADDRESS);
        assert!(dotted.contains(".api.example.com."));
        assert!(dotted.ends_with(ADDRESS));
    }

    #[test]
    fn consecutive_challenges_differ() {
        let store = ChallengeStore::new(Duration::from_secs(300));
        let a = store.issue("api.example.com", ADDRESS);
        let b = store.issue("api.example.com", ADDRESS);
        assert_ne!(a, b);
    }

    #[test]
    fn challenge_is_single_use() {
        let store = ChallengeStore::new(Duration::from_secs(300));
        let challenge = store.issue("api.example.com", ADDRESS);

        assert!(store.is_active(&challenge));
        assert!(store.consume(&challenge));
        assert!(!store.is_active(&challenge));
        assert!(!store.consume(&challenge));
    }

    #[test]
    fn unknown_challenge_is_inactive() {
        let store = ChallengeStore::new(Duration::from_secs(300));
        assert!(!store.is_active("1.2.api.example.com.GABC"));
        assert!(!store.consume("1.2.api.example.com.GABC"));
    }

    #[test]
    fn expired_challenge_cannot_be_consumed() {
        let store = ChallengeStore::new(Duration::ZERO);
        let challenge = store.issue("api.example.com", ADDRESS);
        assert!(!store.is_active(&challenge));
        assert!(!store.consume(&challenge));
    }

    #[test]
    fn issuing_prunes_expired_entries() {
        let store = ChallengeStore::new(Duration::ZERO);
        store.issue("api.example.com", ADDRESS);
        store.issue("api.example.com", ADDRESS);
        // Pruning happens on issue; only the newest entry remains
        assert!(store.issued.lock().unwrap().len() <= 1);
    }
}
