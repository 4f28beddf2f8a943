// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared application state for axum handlers.

use std::sync::Arc;

use crate::auth::TokenService;
use crate::config::Config;
use crate::crypto::{CryptoError, SeedCipher};
use crate::horizon::{HorizonClient, HorizonError, LedgerClient};
use crate::middleware::RateLimiter;
use crate::ownership::OwnershipService;
use crate::storage::{StorageError, WalletDatabase, WalletRepository};

/// Failure while assembling application state at startup.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("failed to open wallet database: {0}")]
    Storage(#[from] StorageError),

    #[error("failed to build ledger client: {0}")]
    Horizon(#[from] HorizonError),

    #[error("failed to build seed cipher: {0}")]
    Crypto(#[from] CryptoError),
}

/// Shared state handed to every handler. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub wallets: Arc<dyn WalletRepository>,
    pub ledger: Arc<dyn LedgerClient>,
    pub cipher: Arc<SeedCipher>,
    pub tokens: Arc<TokenService>,
    pub ownership: Arc<OwnershipService>,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    /// Assemble state from configuration, opening the wallet database and
    /// constructing the real Horizon client.
    pub fn initialize(config: Config) -> Result<Self, InitError> {
        let db_path = std::path::Path::new(&config.data_dir).join("wallets.redb");
        let wallets = Arc::new(WalletDatabase::open(&db_path)?);

        let ledger: Arc<dyn LedgerClient> = Arc::new(HorizonClient::new(
            config.horizon_url.clone(),
            config.friendbot_url.clone(),
        )?);

        Ok(Self::assemble(config, wallets, ledger)?)
    }

    /// Wire services around an already-built repository and ledger client.
    pub fn assemble(
        config: Config,
        wallets: Arc<dyn WalletRepository>,
        ledger: Arc<dyn LedgerClient>,
    ) -> Result<Self, CryptoError> {
        let cipher = Arc::new(SeedCipher::new(config.encryption_key.as_bytes())?);
        let tokens = Arc::new(TokenService::new(
            config.jwt_secret.as_bytes(),
            config.jwt_issuer.clone(),
            config.jwt_expiration,
        ));
        let ownership = Arc::new(OwnershipService::new(
            ledger.clone(),
            config.challenge_domain(),
            config.challenge_ttl,
        ));
        let rate_limiter = Arc::new(RateLimiter::new(
            config.rate_limit_requests_per_second,
            config.rate_limit_burst,
            config.rate_limit_cleanup_interval,
        ));

        Ok(Self {
            config: Arc::new(config),
            wallets,
            ledger,
            cipher,
            tokens,
            ownership,
            rate_limiter,
        })
    }
}

/// State over a temp database and an empty mock ledger, for unit tests.
#[cfg(test)]
pub(crate) fn test_state() -> (AppState, tempfile::TempDir) {
    test_state_with_ledger(crate::horizon::mock::MockLedger::new())
}

/// State over a temp database and the given mock ledger.
#[cfg(test)]
pub(crate) fn test_state_with_ledger(
    ledger: crate::horizon::mock::MockLedger,
) -> (AppState, tempfile::TempDir) {
    let dir = tempfile::TempDir::new().expect("create temp dir");
    let wallets =
        Arc::new(WalletDatabase::open(&dir.path().join("wallets.redb")).expect("open wallet db"));
    let state = AppState::assemble(crate::config::test_config(), wallets, Arc::new(ledger))
        .expect("assemble state");
    (state, dir)
}
