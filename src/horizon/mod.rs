// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Horizon (Stellar ledger access) integration.
//!
//! The [`LedgerClient`] trait is the seam between the gateway and the
//! remote ledger-access service. [`client::HorizonClient`] is the real
//! implementation over Horizon's REST API; [`mock::MockLedger`] provides
//! a configurable in-memory implementation for tests and development.

pub mod client;
pub mod mock;
pub mod types;

use async_trait::async_trait;

pub use client::HorizonClient;
pub use types::{AccountInfo, Balance, TransactionInfo, TransactionPage};

/// Upstream ledger-access failure.
///
/// `NotFound` is separated from other failures because several callers
/// treat a missing account or transaction as a negative result rather
/// than an infrastructure error.
#[derive(Debug, thiserror::Error)]
pub enum HorizonError {
    #[error("resource not found on the ledger")]
    NotFound,

    #[error("horizon request failed: {0}")]
    Http(String),

    #[error("horizon returned status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("horizon response could not be decoded: {0}")]
    InvalidResponse(String),
}

/// Remote ledger-access service.
///
/// All methods block on network I/O; the underlying HTTP client applies a
/// bounded timeout so request workers are not leaked on a stalled upstream.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Fetch account details (sequence, last-modified time, balances).
    async fn get_account(&self, public_key: &str) -> Result<AccountInfo, HorizonError>;

    /// Fetch only the balances for an account.
    async fn get_account_balances(&self, public_key: &str) -> Result<Vec<Balance>, HorizonError>;

    /// Fetch a transaction by hash.
    async fn get_transaction(&self, hash: &str) -> Result<TransactionInfo, HorizonError>;

    /// Fetch a page of transactions for an account, newest first by default.
    async fn get_account_transactions(
        &self,
        public_key: &str,
        limit: u32,
        cursor: Option<&str>,
        order: &str,
    ) -> Result<TransactionPage, HorizonError>;

    /// Request testnet funding for an account via Friendbot.
    async fn fund_account(&self, public_key: &str) -> Result<(), HorizonError>;
}
