// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Configurable in-memory ledger for tests and development.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::types::{AccountInfo, Balance, TransactionInfo, TransactionPage};
use super::{HorizonError, LedgerClient};

/// In-memory [`LedgerClient`] implementation.
///
/// Accounts and transactions are registered up front; unknown lookups
/// return [`HorizonError::NotFound`]. Setting `fail_all` makes every call
/// fail with an upstream error, for exercising 502-class paths.
#[derive(Default)]
pub struct MockLedger {
    inner: Mutex<MockState>,
}

#[derive(Default)]
struct MockState {
    accounts: HashMap<String, AccountInfo>,
    transactions: HashMap<String, TransactionInfo>,
    funded: Vec<String>,
    fail_all: bool,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account with the given last-modified time.
    pub fn with_account(self, public_key: &str, last_modified: Option<DateTime<Utc>>) -> Self {
        {
            let mut state = self.inner.lock().unwrap();
            state.accounts.insert(
                public_key.to_string(),
                AccountInfo {
                    account_id: public_key.to_string(),
                    sequence: "1".to_string(),
                    last_modified_time: last_modified,
                    balances: vec![Balance {
                        asset_type: "native".to_string(),
                        asset_code: None,
                        asset_issuer: None,
                        amount: "100.0000000".to_string(),
                        limit: None,
                    }],
                },
            );
        }
        self
    }

    /// Register a transaction.
    pub fn with_transaction(
        self,
        hash: &str,
        source_account: &str,
        created_at: DateTime<Utc>,
    ) -> Self {
        {
            let mut state = self.inner.lock().unwrap();
            state.transactions.insert(
                hash.to_string(),
                TransactionInfo {
                    hash: hash.to_string(),
                    source_account: source_account.to_string(),
                    created_at,
                    ledger: 1,
                    successful: true,
                    paging_token: "1".to_string(),
                    memo: None,
                },
            );
        }
        self
    }

    /// Make every call fail with an upstream error.
    pub fn failing(self) -> Self {
        self.inner.lock().unwrap().fail_all = true;
        self
    }

    /// Accounts that received a funding request.
    pub fn funded_accounts(&self) -> Vec<String> {
        self.inner.lock().unwrap().funded.clone()
    }

    fn check_failure(&self) -> Result<(), HorizonError> {
        if self.inner.lock().unwrap().fail_all {
            return Err(HorizonError::UpstreamStatus {
                status: 503,
                body: "mock upstream failure".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerClient for MockLedger {
    async fn get_account(&self, public_key: &str) -> Result<AccountInfo, HorizonError> {
        self.check_failure()?;
        self.inner
            .lock()
            .unwrap()
            .accounts
            .get(public_key)
            .cloned()
            .ok_or(HorizonError::NotFound)
    }

    async fn get_account_balances(&self, public_key: &str) -> Result<Vec<Balance>, HorizonError> {
        Ok(self.get_account(public_key).await?.balances)
    }

    async fn get_transaction(&self, hash: &str) -> Result<TransactionInfo, HorizonError> {
        self.check_failure()?;
        self.inner
            .lock()
            .unwrap()
            .transactions
            .get(hash)
            .cloned()
            .ok_or(HorizonError::NotFound)
    }

    async fn get_account_transactions(
        &self,
        public_key: &str,
        limit: u32,
        _cursor: Option<&str>,
        _order: &str,
    ) -> Result<TransactionPage, HorizonError> {
        self.check_failure()?;
        let state = self.inner.lock().unwrap();
        if !state.accounts.contains_key(public_key) {
            return Err(HorizonError::NotFound);
        }
        let records: Vec<TransactionInfo> = state
            .transactions
            .values()
            .filter(|tx| tx.source_account == public_key)
            .take(limit as usize)
            .cloned()
            .collect();
        Ok(TransactionPage {
            has_next: false,
            next_cursor: None,
            records,
        })
    }

    async fn fund_account(&self, public_key: &str) -> Result<(), HorizonError> {
        self.check_failure()?;
        self.inner
            .lock()
            .unwrap()
            .funded
            .push(public_key.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_account_is_not_found() {
        let ledger = MockLedger::new();
        assert!(matches!(
            ledger.get_account("GABC").await,
            Err(HorizonError::NotFound)
        ));
    }

    #[tokio::test]
    async fn failing_ledger_returns_upstream_error() {
        let ledger = MockLedger::new()
            .with_account("GABC", Some(Utc::now()))
            .failing();
        assert!(matches!(
            ledger.get_account("GABC").await,
            Err(HorizonError::UpstreamStatus { .. })
        ));
    }

    #[tokio::test]
    async fn registered_account_round_trips() {
        let now = Utc::now();
        let ledger = MockLedger::new().with_account("GABC", Some(now));
        let account = ledger.get_account("GABC").await.unwrap();
        assert_eq!(account.account_id, "GABC");
        assert_eq!(account.last_modified_time, Some(now));
    }
}
