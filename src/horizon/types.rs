// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Simplified views of Horizon resources.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single asset balance held by an account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Balance {
    /// Asset type (`native`, `credit_alphanum4`, `credit_alphanum12`).
    pub asset_type: String,
    /// Asset code; absent for the native asset (XLM).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_code: Option<String>,
    /// Issuer account; absent for the native asset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_issuer: Option<String>,
    /// Balance amount as a decimal string, as reported by Horizon.
    #[serde(alias = "balance")]
    pub amount: String,
    /// Trustline limit, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
}

/// Account details.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccountInfo {
    /// The account's public key (G... address).
    pub account_id: String,
    /// Current sequence number as a string.
    pub sequence: String,
    /// When the account was last modified on the ledger, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_time: Option<DateTime<Utc>>,
    /// Balances held by the account.
    #[serde(default)]
    pub balances: Vec<Balance>,
}

/// Transaction details.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TransactionInfo {
    /// Transaction hash (hex).
    pub hash: String,
    /// Account that submitted the transaction.
    pub source_account: String,
    /// Ledger close time for the transaction.
    pub created_at: DateTime<Utc>,
    /// Ledger sequence the transaction was included in.
    #[serde(default)]
    pub ledger: i64,
    /// Whether the transaction succeeded.
    #[serde(default)]
    pub successful: bool,
    /// Paging token used as a cursor for history pagination.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub paging_token: String,
    /// Memo, if the transaction carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

/// One page of account transaction history.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TransactionPage {
    /// Records in this page.
    pub records: Vec<TransactionInfo>,
    /// Whether a full page was returned (a further page may exist).
    pub has_next: bool,
    /// Cursor for the next page, when `has_next` is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// Wire shape of Horizon's embedded record collections.
#[derive(Debug, Deserialize)]
pub(crate) struct EmbeddedRecords<T> {
    #[serde(rename = "_embedded")]
    pub embedded: Records<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Records<T> {
    pub records: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance_deserializes_from_horizon_shape() {
        let json = r#"{
            "balance": "100.5000000",
            "asset_type": "native"
        }"#;
        let balance: Balance = serde_json::from_str(json).unwrap();
        assert_eq!(balance.amount, "100.5000000");
        assert_eq!(balance.asset_type, "native");
        assert!(balance.asset_code.is_none());
    }

    #[test]
    fn account_deserializes_with_optional_fields() {
        let json = r#"{
            "account_id": "GABC",
            "sequence": "123456789",
            "last_modified_time": "2026-08-01T12:00:00Z",
            "balances": [{"balance": "10.0000000", "asset_type": "native"}]
        }"#;
        let account: AccountInfo = serde_json::from_str(json).unwrap();
        assert_eq!(account.account_id, "GABC");
        assert!(account.last_modified_time.is_some());
        assert_eq!(account.balances.len(), 1);
    }

    #[test]
    fn transaction_page_wire_shape() {
        let json = r#"{
            "_embedded": {
                "records": [{
                    "hash": "abcd",
                    "source_account": "GABC",
                    "created_at": "2026-08-01T12:00:00Z",
                    "ledger": 42,
                    "successful": true,
                    "paging_token": "12345"
                }]
            }
        }"#;
        let page: EmbeddedRecords<TransactionInfo> = serde_json::from_str(json).unwrap();
        assert_eq!(page.embedded.records.len(), 1);
        assert_eq!(page.embedded.records[0].ledger, 42);
    }
}
