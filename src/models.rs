// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response data structures used by the REST API. All wire
//! types derive `Serialize`/`Deserialize` and `ToSchema` for automatic
//! JSON handling and OpenAPI documentation.
//!
//! [`WalletRecord`] is the stored form; it carries the encrypted seed and
//! is never serialized into a response. [`WalletResponse`] is its public
//! projection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::horizon::{Balance, TransactionInfo};

// =============================================================================
// Wallet Models
// =============================================================================

/// Stored wallet record. The seed is AES-256-GCM encrypted at rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletRecord {
    pub id: Uuid,
    /// Stellar account address (G... strkey).
    pub public_key: String,
    /// Encrypted secret seed (`nonce || ciphertext || tag`).
    pub encrypted_seed: Vec<u8>,
    /// Network the wallet was created for ("testnet" or "public").
    pub network: String,
    pub created_at: DateTime<Utc>,
}

/// Public projection of a wallet. Never exposes key material.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WalletResponse {
    /// Wallet identifier.
    pub id: Uuid,
    /// Stellar account address (G... strkey).
    pub public_key: String,
    /// Network the wallet belongs to.
    pub network: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl From<&WalletRecord> for WalletResponse {
    fn from(record: &WalletRecord) -> Self {
        Self {
            id: record.id,
            public_key: record.public_key.clone(),
            network: record.network.clone(),
            created_at: record.created_at,
        }
    }
}

/// Request to create a wallet.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateWalletRequest {
    /// Target network; defaults to the configured network when omitted.
    #[serde(default)]
    pub network: Option<String>,
}

/// One page of the admin wallet listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct WalletListResponse {
    pub wallets: Vec<WalletResponse>,
    /// Total number of wallets in the store.
    pub count: u64,
    pub limit: usize,
    pub offset: usize,
}

/// Balances for a wallet or external account.
#[derive(Debug, Serialize, ToSchema)]
pub struct BalanceResponse {
    pub public_key: String,
    pub balances: Vec<Balance>,
}

/// Result of a testnet funding request.
#[derive(Debug, Serialize, ToSchema)]
pub struct FundResponse {
    pub public_key: String,
    pub funded: bool,
    pub message: String,
}

/// One page of transaction history.
#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionHistoryResponse {
    pub public_key: String,
    pub transactions: Vec<TransactionInfo>,
    pub has_next: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

// =============================================================================
// Auth Models
// =============================================================================

/// Login credentials.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Issued token and its lifetime.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    /// Always "Bearer".
    pub token_type: String,
    /// Token lifetime in seconds.
    pub expires_in: u64,
    /// Identifier of the authenticated user.
    pub user_id: String,
    /// Role granted to the session.
    pub role: crate::auth::Role,
}

/// The authenticated caller, as seen by `GET /auth/me`.
#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    pub username: String,
    pub role: crate::auth::Role,
}

// =============================================================================
// Ownership Verification Models
// =============================================================================

/// Request body for message-signature ownership verification.
#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyOwnershipRequest {
    /// Base64-encoded ed25519 signature over `message`.
    pub signature: String,
    /// The previously issued challenge string.
    pub message: String,
}

/// Request body for transaction-based ownership verification.
#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyTransactionRequest {
    /// Hash of a recently submitted transaction.
    pub transaction_hash: String,
}
