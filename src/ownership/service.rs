// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ownership verification over three independent proof strategies.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::horizon::{HorizonError, LedgerClient};

use super::address;
use super::challenge::ChallengeStore;
use super::signature::{self, SignatureError};

/// A signed transaction older than this no longer proves current control
/// of the key. Guards against replaying stale transaction hashes.
const TRANSACTION_FRESHNESS_HOURS: i64 = 24;

/// Window for the account-activity heuristic.
const ACCOUNT_ACTIVITY_DAYS: i64 = 30;

/// A freshly issued ownership challenge.
#[derive(Debug, Serialize, ToSchema)]
pub struct ChallengeOutput {
    pub challenge: String,
    pub message: String,
    pub public_key: String,
    pub instructions: String,
}

/// Result of an ownership check. `is_owner` drives the HTTP status the
/// handlers attach; the message explains the outcome either way.
#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyOwnershipOutput {
    pub is_owner: bool,
    pub message: String,
}

impl VerifyOwnershipOutput {
    fn denied(message: &str) -> Self {
        Self {
            is_owner: false,
            message: message.to_string(),
        }
    }

    fn verified(message: &str) -> Self {
        Self {
            is_owner: true,
            message: message.to_string(),
        }
    }
}

/// Orchestrates the three ownership-proof strategies: signed challenge,
/// recent signed transaction, and the account-activity heuristic.
pub struct OwnershipService {
    ledger: Arc<dyn LedgerClient>,
    challenges: ChallengeStore,
    domain: String,
}

impl OwnershipService {
    pub fn new(ledger: Arc<dyn LedgerClient>, domain: String, challenge_ttl: Duration) -> Self {
        Self {
            ledger,
            challenges: ChallengeStore::new(challenge_ttl),
            domain,
        }
    }

    /// Issue a challenge for the given address.
    pub fn generate_challenge(&self, public_key: &str) -> Result<ChallengeOutput, ApiError> {
        if !address::is_valid_public_key(public_key) {
            return Err(ApiError::validation("Invalid Stellar public key format"));
        }

        let challenge = self.challenges.issue(&self.domain, public_key);
        info!(public_key, challenge, "generated ownership challenge");

        Ok(ChallengeOutput {
            challenge,
            message: "Sign this challenge with your private key to verify ownership".to_string(),
            public_key: public_key.to_string(),
            instructions: "Use Stellar SDK to sign the challenge with your private key"
                .to_string(),
        })
    }

    /// Verify ownership via a signature over a previously issued challenge.
    ///
    /// The message must be a challenge this process issued, still within
    /// its TTL. The challenge is consumed only when the signature checks
    /// out; a failed attempt leaves it usable until it expires.
    pub fn verify_by_message(
        &self,
        public_key: &str,
        message: &str,
        signature_b64: &str,
    ) -> Result<VerifyOwnershipOutput, ApiError> {
        if !address::is_valid_public_key(public_key) {
            warn!(public_key, "invalid public key format");
            return Ok(VerifyOwnershipOutput::denied(
                "Invalid Stellar public key format",
            ));
        }

        if !self.challenges.is_active(message) {
            warn!(public_key, "challenge is unknown, expired, or already used");
            return Ok(VerifyOwnershipOutput::denied(
                "Challenge is unknown, expired, or already used",
            ));
        }

        let valid = match signature::verify_message_signature(public_key, message, signature_b64) {
            Ok(valid) => valid,
            Err(SignatureError::MalformedSignature) => {
                return Err(ApiError::validation("Invalid signature encoding"));
            }
            Err(SignatureError::Address(_)) => {
                return Ok(VerifyOwnershipOutput::denied(
                    "Invalid Stellar public key format",
                ));
            }
        };

        if !valid {
            warn!(public_key, "signature does not verify");
            return Ok(VerifyOwnershipOutput::denied("Invalid signature or message"));
        }

        // The remove is the atomic arbiter: when two requests race on the
        // same challenge, only the one that consumes it wins.
        if !self.challenges.consume(message) {
            warn!(public_key, "challenge already consumed or expired");
            return Ok(VerifyOwnershipOutput::denied(
                "Challenge is unknown, expired, or already used",
            ));
        }
        info!(public_key, "ownership verified");
        Ok(VerifyOwnershipOutput::verified(
            "Ownership verified successfully",
        ))
    }

    /// Verify ownership via a recently submitted transaction.
    pub async fn verify_by_transaction(
        &self,
        public_key: &str,
        transaction_hash: &str,
    ) -> Result<VerifyOwnershipOutput, ApiError> {
        if !address::is_valid_public_key(public_key) {
            return Ok(VerifyOwnershipOutput::denied(
                "Invalid Stellar public key format",
            ));
        }

        let tx = self
            .ledger
            .get_transaction(transaction_hash)
            .await
            .map_err(|e| {
                warn!(transaction_hash, error = %e, "failed to fetch transaction");
                ApiError::blockchain("Failed to fetch transaction").with_detail(e.to_string())
            })?;

        if tx.source_account != public_key {
            warn!(
                public_key,
                source_account = tx.source_account,
                transaction_hash,
                "transaction not signed by specified wallet"
            );
            return Ok(VerifyOwnershipOutput::denied(
                "Transaction was not signed by the specified wallet",
            ));
        }

        let age = Utc::now().signed_duration_since(tx.created_at);
        if age > chrono::Duration::hours(TRANSACTION_FRESHNESS_HOURS) {
            warn!(
                public_key,
                transaction_hash,
                created_at = %tx.created_at,
                "transaction too old for ownership verification"
            );
            return Ok(VerifyOwnershipOutput::denied(
                "Transaction is too old for ownership verification",
            ));
        }

        info!(public_key, transaction_hash, "ownership verified via transaction");
        Ok(VerifyOwnershipOutput::verified(
            "Ownership verified via transaction",
        ))
    }

    /// Verify ownership by account existence plus recent activity. A weak
    /// heuristic; it proves the account is alive, not that the caller
    /// holds the key.
    pub async fn verify_by_account(
        &self,
        public_key: &str,
    ) -> Result<VerifyOwnershipOutput, ApiError> {
        if !address::is_valid_public_key(public_key) {
            return Ok(VerifyOwnershipOutput::denied(
                "Invalid Stellar public key format",
            ));
        }

        let account = match self.ledger.get_account(public_key).await {
            Ok(account) => account,
            Err(HorizonError::NotFound) => {
                warn!(public_key, "account not found on the network");
                return Ok(VerifyOwnershipOutput::denied(
                    "Account not found on Stellar network",
                ));
            }
            Err(e) => {
                warn!(public_key, error = %e, "failed to fetch account");
                return Err(
                    ApiError::blockchain("Failed to fetch account").with_detail(e.to_string())
                );
            }
        };

        let recent = account.last_modified_time.is_some_and(|modified| {
            Utc::now().signed_duration_since(modified)
                < chrono::Duration::days(ACCOUNT_ACTIVITY_DAYS)
        });

        if !recent {
            warn!(public_key, "account has no recent activity");
            return Ok(VerifyOwnershipOutput::denied("Account has no recent activity"));
        }

        info!(public_key, "ownership verified via account activity");
        Ok(VerifyOwnershipOutput::verified(
            "Account exists and has recent activity",
        ))
    }
}
