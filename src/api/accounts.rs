// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ownership verification and read-only proxies for external accounts.
//!
//! The challenge and verify endpoints are unauthenticated: they serve
//! clients proving control of keys the gateway does not custody, and the
//! proof itself is the credential. Balance and history lookups require
//! authentication like the wallet routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
};
use serde::Deserialize;

use super::extract::Json;
use crate::auth::Auth;
use crate::error::ApiError;
use crate::horizon::HorizonError;
use crate::models::{
    BalanceResponse, TransactionHistoryResponse, VerifyOwnershipRequest, VerifyTransactionRequest,
};
use crate::ownership::address;
use crate::response;
use crate::state::AppState;

const DEFAULT_HISTORY_LIMIT: u32 = 10;
const MAX_HISTORY_LIMIT: u32 = 100;

/// Issue a signing challenge for an account.
#[utoipa::path(
    get,
    path = "/api/v1/accounts/{public_key}/challenge",
    params(("public_key" = String, Path, description = "Stellar account address")),
    tag = "Accounts",
    responses(
        (status = 200, description = "Challenge issued", body = crate::ownership::ChallengeOutput),
        (status = 400, description = "Malformed address")
    )
)]
pub async fn challenge(
    State(state): State<AppState>,
    Path(public_key): Path<String>,
) -> Result<Response, ApiError> {
    let output = state.ownership.generate_challenge(&public_key)?;
    Ok(response::ok(output))
}

/// Verify ownership via a signature over an issued challenge.
///
/// A failed proof is a successful request: the envelope carries
/// `is_owner: false` and the response status is 401.
#[utoipa::path(
    post,
    path = "/api/v1/accounts/{public_key}/verify-ownership",
    params(("public_key" = String, Path, description = "Stellar account address")),
    request_body = VerifyOwnershipRequest,
    tag = "Accounts",
    responses(
        (status = 200, description = "Ownership proven", body = crate::ownership::VerifyOwnershipOutput),
        (status = 400, description = "Missing or malformed fields"),
        (status = 401, description = "Proof failed", body = crate::ownership::VerifyOwnershipOutput)
    )
)]
pub async fn verify_ownership(
    State(state): State<AppState>,
    Path(public_key): Path<String>,
    Json(request): Json<VerifyOwnershipRequest>,
) -> Result<Response, ApiError> {
    if request.signature.is_empty() || request.message.is_empty() {
        return Err(ApiError::validation("signature and message are required"));
    }

    let output = state
        .ownership
        .verify_by_message(&public_key, &request.message, &request.signature)?;
    Ok(verification_response(output))
}

/// Verify ownership via a recent transaction hash.
#[utoipa::path(
    post,
    path = "/api/v1/accounts/{public_key}/verify-transaction",
    params(("public_key" = String, Path, description = "Stellar account address")),
    request_body = VerifyTransactionRequest,
    tag = "Accounts",
    responses(
        (status = 200, description = "Ownership proven", body = crate::ownership::VerifyOwnershipOutput),
        (status = 400, description = "Missing transaction hash"),
        (status = 401, description = "Proof failed", body = crate::ownership::VerifyOwnershipOutput),
        (status = 502, description = "Ledger lookup failed")
    )
)]
pub async fn verify_transaction(
    State(state): State<AppState>,
    Path(public_key): Path<String>,
    Json(request): Json<VerifyTransactionRequest>,
) -> Result<Response, ApiError> {
    if request.transaction_hash.is_empty() {
        return Err(ApiError::validation("transaction_hash is required"));
    }

    let output = state
        .ownership
        .verify_by_transaction(&public_key, &request.transaction_hash)
        .await?;
    Ok(verification_response(output))
}

/// Verify ownership via the account-activity heuristic.
#[utoipa::path(
    get,
    path = "/api/v1/accounts/{public_key}/verify-account",
    params(("public_key" = String, Path, description = "Stellar account address")),
    tag = "Accounts",
    responses(
        (status = 200, description = "Account active", body = crate::ownership::VerifyOwnershipOutput),
        (status = 401, description = "Proof failed", body = crate::ownership::VerifyOwnershipOutput),
        (status = 502, description = "Ledger lookup failed")
    )
)]
pub async fn verify_account(
    State(state): State<AppState>,
    Path(public_key): Path<String>,
) -> Result<Response, ApiError> {
    let output = state.ownership.verify_by_account(&public_key).await?;
    Ok(verification_response(output))
}

fn verification_response(output: crate::ownership::VerifyOwnershipOutput) -> Response {
    if output.is_owner {
        response::ok(output)
    } else {
        response::with_status(StatusCode::UNAUTHORIZED, output)
    }
}

/// Balances of an arbitrary account.
#[utoipa::path(
    get,
    path = "/api/v1/accounts/{public_key}/balance",
    params(("public_key" = String, Path, description = "Stellar account address")),
    tag = "Accounts",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Account balances", body = BalanceResponse),
        (status = 400, description = "Malformed address"),
        (status = 404, description = "Account not found"),
        (status = 502, description = "Ledger lookup failed")
    )
)]
pub async fn balance(
    Auth(_identity): Auth,
    State(state): State<AppState>,
    Path(public_key): Path<String>,
) -> Result<Response, ApiError> {
    if !address::is_valid_public_key(&public_key) {
        return Err(ApiError::validation("Invalid Stellar public key format"));
    }

    let balances = state
        .ledger
        .get_account_balances(&public_key)
        .await
        .map_err(map_ledger_error)?;

    Ok(response::ok(BalanceResponse {
        public_key,
        balances,
    }))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(default)]
    pub order: Option<String>,
}

/// Transaction history of an arbitrary account.
#[utoipa::path(
    get,
    path = "/api/v1/accounts/{public_key}/transactions",
    params(
        ("public_key" = String, Path, description = "Stellar account address"),
        ("limit" = Option<u32>, Query, description = "Page size, at most 100"),
        ("cursor" = Option<String>, Query, description = "Paging token to resume from"),
        ("order" = Option<String>, Query, description = "`asc` or `desc`")
    ),
    tag = "Accounts",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Transaction page", body = TransactionHistoryResponse),
        (status = 400, description = "Malformed address or query"),
        (status = 404, description = "Account not found"),
        (status = 502, description = "Ledger lookup failed")
    )
)]
pub async fn transactions(
    Auth(_identity): Auth,
    State(state): State<AppState>,
    Path(public_key): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Response, ApiError> {
    if !address::is_valid_public_key(&public_key) {
        return Err(ApiError::validation("Invalid Stellar public key format"));
    }

    let (limit, order) = history_params(&query)?;
    let page = state
        .ledger
        .get_account_transactions(&public_key, limit, query.cursor.as_deref(), order)
        .await
        .map_err(map_ledger_error)?;

    Ok(response::ok(TransactionHistoryResponse {
        public_key,
        transactions: page.records,
        has_next: page.has_next,
        next_cursor: page.next_cursor,
    }))
}

pub(super) fn history_params(query: &HistoryQuery) -> Result<(u32, &'static str), ApiError> {
    let limit = match query.limit {
        Some(0) => return Err(ApiError::validation("limit must be positive")),
        Some(limit) => limit.min(MAX_HISTORY_LIMIT),
        None => DEFAULT_HISTORY_LIMIT,
    };
    let order = match query.order.as_deref() {
        None | Some("desc") => "desc",
        Some("asc") => "asc",
        Some(_) => return Err(ApiError::validation("order must be `asc` or `desc`")),
    };
    Ok((limit, order))
}

pub(super) fn map_ledger_error(error: HorizonError) -> ApiError {
    match error {
        HorizonError::NotFound => ApiError::not_found("Account not found on Stellar network"),
        other => ApiError::blockchain("Failed to query Stellar network").with_detail(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_params_defaults() {
        let query = HistoryQuery {
            limit: None,
            cursor: None,
            order: None,
        };
        assert_eq!(history_params(&query).unwrap(), (10, "desc"));
    }

    #[test]
    fn history_params_caps_limit() {
        let query = HistoryQuery {
            limit: Some(10_000),
            cursor: None,
            order: Some("asc".to_string()),
        };
        assert_eq!(history_params(&query).unwrap(), (100, "asc"));
    }

    #[test]
    fn history_params_rejects_bad_order() {
        let query = HistoryQuery {
            limit: None,
            cursor: None,
            order: Some("sideways".to_string()),
        };
        assert!(history_params(&query).is_err());
    }

    #[test]
    fn zero_limit_is_rejected() {
        let query = HistoryQuery {
            limit: Some(0),
            cursor: None,
            order: None,
        };
        assert!(history_params(&query).is_err());
    }
}
