// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Custodied wallet endpoints.
//!
//! Key generation happens here: a random 32-byte seed becomes an ed25519
//! keypair, the public half is stored as the strkey address, and the
//! secret seed is AES-256-GCM encrypted before it touches disk. No
//! endpoint ever returns key material.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
};
use chrono::Utc;
use ed25519_dalek::SigningKey;
use ring::rand::{SecureRandom, SystemRandom};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::extract::Json;
use crate::auth::{AdminOnly, Auth};
use crate::error::ApiError;
use crate::models::{
    BalanceResponse, CreateWalletRequest, FundResponse, TransactionHistoryResponse,
    WalletListResponse, WalletRecord, WalletResponse,
};
use crate::ownership::address;
use crate::response;
use crate::state::AppState;

use super::accounts::{history_params, map_ledger_error, HistoryQuery};

const DEFAULT_LIST_LIMIT: usize = 20;
const MAX_LIST_LIMIT: usize = 100;

/// Create a wallet on the configured (or requested) network.
#[utoipa::path(
    post,
    path = "/api/v1/wallets",
    request_body = CreateWalletRequest,
    tag = "Wallets",
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Wallet created", body = WalletResponse),
        (status = 400, description = "Unknown network"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn create_wallet(
    Auth(identity): Auth,
    State(state): State<AppState>,
    Json(request): Json<CreateWalletRequest>,
) -> Result<Response, ApiError> {
    let network = request
        .network
        .unwrap_or_else(|| state.config.network.clone());
    if network != "testnet" && network != "public" {
        return Err(ApiError::validation(
            "network must be `testnet` or `public`",
        ));
    }

    let mut seed = [0u8; 32];
    SystemRandom::new()
        .fill(&mut seed)
        .map_err(|_| ApiError::crypto("Failed to generate key material"))?;
    let signing_key = SigningKey::from_bytes(&seed);

    let public_key = address::encode_public_key(signing_key.verifying_key().as_bytes());
    let secret_seed = address::encode_secret_seed(&seed);
    let encrypted_seed = state
        .cipher
        .encrypt(secret_seed.as_bytes())
        .map_err(|e| ApiError::crypto("Failed to encrypt wallet seed").with_detail(e.to_string()))?;

    let record = WalletRecord {
        id: Uuid::new_v4(),
        public_key,
        encrypted_seed,
        network,
        created_at: Utc::now(),
    };
    state
        .wallets
        .create(&record)
        .map_err(|e| ApiError::internal("Failed to store wallet").with_detail(e.to_string()))?;

    info!(
        wallet_id = %record.id,
        public_key = record.public_key,
        network = record.network,
        created_by = identity.subject,
        "wallet created"
    );

    Ok(response::with_status(
        StatusCode::CREATED,
        WalletResponse::from(&record),
    ))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: Option<usize>,
}

/// List all wallets. Admin only.
#[utoipa::path(
    get,
    path = "/api/v1/wallets",
    params(
        ("limit" = Option<usize>, Query, description = "Page size, at most 100"),
        ("offset" = Option<usize>, Query, description = "Records to skip")
    ),
    tag = "Wallets",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Wallet page", body = WalletListResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Caller is not an admin")
    )
)]
pub async fn list_wallets(
    AdminOnly(_identity): AdminOnly,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Response, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT).min(MAX_LIST_LIMIT);
    let offset = query.offset.unwrap_or(0);

    let wallets = state
        .wallets
        .list(limit, offset)
        .map_err(|e| ApiError::internal("Failed to list wallets").with_detail(e.to_string()))?;
    let count = state
        .wallets
        .count()
        .map_err(|e| ApiError::internal("Failed to count wallets").with_detail(e.to_string()))?;

    Ok(response::ok(WalletListResponse {
        wallets: wallets.iter().map(WalletResponse::from).collect(),
        count,
        limit,
        offset,
    }))
}

/// Fetch one wallet by id.
#[utoipa::path(
    get,
    path = "/api/v1/wallets/{id}",
    params(("id" = Uuid, Path, description = "Wallet identifier")),
    tag = "Wallets",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Wallet details", body = WalletResponse),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "No such wallet")
    )
)]
pub async fn get_wallet(
    Auth(_identity): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let record = find_wallet(&state, &id)?;
    Ok(response::ok(WalletResponse::from(&record)))
}

/// Balances of a custodied wallet.
#[utoipa::path(
    get,
    path = "/api/v1/wallets/{id}/balance",
    params(("id" = Uuid, Path, description = "Wallet identifier")),
    tag = "Wallets",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Wallet balances", body = BalanceResponse),
        (status = 404, description = "No such wallet, or account not yet funded"),
        (status = 502, description = "Ledger lookup failed")
    )
)]
pub async fn wallet_balance(
    Auth(_identity): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let record = find_wallet(&state, &id)?;

    let balances = state
        .ledger
        .get_account_balances(&record.public_key)
        .await
        .map_err(map_ledger_error)?;

    Ok(response::ok(BalanceResponse {
        public_key: record.public_key,
        balances,
    }))
}

/// Fund a testnet wallet via Friendbot.
#[utoipa::path(
    post,
    path = "/api/v1/wallets/{id}/fund",
    params(("id" = Uuid, Path, description = "Wallet identifier")),
    tag = "Wallets",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Funding requested", body = FundResponse),
        (status = 400, description = "Wallet is not on testnet"),
        (status = 404, description = "No such wallet"),
        (status = 502, description = "Friendbot request failed")
    )
)]
pub async fn fund_wallet(
    Auth(_identity): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let record = find_wallet(&state, &id)?;

    if record.network != "testnet" {
        return Err(ApiError::validation(
            "Funding is only available for testnet wallets",
        ));
    }

    state
        .ledger
        .fund_account(&record.public_key)
        .await
        .map_err(|e| ApiError::blockchain("Friendbot funding failed").with_detail(e.to_string()))?;

    info!(wallet_id = %record.id, public_key = record.public_key, "wallet funded");

    Ok(response::ok(FundResponse {
        public_key: record.public_key,
        funded: true,
        message: "Account funded successfully".to_string(),
    }))
}

/// Transaction history of a custodied wallet.
#[utoipa::path(
    get,
    path = "/api/v1/wallets/{id}/transactions",
    params(
        ("id" = Uuid, Path, description = "Wallet identifier"),
        ("limit" = Option<u32>, Query, description = "Page size, at most 100"),
        ("cursor" = Option<String>, Query, description = "Paging token to resume from"),
        ("order" = Option<String>, Query, description = "`asc` or `desc`")
    ),
    tag = "Wallets",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Transaction page", body = TransactionHistoryResponse),
        (status = 404, description = "No such wallet"),
        (status = 502, description = "Ledger lookup failed")
    )
)]
pub async fn wallet_transactions(
    Auth(_identity): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Response, ApiError> {
    let record = find_wallet(&state, &id)?;

    let (limit, order) = history_params(&query)?;
    let page = state
        .ledger
        .get_account_transactions(&record.public_key, limit, query.cursor.as_deref(), order)
        .await
        .map_err(map_ledger_error)?;

    Ok(response::ok(TransactionHistoryResponse {
        public_key: record.public_key,
        transactions: page.records,
        has_next: page.has_next,
        next_cursor: page.next_cursor,
    }))
}

fn find_wallet(state: &AppState, id: &str) -> Result<WalletRecord, ApiError> {
    let id: Uuid = id
        .parse()
        .map_err(|_| ApiError::validation("Invalid wallet ID format"))?;

    state
        .wallets
        .find_by_id(&id)
        .map_err(|e| ApiError::internal("Failed to load wallet").with_detail(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Wallet not found"))
}
