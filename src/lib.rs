// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! QuasarFlow - Stellar Wallet REST Gateway
//!
//! REST API that lets client applications create and operate Stellar
//! wallets without touching a blockchain SDK. Key material is encrypted
//! at rest; balances and history are proxied to Horizon; ownership of
//! external accounts is proven with signed challenges.
//!
//! ## Modules
//!
//! - `api` - HTTP handlers and router (axum)
//! - `auth` - JWT issuance, validation, and role extraction
//! - `ownership` - Challenge issuance and the three proof strategies
//! - `horizon` - Stellar Horizon client behind the `LedgerClient` trait
//! - `storage` - Embedded wallet database (redb)
//! - `middleware` - Rate limiting and security headers

pub mod api;
pub mod auth;
pub mod config;
pub mod crypto;
pub mod error;
pub mod horizon;
pub mod middleware;
pub mod models;
pub mod ownership;
pub mod response;
pub mod state;
pub mod storage;
