// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Persistent storage for wallet records.

pub mod wallets;

pub use wallets::{StorageError, StorageResult, WalletDatabase, WalletRepository};
