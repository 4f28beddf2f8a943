// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded wallet store backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `wallets`: wallet_id → serialized WalletRecord (JSON bytes)
//! - `wallet_public_key_index`: public_key → wallet_id

use std::path::Path;

use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use uuid::Uuid;

use crate::models::WalletRecord;

/// Primary table: wallet_id → serialized WalletRecord (JSON bytes).
const WALLETS: TableDefinition<&str, &[u8]> = TableDefinition::new("wallets");

/// Index: public_key → wallet_id.
const PUBLIC_KEY_INDEX: TableDefinition<&str, &str> =
    TableDefinition::new("wallet_public_key_index");

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("a wallet already exists for public key {0}")]
    DuplicatePublicKey(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Persistent wallet store.
///
/// Methods are synchronous; redb reads are lock-free snapshots and writes
/// are short single-record transactions, so handlers call these directly.
pub trait WalletRepository: Send + Sync {
    fn create(&self, wallet: &WalletRecord) -> StorageResult<()>;
    fn find_by_id(&self, id: &Uuid) -> StorageResult<Option<WalletRecord>>;
    fn find_by_public_key(&self, public_key: &str) -> StorageResult<Option<WalletRecord>>;
    /// List wallets ordered by id, skipping `offset` and returning at most `limit`.
    fn list(&self, limit: usize, offset: usize) -> StorageResult<Vec<WalletRecord>>;
    fn count(&self) -> StorageResult<u64>;
}

/// Embedded ACID wallet database.
pub struct WalletDatabase {
    db: Database,
}

impl WalletDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = Database::create(path)?;

        // Pre-create tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(WALLETS)?;
            let _ = write_txn.open_table(PUBLIC_KEY_INDEX)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }
}

impl WalletRepository for WalletDatabase {
    fn create(&self, wallet: &WalletRecord) -> StorageResult<()> {
        let json = serde_json::to_vec(wallet)?;
        let id = wallet.id.to_string();

        let write_txn = self.db.begin_write()?;
        {
            let mut index = write_txn.open_table(PUBLIC_KEY_INDEX)?;
            if index.get(wallet.public_key.as_str())?.is_some() {
                return Err(StorageError::DuplicatePublicKey(wallet.public_key.clone()));
            }
            index.insert(wallet.public_key.as_str(), id.as_str())?;

            let mut wallets = write_txn.open_table(WALLETS)?;
            wallets.insert(id.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn find_by_id(&self, id: &Uuid) -> StorageResult<Option<WalletRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(WALLETS)?;
        match table.get(id.to_string().as_str())? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    fn find_by_public_key(&self, public_key: &str) -> StorageResult<Option<WalletRecord>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(PUBLIC_KEY_INDEX)?;
        let id = match index.get(public_key)? {
            Some(value) => value.value().to_string(),
            None => return Ok(None),
        };

        let table = read_txn.open_table(WALLETS)?;
        match table.get(id.as_str())? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    fn list(&self, limit: usize, offset: usize) -> StorageResult<Vec<WalletRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(WALLETS)?;

        let mut wallets = Vec::with_capacity(limit);
        for entry in table.iter()?.skip(offset) {
            let (_, value) = entry?;
            wallets.push(serde_json::from_slice(value.value())?);
            if wallets.len() >= limit {
                break;
            }
        }
        Ok(wallets)
    }

    fn count(&self) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(WALLETS)?;
        Ok(table.len()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    fn open_db() -> (WalletDatabase, TempDir) {
        let dir = TempDir::new().unwrap();
        let db = WalletDatabase::open(&dir.path().join("wallets.redb")).unwrap();
        (db, dir)
    }

    fn record(public_key: &str) -> WalletRecord {
        WalletRecord {
            id: Uuid::new_v4(),
            public_key: public_key.to_string(),
            encrypted_seed: vec![1, 2, 3],
            network: "testnet".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn create_and_find_by_id() {
        let (db, _dir) = open_db();
        let wallet = record("GAAA");
        db.create(&wallet).unwrap();

        let found = db.find_by_id(&wallet.id).unwrap().unwrap();
        assert_eq!(found.public_key, "GAAA");
        assert_eq!(found.encrypted_seed, vec![1, 2, 3]);
    }

    #[test]
    fn find_by_public_key_uses_index() {
        let (db, _dir) = open_db();
        let wallet = record("GBBB");
        db.create(&wallet).unwrap();

        let found = db.find_by_public_key("GBBB").unwrap().unwrap();
        assert_eq!(found.id, wallet.id);
        assert!(db.find_by_public_key("GZZZ").unwrap().is_none());
    }

    #[test]
    fn missing_id_returns_none() {
        let (db, _dir) = open_db();
        assert!(db.find_by_id(&Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn duplicate_public_key_is_rejected() {
        let (db, _dir) = open_db();
        db.create(&record("GCCC")).unwrap();

        let result = db.create(&record("GCCC"));
        assert!(matches!(result, Err(StorageError::DuplicatePublicKey(_))));
        assert_eq!(db.count().unwrap(), 1);
    }

    #[test]
    fn list_honors_limit_and_offset() {
        let (db, _dir) = open_db();
        for i in 0..5 {
            db.create(&record(&format!("G{i}"))).unwrap();
        }

        assert_eq!(db.list(10, 0).unwrap().len(), 5);
        assert_eq!(db.list(2, 0).unwrap().len(), 2);
        assert_eq!(db.list(10, 4).unwrap().len(), 1);
        assert!(db.list(10, 5).unwrap().is_empty());
        assert_eq!(db.count().unwrap(), 5);
    }

    #[test]
    fn records_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wallets.redb");
        let wallet = record("GDDD");
        {
            let db = WalletDatabase::open(&path).unwrap();
            db.create(&wallet).unwrap();
        }

        let db = WalletDatabase::open(&path).unwrap();
        assert_eq!(
            db.find_by_id(&wallet.id).unwrap().unwrap().public_key,
            "GDDD"
        );
    }
}
