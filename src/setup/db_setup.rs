use crate::models::db_operations::content_db_operations::{table_definition, CONTENT_COLLECTIONS};
use redb::{CommitError, Database, StorageError, TableError, TransactionError};
use rusqlite::Connection;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Rusqlite error: {0}")]
    Rusqlite(#[from] rusqlite::Error),
    #[error("Redb storage error: {0}")]
    RedbStorage(#[from] StorageError),
    #[error("Redb transaction error: {0}")]
    RedbTransaction(#[from] TransactionError),
    #[error("Redb table error: {0}")]
    RedbTable(#[from] TableError),
    #[error("Redb commit error: {0}")]
    RedbCommit(#[from] CommitError),
    #[error("Seed data error: {0}")]
    SeedData(#[from] serde_json::Error),
    #[error("Content store error: {0}")]
    Content(#[from] crate::models::db_operations::content_db_operations::DbError),
}

/// Creates the credential schema. Safe to run against an existing database.
pub fn setup_accounts_db(conn: &mut Connection) -> Result<(), SetupError> {
    let tx = conn.transaction()?;
    log::debug!("Creating 'admin_users' table");
    tx.execute(
        "CREATE TABLE IF NOT EXISTS admin_users (
            id TEXT PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE COLLATE NOCASE,
            password_hash TEXT NOT NULL,
            role TEXT NOT NULL CHECK(role IN ('super_admin', 'admin', 'editor', 'viewer')),
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT,
            last_login TEXT
        )",
        [],
    )?;
    tx.execute(
        "CREATE INDEX IF NOT EXISTS idx_admin_users_role ON admin_users(role)",
        [],
    )?;
    tx.commit()?;
    Ok(())
}

/// Opens every content table once so they exist before the first request.
pub fn setup_content_db(db: &Database) -> Result<(), SetupError> {
    let write_txn = db.begin_write()?;
    for collection in CONTENT_COLLECTIONS {
        log::debug!("Creating '{}' table", collection);
        write_txn.open_table(table_definition(collection))?;
    }
    write_txn.commit()?;
    Ok(())
}
