//! Database abstraction over SQLite via sqlx.

use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool};
use tracing::debug;

use crate::error::StoreError;

/// Central store handle. Cheap to clone (Arc internally).
#[derive(Clone)]
pub struct Store {
    pub pool: SqlitePool,
}

impl Store {
    /// Open (or create) the SQLite database at `db_path` and run all
    /// pending migrations.
    ///
    /// WAL journal mode and foreign-key enforcement are configured at
    /// connection time, not inside a migration — SQLite forbids changing
    /// `journal_mode` inside a transaction and sqlx wraps every migration
    /// in one.
    pub async fn open(db_path: &Path) -> Result<Self, StoreError> {
        let opts = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true);

        let pool = SqlitePool::connect_with(opts).await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StoreError::Migration(e.to_string()))?;

        debug!(path = %db_path.display(), "store opened");
        Ok(Self { pool })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use tempfile::TempDir;
    use uuid::Uuid;

    use super::Store;

    /// Open a throwaway store backed by a uuid-named file in a temp dir.
    /// The `TempDir` must stay alive for the duration of the test.
    pub async fn open_temp_store() -> (Store, TempDir) {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join(format!("sk-store-test-{}.db", Uuid::new_v4()));
        let store = Store::open(&path).await.expect("open store");
        (store, dir)
    }
}
