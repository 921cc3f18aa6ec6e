//! Typed access to the `credentials` table.
//!
//! Rows are decoded into [`CredentialRow`] at this boundary; nothing above
//! it sees raw SQL rows. Username equality uses SQLite's default BINARY
//! collation, so lookups are case-sensitive.

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;

use crate::db::Store;
use crate::error::StoreError;
use crate::models::CredentialRow;
use crate::traits::CredentialBackend;

#[derive(Clone)]
pub struct CredentialStore {
    store: Store,
}

impl CredentialStore {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    fn pool(&self) -> &SqlitePool {
        &self.store.pool
    }

    /// Equality lookup by exact username. `None` when no row matches.
    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<CredentialRow>, StoreError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            "SELECT id, name, username, password, last_login FROM credentials WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(self.pool())
        .await?;
        Ok(row)
    }

    /// Insert a new credential row, returning the generated id.
    pub async fn insert(
        &self,
        display_name: &str,
        username: &str,
        password_field: &str,
        last_login: &str,
    ) -> Result<i64, StoreError> {
        let result = sqlx::query(
            "INSERT INTO credentials (name, username, password, last_login) VALUES (?, ?, ?, ?)",
        )
        .bind(display_name)
        .bind(username)
        .bind(password_field)
        .bind(last_login)
        .execute(self.pool())
        .await?;
        let id = result.last_insert_rowid();
        debug!(username, id, "credential row inserted");
        Ok(id)
    }

    /// Update the password field and/or last-login timestamp for one user,
    /// keyed by username. Returns the number of rows touched (0 when the
    /// username is unknown, or when both fields are `None`).
    pub async fn update_password_and_last_login(
        &self,
        username: &str,
        new_password: Option<&str>,
        new_last_login: Option<&str>,
    ) -> Result<u64, StoreError> {
        let result = match (new_password, new_last_login) {
            (Some(pw), Some(ll)) => {
                sqlx::query("UPDATE credentials SET password = ?, last_login = ? WHERE username = ?")
                    .bind(pw)
                    .bind(ll)
                    .bind(username)
                    .execute(self.pool())
                    .await?
            }
            (Some(pw), None) => {
                sqlx::query("UPDATE credentials SET password = ? WHERE username = ?")
                    .bind(pw)
                    .bind(username)
                    .execute(self.pool())
                    .await?
            }
            (None, Some(ll)) => {
                sqlx::query("UPDATE credentials SET last_login = ? WHERE username = ?")
                    .bind(ll)
                    .bind(username)
                    .execute(self.pool())
                    .await?
            }
            (None, None) => return Ok(0),
        };
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl CredentialBackend for CredentialStore {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<CredentialRow>, StoreError> {
        CredentialStore::find_by_username(self, username).await
    }

    async fn insert(
        &self,
        display_name: &str,
        username: &str,
        password_field: &str,
        last_login: &str,
    ) -> Result<i64, StoreError> {
        CredentialStore::insert(self, display_name, username, password_field, last_login).await
    }

    async fn update_password_and_last_login(
        &self,
        username: &str,
        new_password: Option<&str>,
        new_last_login: Option<&str>,
    ) -> Result<u64, StoreError> {
        CredentialStore::update_password_and_last_login(self, username, new_password, new_last_login)
            .await
    }
}
