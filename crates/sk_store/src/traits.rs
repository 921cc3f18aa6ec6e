//! Contract surfaces for the authentication and inventory services.
//!
//! View-models consume these traits rather than the concrete types so
//! tests can substitute in-memory fakes. Implementations must be
//! thread-safe (`Send + Sync`) — they may be called concurrently.

use async_trait::async_trait;

use crate::auth::Session;
use crate::error::StoreError;
use crate::models::{CredentialRow, InventoryItem};

/// Storage seam underneath [`crate::AuthService`]. Production code uses
/// the SQLite-backed [`crate::CredentialStore`]; tests substitute doubles
/// that fail the post-verify writes.
#[async_trait]
pub trait CredentialBackend: Send + Sync {
    /// Equality lookup by exact username. `None` when no row matches.
    async fn find_by_username(&self, username: &str)
        -> Result<Option<CredentialRow>, StoreError>;

    /// Insert a new credential row, returning the generated id.
    async fn insert(
        &self,
        display_name: &str,
        username: &str,
        password_field: &str,
        last_login: &str,
    ) -> Result<i64, StoreError>;

    /// Update the password field and/or last-login timestamp for one
    /// user. Returns the number of rows touched.
    async fn update_password_and_last_login(
        &self,
        username: &str,
        new_password: Option<&str>,
        new_last_login: Option<&str>,
    ) -> Result<u64, StoreError>;
}

/// Login/registration workflow.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Authenticate and return a live session, or a typed failure.
    async fn login(&self, username: &str, password: &str) -> Result<Session, StoreError>;

    /// Create a new account and return its session.
    async fn register(&self, username: &str, password: &str) -> Result<Session, StoreError>;
}

/// CRUD contract over inventory rows.
#[async_trait]
pub trait InventoryApi: Send + Sync {
    async fn get_all_items(&self) -> Result<Vec<InventoryItem>, StoreError>;

    async fn get_item_by_id(&self, item_id: &str) -> Result<InventoryItem, StoreError>;

    /// Returns the new row's id.
    async fn add_item(&self, name: &str, item_type: &str, count: &str) -> Result<i64, StoreError>;

    /// `Ok(false)` when no row matched — a miss is not an error here.
    async fn update_item_count(&self, item_id: &str, new_count: &str) -> Result<bool, StoreError>;

    /// Same false-vs-error split as `update_item_count`.
    async fn delete_item(&self, item_id: &str) -> Result<bool, StoreError>;

    /// Unconditional bulk delete; succeeds on an empty table.
    async fn delete_all_items(&self) -> Result<bool, StoreError>;
}
