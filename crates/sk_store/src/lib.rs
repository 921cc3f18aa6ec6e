//! sk_store — SQLite-backed storage for the StockKeep inventory app
//!
//! The store owns two unrelated tables behind one database handle:
//! - `credentials` — username/password rows consumed by [`AuthService`].
//!   Passwords persisted by old releases are raw plaintext; they are
//!   upgraded to salted PBKDF2 records either by the one-time
//!   [`sweep`] at startup or lazily on the next successful login.
//! - `inventory` — item rows behind [`InventoryRepository`].
//!
//! Every public operation returns `Result<_, StoreError>`; errors are
//! classified at the method boundary (caller bug vs lookup miss vs
//! storage failure) and nothing panics past the API surface.

pub mod auth;
pub mod credentials;
pub mod db;
pub mod error;
pub mod inventory;
pub mod models;
pub mod prefs;
pub mod sweep;
pub mod traits;

pub use auth::{AuthService, Session};
pub use credentials::CredentialStore;
pub use db::Store;
pub use error::StoreError;
pub use inventory::InventoryRepository;
pub use models::{CredentialRow, Identity, InventoryItem};
pub use traits::{AuthApi, CredentialBackend, InventoryApi};
