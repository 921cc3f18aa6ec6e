//! Database row models — these map to/from SQL rows.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CredentialRow {
    pub id: i64,
    /// Display name; empty for self-registered accounts.
    pub name: String,
    /// Unique, case-sensitive.
    pub username: String,
    /// Either a legacy plaintext secret or an encoded PBKDF2 record —
    /// distinguish with `sk_crypto::has_encoded_format`.
    pub password: String,
    /// Human-readable local timestamp of the last successful login;
    /// empty when the account has never logged in.
    pub last_login: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct InventoryItem {
    pub id: i64,
    pub name: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub item_type: String,
    /// Non-negative integer, stored as text for schema compatibility.
    /// Validated at every write.
    pub count: String,
    pub date_added: String,
}

/// The identity returned by a successful login or registration. Callers
/// thread this (inside a [`crate::Session`]) to whoever needs the current
/// user; the store keeps no session state of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub username: String,
    /// Last login recorded *before* this call; empty for fresh accounts.
    pub last_login: String,
}
