//! Login and registration over the credential store.
//!
//! The login path runs a fixed sequence: validate inputs, look the user
//! up, verify against the stored password field, bump the last-login
//! timestamp, return the identity. Which verification runs depends on
//! the stored format: encoded records go through `sk_crypto::verify`,
//! legacy plaintext rows are compared byte-for-byte and — only on a
//! match — re-hashed and persisted in place (migration-on-login).
//!
//! Failure policy: the initial lookup is fatal, but the two follow-up
//! writes (migration, last-login bump) are best-effort. Once the
//! password check has passed, a write failure is logged and the login
//! still succeeds.

use async_trait::async_trait;
use chrono::Local;
use tracing::{debug, info, warn};

use sk_crypto::password;

use crate::credentials::CredentialStore;
use crate::db::Store;
use crate::error::StoreError;
use crate::models::Identity;
use crate::traits::{AuthApi, CredentialBackend};

/// A live login session. Returned by `login`/`register` and threaded by
/// the caller; the service itself keeps no current-user state.
#[derive(Debug, Clone)]
pub struct Session {
    pub identity: Identity,
}

/// Generic over its storage backend so tests can substitute doubles;
/// production code always runs on [`CredentialStore`].
#[derive(Clone)]
pub struct AuthService<C = CredentialStore> {
    creds: C,
}

impl AuthService {
    pub fn new(store: Store) -> Self {
        Self {
            creds: CredentialStore::new(store),
        }
    }
}

impl<C: CredentialBackend> AuthService<C> {
    pub fn with_backend(creds: C) -> Self {
        Self { creds }
    }

    /// Authenticate `username` against the persisted password field.
    ///
    /// Blank inputs are an [`StoreError::InvalidInput`] caller bug; an
    /// unknown user and a wrong password both surface as the same
    /// generic [`StoreError::AuthenticationFailed`]. The returned
    /// identity carries the last-login value recorded *before* this
    /// call.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, StoreError> {
        let username = username.trim();
        if username.is_empty() || password.trim().is_empty() {
            return Err(StoreError::InvalidInput(
                "username and password are required".into(),
            ));
        }

        let Some(row) = self.creds.find_by_username(username).await? else {
            warn!(username, "login rejected: unknown user");
            return Err(StoreError::AuthenticationFailed);
        };
        let previous_login = row.last_login.clone();

        if password::has_encoded_format(&row.password) {
            if !password::verify(password, &row.password) {
                warn!(username, "login rejected: password mismatch");
                return Err(StoreError::AuthenticationFailed);
            }
            // Best-effort: a failed last-login write never fails the login.
            if let Err(e) = self
                .creds
                .update_password_and_last_login(username, None, Some(&now_timestamp()))
                .await
            {
                warn!(username, error = %e, "failed to update last login");
            }
        } else {
            // Legacy plaintext row: exact byte comparison. No migration on
            // a failed comparison.
            if row.password != password {
                warn!(username, "login rejected: password mismatch (legacy row)");
                return Err(StoreError::AuthenticationFailed);
            }
            let new_hash = password::hash(password);
            match self
                .creds
                .update_password_and_last_login(username, Some(&new_hash), Some(&now_timestamp()))
                .await
            {
                Ok(_) => info!(username, "migrated legacy password to hashed format"),
                // Swallowed: the plaintext comparison already succeeded, so
                // the login stands; the sweep or a later login will retry.
                Err(e) => warn!(username, error = %e, "legacy password migration failed"),
            }
        }

        info!(username, "login succeeded");
        Ok(Session {
            identity: Identity {
                id: row.id.to_string(),
                username: row.username,
                last_login: previous_login,
            },
        })
    }

    /// Create a new account. The password is hashed before it ever hits
    /// storage; an existing username is a terminal
    /// [`StoreError::AlreadyExists`] — no overwrite.
    pub async fn register(&self, username: &str, password: &str) -> Result<Session, StoreError> {
        let username = username.trim();
        if username.is_empty() || password.trim().is_empty() {
            return Err(StoreError::InvalidInput(
                "username and password are required".into(),
            ));
        }

        if self.creds.find_by_username(username).await?.is_some() {
            warn!(username, "registration rejected: username taken");
            return Err(StoreError::AlreadyExists);
        }

        let hashed = password::hash(password);
        let id = self
            .creds
            .insert("", username, &hashed, &now_timestamp())
            .await?;

        info!(username, id, "registered new account");
        Ok(Session {
            identity: Identity {
                id: id.to_string(),
                username: username.to_string(),
                // A fresh account has no prior login.
                last_login: String::new(),
            },
        })
    }

    /// Drop the in-process session. Persisted credentials are untouched.
    // TODO: revoke server-side state here once sessions exist beyond the
    // process; today there is nothing to revoke.
    pub fn logout(&self, session: Session) {
        debug!(username = %session.identity.username, "logout");
        drop(session);
    }
}

#[async_trait]
impl<C: CredentialBackend> AuthApi for AuthService<C> {
    async fn login(&self, username: &str, password: &str) -> Result<Session, StoreError> {
        AuthService::login(self, username, password).await
    }

    async fn register(&self, username: &str, password: &str) -> Result<Session, StoreError> {
        AuthService::register(self, username, password).await
    }
}

/// Current local time in the human-readable format persisted by earlier
/// releases (e.g. "Aug 23, 2026 1:05:09 PM").
fn now_timestamp() -> String {
    Local::now().format("%b %-d, %Y %-I:%M:%S %p").to_string()
}
