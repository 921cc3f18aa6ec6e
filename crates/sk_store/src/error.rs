use thiserror::Error;

/// Error taxonomy for every store-level operation.
///
/// `AuthenticationFailed` deliberately carries no detail: a missing user,
/// a wrong password, and an unparseable stored record all render the same
/// message so callers cannot enumerate usernames.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("record not found: {0}")]
    NotFound(String),

    #[error("invalid username or password")]
    AuthenticationFailed,

    #[error("username already registered")]
    AlreadyExists,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(String),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}
