//! Persisted boolean flags, keyed by name (the app's preference store).

use sqlx::SqlitePool;

use crate::error::StoreError;

/// Set once the password sweep has fully committed; read at every startup.
pub const PW_MIGRATED_V1: &str = "pw_migrated_v1";

/// Read a flag. Missing keys read as `false`.
pub async fn get_flag(pool: &SqlitePool, key: &str) -> Result<bool, StoreError> {
    let row: Option<(String,)> = sqlx::query_as("SELECT value FROM app_prefs WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;
    Ok(matches!(row, Some((value,)) if value == "true"))
}

/// Write a flag, inserting or overwriting.
pub async fn set_flag(pool: &SqlitePool, key: &str, value: bool) -> Result<(), StoreError> {
    sqlx::query(
        "INSERT INTO app_prefs (key, value) VALUES (?, ?) \
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
    )
    .bind(key)
    .bind(if value { "true" } else { "false" })
    .execute(pool)
    .await?;
    Ok(())
}
