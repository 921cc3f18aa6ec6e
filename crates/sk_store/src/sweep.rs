//! One-time upgrade of legacy plaintext credentials.

use tracing::{debug, info};

use sk_crypto::password;

use crate::db::Store;
use crate::error::StoreError;
use crate::prefs;

/// Upgrade every legacy plaintext credential row to the encoded hash
/// format, inside a single write transaction.
///
/// Runs at most once per installation: the persisted `pw_migrated_v1`
/// flag short-circuits subsequent calls, and it is only set after the
/// transaction commits. Any failure rolls back every row update and
/// leaves the flag unset so the next startup retries.
///
/// Two processes racing on a fresh install can both observe the flag
/// unset and both sweep; each per-row upgrade is idempotent in effect
/// (last write wins), so no cross-process lock is taken.
///
/// Returns the number of rows upgraded.
pub async fn run_password_migration_once(store: &Store) -> Result<usize, StoreError> {
    if prefs::get_flag(&store.pool, prefs::PW_MIGRATED_V1).await? {
        debug!("password sweep already completed, skipping");
        return Ok(0);
    }

    let mut tx = store.pool.begin().await?;

    let rows: Vec<(String, String)> = sqlx::query_as("SELECT username, password FROM credentials")
        .fetch_all(&mut *tx)
        .await?;

    let mut migrated = 0usize;
    for (username, stored) in rows {
        // Skip already-hashed and empty entries.
        if stored.is_empty() || password::has_encoded_format(&stored) {
            continue;
        }
        let new_hash = password::hash(&stored);
        sqlx::query("UPDATE credentials SET password = ? WHERE username = ?")
            .bind(&new_hash)
            .bind(&username)
            .execute(&mut *tx)
            .await?;
        migrated += 1;
    }

    // An error anywhere above drops `tx`, which rolls back all row
    // updates; the flag write below is only reached after the commit.
    tx.commit().await?;
    prefs::set_flag(&store.pool, prefs::PW_MIGRATED_V1, true).await?;

    if migrated > 0 {
        info!(migrated, "password sweep upgraded legacy credentials");
    }
    Ok(migrated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::CredentialStore;
    use crate::db::test_support::open_temp_store;

    #[tokio::test]
    async fn sweep_upgrades_only_legacy_rows() {
        let (store, _dir) = open_temp_store().await;
        let creds = CredentialStore::new(store.clone());

        let hashed = sk_crypto::hash("already-hashed");
        creds.insert("", "legacy1", "plain-a", "").await.unwrap();
        creds.insert("", "legacy2", "plain-b", "").await.unwrap();
        creds.insert("", "hashed", &hashed, "").await.unwrap();
        creds.insert("", "blank", "", "").await.unwrap();

        let migrated = run_password_migration_once(&store).await.unwrap();
        assert_eq!(migrated, 2);

        for (user, secret) in [("legacy1", "plain-a"), ("legacy2", "plain-b")] {
            let row = creds.find_by_username(user).await.unwrap().unwrap();
            assert!(sk_crypto::has_encoded_format(&row.password));
            assert!(sk_crypto::verify(secret, &row.password));
        }

        // Already-hashed rows are untouched, not double-hashed.
        let row = creds.find_by_username("hashed").await.unwrap().unwrap();
        assert_eq!(row.password, hashed);

        // Empty password fields are skipped.
        let row = creds.find_by_username("blank").await.unwrap().unwrap();
        assert_eq!(row.password, "");
    }

    #[tokio::test]
    async fn second_run_is_a_no_op() {
        let (store, _dir) = open_temp_store().await;
        let creds = CredentialStore::new(store.clone());

        creds.insert("", "legacy", "plain", "").await.unwrap();

        assert_eq!(run_password_migration_once(&store).await.unwrap(), 1);
        assert!(prefs::get_flag(&store.pool, prefs::PW_MIGRATED_V1)
            .await
            .unwrap());

        let after_first = creds.find_by_username("legacy").await.unwrap().unwrap();

        // Zero writes the second time; the row (salt included) is
        // byte-identical.
        assert_eq!(run_password_migration_once(&store).await.unwrap(), 0);
        let after_second = creds.find_by_username("legacy").await.unwrap().unwrap();
        assert_eq!(after_second.password, after_first.password);
        assert!(prefs::get_flag(&store.pool, prefs::PW_MIGRATED_V1)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn failed_sweep_rolls_back_and_leaves_the_flag_unset() {
        let (store, _dir) = open_temp_store().await;
        let creds = CredentialStore::new(store.clone());

        creds.insert("", "legacy1", "plain-a", "").await.unwrap();
        creds.insert("", "brittle", "plain-b", "").await.unwrap();

        // Abort the update of one row mid-transaction.
        sqlx::query(
            "CREATE TRIGGER fail_brittle_update BEFORE UPDATE ON credentials \
             WHEN OLD.username = 'brittle' \
             BEGIN SELECT RAISE(ABORT, 'injected failure'); END",
        )
        .execute(&store.pool)
        .await
        .unwrap();

        let err = run_password_migration_once(&store).await.unwrap_err();
        assert!(matches!(err, StoreError::Database(_)));

        // Every row update rolled back, including ones made before the
        // failure, and the flag stayed unset so the next startup retries.
        for (user, secret) in [("legacy1", "plain-a"), ("brittle", "plain-b")] {
            let row = creds.find_by_username(user).await.unwrap().unwrap();
            assert_eq!(row.password, secret);
        }
        assert!(!prefs::get_flag(&store.pool, prefs::PW_MIGRATED_V1)
            .await
            .unwrap());

        // Fault cleared: the retry completes and commits.
        sqlx::query("DROP TRIGGER fail_brittle_update")
            .execute(&store.pool)
            .await
            .unwrap();
        assert_eq!(run_password_migration_once(&store).await.unwrap(), 2);
        assert!(prefs::get_flag(&store.pool, prefs::PW_MIGRATED_V1)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn sweep_on_empty_table_still_sets_the_flag() {
        let (store, _dir) = open_temp_store().await;

        assert_eq!(run_password_migration_once(&store).await.unwrap(), 0);
        assert!(prefs::get_flag(&store.pool, prefs::PW_MIGRATED_V1)
            .await
            .unwrap());
    }
}
