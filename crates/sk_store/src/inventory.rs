//! Inventory CRUD repository.
//!
//! Validation happens up front and draws two distinctions the callers
//! rely on: blank or non-numeric *values* are an [`StoreError::InvalidInput`]
//! caller bug, while a lookup that simply matches nothing is either a
//! [`StoreError::NotFound`] (point reads) or an `Ok(false)` (updates and
//! deletes, where "no matching row" is a normal outcome).

use async_trait::async_trait;
use chrono::Local;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::db::Store;
use crate::error::StoreError;
use crate::models::InventoryItem;
use crate::traits::InventoryApi;

#[derive(Clone)]
pub struct InventoryRepository {
    store: Store,
}

impl InventoryRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    fn pool(&self) -> &SqlitePool {
        &self.store.pool
    }

    /// Full unfiltered scan. An empty table is an empty vec, not an error.
    pub async fn get_all_items(&self) -> Result<Vec<InventoryItem>, StoreError> {
        let items = sqlx::query_as::<_, InventoryItem>(
            "SELECT id, name, type, count, date_added FROM inventory",
        )
        .fetch_all(self.pool())
        .await?;
        debug!(count = items.len(), "fetched inventory items");
        Ok(items)
    }

    pub async fn get_item_by_id(&self, item_id: &str) -> Result<InventoryItem, StoreError> {
        let Some(id) = parse_item_id(item_id)? else {
            return Err(StoreError::NotFound(format!("item {}", item_id.trim())));
        };

        let item = sqlx::query_as::<_, InventoryItem>(
            "SELECT id, name, type, count, date_added FROM inventory WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        item.ok_or_else(|| StoreError::NotFound(format!("item {id}")))
    }

    /// Insert a new item with trimmed values and a current timestamp.
    /// Returns the new row's id.
    pub async fn add_item(
        &self,
        name: &str,
        item_type: &str,
        count: &str,
    ) -> Result<i64, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::InvalidInput("item name cannot be empty".into()));
        }
        let item_type = item_type.trim();
        if item_type.is_empty() {
            return Err(StoreError::InvalidInput("item type cannot be empty".into()));
        }
        let count = parse_count(count)?;

        let result = sqlx::query(
            "INSERT INTO inventory (name, type, count, date_added) VALUES (?, ?, ?, ?)",
        )
        .bind(name)
        .bind(item_type)
        .bind(&count)
        .bind(now_timestamp())
        .execute(self.pool())
        .await?;

        let id = result.last_insert_rowid();
        info!(id, name, "added inventory item");
        Ok(id)
    }

    /// Set an item's count. `Ok(false)` when no row matched the id —
    /// distinct from the `InvalidInput` returned for blank or
    /// non-numeric values.
    pub async fn update_item_count(
        &self,
        item_id: &str,
        new_count: &str,
    ) -> Result<bool, StoreError> {
        let id = parse_item_id(item_id)?;
        let count = parse_count(new_count)?;
        let Some(id) = id else {
            return Ok(false);
        };

        let result = sqlx::query("UPDATE inventory SET count = ? WHERE id = ?")
            .bind(&count)
            .bind(id)
            .execute(self.pool())
            .await?;

        let touched = result.rows_affected() > 0;
        if touched {
            info!(id, count = %count, "updated item count");
        } else {
            warn!(id, "no rows updated");
        }
        Ok(touched)
    }

    /// Delete one item. Same false-vs-error split as `update_item_count`.
    pub async fn delete_item(&self, item_id: &str) -> Result<bool, StoreError> {
        let Some(id) = parse_item_id(item_id)? else {
            return Ok(false);
        };

        let result = sqlx::query("DELETE FROM inventory WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!(id, "deleted inventory item");
        } else {
            warn!(id, "no rows deleted");
        }
        Ok(deleted)
    }

    /// Unconditional bulk delete. Succeeds (true) even on an empty table.
    pub async fn delete_all_items(&self) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM inventory")
            .execute(self.pool())
            .await?;
        info!(deleted = result.rows_affected(), "cleared inventory table");
        Ok(true)
    }
}

#[async_trait]
impl InventoryApi for InventoryRepository {
    async fn get_all_items(&self) -> Result<Vec<InventoryItem>, StoreError> {
        InventoryRepository::get_all_items(self).await
    }

    async fn get_item_by_id(&self, item_id: &str) -> Result<InventoryItem, StoreError> {
        InventoryRepository::get_item_by_id(self, item_id).await
    }

    async fn add_item(&self, name: &str, item_type: &str, count: &str) -> Result<i64, StoreError> {
        InventoryRepository::add_item(self, name, item_type, count).await
    }

    async fn update_item_count(&self, item_id: &str, new_count: &str) -> Result<bool, StoreError> {
        InventoryRepository::update_item_count(self, item_id, new_count).await
    }

    async fn delete_item(&self, item_id: &str) -> Result<bool, StoreError> {
        InventoryRepository::delete_item(self, item_id).await
    }

    async fn delete_all_items(&self) -> Result<bool, StoreError> {
        InventoryRepository::delete_all_items(self).await
    }
}

/// Blank ids are a caller bug; a non-numeric id can never match an
/// integer primary key, so it reads as a lookup miss (`None`) rather
/// than an error.
fn parse_item_id(raw: &str) -> Result<Option<i64>, StoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(StoreError::InvalidInput("item id cannot be empty".into()));
    }
    Ok(trimmed.parse::<i64>().ok())
}

/// Counts must parse as non-negative integers at write time; the trimmed
/// string representation is what gets stored.
fn parse_count(raw: &str) -> Result<String, StoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(StoreError::InvalidInput("item count cannot be empty".into()));
    }
    if trimmed.parse::<u64>().is_err() {
        return Err(StoreError::InvalidInput(format!(
            "item count must be a non-negative integer, got {trimmed:?}"
        )));
    }
    Ok(trimmed.to_string())
}

/// Current local time in the human-readable format persisted by earlier
/// releases.
fn now_timestamp() -> String {
    Local::now().format("%b %-d, %Y %-I:%M:%S %p").to_string()
}
