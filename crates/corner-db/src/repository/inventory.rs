//! # Inventory Repository
//!
//! Stock counters, one record per product, created lazily on first
//! stocking.
//!
//! ## Delta Updates
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │  WRONG (read-modify-write, lost update under concurrency):         │
//! │    let s = get(product).current_stock;                             │
//! │    set(product, s - qty);                                          │
//! │                                                                    │
//! │  RIGHT (relative delta, serialized by SQLite):                     │
//! │    UPDATE inventory SET current_stock = current_stock - ?qty       │
//! │    WHERE product_id = ?                                            │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `current_stock` has no lower bound: overselling drives it negative and
//! the low-stock report surfaces the drift for a physical recount.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use corner_core::InventoryRecord;

const INVENTORY_COLUMNS: &str =
    "id, product_id, current_stock, min_stock, max_stock, updated_at";

/// Repository for inventory stock records.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    /// Creates a new InventoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    /// Fetches the stock record for a product, if one exists.
    ///
    /// Products without a record are simply untracked; callers treat
    /// `None` as "no stock bookkeeping for this product".
    pub async fn get_by_product(&self, product_id: &str) -> DbResult<Option<InventoryRecord>> {
        let sql = format!("SELECT {INVENTORY_COLUMNS} FROM inventory WHERE product_id = ?1");

        let record = sqlx::query_as::<_, InventoryRecord>(&sql)
            .bind(product_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    /// Lists every stock record.
    pub async fn list_all(&self) -> DbResult<Vec<InventoryRecord>> {
        let sql = format!("SELECT {INVENTORY_COLUMNS} FROM inventory");

        let records = sqlx::query_as::<_, InventoryRecord>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    /// Lists records at or below their reorder threshold.
    pub async fn list_low_stock(&self) -> DbResult<Vec<InventoryRecord>> {
        let sql = format!(
            "SELECT {INVENTORY_COLUMNS} FROM inventory \
             WHERE current_stock <= min_stock ORDER BY current_stock"
        );

        let records = sqlx::query_as::<_, InventoryRecord>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    /// Creates or replaces the stock record for a product (stocking /
    /// recount path, where an absolute level is known).
    pub async fn upsert(
        &self,
        product_id: &str,
        current_stock: i64,
        min_stock: i64,
        max_stock: i64,
    ) -> DbResult<InventoryRecord> {
        let record = InventoryRecord {
            id: Uuid::new_v4().to_string(),
            product_id: product_id.to_string(),
            current_stock,
            min_stock,
            max_stock,
            updated_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO inventory \
             (id, product_id, current_stock, min_stock, max_stock, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6) \
             ON CONFLICT(product_id) DO UPDATE SET \
                 current_stock = excluded.current_stock, \
                 min_stock = excluded.min_stock, \
                 max_stock = excluded.max_stock, \
                 updated_at = excluded.updated_at",
        )
        .bind(&record.id)
        .bind(&record.product_id)
        .bind(record.current_stock)
        .bind(record.min_stock)
        .bind(record.max_stock)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;

        debug!(product_id = %product_id, stock = current_stock, "Upserted inventory record");
        Ok(record)
    }

    /// Applies a relative stock delta on a caller-owned connection.
    ///
    /// Returns `false` when no record exists for the product, in which
    /// case the caller decides whether that gap matters (checkout logs it
    /// and carries on).
    pub async fn adjust_stock_tx(
        conn: &mut SqliteConnection,
        product_id: &str,
        delta: i64,
    ) -> DbResult<bool> {
        let result = sqlx::query(
            "UPDATE inventory \
             SET current_stock = current_stock + ?2, updated_at = ?3 \
             WHERE product_id = ?1",
        )
        .bind(product_id)
        .bind(delta)
        .bind(Utc::now())
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
