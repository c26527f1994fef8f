//! # Sale Repository
//!
//! The sales ledger: sale headers, frozen line snapshots, and full-sale
//! returns.
//!
//! ## Write Path
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │  Checkout (one transaction, owned by the orchestrator):            │
//! │    insert_tx(sale) ──► insert_line_tx(line) × N                    │
//! │        ──► customer delta ──► stock deltas ──► COMMIT              │
//! │                                                                    │
//! │  Return (one transaction):                                         │
//! │    insert_return_tx ──► mark_returned_tx ──► stock deltas ──► COMMIT │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sale rows are immutable after commit except for the single
//! `completed → returned` status flip, which is guarded in SQL so a sale
//! can only be returned once.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use corner_core::{Sale, SaleLine, SalesReturn};

const SALE_COLUMNS: &str = "id, status, subtotal_cents, tax_cents, tax_label, discount_cents, \
     total_cents, currency, payment_method, tendered_cents, change_cents, \
     cashier_id, cashier_name, customer_id, created_at";

const LINE_COLUMNS: &str =
    "id, sale_id, product_id, name_snapshot, unit_price_cents, quantity, line_total_cents";

/// Repository for the sales ledger.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Fetches a sale header by id.
    pub async fn get(&self, id: &str) -> DbResult<Sale> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1");

        sqlx::query_as::<_, Sale>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Sale", id))
    }

    /// Fetches a sale header on a caller-owned connection (return flow
    /// reads the sale inside the same transaction that flips it).
    pub async fn get_tx(conn: &mut SqliteConnection, id: &str) -> DbResult<Sale> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1");

        sqlx::query_as::<_, Sale>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| DbError::not_found("Sale", id))
    }

    /// Fetches the line snapshots of a sale.
    pub async fn lines(&self, sale_id: &str) -> DbResult<Vec<SaleLine>> {
        let sql = format!("SELECT {LINE_COLUMNS} FROM sale_lines WHERE sale_id = ?1");

        let lines = sqlx::query_as::<_, SaleLine>(&sql)
            .bind(sale_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(lines)
    }

    /// Same as [`Self::lines`], on a caller-owned connection.
    pub async fn lines_tx(conn: &mut SqliteConnection, sale_id: &str) -> DbResult<Vec<SaleLine>> {
        let sql = format!("SELECT {LINE_COLUMNS} FROM sale_lines WHERE sale_id = ?1");

        let lines = sqlx::query_as::<_, SaleLine>(&sql)
            .bind(sale_id)
            .fetch_all(&mut *conn)
            .await?;

        Ok(lines)
    }

    /// Lists the most recent sales, newest first.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<Sale>> {
        let sql = format!(
            "SELECT {SALE_COLUMNS} FROM sales ORDER BY created_at DESC LIMIT ?1"
        );

        let sales = sqlx::query_as::<_, Sale>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(sales)
    }

    /// Lists sales for one customer, newest first.
    pub async fn list_for_customer(&self, customer_id: &str, limit: u32) -> DbResult<Vec<Sale>> {
        let sql = format!(
            "SELECT {SALE_COLUMNS} FROM sales \
             WHERE customer_id = ?1 ORDER BY created_at DESC LIMIT ?2"
        );

        let sales = sqlx::query_as::<_, Sale>(&sql)
            .bind(customer_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(sales)
    }

    // =========================================================================
    // Writes (transaction-scoped)
    // =========================================================================

    /// Inserts a sale header on a caller-owned connection.
    pub async fn insert_tx(conn: &mut SqliteConnection, sale: &Sale) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO sales \
             (id, status, subtotal_cents, tax_cents, tax_label, discount_cents, \
              total_cents, currency, payment_method, tendered_cents, change_cents, \
              cashier_id, cashier_name, customer_id, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        )
        .bind(&sale.id)
        .bind(sale.status)
        .bind(sale.subtotal_cents)
        .bind(sale.tax_cents)
        .bind(&sale.tax_label)
        .bind(sale.discount_cents)
        .bind(sale.total_cents)
        .bind(&sale.currency)
        .bind(sale.payment_method)
        .bind(sale.tendered_cents)
        .bind(sale.change_cents)
        .bind(&sale.cashier_id)
        .bind(&sale.cashier_name)
        .bind(&sale.customer_id)
        .bind(sale.created_at)
        .execute(&mut *conn)
        .await?;

        debug!(sale_id = %sale.id, total_cents = sale.total_cents, "Inserted sale");
        Ok(())
    }

    /// Inserts one frozen line snapshot on a caller-owned connection.
    pub async fn insert_line_tx(conn: &mut SqliteConnection, line: &SaleLine) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO sale_lines \
             (id, sale_id, product_id, name_snapshot, unit_price_cents, quantity, \
              line_total_cents) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&line.id)
        .bind(&line.sale_id)
        .bind(&line.product_id)
        .bind(&line.name_snapshot)
        .bind(line.unit_price_cents)
        .bind(line.quantity)
        .bind(line.line_total_cents)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Flips a completed sale to returned.
    ///
    /// The status guard in the WHERE clause makes the flip idempotent-safe:
    /// returns `false` when the sale was already returned (or absent), and
    /// the caller rolls back.
    pub async fn mark_returned_tx(conn: &mut SqliteConnection, sale_id: &str) -> DbResult<bool> {
        let result = sqlx::query(
            "UPDATE sales SET status = 'returned' \
             WHERE id = ?1 AND status = 'completed'",
        )
        .bind(sale_id)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Inserts the reversal record for a sale. The UNIQUE constraint on
    /// `sale_id` is the second line of defense against double returns.
    pub async fn insert_return_tx(
        conn: &mut SqliteConnection,
        sales_return: &SalesReturn,
    ) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO sales_returns (id, sale_id, lines_json, total_cents, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&sales_return.id)
        .bind(&sales_return.sale_id)
        .bind(&sales_return.lines_json)
        .bind(sales_return.total_cents)
        .bind(sales_return.created_at)
        .execute(&mut *conn)
        .await?;

        debug!(sale_id = %sales_return.sale_id, "Inserted sales return");
        Ok(())
    }

    /// Fetches the return record for a sale, if one exists.
    pub async fn get_return(&self, sale_id: &str) -> DbResult<Option<SalesReturn>> {
        let sales_return = sqlx::query_as::<_, SalesReturn>(
            "SELECT id, sale_id, lines_json, total_cents, created_at \
             FROM sales_returns WHERE sale_id = ?1",
        )
        .bind(sale_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sales_return)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
