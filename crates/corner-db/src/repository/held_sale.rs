//! # Held Sale Repository
//!
//! Suspended carts. A row exists only between "hold" and "resume": the
//! resume path reads and deletes in one transaction (`take_tx`) so two
//! terminals racing to resume the same hold cannot both win.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use corner_core::HeldSale;

const HELD_COLUMNS: &str = "id, cashier_id, cashier_name, customer_id, subtotal_cents, \
     total_cents, tax_enabled, redeem_points, lines_json, created_at";

/// Repository for suspended sales.
#[derive(Debug, Clone)]
pub struct HeldSaleRepository {
    pool: SqlitePool,
}

impl HeldSaleRepository {
    /// Creates a new HeldSaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        HeldSaleRepository { pool }
    }

    /// Persists a parked cart.
    pub async fn insert(&self, held: &HeldSale) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO held_sales \
             (id, cashier_id, cashier_name, customer_id, subtotal_cents, total_cents, \
              tax_enabled, redeem_points, lines_json, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )
        .bind(&held.id)
        .bind(&held.cashier_id)
        .bind(&held.cashier_name)
        .bind(&held.customer_id)
        .bind(held.subtotal_cents)
        .bind(held.total_cents)
        .bind(held.tax_enabled)
        .bind(held.redeem_points)
        .bind(&held.lines_json)
        .bind(held.created_at)
        .execute(&self.pool)
        .await?;

        debug!(held_id = %held.id, total_cents = held.total_cents, "Parked cart");
        Ok(())
    }

    /// Lists all parked carts, newest first.
    pub async fn list(&self) -> DbResult<Vec<HeldSale>> {
        let sql = format!("SELECT {HELD_COLUMNS} FROM held_sales ORDER BY created_at DESC");

        let held = sqlx::query_as::<_, HeldSale>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(held)
    }

    /// Claims a parked cart: reads it and deletes it on a caller-owned
    /// connection. If the delete finds nothing (another terminal got there
    /// first), the claim fails and the caller rolls back.
    pub async fn take_tx(conn: &mut SqliteConnection, id: &str) -> DbResult<HeldSale> {
        let sql = format!("SELECT {HELD_COLUMNS} FROM held_sales WHERE id = ?1");

        let held = sqlx::query_as::<_, HeldSale>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| DbError::not_found("Held sale", id))?;

        let result = sqlx::query("DELETE FROM held_sales WHERE id = ?1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Held sale", id));
        }

        debug!(held_id = %id, "Claimed parked cart");
        Ok(held)
    }

    /// Discards a parked cart without resuming it.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM held_sales WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Held sale", id));
        }

        debug!(held_id = %id, "Discarded parked cart");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::HeldSaleRepository;
    use crate::pool::{Database, DbConfig};
    use chrono::Utc;
    use corner_core::HeldSale;
    use uuid::Uuid;

    fn parked(cashier: &str) -> HeldSale {
        HeldSale {
            id: Uuid::new_v4().to_string(),
            cashier_id: "u1".to_string(),
            cashier_name: cashier.to_string(),
            customer_id: None,
            subtotal_cents: 1500,
            total_cents: 1500,
            tax_enabled: true,
            redeem_points: false,
            lines_json: "[]".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn insert_list_round_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.held_sales();

        repo.insert(&parked("Asim")).await.unwrap();
        repo.insert(&parked("Sana")).await.unwrap();

        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn take_removes_the_row() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.held_sales();
        let held = parked("Asim");
        repo.insert(&held).await.unwrap();

        let mut tx = db.pool().begin().await.unwrap();
        let claimed = HeldSaleRepository::take_tx(&mut tx, &held.id).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(claimed.id, held.id);
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn second_take_fails() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.held_sales();
        let held = parked("Asim");
        repo.insert(&held).await.unwrap();

        let mut tx = db.pool().begin().await.unwrap();
        HeldSaleRepository::take_tx(&mut tx, &held.id).await.unwrap();
        tx.commit().await.unwrap();

        let mut tx = db.pool().begin().await.unwrap();
        let err = HeldSaleRepository::take_tx(&mut tx, &held.id).await.unwrap_err();
        assert!(matches!(err, crate::DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn rolled_back_take_keeps_the_row() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.held_sales();
        let held = parked("Asim");
        repo.insert(&held).await.unwrap();

        let mut tx = db.pool().begin().await.unwrap();
        HeldSaleRepository::take_tx(&mut tx, &held.id).await.unwrap();
        tx.rollback().await.unwrap();

        assert_eq!(repo.list().await.unwrap().len(), 1);
    }
}
