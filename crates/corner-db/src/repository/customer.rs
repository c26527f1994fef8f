//! # Customer Repository
//!
//! Loyalty customers. The checkout-time mutation is a single delta UPDATE
//! (`apply_sale_effects_tx`): points, lifetime spend, and visit count all
//! move relative to the stored row, never from an in-memory snapshot, so
//! two terminals finishing sales for the same customer both land.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use corner_core::Customer;

const CUSTOMER_COLUMNS: &str = "id, name, phone, email, loyalty_points, total_spent_cents, \
     total_visits, last_visit_at, created_at";

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Fetches a customer by id.
    pub async fn get(&self, id: &str) -> DbResult<Customer> {
        self.find(id)
            .await?
            .ok_or_else(|| DbError::not_found("Customer", id))
    }

    /// Fetches a customer by id, `None` if absent.
    ///
    /// The resume path uses this: a held sale's customer may have been
    /// deleted while the cart was parked, and that is not an error.
    pub async fn find(&self, id: &str) -> DbResult<Option<Customer>> {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = ?1");

        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(customer)
    }

    /// Lists all customers, ordered by name.
    pub async fn list_all(&self) -> DbResult<Vec<Customer>> {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY name");

        let customers = sqlx::query_as::<_, Customer>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(customers)
    }

    /// Inserts a new customer with zeroed counters.
    pub async fn insert(
        &self,
        name: &str,
        phone: Option<&str>,
        email: Option<&str>,
    ) -> DbResult<Customer> {
        let customer = Customer {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            phone: phone.map(String::from),
            email: email.map(String::from),
            loyalty_points: 0,
            total_spent_cents: 0,
            total_visits: 0,
            last_visit_at: None,
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO customers \
             (id, name, phone, email, loyalty_points, total_spent_cents, \
              total_visits, last_visit_at, created_at) \
             VALUES (?1, ?2, ?3, ?4, 0, 0, 0, NULL, ?5)",
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.email)
        .bind(customer.created_at)
        .execute(&self.pool)
        .await?;

        debug!(customer_id = %customer.id, "Inserted customer");
        Ok(customer)
    }

    /// Applies the loyalty effects of a completed sale on a caller-owned
    /// connection.
    ///
    /// `points_delta` may be negative (redemption exceeded earnings) and
    /// the stored balance is allowed to follow it below zero; the session
    /// snapshot the delta was computed from may be stale, and the drift is
    /// accepted rather than silently clamped.
    pub async fn apply_sale_effects_tx(
        conn: &mut SqliteConnection,
        customer_id: &str,
        spent_cents: i64,
        points_delta: i64,
    ) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE customers \
             SET loyalty_points = loyalty_points + ?2, \
                 total_spent_cents = total_spent_cents + ?3, \
                 total_visits = total_visits + 1, \
                 last_visit_at = ?4 \
             WHERE id = ?1",
        )
        .bind(customer_id)
        .bind(points_delta)
        .bind(spent_cents)
        .bind(Utc::now())
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", customer_id));
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
