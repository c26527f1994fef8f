//! # Return Flow
//!
//! Full-sale reversal: one transaction inserts the return record, flips
//! the sale to `returned`, and puts the sold quantities back on the shelf.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │  return_sale(sale_id)                                              │
//! │       │                                                            │
//! │       ├── BEGIN ───────────────────────────────────────────────┐   │
//! │       │     load sale + lines                                  │   │
//! │       │     status flip (guarded: completed → returned only)   │   │
//! │       │     insert sales_returns row (line copy + total)       │   │
//! │       │     stock delta +quantity per line (missing → warn)    │   │
//! │       └── COMMIT ──────────────────────────────────────────────┘   │
//! │                                                                    │
//! │  Already-returned sale: the guard matches no row, everything       │
//! │  rolls back, caller gets AlreadyReturned.                          │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Partial returns are unsupported; loyalty effects of the original sale
//! are left in place.

use tracing::{info, warn};
use uuid::Uuid;

use corner_core::{ReturnLine, SalesReturn};
use corner_db::{Database, InventoryRepository, SaleRepository};

use crate::error::ReturnError;

/// The return-flow service.
#[derive(Debug, Clone)]
pub struct ReturnService {
    db: Database,
}

impl ReturnService {
    /// Creates a new ReturnService.
    pub fn new(db: Database) -> Self {
        ReturnService { db }
    }

    /// Reverses a completed sale in full.
    pub async fn return_sale(&self, sale_id: &str) -> Result<SalesReturn, ReturnError> {
        let mut tx = self.db.pool().begin().await.map_err(corner_db::DbError::from)?;

        let sale = SaleRepository::get_tx(&mut tx, sale_id).await?;
        let lines = SaleRepository::lines_tx(&mut tx, sale_id).await?;

        // The guarded UPDATE is the authority on returnability; reading
        // the status first would race with a concurrent return.
        if !SaleRepository::mark_returned_tx(&mut tx, sale_id).await? {
            return Err(ReturnError::AlreadyReturned {
                sale_id: sale_id.to_string(),
            });
        }

        let return_lines: Vec<ReturnLine> = lines
            .iter()
            .map(|line| ReturnLine {
                product_id: line.product_id.clone(),
                name: line.name_snapshot.clone(),
                unit_price_cents: line.unit_price_cents,
                quantity: line.quantity,
                line_total_cents: line.line_total_cents,
            })
            .collect();

        let sales_return = SalesReturn {
            id: Uuid::new_v4().to_string(),
            sale_id: sale_id.to_string(),
            lines_json: serde_json::to_string(&return_lines)
                .map_err(corner_db::DbError::from)?,
            total_cents: sale.total_cents,
            created_at: chrono::Utc::now(),
        };

        SaleRepository::insert_return_tx(&mut tx, &sales_return).await?;

        for line in &lines {
            let applied =
                InventoryRepository::adjust_stock_tx(&mut tx, &line.product_id, line.quantity)
                    .await?;
            if !applied {
                warn!(
                    product_id = %line.product_id,
                    "No inventory record for returned product, stock not adjusted"
                );
            }
        }

        tx.commit().await.map_err(corner_db::DbError::from)?;

        info!(
            sale_id = %sale_id,
            total_cents = sales_return.total_cents,
            lines = return_lines.len(),
            "Sale returned"
        );

        Ok(sales_return)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::{CheckoutRequest, CheckoutService};
    use corner_core::{Cashier, CheckoutSession, PaymentMethod, Product, SaleStatus, Settings};
    use corner_db::DbConfig;

    fn cashier() -> Cashier {
        Cashier {
            id: "u1".to_string(),
            name: "Asim".to_string(),
        }
    }

    async fn completed_sale(db: &Database, price_cents: i64, quantity: i64, stock: i64) -> (Product, String) {
        let product = db
            .products()
            .insert(Product {
                id: String::new(),
                name: "Returnable".to_string(),
                price_cents,
                cost_cents: None,
                category_id: None,
                barcode: None,
                unit: "pcs".to_string(),
                is_active: true,
                created_at: chrono::Utc::now(),
                updated_at: chrono::Utc::now(),
            })
            .await
            .unwrap();
        db.inventory().upsert(&product.id, stock, 0, 0).await.unwrap();

        let mut session = CheckoutSession::new();
        session.add_product(&product).unwrap();
        session.cart.set_quantity(&product.id, quantity).unwrap();

        let outcome = CheckoutService::new(db.clone())
            .checkout(
                &mut session,
                &CheckoutRequest {
                    payment_method: PaymentMethod::Cash,
                    tendered_cents: Some(price_cents * quantity),
                },
                &Settings::default(),
                &cashier(),
            )
            .await
            .unwrap();

        (product, outcome.sale.id)
    }

    #[tokio::test]
    async fn return_flips_status_records_reversal_and_restocks() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (product, sale_id) = completed_sale(&db, 10_000, 2, 10).await;

        // Stock went 10 → 8 at checkout
        let before = db.inventory().get_by_product(&product.id).await.unwrap().unwrap();
        assert_eq!(before.current_stock, 8);

        let sales_return = ReturnService::new(db.clone())
            .return_sale(&sale_id)
            .await
            .unwrap();

        assert_eq!(sales_return.total_cents, 20_000);
        let lines = sales_return.lines().unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 2);

        let sale = db.sales().get(&sale_id).await.unwrap();
        assert_eq!(sale.status, SaleStatus::Returned);

        // Stock conservation: back to the pre-sale level
        let after = db.inventory().get_by_product(&product.id).await.unwrap().unwrap();
        assert_eq!(after.current_stock, 10);

        assert!(db.sales().get_return(&sale_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn second_return_is_rejected_and_changes_nothing() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (product, sale_id) = completed_sale(&db, 5_000, 1, 5).await;
        let service = ReturnService::new(db.clone());

        service.return_sale(&sale_id).await.unwrap();
        let err = service.return_sale(&sale_id).await.unwrap_err();
        assert!(matches!(err, ReturnError::AlreadyReturned { .. }));

        // No double restock
        let record = db.inventory().get_by_product(&product.id).await.unwrap().unwrap();
        assert_eq!(record.current_stock, 5);
    }

    #[tokio::test]
    async fn unknown_sale_fails_cleanly() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = ReturnService::new(db)
            .return_sale("no-such-sale")
            .await
            .unwrap_err();
        assert!(matches!(err, ReturnError::Failed(_)));
    }
}
