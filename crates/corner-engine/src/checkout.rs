//! # Checkout Orchestrator
//!
//! Turns a priced session into a committed sale.
//!
//! ## Flow
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │  checkout(session, request, settings, cashier)                     │
//! │       │                                                            │
//! │       ├── validate (no writes): empty cart? short cash tender?     │
//! │       │                                                            │
//! │       ├── BEGIN ───────────────────────────────────────────────┐   │
//! │       │     insert sale header                                 │   │
//! │       │     insert frozen line snapshots                       │   │
//! │       │     customer delta (points / spend / visits)           │   │
//! │       │     stock delta per line (missing record → warn)       │   │
//! │       ├── COMMIT ──────────────────────────────────────────────┘   │
//! │       │                                                            │
//! │       └── session.complete(sale_id) ──► CheckoutOutcome            │
//! │                                                                    │
//! │  Any failure before COMMIT rolls everything back and leaves the    │
//! │  session cart intact for a retry.                                  │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Loyalty Delta
//! The points movement is `earned − (redeeming ? snapshot balance : 0)`,
//! applied as a relative UPDATE against the stored row. When the session's
//! customer snapshot is stale (the balance moved since the cashier
//! attached the customer), the stored balance can go negative; that drift
//! is accepted and visible rather than silently clamped.

use tracing::{info, warn};
use uuid::Uuid;

use corner_core::pricing::{self, PriceQuote};
use corner_core::{
    Cashier, CheckoutSession, PaymentMethod, Sale, SaleLine, SaleStatus, Settings,
    WALK_IN_CUSTOMER,
};
use corner_db::{CustomerRepository, Database, InventoryRepository, SaleRepository};

use crate::error::CheckoutError;

/// Payment details supplied by the cashier at checkout.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub payment_method: PaymentMethod,
    /// Cash tendered; ignored for non-cash methods.
    pub tendered_cents: Option<i64>,
}

/// Everything the receipt needs from a completed checkout.
#[derive(Debug, Clone)]
pub struct CheckoutOutcome {
    pub sale: Sale,
    pub lines: Vec<SaleLine>,
    pub quote: PriceQuote,
    /// Product ids whose stock could not be decremented because no
    /// inventory record exists. Reported, not fatal.
    pub stock_drift: Vec<String>,
}

/// The checkout orchestrator.
#[derive(Debug, Clone)]
pub struct CheckoutService {
    db: Database,
}

impl CheckoutService {
    /// Creates a new CheckoutService.
    pub fn new(db: Database) -> Self {
        CheckoutService { db }
    }

    /// Completes the sale currently in the session.
    ///
    /// Validation is fail-fast and write-free; after it passes, all
    /// persistence happens in one transaction. On success the session is
    /// cleared and keeps the sale id for the receipt shortcut.
    pub async fn checkout(
        &self,
        session: &mut CheckoutSession,
        request: &CheckoutRequest,
        settings: &Settings,
        cashier: &Cashier,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        if session.cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let quote = pricing::quote(session, settings);

        // Cash must cover the total up front; card and credit settle
        // externally and take no tender here.
        let tendered_cents = match request.payment_method {
            PaymentMethod::Cash => {
                let tendered = request.tendered_cents.unwrap_or(0);
                if tendered < quote.total_cents {
                    return Err(CheckoutError::InsufficientPayment {
                        required: quote.total_cents,
                        tendered,
                        shortfall: quote.total_cents - tendered,
                    });
                }
                Some(tendered)
            }
            PaymentMethod::Card | PaymentMethod::Credit => None,
        };

        let change_cents =
            pricing::change_cents(quote.total_cents, request.payment_method, tendered_cents);

        let customer_id = session
            .customer
            .as_ref()
            .map(|c| c.id.clone())
            .unwrap_or_else(|| WALK_IN_CUSTOMER.to_string());

        let sale = Sale {
            id: Uuid::new_v4().to_string(),
            status: SaleStatus::Completed,
            subtotal_cents: quote.subtotal_cents,
            tax_cents: quote.tax_cents,
            tax_label: quote.tax_label.clone(),
            discount_cents: quote.discount_cents(),
            total_cents: quote.total_cents,
            currency: settings.currency_code.clone(),
            payment_method: request.payment_method,
            tendered_cents,
            change_cents,
            cashier_id: cashier.id.clone(),
            cashier_name: cashier.name.clone(),
            customer_id,
            created_at: chrono::Utc::now(),
        };

        let lines: Vec<SaleLine> = session
            .cart
            .lines
            .iter()
            .map(|line| SaleLine {
                id: Uuid::new_v4().to_string(),
                sale_id: sale.id.clone(),
                product_id: line.product_id.clone(),
                name_snapshot: line.name.clone(),
                unit_price_cents: line.unit_price_cents,
                quantity: line.quantity,
                line_total_cents: line.line_total_cents(),
            })
            .collect();

        let mut stock_drift = Vec::new();

        let mut tx = self.db.pool().begin().await.map_err(corner_db::DbError::from)?;

        SaleRepository::insert_tx(&mut tx, &sale).await?;
        for line in &lines {
            SaleRepository::insert_line_tx(&mut tx, line).await?;
        }

        if let Some(customer) = &session.customer {
            let points_delta = quote.earned_points - quote.redeemed_points;
            if points_delta < 0 {
                warn!(
                    customer_id = %customer.id,
                    points_delta,
                    "Applying negative loyalty delta (full-balance redemption)"
                );
            }
            CustomerRepository::apply_sale_effects_tx(
                &mut tx,
                &customer.id,
                sale.total_cents,
                points_delta,
            )
            .await?;
        }

        for line in &lines {
            let applied =
                InventoryRepository::adjust_stock_tx(&mut tx, &line.product_id, -line.quantity)
                    .await?;
            if !applied {
                warn!(
                    product_id = %line.product_id,
                    "No inventory record for sold product, stock not adjusted"
                );
                stock_drift.push(line.product_id.clone());
            }
        }

        tx.commit().await.map_err(corner_db::DbError::from)?;

        info!(
            sale_id = %sale.id,
            total_cents = sale.total_cents,
            lines = lines.len(),
            payment = ?sale.payment_method,
            "Checkout complete"
        );

        session.complete(sale.id.clone());

        Ok(CheckoutOutcome {
            sale,
            lines,
            quote,
            stock_drift,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use corner_core::{Product, Settings};
    use corner_db::{Database, DbConfig};

    fn cashier() -> Cashier {
        Cashier {
            id: "u1".to_string(),
            name: "Asim".to_string(),
        }
    }

    fn cash(tendered: i64) -> CheckoutRequest {
        CheckoutRequest {
            payment_method: PaymentMethod::Cash,
            tendered_cents: Some(tendered),
        }
    }

    async fn seeded_product(db: &Database, name: &str, price_cents: i64) -> Product {
        db.products()
            .insert(Product {
                id: String::new(),
                name: name.to_string(),
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
            .unwrap()
    }

    #[tokio::test]
    async fn empty_cart_is_rejected_before_any_write() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let service = CheckoutService::new(db.clone());
        let mut session = CheckoutSession::new();

        let err = service
            .checkout(&mut session, &cash(1000), &Settings::default(), &cashier())
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::EmptyCart));
        assert!(db.sales().list_recent(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn short_cash_tender_is_rejected_and_cart_survives() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let service = CheckoutService::new(db.clone());

        let product = seeded_product(&db, "Rice", 23_000).await;
        let mut session = CheckoutSession::new();
        session.add_product(&product).unwrap();

        let err = service
            .checkout(&mut session, &cash(20_000), &Settings::default(), &cashier())
            .await
            .unwrap_err();

        match err {
            CheckoutError::InsufficientPayment {
                required,
                tendered,
                shortfall,
            } => {
                assert_eq!(required, 23_000);
                assert_eq!(tendered, 20_000);
                assert_eq!(shortfall, 3_000);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert_eq!(session.cart.line_count(), 1);
        assert!(db.sales().list_recent(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn cash_sale_persists_ledger_change_and_stock() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let service = CheckoutService::new(db.clone());

        let product = seeded_product(&db, "Milk 1L", 22_000).await;
        db.inventory().upsert(&product.id, 10, 2, 20).await.unwrap();

        let mut session = CheckoutSession::new();
        session.add_product(&product).unwrap();
        session.cart.set_quantity(&product.id, 2).unwrap();

        let outcome = service
            .checkout(&mut session, &cash(50_000), &Settings::default(), &cashier())
            .await
            .unwrap();

        assert_eq!(outcome.sale.total_cents, 44_000);
        assert_eq!(outcome.sale.change_cents, 6_000);
        assert_eq!(outcome.sale.customer_id, WALK_IN_CUSTOMER);
        assert!(outcome.stock_drift.is_empty());

        // Session cleared, receipt shortcut kept
        assert!(session.cart.is_empty());
        assert_eq!(session.last_sale_id.as_deref(), Some(outcome.sale.id.as_str()));

        // Ledger row with frozen line snapshot
        let stored = db.sales().get(&outcome.sale.id).await.unwrap();
        assert_eq!(stored.status, SaleStatus::Completed);
        let lines = db.sales().lines(&outcome.sale.id).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(lines[0].name_snapshot, "Milk 1L");

        // Stock decremented
        let record = db.inventory().get_by_product(&product.id).await.unwrap().unwrap();
        assert_eq!(record.current_stock, 8);
    }

    #[tokio::test]
    async fn tax_is_applied_when_both_switches_are_on() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let service = CheckoutService::new(db.clone());

        let product = seeded_product(&db, "Oil", 10_000).await;
        let mut session = CheckoutSession::new();
        session.add_product(&product).unwrap();

        let settings = Settings {
            tax_enabled: true,
            tax_rate_bps: 1700,
            tax_label: "GST".to_string(),
            ..Settings::default()
        };

        let outcome = service
            .checkout(&mut session, &cash(20_000), &settings, &cashier())
            .await
            .unwrap();

        assert_eq!(outcome.sale.tax_cents, 1_700);
        assert_eq!(outcome.sale.tax_label, "GST");
        assert_eq!(outcome.sale.total_cents, 11_700);
    }

    #[tokio::test]
    async fn missing_inventory_record_is_reported_not_fatal() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let service = CheckoutService::new(db.clone());

        let product = seeded_product(&db, "Untracked", 5_000).await;
        let mut session = CheckoutSession::new();
        session.add_product(&product).unwrap();

        let outcome = service
            .checkout(&mut session, &cash(5_000), &Settings::default(), &cashier())
            .await
            .unwrap();

        assert_eq!(outcome.stock_drift, vec![product.id.clone()]);
        assert!(db.sales().get(&outcome.sale.id).await.is_ok());
    }

    #[tokio::test]
    async fn checkout_drives_stock_negative_when_overselling() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let service = CheckoutService::new(db.clone());

        let product = seeded_product(&db, "Eggs", 33_000).await;
        db.inventory().upsert(&product.id, 1, 0, 0).await.unwrap();

        let mut session = CheckoutSession::new();
        session.add_product(&product).unwrap();
        session.cart.set_quantity(&product.id, 3).unwrap();

        service
            .checkout(&mut session, &cash(99_000), &Settings::default(), &cashier())
            .await
            .unwrap();

        let record = db.inventory().get_by_product(&product.id).await.unwrap().unwrap();
        assert_eq!(record.current_stock, -2);
    }

    #[tokio::test]
    async fn loyalty_sale_earns_points_and_accumulates_spend() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let service = CheckoutService::new(db.clone());

        let product = seeded_product(&db, "Rice 5kg", 230_000).await;
        let customer = db.customers().insert("Fatima", None, None).await.unwrap();

        let mut session = CheckoutSession::new();
        session.add_product(&product).unwrap();
        session.select_customer(Some(customer.clone()));

        // points_per_100 = 1 → 2300.00 earns 23 points
        let outcome = service
            .checkout(&mut session, &cash(230_000), &Settings::default(), &cashier())
            .await
            .unwrap();

        assert_eq!(outcome.quote.earned_points, 23);

        let updated = db.customers().get(&customer.id).await.unwrap();
        assert_eq!(updated.loyalty_points, 23);
        assert_eq!(updated.total_spent_cents, 230_000);
        assert_eq!(updated.total_visits, 1);
    }

    #[tokio::test]
    async fn full_balance_redemption_floors_total_and_spends_all_points() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let service = CheckoutService::new(db.clone());

        let product = seeded_product(&db, "Bread", 4_000).await;
        let customer = db.customers().insert("Ali", None, None).await.unwrap();

        // Give the customer 100 points via a counter delta
        {
            let mut conn = db.pool().acquire().await.unwrap();
            CustomerRepository::apply_sale_effects_tx(&mut conn, &customer.id, 0, 100)
                .await
                .unwrap();
        }
        let customer = db.customers().get(&customer.id).await.unwrap();

        let mut session = CheckoutSession::new();
        session.add_product(&product).unwrap();
        session.select_customer(Some(customer.clone()));
        session.redeem_points = true;

        // redemption 100 × 50 = 5000 against subtotal 4000 → total 0
        let outcome = service
            .checkout(&mut session, &cash(0), &Settings::default(), &cashier())
            .await
            .unwrap();

        assert_eq!(outcome.sale.total_cents, 0);
        assert_eq!(outcome.sale.discount_cents, 4_000);
        assert_eq!(outcome.quote.redeemed_points, 100);
        assert_eq!(outcome.quote.earned_points, 0);

        // 100 + (0 − 100) = 0: the full balance was spent
        let updated = db.customers().get(&customer.id).await.unwrap();
        assert_eq!(updated.loyalty_points, 0);
        assert_eq!(updated.total_visits, 2);
    }

    #[tokio::test]
    async fn customer_points_go_negative_when_snapshot_is_stale() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let service = CheckoutService::new(db.clone());

        let product = seeded_product(&db, "Sugar", 1_000).await;
        let customer = db.customers().insert("Sana", None, None).await.unwrap();
        {
            let mut conn = db.pool().acquire().await.unwrap();
            CustomerRepository::apply_sale_effects_tx(&mut conn, &customer.id, 0, 60)
                .await
                .unwrap();
        }
        let snapshot = db.customers().get(&customer.id).await.unwrap();
        assert_eq!(snapshot.loyalty_points, 60);

        // Another terminal spends the balance while this session holds
        // the 60-point snapshot
        {
            let mut conn = db.pool().acquire().await.unwrap();
            CustomerRepository::apply_sale_effects_tx(&mut conn, &customer.id, 0, -60)
                .await
                .unwrap();
        }

        let mut session = CheckoutSession::new();
        session.add_product(&product).unwrap();
        session.select_customer(Some(snapshot));
        session.redeem_points = true;

        service
            .checkout(&mut session, &cash(0), &Settings::default(), &cashier())
            .await
            .unwrap();

        // delta = earned(0) − 60 against a balance already at 0
        let updated = db.customers().get(&customer.id).await.unwrap();
        assert_eq!(updated.loyalty_points, -60);
    }

    #[tokio::test]
    async fn card_payment_takes_no_tender_and_gives_no_change() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let service = CheckoutService::new(db.clone());

        let product = seeded_product(&db, "Chips", 5_000).await;
        let mut session = CheckoutSession::new();
        session.add_product(&product).unwrap();

        let request = CheckoutRequest {
            payment_method: PaymentMethod::Card,
            tendered_cents: Some(99_999), // ignored for card
        };

        let outcome = service
            .checkout(&mut session, &request, &Settings::default(), &cashier())
            .await
            .unwrap();

        assert_eq!(outcome.sale.tendered_cents, None);
        assert_eq!(outcome.sale.change_cents, 0);
    }
}
