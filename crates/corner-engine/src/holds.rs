//! # Suspended-Sale Manager
//!
//! Parks the live cart so the terminal can serve the next customer, and
//! resumes it later.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │  hold(session)      cart + toggles + customer ──► held_sales row   │
//! │                     session reset to an empty sale                 │
//! │                                                                    │
//! │  resume(held_id)    BEGIN: SELECT + DELETE, COMMIT                 │
//! │                     customer re-fetched by id (dropped when gone)  │
//! │                     ──► rebuilt CheckoutSession                    │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The claim-and-delete runs in one transaction, so a hold can only ever
//! be resumed once even with two terminals racing for it. Whether a
//! non-empty live cart may be discarded to make room for the resumed one
//! is a caller (UI confirmation) concern.

use tracing::{debug, info};
use uuid::Uuid;

use corner_core::{pricing, Cart, Cashier, CheckoutSession, HeldSale, Settings};
use corner_db::{Database, HeldSaleRepository};

use crate::error::HoldError;

/// The suspended-sale manager.
#[derive(Debug, Clone)]
pub struct HoldService {
    db: Database,
}

impl HoldService {
    /// Creates a new HoldService.
    pub fn new(db: Database) -> Self {
        HoldService { db }
    }

    /// Parks the session's cart and resets the session.
    ///
    /// Totals are computed at hold time so the held-sales list can show
    /// them without re-pricing; the resume path re-prices from the line
    /// snapshots anyway.
    pub async fn hold(
        &self,
        session: &mut CheckoutSession,
        settings: &Settings,
        cashier: &Cashier,
    ) -> Result<HeldSale, HoldError> {
        if session.cart.is_empty() {
            return Err(HoldError::EmptyCart);
        }

        let quote = pricing::quote(session, settings);

        let held = HeldSale {
            id: Uuid::new_v4().to_string(),
            cashier_id: cashier.id.clone(),
            cashier_name: cashier.name.clone(),
            customer_id: session.customer.as_ref().map(|c| c.id.clone()),
            subtotal_cents: quote.subtotal_cents,
            total_cents: quote.total_cents,
            tax_enabled: session.tax_enabled,
            redeem_points: session.redeem_points,
            lines_json: serde_json::to_string(&session.cart.lines)?,
            created_at: chrono::Utc::now(),
        };

        self.db.held_sales().insert(&held).await?;

        info!(
            held_id = %held.id,
            lines = session.cart.line_count(),
            total_cents = held.total_cents,
            "Cart parked"
        );

        session.new_sale();
        Ok(held)
    }

    /// Lists parked carts, newest first.
    pub async fn list(&self) -> Result<Vec<HeldSale>, HoldError> {
        Ok(self.db.held_sales().list().await?)
    }

    /// Claims a parked cart and rebuilds a session from it.
    ///
    /// The held customer is re-fetched so the session carries a fresh
    /// loyalty snapshot; a customer deleted while the cart was parked is
    /// dropped (the sale proceeds as walk-in).
    pub async fn resume(&self, held_id: &str) -> Result<CheckoutSession, HoldError> {
        let mut tx = self.db.pool().begin().await.map_err(corner_db::DbError::from)?;
        let held = HeldSaleRepository::take_tx(&mut tx, held_id).await?;
        tx.commit().await.map_err(corner_db::DbError::from)?;

        let lines = held.lines()?;

        let customer = match &held.customer_id {
            Some(id) => {
                let found = self.db.customers().find(id).await?;
                if found.is_none() {
                    debug!(customer_id = %id, "Held customer no longer exists, resuming as walk-in");
                }
                found
            }
            None => None,
        };

        let mut session = CheckoutSession::new();
        session.cart = Cart::from_lines(lines);
        session.tax_enabled = held.tax_enabled;
        session.select_customer(customer);
        // The redeem toggle survives only while its customer does
        session.redeem_points = held.redeem_points && session.customer.is_some();

        info!(held_id = %held_id, lines = session.cart.line_count(), "Cart resumed");
        Ok(session)
    }

    /// Discards a parked cart without resuming it.
    pub async fn discard(&self, held_id: &str) -> Result<(), HoldError> {
        self.db.held_sales().delete(held_id).await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
