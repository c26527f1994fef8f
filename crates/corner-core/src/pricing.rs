//! # Pricing Engine
//!
//! Pure totals computation, re-run from scratch on every cart or context
//! change — no incremental state anywhere.
//!
//! ## Data Flow
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │  CheckoutSession ──┐                                               │
//! │                    ├──► quote() ──► PriceQuote                     │
//! │  Settings ─────────┘                 │                             │
//! │                                      ├── subtotal  Σ line totals   │
//! │                                      ├── tax       subtotal × bps  │
//! │                                      ├── redemption points × rate  │
//! │                                      ├── total     max(0, s+t−r)   │
//! │                                      └── earned    per 100 spent   │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Determinism is the contract: given identical cart contents, customer
//! loyalty balance, and settings, `quote` returns identical numbers. That
//! referential transparency is what makes every property below testable as
//! a pure unit.

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::session::CheckoutSession;
use crate::types::{PaymentMethod, Settings, TaxRate};

/// The fully computed price breakdown for a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    /// Receipt label for the tax line, from settings.
    pub tax_label: String,
    /// Loyalty redemption value before clipping.
    pub redemption_cents: i64,
    /// Points the redemption spends — the customer's full balance,
    /// even when the redemption value exceeds subtotal + tax.
    pub redeemed_points: i64,
    /// Grand total, floored at zero.
    pub total_cents: i64,
    /// Points this sale will earn, computed on the final total.
    pub earned_points: i64,
}

impl PriceQuote {
    /// Discount actually applied to the total (the clipped redemption).
    pub fn discount_cents(&self) -> i64 {
        self.redemption_cents
            .min(self.subtotal_cents + self.tax_cents)
    }
}

/// Computes the full price breakdown for a session.
///
/// Pure: no I/O, no clocks, no hidden state.
pub fn quote(session: &CheckoutSession, settings: &Settings) -> PriceQuote {
    let subtotal = Money::from_cents(session.cart.subtotal_cents());

    // Tax applies only when both the settings switch and the per-sale
    // toggle are on.
    let rate = if session.tax_enabled {
        settings.tax_rate()
    } else {
        TaxRate::zero()
    };
    let tax = subtotal.calculate_tax(rate);

    // All-or-nothing redemption of the attached customer's balance. A
    // redemption worth more than subtotal + tax is clipped by the total
    // floor below, but the full balance is still considered spent.
    let redeemed_points = session.redeemable_points();
    let redemption = Money::from_cents(redeemed_points * settings.redeem_rate_cents);

    let total = (subtotal + tax - redemption).clamp_non_negative();

    PriceQuote {
        subtotal_cents: subtotal.cents(),
        tax_cents: tax.cents(),
        tax_label: settings.tax_label.clone(),
        redemption_cents: redemption.cents(),
        redeemed_points,
        total_cents: total.cents(),
        earned_points: earned_points(total.cents(), settings),
    }
}

/// Points earned on a sale total: floor(total / 100 major units ×
/// points_per_100). Zero while loyalty is disabled.
pub fn earned_points(total_cents: i64, settings: &Settings) -> i64 {
    if !settings.loyalty_enabled {
        return 0;
    }
    total_cents * settings.points_per_100 / 10_000
}

/// Change due: tendered − total for cash when the tender exceeds the
/// total, zero otherwise (including all non-cash methods).
pub fn change_cents(total_cents: i64, method: PaymentMethod, tendered_cents: Option<i64>) -> i64 {
    match (method, tendered_cents) {
        (PaymentMethod::Cash, Some(tendered)) if tendered > total_cents => tendered - total_cents,
        _ => 0,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Customer, Product};
    use chrono::Utc;

    fn test_product(id: &str, price_cents: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            price_cents,
            cost_cents: None,
            category_id: None,
            barcode: None,
            unit: "pcs".to_string(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn test_customer(points: i64) -> Customer {
        Customer {
            id: "c1".to_string(),
            name: "Ayesha".to_string(),
            phone: None,
            email: None,
            loyalty_points: points,
            total_spent_cents: 0,
            total_visits: 0,
            last_visit_at: None,
            created_at: Utc::now(),
        }
    }

    fn session_with_subtotal(cents: i64) -> CheckoutSession {
        let mut session = CheckoutSession::new();
        session.add_product(&test_product("p1", cents)).unwrap();
        session
    }

    #[test]
    fn quote_is_deterministic() {
        let mut session = session_with_subtotal(4000);
        session.select_customer(Some(test_customer(100)));
        session.redeem_points = true;
        let settings = Settings {
            tax_enabled: true,
            tax_rate_bps: 1700,
            ..Settings::default()
        };

        assert_eq!(quote(&session, &settings), quote(&session, &settings));
    }

    #[test]
    fn tax_requires_both_switches() {
        let mut session = session_with_subtotal(1000);
        let settings = Settings {
            tax_enabled: true,
            tax_rate_bps: 1000,
            ..Settings::default()
        };

        assert_eq!(quote(&session, &settings).tax_cents, 100);

        session.tax_enabled = false;
        assert_eq!(quote(&session, &settings).tax_cents, 0);

        session.tax_enabled = true;
        let settings_off = Settings {
            tax_enabled: false,
            tax_rate_bps: 1000,
            ..Settings::default()
        };
        assert_eq!(quote(&session, &settings_off).tax_cents, 0);
    }

    #[test]
    fn redemption_covers_loyalty_round_trip_scenario() {
        // 100 points at 0.50/point against a 40.00 cart: redemption 50.00,
        // total floored at zero, zero points earned, full balance spent.
        let mut session = session_with_subtotal(4000);
        session.select_customer(Some(test_customer(100)));
        session.redeem_points = true;

        let settings = Settings::default(); // redeem_rate_cents = 50

        let q = quote(&session, &settings);
        assert_eq!(q.redemption_cents, 5000);
        assert_eq!(q.total_cents, 0);
        assert_eq!(q.redeemed_points, 100);
        assert_eq!(q.earned_points, 0);
        assert_eq!(q.discount_cents(), 4000);
    }

    #[test]
    fn total_never_negative() {
        let mut session = session_with_subtotal(100);
        session.select_customer(Some(test_customer(1_000_000)));
        session.redeem_points = true;

        let q = quote(&session, &Settings::default());
        assert_eq!(q.total_cents, 0);
    }

    #[test]
    fn no_redemption_without_toggle() {
        let mut session = session_with_subtotal(4000);
        session.select_customer(Some(test_customer(100)));

        let q = quote(&session, &Settings::default());
        assert_eq!(q.redemption_cents, 0);
        assert_eq!(q.total_cents, 4000);
    }

    #[test]
    fn earned_points_floor_per_100_units() {
        let settings = Settings {
            points_per_100: 2,
            ..Settings::default()
        };
        // 250.00 → floor(2.5) × 2 = 5
        assert_eq!(earned_points(25_000, &settings), 5);
        // 99.99 → 1 (floor of 1.9998)
        assert_eq!(earned_points(9_999, &settings), 1);
        assert_eq!(earned_points(0, &settings), 0);
    }

    #[test]
    fn earned_points_zero_when_loyalty_disabled() {
        let settings = Settings {
            loyalty_enabled: false,
            points_per_100: 5,
            ..Settings::default()
        };
        assert_eq!(earned_points(100_000, &settings), 0);
    }

    #[test]
    fn cash_change_calculation() {
        // total 150.00: tender 200.00 → change 50.00
        assert_eq!(
            change_cents(15_000, PaymentMethod::Cash, Some(20_000)),
            5_000
        );
        // exact tender → no change
        assert_eq!(change_cents(15_000, PaymentMethod::Cash, Some(15_000)), 0);
        // non-cash never produces change
        assert_eq!(change_cents(15_000, PaymentMethod::Card, Some(20_000)), 0);
        assert_eq!(change_cents(15_000, PaymentMethod::Credit, None), 0);
    }
}
