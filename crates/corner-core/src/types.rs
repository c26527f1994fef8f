//! # Domain Types
//!
//! Core domain types for Corner POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                               │
//! │                                                                    │
//! │  Catalog side              Ledger side                             │
//! │  ─────────────             ─────────────                           │
//! │  Product ◄──┐              Sale ──► SaleLine (frozen snapshots)    │
//! │  Category   │              SalesReturn (full-sale reversal)        │
//! │  Inventory──┘              HeldSale (suspended cart)               │
//! │  Record                                                            │
//! │                                                                    │
//! │  People                    Configuration                           │
//! │  ─────────────             ─────────────                           │
//! │  Customer (loyalty)        Settings (currency, tax, loyalty)       │
//! │  Cashier  (identity)       TaxRate (basis points)                  │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A `Sale` is the immutable ledger entry: once written it only ever
//! changes by the `Completed → Returned` status transition. Everything a
//! receipt needs (lines, totals, tender, cashier, customer) is denormalized
//! onto it at checkout time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate in basis points (1 bp = 0.01%, so 1700 = 17%).
///
/// Settings screens speak percentages; everything below them speaks bps so
/// tax math stays in integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Convenience for configuration input ("17.0" percent → 1700 bps).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Display-only percentage form.
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// A product available for sale.
///
/// Immutable once referenced by historical sales except for the price
/// fields; sale lines snapshot name and price so later edits never rewrite
/// history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown to the cashier and on receipts.
    pub name: String,

    /// Unit sale price in cents.
    pub price_cents: i64,

    /// Unit cost price in cents (margin reporting).
    pub cost_cents: Option<i64>,

    /// Owning category, if any.
    pub category_id: Option<String>,

    /// Barcode (EAN-13, UPC-A, ...), if the product carries one.
    pub barcode: Option<String>,

    /// Unit of measure ("pcs", "kg", "ltr").
    pub unit: String,

    /// Soft-delete flag; inactive products stay referable by old sales.
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// The current sale price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

/// A product category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Stock tracking counterpart of a [`Product`], one record per product.
///
/// Created lazily when a product is first stocked. `current_stock` is
/// decremented on sale and incremented on return through SQL delta updates
/// only; it may legitimately go negative when the counter oversells.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InventoryRecord {
    pub id: String,
    pub product_id: String,
    pub current_stock: i64,
    /// Reorder threshold for low-stock reporting.
    pub min_stock: i64,
    /// Shelf capacity hint.
    pub max_stock: i64,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// People
// =============================================================================

/// A registered loyalty customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,

    /// Loyalty balance. Mutated only via delta updates; the preserved
    /// earn/redeem formula can drive it negative when a session redeems a
    /// stale snapshot (see the checkout orchestrator).
    pub loyalty_points: i64,

    /// Lifetime spend accumulator in cents, monotonic.
    pub total_spent_cents: i64,

    /// Lifetime completed-sale counter, monotonic.
    pub total_visits: i64,

    pub last_visit_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// The ambient cashier identity, supplied by the (external) auth layer and
/// consumed read-only for attribution on sales and held sales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cashier {
    pub id: String,
    pub name: String,
}

// =============================================================================
// Sale Status / Payment Method
// =============================================================================

/// Lifecycle status of a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    /// Paid and finalized. The only status a sale is ever created with.
    Completed,
    /// Fully reversed by a [`SalesReturn`].
    Returned,
}

/// How the customer paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash; the only method that takes tender and returns change.
    Cash,
    /// Card on an external terminal.
    Card,
    /// Store credit / pay-later.
    Credit,
}

impl PaymentMethod {
    #[inline]
    pub const fn is_cash(&self) -> bool {
        matches!(self, PaymentMethod::Cash)
    }
}

// =============================================================================
// Sale
// =============================================================================

/// An immutable ledger entry for a completed transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: String,
    pub status: SaleStatus,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    /// Tax label as configured at checkout time ("GST", "VAT", ...).
    pub tax_label: String,
    /// Loyalty redemption applied, in cents.
    pub discount_cents: i64,
    pub total_cents: i64,
    /// ISO-ish currency code snapshot from settings ("PKR").
    pub currency: String,
    pub payment_method: PaymentMethod,
    /// Cash tendered; None for non-cash methods.
    pub tendered_cents: Option<i64>,
    pub change_cents: i64,
    pub cashier_id: String,
    pub cashier_name: String,
    /// Registered customer id, or [`crate::WALK_IN_CUSTOMER`].
    pub customer_id: String,
    pub created_at: DateTime<Utc>,
}

/// A line item of a sale, frozen at checkout time.
///
/// Snapshot pattern: name and unit price are copied from the cart line so
/// the receipt survives later product edits and deletions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleLine {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    pub name_snapshot: String,
    pub unit_price_cents: i64,
    pub quantity: i64,
    pub line_total_cents: i64,
}

// =============================================================================
// Suspended Sale
// =============================================================================

/// A cart parked so the terminal can serve the next customer.
///
/// Exists only between "hold" and "resume"; resuming deletes the record in
/// the same transaction that reads it. Line snapshots travel as a JSON
/// payload, the same shape the live cart uses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct HeldSale {
    pub id: String,
    pub cashier_id: String,
    pub cashier_name: String,
    /// Customer attached at hold time, if any. Re-resolved on resume and
    /// silently dropped if the customer no longer exists.
    pub customer_id: Option<String>,
    /// Totals computed at hold time, for the held-sales list display.
    pub subtotal_cents: i64,
    pub total_cents: i64,
    pub tax_enabled: bool,
    pub redeem_points: bool,
    /// Serialized `Vec<CartLine>`.
    pub lines_json: String,
    pub created_at: DateTime<Utc>,
}

impl HeldSale {
    /// Deserializes the held line snapshots.
    pub fn lines(&self) -> Result<Vec<crate::cart::CartLine>, serde_json::Error> {
        serde_json::from_str(&self.lines_json)
    }
}

// =============================================================================
// Sales Return
// =============================================================================

/// A copied line item on a sales return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnLine {
    pub product_id: String,
    pub name: String,
    pub unit_price_cents: i64,
    pub quantity: i64,
    pub line_total_cents: i64,
}

/// The reversal record for a returned sale.
///
/// Always reverses the entire sale; partial returns are unsupported.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SalesReturn {
    pub id: String,
    pub sale_id: String,
    /// Serialized `Vec<ReturnLine>` copied from the sale.
    pub lines_json: String,
    pub total_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl SalesReturn {
    pub fn lines(&self) -> Result<Vec<ReturnLine>, serde_json::Error> {
        serde_json::from_str(&self.lines_json)
    }
}

// =============================================================================
// Settings
// =============================================================================

/// Process-wide configuration, loaded once per POS session and treated as
/// an immutable snapshot for the duration of a checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Settings {
    /// Currency code stamped onto every sale.
    pub currency_code: String,

    /// Master tax switch; the session has its own per-sale toggle.
    pub tax_enabled: bool,
    pub tax_rate_bps: u32,
    /// Receipt label for the tax line ("GST", "VAT").
    pub tax_label: String,

    /// Master loyalty switch.
    pub loyalty_enabled: bool,
    /// Points earned per 100 major currency units of sale total.
    pub points_per_100: i64,
    /// Discount value of one point, in cents.
    pub redeem_rate_cents: i64,
}

impl Settings {
    /// The effective tax rate, honoring the master switch.
    pub fn tax_rate(&self) -> TaxRate {
        if self.tax_enabled {
            TaxRate::from_bps(self.tax_rate_bps)
        } else {
            TaxRate::zero()
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            currency_code: "PKR".to_string(),
            tax_enabled: false,
            tax_rate_bps: 0,
            tax_label: "Tax".to_string(),
            loyalty_enabled: true,
            points_per_100: 1,
            redeem_rate_cents: 50,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tax_rate_from_bps() {
        let rate = TaxRate::from_bps(1700);
        assert_eq!(rate.bps(), 1700);
        assert!((rate.percentage() - 17.0).abs() < 0.001);
    }

    #[test]
    fn tax_rate_from_percentage() {
        assert_eq!(TaxRate::from_percentage(8.25).bps(), 825);
    }

    #[test]
    fn settings_tax_rate_honors_master_switch() {
        let mut settings = Settings {
            tax_enabled: true,
            tax_rate_bps: 1700,
            ..Settings::default()
        };
        assert_eq!(settings.tax_rate().bps(), 1700);

        settings.tax_enabled = false;
        assert!(settings.tax_rate().is_zero());
    }

    #[test]
    fn payment_method_cash_check() {
        assert!(PaymentMethod::Cash.is_cash());
        assert!(!PaymentMethod::Card.is_cash());
        assert!(!PaymentMethod::Credit.is_cash());
    }

    #[test]
    fn held_sale_lines_round_trip() {
        let held = HeldSale {
            id: "h1".to_string(),
            cashier_id: "u1".to_string(),
            cashier_name: "Asim".to_string(),
            customer_id: None,
            subtotal_cents: 500,
            total_cents: 500,
            tax_enabled: false,
            redeem_points: false,
            lines_json: r#"[{"product_id":"p1","name":"Chai","unit_price_cents":500,"quantity":1,"added_at":"2026-01-01T00:00:00Z"}]"#.to_string(),
            created_at: Utc::now(),
        };

        let lines = held.lines().unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].product_id, "p1");
        assert_eq!(lines[0].unit_price_cents, 500);
    }
}
