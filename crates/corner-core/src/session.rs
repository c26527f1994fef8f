//! # Checkout Session
//!
//! The explicit per-terminal session value threaded through pricing and
//! checkout.
//!
//! The original POS kept the live cart, the selected customer, and the
//! tax/redeem toggles in ambient page state, which made the pricing logic
//! untestable in isolation. Here all of it travels in one plain value that
//! the orchestration layer owns and the pricing engine reads.

use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::error::CoreResult;
use crate::types::{Customer, Product};

/// Everything mutable about the sale currently being rung up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// The live cart.
    pub cart: Cart,

    /// Customer attached to this sale, if any. A snapshot taken when the
    /// cashier selected the customer — the loyalty balance it carries is
    /// what a redemption spends.
    pub customer: Option<Customer>,

    /// Per-sale tax toggle; effective only when settings enable tax too.
    pub tax_enabled: bool,

    /// Whether to redeem the attached customer's full point balance.
    pub redeem_points: bool,

    /// Id of the most recently completed sale, kept so the UI can offer a
    /// "view receipt" shortcut until the next cart begins.
    pub last_sale_id: Option<String>,
}

impl CheckoutSession {
    /// Creates a fresh session with an empty cart.
    pub fn new() -> Self {
        CheckoutSession {
            cart: Cart::new(),
            customer: None,
            tax_enabled: true,
            redeem_points: false,
            last_sale_id: None,
        }
    }

    /// Adds one unit of a product to the cart.
    ///
    /// A new cart invalidates the previous receipt shortcut, so the last
    /// completed sale id is dropped here.
    pub fn add_product(&mut self, product: &Product) -> CoreResult<()> {
        self.last_sale_id = None;
        self.cart.add_product(product)
    }

    /// Attaches (or detaches) a customer. Detaching also turns redemption
    /// off since there is no balance left to redeem.
    pub fn select_customer(&mut self, customer: Option<Customer>) {
        if customer.is_none() {
            self.redeem_points = false;
        }
        self.customer = customer;
    }

    /// Full reset: empties the cart and clears customer, toggles, and the
    /// receipt shortcut. The "new sale" button.
    pub fn new_sale(&mut self) {
        self.cart.clear();
        self.customer = None;
        self.tax_enabled = true;
        self.redeem_points = false;
        self.last_sale_id = None;
    }

    /// Marks a successful checkout: the cart and selections clear, and the
    /// sale id is retained for the receipt shortcut.
    pub fn complete(&mut self, sale_id: String) {
        self.cart.clear();
        self.customer = None;
        self.redeem_points = false;
        self.last_sale_id = Some(sale_id);
    }

    /// The points a redemption would spend: the attached customer's full
    /// balance, all-or-nothing. Zero when redemption is off, no customer is
    /// attached, or the balance is not positive.
    pub fn redeemable_points(&self) -> i64 {
        if !self.redeem_points {
            return 0;
        }
        match &self.customer {
            Some(c) if c.loyalty_points > 0 => c.loyalty_points,
            _ => 0,
        }
    }
}

impl Default for CheckoutSession {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
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

    #[test]
    fn add_product_clears_receipt_shortcut() {
        let mut session = CheckoutSession::new();
        session.last_sale_id = Some("sale-1".to_string());

        session.add_product(&test_product("p1", 100)).unwrap();
        assert!(session.last_sale_id.is_none());
    }

    #[test]
    fn redeemable_points_requires_toggle_customer_and_balance() {
        let mut session = CheckoutSession::new();
        assert_eq!(session.redeemable_points(), 0);

        session.customer = Some(test_customer(80));
        assert_eq!(session.redeemable_points(), 0); // toggle off

        session.redeem_points = true;
        assert_eq!(session.redeemable_points(), 80);

        session.customer = Some(test_customer(0));
        assert_eq!(session.redeemable_points(), 0); // nothing to spend
    }

    #[test]
    fn detaching_customer_disables_redemption() {
        let mut session = CheckoutSession::new();
        session.select_customer(Some(test_customer(50)));
        session.redeem_points = true;

        session.select_customer(None);
        assert!(!session.redeem_points);
        assert_eq!(session.redeemable_points(), 0);
    }

    #[test]
    fn complete_clears_cart_and_keeps_sale_id() {
        let mut session = CheckoutSession::new();
        session.add_product(&test_product("p1", 100)).unwrap();
        session.select_customer(Some(test_customer(10)));

        session.complete("sale-9".to_string());

        assert!(session.cart.is_empty());
        assert!(session.customer.is_none());
        assert_eq!(session.last_sale_id.as_deref(), Some("sale-9"));
    }
}
