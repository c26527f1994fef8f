//! # Cart Module
//!
//! The in-progress, uncommitted collection of items a cashier is about to
//! sell.
//!
//! ## Invariants
//! - At most one line per distinct product id; re-adding a product
//!   increments its quantity instead
//! - Quantity is always ≥ 1; setting it below 1 removes the line
//! - A line's name and unit price are frozen when it is added — catalog
//!   price edits mid-sale never reprice an open cart
//! - Caps: [`MAX_CART_LINES`] distinct lines, [`MAX_LINE_QUANTITY`] per line

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::Product;
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY};

/// One line of the cart.
///
/// `name` and `unit_price_cents` are snapshots of the product at add time,
/// not live references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: String,
    pub name: String,
    pub unit_price_cents: i64,
    pub quantity: i64,
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    /// Creates a line from a product, freezing name and price.
    pub fn from_product(product: &Product) -> Self {
        CartLine {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price_cents: product.price_cents,
            quantity: 1,
            added_at: Utc::now(),
        }
    }

    /// Unit price × quantity.
    #[inline]
    pub fn line_total_cents(&self) -> i64 {
        self.unit_price_cents * self.quantity
    }
}

/// The shopping cart: an ordered sequence of lines.
///
/// Order is insertion order — irrelevant for totals, relevant for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    pub lines: Vec<CartLine>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart {
            lines: Vec::new(),
            created_at: Some(Utc::now()),
        }
    }

    /// Rebuilds a cart from previously serialized lines (resume of a held
    /// sale). Lines are trusted as-is; they were validated when added.
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        Cart {
            lines,
            created_at: Some(Utc::now()),
        }
    }

    /// Adds one unit of a product.
    ///
    /// If a line for the product already exists its quantity grows by 1;
    /// otherwise a new line is appended with the product's *current* price
    /// frozen onto it.
    pub fn add_product(&mut self, product: &Product) -> CoreResult<()> {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product.id)
        {
            if line.quantity + 1 > MAX_LINE_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: line.quantity + 1,
                    max: MAX_LINE_QUANTITY,
                });
            }
            line.quantity += 1;
            return Ok(());
        }

        if self.lines.len() >= MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }

        self.lines.push(CartLine::from_product(product));
        Ok(())
    }

    /// Replaces a line's quantity.
    ///
    /// A quantity below 1 is equivalent to [`Cart::remove_line`].
    pub fn set_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<()> {
        if quantity < 1 {
            return self.remove_line(product_id);
        }

        if quantity > MAX_LINE_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_LINE_QUANTITY,
            });
        }

        match self.lines.iter_mut().find(|l| l.product_id == product_id) {
            Some(line) => {
                line.quantity = quantity;
                Ok(())
            }
            None => Err(CoreError::LineNotFound {
                product_id: product_id.to_string(),
            }),
        }
    }

    /// Drops a line entirely.
    pub fn remove_line(&mut self, product_id: &str) -> CoreResult<()> {
        let before = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);

        if self.lines.len() == before {
            Err(CoreError::LineNotFound {
                product_id: product_id.to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.created_at = Some(Utc::now());
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Sum of all line quantities.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Subtotal over all lines, before tax and discounts.
    pub fn subtotal_cents(&self) -> i64 {
        self.lines.iter().map(|l| l.line_total_cents()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Looks up a line by product id.
    pub fn line(&self, product_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
