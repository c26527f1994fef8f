//! # corner-core: Pure Business Logic for Corner POS
//!
//! Everything the checkout screen computes lives here as pure code: cart
//! mutation, price/tax/loyalty math, and the explicit checkout session that
//! the orchestration layer threads through a sale.
//!
//! ## Architecture Position
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │                      Corner POS Architecture                       │
//! │                                                                    │
//! │   UI shell (out of scope)                                          │
//! │        │                                                           │
//! │        ▼                                                           │
//! │   corner-engine ── CheckoutService / HoldService / ReturnService   │
//! │        │                                                           │
//! │        ▼                                                           │
//! │  ★ corner-core (THIS CRATE) ★                                      │
//! │                                                                    │
//! │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌────────────┐   │
//! │   │  types  │ │  money  │ │  cart   │ │ pricing │ │  session   │   │
//! │   │ Product │ │  Money  │ │  Cart   │ │  quote  │ │ Checkout-  │   │
//! │   │  Sale   │ │ TaxCalc │ │CartLine │ │ change  │ │  Session   │   │
//! │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └────────────┘   │
//! │                                                                    │
//! │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS               │
//! │        │                                                           │
//! │        ▼                                                           │
//! │   corner-db ── SQLite repositories, migrations                     │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Customer, Sale, HeldSale, ...)
//! - [`money`] - Integer-cents money type (no floating point!)
//! - [`cart`] - Cart and line-item mutation
//! - [`session`] - The explicit per-terminal checkout session
//! - [`pricing`] - Pure pricing engine (subtotal / tax / redemption / total)
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation and coercion
//!
//! ## Design Principles
//!
//! 1. **Pure functions**: same input, same output — the pricing engine is
//!    re-run from scratch on every cart mutation
//! 2. **Integer money**: all amounts are cents (i64), never floats
//! 3. **Snapshot pricing**: a cart line freezes name and unit price at
//!    add time; catalog edits never reprice an open cart
//! 4. **Explicit errors**: typed enums, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod pricing;
pub mod session;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLine};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{earned_points, quote, PriceQuote};
pub use session::CheckoutSession;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Sentinel customer id recorded on a sale with no registered customer.
///
/// Kept as a literal id (rather than NULL) so every sale row carries a
/// customer reference the receipt renderer can print verbatim.
pub const WALK_IN_CUSTOMER: &str = "walk-in";

/// Maximum distinct lines allowed in a single cart.
///
/// Guards against runaway carts; generous for a small-shop counter.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single line.
///
/// Catches fat-finger quantities (1000 typed instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;
