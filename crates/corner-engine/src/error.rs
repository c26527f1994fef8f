//! # Engine Error Types
//!
//! One error enum per service. Validation failures (empty cart, short
//! tender, wrong sale status) are their own variants so the register UI
//! can phrase them for the cashier; storage failures wrap [`DbError`] and
//! surface as a retryable "could not save" condition.

use thiserror::Error;

use corner_db::DbError;

/// Errors from the checkout orchestrator.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing in the cart; no writes were attempted.
    #[error("Cannot check out an empty cart")]
    EmptyCart,

    /// Cash tender is missing or short of the total.
    #[error("Insufficient payment: required {required} cents, tendered {tendered} cents")]
    InsufficientPayment {
        required: i64,
        tendered: i64,
        shortfall: i64,
    },

    /// The transaction failed; nothing was persisted and the session
    /// cart is left intact for a retry.
    #[error("Checkout failed: {0}")]
    Failed(#[from] DbError),
}

/// Errors from the suspended-sale manager.
#[derive(Debug, Error)]
pub enum HoldError {
    /// An empty cart has nothing worth parking.
    #[error("Cannot hold an empty cart")]
    EmptyCart,

    /// The held lines could not be serialized or deserialized.
    #[error("Held sale payload error: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Hold operation failed: {0}")]
    Failed(#[from] DbError),
}

/// Errors from the return flow.
#[derive(Debug, Error)]
pub enum ReturnError {
    /// Only completed sales can be returned; this one already was.
    #[error("Sale {sale_id} has already been returned")]
    AlreadyReturned { sale_id: String },

    #[error("Return failed: {0}")]
    Failed(#[from] DbError),
}
