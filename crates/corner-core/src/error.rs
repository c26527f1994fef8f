//! # Error Types
//!
//! Domain-specific error types for corner-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                │
//! │                                                                    │
//! │  corner-core (this file)                                           │
//! │  ├── CoreError        - cart / domain rule violations              │
//! │  └── ValidationError  - input validation failures                  │
//! │                                                                    │
//! │  corner-db:     DbError                - storage failures          │
//! │  corner-engine: CheckoutError /        - orchestration failures,   │
//! │                 HoldError / ReturnError  surfaced to the UI layer  │
//! │                                                                    │
//! │  Flow: ValidationError → CoreError → engine error → UI message     │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Errors are enum variants carrying context, never bare strings, and every
//! variant maps to a message an operator can act on.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business-rule violations in cart and session logic.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The cart has no line for the given product.
    #[error("Product {product_id} is not in the cart")]
    LineNotFound { product_id: String },

    /// The cart is at its distinct-line cap.
    #[error("Cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// Requested line quantity exceeds the per-line cap.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation failures, raised before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    #[error("{field} must be positive")]
    MustBePositive { field: String },

    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience alias for Results with [`CoreError`].
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        let err = CoreError::LineNotFound {
            product_id: "p-42".to_string(),
        };
        assert_eq!(err.to_string(), "Product p-42 is not in the cart");

        let err = CoreError::QuantityTooLarge {
            requested: 1200,
            max: 999,
        };
        assert_eq!(
            err.to_string(),
            "Quantity 1200 exceeds maximum allowed (999)"
        );
    }

    #[test]
    fn validation_converts_to_core_error() {
        let err: CoreError = ValidationError::Required {
            field: "name".to_string(),
        }
        .into();
        assert!(matches!(err, CoreError::Validation(_)));
    }
}
