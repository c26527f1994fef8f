//! # Validation Module
//!
//! Input validation and coercion shared by the engine and any calling
//! shell. Business rules live here; storage constraints (NOT NULL, UNIQUE,
//! foreign keys) are a second line of defense in the schema.

use crate::error::ValidationError;
use crate::MAX_LINE_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Quantity Coercion
// =============================================================================

/// Coerces raw quantity input from the quantity box into an integer.
///
/// The rules the original screen applied, kept verbatim:
/// - non-numeric or empty input falls back to 1
/// - `0` also falls back to 1 (removal goes through the explicit remove
///   control or a negative step, never through typing zero)
/// - negative values pass through; `Cart::set_quantity` treats anything
///   below 1 as removal
pub fn parse_quantity(input: &str) -> i64 {
    match input.trim().parse::<i64>() {
        Ok(0) | Err(_) => 1,
        Ok(qty) => qty,
    }
}

/// Validates an already-parsed quantity for direct API callers.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

// =============================================================================
// Catalog Field Validators
// =============================================================================

/// Product names: non-empty, at most 200 characters.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Prices must be non-negative; zero is allowed (giveaway items).
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Tax rates: 0 to 10000 bps (0% to 100%).
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10_000,
        });
    }

    Ok(())
}

/// Cash tender must be positive.
pub fn validate_tendered_cents(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "amount tendered".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
