//! # Error Types
//!
//! Domain-specific error types for brasa-core.
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (line key, amounts, slot counts)
//! 3. Errors are enum variants, never bare strings
//! 4. Precondition violations are rejected before any state mutation

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These represent business rule violations; the UI translates them into
/// operator-facing messages and leaves the in-progress cart untouched.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A flavor-required product was confirmed with unresolved slots.
    ///
    /// ## When This Occurs
    /// - A package needs 3 flavor slots and only 2 were chosen
    /// - The confirm button must stay disabled until all slots resolve
    #[error("flavor selection incomplete: {resolved} of {expected} slots resolved")]
    UnresolvedFlavorSlots { expected: u32, resolved: u32 },

    /// A flavor slot carried an empty name.
    #[error("flavor slot {slot} is empty")]
    EmptyFlavorSlot { slot: usize },

    /// Cart line not found for the given uniqueness key.
    #[error("cart line not found: {0}")]
    CartLineNotFound(String),

    /// Cart has exceeded the maximum allowed number of lines.
    #[error("cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// Line quantity exceeds the maximum allowed.
    #[error("quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Checkout attempted with an empty cart.
    #[error("cart is empty")]
    EmptyCart,

    /// Cash received does not cover the sale total.
    ///
    /// ## When This Occurs
    /// - Operator keys in less cash than the total
    /// - Checkout is refused; the cart stays editable for a retry
    #[error("insufficient cash: total {total_cents}, received {received_cents}")]
    InsufficientCash { total_cents: i64, received_cents: i64 },

    /// Cash amount missing for a cash payment.
    #[error("cash payment requires the amount received")]
    MissingCashReceived,

    /// Validation error (wraps ValidationError).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when user input doesn't meet requirements; used for early
/// validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g. invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientCash {
            total_cents: 10000,
            received_cents: 5000,
        };
        assert_eq!(
            err.to_string(),
            "insufficient cash: total 10000, received 5000"
        );

        let err = CoreError::UnresolvedFlavorSlots {
            expected: 3,
            resolved: 2,
        };
        assert_eq!(
            err.to_string(),
            "flavor selection incomplete: 2 of 3 slots resolved"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
