//! # Error Types
//!
//! Domain-specific error types for smartmart-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  smartmart-core errors (this file)                                      │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  smartmart-store errors (separate crate)                               │
//! │  └── StoreError       - Persistence failures (I/O, formats, users)     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → CLI message          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product id, quantities, amounts)
//! 3. Errors are enum variants, never String
//! 4. Every error is recoverable: the caller surfaces the message and retries

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations. None of them mutate
/// state: an operation that fails leaves inventory, cart and ledger exactly
/// as they were.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found by id or barcode.
    #[error("Product not found: {0}")]
    ProductNotFound(u64),

    /// Order id is not present in the ledger.
    #[error("Order not found: {0}")]
    OrderNotFound(u64),

    /// Insufficient stock to reserve the requested quantity.
    ///
    /// ## When This Occurs
    /// - Adding a line to the cart for more units than are on hand
    ///
    /// The reservation is rejected whole: partial reservations never happen.
    #[error("Insufficient stock for {name}: available {available}, requested {requested}")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    /// Cart line reference does not exist.
    #[error("No cart line at position {index}")]
    LineNotFound { index: usize },

    /// Finalize was called on a cart with no lines.
    #[error("Cart is empty")]
    EmptyCart,

    /// Finalize was called before a customer was set.
    #[error("Customer name is required")]
    MissingCustomer,

    /// The cart session has already been finalized and cannot be reused.
    #[error("Cart session is already finalized; start a new session")]
    CartFinalized,

    /// Split payment first amount is out of range.
    ///
    /// The first share must satisfy `0 <= first <= amount_due`; the
    /// remainder is computed, never supplied.
    #[error("Invalid split payment: first amount {first} must be between {zero} and {due}", zero = Money::zero())]
    InvalidSplit { first: Money, due: Money },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when input doesn't meet requirements.
/// Used for early validation before business logic runs.
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

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., non-numeric quantity or price).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            name: "Basmati Rice (5kg)".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Basmati Rice (5kg): available 3, requested 5"
        );

        let err = CoreError::InvalidSplit {
            first: Money::from_cents(-100),
            due: Money::from_cents(205200),
        };
        assert_eq!(
            err.to_string(),
            "Invalid split payment: first amount -₹1.00 must be between ₹0.00 and ₹2052.00"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::MustNotBeNegative {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must not be negative");
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
