//! # Payment Resolution
//!
//! Validates and normalizes a payment declaration for a given amount due.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  finalize(total = ₹2052.00)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PaymentDeclaration ──► resolve() ──► PaymentRecord                     │
//! │                                                                         │
//! │  Cash/Card/UPI: details pass through as an opaque reference string.     │
//! │  Split: first share is declared, remainder is COMPUTED and labelled     │
//! │         "Remaining". resolve() fails with InvalidSplit when the first   │
//! │         share is negative or exceeds the amount due.                    │
//! │                                                                         │
//! │  Cancellation is not an error: the caller simply never invokes          │
//! │  resolve()/finalize(), and the cart keeps its reservations.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;

/// Label for the computed second share of a split payment.
pub const REMAINING_LABEL: &str = "Remaining";

// =============================================================================
// Payment Method
// =============================================================================

/// The tender type recorded on an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Card payment on an external terminal.
    Card,
    /// UPI transfer.
    #[serde(rename = "UPI")]
    Upi,
    /// Two-part payment; details carry the shares.
    Split,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Card => "Card",
            PaymentMethod::Upi => "UPI",
            PaymentMethod::Split => "Split",
        };
        write!(f, "{name}")
    }
}

// =============================================================================
// Payment Record (normalized output)
// =============================================================================

/// One share of a split payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitShare {
    /// Free-form sub-method label ("Cash", "Card", ... or "Remaining").
    pub label: String,
    /// Share amount in paise.
    pub amount_cents: i64,
}

impl SplitShare {
    /// Returns the share amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

/// Method-specific payment details.
///
/// Serialized untagged: a plain string for single-method payments, an
/// ordered share list for splits (first declared share, then "Remaining").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PaymentDetails {
    /// Opaque free-form reference (transaction id, card auth code, ...).
    Reference(String),
    /// Split shares in declaration order.
    Split(Vec<SplitShare>),
}

impl fmt::Display for PaymentDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentDetails::Reference(text) => write!(f, "{text}"),
            PaymentDetails::Split(shares) => {
                write!(f, "{{")?;
                for (i, share) in shares.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", share.label, share.amount().to_decimal_string())?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// The normalized `{method, details}` structure consumed verbatim by
/// `OrderRecord` and the invoice layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub method: PaymentMethod,
    pub details: PaymentDetails,
}

// =============================================================================
// Payment Declaration (input)
// =============================================================================

/// What the caller declares at finalize time.
///
/// Declining to pay is modelled by not constructing a declaration at all;
/// finalize is then never called and nothing mutates.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentDeclaration {
    Cash { reference: String },
    Card { reference: String },
    Upi { reference: String },
    /// First sub-method and its amount; the remainder is computed.
    Split {
        first_method: String,
        first_amount: Money,
    },
}

// =============================================================================
// Resolver
// =============================================================================

/// Validates a declaration against the amount due and normalizes it.
///
/// ## Errors
/// - `Validation` when `amount_due` is negative
/// - `InvalidSplit` when a split's first amount is negative or exceeds
///   the amount due
///
/// ## Example
/// ```rust
/// use smartmart_core::money::Money;
/// use smartmart_core::payment::{resolve, PaymentDeclaration, PaymentDetails};
///
/// let due = Money::from_cents(205200);
/// let record = resolve(
///     due,
///     PaymentDeclaration::Split {
///         first_method: "Cash".to_string(),
///         first_amount: Money::from_cents(82080),
///     },
/// )
/// .unwrap();
/// match record.details {
///     PaymentDetails::Split(shares) => {
///         assert_eq!(shares[1].label, "Remaining");
///         assert_eq!(shares[1].amount_cents, 123120);
///     }
///     _ => unreachable!(),
/// }
/// ```
pub fn resolve(amount_due: Money, declaration: PaymentDeclaration) -> CoreResult<PaymentRecord> {
    if amount_due.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "amount due".to_string(),
        }
        .into());
    }

    let record = match declaration {
        PaymentDeclaration::Cash { reference } => PaymentRecord {
            method: PaymentMethod::Cash,
            details: PaymentDetails::Reference(reference),
        },
        PaymentDeclaration::Card { reference } => PaymentRecord {
            method: PaymentMethod::Card,
            details: PaymentDetails::Reference(reference),
        },
        PaymentDeclaration::Upi { reference } => PaymentRecord {
            method: PaymentMethod::Upi,
            details: PaymentDetails::Reference(reference),
        },
        PaymentDeclaration::Split {
            first_method,
            first_amount,
        } => {
            if first_amount.is_negative() || first_amount > amount_due {
                return Err(CoreError::InvalidSplit {
                    first: first_amount,
                    due: amount_due,
                });
            }
            let remainder = amount_due - first_amount;
            PaymentRecord {
                method: PaymentMethod::Split,
                details: PaymentDetails::Split(vec![
                    SplitShare {
                        label: first_method,
                        amount_cents: first_amount.cents(),
                    },
                    SplitShare {
                        label: REMAINING_LABEL.to_string(),
                        amount_cents: remainder.cents(),
                    },
                ]),
            }
        }
    };

    Ok(record)
}

// =============================================================================
// Unit Tests
// =============================================================================
