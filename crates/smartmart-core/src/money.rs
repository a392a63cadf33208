//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely, plus the
//! `Percent` type used for every discount in the system.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A cart with many discounted lines accumulates that drift into the      │
//! │  order total, and the ledger can no longer reproduce it from the        │
//! │  line items.                                                            │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paise                                            │
//! │    ₹1200.00 is stored as 120000. Discounts round half-up at paise       │
//! │    precision, once, at the point the discount is taken. Totals are      │
//! │    exact sums of exact line totals.                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use smartmart_core::money::{Money, Percent};
//!
//! // Create from paise (preferred)
//! let price = Money::from_cents(120000); // ₹1200.00
//!
//! // Line math: 2 units at 10% off
//! let line = price.multiply_quantity(2).less_percent(Percent::from_percent(10.0));
//! assert_eq!(line.cents(), 216000); // ₹2160.00
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (paise).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for split-payment validation
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support, serialized as a bare integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise (the smallest currency unit).
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole rupees.
    ///
    /// ## Example
    /// ```rust
    /// use smartmart_core::money::Money;
    ///
    /// let price = Money::from_rupees(1200);
    /// assert_eq!(price.cents(), 120000);
    /// ```
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees * 100)
    }

    /// Returns the value in paise (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee portion.
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the paise portion (always 0-99, sign dropped).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use smartmart_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(2500); // ₹25.00
    /// let line = unit_price.multiply_quantity(4);
    /// assert_eq!(line.cents(), 10000); // ₹100.00
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Calculates the given percentage of this amount, rounded half-up
    /// at paise precision.
    ///
    /// This is the single place a discount gets rounded. Line totals are
    /// computed as `subtotal - percent_part(...)`, so the discount amount
    /// and the discounted total always add back up to the exact subtotal.
    ///
    /// ## Example
    /// ```rust
    /// use smartmart_core::money::{Money, Percent};
    ///
    /// let line = Money::from_cents(240000); // ₹2400.00
    /// let off = line.percent_part(Percent::from_percent(10.0));
    /// assert_eq!(off.cents(), 24000); // ₹240.00
    /// ```
    pub fn percent_part(&self, rate: Percent) -> Money {
        // Use i128 to prevent overflow on large amounts
        // rate.bps() is basis points: 1000 = 10%
        // With rounding: (cents * bps + 5000) / 10000
        let part = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(part as i64)
    }

    /// Applies a percentage discount and returns the discounted amount.
    ///
    /// ## Example
    /// ```rust
    /// use smartmart_core::money::{Money, Percent};
    ///
    /// let subtotal = Money::from_cents(216000); // ₹2160.00
    /// let total = subtotal.less_percent(Percent::from_percent(5.0));
    /// assert_eq!(total.cents(), 205200); // ₹2052.00
    /// ```
    pub fn less_percent(&self, rate: Percent) -> Money {
        *self - self.percent_part(rate)
    }

    /// Formats the value as a plain decimal string with two fraction
    /// digits and no currency symbol: `"1200.00"`, `"-5.50"`.
    ///
    /// Used for invoices and CSV, where the file format carries a bare
    /// decimal column.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.rupees().abs(), self.cents_part())
    }

    /// Parses a plain decimal string (`"1200"`, `"1200.5"`, `"1200.50"`)
    /// into a Money value.
    ///
    /// At most two fraction digits are accepted; anything finer would be
    /// sub-paise and cannot round-trip.
    pub fn parse_decimal(input: &str) -> Result<Self, ValidationError> {
        let input = input.trim();
        let invalid = || ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: "must be a decimal number with at most 2 fraction digits".to_string(),
        };

        let (negative, digits) = match input.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, input),
        };
        if digits.is_empty() {
            return Err(invalid());
        }

        let (whole, frac) = match digits.split_once('.') {
            Some((w, f)) => (w, f),
            None => (digits, ""),
        };
        if whole.is_empty() || frac.len() > 2 {
            return Err(invalid());
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let rupees: i64 = whole.parse().map_err(|_| invalid())?;
        // "5" -> 50 paise, "50" -> 50 paise
        let frac_cents: i64 = if frac.is_empty() {
            0
        } else if frac.len() == 1 {
            frac.parse::<i64>().map_err(|_| invalid())? * 10
        } else {
            frac.parse().map_err(|_| invalid())?
        };

        let cents = rupees
            .checked_mul(100)
            .and_then(|c| c.checked_add(frac_cents))
            .ok_or_else(invalid)?;
        Ok(Money(if negative { -cents } else { cents }))
    }
}

/// Display shows money with the currency symbol for logs and tables.
///
/// File formats (invoice rows, CSV columns) use [`Money::to_decimal_string`]
/// instead, which carries no symbol.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₹{}.{:02}", sign, self.rupees().abs(), self.cents_part())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::parse_decimal(s)
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Percent Type
// =============================================================================

/// A percentage represented in basis points (bps), capped at 100%.
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000. 1000 bps = 10%. Discounts entered as
/// fractional percentages ("2.5") stay exact, and discount math stays in
/// integer arithmetic end to end.
///
/// Every constructor clamps into `[0, 10000]`; a `Percent` that exists is
/// always a valid discount rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "u32")]
pub struct Percent(u32);

/// Deserialization routes through the clamping constructor, so a
/// hand-edited document cannot smuggle in a rate above 100%.
impl From<u32> for Percent {
    fn from(bps: u32) -> Self {
        Percent::from_bps(bps)
    }
}

impl Percent {
    /// 100%.
    pub const MAX: Percent = Percent(10_000);

    /// Creates a percentage from basis points, clamping to 100%.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        if bps > 10_000 {
            Percent(10_000)
        } else {
            Percent(bps)
        }
    }

    /// Creates a percentage from a percent value, clamping into [0, 100].
    ///
    /// ## Example
    /// ```rust
    /// use smartmart_core::money::Percent;
    ///
    /// assert_eq!(Percent::from_percent(10.0).bps(), 1000);
    /// assert_eq!(Percent::from_percent(2.5).bps(), 250);
    /// assert_eq!(Percent::from_percent(150.0).bps(), 10000); // clamped
    /// assert_eq!(Percent::from_percent(-3.0).bps(), 0);      // clamped
    /// ```
    pub fn from_percent(pct: f64) -> Self {
        let clamped = pct.clamp(0.0, 100.0);
        Percent((clamped * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero percent.
    #[inline]
    pub const fn zero() -> Self {
        Percent(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Percent {
    fn default() -> Self {
        Percent::zero()
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.percentage())
    }
}

impl FromStr for Percent {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let pct: f64 = s.trim().parse().map_err(|_| ValidationError::InvalidFormat {
            field: "discount".to_string(),
            reason: "must be a number between 0 and 100".to_string(),
        })?;
        if !pct.is_finite() {
            return Err(ValidationError::InvalidFormat {
                field: "discount".to_string(),
                reason: "must be a number between 0 and 100".to_string(),
            });
        }
        Ok(Percent::from_percent(pct))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
