//! # Domain Types
//!
//! Core domain types used throughout SmartMart POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │    Product      │   │  OrderRecord    │   │   PaymentRecord     │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────────  │   │
//! │  │  product_id     │   │  order_id       │   │  method             │   │
//! │  │  name/category  │   │  customer       │   │  details            │   │
//! │  │  quantity       │   │  items[]        │   │  (see payment.rs)   │   │
//! │  │  price_cents    │   │  total_cents    │   └─────────────────────┘   │
//! │  │  barcode        │   │  created_at     │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! │                                                                         │
//! │  OrderLine: frozen snapshot of one cart line at finalize time.         │
//! │  Deleting a Product never touches past OrderRecords.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! An `OrderLine` copies name and unit price out of the `Product` when the
//! line enters the cart. The ledger is therefore self-contained: totals are
//! reproducible from line items alone, independent of product lifetime.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::{Money, Percent};
use crate::LOYALTY_UNIT_CENTS;

// =============================================================================
// Product
// =============================================================================

/// A product owned by the inventory store.
///
/// `quantity` is the stock on hand; it is mutated only through the
/// store's reserve/release API and never goes negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Positive integer identity, immutable once assigned.
    pub product_id: u64,

    /// Display name shown in tables and on invoices.
    pub name: String,

    /// Free-text category ("General" when left blank at creation).
    pub category: String,

    /// Stock on hand. Never negative.
    pub quantity: i64,

    /// Unit price in paise.
    pub price_cents: i64,

    /// Free-text supplier.
    pub supplier: String,

    /// Barcode string. Defaults to the decimal form of `product_id`
    /// when none is supplied at creation (barcode fallback).
    pub barcode: String,
}

impl Product {
    /// Returns the unit price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks whether the product counts as low stock for a threshold.
    #[inline]
    pub fn is_low_stock(&self, threshold: i64) -> bool {
        self.quantity <= threshold
    }

    /// Case-insensitive substring match across the searchable fields
    /// (name, category, supplier, barcode).
    pub fn matches_query(&self, query: &str) -> bool {
        let q = query.to_lowercase();
        self.name.to_lowercase().contains(&q)
            || self.category.to_lowercase().contains(&q)
            || self.supplier.to_lowercase().contains(&q)
            || self.barcode.to_lowercase().contains(&q)
    }
}

// =============================================================================
// Order Line
// =============================================================================

/// A line item in a finalized order.
///
/// Frozen snapshot: `name` and `unit_price_cents` are copied from the
/// product at add-to-cart time and never change afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: u64,
    /// Product name at time of sale (frozen).
    pub name: String,
    /// Quantity sold.
    pub quantity: i64,
    /// Unit price in paise at time of sale (frozen).
    pub unit_price_cents: i64,
    /// Per-line discount in basis points.
    pub discount_bps: u32,
    /// Discount amount taken off this line, in paise.
    pub discount_cents: i64,
    /// Line total after discount (unit_price × qty − discount).
    pub line_total_cents: i64,
}

impl OrderLine {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }

    /// Returns the discount amount as Money.
    #[inline]
    pub fn discount_amount(&self) -> Money {
        Money::from_cents(self.discount_cents)
    }

    /// Returns the per-line discount rate.
    #[inline]
    pub fn discount(&self) -> Percent {
        Percent::from_bps(self.discount_bps)
    }
}

// =============================================================================
// Order Record
// =============================================================================

/// A finalized order in the append-only ledger.
///
/// Immutable once appended: the ledger exposes no update or delete.
/// Corrections require a new, separately recorded adjustment order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Strictly increasing identity, assigned only at finalization.
    pub order_id: u64,
    /// Customer label, `"Name"` or `"Name (City)"`.
    pub customer: String,
    /// Immutable snapshot of the cart lines at finalize time.
    pub items: Vec<OrderLine>,
    /// Order total in paise, after the order-level discount.
    pub total_cents: i64,
    /// Order-level discount in basis points.
    pub discount_bps: u32,
    /// When the order was finalized.
    pub created_at: DateTime<Utc>,
    /// Normalized payment as returned by the payment resolver.
    pub payment: crate::payment::PaymentRecord,
}

impl OrderRecord {
    /// Returns the order total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Returns the order-level discount rate.
    #[inline]
    pub fn discount(&self) -> Percent {
        Percent::from_bps(self.discount_bps)
    }

    /// Sum of line totals, before the order-level discount.
    ///
    /// Invariant: `total() == subtotal().less_percent(discount())`.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(OrderLine::line_total).sum()
    }

    /// Total units across all lines.
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|l| l.quantity).sum()
    }

    /// Customer base name: the label minus any parenthetical city suffix.
    /// `"Asha (Pune)"` → `"Asha"`. Loyalty accrual is keyed by this.
    pub fn customer_base_name(&self) -> &str {
        match self.customer.split_once(" (") {
            Some((base, _)) => base,
            None => &self.customer,
        }
    }

    /// Loyalty points this order accrues: 1 point per ₹100, floored.
    pub fn loyalty_points(&self) -> u64 {
        (self.total_cents.max(0) / LOYALTY_UNIT_CENTS) as u64
    }
}

// =============================================================================
// Customer Loyalty Record
// =============================================================================

/// Per-customer loyalty balance. Points only ever increase.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerLoyaltyRecord {
    pub points: u64,
}

// =============================================================================
// Unit Tests
// =============================================================================
