//! # Order Ledger
//!
//! The append-only sequence of finalized orders, and the sole writer of
//! `OrderRecord`s.
//!
//! ## Append-Only Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  append(draft) ──► assigns next_order_id (strictly increasing,          │
//! │                    starts at 1000, never reused, never rewound)         │
//! │                                                                         │
//! │  No update. No delete. Corrections are new adjustment orders.           │
//! │                                                                         │
//! │  Reports (total sales, top selling, top customers, daily totals) are    │
//! │  pure read-side folds over the record sequence.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

use crate::money::Money;
use crate::payment::PaymentRecord;
use crate::types::{OrderLine, OrderRecord};
use crate::FIRST_ORDER_ID;

// =============================================================================
// Order Draft
// =============================================================================

/// Everything an order needs except what the ledger itself assigns
/// (the id and the timestamp).
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub customer: String,
    pub items: Vec<OrderLine>,
    pub total_cents: i64,
    pub discount_bps: u32,
    pub payment: PaymentRecord,
}

// =============================================================================
// Order Ledger
// =============================================================================

/// Append-only order ledger owning the `next_order_id` allocator.
#[derive(Debug, Clone)]
pub struct OrderLedger {
    orders: Vec<OrderRecord>,
    next_order_id: u64,
}

impl OrderLedger {
    /// Creates an empty ledger. Order ids start at 1000.
    pub fn new() -> Self {
        OrderLedger {
            orders: Vec::new(),
            next_order_id: FIRST_ORDER_ID,
        }
    }

    /// Rebuilds a ledger from persisted parts.
    ///
    /// Like the inventory allocator, `next_order_id` is recomputed
    /// defensively as `max(existing, 999) + 1` when the stored value is
    /// missing or has already been reached; a stored value ahead of the
    /// data is kept, so the sequence never rewinds across restarts.
    pub fn from_parts(orders: Vec<OrderRecord>, next_order_id: Option<u64>) -> Self {
        let computed = orders
            .iter()
            .map(|o| o.order_id)
            .max()
            .map_or(FIRST_ORDER_ID, |m| m + 1);
        let next = match next_order_id {
            Some(stored) if stored >= computed => stored,
            _ => computed,
        };
        OrderLedger {
            orders,
            next_order_id: next,
        }
    }

    /// Mints and appends an order record, returning a reference to it.
    pub fn append(&mut self, draft: OrderDraft) -> &OrderRecord {
        self.append_at(draft, Utc::now())
    }

    /// [`append`](Self::append) with an explicit timestamp.
    pub fn append_at(&mut self, draft: OrderDraft, created_at: DateTime<Utc>) -> &OrderRecord {
        let order_id = self.next_order_id;
        self.next_order_id += 1;

        self.orders.push(OrderRecord {
            order_id,
            customer: draft.customer,
            items: draft.items,
            total_cents: draft.total_cents,
            discount_bps: draft.discount_bps,
            created_at,
            payment: draft.payment,
        });
        self.orders.last().expect("order was just appended")
    }

    /// Looks an order up by id.
    pub fn get(&self, order_id: u64) -> Option<&OrderRecord> {
        self.orders.iter().find(|o| o.order_id == order_id)
    }

    /// All orders in append (= chronological) order.
    pub fn orders(&self) -> &[OrderRecord] {
        &self.orders
    }

    /// Current allocator value, persisted alongside the collection.
    pub fn next_order_id(&self) -> u64 {
        self.next_order_id
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    // -------------------------------------------------------------------------
    // Read-side report folds
    // -------------------------------------------------------------------------

    /// Sum of all order totals.
    pub fn total_sales(&self) -> Money {
        self.orders.iter().map(OrderRecord::total).sum()
    }

    /// Total units sold across all orders.
    pub fn total_items_sold(&self) -> i64 {
        self.orders.iter().map(OrderRecord::item_count).sum()
    }

    /// Quantity sold per product name, highest first.
    pub fn top_selling(&self, limit: usize) -> Vec<(String, i64)> {
        let mut counts: BTreeMap<&str, i64> = BTreeMap::new();
        for order in &self.orders {
            for line in &order.items {
                *counts.entry(line.name.as_str()).or_default() += line.quantity;
            }
        }
        let mut ranked: Vec<(String, i64)> = counts
            .into_iter()
            .map(|(name, qty)| (name.to_string(), qty))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(limit);
        ranked
    }

    /// Spend per customer base name, highest first.
    pub fn top_customers(&self, limit: usize) -> Vec<(String, Money)> {
        let mut spend: BTreeMap<&str, Money> = BTreeMap::new();
        for order in &self.orders {
            let entry = spend.entry(order.customer_base_name()).or_default();
            *entry += order.total();
        }
        let mut ranked: Vec<(String, Money)> = spend
            .into_iter()
            .map(|(name, total)| (name.to_string(), total))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(limit);
        ranked
    }

    /// Sales total per calendar day (UTC), in date order.
    pub fn daily_totals(&self) -> BTreeMap<NaiveDate, Money> {
        let mut totals: BTreeMap<NaiveDate, Money> = BTreeMap::new();
        for order in &self.orders {
            *totals.entry(order.created_at.date_naive()).or_default() += order.total();
        }
        totals
    }
}

impl Default for OrderLedger {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
