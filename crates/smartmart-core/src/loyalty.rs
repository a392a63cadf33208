//! # Customer Loyalty Ledger
//!
//! Per-customer point balances: 1 point per ₹100 of a finalized order's
//! total, floored. Points only ever increase through accrual; this core
//! exposes no decrement.

use std::collections::BTreeMap;

use crate::money::Money;
use crate::types::CustomerLoyaltyRecord;
use crate::LOYALTY_UNIT_CENTS;

/// Owns the customer name → points mapping.
#[derive(Debug, Clone, Default)]
pub struct CustomerLoyaltyLedger {
    customers: BTreeMap<String, CustomerLoyaltyRecord>,
}

impl CustomerLoyaltyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the ledger from a persisted mapping.
    pub fn from_parts(customers: BTreeMap<String, CustomerLoyaltyRecord>) -> Self {
        CustomerLoyaltyLedger { customers }
    }

    /// Points an order total is worth: `floor(total / ₹100)`.
    pub fn points_for(total: Money) -> u64 {
        (total.cents().max(0) / LOYALTY_UNIT_CENTS) as u64
    }

    /// Accrues points for a customer, creating the record if absent.
    /// Returns the number of points awarded by this call.
    pub fn accrue(&mut self, customer_name: &str, total: Money) -> u64 {
        let points = Self::points_for(total);
        let record = self.customers.entry(customer_name.to_string()).or_default();
        record.points += points;
        points
    }

    /// Current balance; 0 for unknown customers.
    pub fn balance(&self, customer_name: &str) -> u64 {
        self.customers
            .get(customer_name)
            .map_or(0, |record| record.points)
    }

    /// The full mapping, for persistence and listings.
    pub fn records(&self) -> &BTreeMap<String, CustomerLoyaltyRecord> {
        &self.customers
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }
}
