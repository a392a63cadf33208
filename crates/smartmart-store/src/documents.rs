//! # Collection Documents
//!
//! The serde shapes written to disk, one JSON document per collection.
//! Each document pairs its records with the allocator that mints their
//! ids, so the two are always persisted and restored together.
//!
//! Allocator fields are optional on read: a hand-edited or partially
//! written file falls back to the defensive `max(existing) + 1`
//! recomputation inside the core `from_parts` constructors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use smartmart_core::types::{CustomerLoyaltyRecord, OrderRecord, Product};
use smartmart_core::{CustomerLoyaltyLedger, InventoryStore, OrderLedger};

/// `inventory.json`: products plus the product id allocator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryDocument {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub next_product_id: Option<u64>,
}

impl InventoryDocument {
    pub fn snapshot(store: &InventoryStore) -> Self {
        InventoryDocument {
            products: store.products().to_vec(),
            next_product_id: Some(store.next_product_id()),
        }
    }

    pub fn into_store(self) -> InventoryStore {
        InventoryStore::from_parts(self.products, self.next_product_id)
    }
}

/// `orders.json`: orders plus the order id allocator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrdersDocument {
    #[serde(default)]
    pub orders: Vec<OrderRecord>,
    #[serde(default)]
    pub next_order_id: Option<u64>,
}

impl OrdersDocument {
    pub fn snapshot(ledger: &OrderLedger) -> Self {
        OrdersDocument {
            orders: ledger.orders().to_vec(),
            next_order_id: Some(ledger.next_order_id()),
        }
    }

    pub fn into_ledger(self) -> OrderLedger {
        OrderLedger::from_parts(self.orders, self.next_order_id)
    }
}

/// `customers.json`: customer base name → loyalty record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomersDocument {
    #[serde(default)]
    pub customers: BTreeMap<String, CustomerLoyaltyRecord>,
}

impl CustomersDocument {
    pub fn snapshot(ledger: &CustomerLoyaltyLedger) -> Self {
        CustomersDocument {
            customers: ledger.records().clone(),
        }
    }

    pub fn into_ledger(self) -> CustomerLoyaltyLedger {
        CustomerLoyaltyLedger::from_parts(self.customers)
    }
}

/// `data_backup.json`: full-state mirror of every collection and both
/// allocators, written before each commit replaces the live files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackupDocument {
    pub inventory: InventoryDocument,
    pub orders: OrdersDocument,
    pub customers: CustomersDocument,
}
