//! # Inventory Store
//!
//! Owns the set of products: identifier allocation, CRUD, barcode lookup,
//! stock reservation, and the low-stock query.
//!
//! ## Reservation Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add_item(qty 2) ──► reserve(pid, 2) ──► quantity 50 → 48              │
//! │                                                                         │
//! │  remove_item     ──► release(pid, 2) ──► quantity 48 → 50              │
//! │                                                                         │
//! │  reserve() is check-and-decrement in one step: it fails whole with     │
//! │  InsufficientStock and mutates nothing when qty > on hand. The store   │
//! │  never goes negative. release() trusts its caller to release no more   │
//! │  than was reserved (the cart is the only caller and tracks its own     │
//! │  reservations).                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Product;
use crate::validation::{validate_price_cents, validate_product_name, validate_stock_quantity};
use crate::FIRST_PRODUCT_ID;

/// Category used when none is supplied at creation.
pub const DEFAULT_CATEGORY: &str = "General";

// =============================================================================
// Product Patch
// =============================================================================

/// Partial update for [`InventoryStore::update`]. `None` fields keep
/// their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<i64>,
    pub price_cents: Option<i64>,
    pub supplier: Option<String>,
    pub barcode: Option<String>,
}

// =============================================================================
// Inventory Store
// =============================================================================

/// The inventory store: exclusive owner of all `Product`s and of the
/// `next_product_id` allocator.
#[derive(Debug, Clone)]
pub struct InventoryStore {
    products: Vec<Product>,
    next_product_id: u64,
}

impl InventoryStore {
    /// Creates an empty store. Product ids start at 1.
    pub fn new() -> Self {
        InventoryStore {
            products: Vec::new(),
            next_product_id: FIRST_PRODUCT_ID,
        }
    }

    /// Rebuilds a store from persisted parts.
    ///
    /// The allocator is recomputed defensively: a missing or stale stored
    /// value (one that an existing id has already reached) is replaced by
    /// `max(existing id) + 1`. The allocator never rewinds, even after
    /// deletions.
    pub fn from_parts(products: Vec<Product>, next_product_id: Option<u64>) -> Self {
        let computed = products
            .iter()
            .map(|p| p.product_id)
            .max()
            .map_or(FIRST_PRODUCT_ID, |m| m + 1);
        let next = match next_product_id {
            Some(stored) if stored >= computed => stored,
            _ => computed,
        };
        InventoryStore {
            products,
            next_product_id: next,
        }
    }

    /// Adds a new product and returns its allocated id.
    ///
    /// Blank category falls back to "General"; a missing or empty barcode
    /// falls back to the decimal string of the new id.
    pub fn add(
        &mut self,
        name: &str,
        category: &str,
        quantity: i64,
        price: Money,
        supplier: &str,
        barcode: Option<&str>,
    ) -> CoreResult<u64> {
        validate_product_name(name)?;
        validate_stock_quantity(quantity)?;
        validate_price_cents(price.cents())?;

        let product_id = self.next_product_id;
        self.next_product_id += 1;

        let category = category.trim();
        let barcode = barcode.map(str::trim).unwrap_or("");
        self.products.push(Product {
            product_id,
            name: name.trim().to_string(),
            category: if category.is_empty() {
                DEFAULT_CATEGORY.to_string()
            } else {
                category.to_string()
            },
            quantity,
            price_cents: price.cents(),
            supplier: supplier.trim().to_string(),
            barcode: if barcode.is_empty() {
                product_id.to_string()
            } else {
                barcode.to_string()
            },
        });

        Ok(product_id)
    }

    /// Applies a partial update to a product.
    ///
    /// All supplied fields are validated before anything is written, so a
    /// failed update leaves the product untouched.
    pub fn update(&mut self, product_id: u64, patch: ProductPatch) -> CoreResult<()> {
        if let Some(name) = &patch.name {
            validate_product_name(name)?;
        }
        if let Some(quantity) = patch.quantity {
            validate_stock_quantity(quantity)?;
        }
        if let Some(price_cents) = patch.price_cents {
            validate_price_cents(price_cents)?;
        }

        let product = self.get_mut(product_id)?;
        if let Some(name) = patch.name {
            product.name = name.trim().to_string();
        }
        if let Some(category) = patch.category {
            product.category = category;
        }
        if let Some(quantity) = patch.quantity {
            product.quantity = quantity;
        }
        if let Some(price_cents) = patch.price_cents {
            product.price_cents = price_cents;
        }
        if let Some(supplier) = patch.supplier {
            product.supplier = supplier;
        }
        if let Some(barcode) = patch.barcode {
            // same fallback as creation: a blank barcode means "use the id"
            let barcode = barcode.trim().to_string();
            product.barcode = if barcode.is_empty() {
                product.product_id.to_string()
            } else {
                barcode
            };
        }
        Ok(())
    }

    /// Removes a product and returns it.
    ///
    /// Past orders are unaffected: order lines are snapshots, independent
    /// of product lifetime. The id allocator does not rewind.
    pub fn delete(&mut self, product_id: u64) -> CoreResult<Product> {
        let pos = self
            .products
            .iter()
            .position(|p| p.product_id == product_id)
            .ok_or(CoreError::ProductNotFound(product_id))?;
        Ok(self.products.remove(pos))
    }

    /// Looks a product up by id.
    pub fn find_by_id(&self, product_id: u64) -> Option<&Product> {
        self.products.iter().find(|p| p.product_id == product_id)
    }

    /// Looks a product up by barcode.
    ///
    /// Matches either the stored barcode or, as a fallback, the decimal
    /// string form of the product id. The fallback is a deliberate
    /// convenience for un-barcoded stock: scanning (or typing) "7" finds
    /// product 7 even when its barcode field was never set.
    pub fn find_by_barcode(&self, code: &str) -> Option<&Product> {
        let code = code.trim();
        self.products
            .iter()
            .find(|p| p.barcode == code || p.product_id.to_string() == code)
    }

    /// Like [`find_by_id`](Self::find_by_id) but returns a typed error.
    pub fn get(&self, product_id: u64) -> CoreResult<&Product> {
        self.find_by_id(product_id)
            .ok_or(CoreError::ProductNotFound(product_id))
    }

    fn get_mut(&mut self, product_id: u64) -> CoreResult<&mut Product> {
        self.products
            .iter_mut()
            .find(|p| p.product_id == product_id)
            .ok_or(CoreError::ProductNotFound(product_id))
    }

    /// Reserves stock: check-and-decrement in a single step.
    ///
    /// Fails with `InsufficientStock` (no mutation) when fewer than `qty`
    /// units are on hand.
    pub fn reserve(&mut self, product_id: u64, qty: i64) -> CoreResult<()> {
        let product = self.get_mut(product_id)?;
        if product.quantity < qty {
            return Err(CoreError::InsufficientStock {
                name: product.name.clone(),
                available: product.quantity,
                requested: qty,
            });
        }
        product.quantity -= qty;
        Ok(())
    }

    /// Releases previously reserved stock back to the shelf.
    ///
    /// The store does not cap the release; callers must never release
    /// more than they reserved.
    pub fn release(&mut self, product_id: u64, qty: i64) -> CoreResult<()> {
        let product = self.get_mut(product_id)?;
        product.quantity += qty;
        Ok(())
    }

    /// Current stock on hand for a product.
    pub fn quantity(&self, product_id: u64) -> Option<i64> {
        self.find_by_id(product_id).map(|p| p.quantity)
    }

    /// All products at or below the threshold. Order unspecified;
    /// callers sort for display.
    pub fn low_stock(&self, threshold: i64) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.is_low_stock(threshold))
            .collect()
    }

    /// Case-insensitive search across name, category, supplier, barcode.
    pub fn search(&self, query: &str) -> Vec<&Product> {
        let query = query.trim();
        if query.is_empty() {
            return self.products.iter().collect();
        }
        self.products
            .iter()
            .filter(|p| p.matches_query(query))
            .collect()
    }

    /// All products in insertion order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Replaces the entire product set (CSV import semantics) and resets
    /// the allocator to `max(id) + 1`.
    pub fn replace_all(&mut self, products: Vec<Product>) {
        self.next_product_id = products
            .iter()
            .map(|p| p.product_id)
            .max()
            .map_or(FIRST_PRODUCT_ID, |m| m + 1);
        self.products = products;
    }

    /// Current allocator value, persisted alongside the collection.
    pub fn next_product_id(&self) -> u64 {
        self.next_product_id
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Default for InventoryStore {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_rice() -> (InventoryStore, u64) {
        let mut store = InventoryStore::new();
        let pid = store
            .add(
                "Basmati Rice (5kg)",
                "Grocery",
                50,
                Money::from_rupees(1200),
                "Sharma Supplies",
                None,
            )
            .unwrap();
        (store, pid)
    }

    #[test]
    fn test_add_allocates_sequential_ids() {
        let mut store = InventoryStore::new();
        let a = store
            .add("Tata Salt (1kg)", "Grocery", 200, Money::from_cents(2200), "Tata Salt", None)
            .unwrap();
        let b = store
            .add("Masala Tea (250g)", "Beverage", 30, Money::from_cents(25000), "Tata Tea", None)
            .unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, 2);
        assert_eq!(store.next_product_id(), 3);
    }

    #[test]
    fn test_add_validates_before_allocating() {
        let mut store = InventoryStore::new();
        assert!(store
            .add("", "Grocery", 1, Money::zero(), "", None)
            .is_err());
        assert!(store
            .add("Soap", "", -1, Money::zero(), "", None)
            .is_err());
        assert!(store
            .add("Soap", "", 1, Money::from_cents(-1), "", None)
            .is_err());
        // No id was consumed by the failed attempts
        assert_eq!(store.next_product_id(), FIRST_PRODUCT_ID);
    }

    #[test]
    fn test_category_defaults_to_general() {
        let mut store = InventoryStore::new();
        let pid = store
            .add("Soap", "  ", 10, Money::from_cents(2500), "Wipro", None)
            .unwrap();
        assert_eq!(store.find_by_id(pid).unwrap().category, DEFAULT_CATEGORY);
    }

    #[test]
    fn test_barcode_fallback_to_id() {
        let mut store = InventoryStore::from_parts(Vec::new(), Some(7));
        let pid = store
            .add("Honey (500g)", "Grocery", 40, Money::from_cents(29900), "Patanjali", Some(""))
            .unwrap();
        assert_eq!(pid, 7);
        assert_eq!(store.find_by_id(7).unwrap().barcode, "7");
        // findable through the dual lookup
        assert_eq!(store.find_by_barcode("7").unwrap().product_id, 7);
    }

    #[test]
    fn test_find_by_barcode_prefers_stored_code_but_matches_id() {
        let mut store = InventoryStore::new();
        let pid = store
            .add("Soap", "Care", 10, Money::from_cents(2500), "Wipro", Some("8901030"))
            .unwrap();
        assert_eq!(store.find_by_barcode("8901030").unwrap().product_id, pid);
        // decimal id string also matches, barcode field notwithstanding
        assert_eq!(store.find_by_barcode(&pid.to_string()).unwrap().product_id, pid);
        assert!(store.find_by_barcode("nope").is_none());
    }

    #[test]
    fn test_reserve_and_release_round_trip() {
        let (mut store, pid) = store_with_rice();
        store.reserve(pid, 2).unwrap();
        assert_eq!(store.quantity(pid), Some(48));
        store.release(pid, 2).unwrap();
        assert_eq!(store.quantity(pid), Some(50));
    }

    #[test]
    fn test_reserve_insufficient_leaves_store_unchanged() {
        let (mut store, pid) = store_with_rice();
        let err = store.reserve(pid, 51).unwrap_err();
        match err {
            CoreError::InsufficientStock {
                available,
                requested,
                ..
            } => {
                assert_eq!(available, 50);
                assert_eq!(requested, 51);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(store.quantity(pid), Some(50));
    }

    #[test]
    fn test_update_partial_and_not_found() {
        let (mut store, pid) = store_with_rice();
        store
            .update(
                pid,
                ProductPatch {
                    price_cents: Some(125000),
                    ..Default::default()
                },
            )
            .unwrap();
        let p = store.find_by_id(pid).unwrap();
        assert_eq!(p.price_cents, 125000);
        assert_eq!(p.name, "Basmati Rice (5kg)"); // untouched

        let err = store.update(999, ProductPatch::default()).unwrap_err();
        assert!(matches!(err, CoreError::ProductNotFound(999)));
    }

    #[test]
    fn test_update_invalid_field_mutates_nothing() {
        let (mut store, pid) = store_with_rice();
        let err = store
            .update(
                pid,
                ProductPatch {
                    name: Some("Renamed".to_string()),
                    quantity: Some(-5),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        let p = store.find_by_id(pid).unwrap();
        assert_eq!(p.name, "Basmati Rice (5kg)");
        assert_eq!(p.quantity, 50);
    }

    #[test]
    fn test_update_blank_barcode_falls_back_to_id() {
        let mut store = InventoryStore::new();
        let pid = store
            .add("Soap", "Care", 10, Money::from_cents(2500), "Wipro", Some("8901030"))
            .unwrap();

        store
            .update(
                pid,
                ProductPatch {
                    barcode: Some("  ".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(store.find_by_id(pid).unwrap().barcode, pid.to_string());
        assert_eq!(store.find_by_barcode(&pid.to_string()).unwrap().product_id, pid);

        store
            .update(
                pid,
                ProductPatch {
                    barcode: Some("8901031".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(store.find_by_id(pid).unwrap().barcode, "8901031");
    }

    #[test]
    fn test_delete_does_not_rewind_allocator() {
        let (mut store, pid) = store_with_rice();
        store.delete(pid).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.next_product_id(), pid + 1);
    }

    #[test]
    fn test_low_stock_threshold_inclusive() {
        let mut store = InventoryStore::new();
        store.add("A", "", 5, Money::zero(), "", None).unwrap();
        store.add("B", "", 6, Money::zero(), "", None).unwrap();
        store.add("C", "", 0, Money::zero(), "", None).unwrap();
        let low = store.low_stock(5);
        let names: Vec<&str> = low.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(low.len(), 2);
        assert!(names.contains(&"A"));
        assert!(names.contains(&"C"));
    }

    #[test]
    fn test_from_parts_recovers_stale_allocator() {
        let products = vec![
            Product {
                product_id: 9,
                name: "X".to_string(),
                category: "General".to_string(),
                quantity: 1,
                price_cents: 100,
                supplier: String::new(),
                barcode: "9".to_string(),
            },
        ];
        // missing allocator -> max+1
        let store = InventoryStore::from_parts(products.clone(), None);
        assert_eq!(store.next_product_id(), 10);
        // stale allocator (already reached) -> max+1
        let store = InventoryStore::from_parts(products.clone(), Some(3));
        assert_eq!(store.next_product_id(), 10);
        // valid allocator ahead of the data is kept (never rewound)
        let store = InventoryStore::from_parts(products, Some(42));
        assert_eq!(store.next_product_id(), 42);
    }

    #[test]
    fn test_replace_all_resets_allocator() {
        let (mut store, _) = store_with_rice();
        store.replace_all(vec![Product {
            product_id: 30,
            name: "Imported".to_string(),
            category: "General".to_string(),
            quantity: 2,
            price_cents: 500,
            supplier: String::new(),
            barcode: "30".to_string(),
        }]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.next_product_id(), 31);
    }
}
