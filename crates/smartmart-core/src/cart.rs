//! # Cart Session
//!
//! One in-progress order: line items, order-level discount, and the
//! finalize step that turns the cart into a ledger record.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Cart Session Lifecycle                              │
//! │                                                                         │
//! │              add_item                     finalize                      │
//! │   Empty ───────────────► Building ──────────────────► Finalized        │
//! │     ▲                       │                          (terminal)       │
//! │     │                       │ clear / remove last line                  │
//! │     └───────────────────────┘  (releases reserved stock)               │
//! │                                                                         │
//! │  Every add_item RESERVES stock (check-and-decrement); every            │
//! │  remove/clear releases it. Finalize keeps the reservations: the        │
//! │  stock is sold. A finalized session is not reusable; create a new      │
//! │  CartSession for the next order.                                       │
//! │                                                                         │
//! │  Payment cancellation never reaches finalize, so the cart stays in     │
//! │  Building with its reservations intact.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Line Immutability
//! Lines are never edited in place: removing a line and re-adding it is
//! the only way to change quantity or discount. This keeps the snapshot
//! arithmetic (`line_total + discount_amount == unit_price × qty`)
//! trivially stable.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::inventory::InventoryStore;
use crate::ledger::{OrderDraft, OrderLedger};
use crate::loyalty::CustomerLoyaltyLedger;
use crate::money::{Money, Percent};
use crate::payment::{self, PaymentDeclaration};
use crate::types::{OrderLine, OrderRecord};
use crate::validation::{validate_cart_quantity, validate_cart_size, validate_customer_name};

// =============================================================================
// Customer Label
// =============================================================================

/// The customer a cart is being built for.
///
/// Renders as `"Name"` or `"Name (City)"` on orders and invoices; loyalty
/// accrual always keys on the base name alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerLabel {
    name: String,
    city: Option<String>,
}

impl CustomerLabel {
    /// Creates a validated label. The name must be non-empty; a blank
    /// city is treated as absent.
    pub fn new(name: &str, city: Option<&str>) -> CoreResult<Self> {
        validate_customer_name(name)?;
        let city = city.map(str::trim).filter(|c| !c.is_empty());
        Ok(CustomerLabel {
            name: name.trim().to_string(),
            city: city.map(str::to_string),
        })
    }

    /// The base name, used as the loyalty key.
    pub fn base_name(&self) -> &str {
        &self.name
    }

    /// The display label: `"Asha"` or `"Asha (Pune)"`.
    pub fn label(&self) -> String {
        match &self.city {
            Some(city) => format!("{} ({})", self.name, city),
            None => self.name.clone(),
        }
    }
}

// =============================================================================
// Cart Line Item
// =============================================================================

/// One product/quantity/discount entry in the cart.
///
/// A frozen snapshot from creation: the unit price is captured at
/// add-time and survives later product edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLineItem {
    pub product_id: u64,
    /// Product name at add time (frozen).
    pub name: String,
    /// Quantity reserved against the inventory store.
    pub quantity: i64,
    /// Unit price in paise at add time (frozen).
    pub unit_price_cents: i64,
    /// Per-line discount in basis points.
    pub discount_bps: u32,
    /// Discount amount in paise (derived once, at add time).
    pub discount_cents: i64,
    /// Line total in paise: `unit_price × qty − discount`.
    pub line_total_cents: i64,
}

impl CartLineItem {
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

    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Converts the cart line into an order-line snapshot.
    fn to_order_line(&self) -> OrderLine {
        OrderLine {
            product_id: self.product_id,
            name: self.name.clone(),
            quantity: self.quantity,
            unit_price_cents: self.unit_price_cents,
            discount_bps: self.discount_bps,
            discount_cents: self.discount_cents,
            line_total_cents: self.line_total_cents,
        }
    }
}

// =============================================================================
// Cart Status
// =============================================================================

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartStatus {
    /// No lines yet (or cleared back to this state).
    Empty,
    /// At least one line; stock is reserved.
    Building,
    /// Converted to an OrderRecord; terminal.
    Finalized,
}

// =============================================================================
// Cart Session
// =============================================================================

/// One in-progress order bound to an inventory store.
///
/// The session does not own the store; every mutating operation takes
/// `&mut InventoryStore` so reservations and the product collection can
/// never drift apart.
#[derive(Debug, Clone)]
pub struct CartSession {
    customer: Option<CustomerLabel>,
    items: Vec<CartLineItem>,
    order_discount: Percent,
    status: CartStatus,
}

impl CartSession {
    /// Creates a new empty session.
    pub fn new() -> Self {
        CartSession {
            customer: None,
            items: Vec::new(),
            order_discount: Percent::zero(),
            status: CartStatus::Empty,
        }
    }

    fn ensure_open(&self) -> CoreResult<()> {
        if self.status == CartStatus::Finalized {
            return Err(CoreError::CartFinalized);
        }
        Ok(())
    }

    /// Sets the customer the order is for.
    pub fn set_customer(&mut self, customer: CustomerLabel) -> CoreResult<()> {
        self.ensure_open()?;
        self.customer = Some(customer);
        Ok(())
    }

    pub fn customer(&self) -> Option<&CustomerLabel> {
        self.customer.as_ref()
    }

    pub fn status(&self) -> CartStatus {
        self.status
    }

    /// Lines in insertion order (significant for display and invoices).
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    pub fn order_discount(&self) -> Percent {
        self.order_discount
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds a line, reserving stock first.
    ///
    /// The reservation is the overselling gate: if the store cannot cover
    /// `quantity`, the add fails with `InsufficientStock` and the cart is
    /// left unchanged. The discount is clamped into [0, 100] by the
    /// `Percent` type before any math happens.
    pub fn add_item(
        &mut self,
        inventory: &mut InventoryStore,
        product_id: u64,
        quantity: i64,
        discount: Percent,
    ) -> CoreResult<&CartLineItem> {
        self.ensure_open()?;
        validate_cart_quantity(quantity)?;
        validate_cart_size(self.items.len())?;

        let (name, unit_price) = {
            let product = inventory.get(product_id)?;
            (product.name.clone(), product.price())
        };
        inventory.reserve(product_id, quantity)?;

        let line_subtotal = unit_price.multiply_quantity(quantity);
        let discount_amount = line_subtotal.percent_part(discount);
        let line_total = line_subtotal - discount_amount;

        self.items.push(CartLineItem {
            product_id,
            name,
            quantity,
            unit_price_cents: unit_price.cents(),
            discount_bps: discount.bps(),
            discount_cents: discount_amount.cents(),
            line_total_cents: line_total.cents(),
        });
        self.status = CartStatus::Building;
        Ok(self.items.last().expect("line was just pushed"))
    }

    /// Removes the line at `index`, releasing its reserved stock.
    ///
    /// Returns the removed line. A session whose last line is removed
    /// drops back to `Empty`.
    pub fn remove_item(
        &mut self,
        inventory: &mut InventoryStore,
        index: usize,
    ) -> CoreResult<CartLineItem> {
        self.ensure_open()?;
        if index >= self.items.len() {
            return Err(CoreError::LineNotFound { index });
        }

        let line = &self.items[index];
        // The product may have been deleted while in the cart; releasing
        // into a missing product is a no-op rather than a failure.
        match inventory.release(line.product_id, line.quantity) {
            Ok(()) | Err(CoreError::ProductNotFound(_)) => {}
            Err(err) => return Err(err),
        }

        let line = self.items.remove(index);
        if self.items.is_empty() {
            self.status = CartStatus::Empty;
        }
        Ok(line)
    }

    /// Releases every reservation, empties the lines, and resets the
    /// order-level discount. The session returns to `Empty` and can be
    /// built up again.
    pub fn clear(&mut self, inventory: &mut InventoryStore) -> CoreResult<()> {
        self.ensure_open()?;
        for line in &self.items {
            match inventory.release(line.product_id, line.quantity) {
                Ok(()) | Err(CoreError::ProductNotFound(_)) => {}
                Err(err) => return Err(err),
            }
        }
        self.items.clear();
        self.order_discount = Percent::zero();
        self.status = CartStatus::Empty;
        Ok(())
    }

    /// Sets the order-level discount. Does not touch stock.
    pub fn apply_order_discount(&mut self, discount: Percent) -> CoreResult<()> {
        self.ensure_open()?;
        self.order_discount = discount;
        Ok(())
    }

    /// Sum of line totals (after per-line discounts).
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    /// Order total: subtotal less the order-level discount, at paise
    /// precision.
    pub fn total(&self) -> Money {
        self.subtotal().less_percent(self.order_discount)
    }

    /// Finalizes the cart into an order record.
    ///
    /// ## Sequence
    /// 1. Preconditions: at least one line, customer set
    /// 2. Payment resolution (may fail with `InvalidSplit`; nothing mutated)
    /// 3. Ledger mints the next order id and appends the snapshot
    /// 4. Loyalty accrues `floor(total / ₹100)` keyed by the base name
    /// 5. Session transitions to `Finalized` (terminal)
    ///
    /// Stock stays decremented: the reservation becomes the sale.
    pub fn finalize(
        &mut self,
        declaration: PaymentDeclaration,
        ledger: &mut OrderLedger,
        loyalty: &mut CustomerLoyaltyLedger,
    ) -> CoreResult<OrderRecord> {
        self.ensure_open()?;
        if self.items.is_empty() {
            return Err(CoreError::EmptyCart);
        }
        let customer = self.customer.clone().ok_or(CoreError::MissingCustomer)?;

        let total = self.total();
        let payment = payment::resolve(total, declaration)?;

        let order = ledger
            .append(OrderDraft {
                customer: customer.label(),
                items: self.items.iter().map(CartLineItem::to_order_line).collect(),
                total_cents: total.cents(),
                discount_bps: self.order_discount.bps(),
                payment,
            })
            .clone();

        loyalty.accrue(customer.base_name(), total);
        self.status = CartStatus::Finalized;
        Ok(order)
    }
}

impl Default for CartSession {
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

    fn rice_store() -> (InventoryStore, u64) {
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

    fn cash() -> PaymentDeclaration {
        PaymentDeclaration::Cash {
            reference: String::new(),
        }
    }

    #[test]
    fn test_add_item_reserves_and_computes_line() {
        let (mut store, pid) = rice_store();
        let mut cart = CartSession::new();

        let line = cart
            .add_item(&mut store, pid, 2, Percent::from_percent(10.0))
            .unwrap();
        // line_total = 2 * 1200 * 0.9 = 2160
        assert_eq!(line.line_total_cents, 216000);
        assert_eq!(line.discount_cents, 24000);
        assert_eq!(store.quantity(pid), Some(48));
        assert_eq!(cart.status(), CartStatus::Building);
        assert_eq!(cart.subtotal().cents(), 216000);
    }

    #[test]
    fn test_add_item_insufficient_stock_leaves_cart_unchanged() {
        let (mut store, pid) = rice_store();
        let mut cart = CartSession::new();

        let err = cart
            .add_item(&mut store, pid, 51, Percent::zero())
            .unwrap_err();
        assert!(matches!(err, CoreError::InsufficientStock { .. }));
        assert!(cart.is_empty());
        assert_eq!(cart.status(), CartStatus::Empty);
        assert_eq!(store.quantity(pid), Some(50));
    }

    #[test]
    fn test_remove_item_restores_stock_exactly() {
        let (mut store, pid) = rice_store();
        let mut cart = CartSession::new();

        cart.add_item(&mut store, pid, 2, Percent::zero()).unwrap();
        cart.add_item(&mut store, pid, 3, Percent::zero()).unwrap();
        assert_eq!(store.quantity(pid), Some(45));

        let removed = cart.remove_item(&mut store, 0).unwrap();
        assert_eq!(removed.quantity, 2);
        assert_eq!(store.quantity(pid), Some(47));
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.subtotal().cents(), 360000);

        let err = cart.remove_item(&mut store, 5).unwrap_err();
        assert!(matches!(err, CoreError::LineNotFound { index: 5 }));
    }

    #[test]
    fn test_removing_last_line_returns_to_empty() {
        let (mut store, pid) = rice_store();
        let mut cart = CartSession::new();
        cart.add_item(&mut store, pid, 1, Percent::zero()).unwrap();
        cart.remove_item(&mut store, 0).unwrap();
        assert_eq!(cart.status(), CartStatus::Empty);
    }

    #[test]
    fn test_clear_releases_everything_and_resets_discount() {
        let (mut store, pid) = rice_store();
        let mut cart = CartSession::new();
        cart.add_item(&mut store, pid, 2, Percent::zero()).unwrap();
        cart.add_item(&mut store, pid, 5, Percent::zero()).unwrap();
        cart.apply_order_discount(Percent::from_percent(15.0)).unwrap();

        cart.clear(&mut store).unwrap();
        assert!(cart.is_empty());
        assert!(cart.order_discount().is_zero());
        assert_eq!(cart.status(), CartStatus::Empty);
        assert_eq!(store.quantity(pid), Some(50));
    }

    #[test]
    fn test_total_tracks_adds_removes_and_discount_changes() {
        let (mut store, pid) = rice_store();
        let mut cart = CartSession::new();

        cart.add_item(&mut store, pid, 2, Percent::from_percent(10.0))
            .unwrap();
        cart.add_item(&mut store, pid, 1, Percent::zero()).unwrap();
        // subtotal = 2160 + 1200
        assert_eq!(cart.subtotal().cents(), 336000);

        cart.apply_order_discount(Percent::from_percent(5.0)).unwrap();
        let expected = cart.subtotal().less_percent(Percent::from_percent(5.0));
        assert_eq!(cart.total(), expected);

        cart.remove_item(&mut store, 1).unwrap();
        assert_eq!(cart.subtotal().cents(), 216000);
        assert_eq!(cart.total().cents(), 205200);
    }

    #[test]
    fn test_finalize_requires_lines_and_customer() {
        let (mut store, pid) = rice_store();
        let mut ledger = OrderLedger::new();
        let mut loyalty = CustomerLoyaltyLedger::new();
        let mut cart = CartSession::new();

        let err = cart.finalize(cash(), &mut ledger, &mut loyalty).unwrap_err();
        assert!(matches!(err, CoreError::EmptyCart));

        cart.add_item(&mut store, pid, 1, Percent::zero()).unwrap();
        let err = cart.finalize(cash(), &mut ledger, &mut loyalty).unwrap_err();
        assert!(matches!(err, CoreError::MissingCustomer));

        // nothing was minted or accrued by the failed attempts
        assert!(ledger.is_empty());
        assert!(loyalty.is_empty());
        assert_eq!(cart.status(), CartStatus::Building);
    }

    #[test]
    fn test_finalize_example_scenario() {
        // Rice qty 50 @ ₹1200; 2 units at 10% line discount,
        // 5% order discount, Cash, customer "Asha".
        let (mut store, pid) = rice_store();
        let mut ledger = OrderLedger::new();
        let mut loyalty = CustomerLoyaltyLedger::new();
        let mut cart = CartSession::new();

        cart.set_customer(CustomerLabel::new("Asha", None).unwrap())
            .unwrap();
        cart.add_item(&mut store, pid, 2, Percent::from_percent(10.0))
            .unwrap();
        cart.apply_order_discount(Percent::from_percent(5.0)).unwrap();

        let order = cart.finalize(cash(), &mut ledger, &mut loyalty).unwrap();

        assert_eq!(order.order_id, 1000);
        assert_eq!(order.total_cents, 205200); // ₹2052.00
        assert_eq!(order.customer, "Asha");
        assert_eq!(order.subtotal().cents(), 216000);
        assert_eq!(loyalty.balance("Asha"), 20);
        assert_eq!(store.quantity(pid), Some(48));
        assert_eq!(cart.status(), CartStatus::Finalized);

        // the session is terminal now
        let err = cart
            .add_item(&mut store, pid, 1, Percent::zero())
            .unwrap_err();
        assert!(matches!(err, CoreError::CartFinalized));
        let err = cart.clear(&mut store).unwrap_err();
        assert!(matches!(err, CoreError::CartFinalized));
    }

    #[test]
    fn test_finalize_accrues_by_base_name() {
        let (mut store, pid) = rice_store();
        let mut ledger = OrderLedger::new();
        let mut loyalty = CustomerLoyaltyLedger::new();
        let mut cart = CartSession::new();

        cart.set_customer(CustomerLabel::new("Asha", Some("Pune")).unwrap())
            .unwrap();
        cart.add_item(&mut store, pid, 1, Percent::zero()).unwrap();
        let order = cart.finalize(cash(), &mut ledger, &mut loyalty).unwrap();

        assert_eq!(order.customer, "Asha (Pune)");
        assert_eq!(loyalty.balance("Asha"), 12); // floor(1200/100)
        assert_eq!(loyalty.balance("Asha (Pune)"), 0);
    }

    #[test]
    fn test_failed_payment_aborts_finalize_without_mutation() {
        let (mut store, pid) = rice_store();
        let mut ledger = OrderLedger::new();
        let mut loyalty = CustomerLoyaltyLedger::new();
        let mut cart = CartSession::new();

        cart.set_customer(CustomerLabel::new("Asha", None).unwrap())
            .unwrap();
        cart.add_item(&mut store, pid, 2, Percent::zero()).unwrap();

        let err = cart
            .finalize(
                PaymentDeclaration::Split {
                    first_method: "Cash".to_string(),
                    first_amount: Money::from_rupees(99999),
                },
                &mut ledger,
                &mut loyalty,
            )
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidSplit { .. }));

        // ledger and loyalty untouched; reservations still held
        assert!(ledger.is_empty());
        assert!(loyalty.is_empty());
        assert_eq!(cart.status(), CartStatus::Building);
        assert_eq!(store.quantity(pid), Some(48));

        // corrected retry succeeds on the same session
        let order = cart.finalize(cash(), &mut ledger, &mut loyalty).unwrap();
        assert_eq!(order.order_id, 1000);
    }

    #[test]
    fn test_line_snapshot_survives_product_edits() {
        let (mut store, pid) = rice_store();
        let mut cart = CartSession::new();
        cart.add_item(&mut store, pid, 1, Percent::zero()).unwrap();

        store
            .update(
                pid,
                crate::inventory::ProductPatch {
                    price_cents: Some(999900),
                    name: Some("Renamed".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        let line = &cart.items()[0];
        assert_eq!(line.unit_price_cents, 120000);
        assert_eq!(line.name, "Basmati Rice (5kg)");
    }

    #[test]
    fn test_remove_after_product_deleted_is_tolerated() {
        let (mut store, pid) = rice_store();
        let mut cart = CartSession::new();
        cart.add_item(&mut store, pid, 2, Percent::zero()).unwrap();
        store.delete(pid).unwrap();

        // The stock can no longer be returned, but the cart must not wedge.
        cart.remove_item(&mut store, 0).unwrap();
        assert!(cart.is_empty());
    }
}
