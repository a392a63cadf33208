//! # smartmart-core: Pure Business Logic for SmartMart POS
//!
//! This crate is the **heart** of SmartMart POS. It contains all business
//! logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      SmartMart POS Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      apps/cli (Operator CLI)                    │   │
//! │  │    product ──► checkout ──► orders ──► report ──► data         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ smartmart-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ inventory │  │   cart    │  │  ledger   │  │  payment  │  │   │
//! │  │   │  Product  │  │  Session  │  │  Orders   │  │  resolve  │  │   │
//! │  │   │  reserve  │  │  finalize │  │  reports  │  │  splits   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   money   │  │  loyalty  │  │  invoice  │  │ validation│  │   │
//! │  │   │Money/Pct  │  │  points   │  │  render   │  │   rules   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO FILE SYSTEM • NO CLOCK* • PURE FUNCTIONS         │   │
//! │  │   (*timestamps enter through append_at; append() is the one    │   │
//! │  │    convenience that reads the clock)                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                smartmart-store (Persistence Layer)              │   │
//! │  │       JSON collections, CSV import/export, users, backups       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, OrderLine, OrderRecord, ...)
//! - [`money`] - Money and Percent with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//! - [`inventory`] - Product collection with stock reserve/release
//! - [`cart`] - One in-progress order and its finalize step
//! - [`ledger`] - Append-only order ledger and report folds
//! - [`loyalty`] - Per-customer point balances
//! - [`payment`] - Payment declaration resolution (cash/card/UPI/split)
//! - [`invoice`] - Plain-text invoice rendering and output capabilities
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: File system and network access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in paise (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use smartmart_core::cart::{CartSession, CustomerLabel};
//! use smartmart_core::inventory::InventoryStore;
//! use smartmart_core::ledger::OrderLedger;
//! use smartmart_core::loyalty::CustomerLoyaltyLedger;
//! use smartmart_core::money::{Money, Percent};
//! use smartmart_core::payment::PaymentDeclaration;
//!
//! let mut inventory = InventoryStore::new();
//! let pid = inventory
//!     .add("Basmati Rice (5kg)", "Grocery", 50, Money::from_rupees(1200), "Sharma Supplies", None)
//!     .unwrap();
//!
//! let mut ledger = OrderLedger::new();
//! let mut loyalty = CustomerLoyaltyLedger::new();
//! let mut cart = CartSession::new();
//! cart.set_customer(CustomerLabel::new("Asha", None).unwrap()).unwrap();
//! cart.add_item(&mut inventory, pid, 2, Percent::from_percent(10.0)).unwrap();
//! cart.apply_order_discount(Percent::from_percent(5.0)).unwrap();
//!
//! let order = cart
//!     .finalize(PaymentDeclaration::Cash { reference: String::new() }, &mut ledger, &mut loyalty)
//!     .unwrap();
//! assert_eq!(order.order_id, 1000);
//! assert_eq!(order.total_cents, 205200); // ₹2052.00
//! assert_eq!(loyalty.balance("Asha"), 20);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod inventory;
pub mod invoice;
pub mod ledger;
pub mod loyalty;
pub mod money;
pub mod payment;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use smartmart_core::Money` instead of
// `use smartmart_core::money::Money`

pub use cart::{CartSession, CartStatus, CustomerLabel};
pub use error::{CoreError, CoreResult, ValidationError};
pub use inventory::InventoryStore;
pub use ledger::OrderLedger;
pub use loyalty::CustomerLoyaltyLedger;
pub use money::{Money, Percent};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// First product id ever assigned by a fresh inventory store.
pub const FIRST_PRODUCT_ID: u64 = 1;

/// First order id ever assigned by a fresh ledger.
///
/// ## Why 1000?
/// Order numbers appear on printed invoices; starting at 1000 keeps them
/// visually distinct from product ids, which start at 1.
pub const FIRST_ORDER_ID: u64 = 1000;

/// Default stock threshold for low-stock listings and startup warnings.
/// Products at or below this count as low stock (inclusive).
pub const LOW_STOCK_THRESHOLD_DEFAULT: i64 = 5;

/// Order value that earns one loyalty point: ₹100, in paise.
/// Points per order are `floor(total / LOYALTY_UNIT_CENTS)`.
pub const LOYALTY_UNIT_CENTS: i64 = 10_000;

/// Maximum items allowed in a single cart
///
/// ## Business Reason
/// Prevents runaway carts and ensures reasonable transaction sizes.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single item in cart
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10)
pub const MAX_ITEM_QUANTITY: i64 = 999;
