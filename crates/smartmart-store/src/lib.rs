//! # smartmart-store: Persistence Layer for SmartMart POS
//!
//! This crate owns everything that touches the file system: the JSON
//! collection files, CSV import/export, operator accounts, and the
//! backup mirror.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      SmartMart POS Data Flow                            │
//! │                                                                         │
//! │  CLI command (checkout, product import, ...)                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  smartmart-store (THIS CRATE)                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   DataStore   │    │   Documents   │    │  CSV / Users │  │   │
//! │  │   │  (store.rs)   │    │(documents.rs) │    │              │  │   │
//! │  │   │               │    │               │    │ catalog I/O  │  │   │
//! │  │   │ load/commit   │◄───│ Inventory/    │    │ accounts +   │  │   │
//! │  │   │ backup/clear  │    │ Orders/...    │    │ role gate    │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      Data Directory                             │   │
//! │  │  inventory.json  orders.json  customers.json  users.json        │   │
//! │  │  data_backup.json (full-state mirror, written before commits)   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - DataStore: load, atomic commit, backup, restore, clear
//! - [`documents`] - Serde shapes for the collection files
//! - [`csv`] - Product catalog CSV import/export, orders export
//! - [`users`] - Operator accounts and the admin role gate
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use smartmart_store::{DataStore, PosState};
//!
//! # fn main() -> Result<(), smartmart_store::StoreError> {
//! let store = DataStore::open("./data")?;
//! let mut state: PosState = store.load()?;
//!
//! // ... mutate state through smartmart-core ...
//!
//! store.commit(&state)?;
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod csv;
pub mod documents;
pub mod error;
pub mod store;
pub mod users;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use store::{DataStore, PosState};
pub use users::{Role, UserStore};
