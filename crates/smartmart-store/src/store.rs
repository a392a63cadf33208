//! # Data Store
//!
//! One directory of JSON collection files plus the commit protocol that
//! keeps them consistent.
//!
//! ## Commit Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  commit(state)                                                          │
//! │                                                                         │
//! │  1. Serialize ALL documents up front (serialization failure aborts      │
//! │     before any byte reaches disk)                                       │
//! │  2. Write data_backup.json (full-state mirror) via temp + rename        │
//! │  3. Write each collection file via temp + rename                        │
//! │                                                                         │
//! │  A crash mid-commit leaves the freshly written backup holding the       │
//! │  complete target state; restore_from_backup replays it over the live    │
//! │  files. Loading never observes a torn individual file because every     │
//! │  write lands through an atomic rename in the same directory.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A finalize at the call site is: mutate in-memory state, then `commit`.
//! The order, the stock delta, and the loyalty accrual land together or
//! not at all.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use smartmart_core::{CustomerLoyaltyLedger, InventoryStore, OrderLedger};
use tracing::{debug, info};

use crate::documents::{BackupDocument, CustomersDocument, InventoryDocument, OrdersDocument};
use crate::error::{StoreError, StoreResult};

/// Products collection file.
pub const INVENTORY_FILE: &str = "inventory.json";
/// Orders collection file.
pub const ORDERS_FILE: &str = "orders.json";
/// Loyalty collection file.
pub const CUSTOMERS_FILE: &str = "customers.json";
/// Operator accounts file.
pub const USERS_FILE: &str = "users.json";
/// Full-state mirror written before each commit.
pub const BACKUP_FILE: &str = "data_backup.json";

// =============================================================================
// POS State
// =============================================================================

/// The complete in-memory state a store round-trips.
#[derive(Debug, Clone, Default)]
pub struct PosState {
    pub inventory: InventoryStore,
    pub ledger: OrderLedger,
    pub loyalty: CustomerLoyaltyLedger,
}

impl PosState {
    fn to_backup(&self) -> BackupDocument {
        BackupDocument {
            inventory: InventoryDocument::snapshot(&self.inventory),
            orders: OrdersDocument::snapshot(&self.ledger),
            customers: CustomersDocument::snapshot(&self.loyalty),
        }
    }

    fn from_backup(backup: BackupDocument) -> Self {
        PosState {
            inventory: backup.inventory.into_store(),
            ledger: backup.orders.into_ledger(),
            loyalty: backup.customers.into_ledger(),
        }
    }
}

// =============================================================================
// Data Store
// =============================================================================

/// Handle on one data directory.
#[derive(Debug, Clone)]
pub struct DataStore {
    dir: PathBuf,
}

impl DataStore {
    /// Opens a data store, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        debug!(dir = %dir.display(), "data store opened");
        Ok(DataStore { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    pub(crate) fn read_document<T>(&self, name: &str) -> StoreResult<T>
    where
        T: DeserializeOwned + Default,
    {
        let path = self.path(name);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(file = name, "collection file missing, starting empty");
                Ok(T::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Writes `contents` through a sibling temp file and an atomic rename.
    pub(crate) fn write_atomic(&self, name: &str, contents: &str) -> StoreResult<()> {
        let path = self.path(name);
        let tmp = self.path(&format!("{name}.tmp"));
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &path)?;
        debug!(file = name, bytes = contents.len(), "collection written");
        Ok(())
    }

    /// Loads the full state. Missing files become empty collections with
    /// fresh allocators; a present-but-corrupt file is an error, never
    /// silently discarded.
    pub fn load(&self) -> StoreResult<PosState> {
        let inventory: InventoryDocument = self.read_document(INVENTORY_FILE)?;
        let orders: OrdersDocument = self.read_document(ORDERS_FILE)?;
        let customers: CustomersDocument = self.read_document(CUSTOMERS_FILE)?;

        let state = PosState {
            inventory: inventory.into_store(),
            ledger: orders.into_ledger(),
            loyalty: customers.into_ledger(),
        };
        info!(
            products = state.inventory.len(),
            orders = state.ledger.len(),
            customers = state.loyalty.len(),
            "state loaded"
        );
        Ok(state)
    }

    /// Commits the full state: backup mirror first, then each collection.
    pub fn commit(&self, state: &PosState) -> StoreResult<()> {
        // Serialize everything before the first write.
        let backup = to_pretty_json(&state.to_backup())?;
        let inventory = to_pretty_json(&InventoryDocument::snapshot(&state.inventory))?;
        let orders = to_pretty_json(&OrdersDocument::snapshot(&state.ledger))?;
        let customers = to_pretty_json(&CustomersDocument::snapshot(&state.loyalty))?;

        self.write_atomic(BACKUP_FILE, &backup)?;
        self.write_atomic(INVENTORY_FILE, &inventory)?;
        self.write_atomic(ORDERS_FILE, &orders)?;
        self.write_atomic(CUSTOMERS_FILE, &customers)?;

        info!(
            products = state.inventory.len(),
            orders = state.ledger.len(),
            "state committed"
        );
        Ok(())
    }

    /// Replays the backup mirror over the live collection files and
    /// returns the restored state.
    pub fn restore_from_backup(&self) -> StoreResult<PosState> {
        let path = self.path(BACKUP_FILE);
        let text = fs::read_to_string(&path).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                StoreError::BackupMissing {
                    path: path.display().to_string(),
                }
            } else {
                err.into()
            }
        })?;
        let state = PosState::from_backup(serde_json::from_str(&text)?);
        self.commit(&state)?;
        info!("state restored from backup");
        Ok(state)
    }

    /// Exports the full-state document to an arbitrary path.
    pub fn export_to(&self, state: &PosState, path: &Path) -> StoreResult<()> {
        fs::write(path, to_pretty_json(&state.to_backup())?)?;
        info!(path = %path.display(), "state exported");
        Ok(())
    }

    /// Imports a full-state document from an arbitrary path, committing
    /// it as the new live state.
    pub fn import_from(&self, path: &Path) -> StoreResult<PosState> {
        let text = fs::read_to_string(path)?;
        let state = PosState::from_backup(serde_json::from_str(&text)?);
        self.commit(&state)?;
        info!(path = %path.display(), "state imported");
        Ok(state)
    }

    /// Resets every collection to empty with fresh allocators. The backup
    /// mirror written during this commit still holds the cleared state;
    /// export first to keep the old data.
    pub fn clear(&self) -> StoreResult<PosState> {
        let state = PosState::default();
        self.commit(&state)?;
        info!("all collections cleared");
        Ok(state)
    }
}

fn to_pretty_json<T: Serialize>(value: &T) -> StoreResult<String> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    Ok(text)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use smartmart_core::cart::{CartSession, CustomerLabel};
    use smartmart_core::money::{Money, Percent};
    use smartmart_core::payment::PaymentDeclaration;

    fn seeded_state() -> PosState {
        let mut state = PosState::default();
        let pid = state
            .inventory
            .add("Rice", "Grocery", 50, Money::from_rupees(1200), "Sharma", None)
            .unwrap();

        let mut cart = CartSession::new();
        cart.set_customer(CustomerLabel::new("Asha", None).unwrap())
            .unwrap();
        cart.add_item(&mut state.inventory, pid, 2, Percent::from_percent(10.0))
            .unwrap();
        cart.apply_order_discount(Percent::from_percent(5.0)).unwrap();
        cart.finalize(
            PaymentDeclaration::Cash {
                reference: String::new(),
            },
            &mut state.ledger,
            &mut state.loyalty,
        )
        .unwrap();
        state
    }

    #[test]
    fn test_load_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::open(dir.path()).unwrap();
        let state = store.load().unwrap();

        assert!(state.inventory.is_empty());
        assert!(state.ledger.is_empty());
        assert_eq!(state.inventory.next_product_id(), 1);
        assert_eq!(state.ledger.next_order_id(), 1000);
    }

    #[test]
    fn test_commit_then_load_round_trips_state_and_allocators() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::open(dir.path()).unwrap();
        let state = seeded_state();
        store.commit(&state).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.inventory.len(), 1);
        assert_eq!(loaded.inventory.next_product_id(), 2);
        assert_eq!(loaded.ledger.len(), 1);
        assert_eq!(loaded.ledger.next_order_id(), 1001);
        assert_eq!(loaded.ledger.orders()[0].total_cents, 205200);
        assert_eq!(loaded.loyalty.balance("Asha"), 20);

        // order ids keep increasing after the reload
        assert!(dir.path().join(BACKUP_FILE).exists());
    }

    #[test]
    fn test_corrupt_collection_is_an_error_not_a_reset() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::open(dir.path()).unwrap();
        store.commit(&seeded_state()).unwrap();
        std::fs::write(dir.path().join(ORDERS_FILE), "{not json").unwrap();

        assert!(matches!(store.load(), Err(StoreError::Json(_))));
    }

    #[test]
    fn test_restore_from_backup_replays_last_commit() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::open(dir.path()).unwrap();
        store.commit(&seeded_state()).unwrap();

        // simulate a torn write that clobbered a live collection
        std::fs::write(dir.path().join(INVENTORY_FILE), "{}").unwrap();

        let restored = store.restore_from_backup().unwrap();
        assert_eq!(restored.inventory.len(), 1);
        assert_eq!(restored.inventory.next_product_id(), 2);

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded.inventory.len(), 1);
    }

    #[test]
    fn test_restore_without_backup_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::open(dir.path()).unwrap();
        assert!(matches!(
            store.restore_from_backup(),
            Err(StoreError::BackupMissing { .. })
        ));
    }

    #[test]
    fn test_export_import_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::open(dir.path().join("data")).unwrap();
        let state = seeded_state();
        let dump = dir.path().join("dump.json");
        store.export_to(&state, &dump).unwrap();

        let other = DataStore::open(dir.path().join("other")).unwrap();
        let imported = other.import_from(&dump).unwrap();
        assert_eq!(imported.ledger.next_order_id(), 1001);
        assert_eq!(imported.loyalty.balance("Asha"), 20);
        assert_eq!(other.load().unwrap().inventory.len(), 1);
    }

    #[test]
    fn test_clear_resets_allocators() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::open(dir.path()).unwrap();
        store.commit(&seeded_state()).unwrap();

        let cleared = store.clear().unwrap();
        assert!(cleared.inventory.is_empty());
        assert_eq!(cleared.ledger.next_order_id(), 1000);

        let reloaded = store.load().unwrap();
        assert!(reloaded.ledger.is_empty());
        assert_eq!(reloaded.inventory.next_product_id(), 1);
    }
}
