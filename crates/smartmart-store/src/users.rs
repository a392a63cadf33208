//! # Operator Accounts
//!
//! Usernames, credentials, and the admin/cashier role gate. A boundary
//! concern kept out of smartmart-core on purpose: the engine never asks
//! who is driving it.
//!
//! A fresh installation seeds one admin and one cashier so the CLI is
//! usable before anyone registers accounts.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use smartmart_core::validation::validate_username;
use tracing::info;

use crate::error::{StoreError, StoreResult};
use crate::store::{DataStore, USERS_FILE};

/// What an account is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access, including destructive data operations.
    Admin,
    /// Day-to-day sales: checkout, lookups, reports.
    Cashier,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Cashier => write!(f, "cashier"),
        }
    }
}

/// One stored account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub password: String,
    pub role: Role,
}

/// `users.json`: username → account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsersDocument {
    #[serde(default)]
    pub users: BTreeMap<String, UserRecord>,
}

// =============================================================================
// User Store
// =============================================================================

/// Owns the account mapping.
#[derive(Debug, Clone)]
pub struct UserStore {
    users: BTreeMap<String, UserRecord>,
}

impl UserStore {
    /// Seeded store for a fresh installation.
    pub fn with_defaults() -> Self {
        let mut users = BTreeMap::new();
        users.insert(
            "admin".to_string(),
            UserRecord {
                password: "admin123".to_string(),
                role: Role::Admin,
            },
        );
        users.insert(
            "cashier".to_string(),
            UserRecord {
                password: "cashier123".to_string(),
                role: Role::Cashier,
            },
        );
        UserStore { users }
    }

    pub fn from_document(doc: UsersDocument) -> Self {
        UserStore { users: doc.users }
    }

    pub fn to_document(&self) -> UsersDocument {
        UsersDocument {
            users: self.users.clone(),
        }
    }

    /// Registers a new account. Usernames are unique; re-registering an
    /// existing one fails with `DuplicateUser` and changes nothing.
    pub fn register(&mut self, username: &str, password: &str, role: Role) -> StoreResult<()> {
        validate_username(username).map_err(smartmart_core::CoreError::from)?;
        if self.users.contains_key(username) {
            return Err(StoreError::DuplicateUser {
                username: username.to_string(),
            });
        }
        self.users.insert(
            username.to_string(),
            UserRecord {
                password: password.to_string(),
                role,
            },
        );
        info!(username, %role, "user registered");
        Ok(())
    }

    /// Checks credentials and returns the account's role.
    pub fn authenticate(&self, username: &str, password: &str) -> StoreResult<Role> {
        match self.users.get(username) {
            Some(record) if record.password == password => Ok(record.role),
            _ => Err(StoreError::InvalidCredentials {
                username: username.to_string(),
            }),
        }
    }

    pub fn role(&self, username: &str) -> Option<Role> {
        self.users.get(username).map(|r| r.role)
    }

    /// Gate for admin-only operations.
    pub fn require_admin(&self, username: &str, action: &str) -> StoreResult<()> {
        match self.role(username) {
            Some(Role::Admin) => Ok(()),
            _ => Err(StoreError::PermissionDenied {
                username: username.to_string(),
                action: action.to_string(),
            }),
        }
    }

    /// Accounts as (username, role) pairs, sorted by name.
    pub fn list(&self) -> Vec<(&str, Role)> {
        self.users
            .iter()
            .map(|(name, record)| (name.as_str(), record.role))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

// =============================================================================
// Persistence
// =============================================================================

impl DataStore {
    /// Loads accounts, seeding the defaults when no users file exists yet.
    pub fn load_users(&self) -> StoreResult<UserStore> {
        let doc: UsersDocument = self.read_document(USERS_FILE)?;
        if doc.users.is_empty() {
            return Ok(UserStore::with_defaults());
        }
        Ok(UserStore::from_document(doc))
    }

    pub fn save_users(&self, users: &UserStore) -> StoreResult<()> {
        let mut text = serde_json::to_string_pretty(&users.to_document())?;
        text.push('\n');
        self.write_atomic(USERS_FILE, &text)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_seeds() {
        let users = UserStore::with_defaults();
        assert_eq!(users.authenticate("admin", "admin123").unwrap(), Role::Admin);
        assert_eq!(
            users.authenticate("cashier", "cashier123").unwrap(),
            Role::Cashier
        );
        assert!(users.authenticate("admin", "wrong").is_err());
        assert!(users.authenticate("ghost", "admin123").is_err());
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut users = UserStore::with_defaults();
        users.register("asha", "pw", Role::Cashier).unwrap();

        let err = users.register("asha", "other", Role::Admin).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateUser { .. }));
        // the original record is untouched
        assert_eq!(users.authenticate("asha", "pw").unwrap(), Role::Cashier);

        let err = users.register("admin", "pw", Role::Admin).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateUser { .. }));
    }

    #[test]
    fn test_register_validates_username() {
        let mut users = UserStore::with_defaults();
        assert!(users.register("", "pw", Role::Cashier).is_err());
        assert!(users.register("has space", "pw", Role::Cashier).is_err());
        assert!(users.register("ravi_k-2", "pw", Role::Cashier).is_ok());
    }

    #[test]
    fn test_require_admin() {
        let users = UserStore::with_defaults();
        users.require_admin("admin", "clear all data").unwrap();

        let err = users
            .require_admin("cashier", "clear all data")
            .unwrap_err();
        assert!(matches!(err, StoreError::PermissionDenied { .. }));
        assert!(users.require_admin("ghost", "anything").is_err());
    }

    #[test]
    fn test_persistence_round_trip_and_seeding() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::open(dir.path()).unwrap();

        // no file yet: defaults
        let mut users = store.load_users().unwrap();
        assert_eq!(users.len(), 2);

        users.register("asha", "pw", Role::Admin).unwrap();
        store.save_users(&users).unwrap();

        let reloaded = store.load_users().unwrap();
        assert_eq!(reloaded.len(), 3);
        assert_eq!(reloaded.authenticate("asha", "pw").unwrap(), Role::Admin);
    }
}
