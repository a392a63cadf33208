//! # Store Error Types
//!
//! Error types for the persistence layer.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  std::io::Error / serde_json::Error / csv::Error                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds context and categorization            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CLI prints a user-facing message and exits non-zero                   │
//! │                                                                         │
//! │  CoreError passes through unchanged so domain failures keep their      │
//! │  typed identity across the persistence boundary.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use smartmart_core::CoreError;
use thiserror::Error;

/// Persistence layer errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Domain failure surfaced through a store operation (e.g. a CSV row
    /// failing product validation on import).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// File system failure.
    ///
    /// ## When This Occurs
    /// - Data directory cannot be created
    /// - Collection file unreadable or rename fails
    /// - Disk full
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A collection file exists but does not parse as its document.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV reading or writing failed at the format level.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A CSV import file is missing a required column.
    #[error("CSV import: missing column '{name}'")]
    MissingColumn { name: &'static str },

    /// A CSV row carries a value that does not parse or validate.
    #[error("CSV import: row {row}, column '{column}': {reason}")]
    InvalidField {
        row: usize,
        column: &'static str,
        reason: String,
    },

    /// Registering a username that already exists.
    #[error("User '{username}' already exists")]
    DuplicateUser { username: String },

    /// Unknown username or wrong password.
    #[error("Invalid credentials for '{username}'")]
    InvalidCredentials { username: String },

    /// The authenticated user's role does not permit the operation.
    #[error("User '{username}' is not permitted to {action}")]
    PermissionDenied { username: String, action: String },

    /// Restore requested but no backup file exists.
    #[error("No backup found at {path}")]
    BackupMissing { path: String },
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
