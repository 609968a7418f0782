//! Ledger Error Types
//!
//! [`LedgerError`] covers balance transitions, [`StoreError`] covers the
//! persistence transport. Both integrate with `kernel::error::AppError`.

use kernel::error::{app_error::AppError, category::ErrorCategory, kind::ErrorKind};
use kernel::id::UserId;
use thiserror::Error;

use crate::domain::value_object::Amount;

pub type LedgerResult<T> = Result<T, LedgerError>;
pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum LedgerError {
    /// Settling or forfeiting more than is locked for audit
    #[error("Locked balance {locked} is less than {requested}")]
    InsufficientLocked { locked: Amount, requested: Amount },

    /// Withdrawing more than the wallet holds
    #[error("Available balance {available} is less than {requested}")]
    InsufficientAvailable { available: Amount, requested: Amount },

    /// A balance would exceed the representable range
    #[error("Balance overflow")]
    Overflow,

    #[error("User {0} not found")]
    UserNotFound(UserId),
}

impl LedgerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            LedgerError::InsufficientAvailable { .. } => ErrorCategory::Policy,
            LedgerError::UserNotFound(_) => ErrorCategory::NotFound,
            // Workflows check preconditions first; reaching these is a bug
            LedgerError::InsufficientLocked { .. } | LedgerError::Overflow => {
                ErrorCategory::Internal
            }
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.category().default_kind()
    }

    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string()).with_category(self.category())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("State document is malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Someone else saved a newer revision since we loaded
    #[error("State document revision conflict (expected {expected})")]
    RevisionConflict { expected: i64 },

    #[error("State store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            StoreError::Database(_) | StoreError::Unavailable(_) => {
                ErrorCategory::ExternalUnavailable
            }
            StoreError::RevisionConflict { .. } => ErrorCategory::Conflict,
            StoreError::Malformed(_) => ErrorCategory::Internal,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.category().default_kind()
    }

    /// Client-facing form: never leaks driver details
    pub fn to_app_error(&self) -> AppError {
        let message = match self {
            StoreError::RevisionConflict { .. } => "State changed concurrently, nothing was applied",
            _ => "State could not be persisted, nothing was applied",
        };
        AppError::new(self.kind(), message)
            .with_category(self.category())
            .with_action("Retry the operation")
    }

    /// Log at the level the failure deserves; called by the wrapping
    /// error enums before they render a response
    pub fn log(&self) {
        match self {
            StoreError::RevisionConflict { expected } => {
                tracing::warn!(expected_revision = expected, "State revision conflict");
            }
            _ => {
                tracing::error!(error = %self, "State store failure");
            }
        }
    }
}
