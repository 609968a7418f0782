//! Market Error Types
//!
//! This module provides workflow error variants that integrate with the
//! unified `kernel::error::AppError` system.

use auth::AuthError;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, category::ErrorCategory, kind::ErrorKind};
use ledger::{Amount, LedgerError, StoreError, UserStatus};
use thiserror::Error;

/// Market result type alias
pub type MarketResult<T> = Result<T, MarketError>;

#[derive(Debug, Error)]
pub enum MarketError {
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The submission or payout was already decided
    #[error("Already resolved")]
    NotPending,

    #[error("Cannot change account status from {from} to {to}")]
    InvalidTransition { from: UserStatus, to: UserStatus },

    #[error("Campaign is not accepting submissions")]
    CampaignInactive,

    /// Terms and content are frozen once a submission points at the campaign
    #[error("Campaign already has submissions and can no longer be edited or deleted")]
    CampaignReferenced,

    #[error("This link was already submitted for the campaign")]
    DuplicateProof,

    #[error("Proof rejected: {0}")]
    ProofRejected(String),

    /// Batches are all-or-nothing and never fall back to manual audit
    #[error("Proof verification is unavailable: {0}")]
    OracleUnavailable(String),

    #[error("Minimum withdrawal is {minimum}")]
    BelowMinimum { minimum: Amount, requested: Amount },

    #[error("Insufficient balance: {available} available, {requested} requested")]
    InsufficientBalance { available: Amount, requested: Amount },

    #[error("No payout method configured")]
    PayoutTargetMissing,

    #[error("Daily cashflow capacity exceeded: {requested} requested, {available} available")]
    CapacityExceeded {
        limit: Amount,
        exposure: Amount,
        requested: Amount,
        available: Amount,
    },

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl MarketError {
    pub fn validation(message: impl Into<String>) -> Self {
        MarketError::Validation(message.into())
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            MarketError::NotFound(_) => ErrorCategory::NotFound,
            MarketError::NotPending
            | MarketError::InvalidTransition { .. }
            | MarketError::CampaignReferenced
            | MarketError::DuplicateProof => ErrorCategory::Conflict,
            MarketError::CampaignInactive
            | MarketError::ProofRejected(_)
            | MarketError::BelowMinimum { .. }
            | MarketError::InsufficientBalance { .. }
            | MarketError::PayoutTargetMissing
            | MarketError::CapacityExceeded { .. } => ErrorCategory::Policy,
            MarketError::Validation(_) => ErrorCategory::Validation,
            MarketError::OracleUnavailable(_) => ErrorCategory::ExternalUnavailable,
            MarketError::Auth(e) => e.category(),
            MarketError::Ledger(e) => e.category(),
            MarketError::Store(e) => e.category(),
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            MarketError::Auth(e) => e.kind(),
            MarketError::Ledger(e) => e.kind(),
            MarketError::Store(e) => e.kind(),
            _ => self.category().default_kind(),
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            MarketError::Auth(e) => e.to_app_error(),
            MarketError::Ledger(e) => e.to_app_error(),
            MarketError::Store(e) => e.to_app_error(),
            MarketError::CapacityExceeded { .. } => AppError::new(self.kind(), self.to_string())
                .with_category(self.category())
                .with_action("Retry after other payouts settle or the daily limit is raised"),
            MarketError::OracleUnavailable(_) => AppError::new(self.kind(), self.to_string())
                .with_category(self.category())
                .with_action("Retry the batch later or submit the proofs one by one"),
            MarketError::PayoutTargetMissing => AppError::new(self.kind(), self.to_string())
                .with_category(self.category())
                .with_action("Set a payout method before requesting a withdrawal"),
            _ => AppError::new(self.kind(), self.to_string()).with_category(self.category()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            MarketError::Store(e) => e.log(),
            MarketError::Ledger(e) if e.category().is_fault() => {
                tracing::error!(error = %e, "Ledger invariant violated");
            }
            MarketError::CapacityExceeded {
                limit,
                exposure,
                requested,
                ..
            } => {
                tracing::warn!(
                    limit = %limit,
                    exposure = %exposure,
                    requested = %requested,
                    "Payout refused by cashflow guard"
                );
            }
            MarketError::Auth(AuthError::Forbidden) => {
                tracing::warn!("Admin action refused");
            }
            _ => {
                tracing::debug!(error = %self, "Market error");
            }
        }
    }
}

impl IntoResponse for MarketError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
