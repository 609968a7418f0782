//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, category::ErrorCategory, kind::ErrorKind};
use ledger::StoreError;
use platform::password::{PasswordHashError, PasswordPolicyError};
use thiserror::Error;

use crate::domain::value_object::{EmailError, UserNameError};

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("User not found")]
    UserNotFound,

    #[error("User name already exists")]
    UsernameTaken,

    /// Wrong password; the attempt was counted
    #[error("Invalid credentials ({attempts_remaining} attempts remaining)")]
    InvalidCredential {
        attempts_used: u32,
        attempts_remaining: u32,
    },

    #[error("Account is locked for another {}", format_remaining(.remaining))]
    LockedOut { remaining: chrono::Duration },

    #[error("Account is banned")]
    AccountBanned,

    #[error("Account is suspended")]
    AccountSuspended,

    /// Recovery key matches no account
    #[error("Invalid security key")]
    InvalidKey,

    #[error(transparent)]
    InvalidUserName(#[from] UserNameError),

    #[error(transparent)]
    InvalidEmail(#[from] EmailError),

    #[error("Password validation failed: {0}")]
    PasswordPolicy(#[from] PasswordPolicyError),

    /// Missing, forged or expired session token, or the account is gone
    #[error("Session not found or expired")]
    SessionInvalid,

    #[error("Admin privileges required")]
    Forbidden,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn format_remaining(remaining: &chrono::Duration) -> String {
    let minutes = remaining.num_minutes().max(1);
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}

impl AuthError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AuthError::UserNotFound => ErrorCategory::NotFound,
            AuthError::UsernameTaken => ErrorCategory::Conflict,
            AuthError::InvalidUserName(_)
            | AuthError::InvalidEmail(_)
            | AuthError::PasswordPolicy(_) => ErrorCategory::Validation,
            AuthError::InvalidCredential { .. }
            | AuthError::LockedOut { .. }
            | AuthError::AccountBanned
            | AuthError::AccountSuspended
            | AuthError::InvalidKey
            | AuthError::SessionInvalid
            | AuthError::Forbidden => ErrorCategory::Policy,
            AuthError::Store(e) => e.category(),
            AuthError::Internal(_) => ErrorCategory::Internal,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidCredential { .. }
            | AuthError::InvalidKey
            | AuthError::SessionInvalid => ErrorKind::Unauthorized,
            AuthError::LockedOut { .. } => ErrorKind::Locked,
            AuthError::AccountBanned | AuthError::AccountSuspended | AuthError::Forbidden => {
                ErrorKind::Forbidden
            }
            AuthError::Store(e) => e.kind(),
            _ => self.category().default_kind(),
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::Store(e) => e.to_app_error(),
            AuthError::Internal(_) => {
                AppError::new(self.kind(), "Internal error").with_category(self.category())
            }
            AuthError::LockedOut { .. } => AppError::new(self.kind(), self.to_string())
                .with_category(self.category())
                .with_action("Wait for the lockout to expire or recover the account with its security key"),
            _ => AppError::new(self.kind(), self.to_string()).with_category(self.category()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Store(e) => e.log(),
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredential { attempts_used, .. } => {
                tracing::warn!(attempts_used, "Invalid login attempt");
            }
            AuthError::LockedOut { remaining } => {
                tracing::warn!(remaining_secs = remaining.num_seconds(), "Login attempt on locked account");
            }
            AuthError::InvalidKey => {
                tracing::warn!("Recovery attempted with unknown security key");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<PasswordHashError> for AuthError {
    fn from(err: PasswordHashError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AuthError::UserNotFound, 404),
            (AuthError::UsernameTaken, 409),
            (
                AuthError::InvalidCredential {
                    attempts_used: 1,
                    attempts_remaining: 4,
                },
                401,
            ),
            (
                AuthError::LockedOut {
                    remaining: chrono::Duration::hours(2),
                },
                423,
            ),
            (AuthError::AccountBanned, 403),
            (AuthError::InvalidKey, 401),
            (AuthError::InvalidEmail(EmailError::InvalidFormat), 400),
            (AuthError::Internal("boom".into()), 500),
        ];
        for (err, status) in cases {
            assert_eq!(err.to_app_error().status_code(), status, "{err}");
        }
    }

    #[test]
    fn test_locked_out_message() {
        let err = AuthError::LockedOut {
            remaining: chrono::Duration::minutes(23 * 60 + 59),
        };
        assert_eq!(err.to_string(), "Account is locked for another 23h 59m");
        assert!(err.to_app_error().action().is_some());
    }

    #[test]
    fn test_internal_message_hidden() {
        let app = AuthError::Internal("argon2 exploded".into()).to_app_error();
        assert!(!app.message().contains("argon2"));
    }
}
