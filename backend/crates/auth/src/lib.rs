//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Value objects and the lockout policy
//! - `application/` - Use cases and application services
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! Accounts live in the ledger's state document; every use case reads or
//! mutates them through the shared `StateGate`.
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, optional pepper
//! - Lockout after repeated failed sign-ins; the lock holds for its whole
//!   window even against correct credentials
//! - Recovery by a security key shown once at sign-up, stored as a digest
//! - Stateless HMAC-signed bearer tokens; role and status are re-read on
//!   every request

pub mod application;
pub mod domain;
pub mod error;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::{BootstrapAdmin, CurrentUser};
pub use error::{AuthError, AuthResult};
pub use presentation::{AuthAppState, auth_router, require_session};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[cfg(test)]
pub(crate) mod test_support;

#[cfg(test)]
mod tests;
