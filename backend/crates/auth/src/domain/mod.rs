//! Domain Layer
//!
//! Value objects and the lockout policy. Users themselves live in the
//! ledger's state document.

pub mod lockout;
pub mod value_object;

pub use lockout::{FailedAttempt, LockoutPolicy};
