//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of domain vocabulary:
//! - Common error types, result aliases and the error taxonomy
//! - Typed entity identifiers and their generators
//! - The clock abstraction every time-dependent rule reads from
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across all domains.

pub mod error {
    pub mod app_error;
    pub mod category;
    pub mod conversions;
    pub mod kind;
}
pub mod clock;
pub mod id;
