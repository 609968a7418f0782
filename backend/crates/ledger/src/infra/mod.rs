//! Infrastructure Layer
//!
//! `StateStore` implementations.

pub mod memory;
pub mod postgres;
