//! Domain Layer
//!
//! Entities, value objects, the ledger and the persistence contract.

pub mod entity;
pub mod ledger;
pub mod repository;
pub mod state;
pub mod value_object;
