//! Application Layer
//!
//! Serialized access to the market state.

pub mod gate;
