//! Repository Traits
//!
//! The persistence transport for the aggregate document. Implementations
//! are in the infra layer.

use crate::domain::state::MarketState;
use crate::error::StoreResult;

/// Generic load/save of the complete state document
#[trait_variant::make(StateStore: Send)]
pub trait LocalStateStore {
    /// Load the document; `None` when nothing has been saved yet
    async fn load(&self) -> StoreResult<Option<MarketState>>;

    /// Persist the complete document. On error nothing is written.
    async fn save(&self, state: &MarketState) -> StoreResult<()>;
}
