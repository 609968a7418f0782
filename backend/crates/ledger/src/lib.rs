//! Ledger Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, the balance ledger, the state document
//! - `application/` - Serialized access to the state document
//! - `infra/` - In-memory and PostgreSQL document stores
//!
//! ## Money Model
//! - Amounts are integer minor units (`Amount`), never floats
//! - `Ledger` is the only code that changes a user's balances
//! - Every mutation goes through `StateGate::mutate` and is persisted
//!   before it becomes visible

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;

// Re-exports for convenience
pub use application::gate::StateGate;
pub use domain::entity::{
    AppLog, Balances, Broadcast, Campaign, CampaignContent, CampaignTerms, CashflowConfig,
    NewUser, PayoutRequest, PlatformConfig, Report, ReportStatus, Submission, User,
};
pub use domain::ledger::Ledger;
pub use domain::repository::{LocalStateStore, StateStore};
pub use domain::state::MarketState;
pub use domain::value_object::{
    Amount, LogKind, PayoutMethod, PayoutStatus, PayoutTarget, SocialPlatform,
    SubmissionStatus, UserRole, UserStatus,
};
pub use error::{LedgerError, LedgerResult, StoreError, StoreResult};
pub use infra::memory::MemoryStateStore;
pub use infra::postgres::PgStateStore;
