//! Application Layer
//!
//! Use cases over the shared state gate.

pub mod account;
pub mod admin;
pub mod campaigns;
pub mod config;
pub mod context;
pub mod messaging;
pub mod payout;
pub mod submission;

pub use account::{Account, AccountHistory, WalletView};
pub use admin::{AdminConsole, UserDetail, UserSummary};
pub use campaigns::{CampaignAdmin, CampaignInput};
pub use config::{MarketConfig, PayoutDebitTiming};
pub use context::MarketContext;
pub use messaging::{InboxMessage, Messaging};
pub use payout::PayoutWorkflow;
pub use submission::{
    BATCH_MAX_ITEMS, BatchItem, ProofCheck, SubmissionWorkflow, SubmitBatchInput,
    SubmitProofInput, SubmitProofOutput,
};
