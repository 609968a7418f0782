//! Market Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Proof oracle contract, cashflow guard, dashboard figures
//! - `application/` - Submission and payout workflows, campaign and
//!   account administration, broadcasts and reports
//! - `infra/` - HTTP and manual-review proof oracles
//! - `presentation/` - HTTP handlers, DTOs, router, admin middleware
//!
//! ## Money Flow
//! 1. A proof locks the campaign reward into the creator's pending balance
//! 2. Approval settles it into the wallet, rejection forfeits it
//! 3. Withdrawals leave the wallet only after the cashflow guard allows
//!    them against the daily limit

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::{
    Account, AdminConsole, CampaignAdmin, MarketConfig, MarketContext, Messaging,
    PayoutDebitTiming, PayoutWorkflow, SubmissionWorkflow,
};
pub use domain::{CashflowGuard, ProofOracle, Verdict};
pub use error::{MarketError, MarketResult};
pub use infra::{ConfiguredOracle, HttpProofOracle, ManualReviewOracle};
pub use presentation::{MarketAppState, market_router};

#[cfg(test)]
pub(crate) mod test_support;
