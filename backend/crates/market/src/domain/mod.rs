//! Domain Layer
//!
//! Pure rules over the ledger's state document and the proof oracle seam.

pub mod cashflow_guard;
pub mod dashboard;
pub mod oracle;
pub mod proof;

pub use cashflow_guard::{Capacity, CashflowGuard};
pub use dashboard::Dashboard;
pub use oracle::{CampaignRequirements, Claim, LocalProofOracle, ProofOracle, Verdict};
pub use proof::ProofLink;
