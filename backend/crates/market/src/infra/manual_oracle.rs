//! Oracle for deployments without an automated verifier: every proof goes
//! to the admin audit queue.

use crate::domain::{Claim, ProofOracle, Verdict};

#[derive(Debug, Clone, Copy, Default)]
pub struct ManualReviewOracle;

impl ProofOracle for ManualReviewOracle {
    async fn verify(&self, _claim: &Claim) -> Verdict {
        Verdict::Unavailable("manual review".to_string())
    }
}
