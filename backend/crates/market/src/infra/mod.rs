//! Infrastructure Layer
//!
//! Proof oracle implementations.

pub mod http_oracle;
pub mod manual_oracle;

pub use http_oracle::HttpProofOracle;
pub use manual_oracle::ManualReviewOracle;

use crate::domain::{Claim, ProofOracle, Verdict};

/// Oracle chosen at startup from configuration
#[derive(Debug, Clone)]
pub enum ConfiguredOracle {
    Http(HttpProofOracle),
    Manual(ManualReviewOracle),
}

impl ProofOracle for ConfiguredOracle {
    async fn verify(&self, claim: &Claim) -> Verdict {
        match self {
            ConfiguredOracle::Http(oracle) => oracle.verify(claim).await,
            ConfiguredOracle::Manual(oracle) => oracle.verify(claim).await,
        }
    }
}
