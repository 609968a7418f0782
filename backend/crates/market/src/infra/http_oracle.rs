//! HTTP Proof Oracle
//!
//! POSTs the claim as JSON to an external verifier and expects
//! `{"verdict": "accept" | "reject", "reason": "..."}` back. Any transport
//! failure, non-2xx status or undecodable body counts as unavailable.

use std::time::Duration;

use serde::Deserialize;

use crate::domain::{Claim, ProofOracle, Verdict};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum WireVerdict {
    Accept,
    Reject,
}

#[derive(Debug, Deserialize)]
struct OracleResponse {
    verdict: WireVerdict,
    #[serde(default)]
    reason: Option<String>,
}

impl From<OracleResponse> for Verdict {
    fn from(response: OracleResponse) -> Self {
        match response.verdict {
            WireVerdict::Accept => Verdict::Accept,
            WireVerdict::Reject => Verdict::Reject(
                response
                    .reason
                    .filter(|r| !r.trim().is_empty())
                    .unwrap_or_else(|| "Proof does not meet the campaign requirements".into()),
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpProofOracle {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpProofOracle {
    /// `timeout` bounds each request on the client side as well
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

impl ProofOracle for HttpProofOracle {
    async fn verify(&self, claim: &Claim) -> Verdict {
        let response = match self.client.post(&self.endpoint).json(claim).send().await {
            Ok(response) => response,
            Err(e) => return Verdict::Unavailable(e.to_string()),
        };

        if !response.status().is_success() {
            return Verdict::Unavailable(format!("oracle returned status {}", response.status()));
        }

        match response.json::<OracleResponse>().await {
            Ok(body) => body.into(),
            Err(e) => Verdict::Unavailable(format!("undecodable oracle response: {e}")),
        }
    }
}
