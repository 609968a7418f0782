//! Application Configuration
//!
//! Static settings for the market workflows. Policy an admin can change at
//! runtime (daily limit, minimum withdrawal) lives in the state document.

use std::time::Duration;

/// When a payout request takes money out of the wallet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PayoutDebitTiming {
    /// Wallet is debited when an admin approves; requests only reserve
    #[default]
    OnApproval,
    /// Wallet is debited when the user requests; a rejection refunds it
    OnRequest,
}

#[derive(Debug, Clone)]
pub struct MarketConfig {
    /// Upper bound on one proof oracle call; on expiry the proof goes to
    /// manual audit
    pub oracle_timeout: Duration,
    pub payout_debit: PayoutDebitTiming,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            oracle_timeout: Duration::from_secs(20),
            payout_debit: PayoutDebitTiming::OnApproval,
        }
    }
}

impl MarketConfig {
    pub fn with_oracle_timeout(self, oracle_timeout: Duration) -> Self {
        Self {
            oracle_timeout,
            ..self
        }
    }

    pub fn debits_on_request(&self) -> bool {
        self.payout_debit == PayoutDebitTiming::OnRequest
    }
}
