//! Payout Method Value Object
//!
//! The user's settlement target. A payout request snapshots it so later
//! edits to the user's settings do not rewrite history.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of free-form payout details (UPI id, IBAN, wallet address)
pub const PAYOUT_DETAILS_MAX_LENGTH: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PayoutMethod {
    Upi,
    Bank,
    Usdt,
}

impl PayoutMethod {
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            PayoutMethod::Upi => "UPI",
            PayoutMethod::Bank => "BANK",
            PayoutMethod::Usdt => "USDT",
        }
    }
}

impl fmt::Display for PayoutMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Snapshot of where a payout goes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutTarget {
    pub method: PayoutMethod,
    pub details: String,
}

impl fmt::Display for PayoutTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.method, self.details)
    }
}
