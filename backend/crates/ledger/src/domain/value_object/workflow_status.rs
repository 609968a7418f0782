//! Workflow Status Value Objects
//!
//! Submission: `Pending | ViralClaim -> Approved | Rejected`.
//! Payout: `Pending -> Hold`, `Pending | Hold -> Approved | Rejected`.
//! Approved and Rejected are terminal in both machines.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Pending,
    ViralClaim,
    Approved,
    Rejected,
}

impl SubmissionStatus {
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::ViralClaim => "viral_claim",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Awaiting an admin decision
    #[inline]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Pending | Self::ViralClaim)
    }

    #[inline]
    pub const fn is_terminal(&self) -> bool {
        !self.is_open()
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutStatus {
    Pending,
    Hold,
    Approved,
    Rejected,
}

impl PayoutStatus {
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Hold => "hold",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Counts toward cash exposure and may still be decided
    #[inline]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Pending | Self::Hold)
    }

    #[inline]
    pub const fn is_terminal(&self) -> bool {
        !self.is_open()
    }
}

impl fmt::Display for PayoutStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_open_states() {
        assert!(SubmissionStatus::Pending.is_open());
        assert!(SubmissionStatus::ViralClaim.is_open());
        assert!(SubmissionStatus::Approved.is_terminal());
        assert!(SubmissionStatus::Rejected.is_terminal());
        assert_eq!(
            serde_json::to_string(&SubmissionStatus::ViralClaim).unwrap(),
            "\"viral_claim\""
        );
    }

    #[test]
    fn test_payout_open_states() {
        assert!(PayoutStatus::Pending.is_open());
        assert!(PayoutStatus::Hold.is_open());
        assert!(PayoutStatus::Approved.is_terminal());
        assert!(PayoutStatus::Rejected.is_terminal());
    }
}
