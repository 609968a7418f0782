//! Market State
//!
//! The aggregate document persisted through a `StateStore`: every user,
//! campaign, submission, payout request, broadcast, report, the cashflow
//! window, the activity log and platform configuration. Missing sections
//! deserialize to their defaults.

use kernel::id::{CampaignId, PayoutRequestId, ReportId, SubmissionId, UserId};
use serde::{Deserialize, Serialize};

use crate::domain::entity::{
    AppLog, Broadcast, Campaign, CashflowConfig, PayoutRequest, PlatformConfig, Report,
    Submission, User,
};
use crate::domain::value_object::Amount;
use crate::error::{LedgerError, LedgerResult};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarketState {
    pub users: Vec<User>,
    pub campaigns: Vec<Campaign>,
    pub submissions: Vec<Submission>,
    pub payout_requests: Vec<PayoutRequest>,
    pub broadcasts: Vec<Broadcast>,
    pub reports: Vec<Report>,
    pub cashflow: CashflowConfig,
    pub logs: Vec<AppLog>,
    pub config: PlatformConfig,
}

impl MarketState {
    // ========================================================================
    // Users
    // ========================================================================

    pub fn user(&self, id: &UserId) -> Option<&User> {
        self.users.iter().find(|u| u.id == *id)
    }

    pub fn user_mut(&mut self, id: &UserId) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id == *id)
    }

    /// Same as [`MarketState::user_mut`] but as a ledger error
    pub fn require_user_mut(&mut self, id: &UserId) -> LedgerResult<&mut User> {
        self.user_mut(id).ok_or(LedgerError::UserNotFound(*id))
    }

    /// Look up by canonical user name
    pub fn user_by_username(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|u| u.username == username)
    }

    pub fn username_taken(&self, username: &str) -> bool {
        self.user_by_username(username).is_some()
    }

    pub fn has_admin(&self) -> bool {
        self.users.iter().any(User::is_admin)
    }

    // ========================================================================
    // Campaigns / submissions / payouts / reports
    // ========================================================================

    pub fn campaign(&self, id: &CampaignId) -> Option<&Campaign> {
        self.campaigns.iter().find(|c| c.id == *id)
    }

    pub fn campaign_mut(&mut self, id: &CampaignId) -> Option<&mut Campaign> {
        self.campaigns.iter_mut().find(|c| c.id == *id)
    }

    /// A campaign is referenced once any submission points at it
    pub fn campaign_is_referenced(&self, id: &CampaignId) -> bool {
        self.submissions.iter().any(|s| s.campaign_id == *id)
    }

    pub fn submission(&self, id: &SubmissionId) -> Option<&Submission> {
        self.submissions.iter().find(|s| s.id == *id)
    }

    pub fn submission_mut(&mut self, id: &SubmissionId) -> Option<&mut Submission> {
        self.submissions.iter_mut().find(|s| s.id == *id)
    }

    pub fn payout(&self, id: &PayoutRequestId) -> Option<&PayoutRequest> {
        self.payout_requests.iter().find(|p| p.id == *id)
    }

    pub fn payout_mut(&mut self, id: &PayoutRequestId) -> Option<&mut PayoutRequest> {
        self.payout_requests.iter_mut().find(|p| p.id == *id)
    }

    pub fn report_mut(&mut self, id: &ReportId) -> Option<&mut Report> {
        self.reports.iter_mut().find(|r| r.id == *id)
    }

    // ========================================================================
    // Aggregates
    // ========================================================================

    /// Sum of all wallet balances
    pub fn total_wallet(&self) -> Amount {
        self.users.iter().map(|u| u.balances().wallet()).sum()
    }

    /// Sum of all balances locked for audit
    pub fn total_pending(&self) -> Amount {
        self.users.iter().map(|u| u.balances().pending()).sum()
    }

    /// Open (pending or held) payout requests
    pub fn open_payouts(&self) -> impl Iterator<Item = &PayoutRequest> {
        self.payout_requests.iter().filter(|p| p.status.is_open())
    }

    // ========================================================================
    // Activity log
    // ========================================================================

    /// Prepend an entry, keeping at most `config.log_retention` entries
    pub fn record_log(&mut self, entry: AppLog) {
        self.logs.insert(0, entry);
        self.logs.truncate(self.config.log_retention.max(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::user::fixtures::user;
    use crate::domain::value_object::LogKind;
    use chrono::Utc;
    use kernel::id::LogId;

    #[test]
    fn test_empty_document_deserializes_to_defaults() {
        let state: MarketState = serde_json::from_str("{}").unwrap();
        assert!(state.users.is_empty());
        assert_eq!(state.cashflow, CashflowConfig::default());
        assert_eq!(state.config, PlatformConfig::default());
    }

    #[test]
    fn test_document_keys_are_camel_case() {
        let json = serde_json::to_value(MarketState::default()).unwrap();
        for key in [
            "users",
            "campaigns",
            "submissions",
            "payoutRequests",
            "broadcasts",
            "reports",
            "cashflow",
            "logs",
            "config",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert!(json["cashflow"].get("dailyLimit").is_some());
        assert!(json["config"].get("minWithdrawal").is_some());
    }

    #[test]
    fn test_log_retention_keeps_newest_first() {
        let mut state = MarketState::default();
        state.config.log_retention = 3;
        for i in 0..5 {
            state.record_log(AppLog::new(
                LogId::new(),
                LogKind::System,
                format!("entry {i}"),
                Utc::now(),
            ));
        }
        assert_eq!(state.logs.len(), 3);
        assert_eq!(state.logs[0].message, "entry 4");
        assert_eq!(state.logs[2].message, "entry 2");
    }

    #[test]
    fn test_user_lookups() {
        let mut state = MarketState::default();
        let alice = user("alice");
        let id = alice.id;
        state.users.push(alice);

        assert!(state.user(&id).is_some());
        assert!(state.username_taken("alice"));
        assert!(!state.username_taken("bob"));
        assert!(!state.has_admin());
        assert!(matches!(
            state.require_user_mut(&UserId::new()),
            Err(LedgerError::UserNotFound(_))
        ));
    }
}
