//! Submission Entity

use chrono::{DateTime, Utc};
use kernel::id::{CampaignId, SubmissionId, UserId};
use serde::{Deserialize, Serialize};

use crate::domain::value_object::{Amount, SocialPlatform, SubmissionStatus};

/// Proof that a user posted campaign content
///
/// `reward_amount` is snapshotted from the campaign at creation so later
/// campaign edits never change what an in-flight proof is worth.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: SubmissionId,
    pub user_id: UserId,
    pub username: String,
    pub campaign_id: CampaignId,
    pub campaign_title: String,
    pub reward_amount: Amount,
    pub status: SubmissionStatus,
    #[serde(default)]
    pub is_viral_bonus: bool,
    pub external_link: String,
    pub social_handle: String,
    pub platform: SocialPlatform,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub reviewed_by: Option<UserId>,
    #[serde(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
}

impl Submission {
    /// Record an admin decision. Callers check `status.is_open()` first.
    pub fn resolve(
        &mut self,
        status: SubmissionStatus,
        admin_id: UserId,
        at: DateTime<Utc>,
        reason: Option<String>,
    ) {
        self.status = status;
        self.reviewed_by = Some(admin_id);
        self.reviewed_at = Some(at);
        self.rejection_reason = reason;
    }
}
