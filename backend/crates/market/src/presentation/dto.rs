//! Request and Response DTOs
//!
//! Bodies are camelCase JSON. Amounts are integer minor units.

use kernel::id::{CampaignId, UserId};
use ledger::{
    Amount, CampaignContent, CampaignTerms, PayoutMethod, SocialPlatform, Submission, UserStatus,
};
use serde::{Deserialize, Serialize};

use crate::application::{BatchItem, CampaignInput, ProofCheck};

/// POST /api/submissions
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitProofRequest {
    pub campaign_id: CampaignId,
    pub link: String,
    pub handle: String,
    #[serde(default)]
    pub platform: SocialPlatform,
    #[serde(default)]
    pub viral: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitProofResponse {
    pub submission: Submission,
    /// `verified` or `manual_audit`
    pub verification: &'static str,
}

impl SubmitProofResponse {
    pub fn new(submission: Submission, check: ProofCheck) -> Self {
        let verification = match check {
            ProofCheck::Verified => "verified",
            ProofCheck::ManualAudit => "manual_audit",
        };
        Self {
            submission,
            verification,
        }
    }
}

/// POST /api/payouts, PUT /api/admin/cashflow/daily-limit,
/// PUT /api/admin/config/min-withdrawal
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmountRequest {
    pub amount: Amount,
}

/// PUT /api/me/payout-settings
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutSettingsRequest {
    pub method: PayoutMethod,
    pub details: String,
}

/// POST /api/admin/submissions/{id}/reject
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RejectSubmissionRequest {
    pub reason: Option<String>,
}

/// PUT /api/admin/users/{id}/status
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetStatusRequest {
    pub status: UserStatus,
}

/// POST /api/admin/campaigns, PUT /api/admin/campaigns/{id}
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignRequest {
    pub title: String,
    #[serde(flatten)]
    pub content: CampaignContent,
    #[serde(flatten)]
    pub terms: CampaignTerms,
}

impl From<CampaignRequest> for CampaignInput {
    fn from(req: CampaignRequest) -> Self {
        Self {
            title: req.title,
            content: req.content,
            terms: req.terms,
        }
    }
}

/// POST /api/submissions/batch
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitBatchRequest {
    pub handle: String,
    #[serde(default)]
    pub platform: SocialPlatform,
    pub items: Vec<BatchItemRequest>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItemRequest {
    pub campaign_id: CampaignId,
    pub link: String,
}

impl From<BatchItemRequest> for BatchItem {
    fn from(req: BatchItemRequest) -> Self {
        Self {
            campaign_id: req.campaign_id,
            link: req.link,
        }
    }
}

/// POST /api/admin/broadcasts
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastRequest {
    pub content: String,
    #[serde(default)]
    pub target_user_id: Option<UserId>,
}

/// POST /api/reports
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub message: String,
}

/// GET /api/admin/logs
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogsQuery {
    pub limit: Option<usize>,
}
