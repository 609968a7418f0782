//! Campaign Entity

use chrono::{DateTime, Utc};
use kernel::id::CampaignId;
use serde::{Deserialize, Serialize};

use crate::domain::value_object::Amount;

/// Creative brief shown to creators; opaque to the ledger
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CampaignContent {
    pub video_url: String,
    pub thumbnail_url: String,
    pub caption: String,
    pub hashtags: String,
    pub audio_name: String,
    pub bio_link: Option<String>,
}

/// Payout terms and advisory goals (goals are enforced by the proof oracle)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignTerms {
    pub basic_pay: Amount,
    pub viral_pay: Amount,
    pub goal_views: u64,
    pub goal_likes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: CampaignId,
    pub title: String,
    #[serde(flatten)]
    pub content: CampaignContent,
    #[serde(flatten)]
    pub terms: CampaignTerms,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Campaign {
    pub fn new(
        id: CampaignId,
        title: String,
        content: CampaignContent,
        terms: CampaignTerms,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            content,
            terms,
            active: true,
            created_at,
        }
    }

    /// Reward for a proof: the viral rate for viral claims, else the basic rate
    #[inline]
    pub fn reward_for(&self, viral: bool) -> Amount {
        if viral {
            self.terms.viral_pay
        } else {
            self.terms.basic_pay
        }
    }
}
