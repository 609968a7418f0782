//! Proof Oracle
//!
//! Black-box check of a posted proof against a campaign's requirements.
//! The oracle never touches state; the submission workflow calls it
//! outside the state gate under a timeout.

use ledger::{Campaign, SocialPlatform};
use serde::{Deserialize, Serialize};

/// What the post must contain, taken from the campaign
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignRequirements {
    pub title: String,
    pub audio_name: String,
    pub caption: String,
    pub hashtags: String,
    pub goal_views: u64,
    pub goal_likes: u64,
}

impl From<&Campaign> for CampaignRequirements {
    fn from(campaign: &Campaign) -> Self {
        Self {
            title: campaign.title.clone(),
            audio_name: campaign.content.audio_name.clone(),
            caption: campaign.content.caption.clone(),
            hashtags: campaign.content.hashtags.clone(),
            goal_views: campaign.terms.goal_views,
            goal_likes: campaign.terms.goal_likes,
        }
    }
}

/// One proof to verify
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    pub link: String,
    pub handle: String,
    pub platform: SocialPlatform,
    /// Viral claims must also meet the view and like goals
    pub viral: bool,
    pub requirements: CampaignRequirements,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Reject(String),
    /// The oracle could not decide; the proof falls back to manual audit
    Unavailable(String),
}

#[trait_variant::make(ProofOracle: Send)]
pub trait LocalProofOracle {
    /// Never fails: transport problems are reported as `Unavailable`
    async fn verify(&self, claim: &Claim) -> Verdict;
}
