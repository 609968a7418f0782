//! Campaign administration and listing

use kernel::id::{CampaignId, IdGeneratorExt, UserId};
use ledger::{Campaign, CampaignContent, CampaignTerms, StateStore};

use crate::application::context::MarketContext;
use crate::error::{MarketError, MarketResult};

pub const TITLE_MAX_LENGTH: usize = 120;

/// Editable campaign fields
#[derive(Debug, Clone)]
pub struct CampaignInput {
    pub title: String,
    pub content: CampaignContent,
    pub terms: CampaignTerms,
}

impl CampaignInput {
    fn validate(self) -> MarketResult<Self> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(MarketError::validation("Campaign title is required"));
        }
        if title.chars().count() > TITLE_MAX_LENGTH {
            return Err(MarketError::validation(format!(
                "Campaign title must be at most {TITLE_MAX_LENGTH} characters"
            )));
        }
        if self.terms.basic_pay.is_zero() {
            return Err(MarketError::validation("Basic pay must be positive"));
        }
        if self.terms.viral_pay < self.terms.basic_pay {
            return Err(MarketError::validation(
                "Viral pay must be at least the basic pay",
            ));
        }
        Ok(Self { title, ..self })
    }
}

pub struct CampaignAdmin<S> {
    ctx: MarketContext<S>,
}

impl<S> CampaignAdmin<S>
where
    S: StateStore + Sync,
{
    pub fn new(ctx: MarketContext<S>) -> Self {
        Self { ctx }
    }

    pub async fn create(&self, admin_id: UserId, input: CampaignInput) -> MarketResult<Campaign> {
        let input = input.validate()?;
        let campaign = Campaign::new(
            self.ctx.ids.next_id(),
            input.title,
            input.content,
            input.terms,
            self.ctx.clock.now(),
        );

        self.ctx
            .gate
            .mutate(|state| -> MarketResult<()> {
                let entry = self
                    .ctx
                    .admin_log(admin_id, format!("Campaign {} created", campaign.title));
                state.campaigns.insert(0, campaign.clone());
                state.record_log(entry);
                Ok(())
            })
            .await?;

        tracing::info!(campaign_id = %campaign.id, admin_id = %admin_id, "Campaign created");
        Ok(campaign)
    }

    /// Replace title, content and terms; refused once any submission
    /// references the campaign
    pub async fn edit(
        &self,
        admin_id: UserId,
        campaign_id: CampaignId,
        input: CampaignInput,
    ) -> MarketResult<Campaign> {
        let input = input.validate()?;

        let campaign = self
            .ctx
            .gate
            .mutate(|state| -> MarketResult<Campaign> {
                if state.campaign_is_referenced(&campaign_id) {
                    return Err(MarketError::CampaignReferenced);
                }
                let campaign = state
                    .campaign_mut(&campaign_id)
                    .ok_or(MarketError::NotFound("Campaign"))?;
                campaign.title = input.title;
                campaign.content = input.content;
                campaign.terms = input.terms;
                let campaign = campaign.clone();

                let entry = self
                    .ctx
                    .admin_log(admin_id, format!("Campaign {} edited", campaign.title));
                state.record_log(entry);
                Ok(campaign)
            })
            .await?;

        tracing::info!(campaign_id = %campaign_id, admin_id = %admin_id, "Campaign edited");
        Ok(campaign)
    }

    /// Remove a campaign nobody has submitted to yet
    pub async fn delete(&self, admin_id: UserId, campaign_id: CampaignId) -> MarketResult<()> {
        let title = self
            .ctx
            .gate
            .mutate(|state| -> MarketResult<String> {
                let index = state
                    .campaigns
                    .iter()
                    .position(|c| c.id == campaign_id)
                    .ok_or(MarketError::NotFound("Campaign"))?;
                if state.campaign_is_referenced(&campaign_id) {
                    return Err(MarketError::CampaignReferenced);
                }
                let removed = state.campaigns.remove(index);

                let entry = self
                    .ctx
                    .admin_log(admin_id, format!("Campaign {} deleted", removed.title));
                state.record_log(entry);
                Ok(removed.title)
            })
            .await?;

        tracing::info!(campaign_id = %campaign_id, admin_id = %admin_id, title = %title, "Campaign deleted");
        Ok(())
    }

    /// Flip `active`; allowed at any time
    pub async fn toggle(&self, admin_id: UserId, campaign_id: CampaignId) -> MarketResult<Campaign> {
        let campaign = self
            .ctx
            .gate
            .mutate(|state| -> MarketResult<Campaign> {
                let campaign = state
                    .campaign_mut(&campaign_id)
                    .ok_or(MarketError::NotFound("Campaign"))?;
                campaign.active = !campaign.active;
                let campaign = campaign.clone();

                let verb = if campaign.active { "activated" } else { "paused" };
                let entry = self
                    .ctx
                    .admin_log(admin_id, format!("Campaign {} {verb}", campaign.title));
                state.record_log(entry);
                Ok(campaign)
            })
            .await?;

        tracing::info!(
            campaign_id = %campaign_id,
            active = campaign.active,
            "Campaign toggled"
        );
        Ok(campaign)
    }

    /// Campaigns open for submissions
    pub async fn active(&self) -> Vec<Campaign> {
        self.ctx
            .gate
            .read(|s| s.campaigns.iter().filter(|c| c.active).cloned().collect())
            .await
    }

    pub async fn all(&self) -> Vec<Campaign> {
        self.ctx.gate.read(|s| s.campaigns.clone()).await
    }
}
