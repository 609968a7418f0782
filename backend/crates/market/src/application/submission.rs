//! Submission Workflow
//!
//! `Pending | ViralClaim -> Approved | Rejected`. Submitting locks the
//! snapshotted reward for audit; the admin decision either settles it into
//! the wallet or forfeits it.
//!
//! The proof oracle runs before the state gate is taken, bounded by
//! `MarketConfig::oracle_timeout`. A rejection stops the submission; an
//! unavailable or slow oracle sends a single submission to manual audit
//! and stops a batch.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kernel::id::{CampaignId, IdGeneratorExt, SubmissionId, UserId};
use ledger::{
    Amount, Ledger, LogKind, MarketState, SocialPlatform, StateStore, Submission,
    SubmissionStatus,
};

use crate::application::context::MarketContext;
use crate::domain::{CampaignRequirements, Claim, ProofLink, ProofOracle, Verdict};
use crate::error::{MarketError, MarketResult};

/// Proof submitted by a user
#[derive(Debug, Clone)]
pub struct SubmitProofInput {
    pub user_id: UserId,
    pub campaign_id: CampaignId,
    pub link: String,
    pub handle: String,
    pub platform: SocialPlatform,
    /// Claim the viral rate instead of the basic one
    pub viral: bool,
}

/// Maximum number of campaigns in one batch
pub const BATCH_MAX_ITEMS: usize = 10;

#[derive(Debug, Clone)]
pub struct BatchItem {
    pub campaign_id: CampaignId,
    pub link: String,
}

/// Basic-rate proof for several campaigns under one social handle
#[derive(Debug, Clone)]
pub struct SubmitBatchInput {
    pub user_id: UserId,
    pub handle: String,
    pub platform: SocialPlatform,
    pub items: Vec<BatchItem>,
}

/// How the proof was checked before it entered audit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProofCheck {
    Verified,
    ManualAudit,
}

#[derive(Debug, Clone)]
pub struct SubmitProofOutput {
    pub submission: Submission,
    pub check: ProofCheck,
}

pub struct SubmissionWorkflow<S, O> {
    ctx: MarketContext<S>,
    oracle: Arc<O>,
}

impl<S, O> SubmissionWorkflow<S, O>
where
    S: StateStore + Sync,
    O: ProofOracle + Sync,
{
    pub fn new(ctx: MarketContext<S>, oracle: Arc<O>) -> Self {
        Self { ctx, oracle }
    }

    pub async fn submit(&self, input: SubmitProofInput) -> MarketResult<SubmitProofOutput> {
        let proof = ProofLink::parse(&input.link, &input.handle)?;
        let requirements = self.requirements(&input.campaign_id).await?;

        let claim = Claim {
            link: proof.link().to_string(),
            handle: proof.handle().to_string(),
            platform: input.platform,
            viral: input.viral,
            requirements,
        };
        let check = match self.verify(&claim).await {
            Verdict::Accept => ProofCheck::Verified,
            Verdict::Reject(reason) => {
                tracing::info!(
                    user_id = %input.user_id,
                    campaign_id = %input.campaign_id,
                    reason = %reason,
                    "Proof rejected by oracle"
                );
                return Err(MarketError::ProofRejected(reason));
            }
            Verdict::Unavailable(_) => ProofCheck::ManualAudit,
        };

        let submission_id: SubmissionId = self.ctx.ids.next_id();
        let now = self.ctx.clock.now();

        let submission = self
            .ctx
            .gate
            .mutate(|state| -> MarketResult<Submission> {
                let submission = open_claim(
                    state,
                    NewClaim {
                        id: submission_id,
                        user_id: input.user_id,
                        campaign_id: input.campaign_id,
                        proof: &proof,
                        platform: input.platform,
                        viral: input.viral,
                    },
                    now,
                )?;

                let (kind, message) = match (input.viral, check) {
                    (true, _) => (
                        LogKind::Viral,
                        format!("Viral claim for {} logged for audit", submission.campaign_title),
                    ),
                    (false, ProofCheck::Verified) => (
                        LogKind::Verify,
                        format!("Proof for {} verified, sent to audit", submission.campaign_title),
                    ),
                    (false, ProofCheck::ManualAudit) => (
                        LogKind::Verify,
                        format!("Proof for {} queued for manual audit", submission.campaign_title),
                    ),
                };
                let user = state.require_user_mut(&input.user_id)?;
                let entry = self.ctx.log_for(kind, message, user);
                state.record_log(entry);
                Ok(submission)
            })
            .await?;

        tracing::info!(
            submission_id = %submission.id,
            user_id = %submission.user_id,
            reward = %submission.reward_amount,
            status = %submission.status,
            "Proof submitted"
        );

        Ok(SubmitProofOutput { submission, check })
    }

    /// Submit proof for several campaigns at once.
    ///
    /// Every claim must be accepted by the oracle; a rejection or an
    /// unavailable oracle creates nothing. The accepted submissions and
    /// their locked rewards are applied in one mutation.
    pub async fn submit_batch(&self, input: SubmitBatchInput) -> MarketResult<Vec<Submission>> {
        if input.items.is_empty() {
            return Err(MarketError::validation("Select at least one campaign"));
        }
        if input.items.len() > BATCH_MAX_ITEMS {
            return Err(MarketError::validation(format!(
                "At most {BATCH_MAX_ITEMS} campaigns per batch"
            )));
        }

        let mut proofs = Vec::with_capacity(input.items.len());
        for item in &input.items {
            if proofs.iter().any(|(id, _)| *id == item.campaign_id) {
                return Err(MarketError::validation("Each campaign may appear only once"));
            }
            proofs.push((item.campaign_id, ProofLink::parse(&item.link, &input.handle)?));
        }

        for (campaign_id, proof) in &proofs {
            let requirements = self.requirements(campaign_id).await?;
            let claim = Claim {
                link: proof.link().to_string(),
                handle: proof.handle().to_string(),
                platform: input.platform,
                viral: false,
                requirements,
            };
            match self.verify(&claim).await {
                Verdict::Accept => {}
                Verdict::Reject(reason) => {
                    tracing::info!(
                        user_id = %input.user_id,
                        campaign_id = %campaign_id,
                        reason = %reason,
                        "Batch stopped, proof rejected by oracle"
                    );
                    return Err(MarketError::ProofRejected(reason));
                }
                Verdict::Unavailable(detail) => {
                    return Err(MarketError::OracleUnavailable(detail));
                }
            }
        }

        let ids: Vec<SubmissionId> = proofs.iter().map(|_| self.ctx.ids.next_id()).collect();
        let now = self.ctx.clock.now();

        let submissions = self
            .ctx
            .gate
            .mutate(|state| -> MarketResult<Vec<Submission>> {
                let mut created = Vec::with_capacity(proofs.len());
                for ((campaign_id, proof), id) in proofs.iter().zip(&ids) {
                    created.push(open_claim(
                        state,
                        NewClaim {
                            id: *id,
                            user_id: input.user_id,
                            campaign_id: *campaign_id,
                            proof,
                            platform: input.platform,
                            viral: false,
                        },
                        now,
                    )?);
                }

                let total: Amount = created.iter().map(|s| s.reward_amount).sum();
                let user = state.require_user_mut(&input.user_id)?;
                let message = format!(
                    "Verified {} missions for @{} ({total} locked for audit)",
                    created.len(),
                    input.handle.trim().trim_start_matches('@')
                );
                let entry = self.ctx.log_for(LogKind::Verify, message, user);
                state.record_log(entry);
                Ok(created)
            })
            .await?;

        tracing::info!(
            user_id = %input.user_id,
            count = submissions.len(),
            "Proof batch submitted"
        );
        Ok(submissions)
    }

    /// Requirements of a campaign that accepts submissions
    async fn requirements(&self, campaign_id: &CampaignId) -> MarketResult<CampaignRequirements> {
        self.ctx
            .gate
            .read(|s| -> MarketResult<CampaignRequirements> {
                let campaign = s
                    .campaign(campaign_id)
                    .ok_or(MarketError::NotFound("Campaign"))?;
                if !campaign.active {
                    return Err(MarketError::CampaignInactive);
                }
                Ok(CampaignRequirements::from(campaign))
            })
            .await
    }

    /// Ask the oracle, mapping a timeout to `Unavailable`
    async fn verify(&self, claim: &Claim) -> Verdict {
        let timeout = self.ctx.config.oracle_timeout;
        match tokio::time::timeout(timeout, self.oracle.verify(claim)).await {
            Ok(Verdict::Unavailable(detail)) => {
                tracing::warn!(detail = %detail, "Proof oracle unavailable");
                Verdict::Unavailable(detail)
            }
            Ok(verdict) => verdict,
            Err(_) => {
                tracing::warn!(
                    timeout_ms = timeout.as_millis() as u64,
                    "Proof oracle timed out"
                );
                Verdict::Unavailable(format!("no answer within {}ms", timeout.as_millis()))
            }
        }
    }

    /// Settle the locked reward into the user's wallet
    pub async fn approve(
        &self,
        submission_id: SubmissionId,
        admin_id: UserId,
    ) -> MarketResult<Submission> {
        let now = self.ctx.clock.now();
        let submission = self
            .ctx
            .gate
            .mutate(|state| -> MarketResult<Submission> {
                let (user_id, reward) = open_submission(state, &submission_id)?;
                let user = state.require_user_mut(&user_id)?;
                Ledger::settle_approved(user, reward)?;
                let entry = self.ctx.log_for(
                    LogKind::Verify,
                    format!("Mission verified for @{} (+{reward})", user.username),
                    user,
                );

                let submission = state
                    .submission_mut(&submission_id)
                    .ok_or(MarketError::NotFound("Submission"))?;
                submission.resolve(SubmissionStatus::Approved, admin_id, now, None);
                let submission = submission.clone();
                state.record_log(entry);
                Ok(submission)
            })
            .await?;

        tracing::info!(
            submission_id = %submission_id,
            admin_id = %admin_id,
            reward = %submission.reward_amount,
            "Submission approved"
        );
        Ok(submission)
    }

    /// Forfeit the locked reward
    pub async fn reject(
        &self,
        submission_id: SubmissionId,
        admin_id: UserId,
        reason: Option<String>,
    ) -> MarketResult<Submission> {
        let now = self.ctx.clock.now();
        let reason = reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());

        let submission = self
            .ctx
            .gate
            .mutate(|state| -> MarketResult<Submission> {
                let (user_id, reward) = open_submission(state, &submission_id)?;
                let user = state.require_user_mut(&user_id)?;
                Ledger::forfeit_rejected(user, reward)?;
                let message = match &reason {
                    Some(reason) => format!("Submission rejected: {reason}"),
                    None => "Submission rejected".to_string(),
                };
                let entry = self.ctx.log_for(LogKind::Verify, message, user);

                let submission = state
                    .submission_mut(&submission_id)
                    .ok_or(MarketError::NotFound("Submission"))?;
                submission.resolve(SubmissionStatus::Rejected, admin_id, now, reason);
                let submission = submission.clone();
                state.record_log(entry);
                Ok(submission)
            })
            .await?;

        tracing::info!(
            submission_id = %submission_id,
            admin_id = %admin_id,
            forfeited = %submission.reward_amount,
            "Submission rejected"
        );
        Ok(submission)
    }

    /// Submissions awaiting an admin decision, newest first
    pub async fn open(&self) -> Vec<Submission> {
        self.ctx
            .gate
            .read(|s| {
                s.submissions
                    .iter()
                    .filter(|sub| sub.status.is_open())
                    .cloned()
                    .collect()
            })
            .await
    }
}

struct NewClaim<'a> {
    id: SubmissionId,
    user_id: UserId,
    campaign_id: CampaignId,
    proof: &'a ProofLink,
    platform: SocialPlatform,
    viral: bool,
}

/// Create the submission and lock its reward. The campaign is re-checked
/// because it may have been paused while the oracle ran.
fn open_claim(
    state: &mut MarketState,
    claim: NewClaim<'_>,
    now: DateTime<Utc>,
) -> MarketResult<Submission> {
    let campaign = state
        .campaign(&claim.campaign_id)
        .ok_or(MarketError::NotFound("Campaign"))?;
    if !campaign.active {
        return Err(MarketError::CampaignInactive);
    }
    let reward = campaign.reward_for(claim.viral);
    let campaign_title = campaign.title.clone();

    let duplicate = state.submissions.iter().any(|s| {
        s.campaign_id == claim.campaign_id
            && s.external_link == claim.proof.link()
            && s.status != SubmissionStatus::Rejected
    });
    if duplicate {
        return Err(MarketError::DuplicateProof);
    }

    let user = state
        .user_mut(&claim.user_id)
        .ok_or(MarketError::NotFound("User"))?;
    Ledger::lock_for_audit(user, reward)?;
    user.saved_social_handle = Some(claim.proof.handle().to_string());

    let submission = Submission {
        id: claim.id,
        user_id: user.id,
        username: user.username.clone(),
        campaign_id: claim.campaign_id,
        campaign_title,
        reward_amount: reward,
        status: if claim.viral {
            SubmissionStatus::ViralClaim
        } else {
            SubmissionStatus::Pending
        },
        is_viral_bonus: claim.viral,
        external_link: claim.proof.link().to_string(),
        social_handle: claim.proof.handle().to_string(),
        platform: claim.platform,
        created_at: now,
        reviewed_by: None,
        reviewed_at: None,
        rejection_reason: None,
    };
    state.submissions.insert(0, submission.clone());
    Ok(submission)
}

/// Owner and reward of a submission that may still be decided
fn open_submission(
    state: &MarketState,
    id: &SubmissionId,
) -> MarketResult<(UserId, Amount)> {
    let submission = state
        .submission(id)
        .ok_or(MarketError::NotFound("Submission"))?;
    if !submission.status.is_open() {
        return Err(MarketError::NotPending);
    }
    Ok((submission.user_id, submission.reward_amount))
}
