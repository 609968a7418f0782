//! HTTP Handlers
//!
//! Every handler runs behind `require_session`, so `CurrentUser` is always
//! present in the request extensions.

use std::sync::Arc;

use auth::CurrentUser;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use kernel::id::{BroadcastId, CampaignId, PayoutRequestId, ReportId, SubmissionId, UserId};
use ledger::{
    AppLog, Broadcast, Campaign, PayoutRequest, PayoutTarget, Report, StateStore, Submission,
};

use crate::application::{
    Account, AccountHistory, AdminConsole, CampaignAdmin, InboxMessage, MarketContext, Messaging,
    PayoutWorkflow, SubmissionWorkflow, SubmitBatchInput, SubmitProofInput, UserDetail,
    UserSummary, WalletView,
};
use crate::domain::{Dashboard, ProofOracle};
use crate::error::MarketResult;
use crate::presentation::dto::{
    AmountRequest, BroadcastRequest, CampaignRequest, LogsQuery, PayoutSettingsRequest,
    RejectSubmissionRequest, ReportRequest, SetStatusRequest, SubmitBatchRequest,
    SubmitProofRequest, SubmitProofResponse,
};

/// Shared state for market handlers
pub struct MarketAppState<S, O> {
    pub ctx: MarketContext<S>,
    pub oracle: Arc<O>,
}

// Manual impl: neither `S` nor `O` need be Clone
impl<S, O> Clone for MarketAppState<S, O> {
    fn clone(&self) -> Self {
        Self {
            ctx: self.ctx.clone(),
            oracle: self.oracle.clone(),
        }
    }
}

impl<S, O> MarketAppState<S, O>
where
    S: StateStore + Sync,
    O: ProofOracle + Sync,
{
    pub fn new(ctx: MarketContext<S>, oracle: Arc<O>) -> Self {
        Self { ctx, oracle }
    }

    fn submissions(&self) -> SubmissionWorkflow<S, O> {
        SubmissionWorkflow::new(self.ctx.clone(), self.oracle.clone())
    }

    fn payouts(&self) -> PayoutWorkflow<S> {
        PayoutWorkflow::new(self.ctx.clone())
    }

    fn campaigns(&self) -> CampaignAdmin<S> {
        CampaignAdmin::new(self.ctx.clone())
    }

    fn account(&self) -> Account<S> {
        Account::new(self.ctx.clone())
    }

    fn admin(&self) -> AdminConsole<S> {
        AdminConsole::new(self.ctx.clone())
    }

    fn messaging(&self) -> Messaging<S> {
        Messaging::new(self.ctx.clone())
    }
}

// ============================================================================
// Creator Routes
// ============================================================================

/// GET /api/campaigns
pub async fn active_campaigns<S, O>(
    State(state): State<MarketAppState<S, O>>,
) -> Json<Vec<Campaign>>
where
    S: StateStore + Send + Sync + 'static,
    O: ProofOracle + Send + Sync + 'static,
{
    Json(state.campaigns().active().await)
}

/// POST /api/submissions
pub async fn submit_proof<S, O>(
    State(state): State<MarketAppState<S, O>>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<SubmitProofRequest>,
) -> MarketResult<(StatusCode, Json<SubmitProofResponse>)>
where
    S: StateStore + Send + Sync + 'static,
    O: ProofOracle + Send + Sync + 'static,
{
    let output = state
        .submissions()
        .submit(SubmitProofInput {
            user_id: current.user_id,
            campaign_id: req.campaign_id,
            link: req.link,
            handle: req.handle,
            platform: req.platform,
            viral: req.viral,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitProofResponse::new(output.submission, output.check)),
    ))
}

/// POST /api/submissions/batch
pub async fn submit_batch<S, O>(
    State(state): State<MarketAppState<S, O>>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<SubmitBatchRequest>,
) -> MarketResult<(StatusCode, Json<Vec<Submission>>)>
where
    S: StateStore + Send + Sync + 'static,
    O: ProofOracle + Send + Sync + 'static,
{
    let submissions = state
        .submissions()
        .submit_batch(SubmitBatchInput {
            user_id: current.user_id,
            handle: req.handle,
            platform: req.platform,
            items: req.items.into_iter().map(Into::into).collect(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(submissions)))
}

/// GET /api/me
pub async fn wallet<S, O>(
    State(state): State<MarketAppState<S, O>>,
    Extension(current): Extension<CurrentUser>,
) -> MarketResult<Json<WalletView>>
where
    S: StateStore + Send + Sync + 'static,
    O: ProofOracle + Send + Sync + 'static,
{
    Ok(Json(state.account().wallet(current.user_id).await?))
}

/// GET /api/me/history
pub async fn history<S, O>(
    State(state): State<MarketAppState<S, O>>,
    Extension(current): Extension<CurrentUser>,
) -> MarketResult<Json<AccountHistory>>
where
    S: StateStore + Send + Sync + 'static,
    O: ProofOracle + Send + Sync + 'static,
{
    Ok(Json(state.account().history(current.user_id).await?))
}

/// PUT /api/me/payout-settings
pub async fn set_payout_settings<S, O>(
    State(state): State<MarketAppState<S, O>>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<PayoutSettingsRequest>,
) -> MarketResult<Json<PayoutTarget>>
where
    S: StateStore + Send + Sync + 'static,
    O: ProofOracle + Send + Sync + 'static,
{
    let target = state
        .account()
        .set_payout_settings(current.user_id, req.method, &req.details)
        .await?;
    Ok(Json(target))
}

/// POST /api/payouts
pub async fn request_payout<S, O>(
    State(state): State<MarketAppState<S, O>>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<AmountRequest>,
) -> MarketResult<(StatusCode, Json<PayoutRequest>)>
where
    S: StateStore + Send + Sync + 'static,
    O: ProofOracle + Send + Sync + 'static,
{
    let request = state.payouts().request(current.user_id, req.amount).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// GET /api/inbox
pub async fn inbox<S, O>(
    State(state): State<MarketAppState<S, O>>,
    Extension(current): Extension<CurrentUser>,
) -> MarketResult<Json<Vec<InboxMessage>>>
where
    S: StateStore + Send + Sync + 'static,
    O: ProofOracle + Send + Sync + 'static,
{
    Ok(Json(state.messaging().inbox(current.user_id).await?))
}

/// POST /api/inbox/{id}/read
pub async fn mark_read<S, O>(
    State(state): State<MarketAppState<S, O>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<BroadcastId>,
) -> MarketResult<StatusCode>
where
    S: StateStore + Send + Sync + 'static,
    O: ProofOracle + Send + Sync + 'static,
{
    state.messaging().mark_read(current.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/reports
pub async fn file_report<S, O>(
    State(state): State<MarketAppState<S, O>>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<ReportRequest>,
) -> MarketResult<(StatusCode, Json<Report>)>
where
    S: StateStore + Send + Sync + 'static,
    O: ProofOracle + Send + Sync + 'static,
{
    let report = state
        .messaging()
        .file_report(current.user_id, &req.message)
        .await?;
    Ok((StatusCode::CREATED, Json(report)))
}

// ============================================================================
// Admin: Overview
// ============================================================================

/// GET /api/admin/dashboard
pub async fn dashboard<S, O>(State(state): State<MarketAppState<S, O>>) -> Json<Dashboard>
where
    S: StateStore + Send + Sync + 'static,
    O: ProofOracle + Send + Sync + 'static,
{
    Json(state.admin().dashboard().await)
}

/// GET /api/admin/users
pub async fn users<S, O>(State(state): State<MarketAppState<S, O>>) -> Json<Vec<UserSummary>>
where
    S: StateStore + Send + Sync + 'static,
    O: ProofOracle + Send + Sync + 'static,
{
    Json(state.admin().users().await)
}

/// GET /api/admin/users/{id}
pub async fn user_detail<S, O>(
    State(state): State<MarketAppState<S, O>>,
    Path(id): Path<UserId>,
) -> MarketResult<Json<UserDetail>>
where
    S: StateStore + Send + Sync + 'static,
    O: ProofOracle + Send + Sync + 'static,
{
    Ok(Json(state.admin().user_detail(id).await?))
}

/// PUT /api/admin/users/{id}/status
pub async fn set_user_status<S, O>(
    State(state): State<MarketAppState<S, O>>,
    Extension(admin): Extension<CurrentUser>,
    Path(id): Path<UserId>,
    Json(req): Json<SetStatusRequest>,
) -> MarketResult<Json<UserSummary>>
where
    S: StateStore + Send + Sync + 'static,
    O: ProofOracle + Send + Sync + 'static,
{
    let summary = state
        .admin()
        .set_user_status(admin.user_id, id, req.status)
        .await?;
    Ok(Json(summary))
}

/// GET /api/admin/logs
pub async fn logs<S, O>(
    State(state): State<MarketAppState<S, O>>,
    Query(query): Query<LogsQuery>,
) -> Json<Vec<AppLog>>
where
    S: StateStore + Send + Sync + 'static,
    O: ProofOracle + Send + Sync + 'static,
{
    Json(state.admin().logs(query.limit).await)
}

/// PUT /api/admin/cashflow/daily-limit
pub async fn set_daily_limit<S, O>(
    State(state): State<MarketAppState<S, O>>,
    Extension(admin): Extension<CurrentUser>,
    Json(req): Json<AmountRequest>,
) -> MarketResult<Json<AmountRequest>>
where
    S: StateStore + Send + Sync + 'static,
    O: ProofOracle + Send + Sync + 'static,
{
    let amount = state
        .admin()
        .set_daily_limit(admin.user_id, req.amount)
        .await?;
    Ok(Json(AmountRequest { amount }))
}

/// PUT /api/admin/config/min-withdrawal
pub async fn set_min_withdrawal<S, O>(
    State(state): State<MarketAppState<S, O>>,
    Extension(admin): Extension<CurrentUser>,
    Json(req): Json<AmountRequest>,
) -> MarketResult<Json<AmountRequest>>
where
    S: StateStore + Send + Sync + 'static,
    O: ProofOracle + Send + Sync + 'static,
{
    let amount = state
        .admin()
        .set_min_withdrawal(admin.user_id, req.amount)
        .await?;
    Ok(Json(AmountRequest { amount }))
}

// ============================================================================
// Admin: Submission Audit
// ============================================================================

/// GET /api/admin/submissions
pub async fn open_submissions<S, O>(
    State(state): State<MarketAppState<S, O>>,
) -> Json<Vec<Submission>>
where
    S: StateStore + Send + Sync + 'static,
    O: ProofOracle + Send + Sync + 'static,
{
    Json(state.submissions().open().await)
}

/// POST /api/admin/submissions/{id}/approve
pub async fn approve_submission<S, O>(
    State(state): State<MarketAppState<S, O>>,
    Extension(admin): Extension<CurrentUser>,
    Path(id): Path<SubmissionId>,
) -> MarketResult<Json<Submission>>
where
    S: StateStore + Send + Sync + 'static,
    O: ProofOracle + Send + Sync + 'static,
{
    Ok(Json(state.submissions().approve(id, admin.user_id).await?))
}

/// POST /api/admin/submissions/{id}/reject
pub async fn reject_submission<S, O>(
    State(state): State<MarketAppState<S, O>>,
    Extension(admin): Extension<CurrentUser>,
    Path(id): Path<SubmissionId>,
    Json(req): Json<RejectSubmissionRequest>,
) -> MarketResult<Json<Submission>>
where
    S: StateStore + Send + Sync + 'static,
    O: ProofOracle + Send + Sync + 'static,
{
    let submission = state
        .submissions()
        .reject(id, admin.user_id, req.reason)
        .await?;
    Ok(Json(submission))
}

// ============================================================================
// Admin: Payout Queue
// ============================================================================

/// GET /api/admin/payouts
pub async fn payout_queue<S, O>(
    State(state): State<MarketAppState<S, O>>,
) -> Json<Vec<PayoutRequest>>
where
    S: StateStore + Send + Sync + 'static,
    O: ProofOracle + Send + Sync + 'static,
{
    Json(state.payouts().queue().await)
}

/// POST /api/admin/payouts/{id}/approve
pub async fn approve_payout<S, O>(
    State(state): State<MarketAppState<S, O>>,
    Extension(admin): Extension<CurrentUser>,
    Path(id): Path<PayoutRequestId>,
) -> MarketResult<Json<PayoutRequest>>
where
    S: StateStore + Send + Sync + 'static,
    O: ProofOracle + Send + Sync + 'static,
{
    Ok(Json(state.payouts().approve(id, admin.user_id).await?))
}

/// POST /api/admin/payouts/{id}/reject
pub async fn reject_payout<S, O>(
    State(state): State<MarketAppState<S, O>>,
    Extension(admin): Extension<CurrentUser>,
    Path(id): Path<PayoutRequestId>,
) -> MarketResult<Json<PayoutRequest>>
where
    S: StateStore + Send + Sync + 'static,
    O: ProofOracle + Send + Sync + 'static,
{
    Ok(Json(state.payouts().reject(id, admin.user_id).await?))
}

/// POST /api/admin/payouts/{id}/hold
pub async fn hold_payout<S, O>(
    State(state): State<MarketAppState<S, O>>,
    Extension(admin): Extension<CurrentUser>,
    Path(id): Path<PayoutRequestId>,
) -> MarketResult<Json<PayoutRequest>>
where
    S: StateStore + Send + Sync + 'static,
    O: ProofOracle + Send + Sync + 'static,
{
    Ok(Json(state.payouts().hold(id, admin.user_id).await?))
}

// ============================================================================
// Admin: Campaigns
// ============================================================================

/// GET /api/admin/campaigns
pub async fn all_campaigns<S, O>(State(state): State<MarketAppState<S, O>>) -> Json<Vec<Campaign>>
where
    S: StateStore + Send + Sync + 'static,
    O: ProofOracle + Send + Sync + 'static,
{
    Json(state.campaigns().all().await)
}

/// POST /api/admin/campaigns
pub async fn create_campaign<S, O>(
    State(state): State<MarketAppState<S, O>>,
    Extension(admin): Extension<CurrentUser>,
    Json(req): Json<CampaignRequest>,
) -> MarketResult<(StatusCode, Json<Campaign>)>
where
    S: StateStore + Send + Sync + 'static,
    O: ProofOracle + Send + Sync + 'static,
{
    let campaign = state.campaigns().create(admin.user_id, req.into()).await?;
    Ok((StatusCode::CREATED, Json(campaign)))
}

/// PUT /api/admin/campaigns/{id}
pub async fn edit_campaign<S, O>(
    State(state): State<MarketAppState<S, O>>,
    Extension(admin): Extension<CurrentUser>,
    Path(id): Path<CampaignId>,
    Json(req): Json<CampaignRequest>,
) -> MarketResult<Json<Campaign>>
where
    S: StateStore + Send + Sync + 'static,
    O: ProofOracle + Send + Sync + 'static,
{
    let campaign = state
        .campaigns()
        .edit(admin.user_id, id, req.into())
        .await?;
    Ok(Json(campaign))
}

/// POST /api/admin/campaigns/{id}/toggle
pub async fn toggle_campaign<S, O>(
    State(state): State<MarketAppState<S, O>>,
    Extension(admin): Extension<CurrentUser>,
    Path(id): Path<CampaignId>,
) -> MarketResult<Json<Campaign>>
where
    S: StateStore + Send + Sync + 'static,
    O: ProofOracle + Send + Sync + 'static,
{
    Ok(Json(state.campaigns().toggle(admin.user_id, id).await?))
}

/// DELETE /api/admin/campaigns/{id}
pub async fn delete_campaign<S, O>(
    State(state): State<MarketAppState<S, O>>,
    Extension(admin): Extension<CurrentUser>,
    Path(id): Path<CampaignId>,
) -> MarketResult<StatusCode>
where
    S: StateStore + Send + Sync + 'static,
    O: ProofOracle + Send + Sync + 'static,
{
    state.campaigns().delete(admin.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Admin: Broadcasts and Reports
// ============================================================================

/// POST /api/admin/broadcasts
pub async fn broadcast<S, O>(
    State(state): State<MarketAppState<S, O>>,
    Extension(admin): Extension<CurrentUser>,
    Json(req): Json<BroadcastRequest>,
) -> MarketResult<(StatusCode, Json<Broadcast>)>
where
    S: StateStore + Send + Sync + 'static,
    O: ProofOracle + Send + Sync + 'static,
{
    let broadcast = state
        .messaging()
        .broadcast(admin.user_id, &req.content, req.target_user_id)
        .await?;
    Ok((StatusCode::CREATED, Json(broadcast)))
}

/// GET /api/admin/reports
pub async fn reports<S, O>(State(state): State<MarketAppState<S, O>>) -> Json<Vec<Report>>
where
    S: StateStore + Send + Sync + 'static,
    O: ProofOracle + Send + Sync + 'static,
{
    Json(state.messaging().reports().await)
}

/// POST /api/admin/reports/{id}/resolve
pub async fn resolve_report<S, O>(
    State(state): State<MarketAppState<S, O>>,
    Extension(admin): Extension<CurrentUser>,
    Path(id): Path<ReportId>,
) -> MarketResult<Json<Report>>
where
    S: StateStore + Send + Sync + 'static,
    O: ProofOracle + Send + Sync + 'static,
{
    Ok(Json(state.messaging().resolve_report(admin.user_id, id).await?))
}
