//! Admin Console
//!
//! Account status changes, runtime platform policy and the read models the
//! admin views are built from.

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use ledger::{
    AppLog, Amount, Balances, MarketState, PayoutMethod, PayoutRequest, StateStore, Submission,
    User, UserRole, UserStatus,
};
use serde::Serialize;

use crate::application::context::MarketContext;
use crate::domain::Dashboard;
use crate::error::{MarketError, MarketResult};

/// One row of the member list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
    #[serde(flatten)]
    pub balances: Balances,
    pub joined_at: DateTime<Utc>,
    pub locked_until: Option<DateTime<Utc>>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
            status: user.status,
            balances: *user.balances(),
            joined_at: user.joined_at,
            locked_until: user.lockout_until,
        }
    }
}

/// Everything an admin needs to audit one account
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetail {
    #[serde(flatten)]
    pub summary: UserSummary,
    pub failed_attempts: u32,
    pub payout_method: Option<PayoutMethod>,
    pub payout_details: Option<String>,
    pub saved_social_handle: Option<String>,
    pub history: Vec<AppLog>,
    pub submissions: Vec<Submission>,
    pub payouts: Vec<PayoutRequest>,
}

/// Verify, viral and payout entries of one user, newest first
pub(crate) fn personal_history(state: &MarketState, user_id: &UserId) -> Vec<AppLog> {
    state
        .logs
        .iter()
        .filter(|l| l.user_id.as_ref() == Some(user_id) && l.kind.is_personal_history())
        .cloned()
        .collect()
}

pub struct AdminConsole<S> {
    ctx: MarketContext<S>,
}

impl<S> AdminConsole<S>
where
    S: StateStore + Sync,
{
    pub fn new(ctx: MarketContext<S>) -> Self {
        Self { ctx }
    }

    /// Suspend, ban or reactivate an account. Banned is final and admins
    /// cannot change their own status.
    pub async fn set_user_status(
        &self,
        admin_id: UserId,
        user_id: UserId,
        status: UserStatus,
    ) -> MarketResult<UserSummary> {
        if admin_id == user_id {
            return Err(MarketError::validation("Admins cannot change their own status"));
        }

        let summary = self
            .ctx
            .gate
            .mutate(|state| -> MarketResult<UserSummary> {
                let user = state
                    .user_mut(&user_id)
                    .ok_or(MarketError::NotFound("User"))?;
                if !user.status.can_transition_to(status) {
                    return Err(MarketError::InvalidTransition {
                        from: user.status,
                        to: status,
                    });
                }
                user.status = status;
                let summary = UserSummary::from(&*user);

                let entry = self
                    .ctx
                    .admin_log(admin_id, format!("User @{} set to {status}", summary.username));
                state.record_log(entry);
                Ok(summary)
            })
            .await?;

        tracing::info!(
            user_id = %user_id,
            admin_id = %admin_id,
            status = %status,
            "User status changed"
        );
        Ok(summary)
    }

    pub async fn set_daily_limit(&self, admin_id: UserId, limit: Amount) -> MarketResult<Amount> {
        self.ctx
            .gate
            .mutate(|state| -> MarketResult<()> {
                state.cashflow.daily_limit = limit;
                let entry = self
                    .ctx
                    .admin_log(admin_id, format!("Daily liquidity updated to {limit}"));
                state.record_log(entry);
                Ok(())
            })
            .await?;

        tracing::info!(admin_id = %admin_id, limit = %limit, "Daily limit changed");
        Ok(limit)
    }

    pub async fn set_min_withdrawal(
        &self,
        admin_id: UserId,
        minimum: Amount,
    ) -> MarketResult<Amount> {
        self.ctx
            .gate
            .mutate(|state| -> MarketResult<()> {
                state.config.min_withdrawal = minimum;
                let entry = self
                    .ctx
                    .admin_log(admin_id, format!("Minimum withdrawal updated to {minimum}"));
                state.record_log(entry);
                Ok(())
            })
            .await?;

        tracing::info!(admin_id = %admin_id, minimum = %minimum, "Minimum withdrawal changed");
        Ok(minimum)
    }

    pub async fn users(&self) -> Vec<UserSummary> {
        self.ctx
            .gate
            .read(|s| s.users.iter().map(UserSummary::from).collect())
            .await
    }

    pub async fn user_detail(&self, user_id: UserId) -> MarketResult<UserDetail> {
        self.ctx
            .gate
            .read(|s| -> MarketResult<UserDetail> {
                let user = s.user(&user_id).ok_or(MarketError::NotFound("User"))?;
                Ok(UserDetail {
                    summary: user.into(),
                    failed_attempts: user.failed_attempts,
                    payout_method: user.payout_method,
                    payout_details: user.payout_details.clone(),
                    saved_social_handle: user.saved_social_handle.clone(),
                    history: personal_history(s, &user_id),
                    submissions: s
                        .submissions
                        .iter()
                        .filter(|sub| sub.user_id == user_id)
                        .cloned()
                        .collect(),
                    payouts: s
                        .payout_requests
                        .iter()
                        .filter(|p| p.user_id == user_id)
                        .cloned()
                        .collect(),
                })
            })
            .await
    }

    /// The whole activity log, newest first
    pub async fn logs(&self, limit: Option<usize>) -> Vec<AppLog> {
        self.ctx
            .gate
            .read(|s| {
                s.logs
                    .iter()
                    .take(limit.unwrap_or(usize::MAX))
                    .cloned()
                    .collect()
            })
            .await
    }

    pub async fn dashboard(&self) -> Dashboard {
        self.ctx.gate.read(Dashboard::from_state).await
    }
}
