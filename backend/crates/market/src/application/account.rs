//! A user's own wallet view, history and payout settings

use kernel::id::UserId;
use ledger::{
    AppLog, Balances, LogKind, PayoutMethod, PayoutRequest, PayoutTarget, StateStore, Submission,
    UserRole,
};
use ledger::domain::value_object::payout_method::PAYOUT_DETAILS_MAX_LENGTH;
use serde::Serialize;

use crate::application::admin::personal_history;
use crate::application::context::MarketContext;
use crate::error::{MarketError, MarketResult};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletView {
    pub user_id: UserId,
    pub username: String,
    pub role: UserRole,
    #[serde(flatten)]
    pub balances: Balances,
    pub payout_target: Option<PayoutTarget>,
    pub saved_social_handle: Option<String>,
    pub unread_messages: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountHistory {
    pub logs: Vec<AppLog>,
    pub submissions: Vec<Submission>,
    pub payouts: Vec<PayoutRequest>,
}

pub struct Account<S> {
    ctx: MarketContext<S>,
}

impl<S> Account<S>
where
    S: StateStore + Sync,
{
    pub fn new(ctx: MarketContext<S>) -> Self {
        Self { ctx }
    }

    pub async fn wallet(&self, user_id: UserId) -> MarketResult<WalletView> {
        self.ctx
            .gate
            .read(|s| -> MarketResult<WalletView> {
                let user = s.user(&user_id).ok_or(MarketError::NotFound("User"))?;
                let unread_messages = s
                    .broadcasts
                    .iter()
                    .filter(|b| b.is_visible_to(&user_id) && !user.has_read(&b.id))
                    .count();
                Ok(WalletView {
                    user_id,
                    username: user.username.clone(),
                    role: user.role,
                    balances: *user.balances(),
                    payout_target: user.payout_target(),
                    saved_social_handle: user.saved_social_handle.clone(),
                    unread_messages,
                })
            })
            .await
    }

    /// The user's verify, viral and payout log entries plus their own
    /// submissions and payout requests
    pub async fn history(&self, user_id: UserId) -> MarketResult<AccountHistory> {
        self.ctx
            .gate
            .read(|s| -> MarketResult<AccountHistory> {
                if s.user(&user_id).is_none() {
                    return Err(MarketError::NotFound("User"));
                }
                Ok(AccountHistory {
                    logs: personal_history(s, &user_id),
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

    /// Where future payouts go; requests already filed keep their snapshot
    pub async fn set_payout_settings(
        &self,
        user_id: UserId,
        method: PayoutMethod,
        details: &str,
    ) -> MarketResult<PayoutTarget> {
        let details = details.trim().to_string();
        if details.is_empty() {
            return Err(MarketError::validation("Payout details are required"));
        }
        if details.chars().count() > PAYOUT_DETAILS_MAX_LENGTH {
            return Err(MarketError::validation(format!(
                "Payout details must be at most {PAYOUT_DETAILS_MAX_LENGTH} characters"
            )));
        }

        let target = self
            .ctx
            .gate
            .mutate(|state| -> MarketResult<PayoutTarget> {
                let user = state
                    .user_mut(&user_id)
                    .ok_or(MarketError::NotFound("User"))?;
                user.payout_method = Some(method);
                user.payout_details = Some(details);
                let target = user
                    .payout_target()
                    .ok_or_else(|| MarketError::validation("Payout details are required"))?;

                let entry = self.ctx.log_for(
                    LogKind::Action,
                    format!("Payout method set to {method}"),
                    user,
                );
                state.record_log(entry);
                Ok(target)
            })
            .await?;

        tracing::info!(user_id = %user_id, method = %method, "Payout settings updated");
        Ok(target)
    }
}
