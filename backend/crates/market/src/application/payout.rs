//! Payout Workflow
//!
//! `Pending -> Hold`, `Pending | Hold -> Approved | Rejected`.
//!
//! With the default [`PayoutDebitTiming::OnApproval`] a request only
//! reserves: the wallet is debited when an admin approves, after the
//! cashflow guard allowed it. With [`PayoutDebitTiming::OnRequest`] the
//! wallet is debited up front and a rejection refunds it.
//!
//! [`PayoutDebitTiming::OnApproval`]: crate::application::config::PayoutDebitTiming::OnApproval
//! [`PayoutDebitTiming::OnRequest`]: crate::application::config::PayoutDebitTiming::OnRequest

use kernel::id::{IdGeneratorExt, PayoutRequestId, UserId};
use ledger::{
    Amount, Ledger, LedgerError, LogKind, MarketState, PayoutRequest, PayoutStatus, StateStore,
};

use crate::application::context::MarketContext;
use crate::domain::{Capacity, CashflowGuard};
use crate::error::{MarketError, MarketResult};

pub struct PayoutWorkflow<S> {
    ctx: MarketContext<S>,
}

impl<S> PayoutWorkflow<S>
where
    S: StateStore + Sync,
{
    pub fn new(ctx: MarketContext<S>) -> Self {
        Self { ctx }
    }

    /// File a withdrawal request against the user's wallet
    pub async fn request(&self, user_id: UserId, amount: Amount) -> MarketResult<PayoutRequest> {
        let request_id: PayoutRequestId = self.ctx.ids.next_id();
        let now = self.ctx.clock.now();
        let debit_now = self.ctx.config.debits_on_request();

        let request = self
            .ctx
            .gate
            .mutate(|state| -> MarketResult<PayoutRequest> {
                let minimum = state.config.min_withdrawal;
                if amount < minimum {
                    return Err(MarketError::BelowMinimum {
                        minimum,
                        requested: amount,
                    });
                }
                if amount.is_zero() {
                    return Err(MarketError::validation("Amount must be positive"));
                }

                let user = state
                    .user_mut(&user_id)
                    .ok_or(MarketError::NotFound("User"))?;
                let available = user.balances().wallet();
                if amount > available {
                    return Err(MarketError::InsufficientBalance {
                        available,
                        requested: amount,
                    });
                }
                let target = user
                    .payout_target()
                    .ok_or(MarketError::PayoutTargetMissing)?;

                if debit_now {
                    Ledger::withdraw(user, amount)?;
                }

                let request = PayoutRequest {
                    id: request_id,
                    user_id,
                    username: user.username.clone(),
                    amount,
                    method: target,
                    status: PayoutStatus::Pending,
                    created_at: now,
                    debited: debit_now,
                    resolved_by: None,
                    resolved_at: None,
                };
                let entry = self.ctx.log_for(
                    LogKind::Payout,
                    format!("Requested withdrawal {amount} via {}", request.method.method),
                    user,
                );
                state.payout_requests.insert(0, request.clone());
                state.record_log(entry);
                Ok(request)
            })
            .await?;

        tracing::info!(
            request_id = %request.id,
            user_id = %user_id,
            amount = %amount,
            debited = request.debited,
            "Payout requested"
        );
        Ok(request)
    }

    /// Pay out after the cashflow guard allows the amount
    pub async fn approve(
        &self,
        request_id: PayoutRequestId,
        admin_id: UserId,
    ) -> MarketResult<PayoutRequest> {
        let now = self.ctx.clock.now();
        let today = now.date_naive();

        let request = self
            .ctx
            .gate
            .mutate(|state| -> MarketResult<PayoutRequest> {
                let request = open_request(state, &request_id)?;
                let (user_id, amount, debited) = (request.user_id, request.amount, request.debited);

                if let Capacity::Exceeded {
                    limit,
                    exposure,
                    available,
                } = CashflowGuard::check_capacity(state, amount, Some(&request_id))
                {
                    return Err(MarketError::CapacityExceeded {
                        limit,
                        exposure,
                        requested: amount,
                        available,
                    });
                }

                let user = state.require_user_mut(&user_id)?;
                if !debited {
                    Ledger::withdraw(user, amount).map_err(|e| match e {
                        LedgerError::InsufficientAvailable {
                            available,
                            requested,
                        } => MarketError::InsufficientBalance {
                            available,
                            requested,
                        },
                        other => other.into(),
                    })?;
                }
                let entry = self.ctx.log_for(
                    LogKind::Payout,
                    format!("Withdrawal {amount} approved"),
                    user,
                );

                state.cashflow.record_spend(amount, today);
                let request = resolve(state, &request_id, PayoutStatus::Approved, admin_id, now)?;
                state.record_log(entry);
                Ok(request)
            })
            .await?;

        tracing::info!(
            request_id = %request_id,
            admin_id = %admin_id,
            amount = %request.amount,
            "Payout approved"
        );
        Ok(request)
    }

    /// Decline; a request that was debited up front is refunded
    pub async fn reject(
        &self,
        request_id: PayoutRequestId,
        admin_id: UserId,
    ) -> MarketResult<PayoutRequest> {
        let now = self.ctx.clock.now();

        let request = self
            .ctx
            .gate
            .mutate(|state| -> MarketResult<PayoutRequest> {
                let request = open_request(state, &request_id)?;
                let (user_id, amount, debited) = (request.user_id, request.amount, request.debited);

                let user = state.require_user_mut(&user_id)?;
                if debited {
                    Ledger::refund_withdrawal(user, amount)?;
                }
                let entry = self.ctx.log_for(
                    LogKind::Payout,
                    format!("Withdrawal {amount} rejected"),
                    user,
                );

                let request = resolve(state, &request_id, PayoutStatus::Rejected, admin_id, now)?;
                state.record_log(entry);
                Ok(request)
            })
            .await?;

        tracing::info!(
            request_id = %request_id,
            admin_id = %admin_id,
            refunded = request.debited,
            "Payout rejected"
        );
        Ok(request)
    }

    /// Park a pending request for later review
    pub async fn hold(
        &self,
        request_id: PayoutRequestId,
        admin_id: UserId,
    ) -> MarketResult<PayoutRequest> {
        let request = self
            .ctx
            .gate
            .mutate(|state| -> MarketResult<PayoutRequest> {
                let request = state
                    .payout_mut(&request_id)
                    .ok_or(MarketError::NotFound("Payout request"))?;
                if request.status != PayoutStatus::Pending {
                    return Err(MarketError::NotPending);
                }
                request.status = PayoutStatus::Hold;
                let request = request.clone();

                let entry = self.ctx.admin_log(
                    admin_id,
                    format!("Payout of {} for @{} put on hold", request.amount, request.username),
                );
                state.record_log(entry);
                Ok(request)
            })
            .await?;

        tracing::info!(request_id = %request_id, admin_id = %admin_id, "Payout held");
        Ok(request)
    }

    /// Pending and held requests, newest first
    pub async fn queue(&self) -> Vec<PayoutRequest> {
        self.ctx
            .gate
            .read(|s| s.open_payouts().cloned().collect())
            .await
    }
}

fn open_request<'a>(
    state: &'a MarketState,
    id: &PayoutRequestId,
) -> MarketResult<&'a PayoutRequest> {
    let request = state
        .payout(id)
        .ok_or(MarketError::NotFound("Payout request"))?;
    if !request.status.is_open() {
        return Err(MarketError::NotPending);
    }
    Ok(request)
}

fn resolve(
    state: &mut MarketState,
    id: &PayoutRequestId,
    status: PayoutStatus,
    admin_id: UserId,
    at: chrono::DateTime<chrono::Utc>,
) -> MarketResult<PayoutRequest> {
    let request = state
        .payout_mut(id)
        .ok_or(MarketError::NotFound("Payout request"))?;
    request.resolve(status, admin_id, at);
    Ok(request.clone())
}
