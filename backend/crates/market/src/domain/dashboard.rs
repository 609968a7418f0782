//! Admin dashboard figures, computed from one consistent state snapshot

use ledger::{Amount, MarketState, PayoutStatus};
use serde::Serialize;

use crate::domain::cashflow_guard::CashflowGuard;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    /// Non-admin accounts
    pub total_users: usize,
    /// Sum of wallet balances
    pub wallet_pool: Amount,
    /// Sum of balances locked for audit
    pub capital_in_audit: Amount,
    pub pending_payout_count: usize,
    pub pending_payout_amount: Amount,
    pub held_payout_count: usize,
    /// Audit capital plus open payouts
    pub pending_cashflow: Amount,
    pub daily_limit: Amount,
    pub today_spent: Amount,
    pub remaining: Amount,
}

impl Dashboard {
    pub fn from_state(state: &MarketState) -> Self {
        let pending = || {
            state
                .payout_requests
                .iter()
                .filter(|p| p.status == PayoutStatus::Pending)
        };
        let open_amount: Amount = state.open_payouts().map(|p| p.amount).sum();
        let capital_in_audit = state.total_pending();

        Self {
            total_users: state.users.iter().filter(|u| !u.is_admin()).count(),
            wallet_pool: state.total_wallet(),
            capital_in_audit,
            pending_payout_count: pending().count(),
            pending_payout_amount: pending().map(|p| p.amount).sum(),
            held_payout_count: state
                .payout_requests
                .iter()
                .filter(|p| p.status == PayoutStatus::Hold)
                .count(),
            pending_cashflow: [capital_in_audit, open_amount].into_iter().sum(),
            daily_limit: state.cashflow.daily_limit,
            today_spent: state.cashflow.today_spent,
            remaining: CashflowGuard::remaining(state),
        }
    }
}
