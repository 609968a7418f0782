//! Cashflow Guard
//!
//! Caps what the platform may owe in one day. Exposure is everything users
//! could claim right now: all wallet balances plus every open payout
//! request, except the request being decided.

use kernel::id::PayoutRequestId;
use ledger::{Amount, MarketState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capacity {
    Allowed {
        /// Headroom left after this amount
        remaining: Amount,
    },
    Exceeded {
        limit: Amount,
        exposure: Amount,
        available: Amount,
    },
}

impl Capacity {
    #[inline]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Capacity::Allowed { .. })
    }
}

pub struct CashflowGuard;

impl CashflowGuard {
    pub fn exposure(state: &MarketState, excluding: Option<&PayoutRequestId>) -> Amount {
        let open: Amount = state
            .open_payouts()
            .filter(|p| Some(&p.id) != excluding)
            .map(|p| p.amount)
            .sum();
        Amount::from_minor(state.total_wallet().minor().saturating_add(open.minor()))
    }

    /// Allowed iff `amount <= daily_limit - exposure`
    pub fn evaluate(limit: Amount, exposure: Amount, amount: Amount) -> Capacity {
        let available = limit.saturating_sub(exposure);
        if amount <= available {
            Capacity::Allowed {
                remaining: available.saturating_sub(amount),
            }
        } else {
            Capacity::Exceeded {
                limit,
                exposure,
                available,
            }
        }
    }

    pub fn check_capacity(
        state: &MarketState,
        amount: Amount,
        excluding: Option<&PayoutRequestId>,
    ) -> Capacity {
        Self::evaluate(
            state.cashflow.daily_limit,
            Self::exposure(state, excluding),
            amount,
        )
    }

    /// Headroom under the daily limit with nothing being decided
    pub fn remaining(state: &MarketState) -> Amount {
        state
            .cashflow
            .daily_limit
            .saturating_sub(Self::exposure(state, None))
    }
}
