//! Ledger
//!
//! The single writer of wallet, pending and lifetime-earnings balances.
//! Every transition is a delta on one user record and either applies in
//! full or leaves the record untouched.
//!
//! ```text
//! unearned --lock_for_audit--> pending --settle_approved--> wallet --withdraw--> paid out
//!                                 |                            ^
//!                                 +--forfeit_rejected--> gone  +--refund_withdrawal
//! ```

use crate::domain::entity::User;
use crate::domain::value_object::Amount;
use crate::error::{LedgerError, LedgerResult};

pub struct Ledger;

impl Ledger {
    /// A submission entered audit: `pending += amount`
    pub fn lock_for_audit(user: &mut User, amount: Amount) -> LedgerResult<()> {
        let balances = user.balances_mut();
        balances.pending_balance = balances
            .pending_balance
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;

        tracing::info!(
            user_id = %user.id,
            amount = %amount,
            pending = %user.balances().pending(),
            "Balance locked for audit"
        );
        Ok(())
    }

    /// A submission was approved: `pending -= amount; wallet += amount;
    /// total_earnings += amount`
    pub fn settle_approved(user: &mut User, amount: Amount) -> LedgerResult<()> {
        let current = *user.balances();
        let pending = current
            .pending_balance
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientLocked {
                locked: current.pending_balance,
                requested: amount,
            })?;
        let wallet = current
            .wallet_balance
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        let earned = current
            .total_earnings
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;

        let balances = user.balances_mut();
        balances.pending_balance = pending;
        balances.wallet_balance = wallet;
        balances.total_earnings = earned;

        tracing::info!(
            user_id = %user.id,
            amount = %amount,
            wallet = %wallet,
            "Balance settled"
        );
        Ok(())
    }

    /// A submission was rejected: `pending -= amount`
    pub fn forfeit_rejected(user: &mut User, amount: Amount) -> LedgerResult<()> {
        let balances = user.balances_mut();
        balances.pending_balance = balances.pending_balance.checked_sub(amount).ok_or(
            LedgerError::InsufficientLocked {
                locked: balances.pending_balance,
                requested: amount,
            },
        )?;

        tracing::info!(user_id = %user.id, amount = %amount, "Locked balance forfeited");
        Ok(())
    }

    /// Money leaves the platform: `wallet -= amount`
    pub fn withdraw(user: &mut User, amount: Amount) -> LedgerResult<()> {
        let balances = user.balances_mut();
        balances.wallet_balance = balances.wallet_balance.checked_sub(amount).ok_or(
            LedgerError::InsufficientAvailable {
                available: balances.wallet_balance,
                requested: amount,
            },
        )?;

        tracing::info!(
            user_id = %user.id,
            amount = %amount,
            wallet = %user.balances().wallet(),
            "Balance withdrawn"
        );
        Ok(())
    }

    /// A debited withdrawal was returned: `wallet += amount`
    pub fn refund_withdrawal(user: &mut User, amount: Amount) -> LedgerResult<()> {
        let balances = user.balances_mut();
        balances.wallet_balance = balances
            .wallet_balance
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;

        tracing::info!(user_id = %user.id, amount = %amount, "Withdrawal refunded");
        Ok(())
    }
}
