//! User Entity
//!
//! One account record: identity, credential, lockout counters, settlement
//! target and the three balances. Balances are private to this crate; the
//! only way to move money is through [`crate::domain::ledger::Ledger`].

use chrono::{DateTime, Duration, Utc};
use kernel::id::{BroadcastId, UserId};
use platform::password::CredentialHash;
use serde::{Deserialize, Serialize};

use crate::domain::value_object::{
    Amount, PayoutMethod, PayoutTarget, UserRole, UserStatus,
};

/// Wallet, audit lock and lifetime earnings of one user
///
/// Invariants: every field is non-negative (unsigned), `total_earnings`
/// never decreases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Balances {
    pub(crate) wallet_balance: Amount,
    pub(crate) pending_balance: Amount,
    pub(crate) total_earnings: Amount,
}

impl Balances {
    /// Spendable, withdrawable money
    #[inline]
    pub fn wallet(&self) -> Amount {
        self.wallet_balance
    }

    /// Rewards locked while their submission awaits audit
    #[inline]
    pub fn pending(&self) -> Amount {
        self.pending_balance
    }

    #[inline]
    pub fn total_earnings(&self) -> Amount {
        self.total_earnings
    }
}

/// Fields supplied when an account is created
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: UserId,
    pub username: String,
    pub credential_hash: CredentialHash,
    pub email: String,
    pub role: UserRole,
    pub security_key_digest: String,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    /// Canonical (lower-case) user name, unique across the document
    pub username: String,
    pub credential_hash: CredentialHash,
    #[serde(default)]
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
    #[serde(flatten)]
    balances: Balances,
    #[serde(default)]
    pub failed_attempts: u32,
    #[serde(default)]
    pub lockout_until: Option<DateTime<Utc>>,
    #[serde(default)]
    pub payout_method: Option<PayoutMethod>,
    #[serde(default)]
    pub payout_details: Option<String>,
    /// Base64 SHA-256 of the recovery key; the clear key is never stored
    pub security_key_digest: String,
    pub joined_at: DateTime<Utc>,
    #[serde(default)]
    pub saved_social_handle: Option<String>,
    #[serde(default)]
    pub read_broadcast_ids: Vec<BroadcastId>,
    /// Bumped on account recovery; older session tokens stop working
    #[serde(default)]
    pub session_epoch: u32,
}

impl User {
    /// New account with zero balances and no failed attempts
    pub fn new(new: NewUser) -> Self {
        Self {
            id: new.id,
            username: new.username,
            credential_hash: new.credential_hash,
            email: new.email,
            role: new.role,
            status: UserStatus::Active,
            balances: Balances::default(),
            failed_attempts: 0,
            lockout_until: None,
            payout_method: None,
            payout_details: None,
            security_key_digest: new.security_key_digest,
            joined_at: new.joined_at,
            saved_social_handle: None,
            read_broadcast_ids: Vec::new(),
            session_epoch: 0,
        }
    }

    #[inline]
    pub fn balances(&self) -> &Balances {
        &self.balances
    }

    #[inline]
    pub(crate) fn balances_mut(&mut self) -> &mut Balances {
        &mut self.balances
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    #[inline]
    pub fn can_login(&self) -> bool {
        self.status.can_login()
    }

    /// Time left on an active lockout, `None` when not locked out at `now`
    pub fn lockout_remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.lockout_until
            .filter(|until| *until > now)
            .map(|until| until - now)
    }

    /// Forget failed attempts and any lockout
    pub fn clear_lockout(&mut self) {
        self.failed_attempts = 0;
        self.lockout_until = None;
    }

    /// Current settlement target, if the user has configured one
    pub fn payout_target(&self) -> Option<PayoutTarget> {
        match (self.payout_method, self.payout_details.as_deref()) {
            (Some(method), Some(details)) if !details.trim().is_empty() => Some(PayoutTarget {
                method,
                details: details.to_string(),
            }),
            _ => None,
        }
    }

    pub fn has_read(&self, broadcast_id: &BroadcastId) -> bool {
        self.read_broadcast_ids.contains(broadcast_id)
    }

    /// Mark a broadcast read; returns `false` if it already was
    pub fn mark_read(&mut self, broadcast_id: BroadcastId) -> bool {
        if self.has_read(&broadcast_id) {
            return false;
        }
        self.read_broadcast_ids.push(broadcast_id);
        true
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use platform::password::ClearTextPassword;
    use std::sync::OnceLock;

    /// Hashing is slow; tests share one hash
    pub fn test_hash() -> CredentialHash {
        static HASH: OnceLock<CredentialHash> = OnceLock::new();
        HASH.get_or_init(|| {
            ClearTextPassword::new("CorrectHorse#42".to_string())
                .unwrap()
                .hash(None)
                .unwrap()
        })
        .clone()
    }

    pub fn user(username: &str) -> User {
        User::new(NewUser {
            id: UserId::new(),
            username: username.to_string(),
            credential_hash: test_hash(),
            email: format!("{username}@example.com"),
            role: UserRole::User,
            security_key_digest: String::new(),
            joined_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::user;
    use super::*;

    #[test]
    fn test_new_user_starts_clean() {
        let u = user("alice");
        assert_eq!(u.balances().wallet(), Amount::ZERO);
        assert_eq!(u.balances().pending(), Amount::ZERO);
        assert_eq!(u.balances().total_earnings(), Amount::ZERO);
        assert_eq!(u.failed_attempts, 0);
        assert!(u.lockout_until.is_none());
        assert!(u.can_login());
        assert!(!u.is_admin());
    }

    #[test]
    fn test_lockout_remaining() {
        let mut u = user("alice");
        let now = Utc::now();
        u.lockout_until = Some(now + Duration::hours(2));
        assert_eq!(u.lockout_remaining(now), Some(Duration::hours(2)));
        assert_eq!(u.lockout_remaining(now + Duration::hours(2)), None);
        u.clear_lockout();
        assert_eq!(u.lockout_remaining(now), None);
    }

    #[test]
    fn test_payout_target_requires_details() {
        let mut u = user("alice");
        u.payout_method = Some(PayoutMethod::Upi);
        assert!(u.payout_target().is_none());
        u.payout_details = Some("  ".to_string());
        assert!(u.payout_target().is_none());
        u.payout_details = Some("alice@upi".to_string());
        assert_eq!(u.payout_target().unwrap().to_string(), "UPI: alice@upi");
    }

    #[test]
    fn test_mark_read_is_idempotent() {
        let mut u = user("alice");
        let id = BroadcastId::new();
        assert!(u.mark_read(id));
        assert!(!u.mark_read(id));
        assert_eq!(u.read_broadcast_ids.len(), 1);
    }

    #[test]
    fn test_serde_flattens_balances() {
        let u = user("alice");
        let json = serde_json::to_value(&u).unwrap();
        assert_eq!(json["walletBalance"], 0);
        assert_eq!(json["pendingBalance"], 0);
        assert_eq!(json["totalEarnings"], 0);
        assert_eq!(json["status"], "active");
        assert!(json.get("balances").is_none());

        let back: User = serde_json::from_value(json).unwrap();
        assert_eq!(back.id, u.id);
        assert_eq!(back.balances(), u.balances());
    }
}
