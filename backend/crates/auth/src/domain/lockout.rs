//! Lockout Policy
//!
//! Counts consecutive failed credential checks per user. Reaching the
//! threshold locks the account for a fixed window; correct credentials do
//! not lift the lock early. Once the window has elapsed the counter starts
//! over.

use chrono::{DateTime, Duration, Utc};
use ledger::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutPolicy {
    pub threshold: u32,
    pub duration: Duration,
}

/// Result of recording one failed credential check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailedAttempt {
    Counted {
        attempts_used: u32,
        attempts_remaining: u32,
    },
    LockedOut {
        remaining: Duration,
    },
}

impl LockoutPolicy {
    /// Remaining lock time if the account is locked at `now`.
    ///
    /// An elapsed lock is cleared here together with its attempt count.
    pub fn check(&self, user: &mut User, now: DateTime<Utc>) -> Option<Duration> {
        if let Some(remaining) = user.lockout_remaining(now) {
            return Some(remaining);
        }
        if user.lockout_until.is_some() {
            user.clear_lockout();
        }
        None
    }

    pub fn record_failure(&self, user: &mut User, now: DateTime<Utc>) -> FailedAttempt {
        user.failed_attempts = user.failed_attempts.saturating_add(1);

        if user.failed_attempts >= self.threshold.max(1) {
            user.lockout_until = Some(now + self.duration);
            FailedAttempt::LockedOut {
                remaining: self.duration,
            }
        } else {
            FailedAttempt::Counted {
                attempts_used: user.failed_attempts,
                attempts_remaining: self.threshold - user.failed_attempts,
            }
        }
    }

    pub fn record_success(&self, user: &mut User) {
        user.clear_lockout();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::user;
    use chrono::TimeZone;

    fn policy() -> LockoutPolicy {
        LockoutPolicy {
            threshold: 3,
            duration: Duration::hours(24),
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_counts_then_locks() {
        let mut u = user("alice");
        assert_eq!(
            policy().record_failure(&mut u, t0()),
            FailedAttempt::Counted {
                attempts_used: 1,
                attempts_remaining: 2
            }
        );
        policy().record_failure(&mut u, t0());
        assert_eq!(
            policy().record_failure(&mut u, t0()),
            FailedAttempt::LockedOut {
                remaining: Duration::hours(24)
            }
        );
        assert_eq!(u.lockout_until, Some(t0() + Duration::hours(24)));
    }

    #[test]
    fn test_check_reports_remaining_until_window_elapses() {
        let mut u = user("alice");
        u.failed_attempts = 3;
        u.lockout_until = Some(t0() + Duration::hours(24));

        assert_eq!(
            policy().check(&mut u, t0() + Duration::hours(1)),
            Some(Duration::hours(23))
        );
        assert_eq!(u.failed_attempts, 3);

        assert_eq!(policy().check(&mut u, t0() + Duration::hours(24)), None);
        assert_eq!(u.failed_attempts, 0);
        assert_eq!(u.lockout_until, None);
    }

    #[test]
    fn test_success_resets() {
        let mut u = user("alice");
        policy().record_failure(&mut u, t0());
        policy().record_success(&mut u);
        assert_eq!(u.failed_attempts, 0);
    }
}
