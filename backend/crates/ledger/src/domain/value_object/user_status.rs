//! User Status Value Object
//!
//! - **Active**: can sign in and transact
//! - **Suspended**: reversible admin action, sign-in refused
//! - **Banned**: terminal, sign-in refused and the account cannot be reactivated

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    #[default]
    Active,
    Suspended,
    Banned,
}

impl UserStatus {
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Banned => "banned",
        }
    }

    #[inline]
    pub const fn can_login(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Banned is final: no admin action moves an account out of it
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Banned)
    }

    /// Whether an admin may move an account from `self` to `next`
    #[inline]
    pub const fn can_transition_to(&self, next: UserStatus) -> bool {
        !self.is_terminal() && !matches!((self, next), (Self::Active, Self::Active))
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "active" => Some(Self::Active),
            "suspended" => Some(Self::Suspended),
            "banned" => Some(Self::Banned),
            _ => None,
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_login() {
        assert!(UserStatus::Active.can_login());
        assert!(!UserStatus::Suspended.can_login());
        assert!(!UserStatus::Banned.can_login());
    }

    #[test]
    fn test_transitions() {
        assert!(UserStatus::Active.can_transition_to(UserStatus::Suspended));
        assert!(UserStatus::Active.can_transition_to(UserStatus::Banned));
        assert!(UserStatus::Suspended.can_transition_to(UserStatus::Active));
        assert!(UserStatus::Suspended.can_transition_to(UserStatus::Banned));
        assert!(!UserStatus::Banned.can_transition_to(UserStatus::Active));
        assert!(!UserStatus::Active.can_transition_to(UserStatus::Active));
    }

    #[test]
    fn test_serde_codes() {
        assert_eq!(
            serde_json::to_string(&UserStatus::Suspended).unwrap(),
            "\"suspended\""
        );
        assert_eq!(UserStatus::from_code("banned"), Some(UserStatus::Banned));
    }
}
