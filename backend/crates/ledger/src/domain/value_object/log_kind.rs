use serde::{Deserialize, Serialize};

/// Activity log category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    Auth,
    Transaction,
    System,
    Admin,
    Action,
    Payout,
    Verify,
    Viral,
}

impl LogKind {
    /// Kinds a user sees in their own history
    #[inline]
    pub const fn is_personal_history(&self) -> bool {
        matches!(self, LogKind::Verify | LogKind::Viral | LogKind::Payout)
    }
}
