use chrono::{DateTime, Utc};
use kernel::id::{BroadcastId, UserId};
use serde::{Deserialize, Serialize};

/// Admin message to everyone (`target_user_id == None`) or one user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Broadcast {
    pub id: BroadcastId,
    pub content: String,
    #[serde(default)]
    pub target_user_id: Option<UserId>,
    pub sender_id: UserId,
    pub timestamp: DateTime<Utc>,
}

impl Broadcast {
    #[inline]
    pub fn is_visible_to(&self, user_id: &UserId) -> bool {
        self.target_user_id.is_none_or(|target| target == *user_id)
    }
}
