//! Payout Request Entity

use chrono::{DateTime, Utc};
use kernel::id::{PayoutRequestId, UserId};
use serde::{Deserialize, Serialize};

use crate::domain::value_object::{Amount, PayoutStatus, PayoutTarget};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutRequest {
    pub id: PayoutRequestId,
    pub user_id: UserId,
    pub username: String,
    pub amount: Amount,
    /// Settlement target as it was when the request was made
    pub method: PayoutTarget,
    pub status: PayoutStatus,
    pub created_at: DateTime<Utc>,
    /// Wallet was debited when the request was made (refund on reject)
    #[serde(default)]
    pub debited: bool,
    #[serde(default)]
    pub resolved_by: Option<UserId>,
    #[serde(default)]
    pub resolved_at: Option<DateTime<Utc>>,
}

impl PayoutRequest {
    pub fn resolve(&mut self, status: PayoutStatus, admin_id: UserId, at: DateTime<Utc>) {
        self.status = status;
        self.resolved_by = Some(admin_id);
        self.resolved_at = Some(at);
    }
}
