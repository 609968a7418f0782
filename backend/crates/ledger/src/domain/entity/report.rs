use chrono::{DateTime, Utc};
use kernel::id::{ReportId, UserId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Open,
    Resolved,
}

/// Issue filed by a user for admin follow-up
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: ReportId,
    pub user_id: UserId,
    pub username: String,
    pub message: String,
    pub status: ReportStatus,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub resolved_by: Option<UserId>,
    #[serde(default)]
    pub resolved_at: Option<DateTime<Utc>>,
}
