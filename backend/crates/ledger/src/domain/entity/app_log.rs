//! Activity Log Entry

use chrono::{DateTime, Utc};
use kernel::id::{LogId, UserId};
use serde::{Deserialize, Serialize};

use crate::domain::value_object::LogKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppLog {
    pub id: LogId,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(rename = "type")]
    pub kind: LogKind,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl AppLog {
    pub fn new(id: LogId, kind: LogKind, message: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: None,
            username: None,
            kind,
            message: message.into(),
            timestamp,
        }
    }

    /// Attribute the entry to a user
    pub fn by(mut self, user_id: UserId, username: impl Into<String>) -> Self {
        self.user_id = Some(user_id);
        self.username = Some(username.into());
        self
    }
}
