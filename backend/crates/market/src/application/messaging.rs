//! Broadcasts and Reports
//!
//! Admins broadcast to everyone or to one user; users file reports that
//! admins resolve.

use kernel::id::{BroadcastId, IdGeneratorExt, ReportId, UserId};
use ledger::{Broadcast, LogKind, Report, ReportStatus, StateStore};
use serde::Serialize;

use crate::application::context::MarketContext;
use crate::error::{MarketError, MarketResult};

pub const MESSAGE_MAX_LENGTH: usize = 2000;

fn message_text(raw: &str, what: &str) -> MarketResult<String> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(MarketError::validation(format!("{what} is empty")));
    }
    if text.chars().count() > MESSAGE_MAX_LENGTH {
        return Err(MarketError::validation(format!(
            "{what} must be at most {MESSAGE_MAX_LENGTH} characters"
        )));
    }
    Ok(text.to_string())
}

/// A broadcast as one user sees it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InboxMessage {
    #[serde(flatten)]
    pub broadcast: Broadcast,
    pub read: bool,
}

pub struct Messaging<S> {
    ctx: MarketContext<S>,
}

impl<S> Messaging<S>
where
    S: StateStore + Sync,
{
    pub fn new(ctx: MarketContext<S>) -> Self {
        Self { ctx }
    }

    // ========================================================================
    // Broadcasts
    // ========================================================================

    /// Send to everyone, or to `target` only
    pub async fn broadcast(
        &self,
        admin_id: UserId,
        content: &str,
        target: Option<UserId>,
    ) -> MarketResult<Broadcast> {
        let broadcast = Broadcast {
            id: self.ctx.ids.next_id(),
            content: message_text(content, "Message")?,
            target_user_id: target,
            sender_id: admin_id,
            timestamp: self.ctx.clock.now(),
        };

        self.ctx
            .gate
            .mutate(|state| -> MarketResult<()> {
                let audience = match &target {
                    Some(id) => {
                        let user = state.user(id).ok_or(MarketError::NotFound("User"))?;
                        format!("@{}", user.username)
                    }
                    None => "everyone".to_string(),
                };
                let entry = self
                    .ctx
                    .admin_log(admin_id, format!("Broadcast sent to {audience}"));
                state.broadcasts.insert(0, broadcast.clone());
                state.record_log(entry);
                Ok(())
            })
            .await?;

        tracing::info!(
            broadcast_id = %broadcast.id,
            targeted = target.is_some(),
            "Broadcast sent"
        );
        Ok(broadcast)
    }

    /// Broadcasts visible to `user_id`, newest first
    pub async fn inbox(&self, user_id: UserId) -> MarketResult<Vec<InboxMessage>> {
        self.ctx
            .gate
            .read(|s| -> MarketResult<Vec<InboxMessage>> {
                let user = s.user(&user_id).ok_or(MarketError::NotFound("User"))?;
                Ok(s.broadcasts
                    .iter()
                    .filter(|b| b.is_visible_to(&user_id))
                    .map(|b| InboxMessage {
                        broadcast: b.clone(),
                        read: user.has_read(&b.id),
                    })
                    .collect())
            })
            .await
    }

    /// Idempotent; only broadcasts visible to the user can be marked
    pub async fn mark_read(&self, user_id: UserId, broadcast_id: BroadcastId) -> MarketResult<()> {
        let (visible, already_read) = self
            .ctx
            .gate
            .read(|s| {
                let visible = s
                    .broadcasts
                    .iter()
                    .any(|b| b.id == broadcast_id && b.is_visible_to(&user_id));
                let read = s.user(&user_id).is_some_and(|u| u.has_read(&broadcast_id));
                (visible, read)
            })
            .await;
        if !visible {
            return Err(MarketError::NotFound("Message"));
        }
        if already_read {
            return Ok(());
        }

        self.ctx
            .gate
            .mutate(|state| -> MarketResult<()> {
                let user = state
                    .user_mut(&user_id)
                    .ok_or(MarketError::NotFound("User"))?;
                user.mark_read(broadcast_id);
                Ok(())
            })
            .await
    }

    // ========================================================================
    // Reports
    // ========================================================================

    pub async fn file_report(&self, user_id: UserId, message: &str) -> MarketResult<Report> {
        let message = message_text(message, "Report")?;
        let report_id: ReportId = self.ctx.ids.next_id();
        let now = self.ctx.clock.now();

        let report = self
            .ctx
            .gate
            .mutate(|state| -> MarketResult<Report> {
                let user = state.user(&user_id).ok_or(MarketError::NotFound("User"))?;
                let report = Report {
                    id: report_id,
                    user_id,
                    username: user.username.clone(),
                    message,
                    status: ReportStatus::Open,
                    timestamp: now,
                    resolved_by: None,
                    resolved_at: None,
                };
                let entry = self.ctx.log_for(LogKind::Action, "Report filed", user);
                state.reports.insert(0, report.clone());
                state.record_log(entry);
                Ok(report)
            })
            .await?;

        tracing::info!(report_id = %report.id, user_id = %user_id, "Report filed");
        Ok(report)
    }

    /// All reports, open ones first, each group newest first
    pub async fn reports(&self) -> Vec<Report> {
        self.ctx
            .gate
            .read(|s| {
                let (mut open, resolved): (Vec<Report>, Vec<Report>) = s
                    .reports
                    .iter()
                    .cloned()
                    .partition(|r| r.status == ReportStatus::Open);
                open.extend(resolved);
                open
            })
            .await
    }

    pub async fn resolve_report(&self, admin_id: UserId, report_id: ReportId) -> MarketResult<Report> {
        let now = self.ctx.clock.now();

        let report = self
            .ctx
            .gate
            .mutate(|state| -> MarketResult<Report> {
                let report = state
                    .report_mut(&report_id)
                    .ok_or(MarketError::NotFound("Report"))?;
                if report.status == ReportStatus::Resolved {
                    return Err(MarketError::NotPending);
                }
                report.status = ReportStatus::Resolved;
                report.resolved_by = Some(admin_id);
                report.resolved_at = Some(now);
                let report = report.clone();

                let entry = self
                    .ctx
                    .admin_log(admin_id, format!("Report from @{} resolved", report.username));
                state.record_log(entry);
                Ok(report)
            })
            .await?;

        tracing::info!(report_id = %report_id, admin_id = %admin_id, "Report resolved");
        Ok(report)
    }
}
