//! Collaborators shared by every market use case

use std::sync::Arc;

use kernel::clock::Clock;
use kernel::id::{IdGenerator, IdGeneratorExt, UserId};
use ledger::{AppLog, LogKind, StateGate, User};

use crate::application::config::MarketConfig;

pub struct MarketContext<S> {
    pub gate: Arc<StateGate<S>>,
    pub config: Arc<MarketConfig>,
    pub clock: Arc<dyn Clock>,
    pub ids: Arc<dyn IdGenerator>,
}

// Manual impl: `S` itself need not be Clone
impl<S> Clone for MarketContext<S> {
    fn clone(&self) -> Self {
        Self {
            gate: self.gate.clone(),
            config: self.config.clone(),
            clock: self.clock.clone(),
            ids: self.ids.clone(),
        }
    }
}

impl<S> MarketContext<S> {
    pub fn new(
        gate: Arc<StateGate<S>>,
        config: Arc<MarketConfig>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            gate,
            config,
            clock,
            ids,
        }
    }

    /// Activity log entry stamped with the current time
    pub(crate) fn log(&self, kind: LogKind, message: impl Into<String>) -> AppLog {
        AppLog::new(self.ids.next_id(), kind, message, self.clock.now())
    }

    /// Activity log entry attributed to `user`
    pub(crate) fn log_for(&self, kind: LogKind, message: impl Into<String>, user: &User) -> AppLog {
        self.log(kind, message).by(user.id, user.username.clone())
    }

    /// Admin action entry; the acting admin's id is kept as the author
    pub(crate) fn admin_log(&self, admin_id: UserId, message: impl Into<String>) -> AppLog {
        let mut entry = self.log(LogKind::Admin, message);
        entry.user_id = Some(admin_id);
        entry
    }
}
