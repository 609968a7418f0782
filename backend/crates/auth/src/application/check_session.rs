//! Check Session Use Case
//!
//! Resolves a bearer token to the signed-in user. Role and status come
//! from the current state, so a suspension takes effect on the next
//! request. Tokens issued before the last account recovery are refused.

use std::sync::Arc;

use kernel::clock::Clock;
use kernel::id::UserId;
use ledger::{StateGate, StateStore, UserRole, UserStatus};

use crate::application::config::AuthConfig;
use crate::domain::value_object::SessionToken;
use crate::error::{AuthError, AuthResult};

/// The authenticated caller, inserted into request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: UserId,
    pub username: String,
    pub role: UserRole,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn require_admin(&self) -> AuthResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            tracing::warn!(user_id = %self.user_id, "Admin route refused");
            Err(AuthError::Forbidden)
        }
    }
}

/// Check session use case
pub struct CheckSessionUseCase<S> {
    gate: Arc<StateGate<S>>,
    config: Arc<AuthConfig>,
    clock: Arc<dyn Clock>,
}

impl<S> CheckSessionUseCase<S>
where
    S: StateStore + Sync,
{
    pub fn new(gate: Arc<StateGate<S>>, config: Arc<AuthConfig>, clock: Arc<dyn Clock>) -> Self {
        Self {
            gate,
            config,
            clock,
        }
    }

    pub async fn execute(&self, token: &str) -> AuthResult<CurrentUser> {
        let token = SessionToken::verify(token, &self.config.session_secret, self.clock.now())
            .ok_or(AuthError::SessionInvalid)?;

        let (username, role, status) = self
            .gate
            .read(|s| {
                s.user(&token.user_id)
                    .filter(|u| u.session_epoch == token.epoch)
                    .map(|u| (u.username.clone(), u.role, u.status))
            })
            .await
            .ok_or(AuthError::SessionInvalid)?;

        match status {
            UserStatus::Active => Ok(CurrentUser {
                user_id: token.user_id,
                username,
                role,
            }),
            UserStatus::Suspended => Err(AuthError::AccountSuspended),
            UserStatus::Banned => Err(AuthError::AccountBanned),
        }
    }
}
