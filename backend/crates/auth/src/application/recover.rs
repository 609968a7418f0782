//! Recover Account Use Case
//!
//! Proves ownership with the security key, then replaces the user name and
//! password in one step and lifts any lockout. The used key is retired: a
//! fresh one is issued and returned once, and sessions signed before the
//! recovery stop working.

use std::sync::Arc;

use kernel::clock::Clock;
use kernel::id::{IdGenerator, IdGeneratorExt, UserId};
use ledger::{AppLog, LogKind, StateGate, StateStore};
use platform::crypto::{constant_time_eq, generate_security_key, security_key_digest};
use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::domain::value_object::UserName;
use crate::error::{AuthError, AuthResult};

pub struct RecoverInput {
    pub security_key: String,
    pub new_username: String,
    pub new_password: String,
}

#[derive(Debug)]
pub struct RecoverOutput {
    pub user_id: UserId,
    pub username: String,
    /// Replacement security key, shown only in this response
    pub security_key: String,
}

pub struct RecoverUseCase<S> {
    gate: Arc<StateGate<S>>,
    config: Arc<AuthConfig>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl<S> RecoverUseCase<S>
where
    S: StateStore + Sync,
{
    pub fn new(
        gate: Arc<StateGate<S>>,
        config: Arc<AuthConfig>,
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

    pub async fn execute(&self, input: RecoverInput) -> AuthResult<RecoverOutput> {
        let digest = security_key_digest(&input.security_key);
        let username = UserName::parse(&input.new_username)?;
        let credential_hash = ClearTextPassword::new(input.new_password)?.hash(self.config.pepper())?;

        let security_key = generate_security_key();
        let new_digest = security_key_digest(&security_key);

        let now = self.clock.now();
        let log_id = self.ids.next_id();

        let user_id = self
            .gate
            .mutate(|state| -> AuthResult<UserId> {
                let index = state
                    .users
                    .iter()
                    .position(|u| {
                        constant_time_eq(u.security_key_digest.as_bytes(), digest.as_bytes())
                    })
                    .ok_or(AuthError::InvalidKey)?;

                let user_id = state.users[index].id;
                let taken_by_other = state
                    .user_by_username(username.as_str())
                    .is_some_and(|other| other.id != user_id);
                if taken_by_other {
                    return Err(AuthError::UsernameTaken);
                }

                let user = &mut state.users[index];
                let previous = std::mem::replace(&mut user.username, username.as_str().to_string());
                user.credential_hash = credential_hash;
                user.security_key_digest = new_digest;
                user.session_epoch = user.session_epoch.wrapping_add(1);
                user.clear_lockout();

                let message = format!("Account recovered (was {previous})");
                state.record_log(
                    AppLog::new(log_id, LogKind::Auth, message, now).by(user_id, username.as_str()),
                );
                Ok(user_id)
            })
            .await?;

        tracing::info!(user_id = %user_id, username = %username, "Account recovered");

        Ok(RecoverOutput {
            user_id,
            username: username.into_inner(),
            security_key,
        })
    }
}
