//! Sign Up Use Case
//!
//! Creates a new user account and its one-time security key.

use std::sync::Arc;

use kernel::clock::Clock;
use kernel::id::{IdGenerator, IdGeneratorExt, UserId};
use ledger::{AppLog, LogKind, NewUser, StateGate, StateStore, User, UserRole};
use platform::crypto::{generate_security_key, security_key_digest};
use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::domain::value_object::{Email, UserName};
use crate::error::{AuthError, AuthResult};

/// Sign up input
pub struct SignUpInput {
    pub username: String,
    pub password: String,
    pub email: String,
}

/// Sign up output
#[derive(Debug)]
pub struct SignUpOutput {
    pub user_id: UserId,
    pub username: String,
    /// Shown to the user exactly once; only its digest is stored
    pub security_key: String,
}

/// Sign up use case
pub struct SignUpUseCase<S> {
    gate: Arc<StateGate<S>>,
    config: Arc<AuthConfig>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl<S> SignUpUseCase<S>
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

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<SignUpOutput> {
        let username = UserName::parse(&input.username)?;
        let email = Email::parse(&input.email)?;

        // Validate and hash password before taking the gate
        let password = ClearTextPassword::new(input.password)?;
        let credential_hash = password.hash(self.config.pepper())?;

        let security_key = generate_security_key();
        let digest = security_key_digest(&security_key);

        let now = self.clock.now();
        let user_id: UserId = self.ids.next_id();
        let log_id = self.ids.next_id();

        self.gate
            .mutate(|state| -> AuthResult<()> {
                if state.username_taken(username.as_str()) {
                    return Err(AuthError::UsernameTaken);
                }
                if state.users.iter().any(|u| u.security_key_digest == digest) {
                    return Err(AuthError::Internal("security key collision".into()));
                }

                state.users.push(User::new(NewUser {
                    id: user_id,
                    username: username.as_str().to_string(),
                    credential_hash,
                    email: email.into_inner(),
                    role: UserRole::User,
                    security_key_digest: digest,
                    joined_at: now,
                }));
                state.record_log(
                    AppLog::new(log_id, LogKind::Auth, "New user registered", now)
                        .by(user_id, username.as_str()),
                );
                Ok(())
            })
            .await?;

        tracing::info!(user_id = %user_id, username = %username, "User signed up");

        Ok(SignUpOutput {
            user_id,
            username: username.into_inner(),
            security_key,
        })
    }
}
