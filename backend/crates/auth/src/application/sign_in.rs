//! Sign In Use Case
//!
//! Authenticates a user against the lockout policy and issues a session
//! token.
//!
//! Check order: unknown user, active lockout, credential, account status.
//! The credential hash is verified outside the state gate; the attempt
//! bookkeeping is then applied and persisted inside it, also on failure.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kernel::clock::Clock;
use kernel::id::{IdGenerator, IdGeneratorExt, UserId};
use ledger::{AppLog, LogKind, StateGate, StateStore, UserRole, UserStatus};
use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::domain::FailedAttempt;
use crate::domain::value_object::{SessionToken, UserName};
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub username: String,
    pub password: String,
}

/// Sign in output
#[derive(Debug)]
pub struct SignInOutput {
    pub session_token: String,
    pub expires_at: DateTime<Utc>,
    pub user_id: UserId,
    pub username: String,
    pub role: UserRole,
}

/// What happened inside the gate. Every variant is persisted, so the
/// mutation itself always succeeds.
enum Attempt {
    Locked(chrono::Duration),
    Failed(FailedAttempt),
    Blocked(UserStatus),
    Accepted {
        username: String,
        role: UserRole,
        session_epoch: u32,
    },
}

/// Sign in use case
pub struct SignInUseCase<S> {
    gate: Arc<StateGate<S>>,
    config: Arc<AuthConfig>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl<S> SignInUseCase<S>
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

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        let username = UserName::canonicalize(&input.username);
        let now = self.clock.now();
        let policy = self.config.lockout_policy();

        let (user_id, hash, locked) = self
            .gate
            .read(|s| {
                s.user_by_username(&username)
                    .map(|u| (u.id, u.credential_hash.clone(), u.lockout_remaining(now)))
            })
            .await
            .ok_or(AuthError::UserNotFound)?;

        if let Some(remaining) = locked {
            return Err(AuthError::LockedOut { remaining });
        }

        let password = ClearTextPassword::for_verification(input.password);
        let matched = hash.verify(&password, self.config.pepper());

        let log_id = self.ids.next_id();
        let attempt = self
            .gate
            .mutate(|state| -> AuthResult<Attempt> {
                let user = state.user_mut(&user_id).ok_or(AuthError::UserNotFound)?;

                if let Some(remaining) = policy.check(user, now) {
                    return Ok(Attempt::Locked(remaining));
                }

                // A recovery between the read and now replaces the hash
                if !matched || user.credential_hash != hash {
                    let failed = policy.record_failure(user, now);
                    let message = match failed {
                        FailedAttempt::LockedOut { .. } => {
                            format!("Account {} locked after failed logins", user.username)
                        }
                        FailedAttempt::Counted { attempts_used, .. } => {
                            format!("Failed login attempt {attempts_used} for {}", user.username)
                        }
                    };
                    let entry = AppLog::new(log_id, LogKind::Auth, message, now)
                        .by(user.id, user.username.clone());
                    state.record_log(entry);
                    return Ok(Attempt::Failed(failed));
                }

                if !user.can_login() {
                    return Ok(Attempt::Blocked(user.status));
                }

                policy.record_success(user);
                let accepted = Attempt::Accepted {
                    username: user.username.clone(),
                    role: user.role,
                    session_epoch: user.session_epoch,
                };
                let entry = AppLog::new(log_id, LogKind::Auth, "User signed in", now)
                    .by(user.id, user.username.clone());
                state.record_log(entry);
                Ok(accepted)
            })
            .await?;

        match attempt {
            Attempt::Locked(remaining) => Err(AuthError::LockedOut { remaining }),
            Attempt::Failed(FailedAttempt::LockedOut { remaining }) => {
                tracing::warn!(user_id = %user_id, "Account locked after repeated failures");
                Err(AuthError::LockedOut { remaining })
            }
            Attempt::Failed(FailedAttempt::Counted {
                attempts_used,
                attempts_remaining,
            }) => Err(AuthError::InvalidCredential {
                attempts_used,
                attempts_remaining,
            }),
            Attempt::Blocked(UserStatus::Banned) => Err(AuthError::AccountBanned),
            Attempt::Blocked(_) => Err(AuthError::AccountSuspended),
            Attempt::Accepted {
                username,
                role,
                session_epoch,
            } => {
                let expires_at = now + self.config.session_ttl();
                let session_token = SessionToken::new(user_id, session_epoch, expires_at)
                    .sign(&self.config.session_secret);

                tracing::info!(user_id = %user_id, role = role.code(), "User signed in");

                Ok(SignInOutput {
                    session_token,
                    expires_at,
                    user_id,
                    username,
                    role,
                })
            }
        }
    }
}
