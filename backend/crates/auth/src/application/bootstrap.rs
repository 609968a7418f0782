//! Bootstrap Admin
//!
//! Builds the admin account that seeds a fresh state document.

use kernel::clock::Clock;
use kernel::id::{IdGenerator, IdGeneratorExt};
use ledger::{NewUser, User, UserRole};
use platform::crypto::{generate_security_key, security_key_digest};
use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::domain::value_object::UserName;
use crate::error::AuthResult;

/// Operator-supplied admin credentials
#[derive(Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: String,
    pub email: String,
}

impl BootstrapAdmin {
    /// Validate and hash the credentials.
    ///
    /// The name may be a reserved word. The security key is never shown,
    /// so this account can only be recovered by reconfiguring it.
    pub fn build(
        self,
        config: &AuthConfig,
        ids: &dyn IdGenerator,
        clock: &dyn Clock,
    ) -> AuthResult<User> {
        let username = UserName::parse_unreserved(&self.username)?;
        let credential_hash = ClearTextPassword::new(self.password)?.hash(config.pepper())?;

        tracing::info!(username = %username, "Bootstrap admin prepared");

        Ok(User::new(NewUser {
            id: ids.next_id(),
            username: username.into_inner(),
            credential_hash,
            email: self.email.trim().to_lowercase(),
            role: UserRole::Admin,
            security_key_digest: security_key_digest(&generate_security_key()),
            joined_at: clock.now(),
        }))
    }
}
