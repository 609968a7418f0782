//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use crate::domain::LockoutPolicy;

/// Failed attempts before an account is locked
pub const DEFAULT_LOCKOUT_THRESHOLD: u32 = 5;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Consecutive failed sign-ins that trigger a lockout
    pub lockout_threshold: u32,
    /// How long a lockout lasts (24 hours)
    pub lockout_duration: Duration,
    /// Session secret key for HMAC signing (32 bytes)
    pub session_secret: [u8; 32],
    /// Bearer token lifetime (12 hours)
    pub session_ttl: Duration,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            lockout_threshold: DEFAULT_LOCKOUT_THRESHOLD,
            lockout_duration: Duration::from_secs(24 * 3600), // 24 hours
            session_secret: [0u8; 32],
            session_ttl: Duration::from_secs(12 * 3600), // 12 hours
            password_pepper: None,
        }
    }
}

impl AuthConfig {
    /// Create config with a random session secret
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = [0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        Self {
            session_secret: secret,
            ..Default::default()
        }
    }

    /// Create config for development (random secret, week-long sessions)
    pub fn development() -> Self {
        Self {
            session_ttl: Duration::from_secs(7 * 24 * 3600),
            ..Self::with_random_secret()
        }
    }

    pub fn lockout_policy(&self) -> LockoutPolicy {
        LockoutPolicy {
            threshold: self.lockout_threshold,
            duration: chrono::Duration::from_std(self.lockout_duration)
                .unwrap_or(chrono::Duration::hours(24)),
        }
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.session_ttl).unwrap_or(chrono::Duration::hours(12))
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.lockout_policy().threshold, 5);
        assert_eq!(config.lockout_policy().duration, chrono::Duration::hours(24));
        assert_eq!(config.session_ttl(), chrono::Duration::hours(12));
        assert!(config.pepper().is_none());
    }

    #[test]
    fn test_random_secrets_differ() {
        let a = AuthConfig::with_random_secret();
        let b = AuthConfig::with_random_secret();
        assert_ne!(a.session_secret, b.session_secret);
        assert_eq!(AuthConfig::development().session_ttl(), chrono::Duration::days(7));
    }
}
