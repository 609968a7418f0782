//! Session Token
//!
//! Stateless bearer token:
//! `<user id>.<session epoch>.<expiry unix seconds>.<signature>`, where the
//! signature is base64url HMAC-SHA256 over the first three parts. The token
//! only proves identity; role, status and the current epoch are read from
//! the state on every request.

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use platform::crypto::{from_base64_url, hmac_sha256, to_base64_url, verify_hmac_sha256};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionToken {
    pub user_id: UserId,
    pub epoch: u32,
    pub expires_at: DateTime<Utc>,
}

impl SessionToken {
    pub fn new(user_id: UserId, epoch: u32, expires_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            epoch,
            expires_at,
        }
    }

    pub fn sign(&self, secret: &[u8]) -> String {
        let payload = self.payload();
        let signature = hmac_sha256(secret, payload.as_bytes());
        format!("{payload}.{}", to_base64_url(&signature))
    }

    /// `None` when the token is malformed, forged or expired
    pub fn verify(token: &str, secret: &[u8], now: DateTime<Utc>) -> Option<Self> {
        let (payload, signature) = token.rsplit_once('.')?;
        let signature = from_base64_url(signature).ok()?;
        if !verify_hmac_sha256(secret, payload.as_bytes(), &signature) {
            return None;
        }

        let mut parts = payload.split('.');
        let user_id: UserId = parts.next()?.parse().ok()?;
        let epoch: u32 = parts.next()?.parse().ok()?;
        let expires_at = DateTime::from_timestamp(parts.next()?.parse().ok()?, 0)?;
        if parts.next().is_some() {
            return None;
        }

        (expires_at > now).then_some(Self {
            user_id,
            epoch,
            expires_at,
        })
    }

    fn payload(&self) -> String {
        format!(
            "{}.{}.{}",
            self.user_id,
            self.epoch,
            self.expires_at.timestamp()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_sign_and_verify() {
        let token = SessionToken::new(UserId::new(), 0, now() + Duration::hours(1));
        let signed = token.sign(SECRET);
        assert_eq!(SessionToken::verify(&signed, SECRET, now()), Some(token));
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = SessionToken::new(UserId::new(), 0, now() + Duration::hours(1));
        let signed = token.sign(SECRET);
        assert_eq!(
            SessionToken::verify(&signed, SECRET, now() + Duration::hours(2)),
            None
        );
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let signed = SessionToken::new(UserId::new(), 0, now() + Duration::hours(1)).sign(SECRET);
        assert_eq!(
            SessionToken::verify(&signed, b"another secret", now()),
            None
        );
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let victim = UserId::new();
        let signed = SessionToken::new(UserId::new(), 0, now() + Duration::hours(1)).sign(SECRET);
        let (_, rest) = signed.split_once('.').unwrap();
        let forged = format!("{victim}.{rest}");
        assert_eq!(SessionToken::verify(&forged, SECRET, now()), None);
    }

    #[test]
    fn test_epoch_is_signed() {
        let signed = SessionToken::new(UserId::new(), 3, now() + Duration::hours(1)).sign(SECRET);
        assert_eq!(SessionToken::verify(&signed, SECRET, now()).map(|t| t.epoch), Some(3));

        let (user_id, rest) = signed.split_once('.').unwrap();
        let bumped = format!("{user_id}.4{}", &rest[1..]);
        assert_eq!(SessionToken::verify(&bumped, SECRET, now()), None);
    }

    #[test]
    fn test_garbage_rejected() {
        for bad in ["", "abc", "a.b.c", "a.b.c.d", "...."] {
            assert_eq!(SessionToken::verify(bad, SECRET, now()), None, "{bad}");
        }
    }
}
