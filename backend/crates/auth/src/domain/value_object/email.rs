//! Email Value Object
//!
//! Format check only; the address is never contacted.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum email length (per RFC 5321)
const EMAIL_MAX_LENGTH: usize = 254;
const LOCAL_PART_MAX_LENGTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmailError {
    #[error("Email cannot be empty")]
    Empty,
    #[error("Email must be at most 254 characters")]
    TooLong,
    #[error("Invalid email format")]
    InvalidFormat,
}

/// Trimmed, lowercase email address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    pub fn parse(input: impl AsRef<str>) -> Result<Self, EmailError> {
        let email = input.as_ref().trim().to_lowercase();

        if email.is_empty() {
            return Err(EmailError::Empty);
        }
        if email.len() > EMAIL_MAX_LENGTH {
            return Err(EmailError::TooLong);
        }
        if !is_valid_format(&email) {
            return Err(EmailError::InvalidFormat);
        }

        Ok(Self(email))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

fn is_valid_format(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || local.len() > LOCAL_PART_MAX_LENGTH || domain.contains('@') {
        return false;
    }

    domain.contains('.')
        && domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        && !domain.starts_with(['.', '-'])
        && !domain.ends_with(['.', '-'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes() {
        let email = Email::parse("  Alice@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "alice@example.com");
        assert_eq!(email.to_string(), "alice@example.com");
    }

    #[test]
    fn test_rejects_bad_formats() {
        assert_eq!(Email::parse(""), Err(EmailError::Empty));
        for bad in [
            "alice",
            "@example.com",
            "alice@",
            "alice@localhost",
            "a@b@example.com",
            "alice@.example.com",
            "alice@example.com-",
            "alice@exa mple.com",
        ] {
            assert_eq!(Email::parse(bad), Err(EmailError::InvalidFormat), "{bad}");
        }
    }

    #[test]
    fn test_length_limit() {
        let long = format!("{}@example.com", "a".repeat(EMAIL_MAX_LENGTH));
        assert_eq!(Email::parse(long), Err(EmailError::TooLong));
    }
}
