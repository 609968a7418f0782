//! Proof Link Value Object
//!
//! A submitted post: its public URL and the handle it was posted from.

use crate::error::{MarketError, MarketResult};

pub const LINK_MAX_LENGTH: usize = 500;
pub const HANDLE_MAX_LENGTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofLink {
    link: String,
    handle: String,
}

impl ProofLink {
    /// Validate a link and handle. The handle is stored without a leading `@`.
    pub fn parse(link: &str, handle: &str) -> MarketResult<Self> {
        let link = link.trim();
        if link.is_empty() {
            return Err(MarketError::validation("Proof link is required"));
        }
        if link.len() > LINK_MAX_LENGTH {
            return Err(MarketError::validation(format!(
                "Proof link must be at most {LINK_MAX_LENGTH} characters"
            )));
        }
        let rest = link
            .strip_prefix("https://")
            .or_else(|| link.strip_prefix("http://"))
            .ok_or_else(|| MarketError::validation("Proof link must be an http(s) URL"))?;
        if rest.is_empty() || rest.chars().any(char::is_whitespace) {
            return Err(MarketError::validation("Proof link is not a valid URL"));
        }

        let handle = handle.trim().trim_start_matches('@');
        if handle.is_empty() {
            return Err(MarketError::validation("Social handle is required"));
        }
        if handle.chars().count() > HANDLE_MAX_LENGTH || handle.chars().any(char::is_whitespace) {
            return Err(MarketError::validation("Social handle is not valid"));
        }

        Ok(Self {
            link: link.to_string(),
            handle: handle.to_string(),
        })
    }

    pub fn link(&self) -> &str {
        &self.link
    }

    pub fn handle(&self) -> &str {
        &self.handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_and_normalizes() {
        let proof = ProofLink::parse(
            "  https://instagram.com/reel/abc123 ",
            "@creator.one",
        )
        .unwrap();
        assert_eq!(proof.link(), "https://instagram.com/reel/abc123");
        assert_eq!(proof.handle(), "creator.one");
    }

    #[test]
    fn test_rejects_bad_links() {
        for link in ["", "ftp://x.y", "instagram.com/reel/1", "https://", "https://a b"] {
            assert!(
                matches!(ProofLink::parse(link, "creator"), Err(MarketError::Validation(_))),
                "{link}"
            );
        }
    }

    #[test]
    fn test_rejects_bad_handles() {
        for handle in ["", "@", "two words"] {
            assert!(
                ProofLink::parse("https://facebook.com/p/1", handle).is_err(),
                "{handle}"
            );
        }
    }
}
