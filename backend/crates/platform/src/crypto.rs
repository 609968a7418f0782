//! Cryptographic Utilities

use base64::{Engine, engine::general_purpose};
use hmac::{Hmac, Mac};
use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Crockford base32 (no I, L, O, U) so keys survive being read aloud
const KEY_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Recovery key prefix
pub const SECURITY_KEY_PREFIX: &str = "RE";

const SECURITY_KEY_GROUPS: usize = 4;
const SECURITY_KEY_GROUP_LEN: usize = 4;

/// Generate cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Compute SHA-256 hash
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Encode bytes as base64
pub fn to_base64(bytes: &[u8]) -> String {
    general_purpose::STANDARD.encode(bytes)
}

/// Decode base64 to bytes
pub fn from_base64(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::STANDARD.decode(s)
}

/// Encode bytes as URL-safe base64 without padding (token transport)
pub fn to_base64_url(bytes: &[u8]) -> String {
    general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode URL-safe base64 without padding
pub fn from_base64_url(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::URL_SAFE_NO_PAD.decode(s)
}

/// Compute HMAC-SHA256
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> [u8; 32] {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().into()
}

/// Verify an HMAC-SHA256 tag in constant time
pub fn verify_hmac_sha256(key: &[u8], data: &[u8], tag: &[u8]) -> bool {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.verify_slice(tag).is_ok()
}

/// Constant-time comparison to prevent timing attacks
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

/// Generate an account recovery key, e.g. `RE-7K2M-Q9XD-4TNB-H0CE`
///
/// 80 bits of entropy. The clear key is shown to the user once; only
/// [`security_key_digest`] is ever stored.
pub fn generate_security_key() -> String {
    let bytes = random_bytes(SECURITY_KEY_GROUPS * SECURITY_KEY_GROUP_LEN);
    let mut key = String::from(SECURITY_KEY_PREFIX);
    for group in bytes.chunks(SECURITY_KEY_GROUP_LEN) {
        key.push('-');
        // 256 is a multiple of 32: masking keeps the distribution uniform
        key.extend(group.iter().map(|b| KEY_ALPHABET[(b & 0x1f) as usize] as char));
    }
    key
}

/// Storage digest of a recovery key (base64 SHA-256 of the normalized key)
///
/// Normalization trims surrounding whitespace and upper-cases, so a key
/// typed in lower case still matches.
pub fn security_key_digest(key: &str) -> String {
    let normalized = key.trim().to_ascii_uppercase();
    to_base64(&sha256(normalized.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_values() {
        let hash = sha256(b"");
        let expected =
            hex::decode("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855")
                .unwrap();
        assert_eq!(hash.to_vec(), expected);

        let hash = sha256(b"hello");
        let expected =
            hex::decode("2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824")
                .unwrap();
        assert_eq!(hash.to_vec(), expected);
    }

    #[test]
    fn test_hmac_rfc4231_case_2() {
        let mac = hmac_sha256(b"Jefe", b"what do ya want for nothing?");
        let expected =
            hex::decode("5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843")
                .unwrap();
        assert_eq!(mac.to_vec(), expected);
    }

    #[test]
    fn test_verify_hmac() {
        let key = [42u8; 32];
        let tag = hmac_sha256(&key, b"payload");
        assert!(verify_hmac_sha256(&key, b"payload", &tag));
        assert!(!verify_hmac_sha256(&key, b"tampered", &tag));
        assert!(!verify_hmac_sha256(&[7u8; 32], b"payload", &tag));
    }

    #[test]
    fn test_random_bytes() {
        let bytes = random_bytes(32);
        assert_eq!(bytes.len(), 32);
        assert!(bytes.iter().any(|&b| b != 0));
    }

    #[test]
    fn test_base64_url_has_no_padding() {
        let encoded = to_base64_url(&[0xff, 0xee]);
        assert!(!encoded.contains('='));
        assert_eq!(from_base64_url(&encoded).unwrap(), vec![0xff, 0xee]);
        assert_eq!(from_base64(&to_base64(b"abc")).unwrap(), b"abc");
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(&[1, 2, 3], &[1, 2, 3]));
        assert!(!constant_time_eq(&[1, 2, 3], &[1, 2, 4]));
        assert!(!constant_time_eq(&[1, 2], &[1, 2, 3]));
    }

    #[test]
    fn test_security_key_format() {
        let key = generate_security_key();
        let parts: Vec<&str> = key.split('-').collect();
        assert_eq!(parts.len(), 1 + SECURITY_KEY_GROUPS);
        assert_eq!(parts[0], SECURITY_KEY_PREFIX);
        for group in &parts[1..] {
            assert_eq!(group.len(), SECURITY_KEY_GROUP_LEN);
            assert!(group.bytes().all(|b| KEY_ALPHABET.contains(&b)));
        }
        assert_ne!(key, generate_security_key());
    }

    #[test]
    fn test_security_key_digest_normalizes() {
        let key = "RE-7K2M-Q9XD-4TNB-H0CE";
        assert_eq!(
            security_key_digest(key),
            security_key_digest("  re-7k2m-q9xd-4tnb-h0ce ")
        );
        assert_ne!(
            security_key_digest(key),
            security_key_digest("RE-7K2M-Q9XD-4TNB-H0CF")
        );
    }
}
