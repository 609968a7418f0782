//! User Name Value Object
//!
//! ユーザー名はログインと画面表示に使う公開ハンドル。
//! 保存・比較は常に正規形（小文字）で行う。
//!
//! ## 正規化
//! NFKC → trim → 小文字化 → 検証
//!
//! ## 不変条件
//! - 長さ: 3〜30文字
//! - 使用可能文字: a-z, 0-9, `_ . - +`
//! - 先頭・末尾は英数字または `_`
//! - 連続ドット禁止
//! - 予約語禁止（ブートストラップ管理者を除く）

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

pub const USER_NAME_MIN_LENGTH: usize = 3;
pub const USER_NAME_MAX_LENGTH: usize = 30;

const ALLOWED_SPECIAL_CHARS: &[char] = &['_', '.', '-', '+'];

/// Names that would impersonate the platform or collide with routes
const RESERVED_WORDS: &[&str] = &[
    "admin",
    "administrator",
    "root",
    "system",
    "support",
    "staff",
    "moderator",
    "api",
    "auth",
    "signin",
    "signup",
    "recover",
    "campaigns",
    "submissions",
    "payouts",
    "wallet",
    "dashboard",
    "broadcast",
    "reports",
    "official",
    "verified",
    "null",
    "undefined",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserNameError {
    #[error("User name cannot be empty")]
    Empty,

    #[error("User name must be {min}-{max} characters (got {length})")]
    Length {
        length: usize,
        min: usize,
        max: usize,
    },

    #[error("Invalid character '{char}' in user name; only a-z, 0-9, _ . - + are allowed")]
    InvalidCharacter { char: char },

    #[error("User name must start and end with a letter, digit or '_'")]
    InvalidBoundary,

    #[error("User name cannot contain '..'")]
    ConsecutiveDots,

    #[error("'{0}' is a reserved user name")]
    Reserved(String),
}

/// Validated, canonical (lowercase) user name
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    /// Parse user input; reserved words are rejected
    pub fn parse(input: impl AsRef<str>) -> Result<Self, UserNameError> {
        let name = Self::parse_unreserved(input)?;
        if RESERVED_WORDS.contains(&name.0.as_str()) {
            return Err(UserNameError::Reserved(name.0));
        }
        Ok(name)
    }

    /// Parse without the reserved-word check. Only for operator-provided
    /// names such as the bootstrap admin.
    pub fn parse_unreserved(input: impl AsRef<str>) -> Result<Self, UserNameError> {
        let canonical = Self::canonicalize(input.as_ref());
        Self::validate(&canonical)?;
        Ok(Self(canonical))
    }

    /// Canonical form used for lookups. Does not validate.
    pub fn canonicalize(input: &str) -> String {
        input.nfkc().collect::<String>().trim().to_lowercase()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    pub fn is_reserved(name: &str) -> bool {
        RESERVED_WORDS.contains(&Self::canonicalize(name).as_str())
    }

    fn validate(canonical: &str) -> Result<(), UserNameError> {
        let (Some(first), Some(last)) = (canonical.chars().next(), canonical.chars().next_back())
        else {
            return Err(UserNameError::Empty);
        };

        let length = canonical.chars().count();
        if !(USER_NAME_MIN_LENGTH..=USER_NAME_MAX_LENGTH).contains(&length) {
            return Err(UserNameError::Length {
                length,
                min: USER_NAME_MIN_LENGTH,
                max: USER_NAME_MAX_LENGTH,
            });
        }

        if let Some(bad) = canonical.chars().find(|&c| !is_name_char(c)) {
            return Err(UserNameError::InvalidCharacter { char: bad });
        }

        if !is_boundary_char(first) || !is_boundary_char(last) {
            return Err(UserNameError::InvalidBoundary);
        }

        if canonical.contains("..") {
            return Err(UserNameError::ConsecutiveDots);
        }

        Ok(())
    }
}

#[inline]
fn is_name_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || ALLOWED_SPECIAL_CHARS.contains(&c)
}

#[inline]
fn is_boundary_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'
}

impl fmt::Debug for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UserName").field(&self.0).finish()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserName {
    type Error = UserNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<UserName> for String {
    fn from(name: UserName) -> Self {
        name.0
    }
}
