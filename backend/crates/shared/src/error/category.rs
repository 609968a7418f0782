//! Error Category - Domain-level error taxonomy
//!
//! [`ErrorKind`] says how an error travels over HTTP; [`ErrorCategory`]
//! says what the caller should do about it. Every crate-level error enum
//! classifies itself into one of these.

use serde::Serialize;

use super::kind::ErrorKind;

/// エラー分類
///
/// * `Validation` - 入力が不正。そのまま呼び出し元に返す
/// * `Conflict` - 既に処理済み、または一意制約違反
/// * `Policy` - ロックアウト、残高不足、キャパシティ超過など業務ルール違反
/// * `NotFound` - 参照先が存在しない
/// * `ExternalUnavailable` - 外部協調者 (oracle, store) が応答しない
/// * `Internal` - 不変条件の破綻
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    Validation,
    Conflict,
    Policy,
    NotFound,
    ExternalUnavailable,
    Internal,
}

impl ErrorCategory {
    /// Default HTTP classification for the category.
    ///
    /// Error enums may pick a more specific [`ErrorKind`] (e.g. `Unauthorized`
    /// for a bad credential) but fall back to this mapping.
    #[inline]
    pub const fn default_kind(&self) -> ErrorKind {
        match self {
            ErrorCategory::Validation => ErrorKind::BadRequest,
            ErrorCategory::Conflict => ErrorKind::Conflict,
            ErrorCategory::Policy => ErrorKind::UnprocessableEntity,
            ErrorCategory::NotFound => ErrorKind::NotFound,
            ErrorCategory::ExternalUnavailable => ErrorKind::ServiceUnavailable,
            ErrorCategory::Internal => ErrorKind::InternalServerError,
        }
    }

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Validation => "validation",
            ErrorCategory::Conflict => "conflict",
            ErrorCategory::Policy => "policy",
            ErrorCategory::NotFound => "not_found",
            ErrorCategory::ExternalUnavailable => "external_unavailable",
            ErrorCategory::Internal => "internal",
        }
    }

    /// Whether the failure is on our side (logged at `error` level)
    #[inline]
    pub const fn is_fault(&self) -> bool {
        matches!(
            self,
            ErrorCategory::ExternalUnavailable | ErrorCategory::Internal
        )
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_kinds() {
        assert_eq!(ErrorCategory::Validation.default_kind().status_code(), 400);
        assert_eq!(ErrorCategory::Conflict.default_kind().status_code(), 409);
        assert_eq!(ErrorCategory::Policy.default_kind().status_code(), 422);
        assert_eq!(ErrorCategory::NotFound.default_kind().status_code(), 404);
        assert_eq!(
            ErrorCategory::ExternalUnavailable.default_kind().status_code(),
            503
        );
        assert_eq!(ErrorCategory::Internal.default_kind().status_code(), 500);
    }

    #[test]
    fn test_faults() {
        assert!(ErrorCategory::Internal.is_fault());
        assert!(ErrorCategory::ExternalUnavailable.is_fault());
        assert!(!ErrorCategory::Policy.is_fault());
        assert!(!ErrorCategory::Validation.is_fault());
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_string(&ErrorCategory::ExternalUnavailable).unwrap();
        assert_eq!(json, "\"EXTERNAL_UNAVAILABLE\"");
    }
}
