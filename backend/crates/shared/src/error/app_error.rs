//! Application Error - Unified error type for the application
//!
//! Defines [`AppError`] struct and [`AppResult<T>`] type alias.

use std::borrow::Cow;
use std::error::Error;
use std::fmt;

use super::category::ErrorCategory;
use super::kind::ErrorKind;

/// アプリケーション統一エラー型
///
/// 各クレートのエラー列挙体は最終的にこの型へ変換され、HTTP 境界で
/// RFC 7807 形式のボディになる。
///
/// ## Examples
/// ```rust
/// use kernel::error::{app_error::AppError, category::ErrorCategory};
///
/// let err = AppError::unprocessable("Amount is below the minimum withdrawal")
///     .with_category(ErrorCategory::Policy)
///     .with_action("Request at least the minimum amount");
/// assert_eq!(err.status_code(), 422);
/// ```
pub struct AppError {
    kind: ErrorKind,
    category: ErrorCategory,
    message: Cow<'static, str>,
    action: Option<Cow<'static, str>>,
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

/// `Result<T, AppError>` の省略形
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// 新しいエラーを作成
    ///
    /// カテゴリは種別から推定する。呼び出し側が知っている場合は
    /// [`AppError::with_category`] で上書きする。
    #[inline]
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            category: category_for(kind),
            message: message.into(),
            action: None,
            source: None,
        }
    }

    /// Build from a domain classification, using the category's default kind
    #[inline]
    pub fn from_category(category: ErrorCategory, message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(category.default_kind(), message).with_category(category)
    }

    // ========================================================================
    // Convenience constructors
    // ========================================================================

    #[inline]
    pub fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    #[inline]
    pub fn unauthorized(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    #[inline]
    pub fn forbidden(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    #[inline]
    pub fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    #[inline]
    pub fn conflict(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    #[inline]
    pub fn unprocessable(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::UnprocessableEntity, message)
    }

    #[inline]
    pub fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InternalServerError, message)
    }

    #[inline]
    pub fn service_unavailable(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::ServiceUnavailable, message)
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    #[inline]
    pub fn with_category(mut self, category: ErrorCategory) -> Self {
        self.category = category;
        self
    }

    /// ユーザーが取るべきアクションを設定
    #[inline]
    pub fn with_action(mut self, action: impl Into<Cow<'static, str>>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// 元のエラーを設定（デバッグ用）
    #[inline]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[inline]
    pub fn category(&self) -> ErrorCategory {
        self.category
    }

    #[inline]
    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[inline]
    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    #[inline]
    pub fn is_server_error(&self) -> bool {
        self.kind.is_server_error()
    }
}

fn category_for(kind: ErrorKind) -> ErrorCategory {
    match kind {
        ErrorKind::BadRequest => ErrorCategory::Validation,
        ErrorKind::Conflict => ErrorCategory::Conflict,
        ErrorKind::NotFound => ErrorCategory::NotFound,
        ErrorKind::ServiceUnavailable => ErrorCategory::ExternalUnavailable,
        ErrorKind::InternalServerError => ErrorCategory::Internal,
        ErrorKind::Unauthorized
        | ErrorKind::Forbidden
        | ErrorKind::UnprocessableEntity
        | ErrorKind::Locked => ErrorCategory::Policy,
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = f.debug_struct("AppError");
        builder.field("kind", &self.kind);
        builder.field("category", &self.category);
        builder.field("message", &self.message);
        if let Some(action) = &self.action {
            builder.field("action", action);
        }
        if let Some(source) = &self.source {
            builder.field("source", source);
        }
        builder.finish()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        if let Some(action) = &self.action {
            write!(f, " (Action: {})", action)?;
        }
        Ok(())
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}

// ============================================================================
// Result extension traits
// ============================================================================

/// `Result<T, E>` を `AppResult<T>` に変換するための拡張トレイト
pub trait ResultExt<T, E> {
    fn map_app_err(self, kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> AppResult<T>
    where
        E: Error + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn map_app_err(self, kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> AppResult<T>
    where
        E: Error + Send + Sync + 'static,
    {
        self.map_err(|e| AppError::new(kind, message).with_source(e))
    }
}

/// `Option<T>` を `AppResult<T>` に変換するための拡張トレイト
pub trait OptionExt<T> {
    fn ok_or_app_err(self, kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_app_err(self, kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> AppResult<T> {
        self.ok_or_else(|| AppError::new(kind, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_error_infers_category() {
        let err = AppError::new(ErrorKind::Locked, "Account locked");
        assert_eq!(err.status_code(), 423);
        assert_eq!(err.category(), ErrorCategory::Policy);
        assert!(err.action().is_none());

        assert_eq!(
            AppError::conflict("Already resolved").category(),
            ErrorCategory::Conflict
        );
        assert_eq!(
            AppError::service_unavailable("Store down").category(),
            ErrorCategory::ExternalUnavailable
        );
    }

    #[test]
    fn test_from_category() {
        let err = AppError::from_category(ErrorCategory::Policy, "Daily capacity exceeded");
        assert_eq!(err.kind(), ErrorKind::UnprocessableEntity);
        assert_eq!(err.category(), ErrorCategory::Policy);
    }

    #[test]
    fn test_explicit_category_wins() {
        let err = AppError::unauthorized("Invalid credential").with_category(ErrorCategory::Policy);
        assert_eq!(err.status_code(), 401);
        assert_eq!(err.category(), ErrorCategory::Policy);
    }

    #[test]
    fn test_with_source_and_action() {
        let io_err = std::io::Error::other("disk full");
        let err = AppError::internal("Failed to persist state")
            .with_source(io_err)
            .with_action("Retry later");
        assert!(err.source().is_some());
        assert_eq!(err.action(), Some("Retry later"));
        assert!(err.to_string().contains("Action:"));
    }

    #[test]
    fn test_display() {
        let err = AppError::not_found("Campaign not found");
        assert_eq!(err.to_string(), "[Not Found] Campaign not found");
    }

    #[test]
    fn test_result_ext() {
        let result: Result<i32, std::num::ParseIntError> = "abc".parse::<i32>();
        let err = result
            .map_app_err(ErrorKind::BadRequest, "Invalid number")
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_option_ext() {
        let none: Option<i32> = None;
        let err = none
            .ok_or_app_err(ErrorKind::InternalServerError, "Missing secret")
            .unwrap_err();
        assert_eq!(err.status_code(), 500);

        assert_eq!(
            Some(7).ok_or_app_err(ErrorKind::NotFound, "x").unwrap(),
            7
        );
    }
}
