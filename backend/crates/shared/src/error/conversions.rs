//! Error conversions
//!
//! Problem Details rendering at the HTTP boundary, plus the conversion for
//! malformed JSON that reaches a handler outside a typed extractor.

use super::app_error::AppError;

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_data() || err.is_eof() {
            AppError::bad_request(format!("JSON parse error: {}", err)).with_source(err)
        } else {
            AppError::internal("JSON serialization error").with_source(err)
        }
    }
}

/// RFC 7807 body; `category` lets clients tell policy refusals (422/423)
/// from conflicts (409) without parsing `detail`
#[cfg(feature = "axum")]
fn problem_details(err: &AppError) -> serde_json::Value {
    serde_json::json!({
        "type": format!("https://httpstatuses.io/{}", err.status_code()),
        "title": err.kind().as_str(),
        "status": err.status_code(),
        "category": err.category(),
        "detail": err.message(),
        "action": err.action(),
    })
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(problem_details(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::category::ErrorCategory;
    use crate::error::kind::ErrorKind;

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let app_err: AppError = json_err.into();
        assert_eq!(app_err.kind(), ErrorKind::BadRequest);
        assert_eq!(app_err.category(), ErrorCategory::Validation);
    }

    #[cfg(feature = "axum")]
    #[test]
    fn test_problem_details_carry_category_and_action() {
        use axum::response::IntoResponse;

        let err = AppError::new(ErrorKind::Locked, "Account is locked for another 2h")
            .with_category(ErrorCategory::Policy)
            .with_action("Try again later");
        let body = problem_details(&err);
        assert_eq!(body["status"], 423);
        assert_eq!(body["category"], "POLICY");
        assert_eq!(body["action"], "Try again later");

        assert_eq!(err.into_response().status().as_u16(), 423);
    }
}
