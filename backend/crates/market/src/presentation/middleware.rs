//! Market Middleware

use auth::CurrentUser;
use axum::Extension;
use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::error::MarketError;

/// Refuse non-admin callers with 403. Must run inside `require_session`.
pub async fn admin_only(
    Extension(current): Extension<CurrentUser>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, MarketError> {
    current.require_admin()?;
    Ok(next.run(req).await)
}
