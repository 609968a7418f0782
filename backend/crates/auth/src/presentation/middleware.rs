//! Auth Middleware
//!
//! Middleware for requiring authentication on protected routes.

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use ledger::StateStore;

use crate::error::AuthError;
use crate::presentation::handlers::{AuthAppState, bearer_token};

/// Require a valid bearer token; inserts [`CurrentUser`] into the request
/// extensions for downstream handlers.
///
/// [`CurrentUser`]: crate::application::CurrentUser
pub async fn require_session<S>(
    State(state): State<AuthAppState<S>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError>
where
    S: StateStore + Send + Sync + 'static,
{
    let token = bearer_token(req.headers())
        .map(str::to_owned)
        .ok_or(AuthError::SessionInvalid)?;
    let current = state.check_session().execute(&token).await?;

    req.extensions_mut().insert(current);
    Ok(next.run(req).await)
}
