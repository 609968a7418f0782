//! Auth Router

use axum::{
    Router,
    routing::{get, post},
};

use ledger::StateStore;

use crate::presentation::handlers::{self, AuthAppState};

/// Public auth routes, mounted under `/api/auth`
pub fn auth_router<S>(state: AuthAppState<S>) -> Router
where
    S: StateStore + Send + Sync + 'static,
{
    Router::new()
        .route("/signup", post(handlers::sign_up::<S>))
        .route("/signin", post(handlers::sign_in::<S>))
        .route("/recover", post(handlers::recover::<S>))
        .route("/status", get(handlers::session_status::<S>))
        .with_state(state)
}
