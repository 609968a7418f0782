//! Market Router

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use auth::{AuthAppState, require_session};
use ledger::StateStore;

use crate::domain::ProofOracle;
use crate::presentation::handlers::{self, MarketAppState};
use crate::presentation::middleware::admin_only;

/// Session-protected market routes, mounted under `/api`.
/// Everything under `/admin` additionally requires the admin role.
pub fn market_router<S, O>(state: MarketAppState<S, O>, auth: AuthAppState<S>) -> Router
where
    S: StateStore + Send + Sync + 'static,
    O: ProofOracle + Send + Sync + 'static,
{
    let admin = Router::new()
        .route("/dashboard", get(handlers::dashboard::<S, O>))
        .route("/users", get(handlers::users::<S, O>))
        .route("/users/{id}", get(handlers::user_detail::<S, O>))
        .route("/users/{id}/status", put(handlers::set_user_status::<S, O>))
        .route("/logs", get(handlers::logs::<S, O>))
        .route(
            "/cashflow/daily-limit",
            put(handlers::set_daily_limit::<S, O>),
        )
        .route(
            "/config/min-withdrawal",
            put(handlers::set_min_withdrawal::<S, O>),
        )
        .route("/submissions", get(handlers::open_submissions::<S, O>))
        .route(
            "/submissions/{id}/approve",
            post(handlers::approve_submission::<S, O>),
        )
        .route(
            "/submissions/{id}/reject",
            post(handlers::reject_submission::<S, O>),
        )
        .route("/payouts", get(handlers::payout_queue::<S, O>))
        .route(
            "/payouts/{id}/approve",
            post(handlers::approve_payout::<S, O>),
        )
        .route("/payouts/{id}/reject", post(handlers::reject_payout::<S, O>))
        .route("/payouts/{id}/hold", post(handlers::hold_payout::<S, O>))
        .route(
            "/campaigns",
            get(handlers::all_campaigns::<S, O>).post(handlers::create_campaign::<S, O>),
        )
        .route(
            "/campaigns/{id}",
            put(handlers::edit_campaign::<S, O>).delete(handlers::delete_campaign::<S, O>),
        )
        .route(
            "/campaigns/{id}/toggle",
            post(handlers::toggle_campaign::<S, O>),
        )
        .route("/broadcasts", post(handlers::broadcast::<S, O>))
        .route("/reports", get(handlers::reports::<S, O>))
        .route(
            "/reports/{id}/resolve",
            post(handlers::resolve_report::<S, O>),
        )
        .route_layer(middleware::from_fn(admin_only));

    Router::new()
        .route("/campaigns", get(handlers::active_campaigns::<S, O>))
        .route("/submissions", post(handlers::submit_proof::<S, O>))
        .route("/submissions/batch", post(handlers::submit_batch::<S, O>))
        .route("/me", get(handlers::wallet::<S, O>))
        .route("/me/history", get(handlers::history::<S, O>))
        .route(
            "/me/payout-settings",
            put(handlers::set_payout_settings::<S, O>),
        )
        .route("/payouts", post(handlers::request_payout::<S, O>))
        .route("/inbox", get(handlers::inbox::<S, O>))
        .route("/inbox/{id}/read", post(handlers::mark_read::<S, O>))
        .route("/reports", post(handlers::file_report::<S, O>))
        .nest("/admin", admin)
        .route_layer(middleware::from_fn_with_state(auth, require_session::<S>))
        .with_state(state)
}
