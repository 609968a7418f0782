//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod config;

use std::sync::Arc;

use auth::{AuthAppState, AuthConfig, auth_router};
use axum::{
    Router,
    http::{Method, header},
};
use kernel::clock::{Clock, SystemClock};
use kernel::id::{IdGenerator, RandomIds};
use ledger::{MemoryStateStore, PgStateStore, StateGate, StateStore};
use market::{
    ConfiguredOracle, HttpProofOracle, ManualReviewOracle, MarketAppState, MarketConfig,
    MarketContext, market_router,
};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,auth=info,market=info,ledger=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env()?;

    match config.database_url.clone() {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(&database_url)
                .await?;

            tracing::info!("Connected to database");

            // Run migrations
            sqlx::migrate!("../../../database/migrations")
                .run(&pool)
                .await?;

            tracing::info!("Migrations completed");

            serve(PgStateStore::new(pool), config).await
        }
        None => {
            tracing::warn!("DATABASE_URL not set, state is kept in memory only");
            serve(MemoryStateStore::new(), config).await
        }
    }
}

async fn serve<S>(store: S, config: ApiConfig) -> anyhow::Result<()>
where
    S: StateStore + Send + Sync + 'static,
{
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let ids: Arc<dyn IdGenerator> = Arc::new(RandomIds);

    // Auth configuration
    let mut auth_config = match config.session_secret {
        Some(session_secret) => AuthConfig {
            session_secret,
            ..AuthConfig::default()
        },
        None => {
            tracing::warn!("SESSION_SECRET not set, using a random development secret");
            AuthConfig::development()
        }
    };
    if let Some(threshold) = config.lockout_threshold {
        auth_config.lockout_threshold = threshold;
    }

    // A fresh document is seeded with the bootstrap admin
    let bootstrap = config
        .bootstrap_admin
        .map(|admin| admin.build(&auth_config, ids.as_ref(), clock.as_ref()))
        .transpose()?;
    let gate = Arc::new(
        StateGate::open(store, |state| {
            if let Some(admin) = bootstrap {
                state.users.push(admin);
            }
        })
        .await?,
    );
    if !gate.read(|s| s.has_admin()).await {
        tracing::warn!("State document has no admin account");
    }

    // Proof oracle
    let oracle = match &config.oracle_url {
        Some(url) => {
            tracing::info!(endpoint = %url, "Using HTTP proof oracle");
            ConfiguredOracle::Http(HttpProofOracle::new(url.as_str(), config.oracle_timeout)?)
        }
        None => {
            tracing::info!("PROOF_ORACLE_URL not set, every proof goes to manual audit");
            ConfiguredOracle::Manual(ManualReviewOracle)
        }
    };
    let market_config = MarketConfig::default().with_oracle_timeout(config.oracle_timeout);

    let auth_state = AuthAppState {
        gate: gate.clone(),
        config: Arc::new(auth_config),
        clock: clock.clone(),
        ids: ids.clone(),
    };
    let market_state = MarketAppState::new(
        MarketContext::new(gate, Arc::new(market_config), clock, ids),
        Arc::new(oracle),
    );

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(config.frontend_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .nest("/api/auth", auth_router(auth_state.clone()))
        .nest("/api", market_router(market_state, auth_state))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    tracing::info!("Listening on {}", config.bind_addr);

    let listener = TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
