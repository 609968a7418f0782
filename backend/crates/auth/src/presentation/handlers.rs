//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use std::sync::Arc;

use kernel::clock::Clock;
use kernel::id::IdGenerator;
use ledger::{StateGate, StateStore};

use crate::application::config::AuthConfig;
use crate::application::{
    CheckSessionUseCase, RecoverInput, RecoverUseCase, SignInInput, SignInUseCase, SignUpInput,
    SignUpUseCase,
};
use crate::error::AuthResult;
use crate::presentation::dto::{
    RecoverRequest, RecoverResponse, SessionStatusResponse, SignInRequest, SignInResponse,
    SignUpRequest, SignUpResponse,
};

/// Shared state for auth handlers and the session middleware
pub struct AuthAppState<S> {
    pub gate: Arc<StateGate<S>>,
    pub config: Arc<AuthConfig>,
    pub clock: Arc<dyn Clock>,
    pub ids: Arc<dyn IdGenerator>,
}

// Manual impl: `S` itself need not be Clone
impl<S> Clone for AuthAppState<S> {
    fn clone(&self) -> Self {
        Self {
            gate: self.gate.clone(),
            config: self.config.clone(),
            clock: self.clock.clone(),
            ids: self.ids.clone(),
        }
    }
}

impl<S> AuthAppState<S>
where
    S: StateStore + Sync,
{
    pub fn check_session(&self) -> CheckSessionUseCase<S> {
        CheckSessionUseCase::new(self.gate.clone(), self.config.clone(), self.clock.clone())
    }
}

// ============================================================================
// Sign Up
// ============================================================================

/// POST /api/auth/signup
pub async fn sign_up<S>(
    State(state): State<AuthAppState<S>>,
    Json(req): Json<SignUpRequest>,
) -> AuthResult<(StatusCode, Json<SignUpResponse>)>
where
    S: StateStore + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(
        state.gate.clone(),
        state.config.clone(),
        state.clock.clone(),
        state.ids.clone(),
    );

    let output = use_case
        .execute(SignUpInput {
            username: req.username,
            password: req.password,
            email: req.email,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SignUpResponse {
            user_id: output.user_id,
            username: output.username,
            security_key: output.security_key,
        }),
    ))
}

// ============================================================================
// Sign In
// ============================================================================

/// POST /api/auth/signin
pub async fn sign_in<S>(
    State(state): State<AuthAppState<S>>,
    Json(req): Json<SignInRequest>,
) -> AuthResult<Json<SignInResponse>>
where
    S: StateStore + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(
        state.gate.clone(),
        state.config.clone(),
        state.clock.clone(),
        state.ids.clone(),
    );

    let output = use_case
        .execute(SignInInput {
            username: req.username,
            password: req.password,
        })
        .await?;

    Ok(Json(SignInResponse {
        token: output.session_token,
        expires_at: output.expires_at,
        user_id: output.user_id,
        username: output.username,
        role: output.role,
    }))
}

// ============================================================================
// Recover
// ============================================================================

/// POST /api/auth/recover
pub async fn recover<S>(
    State(state): State<AuthAppState<S>>,
    Json(req): Json<RecoverRequest>,
) -> AuthResult<Json<RecoverResponse>>
where
    S: StateStore + Send + Sync + 'static,
{
    let use_case = RecoverUseCase::new(
        state.gate.clone(),
        state.config.clone(),
        state.clock.clone(),
        state.ids.clone(),
    );

    let output = use_case
        .execute(RecoverInput {
            security_key: req.security_key,
            new_username: req.new_username,
            new_password: req.new_password,
        })
        .await?;

    Ok(Json(RecoverResponse {
        user_id: output.user_id,
        username: output.username,
        security_key: output.security_key,
    }))
}

// ============================================================================
// Session Status
// ============================================================================

/// GET /api/auth/status
pub async fn session_status<S>(
    State(state): State<AuthAppState<S>>,
    headers: HeaderMap,
) -> Json<SessionStatusResponse>
where
    S: StateStore + Send + Sync + 'static,
{
    let current = match bearer_token(&headers) {
        Some(token) => state.check_session().execute(token).await.ok(),
        None => None,
    };

    Json(SessionStatusResponse {
        authenticated: current.is_some(),
        user_id: current.as_ref().map(|c| c.user_id),
        username: current.as_ref().map(|c| c.username.clone()),
        role: current.map(|c| c.role),
    })
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Token from `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
