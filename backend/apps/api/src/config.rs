//! Startup configuration read from the environment (and `.env`)

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, ensure};
use auth::BootstrapAdmin;
use axum::http::HeaderValue;
use base64::Engine;
use base64::engine::general_purpose;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:31113";
const DEFAULT_ORIGINS: &str = "http://localhost:40922,http://127.0.0.1:40922";
const DEFAULT_ORACLE_TIMEOUT_MS: u64 = 20_000;

pub struct ApiConfig {
    /// No URL means the in-memory store (state is lost on restart)
    pub database_url: Option<String>,
    /// `None` only in debug builds, where a random secret is generated
    pub session_secret: Option<[u8; 32]>,
    pub bind_addr: SocketAddr,
    pub frontend_origins: Vec<HeaderValue>,
    /// No URL means every proof goes to manual audit
    pub oracle_url: Option<String>,
    pub oracle_timeout: Duration,
    pub lockout_threshold: Option<u32>,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let session_secret = match var("SESSION_SECRET") {
            Some(encoded) => Some(decode_secret(&encoded)?),
            None => {
                ensure!(
                    cfg!(debug_assertions),
                    "SESSION_SECRET must be set in release builds"
                );
                None
            }
        };

        let bind_addr = var("BIND_ADDR")
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
            .context("BIND_ADDR is not a socket address")?;

        let frontend_origins = var("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_ORIGINS.to_string())
            .split(',')
            .filter_map(|origin| origin.trim().parse().ok())
            .collect();

        let oracle_timeout = match var("PROOF_ORACLE_TIMEOUT_MS") {
            Some(ms) => ms
                .parse()
                .context("PROOF_ORACLE_TIMEOUT_MS is not a number")?,
            None => DEFAULT_ORACLE_TIMEOUT_MS,
        };

        let lockout_threshold = var("LOCKOUT_THRESHOLD")
            .map(|n| n.parse::<u32>())
            .transpose()
            .context("LOCKOUT_THRESHOLD is not a number")?;

        let bootstrap_admin = match (
            var("BOOTSTRAP_ADMIN_USERNAME"),
            var("BOOTSTRAP_ADMIN_PASSWORD"),
        ) {
            (Some(username), Some(password)) => Some(BootstrapAdmin {
                email: var("BOOTSTRAP_ADMIN_EMAIL")
                    .unwrap_or_else(|| format!("{}@localhost", username.trim())),
                username,
                password,
            }),
            (None, None) => None,
            _ => anyhow::bail!(
                "BOOTSTRAP_ADMIN_USERNAME and BOOTSTRAP_ADMIN_PASSWORD must be set together"
            ),
        };

        Ok(Self {
            database_url: var("DATABASE_URL"),
            session_secret,
            bind_addr,
            frontend_origins,
            oracle_url: var("PROOF_ORACLE_URL"),
            oracle_timeout: Duration::from_millis(oracle_timeout),
            lockout_threshold,
            bootstrap_admin,
        })
    }
}

/// Non-empty environment variable
fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn decode_secret(encoded: &str) -> anyhow::Result<[u8; 32]> {
    let bytes = general_purpose::STANDARD
        .decode(encoded.trim())
        .context("SESSION_SECRET is not valid base64")?;
    bytes
        .try_into()
        .map_err(|b: Vec<u8>| anyhow::anyhow!("SESSION_SECRET must be 32 bytes, got {}", b.len()))
}
