//! PostgreSQL State Store
//!
//! One row in `app_state` holds the whole document as JSONB. Saves are a
//! compare-and-swap on `revision`: a save based on a stale revision
//! affects no rows and fails with `StoreError::RevisionConflict`.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use sqlx::PgPool;
use sqlx::types::Json;

use crate::domain::repository::StateStore;
use crate::domain::state::MarketState;
use crate::error::{StoreError, StoreResult};

const DOCUMENT_ROW_ID: i16 = 1;

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStateStore {
    pool: PgPool,
    /// Revision of the last document loaded or saved; 0 means no row yet
    revision: Arc<AtomicI64>,
}

impl PgStateStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            revision: Arc::new(AtomicI64::new(0)),
        }
    }

    pub fn revision(&self) -> i64 {
        self.revision.load(Ordering::Acquire)
    }
}

impl StateStore for PgStateStore {
    async fn load(&self) -> StoreResult<Option<MarketState>> {
        let row = sqlx::query_as::<_, (serde_json::Value, i64)>(
            "SELECT document, revision FROM app_state WHERE id = $1",
        )
        .bind(DOCUMENT_ROW_ID)
        .fetch_optional(&self.pool)
        .await?;

        let Some((document, revision)) = row else {
            tracing::info!("No state document stored yet");
            return Ok(None);
        };

        let state: MarketState = serde_json::from_value(document)?;
        self.revision.store(revision, Ordering::Release);
        tracing::info!(revision, "State document loaded from database");
        Ok(Some(state))
    }

    async fn save(&self, state: &MarketState) -> StoreResult<()> {
        let expected = self.revision();

        let rows = if expected == 0 {
            sqlx::query(
                r#"
                INSERT INTO app_state (id, document, revision)
                VALUES ($1, $2, 1)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(DOCUMENT_ROW_ID)
            .bind(Json(state))
            .execute(&self.pool)
            .await?
            .rows_affected()
        } else {
            sqlx::query(
                r#"
                UPDATE app_state
                SET document = $2, revision = revision + 1, updated_at = now()
                WHERE id = $1 AND revision = $3
                "#,
            )
            .bind(DOCUMENT_ROW_ID)
            .bind(Json(state))
            .bind(expected)
            .execute(&self.pool)
            .await?
            .rows_affected()
        };

        if rows == 0 {
            return Err(StoreError::RevisionConflict { expected });
        }

        self.revision.store(expected + 1, Ordering::Release);
        tracing::debug!(revision = expected + 1, "State document saved");
        Ok(())
    }
}
