//! In-Memory State Store
//!
//! Keeps the document as serialized JSON so that every save and load goes
//! through the same encoding as the PostgreSQL store. Used for local runs
//! without `DATABASE_URL` and throughout the tests.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::repository::StateStore;
use crate::domain::state::MarketState;
use crate::error::{StoreError, StoreResult};

#[derive(Default)]
struct Slot {
    document: Option<String>,
    saves: u64,
    fail_saves: bool,
    stale_next_save: bool,
}

/// Cloning shares the underlying document
#[derive(Clone, Default)]
pub struct MemoryStateStore {
    slot: Arc<Mutex<Slot>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an already persisted document
    pub fn with_document(state: &MarketState) -> Self {
        let store = Self::new();
        store.replace_document(state);
        store
    }

    /// Make every subsequent save fail with `StoreError::Unavailable`
    pub fn fail_saves(&self, fail: bool) {
        if let Ok(mut slot) = self.slot.lock() {
            slot.fail_saves = fail;
        }
    }

    /// Overwrite the persisted document, as another writer would
    pub fn replace_document(&self, state: &MarketState) {
        if let Ok(mut slot) = self.slot.lock() {
            slot.document = serde_json::to_string(state).ok();
        }
    }

    /// Refuse the next save with `StoreError::RevisionConflict`
    pub fn reject_next_save_as_stale(&self) {
        if let Ok(mut slot) = self.slot.lock() {
            slot.stale_next_save = true;
        }
    }

    /// Number of successful saves
    pub fn save_count(&self) -> u64 {
        self.slot.lock().map(|slot| slot.saves).unwrap_or(0)
    }

    /// Decode the currently persisted document
    pub fn snapshot(&self) -> Option<MarketState> {
        let slot = self.slot.lock().ok()?;
        slot.document
            .as_deref()
            .and_then(|doc| serde_json::from_str(doc).ok())
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Slot>> {
        self.slot
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))
    }
}

impl StateStore for MemoryStateStore {
    async fn load(&self) -> StoreResult<Option<MarketState>> {
        let slot = self.lock()?;
        match slot.document.as_deref() {
            Some(doc) => Ok(Some(serde_json::from_str(doc)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, state: &MarketState) -> StoreResult<()> {
        let encoded = serde_json::to_string(state)?;
        let mut slot = self.lock()?;
        if slot.fail_saves {
            return Err(StoreError::Unavailable("memory store rejected save".into()));
        }
        if std::mem::take(&mut slot.stale_next_save) {
            return Err(StoreError::RevisionConflict {
                expected: slot.saves as i64,
            });
        }
        slot.document = Some(encoded);
        slot.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::user::fixtures::user;
    use tokio_test::block_on;

    #[test]
    fn test_load_empty() {
        let store = MemoryStateStore::new();
        assert!(block_on(store.load()).unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let store = MemoryStateStore::new();
        let mut state = MarketState::default();
        state.users.push(user("alice"));

        block_on(store.save(&state)).unwrap();
        let loaded = block_on(store.load()).unwrap().unwrap();
        assert!(loaded.username_taken("alice"));
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn test_failed_save_keeps_previous_document() {
        let store = MemoryStateStore::new();
        block_on(store.save(&MarketState::default())).unwrap();

        store.fail_saves(true);
        let mut state = MarketState::default();
        state.users.push(user("alice"));
        assert!(matches!(
            block_on(store.save(&state)),
            Err(StoreError::Unavailable(_))
        ));
        assert!(!store.snapshot().unwrap().username_taken("alice"));
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn test_malformed_document() {
        let store = MemoryStateStore::new();
        if let Ok(mut slot) = store.slot.lock() {
            slot.document = Some("{\"users\": 7}".into());
        }
        assert!(matches!(
            block_on(store.load()),
            Err(StoreError::Malformed(_))
        ));
    }
}
