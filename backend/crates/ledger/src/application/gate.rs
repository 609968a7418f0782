//! State Gate
//!
//! Owns the in-memory copy of the [`MarketState`] and serializes every
//! mutation. A mutation runs against a draft copy; the draft replaces the
//! live state only after the store accepted it, so a failed save leaves
//! both memory and the store untouched. A save refused for a stale
//! revision reloads the live state, so the caller's retry sees the
//! document another writer stored.

use tokio::sync::Mutex;

use crate::domain::repository::StateStore;
use crate::domain::state::MarketState;
use crate::error::{StoreError, StoreResult};

pub struct StateGate<S> {
    store: S,
    state: Mutex<MarketState>,
}

impl<S: StateStore + Sync> StateGate<S> {
    /// Load the persisted document. When nothing has been saved yet, start
    /// from an empty document, let `seed` fill it and persist the result.
    pub async fn open(store: S, seed: impl FnOnce(&mut MarketState)) -> StoreResult<Self> {
        let state = match store.load().await? {
            Some(state) => {
                tracing::info!(
                    users = state.users.len(),
                    campaigns = state.campaigns.len(),
                    "State document loaded"
                );
                state
            }
            None => {
                let mut state = MarketState::default();
                seed(&mut state);
                store.save(&state).await?;
                tracing::info!(users = state.users.len(), "State document seeded");
                state
            }
        };

        Ok(Self {
            store,
            state: Mutex::new(state),
        })
    }

    /// Read a consistent view of the state
    pub async fn read<T>(&self, f: impl FnOnce(&MarketState) -> T) -> T {
        let state = self.state.lock().await;
        f(&state)
    }

    /// Apply `f` to a draft and persist it.
    ///
    /// If `f` returns an error, or the store rejects the draft, the draft is
    /// dropped and the error is returned. On `RevisionConflict` the live
    /// state is replaced by the stored document before returning.
    pub async fn mutate<T, E>(
        &self,
        f: impl FnOnce(&mut MarketState) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let mut live = self.state.lock().await;
        let mut draft = live.clone();
        let value = f(&mut draft)?;

        if let Err(e) = self.store.save(&draft).await {
            e.log();
            if matches!(e, StoreError::RevisionConflict { .. }) {
                self.reload(&mut live).await;
            }
            return Err(e.into());
        }

        *live = draft;
        Ok(value)
    }

    async fn reload(&self, live: &mut MarketState) {
        match self.store.load().await {
            Ok(Some(fresh)) => {
                *live = fresh;
                tracing::warn!("State document reloaded after a concurrent write");
            }
            Ok(None) => tracing::error!("State document vanished during reload"),
            Err(e) => e.log(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::user::fixtures::user;
    use crate::error::LedgerError;
    use crate::infra::memory::MemoryStateStore;
    use crate::{Amount, Ledger};

    #[derive(Debug, thiserror::Error)]
    enum TestError {
        #[error(transparent)]
        Ledger(#[from] LedgerError),
        #[error(transparent)]
        Store(#[from] StoreError),
    }

    #[tokio::test]
    async fn test_open_seeds_missing_document() {
        let store = MemoryStateStore::new();
        let gate = StateGate::open(store.clone(), |s| s.users.push(user("root")))
            .await
            .unwrap();

        assert_eq!(gate.read(|s| s.users.len()).await, 1);
        assert_eq!(store.save_count(), 1);
        assert!(store.snapshot().unwrap().username_taken("root"));
    }

    #[tokio::test]
    async fn test_open_keeps_existing_document() {
        let mut existing = MarketState::default();
        existing.users.push(user("alice"));
        let store = MemoryStateStore::with_document(&existing);

        let gate = StateGate::open(store.clone(), |s| s.users.push(user("root")))
            .await
            .unwrap();

        assert!(gate.read(|s| s.username_taken("alice")).await);
        assert!(!gate.read(|s| s.username_taken("root")).await);
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_mutation_error_discards_draft() {
        let store = MemoryStateStore::new();
        let gate = StateGate::open(store.clone(), |s| s.users.push(user("alice")))
            .await
            .unwrap();

        let result: Result<(), TestError> = gate
            .mutate(|s| {
                let u = &mut s.users[0];
                Ledger::lock_for_audit(u, Amount::from_minor(10))?;
                // second step fails after the first one already changed the draft
                Ledger::withdraw(u, Amount::from_minor(10))?;
                Ok(())
            })
            .await;

        assert!(matches!(result, Err(TestError::Ledger(_))));
        assert_eq!(
            gate.read(|s| s.users[0].balances().pending()).await,
            Amount::ZERO
        );
        assert_eq!(store.save_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_save_discards_draft() {
        let store = MemoryStateStore::new();
        let gate = StateGate::open(store.clone(), |s| s.users.push(user("alice")))
            .await
            .unwrap();

        store.fail_saves(true);
        let result: Result<(), TestError> = gate
            .mutate(|s| {
                Ledger::lock_for_audit(&mut s.users[0], Amount::from_minor(10))?;
                Ok(())
            })
            .await;

        assert!(matches!(result, Err(TestError::Store(StoreError::Unavailable(_)))));
        assert_eq!(
            gate.read(|s| s.users[0].balances().pending()).await,
            Amount::ZERO
        );

        store.fail_saves(false);
        let result: Result<(), TestError> = gate
            .mutate(|s| {
                Ledger::lock_for_audit(&mut s.users[0], Amount::from_minor(10))?;
                Ok(())
            })
            .await;
        assert!(result.is_ok());
        assert_eq!(
            store.snapshot().unwrap().users[0].balances().pending(),
            Amount::from_minor(10)
        );
    }

    #[tokio::test]
    async fn test_stale_save_reloads_live_state() {
        let store = MemoryStateStore::new();
        let gate = StateGate::open(store.clone(), |s| s.users.push(user("alice")))
            .await
            .unwrap();

        // another writer stores a newer document
        let mut newer = store.snapshot().unwrap();
        newer.users.push(user("bob"));
        store.replace_document(&newer);
        store.reject_next_save_as_stale();

        let lock = |s: &mut MarketState| -> Result<(), TestError> {
            Ledger::lock_for_audit(&mut s.users[0], Amount::from_minor(10))?;
            Ok(())
        };

        let result = gate.mutate(lock).await;
        assert!(matches!(
            result,
            Err(TestError::Store(StoreError::RevisionConflict { .. }))
        ));
        assert!(gate.read(|s| s.username_taken("bob")).await);
        assert_eq!(
            gate.read(|s| s.users[0].balances().pending()).await,
            Amount::ZERO
        );

        gate.mutate(lock).await.unwrap();
        let stored = store.snapshot().unwrap();
        assert!(stored.username_taken("bob"));
        assert_eq!(stored.users[0].balances().pending(), Amount::from_minor(10));
    }

    #[tokio::test]
    async fn test_concurrent_mutations_are_serialized() {
        let store = MemoryStateStore::new();
        let gate = std::sync::Arc::new(
            StateGate::open(store.clone(), |s| s.users.push(user("alice")))
                .await
                .unwrap(),
        );

        let mut handles = Vec::new();
        for _ in 0..20 {
            let gate = gate.clone();
            handles.push(tokio::spawn(async move {
                gate.mutate(|s| -> Result<(), TestError> {
                    Ledger::lock_for_audit(&mut s.users[0], Amount::from_minor(1))?;
                    Ok(())
                })
                .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(
            gate.read(|s| s.users[0].balances().pending()).await,
            Amount::from_minor(20)
        );
        assert_eq!(store.save_count(), 21);
    }
}
