//! Shared fixtures for the auth tests

use std::sync::{Arc, OnceLock};

use chrono::{TimeZone, Utc};
use kernel::clock::ManualClock;
use kernel::id::{SequentialIds, UserId};
use ledger::{MemoryStateStore, NewUser, StateGate, User, UserRole};
use platform::password::{ClearTextPassword, CredentialHash};

use crate::application::config::AuthConfig;
use crate::presentation::AuthAppState;

pub const PASSWORD: &str = "CorrectHorse#42";

/// Hashing is slow; tests share one hash
pub fn test_hash() -> CredentialHash {
    static HASH: OnceLock<CredentialHash> = OnceLock::new();
    HASH.get_or_init(|| {
        ClearTextPassword::new(PASSWORD.to_string())
            .unwrap()
            .hash(None)
            .unwrap()
    })
    .clone()
}

pub fn user(username: &str) -> User {
    User::new(NewUser {
        id: UserId::new(),
        username: username.to_string(),
        credential_hash: test_hash(),
        email: format!("{username}@example.com"),
        role: UserRole::User,
        security_key_digest: String::new(),
        joined_at: Utc::now(),
    })
}

pub struct Harness {
    pub state: AuthAppState<MemoryStateStore>,
    pub store: MemoryStateStore,
    pub clock: Arc<ManualClock>,
}

/// Auth state over an in-memory store seeded with `users`;
/// lockout threshold 3, window 24h
pub async fn harness(users: Vec<User>) -> Harness {
    let store = MemoryStateStore::new();
    let gate = StateGate::open(store.clone(), |s| s.users.extend(users))
        .await
        .unwrap();
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap(),
    ));

    let config = AuthConfig {
        lockout_threshold: 3,
        ..AuthConfig::with_random_secret()
    };

    Harness {
        state: AuthAppState {
            gate: Arc::new(gate),
            config: Arc::new(config),
            clock: clock.clone(),
            ids: Arc::new(SequentialIds::new()),
        },
        store,
        clock,
    }
}
