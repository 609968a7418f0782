//! Shared fixtures for the market tests

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use chrono::{TimeZone, Utc};
use kernel::clock::ManualClock;
use kernel::id::{CampaignId, SequentialIds, UserId};
use ledger::{
    Amount, Campaign, CampaignContent, CampaignTerms, Ledger, MarketState, MemoryStateStore,
    NewUser, PayoutMethod, StateGate, User, UserRole,
};
use platform::password::{ClearTextPassword, CredentialHash};

use crate::application::{MarketConfig, MarketContext};
use crate::domain::{Claim, ProofOracle, Verdict};

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

pub fn amt(major: u64) -> Amount {
    Amount::from_major(major)
}

fn account(username: &str, role: UserRole) -> User {
    User::new(NewUser {
        id: UserId::new(),
        username: username.to_string(),
        credential_hash: test_hash(),
        email: format!("{username}@example.com"),
        role,
        security_key_digest: String::new(),
        joined_at: Utc::now(),
    })
}

/// Creator with `wallet` already settled and a UPI payout target
pub fn creator(username: &str, wallet: Amount) -> User {
    let mut user = account(username, UserRole::User);
    if !wallet.is_zero() {
        Ledger::lock_for_audit(&mut user, wallet).unwrap();
        Ledger::settle_approved(&mut user, wallet).unwrap();
    }
    user.payout_method = Some(PayoutMethod::Upi);
    user.payout_details = Some(format!("{username}@upi"));
    user
}

pub fn admin(username: &str) -> User {
    account(username, UserRole::Admin)
}

/// Active campaign paying `basic` per proof and `viral` per viral claim
pub fn campaign(title: &str, basic: Amount, viral: Amount) -> Campaign {
    Campaign::new(
        CampaignId::new(),
        title.to_string(),
        CampaignContent {
            video_url: "https://cdn.example.com/brief.mp4".into(),
            caption: format!("#{}", title.to_lowercase()),
            hashtags: format!("#{}", title.to_lowercase()),
            audio_name: "Original Audio".into(),
            ..Default::default()
        },
        CampaignTerms {
            basic_pay: basic,
            viral_pay: viral,
            goal_views: 10_000,
            goal_likes: 500,
        },
        Utc::now(),
    )
}

// ============================================================================
// Oracles
// ============================================================================

/// Answers every claim with the same verdict and counts calls
pub struct StubOracle {
    verdict: Verdict,
    calls: std::sync::atomic::AtomicUsize,
}

impl StubOracle {
    pub fn new(verdict: Verdict) -> Self {
        Self {
            verdict,
            calls: Default::default(),
        }
    }

    pub fn accepting() -> Self {
        Self::new(Verdict::Accept)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

impl ProofOracle for StubOracle {
    async fn verify(&self, _claim: &Claim) -> Verdict {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.verdict.clone()
    }
}

/// Accepts, but only after `delay`
pub struct SlowOracle(pub Duration);

impl ProofOracle for SlowOracle {
    async fn verify(&self, _claim: &Claim) -> Verdict {
        tokio::time::sleep(self.0).await;
        Verdict::Accept
    }
}

// ============================================================================
// Harness
// ============================================================================

pub struct Harness {
    pub ctx: MarketContext<MemoryStateStore>,
    pub store: MemoryStateStore,
    pub clock: Arc<ManualClock>,
}

impl Harness {
    pub async fn state(&self) -> MarketState {
        self.ctx.gate.read(|s| s.clone()).await
    }

    pub async fn user(&self, id: UserId) -> User {
        self.ctx.gate.read(|s| s.user(&id).cloned()).await.unwrap()
    }
}

/// Market context over an in-memory store seeded by `seed`, clock pinned
/// to 2024-06-01 09:00 UTC
pub async fn harness_with(config: MarketConfig, seed: impl FnOnce(&mut MarketState)) -> Harness {
    let store = MemoryStateStore::new();
    let gate = StateGate::open(store.clone(), seed).await.unwrap();
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap(),
    ));

    Harness {
        ctx: MarketContext::new(
            Arc::new(gate),
            Arc::new(config),
            clock.clone(),
            Arc::new(SequentialIds::new()),
        ),
        store,
        clock,
    }
}

pub async fn harness(seed: impl FnOnce(&mut MarketState)) -> Harness {
    harness_with(MarketConfig::default(), seed).await
}
