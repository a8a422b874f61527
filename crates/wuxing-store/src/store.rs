//! The profile store: session cache in front of durable storage.
//!
//! This is the central piece of the store layer. It is responsible for:
//! - Loading profiles (cache first, durable storage on miss)
//! - Initializing brand-new players with one atomic batch
//! - Saving mutated profiles and adjusting currency
//! - Evicting cache entries when a connection ends
//! - Forcing session-only profiles in when durable storage is down
//!
//! # Concurrency
//!
//! The cache is process-wide and every connection task reaches it. Each key
//! owns its own async mutex, and every operation holds that key's mutex
//! across its backend I/O — so two operations on the *same* key are fully
//! serialized (no lost updates between a load-mutate-save and a racing
//! adjust), while operations on different keys proceed independently. The
//! outer map lock is only held long enough to fetch the key's slot.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use wuxing_protocol::Elements;

use crate::backend::{KvBackend, ProfileRow, WriteBatch, fields};
use crate::profile::STARTING_GOLD;
use crate::{PlayerProfile, StoreError, UserKey};

/// One cache slot: the (possibly absent) profile for a key, guarded by the
/// key's own mutex.
type CacheSlot = Arc<Mutex<Option<PlayerProfile>>>;

/// Session cache + durable persistence for player profiles.
///
/// ## Lifecycle of an entry
///
/// ```text
/// load() miss ──→ create_new() ──→ save()/adjust_currency() ──→ evict()
///      │                │                                         │
///      ▼                ▼                                         ▼
/// [reconstructed]   [cached + durable]                      [slot removed]
///
/// backend down:  cache_profile() ──→ [cached, session-only]
/// ```
pub struct ProfileStore<B: KvBackend> {
    backend: B,
    cache: Mutex<HashMap<UserKey, CacheSlot>>,
}

impl<B: KvBackend> ProfileStore<B> {
    /// Creates a store in front of the given backend, with an empty cache.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Fetches (or creates) the cache slot for a key.
    ///
    /// The map lock is released before the caller locks the slot, so slow
    /// backend I/O under one key never blocks other keys.
    async fn slot(&self, key: &UserKey) -> CacheSlot {
        let mut cache = self.cache.lock().await;
        Arc::clone(cache.entry(key.clone()).or_default())
    }

    /// Loads a profile: session cache first, then durable storage.
    ///
    /// Returns `Ok(None)` when the account has no stored profile (no
    /// nickname field in durable storage) — the caller treats that as a new
    /// player. A successful reconstruction populates the cache.
    pub async fn load(
        &self,
        key: &UserKey,
    ) -> Result<Option<PlayerProfile>, StoreError> {
        let slot = self.slot(key).await;
        let mut entry = slot.lock().await;

        if let Some(profile) = entry.as_ref() {
            tracing::debug!(%key, nickname = %profile.nickname, "cache hit");
            return Ok(Some(profile.clone()));
        }

        let row = self.backend.read_profile(key).await?;
        let Some(nickname) = row.nickname.clone() else {
            // No nickname ⇒ the account was never initialized. Every
            // creation path writes it, so this is the new-player signal.
            tracing::info!(%key, "no stored profile, treating as new player");
            return Ok(None);
        };

        let gold =
            self.backend.read_currency(key, fields::CURRENCY_GOLD).await?;
        let profile = reconstruct(nickname, gold, &row);

        tracing::info!(%key, nickname = %profile.nickname, "profile loaded");
        *entry = Some(profile.clone());
        Ok(Some(profile))
    }

    /// Initializes a brand-new player and persists the defaults.
    ///
    /// All fields plus the starting gold credit go down as one atomic
    /// batch; the cache is only populated when the write reports success.
    pub async fn create_new(
        &self,
        key: &UserKey,
        nickname: &str,
    ) -> Result<PlayerProfile, StoreError> {
        let slot = self.slot(key).await;
        let mut entry = slot.lock().await;

        let profile = PlayerProfile::create_new(nickname);
        let batch = WriteBatch::new()
            .set_text(fields::NICKNAME, nickname)
            .set_int(fields::LEVEL, i64::from(profile.level))
            .set_int(fields::EXPERIENCE, profile.experience)
            .set_int(fields::ELEMENT_METAL, profile.elements.metal)
            .set_int(fields::ELEMENT_WOOD, profile.elements.wood)
            .set_int(fields::ELEMENT_WATER, profile.elements.water)
            .set_int(fields::ELEMENT_FIRE, profile.elements.fire)
            .set_int(fields::ELEMENT_EARTH, profile.elements.earth)
            .credit(fields::CURRENCY_GOLD, STARTING_GOLD)
            .describe(format!("initialize new player: {nickname}"));

        self.backend.apply(key, batch).await?;

        tracing::info!(%key, nickname, "new player initialized");
        *entry = Some(profile.clone());
        Ok(profile)
    }

    /// Persists a mutated profile: nickname, level, experience, elements.
    ///
    /// Gold is deliberately absent — every gold movement goes through
    /// [`adjust_currency`](Self::adjust_currency), the backend's
    /// incremental primitive, so a stale in-memory balance can never
    /// clobber the durable one. The cache is updated on success only.
    pub async fn save(
        &self,
        key: &UserKey,
        profile: &PlayerProfile,
    ) -> Result<(), StoreError> {
        let slot = self.slot(key).await;
        let mut entry = slot.lock().await;

        let batch = WriteBatch::new()
            .set_text(fields::NICKNAME, profile.nickname.clone())
            .set_int(fields::LEVEL, i64::from(profile.level))
            .set_int(fields::EXPERIENCE, profile.experience)
            .set_int(fields::ELEMENT_METAL, profile.elements.metal)
            .set_int(fields::ELEMENT_WOOD, profile.elements.wood)
            .set_int(fields::ELEMENT_WATER, profile.elements.water)
            .set_int(fields::ELEMENT_FIRE, profile.elements.fire)
            .set_int(fields::ELEMENT_EARTH, profile.elements.earth)
            .describe("save player progress");

        self.backend.apply(key, batch).await?;

        tracing::debug!(%key, nickname = %profile.nickname, "profile saved");
        // Keep the cached gold: the durable balance is authoritative and
        // this save didn't touch it.
        let gold = entry.as_ref().map(|p| p.gold).unwrap_or(profile.gold);
        let mut saved = profile.clone();
        saved.gold = gold;
        *entry = Some(saved);
        Ok(())
    }

    /// Adjusts the gold balance through the backend's incremental
    /// primitive and returns the new balance.
    ///
    /// `credit = true` adds `amount`, `credit = false` subtracts it. The
    /// incremental form (rather than read-modify-write) is what makes
    /// concurrent adjustments against the same account lose-free.
    pub async fn adjust_currency(
        &self,
        key: &UserKey,
        amount: i64,
        credit: bool,
    ) -> Result<i64, StoreError> {
        let slot = self.slot(key).await;
        let mut entry = slot.lock().await;

        let batch = if credit {
            WriteBatch::new()
                .credit(fields::CURRENCY_GOLD, amount)
                .describe(format!("gold +{amount}"))
        } else {
            WriteBatch::new()
                .debit(fields::CURRENCY_GOLD, amount)
                .describe(format!("gold -{amount}"))
        };
        self.backend.apply(key, batch).await?;

        let balance =
            self.backend.read_currency(key, fields::CURRENCY_GOLD).await?;
        if let Some(profile) = entry.as_mut() {
            profile.gold = balance;
        }

        tracing::debug!(%key, balance, "currency adjusted");
        Ok(balance)
    }

    /// Forces a profile into the session cache without touching durable
    /// storage.
    ///
    /// The degraded path for when the storage service is down: the player
    /// gets a usable profile for this session, and nothing persists.
    pub async fn cache_profile(
        &self,
        key: &UserKey,
        profile: PlayerProfile,
    ) {
        let slot = self.slot(key).await;
        tracing::warn!(
            %key,
            nickname = %profile.nickname,
            "caching session-only profile (not durable)"
        );
        *slot.lock().await = Some(profile);
    }

    /// Removes a key's cache entry. Called when the owning connection ends.
    pub async fn evict(&self, key: &UserKey) {
        if self.cache.lock().await.remove(key).is_some() {
            tracing::info!(%key, "cache entry evicted");
        }
    }

    /// Number of keys currently holding a cache slot.
    pub async fn cached_count(&self) -> usize {
        self.cache.lock().await.len()
    }
}

/// Rebuilds a profile from a durable row plus the currency balance.
///
/// Missing numeric fields default (level 1, everything else 0); a stored
/// level below 1 is lifted to 1 to keep the profile invariant.
fn reconstruct(nickname: String, gold: i64, row: &ProfileRow) -> PlayerProfile {
    let level = row.level.unwrap_or(1).max(1);
    let level = u32::try_from(level).unwrap_or(u32::MAX);
    PlayerProfile {
        nickname,
        level,
        experience: row.experience.unwrap_or(0).max(0),
        gold,
        elements: Elements {
            metal: row.element_metal.unwrap_or(0),
            wood: row.element_wood.unwrap_or(0),
            water: row.element_water.unwrap_or(0),
            fire: row.element_fire.unwrap_or(0),
            earth: row.element_earth.unwrap_or(0),
        },
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Unit tests for `ProfileStore` over the in-memory backend, covering
    //! the full entry lifecycle: miss → create → mutate → evict →
    //! reconstruct.

    use super::*;
    use crate::MemoryBackend;

    fn store() -> ProfileStore<MemoryBackend> {
        ProfileStore::new(MemoryBackend::new())
    }

    fn key() -> UserKey {
        UserKey::Account("a@b.com".into())
    }

    // =====================================================================
    // load()
    // =====================================================================

    #[tokio::test]
    async fn test_load_unknown_key_is_not_found() {
        let store = store();
        let loaded = store.load(&key()).await.unwrap();
        assert!(loaded.is_none(), "fresh account must read as new player");
    }

    #[tokio::test]
    async fn test_create_new_then_load_hits_cache_with_defaults() {
        let store = store();
        let k = key();
        store.create_new(&k, "Player1234").await.unwrap();

        let loaded = store.load(&k).await.unwrap().expect("profile");
        assert_eq!(loaded.nickname, "Player1234");
        assert_eq!(loaded.level, 1);
        assert_eq!(loaded.experience, 0);
        assert_eq!(loaded.gold, 100);
        assert_eq!(loaded.elements, Elements::default());
    }

    #[tokio::test]
    async fn test_load_reconstructs_from_backend_after_evict() {
        // The returning-player path: cache is cold, durable storage has
        // the account.
        let store = store();
        let k = key();
        store.create_new(&k, "Player1234").await.unwrap();
        store.evict(&k).await;
        assert_eq!(store.cached_count().await, 0);

        let loaded = store.load(&k).await.unwrap().expect("profile");
        assert_eq!(loaded.nickname, "Player1234");
        assert_eq!(loaded.gold, 100);
        // And the reconstruction repopulated the cache.
        assert_eq!(store.cached_count().await, 1);
    }

    // =====================================================================
    // save()
    // =====================================================================

    #[tokio::test]
    async fn test_save_persists_nickname_and_progress() {
        let store = store();
        let k = key();
        let mut profile = store.create_new(&k, "Player1234").await.unwrap();

        profile.nickname = "Sage".into();
        profile.level = 5;
        profile.experience = 420;
        profile.elements.fire = 9;
        store.save(&k, &profile).await.unwrap();

        // Cold load must see everything save wrote.
        store.evict(&k).await;
        let loaded = store.load(&k).await.unwrap().expect("profile");
        assert_eq!(loaded.nickname, "Sage");
        assert_eq!(loaded.level, 5);
        assert_eq!(loaded.experience, 420);
        assert_eq!(loaded.elements.fire, 9);
    }

    #[tokio::test]
    async fn test_save_does_not_clobber_gold() {
        // save() never writes the balance; a profile carrying a stale gold
        // figure must not overwrite money earned through the incremental
        // path.
        let store = store();
        let k = key();
        let stale = store.create_new(&k, "Player1234").await.unwrap();
        store.adjust_currency(&k, 900, true).await.unwrap();

        // `stale` still says 100 gold.
        store.save(&k, &stale).await.unwrap();

        store.evict(&k).await;
        let loaded = store.load(&k).await.unwrap().expect("profile");
        assert_eq!(loaded.gold, 1000);
    }

    // =====================================================================
    // adjust_currency()
    // =====================================================================

    #[tokio::test]
    async fn test_adjust_currency_credit_then_debit() {
        let store = store();
        let k = key();
        store.create_new(&k, "Player1234").await.unwrap();

        let after_credit =
            store.adjust_currency(&k, 100, true).await.unwrap();
        assert_eq!(after_credit, 200);
        let after_debit =
            store.adjust_currency(&k, 30, false).await.unwrap();
        assert_eq!(after_debit, 170);

        // The cached profile tracks the durable balance.
        let loaded = store.load(&k).await.unwrap().expect("profile");
        assert_eq!(loaded.gold, 170);
    }

    #[tokio::test]
    async fn test_adjust_currency_overdraft_fails_and_preserves_balance() {
        let store = store();
        let k = key();
        store.create_new(&k, "Player1234").await.unwrap();

        let result = store.adjust_currency(&k, 500, false).await;
        assert!(matches!(
            result,
            Err(StoreError::InsufficientBalance { .. })
        ));

        let loaded = store.load(&k).await.unwrap().expect("profile");
        assert_eq!(loaded.gold, 100);
    }

    #[tokio::test]
    async fn test_concurrent_adjustments_are_not_lost() {
        // Ten tasks crediting the same account concurrently: every credit
        // must land. Same-key operations serialize on the key's slot lock.
        let store = Arc::new(store());
        let k = key();
        store.create_new(&k, "Player1234").await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..10 {
            let store = Arc::clone(&store);
            let k = k.clone();
            handles.push(tokio::spawn(async move {
                store.adjust_currency(&k, 10, true).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let loaded = store.load(&k).await.unwrap().expect("profile");
        assert_eq!(loaded.gold, 200);
    }

    // =====================================================================
    // cache_profile() / evict()
    // =====================================================================

    #[tokio::test]
    async fn test_cache_profile_serves_session_without_backend_data() {
        let store = store();
        let k = key();
        store
            .cache_profile(&k, PlayerProfile::create_new("Offline"))
            .await;

        let loaded = store.load(&k).await.unwrap().expect("profile");
        assert_eq!(loaded.nickname, "Offline");

        // Session-only means gone after eviction: the backend never saw it.
        store.evict(&k).await;
        assert!(store.load(&k).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_evict_unknown_key_is_a_no_op() {
        let store = store();
        store.evict(&key()).await;
        assert_eq!(store.cached_count().await, 0);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let store = store();
        let a = UserKey::Account("a@b.com".into());
        let b = UserKey::Account("c@d.com".into());
        store.create_new(&a, "A").await.unwrap();
        store.create_new(&b, "B").await.unwrap();

        store.adjust_currency(&a, 50, true).await.unwrap();
        let b_profile = store.load(&b).await.unwrap().expect("profile");
        assert_eq!(b_profile.gold, 100, "other key must be untouched");
    }

    // =====================================================================
    // Degraded mode — storage service down
    // =====================================================================

    /// A backend whose service is entirely offline.
    struct FailingBackend;

    impl KvBackend for FailingBackend {
        async fn read_profile(
            &self,
            _key: &UserKey,
        ) -> Result<ProfileRow, StoreError> {
            Err(StoreError::Unavailable("kv service offline".into()))
        }

        async fn read_currency(
            &self,
            _key: &UserKey,
            _currency: &str,
        ) -> Result<i64, StoreError> {
            Err(StoreError::Unavailable("kv service offline".into()))
        }

        async fn apply(
            &self,
            _key: &UserKey,
            _batch: WriteBatch,
        ) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("kv service offline".into()))
        }
    }

    #[tokio::test]
    async fn test_backend_outage_degrades_to_session_only_profile() {
        let store = ProfileStore::new(FailingBackend);
        let k = key();

        // Both the durable paths fail...
        assert!(matches!(
            store.load(&k).await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(matches!(
            store.create_new(&k, "Player1234").await,
            Err(StoreError::Unavailable(_))
        ));

        // ...but a forced cache entry still serves the session: load hits
        // the cache before ever reaching the backend.
        store
            .cache_profile(&k, PlayerProfile::create_new("Player1234"))
            .await;
        let loaded = store.load(&k).await.unwrap().expect("profile");
        assert_eq!(loaded.nickname, "Player1234");
    }

    #[tokio::test]
    async fn test_reconstruct_lifts_level_to_at_least_one() {
        // A zero level in storage (bad write, older contract) must not
        // surface as a profile below level 1.
        let store = store();
        let k = key();
        store
            .backend
            .apply(
                &k,
                WriteBatch::new()
                    .set_text(fields::NICKNAME, "Old")
                    .set_int(fields::LEVEL, 0),
            )
            .await
            .unwrap();

        let loaded = store.load(&k).await.unwrap().expect("profile");
        assert_eq!(loaded.level, 1);
    }
}
