//! Credential cache with per-key mint deduplication.
//!
//! Maps a stable key derived from a credential source to a cached short-lived
//! credential and its margined expiry. The core correctness property: at most
//! one upstream mint per key per expiry cycle, regardless of how many callers
//! request the same key concurrently.

use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::domain::errors::CredentialResult;
use crate::domain::models::{CachedCredential, CredentialSource};
use crate::domain::ports::CredentialProvider;

/// Seconds subtracted from an issuer-stated lifetime before caching, so a
/// credential is never handed out within its last margin-seconds of true
/// validity. Absorbs clock skew and in-flight latency.
pub const DEFAULT_SAFETY_MARGIN_SECS: i64 = 300;

/// Explicitly owned, constructor-injected credential cache.
///
/// Each call site (or test) holds its own instance; there is no hidden global
/// table. Entries are created on first successful mint, overwritten on each
/// later refresh, and removed only by [`invalidate`](Self::invalidate) or
/// [`clear_all`](Self::clear_all); expiry is checked lazily on read.
///
/// # Concurrency
///
/// Lookups go through one mutex-guarded map, so readers always observe an
/// atomically swapped entry. Mints serialize on a per-key gate: the first
/// caller mints while identical-key callers wait and then re-check the table;
/// unrelated keys never block each other. Gates are retained per distinct key
/// for the cache's lifetime, the same order of growth as the entry table.
pub struct CredentialCache {
    provider: Arc<dyn CredentialProvider>,
    safety_margin: Duration,
    entries: Mutex<HashMap<String, CachedCredential>>,
    mint_gates: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl CredentialCache {
    /// Create a cache with the default safety margin.
    pub fn new(provider: Arc<dyn CredentialProvider>) -> Self {
        Self::with_safety_margin(provider, DEFAULT_SAFETY_MARGIN_SECS)
    }

    /// Create a cache with a custom safety margin in seconds.
    pub fn with_safety_margin(provider: Arc<dyn CredentialProvider>, margin_secs: i64) -> Self {
        Self {
            provider,
            safety_margin: Duration::seconds(margin_secs),
            entries: Mutex::new(HashMap::new()),
            mint_gates: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached credential for `source`, minting a fresh one if the
    /// entry is absent or past its margined expiry.
    ///
    /// A fresh entry is returned with no network access. On a miss, exactly
    /// one provider mint runs for the key even under concurrent callers; the
    /// result is stored with a margined deadline and every waiter receives
    /// it. A failed mint is returned verbatim, is never cached, and leaves
    /// any previously cached value for the key untouched.
    pub async fn get_or_refresh(
        &self,
        source: &CredentialSource,
    ) -> CredentialResult<CachedCredential> {
        let key = source.cache_key();

        if let Some(entry) = self.lookup_fresh(&key).await {
            debug!(%key, "credential cache hit");
            return Ok(entry);
        }

        let gate = self.mint_gate(&key).await;
        let _guard = gate.lock().await;

        // Another caller may have finished minting while we waited.
        if let Some(entry) = self.lookup_fresh(&key).await {
            debug!(%key, "credential refreshed by concurrent caller");
            return Ok(entry);
        }

        debug!(%key, scheme = self.provider.scheme(), "minting credential");
        let minted = self.provider.mint(source).await?;

        let entry = CachedCredential {
            payload: minted.payload,
            expires_at: minted.expires_at - self.safety_margin,
            minted_at: Utc::now(),
        };
        self.entries.lock().await.insert(key.clone(), entry.clone());
        info!(%key, expires_at = %entry.expires_at, "credential minted and cached");
        Ok(entry)
    }

    /// Remove the entry for `source` unconditionally. Idempotent.
    pub async fn invalidate(&self, source: &CredentialSource) {
        let key = source.cache_key();
        let removed = self.entries.lock().await.remove(&key).is_some();
        debug!(%key, removed, "credential invalidated");
    }

    /// Drop every entry. Used for credential rotation and test isolation.
    pub async fn clear_all(&self) {
        self.entries.lock().await.clear();
        debug!("credential cache cleared");
    }

    /// Number of entries currently held, fresh or stale.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Whether the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    async fn lookup_fresh(&self, key: &str) -> Option<CachedCredential> {
        let entries = self.entries.lock().await;
        entries
            .get(key)
            .filter(|entry| entry.is_fresh(Utc::now()))
            .cloned()
    }

    async fn mint_gate(&self, key: &str) -> Arc<Mutex<()>> {
        let mut gates = self.mint_gates.lock().await;
        gates
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::CredentialError;
    use crate::domain::models::{MintedCredential, SecretPayload};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Provider that counts mints and can be told to fail.
    struct CountingProvider {
        mints: AtomicUsize,
        fail: bool,
        lifetime_secs: i64,
    }

    impl CountingProvider {
        fn new(lifetime_secs: i64) -> Self {
            Self {
                mints: AtomicUsize::new(0),
                fail: false,
                lifetime_secs,
            }
        }

        fn failing() -> Self {
            Self {
                mints: AtomicUsize::new(0),
                fail: true,
                lifetime_secs: 3600,
            }
        }

        fn mint_count(&self) -> usize {
            self.mints.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CredentialProvider for CountingProvider {
        fn scheme(&self) -> &str {
            "counting"
        }

        async fn mint(
            &self,
            _source: &CredentialSource,
        ) -> CredentialResult<MintedCredential> {
            let n = self.mints.fetch_add(1, Ordering::SeqCst) + 1;
            // Give concurrent callers time to pile up on the gate.
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            if self.fail {
                return Err(CredentialError::ExchangeFailed {
                    status: Some(500),
                    body: "boom".to_string(),
                });
            }
            Ok(MintedCredential {
                payload: SecretPayload::BearerToken(format!("token-{n}")),
                expires_at: Utc::now() + Duration::seconds(self.lifetime_secs),
            })
        }
    }

    fn static_source(value: &str) -> CredentialSource {
        CredentialSource::StaticKey {
            value: value.to_string(),
        }
    }

    #[tokio::test]
    async fn test_concurrent_callers_trigger_one_mint() {
        let provider = Arc::new(CountingProvider::new(3600));
        let cache = Arc::new(CredentialCache::new(provider.clone()));
        let source = static_source("key-a");

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = cache.clone();
            let source = source.clone();
            handles.push(tokio::spawn(async move {
                cache.get_or_refresh(&source).await
            }));
        }

        let mut payloads = Vec::new();
        for handle in handles {
            let credential = handle.await.unwrap().unwrap();
            payloads.push(credential.payload);
        }

        assert_eq!(provider.mint_count(), 1);
        assert!(payloads
            .iter()
            .all(|p| *p == SecretPayload::BearerToken("token-1".to_string())));
    }

    #[tokio::test]
    async fn test_distinct_keys_mint_independently() {
        let provider = Arc::new(CountingProvider::new(3600));
        let cache = CredentialCache::new(provider.clone());

        cache.get_or_refresh(&static_source("key-a")).await.unwrap();
        cache.get_or_refresh(&static_source("key-b")).await.unwrap();
        assert_eq!(provider.mint_count(), 2);
        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test]
    async fn test_fresh_entry_skips_provider() {
        let provider = Arc::new(CountingProvider::new(3600));
        let cache = CredentialCache::new(provider.clone());
        let source = static_source("key-a");

        let first = cache.get_or_refresh(&source).await.unwrap();
        let second = cache.get_or_refresh(&source).await.unwrap();
        assert_eq!(provider.mint_count(), 1);
        assert_eq!(first.payload, second.payload);
    }

    #[tokio::test]
    async fn test_expired_entry_triggers_exactly_one_new_mint() {
        let provider = Arc::new(CountingProvider::new(3600));
        // Margin equals lifetime, so every stored entry is immediately stale.
        let cache = CredentialCache::with_safety_margin(provider.clone(), 3600);
        let source = static_source("key-a");

        let first = cache.get_or_refresh(&source).await.unwrap();
        let second = cache.get_or_refresh(&source).await.unwrap();
        assert_eq!(provider.mint_count(), 2);
        assert_eq!(first.payload, SecretPayload::BearerToken("token-1".to_string()));
        assert_eq!(second.payload, SecretPayload::BearerToken("token-2".to_string()));
    }

    #[tokio::test]
    async fn test_safety_margin_is_subtracted_from_issuer_expiry() {
        let provider = Arc::new(CountingProvider::new(3600));
        let cache = CredentialCache::new(provider);
        let source = static_source("key-a");

        let before = Utc::now();
        let credential = cache.get_or_refresh(&source).await.unwrap();
        let effective_ttl = credential.expires_at - before;

        // 3600s lifetime minus the 300s margin, allowing test scheduling slack.
        assert!(effective_ttl <= Duration::seconds(3300));
        assert!(effective_ttl > Duration::seconds(3290));
    }

    #[tokio::test]
    async fn test_invalidate_forces_fresh_mint() {
        let provider = Arc::new(CountingProvider::new(3600));
        let cache = CredentialCache::new(provider.clone());
        let source = static_source("key-a");

        let first = cache.get_or_refresh(&source).await.unwrap();
        cache.invalidate(&source).await;
        let second = cache.get_or_refresh(&source).await.unwrap();

        assert_eq!(provider.mint_count(), 2);
        assert_ne!(first.payload, second.payload);
    }

    #[tokio::test]
    async fn test_invalidate_is_idempotent_when_absent() {
        let provider = Arc::new(CountingProvider::new(3600));
        let cache = CredentialCache::new(provider);
        cache.invalidate(&static_source("never-seen")).await;
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_clear_all_drops_every_entry() {
        let provider = Arc::new(CountingProvider::new(3600));
        let cache = CredentialCache::new(provider.clone());

        cache.get_or_refresh(&static_source("key-a")).await.unwrap();
        cache.get_or_refresh(&static_source("key-b")).await.unwrap();
        cache.clear_all().await;
        assert!(cache.is_empty().await);

        cache.get_or_refresh(&static_source("key-a")).await.unwrap();
        assert_eq!(provider.mint_count(), 3);
    }

    #[tokio::test]
    async fn test_failed_mint_is_not_cached() {
        let provider = Arc::new(CountingProvider::failing());
        let cache = CredentialCache::new(provider.clone());
        let source = static_source("key-a");

        let first = cache.get_or_refresh(&source).await;
        assert!(matches!(
            first,
            Err(CredentialError::ExchangeFailed { status: Some(500), .. })
        ));
        assert!(cache.is_empty().await);

        // Each retry reaches the provider again; failures are never cached.
        let second = cache.get_or_refresh(&source).await;
        assert!(second.is_err());
        assert_eq!(provider.mint_count(), 2);
    }

    #[tokio::test]
    async fn test_failed_refresh_leaves_previous_entry_untouched() {
        struct FlakyProvider {
            mints: AtomicUsize,
        }

        #[async_trait]
        impl CredentialProvider for FlakyProvider {
            fn scheme(&self) -> &str {
                "flaky"
            }

            async fn mint(
                &self,
                _source: &CredentialSource,
            ) -> CredentialResult<MintedCredential> {
                let n = self.mints.fetch_add(1, Ordering::SeqCst);
                if n == 0 {
                    Ok(MintedCredential {
                        payload: SecretPayload::BearerToken("good".to_string()),
                        expires_at: Utc::now() + Duration::seconds(3600),
                    })
                } else {
                    Err(CredentialError::ExchangeFailed {
                        status: Some(503),
                        body: "unavailable".to_string(),
                    })
                }
            }
        }

        let provider = Arc::new(FlakyProvider {
            mints: AtomicUsize::new(0),
        });
        // Margin equals lifetime so the first entry is stored already stale.
        let cache = CredentialCache::with_safety_margin(provider, 3600);
        let source = static_source("key-a");

        cache.get_or_refresh(&source).await.unwrap();
        assert_eq!(cache.len().await, 1);

        // The refresh fails; the stale entry is still present, not evicted.
        let result = cache.get_or_refresh(&source).await;
        assert!(result.is_err());
        assert_eq!(cache.len().await, 1);
    }
}
