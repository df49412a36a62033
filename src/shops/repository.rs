// Shop repositories.
// Abstracts where shop records come from and layers the offline snapshot over the live source.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::cache::CacheStore;
use crate::error::Result;

use super::types::ShopRecord;

/// Anything that can produce the shop list.
#[async_trait]
pub trait ShopRepository: Send + Sync {
    async fn fetch_shops(&self) -> Result<Vec<ShopRecord>>;
}

/// Cache-first read-through over another repository.
///
/// A present snapshot is returned as is, regardless of age. On a miss the
/// inner repository is consulted once and its result written back. To force
/// a live fetch, use the inner repository directly.
pub struct CachedShopRepository<R> {
    remote: R,
    cache: CacheStore,
    in_flight: Mutex<()>,
}

impl<R: ShopRepository> CachedShopRepository<R> {
    pub fn new(remote: R, cache: CacheStore) -> Self {
        Self {
            remote,
            cache,
            in_flight: Mutex::new(()),
        }
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// The wrapped repository, for callers that want to bypass the snapshot.
    pub fn remote(&self) -> &R {
        &self.remote
    }
}

#[async_trait]
impl<R: ShopRepository> ShopRepository for CachedShopRepository<R> {
    async fn fetch_shops(&self) -> Result<Vec<ShopRecord>> {
        if let Some(cached) = self.cache.load() {
            return Ok(cached);
        }

        // Overlapping misses queue here; whoever waited re-reads the snapshot
        // the first caller just wrote.
        let _guard = self.in_flight.lock().await;
        if let Some(cached) = self.cache.load() {
            return Ok(cached);
        }

        let fetched = self.remote.fetch_shops().await?;
        self.cache.save(&fetched);
        Ok(fetched)
    }
}

/// Returns a fixed list. Useful for previews and as a test double.
#[derive(Debug, Clone, Default)]
pub struct FixedShopRepository {
    shops: Vec<ShopRecord>,
}

impl FixedShopRepository {
    pub fn new(shops: Vec<ShopRecord>) -> Self {
        Self { shops }
    }

    /// A repository holding only [`ShopRecord::sample`].
    pub fn sample() -> Self {
        Self::new(vec![ShopRecord::sample()])
    }
}

#[async_trait]
impl ShopRepository for FixedShopRepository {
    async fn fetch_shops(&self) -> Result<Vec<ShopRecord>> {
        Ok(self.shops.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use reqwest::StatusCode;
    use tempfile::TempDir;

    use super::*;
    use crate::error::HoneyError;

    /// Counts calls and serves a fixed list.
    #[derive(Default)]
    struct CountingRepository {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ShopRepository for CountingRepository {
        async fn fetch_shops(&self) -> Result<Vec<ShopRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            Ok(vec![ShopRecord::sample()])
        }
    }

    /// Fails the test if it is ever asked for data.
    struct PanickingRepository;

    #[async_trait]
    impl ShopRepository for PanickingRepository {
        async fn fetch_shops(&self) -> Result<Vec<ShopRecord>> {
            panic!("remote must not be called when a cache exists");
        }
    }

    struct FailingRepository;

    #[async_trait]
    impl ShopRepository for FailingRepository {
        async fn fetch_shops(&self) -> Result<Vec<ShopRecord>> {
            Err(HoneyError::BadServerResponse(StatusCode::SERVICE_UNAVAILABLE))
        }
    }

    #[tokio::test]
    async fn test_cache_hit_skips_remote() {
        let temp_dir = TempDir::new().unwrap();
        let cache = CacheStore::new(temp_dir.path().join("shops.json"));
        cache.save(&[ShopRecord::sample()]);

        let repo = CachedShopRepository::new(PanickingRepository, cache);
        let shops = repo.fetch_shops().await.unwrap();
        assert_eq!(shops, vec![ShopRecord::sample()]);
    }

    #[tokio::test]
    async fn test_empty_cached_list_is_a_hit() {
        let temp_dir = TempDir::new().unwrap();
        let cache = CacheStore::new(temp_dir.path().join("shops.json"));
        cache.save(&[]);

        let repo = CachedShopRepository::new(PanickingRepository, cache);
        assert!(repo.fetch_shops().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_miss_fetches_once_and_populates() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("shops.json");
        let remote = CountingRepository::default();
        let calls = Arc::clone(&remote.calls);

        let repo = CachedShopRepository::new(remote, CacheStore::new(&path));
        let first = repo.fetch_shops().await.unwrap();
        let second = repo.fetch_shops().await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(first, second);

        // A fresh instance over the same file serves from the snapshot.
        let fresh = CachedShopRepository::new(PanickingRepository, CacheStore::new(&path));
        assert_eq!(fresh.fetch_shops().await.unwrap(), first);
    }

    #[tokio::test]
    async fn test_remote_error_propagates() {
        let temp_dir = TempDir::new().unwrap();
        let cache = CacheStore::new(temp_dir.path().join("shops.json"));

        let repo = CachedShopRepository::new(FailingRepository, cache);
        let err = repo.fetch_shops().await.unwrap_err();
        assert!(matches!(
            err,
            HoneyError::BadServerResponse(status) if status == StatusCode::SERVICE_UNAVAILABLE
        ));
        assert!(repo.cache().load().is_none());
    }

    #[tokio::test]
    async fn test_unwritable_cache_still_returns_data() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let remote = CountingRepository::default();
        let calls = Arc::clone(&remote.calls);
        let repo = CachedShopRepository::new(remote, CacheStore::new(blocker.join("shops.json")));

        assert_eq!(repo.fetch_shops().await.unwrap().len(), 1);
        assert_eq!(repo.fetch_shops().await.unwrap().len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_concurrent_misses_share_one_fetch() {
        let temp_dir = TempDir::new().unwrap();
        let remote = CountingRepository::default();
        let calls = Arc::clone(&remote.calls);
        let repo = CachedShopRepository::new(
            remote,
            CacheStore::new(temp_dir.path().join("shops.json")),
        );

        let (a, b) = tokio::join!(repo.fetch_shops(), repo.fetch_shops());
        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fixed_repository() {
        let shops = FixedShopRepository::sample().fetch_shops().await.unwrap();
        assert_eq!(shops.len(), 1);
        assert!(FixedShopRepository::default().fetch_shops().await.unwrap().is_empty());
    }
}
