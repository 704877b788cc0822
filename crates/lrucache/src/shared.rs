//! SharedCache: thread-safe handle around an LruCache

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::cache::LruCache;
use crate::config::CacheConfig;
use crate::error::Result;

/// Cloneable, thread-safe LRU cache
///
/// Every operation holds one lock for its whole duration. `get` reorders the
/// recency list, so reads take the same exclusive lock as writes.
pub struct SharedCache<K, V> {
    inner: Arc<Mutex<LruCache<K, V>>>,
}

impl<K, V> Clone for SharedCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> fmt::Debug for SharedCache<K, V>
where
    K: Hash + Eq + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("SharedCache");
        match self.inner.try_lock() {
            Some(cache) => out
                .field("len", &cache.len())
                .field("capacity", &cache.capacity()),
            None => out.field("locked", &true),
        };
        out.finish()
    }
}

impl<K, V> From<LruCache<K, V>> for SharedCache<K, V> {
    fn from(cache: LruCache<K, V>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }
}

impl<K, V> SharedCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a new shared cache with the given capacity
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of items in cache
    pub fn new(capacity: usize) -> Result<Self> {
        LruCache::new(capacity).map(Self::from)
    }

    /// Create a new shared cache from a [`CacheConfig`]
    pub fn with_config(config: &CacheConfig) -> Result<Self> {
        LruCache::with_config(config).map(Self::from)
    }

    /// Insert or update a value and mark it most recently used
    pub fn set(&self, key: K, value: V) -> Result<()> {
        self.inner.lock().set(key, value)
    }

    /// Get a copy of a value and mark it most recently used
    pub fn get<Q>(&self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.inner.lock().get(key).cloned()
    }

    /// Remove a key and return its value
    pub fn remove<Q>(&self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().remove(key)
    }

    /// Check if a key is resident without changing recency order
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().contains(key)
    }

    /// Get current cache size
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Get cache capacity
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Remove every entry
    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Run several operations under a single lock
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut LruCache<K, V>) -> R) -> R {
        let mut cache = self.inner.lock();
        f(&mut cache)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::thread;

    #[test]
    fn test_shared_basic() {
        let cache = SharedCache::new(2).unwrap();

        cache.set("a", 1).unwrap();
        cache.set("b", 2).unwrap();
        cache.set("c", 3).unwrap();

        assert_eq!(cache.get("a"), Err(Error::KeyNotFound));
        assert_eq!(cache.get("b"), Ok(2));
        assert_eq!(cache.get("c"), Ok(3));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.capacity(), 2);
    }

    #[test]
    fn test_shared_clone_sees_writes() {
        let cache = SharedCache::new(4).unwrap();
        let other = cache.clone();

        cache.set(1, String::from("one")).unwrap();

        assert!(other.contains(&1));
        assert_eq!(other.remove(&1), Ok(String::from("one")));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_shared_with_lock() {
        let cache = SharedCache::new(3).unwrap();

        let hit = cache.with_lock(|inner| {
            inner.set(1, 10)?;
            inner.set(2, 20)?;
            inner.get(&1).copied()
        });

        assert_eq!(hit, Ok(10));
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_shared_debug() {
        let cache = SharedCache::new(4).unwrap();
        cache.set(1u32, "one").unwrap();

        assert_eq!(
            format!("{:?}", cache),
            "SharedCache { len: 1, capacity: 4 }"
        );
        cache.with_lock(|_| {
            assert_eq!(format!("{:?}", cache), "SharedCache { locked: true }");
        });
    }

    #[test]
    fn test_shared_zero_capacity() {
        assert!(SharedCache::<u8, u8>::new(0).is_err());
        assert!(SharedCache::<u8, u8>::with_config(&CacheConfig::new()).is_ok());
    }

    #[test]
    fn test_shared_concurrent() {
        let cache = SharedCache::new(16).unwrap();

        let workers: Vec<_> = (0..8u64)
            .map(|t| {
                let cache = cache.clone();
                thread::spawn(move || {
                    for i in 0..500u64 {
                        let key = (t * 1000 + i) % 64;
                        cache.set(key, key * 2).unwrap();
                        if let Ok(value) = cache.get(&key) {
                            assert_eq!(value, key * 2);
                        }
                        assert!(cache.len() <= 16);
                    }
                })
            })
            .collect();

        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(cache.len(), 16);
        cache.with_lock(|inner| {
            assert_eq!(inner.len(), 16);
        });
    }
}
