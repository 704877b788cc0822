//! LRU (Least Recently Used) cache
//!
//! Pairs a [`RecencyList`] with an AHash index from key to list handle.
//! Every access moves the entry to the front; inserting past capacity evicts
//! from the back and drops the evicted key from the index.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use ahash::RandomState;
use tracing::{debug, trace};

use crate::config::CacheConfig;
use crate::error::{Error, Result};
use crate::list::{Handle, RecencyList, MAX_PREALLOC};

/// Payload stored in each list node
#[derive(Debug, Clone)]
struct Entry<K, V> {
    key: K,
    value: V,
}

/// LRU cache with fixed capacity
#[derive(Debug)]
pub struct LruCache<K, V> {
    list: RecencyList<Entry<K, V>>,
    index: HashMap<K, Handle, RandomState>,
    capacity: usize,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a new LRU cache holding at most `capacity` entries
    ///
    /// # Errors
    /// * `Error::ZeroCapacity` - `capacity` is 0
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::ZeroCapacity);
        }

        debug!(capacity, "created LRU cache");

        Ok(Self {
            list: RecencyList::with_capacity(capacity),
            index: HashMap::with_capacity_and_hasher(
                capacity.min(MAX_PREALLOC),
                RandomState::new(),
            ),
            capacity,
        })
    }

    /// Create a new LRU cache from a [`CacheConfig`]
    pub fn with_config(config: &CacheConfig) -> Result<Self> {
        config.validate()?;
        Self::new(config.capacity)
    }

    /// Insert or update a key-value pair and mark it most recently used
    ///
    /// An existing key has its value overwritten. A new key that pushes the
    /// cache past capacity evicts exactly one entry, the least recently used.
    pub fn set(&mut self, key: K, value: V) -> Result<()> {
        if let Some(&handle) = self.index.get(&key) {
            self.list.get_mut(handle)?.value = value;
            return self.list.move_to_front(handle);
        }

        let handle = self.list.insert_at_front(Entry {
            key: key.clone(),
            value,
        });
        self.index.insert(key, handle);

        if self.list.len() > self.capacity {
            self.evict()?;
        }

        Ok(())
    }

    /// Get a value and mark it most recently used
    ///
    /// # Errors
    /// * `Error::KeyNotFound` - key is not resident
    pub fn get<Q>(&mut self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let handle = *self.index.get(key).ok_or(Error::KeyNotFound)?;
        self.list.move_to_front(handle)?;
        self.list.get(handle).map(|entry| &entry.value)
    }

    /// Get a value without changing recency order
    pub fn peek<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let handle = *self.index.get(key).ok_or(Error::KeyNotFound)?;
        self.list.get(handle).map(|entry| &entry.value)
    }

    /// Check if a key is resident without changing recency order
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    /// Remove a key and return its value
    pub fn remove<Q>(&mut self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let handle = *self.index.get(key).ok_or(Error::KeyNotFound)?;
        let entry = self.list.remove(handle)?;
        self.index.remove(key);
        Ok(entry.value)
    }

    /// Number of resident entries
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Maximum number of resident entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.list.clear();
        self.index.clear();
    }

    fn evict(&mut self) -> Result<()> {
        let entry = self.list.remove_from_back()?;
        self.index.remove(&entry.key);

        trace!(
            len = self.list.len(),
            capacity = self.capacity,
            "evicted least recently used entry"
        );
        Ok(())
    }
}
