//! # lrucache
//!
//! Fixed-capacity generic LRU cache.
//!
//! ## Architecture
//! - **RecencyList**: Arena-backed doubly-linked list with front/back sentinels (O(1) splice)
//! - **HashMap**: AHash index from key to list handle (O(1) lookup)
//! - **SharedCache**: Mutex-guarded handle for use across threads
//!
//! ```
//! use lrucache::{Error, LruCache};
//!
//! let mut cache = LruCache::new(2)?;
//! cache.set("a", 1)?;
//! cache.set("b", 2)?;
//! cache.get("a")?; // "b" is now least recently used
//! cache.set("c", 3)?;
//!
//! assert_eq!(cache.get("b"), Err(Error::KeyNotFound));
//! assert_eq!(cache.len(), 2);
//! # Ok::<(), Error>(())
//! ```

#![warn(missing_docs)]

mod cache;
mod config;
mod error;
mod list;
mod shared;

pub use cache::LruCache;
pub use config::{CacheConfig, DEFAULT_CAPACITY};
pub use error::{Error, Result};
pub use list::{Handle, RecencyList};
pub use shared::SharedCache;
