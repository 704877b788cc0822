//! Error types for lrucache

use std::fmt;

/// Result type alias for list and cache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for list and cache operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Handle is stale, out of range, or names a sentinel
    InvalidHandle,

    /// Removal from the back of a list with no real nodes
    EmptyList,

    /// Key not resident in the cache
    KeyNotFound,

    /// Cache constructed with capacity 0
    ZeroCapacity,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidHandle => write!(f, "Invalid list handle"),
            Error::EmptyList => write!(f, "List is empty"),
            Error::KeyNotFound => write!(f, "Key not found"),
            Error::ZeroCapacity => write!(f, "Capacity must be greater than 0"),
        }
    }
}

impl std::error::Error for Error {}
