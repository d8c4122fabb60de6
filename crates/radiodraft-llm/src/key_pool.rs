//! Round-robin pool of upstream API keys.
//!
//! The pool is the one piece of state shared by every concurrent pipeline
//! run. Each call to [`KeyPool::next`] advances a single atomic cursor, so
//! concurrent callers always observe a consistent position: every key is
//! handed out in turn and wraps back to the first.

use std::sync::atomic::{AtomicUsize, Ordering};

use radiodraft_types::ApiKey;

use crate::error::{ProviderError, Result};

/// A fixed, ordered set of API keys consumed round-robin.
#[derive(Debug)]
pub struct KeyPool {
    keys: Vec<ApiKey>,
    cursor: AtomicUsize,
}

impl KeyPool {
    /// Build a pool. An empty key list is a configuration error.
    pub fn new(keys: Vec<ApiKey>) -> Result<Self> {
        if keys.is_empty() {
            return Err(ProviderError::NotConfigured(
                "no upstream api keys configured".into(),
            ));
        }
        Ok(Self {
            keys,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Return the next key and advance the cursor.
    pub fn next(&self) -> &ApiKey {
        let slot = self.cursor.fetch_add(1, Ordering::Relaxed) % self.keys.len();
        &self.keys[slot]
    }

    /// Number of keys in the pool.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Always `false`; construction rejects empty pools.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
