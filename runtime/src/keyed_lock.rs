//! Per-key mutual exclusion.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OwnedMutexGuard;

/// A map of async mutexes, one per key.
///
/// Locking a key serializes async critical sections for that key only;
/// different keys never contend. Guards for previously seen keys persist
/// for the process lifetime - key cardinality here is active users and
/// live orders, which is bounded in this deployment.
pub struct KeyedMutex<K> {
    locks: Mutex<HashMap<K, Arc<tokio::sync::Mutex<()>>>>,
}

impl<K: Eq + Hash + Clone> KeyedMutex<K> {
    /// Creates an empty lock map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Acquires the mutex for `key`, waiting if another task holds it.
    pub async fn lock(&self, key: K) -> OwnedMutexGuard<()> {
        let mutex = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(key).or_default())
        };
        mutex.lock_owned().await
    }
}

impl<K: Eq + Hash + Clone> Default for KeyedMutex<K> {
    fn default() -> Self {
        Self::new()
    }
}
