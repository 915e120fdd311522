//! Per-artifact locks
//!
//! Serialises the check-then-build sequence for one artifact name within a
//! process. Different artifacts never block each other. An entry lives only
//! while some caller holds or waits on it.

use parking_lot::{Mutex, MutexGuard};
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of one mutex per artifact name
#[derive(Debug, Default)]
pub struct KeyLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl KeyLocks {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Get (or create) the mutex for `name`
    fn lock_for(&self, name: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock();
        locks
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Run `f` while holding the mutex for `name`
    pub fn with_lock<T>(&self, name: &str, f: impl FnOnce() -> T) -> T {
        let lock = self.lock_for(name);
        let result = {
            let _guard: MutexGuard<'_, ()> = lock.lock();
            f()
        };
        self.release(name, &lock);
        result
    }

    /// Drop the entry for `name` once the map holds the last other reference
    fn release(&self, name: &str, lock: &Arc<Mutex<()>>) {
        let mut locks = self.locks.lock();
        if Arc::strong_count(lock) == 2 {
            locks.remove(name);
        }
    }
}
