//! Per-subject build serialization.
//!
//! Only callers building the same subject wait on each other. Locks are
//! created on demand and dropped once nobody holds or waits on them.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, ReentrantMutex};

use crate::entry::SubjectKey;

/// Registry of in-use build locks, keyed by subject.
///
/// The locks are reentrant so a builder that asks the cache for another
/// subject's diagram from the same thread cannot deadlock on itself.
#[derive(Debug, Default)]
pub(crate) struct BuildLocks {
    locks: Mutex<HashMap<SubjectKey, Arc<ReentrantMutex<()>>>>,
}

impl BuildLocks {
    /// Runs `f` while holding the build lock for `key`.
    pub(crate) fn with<T>(&self, key: SubjectKey, f: impl FnOnce() -> T) -> T {
        let lock = Arc::clone(
            self.locks
                .lock()
                .entry(key)
                .or_insert_with(|| Arc::new(ReentrantMutex::new(()))),
        );
        let release = Release {
            locks: self,
            key,
            lock,
        };

        let _guard = release.lock.lock();
        f()
    }

    /// Callers currently holding or waiting on `key`'s lock.
    #[cfg(test)]
    pub(crate) fn holders(&self, key: SubjectKey) -> usize {
        self.locks
            .lock()
            .get(&key)
            .map_or(0, |lock| Arc::strong_count(lock) - 1)
    }

    /// Number of subjects with a build lock currently in use.
    #[cfg(test)]
    pub(crate) fn in_use(&self) -> usize {
        self.locks.lock().len()
    }
}

/// Drops the registry's lock for a key once its last user leaves, including
/// when the build panics.
struct Release<'a> {
    locks: &'a BuildLocks,
    key: SubjectKey,
    lock: Arc<ReentrantMutex<()>>,
}

impl Drop for Release<'_> {
    fn drop(&mut self) {
        let mut locks = self.locks.locks.lock();
        // The registry and this call are the only holders: nobody is waiting.
        if Arc::strong_count(&self.lock) == 2 {
            locks.remove(&self.key);
        }
    }
}
