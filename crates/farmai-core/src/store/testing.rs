//! Store double for failure-path tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use super::{KeyValueStore, MemoryStore, StoreError, StoreResult};

/// Memory store that can refuse writes to chosen keys, or go fully offline.
#[derive(Debug, Default)]
pub(crate) struct FailingStore {
    inner: MemoryStore,
    refused: Mutex<HashSet<String>>,
    offline: AtomicBool,
}

impl FailingStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Writes (set and remove) to `key` fail until [`FailingStore::heal`].
    pub(crate) fn refuse_writes_to(&self, key: &str) {
        self.refused.lock().unwrap().insert(key.to_string());
    }

    /// Every operation fails until [`FailingStore::heal`].
    pub(crate) fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    pub(crate) fn heal(&self) {
        self.refused.lock().unwrap().clear();
        self.offline.store(false, Ordering::SeqCst);
    }

    fn check_online(&self) -> StoreResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("disk offline".into()));
        }
        Ok(())
    }

    fn check_writable(&self, key: &str) -> StoreResult<()> {
        self.check_online()?;
        if self.refused.lock().unwrap().contains(key) {
            return Err(StoreError::Unavailable("disk full".into()));
        }
        Ok(())
    }
}

impl KeyValueStore for FailingStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.check_online()?;
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.check_writable(key)?;
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.check_writable(key)?;
        self.inner.remove(key)
    }
}
