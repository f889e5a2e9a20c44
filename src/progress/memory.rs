//! In-memory progress store
//!
//! Used by tests and short-lived sessions. Supports failure injection so
//! persistence-failure paths can be exercised without a broken disk.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::errors::{ProgressError, ProgressResult};
use super::state::ProgressState;
use super::store::ProgressStore;

/// Progress store backed by shared memory.
///
/// Clones share the same record, which lets a test "restart" a machine by
/// handing a clone of the store to a freshly recovered one.
#[derive(Debug, Clone, Default)]
pub struct MemoryProgressStore {
    inner: Arc<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    record: Mutex<Option<ProgressState>>,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a saved record.
    pub fn with_state(state: ProgressState) -> Self {
        let store = Self::new();
        if let Ok(mut record) = store.inner.record.lock() {
            *record = Some(state);
        }
        store
    }

    /// Make every subsequent save fail until reset.
    pub fn set_fail_saves(&self, fail: bool) {
        self.inner.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.inner.saves.load(Ordering::SeqCst)
    }

    /// Last committed record, if any.
    pub fn snapshot(&self) -> Option<ProgressState> {
        self.inner.record.lock().ok().and_then(|r| r.clone())
    }
}

impl ProgressStore for MemoryProgressStore {
    fn load(&self) -> ProgressResult<ProgressState> {
        let record = self
            .inner
            .record
            .lock()
            .map_err(|_| ProgressError::io("load", "record lock poisoned"))?;
        Ok(record.clone().unwrap_or_default())
    }

    fn save(&self, state: &ProgressState) -> ProgressResult<()> {
        if self.inner.fail_saves.load(Ordering::SeqCst) {
            return Err(ProgressError::SaveRejected("injected save failure".to_string()));
        }

        let mut record = self
            .inner
            .record
            .lock()
            .map_err(|_| ProgressError::io("save", "record lock poisoned"))?;
        *record = Some(state.clone());
        self.inner.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
