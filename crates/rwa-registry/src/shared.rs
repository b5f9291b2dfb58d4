//! Shared handle for concurrent callers
//!
//! Calls are serialized behind one `parking_lot::Mutex`, so each command runs
//! to completion (or fails without effect) before the next one starts. Lock
//! acquisition order is the total order commands are applied in.
//!
//! The wrapped registry keeps every committed fact in its journal until
//! [`SharedRegistry::take_facts`] drains it. A long-lived handle needs a
//! consumer that drains periodically, or the journal grows without bound.

use crate::command::RegistryCommand;
use crate::errors::RegistryResult;
use crate::facts::JournalEntry;
use crate::identifiers::AccountId;
use crate::registry::RwaRegistry;
use crate::snapshot::RegistrySnapshot;
use parking_lot::Mutex;
use std::sync::Arc;

/// Clonable handle to a registry guarded by a single lock
#[derive(Debug, Clone)]
pub struct SharedRegistry {
    inner: Arc<Mutex<RwaRegistry>>,
}

impl SharedRegistry {
    /// Wrap a registry
    pub fn new(registry: RwaRegistry) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }

    /// Apply a command as `caller`
    ///
    /// The returned entries also stay in the journal until drained.
    pub fn execute(
        &self,
        caller: &AccountId,
        command: RegistryCommand,
    ) -> RegistryResult<Vec<JournalEntry>> {
        self.inner.lock().execute(caller, command)
    }

    /// Run a read-only closure under the lock
    pub fn read<R>(&self, f: impl FnOnce(&RwaRegistry) -> R) -> R {
        let guard = self.inner.lock();
        f(&*guard)
    }

    /// Drain recorded facts
    pub fn take_facts(&self) -> Vec<JournalEntry> {
        self.inner.lock().take_facts()
    }

    /// Capture the current state
    pub fn snapshot(&self) -> RegistrySnapshot {
        self.inner.lock().snapshot()
    }
}

impl From<RwaRegistry> for SharedRegistry {
    fn from(registry: RwaRegistry) -> Self {
        Self::new(registry)
    }
}
