//! In-memory persistence.

use std::sync::{Arc, Mutex};

use super::{Persistence, Result};
use crate::error::PersistError;

/// Keeps the last saved state in memory. Clones share storage, so a test can
/// keep a handle and inspect what the store wrote.
#[derive(Debug)]
pub struct MemoryPersistence<S> {
    slot: Arc<Mutex<Option<S>>>,
    fail_saves: Arc<Mutex<bool>>,
}

impl<S> Clone for MemoryPersistence<S> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
            fail_saves: Arc::clone(&self.fail_saves),
        }
    }
}

impl<S> Default for MemoryPersistence<S> {
    fn default() -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
            fail_saves: Arc::new(Mutex::new(false)),
        }
    }
}

impl<S: Clone> MemoryPersistence<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a previously saved state.
    pub fn with_state(state: S) -> Self {
        let persistence = Self::default();
        *persistence.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(state);
        persistence
    }

    /// Last saved state.
    pub fn stored(&self) -> Option<S> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Simulate an unavailable backend.
    pub fn set_unavailable(&self, unavailable: bool) {
        *self.fail_saves.lock().unwrap_or_else(|e| e.into_inner()) = unavailable;
    }
}

impl<S: Clone + Send> Persistence<S> for MemoryPersistence<S> {
    fn load(&self) -> Result<Option<S>> {
        Ok(self.stored())
    }

    fn save(&self, state: &S) -> Result<()> {
        if *self.fail_saves.lock().unwrap_or_else(|e| e.into_inner()) {
            return Err(PersistError::Backend("storage unavailable".to_string()));
        }
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(state.clone());
        Ok(())
    }
}
