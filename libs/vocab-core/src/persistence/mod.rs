//! Persistence strategies for scheduler and vocabulary state.
//!
//! The core never talks to a storage backend directly: a [`Persistence`]
//! implementation is injected and asked to `load` once at start and `save`
//! the whole state after each mutation.

pub mod json_file;
pub mod memory;

pub use json_file::JsonFilePersistence;
pub use memory::MemoryPersistence;

use crate::error::PersistError;

/// Result type alias using PersistError.
pub type Result<T> = std::result::Result<T, PersistError>;

/// Load/save strategy for a full state record.
pub trait Persistence<S>: Send {
    /// Load the stored record, `None` if nothing has been saved yet.
    fn load(&self) -> Result<Option<S>>;

    /// Replace the stored record.
    fn save(&self, state: &S) -> Result<()>;
}

impl<S, P: Persistence<S> + ?Sized> Persistence<S> for Box<P> {
    fn load(&self) -> Result<Option<S>> {
        (**self).load()
    }

    fn save(&self, state: &S) -> Result<()> {
        (**self).save(state)
    }
}
