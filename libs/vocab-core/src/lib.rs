//! Vocabulary review core shared by reader front-ends.
//!
//! Provides:
//! - Review scheduler owning one SM-2 card per word, with a due queue
//! - Vocabulary book with per-word familiarity levels for highlighting
//! - Pluggable persistence (in-memory, JSON file) and clock
//! - Shared types (Card, Level, Rating, etc.)

pub mod algorithm;
pub mod clock;
pub mod error;
pub mod persistence;
pub mod store;
pub mod types;
pub mod vocab;

pub use algorithm::{get_algorithm, SchedulingResult, SpacedRepetitionAlgorithm};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{PersistError, Result, ReviewError};
pub use persistence::{JsonFilePersistence, MemoryPersistence, Persistence};
pub use store::{PersistMode, ReviewStore};
pub use types::{
    normalize_key, Card, Level, Rating, ReviewSnapshot, ReviewStats, STATE_VERSION,
};
pub use vocab::{VocabBook, VocabEntry, VocabSnapshot};
