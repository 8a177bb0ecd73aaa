//! Vocabulary book: the familiarity level a user has tagged for each word,
//! plus how often the word was looked up.
//!
//! The reader highlights words from [`VocabBook::level_map`]; the review
//! scheduler keeps its own cards.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::{Clock, SystemClock};
use crate::error::PersistError;
use crate::persistence::Persistence;
use crate::types::{normalize_key, Level, STATE_VERSION};

/// A tagged or looked-up word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabEntry {
    pub key: String,
    pub level: Level,
    pub exposures: u32,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_seen: DateTime<Utc>,
}

/// Persisted record of the vocabulary book: `{ version, items }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabSnapshot {
    pub version: u32,
    pub items: BTreeMap<String, VocabEntry>,
}

impl Default for VocabSnapshot {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            items: BTreeMap::new(),
        }
    }
}

pub struct VocabBook {
    items: BTreeMap<String, VocabEntry>,
    persistence: Box<dyn Persistence<VocabSnapshot>>,
    clock: Box<dyn Clock>,
    dirty: bool,
}

impl VocabBook {
    pub fn open(persistence: impl Persistence<VocabSnapshot> + 'static) -> Self {
        Self::with_clock(persistence, SystemClock)
    }

    pub fn with_clock(
        persistence: impl Persistence<VocabSnapshot> + 'static,
        clock: impl Clock + 'static,
    ) -> Self {
        let items = match persistence.load() {
            Ok(Some(snapshot)) if snapshot.version == STATE_VERSION => snapshot.items,
            Ok(Some(snapshot)) => {
                tracing::warn!(version = snapshot.version, "unsupported vocabulary state, starting empty");
                BTreeMap::new()
            }
            Ok(None) => BTreeMap::new(),
            Err(e) => {
                tracing::warn!(error = %e, "vocabulary state unreadable, starting empty");
                BTreeMap::new()
            }
        };
        Self {
            items,
            persistence: Box::new(persistence),
            clock: Box::new(clock),
            dirty: false,
        }
    }

    /// Tag a word with a level, keeping its exposure count.
    pub fn set_level(&mut self, word: &str, level: Level) -> &VocabEntry {
        let key = normalize_key(word);
        let now = self.clock.now();
        self.items
            .entry(key.clone())
            .and_modify(|entry| entry.level = level)
            .or_insert_with(|| VocabEntry {
                key: key.clone(),
                level,
                exposures: 0,
                last_seen: now,
            });
        self.persist();
        &self.items[&key]
    }

    /// Record that a word was looked up.
    pub fn bump_seen(&mut self, word: &str) -> &VocabEntry {
        let key = normalize_key(word);
        let now = self.clock.now();
        let entry = self.items.entry(key.clone()).or_insert_with(|| VocabEntry {
            key: key.clone(),
            level: Level::New,
            exposures: 0,
            last_seen: now,
        });
        entry.exposures += 1;
        entry.last_seen = now;
        self.persist();
        &self.items[&key]
    }

    pub fn get(&self, word: &str) -> Option<&VocabEntry> {
        self.items.get(&normalize_key(word))
    }

    pub fn entries(&self) -> impl Iterator<Item = &VocabEntry> {
        self.items.values()
    }

    /// Word to level projection for the reader's highlighting layer.
    pub fn level_map(&self) -> BTreeMap<String, Level> {
        self.items
            .iter()
            .map(|(key, entry)| (key.clone(), entry.level))
            .collect()
    }

    pub fn flush(&mut self) -> Result<(), PersistError> {
        if !self.dirty {
            return Ok(());
        }
        let snapshot = VocabSnapshot {
            version: STATE_VERSION,
            items: self.items.clone(),
        };
        self.persistence.save(&snapshot)?;
        self.dirty = false;
        Ok(())
    }

    fn persist(&mut self) {
        self.dirty = true;
        if let Err(e) = self.flush() {
            tracing::warn!(error = %e, "failed to save vocabulary, keeping changes in memory");
        }
    }
}
