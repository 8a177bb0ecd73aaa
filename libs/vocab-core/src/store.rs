//! Review scheduler: the set of word cards and the due queue.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::algorithm::sm2::Sm2;
use crate::algorithm::SpacedRepetitionAlgorithm;
use crate::clock::{Clock, SystemClock};
use crate::error::PersistError;
use crate::persistence::Persistence;
use crate::types::{normalize_key, Card, Level, Rating, ReviewSnapshot, ReviewStats, STATE_VERSION};

/// When the store writes its state back after a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PersistMode {
    /// Save after every mutating call.
    #[default]
    Immediate,
    /// Only mark the store dirty; the owner calls [`ReviewStore::flush`].
    Deferred,
}

/// Owner of all vocabulary cards.
///
/// Every mutating operation takes `&mut self` and completes before returning,
/// so callers never observe a half-updated card map. Share it across threads
/// behind a `Mutex`.
pub struct ReviewStore {
    cards: BTreeMap<String, Card>,
    persistence: Box<dyn Persistence<ReviewSnapshot>>,
    clock: Box<dyn Clock>,
    algorithm: Box<dyn SpacedRepetitionAlgorithm>,
    mode: PersistMode,
    dirty: bool,
}

impl ReviewStore {
    /// Open a store backed by `persistence`, using the wall clock.
    pub fn open(persistence: impl Persistence<ReviewSnapshot> + 'static) -> Self {
        Self::with_clock(persistence, SystemClock)
    }

    /// Open a store with an explicit time source.
    ///
    /// A missing, unreadable or malformed record yields an empty store.
    pub fn with_clock(
        persistence: impl Persistence<ReviewSnapshot> + 'static,
        clock: impl Clock + 'static,
    ) -> Self {
        let cards = load_cards(&persistence);
        tracing::info!(cards = cards.len(), "review store loaded");
        Self {
            cards,
            persistence: Box::new(persistence),
            clock: Box::new(clock),
            algorithm: Box::new(Sm2::default()),
            mode: PersistMode::Immediate,
            dirty: false,
        }
    }

    pub fn with_algorithm(mut self, algorithm: Box<dyn SpacedRepetitionAlgorithm>) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_persist_mode(mut self, mode: PersistMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn algorithm_name(&self) -> &'static str {
        self.algorithm.name()
    }

    /// Enroll a word; existing cards are left untouched.
    pub fn ensure_in_queue(&mut self, word: &str) -> &Card {
        let key = normalize_key(word);
        if !self.cards.contains_key(&key) {
            let card = self.algorithm.initial_card(&key, self.clock.now());
            tracing::debug!(key = %key, "enrolled card");
            self.cards.insert(key.clone(), card);
            self.persist();
        }
        &self.cards[&key]
    }

    /// Put a word on the fixed schedule for `level`, creating it if needed.
    pub fn set_by_level(&mut self, word: &str, level: Level) -> &Card {
        let key = normalize_key(word);
        let now = self.clock.now();
        let current = match self.cards.get(&key) {
            Some(card) => card.clone(),
            None => self.algorithm.initial_card(&key, now),
        };

        let result = self.algorithm.place_at_level(&current, level, now);
        tracing::debug!(key = %key, level = level.to_value(), due = %result.next_due, "set card level");
        self.cards.insert(key.clone(), result.card);
        self.persist();
        &self.cards[&key]
    }

    /// Grade a review. Returns `None` for words that were never enrolled;
    /// those are not created.
    pub fn answer(&mut self, word: &str, rating: Rating) -> Option<&Card> {
        let key = normalize_key(word);
        let current = self.cards.get(&key)?;

        let result = self.algorithm.schedule(current, rating, self.clock.now());
        tracing::debug!(
            key = %key,
            rating = rating.as_str(),
            interval = result.card.interval,
            ease = result.card.ease,
            due = %result.next_due,
            "answered card"
        );
        self.cards.insert(key.clone(), result.card);
        self.persist();
        self.cards.get(&key)
    }

    /// Exclude a card from due queries. Returns false for unknown words.
    pub fn suspend(&mut self, word: &str) -> bool {
        self.set_suspended(word, true)
    }

    /// Make a suspended card eligible again. Returns false for unknown words.
    pub fn resume(&mut self, word: &str) -> bool {
        self.set_suspended(word, false)
    }

    fn set_suspended(&mut self, word: &str, suspended: bool) -> bool {
        let key = normalize_key(word);
        let Some(card) = self.cards.get_mut(&key) else {
            return false;
        };
        if card.suspended != suspended {
            card.suspended = suspended;
            self.persist();
        }
        true
    }

    /// Remove a word's card, if any.
    pub fn remove(&mut self, word: &str) -> Option<Card> {
        let removed = self.cards.remove(&normalize_key(word));
        if removed.is_some() {
            self.persist();
        }
        removed
    }

    pub fn clear_all(&mut self) {
        self.cards.clear();
        self.persist();
    }

    /// Look up a card by word.
    pub fn card(&self, word: &str) -> Option<&Card> {
        self.cards.get(&normalize_key(word))
    }

    /// All cards in key order.
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.values()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Keys due now, earliest first.
    pub fn due_keys(&self) -> Vec<String> {
        self.due_keys_at(self.clock.now())
    }

    pub fn due_keys_at(&self, now: DateTime<Utc>) -> Vec<String> {
        self.due_cards_at(now)
            .into_iter()
            .map(|card| card.key.clone())
            .collect()
    }

    /// Earliest due card, if any.
    pub fn next_due(&self) -> Option<&Card> {
        self.next_due_at(self.clock.now())
    }

    pub fn next_due_at(&self, now: DateTime<Utc>) -> Option<&Card> {
        self.cards
            .values()
            .filter(|card| card.is_due(now))
            .min_by(|a, b| a.due_at.cmp(&b.due_at).then_with(|| a.key.cmp(&b.key)))
    }

    /// Due cards ordered by due time, ties by key.
    fn due_cards_at(&self, now: DateTime<Utc>) -> Vec<&Card> {
        let mut due: Vec<&Card> = self.cards.values().filter(|card| card.is_due(now)).collect();
        due.sort_by(|a, b| a.due_at.cmp(&b.due_at).then_with(|| a.key.cmp(&b.key)));
        due
    }

    pub fn stats(&self) -> ReviewStats {
        let now = self.clock.now();
        let mut by_level = [0usize; 5];
        let mut ease_sum = 0.0;
        let mut due = 0;
        let mut suspended = 0;

        for card in self.cards.values() {
            by_level[card.level.to_value() as usize] += 1;
            ease_sum += card.ease;
            if card.suspended {
                suspended += 1;
            } else if card.due_at <= now {
                due += 1;
            }
        }

        let total = self.cards.len();
        ReviewStats {
            total,
            due,
            suspended,
            by_level,
            average_ease: if total == 0 { 0.0 } else { ease_sum / total as f64 },
        }
    }

    /// Copy of the state in its persisted shape.
    pub fn snapshot(&self) -> ReviewSnapshot {
        ReviewSnapshot::new(self.cards.clone())
    }

    /// Whether in-memory state has changes not yet written.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Write pending changes. On failure the store stays dirty and keeps
    /// scheduling in memory.
    pub fn flush(&mut self) -> Result<(), PersistError> {
        if !self.dirty {
            return Ok(());
        }
        self.persistence.save(&self.snapshot())?;
        self.dirty = false;
        Ok(())
    }

    fn persist(&mut self) {
        self.dirty = true;
        if self.mode == PersistMode::Immediate {
            if let Err(e) = self.flush() {
                tracing::warn!(error = %e, "failed to save review state, keeping changes in memory");
            }
        }
    }
}

fn load_cards(persistence: &dyn Persistence<ReviewSnapshot>) -> BTreeMap<String, Card> {
    let snapshot = match persistence.load() {
        Ok(Some(snapshot)) => snapshot,
        Ok(None) => return BTreeMap::new(),
        Err(e) => {
            tracing::warn!(error = %e, "review state unreadable, starting empty");
            return BTreeMap::new();
        }
    };

    if snapshot.version == 0 || snapshot.version > STATE_VERSION {
        let e = PersistError::UnsupportedVersion(snapshot.version);
        tracing::warn!(error = %e, "review state unreadable, starting empty");
        return BTreeMap::new();
    }

    let sm2 = Sm2::default();
    let mut cards = BTreeMap::new();
    for mut card in snapshot.cards.into_values() {
        let key = normalize_key(&card.key);
        if cards.contains_key(&key) {
            tracing::warn!(key = %key, stored = %card.key, "duplicate card after key normalization, keeping the later record");
        }
        card.key = key.clone();
        card.ease = card.ease.clamp(sm2.minimum_ease, sm2.maximum_ease);
        cards.insert(key, card);
    }
    cards
}
