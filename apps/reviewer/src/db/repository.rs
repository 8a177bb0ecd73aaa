//! Repository for review and vocabulary state.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use vocab_core::persistence::Result as PersistResult;
use vocab_core::{Card, Level, Persistence, ReviewSnapshot, VocabEntry, VocabSnapshot};

use crate::db::error::DbError;

type Result<T> = std::result::Result<T, DbError>;

/// SQLite storage. Every save replaces the full table in one transaction.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Open database at path, creating if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(super::schema::SCHEMA)?;
        self.conn.execute_batch(super::schema::INIT_SCHEMA_VERSION)?;
        Ok(())
    }

    pub fn schema_version(&self) -> Result<u32> {
        let version: Option<u32> = self
            .conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))
            .optional()?
            .flatten();
        Ok(version.unwrap_or(super::schema::SCHEMA_VERSION))
    }

    pub fn load_cards(&self) -> Result<Vec<Card>> {
        let mut stmt = self.conn.prepare(
            "SELECT key, level, ease, interval_days, reps, lapses, due_at, suspended FROM review_cards ORDER BY key",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, u8>(1)?,
                    row.get::<_, f64>(2)?,
                    row.get::<_, u32>(3)?,
                    row.get::<_, u32>(4)?,
                    row.get::<_, u32>(5)?,
                    row.get::<_, i64>(6)?,
                    row.get::<_, bool>(7)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(key, level, ease, interval, reps, lapses, due_at, suspended)| -> Result<Card> {
                Ok(Card {
                    level: decode_level(&key, level)?,
                    due_at: decode_millis(&key, due_at)?,
                    key,
                    ease,
                    interval,
                    reps,
                    lapses,
                    suspended,
                })
            })
            .collect()
    }

    pub fn replace_cards<'a>(&self, cards: impl IntoIterator<Item = &'a Card>) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM review_cards", [])?;
        let mut count = 0;
        for card in cards {
            tx.execute(
                "INSERT INTO review_cards (key, level, ease, interval_days, reps, lapses, due_at, suspended)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    card.key,
                    card.level.to_value(),
                    card.ease,
                    card.interval,
                    card.reps,
                    card.lapses,
                    card.due_at.timestamp_millis(),
                    card.suspended
                ],
            )?;
            count += 1;
        }
        tx.commit()?;
        Ok(count)
    }

    pub fn load_vocab(&self) -> Result<Vec<VocabEntry>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, level, exposures, last_seen FROM vocab_items ORDER BY key")?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, u8>(1)?,
                    row.get::<_, u32>(2)?,
                    row.get::<_, i64>(3)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(key, level, exposures, last_seen)| -> Result<VocabEntry> {
                Ok(VocabEntry {
                    level: decode_level(&key, level)?,
                    last_seen: decode_millis(&key, last_seen)?,
                    key,
                    exposures,
                })
            })
            .collect()
    }

    pub fn replace_vocab<'a>(&self, items: impl IntoIterator<Item = &'a VocabEntry>) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM vocab_items", [])?;
        let mut count = 0;
        for item in items {
            tx.execute(
                "INSERT INTO vocab_items (key, level, exposures, last_seen) VALUES (?1, ?2, ?3, ?4)",
                params![
                    item.key,
                    item.level.to_value(),
                    item.exposures,
                    item.last_seen.timestamp_millis()
                ],
            )?;
            count += 1;
        }
        tx.commit()?;
        Ok(count)
    }
}

fn decode_level(key: &str, value: u8) -> Result<Level> {
    Level::from_value(value)
        .ok_or_else(|| DbError::InvalidData(format!("level {value} for {key}")))
}

fn decode_millis(key: &str, millis: i64) -> Result<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| DbError::InvalidData(format!("timestamp {millis} for {key}")))
}

/// Repository handle shared by the review store and the vocabulary book.
#[derive(Clone)]
pub struct SharedRepository(Arc<Mutex<SqliteRepository>>);

impl SharedRepository {
    pub fn new(repository: SqliteRepository) -> Self {
        Self(Arc::new(Mutex::new(repository)))
    }

    pub fn lock(&self) -> Result<MutexGuard<'_, SqliteRepository>> {
        self.0.lock().map_err(|_| DbError::Poisoned)
    }
}

impl Persistence<ReviewSnapshot> for SharedRepository {
    fn load(&self) -> PersistResult<Option<ReviewSnapshot>> {
        let repo = self.lock()?;
        let cards: BTreeMap<String, Card> = repo
            .load_cards()?
            .into_iter()
            .map(|card| (card.key.clone(), card))
            .collect();
        Ok(Some(ReviewSnapshot {
            version: repo.schema_version()?,
            cards,
        }))
    }

    fn save(&self, state: &ReviewSnapshot) -> PersistResult<()> {
        let count = self.lock()?.replace_cards(state.cards.values())?;
        tracing::debug!(cards = count, "saved review cards");
        Ok(())
    }
}

impl Persistence<VocabSnapshot> for SharedRepository {
    fn load(&self) -> PersistResult<Option<VocabSnapshot>> {
        let repo = self.lock()?;
        let items = repo
            .load_vocab()?
            .into_iter()
            .map(|item| (item.key.clone(), item))
            .collect();
        Ok(Some(VocabSnapshot {
            version: repo.schema_version()?,
            items,
        }))
    }

    fn save(&self, state: &VocabSnapshot) -> PersistResult<()> {
        let count = self.lock()?.replace_vocab(state.items.values())?;
        tracing::debug!(items = count, "saved vocabulary");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn fresh_database_has_schema_version() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        assert_eq!(repo.schema_version().unwrap(), 1);
        assert!(repo.load_cards().unwrap().is_empty());
    }

    #[test]
    fn replace_cards_overwrites_previous_rows() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        let cat = Card {
            level: Level::Known,
            ease: 2.5,
            interval: 3,
            reps: 1,
            due_at: now() + Duration::days(3),
            ..Card::new("cat", 2.3, now())
        };
        let dog = Card {
            suspended: true,
            ..Card::new("dog", 2.3, now())
        };

        repo.replace_cards([&cat, &dog]).unwrap();
        assert_eq!(repo.load_cards().unwrap(), vec![cat.clone(), dog]);

        repo.replace_cards([&cat]).unwrap();
        assert_eq!(repo.load_cards().unwrap(), vec![cat]);
    }

    #[test]
    fn invalid_level_row_is_rejected() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        repo.conn
            .execute(
                "INSERT INTO review_cards (key, level, due_at) VALUES ('cat', 9, 0)",
                [],
            )
            .unwrap();
        assert!(matches!(repo.load_cards(), Err(DbError::InvalidData(_))));
    }

    #[test]
    fn shared_repository_round_trips_vocab() {
        let shared = SharedRepository::new(SqliteRepository::open_in_memory().unwrap());
        let mut snapshot = VocabSnapshot::default();
        snapshot.items.insert(
            "chat".to_string(),
            VocabEntry {
                key: "chat".to_string(),
                level: Level::Familiar,
                exposures: 4,
                last_seen: now(),
            },
        );

        Persistence::<VocabSnapshot>::save(&shared, &snapshot).unwrap();
        let loaded = Persistence::<VocabSnapshot>::load(&shared).unwrap();
        assert_eq!(loaded, Some(snapshot));
    }
}
