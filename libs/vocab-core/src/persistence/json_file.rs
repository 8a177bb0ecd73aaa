//! JSON file persistence.

use std::fs;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{Persistence, Result};

/// Stores the whole record as one JSON document.
///
/// Writes go to a sibling `.tmp` file which is then renamed over the target,
/// so a crash mid-write leaves the previous record intact.
#[derive(Debug, Clone)]
pub struct JsonFilePersistence<S> {
    path: PathBuf,
    _state: PhantomData<fn() -> S>,
}

impl<S> JsonFilePersistence<S> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _state: PhantomData,
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl<S: Serialize + DeserializeOwned> Persistence<S> for JsonFilePersistence<S> {
    fn load(&self) -> Result<Option<S>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn save(&self, state: &S) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.temp_path();
        fs::write(&tmp, serde_json::to_vec_pretty(state)?)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), "saved state file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PersistError;
    use crate::types::{Card, ReviewSnapshot};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn snapshot() -> ReviewSnapshot {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let mut cards = BTreeMap::new();
        cards.insert("cat".to_string(), Card::new("cat", 2.3, now));
        ReviewSnapshot::new(cards)
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFilePersistence::<ReviewSnapshot>::new(dir.path().join("review.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load_returns_same_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFilePersistence::new(dir.path().join("nested").join("review.json"));
        store.save(&snapshot()).unwrap();

        assert_eq!(store.load().unwrap(), Some(snapshot()));
        assert!(!dir.path().join("nested").join("review.json.tmp").exists());
    }

    #[test]
    fn malformed_file_is_a_serde_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("review.json");
        fs::write(&path, "{ not json").unwrap();

        let store = JsonFilePersistence::<ReviewSnapshot>::new(path);
        assert!(matches!(store.load(), Err(PersistError::Serde(_))));
    }
}
