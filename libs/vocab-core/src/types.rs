//! Core types for the vocabulary review scheduler.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ReviewError;

/// Current version of the persisted state records.
pub const STATE_VERSION: u32 = 1;

/// Normalize a word into its card key (trimmed, lowercase).
pub fn normalize_key(word: &str) -> String {
    word.trim().to_lowercase()
}

/// User-facing familiarity tier of a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Level {
    New,
    Unfamiliar,
    Familiar,
    Known,
    WellKnown,
}

impl Default for Level {
    fn default() -> Self {
        Self::New
    }
}

impl Level {
    pub const ALL: [Level; 5] = [
        Self::New,
        Self::Unfamiliar,
        Self::Familiar,
        Self::Known,
        Self::WellKnown,
    ];

    /// Numeric value (0-4).
    pub fn to_value(self) -> u8 {
        match self {
            Self::New => 0,
            Self::Unfamiliar => 1,
            Self::Familiar => 2,
            Self::Known => 3,
            Self::WellKnown => 4,
        }
    }

    /// Create from numeric value (0-4).
    pub fn from_value(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    /// Display label used by the word sheet.
    pub fn label(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Unfamiliar => "Unfamiliar",
            Self::Familiar => "Familiar",
            Self::Known => "Known",
            Self::WellKnown => "Well-known",
        }
    }

    /// Move up by `steps`, saturating at WellKnown.
    pub fn raised(self, steps: u8) -> Self {
        let value = self.to_value().saturating_add(steps).min(4);
        Self::ALL[value as usize]
    }

    /// Level after a lapse: one step down from Familiar and above, otherwise New.
    pub fn after_lapse(self) -> Self {
        match self {
            Self::New | Self::Unfamiliar => Self::New,
            other => Self::ALL[(other.to_value() - 1) as usize],
        }
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.to_value()
    }
}

impl TryFrom<u8> for Level {
    type Error = ReviewError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_value(value).ok_or(ReviewError::InvalidLevel(value))
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.to_value(), self.label())
    }
}

/// Rating for a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Again,
    Hard,
    Good,
    Easy,
}

impl Rating {
    /// Quality score used by the scheduler (1-4).
    pub fn to_value(self) -> u8 {
        match self {
            Self::Again => 1,
            Self::Hard => 2,
            Self::Good => 3,
            Self::Easy => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Again => "again",
            Self::Hard => "hard",
            Self::Good => "good",
            Self::Easy => "easy",
        }
    }
}

impl FromStr for Rating {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "again" => Ok(Self::Again),
            "hard" => Ok(Self::Hard),
            "good" => Ok(Self::Good),
            "easy" => Ok(Self::Easy),
            _ => Err(ReviewError::InvalidRating(s.to_string())),
        }
    }
}

/// Learning card for a single vocabulary key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub key: String,
    pub level: Level,
    pub ease: f64,
    /// Whole days until the next review; 0 while in short-term learning.
    pub interval: u32,
    pub reps: u32,
    pub lapses: u32,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub due_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub suspended: bool,
}

impl Card {
    /// Card for a word seen for the first time, due at `now`.
    pub fn new(key: impl Into<String>, ease: f64, now: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            level: Level::New,
            ease,
            interval: 0,
            reps: 0,
            lapses: 0,
            due_at: now,
            suspended: false,
        }
    }

    /// Whether the card is eligible for review at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        !self.suspended && self.due_at <= now
    }
}

/// Persisted record of the scheduler: `{ version, cards }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewSnapshot {
    pub version: u32,
    pub cards: BTreeMap<String, Card>,
}

impl Default for ReviewSnapshot {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            cards: BTreeMap::new(),
        }
    }
}

impl ReviewSnapshot {
    pub fn new(cards: BTreeMap<String, Card>) -> Self {
        Self {
            version: STATE_VERSION,
            cards,
        }
    }
}

/// Aggregate counts over the card set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewStats {
    pub total: usize,
    pub due: usize,
    pub suspended: usize,
    pub by_level: [usize; 5],
    pub average_ease: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn normalize_key_lowercases_and_trims() {
        assert_eq!(normalize_key("  Cat "), "cat");
        assert_eq!(normalize_key("ÉCOLE"), "école");
    }

    #[test]
    fn level_rejects_out_of_range() {
        assert_eq!(Level::try_from(3), Ok(Level::Known));
        assert_eq!(Level::try_from(5), Err(ReviewError::InvalidLevel(5)));
    }

    #[test]
    fn level_raise_saturates() {
        assert_eq!(Level::New.raised(2), Level::Familiar);
        assert_eq!(Level::Known.raised(2), Level::WellKnown);
        assert_eq!(Level::WellKnown.raised(1), Level::WellKnown);
    }

    #[test]
    fn level_after_lapse() {
        assert_eq!(Level::New.after_lapse(), Level::New);
        assert_eq!(Level::Unfamiliar.after_lapse(), Level::New);
        assert_eq!(Level::Familiar.after_lapse(), Level::Unfamiliar);
        assert_eq!(Level::WellKnown.after_lapse(), Level::Known);
    }

    #[test]
    fn rating_parses_case_insensitively() {
        assert_eq!("Good".parse::<Rating>(), Ok(Rating::Good));
        assert_eq!(" again".parse::<Rating>(), Ok(Rating::Again));
        assert!(matches!(
            "perfect".parse::<Rating>(),
            Err(ReviewError::InvalidRating(_))
        ));
    }

    #[test]
    fn card_serializes_camel_case_with_millis() {
        let due = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let card = Card::new("cat", 2.3, due);
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["dueAt"], 1_700_000_000_000i64);
        assert_eq!(json["level"], 0);
        assert!(json.get("suspended").is_none());

        let suspended = Card {
            suspended: true,
            ..card
        };
        let json = serde_json::to_value(&suspended).unwrap();
        assert_eq!(json["suspended"], true);
    }

    #[test]
    fn card_rejects_invalid_level_on_decode() {
        let raw = r#"{"key":"cat","level":9,"ease":2.3,"interval":0,"reps":0,"lapses":0,"dueAt":0}"#;
        assert!(serde_json::from_str::<Card>(raw).is_err());
    }

    #[test]
    fn suspended_card_is_never_due() {
        let now = Utc.timestamp_millis_opt(1_000).unwrap();
        let mut card = Card::new("cat", 2.3, now);
        assert!(card.is_due(now));
        card.suspended = true;
        assert!(!card.is_due(now));
    }
}
