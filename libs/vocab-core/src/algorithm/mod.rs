//! Spaced repetition algorithms for word cards.

pub mod sm2;

use crate::types::{Card, Level, Rating};
use chrono::{DateTime, Utc};

/// Result of scheduling a card after a review or a level assignment.
#[derive(Debug, Clone)]
pub struct SchedulingResult {
    pub card: Card,
    pub next_due: DateTime<Utc>,
}

/// Trait for spaced repetition algorithms.
pub trait SpacedRepetitionAlgorithm: Send + Sync {
    /// Algorithm identifier.
    fn name(&self) -> &'static str;

    /// Card for a word enrolled at `now`.
    fn initial_card(&self, key: &str, now: DateTime<Utc>) -> Card;

    /// Calculate the next card state after a graded review.
    fn schedule(&self, card: &Card, rating: Rating, now: DateTime<Utc>) -> SchedulingResult;

    /// Place a card on the fixed schedule for a manually chosen level.
    fn place_at_level(&self, card: &Card, level: Level, now: DateTime<Utc>) -> SchedulingResult;
}

/// Get algorithm by name.
pub fn get_algorithm(name: &str) -> Option<Box<dyn SpacedRepetitionAlgorithm>> {
    match name {
        "sm2" => Some(Box::new(sm2::Sm2::default())),
        _ => None,
    }
}
