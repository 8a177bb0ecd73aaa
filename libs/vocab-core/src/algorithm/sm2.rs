//! SM-2 spaced repetition algorithm for vocabulary cards.
//!
//! Based on SuperMemo 2: quality 1 ("again") is a lapse that sends the card
//! back to a short relearning step, qualities 2-4 adjust the ease factor and
//! grow the interval 1 day, 6 days, then `interval * ease`.

use super::{SchedulingResult, SpacedRepetitionAlgorithm};
use crate::types::{Card, Level, Rating};
use chrono::{DateTime, Duration, Utc};

/// Fixed schedule applied when a user tags a word with a level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelSchedule {
    pub ease: f64,
    pub interval: u32,
    pub due_in: Duration,
}

impl LevelSchedule {
    pub fn for_level(level: Level) -> Self {
        let (ease, interval, due_in) = match level {
            Level::New => (2.3, 0, Duration::zero()),
            Level::Unfamiliar => (2.3, 0, Duration::minutes(10)),
            Level::Familiar => (2.4, 1, Duration::days(1)),
            Level::Known => (2.5, 3, Duration::days(3)),
            Level::WellKnown => (2.6, 10, Duration::days(10)),
        };
        Self {
            ease,
            interval,
            due_in,
        }
    }
}

/// SM-2 algorithm with configurable parameters.
#[derive(Debug, Clone)]
pub struct Sm2 {
    pub initial_ease: f64,
    pub minimum_ease: f64,
    pub maximum_ease: f64,
    pub lapse_ease_penalty: f64,
    pub relearning_delay: Duration,
    pub first_interval: u32,
    pub second_interval: u32,
    /// Upper bound on the review interval, in days.
    pub maximum_interval: u32,
}

impl Default for Sm2 {
    fn default() -> Self {
        Self {
            initial_ease: 2.3,
            minimum_ease: 1.3,
            maximum_ease: 3.0,
            lapse_ease_penalty: 0.2,
            relearning_delay: Duration::minutes(10),
            first_interval: 1,
            second_interval: 6,
            maximum_interval: 36_500,
        }
    }
}

impl SpacedRepetitionAlgorithm for Sm2 {
    fn name(&self) -> &'static str {
        "sm2"
    }

    fn initial_card(&self, key: &str, now: DateTime<Utc>) -> Card {
        Card::new(key, self.initial_ease, now)
    }

    fn schedule(&self, card: &Card, rating: Rating, now: DateTime<Utc>) -> SchedulingResult {
        let q = rating.to_value();

        let next = if q <= 1 {
            self.lapse(card, now)
        } else {
            self.success(card, rating, now)
        };

        SchedulingResult {
            next_due: next.due_at,
            card: next,
        }
    }

    fn place_at_level(&self, card: &Card, level: Level, now: DateTime<Utc>) -> SchedulingResult {
        let schedule = LevelSchedule::for_level(level);
        let min_reps = if level > Level::New { 1 } else { 0 };
        let due_at = later(now, schedule.due_in);

        SchedulingResult {
            card: Card {
                level,
                ease: schedule.ease,
                interval: schedule.interval,
                reps: card.reps.max(min_reps),
                due_at,
                ..card.clone()
            },
            next_due: due_at,
        }
    }
}

impl Sm2 {
    fn lapse(&self, card: &Card, now: DateTime<Utc>) -> Card {
        Card {
            ease: self.bounded_ease(card.ease - self.lapse_ease_penalty),
            interval: 0,
            reps: 0,
            lapses: card.lapses + 1,
            level: card.level.after_lapse(),
            due_at: later(now, self.relearning_delay),
            ..card.clone()
        }
    }

    fn success(&self, card: &Card, rating: Rating, now: DateTime<Utc>) -> Card {
        let ease = self.bounded_ease(card.ease + ease_delta(rating.to_value()));

        let interval = match card.reps {
            0 => self.first_interval,
            1 => self.second_interval,
            _ => (card.interval as f64 * ease)
                .round()
                .min(self.maximum_interval as f64) as u32,
        }
        .min(self.maximum_interval);

        let steps = if rating == Rating::Easy { 2 } else { 1 };

        Card {
            ease,
            interval,
            reps: card.reps + 1,
            level: card.level.raised(steps),
            due_at: later(now, Duration::days(interval.into())),
            ..card.clone()
        }
    }

    /// Round to 4 decimals and clamp into `[minimum_ease, maximum_ease]`.
    fn bounded_ease(&self, ease: f64) -> f64 {
        ((ease * 10_000.0).round() / 10_000.0).clamp(self.minimum_ease, self.maximum_ease)
    }
}

/// `now + delay`, saturating at the latest representable time.
fn later(now: DateTime<Utc>, delay: Duration) -> DateTime<Utc> {
    now.checked_add_signed(delay).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// SM-2 ease adjustment for quality `q` on a 5-point top.
pub fn ease_delta(q: u8) -> f64 {
    let miss = 5.0 - q as f64;
    0.1 - miss * (0.08 + miss * 0.02)
}
