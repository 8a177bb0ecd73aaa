//! Review queue commands.

use vocab_core::{Card, Rating};

use super::CommandError;
use crate::state::AppState;

#[derive(Debug, serde::Serialize)]
pub struct AnswerResponse {
    pub key: String,
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
}

#[derive(Debug, serde::Serialize)]
pub struct DueResponse {
    pub keys: Vec<String>,
    pub next: Option<Card>,
}

/// Enroll a word in the review queue.
pub fn add_word(state: &mut AppState, word: &str) -> Card {
    state.review.ensure_in_queue(word).clone()
}

/// Grade a review for a word. Unknown words are reported, not created.
pub fn answer_word(
    state: &mut AppState,
    word: &str,
    rating: &str,
) -> Result<AnswerResponse, CommandError> {
    let rating: Rating = rating.parse()?;
    let key = vocab_core::normalize_key(word);
    let card = state.review.answer(&key, rating).cloned();
    if card.is_none() {
        tracing::info!(key = %key, "ignored answer for word not in review queue");
    }

    Ok(AnswerResponse {
        found: card.is_some(),
        key,
        card,
    })
}

/// Words due now, earliest first.
pub fn due_words(state: &AppState) -> DueResponse {
    DueResponse {
        keys: state.review.due_keys(),
        next: state.review.next_due().cloned(),
    }
}

pub fn next_word(state: &AppState) -> Option<Card> {
    state.review.next_due().cloned()
}

pub fn suspend_word(state: &mut AppState, word: &str) -> bool {
    state.review.suspend(word)
}

pub fn resume_word(state: &mut AppState, word: &str) -> bool {
    state.review.resume(word)
}

/// Drop a word from the review queue.
pub fn remove_word(state: &mut AppState, word: &str) -> Option<Card> {
    state.review.remove(word)
}

/// Drop every review card. Vocabulary levels are kept.
pub fn clear_queue(state: &mut AppState) -> usize {
    let count = state.review.len();
    state.review.clear_all();
    count
}
