//! Vocabulary tagging commands.

use vocab_core::{Card, Level, VocabEntry};

use super::CommandError;
use crate::state::AppState;

#[derive(Debug, serde::Serialize)]
pub struct TagResponse {
    pub entry: VocabEntry,
    pub card: Card,
}

#[derive(Debug, serde::Serialize)]
pub struct WordDetails {
    pub key: String,
    pub card: Option<Card>,
    pub vocab: Option<VocabEntry>,
}

/// Tag a word with a familiarity level and schedule it accordingly.
pub fn tag_word(state: &mut AppState, word: &str, level: u8) -> Result<TagResponse, CommandError> {
    let level = Level::try_from(level)?;
    let entry = state.vocab.set_level(word, level).clone();
    state.review.ensure_in_queue(word);
    let card = state.review.set_by_level(word, level).clone();
    Ok(TagResponse { entry, card })
}

/// Count a lookup of a word.
pub fn mark_seen(state: &mut AppState, word: &str) -> VocabEntry {
    state.vocab.bump_seen(word).clone()
}

pub fn show_word(state: &AppState, word: &str) -> WordDetails {
    WordDetails {
        key: vocab_core::normalize_key(word),
        card: state.review.card(word).cloned(),
        vocab: state.vocab.get(word).cloned(),
    }
}
