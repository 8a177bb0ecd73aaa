//! Statistics commands.

use vocab_core::ReviewStats;

use crate::state::AppState;

#[derive(Debug, serde::Serialize)]
pub struct StatsResponse {
    pub algorithm: &'static str,
    pub review: ReviewStats,
    pub vocab_words: usize,
}

pub fn get_stats(state: &AppState) -> StatsResponse {
    StatsResponse {
        algorithm: state.review.algorithm_name(),
        review: state.review.stats(),
        vocab_words: state.vocab.entries().count(),
    }
}
