//! Error types for vocab-core.

use thiserror::Error;

/// Result type alias using ReviewError.
pub type Result<T> = std::result::Result<T, ReviewError>;

/// Errors raised when parsing review input at the boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReviewError {
    #[error("invalid level {0}: expected 0-4")]
    InvalidLevel(u8),

    #[error("invalid rating {0:?}: expected again, hard, good or easy")]
    InvalidRating(String),
}

/// Errors that can occur while loading or saving review state.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("unsupported state version {0}")]
    UnsupportedVersion(u32),

    #[error("storage backend error: {0}")]
    Backend(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_level() {
        assert_eq!(
            ReviewError::InvalidLevel(7).to_string(),
            "invalid level 7: expected 0-4"
        );
    }

    #[test]
    fn display_invalid_rating() {
        assert_eq!(
            ReviewError::InvalidRating("meh".to_string()).to_string(),
            "invalid rating \"meh\": expected again, hard, good or easy"
        );
    }

    #[test]
    fn display_unsupported_version() {
        assert_eq!(
            PersistError::UnsupportedVersion(9).to_string(),
            "unsupported state version 9"
        );
    }
}
