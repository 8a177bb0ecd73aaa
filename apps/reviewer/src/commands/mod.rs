//! Command handlers over the application state.

pub mod review;
pub mod stats;
pub mod vocab;

#[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CommandError {
    pub message: String,
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CommandError {}

impl From<vocab_core::ReviewError> for CommandError {
    fn from(e: vocab_core::ReviewError) -> Self {
        Self { message: e.to_string() }
    }
}
