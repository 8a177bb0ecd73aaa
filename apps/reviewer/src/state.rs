//! Application state.

use anyhow::{anyhow, Context};
use vocab_core::{get_algorithm, JsonFilePersistence, ReviewStore, VocabBook};

use crate::config::{Backend, Config};
use crate::db::{SharedRepository, SqliteRepository};

/// Review scheduler and vocabulary book wired to the configured storage.
pub struct AppState {
    pub review: ReviewStore,
    pub vocab: VocabBook,
}

impl AppState {
    pub fn new(review: ReviewStore, vocab: VocabBook) -> Self {
        Self { review, vocab }
    }

    /// Open both stores on the configured backend.
    pub fn open(config: &Config) -> anyhow::Result<Self> {
        let algorithm = get_algorithm(&config.algorithm)
            .ok_or_else(|| anyhow!("unknown scheduling algorithm: {}", config.algorithm))?;

        let (review, vocab) = match config.backend {
            Backend::Sqlite => {
                if let Some(parent) = config.db_path.parent() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("failed to create {}", parent.display()))?;
                }
                let repository = SqliteRepository::open(&config.db_path)
                    .with_context(|| format!("failed to open {}", config.db_path.display()))?;
                let shared = SharedRepository::new(repository);
                tracing::debug!(path = %config.db_path.display(), "opened sqlite storage");
                (ReviewStore::open(shared.clone()), VocabBook::open(shared))
            }
            Backend::Json => {
                tracing::debug!(dir = %config.json_dir.display(), "using json storage");
                (
                    ReviewStore::open(JsonFilePersistence::new(config.json_dir.join("review.json"))),
                    VocabBook::open(JsonFilePersistence::new(config.json_dir.join("vocab.json"))),
                )
            }
        };

        Ok(Self::new(
            review
                .with_algorithm(algorithm)
                .with_persist_mode(config.persist_mode),
            vocab,
        ))
    }

    /// Write any deferred changes.
    pub fn flush(&mut self) -> anyhow::Result<()> {
        self.review.flush().context("failed to save review state")?;
        self.vocab.flush().context("failed to save vocabulary")?;
        Ok(())
    }
}
