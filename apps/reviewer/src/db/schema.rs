//! SQLite schema definitions.

/// Current schema version for migrations.
pub const SCHEMA_VERSION: u32 = 1;

/// Complete schema for the local review database.
pub const SCHEMA: &str = r#"
-- Review cards, one per normalized word
CREATE TABLE IF NOT EXISTS review_cards (
    key TEXT PRIMARY KEY,
    level INTEGER NOT NULL DEFAULT 0,
    ease REAL NOT NULL DEFAULT 2.3,
    interval_days INTEGER NOT NULL DEFAULT 0,
    reps INTEGER NOT NULL DEFAULT 0,
    lapses INTEGER NOT NULL DEFAULT 0,
    due_at INTEGER NOT NULL,
    suspended INTEGER NOT NULL DEFAULT 0
);

-- Vocabulary levels and lookup counts
CREATE TABLE IF NOT EXISTS vocab_items (
    key TEXT PRIMARY KEY,
    level INTEGER NOT NULL DEFAULT 0,
    exposures INTEGER NOT NULL DEFAULT 0,
    last_seen INTEGER NOT NULL
);

-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_review_cards_due ON review_cards(due_at);
"#;

/// Record the schema version on first open.
pub const INIT_SCHEMA_VERSION: &str = r#"
INSERT OR IGNORE INTO schema_version (version) VALUES (1);
"#;
