//! End-to-end command tests over real storage backends.

use chrono::{Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;
use vocab_core::{Level, ManualClock, ReviewStore, VocabBook};

use vocab_reviewer::cli::Command;
use vocab_reviewer::commands::{review, vocab};
use vocab_reviewer::config::{Backend, Config};
use vocab_reviewer::db::{SharedRepository, SqliteRepository};
use vocab_reviewer::execute;
use vocab_reviewer::state::AppState;

fn sqlite_state(path: &std::path::Path, clock: &ManualClock) -> AppState {
    let shared = SharedRepository::new(SqliteRepository::open(path).unwrap());
    AppState::new(
        ReviewStore::with_clock(shared.clone(), clock.clone()),
        VocabBook::with_clock(shared, clock.clone()),
    )
}

fn clock() -> ManualClock {
    ManualClock::new(Utc.with_ymd_and_hms(2024, 9, 1, 7, 30, 0).unwrap())
}

#[test]
fn tagged_word_becomes_due_after_its_delay() {
    let dir = tempfile::tempdir().unwrap();
    let clock = clock();
    let mut state = sqlite_state(&dir.path().join("review.db"), &clock);

    let tagged = vocab::tag_word(&mut state, "Cat", 3).unwrap();
    assert_eq!(tagged.entry.level, Level::Known);
    assert_eq!(tagged.card.interval, 3);
    assert!(review::due_words(&state).keys.is_empty());

    clock.advance(Duration::days(3));
    assert_eq!(review::due_words(&state).keys, vec!["cat".to_string()]);
}

#[test]
fn state_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("review.db");
    let clock = clock();

    {
        let mut state = sqlite_state(&path, &clock);
        review::add_word(&mut state, "dog");
        vocab::mark_seen(&mut state, "dog");
        review::answer_word(&mut state, "dog", "easy").unwrap();
    }

    let state = sqlite_state(&path, &clock);
    let details = vocab::show_word(&state, "DOG");
    let card = details.card.unwrap();
    assert_eq!(card.level, Level::Familiar);
    assert_eq!(card.interval, 1);
    assert_eq!(details.vocab.map(|v| v.exposures), Some(1));
}

#[test]
fn answering_unknown_word_reports_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let clock = clock();
    let mut state = sqlite_state(&dir.path().join("review.db"), &clock);

    let answered = review::answer_word(&mut state, "nonexistent-word", "good").unwrap();
    assert!(!answered.found);
    assert!(state.review.is_empty());
}

#[test]
fn invalid_rating_and_level_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let clock = clock();
    let mut state = sqlite_state(&dir.path().join("review.db"), &clock);
    review::add_word(&mut state, "cat");

    let err = review::answer_word(&mut state, "cat", "perfect").unwrap_err();
    assert!(err.message.contains("invalid rating"));

    let err = vocab::tag_word(&mut state, "cat", 5).unwrap_err();
    assert_eq!(err.message, "invalid level 5: expected 0-4");
    assert_eq!(state.review.card("cat").unwrap().level, Level::New);
}

#[test]
fn execute_renders_json_for_due_queue() {
    let dir = tempfile::tempdir().unwrap();
    let clock = clock();
    let mut state = sqlite_state(&dir.path().join("review.db"), &clock);

    execute(&mut state, Command::Add { word: "pear".into() }).unwrap();
    execute(&mut state, Command::Tag { word: "plum".into(), level: 4 }).unwrap();

    let output = execute(&mut state, Command::Due).unwrap();
    assert_eq!(output.json["keys"], serde_json::json!(["pear"]));
    assert_eq!(output.json["next"]["key"], "pear");
    assert_eq!(output.text, "pear");

    let output = execute(&mut state, Command::Stats).unwrap();
    assert_eq!(output.json["review"]["total"], 2);
    assert_eq!(output.json["vocab_words"], 1);
}

#[test]
fn json_backend_opens_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        backend: Backend::Json,
        db_path: dir.path().join("unused.db"),
        json_dir: dir.path().to_path_buf(),
        persist_mode: vocab_core::PersistMode::Deferred,
        algorithm: "sm2".to_string(),
    };

    let mut state = AppState::open(&config).unwrap();
    review::add_word(&mut state, "tree");
    assert!(!dir.path().join("review.json").exists());

    state.flush().unwrap();
    assert!(dir.path().join("review.json").exists());

    let reopened = AppState::open(&config).unwrap();
    assert!(reopened.review.card("tree").is_some());
}

#[test]
fn unknown_algorithm_fails_to_open() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        backend: Backend::Json,
        db_path: dir.path().join("unused.db"),
        json_dir: dir.path().to_path_buf(),
        persist_mode: vocab_core::PersistMode::Immediate,
        algorithm: "leitner".to_string(),
    };
    assert!(AppState::open(&config).is_err());
}

#[test]
fn unusable_data_directory_fails_to_open() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("data");
    std::fs::write(&blocker, "not a directory").unwrap();
    let config = Config {
        backend: Backend::Sqlite,
        db_path: blocker.join("review.db"),
        json_dir: dir.path().to_path_buf(),
        persist_mode: vocab_core::PersistMode::Immediate,
        algorithm: "sm2".to_string(),
    };

    let err = AppState::open(&config).err().unwrap();
    assert!(err.to_string().starts_with("failed to create"));
}
