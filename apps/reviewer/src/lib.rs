pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod state;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vocab_core::{Card, VocabEntry};

use crate::cli::{Cli, Command};
use crate::commands::{review, stats, vocab};
use crate::config::Config;
use crate::state::AppState;

/// Result of a command, in both output formats.
#[derive(Debug)]
pub struct Output {
    pub json: serde_json::Value,
    pub text: String,
}

impl Output {
    fn new(value: &impl Serialize, text: String) -> anyhow::Result<Self> {
        Ok(Self {
            json: serde_json::to_value(value)?,
            text,
        })
    }
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .ok();

    let config = Config::from_env()?;
    let mut state = AppState::open(&config)?;

    let output = execute(&mut state, cli.command)?;
    state.flush()?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&output.json)?);
    } else if !output.text.is_empty() {
        println!("{}", output.text);
    }
    Ok(())
}

/// Run one command against the state.
pub fn execute(state: &mut AppState, command: Command) -> anyhow::Result<Output> {
    let now = state.review.now();
    match command {
        Command::Add { word } => {
            let card = review::add_word(state, &word);
            Output::new(&card, format_card(&card, now))
        }
        Command::Tag { word, level } => {
            let tagged = vocab::tag_word(state, &word, level)?;
            let text = format!(
                "{} tagged {}\n{}",
                tagged.entry.key,
                tagged.entry.level,
                format_card(&tagged.card, now)
            );
            Output::new(&tagged, text)
        }
        Command::Seen { word } => {
            let entry = vocab::mark_seen(state, &word);
            Output::new(&entry, format_entry(&entry))
        }
        Command::Answer { word, rating } => {
            let answered = review::answer_word(state, &word, &rating)?;
            let text = match &answered.card {
                Some(card) => format_card(card, now),
                None => format!("{} is not in the review queue", answered.key),
            };
            Output::new(&answered, text)
        }
        Command::Due => {
            let due = review::due_words(state);
            let text = if due.keys.is_empty() {
                "No cards due.".to_string()
            } else {
                due.keys.join("\n")
            };
            Output::new(&due, text)
        }
        Command::Next => {
            let next = review::next_word(state);
            let text = match &next {
                Some(card) => format_card(card, now),
                None => "No cards due.".to_string(),
            };
            Output::new(&next, text)
        }
        Command::Show { word } => {
            let details = vocab::show_word(state, &word);
            let mut lines = Vec::new();
            match &details.card {
                Some(card) => lines.push(format_card(card, now)),
                None => lines.push(format!("{} is not in the review queue", details.key)),
            }
            if let Some(entry) = &details.vocab {
                lines.push(format_entry(entry));
            }
            Output::new(&details, lines.join("\n"))
        }
        Command::Suspend { word } => {
            let found = review::suspend_word(state, &word);
            Output::new(&found, found_text(&word, found, "suspended"))
        }
        Command::Resume { word } => {
            let found = review::resume_word(state, &word);
            Output::new(&found, found_text(&word, found, "resumed"))
        }
        Command::Remove { word } => {
            let removed = review::remove_word(state, &word);
            let text = found_text(&word, removed.is_some(), "removed");
            Output::new(&removed, text)
        }
        Command::Clear => {
            let count = review::clear_queue(state);
            Output::new(&count, format!("removed {count} cards"))
        }
        Command::Stats => {
            let stats = stats::get_stats(state);
            let levels = stats
                .review
                .by_level
                .iter()
                .enumerate()
                .map(|(level, count)| format!("L{level}: {count}"))
                .collect::<Vec<_>>()
                .join("  ");
            let text = format!(
                "cards: {}  due: {}  suspended: {}\n{}\naverage ease: {:.2}\nvocabulary words: {}",
                stats.review.total,
                stats.review.due,
                stats.review.suspended,
                levels,
                stats.review.average_ease,
                stats.vocab_words
            );
            Output::new(&stats, text)
        }
    }
}

fn found_text(word: &str, found: bool, action: &str) -> String {
    let key = vocab_core::normalize_key(word);
    if found {
        format!("{key} {action}")
    } else {
        format!("{key} is not in the review queue")
    }
}

fn format_card(card: &Card, now: DateTime<Utc>) -> String {
    let due = if card.suspended {
        "suspended".to_string()
    } else if card.due_at <= now {
        "due now".to_string()
    } else {
        format!("due {}", card.due_at.format("%Y-%m-%d %H:%M UTC"))
    };
    format!(
        "{}  level {}  ease {:.2}  interval {}d  reps {}  lapses {}  {}",
        card.key, card.level, card.ease, card.interval, card.reps, card.lapses, due
    )
}

fn format_entry(entry: &VocabEntry) -> String {
    format!(
        "{}  level {}  seen {} times, last {}",
        entry.key,
        entry.level,
        entry.exposures,
        entry.last_seen.format("%Y-%m-%d %H:%M UTC")
    )
}
