//! Command line interface.

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "reviewer", about = "Vocabulary review scheduler", version)]
pub struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Add a word to the review queue
    Add { word: String },

    /// Tag a word with a familiarity level (0=New .. 4=Well-known)
    Tag { word: String, level: u8 },

    /// Record a lookup of a word
    Seen { word: String },

    /// Grade a review: again, hard, good or easy
    Answer { word: String, rating: String },

    /// List words due now, earliest first
    Due,

    /// Show the next word to review
    Next,

    /// Show the card and vocabulary entry for a word
    Show { word: String },

    /// Stop reviewing a word
    Suspend { word: String },

    /// Resume reviewing a suspended word
    Resume { word: String },

    /// Remove a word from the review queue
    Remove { word: String },

    /// Remove every word from the review queue
    Clear,

    /// Show review statistics
    Stats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_answer_with_global_json_flag() {
        let cli = Cli::try_parse_from(["reviewer", "answer", "Cat", "good", "--json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Command::Answer { ref word, ref rating } if word == "Cat" && rating == "good"
        ));
    }

    #[test]
    fn tag_requires_numeric_level() {
        assert!(Cli::try_parse_from(["reviewer", "tag", "cat", "known"]).is_err());
    }
}
