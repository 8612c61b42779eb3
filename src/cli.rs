//! Command-line interface for termo.

use clap::{Parser, Subcommand};

/// Termo - word-guessing game with persistent statistics
#[derive(Parser, Debug)]
#[command(name = "termo")]
#[command(about = "Word-guessing game with per-guild statistics", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a game at the terminal
    Play {
        /// Path to the database file (created if it doesn't exist)
        #[arg(long, default_value = "termo.db")]
        db_path: String,

        /// Path to the word list (JSON array of five-letter words)
        #[arg(long, default_value = "data/words.json")]
        words: std::path::PathBuf,

        /// Player id to play as
        #[arg(long, default_value = "1")]
        player: i64,

        /// Guild scope for statistics
        #[arg(long, default_value = "1")]
        guild: i64,
    },

    /// Show a player's statistics
    Stats {
        /// Path to the database file
        #[arg(long, default_value = "termo.db")]
        db_path: String,

        /// Player id to look up
        #[arg(long, default_value = "1")]
        player: i64,

        /// Guild scope for statistics
        #[arg(long, default_value = "1")]
        guild: i64,
    },

    /// Show a guild's leaderboard
    Rank {
        /// Path to the database file
        #[arg(long, default_value = "termo.db")]
        db_path: String,

        /// Guild scope for statistics
        #[arg(long, default_value = "1")]
        guild: i64,

        /// Number of entries to show
        #[arg(long, default_value = "10")]
        limit: usize,
    },
}
