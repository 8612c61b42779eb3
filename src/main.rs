//! Termo - word-guessing game at the terminal.
//!
//! The engine itself is front-end agnostic; this binary drives it from
//! stdin/stdout the same way a chat bot drives it from messages.

#![warn(missing_docs)]

mod cli;

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use termo::{
    AttemptRecord, GameEngine, GameError, GuessOutcome, MAX_ATTEMPTS, NoXp, StatsRepository,
    WORD_LENGTH, WordList,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Logs go to stderr so they never interleave with the game board.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            db_path,
            words,
            player,
            guild,
        } => run_play(db_path, words, player, guild),
        Command::Stats {
            db_path,
            player,
            guild,
        } => run_stats(db_path, player, guild),
        Command::Rank {
            db_path,
            guild,
            limit,
        } => run_rank(db_path, guild, limit),
    }
}

/// Run one interactive game on stdin/stdout
fn run_play(db_path: String, words_path: PathBuf, player: i64, guild: i64) -> Result<()> {
    let words = match WordList::from_file(&words_path) {
        Ok(words) => words,
        Err(e) => {
            warn!(error = %e, "Word list unavailable, using the built-in fallback");
            WordList::default()
        }
    };

    let repository = StatsRepository::new(db_path)?;
    repository.run_migrations()?;

    let engine = GameEngine::new(words, repository, Arc::new(NoXp));
    engine.start(player, guild)?;
    info!(player, guild, "Game started");

    println!("Guess the {WORD_LENGTH}-letter word. You have {MAX_ATTEMPTS} attempts.");
    println!("🟩 right spot | 🟨 wrong spot | ⬜ not in the word");
    println!("Type a word, or \"quit\" to give up.\n");

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let input = line.trim();

        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("quit") {
            let session = engine.quit(player)?;
            println!("You gave up. The word was: {}", session.secret_word());
            return Ok(());
        }

        match engine.submit_guess(player, input) {
            Ok(GuessOutcome::InProgress {
                attempts,
                remaining,
            }) => {
                render_attempts(&attempts);
                println!("{remaining} attempts left.\n");
            }
            Ok(GuessOutcome::Won {
                attempts,
                attempt_count,
                xp_awarded,
            }) => {
                render_attempts(&attempts);
                println!("You got it in {attempt_count}! +{xp_awarded} XP");
                return Ok(());
            }
            Ok(GuessOutcome::Lost {
                attempts,
                secret_word,
            }) => {
                render_attempts(&attempts);
                println!("Out of attempts. The word was: {secret_word}");
                return Ok(());
            }
            Err(e @ GameError::InvalidFormat) => {
                println!("{e}");
            }
            Err(e) => anyhow::bail!("guess rejected: {e}"),
        }
    }

    // Stdin closed mid-game: treat it like a quit.
    let session = engine.quit(player)?;
    println!("\nThe word was: {}", session.secret_word());
    Ok(())
}

/// Print the attempt history, one line per guess
fn render_attempts(attempts: &[AttemptRecord]) {
    for attempt in attempts {
        println!("{}", attempt.display());
    }
}

/// Print a player's statistics
fn run_stats(db_path: String, player: i64, guild: i64) -> Result<()> {
    let repository = StatsRepository::new(db_path)?;
    repository.run_migrations()?;

    let stats = repository.get_stats(guild, player)?;

    if *stats.games_played() == 0 {
        println!("Player {player} hasn't finished a game yet.");
        return Ok(());
    }

    println!("Games played: {}", stats.games_played());
    println!("Wins:         {}", stats.wins());
    println!("Win rate:     {:.1}%", stats.win_rate());
    if let Some(avg) = stats.average_attempts() {
        println!("Avg attempts: {avg:.1}");
    }
    Ok(())
}

/// Print a guild's leaderboard
fn run_rank(db_path: String, guild: i64, limit: usize) -> Result<()> {
    let repository = StatsRepository::new(db_path)?;
    repository.run_migrations()?;

    let rows = repository.leaderboard(guild)?;

    if rows.is_empty() {
        println!("No finished games in guild {guild} yet.");
        return Ok(());
    }

    for (i, row) in rows.iter().take(limit).enumerate() {
        let average = row
            .average_attempts()
            .map(|avg| format!("{avg:.1} avg attempts"))
            .unwrap_or_else(|| "no wins".to_string());
        println!(
            "{:>2}. player {} - {} wins / {} games ({average})",
            i + 1,
            row.player_id(),
            row.wins(),
            row.games_played(),
        );
    }
    Ok(())
}
