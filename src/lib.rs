//! Termo library - word-guessing game engine
//!
//! This library provides the core of a Wordle-style guessing game for chat
//! front ends: per-player sessions, a duplicate-aware guess evaluator,
//! random word selection, and persistent win/loss statistics.
//!
//! # Architecture
//!
//! - **Engine**: state machine routing start, guess, and quit requests
//! - **Session**: at most one active game per player, held in memory
//! - **Feedback**: per-letter marks with Wordle-family duplicate handling
//! - **Stats**: SQLite-backed per-guild records and leaderboards
//!
//! Message delivery, rendering, and leveling stay outside the crate; the
//! engine returns structured outcomes and calls an injected [`XpAward`]
//! collaborator when a game is won.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use termo::{GameEngine, NoXp, StatsRepository, WordList};
//!
//! # fn example() -> anyhow::Result<()> {
//! let words = WordList::from_file("data/words.json")?;
//! let repository = StatsRepository::new("termo.db".to_string())?;
//! repository.run_migrations()?;
//!
//! let engine = GameEngine::new(words, repository, Arc::new(NoXp));
//!
//! let session = engine.start(42, 7)?;
//! println!("{} attempts left", session.remaining_attempts());
//!
//! let outcome = engine.submit_guess(42, "crane")?;
//! println!("{:?}", outcome);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod db;
mod engine;
mod feedback;
mod session;
mod words;
mod xp;

// Crate-level exports - Engine and outcomes
pub use engine::{GameEngine, GameError, GuessOutcome, MAX_ATTEMPTS, WORD_LENGTH};

// Crate-level exports - Guess feedback
pub use feedback::{LetterMark, evaluate};

// Crate-level exports - Session management
pub use session::{AttemptRecord, GameSession, GuildId, PlayerId, SessionStore};

// Crate-level exports - Statistics persistence
pub use db::{DbError, PlayerStats, StatsRepository};

// Crate-level exports - Word selection
pub use words::{FALLBACK_WORD, WordList, WordListError};

// Crate-level exports - XP awards
pub use xp::{NoXp, XpAward, XpError, xp_for_attempts};
