//! Game state machine driving sessions from start to win, loss, or quit.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::db::{DbError, PlayerStats, StatsRepository};
use crate::session::{AttemptRecord, GameSession, GuildId, PlayerId, SessionStore};
use crate::words::{self, WordList};
use crate::xp::{XpAward, xp_for_attempts};

/// Length of every secret word and guess.
pub const WORD_LENGTH: usize = 5;

/// Maximum guesses before a session is lost.
pub const MAX_ATTEMPTS: usize = 6;

/// Recoverable rejection surfaced to the front end.
///
/// Every variant maps to a message the player can act on; none of them
/// consume an attempt or change session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum GameError {
    /// A start request arrived while the player already has a game.
    #[display("You already have a game in progress")]
    AlreadyActive,
    /// A guess or quit arrived for a player with no game.
    #[display("You have no game in progress")]
    NoActiveSession,
    /// The guess is not exactly five ASCII letters.
    #[display("Guesses must be exactly 5 letters (A-Z)")]
    InvalidFormat,
}

/// Result of a submitted guess.
///
/// Terminal variants mean the session has already been destroyed; the next
/// submission for the player is [`GameError::NoActiveSession`] until a new
/// game is started.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GuessOutcome {
    /// The game continues with attempts remaining.
    InProgress {
        /// Attempt history, oldest first.
        attempts: Vec<AttemptRecord>,
        /// Guesses left before the session exhausts.
        remaining: usize,
    },
    /// The guess matched the secret word.
    Won {
        /// Attempt history, oldest first.
        attempts: Vec<AttemptRecord>,
        /// Attempts the win took.
        attempt_count: usize,
        /// XP requested from the leveling collaborator.
        xp_awarded: u32,
    },
    /// The attempt cap was reached without a win.
    Lost {
        /// Attempt history, oldest first.
        attempts: Vec<AttemptRecord>,
        /// The word that was never guessed.
        secret_word: String,
    },
}

/// Snapshot of a round taken while the session lock is held, so statistics
/// and XP run after the lock is released.
struct RoundSnapshot {
    attempts: Vec<AttemptRecord>,
    guild_id: GuildId,
    secret_word: String,
    won: bool,
}

/// Word-guessing game engine.
///
/// Owns the session store and coordinates word selection, guess evaluation,
/// statistics recording, and XP awards. Front ends (a chat bot, the bundled
/// terminal binary) translate player input into [`GameEngine::start`],
/// [`GameEngine::submit_guess`], and [`GameEngine::quit`] calls and render
/// the structured results.
#[derive(Clone)]
pub struct GameEngine {
    sessions: SessionStore,
    words: Arc<WordList>,
    repository: StatsRepository,
    xp: Arc<dyn XpAward>,
}

impl GameEngine {
    /// Creates an engine from its collaborators.
    #[instrument(skip(words, repository, xp))]
    pub fn new(words: WordList, repository: StatsRepository, xp: Arc<dyn XpAward>) -> Self {
        info!(word_count = words.len(), "Creating game engine");
        Self {
            sessions: SessionStore::new(),
            words: Arc::new(words),
            repository,
            xp,
        }
    }

    /// The session store, for front ends that render current game state.
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Starts a new game for the player.
    ///
    /// The secret word is drawn uniformly from the word list, falling back
    /// to [`crate::words::FALLBACK_WORD`] when the list is empty.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::AlreadyActive`] if the player has a game going.
    #[instrument(skip(self))]
    pub fn start(&self, player_id: PlayerId, guild_id: GuildId) -> Result<GameSession, GameError> {
        let secret_word = self.words.pick();
        let session = self.sessions.create(player_id, guild_id, secret_word)?;

        info!(player_id, guild_id, "Game started");
        Ok(session)
    }

    /// Submits a guess for the player's active game.
    ///
    /// The guess is trimmed and uppercased before evaluation. A rejected
    /// guess consumes nothing: the session keeps its attempt history and the
    /// player may retry. Terminal outcomes destroy the session, record
    /// statistics, and (for wins) request an XP award; statistics and XP
    /// failures are logged and never change the returned outcome.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NoActiveSession`] if the player has no game, or
    /// [`GameError::InvalidFormat`] if the guess is not exactly
    /// [`WORD_LENGTH`] ASCII letters.
    #[instrument(skip(self, raw_guess))]
    pub fn submit_guess(
        &self,
        player_id: PlayerId,
        raw_guess: &str,
    ) -> Result<GuessOutcome, GameError> {
        let round = self.sessions.with_active(player_id, |session| {
            let guess = normalize_guess(raw_guess)?;
            session.record_attempt(&guess);
            Ok(RoundSnapshot {
                attempts: session.attempts().clone(),
                guild_id: *session.guild_id(),
                secret_word: session.secret_word().clone(),
                won: session.is_won(),
            })
        })?;

        let attempt_count = round.attempts.len();

        if round.won {
            info!(player_id, attempt_count, "Game won");
            let xp_awarded = xp_for_attempts(attempt_count);

            if let Err(e) = self
                .repository
                .record_win(round.guild_id, player_id, attempt_count as i32)
            {
                warn!(player_id, error = %e, "Failed to record win");
            }
            if let Err(e) = self.xp.award_xp(round.guild_id, player_id, xp_awarded) {
                warn!(player_id, xp_awarded, error = %e, "Failed to award XP");
            }

            return Ok(GuessOutcome::Won {
                attempts: round.attempts,
                attempt_count,
                xp_awarded,
            });
        }

        if attempt_count >= MAX_ATTEMPTS {
            info!(player_id, "Game lost");

            if let Err(e) = self.repository.record_loss(round.guild_id, player_id) {
                warn!(player_id, error = %e, "Failed to record loss");
            }

            return Ok(GuessOutcome::Lost {
                attempts: round.attempts,
                secret_word: round.secret_word,
            });
        }

        debug!(player_id, attempt_count, "Attempt recorded");
        Ok(GuessOutcome::InProgress {
            remaining: MAX_ATTEMPTS - attempt_count,
            attempts: round.attempts,
        })
    }

    /// Quits the player's active game, returning the abandoned session so
    /// the front end can reveal the secret word.
    ///
    /// Quitting records nothing: the abandoned game counts neither as a
    /// game played nor as a loss.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NoActiveSession`] if the player has no game.
    #[instrument(skip(self))]
    pub fn quit(&self, player_id: PlayerId) -> Result<GameSession, GameError> {
        let session = self
            .sessions
            .remove(player_id)
            .ok_or(GameError::NoActiveSession)?;

        info!(player_id, attempts = session.attempt_count(), "Game quit");
        Ok(session)
    }

    /// Gets a player's statistics, zeroed when the player has no history.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn stats(&self, guild_id: GuildId, player_id: PlayerId) -> Result<PlayerStats, DbError> {
        self.repository.get_stats(guild_id, player_id)
    }

    /// Gets the guild leaderboard: every player with a finished game,
    /// ranked best first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn leaderboard(&self, guild_id: GuildId) -> Result<Vec<PlayerStats>, DbError> {
        self.repository.leaderboard(guild_id)
    }
}

/// Normalizes a raw guess for evaluation.
fn normalize_guess(raw: &str) -> Result<String, GameError> {
    words::normalize_word(raw).ok_or(GameError::InvalidFormat)
}
