//! Game session state and the per-player session store.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument, warn};

use crate::engine::{GameError, MAX_ATTEMPTS};
use crate::feedback::{LetterMark, evaluate};

/// Unique identifier for a player.
pub type PlayerId = i64;

/// Identifier of the community scope statistics are partitioned by.
pub type GuildId = i64;

/// One submitted guess and its computed feedback.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// Normalized uppercase guess text.
    guess: String,
    /// Per-position marks, same length as the guess.
    feedback: Vec<LetterMark>,
}

impl AttemptRecord {
    /// Renders the attempt as the guess followed by its mark glyphs.
    pub fn display(&self) -> String {
        let marks: String = self.feedback.iter().map(|m| m.symbol()).collect();
        format!("{} {}", self.guess, marks)
    }
}

/// An in-progress game owned by a single player.
#[derive(Debug, Clone, Getters)]
pub struct GameSession {
    /// Owning player.
    player_id: PlayerId,
    /// Guild scope used when recording statistics.
    guild_id: GuildId,
    /// Secret word, fixed for the session's lifetime.
    secret_word: String,
    /// Attempt history, oldest first.
    attempts: Vec<AttemptRecord>,
}

impl GameSession {
    /// Creates a fresh session around a secret word.
    #[instrument(skip(secret_word))]
    fn new(player_id: PlayerId, guild_id: GuildId, secret_word: String) -> Self {
        info!(player_id, guild_id, "Creating new game session");
        Self {
            player_id,
            guild_id,
            secret_word,
            attempts: Vec::new(),
        }
    }

    /// Evaluates a normalized guess and appends it to the history.
    pub(crate) fn record_attempt(&mut self, guess: &str) -> AttemptRecord {
        let feedback = evaluate(&self.secret_word, guess);
        let record = AttemptRecord {
            guess: guess.to_string(),
            feedback,
        };
        self.attempts.push(record.clone());
        record
    }

    /// Number of attempts made so far.
    pub fn attempt_count(&self) -> usize {
        self.attempts.len()
    }

    /// Attempts left before the session exhausts.
    pub fn remaining_attempts(&self) -> usize {
        MAX_ATTEMPTS.saturating_sub(self.attempts.len())
    }

    /// True when the latest attempt matched the secret word.
    pub fn is_won(&self) -> bool {
        self.attempts
            .last()
            .is_some_and(|attempt| attempt.guess() == &self.secret_word)
    }

    /// True once the session has reached a terminal state.
    pub fn is_over(&self) -> bool {
        self.is_won() || self.attempts.len() >= MAX_ATTEMPTS
    }
}

/// Tracks the active session for each player.
///
/// At most one session exists per player at a time. Sessions live here until
/// won, exhausted, or quit; all access goes through the store lock so
/// concurrent submissions for one player serialize instead of interleaving.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<PlayerId, GameSession>>>,
}

impl SessionStore {
    /// Creates an empty session store.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating session store");
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Creates a session for the player unless one is already active.
    #[instrument(skip(self, secret_word))]
    pub(crate) fn create(
        &self,
        player_id: PlayerId,
        guild_id: GuildId,
        secret_word: String,
    ) -> Result<GameSession, GameError> {
        let mut sessions = self.sessions.lock().unwrap();

        if sessions.contains_key(&player_id) {
            warn!(player_id, "Player already has an active session");
            return Err(GameError::AlreadyActive);
        }

        let session = GameSession::new(player_id, guild_id, secret_word);
        sessions.insert(player_id, session.clone());

        info!(player_id, guild_id, "Created new session");
        Ok(session)
    }

    /// Gets a snapshot of the player's session, if any.
    #[instrument(skip(self))]
    pub fn get(&self, player_id: PlayerId) -> Option<GameSession> {
        let sessions = self.sessions.lock().unwrap();
        let session = sessions.get(&player_id).cloned();

        if session.is_none() {
            debug!(player_id, "Session not found");
        }

        session
    }

    /// Removes and returns the player's session.
    #[instrument(skip(self))]
    pub(crate) fn remove(&self, player_id: PlayerId) -> Option<GameSession> {
        let mut sessions = self.sessions.lock().unwrap();
        let removed = sessions.remove(&player_id);

        if removed.is_some() {
            info!(player_id, "Session removed");
        } else {
            debug!(player_id, "No session to remove");
        }

        removed
    }

    /// Number of currently active sessions.
    #[instrument(skip(self))]
    pub fn active_count(&self) -> usize {
        let sessions = self.sessions.lock().unwrap();
        sessions.len()
    }

    /// Runs `f` against the player's session while holding the store lock,
    /// then removes the session if it reached a terminal state.
    ///
    /// Errors from `f` must leave the session unmodified; the store keeps it
    /// for the next submission.
    #[instrument(skip(self, f))]
    pub(crate) fn with_active<T>(
        &self,
        player_id: PlayerId,
        f: impl FnOnce(&mut GameSession) -> Result<T, GameError>,
    ) -> Result<T, GameError> {
        let mut sessions = self.sessions.lock().unwrap();

        let session = sessions.get_mut(&player_id).ok_or_else(|| {
            debug!(player_id, "No active session");
            GameError::NoActiveSession
        })?;

        let value = f(session)?;

        if session.is_over() {
            sessions.remove(&player_id);
            debug!(player_id, "Terminal session removed");
        }

        Ok(value)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
