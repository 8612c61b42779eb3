//! XP awards for completed games.
//!
//! Leveling itself lives outside this crate; the engine talks to it through
//! the [`XpAward`] trait injected at construction.

use derive_more::{Display, Error};
use tracing::{debug, instrument};

use crate::session::{GuildId, PlayerId};

/// Reward for wins that took more attempts than the table covers.
const DEFAULT_XP: u32 = 25;

/// XP earned for a win at the given attempt count.
///
/// Fewer attempts earn more. The mapping never panics: attempt counts
/// outside the table fall through to a small default reward.
pub fn xp_for_attempts(attempt_count: usize) -> u32 {
    match attempt_count {
        1 => 500,
        2 => 300,
        3 => 200,
        4 => 150,
        5 => 100,
        6 => 50,
        _ => DEFAULT_XP,
    }
}

/// XP award error.
#[derive(Debug, Clone, Display, Error)]
#[display("XP award error: {} at {}:{}", message, file, line)]
pub struct XpError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl XpError {
    /// Creates a new XP award error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Leveling collaborator that grants XP when a game is won.
///
/// Failures are logged by the engine and never change a game's outcome.
pub trait XpAward: Send + Sync {
    /// Grants `amount` XP to the player within the guild scope.
    ///
    /// # Errors
    /// Returns [`XpError`] if the leveling subsystem rejects the award.
    fn award_xp(&self, guild_id: GuildId, player_id: PlayerId, amount: u32) -> Result<(), XpError>;
}

/// Stand-in collaborator for deployments without a leveling subsystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoXp;

impl XpAward for NoXp {
    #[instrument(skip(self))]
    fn award_xp(&self, guild_id: GuildId, player_id: PlayerId, amount: u32) -> Result<(), XpError> {
        debug!(guild_id, player_id, amount, "No leveling subsystem attached, award dropped");
        Ok(())
    }
}
