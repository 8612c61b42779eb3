//! Database repository for per-player guessing statistics.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use crate::db::{DbError, NewPlayerStats, PlayerStats, models, schema};
use crate::session::{GuildId, PlayerId};

/// Schema migrations compiled into the binary.
const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Repository for recording and querying game statistics.
///
/// Connections are opened per call, so a repository is cheap to clone and
/// safe to share across front-end handlers.
#[derive(Debug, Clone)]
pub struct StatsRepository {
    db_path: String,
}

impl StatsRepository {
    /// Creates a new repository for the database at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the path is invalid.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        info!(path = %db_path, "Creating StatsRepository");
        Ok(Self { db_path })
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))
    }

    /// Applies any pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a migration fails to apply.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<(), DbError> {
        let mut conn = self.connection()?;

        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Migration failed: {}", e)))?;

        info!(count = applied.len(), "Migrations applied");
        Ok(())
    }

    /// Gets a player's statistics, zeroed when the player has no row.
    ///
    /// Reading never creates a row; only [`StatsRepository::record_win`] and
    /// [`StatsRepository::record_loss`] write.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs, never for absence.
    #[instrument(skip(self))]
    pub fn get_stats(&self, guild_id: GuildId, player_id: PlayerId) -> Result<PlayerStats, DbError> {
        debug!(guild_id, player_id, "Loading player stats");
        let mut conn = self.connection()?;

        let row = schema::guess_stats::table
            .find((guild_id, player_id))
            .first::<PlayerStats>(&mut conn)
            .optional()?;

        if row.is_none() {
            debug!(guild_id, player_id, "No stats row, defaulting to zeros");
        }

        Ok(row.unwrap_or_else(|| PlayerStats::zeroed(guild_id, player_id)))
    }

    /// Records a won game: one more game played, one more win, and the
    /// attempt count added to the running total.
    ///
    /// The row is created on first contact and updated in place afterwards,
    /// in a single upsert statement.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn record_win(
        &self,
        guild_id: GuildId,
        player_id: PlayerId,
        attempt_count: i32,
    ) -> Result<PlayerStats, DbError> {
        debug!(guild_id, player_id, attempt_count, "Recording win");
        let mut conn = self.connection()?;
        let now = chrono::Utc::now().naive_utc();

        let seed = NewPlayerStats::new(guild_id, player_id, 1, 1, attempt_count, now);

        let stats = diesel::insert_into(schema::guess_stats::table)
            .values(&seed)
            .on_conflict((schema::guess_stats::guild_id, schema::guess_stats::player_id))
            .do_update()
            .set((
                schema::guess_stats::games_played.eq(schema::guess_stats::games_played + 1),
                schema::guess_stats::wins.eq(schema::guess_stats::wins + 1),
                schema::guess_stats::total_attempts_on_win
                    .eq(schema::guess_stats::total_attempts_on_win + attempt_count),
                schema::guess_stats::updated_at.eq(now),
            ))
            .returning(PlayerStats::as_returning())
            .get_result(&mut conn)?;

        info!(
            guild_id,
            player_id,
            wins = *stats.wins(),
            games_played = *stats.games_played(),
            "Win recorded"
        );
        Ok(stats)
    }

    /// Records a lost game: one more game played, wins untouched.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn record_loss(&self, guild_id: GuildId, player_id: PlayerId) -> Result<PlayerStats, DbError> {
        debug!(guild_id, player_id, "Recording loss");
        let mut conn = self.connection()?;
        let now = chrono::Utc::now().naive_utc();

        let seed = NewPlayerStats::new(guild_id, player_id, 1, 0, 0, now);

        let stats = diesel::insert_into(schema::guess_stats::table)
            .values(&seed)
            .on_conflict((schema::guess_stats::guild_id, schema::guess_stats::player_id))
            .do_update()
            .set((
                schema::guess_stats::games_played.eq(schema::guess_stats::games_played + 1),
                schema::guess_stats::updated_at.eq(now),
            ))
            .returning(PlayerStats::as_returning())
            .get_result(&mut conn)?;

        info!(
            guild_id,
            player_id,
            games_played = *stats.games_played(),
            "Loss recorded"
        );
        Ok(stats)
    }

    /// Gets ranked statistics for every player in the guild with at least
    /// one finished game, best first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn leaderboard(&self, guild_id: GuildId) -> Result<Vec<PlayerStats>, DbError> {
        debug!(guild_id, "Loading leaderboard");
        let mut conn = self.connection()?;

        let mut rows = schema::guess_stats::table
            .filter(schema::guess_stats::guild_id.eq(guild_id))
            .filter(schema::guess_stats::games_played.gt(0))
            .load::<PlayerStats>(&mut conn)?;

        models::sort_leaderboard(&mut rows);

        info!(guild_id, count = rows.len(), "Leaderboard loaded");
        Ok(rows)
    }
}
