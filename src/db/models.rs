//! Database models for per-player statistics.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use tracing::instrument;

use crate::db::schema;
use crate::session::{GuildId, PlayerId};

/// Per-player statistics row, partitioned by guild scope.
///
/// Rows exist only for players with at least one finished game; readers
/// treat a missing row as zeros via [`PlayerStats::zeroed`].
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::guess_stats)]
#[diesel(primary_key(guild_id, player_id))]
pub struct PlayerStats {
    guild_id: i64,
    player_id: i64,
    games_played: i32,
    wins: i32,
    total_attempts_on_win: i32,
    updated_at: NaiveDateTime,
}

impl PlayerStats {
    /// Zero-valued statistics for a player with no recorded games.
    #[instrument]
    pub fn zeroed(guild_id: GuildId, player_id: PlayerId) -> Self {
        Self {
            guild_id,
            player_id,
            games_played: 0,
            wins: 0,
            total_attempts_on_win: 0,
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }

    /// Calculates win rate as a percentage (0.0-100.0).
    #[instrument(skip(self))]
    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            (self.wins as f64 / self.games_played as f64) * 100.0
        }
    }

    /// Mean attempts across winning games, `None` without a win.
    #[instrument(skip(self))]
    pub fn average_attempts(&self) -> Option<f64> {
        if self.wins == 0 {
            None
        } else {
            Some(self.total_attempts_on_win as f64 / self.wins as f64)
        }
    }
}

/// Insertable row seeding the first result for a (guild, player) pair.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::guess_stats)]
pub struct NewPlayerStats {
    guild_id: i64,
    player_id: i64,
    games_played: i32,
    wins: i32,
    total_attempts_on_win: i32,
    updated_at: NaiveDateTime,
}

/// Orders rows by wins descending, then average attempts per win ascending.
///
/// Rows without a win compare with an infinite average, so they always rank
/// behind rows that have one.
pub(crate) fn sort_leaderboard(rows: &mut [PlayerStats]) {
    rows.sort_by(|a, b| {
        b.wins.cmp(&a.wins).then_with(|| {
            let avg_a = a.average_attempts().unwrap_or(f64::INFINITY);
            let avg_b = b.average_attempts().unwrap_or(f64::INFINITY);
            avg_a.total_cmp(&avg_b)
        })
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(player_id: i64, games_played: i32, wins: i32, total_attempts_on_win: i32) -> PlayerStats {
        PlayerStats {
            guild_id: 1,
            player_id,
            games_played,
            wins,
            total_attempts_on_win,
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }

    #[test]
    fn test_zeroed_stats() {
        let zeroed = PlayerStats::zeroed(1, 42);
        assert_eq!(*zeroed.games_played(), 0);
        assert_eq!(*zeroed.wins(), 0);
        assert_eq!(zeroed.win_rate(), 0.0);
        assert_eq!(zeroed.average_attempts(), None);
    }

    #[test]
    fn test_win_rate() {
        assert_eq!(stats(1, 4, 3, 9).win_rate(), 75.0);
        assert_eq!(stats(1, 5, 0, 0).win_rate(), 0.0);
    }

    #[test]
    fn test_average_attempts() {
        assert_eq!(stats(1, 4, 2, 7).average_attempts(), Some(3.5));
        assert_eq!(stats(1, 4, 0, 0).average_attempts(), None);
    }

    #[test]
    fn test_leaderboard_orders_by_wins_then_average() {
        // Same win count: fewer average attempts ranks higher.
        let mut rows = vec![stats(1, 3, 3, 9), stats(2, 3, 3, 6), stats(3, 5, 4, 20)];
        sort_leaderboard(&mut rows);

        let order: Vec<i64> = rows.iter().map(|r| *r.player_id()).collect();
        assert_eq!(order, vec![3, 2, 1]);
    }

    #[test]
    fn test_leaderboard_winless_rows_rank_last() {
        let mut rows = vec![stats(1, 6, 0, 0), stats(2, 1, 1, 6)];
        sort_leaderboard(&mut rows);

        let order: Vec<i64> = rows.iter().map(|r| *r.player_id()).collect();
        assert_eq!(order, vec![2, 1]);
    }
}
