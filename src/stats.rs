//! Leaderboard aggregation over finished games.

use derive_getters::Getters;
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::session::{Game, GameStatus, PlayerId};

/// Win/loss/draw totals for one player.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct LeaderboardEntry {
    player: PlayerId,
    games: u32,
    wins: u32,
    losses: u32,
    draws: u32,
}

impl LeaderboardEntry {
    fn empty(player: PlayerId) -> Self {
        Self {
            player,
            games: 0,
            wins: 0,
            losses: 0,
            draws: 0,
        }
    }

    /// Calculates win rate as a percentage (0.0–100.0).
    pub fn win_rate(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            (self.wins as f64 / self.games as f64) * 100.0
        }
    }

    fn record(&mut self, won: bool, lost: bool) {
        self.games += 1;
        match (won, lost) {
            (true, _) => self.wins += 1,
            (_, true) => self.losses += 1,
            _ => self.draws += 1,
        }
    }
}

/// Ranks human players by win rate over the given games.
///
/// Games that are not finished are ignored. Ties on win rate go to the player
/// with more wins, then to the lower id. The bot is never ranked.
#[instrument(skip(games), fields(games = games.len()))]
pub fn leaderboard(games: &[Game], count: usize) -> Vec<LeaderboardEntry> {
    let mut totals: HashMap<PlayerId, LeaderboardEntry> = HashMap::new();

    for game in games {
        let (x_won, o_won) = match game.status() {
            GameStatus::WonX => (true, false),
            GameStatus::WonO => (false, true),
            GameStatus::Draw => (false, false),
            GameStatus::Waiting | GameStatus::Playing => continue,
        };

        totals
            .entry(*game.player_x())
            .or_insert_with_key(|id| LeaderboardEntry::empty(*id))
            .record(x_won, o_won);

        if let Some(player_o) = game.player_o() {
            totals
                .entry(*player_o)
                .or_insert_with_key(|id| LeaderboardEntry::empty(*id))
                .record(o_won, x_won);
        }
    }

    let mut ranked: Vec<LeaderboardEntry> = totals.into_values().collect();
    ranked.sort_by(|a, b| {
        b.win_rate()
            .total_cmp(&a.win_rate())
            .then(b.wins.cmp(&a.wins))
            .then(a.player.cmp(&b.player))
    });
    ranked.truncate(count);

    debug!(ranked = ranked.len(), "Leaderboard computed");
    ranked
}
