//! In-memory game store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument};

use super::GameStore;
use crate::db::DbError;
use crate::session::{Game, GameId, GameStatus, PlayerId};

/// Game store backed by a shared map.
///
/// Clones share the same map, so one store can be handed to several services.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    games: Arc<Mutex<HashMap<GameId, Game>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating in-memory game store");
        Self::default()
    }

    fn games(&self) -> MutexGuard<'_, HashMap<GameId, Game>> {
        self.games.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn collect(&self, keep: impl Fn(&Game) -> bool) -> Vec<Game> {
        self.games().values().filter(|g| keep(g)).cloned().collect()
    }
}

impl GameStore for MemoryStore {
    #[instrument(skip(self))]
    fn load_game(&self, id: GameId) -> Result<Option<Game>, DbError> {
        let game = self.games().get(&id).cloned();
        debug!(found = game.is_some(), "Loaded game");
        Ok(game)
    }

    #[instrument(skip(self, game), fields(game_id = %game.id(), status = %game.status()))]
    fn save_game(&self, game: &Game) -> Result<(), DbError> {
        self.games().insert(*game.id(), game.clone());
        debug!("Game saved");
        Ok(())
    }

    #[instrument(skip(self))]
    fn list_waiting_games(&self) -> Result<Vec<Game>, DbError> {
        let mut games = self.collect(|g| {
            *g.status() == GameStatus::Waiting && g.player_o().is_none()
        });
        games.sort_by_key(|g| *g.created_at());
        debug!(count = games.len(), "Listed waiting games");
        Ok(games)
    }

    #[instrument(skip(self))]
    fn list_completed_games(&self, player: PlayerId) -> Result<Vec<Game>, DbError> {
        let mut games = self.collect(|g| g.status().is_terminal() && g.has_player(player));
        games.sort_by_key(|g| std::cmp::Reverse(*g.created_at()));
        debug!(count = games.len(), "Listed completed games");
        Ok(games)
    }

    #[instrument(skip(self))]
    fn list_finished_games(&self) -> Result<Vec<Game>, DbError> {
        Ok(self.collect(|g| g.status().is_terminal()))
    }
}
