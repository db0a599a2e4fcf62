//! Game service: load, transition, save.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, instrument};

use super::{Game, GameError, GameErrorKind, GameId, PlayerId};
use crate::games::tictactoe::{Board, MovePolicy};
use crate::stats::{LeaderboardEntry, leaderboard};
use crate::store::GameStore;

/// Runs game transitions against a [`GameStore`].
///
/// Transitions on the same game id are serialized: each one holds that id's
/// lock from load to save, so two concurrent moves can never both start from
/// the same stored board. Different ids do not block each other. Locks exist
/// only while a transition on their id is running or waiting; the store's
/// [`GameStore::update_game`] covers callers in other processes.
#[derive(Debug, Clone)]
pub struct GameService<S> {
    store: S,
    policy: MovePolicy,
    locks: Arc<Mutex<HashMap<GameId, Arc<Mutex<()>>>>>,
}

impl<S: GameStore> GameService<S> {
    /// Creates a service over `store` validating moves with `policy`.
    #[instrument(skip(store))]
    pub fn new(store: S, policy: MovePolicy) -> Self {
        info!(?policy, "Creating GameService");
        Self {
            store,
            policy,
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Creates and saves a new game for `player_x`.
    ///
    /// # Errors
    ///
    /// Only storage failures.
    #[instrument(skip(self))]
    pub fn create_game(&self, player_x: PlayerId, with_bot: bool) -> Result<Game, GameError> {
        let game = Game::create(player_x, with_bot);
        self.store.save_game(&game)?;
        Ok(game)
    }

    /// Seats `player` as O in a waiting game.
    ///
    /// # Errors
    ///
    /// `NotFound`, the join errors of [`Game::join`], or storage failures.
    #[instrument(skip(self))]
    pub fn join_game(&self, id: GameId, player: PlayerId) -> Result<Game, GameError> {
        self.transition(id, |game| game.join(player))
    }

    /// Submits `player`'s proposed board for game `id`.
    ///
    /// # Errors
    ///
    /// `NotFound`, the move errors of [`Game::make_move`], or storage failures.
    #[instrument(skip(self, proposed), fields(proposed = %proposed.to_compact()))]
    pub fn make_move(
        &self,
        id: GameId,
        player: PlayerId,
        proposed: Board,
    ) -> Result<Game, GameError> {
        let policy = self.policy;
        self.transition(id, move |game| game.make_move(player, proposed, policy))
    }

    /// Loads game `id`.
    ///
    /// # Errors
    ///
    /// `NotFound` or storage failures.
    #[instrument(skip(self))]
    pub fn current_game(&self, id: GameId) -> Result<Game, GameError> {
        self.store
            .load_game(id)?
            .ok_or_else(|| GameErrorKind::NotFound(id).into())
    }

    /// Games waiting for a second player.
    ///
    /// # Errors
    ///
    /// Storage failures.
    #[instrument(skip(self))]
    pub fn available_games(&self) -> Result<Vec<Game>, GameError> {
        Ok(self.store.list_waiting_games()?)
    }

    /// Finished games `player` took part in.
    ///
    /// # Errors
    ///
    /// Storage failures.
    #[instrument(skip(self))]
    pub fn completed_games(&self, player: PlayerId) -> Result<Vec<Game>, GameError> {
        Ok(self.store.list_completed_games(player)?)
    }

    /// Top `count` players by win rate.
    ///
    /// # Errors
    ///
    /// Storage failures.
    #[instrument(skip(self))]
    pub fn leaderboard(&self, count: usize) -> Result<Vec<LeaderboardEntry>, GameError> {
        let games = self.store.list_finished_games()?;
        Ok(leaderboard(&games, count))
    }

    fn lock_for(&self, id: GameId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(id).or_default())
    }

    /// Drops the entry for `id` unless another transition still holds it.
    fn release(&self, id: GameId, lock: Arc<Mutex<()>>) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // One reference in the map and one in `lock`; more means a waiter.
        if Arc::strong_count(&lock) == 2 {
            locks.remove(&id);
            debug!(game_id = %id, "Released game lock");
        }
    }

    /// Loads `id`, applies `step` and saves the result while holding the
    /// game's lock. Nothing is saved when `step` fails.
    fn transition(
        &self,
        id: GameId,
        step: impl FnOnce(&Game) -> Result<Game, GameError>,
    ) -> Result<Game, GameError> {
        // Unknown ids never get a lock entry.
        self.current_game(id)?;

        let lock = self.lock_for(id);
        let result = {
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            debug!(game_id = %id, "Acquired game lock");
            self.store.update_game(id, step)
        };
        self.release(id, lock);

        let next = result?;
        info!(game_id = %id, status = %next.status(), "Transition saved");
        Ok(next)
    }
}
