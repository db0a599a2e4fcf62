//! Persistence contract consumed by the game service.

mod memory;

pub use memory::MemoryStore;

use crate::db::DbError;
use crate::session::{Game, GameError, GameErrorKind, GameId, PlayerId};

/// Storage for games, keyed by id.
///
/// Implementations report failures as [`DbError`]; the service passes them to
/// its caller unchanged and never retries.
pub trait GameStore {
    /// Loads a game, `None` if the id is unknown.
    fn load_game(&self, id: GameId) -> Result<Option<Game>, DbError>;

    /// Inserts or replaces the game with the same id.
    fn save_game(&self, game: &Game) -> Result<(), DbError>;

    /// Games waiting for a second player, oldest first.
    fn list_waiting_games(&self) -> Result<Vec<Game>, DbError>;

    /// Finished games in which `player` took part, newest first.
    fn list_completed_games(&self, player: PlayerId) -> Result<Vec<Game>, DbError>;

    /// Every finished game, in no particular order.
    fn list_finished_games(&self) -> Result<Vec<Game>, DbError>;

    /// Loads game `id`, applies `step` and saves its result as one unit.
    ///
    /// Nothing is saved when `step` fails. The default runs the three steps
    /// back to back; stores shared between processes override it to hold a
    /// write lock for the whole sequence.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id, the error of `step`, or storage failures.
    fn update_game<F>(&self, id: GameId, step: F) -> Result<Game, GameError>
    where
        F: FnOnce(&Game) -> Result<Game, GameError>,
    {
        let current = self
            .load_game(id)?
            .ok_or_else(|| GameError::from(GameErrorKind::NotFound(id)))?;
        let next = step(&current)?;
        self.save_game(&next)?;
        Ok(next)
    }
}
