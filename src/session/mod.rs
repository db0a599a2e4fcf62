//! Persisted games: the entity, its state machine and the service that
//! serializes transitions per game.

mod error;
mod game;
mod service;
mod status;

pub use error::{GameError, GameErrorKind};
pub use game::Game;
pub use service::GameService;
pub use status::GameStatus;

/// Unique identifier for a game.
pub type GameId = uuid::Uuid;

/// Unique identifier for a player.
pub type PlayerId = uuid::Uuid;
