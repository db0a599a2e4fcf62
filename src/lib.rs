//! Tic-tac-toe engine library.
//!
//! Owns game state, validates submitted boards, detects finished games and
//! answers for the bot with an exhaustive minimax search.
//!
//! # Architecture
//!
//! - **Games**: board, rules, minimax and move validation for tic-tac-toe
//! - **Session**: the persisted [`Game`] entity, its transitions and the
//!   [`GameService`] that serializes them per game
//! - **Store**: the [`GameStore`] persistence contract with an in-memory
//!   implementation
//! - **Db**: SQLite implementation of the store (diesel)
//! - **Stats**: leaderboard aggregation
//!
//! # Example
//!
//! ```
//! use tictactoe_engine::{Board, GameService, GameStatus, MemoryStore, MovePolicy};
//! use uuid::Uuid;
//!
//! # fn example() -> Result<(), tictactoe_engine::GameError> {
//! let service = GameService::new(MemoryStore::new(), MovePolicy::Lenient);
//! let player = Uuid::new_v4();
//!
//! let game = service.create_game(player, true)?;
//! let proposed: Board = "X........".parse().expect("valid board");
//! let game = service.make_move(*game.id(), player, proposed)?;
//!
//! assert_eq!(game.board().to_compact(), "X...O....");
//! assert_eq!(*game.status(), GameStatus::Playing);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod db;
mod games;
mod session;
mod stats;
mod store;

// Crate-level exports - Configuration
pub use config::{ConfigError, DATABASE_URL_VAR, EngineConfig, STRICT_MOVES_VAR};

// Crate-level exports - Persistence
pub use db::{BUSY_TIMEOUT_MS, DbError, GameRow, MIGRATIONS, NewGameRow, SqliteGameStore};
pub use store::{GameStore, MemoryStore};

// Crate-level exports - Game sessions
pub use session::{Game, GameError, GameErrorKind, GameId, GameService, GameStatus, PlayerId};

// Crate-level exports - Statistics
pub use stats::{LeaderboardEntry, leaderboard};

// Crate-level exports - Game types (tic-tac-toe)
pub use games::tictactoe::{
    Board, BoardParseError, Coord, Mark, MovePolicy, MoveRejection, Outcome, SIZE, Square,
    best_move, best_move_for, evaluate, minimax, rules, validate_move,
};
