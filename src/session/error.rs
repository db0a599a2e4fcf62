//! Game transition error types.

use crate::db::DbError;
use crate::games::tictactoe::MoveRejection;
use derive_more::{Display, Error};
use tracing::instrument;

use super::GameId;

/// What went wrong with a requested transition.
///
/// Every kind is an expected outcome of normal play and is reported to the
/// caller, never raised as a panic.
#[derive(Debug, Clone, Display, Error)]
pub enum GameErrorKind {
    /// Join attempted on a game that is not waiting for a player.
    #[display("game is not waiting for a second player")]
    NotWaiting,
    /// Join attempted on a game whose O slot is taken.
    #[display("game already has two players")]
    AlreadyFull,
    /// Player X tried to join their own game.
    #[display("cannot join your own game")]
    CannotJoinOwnGame,
    /// Move attempted on a game that is not being played.
    #[display("game is not in play")]
    GameFinished,
    /// Move attempted by the player who is not on turn.
    #[display("not your turn")]
    NotYourTurn,
    /// Proposed board is not a legal successor of the stored one.
    #[display("invalid move: {}", _0)]
    InvalidMove(MoveRejection),
    /// No game with this id in the store.
    #[display("game {} not found", _0)]
    NotFound(#[error(not(source))] GameId),
    /// The store failed; passed through unchanged.
    #[display("{}", _0)]
    Storage(DbError),
}

/// Game error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Game error: {} at {}:{}", kind, file, line)]
pub struct GameError {
    /// What went wrong.
    #[error(source)]
    pub kind: GameErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl GameError {
    /// Creates a new game error with caller location tracking.
    #[track_caller]
    #[instrument]
    pub fn new(kind: GameErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> &GameErrorKind {
        &self.kind
    }
}

impl From<GameErrorKind> for GameError {
    #[track_caller]
    fn from(kind: GameErrorKind) -> Self {
        Self::new(kind)
    }
}

impl From<DbError> for GameError {
    #[track_caller]
    fn from(err: DbError) -> Self {
        Self::new(GameErrorKind::Storage(err))
    }
}

impl From<diesel::result::Error> for GameError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::new(GameErrorKind::Storage(DbError::from(err)))
    }
}

impl From<MoveRejection> for GameError {
    #[track_caller]
    fn from(rejection: MoveRejection) -> Self {
        Self::new(GameErrorKind::InvalidMove(rejection))
    }
}
