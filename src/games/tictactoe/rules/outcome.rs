//! Terminal-state evaluation.

use super::super::{Board, Mark};
use super::draw::is_draw;
use super::win::check_winner;
use serde::{Deserialize, Serialize};

/// Result of evaluating a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum Outcome {
    /// Empty squares remain and nobody has a line.
    #[display("in progress")]
    InProgress,
    /// X completed a line.
    #[display("X wins")]
    WonX,
    /// O completed a line.
    #[display("O wins")]
    WonO,
    /// Board is full without a line.
    #[display("draw")]
    Draw,
}

impl Outcome {
    /// True for every outcome except [`Outcome::InProgress`].
    pub fn is_terminal(self) -> bool {
        self != Outcome::InProgress
    }

    /// The winning mark, if any.
    pub fn winner(self) -> Option<Mark> {
        match self {
            Outcome::WonX => Some(Mark::X),
            Outcome::WonO => Some(Mark::O),
            Outcome::InProgress | Outcome::Draw => None,
        }
    }
}

/// Determines the terminal status of a board.
///
/// Lines are checked rows first, then columns, then diagonals. A winning line
/// takes precedence over a full board.
pub fn evaluate(board: &Board) -> Outcome {
    match check_winner(board) {
        Some(Mark::X) => Outcome::WonX,
        Some(Mark::O) => Outcome::WonO,
        None if is_draw(board) => Outcome::Draw,
        None => Outcome::InProgress,
    }
}
