//! Tic-tac-toe rules, search and move validation.

pub mod minimax;
pub mod rules;
mod types;
pub mod validator;

pub use minimax::{best_move, best_move_for};
pub use rules::{Outcome, evaluate};
pub use types::{Board, BoardParseError, Coord, Mark, SIZE, Square};
pub use validator::{MovePolicy, MoveRejection, validate_move};
