//! Draw detection logic for tic-tac-toe.

use super::super::Board;
use super::win::check_winner;

/// A full board with no complete line is a draw.
pub fn is_draw(board: &Board) -> bool {
    board.is_full() && check_winner(board).is_none()
}
