//! Exhaustive minimax search for the bot's reply.
//!
//! The search walks the whole remaining game tree. Terminal positions score
//! `+10` for the searching side, `-10` for its opponent and `0` for a draw;
//! depth is not taken into account, so a quick win and a slow win look the
//! same. Root candidates are tried in row-major order and only a strictly
//! better score replaces the current choice, which makes ties resolve to the
//! lowest row, then the lowest column.

use super::rules::{Outcome, evaluate};
use super::types::{Board, Coord, Mark, Square};
use tracing::{debug, instrument};

/// Score of a position won by the searching side.
pub const WIN_SCORE: i32 = 10;

/// Score of a position won by the opponent.
pub const LOSS_SCORE: i32 = -WIN_SCORE;

/// Score of a drawn position.
pub const DRAW_SCORE: i32 = 0;

/// Picks the optimal move for the bot, which always plays O.
///
/// Returns `None` when the board is full.
#[instrument(skip(board), fields(board = %board.to_compact()))]
pub fn best_move(board: &Board) -> Option<Coord> {
    best_move_for(board, Mark::O)
}

/// Picks the optimal move for `mark` on `board`.
///
/// Returns `None` when the board is full.
#[instrument(skip(board), fields(board = %board.to_compact()))]
pub fn best_move_for(board: &Board, mark: Mark) -> Option<Coord> {
    if board.is_full() {
        debug!("Board full, no move available");
        return None;
    }

    // Trial placements happen on a private copy and are undone after scoring.
    let mut scratch = board.clone();
    let mut best: Option<(Coord, i32)> = None;

    for at in board.empty_cells() {
        scratch.set(at, Square::Occupied(mark));
        let score = minimax(&mut scratch, mark, false);
        scratch.set(at, Square::Empty);

        debug!(position = %at, score, "Scored candidate");
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((at, score));
        }
    }

    if let Some((at, score)) = best {
        debug!(position = %at, score, "Selected move");
    }
    best.map(|(at, _)| at)
}

/// Scores a terminal outcome from `me`'s point of view.
///
/// Non-terminal positions score as a draw.
pub fn score(outcome: Outcome, me: Mark) -> i32 {
    match outcome.winner() {
        Some(winner) if winner == me => WIN_SCORE,
        Some(_) => LOSS_SCORE,
        None => DRAW_SCORE,
    }
}

/// Recursive minimax value of `board` for `me`.
///
/// `maximizing` is true when `me` is to move. The board is restored to its
/// original contents before returning.
fn minimax(board: &mut Board, me: Mark, maximizing: bool) -> i32 {
    let outcome = evaluate(board);
    if outcome.is_terminal() {
        return score(outcome, me);
    }

    let to_move = if maximizing { me } else { me.opponent() };
    let mut best = if maximizing { i32::MIN } else { i32::MAX };

    let cells: Vec<Coord> = board.empty_cells().collect();
    for at in cells {
        board.set(at, Square::Occupied(to_move));
        let value = minimax(board, me, !maximizing);
        board.set(at, Square::Empty);

        best = if maximizing {
            best.max(value)
        } else {
            best.min(value)
        };
    }

    best
}
