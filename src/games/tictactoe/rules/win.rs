//! Win detection logic for tic-tac-toe.

use super::super::{Board, Coord, Mark, Square};

/// The eight winning lines: rows, then columns, then the two diagonals.
pub const LINES: [[Coord; 3]; 8] = [
    // Rows
    [Coord::at(0, 0), Coord::at(0, 1), Coord::at(0, 2)],
    [Coord::at(1, 0), Coord::at(1, 1), Coord::at(1, 2)],
    [Coord::at(2, 0), Coord::at(2, 1), Coord::at(2, 2)],
    // Columns
    [Coord::at(0, 0), Coord::at(1, 0), Coord::at(2, 0)],
    [Coord::at(0, 1), Coord::at(1, 1), Coord::at(2, 1)],
    [Coord::at(0, 2), Coord::at(1, 2), Coord::at(2, 2)],
    // Diagonals
    [Coord::at(0, 0), Coord::at(1, 1), Coord::at(2, 2)],
    [Coord::at(0, 2), Coord::at(1, 1), Coord::at(2, 0)],
];

/// Checks if there is a winner on the board.
///
/// Returns the mark owning the first complete line found, `None` otherwise.
pub fn check_winner(board: &Board) -> Option<Mark> {
    for [a, b, c] in LINES {
        let sq = board.get(a);
        if sq != Square::Empty && sq == board.get(b) && sq == board.get(c) {
            return sq.mark();
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    #[test]
    fn test_no_winner_empty_board() {
        assert_eq!(check_winner(&Board::new()), None);
    }

    #[test]
    fn test_winner_top_row() {
        assert_eq!(check_winner(&board("XXXOO....")), Some(Mark::X));
    }

    #[test]
    fn test_winner_column() {
        assert_eq!(check_winner(&board("XO.XO..O.")), Some(Mark::O));
    }

    #[test]
    fn test_winner_diagonal() {
        assert_eq!(check_winner(&board("O.X.OX..O")), Some(Mark::O));
        assert_eq!(check_winner(&board("OOX.X.X..")), Some(Mark::X));
    }

    #[test]
    fn test_lines_through_each_square() {
        let on_lines = |at: Coord| LINES.iter().filter(|line| line.contains(&at)).count();
        let corners = [Coord::at(0, 0), Coord::at(0, 2), Coord::at(2, 0), Coord::at(2, 2)];

        assert_eq!(on_lines(Coord::at(1, 1)), 4);
        for at in Coord::all() {
            if corners.contains(&at) {
                assert_eq!(on_lines(at), 3, "corner {}", at);
            } else if at != Coord::at(1, 1) {
                assert_eq!(on_lines(at), 2, "edge {}", at);
            }
        }
    }

    #[test]
    fn test_no_winner_incomplete() {
        assert_eq!(check_winner(&board("XX.......")), None);
    }
}
