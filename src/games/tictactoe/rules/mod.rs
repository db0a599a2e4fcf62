//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`](super::Board). They never mutate and are
//! safe to call at any depth of the minimax search.

mod draw;
mod outcome;
mod win;

pub use draw::is_draw;
pub use outcome::{Outcome, evaluate};
pub use win::{LINES, check_winner};
