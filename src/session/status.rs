//! Lifecycle status of a persisted game.

use crate::games::tictactoe::Outcome;
use serde::{Deserialize, Serialize};

/// Status of a game.
///
/// `Waiting` → `Playing` → one of the terminal members. The names produced by
/// `Display` (`waiting`, `playing`, `won_x`, `won_o`, `draw`) are the stored
/// representation and parse back through `FromStr`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// Created without a bot, waiting for player O to join.
    Waiting,
    /// Moves are being accepted.
    Playing,
    /// X completed a line.
    WonX,
    /// O completed a line.
    WonO,
    /// Board filled without a line.
    Draw,
}

impl GameStatus {
    /// Terminal statuses accept no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::WonX | Self::WonO | Self::Draw)
    }

    /// Maps a board evaluation onto a playing game's status.
    pub fn from_outcome(outcome: Outcome) -> Self {
        match outcome {
            Outcome::InProgress => Self::Playing,
            Outcome::WonX => Self::WonX,
            Outcome::WonO => Self::WonO,
            Outcome::Draw => Self::Draw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_stored_names() {
        assert_eq!(GameStatus::WonX.to_string(), "won_x");
        assert_eq!(GameStatus::from_str("won_o").unwrap(), GameStatus::WonO);
        for status in GameStatus::iter() {
            assert_eq!(GameStatus::from_str(&status.to_string()).unwrap(), status);
        }
        assert!(GameStatus::from_str("finished").is_err());
    }

    #[test]
    fn test_terminal_members() {
        let terminal: Vec<_> = GameStatus::iter().filter(|s| s.is_terminal()).collect();
        assert_eq!(terminal, vec![GameStatus::WonX, GameStatus::WonO, GameStatus::Draw]);
    }
}
