//! The persisted game entity and its transitions.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::{GameError, GameErrorKind, GameId, GameStatus, PlayerId};
use crate::games::tictactoe::{
    Board, Mark, MovePolicy, Square, best_move, evaluate, validate_move,
};

/// One match between player X and either a second player or the bot.
///
/// Transitions never mutate in place: [`Game::join`] and [`Game::make_move`]
/// return the successor game, so a rejected action leaves the original
/// untouched. Symbols follow the two player slots: `player_x` holds X and
/// `player_o`, once joined, holds O.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct Game {
    /// Unique identifier, fixed at creation.
    id: GameId,
    /// Current board.
    board: Board,
    /// Lifecycle status.
    status: GameStatus,
    /// Creator, always X.
    player_x: PlayerId,
    /// Second player; `None` for bot games and games still waiting.
    player_o: Option<PlayerId>,
    /// Player to move while `Playing`.
    current_turn: PlayerId,
    /// Creation time, fixed at creation.
    created_at: DateTime<Utc>,
}

impl Game {
    /// Creates a new game for `player_x`.
    ///
    /// Bot games start `Playing` right away; others wait for a second player.
    #[instrument]
    pub fn create(player_x: PlayerId, with_bot: bool) -> Self {
        let status = if with_bot {
            GameStatus::Playing
        } else {
            GameStatus::Waiting
        };
        let game = Self {
            id: Uuid::new_v4(),
            board: Board::new(),
            status,
            player_x,
            player_o: None,
            current_turn: player_x,
            created_at: Utc::now(),
        };
        info!(game_id = %game.id, %player_x, with_bot, status = %status, "Game created");
        game
    }

    /// Mark assigned to `player` in this game, if they take part.
    pub fn symbol_of(&self, player: PlayerId) -> Option<Mark> {
        if player == self.player_x {
            Some(Mark::X)
        } else if self.player_o == Some(player) {
            Some(Mark::O)
        } else {
            None
        }
    }

    /// True when O is played by the bot.
    pub fn is_bot_game(&self) -> bool {
        self.status != GameStatus::Waiting && self.player_o.is_none()
    }

    /// Returns true if `player` is X or O in this game.
    pub fn has_player(&self, player: PlayerId) -> bool {
        self.symbol_of(player).is_some()
    }

    /// Seats `player` as O and starts play with X on turn.
    ///
    /// # Errors
    ///
    /// `NotWaiting`, `AlreadyFull` or `CannotJoinOwnGame`, checked in that order.
    #[instrument(skip(self), fields(game_id = %self.id, status = %self.status))]
    pub fn join(&self, player: PlayerId) -> Result<Self, GameError> {
        if self.status != GameStatus::Waiting {
            warn!("Join rejected, game not waiting");
            return Err(GameErrorKind::NotWaiting.into());
        }
        if self.player_o.is_some() {
            warn!("Join rejected, game full");
            return Err(GameErrorKind::AlreadyFull.into());
        }
        if player == self.player_x {
            warn!("Join rejected, player owns the game");
            return Err(GameErrorKind::CannotJoinOwnGame.into());
        }

        let mut next = self.clone();
        next.player_o = Some(player);
        next.status = GameStatus::Playing;
        next.current_turn = self.player_x;

        info!(player_o = %player, "Player joined as O");
        Ok(next)
    }

    /// Applies `player`'s proposed board and, in bot games, the bot's reply.
    ///
    /// # Errors
    ///
    /// `GameFinished` unless the game is `Playing`, `NotYourTurn` if `player`
    /// is not on turn, `InvalidMove` if `proposed` fails validation under
    /// `policy`.
    #[instrument(skip(self, proposed), fields(game_id = %self.id, proposed = %proposed.to_compact()))]
    pub fn make_move(
        &self,
        player: PlayerId,
        proposed: Board,
        policy: MovePolicy,
    ) -> Result<Self, GameError> {
        if self.status != GameStatus::Playing {
            warn!(status = %self.status, "Move rejected, game not in play");
            return Err(GameErrorKind::GameFinished.into());
        }
        if player != self.current_turn {
            warn!(current_turn = %self.current_turn, "Move rejected, out of turn");
            return Err(GameErrorKind::NotYourTurn.into());
        }
        validate_move(&self.board, &proposed, self.symbol_of(player), policy).inspect_err(
            |rejection| warn!(%rejection, "Move rejected by validator"),
        )?;

        let mut next = self.clone();
        next.board = proposed;

        if next.settle() {
            return Ok(next);
        }

        match next.player_o {
            None => next.play_bot(),
            Some(player_o) => {
                next.current_turn = if next.current_turn == next.player_x {
                    player_o
                } else {
                    next.player_x
                };
                debug!(current_turn = %next.current_turn, "Turn passed");
            }
        }

        Ok(next)
    }

    /// Updates the status from the board; returns true if the game ended.
    fn settle(&mut self) -> bool {
        self.status = GameStatus::from_outcome(evaluate(&self.board));
        if self.status.is_terminal() {
            info!(game_id = %self.id, status = %self.status, board = %self.board.to_compact(), "Game over");
            return true;
        }
        false
    }

    /// Places the bot's O and hands the turn back to X.
    fn play_bot(&mut self) {
        match best_move(&self.board) {
            Some(at) => {
                self.board.set(at, Square::Occupied(Mark::O));
                info!(game_id = %self.id, position = %at, "Bot moved");
                if self.settle() {
                    return;
                }
            }
            None => {
                // Only reachable with a full board, which settle() already ended.
                warn!(game_id = %self.id, "Bot found no move");
                if !self.settle() {
                    self.status = GameStatus::Draw;
                }
                return;
            }
        }
        self.current_turn = self.player_x;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    #[test]
    fn test_create_human_game_waits() {
        let x = Uuid::new_v4();
        let game = Game::create(x, false);
        assert_eq!(*game.status(), GameStatus::Waiting);
        assert_eq!(*game.player_o(), None);
        assert_eq!(*game.current_turn(), x);
        assert_eq!(game.symbol_of(x), Some(Mark::X));
        assert!(!game.is_bot_game());
    }

    #[test]
    fn test_create_bot_game_plays() {
        let x = Uuid::new_v4();
        let game = Game::create(x, true);
        assert_eq!(*game.status(), GameStatus::Playing);
        assert_eq!(*game.player_o(), None);
        assert!(game.is_bot_game());
        assert_eq!(*game.board(), Board::new());
    }

    #[test]
    fn test_join_assigns_o() {
        let (x, o) = (Uuid::new_v4(), Uuid::new_v4());
        let game = Game::create(x, false).join(o).unwrap();
        assert_eq!(*game.status(), GameStatus::Playing);
        assert_eq!(*game.player_o(), Some(o));
        assert_eq!(*game.current_turn(), x);
        assert_eq!(game.symbol_of(o), Some(Mark::O));
        assert_eq!(game.symbol_of(Uuid::new_v4()), None);
    }

    #[test]
    fn test_join_errors() {
        let (x, o) = (Uuid::new_v4(), Uuid::new_v4());
        let waiting = Game::create(x, false);
        assert!(matches!(
            waiting.join(x).unwrap_err().kind(),
            GameErrorKind::CannotJoinOwnGame
        ));

        let playing = waiting.join(o).unwrap();
        assert!(matches!(
            playing.join(Uuid::new_v4()).unwrap_err().kind(),
            GameErrorKind::NotWaiting
        ));

        let bot = Game::create(x, true);
        assert!(matches!(
            bot.join(o).unwrap_err().kind(),
            GameErrorKind::NotWaiting
        ));
    }

    #[test]
    fn test_join_full_game_without_status_change() {
        let (x, o) = (Uuid::new_v4(), Uuid::new_v4());
        let mut odd = Game::create(x, false);
        odd.player_o = Some(o);
        assert!(matches!(
            odd.join(Uuid::new_v4()).unwrap_err().kind(),
            GameErrorKind::AlreadyFull
        ));
    }

    #[test]
    fn test_human_turns_alternate() {
        let (x, o) = (Uuid::new_v4(), Uuid::new_v4());
        let game = Game::create(x, false).join(o).unwrap();

        let game = game
            .make_move(x, board("X........"), MovePolicy::Lenient)
            .unwrap();
        assert_eq!(*game.current_turn(), o);

        let err = game
            .make_move(x, board("XX......."), MovePolicy::Lenient)
            .unwrap_err();
        assert!(matches!(err.kind(), GameErrorKind::NotYourTurn));

        let game = game
            .make_move(o, board("X...O...."), MovePolicy::Lenient)
            .unwrap();
        assert_eq!(*game.current_turn(), x);
        assert_eq!(*game.status(), GameStatus::Playing);
    }

    #[test]
    fn test_move_on_waiting_game_is_finished_error() {
        let x = Uuid::new_v4();
        let game = Game::create(x, false);
        let err = game
            .make_move(x, board("X........"), MovePolicy::Lenient)
            .unwrap_err();
        assert!(matches!(err.kind(), GameErrorKind::GameFinished));
    }

    #[test]
    fn test_rejected_move_leaves_game_unchanged() {
        let (x, o) = (Uuid::new_v4(), Uuid::new_v4());
        let game = Game::create(x, false).join(o).unwrap();
        let game = game
            .make_move(x, board("X........"), MovePolicy::Lenient)
            .unwrap();
        let before = game.clone();

        let err = game
            .make_move(o, board("O........"), MovePolicy::Lenient)
            .unwrap_err();
        assert!(matches!(err.kind(), GameErrorKind::InvalidMove(_)));
        assert_eq!(game, before);
    }

    #[test]
    fn test_bot_replies_in_center() {
        let x = Uuid::new_v4();
        let game = Game::create(x, true)
            .make_move(x, board("X........"), MovePolicy::Lenient)
            .unwrap();
        assert_eq!(game.board().to_compact(), "X...O....");
        assert_eq!(*game.status(), GameStatus::Playing);
        assert_eq!(*game.current_turn(), x);
    }

    #[test]
    fn test_winning_move_ends_game() {
        let (x, o) = (Uuid::new_v4(), Uuid::new_v4());
        let mut game = Game::create(x, false).join(o).unwrap();
        game.board = board("XX.OO....");

        let game = game
            .make_move(x, board("XXXOO...."), MovePolicy::Lenient)
            .unwrap();
        assert_eq!(*game.status(), GameStatus::WonX);

        let err = game
            .make_move(o, board("XXXOOO..."), MovePolicy::Lenient)
            .unwrap_err();
        assert!(matches!(err.kind(), GameErrorKind::GameFinished));
    }

    #[test]
    fn test_bot_wins_when_given_the_chance() {
        let x = Uuid::new_v4();
        let mut game = Game::create(x, true);
        game.board = board("XX.OO.X..");

        // X fails to block the middle row.
        let game = game
            .make_move(x, board("XX.OO.XX."), MovePolicy::Lenient)
            .unwrap();
        assert_eq!(*game.status(), GameStatus::WonO);
        assert_eq!(game.board().to_compact(), "XX.OOOXX.");
    }

    #[test]
    fn test_last_square_draw_in_bot_game() {
        let x = Uuid::new_v4();
        let mut game = Game::create(x, true);
        game.board = board("XOXXOOOX.");

        let game = game
            .make_move(x, board("XOXXOOOXX"), MovePolicy::Lenient)
            .unwrap();
        assert_eq!(*game.status(), GameStatus::Draw);
    }

    #[test]
    fn test_strict_policy_rejects_wrong_mark() {
        let (x, o) = (Uuid::new_v4(), Uuid::new_v4());
        let game = Game::create(x, false).join(o).unwrap();
        let err = game
            .make_move(x, board("O........"), MovePolicy::Strict)
            .unwrap_err();
        assert!(matches!(err.kind(), GameErrorKind::InvalidMove(_)));
        assert!(
            game.make_move(x, board("O........"), MovePolicy::Lenient)
                .is_ok()
        );
    }
}
