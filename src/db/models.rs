//! Database models for stored games.

use chrono::{NaiveDateTime, Utc};
use derive_getters::Getters;
use diesel::prelude::*;
use std::str::FromStr;
use tracing::instrument;
use uuid::Uuid;

use crate::db::{DbError, schema};
use crate::games::tictactoe::Board;
use crate::session::{Game, GameStatus};

/// Stored game row.
#[derive(Debug, Clone, Queryable, Selectable, Getters)]
#[diesel(table_name = schema::games)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GameRow {
    id: String,
    board: String,
    status: String,
    player_x: String,
    player_o: Option<String>,
    current_turn: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl GameRow {
    /// Parses the stored columns back into a [`Game`].
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if an id, the board or the status is malformed.
    #[instrument(skip(self), fields(id = %self.id, status = %self.status))]
    pub fn to_game(&self) -> Result<Game, DbError> {
        let status = GameStatus::from_str(&self.status)
            .map_err(|_| DbError::new(format!("Invalid status: '{}'", self.status)))?;
        let board: Board = serde_json::from_str(&self.board)?;
        let player_o = self
            .player_o
            .as_deref()
            .map(Uuid::parse_str)
            .transpose()?;

        Ok(Game::new(
            Uuid::parse_str(&self.id)?,
            board,
            status,
            Uuid::parse_str(&self.player_x)?,
            player_o,
            Uuid::parse_str(&self.current_turn)?,
            self.created_at.and_utc(),
        ))
    }
}

/// Insertable game row; also the changeset for upserts.
#[derive(Debug, Clone, Insertable, AsChangeset, Getters)]
#[diesel(table_name = schema::games)]
#[diesel(treat_none_as_null = true)]
pub struct NewGameRow {
    id: String,
    board: String,
    status: String,
    player_x: String,
    player_o: Option<String>,
    current_turn: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl NewGameRow {
    /// Encodes a game for storage, stamping `updated_at` with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the board cannot be encoded.
    #[instrument(skip(game), fields(game_id = %game.id()))]
    pub fn from_game(game: &Game) -> Result<Self, DbError> {
        Ok(Self {
            id: game.id().to_string(),
            board: serde_json::to_string(game.board())?,
            status: game.status().to_string(),
            player_x: game.player_x().to_string(),
            player_o: game.player_o().map(|id| id.to_string()),
            current_turn: game.current_turn().to_string(),
            created_at: game.created_at().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        })
    }
}
