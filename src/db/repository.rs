//! SQLite implementation of the game store.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use strum::IntoEnumIterator;
use tracing::{debug, info, instrument};

use crate::db::{DbError, GameRow, NewGameRow, schema::games};
use crate::session::{Game, GameError, GameErrorKind, GameId, GameStatus, PlayerId};
use crate::store::GameStore;

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// How long a connection waits for another writer before failing, in
/// milliseconds.
pub const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Game store backed by a SQLite database file.
///
/// Several stores, in one process or many, may share a file: every
/// connection waits up to [`BUSY_TIMEOUT_MS`] for a competing writer, and
/// [`GameStore::update_game`] runs inside an immediate transaction.
#[derive(Debug, Clone)]
pub struct SqliteGameStore {
    db_path: String,
}

impl SqliteGameStore {
    /// Opens the database at `db_path`, creating it and applying pending
    /// migrations as needed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the database cannot be opened or migrated.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn open(db_path: String) -> Result<Self, DbError> {
        info!(path = %db_path, "Opening game database");
        let store = Self { db_path };

        let mut conn = store.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Migration failed: {}", e)))?;
        info!(applied = applied.len(), "Migrations applied");

        Ok(store)
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path).map_err(|e| {
            DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e))
        })?;
        diesel::sql_query(format!("PRAGMA busy_timeout = {}", BUSY_TIMEOUT_MS))
            .execute(&mut conn)?;
        Ok(conn)
    }

    fn find(conn: &mut SqliteConnection, id: GameId) -> Result<Option<Game>, DbError> {
        let row = games::table
            .find(id.to_string())
            .select(GameRow::as_select())
            .first(conn)
            .optional()?;

        debug!(found = row.is_some(), "Loaded game row");
        row.map(|r| r.to_game()).transpose()
    }

    fn upsert(conn: &mut SqliteConnection, game: &Game) -> Result<(), DbError> {
        let row = NewGameRow::from_game(game)?;

        diesel::insert_into(games::table)
            .values(&row)
            .on_conflict(games::id)
            .do_update()
            .set(&row)
            .execute(conn)?;

        info!(game_id = %game.id(), status = %game.status(), "Game saved");
        Ok(())
    }

    fn terminal_statuses() -> Vec<String> {
        GameStatus::iter()
            .filter(|s| s.is_terminal())
            .map(|s| s.to_string())
            .collect()
    }

    fn to_games(rows: Vec<GameRow>) -> Result<Vec<Game>, DbError> {
        rows.iter().map(GameRow::to_game).collect()
    }
}

impl GameStore for SqliteGameStore {
    #[instrument(skip(self))]
    fn load_game(&self, id: GameId) -> Result<Option<Game>, DbError> {
        let mut conn = self.connection()?;
        Self::find(&mut conn, id)
    }

    #[instrument(skip(self, game), fields(game_id = %game.id(), status = %game.status()))]
    fn save_game(&self, game: &Game) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        Self::upsert(&mut conn, game)
    }

    #[instrument(skip(self))]
    fn list_waiting_games(&self) -> Result<Vec<Game>, DbError> {
        let mut conn = self.connection()?;

        let rows = games::table
            .filter(games::status.eq(GameStatus::Waiting.to_string()))
            .filter(games::player_o.is_null())
            .order(games::created_at.asc())
            .select(GameRow::as_select())
            .load(&mut conn)?;

        info!(count = rows.len(), "Waiting games loaded");
        Self::to_games(rows)
    }

    #[instrument(skip(self))]
    fn list_completed_games(&self, player: PlayerId) -> Result<Vec<Game>, DbError> {
        let mut conn = self.connection()?;
        let player = player.to_string();

        let rows = games::table
            .filter(games::status.eq_any(Self::terminal_statuses()))
            .filter(
                games::player_x
                    .eq(player.clone())
                    .or(games::player_o.eq(player)),
            )
            .order(games::created_at.desc())
            .select(GameRow::as_select())
            .load(&mut conn)?;

        info!(count = rows.len(), "Completed games loaded");
        Self::to_games(rows)
    }

    #[instrument(skip(self, step))]
    fn update_game<F>(&self, id: GameId, step: F) -> Result<Game, GameError>
    where
        F: FnOnce(&Game) -> Result<Game, GameError>,
    {
        let mut conn = self.connection()?;

        conn.immediate_transaction(|conn| {
            debug!("Write lock acquired");
            let current = Self::find(conn, id)?
                .ok_or_else(|| GameError::from(GameErrorKind::NotFound(id)))?;
            let next = step(&current)?;
            Self::upsert(conn, &next)?;
            Ok(next)
        })
    }

    #[instrument(skip(self))]
    fn list_finished_games(&self) -> Result<Vec<Game>, DbError> {
        let mut conn = self.connection()?;

        let rows = games::table
            .filter(games::status.eq_any(Self::terminal_statuses()))
            .select(GameRow::as_select())
            .load(&mut conn)?;

        debug!(count = rows.len(), "Finished games loaded");
        Self::to_games(rows)
    }
}
