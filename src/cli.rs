//! Command-line interface for the tic-tac-toe engine.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use uuid::Uuid;

/// Tic-tac-toe engine - play against a friend or the minimax bot
#[derive(Parser, Debug)]
#[command(name = "tictactoe")]
#[command(about = "Tic-tac-toe game engine with a minimax bot", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "tictactoe.toml", global = true)]
    pub config: PathBuf,

    /// Database file, overriding configuration and environment
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Where a move goes: a single square or a whole proposed board.
#[derive(Args, Debug)]
#[group(required = true, multiple = true)]
pub struct MoveTarget {
    /// Row of the square to mark (0-2)
    #[arg(long, requires = "col", conflicts_with = "board")]
    pub row: Option<usize>,

    /// Column of the square to mark (0-2)
    #[arg(long, requires = "row", conflicts_with = "board")]
    pub col: Option<usize>,

    /// Full proposed board in row-major notation, e.g. `X...O....`
    #[arg(long)]
    pub board: Option<String>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print a fresh player id
    NewPlayer,

    /// Create a game as player X
    New {
        /// Creating player's id
        #[arg(long)]
        player: Uuid,

        /// Play against the bot instead of waiting for a second player
        #[arg(long)]
        bot: bool,
    },

    /// Join a waiting game as player O
    Join {
        /// Game id
        #[arg(long)]
        game: Uuid,

        /// Joining player's id
        #[arg(long)]
        player: Uuid,
    },

    /// Make a move
    Move {
        /// Game id
        #[arg(long)]
        game: Uuid,

        /// Moving player's id
        #[arg(long)]
        player: Uuid,

        /// Square or board to submit
        #[command(flatten)]
        target: MoveTarget,
    },

    /// Show a game
    Show {
        /// Game id
        #[arg(long)]
        game: Uuid,
    },

    /// List games waiting for a second player
    Waiting,

    /// List finished games of a player
    History {
        /// Player id
        #[arg(long)]
        player: Uuid,
    },

    /// Show the top players by win rate
    Leaderboard {
        /// Number of players to show
        #[arg(short = 'n', long, default_value = "10")]
        count: usize,
    },

    /// Let the bot play both sides and print every position
    Selfplay,
}
