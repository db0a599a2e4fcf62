//! Tic-tac-toe engine - command-line front end.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::{Cli, Command, MoveTarget};
use tictactoe_engine::{
    Board, Coord, EngineConfig, Game, GameService, GameStatus, Mark, SqliteGameStore, Square,
    best_move_for, evaluate,
};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = EngineConfig::load(&cli.config)?;
    if let Some(url) = &cli.database_url {
        config.set_database_url(url.clone());
    }

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .init();

    match cli.command {
        Command::NewPlayer => {
            println!("{}", Uuid::new_v4());
            Ok(())
        }
        Command::Selfplay => run_selfplay(),
        command => run_game_command(&config, command),
    }
}

/// Runs a command against the configured database.
#[instrument(skip(config), fields(database_url = %config.database_url()))]
fn run_game_command(config: &EngineConfig, command: Command) -> Result<()> {
    let store = SqliteGameStore::open(config.database_url().clone())?;
    let service = GameService::new(store, config.move_policy());

    match command {
        Command::New { player, bot } => {
            let game = service.create_game(player, bot)?;
            print_game(&game);
        }
        Command::Join { game, player } => {
            let game = service.join_game(game, player)?;
            print_game(&game);
        }
        Command::Move {
            game,
            player,
            target,
        } => {
            let current = service.current_game(game)?;
            let proposed = proposed_board(&current, player, &target)?;
            let game = service.make_move(game, player, proposed)?;
            print_game(&game);
        }
        Command::Show { game } => print_game(&service.current_game(game)?),
        Command::Waiting => {
            let games = service.available_games()?;
            if games.is_empty() {
                println!("No games waiting.");
            }
            for game in games {
                println!("{}  created by {}  at {}", game.id(), game.player_x(), game.created_at());
            }
        }
        Command::History { player } => {
            for game in service.completed_games(player)? {
                println!("{}  {}  {}", game.id(), game.status(), game.board().to_compact());
            }
        }
        Command::Leaderboard { count } => {
            for (rank, entry) in service.leaderboard(count)?.iter().enumerate() {
                println!(
                    "{:>3}. {}  {:>6.2}%  ({} won / {} played)",
                    rank + 1,
                    entry.player(),
                    entry.win_rate(),
                    entry.wins(),
                    entry.games()
                );
            }
        }
        other => bail!("{:?} does not use the database", other),
    }

    Ok(())
}

/// Builds the board to submit from either a square or a full board.
fn proposed_board(current: &Game, player: Uuid, target: &MoveTarget) -> Result<Board> {
    if let Some(board) = &target.board {
        return board.parse().context("Invalid --board");
    }

    let (Some(row), Some(col)) = (target.row, target.col) else {
        bail!("Give either --board or both --row and --col");
    };
    let at = Coord::new(row, col).context("Row and column must be 0, 1 or 2")?;
    let mark = current
        .symbol_of(player)
        .context("Player is not part of this game")?;

    Ok(current.board().with_mark(at, mark))
}

/// Plays the bot against itself from the empty board.
#[instrument]
fn run_selfplay() -> Result<()> {
    let mut board = Board::new();
    let mut to_move = Mark::X;

    while !evaluate(&board).is_terminal() {
        let Some(at) = best_move_for(&board, to_move) else {
            break;
        };
        board.set(at, Square::Occupied(to_move));
        println!("{} plays {}\n{}\n", to_move, at, board.display());
        to_move = to_move.opponent();
    }

    let outcome = evaluate(&board);
    info!(%outcome, "Self-play finished");
    println!("Result: {}", outcome);
    Ok(())
}

fn print_game(game: &Game) {
    println!("Game    {}", game.id());
    println!("Status  {}", game.status());
    println!("X       {}", game.player_x());
    match game.player_o() {
        Some(player_o) => println!("O       {}", player_o),
        None if game.is_bot_game() => println!("O       bot"),
        None => println!("O       (open)"),
    }
    if *game.status() == GameStatus::Playing {
        println!("Turn    {}", game.current_turn());
    }
    println!("\n{}", game.board().display());
}
