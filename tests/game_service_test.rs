//! Tests for game transitions through the service.

use std::sync::Barrier;
use std::thread;

use tictactoe_engine::{
    Board, GameErrorKind, GameService, GameStatus, Mark, MemoryStore, MoveRejection, MovePolicy,
};
use uuid::Uuid;

fn board(s: &str) -> Board {
    s.parse().expect("valid board")
}

fn service() -> GameService<MemoryStore> {
    GameService::new(MemoryStore::new(), MovePolicy::Lenient)
}

#[test]
fn test_create_and_join() {
    let service = service();
    let (x, o) = (Uuid::new_v4(), Uuid::new_v4());

    let game = service.create_game(x, false).expect("Create failed");
    assert_eq!(service.available_games().expect("List failed").len(), 1);

    let joined = service.join_game(*game.id(), o).expect("Join failed");
    assert_eq!(*joined.status(), GameStatus::Playing);
    assert_eq!(*joined.player_o(), Some(o));
    assert_eq!(*joined.current_turn(), x);
    assert!(service.available_games().expect("List failed").is_empty());
    assert_eq!(service.current_game(*game.id()).expect("Load failed"), joined);
}

#[test]
fn test_join_errors() {
    let service = service();
    let (x, o, late) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    let id = *service.create_game(x, false).expect("Create failed").id();

    let err = service.join_game(id, x).expect_err("Own game");
    assert!(matches!(err.kind(), GameErrorKind::CannotJoinOwnGame));

    service.join_game(id, o).expect("Join failed");
    let err = service.join_game(id, late).expect_err("Game started");
    assert!(matches!(err.kind(), GameErrorKind::NotWaiting));

    let bot = *service.create_game(x, true).expect("Create failed").id();
    let err = service.join_game(bot, o).expect_err("Bot game");
    assert!(matches!(err.kind(), GameErrorKind::NotWaiting));
}

#[test]
fn test_unknown_game_not_found() {
    let service = service();
    let id = Uuid::new_v4();

    let err = service.current_game(id).expect_err("Unknown id");
    assert!(matches!(err.kind(), GameErrorKind::NotFound(missing) if *missing == id));

    let err = service
        .make_move(id, Uuid::new_v4(), board("X........"))
        .expect_err("Unknown id");
    assert!(matches!(err.kind(), GameErrorKind::NotFound(_)));

    let err = service.join_game(id, Uuid::new_v4()).expect_err("Unknown id");
    assert!(matches!(err.kind(), GameErrorKind::NotFound(_)));
}

#[test]
fn test_rejected_moves_leave_stored_game_unchanged() {
    let service = service();
    let (x, o) = (Uuid::new_v4(), Uuid::new_v4());
    let id = *service.create_game(x, false).expect("Create failed").id();

    let err = service
        .make_move(id, x, board("X........"))
        .expect_err("Waiting game");
    assert!(matches!(err.kind(), GameErrorKind::GameFinished));

    let before = service.join_game(id, o).expect("Join failed");

    let err = service
        .make_move(id, o, board("....O...."))
        .expect_err("Out of turn");
    assert!(matches!(err.kind(), GameErrorKind::NotYourTurn));

    service.make_move(id, x, board("X........")).expect("Move failed");
    let err = service
        .make_move(id, o, board("O........"))
        .expect_err("Overwrite");
    assert!(matches!(
        err.kind(),
        GameErrorKind::InvalidMove(MoveRejection::Overwrite(_))
    ));

    let stored = service.current_game(id).expect("Load failed");
    assert_eq!(stored.board().to_compact(), "X........");
    assert_eq!(*stored.current_turn(), o);
    assert_eq!(stored.player_o(), before.player_o());
}

#[test]
fn test_two_player_win_then_finished() {
    let service = service();
    let (x, o) = (Uuid::new_v4(), Uuid::new_v4());
    let id = *service.create_game(x, false).expect("Create failed").id();
    service.join_game(id, o).expect("Join failed");

    for (player, step) in [
        (x, "X........"),
        (o, "X..O....."),
        (x, "XX.O....."),
        (o, "XX.OO...."),
    ] {
        let game = service.make_move(id, player, board(step)).expect("Move failed");
        assert_eq!(*game.status(), GameStatus::Playing);
    }
    let game = service
        .make_move(id, x, board("XXXOO...."))
        .expect("Move failed");
    assert_eq!(*game.status(), GameStatus::WonX);

    let err = service
        .make_move(id, o, board("XXXOOO..."))
        .expect_err("Game over");
    assert!(matches!(err.kind(), GameErrorKind::GameFinished));
    assert_eq!(service.current_game(id).expect("Load failed"), game);

    assert_eq!(service.completed_games(x).expect("List failed").len(), 1);
    assert_eq!(service.completed_games(o).expect("List failed").len(), 1);
}

#[test]
fn test_bot_game_replies_and_draws() {
    let service = service();
    let x = Uuid::new_v4();
    let id = *service.create_game(x, true).expect("Create failed").id();

    let game = service.make_move(id, x, board("X........")).expect("Move failed");
    assert_eq!(game.board().to_compact(), "X...O....");
    assert_eq!(*game.current_turn(), x);

    // X keeps taking the first empty square; the bot never loses.
    let mut game = game;
    while *game.status() == GameStatus::Playing {
        let square = game.board().empty_cells().next().expect("open square");
        let proposed = game.board().with_mark(square, Mark::X);
        game = service.make_move(id, x, proposed).expect("Move failed");
    }
    assert_ne!(*game.status(), GameStatus::WonX);
}

#[test]
fn test_strict_policy_rejects_two_marks() {
    let service = GameService::new(MemoryStore::new(), MovePolicy::Strict);
    let (x, o) = (Uuid::new_v4(), Uuid::new_v4());
    let id = *service.create_game(x, false).expect("Create failed").id();
    service.join_game(id, o).expect("Join failed");

    let err = service
        .make_move(id, x, board("XX......."))
        .expect_err("Two marks");
    assert!(matches!(
        err.kind(),
        GameErrorKind::InvalidMove(MoveRejection::ChangedCount(2))
    ));
}

#[test]
fn test_concurrent_moves_only_one_applies() {
    let service = service();
    let (x, o) = (Uuid::new_v4(), Uuid::new_v4());
    let id = *service.create_game(x, false).expect("Create failed").id();
    service.join_game(id, o).expect("Join failed");

    let barrier = Barrier::new(2);
    let results: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = ["X........", "....X...."]
            .into_iter()
            .map(|step| {
                let service = &service;
                let barrier = &barrier;
                s.spawn(move || {
                    barrier.wait();
                    service.make_move(id, x, board(step))
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("thread panicked"))
            .collect()
    });

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    let err = results
        .into_iter()
        .find_map(Result::err)
        .expect("one move rejected");
    assert!(matches!(err.kind(), GameErrorKind::NotYourTurn));

    let stored = service.current_game(id).expect("Load failed");
    assert_eq!(stored.board().count(Mark::X), 1);
    assert_eq!(*stored.current_turn(), o);
}

#[test]
fn test_leaderboard_through_service() {
    let service = service();
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    let id = *service.create_game(a, false).expect("Create failed").id();
    service.join_game(id, b).expect("Join failed");
    for (player, step) in [
        (a, "X........"),
        (b, "X..O....."),
        (a, "XX.O....."),
        (b, "XX.OO...."),
        (a, "XXXOO...."),
    ] {
        service.make_move(id, player, board(step)).expect("Move failed");
    }

    let ranked = service.leaderboard(1).expect("Leaderboard failed");
    assert_eq!(ranked.len(), 1);
    assert_eq!(*ranked[0].player(), a);
}
