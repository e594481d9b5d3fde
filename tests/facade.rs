//! End-to-end scenarios driven entirely through the `GameWrapper` facade.

use boardkit::games::connect4::Connect4Move;
use boardkit::games::gomoku::GomokuMove;
use boardkit::games::lgame::LGameState;
use boardkit::games::trio::{TrioMove, TrioState};
use boardkit::{Difficulty, GameWrapper, MoveWrapper, Player};

fn drop_columns(game: &mut GameWrapper, columns: &[usize]) {
    for &col in columns {
        game.make_move(&MoveWrapper::Connect4(Connect4Move(col)))
            .expect("scripted move is legal");
    }
}

#[test]
fn connect4_midgame_sequence_is_not_over() {
    let mut game = GameWrapper::new_connect4();
    drop_columns(&mut game, &[3, 3, 2, 4, 2, 4, 1]);
    // Player One holds (5,3), (5,2), (4,2) and (5,1): no four anywhere.
    assert!(!game.is_game_over());
    assert!(game.winner().is_none());
    assert_eq!(game.move_count(), 7);
    assert_eq!(game.current_player(), Player::Two);
}

#[test]
fn connect4_bottom_row_win_through_the_facade() {
    let mut game = GameWrapper::new_connect4();
    drop_columns(&mut game, &[3, 0, 4, 0, 5, 0]);
    let report = game
        .make_move(&MoveWrapper::Connect4(Connect4Move(6)))
        .unwrap();
    assert!(report.is_game_over);
    assert_eq!(report.winner, Some(Player::One));
    assert!(game.legal_moves().is_empty());
    // Further play is rejected.
    assert!(game
        .make_move(&MoveWrapper::Connect4(Connect4Move(0)))
        .is_err());
}

#[test]
fn connect4_undo_reopens_a_finished_game() {
    let mut game = GameWrapper::new_connect4();
    drop_columns(&mut game, &[3, 0, 4, 0, 5, 0, 6]);
    assert!(game.is_game_over());
    assert!(game.undo_move());
    assert!(!game.is_game_over());
    assert_eq!(game.move_count(), 6);
    assert_eq!(game.current_player(), Player::One);
}

#[test]
fn gomoku_diagonal_win_through_the_facade() {
    let mut game = GameWrapper::new_gomoku();
    for i in 0..4 {
        game.make_move(&MoveWrapper::Gomoku(GomokuMove(5 + i, 5 + i)))
            .unwrap();
        game.make_move(&MoveWrapper::Gomoku(GomokuMove(0, i)))
            .unwrap();
    }
    let report = game
        .make_move(&MoveWrapper::Gomoku(GomokuMove(9, 9)))
        .unwrap();
    assert!(report.is_game_over);
    assert_eq!(report.winner, Some(Player::One));
}

#[test]
fn gomoku_block_hint_matches_the_open_threat() {
    let mut game = GameWrapper::new_gomoku();
    // Player One builds four in a row on row 7 while Player Two scatters
    // stones that never line up three.
    for (i, reply) in [(0, (0, 0)), (1, (0, 2)), (2, (2, 0)), (3, (2, 3))] {
        game.make_move(&MoveWrapper::Gomoku(GomokuMove(7, 4 + i)))
            .unwrap();
        game.make_move(&MoveWrapper::Gomoku(GomokuMove(reply.0, reply.1)))
            .unwrap();
    }
    // Player One to move again would win; ask from Player Two's seat.
    let blocks = game.blocking_moves();
    assert!(blocks.is_empty(), "it is Player One's turn, nothing to block");
    game.make_move(&MoveWrapper::Gomoku(GomokuMove(12, 12)))
        .unwrap();
    let blocks = game.blocking_moves();
    assert!(blocks.contains(&MoveWrapper::Gomoku(GomokuMove(7, 3))));
    assert!(blocks.contains(&MoveWrapper::Gomoku(GomokuMove(7, 8))));
}

#[test]
fn lgame_blockade_is_reported_as_a_loss() {
    let state = LGameState::from_position(
        [(0, 0), (1, 0), (2, 0), (2, 1)],
        [(0, 1), (1, 1), (1, 2), (1, 3)],
        [(3, 1), (2, 2)],
        Player::One,
    )
    .unwrap();
    let game = GameWrapper::LGame(state);
    assert!(game.is_game_over());
    assert_eq!(game.winner(), Some(Player::Two));
    assert!(game.legal_moves().is_empty());
    assert!(game.ai_move(Difficulty::Easy, 0).is_none());
}

#[test]
fn trio_claims_resolve_through_the_facade() {
    let mut grid = [[9u8; 7]; 7];
    for col in 0..7 {
        grid[0][col] = col as u8 + 1;
    }
    let mut game = GameWrapper::Trio(TrioState::from_grid(grid, 10).unwrap());

    // A wrong claim is rejected and the game continues.
    let err = game.make_move(&MoveWrapper::Trio(TrioMove {
        cells: [(0, 0), (0, 1), (0, 2)],
    }));
    assert!(err.is_err());
    assert!(!game.is_game_over());

    // The engine's suggested claim wins for the side to move.
    let mv = game.ai_move(Difficulty::Medium, 0).expect("a solution exists");
    let report = game.make_move(&mv).unwrap();
    assert!(report.is_game_over);
    assert_eq!(report.winner, Some(Player::One));
}

#[test]
fn ai_move_is_deterministic_at_every_difficulty() {
    let mut game = GameWrapper::new_connect4();
    drop_columns(&mut game, &[3, 3, 2, 4]);
    for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
        let first = game.ai_move(difficulty, 17);
        let second = game.ai_move(difficulty, 17);
        assert_eq!(first, second);
        assert!(first.is_some());
    }
}

#[test]
fn ai_takes_the_win_in_every_line_game() {
    // Connect 4: three in column 2, Player One to move.
    let mut connect4 = GameWrapper::new_connect4();
    drop_columns(&mut connect4, &[2, 0, 2, 1, 2, 0]);
    assert_eq!(
        connect4.ai_move(Difficulty::Easy, 0),
        Some(MoveWrapper::Connect4(Connect4Move(2)))
    );

    // Gomoku: four in row 7, Player One to move.
    let mut gomoku = GameWrapper::new_gomoku();
    for i in 0..4 {
        gomoku
            .make_move(&MoveWrapper::Gomoku(GomokuMove(7, 4 + i)))
            .unwrap();
        gomoku
            .make_move(&MoveWrapper::Gomoku(GomokuMove(0, i)))
            .unwrap();
    }
    let mv = gomoku.ai_move(Difficulty::Easy, 0).unwrap();
    assert!(
        mv == MoveWrapper::Gomoku(GomokuMove(7, 3)) || mv == MoveWrapper::Gomoku(GomokuMove(7, 8))
    );
}

#[test]
fn memory_usage_tracks_board_size() {
    let connect4 = GameWrapper::new_connect4();
    let gomoku = GameWrapper::new_gomoku();
    assert!(connect4.memory_usage() > 0);
    assert!(gomoku.memory_usage() > connect4.memory_usage());
}
