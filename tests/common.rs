//! Common test utilities for the dropfour test suite.

use dropfour::board::Board;
use dropfour::coordinator::{Coordinator, GameStatus};

/// Lowest playable column on the board, used as a deterministic scripted
/// opponent.
pub fn lowest_legal_column(board: &Board) -> usize {
    (0..board.width())
        .find(|&column| board.fill(column) < board.height())
        .expect("no playable column on a board that is not full")
}

/// Play a full game between the engine and the lowest-legal-column
/// opponent, returning the terminal status and the engine's chosen columns.
#[allow(dead_code)]
pub fn drive_game(coordinator: &mut Coordinator) -> (GameStatus, Vec<Option<usize>>) {
    let mut engine_columns = Vec::new();
    let mut plies = 0;
    let ply_limit = coordinator.board().height() * coordinator.board().width() + 1;

    while !coordinator.status().is_over() {
        let engine_move = coordinator.play_engine_move().expect("engine move failed");
        engine_columns.push(engine_move.column);

        if coordinator.status().is_over() {
            break;
        }

        let column = lowest_legal_column(coordinator.board());
        coordinator
            .play_opponent_move(column)
            .expect("scripted opponent move failed");

        plies += 2;
        assert!(plies <= ply_limit, "game failed to terminate");
    }

    (coordinator.status(), engine_columns)
}
