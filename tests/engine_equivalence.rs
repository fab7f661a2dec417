//! Sequential/distributed equivalence: the zero-worker fallback and the
//! worker pool must reach identical decisions for the same position.

mod common;

use std::collections::BTreeMap;

use dropfour::board::{Board, Side};
use dropfour::config::SessionConfig;
use dropfour::coordinator::Coordinator;
use dropfour::task::{aggregate_round, enumerate_tasks, evaluate_task};

use common::drive_game;

const TOLERANCE: f64 = 1e-9;

fn engine_decision(board: Board, depth: usize, workers: usize) -> (Option<usize>, f64) {
    let mut coordinator = Coordinator::from_position(board, depth, workers).unwrap();
    let engine_move = coordinator.play_engine_move().unwrap();
    let decision = (engine_move.column, engine_move.score);
    coordinator.shutdown().unwrap();
    decision
}

#[test]
fn test_empty_board_depth_4_equivalence() {
    let board = Board::new(6, 7, 4, Side::Machine);
    let (baseline_column, baseline_score) = engine_decision(board.clone(), 4, 0);
    assert!(baseline_column.is_some());

    for workers in [1, 2, 4] {
        let (column, score) = engine_decision(board.clone(), 4, workers);
        assert_eq!(column, baseline_column, "column diverged at {workers} workers");
        assert!(
            (score - baseline_score).abs() < TOLERANCE,
            "score diverged at {workers} workers: {score} vs {baseline_score}"
        );
    }
}

#[test]
fn test_midgame_position_equivalence() {
    let diagram = "\
        .......\n\
        .......\n\
        ...H...\n\
        ...M...\n\
        ..HMH..\n\
        .HMMH..";
    let board = Board::from_rows(diagram, 4, Side::Machine).unwrap();

    let (baseline_column, baseline_score) = engine_decision(board.clone(), 3, 0);
    let (column, score) = engine_decision(board, 3, 3);

    assert_eq!(column, baseline_column);
    assert!((score - baseline_score).abs() < TOLERANCE);
}

#[test]
fn test_more_workers_than_tasks() {
    // Nine tasks, one full column; the surplus workers sit idle for the
    // whole round without disturbing the result.
    let diagram = "\
        M..\n\
        H..\n\
        M..";
    let board = Board::from_rows(diagram, 3, Side::Machine).unwrap();

    let (baseline_column, baseline_score) = engine_decision(board.clone(), 2, 0);
    let (column, score) = engine_decision(board, 2, 16);

    assert_eq!(column, baseline_column);
    assert!((score - baseline_score).abs() < TOLERANCE);
}

#[test]
fn test_full_game_stays_in_lockstep() {
    let config = SessionConfig {
        search_depth: 3,
        workers: 0,
        ..SessionConfig::default()
    };
    let mut sequential = Coordinator::new(&config).unwrap();
    let mut distributed = Coordinator::new(&SessionConfig { workers: 2, ..config }).unwrap();

    let (sequential_status, sequential_columns) = drive_game(&mut sequential);
    let (distributed_status, distributed_columns) = drive_game(&mut distributed);

    assert_eq!(sequential_columns, distributed_columns);
    assert_eq!(sequential_status, distributed_status);
    distributed.shutdown().unwrap();
}

#[test]
fn test_aggregation_is_arrival_order_independent() {
    let board = Board::new(6, 7, 4, Side::Machine);
    let tasks = enumerate_tasks(board.width());

    let mut forward = BTreeMap::new();
    for &task in &tasks {
        let report = evaluate_task(&board, task, 3);
        forward.insert(report.task, report.score);
    }
    let mut backward = BTreeMap::new();
    for &task in tasks.iter().rev() {
        let report = evaluate_task(&board, task, 3);
        backward.insert(report.task, report.score);
    }

    let first = aggregate_round(board.width(), &forward);
    let second = aggregate_round(board.width(), &backward);
    assert_eq!(first.column_scores, second.column_scores);
    assert_eq!(first.best_column, second.best_column);
}
