//! Round partitioning, per-task evaluation, and result aggregation
//!
//! A round's work is the full cartesian product of the first two plies: the
//! machine's candidate column and the opponent's forced reply. Tasks are
//! generated eagerly without legality filtering; a task whose prefix cannot
//! be played resolves to an invalid result and drops out of aggregation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Side};
use crate::search::{combine_scores, game_simulation};

/// Two forced opening plies evaluated as one unit of distributable work
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Task {
    /// The machine's candidate column
    pub first: usize,
    /// The opponent's forced reply column
    pub second: usize,
}

/// Enumerate the W×W task list for a board of the given width.
pub fn enumerate_tasks(width: usize) -> Vec<Task> {
    let mut tasks = Vec::with_capacity(width * width);
    for first in 0..width {
        for second in 0..width {
            tasks.push(Task { first, second });
        }
    }
    tasks
}

/// How a task resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Success,
    Invalid,
}

/// Result of one task, as reported back to the coordinator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaskReport {
    pub task: Task,
    pub status: TaskStatus,
    /// Score from the machine's perspective; `None` iff the forced prefix
    /// was illegal.
    pub score: Option<f64>,
}

/// Evaluate one task against a board snapshot.
///
/// The snapshot is cloned, so the caller's board is never touched. The
/// forced plies are applied in order: an illegal ply makes the task invalid,
/// a ply that completes a run settles the task with its terminal score, and
/// otherwise the bounded search runs from the resulting position.
pub fn evaluate_task(snapshot: &Board, task: Task, max_depth: usize) -> TaskReport {
    let mut board = snapshot.clone();

    for column in [task.first, task.second] {
        match board.play(column) {
            Ok(true) => {
                return TaskReport {
                    task,
                    status: TaskStatus::Success,
                    score: Some(board.terminal_score(column)),
                };
            }
            Ok(false) => {}
            Err(_) => {
                return TaskReport {
                    task,
                    status: TaskStatus::Invalid,
                    score: None,
                };
            }
        }
    }

    let (_, score) = game_simulation(&mut board, max_depth);
    TaskReport {
        task,
        status: TaskStatus::Success,
        score: Some(score),
    }
}

/// Aggregated view of one search round
#[derive(Debug, Clone, Serialize)]
pub struct RoundAnalysis {
    /// Combined score per first column; `None` where no task under the
    /// column produced a valid result.
    pub column_scores: Vec<Option<f64>>,
    /// Column with the highest defined score, ties broken low
    pub best_column: Option<usize>,
    /// Score of the chosen column, 0.0 when no column is defined
    pub best_score: f64,
}

/// Fold a complete round's task results into per-column scores and pick the
/// best first move.
///
/// The opponent owns the reply ply, so the minimizer is the chooser at this
/// layer; the combination rule is the same one interior search nodes use.
/// Results are keyed by task, which makes the fold independent of arrival
/// order.
pub fn aggregate_round(width: usize, results: &BTreeMap<Task, Option<f64>>) -> RoundAnalysis {
    let mut column_scores = Vec::with_capacity(width);
    for first in 0..width {
        let children: Vec<f64> = (0..width)
            .filter_map(|second| results.get(&Task { first, second }).copied().flatten())
            .collect();
        column_scores.push(combine_scores(Side::Human, &children));
    }

    let mut best: Option<(usize, f64)> = None;
    for (column, score) in column_scores.iter().enumerate() {
        if let Some(score) = *score {
            let improves = match best {
                None => true,
                Some((_, best_score)) => score > best_score,
            };
            if improves {
                best = Some((column, score));
            }
        }
    }

    let (best_column, best_score) = match best {
        Some((column, score)) => (Some(column), score),
        None => (None, 0.0),
    };
    RoundAnalysis {
        column_scores,
        best_column,
        best_score,
    }
}
