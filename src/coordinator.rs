//! Round orchestration and game lifecycle
//!
//! The coordinator owns the authoritative board for the whole game and is
//! its only writer. Each engine turn is one round: snapshot the board,
//! enumerate the task list, evaluate it (inline or through the worker
//! pool), aggregate, apply the chosen column. Workers only ever see
//! disposable snapshots.

use std::collections::BTreeMap;
use std::thread::JoinHandle;

use serde::Serialize;

use crate::board::{Board, Side};
use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::protocol::{CoordinatorEndpoint, ToCoordinator, ToWorker};
use crate::task::{aggregate_round, enumerate_tasks, evaluate_task, RoundAnalysis, Task};
use crate::worker;

/// Where the game stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameStatus {
    InProgress,
    MachineWon,
    HumanWon,
    Draw,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        self != GameStatus::InProgress
    }
}

/// Outcome of one engine round
#[derive(Debug, Clone, Serialize)]
pub struct EngineMove {
    /// Column the engine played; `None` when no column had a defined score
    /// (only possible on a dead board, reported as a draw)
    pub column: Option<usize>,
    /// Aggregate score of the chosen column
    pub score: f64,
    /// Game status after the move was applied
    pub status: GameStatus,
    /// Per-column aggregates behind the decision
    pub analysis: RoundAnalysis,
}

struct Pool {
    endpoint: CoordinatorEndpoint,
    /// Workers parked idle at the end of the previous round, served first
    /// at the start of the next one.
    idle: Vec<usize>,
    handles: Vec<JoinHandle<Result<()>>>,
}

impl Pool {
    /// Drive one round of the pull scheduler until every task has reported.
    fn run_round(&mut self, board: &Board, tasks: &[Task]) -> Result<BTreeMap<Task, Option<f64>>> {
        let mut queue = tasks.iter().copied();
        let mut results = BTreeMap::new();

        while let Some(worker) = self.idle.pop() {
            match queue.next() {
                Some(task) => self.assign(worker, board, task)?,
                None => {
                    self.idle.push(worker);
                    break;
                }
            }
        }

        while results.len() < tasks.len() {
            match self.endpoint.recv()? {
                ToCoordinator::Ready { worker } => match queue.next() {
                    Some(task) => self.assign(worker, board, task)?,
                    None => self.idle.push(worker),
                },
                ToCoordinator::Completed { report, .. } => {
                    results.insert(report.task, report.score);
                }
            }
        }

        Ok(results)
    }

    fn assign(&self, worker: usize, board: &Board, task: Task) -> Result<()> {
        self.endpoint.send(
            worker,
            ToWorker::Assign {
                task,
                snapshot: board.clone(),
            },
        )
    }
}

/// The coordinating side of the engine: authoritative board, task
/// scheduling, aggregation, and game lifecycle.
pub struct Coordinator {
    board: Board,
    max_depth: usize,
    status: GameStatus,
    pool: Option<Pool>,
}

impl Coordinator {
    /// Build a session from a validated configuration, spawning the worker
    /// pool when one is requested.
    pub fn new(config: &SessionConfig) -> Result<Self> {
        config.validate()?;
        Self::from_position(config.build_board(), config.search_depth, config.workers)
    }

    /// Build a session over an existing position instead of an empty board,
    /// for analysis and resumed games.
    pub fn from_position(board: Board, search_depth: usize, workers: usize) -> Result<Self> {
        if search_depth == 0 {
            return Err(Error::InvalidConfiguration {
                message: "search depth must be at least 1".to_string(),
            });
        }

        let pool = if workers > 0 {
            let (endpoint, handles) = worker::spawn_pool(workers, search_depth);
            Some(Pool {
                endpoint,
                idle: Vec::new(),
                handles,
            })
        } else {
            None
        };

        Ok(Coordinator {
            board,
            max_depth: search_depth,
            status: GameStatus::InProgress,
            pool,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn worker_count(&self) -> usize {
        self.pool
            .as_ref()
            .map_or(0, |pool| pool.endpoint.worker_count())
    }

    /// Run one full round and apply the winning column to the board.
    ///
    /// # Errors
    ///
    /// Returns `GameOver` after a terminal position, `OutOfTurn` when the
    /// opponent is to move, and `ProtocolViolation` if the worker pool
    /// breaks mid-round.
    pub fn play_engine_move(&mut self) -> Result<EngineMove> {
        if self.status.is_over() {
            return Err(Error::GameOver);
        }
        if self.board.to_move() != Side::Machine {
            return Err(Error::OutOfTurn {
                expected: self.board.to_move(),
            });
        }

        let analysis = self.evaluate_round()?;
        match analysis.best_column {
            None => {
                // Every task was invalid: the board admits no move at all.
                self.status = GameStatus::Draw;
            }
            Some(column) => {
                let won = self.board.play(column)?;
                if won {
                    self.status = GameStatus::MachineWon;
                } else if self.board.is_full() {
                    self.status = GameStatus::Draw;
                }
            }
        }

        Ok(EngineMove {
            column: analysis.best_column,
            score: analysis.best_score,
            status: self.status,
            analysis,
        })
    }

    /// Apply the externally supplied opponent move.
    ///
    /// # Errors
    ///
    /// Invalid columns surface as recoverable invalid-move errors so the
    /// caller can re-prompt; the board is untouched in that case.
    pub fn play_opponent_move(&mut self, column: usize) -> Result<GameStatus> {
        if self.status.is_over() {
            return Err(Error::GameOver);
        }
        if self.board.to_move() != Side::Human {
            return Err(Error::OutOfTurn {
                expected: self.board.to_move(),
            });
        }

        let won = self.board.play(column)?;
        if won {
            self.status = GameStatus::HumanWon;
        } else if self.board.is_full() {
            self.status = GameStatus::Draw;
        }
        Ok(self.status)
    }

    fn evaluate_round(&mut self) -> Result<RoundAnalysis> {
        let tasks = enumerate_tasks(self.board.width());
        let results = match &mut self.pool {
            None => {
                // Zero-worker fallback: the same partition, evaluated
                // inline with the same task function the workers run.
                let mut results = BTreeMap::new();
                for task in &tasks {
                    let report = evaluate_task(&self.board, *task, self.max_depth);
                    results.insert(report.task, report.score);
                }
                results
            }
            Some(pool) => pool.run_round(&self.board, &tasks)?,
        };
        Ok(aggregate_round(self.board.width(), &results))
    }

    /// Broadcast stop to the pool and wait for every worker to exit.
    pub fn shutdown(self) -> Result<()> {
        if let Some(pool) = self.pool {
            pool.endpoint.broadcast_stop();
            for handle in pool.handles {
                handle
                    .join()
                    .map_err(|_| Error::ProtocolViolation {
                        context: "worker thread panicked".to_string(),
                    })??;
            }
        }
        Ok(())
    }
}
