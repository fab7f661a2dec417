//! dropfour: a distributed connect-four search engine
//!
//! This crate provides:
//! - Gravity-drop board rules with in-place move application and undo
//! - A depth-limited search whose interior nodes blend forced-outcome
//!   short-circuiting with expectimax-style averaging
//! - A coordinator/worker protocol that distributes two-ply task prefixes
//!   over blocking channels with pull-based scheduling
//!
//! The coordinator owns the only authoritative board; workers evaluate
//! disposable snapshots and report scores. Running with zero workers
//! evaluates the identical task partition on the coordinator thread and
//! reaches the same decisions as the distributed path.
//!
//! # Quick Start
//!
//! ```
//! use dropfour::config::SessionConfig;
//! use dropfour::coordinator::Coordinator;
//!
//! let config = SessionConfig {
//!     search_depth: 3,
//!     workers: 0,
//!     ..SessionConfig::default()
//! };
//! let mut coordinator = Coordinator::new(&config).unwrap();
//!
//! let opening = coordinator.play_engine_move().unwrap();
//! assert!(opening.column.is_some());
//! ```

pub mod board;
pub mod cli;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod protocol;
pub mod search;
pub mod task;
pub mod worker;

pub use board::{Board, Cell, Side};
pub use config::SessionConfig;
pub use coordinator::{Coordinator, EngineMove, GameStatus};
pub use error::{Error, Result};
pub use task::{RoundAnalysis, Task, TaskReport, TaskStatus};
