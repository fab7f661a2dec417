//! Worker loop: pull a task, search, report
//!
//! Workers are stateless between tasks. Every task arrives with its own
//! board snapshot, so a worker never shares board state with the
//! coordinator or with other workers.

use std::thread::{self, JoinHandle};

use crate::error::Result;
use crate::protocol::{self, CoordinatorEndpoint, ToCoordinator, ToWorker, WorkerEndpoint};
use crate::task::evaluate_task;

/// Run one worker until the coordinator sends stop.
///
/// The loop announces readiness, blocks for an assignment, evaluates it
/// against the attached snapshot, and reports the result. A disconnected
/// channel ends the loop with a protocol violation.
pub fn run(endpoint: WorkerEndpoint, max_depth: usize) -> Result<()> {
    loop {
        endpoint.send(ToCoordinator::Ready {
            worker: endpoint.id(),
        })?;

        match endpoint.recv()? {
            ToWorker::Assign { task, snapshot } => {
                let report = evaluate_task(&snapshot, task, max_depth);
                endpoint.send(ToCoordinator::Completed {
                    worker: endpoint.id(),
                    report,
                })?;
            }
            ToWorker::Stop => return Ok(()),
        }
    }
}

/// Spawn a pool of worker threads and return the coordinator's endpoint
/// together with the join handles.
pub fn spawn_pool(
    workers: usize,
    max_depth: usize,
) -> (CoordinatorEndpoint, Vec<JoinHandle<Result<()>>>) {
    let (coordinator, endpoints) = protocol::connect(workers);
    let handles = endpoints
        .into_iter()
        .map(|endpoint| thread::spawn(move || run(endpoint, max_depth)))
        .collect();
    (coordinator, handles)
}
