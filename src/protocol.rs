//! Message contract and channel plumbing between the coordinator and its
//! workers
//!
//! Workers share one inbox on the coordinator side (any worker's message is
//! received by the same blocking `recv`), while each worker has a private
//! channel for the tasks addressed to it. Both directions block, mirroring
//! point-to-point blocking sends and receives. A disconnected channel means
//! the peer vanished outside the stop handshake, which is fatal to the
//! process that observes it.

use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::{Error, Result};
use crate::task::{Task, TaskReport};

/// Messages flowing from a worker to the coordinator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ToCoordinator {
    /// The worker is idle and asks for work.
    Ready { worker: usize },
    /// The worker finished a task.
    Completed { worker: usize, report: TaskReport },
}

/// Messages flowing from the coordinator to one worker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ToWorker {
    /// Evaluate one task against the provided board snapshot.
    Assign { task: Task, snapshot: Board },
    /// End the worker loop; the final message a worker ever receives.
    Stop,
}

/// Worker-side endpoint of the transport
pub struct WorkerEndpoint {
    id: usize,
    inbox: Receiver<ToWorker>,
    outbox: Sender<ToCoordinator>,
}

impl WorkerEndpoint {
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn send(&self, message: ToCoordinator) -> Result<()> {
        self.outbox.send(message).map_err(|_| Error::ProtocolViolation {
            context: format!("worker {}: coordinator inbox disconnected", self.id),
        })
    }

    /// Block until the coordinator sends the next task or stop.
    pub fn recv(&self) -> Result<ToWorker> {
        self.inbox.recv().map_err(|_| Error::ProtocolViolation {
            context: format!("worker {}: task channel closed before stop", self.id),
        })
    }
}

/// Coordinator-side endpoint: the shared inbox plus one link per worker
pub struct CoordinatorEndpoint {
    inbox: Receiver<ToCoordinator>,
    links: Vec<Sender<ToWorker>>,
}

impl CoordinatorEndpoint {
    pub fn worker_count(&self) -> usize {
        self.links.len()
    }

    /// Block until any worker's next message arrives.
    pub fn recv(&self) -> Result<ToCoordinator> {
        self.inbox.recv().map_err(|_| Error::ProtocolViolation {
            context: "all worker channels disconnected".to_string(),
        })
    }

    pub fn send(&self, worker: usize, message: ToWorker) -> Result<()> {
        let link = self.links.get(worker).ok_or_else(|| Error::ProtocolViolation {
            context: format!("no such worker: {worker}"),
        })?;
        link.send(message).map_err(|_| Error::ProtocolViolation {
            context: format!("worker {worker} hung up its task channel"),
        })
    }

    /// Send stop to every worker. Best effort: a worker that already died
    /// cannot be stopped twice.
    pub fn broadcast_stop(&self) {
        for link in &self.links {
            let _ = link.send(ToWorker::Stop);
        }
    }
}

/// Build the channel topology for one coordinator and `workers` workers.
pub fn connect(workers: usize) -> (CoordinatorEndpoint, Vec<WorkerEndpoint>) {
    let (to_coordinator, inbox) = unbounded();

    let mut links = Vec::with_capacity(workers);
    let mut endpoints = Vec::with_capacity(workers);
    for id in 0..workers {
        let (to_worker, worker_inbox) = unbounded();
        links.push(to_worker);
        endpoints.push(WorkerEndpoint {
            id,
            inbox: worker_inbox,
            outbox: to_coordinator.clone(),
        });
    }

    (CoordinatorEndpoint { inbox, links }, endpoints)
}
