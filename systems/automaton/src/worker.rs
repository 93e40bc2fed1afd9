//! Background thread that computes generations off the interactive path.

use std::{
    io,
    sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError},
    thread::{self, JoinHandle},
    time::Duration,
};

use sim_garden_core::{Epoch, GridSnapshot, Revision, Rule};
use thiserror::Error;

use crate::stepper::step;

/// Work item sent to the generation worker.
#[derive(Clone, Debug)]
pub struct GenerationRequest {
    /// Epoch the request was dispatched under.
    pub epoch: Epoch,
    /// Edit revision of the snapshot.
    pub revision: Revision,
    /// Rule to evaluate.
    pub rule: Rule,
    /// Generation to step from.
    pub grid: GridSnapshot,
}

/// Generation computed by the worker, echoing the request's tokens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationResult {
    /// Epoch copied from the request.
    pub epoch: Epoch,
    /// Revision copied from the request.
    pub revision: Revision,
    /// Next generation in row-major order.
    pub cells: Vec<u8>,
}

/// Failures of the generation worker.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// The operating system refused to start the thread.
    #[error("failed to spawn the generation worker")]
    Spawn(#[source] io::Error),
    /// The worker thread is gone.
    #[error("the generation worker disconnected")]
    Disconnected,
}

/// Owns a thread that steps grids received over a channel.
///
/// Dropping the worker closes the request channel and joins the thread.
#[derive(Debug)]
pub struct GenerationWorker {
    requests: Option<Sender<GenerationRequest>>,
    results: Receiver<GenerationResult>,
    handle: Option<JoinHandle<()>>,
}

impl GenerationWorker {
    /// Starts the worker thread.
    pub fn spawn() -> Result<Self, WorkerError> {
        let (request_sender, request_receiver) = mpsc::channel::<GenerationRequest>();
        let (result_sender, result_receiver) = mpsc::channel();

        let handle = thread::Builder::new()
            .name("sim-garden-generation".to_owned())
            .spawn(move || {
                for request in request_receiver {
                    let cells = step(request.grid.view(), request.rule);
                    let result = GenerationResult {
                        epoch: request.epoch,
                        revision: request.revision,
                        cells,
                    };
                    if result_sender.send(result).is_err() {
                        break;
                    }
                }
            })
            .map_err(WorkerError::Spawn)?;

        Ok(Self {
            requests: Some(request_sender),
            results: result_receiver,
            handle: Some(handle),
        })
    }

    /// Queues a request for the worker.
    pub fn submit(&self, request: GenerationRequest) -> Result<(), WorkerError> {
        let sender = self.requests.as_ref().ok_or(WorkerError::Disconnected)?;
        sender
            .send(request)
            .map_err(|_| WorkerError::Disconnected)
    }

    /// Returns a finished generation if one is ready.
    pub fn try_recv(&self) -> Result<Option<GenerationResult>, WorkerError> {
        match self.results.try_recv() {
            Ok(result) => Ok(Some(result)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(WorkerError::Disconnected),
        }
    }

    /// Waits up to `timeout` for a finished generation.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<GenerationResult>, WorkerError> {
        match self.results.recv_timeout(timeout) {
            Ok(result) => Ok(Some(result)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(WorkerError::Disconnected),
        }
    }
}

impl Drop for GenerationWorker {
    fn drop(&mut self) {
        drop(self.requests.take());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("generation worker panicked");
            }
        }
    }
}
