#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Cellular automaton stepping for the classic family.
//!
//! The [`Automaton`] system reacts to `TickElapsed` events by computing the
//! next generation, either inline or on a background [`GenerationWorker`].
//! At most one generation is in flight; ticks that arrive while one is being
//! computed are dropped. Finished generations are returned to the world as
//! `CommitGeneration` commands carrying the epoch and revision they were
//! computed from.

mod rules;
mod stepper;
mod worker;

use std::time::Duration;

use sim_garden_core::{Command, Epoch, Event, GridSnapshot, SimulationOption};

pub use rules::next_state;
pub use stepper::{step, step_into};
pub use worker::{GenerationRequest, GenerationResult, GenerationWorker, WorkerError};

/// Pure system that schedules generation computation for classic options.
#[derive(Debug, Default)]
pub struct Automaton {
    worker: Option<GenerationWorker>,
    in_flight: Option<Epoch>,
    dropped_ticks: u64,
}

impl Automaton {
    /// Creates a system that computes generations on the calling thread.
    #[must_use]
    pub fn inline() -> Self {
        Self::default()
    }

    /// Creates a system that computes generations on a background thread.
    pub fn background() -> Result<Self, WorkerError> {
        Ok(Self {
            worker: Some(GenerationWorker::spawn()?),
            ..Self::default()
        })
    }

    /// Reports whether no generation is currently being computed.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.in_flight.is_none()
    }

    /// Number of ticks skipped because a generation was still in flight.
    #[must_use]
    pub fn dropped_ticks(&self) -> u64 {
        self.dropped_ticks
    }

    /// Consumes world events and dispatches at most one generation.
    ///
    /// `grid` must be the world's current generation. Inline mode pushes the
    /// resulting `CommitGeneration` straight into `out`; background mode pushes
    /// it from [`Automaton::poll`] once the worker answers.
    pub fn handle(&mut self, events: &[Event], grid: &GridSnapshot, out: &mut Vec<Command>) {
        for event in events {
            let Event::TickElapsed {
                epoch,
                revision,
                option: SimulationOption::Classic(rule),
            } = *event
            else {
                continue;
            };

            if self.in_flight.is_some() {
                self.dropped_ticks = self.dropped_ticks.saturating_add(1);
                log::debug!("generation in flight; tick for epoch {} dropped", epoch.get());
                continue;
            }

            if let Some(worker) = &self.worker {
                let request = GenerationRequest {
                    epoch,
                    revision,
                    rule,
                    grid: grid.clone(),
                };
                match worker.submit(request) {
                    Ok(()) => {
                        self.in_flight = Some(epoch);
                        continue;
                    }
                    Err(error) => {
                        log::error!("{error}; stepping inline from now on");
                        self.worker = None;
                    }
                }
            }

            out.push(Command::CommitGeneration {
                epoch,
                revision,
                cells: step(grid.view(), rule),
            });
            // Later ticks in this batch would step the same pre-commit grid.
            self.in_flight = Some(epoch);
        }

        if self.worker.is_none() {
            self.in_flight = None;
        }
    }

    /// Collects finished generations from the background worker.
    pub fn poll(&mut self, out: &mut Vec<Command>) {
        loop {
            let received = match &self.worker {
                Some(worker) => worker.try_recv(),
                None => return,
            };
            match received {
                Ok(Some(result)) => self.finish(result, out),
                Ok(None) => return,
                Err(error) => {
                    self.abandon_worker(error);
                    return;
                }
            }
        }
    }

    /// Blocks up to `timeout` for the in-flight generation.
    ///
    /// Returns `true` when a generation was collected.
    pub fn wait(&mut self, timeout: Duration, out: &mut Vec<Command>) -> bool {
        if self.in_flight.is_none() {
            return false;
        }
        let received = match &self.worker {
            Some(worker) => worker.recv_timeout(timeout),
            None => return false,
        };
        match received {
            Ok(Some(result)) => {
                self.finish(result, out);
                true
            }
            Ok(None) => false,
            Err(error) => {
                self.abandon_worker(error);
                false
            }
        }
    }

    fn finish(&mut self, result: GenerationResult, out: &mut Vec<Command>) {
        self.in_flight = None;
        out.push(Command::CommitGeneration {
            epoch: result.epoch,
            revision: result.revision,
            cells: result.cells,
        });
    }

    fn abandon_worker(&mut self, error: WorkerError) {
        log::error!("{error}; stepping inline from now on");
        self.worker = None;
        self.in_flight = None;
    }
}
