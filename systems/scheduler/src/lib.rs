#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wall-clock pacing for the simulation.
//!
//! The [`TickScheduler`] turns a monotonic frame clock into `Command::Tick`
//! requests at the configured tick rate. It never emits more than one tick per
//! poll: when frames arrive late the simulation slows down rather than bursting
//! to catch up.

use std::time::Duration;

use sim_garden_core::{Command, Event, TickRate};

/// Pure system that requests ticks while the simulation runs.
#[derive(Debug)]
pub struct TickScheduler {
    running: bool,
    rate: TickRate,
    last_step: Option<Duration>,
}

impl TickScheduler {
    /// Creates a stopped scheduler pacing at `rate`.
    #[must_use]
    pub fn new(rate: TickRate) -> Self {
        Self {
            running: false,
            rate,
            last_step: None,
        }
    }

    /// Reports whether the scheduler is currently issuing ticks.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Tick rate the scheduler paces at.
    #[must_use]
    pub fn rate(&self) -> TickRate {
        self.rate
    }

    /// Tracks run state and tick rate changes published by the world.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::SimulationStarted => {
                    self.running = true;
                    self.last_step = None;
                }
                Event::SimulationPaused
                | Event::SimulationReset { .. }
                | Event::OptionSelected { .. }
                | Event::GridConfigured { .. } => {
                    self.running = false;
                    self.last_step = None;
                }
                Event::TickRateChanged { rate } => self.rate = *rate,
                _ => {}
            }
        }
    }

    /// Emits a tick when at least one interval passed since the previous one.
    ///
    /// `now` is a monotonic timestamp. The first poll after starting anchors
    /// the clock without ticking.
    pub fn poll(&mut self, now: Duration, out: &mut Vec<Command>) {
        if !self.running {
            return;
        }

        let Some(last) = self.last_step else {
            self.last_step = Some(now);
            return;
        };

        if now.saturating_sub(last) >= self.rate.interval() {
            self.last_step = Some(now);
            out.push(Command::Tick);
        }
    }
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new(TickRate::DEFAULT)
    }
}
