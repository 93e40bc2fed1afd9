#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Population statistics for the simulation grid.
//!
//! [`Analytics`] watches world events for anything that changes the grid and
//! publishes at most one [`PopulationReport`] per call, however many changes
//! the batch contained.

mod metrics;

use sim_garden_core::{Event, GridView, PopulationReport};

pub use metrics::{count_states, population_report};

/// Pure analytics system that republishes population statistics on change.
#[derive(Debug, Default)]
pub struct Analytics {
    last_report: Option<PopulationReport>,
    counts: Vec<u64>,
}

impl Analytics {
    /// Creates a new analytics system with no published report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the last report published by the system, if any.
    #[must_use]
    pub fn last_report(&self) -> Option<&PopulationReport> {
        self.last_report.as_ref()
    }

    /// Consumes world events and publishes a fresh report when the grid changed.
    ///
    /// `grid`, `states` and `step` must describe the world after the events
    /// were applied.
    pub fn handle(
        &mut self,
        events: &[Event],
        grid: GridView<'_>,
        states: u8,
        step: u64,
        out: &mut Vec<Event>,
    ) {
        if !events.iter().any(changes_grid) {
            return;
        }

        let report = population_report(grid, states, step, &mut self.counts);
        if self.last_report.as_ref() == Some(&report) {
            return;
        }
        self.last_report = Some(report.clone());
        out.push(Event::PopulationReported { report });
    }
}

fn changes_grid(event: &Event) -> bool {
    matches!(
        event,
        Event::GridConfigured { .. }
            | Event::OptionSelected { .. }
            | Event::SimulationReset { .. }
            | Event::CellToggled { .. }
            | Event::PatternApplied { .. }
            | Event::GenerationCommitted { .. }
            | Event::AgentsAdvanced { .. }
    )
}
