#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Simulation Garden.
//!
//! The world owns the grid, the agents and the [`SimulationState`]. It is
//! mutated exclusively through [`apply`], which records the consequences of
//! every command as events. Results computed asynchronously carry the
//! [`Epoch`] they were dispatched under and are discarded once the epoch has
//! moved on.

mod colony;
mod grid;
mod patterns;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sim_garden_core::{
    AgentMove, AgentSnapshot, CellCoord, Command, Epoch, Event, Pattern, Revision,
    SimulationOption, SimulationState, TickRate, DEFAULT_GRID_COLUMNS, DEFAULT_GRID_ROWS,
    DEFAULT_RANDOM_DENSITY,
};

use crate::grid::Grid;

/// Seed used for the random pattern until one is configured.
pub const DEFAULT_SEED: u64 = 0x5eed_9a2d_e11e;

/// Represents the authoritative Simulation Garden world state.
#[derive(Debug)]
pub struct World {
    grid: Grid,
    option: SimulationOption,
    agents: Vec<AgentSnapshot>,
    state: SimulationState,
    epoch: Epoch,
    revision: Revision,
    pending_edits: Vec<PendingEdit>,
    density: f32,
    rng: ChaCha8Rng,
}

/// Manual edit made while a generation may be computing.
#[derive(Clone, Copy, Debug)]
struct PendingEdit {
    revision: Revision,
    cell: CellCoord,
    state: u8,
}

impl World {
    /// Creates a world running Conway's Game of Life on an empty default grid.
    #[must_use]
    pub fn new() -> Self {
        let option = SimulationOption::default();
        Self {
            grid: Grid::new(DEFAULT_GRID_ROWS, DEFAULT_GRID_COLUMNS, option.cell_states()),
            option,
            agents: Vec::new(),
            state: SimulationState::default(),
            epoch: Epoch::default(),
            revision: Revision::default(),
            pending_edits: Vec::new(),
            density: DEFAULT_RANDOM_DENSITY,
            rng: ChaCha8Rng::seed_from_u64(DEFAULT_SEED),
        }
    }

    /// Starts a new timeline: fresh grid, initial agents, zero steps.
    fn restart(&mut self) {
        self.grid = Grid::new(
            self.grid.rows(),
            self.grid.columns(),
            self.option.cell_states(),
        );
        self.agents = colony::seed(self.option, self.grid.rows(), self.grid.columns());
        self.state.step_count = 0;
        self.epoch = self.epoch.next();
        self.pending_edits.clear();
    }

    fn cap(&self) -> u32 {
        self.option.family().tick_rate_cap()
    }

    fn set_tick_rate(&mut self, rate: TickRate, out_events: &mut Vec<Event>) {
        if rate == self.state.tick_rate {
            return;
        }
        self.state.tick_rate = rate;
        log::info!("tick rate set to {}", rate.get());
        out_events.push(Event::TickRateChanged { rate });
    }

    fn seed_pattern(&mut self, pattern: Pattern) -> Vec<u8> {
        let rows = self.grid.rows();
        let columns = self.grid.columns();
        match patterns::preset(pattern) {
            Some(preset) => patterns::stamp(preset, rows, columns),
            None => patterns::random_fill(rows, columns, self.density, &mut self.rng),
        }
    }

    fn commit_generation(
        &mut self,
        epoch: Epoch,
        revision: Revision,
        cells: Vec<u8>,
        out_events: &mut Vec<Event>,
    ) {
        if epoch != self.epoch {
            log::debug!(
                "discarding generation from epoch {} (current {})",
                epoch.get(),
                self.epoch.get()
            );
            out_events.push(Event::StaleResultDiscarded {
                stale: epoch,
                current: self.epoch,
            });
            return;
        }

        if !self.grid.replace(cells) {
            log::warn!("generation does not match the grid dimensions; dropped");
            return;
        }

        for edit in self
            .pending_edits
            .iter()
            .filter(|edit| edit.revision > revision)
        {
            let _ = self.grid.set(edit.cell, edit.state);
        }
        self.pending_edits.clear();

        self.state.step_count = self.state.step_count.saturating_add(1);
        out_events.push(Event::GenerationCommitted {
            epoch,
            step_count: self.state.step_count,
        });
    }

    fn advance_agents(&mut self, epoch: Epoch, moves: Vec<AgentMove>, out_events: &mut Vec<Event>) {
        if epoch != self.epoch {
            log::debug!(
                "discarding agent moves from epoch {} (current {})",
                epoch.get(),
                self.epoch.get()
            );
            out_events.push(Event::StaleResultDiscarded {
                stale: epoch,
                current: self.epoch,
            });
            return;
        }

        for agent_move in moves {
            if self.grid.view().index(agent_move.to).is_none() {
                continue;
            }
            let Some(agent) = self
                .agents
                .iter_mut()
                .find(|agent| agent.id == agent_move.agent)
            else {
                continue;
            };
            if agent.cell != agent_move.from {
                log::warn!(
                    "agent {} is not at the move origin; skipped",
                    agent_move.agent.get()
                );
                continue;
            }
            let _ = self.grid.set(agent_move.from, agent_move.write);
            agent.cell = agent_move.to;
            agent.heading = agent_move.heading;
            agent.state = agent_move.state;
        }

        self.state.step_count = self.state.step_count.saturating_add(1);
        out_events.push(Event::AgentsAdvanced {
            epoch,
            step_count: self.state.step_count,
        });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureGrid { rows, columns } => {
            world.grid = Grid::new(rows, columns, world.option.cell_states());
            world.state.running = false;
            world.restart();
            out_events.push(Event::GridConfigured {
                rows: world.grid.rows(),
                columns: world.grid.columns(),
                epoch: world.epoch,
            });
        }
        Command::ConfigureRandomFill { density, seed } => {
            world.density = density.clamp(0.0, 1.0);
            world.rng = ChaCha8Rng::seed_from_u64(seed);
        }
        Command::SelectOption { option } => {
            world.option = option;
            world.state.running = false;
            world.restart();
            log::info!("selected {option}");
            out_events.push(Event::OptionSelected {
                option,
                epoch: world.epoch,
            });
            let clamped = option.family().clamp_rate(world.state.tick_rate);
            world.set_tick_rate(clamped, out_events);
        }
        Command::SetTickRate { requested } => match TickRate::new(requested, world.cap()) {
            Ok(rate) => world.set_tick_rate(rate, out_events),
            Err(error) => {
                log::warn!("rejected tick rate: {error}");
                out_events.push(Event::TickRateRejected { error });
            }
        },
        Command::AdjustSpeed { delta } => {
            let rate = world.state.tick_rate.adjusted(delta, world.cap());
            world.set_tick_rate(rate, out_events);
        }
        Command::Start => {
            if !world.state.running {
                world.state.running = true;
                log::info!("simulation started");
                out_events.push(Event::SimulationStarted);
            }
        }
        Command::Stop => {
            if world.state.running {
                world.state.running = false;
                log::info!("simulation paused at step {}", world.state.step_count);
                out_events.push(Event::SimulationPaused);
            }
        }
        Command::Reset => {
            world.state.running = false;
            world.restart();
            log::info!("simulation reset");
            out_events.push(Event::SimulationReset { epoch: world.epoch });
        }
        Command::ToggleCell { cell } => {
            let Some(state) = world.grid.toggle(cell) else {
                log::debug!("ignoring toggle outside the grid at {cell:?}");
                return;
            };
            world.revision = world.revision.next();
            if world.option.rule().is_some() {
                world.pending_edits.push(PendingEdit {
                    revision: world.revision,
                    cell,
                    state,
                });
            }
            out_events.push(Event::CellToggled { cell, state });
        }
        Command::ApplyPattern { pattern } => {
            world.restart();
            let cells = world.seed_pattern(pattern);
            let replaced = world.grid.replace(cells);
            debug_assert!(replaced, "pattern sized for the current grid");
            log::info!("applied pattern {pattern}");
            out_events.push(Event::PatternApplied {
                pattern,
                epoch: world.epoch,
            });
        }
        Command::Tick => {
            if world.state.running {
                out_events.push(Event::TickElapsed {
                    epoch: world.epoch,
                    revision: world.revision,
                    option: world.option,
                });
            }
        }
        Command::CommitGeneration {
            epoch,
            revision,
            cells,
        } => world.commit_generation(epoch, revision, cells, out_events),
        Command::AdvanceAgents { epoch, moves } => world.advance_agents(epoch, moves, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use sim_garden_core::{
        AgentSnapshot, Epoch, GridSnapshot, GridView, Revision, SimulationOption, SimulationState,
    };

    use super::World;

    /// Run state, tick rate and step counter.
    #[must_use]
    pub fn simulation_state(world: &World) -> SimulationState {
        world.state
    }

    /// Option whose stepper is active.
    #[must_use]
    pub fn option(world: &World) -> SimulationOption {
        world.option
    }

    /// Current epoch token.
    #[must_use]
    pub fn epoch(world: &World) -> Epoch {
        world.epoch
    }

    /// Number of manual edits applied so far.
    #[must_use]
    pub fn revision(world: &World) -> Revision {
        world.revision
    }

    /// Borrowed view of the current generation.
    #[must_use]
    pub fn grid_view(world: &World) -> GridView<'_> {
        world.grid.view()
    }

    /// Shared snapshot of the current generation for off-thread readers.
    #[must_use]
    pub fn grid_snapshot(world: &World) -> GridSnapshot {
        world.grid.snapshot()
    }

    /// Size of the cell alphabet of the current grid.
    #[must_use]
    pub fn cell_states(world: &World) -> u8 {
        world.grid.states()
    }

    /// Agents ordered by ascending identifier.
    #[must_use]
    pub fn agents(world: &World) -> &[AgentSnapshot] {
        &world.agents
    }

    /// Probability used by the random pattern.
    #[must_use]
    pub fn random_density(world: &World) -> f32 {
        world.density
    }
}
