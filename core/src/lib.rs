#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Simulation Garden engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, read immutable
//! grid snapshots, and respond exclusively with new command batches.

mod catalog;
mod grid;
mod tick_rate;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use catalog::{
    Family, ParseOptionError, ParsePatternError, Pattern, Rule, SimulationOption, TurmiteProgram,
};
pub use grid::{BoundaryPolicy, GridSnapshot, GridView};
pub use tick_rate::{TickRate, TickRateError};

/// Number of grid rows used when no explicit configuration is supplied.
pub const DEFAULT_GRID_ROWS: u32 = 100;

/// Number of grid columns used when no explicit configuration is supplied.
pub const DEFAULT_GRID_COLUMNS: u32 = 100;

/// Largest accepted grid edge in cells.
pub const MAX_GRID_EDGE: u32 = 1_000;

/// Probability that a cell starts alive when the random pattern is applied.
pub const DEFAULT_RANDOM_DENSITY: f32 = 0.2;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Recreates the grid with the provided dimensions and resets the simulation.
    ConfigureGrid {
        /// Number of rows in the new grid.
        rows: u32,
        /// Number of columns in the new grid.
        columns: u32,
    },
    /// Configures the random pattern fill.
    ConfigureRandomFill {
        /// Probability in `0.0..=1.0` that a cell starts alive.
        density: f32,
        /// Seed for the deterministic random generator.
        seed: u64,
    },
    /// Switches the active simulation option, resetting grid and step count.
    SelectOption {
        /// Option that should become active.
        option: SimulationOption,
    },
    /// Requests an absolute tick rate, validated against the family cap.
    SetTickRate {
        /// Requested ticks per second.
        requested: i64,
    },
    /// Nudges the tick rate by a relative amount, saturating at 1 and the family cap.
    AdjustSpeed {
        /// Signed change in ticks per second.
        delta: i64,
    },
    /// Starts stepping the simulation.
    Start,
    /// Stops stepping the simulation.
    Stop,
    /// Restores the initial grid and agents of the active option.
    Reset,
    /// Flips the state of a single cell.
    ToggleCell {
        /// Cell to flip.
        cell: CellCoord,
    },
    /// Reseeds the grid from the pattern catalog.
    ApplyPattern {
        /// Pattern stamped into a fresh grid.
        pattern: Pattern,
    },
    /// Requests a single simulation step.
    Tick,
    /// Replaces the grid with a generation computed from an earlier snapshot.
    CommitGeneration {
        /// Epoch the generation was dispatched under.
        epoch: Epoch,
        /// Edit revision of the snapshot the generation was computed from.
        revision: Revision,
        /// Cell states of the next generation in row-major order.
        cells: Vec<u8>,
    },
    /// Applies one tick of agent moves in the listed order.
    AdvanceAgents {
        /// Epoch the moves were computed under.
        epoch: Epoch,
        /// Moves ordered by ascending agent identifier.
        moves: Vec<AgentMove>,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Reports that the grid was recreated with new dimensions.
    GridConfigured {
        /// Number of rows in the grid.
        rows: u32,
        /// Number of columns in the grid.
        columns: u32,
        /// Epoch that became current.
        epoch: Epoch,
    },
    /// Announces that a new simulation option is active.
    OptionSelected {
        /// Option that became active.
        option: SimulationOption,
        /// Epoch that became current.
        epoch: Epoch,
    },
    /// Confirms that the tick rate changed.
    TickRateChanged {
        /// Tick rate now in effect.
        rate: TickRate,
    },
    /// Reports that a tick rate request was rejected and the prior rate kept.
    TickRateRejected {
        /// Reason the request failed validation.
        error: TickRateError,
    },
    /// Announces that the simulation started running.
    SimulationStarted,
    /// Announces that the simulation stopped running.
    SimulationPaused,
    /// Announces that the simulation returned to its initial state.
    SimulationReset {
        /// Epoch that became current.
        epoch: Epoch,
    },
    /// Confirms that a cell was flipped.
    CellToggled {
        /// Cell that was edited.
        cell: CellCoord,
        /// State stored in the cell after the edit.
        state: u8,
    },
    /// Confirms that a pattern reseeded the grid.
    PatternApplied {
        /// Pattern that was stamped.
        pattern: Pattern,
        /// Epoch that became current.
        epoch: Epoch,
    },
    /// Signals that a tick was accepted and the active stepper should run.
    TickElapsed {
        /// Epoch the step belongs to.
        epoch: Epoch,
        /// Edit revision of the grid at dispatch time.
        revision: Revision,
        /// Option whose stepper should handle the tick.
        option: SimulationOption,
    },
    /// Confirms that a cellular automaton generation replaced the grid.
    GenerationCommitted {
        /// Epoch of the committed generation.
        epoch: Epoch,
        /// Step counter after the commit.
        step_count: u64,
    },
    /// Confirms that every agent advanced one tick.
    AgentsAdvanced {
        /// Epoch of the applied moves.
        epoch: Epoch,
        /// Step counter after the moves.
        step_count: u64,
    },
    /// Reports that a result computed under an outdated epoch was dropped.
    StaleResultDiscarded {
        /// Epoch carried by the discarded result.
        stale: Epoch,
        /// Epoch current when the result arrived.
        current: Epoch,
    },
    /// Publishes population statistics for the current grid.
    PopulationReported {
        /// Computed statistics.
        report: PopulationReport,
    },
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Direction an agent faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heading {
    /// Towards row zero.
    Up,
    /// Towards the last column.
    Right,
    /// Towards the last row.
    Down,
    /// Towards column zero.
    Left,
}

impl Heading {
    /// Headings in clockwise order starting at [`Heading::Up`].
    pub const ALL: [Heading; 4] = [Heading::Up, Heading::Right, Heading::Down, Heading::Left];

    /// Returns the clockwise index of the heading, `Up = 0` through `Left = 3`.
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Up => 0,
            Self::Right => 1,
            Self::Down => 2,
            Self::Left => 3,
        }
    }

    /// Returns the heading for a clockwise index, wrapping modulo four.
    #[must_use]
    pub const fn from_index(index: u8) -> Self {
        match index % 4 {
            0 => Self::Up,
            1 => Self::Right,
            2 => Self::Down,
            _ => Self::Left,
        }
    }

    /// Returns the heading after performing the provided turn.
    #[must_use]
    pub const fn turned(self, turn: Turn) -> Self {
        Self::from_index(self.index() + turn.quarter_turns())
    }

    /// Column and row delta of a single step along the heading.
    #[must_use]
    pub const fn offset(self) -> (i64, i64) {
        match self {
            Self::Up => (0, -1),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
        }
    }
}

/// Relative rotation applied by an agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Turn {
    /// Keep the current heading.
    None,
    /// Rotate 90 degrees clockwise.
    Right,
    /// Reverse direction.
    UTurn,
    /// Rotate 90 degrees counter-clockwise.
    Left,
}

impl Turn {
    /// Number of clockwise quarter turns the rotation represents.
    #[must_use]
    pub const fn quarter_turns(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Right => 1,
            Self::UTurn => 2,
            Self::Left => 3,
        }
    }
}

/// Token identifying a simulation timeline.
///
/// The world advances the epoch whenever previously dispatched work becomes
/// meaningless: on reset, option switch, pattern application and grid
/// reconfiguration. Results tagged with an older epoch are discarded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Epoch(u64);

impl Epoch {
    /// Creates a new epoch token.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the epoch.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Returns the epoch that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Counter of manual grid edits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Revision(u64);

impl Revision {
    /// Creates a new revision marker.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the revision.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Returns the revision that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Unique identifier assigned to an agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(u32);

impl AgentId {
    /// Creates a new agent identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Behaviour driving an agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentKind {
    /// Classic Langton's ant: left on white, right on black.
    LangtonAnt,
    /// Turmite following a transition table from the catalog.
    Turmite(TurmiteProgram),
}

/// Immutable representation of a single agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentSnapshot {
    /// Identifier of the agent. Agents step in ascending identifier order.
    pub id: AgentId,
    /// Behaviour of the agent.
    pub kind: AgentKind,
    /// Cell the agent occupies.
    pub cell: CellCoord,
    /// Direction the agent faces.
    pub heading: Heading,
    /// Internal state index. Always zero for Langton's ant.
    pub state: u8,
}

/// Outcome of one agent's transition within a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentMove {
    /// Agent performing the move.
    pub agent: AgentId,
    /// Cell the agent occupied before moving.
    pub from: CellCoord,
    /// State written into `from`.
    pub write: u8,
    /// Cell the agent occupies after moving.
    pub to: CellCoord,
    /// Heading after the turn.
    pub heading: Heading,
    /// Internal state after the transition.
    pub state: u8,
}

/// Run state and pacing of the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationState {
    /// Whether ticks currently advance the simulation.
    pub running: bool,
    /// Requested ticks per second.
    pub tick_rate: TickRate,
    /// Number of successful steps since the last reset.
    pub step_count: u64,
}

impl Default for SimulationState {
    fn default() -> Self {
        Self {
            running: false,
            tick_rate: TickRate::DEFAULT,
            step_count: 0,
        }
    }
}

/// Population statistics describing a grid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationReport {
    step: u64,
    total_cells: u64,
    per_state: Vec<u64>,
}

impl PopulationReport {
    /// Creates a report from per-state cell counts.
    #[must_use]
    pub fn new(step: u64, per_state: Vec<u64>) -> Self {
        let total_cells = per_state.iter().sum();
        Self {
            step,
            total_cells,
            per_state,
        }
    }

    /// Step counter the report was computed at.
    #[must_use]
    pub const fn step(&self) -> u64 {
        self.step
    }

    /// Number of cells in the grid.
    #[must_use]
    pub const fn total_cells(&self) -> u64 {
        self.total_cells
    }

    /// Number of cells in a non-zero state.
    #[must_use]
    pub fn population(&self) -> u64 {
        self.per_state.iter().skip(1).sum()
    }

    /// Fraction of cells in a non-zero state.
    #[must_use]
    pub fn density(&self) -> f64 {
        if self.total_cells == 0 {
            return 0.0;
        }
        self.population() as f64 / self.total_cells as f64
    }

    /// Cell counts indexed by state.
    #[must_use]
    pub fn per_state(&self) -> &[u64] {
        &self.per_state
    }
}

/// Severity of a transient notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationKind {
    /// Neutral status change.
    Info,
    /// Completed user action.
    Success,
    /// Rejected user input.
    Error,
}

/// Transient message intended for toast display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Severity of the message.
    pub kind: NotificationKind,
    /// Human readable text.
    pub message: String,
}

impl Notification {
    /// How long shells keep a notification visible unless configured otherwise.
    pub const DEFAULT_DURATION: Duration = Duration::from_millis(2000);

    /// Creates a notification.
    #[must_use]
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        AgentId, AgentMove, CellCoord, Command, Epoch, Event, Heading, Pattern, PopulationReport,
        Revision, SimulationOption, TickRate, TickRateError, Turn,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn left_turns_from_up_walk_counter_clockwise() {
        let mut heading = Heading::Up;
        let mut visited = Vec::new();
        for _ in 0..4 {
            heading = heading.turned(Turn::Left);
            visited.push(heading);
        }
        assert_eq!(
            visited,
            vec![Heading::Left, Heading::Down, Heading::Right, Heading::Up]
        );
    }

    #[test]
    fn u_turn_reverses_heading() {
        assert_eq!(Heading::Right.turned(Turn::UTurn), Heading::Left);
        assert_eq!(Heading::Up.turned(Turn::UTurn), Heading::Down);
        assert_eq!(Heading::Down.turned(Turn::None), Heading::Down);
    }

    #[test]
    fn population_report_excludes_dead_cells() {
        let report = PopulationReport::new(4, vec![6, 3, 1]);
        assert_eq!(report.total_cells(), 10);
        assert_eq!(report.population(), 4);
        assert!((report.density() - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_report_has_zero_density() {
        let report = PopulationReport::new(0, Vec::new());
        assert_eq!(report.density(), 0.0);
    }

    #[test]
    fn commit_command_round_trips_through_bincode() {
        assert_round_trip(&Command::CommitGeneration {
            epoch: Epoch::new(3),
            revision: Revision::new(9),
            cells: vec![0, 1, 1, 0],
        });
        assert_round_trip(&Command::AdvanceAgents {
            epoch: Epoch::new(1),
            moves: vec![AgentMove {
                agent: AgentId::new(0),
                from: CellCoord::new(5, 5),
                write: 1,
                to: CellCoord::new(4, 5),
                heading: Heading::Left,
                state: 0,
            }],
        });
    }

    #[test]
    fn events_round_trip_through_bincode() {
        assert_round_trip(&Event::TickElapsed {
            epoch: Epoch::new(2),
            revision: Revision::default(),
            option: SimulationOption::Turmites,
        });
        assert_round_trip(&Event::PatternApplied {
            pattern: Pattern::GliderGun,
            epoch: Epoch::new(7),
        });
        assert_round_trip(&Event::TickRateRejected {
            error: TickRateError::AboveCap {
                requested: 9,
                cap: 5,
            },
        });
        assert_round_trip(&Event::TickRateChanged {
            rate: TickRate::DEFAULT,
        });
    }
}
