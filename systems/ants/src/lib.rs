#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Agent stepping for Langton's ant and turmite colonies.
//!
//! Each tick every agent reads the cell it stands on, writes a new color,
//! turns and moves one cell. Agents step one after another in ascending
//! [`AgentId`](sim_garden_core::AgentId) order; a later agent sees the cells
//! written by earlier agents in the same tick.

pub mod langton;
pub mod turmite;

use std::collections::HashMap;

use sim_garden_core::{
    AgentKind, AgentMove, AgentSnapshot, BoundaryPolicy, CellCoord, Command, Event, GridView,
    SimulationOption, Turn,
};

/// Result of looking up an agent's rule for the color under it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    /// Color written into the current cell.
    pub write: u8,
    /// Rotation applied before moving.
    pub turn: Turn,
    /// Internal state after the step.
    pub next_state: u8,
}

/// Transition an agent of the given kind takes from `state` on `color`.
#[must_use]
pub fn transition(kind: AgentKind, state: u8, color: u8) -> Transition {
    match kind {
        AgentKind::LangtonAnt => langton::transition(color),
        AgentKind::Turmite(program) => turmite::transition(program, state, color),
    }
}

/// Computes one agent's move given the color of the cell it occupies.
#[must_use]
pub fn advance(
    agent: &AgentSnapshot,
    color: u8,
    grid: GridView<'_>,
    policy: BoundaryPolicy,
) -> AgentMove {
    let step = transition(agent.kind, agent.state, color);
    let heading = agent.heading.turned(step.turn);
    let (delta_column, delta_row) = heading.offset();
    let to = policy.resolve(
        i64::from(agent.cell.column()) + delta_column,
        i64::from(agent.cell.row()) + delta_row,
        grid.columns(),
        grid.rows(),
    );
    AgentMove {
        agent: agent.id,
        from: agent.cell,
        write: step.write,
        to,
        heading,
        state: step.next_state,
    }
}

/// Pure system that turns ticks of the ant families into agent moves.
#[derive(Debug, Default)]
pub struct Ants {
    order: Vec<AgentSnapshot>,
    written: HashMap<CellCoord, u8>,
}

impl Ants {
    /// Creates a new ants system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes world events and emits one `AdvanceAgents` per batch.
    ///
    /// `grid` and `agents` must reflect the world before the tick. Only the
    /// first ant tick in a batch is processed since later ones would read the
    /// same stale state.
    pub fn handle(
        &mut self,
        events: &[Event],
        grid: GridView<'_>,
        agents: &[AgentSnapshot],
        out: &mut Vec<Command>,
    ) {
        let Some((epoch, option)) = events.iter().find_map(|event| match *event {
            Event::TickElapsed { epoch, option, .. } if option.rule().is_none() => {
                Some((epoch, option))
            }
            _ => None,
        }) else {
            return;
        };

        let moves = self.step_agents(option, grid, agents);
        out.push(Command::AdvanceAgents { epoch, moves });
    }

    fn step_agents(
        &mut self,
        option: SimulationOption,
        grid: GridView<'_>,
        agents: &[AgentSnapshot],
    ) -> Vec<AgentMove> {
        let policy = option.family().boundary_policy();
        self.order.clear();
        self.order.extend_from_slice(agents);
        self.order.sort_by_key(|agent| agent.id);
        self.written.clear();

        let mut moves = Vec::with_capacity(self.order.len());
        for agent in &self.order {
            let color = self
                .written
                .get(&agent.cell)
                .copied()
                .or_else(|| grid.state(agent.cell))
                .unwrap_or(0);
            let agent_move = advance(agent, color, grid, policy);
            let _ = self.written.insert(agent_move.from, agent_move.write);
            moves.push(agent_move);
        }
        moves
    }
}
