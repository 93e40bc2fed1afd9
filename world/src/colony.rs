//! Initial agent placement for the ant families.

use sim_garden_core::{
    AgentId, AgentKind, AgentSnapshot, BoundaryPolicy, CellCoord, Heading, SimulationOption,
    TurmiteProgram,
};

/// Offsets of the turmite colony around the grid center, as multiples of the spread.
const COLONY_LAYOUT: [(i64, i64, Heading); 4] = [
    (-1, -1, Heading::Up),
    (1, -1, Heading::Right),
    (1, 1, Heading::Down),
    (-1, 1, Heading::Left),
];

/// Agents present when the option starts or resets. Classic options have none.
pub(crate) fn seed(option: SimulationOption, rows: u32, columns: u32) -> Vec<AgentSnapshot> {
    let center = CellCoord::new(columns / 2, rows / 2);
    match option {
        SimulationOption::Classic(_) => Vec::new(),
        SimulationOption::Langton => vec![AgentSnapshot {
            id: AgentId::new(0),
            kind: AgentKind::LangtonAnt,
            cell: center,
            heading: Heading::Up,
            state: 0,
        }],
        SimulationOption::Turmites => {
            let spread = i64::from(rows.min(columns) / 8);
            COLONY_LAYOUT
                .iter()
                .zip(TurmiteProgram::ALL)
                .enumerate()
                .map(|(index, (&(dx, dy, heading), program))| AgentSnapshot {
                    id: AgentId::new(index as u32),
                    kind: AgentKind::Turmite(program),
                    cell: BoundaryPolicy::Wrap.resolve(
                        i64::from(center.column()) + dx * spread,
                        i64::from(center.row()) + dy * spread,
                        columns,
                        rows,
                    ),
                    heading,
                    state: 0,
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::seed;
    use sim_garden_core::{CellCoord, Heading, Rule, SimulationOption};

    #[test]
    fn langton_ant_starts_at_center_facing_up() {
        let agents = seed(SimulationOption::Langton, 100, 100);
        assert_eq!(agents.len(), 1);
        assert_eq!(agents[0].cell, CellCoord::new(50, 50));
        assert_eq!(agents[0].heading, Heading::Up);
    }

    #[test]
    fn turmite_colony_has_distinct_programs_and_ascending_ids() {
        let agents = seed(SimulationOption::Turmites, 100, 100);
        assert_eq!(agents.len(), 4);
        for pair in agents.windows(2) {
            assert!(pair[0].id < pair[1].id);
            assert_ne!(pair[0].kind, pair[1].kind);
        }
        assert_eq!(agents[0].cell, CellCoord::new(38, 38));
        assert_eq!(agents[2].cell, CellCoord::new(62, 62));
    }

    #[test]
    fn colony_fits_tiny_grids() {
        let agents = seed(SimulationOption::Turmites, 3, 2);
        assert!(agents
            .iter()
            .all(|agent| agent.cell.column() < 2 && agent.cell.row() < 3));
    }

    #[test]
    fn classic_options_have_no_agents() {
        assert!(seed(SimulationOption::Classic(Rule::Seeds), 10, 10).is_empty());
    }
}
