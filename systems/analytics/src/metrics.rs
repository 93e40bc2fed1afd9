use sim_garden_core::{GridView, PopulationReport};

/// Counts how many cells hold each state.
///
/// `counts` is resized to `states` entries. States outside the alphabet are
/// folded into the highest bucket so the totals always match the grid size.
pub fn count_states(grid: GridView<'_>, states: u8, counts: &mut Vec<u64>) {
    let buckets = usize::from(states.max(1));
    counts.clear();
    counts.resize(buckets, 0);
    for &cell in grid.cells() {
        let index = usize::from(cell).min(buckets - 1);
        counts[index] += 1;
    }
}

/// Builds a population report for `grid` at the given step.
pub fn population_report(
    grid: GridView<'_>,
    states: u8,
    step: u64,
    counts: &mut Vec<u64>,
) -> PopulationReport {
    count_states(grid, states, counts);
    PopulationReport::new(step, counts.clone())
}

#[cfg(test)]
mod tests {
    use super::{count_states, population_report};
    use sim_garden_core::GridView;

    #[test]
    fn counts_every_state_of_a_three_state_grid() {
        let cells = [0, 1, 2, 2, 0, 0];
        let mut counts = Vec::new();
        count_states(GridView::new(2, 3, &cells), 3, &mut counts);
        assert_eq!(counts, vec![3, 1, 2]);
    }

    #[test]
    fn report_density_ignores_dead_cells() {
        let cells = [1, 0, 0, 1];
        let mut counts = Vec::new();
        let report = population_report(GridView::new(2, 2, &cells), 2, 7, &mut counts);
        assert_eq!(report.step(), 7);
        assert_eq!(report.population(), 2);
        assert!((report.density() - 0.5).abs() < f64::EPSILON);
    }
}
