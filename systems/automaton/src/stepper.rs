//! Whole-grid generation stepping.

use sim_garden_core::{GridView, Rule};

use crate::rules::next_state;

/// Computes the next generation into a freshly allocated buffer.
///
/// Every cell reads its neighbors from `grid`, which is never written, so the
/// result does not depend on iteration order.
#[must_use]
pub fn step(grid: GridView<'_>, rule: Rule) -> Vec<u8> {
    let mut next = Vec::with_capacity(grid.cells().len());
    step_into(grid, rule, &mut next);
    next
}

/// Computes the next generation into `out`, replacing its contents.
pub fn step_into(grid: GridView<'_>, rule: Rule, out: &mut Vec<u8>) {
    out.clear();
    out.extend(
        grid.coords()
            .zip(grid.cells())
            .map(|(cell, &state)| next_state(rule, state, grid.live_neighbors(cell))),
    );
}

#[cfg(test)]
mod tests {
    use super::step;
    use sim_garden_core::{GridView, Rule};

    fn grid_from(lines: &[&str]) -> (u32, u32, Vec<u8>) {
        let rows = lines.len() as u32;
        let columns = lines[0].len() as u32;
        let cells = lines
            .iter()
            .flat_map(|line| {
                line.bytes().map(|symbol| match symbol {
                    b'O' => 1,
                    b'x' => 2,
                    _ => 0,
                })
            })
            .collect();
        (rows, columns, cells)
    }

    fn step_lines(lines: &[&str], rule: Rule) -> Vec<u8> {
        let (rows, columns, cells) = grid_from(lines);
        step(GridView::new(rows, columns, &cells), rule)
    }

    #[test]
    fn block_is_a_still_life() {
        let block = ["......", ".OO...", ".OO...", "......", "......"];
        let (_, _, cells) = grid_from(&block);
        assert_eq!(step_lines(&block, Rule::Conway), cells);
    }

    #[test]
    fn blinker_has_period_two() {
        let horizontal = [".....", ".....", ".OOO.", ".....", "....."];
        let vertical = [".....", "..O..", "..O..", "..O..", "....."];
        let (rows, columns, start) = grid_from(&horizontal);
        let (_, _, expected_vertical) = grid_from(&vertical);

        let first = step(GridView::new(rows, columns, &start), Rule::Conway);
        assert_eq!(first, expected_vertical);

        let second = step(GridView::new(rows, columns, &first), Rule::Conway);
        assert_eq!(second, start);
    }

    #[test]
    fn stepping_is_deterministic_and_leaves_input_untouched() {
        let lines = ["O.O.O", ".OO..", "..O.O", "O...O", ".O.O."];
        let (rows, columns, cells) = grid_from(&lines);
        let original = cells.clone();
        for rule in Rule::ALL {
            let first = step(GridView::new(rows, columns, &cells), rule);
            let second = step(GridView::new(rows, columns, &cells), rule);
            assert_eq!(first, second, "{rule:?}");
        }
        assert_eq!(cells, original);
    }

    #[test]
    fn births_happen_across_the_wrapped_edge() {
        // Three live cells on the last row birth a cell on the first row.
        let lines = [".....", ".....", ".....", ".....", ".OOO."];
        let next = step_lines(&lines, Rule::Conway);
        assert_eq!(next[2], 1, "cell (2, 0) should be born from row 4");
    }

    #[test]
    fn brians_brain_moves_through_its_three_states() {
        let lines = ["....", ".OO.", "....", "...."];
        let next = step_lines(&lines, Rule::BriansBrain);
        let (_, _, expected) = grid_from(&[".OO.", ".xx.", ".OO.", "...."]);
        assert_eq!(next, expected);
    }

    #[test]
    fn seeds_clear_every_live_cell() {
        let lines = ["OO", "OO"];
        assert_eq!(step_lines(&lines, Rule::Seeds), vec![0; 4]);
    }
}
