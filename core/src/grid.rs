use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::CellCoord;

/// State counted as alive when tallying neighbors.
const ALIVE: u8 = 1;

/// Moore neighborhood offsets as (column, row) deltas.
const MOORE_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Resolution of coordinates that fall outside the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoundaryPolicy {
    /// Opposite edges are connected.
    Wrap,
    /// Coordinates stick to the nearest edge.
    Clamp,
}

impl BoundaryPolicy {
    /// Maps a possibly out-of-range coordinate onto the grid.
    #[must_use]
    pub fn resolve(self, column: i64, row: i64, columns: u32, rows: u32) -> CellCoord {
        let columns = i64::from(columns.max(1));
        let rows = i64::from(rows.max(1));
        let (column, row) = match self {
            Self::Wrap => (column.rem_euclid(columns), row.rem_euclid(rows)),
            Self::Clamp => (column.clamp(0, columns - 1), row.clamp(0, rows - 1)),
        };
        CellCoord::new(column as u32, row as u32)
    }
}

/// Read-only view into a row-major grid of cell states.
#[derive(Clone, Copy, Debug)]
pub struct GridView<'a> {
    rows: u32,
    columns: u32,
    cells: &'a [u8],
}

impl<'a> GridView<'a> {
    /// Wraps a row-major cell slice.
    #[must_use]
    pub fn new(rows: u32, columns: u32, cells: &'a [u8]) -> Self {
        debug_assert_eq!(cells.len(), rows as usize * columns as usize);
        Self {
            rows,
            columns,
            cells,
        }
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Raw cell states in row-major order.
    #[must_use]
    pub const fn cells(&self) -> &'a [u8] {
        self.cells
    }

    /// Row-major index of the cell, if it lies inside the grid.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() >= self.columns || cell.row() >= self.rows {
            return None;
        }
        Some(cell.row() as usize * self.columns as usize + cell.column() as usize)
    }

    /// State of the cell, if it lies inside the grid.
    #[must_use]
    pub fn state(&self, cell: CellCoord) -> Option<u8> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Number of live Moore neighbors, wrapping toroidally on every edge.
    ///
    /// Only cells in state `1` count, so the dying state of multi-state rules
    /// is ignored.
    #[must_use]
    pub fn live_neighbors(&self, cell: CellCoord) -> u8 {
        let column = i64::from(cell.column());
        let row = i64::from(cell.row());
        let mut count = 0;
        for (delta_column, delta_row) in MOORE_OFFSETS {
            let neighbor = BoundaryPolicy::Wrap.resolve(
                column + delta_column,
                row + delta_row,
                self.columns,
                self.rows,
            );
            if self.state(neighbor) == Some(ALIVE) {
                count += 1;
            }
        }
        count
    }

    /// Iterates over every coordinate in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = CellCoord> {
        let columns = self.columns;
        (0..self.rows)
            .flat_map(move |row| (0..columns).map(move |column| CellCoord::new(column, row)))
    }

    /// Number of cells in a non-zero state.
    #[must_use]
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|state| **state != 0).count()
    }
}

/// Owned, cheaply clonable snapshot of a grid generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridSnapshot {
    rows: u32,
    columns: u32,
    cells: Arc<Vec<u8>>,
}

impl GridSnapshot {
    /// Wraps shared cell storage.
    #[must_use]
    pub fn new(rows: u32, columns: u32, cells: Arc<Vec<u8>>) -> Self {
        Self {
            rows,
            columns,
            cells,
        }
    }

    /// Borrows the snapshot as a view.
    #[must_use]
    pub fn view(&self) -> GridView<'_> {
        GridView::new(self.rows, self.columns, &self.cells)
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Shared handle to the cell storage.
    #[must_use]
    pub fn cells(&self) -> &Arc<Vec<u8>> {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::{BoundaryPolicy, GridView};
    use crate::CellCoord;

    #[test]
    fn corner_cell_counts_neighbors_across_every_edge() {
        // 4×4 grid with the three cells diagonally, vertically and
        // horizontally opposite the origin alive.
        let mut cells = vec![0; 16];
        cells[15] = 1; // (3, 3)
        cells[12] = 1; // (0, 3)
        cells[3] = 1; // (3, 0)
        let view = GridView::new(4, 4, &cells);

        assert_eq!(view.live_neighbors(CellCoord::new(0, 0)), 3);
    }

    #[test]
    fn first_row_sees_last_row() {
        let mut cells = vec![0; 9];
        cells[7] = 1; // (1, 2)
        let view = GridView::new(3, 3, &cells);
        assert_eq!(view.live_neighbors(CellCoord::new(1, 0)), 1);
        assert_eq!(view.live_neighbors(CellCoord::new(0, 0)), 1);
    }

    #[test]
    fn dying_cells_are_not_counted() {
        let cells = vec![2, 2, 2, 2, 0, 1, 2, 2, 2];
        let view = GridView::new(3, 3, &cells);
        assert_eq!(view.live_neighbors(CellCoord::new(1, 1)), 1);
    }

    #[test]
    fn out_of_bounds_cells_have_no_state() {
        let cells = vec![0; 6];
        let view = GridView::new(2, 3, &cells);
        assert_eq!(view.state(CellCoord::new(3, 0)), None);
        assert_eq!(view.state(CellCoord::new(0, 2)), None);
        assert_eq!(view.index(CellCoord::new(2, 1)), Some(5));
    }

    #[test]
    fn clamp_policy_sticks_to_edges() {
        let policy = BoundaryPolicy::Clamp;
        assert_eq!(policy.resolve(-1, 4, 10, 5), CellCoord::new(0, 4));
        assert_eq!(policy.resolve(12, -7, 10, 5), CellCoord::new(9, 0));
    }

    #[test]
    fn wrap_policy_connects_opposite_edges() {
        let policy = BoundaryPolicy::Wrap;
        assert_eq!(policy.resolve(-1, 5, 10, 5), CellCoord::new(9, 0));
        assert_eq!(policy.resolve(10, -1, 10, 5), CellCoord::new(0, 4));
    }
}
