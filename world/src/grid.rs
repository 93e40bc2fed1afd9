use std::sync::Arc;

use sim_garden_core::{CellCoord, GridSnapshot, GridView};

/// Dense row-major cell storage with immutable dimensions.
///
/// Cells live behind an [`Arc`] so snapshots handed to background workers
/// share the buffer. Edits copy the buffer first when a snapshot is still
/// alive, which keeps every handed-out generation immutable.
#[derive(Clone, Debug)]
pub(crate) struct Grid {
    rows: u32,
    columns: u32,
    states: u8,
    cells: Arc<Vec<u8>>,
}

impl Grid {
    pub(crate) fn new(rows: u32, columns: u32, states: u8) -> Self {
        let rows = rows.max(1);
        let columns = columns.max(1);
        Self {
            rows,
            columns,
            states: states.max(2),
            cells: Arc::new(vec![0; rows as usize * columns as usize]),
        }
    }

    pub(crate) const fn rows(&self) -> u32 {
        self.rows
    }

    pub(crate) const fn columns(&self) -> u32 {
        self.columns
    }

    pub(crate) const fn states(&self) -> u8 {
        self.states
    }

    pub(crate) fn len(&self) -> usize {
        self.cells.len()
    }

    pub(crate) fn view(&self) -> GridView<'_> {
        GridView::new(self.rows, self.columns, &self.cells)
    }

    pub(crate) fn snapshot(&self) -> GridSnapshot {
        GridSnapshot::new(self.rows, self.columns, Arc::clone(&self.cells))
    }

    /// Stores `state` in the cell, reducing it into the grid's alphabet.
    pub(crate) fn set(&mut self, cell: CellCoord, state: u8) -> bool {
        let Some(index) = self.view().index(cell) else {
            return false;
        };
        let state = state % self.states;
        Arc::make_mut(&mut self.cells)[index] = state;
        true
    }

    /// Flips the cell between dead and alive; any non-zero state becomes dead.
    pub(crate) fn toggle(&mut self, cell: CellCoord) -> Option<u8> {
        let current = self.view().state(cell)?;
        let next = if current == 0 { 1 } else { 0 };
        let _ = self.set(cell, next);
        Some(next)
    }

    /// Swaps in a whole generation. Rejects buffers of the wrong length.
    pub(crate) fn replace(&mut self, cells: Vec<u8>) -> bool {
        if cells.len() != self.len() {
            return false;
        }
        self.cells = Arc::new(cells);
        true
    }
}
