//! Line-clear and gravity engine
//!
//! Resolution runs to completion in one call: every full row is found,
//! removed, and the stack above is compacted before the next piece spawns.

use serde::Serialize;

use crate::grid::Grid;

/// Rows removed by one resolution pass, top to bottom
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ClearEvent {
    pub rows: Vec<usize>,
}

impl ClearEvent {
    /// Number of rows removed
    pub fn count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Clear every full row of `grid` and report which rows went
pub fn resolve(grid: &mut Grid) -> ClearEvent {
    let rows = grid.full_rows();
    if rows.is_empty() {
        return ClearEvent::default();
    }

    grid.clear_and_compact(&rows);
    ClearEvent { rows }
}
