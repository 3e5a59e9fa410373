//! Grid module - the playfield occupancy matrix
//!
//! The grid is `width` columns by `height` rows stored as one flat row-major
//! vector (`row * width + col`), row 0 at the top. Dimensions are fixed when
//! the grid is created. Coordinates are signed so that candidate positions
//! left of, right of, or below the field can be asked about directly; those
//! are simply "not placeable".

use log::error;

use crate::error::SnapshotError;
use crate::types::{Cell, CellPos, PieceKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u8,
    height: u8,
    /// Flat array of cells, row-major order
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an empty grid
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
        }
    }

    /// Flat index for (row, col), or None when out of bounds
    #[inline(always)]
    fn index(&self, row: i16, col: i16) -> Option<usize> {
        if !self.is_in_bounds(row, col) {
            return None;
        }
        Some(row as usize * self.width as usize + col as usize)
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn is_in_bounds(&self, row: i16, col: i16) -> bool {
        row >= 0 && col >= 0 && row < self.height as i16 && col < self.width as i16
    }

    /// Cell at (row, col); None if out of bounds
    pub fn get(&self, row: i16, col: i16) -> Option<Cell> {
        self.index(row, col).map(|idx| self.cells[idx])
    }

    /// Overwrite one cell. Returns false if out of bounds.
    pub fn set(&mut self, row: i16, col: i16, cell: Cell) -> bool {
        match self.index(row, col) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// In bounds and filled
    pub fn is_occupied(&self, row: i16, col: i16) -> bool {
        matches!(self.get(row, col), Some(Some(_)))
    }

    /// In bounds and empty
    pub fn is_free(&self, row: i16, col: i16) -> bool {
        matches!(self.get(row, col), Some(None))
    }

    /// True iff every cell is in bounds and empty
    pub fn can_place(&self, cells: &[CellPos]) -> bool {
        cells.iter().all(|&(row, col)| self.is_free(row, col))
    }

    /// Write `kind` into every cell of the set.
    ///
    /// Callers must have checked [`Grid::can_place`]. Debug builds assert it;
    /// release builds skip out-of-bounds cells so nothing outside the grid is
    /// ever touched.
    pub fn commit(&mut self, cells: &[CellPos], kind: PieceKind) {
        debug_assert!(
            self.can_place(cells),
            "commit of {kind:?} at {cells:?} without a successful can_place"
        );

        for &(row, col) in cells {
            match self.index(row, col) {
                Some(idx) => self.cells[idx] = Some(kind),
                None => error!("dropping out-of-bounds block ({row}, {col}) of {kind:?}"),
            }
        }
    }

    /// The cells of one row
    pub fn row(&self, row: usize) -> &[Cell] {
        let width = self.width as usize;
        &self.cells[row * width..(row + 1) * width]
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, row: usize) -> bool {
        row < self.height as usize && self.row(row).iter().all(|cell| cell.is_some())
    }

    /// Indices of all full rows, top to bottom
    pub fn full_rows(&self) -> Vec<usize> {
        (0..self.height as usize)
            .filter(|&row| self.is_row_full(row))
            .collect()
    }

    /// Remove the given rows and compact the stack above them.
    ///
    /// Each surviving row moves down by the number of removed rows below it,
    /// and the vacated rows at the top become empty. Indices may arrive in any
    /// order; duplicates and out-of-range indices are ignored.
    pub fn clear_and_compact(&mut self, rows: &[usize]) {
        let height = self.height as usize;
        let width = self.width as usize;

        let mut removed = vec![false; height];
        for &row in rows {
            if row < height {
                removed[row] = true;
            }
        }

        // Scan bottom to top, copying each kept row to the write cursor
        let mut write_row = height;
        for read_row in (0..height).rev() {
            if removed[read_row] {
                continue;
            }
            write_row -= 1;
            if write_row != read_row {
                let src = read_row * width;
                self.cells.copy_within(src..src + width, write_row * width);
            }
        }

        for cell in &mut self.cells[..write_row * width] {
            *cell = None;
        }
    }

    /// Number of filled cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// All cells, row-major
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Empty the whole grid
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Dump rows as glyph strings (`.` empty, kind letter otherwise)
    pub fn to_rows(&self) -> Vec<String> {
        (0..self.height as usize)
            .map(|row| {
                self.row(row)
                    .iter()
                    .map(|cell| cell.map_or('.', |kind| kind.glyph()))
                    .collect()
            })
            .collect()
    }

    /// Parse rows written by [`Grid::to_rows`]; any non-`.` glyph must be a kind letter
    pub fn from_rows<S: AsRef<str>>(rows: &[S], width: u8) -> Result<Self, SnapshotError> {
        let height = u8::try_from(rows.len()).map_err(|_| SnapshotError::GridShape {
            expected_width: width,
            expected_height: u8::MAX,
        })?;
        let mut grid = Self::new(width, height);

        for (r, text) in rows.iter().enumerate() {
            let text = text.as_ref();
            if text.chars().count() != width as usize {
                return Err(SnapshotError::GridShape {
                    expected_width: width,
                    expected_height: height,
                });
            }
            for (c, glyph) in text.chars().enumerate() {
                let cell = match glyph {
                    '.' => None,
                    other => Some(PieceKind::from_glyph(other).ok_or(
                        SnapshotError::UnknownGlyph {
                            row: r,
                            col: c,
                            glyph: other,
                        },
                    )?),
                };
                grid.cells[r * width as usize + c] = cell;
            }
        }

        Ok(grid)
    }
}
