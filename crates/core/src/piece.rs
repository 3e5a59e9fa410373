//! Active piece controller
//!
//! Tracks the falling piece (kind, rotation, pivot) and validates every move
//! against the grid. A move or rotation either fully succeeds or leaves the
//! piece untouched. The controller also owns the per-piece lock state: once
//! the piece is grounded it is `Locking`, and the lock timer decides when the
//! session commits it.

use serde::{Deserialize, Serialize};

use crate::catalog::{self, KickPolicy};
use crate::grid::Grid;
use crate::types::{CellPos, MoveDirection, PieceKind, RotateDirection, Rotation};

/// The falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActivePiece {
    pub kind: PieceKind,
    pub rotation: Rotation,
    /// Pivot row (top of the bounding box)
    pub row: i16,
    /// Pivot column (left of the bounding box)
    pub col: i16,
}

impl ActivePiece {
    /// A piece of `kind` at its spawn pivot for a grid of `width` columns
    pub fn spawned(kind: PieceKind, width: u8) -> Self {
        let (row, col) = catalog::spawn_pivot(kind, width);
        Self {
            kind,
            rotation: Rotation::North,
            row,
            col,
        }
    }

    /// Absolute cells occupied by the piece
    pub fn cells(&self) -> [CellPos; 4] {
        catalog::place(catalog::shape(self.kind, self.rotation), (self.row, self.col))
    }

    /// The same piece shifted by (rows, cols)
    fn shifted(&self, rows: i16, cols: i16) -> Self {
        Self {
            row: self.row + rows,
            col: self.col + cols,
            ..*self
        }
    }

    pub fn fits(&self, grid: &Grid) -> bool {
        grid.can_place(&self.cells())
    }
}

/// Lifecycle of the current piece between spawn and lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PiecePhase {
    /// Airborne; gravity moves it down
    #[default]
    Falling,
    /// Resting on the stack or floor; the lock timer is running
    Locking,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceController {
    active: Option<ActivePiece>,
    phase: PiecePhase,
    lock_timer_ms: u32,
    lock_resets: u8,
    /// Deepest pivot row this piece has reached
    lowest_row: i16,
    kick_policy: KickPolicy,
    lock_reset_limit: u8,
}

impl PieceController {
    pub fn new(kick_policy: KickPolicy, lock_reset_limit: u8) -> Self {
        Self {
            active: None,
            phase: PiecePhase::Falling,
            lock_timer_ms: 0,
            lock_resets: 0,
            lowest_row: 0,
            kick_policy,
            lock_reset_limit,
        }
    }

    pub fn active(&self) -> Option<ActivePiece> {
        self.active
    }

    pub fn phase(&self) -> PiecePhase {
        self.phase
    }

    pub fn lock_timer_ms(&self) -> u32 {
        self.lock_timer_ms
    }

    pub fn lock_resets(&self) -> u8 {
        self.lock_resets
    }

    pub fn lowest_row(&self) -> i16 {
        self.lowest_row
    }

    /// Place a new piece of `kind` at its spawn pivot.
    ///
    /// Returns false, leaving no active piece, when the spawn cells are not
    /// placeable. That is the game-over condition.
    pub fn spawn(&mut self, kind: PieceKind, grid: &Grid) -> bool {
        let piece = ActivePiece::spawned(kind, grid.width());
        self.lock_timer_ms = 0;
        self.lock_resets = 0;
        self.phase = PiecePhase::Falling;

        if !piece.fits(grid) {
            self.active = None;
            return false;
        }

        self.active = Some(piece);
        self.lowest_row = piece.row;
        self.refresh_phase(grid);
        true
    }

    /// Install a piece restored from a snapshot. The caller has checked that it fits.
    pub(crate) fn restore(
        &mut self,
        piece: ActivePiece,
        lock_timer_ms: u32,
        lock_resets: u8,
        lowest_row: i16,
        grid: &Grid,
    ) {
        self.active = Some(piece);
        self.lock_timer_ms = lock_timer_ms;
        self.lock_resets = lock_resets.min(self.lock_reset_limit);
        self.lowest_row = lowest_row.max(piece.row);
        self.refresh_phase(grid);
    }

    /// Shift the piece one cell. No partial moves: failure changes nothing.
    pub fn try_move(&mut self, direction: MoveDirection, grid: &Grid) -> bool {
        let Some(active) = self.active else {
            return false;
        };

        let (dr, dc) = direction.delta();
        let candidate = active.shifted(dr, dc);
        if !candidate.fits(grid) {
            return false;
        }

        self.active = Some(candidate);
        if direction != MoveDirection::Down {
            self.note_grounded_adjustment();
        } else if candidate.row > self.lowest_row {
            // A new low point earns a fresh lock timer without spending a reset.
            // Falling back to a row already reached (after a kick lifted the
            // piece) keeps the running timer.
            self.lowest_row = candidate.row;
            self.lock_timer_ms = 0;
        }
        self.refresh_phase(grid);
        true
    }

    /// Rotate one step, trying the kick offsets in order and taking the first fit.
    pub fn try_rotate(&mut self, direction: RotateDirection, grid: &Grid) -> bool {
        let Some(active) = self.active else {
            return false;
        };

        let rotation = active.rotation.rotate(direction);
        let kicks = catalog::kick_offsets(active.kind, active.rotation, direction, self.kick_policy);

        let Some(rotated) = kicks
            .iter()
            .map(|&(dr, dc)| ActivePiece {
                rotation,
                ..active.shifted(dr as i16, dc as i16)
            })
            .find(|candidate| candidate.fits(grid))
        else {
            return false;
        };

        self.active = Some(rotated);
        self.note_grounded_adjustment();
        self.refresh_phase(grid);
        true
    }

    /// True iff a downward move would fail
    pub fn is_grounded(&self, grid: &Grid) -> bool {
        match self.active {
            Some(piece) => !piece.shifted(1, 0).fits(grid),
            None => false,
        }
    }

    /// Rows the piece can fall before it is grounded
    pub fn drop_distance(&self, grid: &Grid) -> i16 {
        let Some(active) = self.active else {
            return 0;
        };

        let mut distance = 0;
        while active.shifted(distance + 1, 0).fits(grid) {
            distance += 1;
        }
        distance
    }

    /// Cells of the piece at its landing position
    pub fn ghost_cells(&self, grid: &Grid) -> Option<[CellPos; 4]> {
        let active = self.active?;
        Some(active.shifted(self.drop_distance(grid), 0).cells())
    }

    /// Move straight down to the landing row. Returns the rows travelled.
    pub fn hard_drop(&mut self, grid: &Grid) -> u32 {
        let distance = self.drop_distance(grid);
        if let Some(active) = self.active {
            let landed = active.shifted(distance, 0);
            self.active = Some(landed);
            self.lowest_row = self.lowest_row.max(landed.row);
            self.refresh_phase(grid);
        }
        distance as u32
    }

    /// Advance the lock timer by `elapsed_ms`; true once `lock_delay_ms` is reached
    pub fn advance_lock_timer(&mut self, elapsed_ms: u32, lock_delay_ms: u32) -> bool {
        self.lock_timer_ms = self.lock_timer_ms.saturating_add(elapsed_ms);
        self.lock_timer_ms >= lock_delay_ms
    }

    /// Absolute cells and kind of the active piece, for commit into the grid
    pub fn materialize(&self) -> Option<([CellPos; 4], PieceKind)> {
        self.active.map(|piece| (piece.cells(), piece.kind))
    }

    /// End the piece's life: returns its cells and kind and clears the slot
    pub fn take_locked(&mut self) -> Option<([CellPos; 4], PieceKind)> {
        let locked = self.materialize();
        self.active = None;
        self.phase = PiecePhase::Falling;
        self.lock_timer_ms = 0;
        self.lock_resets = 0;
        self.lowest_row = 0;
        locked
    }

    pub fn clear(&mut self) {
        self.take_locked();
    }

    /// Sideways moves and rotations while grounded buy back lock time, up to the limit
    fn note_grounded_adjustment(&mut self) {
        if self.phase == PiecePhase::Locking && self.lock_resets < self.lock_reset_limit {
            self.lock_timer_ms = 0;
            self.lock_resets += 1;
        }
    }

    fn refresh_phase(&mut self, grid: &Grid) {
        self.phase = if self.is_grounded(grid) {
            PiecePhase::Locking
        } else {
            PiecePhase::Falling
        };
    }
}
