//! Snapshots handed to collaborators.
//!
//! [`RenderSnapshot`] is the per-tick read-only view for the renderer: plain
//! owned data, no references into the live session. [`SessionSnapshot`] is
//! the persistence format used for pause/resume; it is an internal contract
//! guarded by [`SNAPSHOT_VERSION`] and is not meant to be stable across
//! versions.

use serde::{Deserialize, Serialize};

use crate::config::RuleConfig;
use crate::error::SnapshotError;
use crate::game_state::GameStatus;
use crate::piece::ActivePiece;
use crate::rng::BagState;
use crate::scoring::ScoreState;
use crate::types::{Cell, CellPos, PieceKind, Rotation};

/// Bumped whenever the session snapshot layout changes
pub const SNAPSHOT_VERSION: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ActiveView {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub cells: [CellPos; 4],
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RenderSnapshot {
    pub width: u8,
    pub height: u8,
    /// Locked cells, row-major
    pub cells: Vec<Cell>,
    pub active: Option<ActiveView>,
    /// Where the active piece would land
    pub ghost: Option<[CellPos; 4]>,
    pub next: Vec<PieceKind>,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub combo: u32,
    pub status: GameStatus,
    pub tick: u64,
}

impl RenderSnapshot {
    /// Locked cell at (row, col); None when out of bounds
    pub fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        if row >= self.height as usize || col >= self.width as usize {
            return None;
        }
        self.cells.get(row * self.width as usize + col).copied()
    }

    pub fn playable(&self) -> bool {
        self.status == GameStatus::Running
    }
}

/// Active piece as persisted, including its lock progress.
///
/// The falling/locking phase is not stored; it follows from the grid on restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedPiece {
    #[serde(flatten)]
    pub piece: ActivePiece,
    pub lock_timer_ms: u32,
    pub lock_resets: u8,
    /// Deepest row reached; falling back to it does not restart the lock timer
    pub lowest_row: i16,
}

/// Everything needed to resume an identical session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub version: u32,
    pub seed: u32,
    pub config: RuleConfig,
    pub status: GameStatus,
    /// Grid rows top to bottom, `.` for empty and the kind glyph otherwise
    pub grid: Vec<String>,
    pub active: Option<SavedPiece>,
    pub gravity_timer_ms: u32,
    pub bag: BagState,
    pub score: ScoreState,
    pub tick: u64,
}

impl SessionSnapshot {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and check the version; structural validation happens on restore
    pub fn from_json(text: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(text)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::Version {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        Ok(snapshot)
    }
}
