//! Events emitted by a tick for audio, effects and other fire-and-forget consumers.

use serde::Serialize;

use crate::clear::ClearEvent;
use crate::scoring::ScoreDelta;
use crate::types::{CellPos, PieceKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameEvent {
    Spawned { kind: PieceKind },
    Locked { kind: PieceKind, cells: [CellPos; 4] },
    LinesCleared(ClearEvent),
    Scored(ScoreDelta),
    LevelUp { level: u32 },
    Paused,
    Resumed,
    GameOver { score: u32 },
}
