//! Piece catalog - immutable shape and rotation tables
//!
//! Every kind has four precomputed rotation states stored in one static table
//! indexed by `[kind][rotation]`. Offsets are `(row, col)` relative to the
//! pivot, which is the top-left corner of the kind's bounding box (4x4 for I,
//! 3x3 for J/L/S/T/Z, the O box is padded to 4 wide so it spawns centered).
//!
//! Wall kicks follow SRS (https://tetris.wiki/SRS), converted to row-down
//! coordinates: an SRS kick of `(x, y)` becomes `(-y, x)` here.

use serde::{Deserialize, Serialize};

use crate::types::{CellPos, PieceKind, RotateDirection, Rotation};

/// Offset of a single block relative to the piece pivot as (row, col)
pub type CellOffset = (i8, i8);

/// Shape of a piece in one rotation state - 4 block offsets from the pivot
pub type PieceShape = [CellOffset; 4];

/// All four rotation states of one kind, indexed by [`Rotation::index`]
pub type RotationStates = [PieceShape; 4];

/// Kick candidates for one rotation transition, tried in order
pub type KickList = [CellOffset; 5];

/// Kick table indexed by `[from_rotation][direction]` (0 = cw, 1 = ccw)
pub type KickTable = [[KickList; 2]; 4];

/// Which fallback offsets a rotation may try
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KickPolicy {
    /// Rotate in place only
    None,
    /// SRS kick tables
    #[default]
    Srs,
}

#[rustfmt::skip]
static SHAPES: [RotationStates; PieceKind::COUNT] = [
    // I
    [
        [(1, 0), (1, 1), (1, 2), (1, 3)],
        [(0, 2), (1, 2), (2, 2), (3, 2)],
        [(2, 0), (2, 1), (2, 2), (2, 3)],
        [(0, 1), (1, 1), (2, 1), (3, 1)],
    ],
    // O
    [
        [(0, 1), (0, 2), (1, 1), (1, 2)],
        [(0, 1), (0, 2), (1, 1), (1, 2)],
        [(0, 1), (0, 2), (1, 1), (1, 2)],
        [(0, 1), (0, 2), (1, 1), (1, 2)],
    ],
    // T
    [
        [(0, 1), (1, 0), (1, 1), (1, 2)],
        [(0, 1), (1, 1), (1, 2), (2, 1)],
        [(1, 0), (1, 1), (1, 2), (2, 1)],
        [(0, 1), (1, 0), (1, 1), (2, 1)],
    ],
    // S
    [
        [(0, 1), (0, 2), (1, 0), (1, 1)],
        [(0, 1), (1, 1), (1, 2), (2, 2)],
        [(1, 1), (1, 2), (2, 0), (2, 1)],
        [(0, 0), (1, 0), (1, 1), (2, 1)],
    ],
    // Z
    [
        [(0, 0), (0, 1), (1, 1), (1, 2)],
        [(0, 2), (1, 1), (1, 2), (2, 1)],
        [(1, 0), (1, 1), (2, 1), (2, 2)],
        [(0, 1), (1, 0), (1, 1), (2, 0)],
    ],
    // J
    [
        [(0, 0), (1, 0), (1, 1), (1, 2)],
        [(0, 1), (0, 2), (1, 1), (2, 1)],
        [(1, 0), (1, 1), (1, 2), (2, 2)],
        [(0, 1), (1, 1), (2, 0), (2, 1)],
    ],
    // L
    [
        [(0, 2), (1, 0), (1, 1), (1, 2)],
        [(0, 1), (1, 1), (2, 1), (2, 2)],
        [(1, 0), (1, 1), (1, 2), (2, 0)],
        [(0, 0), (0, 1), (1, 1), (2, 1)],
    ],
];

/// O never needs to move when it rotates
const O_KICKS: KickTable = [[[(0, 0); 5]; 2]; 4];

/// Shared by J, L, S, T, Z
#[rustfmt::skip]
const JLSTZ_KICKS: KickTable = [
    // North: ->East, ->West
    [
        [(0, 0), (0, -1), (-1, -1), (2, 0), (2, -1)],
        [(0, 0), (0, 1), (-1, 1), (2, 0), (2, 1)],
    ],
    // East: ->South, ->North
    [
        [(0, 0), (0, 1), (1, 1), (-2, 0), (-2, 1)],
        [(0, 0), (0, 1), (1, 1), (-2, 0), (-2, 1)],
    ],
    // South: ->West, ->East
    [
        [(0, 0), (0, 1), (-1, 1), (2, 0), (2, 1)],
        [(0, 0), (0, -1), (-1, -1), (2, 0), (2, -1)],
    ],
    // West: ->North, ->South
    [
        [(0, 0), (0, -1), (1, -1), (-2, 0), (-2, -1)],
        [(0, 0), (0, -1), (1, -1), (-2, 0), (-2, -1)],
    ],
];

#[rustfmt::skip]
const I_KICKS: KickTable = [
    // North: ->East, ->West
    [
        [(0, 0), (0, -2), (0, 1), (1, -2), (-2, 1)],
        [(0, 0), (0, -1), (0, 2), (-2, -1), (1, 2)],
    ],
    // East: ->South, ->North
    [
        [(0, 0), (0, -1), (0, 2), (-2, -1), (1, 2)],
        [(0, 0), (0, 2), (0, -1), (-1, 2), (2, -1)],
    ],
    // South: ->West, ->East
    [
        [(0, 0), (0, 2), (0, -1), (-1, 2), (2, -1)],
        [(0, 0), (0, 1), (0, -2), (2, 1), (-1, -2)],
    ],
    // West: ->North, ->South
    [
        [(0, 0), (0, 1), (0, -2), (2, 1), (-1, -2)],
        [(0, 0), (0, -2), (0, 1), (1, -2), (-2, 1)],
    ],
];

/// Kicks used when the policy is [`KickPolicy::None`]: only the in-place test
const NO_KICKS: [CellOffset; 1] = [(0, 0)];

/// All rotation states for a kind
pub fn rotation_states(kind: PieceKind) -> &'static RotationStates {
    &SHAPES[kind.index()]
}

/// Shape of a kind in one rotation state
pub fn shape(kind: PieceKind, rotation: Rotation) -> &'static PieceShape {
    &SHAPES[kind.index()][rotation.index()]
}

/// SRS kick table for a kind
pub fn kick_table(kind: PieceKind) -> &'static KickTable {
    match kind {
        PieceKind::O => &O_KICKS,
        PieceKind::I => &I_KICKS,
        _ => &JLSTZ_KICKS,
    }
}

/// Ordered pivot offsets to try when rotating from `from` in `direction`
pub fn kick_offsets(
    kind: PieceKind,
    from: Rotation,
    direction: RotateDirection,
    policy: KickPolicy,
) -> &'static [CellOffset] {
    match policy {
        KickPolicy::None => &NO_KICKS,
        KickPolicy::Srs => {
            let dir = match direction {
                RotateDirection::Clockwise => 0,
                RotateDirection::CounterClockwise => 1,
            };
            &kick_table(kind)[from.index()][dir]
        }
    }
}

/// Spawn pivot for a kind on a grid of the given width: top row, box centered
pub fn spawn_pivot(_kind: PieceKind, width: u8) -> CellPos {
    (0, (width as i16 - 4) / 2)
}

/// Absolute cells of a shape placed at `pivot`
pub fn place(shape: &PieceShape, pivot: CellPos) -> [CellPos; 4] {
    (*shape).map(|(dr, dc)| (pivot.0 + dr as i16, pivot.1 + dc as i16))
}
