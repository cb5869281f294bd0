//! Shape table - occupied cells of every piece kind and rotation
//!
//! Every rotation state is drawn inside the same 5x5 local grid so all kinds
//! share one pivot geometry regardless of their true bounding box. Offsets
//! are `(col, row)` with row growing downward.

use crate::types::{PieceKind, Rotation};

/// Offset of a single mino inside the local grid
pub type LocalOffset = (i32, i32);

/// Shape of a piece - 4 mino offsets inside the local grid
pub type Shape = [LocalOffset; 4];

/// Local-grid cell used as the T piece pivot for corner checks.
pub const PIVOT: LocalOffset = (2, 1);

/// Get the occupied local cells for a piece kind and rotation
pub fn occupied_cells(kind: PieceKind, rotation: Rotation) -> Shape {
    rotations(kind)[rotation.index()]
}

/// All four rotation states of a kind, indexed by rotation.
pub fn rotations(kind: PieceKind) -> &'static [Shape; 4] {
    match kind {
        PieceKind::I => &I_SHAPES,
        PieceKind::O => &O_SHAPES,
        PieceKind::T => &T_SHAPES,
        PieceKind::S => &S_SHAPES,
        PieceKind::Z => &Z_SHAPES,
        PieceKind::J => &J_SHAPES,
        PieceKind::L => &L_SHAPES,
    }
}

const I_SHAPES: [Shape; 4] = [
    [(2, 1), (2, 2), (2, 3), (2, 4)],
    [(0, 2), (1, 2), (2, 2), (3, 2)],
    [(1, 0), (1, 1), (1, 2), (1, 3)],
    [(1, 2), (2, 2), (3, 2), (4, 2)],
];

// Same cells in every state.
const O_SHAPES: [Shape; 4] = [[(1, 1), (2, 1), (1, 2), (2, 2)]; 4];

const T_SHAPES: [Shape; 4] = [
    [(2, 1), (1, 2), (2, 2), (3, 2)],
    [(2, 1), (2, 2), (3, 2), (2, 3)],
    [(1, 2), (2, 2), (3, 2), (2, 3)],
    [(2, 1), (1, 2), (2, 2), (2, 3)],
];

// S and Z alternate between two states.
const S_SHAPES: [Shape; 4] = [
    [(2, 1), (3, 1), (1, 2), (2, 2)],
    [(1, 1), (1, 2), (2, 2), (2, 3)],
    [(2, 1), (3, 1), (1, 2), (2, 2)],
    [(1, 1), (1, 2), (2, 2), (2, 3)],
];

const Z_SHAPES: [Shape; 4] = [
    [(1, 1), (2, 1), (2, 2), (3, 2)],
    [(2, 1), (1, 2), (2, 2), (1, 3)],
    [(1, 1), (2, 1), (2, 2), (3, 2)],
    [(2, 1), (1, 2), (2, 2), (1, 3)],
];

const J_SHAPES: [Shape; 4] = [
    [(1, 1), (1, 2), (2, 2), (3, 2)],
    [(2, 1), (3, 1), (2, 2), (2, 3)],
    [(1, 2), (2, 2), (3, 2), (3, 3)],
    [(2, 1), (2, 2), (1, 3), (2, 3)],
];

const L_SHAPES: [Shape; 4] = [
    [(3, 1), (1, 2), (2, 2), (3, 2)],
    [(2, 1), (2, 2), (2, 3), (3, 3)],
    [(1, 2), (2, 2), (3, 2), (1, 3)],
    [(1, 1), (2, 1), (2, 2), (2, 3)],
];
