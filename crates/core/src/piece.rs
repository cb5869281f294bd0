//! Active piece - position, collision and the simplified kick rotation
//!
//! Pieces are plain `Copy` values: every move produces a new value, so the
//! ghost projection and the hold slot never alias the falling piece.
//!
//! Rotation uses a horizontal-only kick list `[-1, +1, -2, +2]`. There are no
//! vertical kicks and no per-transition tables; this is a known simplification
//! of SRS and is kept as-is.

use crate::board::Board;
use crate::shapes::{occupied_cells, Shape, PIVOT};
use crate::types::{PieceKind, Rotation};

/// Horizontal displacements tried, in order, when a rotation is blocked.
pub const KICKS: [i32; 4] = [-1, 1, -2, 2];

/// Local-grid rows above the board a fresh piece starts at.
pub const SPAWN_Y: i32 = -2;

/// The falling piece. `x`/`y` locate the local grid's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivePiece {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i32,
    pub y: i32,
}

impl ActivePiece {
    /// Spawn state: rotation 0, pivot column at board center, above the top edge.
    pub fn spawn(kind: PieceKind, board_width: i32) -> Self {
        Self {
            kind,
            rotation: Rotation::R0,
            x: board_width / 2 - 2,
            y: SPAWN_Y,
        }
    }

    /// Get the local offsets for the current rotation
    pub fn shape(&self) -> Shape {
        occupied_cells(self.kind, self.rotation)
    }

    /// Absolute board coordinates of the four blocks.
    pub fn blocks(&self) -> [(i32, i32); 4] {
        self.shape().map(|(c, r)| (self.x + c, self.y + r))
    }

    /// Board coordinates of the local pivot cell.
    pub fn pivot(&self) -> (i32, i32) {
        (self.x + PIVOT.0, self.y + PIVOT.1)
    }

    /// Check the piece (shifted down by `dy`) against walls, floor and locked cells.
    ///
    /// Rows above the board are only checked against the side walls.
    pub fn is_valid(&self, board: &Board, dy: i32) -> bool {
        self.blocks().iter().all(|&(x, y)| {
            let y = y + dy;
            if x < 0 || x >= board.width() || y >= board.height() {
                return false;
            }
            y < 0 || !board.is_occupied(x, y)
        })
    }

    /// Resting on the floor or on locked cells.
    pub fn is_grounded(&self, board: &Board) -> bool {
        !self.is_valid(board, 1)
    }

    pub fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Same position, next rotation index.
    pub fn rotated(&self) -> Self {
        Self {
            rotation: self.rotation.next(),
            ..*self
        }
    }

    /// Rotate with kicks. Returns the committed piece and the kick applied
    /// (0 for a direct rotation), or `None` when every attempt collides.
    pub fn try_rotate(&self, board: &Board) -> Option<(Self, i32)> {
        let rotated = self.rotated();
        if rotated.is_valid(board, 0) {
            return Some((rotated, 0));
        }

        KICKS.iter().find_map(|&kick| {
            let kicked = rotated.shifted(kick, 0);
            kicked.is_valid(board, 0).then_some((kicked, kick))
        })
    }

    /// Rows the piece can fall before it would collide.
    pub fn drop_distance(&self, board: &Board) -> i32 {
        let mut distance = 0;
        while self.is_valid(board, distance + 1) {
            distance += 1;
        }
        distance
    }

    /// Ghost projection: the y this piece would land at.
    pub fn landing_y(&self, board: &Board) -> i32 {
        self.y + self.drop_distance(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> Board {
        Board::new(10, 20)
    }

    #[test]
    fn spawn_centers_the_pivot() {
        let piece = ActivePiece::spawn(PieceKind::T, 10);
        assert_eq!(piece.x, 3);
        assert_eq!(piece.y, -2);
        assert_eq!(piece.pivot(), (5, -1));
        assert!(piece.is_valid(&board(), 0));
    }

    #[test]
    fn blocks_translate_local_offsets() {
        let piece = ActivePiece {
            kind: PieceKind::O,
            rotation: Rotation::R0,
            x: 2,
            y: 5,
        };
        assert_eq!(piece.blocks(), [(3, 6), (4, 6), (3, 7), (4, 7)]);
    }

    #[test]
    fn rows_above_board_only_check_walls() {
        let b = board();
        let high = ActivePiece {
            kind: PieceKind::I,
            rotation: Rotation::R0,
            x: 3,
            y: -6,
        };
        assert!(high.is_valid(&b, 0));

        // I in state 1 spans local columns 0..=3; x = -1 puts a block at column -1.
        let outside = ActivePiece {
            kind: PieceKind::I,
            rotation: Rotation::R1,
            x: -1,
            y: -6,
        };
        assert!(!outside.is_valid(&b, 0));
    }

    #[test]
    fn floor_and_locked_cells_collide() {
        let mut b = board();
        let piece = ActivePiece {
            kind: PieceKind::O,
            rotation: Rotation::R0,
            x: 0,
            y: 17,
        };
        // Blocks on rows 18 and 19.
        assert!(piece.is_valid(&b, 0));
        assert!(piece.is_grounded(&b));
        assert!(!piece.is_valid(&b, 1));

        b.set(1, 18, Some(PieceKind::Z));
        assert!(!piece.is_valid(&b, 0));
    }

    #[test]
    fn four_unobstructed_rotations_return_to_start() {
        let b = board();
        for kind in PieceKind::ALL {
            let start = ActivePiece {
                kind,
                rotation: Rotation::R0,
                x: 3,
                y: 5,
            };
            let mut piece = start;
            for _ in 0..4 {
                let (next, kick) = piece.try_rotate(&b).expect("open board");
                assert_eq!(kick, 0);
                piece = next;
            }
            assert_eq!(piece, start);
        }
    }

    #[test]
    fn rotation_against_left_wall_kicks_right() {
        let b = board();
        // I state 0 is a vertical bar in local column 2; at x = -2 it hugs column 0.
        let piece = ActivePiece {
            kind: PieceKind::I,
            rotation: Rotation::R0,
            x: -2,
            y: 5,
        };
        assert!(piece.is_valid(&b, 0));

        // State 1 spans local columns 0..=3, i.e. board columns -2..=1.
        // -1 fails, +1 still leaves column -1, -2 fails, +2 fits.
        let (rotated, kick) = piece.try_rotate(&b).unwrap();
        assert_eq!(kick, 2);
        assert_eq!(rotated.rotation, Rotation::R1);
        assert_eq!(rotated.x, 0);
    }

    #[test]
    fn blocked_rotation_reports_none() {
        let mut b = Board::new(3, 20);
        // Narrow well: a horizontal I can never fit in 3 columns.
        let piece = ActivePiece {
            kind: PieceKind::I,
            rotation: Rotation::R0,
            x: -1,
            y: 5,
        };
        assert!(piece.is_valid(&b, 0));
        assert!(piece.try_rotate(&b).is_none());

        b.set(0, 0, Some(PieceKind::O));
        assert!(piece.try_rotate(&b).is_none());
    }

    #[test]
    fn landing_y_projects_to_floor() {
        let b = board();
        let piece = ActivePiece::spawn(PieceKind::O, 10);
        // O occupies local rows 1..=2, so it rests with y + 2 == 19.
        assert_eq!(piece.landing_y(&b), 17);
        assert_eq!(piece.drop_distance(&b), 19);
    }
}
