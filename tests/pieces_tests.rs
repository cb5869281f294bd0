//! Shape table and rotation tests through the public facade.

use std::collections::HashSet;

use blockfall::core::shapes::{occupied_cells, rotations};
use blockfall::core::{ActivePiece, Board, KICKS};
use blockfall::types::{PieceKind, Rotation, LOCAL_GRID};

const ROTATIONS: [Rotation; 4] = [Rotation::R0, Rotation::R1, Rotation::R2, Rotation::R3];

fn piece(kind: PieceKind, rotation: Rotation, x: i32, y: i32) -> ActivePiece {
    ActivePiece {
        kind,
        rotation,
        x,
        y,
    }
}

// ============== Shape Tests ==============

#[test]
fn test_all_shapes_have_4_distinct_cells() {
    for kind in PieceKind::ALL {
        for rotation in ROTATIONS {
            let cells: HashSet<_> = occupied_cells(kind, rotation).into_iter().collect();
            assert_eq!(cells.len(), 4, "{kind:?} {rotation:?}");
        }
    }
}

#[test]
fn test_shapes_stay_inside_local_grid() {
    for kind in PieceKind::ALL {
        for shape in rotations(kind) {
            for (col, row) in shape {
                assert!((0..LOCAL_GRID).contains(col), "{kind:?} col {col}");
                assert!((0..LOCAL_GRID).contains(row), "{kind:?} row {row}");
            }
        }
    }
}

#[test]
fn test_o_piece_is_rotation_invariant() {
    let r0 = occupied_cells(PieceKind::O, Rotation::R0);
    for rotation in ROTATIONS {
        assert_eq!(occupied_cells(PieceKind::O, rotation), r0);
    }
}

#[test]
fn test_t_piece_shapes() {
    assert_eq!(
        occupied_cells(PieceKind::T, Rotation::R0),
        [(2, 1), (1, 2), (2, 2), (3, 2)]
    );
    assert_eq!(
        occupied_cells(PieceKind::T, Rotation::R2),
        [(1, 2), (2, 2), (3, 2), (2, 3)]
    );
}

#[test]
fn test_spawn_shape_covers_center_cell() {
    for kind in PieceKind::ALL {
        assert!(
            occupied_cells(kind, Rotation::R0).contains(&(2, 2)),
            "{kind:?} spawn shape misses the center cell"
        );
    }
}

// ============== Spawn Tests ==============

#[test]
fn test_spawn_position() {
    for kind in PieceKind::ALL {
        let p = ActivePiece::spawn(kind, 10);
        assert_eq!((p.x, p.y, p.rotation), (3, -2, Rotation::R0));
        // Every spawn occupies the top-center board cell.
        assert!(p.blocks().contains(&(5, 0)), "{kind:?}");
    }
}

#[test]
fn test_spawn_blocked_by_stack() {
    let mut board = Board::new(10, 20);
    board.set(5, 0, Some(PieceKind::J));
    for kind in PieceKind::ALL {
        assert!(!ActivePiece::spawn(kind, 10).is_valid(&board, 0));
    }
}

// ============== Rotation Tests ==============

#[test]
fn test_rotation_cycles_clockwise() {
    assert_eq!(Rotation::R0.next(), Rotation::R1);
    assert_eq!(Rotation::R3.next(), Rotation::R0);
    for (i, rotation) in ROTATIONS.into_iter().enumerate() {
        assert_eq!(rotation.index(), i);
        assert_eq!(Rotation::from_index(i + 4), rotation);
    }
}

#[test]
fn test_rotation_without_kick() {
    let board = Board::new(10, 20);
    let (rotated, kick) = piece(PieceKind::T, Rotation::R0, 3, 5)
        .try_rotate(&board)
        .expect("open board");
    assert_eq!(kick, 0);
    assert_eq!((rotated.x, rotated.y, rotated.rotation), (3, 5, Rotation::R1));
}

#[test]
fn test_i_rotation_kicks_off_left_wall() {
    let board = Board::new(10, 20);
    // Vertical I hugging the left wall; the horizontal state needs 4 columns.
    let start = piece(PieceKind::I, Rotation::R0, -2, 5);
    assert!(start.is_valid(&board, 0));

    let (rotated, kick) = start.try_rotate(&board).expect("kick succeeds");
    assert_eq!(kick, 2);
    assert_eq!(rotated.x, 0);
    assert_eq!(rotated.rotation, Rotation::R1);
}

#[test]
fn test_i_rotation_kicks_off_right_wall() {
    let board = Board::new(10, 20);
    let start = piece(PieceKind::I, Rotation::R0, 7, 5);
    assert!(start.is_valid(&board, 0));

    let (rotated, kick) = start.try_rotate(&board).expect("kick succeeds");
    assert_eq!(kick, -1);
    assert_eq!(rotated.x, 6);
}

#[test]
fn test_rotation_failure_leaves_piece() {
    // Fill everything except the T's own cells.
    let mut board = Board::new(10, 20);
    let t = piece(PieceKind::T, Rotation::R0, 3, 15);
    let own = t.blocks();
    for y in 0..20 {
        for x in 0..10 {
            if !own.contains(&(x, y)) {
                board.set(x, y, Some(PieceKind::Z));
            }
        }
    }
    assert!(t.is_valid(&board, 0));
    assert!(t.try_rotate(&board).is_none());
}

#[test]
fn test_kick_table_order() {
    assert_eq!(KICKS, [-1, 1, -2, 2]);
}

#[test]
fn test_ghost_lands_on_stack() {
    let mut board = Board::new(10, 20);
    for x in 0..10 {
        board.set(x, 19, Some(PieceKind::L));
    }
    let p = ActivePiece::spawn(PieceKind::O, 10);
    // O occupies local rows 1..=2, so it rests with its lower row on 18.
    assert_eq!(p.landing_y(&board), 18 - 2);
    assert_eq!(p.drop_distance(&board), 16 - p.y);
}
