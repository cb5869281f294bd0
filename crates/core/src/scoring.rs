//! Scoring module - T-Spin detection, clear scoring and level progression
//!
//! Rules:
//! - A T-Spin is only considered for a T piece whose last committed move was
//!   a rotation, and is evaluated before the piece is written to the board.
//! - The clear kind is looked up in the configured [`ScoreTable`]; difficult
//!   clears (Tetris, any T-Spin) get the back-to-back multiplier when the
//!   streak is already active.
//! - Points are `floor(adjusted_base * level)` using the level in effect
//!   before this clear's lines are counted.
//! - Level is `lines / 10 + 1` clamped to the max level and never decreases.

use blockfall_config::ScoreTable;

use crate::board::Board;
use crate::piece::ActivePiece;
use crate::types::{ClearKind, PieceKind, Rotation, TSpinKind};

const TOP_LEFT: usize = 0;
const TOP_RIGHT: usize = 1;
const BOTTOM_LEFT: usize = 2;
const BOTTOM_RIGHT: usize = 3;

/// Points, lines and streak of one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreState {
    pub score: u32,
    pub lines: u32,
    pub level: u32,
    pub back_to_back: bool,
}

impl ScoreState {
    pub fn new(start_level: u32) -> Self {
        Self {
            score: 0,
            lines: 0,
            level: start_level.max(1),
            back_to_back: false,
        }
    }

    /// Add drop points (soft drop 1 per row, hard drop 2 per row).
    pub fn add_drop(&mut self, rows: u32, hard: bool) {
        self.score = self.score.saturating_add(calculate_drop_score(rows, hard));
    }

    /// Score one lock. `lines` is the number of rows the lock just cleared.
    pub fn award_clear(
        &mut self,
        table: &ScoreTable,
        tspin: TSpinKind,
        lines: usize,
        max_level: u32,
    ) -> ScoreResult {
        let clear = ClearKind::classify(tspin, lines);

        let mut b2b_applied = false;
        let points = match clear {
            Some(kind) => {
                b2b_applied = kind.is_difficult() && self.back_to_back;
                let multiplier = if b2b_applied {
                    table.back_to_back_multiplier
                } else {
                    1.0
                };
                clear_points(table.base(kind), multiplier, self.level)
            }
            None => 0,
        };

        self.score = self.score.saturating_add(points);

        match clear {
            Some(kind) if kind.is_difficult() => self.back_to_back = true,
            Some(_) if lines > 0 => self.back_to_back = false,
            _ => {}
        }

        self.lines = self.lines.saturating_add(lines as u32);
        self.level = self.level.max(calculate_level(self.lines).min(max_level));

        ScoreResult {
            clear,
            lines: lines as u32,
            points,
            b2b_applied,
            back_to_back: self.back_to_back,
        }
    }
}

impl Default for ScoreState {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Outcome of scoring one lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    pub clear: Option<ClearKind>,
    pub lines: u32,
    pub points: u32,
    /// Whether the back-to-back multiplier was applied to this clear.
    pub b2b_applied: bool,
    /// Streak state after this clear.
    pub back_to_back: bool,
}

/// floor(base * multiplier * level)
pub fn clear_points(base: u32, multiplier: f64, level: u32) -> u32 {
    (f64::from(base) * multiplier * f64::from(level)).floor() as u32
}

/// Calculate drop score
/// soft_drop: +1 per cell
/// hard_drop: +2 per cell
pub fn calculate_drop_score(cells: u32, is_hard_drop: bool) -> u32 {
    if is_hard_drop {
        cells.saturating_mul(2)
    } else {
        cells
    }
}

/// Level for a total line count, before clamping.
pub fn calculate_level(total_lines: u32) -> u32 {
    total_lines / 10 + 1
}

/// Classify a T piece about to lock.
///
/// Corners are the diagonal neighbours of the pivot. A corner counts as
/// occupied when it lies outside the side walls or below the floor, or holds
/// a locked cell. Rows above the board are never occupied unless the column
/// is outside the walls.
pub fn detect_tspin(board: &Board, piece: &ActivePiece, last_move_was_rotation: bool) -> TSpinKind {
    if piece.kind != PieceKind::T || !last_move_was_rotation {
        return TSpinKind::None;
    }

    let (px, py) = piece.pivot();
    let corners = [
        (px - 1, py - 1),
        (px + 1, py - 1),
        (px - 1, py + 1),
        (px + 1, py + 1),
    ];
    let occupied = corners.map(|(x, y)| corner_occupied(board, x, y));
    let count = occupied.iter().filter(|&&o| o).count();

    if count >= 3 {
        return TSpinKind::Full;
    }

    if count == 2 {
        let [a, b] = front_corners(piece.rotation);
        if occupied[a] || occupied[b] {
            return TSpinKind::Mini;
        }
    }

    TSpinKind::None
}

fn corner_occupied(board: &Board, x: i32, y: i32) -> bool {
    if x < 0 || x >= board.width() || y >= board.height() {
        return true;
    }
    y >= 0 && board.is_occupied(x, y)
}

/// The pair of corners facing the T's flat side for each rotation.
fn front_corners(rotation: Rotation) -> [usize; 2] {
    match rotation {
        Rotation::R0 => [TOP_LEFT, TOP_RIGHT],
        Rotation::R1 => [TOP_RIGHT, BOTTOM_RIGHT],
        Rotation::R2 => [BOTTOM_LEFT, BOTTOM_RIGHT],
        Rotation::R3 => [TOP_LEFT, BOTTOM_LEFT],
    }
}
