use std::time::Duration;

use arrayvec::ArrayVec;

use crate::board::MAX_CLEARED_ROWS;
use crate::piece::ActivePiece;
use crate::types::{Cell, ClearKind, PieceKind, Rotation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i32,
    pub y: i32,
    pub blocks: [(i32, i32); 4],
}

impl From<ActivePiece> for ActiveSnapshot {
    fn from(value: ActivePiece) -> Self {
        Self {
            kind: value.kind,
            rotation: value.rotation,
            x: value.x,
            y: value.y,
            blocks: value.blocks(),
        }
    }
}

/// Read-only view of a game for renderers and observers.
///
/// Owns its buffers so a renderer can keep one around and refill it every
/// frame with [`GameState::snapshot_into`](crate::GameState::snapshot_into).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GameSnapshot {
    pub width: u16,
    pub height: u16,
    /// Row-major locked cells, `width * height` long.
    pub board: Vec<Cell>,
    /// `None` once the game is over.
    pub active: Option<ActiveSnapshot>,
    /// Landing y of the active piece; `None` when the ghost is disabled.
    pub ghost_y: Option<i32>,
    pub hold: Option<PieceKind>,
    pub can_hold: bool,
    pub next_queue: Vec<PieceKind>,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub back_to_back: bool,
    pub paused: bool,
    pub game_over: bool,
    /// Board rows cleared by the last lock, while their flash is running.
    /// These are row slots numbered before compaction, so a slot below a
    /// gap already holds a row that fell into it.
    pub flashing_rows: ArrayVec<usize, MAX_CLEARED_ROWS>,
    pub flash_elapsed: Option<Duration>,
    pub last_clear: Option<ClearKind>,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.width = 0;
        self.height = 0;
        self.board.clear();
        self.active = None;
        self.ghost_y = None;
        self.hold = None;
        self.can_hold = true;
        self.next_queue.clear();
        self.score = 0;
        self.level = 0;
        self.lines = 0;
        self.back_to_back = false;
        self.paused = false;
        self.game_over = false;
        self.flashing_rows.clear();
        self.flash_elapsed = None;
        self.last_clear = None;
    }

    /// Locked cell at (x, y), `None` for empty or out of range.
    pub fn cell(&self, x: i32, y: i32) -> Cell {
        if x < 0 || y < 0 || x >= i32::from(self.width) || y >= i32::from(self.height) {
            return None;
        }
        let idx = y as usize * self.width as usize + x as usize;
        self.board.get(idx).copied().flatten()
    }

    pub fn is_flashing(&self, y: usize) -> bool {
        self.flashing_rows.contains(&y)
    }

    pub fn playable(&self) -> bool {
        !self.game_over && !self.paused
    }
}
