//! GameView: maps a `GameSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! Layout, in terminal cells:
//! - info boxes (score, level, lines) down the left edge
//! - the playfield at the configured offset, two columns per board cell
//! - next and hold boxes to the right of the playfield, then the key help

use std::time::Duration;

use crate::core::shapes::occupied_cells;
use crate::core::GameSnapshot;
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{ClearKind, PieceKind, Rotation};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

const BLOCK: &str = "██";
const GHOST: &str = "▒▒";
const CELL_W: u16 = 2;
const INFO_BOX_W: u16 = 20;
const SIDE_BOX_W: u16 = 14;
const SIDE_BOX_H: u16 = 7;
/// Flashing rows toggle at this period.
const FLASH_BLINK: Duration = Duration::from_millis(50);

const TITLE: CellStyle = CellStyle::fg(Rgb::new(255, 255, 255)).bold();
const FRAME: CellStyle = CellStyle::fg(Rgb::new(200, 200, 200));
const LABEL: CellStyle = CellStyle::fg(Rgb::new(220, 220, 220)).bold();
const VALUE: CellStyle = CellStyle::fg(Rgb::new(200, 200, 200));
const STREAK: CellStyle = CellStyle::fg(Rgb::new(240, 220, 80)).bold();
const FLASH: CellStyle = CellStyle::fg(Rgb::new(255, 255, 255)).bold();

/// Renders gameplay frames.
#[derive(Debug, Clone)]
pub struct GameView {
    x_offset: u16,
    y_offset: u16,
    controls: Vec<String>,
}

impl Default for GameView {
    fn default() -> Self {
        Self::new(25, 2)
    }
}

impl GameView {
    /// `x_offset`/`y_offset` locate board cell (0, 0) on screen.
    pub fn new(x_offset: u16, y_offset: u16) -> Self {
        Self {
            x_offset,
            y_offset,
            controls: Vec::new(),
        }
    }

    /// Help lines printed under the hold box.
    pub fn with_controls(mut self, controls: Vec<String>) -> Self {
        self.controls = controls;
        self
    }

    /// Render the current game state into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames and only resize when
    /// the terminal size changes.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        fb.put_str(0, 0, "blockfall", TITLE);
        self.draw_info(fb, snap);
        self.draw_playfield(fb, snap);
        self.draw_side(fb, snap);

        if snap.paused {
            self.draw_banner(fb, snap, "PAUSED");
        } else if snap.game_over {
            self.draw_banner(fb, snap, "GAME OVER");
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    /// Screen position of board cell (x, y), if it is on the board.
    pub fn cell_origin(&self, snap: &GameSnapshot, x: i32, y: i32) -> Option<(u16, u16)> {
        if x < 0 || y < 0 || x >= i32::from(snap.width) || y >= i32::from(snap.height) {
            return None;
        }
        Some((
            self.x_offset.saturating_add(x as u16 * CELL_W),
            self.y_offset.saturating_add(y as u16),
        ))
    }

    fn draw_info(&self, fb: &mut FrameBuffer, snap: &GameSnapshot) {
        let boxes = [
            (2, "SCORE", snap.score),
            (7, "LEVEL", snap.level),
            (12, "LINES CLEARED", snap.lines),
        ];
        for (y, title, value) in boxes {
            fb.draw_box(0, y, INFO_BOX_W, 4, FRAME);
            fb.put_str(2, y + 1, title, LABEL);
            fb.put_u32(2, y + 2, value, VALUE);
        }
        if snap.back_to_back {
            fb.put_str(2, 17, "Back-to-Back!", STREAK);
        }
        if let Some(clear) = snap.last_clear {
            fb.put_str(2, 18, clear_label(clear), STREAK);
        }
    }

    fn draw_playfield(&self, fb: &mut FrameBuffer, snap: &GameSnapshot) {
        let frame_x = self.x_offset.saturating_sub(2);
        let frame_y = self.y_offset.saturating_sub(1);
        fb.draw_box(frame_x, frame_y, snap.width * CELL_W + 4, snap.height + 2, FRAME);

        for y in 0..i32::from(snap.height) {
            for x in 0..i32::from(snap.width) {
                if let Some(kind) = snap.cell(x, y) {
                    self.put_block(fb, snap, x, y, BLOCK, piece_style(kind));
                }
            }
        }

        if let (Some(active), Some(ghost_y)) = (snap.active, snap.ghost_y) {
            if ghost_y > active.y {
                let style = piece_style(active.kind).dim();
                for (x, y) in active.blocks {
                    self.put_block(fb, snap, x, y - active.y + ghost_y, GHOST, style);
                }
            }
        }

        if let Some(active) = snap.active {
            for (x, y) in active.blocks {
                self.put_block(fb, snap, x, y, BLOCK, piece_style(active.kind));
            }
        }

        if flash_visible(snap.flash_elapsed) {
            for &row in &snap.flashing_rows {
                for x in 0..i32::from(snap.width) {
                    self.put_block(fb, snap, x, row as i32, BLOCK, FLASH);
                }
            }
        }
    }

    fn put_block(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        x: i32,
        y: i32,
        glyph: &str,
        style: CellStyle,
    ) {
        if let Some((sx, sy)) = self.cell_origin(snap, x, y) {
            fb.put_str(sx, sy, glyph, style);
        }
    }

    fn draw_side(&self, fb: &mut FrameBuffer, snap: &GameSnapshot) {
        let box_x = self.x_offset + snap.width * CELL_W + 5;
        let next_y = self.y_offset;

        fb.draw_box(box_x, next_y, SIDE_BOX_W, SIDE_BOX_H, FRAME);
        fb.put_str(box_x + 2, next_y + 1, "NEXT", LABEL);
        if let Some(&first) = snap.next_queue.first() {
            draw_preview(fb, box_x + 3, next_y + 1, first, piece_style(first));
        }
        if snap.next_queue.len() > 1 {
            let mut x = fb.put_str(box_x, next_y + SIDE_BOX_H, "then", VALUE.dim());
            for &kind in &snap.next_queue[1..] {
                x = fb.put_str(x + 1, next_y + SIDE_BOX_H, kind.as_str(), piece_style(kind));
            }
        }

        let hold_y = next_y + SIDE_BOX_H + 1;
        fb.draw_box(box_x, hold_y, SIDE_BOX_W, SIDE_BOX_H, FRAME);
        fb.put_str(box_x + 2, hold_y + 1, "HOLD", LABEL);
        if let Some(kind) = snap.hold {
            let style = if snap.can_hold {
                piece_style(kind)
            } else {
                piece_style(kind).dim()
            };
            draw_preview(fb, box_x + 3, hold_y + 1, kind, style);
        }

        let mut y = hold_y + SIDE_BOX_H + 1;
        if !self.controls.is_empty() {
            fb.put_str(box_x, y, "Controls:", LABEL);
            for line in &self.controls {
                y += 1;
                fb.put_str(box_x, y, line, VALUE);
            }
        }
    }

    fn draw_banner(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, text: &str) {
        let text_w = text.chars().count() as u16;
        let x = (self.x_offset + snap.width).saturating_sub(text_w / 2);
        let y = self.y_offset + snap.height / 2;
        fb.put_str(x, y, text, VALUE.reverse().bold());
    }
}

/// Draw a piece in its spawn rotation with local cell (0, 0) at (x, y).
fn draw_preview(fb: &mut FrameBuffer, x: u16, y: u16, kind: PieceKind, style: CellStyle) {
    for (col, row) in occupied_cells(kind, Rotation::R0) {
        fb.put_str(x + col as u16 * CELL_W, y + row as u16, BLOCK, style);
    }
}

fn flash_visible(elapsed: Option<Duration>) -> bool {
    match elapsed {
        Some(elapsed) => (elapsed.as_millis() / FLASH_BLINK.as_millis()) % 2 == 0,
        None => false,
    }
}

fn clear_label(clear: ClearKind) -> &'static str {
    match clear {
        ClearKind::Single => "Single",
        ClearKind::Double => "Double",
        ClearKind::Triple => "Triple",
        ClearKind::Tetris => "Tetris!",
        ClearKind::TSpinMini => "T-Spin Mini",
        ClearKind::TSpin => "T-Spin",
        ClearKind::TSpinSingle => "T-Spin Single",
        ClearKind::TSpinDouble => "T-Spin Double",
        ClearKind::TSpinTriple => "T-Spin Triple!",
    }
}

/// Per-kind block color.
pub fn piece_style(kind: PieceKind) -> CellStyle {
    let fg = match kind {
        PieceKind::I => Rgb::new(80, 220, 220),
        PieceKind::O => Rgb::new(240, 220, 80),
        PieceKind::T => Rgb::new(200, 120, 220),
        PieceKind::S => Rgb::new(100, 220, 120),
        PieceKind::Z => Rgb::new(220, 80, 80),
        PieceKind::J => Rgb::new(80, 120, 220),
        PieceKind::L => Rgb::new(255, 165, 0),
    };
    CellStyle::fg(fg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_snapshot() -> GameSnapshot {
        GameSnapshot {
            width: 10,
            height: 20,
            board: vec![None; 200],
            level: 1,
            can_hold: true,
            ..GameSnapshot::default()
        }
    }

    #[test]
    fn cell_origin_uses_offsets_and_double_width() {
        let view = GameView::new(25, 2);
        let snap = empty_snapshot();
        assert_eq!(view.cell_origin(&snap, 0, 0), Some((25, 2)));
        assert_eq!(view.cell_origin(&snap, 9, 19), Some((43, 21)));
        assert_eq!(view.cell_origin(&snap, 10, 0), None);
        assert_eq!(view.cell_origin(&snap, 0, -1), None);
    }

    #[test]
    fn flash_blinks() {
        assert!(!flash_visible(None));
        assert!(flash_visible(Some(Duration::ZERO)));
        assert!(!flash_visible(Some(Duration::from_millis(60))));
        assert!(flash_visible(Some(Duration::from_millis(110))));
    }

    #[test]
    fn preview_draws_four_blocks() {
        let mut fb = FrameBuffer::new(20, 8);
        draw_preview(&mut fb, 0, 0, PieceKind::T, piece_style(PieceKind::T));
        let filled = fb.cells().iter().filter(|c| c.ch == '█').count();
        assert_eq!(filled, 8);
    }
}
