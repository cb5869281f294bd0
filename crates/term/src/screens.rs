//! Full-screen menus around a game: level select, name entry, game over.
//!
//! Like [`crate::game_view`], these only draw into a framebuffer.

use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::game_view::Viewport;

const HEADING: CellStyle = CellStyle::fg(Rgb::new(255, 255, 255)).bold();
const TEXT: CellStyle = CellStyle::fg(Rgb::new(210, 210, 210));
const HINT: CellStyle = CellStyle::fg(Rgb::new(150, 150, 150));

/// One row of the high-score table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreLine<'a> {
    pub name: &'a str,
    pub score: u32,
}

fn prepare(fb: &mut FrameBuffer, viewport: Viewport) {
    fb.resize(viewport.width, viewport.height);
    fb.clear(CellStyle::default().cell(' '));
}

/// Draw the table starting at row `y`. Returns the rows used.
fn draw_scores(fb: &mut FrameBuffer, y: u16, title: &str, scores: &[ScoreLine<'_>]) -> u16 {
    fb.put_centered(y, title, HEADING);
    if scores.is_empty() {
        fb.put_centered(y + 1, "No scores yet!", TEXT);
        return 2;
    }
    for (i, line) in scores.iter().enumerate() {
        let text = format!("{}. {:<3} - {}", i + 1, line.name, line.score);
        fb.put_centered(y + 1 + i as u16, &text, TEXT);
    }
    scores.len() as u16 + 1
}

/// Title screen with the high-score table and the start level selector.
/// `quit_key` is the label of the bound quit key.
pub fn render_menu(
    fb: &mut FrameBuffer,
    viewport: Viewport,
    start_level: u32,
    scores: &[ScoreLine<'_>],
    quit_key: &str,
) {
    prepare(fb, viewport);
    let top = (viewport.height / 2).saturating_sub(10);

    fb.put_centered(top, "blockfall", HEADING);
    let used = draw_scores(fb, top + 3, "High Scores", scores);

    let y = top + 3 + used + 1;
    fb.put_centered(y, "--- Level Select ---", HEADING);
    fb.put_centered(y + 1, &format!("< Level {start_level} >"), TEXT);
    fb.put_centered(y + 2, "(Use ←/→ to change)", HINT);

    let prompt = viewport.height.saturating_sub(4);
    fb.put_centered(prompt, "Press SPACE to Play", TEXT);
    fb.put_centered(prompt + 1, &format!("Press '{quit_key}' to Quit"), TEXT);
}

/// Prompt for a high-score name. Unfilled slots show as underscores.
pub fn render_name_entry(
    fb: &mut FrameBuffer,
    viewport: Viewport,
    score: u32,
    name: &str,
    max_len: usize,
) {
    prepare(fb, viewport);
    let top = (viewport.height / 2).saturating_sub(3);

    fb.put_centered(top, "NEW HIGH SCORE!", HEADING);
    fb.put_centered(top + 1, &format!("Your Score: {score}"), TEXT);
    fb.put_centered(top + 2, &format!("Enter your name ({max_len} chars):"), TEXT);
    let field = format!(" {:_<width$} ", name, width = max_len);
    fb.put_centered(top + 4, &field, TEXT.reverse());
}

/// Final screen after a game, with restart and quit hints.
pub fn render_game_over(
    fb: &mut FrameBuffer,
    viewport: Viewport,
    final_score: u32,
    scores: &[ScoreLine<'_>],
) {
    prepare(fb, viewport);
    let top = (viewport.height / 2).saturating_sub(8);

    fb.put_centered(top, "GAME OVER", HEADING);
    fb.put_centered(top + 1, &format!("Final Score: {final_score}"), TEXT);
    draw_scores(fb, top + 4, "High Scores", scores);
    fb.put_centered(
        viewport.height.saturating_sub(3),
        "Press 'r' to Restart or 'q' to Quit",
        HINT,
    );
}
