//! Terminal runner (default binary).
//!
//! Menu, gameplay, high-score entry and the game-over screen, all drawn
//! through the framebuffer renderer. The engine itself never sees the
//! terminal: this loop polls keys, feeds them to `GameState::tick` with the
//! current time and renders snapshots.

use std::fs::File;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{info, warn};

use blockfall::config::{config_file_path, load_or_create, Settings};
use blockfall::core::{GameSnapshot, GameState, Randomizer};
use blockfall::highscores::{high_scores_path, push_name_char, HighScores};
use blockfall::input::{key_label, text_input, KeyMap, TextInput};
use blockfall::term::{
    render_game_over, render_menu, render_name_entry, FrameBuffer, GameView, RenderThrottle,
    ScoreLine, TerminalRenderer, Viewport,
};
use blockfall::types::GameAction;

const LOG_FILE: &str = "blockfall.log";

fn main() -> Result<()> {
    init_logging();
    let settings = load_settings();

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = App::new(settings).run(&mut term);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

/// Log to a file; the terminal belongs to the game.
fn init_logging() {
    let path = dirs::cache_dir()
        .map(|dir| dir.join("blockfall"))
        .filter(|dir| std::fs::create_dir_all(dir).is_ok())
        .map(|dir| dir.join(LOG_FILE))
        .unwrap_or_else(|| PathBuf::from(LOG_FILE));

    let Ok(file) = File::create(&path) else {
        return;
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}

fn load_settings() -> Settings {
    let path = config_file_path();
    match load_or_create(&path) {
        Ok(settings) => {
            info!("settings loaded from {}", path.display());
            settings
        }
        Err(err) => {
            warn!("{err}; using default settings");
            Settings::default()
        }
    }
}

fn viewport() -> Viewport {
    let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
    Viewport::new(w, h)
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Block until the next key press. `None` means the screen must be redrawn
/// (terminal resized).
fn next_key() -> Result<Option<KeyEvent>> {
    loop {
        match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => return Ok(Some(key)),
            Event::Resize(..) => return Ok(None),
            _ => {}
        }
    }
}

struct App {
    settings: Settings,
    keys: KeyMap,
    view: GameView,
    scores: HighScores,
    scores_path: PathBuf,
    fb: FrameBuffer,
}

impl App {
    fn new(settings: Settings) -> Self {
        let keys = KeyMap::from_bindings(&settings.keys);
        let view = GameView::new(
            settings.display.playfield_x_offset,
            settings.display.playfield_y_offset,
        )
        .with_controls(controls_help(&keys));
        let scores_path = high_scores_path();
        let scores = HighScores::load_or_empty(&scores_path, settings.display.max_high_scores);

        Self {
            settings,
            keys,
            view,
            scores,
            scores_path,
            fb: FrameBuffer::new(0, 0),
        }
    }

    fn run(&mut self, term: &mut TerminalRenderer) -> Result<()> {
        while let Some(level) = self.menu(term)? {
            let Some(final_score) = self.play(term, level)? else {
                break;
            };
            if self.scores.qualifies(final_score) {
                if let Some(name) = self.enter_name(term, final_score)? {
                    self.record(&name, final_score);
                }
            }
            if !self.game_over_screen(term, final_score)? {
                break;
            }
        }
        Ok(())
    }

    /// Level select. Returns the chosen start level, or `None` to quit.
    fn menu(&mut self, term: &mut TerminalRenderer) -> Result<Option<u32>> {
        let engine = &self.settings.engine;
        let (min, max) = (engine.min_level, engine.max_level);
        let mut level = min;
        let quit = key_label(self.keys.quit_key());
        loop {
            let lines = score_lines(&self.scores);
            render_menu(&mut self.fb, viewport(), level, &lines, &quit);
            term.draw_swap(&mut self.fb)?;

            let Some(key) = next_key()? else {
                term.invalidate();
                continue;
            };
            if is_ctrl_c(&key) || self.keys.is_quit(key) {
                return Ok(None);
            }
            match key.code {
                KeyCode::Char(' ') => return Ok(Some(level)),
                KeyCode::Left => level = level.saturating_sub(1).max(min),
                KeyCode::Right => level = (level + 1).min(max),
                _ => {}
            }
        }
    }

    /// One game. Returns the final score, or `None` on Ctrl+C.
    fn play(&mut self, term: &mut TerminalRenderer, start_level: u32) -> Result<Option<u32>> {
        let display = &self.settings.display;
        let poll_timeout = display.input_timeout;
        let mut throttle = RenderThrottle::new(display.render_throttle);

        let mut game = GameState::with_randomizer(
            self.settings.engine.clone(),
            Randomizer::from_entropy(),
            start_level,
            Instant::now(),
        );
        let mut snap = GameSnapshot::default();
        info!("game started at level {}", game.level());

        while !game.game_over() {
            let mut action = None;
            if event::poll(poll_timeout)? {
                match event::read()? {
                    Event::Key(key) if key.kind != KeyEventKind::Release => {
                        if is_ctrl_c(&key) {
                            return Ok(None);
                        }
                        if self.keys.is_quit(key) {
                            break;
                        }
                        action = self.keys.action_for(key);
                    }
                    Event::Resize(..) => {
                        term.invalidate();
                        throttle.invalidate();
                    }
                    _ => {}
                }
            }

            let now = Instant::now();
            // Show the effect of a key press right away.
            if game.tick(now, action) && action.is_some() {
                throttle.invalidate();
            }
            if let Some(event) = game.take_last_event() {
                if let Some(clear) = event.result.clear {
                    info!(
                        "{} for {} points{}",
                        clear.as_str(),
                        event.result.points,
                        if event.result.b2b_applied { " (back-to-back)" } else { "" }
                    );
                }
            }

            if throttle.should_render(now) {
                game.snapshot_into(now, &mut snap);
                self.view.render_into(&snap, viewport(), &mut self.fb);
                term.draw_swap(&mut self.fb)?;
            }
        }

        info!(
            "game finished: score {}, level {}, lines {}",
            game.score(),
            game.level(),
            game.lines()
        );
        Ok(Some(game.score()))
    }

    /// Name prompt for a qualifying score. `None` if the player skipped it.
    fn enter_name(&mut self, term: &mut TerminalRenderer, score: u32) -> Result<Option<String>> {
        let max_len = self.settings.display.max_name_length;
        let mut name = String::new();
        loop {
            render_name_entry(&mut self.fb, viewport(), score, &name, max_len);
            term.draw_swap(&mut self.fb)?;

            let Some(key) = next_key()? else {
                term.invalidate();
                continue;
            };
            if is_ctrl_c(&key) {
                return Ok(None);
            }
            match text_input(key) {
                Some(TextInput::Submit) if !name.is_empty() => return Ok(Some(name)),
                Some(TextInput::Backspace) => {
                    name.pop();
                }
                Some(TextInput::Char(c)) => {
                    push_name_char(&mut name, c, max_len);
                }
                Some(TextInput::Cancel) => return Ok(None),
                Some(TextInput::Submit) | None => {}
            }
        }
    }

    fn record(&mut self, name: &str, score: u32) {
        if self.scores.insert(name, score).is_none() {
            return;
        }
        if let Err(err) = self.scores.save(&self.scores_path) {
            warn!(
                "could not save high scores to {}: {err}",
                self.scores_path.display()
            );
        }
    }

    /// Returns `true` to go back to the menu, `false` to quit.
    fn game_over_screen(&mut self, term: &mut TerminalRenderer, score: u32) -> Result<bool> {
        loop {
            let lines = score_lines(&self.scores);
            render_game_over(&mut self.fb, viewport(), score, &lines);
            term.draw_swap(&mut self.fb)?;

            let Some(key) = next_key()? else {
                term.invalidate();
                continue;
            };
            if is_ctrl_c(&key) {
                return Ok(false);
            }
            match key.code {
                KeyCode::Char(c) if c.eq_ignore_ascii_case(&'r') => return Ok(true),
                KeyCode::Char(c) if c.eq_ignore_ascii_case(&'q') => return Ok(false),
                _ => {}
            }
        }
    }
}

fn score_lines(scores: &HighScores) -> Vec<ScoreLine<'_>> {
    scores
        .entries()
        .iter()
        .map(|entry| ScoreLine {
            name: &entry.name,
            score: entry.score,
        })
        .collect()
}

fn controls_help(keys: &KeyMap) -> Vec<String> {
    let label = |action| keys.key_for(action).map(key_label).unwrap_or_default();
    vec![
        format!(
            "{}/{} : Move",
            label(GameAction::MoveLeft),
            label(GameAction::MoveRight)
        ),
        format!("{} : Rotate", label(GameAction::Rotate)),
        format!("{} : Soft Drop", label(GameAction::SoftDrop)),
        format!("{} : Hard Drop", label(GameAction::HardDrop)),
        format!("{} : Hold", label(GameAction::Hold)),
        format!("{} : Pause", label(GameAction::TogglePause)),
        format!("{} : Quit", key_label(keys.quit_key())),
    ]
}
