//! Configuration module - immutable settings handed to the engine and its collaborators
//!
//! Settings are read from a flat key→value TOML table. Every key is optional
//! and falls back to its documented default on its own when it is missing,
//! has the wrong type, or is out of range, so one bad line never discards the
//! rest of the file. See [`loader`] for the file handling.
//!
//! The engine only ever sees [`EngineConfig`] (which carries the
//! [`ScoreTable`]); display, high-score and key settings belong to the
//! driving loop.
//!
//! # Example
//!
//! ```
//! use blockfall_config::Settings;
//!
//! let settings = Settings::from_toml_str("board_width = 12\nlock_delay = \"soon\"").unwrap();
//! assert_eq!(settings.engine.board_width, 12);
//! // Wrong-typed value falls back to the default.
//! assert_eq!(settings.engine.lock_delay.as_millis(), 500);
//! ```

pub mod loader;

use std::time::Duration;

use blockfall_types::{ClearKind, DEFAULT_BOARD_HEIGHT, DEFAULT_BOARD_WIDTH, DEFAULT_LOOKAHEAD};

pub use loader::{config_file_path, load_or_create, ConfigError};

pub const DEFAULT_PLAYFIELD_X_OFFSET: u16 = 25;
pub const DEFAULT_PLAYFIELD_Y_OFFSET: u16 = 2;
pub const DEFAULT_MAX_HIGH_SCORES: usize = 5;
pub const DEFAULT_MAX_NAME_LENGTH: usize = 3;
pub const DEFAULT_INITIAL_GRAVITY_SECS: f64 = 0.8;
pub const DEFAULT_MIN_GRAVITY_SECS: f64 = 0.05;
pub const DEFAULT_GRAVITY_LEVEL_STEP_SECS: f64 = 0.05;
pub const DEFAULT_INPUT_TIMEOUT_SECS: f64 = 0.01;
pub const DEFAULT_RENDER_THROTTLE_MS: u64 = 16;
pub const DEFAULT_LOCK_DELAY_SECS: f64 = 0.5;
pub const DEFAULT_FLASH_DURATION_SECS: f64 = 0.2;
pub const DEFAULT_MIN_LEVEL: u32 = 1;
pub const DEFAULT_MAX_LEVEL: u32 = 15;
pub const DEFAULT_BACK_TO_BACK_MULTIPLIER: f64 = 1.5;

/// Base points per clear kind, before the back-to-back multiplier and level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreTable {
    pub single: u32,
    pub double: u32,
    pub triple: u32,
    pub tetris: u32,
    pub tspin_mini: u32,
    pub tspin: u32,
    pub tspin_single: u32,
    pub tspin_double: u32,
    pub tspin_triple: u32,
    pub back_to_back_multiplier: f64,
}

impl ScoreTable {
    pub fn base(&self, kind: ClearKind) -> u32 {
        match kind {
            ClearKind::Single => self.single,
            ClearKind::Double => self.double,
            ClearKind::Triple => self.triple,
            ClearKind::Tetris => self.tetris,
            ClearKind::TSpinMini => self.tspin_mini,
            ClearKind::TSpin => self.tspin,
            ClearKind::TSpinSingle => self.tspin_single,
            ClearKind::TSpinDouble => self.tspin_double,
            ClearKind::TSpinTriple => self.tspin_triple,
        }
    }

    /// Mutable access by kind, used by the loader.
    pub(crate) fn base_mut(&mut self, kind: ClearKind) -> &mut u32 {
        match kind {
            ClearKind::Single => &mut self.single,
            ClearKind::Double => &mut self.double,
            ClearKind::Triple => &mut self.triple,
            ClearKind::Tetris => &mut self.tetris,
            ClearKind::TSpinMini => &mut self.tspin_mini,
            ClearKind::TSpin => &mut self.tspin,
            ClearKind::TSpinSingle => &mut self.tspin_single,
            ClearKind::TSpinDouble => &mut self.tspin_double,
            ClearKind::TSpinTriple => &mut self.tspin_triple,
        }
    }
}

impl Default for ScoreTable {
    fn default() -> Self {
        Self {
            single: 100,
            double: 300,
            triple: 500,
            tetris: 800,
            tspin_mini: 100,
            tspin: 400,
            tspin_single: 800,
            tspin_double: 1200,
            tspin_triple: 1600,
            back_to_back_multiplier: DEFAULT_BACK_TO_BACK_MULTIPLIER,
        }
    }
}

/// Everything the game engine reads. Passed by value into the constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub board_width: u16,
    pub board_height: u16,
    pub initial_gravity_interval: Duration,
    pub min_gravity_interval: Duration,
    /// Interval reduction per level above 1.
    pub gravity_level_step: Duration,
    pub lock_delay: Duration,
    pub flash_duration: Duration,
    pub min_level: u32,
    pub max_level: u32,
    pub lookahead_depth: usize,
    pub ghost_enabled: bool,
    pub scores: ScoreTable,
}

impl EngineConfig {
    /// `max(min, initial - (level - 1) * step)`
    pub fn gravity_interval(&self, level: u32) -> Duration {
        let steps = level.saturating_sub(1);
        let reduction = self.gravity_level_step.saturating_mul(steps);
        self.initial_gravity_interval
            .saturating_sub(reduction)
            .max(self.min_gravity_interval)
    }

    /// Clamp a requested start level into `[min_level, max_level]`.
    pub fn clamp_level(&self, level: u32) -> u32 {
        level.clamp(self.min_level, self.max_level)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            board_width: DEFAULT_BOARD_WIDTH,
            board_height: DEFAULT_BOARD_HEIGHT,
            initial_gravity_interval: Duration::from_secs_f64(DEFAULT_INITIAL_GRAVITY_SECS),
            min_gravity_interval: Duration::from_secs_f64(DEFAULT_MIN_GRAVITY_SECS),
            gravity_level_step: Duration::from_secs_f64(DEFAULT_GRAVITY_LEVEL_STEP_SECS),
            lock_delay: Duration::from_secs_f64(DEFAULT_LOCK_DELAY_SECS),
            flash_duration: Duration::from_secs_f64(DEFAULT_FLASH_DURATION_SECS),
            min_level: DEFAULT_MIN_LEVEL,
            max_level: DEFAULT_MAX_LEVEL,
            lookahead_depth: DEFAULT_LOOKAHEAD,
            ghost_enabled: true,
            scores: ScoreTable::default(),
        }
    }
}

/// Settings for the driving loop, renderer and high-score collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayConfig {
    pub playfield_x_offset: u16,
    pub playfield_y_offset: u16,
    pub input_timeout: Duration,
    pub render_throttle: Duration,
    pub max_high_scores: usize,
    pub max_name_length: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            playfield_x_offset: DEFAULT_PLAYFIELD_X_OFFSET,
            playfield_y_offset: DEFAULT_PLAYFIELD_Y_OFFSET,
            input_timeout: Duration::from_secs_f64(DEFAULT_INPUT_TIMEOUT_SECS),
            render_throttle: Duration::from_millis(DEFAULT_RENDER_THROTTLE_MS),
            max_high_scores: DEFAULT_MAX_HIGH_SCORES,
            max_name_length: DEFAULT_MAX_NAME_LENGTH,
        }
    }
}

/// Key names per action, e.g. `"left"`, `"space"`, `"c"`.
///
/// Names are resolved to terminal key codes by the input crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    pub move_left: String,
    pub move_right: String,
    pub rotate: String,
    pub soft_drop: String,
    pub hard_drop: String,
    pub hold: String,
    pub pause: String,
    pub quit: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_left: "left".to_string(),
            move_right: "right".to_string(),
            rotate: "up".to_string(),
            soft_drop: "down".to_string(),
            hard_drop: "space".to_string(),
            hold: "c".to_string(),
            pause: "p".to_string(),
            quit: "q".to_string(),
        }
    }
}

/// Complete configuration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Settings {
    pub engine: EngineConfig,
    pub display: DisplayConfig,
    pub keys: KeyBindings,
}

impl Settings {
    /// Parse a TOML document. Only a syntactically broken document is an
    /// error; individual keys fall back to their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let table: toml::Table = contents.parse()?;
        Ok(loader::settings_from_table(&table))
    }

    /// Serialize as a flat TOML document containing every recognized key.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        let flat = loader::FlatSettings::from(self);
        Ok(toml::to_string_pretty(&flat)?)
    }
}
