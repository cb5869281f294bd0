//! Settings file handling and per-key fallback parsing.

use std::fmt;
use std::fs;
use std::io;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{info, warn};
use serde::Serialize;
use toml::{Table, Value};

use blockfall_types::ClearKind;

use crate::{DisplayConfig, EngineConfig, KeyBindings, ScoreTable, Settings};

/// Environment variable overriding the settings file location.
pub const CONFIG_ENV_VAR: &str = "BLOCKFALL_CONFIG";

/// Fallback path when no platform config directory exists.
const CONFIG_FILE_PATH: &str = "config/blockfall.toml";

/// Errors from reading or writing the settings file.
#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(toml::de::Error),
    Serialize(toml::ser::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config i/o error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
            ConfigError::Serialize(e) => write!(f, "config serialize error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Serialize(e) => Some(e),
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::Serialize(err)
    }
}

/// Resolve the settings file path.
///
/// `$BLOCKFALL_CONFIG` wins, then the platform config directory, then a
/// path relative to the working directory.
pub fn config_file_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        return PathBuf::from(path);
    }

    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("blockfall").join("config.toml")
    } else {
        PathBuf::from(CONFIG_FILE_PATH)
    }
}

/// Read settings from `path`.
pub fn load_from_path(path: &Path) -> Result<Settings, ConfigError> {
    let contents = fs::read_to_string(path)?;
    Settings::from_toml_str(&contents)
}

/// Write `settings` to `path`, creating parent directories.
pub fn save_to_path(path: &Path, settings: &Settings) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, settings.to_toml_string()?)?;
    Ok(())
}

/// Read settings from `path`, writing a default file first when none exists.
pub fn load_or_create(path: &Path) -> Result<Settings, ConfigError> {
    if !path.exists() {
        let defaults = Settings::default();
        save_to_path(path, &defaults)?;
        info!("wrote default settings to {}", path.display());
        return Ok(defaults);
    }
    load_from_path(path)
}

const KNOWN_KEYS: &[&str] = &[
    "board_width",
    "board_height",
    "playfield_x_offset",
    "playfield_y_offset",
    "max_high_scores",
    "max_name_length",
    "initial_gravity_interval",
    "min_gravity_interval",
    "gravity_level_step",
    "input_timeout",
    "render_throttle_ms",
    "lock_delay",
    "flash_duration",
    "min_level",
    "max_level",
    "lookahead_depth",
    "ghost_enabled",
    "score_single",
    "score_double",
    "score_triple",
    "score_tetris",
    "score_tspin_mini",
    "score_tspin",
    "score_tspin_single",
    "score_tspin_double",
    "score_tspin_triple",
    "back_to_back_multiplier",
    "key_move_left",
    "key_move_right",
    "key_rotate",
    "key_soft_drop",
    "key_hard_drop",
    "key_hold",
    "key_pause",
    "key_quit",
];

fn score_key(kind: ClearKind) -> &'static str {
    match kind {
        ClearKind::Single => "score_single",
        ClearKind::Double => "score_double",
        ClearKind::Triple => "score_triple",
        ClearKind::Tetris => "score_tetris",
        ClearKind::TSpinMini => "score_tspin_mini",
        ClearKind::TSpin => "score_tspin",
        ClearKind::TSpinSingle => "score_tspin_single",
        ClearKind::TSpinDouble => "score_tspin_double",
        ClearKind::TSpinTriple => "score_tspin_triple",
    }
}

/// Build settings from a parsed table. Never fails.
pub(crate) fn settings_from_table(table: &Table) -> Settings {
    for key in table.keys() {
        if !KNOWN_KEYS.contains(&key.as_str()) {
            warn!("ignoring unknown config key `{key}`");
        }
    }

    let d_engine = EngineConfig::default();
    let d_display = DisplayConfig::default();
    let d_keys = KeyBindings::default();

    let mut scores = ScoreTable::default();
    for kind in ClearKind::ALL {
        let slot = scores.base_mut(kind);
        *slot = int(table, score_key(kind), *slot as i64, 0..=1_000_000) as u32;
    }
    scores.back_to_back_multiplier = float(
        table,
        "back_to_back_multiplier",
        scores.back_to_back_multiplier,
        1.0..=100.0,
    );

    let min_level = int(table, "min_level", d_engine.min_level as i64, 1..=999) as u32;
    let mut max_level = int(table, "max_level", d_engine.max_level as i64, 1..=999) as u32;
    if max_level < min_level {
        warn!("max_level {max_level} is below min_level {min_level}; raising it");
        max_level = min_level.max(d_engine.max_level);
    }

    let engine = EngineConfig {
        board_width: int(table, "board_width", d_engine.board_width as i64, 4..=40) as u16,
        board_height: int(table, "board_height", d_engine.board_height as i64, 4..=60) as u16,
        initial_gravity_interval: secs(
            table,
            "initial_gravity_interval",
            d_engine.initial_gravity_interval,
            0.001..=60.0,
        ),
        min_gravity_interval: secs(
            table,
            "min_gravity_interval",
            d_engine.min_gravity_interval,
            0.001..=60.0,
        ),
        gravity_level_step: secs(
            table,
            "gravity_level_step",
            d_engine.gravity_level_step,
            0.0..=60.0,
        ),
        lock_delay: secs(table, "lock_delay", d_engine.lock_delay, 0.0..=60.0),
        flash_duration: secs(table, "flash_duration", d_engine.flash_duration, 0.0..=60.0),
        min_level,
        max_level,
        lookahead_depth: int(
            table,
            "lookahead_depth",
            d_engine.lookahead_depth as i64,
            1..=14,
        ) as usize,
        ghost_enabled: boolean(table, "ghost_enabled", d_engine.ghost_enabled),
        scores,
    };

    let display = DisplayConfig {
        playfield_x_offset: int(
            table,
            "playfield_x_offset",
            d_display.playfield_x_offset as i64,
            0..=500,
        ) as u16,
        playfield_y_offset: int(
            table,
            "playfield_y_offset",
            d_display.playfield_y_offset as i64,
            0..=500,
        ) as u16,
        input_timeout: secs(table, "input_timeout", d_display.input_timeout, 0.0..=5.0),
        render_throttle: Duration::from_millis(int(
            table,
            "render_throttle_ms",
            d_display.render_throttle.as_millis() as i64,
            0..=10_000,
        ) as u64),
        max_high_scores: int(
            table,
            "max_high_scores",
            d_display.max_high_scores as i64,
            1..=100,
        ) as usize,
        max_name_length: int(
            table,
            "max_name_length",
            d_display.max_name_length as i64,
            1..=16,
        ) as usize,
    };

    let keys = KeyBindings {
        move_left: string(table, "key_move_left", &d_keys.move_left),
        move_right: string(table, "key_move_right", &d_keys.move_right),
        rotate: string(table, "key_rotate", &d_keys.rotate),
        soft_drop: string(table, "key_soft_drop", &d_keys.soft_drop),
        hard_drop: string(table, "key_hard_drop", &d_keys.hard_drop),
        hold: string(table, "key_hold", &d_keys.hold),
        pause: string(table, "key_pause", &d_keys.pause),
        quit: string(table, "key_quit", &d_keys.quit),
    };

    Settings {
        engine,
        display,
        keys,
    }
}

fn int(table: &Table, key: &str, default: i64, range: RangeInclusive<i64>) -> i64 {
    match table.get(key) {
        None => default,
        Some(Value::Integer(v)) if range.contains(v) => *v,
        Some(other) => {
            warn!(
                "config key `{key}` = {other} is not an integer in {}..={}; using {default}",
                range.start(),
                range.end()
            );
            default
        }
    }
}

fn float(table: &Table, key: &str, default: f64, range: RangeInclusive<f64>) -> f64 {
    let value = match table.get(key) {
        None => return default,
        Some(Value::Float(v)) => Some(*v),
        Some(Value::Integer(v)) => Some(*v as f64),
        Some(_) => None,
    };
    match value {
        Some(v) if v.is_finite() && range.contains(&v) => v,
        _ => {
            warn!(
                "config key `{key}` is not a number in {}..={}; using {default}",
                range.start(),
                range.end()
            );
            default
        }
    }
}

/// Seconds, as float or integer.
fn secs(table: &Table, key: &str, default: Duration, range: RangeInclusive<f64>) -> Duration {
    Duration::from_secs_f64(float(table, key, default.as_secs_f64(), range))
}

fn boolean(table: &Table, key: &str, default: bool) -> bool {
    match table.get(key) {
        None => default,
        Some(Value::Boolean(v)) => *v,
        Some(other) => {
            warn!("config key `{key}` = {other} is not a boolean; using {default}");
            default
        }
    }
}

fn string(table: &Table, key: &str, default: &str) -> String {
    match table.get(key) {
        None => default.to_string(),
        Some(Value::String(v)) if !v.trim().is_empty() => v.trim().to_string(),
        Some(other) => {
            warn!("config key `{key}` = {other} is not a key name; using `{default}`");
            default.to_string()
        }
    }
}

/// On-disk shape of the settings file.
#[derive(Debug, Serialize)]
pub(crate) struct FlatSettings {
    board_width: u16,
    board_height: u16,
    playfield_x_offset: u16,
    playfield_y_offset: u16,
    max_high_scores: usize,
    max_name_length: usize,
    initial_gravity_interval: f64,
    min_gravity_interval: f64,
    gravity_level_step: f64,
    input_timeout: f64,
    render_throttle_ms: u64,
    lock_delay: f64,
    flash_duration: f64,
    min_level: u32,
    max_level: u32,
    lookahead_depth: usize,
    ghost_enabled: bool,
    score_single: u32,
    score_double: u32,
    score_triple: u32,
    score_tetris: u32,
    score_tspin_mini: u32,
    score_tspin: u32,
    score_tspin_single: u32,
    score_tspin_double: u32,
    score_tspin_triple: u32,
    back_to_back_multiplier: f64,
    key_move_left: String,
    key_move_right: String,
    key_rotate: String,
    key_soft_drop: String,
    key_hard_drop: String,
    key_hold: String,
    key_pause: String,
    key_quit: String,
}

impl From<&Settings> for FlatSettings {
    fn from(s: &Settings) -> Self {
        let e = &s.engine;
        let d = &s.display;
        let k = &s.keys;
        Self {
            board_width: e.board_width,
            board_height: e.board_height,
            playfield_x_offset: d.playfield_x_offset,
            playfield_y_offset: d.playfield_y_offset,
            max_high_scores: d.max_high_scores,
            max_name_length: d.max_name_length,
            initial_gravity_interval: e.initial_gravity_interval.as_secs_f64(),
            min_gravity_interval: e.min_gravity_interval.as_secs_f64(),
            gravity_level_step: e.gravity_level_step.as_secs_f64(),
            input_timeout: d.input_timeout.as_secs_f64(),
            render_throttle_ms: d.render_throttle.as_millis() as u64,
            lock_delay: e.lock_delay.as_secs_f64(),
            flash_duration: e.flash_duration.as_secs_f64(),
            min_level: e.min_level,
            max_level: e.max_level,
            lookahead_depth: e.lookahead_depth,
            ghost_enabled: e.ghost_enabled,
            score_single: e.scores.single,
            score_double: e.scores.double,
            score_triple: e.scores.triple,
            score_tetris: e.scores.tetris,
            score_tspin_mini: e.scores.tspin_mini,
            score_tspin: e.scores.tspin,
            score_tspin_single: e.scores.tspin_single,
            score_tspin_double: e.scores.tspin_double,
            score_tspin_triple: e.scores.tspin_triple,
            back_to_back_multiplier: e.scores.back_to_back_multiplier,
            key_move_left: k.move_left.clone(),
            key_move_right: k.move_right.clone(),
            key_rotate: k.rotate.clone(),
            key_soft_drop: k.soft_drop.clone(),
            key_hard_drop: k.hard_drop.clone(),
            key_hold: k.hold.clone(),
            key_pause: k.pause.clone(),
            key_quit: k.quit.clone(),
        }
    }
}
