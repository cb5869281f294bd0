//! Settings flowing from a TOML document into the engine and key map.

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent};

use blockfall::config::Settings;
use blockfall::core::GameState;
use blockfall::input::KeyMap;
use blockfall::types::GameAction;

const DOC: &str = r#"
board_width = 12
board_height = 16
lock_delay = 0.25
lookahead_depth = 3
ghost_enabled = false
key_rotate = "x"
key_hard_drop = "up"
"#;

#[test]
fn engine_settings_shape_the_game() {
    let settings = Settings::from_toml_str(DOC).unwrap();
    let now = Instant::now();
    let game = GameState::with_seed(settings.engine.clone(), 9, now);

    assert_eq!(game.board().width(), 12);
    assert_eq!(game.board().height(), 16);
    assert_eq!(game.active().x, 4);
    assert_eq!(game.next_queue().count(), 3);
    assert_eq!(settings.engine.lock_delay, Duration::from_millis(250));

    let snap = game.snapshot(now);
    assert!(snap.ghost_y.is_none());
    assert!(snap.active.is_some());
}

#[test]
fn key_bindings_reach_the_key_map() {
    let settings = Settings::from_toml_str(DOC).unwrap();
    let keys = KeyMap::from_bindings(&settings.keys);

    assert_eq!(
        keys.action_for(KeyEvent::from(KeyCode::Char('x'))),
        Some(GameAction::Rotate)
    );
    assert_eq!(
        keys.action_for(KeyEvent::from(KeyCode::Up)),
        Some(GameAction::HardDrop)
    );
    // Space is no longer bound to anything.
    assert_eq!(keys.action_for(KeyEvent::from(KeyCode::Char(' '))), None);
}
