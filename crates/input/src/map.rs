//! Key mapping from terminal events to game actions.

use blockfall_config::KeyBindings;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::warn;

use crate::types::GameAction;

/// Parse a key name from the configuration file.
///
/// Accepts arrow names, `space`, `enter`, `esc`, `tab`, `backspace`, or any
/// single character. Letters are case-insensitive.
pub fn parse_key(name: &str) -> Option<KeyCode> {
    let name = name.trim();
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(KeyCode::Char(c.to_ascii_lowercase()));
    }

    match name.to_ascii_lowercase().as_str() {
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "space" => Some(KeyCode::Char(' ')),
        "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "backspace" => Some(KeyCode::Backspace),
        _ => None,
    }
}

/// Short label for help text.
pub fn key_label(code: KeyCode) -> String {
    match code {
        KeyCode::Left => "←".to_string(),
        KeyCode::Right => "→".to_string(),
        KeyCode::Up => "↑".to_string(),
        KeyCode::Down => "↓".to_string(),
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Backspace => "Bksp".to_string(),
        _ => "?".to_string(),
    }
}

fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

/// Configured bindings, resolved to key codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMap {
    bindings: Vec<(KeyCode, GameAction)>,
    quit: KeyCode,
}

impl KeyMap {
    /// Resolve every binding; an unparsable name falls back to that
    /// action's default key.
    pub fn from_bindings(keys: &KeyBindings) -> Self {
        let defaults = KeyBindings::default();
        let named = [
            (GameAction::MoveLeft, &keys.move_left, &defaults.move_left),
            (GameAction::MoveRight, &keys.move_right, &defaults.move_right),
            (GameAction::Rotate, &keys.rotate, &defaults.rotate),
            (GameAction::SoftDrop, &keys.soft_drop, &defaults.soft_drop),
            (GameAction::HardDrop, &keys.hard_drop, &defaults.hard_drop),
            (GameAction::Hold, &keys.hold, &defaults.hold),
            (GameAction::TogglePause, &keys.pause, &defaults.pause),
        ];

        let mut bindings: Vec<(KeyCode, GameAction)> = Vec::with_capacity(named.len());
        for (action, name, default) in named {
            let Some(code) = resolve(action.as_str(), name, default) else {
                continue;
            };
            if let Some((_, other)) = bindings.iter().find(|(bound, _)| *bound == code) {
                warn!(
                    "key {:?} for {} already bound to {}; keeping the first",
                    name,
                    action.as_str(),
                    other.as_str()
                );
                continue;
            }
            bindings.push((code, action));
        }

        let quit = resolve("quit", &keys.quit, &defaults.quit).unwrap_or(KeyCode::Char('q'));
        Self { bindings, quit }
    }

    /// Map keyboard input to a game action.
    pub fn action_for(&self, key: KeyEvent) -> Option<GameAction> {
        if key.kind == KeyEventKind::Release || key.modifiers.contains(KeyModifiers::CONTROL) {
            return None;
        }
        let code = normalize(key.code);
        self.bindings
            .iter()
            .find(|(bound, _)| *bound == code)
            .map(|&(_, action)| action)
    }

    /// Check if key should quit the game.
    pub fn is_quit(&self, key: KeyEvent) -> bool {
        if key.kind == KeyEventKind::Release {
            return false;
        }
        (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
            || normalize(key.code) == self.quit
    }

    pub fn key_for(&self, action: GameAction) -> Option<KeyCode> {
        self.bindings
            .iter()
            .find(|(_, bound)| *bound == action)
            .map(|&(code, _)| code)
    }

    pub fn quit_key(&self) -> KeyCode {
        self.quit
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::from_bindings(&KeyBindings::default())
    }
}

fn resolve(action: &str, name: &str, default: &str) -> Option<KeyCode> {
    parse_key(name).or_else(|| {
        warn!("unknown key {:?} for {}, using {:?}", name, action, default);
        parse_key(default)
    })
}

/// Keys understood by the high-score name prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextInput {
    /// Uppercased ASCII letter or digit.
    Char(char),
    Backspace,
    Submit,
    Cancel,
}

pub fn text_input(key: KeyEvent) -> Option<TextInput> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    match key.code {
        KeyCode::Enter => Some(TextInput::Submit),
        KeyCode::Backspace => Some(TextInput::Backspace),
        KeyCode::Esc => Some(TextInput::Cancel),
        KeyCode::Char(c) if c.is_ascii_alphanumeric() => {
            Some(TextInput::Char(c.to_ascii_uppercase()))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    #[test]
    fn test_default_bindings() {
        let map = KeyMap::default();
        assert_eq!(map.action_for(press(KeyCode::Left)), Some(GameAction::MoveLeft));
        assert_eq!(map.action_for(press(KeyCode::Right)), Some(GameAction::MoveRight));
        assert_eq!(map.action_for(press(KeyCode::Up)), Some(GameAction::Rotate));
        assert_eq!(map.action_for(press(KeyCode::Down)), Some(GameAction::SoftDrop));
        assert_eq!(map.action_for(press(KeyCode::Char(' '))), Some(GameAction::HardDrop));
        assert_eq!(map.action_for(press(KeyCode::Char('c'))), Some(GameAction::Hold));
        assert_eq!(map.action_for(press(KeyCode::Char('p'))), Some(GameAction::TogglePause));
        assert_eq!(map.action_for(press(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_letters_are_case_insensitive() {
        let map = KeyMap::default();
        assert_eq!(map.action_for(press(KeyCode::Char('C'))), Some(GameAction::Hold));
        assert_eq!(map.action_for(press(KeyCode::Char('P'))), Some(GameAction::TogglePause));
        assert!(map.is_quit(press(KeyCode::Char('Q'))));
    }

    #[test]
    fn test_quit_keys() {
        let map = KeyMap::default();
        assert!(map.is_quit(press(KeyCode::Char('q'))));
        assert!(map.is_quit(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!map.is_quit(press(KeyCode::Char('x'))));
        // Ctrl+C is not a hold.
        assert_eq!(
            map.action_for(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            None
        );
    }

    #[test]
    fn test_release_events_are_ignored() {
        let map = KeyMap::default();
        let mut release = press(KeyCode::Left);
        release.kind = KeyEventKind::Release;
        assert_eq!(map.action_for(release), None);
    }

    #[test]
    fn test_custom_bindings_with_fallback() {
        let keys = KeyBindings {
            move_left: "a".to_string(),
            move_right: "D".to_string(),
            rotate: "not-a-key".to_string(),
            hard_drop: "enter".to_string(),
            ..KeyBindings::default()
        };
        let map = KeyMap::from_bindings(&keys);

        assert_eq!(map.action_for(press(KeyCode::Char('a'))), Some(GameAction::MoveLeft));
        assert_eq!(map.action_for(press(KeyCode::Char('d'))), Some(GameAction::MoveRight));
        assert_eq!(map.action_for(press(KeyCode::Up)), Some(GameAction::Rotate));
        assert_eq!(map.action_for(press(KeyCode::Enter)), Some(GameAction::HardDrop));
        assert_eq!(map.action_for(press(KeyCode::Char(' '))), None);
        assert_eq!(map.action_for(press(KeyCode::Left)), None);
    }

    #[test]
    fn test_duplicate_binding_keeps_first() {
        let keys = KeyBindings {
            hold: "left".to_string(),
            ..KeyBindings::default()
        };
        let map = KeyMap::from_bindings(&keys);
        assert_eq!(map.action_for(press(KeyCode::Left)), Some(GameAction::MoveLeft));
        assert_eq!(map.key_for(GameAction::Hold), None);
    }

    #[test]
    fn test_parse_and_label() {
        assert_eq!(parse_key(" Space "), Some(KeyCode::Char(' ')));
        assert_eq!(parse_key("ESC"), Some(KeyCode::Esc));
        assert_eq!(parse_key("X"), Some(KeyCode::Char('x')));
        assert_eq!(parse_key(""), None);
        assert_eq!(parse_key("f13"), None);

        assert_eq!(key_label(KeyCode::Char(' ')), "Space");
        assert_eq!(key_label(KeyCode::Left), "←");
        assert_eq!(key_label(KeyCode::Char('c')), "c");
    }

    #[test]
    fn test_text_input() {
        assert_eq!(text_input(press(KeyCode::Char('a'))), Some(TextInput::Char('A')));
        assert_eq!(text_input(press(KeyCode::Char('7'))), Some(TextInput::Char('7')));
        assert_eq!(text_input(press(KeyCode::Char('-'))), None);
        assert_eq!(text_input(press(KeyCode::Enter)), Some(TextInput::Submit));
        assert_eq!(text_input(press(KeyCode::Backspace)), Some(TextInput::Backspace));
        assert_eq!(text_input(press(KeyCode::Esc)), Some(TextInput::Cancel));
    }
}
