//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`] through the
//! configured key bindings. Name entry on the high-score screen has its own
//! small mapping in [`map::text_input`].

pub mod map;

pub use blockfall_types as types;

pub use map::{key_label, parse_key, text_input, KeyMap, TextInput};
