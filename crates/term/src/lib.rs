//! Terminal rendering for blockfall.
//!
//! Everything draws into a [`FrameBuffer`] first. Only [`TerminalRenderer`]
//! touches the terminal, and it rewrites just the cells that changed.
//!
//! Board cells are two columns wide so blocks look square.

pub mod fb;
pub mod game_view;
pub mod render_throttle;
pub mod renderer;
pub mod screens;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{piece_style, GameView, Viewport};
pub use render_throttle::RenderThrottle;
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
pub use screens::{render_game_over, render_menu, render_name_entry, ScoreLine};
