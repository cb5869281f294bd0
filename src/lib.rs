//! blockfall (workspace facade crate).
//!
//! The game lives in dedicated crates under `crates/`; this package
//! re-exports them under short names and owns the pieces that only the
//! binary needs, such as the high-score table.

pub mod highscores;

pub use blockfall_config as config;
pub use blockfall_core as core;
pub use blockfall_input as input;
pub use blockfall_term as term;
pub use blockfall_types as types;
