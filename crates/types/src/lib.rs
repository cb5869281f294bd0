//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data with no external dependencies, so they can be used
//! by the engine, the configuration layer, the input mapper and the renderer.
//!
//! # Defaults
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_BOARD_WIDTH` | 10 | Board columns |
//! | `DEFAULT_BOARD_HEIGHT` | 20 | Board rows |
//! | `LOCAL_GRID` | 5 | Side of the local shape grid |
//! | `DEFAULT_LOOKAHEAD` | 5 | Lookahead queue depth |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{ClearKind, GameAction, PieceKind, Rotation};
//!
//! assert_eq!(PieceKind::from_str("t"), Some(PieceKind::T));
//! assert_eq!(Rotation::R3.next(), Rotation::R0);
//! assert_eq!(GameAction::from_str("hardDrop"), Some(GameAction::HardDrop));
//! assert!(ClearKind::Tetris.is_difficult());
//! ```

/// Default board width in cells
pub const DEFAULT_BOARD_WIDTH: u16 = 10;

/// Default board height in cells
pub const DEFAULT_BOARD_HEIGHT: u16 = 20;

/// Side length of the local grid every rotation state is drawn in.
pub const LOCAL_GRID: i32 = 5;

/// Default number of upcoming pieces exposed to the renderer.
pub const DEFAULT_LOOKAHEAD: usize = 5;

/// Number of distinct piece kinds (and the size of one bag).
pub const PIECE_KIND_COUNT: usize = 7;

/// The seven tetromino piece kinds
///
/// Each piece has a distinct shape and color:
/// - **I**: Cyan, bar
/// - **O**: Yellow, 2x2 square
/// - **T**: Magenta, T-shaped
/// - **S**: Green, S-shaped
/// - **Z**: Red, Z-shaped (mirror of S)
/// - **J**: Blue, J-shaped
/// - **L**: Orange, L-shaped (mirror of J)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// Every kind, in canonical order. A fresh bag starts from this.
    pub const ALL: [PieceKind; PIECE_KIND_COUNT] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Uppercase letter used by the renderer panels.
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::O => "O",
            PieceKind::T => "T",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
            PieceKind::J => "J",
            PieceKind::L => "L",
        }
    }
}

/// Rotation state, cyclic over four indices.
///
/// `R0` is the spawn orientation; each step of [`Rotation::next`] is one
/// clockwise quarter turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    R0,
    R1,
    R2,
    R3,
}

impl Rotation {
    /// Advance to `(r + 1) mod 4`
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::Rotation;
    ///
    /// assert_eq!(Rotation::R0.next(), Rotation::R1);
    /// assert_eq!(Rotation::R3.next(), Rotation::R0);
    /// ```
    pub fn next(&self) -> Self {
        match self {
            Rotation::R0 => Rotation::R1,
            Rotation::R1 => Rotation::R2,
            Rotation::R2 => Rotation::R3,
            Rotation::R3 => Rotation::R0,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Rotation::R0 => 0,
            Rotation::R1 => 1,
            Rotation::R2 => 2,
            Rotation::R3 => 3,
        }
    }

    /// Build from an index, wrapping modulo 4.
    pub fn from_index(index: usize) -> Self {
        match index % 4 {
            0 => Rotation::R0,
            1 => Rotation::R1,
            2 => Rotation::R2,
            _ => Rotation::R3,
        }
    }
}

/// Discrete input actions the engine consumes, at most one per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Rotate piece one quarter turn clockwise (with horizontal kicks)
    Rotate,
    /// Drop piece one cell down, or start the lock timer when grounded
    SoftDrop,
    /// Drop to the landing row and lock immediately
    HardDrop,
    /// Swap the active piece with the hold slot (once per piece)
    Hold,
    /// Toggle pause state
    TogglePause,
}

impl GameAction {
    /// Every action, in key-binding order.
    pub const ALL: [GameAction; 7] = [
        GameAction::MoveLeft,
        GameAction::MoveRight,
        GameAction::Rotate,
        GameAction::SoftDrop,
        GameAction::HardDrop,
        GameAction::Hold,
        GameAction::TogglePause,
    ];

    /// Parse action from its camelCase name (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("rotate"), Some(GameAction::Rotate));
    /// assert_eq!(GameAction::from_str("unknown"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "rotate" => Some(GameAction::Rotate),
            "softdrop" => Some(GameAction::SoftDrop),
            "harddrop" => Some(GameAction::HardDrop),
            "hold" => Some(GameAction::Hold),
            "togglepause" | "pause" => Some(GameAction::TogglePause),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::Rotate => "rotate",
            GameAction::SoftDrop => "softDrop",
            GameAction::HardDrop => "hardDrop",
            GameAction::Hold => "hold",
            GameAction::TogglePause => "togglePause",
        }
    }
}

/// T-Spin detection result
///
/// - **None**: Not a T-spin
/// - **Mini**: exactly two corners occupied, at least one of them a front corner
/// - **Full**: three or more corners occupied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TSpinKind {
    #[default]
    None,
    Mini,
    Full,
}

impl TSpinKind {
    /// Returns `None` for `TSpinKind::None`, `Some("mini")` / `Some("full")` otherwise.
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            TSpinKind::None => None,
            TSpinKind::Mini => Some("mini"),
            TSpinKind::Full => Some("full"),
        }
    }
}

/// Closed set of scoring clear kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClearKind {
    Single,
    Double,
    Triple,
    Tetris,
    TSpinMini,
    TSpin,
    TSpinSingle,
    TSpinDouble,
    TSpinTriple,
}

impl ClearKind {
    pub const ALL: [ClearKind; 9] = [
        ClearKind::Single,
        ClearKind::Double,
        ClearKind::Triple,
        ClearKind::Tetris,
        ClearKind::TSpinMini,
        ClearKind::TSpin,
        ClearKind::TSpinSingle,
        ClearKind::TSpinDouble,
        ClearKind::TSpinTriple,
    ];

    /// Select the clear kind for a lock outcome.
    ///
    /// A T-Spin (full or mini) with zero lines keeps its own base kind; with
    /// 1-3 lines it becomes T-Spin Single/Double/Triple regardless of mini.
    /// Without a T-Spin, zero lines is not a clear at all.
    ///
    /// ```
    /// use blockfall_types::{ClearKind, TSpinKind};
    ///
    /// assert_eq!(ClearKind::classify(TSpinKind::None, 0), None);
    /// assert_eq!(ClearKind::classify(TSpinKind::None, 4), Some(ClearKind::Tetris));
    /// assert_eq!(ClearKind::classify(TSpinKind::Mini, 0), Some(ClearKind::TSpinMini));
    /// assert_eq!(ClearKind::classify(TSpinKind::Mini, 2), Some(ClearKind::TSpinDouble));
    /// ```
    pub fn classify(tspin: TSpinKind, lines: usize) -> Option<Self> {
        match (tspin, lines) {
            (TSpinKind::None, 1) => Some(ClearKind::Single),
            (TSpinKind::None, 2) => Some(ClearKind::Double),
            (TSpinKind::None, 3) => Some(ClearKind::Triple),
            (TSpinKind::None, 4) => Some(ClearKind::Tetris),
            (TSpinKind::None, _) => None,
            (_, 1) => Some(ClearKind::TSpinSingle),
            (_, 2) => Some(ClearKind::TSpinDouble),
            (_, 3) => Some(ClearKind::TSpinTriple),
            (TSpinKind::Mini, _) => Some(ClearKind::TSpinMini),
            (TSpinKind::Full, _) => Some(ClearKind::TSpin),
        }
    }

    /// Difficult clears feed and consume the back-to-back streak.
    pub fn is_difficult(&self) -> bool {
        !matches!(
            self,
            ClearKind::Single | ClearKind::Double | ClearKind::Triple
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClearKind::Single => "single",
            ClearKind::Double => "double",
            ClearKind::Triple => "triple",
            ClearKind::Tetris => "tetris",
            ClearKind::TSpinMini => "tspin_mini",
            ClearKind::TSpin => "tspin",
            ClearKind::TSpinSingle => "tspin_single",
            ClearKind::TSpinDouble => "tspin_double",
            ClearKind::TSpinTriple => "tspin_triple",
        }
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(PieceKind)`: Locked block, keeps its kind for coloring
pub type Cell = Option<PieceKind>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_cycles_through_all_four_states() {
        let mut r = Rotation::R0;
        for expected in [Rotation::R1, Rotation::R2, Rotation::R3, Rotation::R0] {
            r = r.next();
            assert_eq!(r, expected);
        }
        assert_eq!(Rotation::from_index(6), Rotation::R2);
        assert_eq!(Rotation::R3.index(), 3);
    }

    #[test]
    fn difficult_clears_are_tetris_and_tspins() {
        let difficult: Vec<_> = ClearKind::ALL
            .iter()
            .filter(|k| k.is_difficult())
            .copied()
            .collect();
        assert_eq!(difficult.len(), 6);
        assert!(!difficult.contains(&ClearKind::Single));
        assert!(!difficult.contains(&ClearKind::Double));
        assert!(!difficult.contains(&ClearKind::Triple));
    }

    #[test]
    fn classify_tspin_lines() {
        assert_eq!(
            ClearKind::classify(TSpinKind::Full, 0),
            Some(ClearKind::TSpin)
        );
        assert_eq!(
            ClearKind::classify(TSpinKind::Full, 3),
            Some(ClearKind::TSpinTriple)
        );
        assert_eq!(
            ClearKind::classify(TSpinKind::Mini, 1),
            Some(ClearKind::TSpinSingle)
        );
        assert_eq!(ClearKind::classify(TSpinKind::None, 0), None);
    }

    #[test]
    fn action_names_roundtrip() {
        for action in GameAction::ALL {
            assert_eq!(GameAction::from_str(action.as_str()), Some(action));
        }
    }
}
