//! Game state module - the authoritative per-tick state transition
//!
//! This module ties together all core components: board, pieces, randomizer,
//! lock delay and scoring. Callers drive it through [`GameState::tick`] with
//! a wall-clock timestamp and at most one action; renderers read it through
//! [`GameState::snapshot_into`].
//!
//! The engine never reads the clock itself. Every timing decision compares
//! the `now` passed in against timestamps stored from earlier ticks.

use std::time::{Duration, Instant};

use arrayvec::ArrayVec;
use blockfall_config::EngineConfig;
use log::{debug, info};

use crate::board::{Board, MAX_CLEARED_ROWS};
use crate::lock::{LockController, LockState};
use crate::piece::ActivePiece;
use crate::rng::{PieceQueue, Randomizer};
use crate::scoring::{detect_tspin, ScoreResult, ScoreState};
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::types::{ClearKind, GameAction, PieceKind, TSpinKind};

/// Outcome of the most recent lock, kept until an observer takes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockEvent {
    pub piece: PieceKind,
    pub tspin: TSpinKind,
    pub result: ScoreResult,
}

/// Rows cleared by the last lock and when they were cleared.
///
/// `rows` are board row slots as numbered before compaction. Rows above a
/// gap have already shifted down into some of them.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LineFlash {
    rows: ArrayVec<usize, MAX_CLEARED_ROWS>,
    started: Instant,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    config: EngineConfig,
    board: Board,
    active: ActivePiece,
    hold: Option<PieceKind>,
    can_hold: bool,
    queue: PieceQueue,
    lock: LockController,
    score: ScoreState,
    last_move_was_rotation: bool,
    /// Set while paused; the pause start is used to freeze timers on resume.
    paused_at: Option<Instant>,
    game_over: bool,
    last_gravity: Instant,
    flash: Option<LineFlash>,
    /// Clear made by the most recent lock. Survives `take_last_event`.
    last_clear: Option<ClearKind>,
    last_event: Option<LockEvent>,
}

impl GameState {
    /// New game seeded from OS entropy, starting at the lowest level.
    pub fn new(config: EngineConfig, now: Instant) -> Self {
        let start_level = config.min_level;
        Self::with_randomizer(config, Randomizer::from_entropy(), start_level, now)
    }

    /// New game with a reproducible piece sequence.
    pub fn with_seed(config: EngineConfig, seed: u64, now: Instant) -> Self {
        let start_level = config.min_level;
        Self::with_randomizer(config, Randomizer::seeded(seed), start_level, now)
    }

    /// New game starting at `start_level`, clamped to the configured range.
    pub fn with_randomizer(
        config: EngineConfig,
        mut randomizer: Randomizer,
        start_level: u32,
        now: Instant,
    ) -> Self {
        let board = Board::new(config.board_width, config.board_height);
        let first = randomizer.next();
        let queue = PieceQueue::new(config.lookahead_depth, randomizer);
        let level = config.clamp_level(start_level);

        let mut state = Self {
            active: ActivePiece::spawn(first, board.width()),
            board,
            hold: None,
            can_hold: true,
            queue,
            lock: LockController::new(config.lock_delay),
            score: ScoreState::new(level),
            last_move_was_rotation: false,
            paused_at: None,
            game_over: false,
            last_gravity: now,
            flash: None,
            last_clear: None,
            last_event: None,
            config,
        };
        state.spawn(first);
        debug!(
            "new game: {}x{} board, level {}",
            state.board.width(),
            state.board.height(),
            level
        );
        state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn active(&self) -> ActivePiece {
        self.active
    }

    pub fn hold_piece(&self) -> Option<PieceKind> {
        self.hold
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    /// Upcoming pieces, front first.
    pub fn next_queue(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.queue.preview()
    }

    pub fn score(&self) -> u32 {
        self.score.score
    }

    pub fn level(&self) -> u32 {
        self.score.level
    }

    pub fn lines(&self) -> u32 {
        self.score.lines
    }

    pub fn back_to_back(&self) -> bool {
        self.score.back_to_back
    }

    pub fn paused(&self) -> bool {
        self.paused_at.is_some()
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn last_move_was_rotation(&self) -> bool {
        self.last_move_was_rotation
    }

    pub fn lock_state(&self) -> LockState {
        self.lock.state()
    }

    /// Current gravity interval for the level in effect.
    pub fn gravity_interval(&self) -> Duration {
        self.config.gravity_interval(self.score.level)
    }

    /// Check if the active piece is on the ground
    pub fn is_grounded(&self) -> bool {
        self.active.is_grounded(&self.board)
    }

    /// Calculate the ghost piece Y position (where piece would land)
    pub fn ghost_y(&self) -> i32 {
        self.active.landing_y(&self.board)
    }

    /// Clear made by the most recent lock, `None` if it cleared nothing.
    pub fn last_clear(&self) -> Option<ClearKind> {
        self.last_clear
    }

    /// Take and clear the last lock event.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    /// Advance the game to `now`, applying at most one action first.
    ///
    /// Order: action, gravity, lock delay, flash expiry. Pause toggles are
    /// always honored; while paused nothing else runs. Once the game is over
    /// the state never changes again. Returns whether anything changed.
    pub fn tick(&mut self, now: Instant, action: Option<GameAction>) -> bool {
        if self.game_over {
            return false;
        }

        if action == Some(GameAction::TogglePause) {
            self.toggle_pause(now);
            return true;
        }

        if self.paused() {
            return false;
        }

        let mut changed = match action {
            Some(action) => self.apply_action(action, now),
            None => false,
        };
        if self.game_over {
            return true;
        }

        changed |= self.apply_gravity(now);

        if self.lock.update(self.is_grounded(), now) {
            self.lock_piece(now);
            changed = true;
        }

        changed |= self.expire_flash(now);
        changed
    }

    /// Apply a game action. While paused only `TogglePause` is accepted.
    pub fn apply_action(&mut self, action: GameAction, now: Instant) -> bool {
        if self.game_over {
            return false;
        }
        if self.paused() && action != GameAction::TogglePause {
            return false;
        }

        match action {
            GameAction::MoveLeft => self.try_move(-1, now),
            GameAction::MoveRight => self.try_move(1, now),
            GameAction::Rotate => self.rotate(now),
            GameAction::SoftDrop => self.soft_drop(now),
            GameAction::HardDrop => {
                self.hard_drop(now);
                true
            }
            GameAction::Hold => self.hold(now),
            GameAction::TogglePause => {
                self.toggle_pause(now);
                true
            }
        }
    }

    /// Shift the active piece horizontally; a blocked move is a no-op.
    pub(crate) fn try_move(&mut self, dx: i32, now: Instant) -> bool {
        let moved = self.active.shifted(dx, 0);
        if !moved.is_valid(&self.board, 0) {
            return false;
        }

        self.active = moved;
        self.last_move_was_rotation = false;
        self.lock.on_moved(self.is_grounded(), now);
        true
    }

    /// Rotate with the horizontal kick list; a fully blocked rotation is a no-op.
    pub(crate) fn rotate(&mut self, now: Instant) -> bool {
        let Some((rotated, kick)) = self.active.try_rotate(&self.board) else {
            return false;
        };

        if kick != 0 {
            debug!("{:?} rotation kicked by {}", rotated.kind, kick);
        }
        self.active = rotated;
        self.last_move_was_rotation = true;
        self.lock.on_moved(self.is_grounded(), now);
        true
    }

    /// Move down one row for a point, or start the lock timer when grounded.
    pub(crate) fn soft_drop(&mut self, now: Instant) -> bool {
        if self.is_grounded() {
            self.lock.ensure_started(now);
            return false;
        }

        self.active = self.active.shifted(0, 1);
        self.score.add_drop(1, false);
        self.last_move_was_rotation = false;
        true
    }

    /// Drop to the landing row and lock immediately. Returns the rows dropped.
    pub(crate) fn hard_drop(&mut self, now: Instant) -> u32 {
        let distance = self.active.drop_distance(&self.board);
        self.active = self.active.shifted(0, distance);
        let rows = distance.max(0) as u32;
        self.score.add_drop(rows, true);
        self.lock_piece(now);
        rows
    }

    /// Swap active piece with hold piece
    pub(crate) fn hold(&mut self, now: Instant) -> bool {
        if self.game_over || !self.can_hold {
            return false;
        }

        let current = self.active.kind;
        let next = match self.hold.replace(current) {
            Some(held) => held,
            None => self.queue.draw(),
        };
        debug!("hold {:?}, now playing {:?}", current, next);

        self.can_hold = false;
        self.last_move_was_rotation = false;
        self.spawn(next);
        // A fresh piece re-evaluates the timer from scratch.
        self.lock.update(self.is_grounded(), now);
        true
    }

    /// Pause, or resume and push every stored timestamp past the pause.
    pub fn toggle_pause(&mut self, now: Instant) {
        match self.paused_at.take() {
            Some(since) => {
                let paused_for = now.saturating_duration_since(since);
                self.lock.shift(paused_for);
                self.last_gravity += paused_for;
                if let Some(flash) = self.flash.as_mut() {
                    flash.started += paused_for;
                }
                debug!("resumed after {:?}", paused_for);
            }
            None => {
                self.paused_at = Some(now);
                debug!("paused");
            }
        }
    }

    /// Gravity step: strictly longer than one interval since the last step.
    fn apply_gravity(&mut self, now: Instant) -> bool {
        let interval = self.gravity_interval();
        if now.saturating_duration_since(self.last_gravity) <= interval {
            return false;
        }

        self.last_gravity = now;
        if self.is_grounded() {
            return false;
        }
        self.active = self.active.shifted(0, 1);
        true
    }

    fn expire_flash(&mut self, now: Instant) -> bool {
        let expired = self.flash.as_ref().is_some_and(|flash| {
            now.saturating_duration_since(flash.started) >= self.config.flash_duration
        });
        if expired {
            self.flash = None;
        }
        expired
    }

    /// Lock the active piece onto the board, clear rows, score, and spawn next.
    pub(crate) fn lock_piece(&mut self, now: Instant) {
        if self.game_over {
            return;
        }

        let piece = self.active;
        let tspin = detect_tspin(&self.board, &piece, self.last_move_was_rotation);

        self.board.lock_cells(&piece.blocks(), piece.kind);
        let cleared = self.board.clear_full_rows();
        let result = self.score.award_clear(
            &self.config.scores,
            tspin,
            cleared.len(),
            self.config.max_level,
        );

        if let Some(clear) = result.clear {
            debug!(
                "{} for {} points (b2b applied: {}), level {}",
                clear.as_str(),
                result.points,
                result.b2b_applied,
                self.score.level
            );
        }
        if !cleared.is_empty() {
            self.flash = Some(LineFlash {
                rows: cleared,
                started: now,
            });
        }

        self.last_clear = result.clear;
        self.last_event = Some(LockEvent {
            piece: piece.kind,
            tspin,
            result,
        });

        self.can_hold = true;
        self.last_move_was_rotation = false;
        let next = self.queue.draw();
        self.spawn(next);
    }

    /// Place `kind` at the spawn position. A blocked spawn ends the game.
    fn spawn(&mut self, kind: PieceKind) -> bool {
        self.active = ActivePiece::spawn(kind, self.board.width());
        self.lock.reset();

        if !self.active.is_valid(&self.board, 0) {
            self.game_over = true;
            info!(
                "game over: score {}, lines {}, level {}",
                self.score.score, self.score.lines, self.score.level
            );
            return false;
        }
        true
    }

    /// Fill `out` with the current state, reusing its buffers.
    pub fn snapshot_into(&self, now: Instant, out: &mut GameSnapshot) {
        out.width = self.board.width() as u16;
        out.height = self.board.height() as u16;
        out.board.clear();
        out.board.extend_from_slice(self.board.cells());

        out.active = (!self.game_over).then(|| ActiveSnapshot::from(self.active));
        out.ghost_y = (self.config.ghost_enabled && !self.game_over).then(|| self.ghost_y());
        out.hold = self.hold;
        out.can_hold = self.can_hold;
        self.queue.preview_into(&mut out.next_queue);
        out.score = self.score.score;
        out.level = self.score.level;
        out.lines = self.score.lines;
        out.back_to_back = self.score.back_to_back;
        out.paused = self.paused();
        out.game_over = self.game_over;

        out.flashing_rows.clear();
        out.flash_elapsed = None;
        if let Some(flash) = &self.flash {
            out.flashing_rows.clone_from(&flash.rows);
            // Time stands still while paused.
            let until = self.paused_at.unwrap_or(now);
            out.flash_elapsed = Some(until.saturating_duration_since(flash.started));
        }
        out.last_clear = self.last_clear;
    }

    pub fn snapshot(&self, now: Instant) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(now, &mut s);
        s
    }
}
