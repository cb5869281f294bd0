//! RNG module - 7-bag random piece generation
//!
//! Implements the "7-bag" randomization algorithm used in modern Tetris.
//! Each bag contains one of each piece (I, O, T, S, Z, J, L), shuffled with a
//! uniform Fisher-Yates permutation. Draws from the bag until empty, then
//! shuffles a new one.
//!
//! Production games seed from OS entropy; tests pass a fixed seed so piece
//! sequences are reproducible.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::types::{PieceKind, PIECE_KIND_COUNT};

/// 7-bag piece generator
#[derive(Debug, Clone)]
pub struct Randomizer {
    /// Current bag of pieces
    bag: [PieceKind; PIECE_KIND_COUNT],
    /// Index into current bag; `PIECE_KIND_COUNT` means exhausted
    bag_index: usize,
    rng: StdRng,
}

impl Randomizer {
    /// Seed from the process entropy source.
    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic sequence for tests and replays of a known seed.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            bag: PieceKind::ALL,
            bag_index: PIECE_KIND_COUNT,
            rng,
        }
    }

    /// Generate a new shuffled bag
    fn refill_bag(&mut self) {
        self.bag = PieceKind::ALL;
        self.bag.shuffle(&mut self.rng);
        self.bag_index = 0;
    }

    /// Draw the next piece, refilling the bag only when it is exhausted.
    pub fn next(&mut self) -> PieceKind {
        if self.bag_index >= PIECE_KIND_COUNT {
            self.refill_bag();
        }

        let piece = self.bag[self.bag_index];
        self.bag_index += 1;
        piece
    }

    /// Pieces still waiting in the current bag.
    pub fn remaining(&self) -> &[PieceKind] {
        &self.bag[self.bag_index.min(PIECE_KIND_COUNT)..]
    }
}

/// Lookahead queue of upcoming pieces, topped up one-for-one from the bag.
#[derive(Debug, Clone)]
pub struct PieceQueue {
    upcoming: VecDeque<PieceKind>,
    randomizer: Randomizer,
}

impl PieceQueue {
    /// Fill a queue of `depth` (at least 1) pieces.
    pub fn new(depth: usize, mut randomizer: Randomizer) -> Self {
        let depth = depth.max(1);
        // One spare slot: `draw` pushes before it pops.
        let mut upcoming = VecDeque::with_capacity(depth + 1);
        upcoming.extend((0..depth).map(|_| randomizer.next()));
        Self {
            upcoming,
            randomizer,
        }
    }

    /// Take the front piece and append a fresh one from the bag.
    pub fn draw(&mut self) -> PieceKind {
        let next = self.randomizer.next();
        self.upcoming.push_back(next);
        // Never empty: `new` fills at least one and every draw pushes first.
        self.upcoming.pop_front().unwrap_or(next)
    }

    /// Peek at the next piece without removing it
    pub fn peek(&self) -> Option<PieceKind> {
        self.upcoming.front().copied()
    }

    /// Upcoming pieces, front first.
    pub fn preview(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.upcoming.iter().copied()
    }

    pub fn depth(&self) -> usize {
        self.upcoming.len()
    }

    /// Copy the preview into `out`, reusing its allocation.
    pub fn preview_into(&self, out: &mut Vec<PieceKind>) {
        out.clear();
        out.extend(self.preview());
    }
}
