//! 7-bag randomizer for piece generation
//!
//! Tetris uses a "7-bag" system where all 7 pieces are shuffled,
//! then dealt out before reshuffling. This prevents long droughts.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::tetromino::PieceKind;

/// Number of upcoming kinds shown to the player
pub const PREVIEW_LEN: usize = 3;

/// The 7-bag piece randomizer
#[derive(Debug, Clone)]
pub struct Bag {
    /// Current permutation, consumed front to back
    pieces: [PieceKind; 7],
    /// Index of the next piece to deal; 7 means empty
    cursor: usize,
    rng: ChaCha8Rng,
}

impl Default for Bag {
    fn default() -> Self {
        Self::new()
    }
}

impl Bag {
    /// Create a bag seeded from OS randomness
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    /// Create a bag with a fixed seed (reproducible sequence)
    pub fn with_seed(seed: u64) -> Self {
        Self {
            pieces: PieceKind::ALL,
            cursor: PieceKind::ALL.len(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Deal the next piece, reshuffling exactly when the bag is empty
    pub fn next(&mut self) -> PieceKind {
        if self.cursor == self.pieces.len() {
            self.refill();
        }
        let kind = self.pieces[self.cursor];
        self.cursor += 1;
        kind
    }

    /// Pieces left in the current bag
    pub fn remaining(&self) -> &[PieceKind] {
        &self.pieces[self.cursor..]
    }

    /// Refill with a fresh uniform permutation (Fisher-Yates)
    fn refill(&mut self) {
        self.pieces = PieceKind::ALL;
        self.pieces.shuffle(&mut self.rng);
        self.cursor = 0;
    }
}

/// The next [`PREVIEW_LEN`] kinds, backed by a [`Bag`]
#[derive(Debug, Clone)]
pub struct PreviewQueue {
    queue: VecDeque<PieceKind>,
}

impl PreviewQueue {
    /// Fill a new queue from the bag
    pub fn new(bag: &mut Bag) -> Self {
        let queue = (0..PREVIEW_LEN).map(|_| bag.next()).collect();
        Self { queue }
    }

    /// Take the front kind and top the queue back up from the bag
    pub fn pop(&mut self, bag: &mut Bag) -> PieceKind {
        let kind = self.queue.pop_front().unwrap_or_else(|| bag.next());
        while self.queue.len() < PREVIEW_LEN {
            self.queue.push_back(bag.next());
        }
        kind
    }

    /// Upcoming kinds, soonest first
    pub fn iter(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.queue.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<PieceKind> {
        self.iter().collect()
    }
}
