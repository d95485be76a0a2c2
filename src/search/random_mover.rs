use std::fmt::{Debug, Formatter};

use rand::prelude::SliceRandom;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::games::chess::moves::ChessMove;
use crate::games::chess::Chessboard;
use crate::general::common::Res;
use crate::play::MoveHistory;
use crate::search::Searcher;

/// Picks one of the legal moves uniformly at random.
pub struct RandomMover<R: Rng> {
    rng: R,
}

impl<R: Rng> Debug for RandomMover<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("random mover")
    }
}

impl<R: Rng> RandomMover<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomMover<StdRng> {
    /// Plays the same game every time when given the same seed and the same opponent moves.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> Searcher for RandomMover<R> {
    fn search(&mut self, board: &mut Chessboard, _: &MoveHistory) -> Res<Option<ChessMove>> {
        let moves = board.legal_moves(board.active_player());
        Ok(moves.choose(&mut self.rng).copied())
    }

    fn name(&self) -> &str {
        "Random Mover"
    }
}
