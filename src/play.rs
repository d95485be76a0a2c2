use std::fmt::{Display, Formatter};

use itertools::Itertools;

use crate::games::chess::moves::ChessMove;
use crate::games::Color;
use crate::search::Searcher;

pub mod run_match;

pub type AnySearcher = Box<dyn Searcher>;

/// All moves played so far, starting from the initial position.
///
/// This is exactly what gets sent to the engine in `position startpos moves ...`,
/// so it's never edited, only appended to.
#[derive(Debug, Default, Clone, Eq, PartialEq, derive_more::Deref)]
pub struct MoveHistory(Vec<ChessMove>);

impl MoveHistory {
    pub fn push(&mut self, mov: ChessMove) {
        self.0.push(mov);
    }
}

impl Display for MoveHistory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join(" "))
    }
}

/// Why a match ended. Checkmate and stalemate both count as having no moves.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum GameResult {
    NoMoves(Color),
    PlyLimit,
}

impl Display for GameResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GameResult::NoMoves(color) => write!(f, "The {color} player has no moves left"),
            GameResult::PlyLimit => write!(f, "The ply limit has been reached"),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MatchOutcome {
    pub plies: usize,
    pub result: GameResult,
    pub history: MoveHistory,
}

impl Display for MatchOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{0} after {1} plies", self.result, self.plies)
    }
}
