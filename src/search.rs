use std::fmt::Debug;

use crate::games::chess::moves::ChessMove;
use crate::games::chess::Chessboard;
use crate::general::common::Res;
use crate::play::MoveHistory;

pub mod perft;
pub mod random_mover;
pub mod uci_engine;

/// Something that picks the next move for the side to move.
///
/// The board is borrowed mutably because finding legal moves temporarily changes it; a searcher
/// must leave it exactly as it found it. `Ok(None)` means that there is no move to play.
pub trait Searcher: Debug {
    fn search(&mut self, board: &mut Chessboard, history: &MoveHistory)
        -> Res<Option<ChessMove>>;

    fn name(&self) -> &str;
}
