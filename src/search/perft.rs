use std::fmt;
use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};

use crate::games::chess::moves::ChessMove;
use crate::games::chess::Chessboard;
use crate::games::Color;

#[derive(Copy, Clone, Debug, Default)]
pub struct PerftRes {
    pub time: Duration,
    pub nodes: u64,
    pub depth: usize,
}

impl PerftRes {
    pub fn nps(&self) -> u64 {
        self.nodes * 1_000_000 / (self.time.as_micros() as u64).max(1)
    }
}

impl Display for PerftRes {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "info depth {depth} nodes {nodes} time {time} nps {nps}",
            depth = self.depth,
            nodes = self.nodes,
            time = self.time.as_millis(),
            nps = self.nps()
        )
    }
}

#[derive(Default, Debug)]
pub struct SplitPerftRes {
    pub perft_res: PerftRes,
    pub children: Vec<(ChessMove, u64)>,
}

impl Display for SplitPerftRes {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.perft_res)?;
        for (mov, nodes) in &self.children {
            write!(f, "\n{mov}\t{nodes}")?;
        }
        Ok(())
    }
}

/// Moves are played by relocating pieces and taken back afterwards, exactly like the legality
/// filter does it, so the board is unchanged when this returns.
fn do_perft(depth: usize, board: &mut Chessboard, color: Color) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = board.legal_moves(color);
    if depth == 1 {
        return moves.len() as u64;
    }
    let mut nodes = 0;
    for mov in moves {
        let undo = board.relocate(mov.from_square(), mov.to_square());
        nodes += do_perft(depth - 1, board, color.other());
        board.undo(undo);
    }
    nodes
}

pub fn perft(depth: usize, board: &mut Chessboard, color: Color) -> PerftRes {
    let start = Instant::now();
    let nodes = do_perft(depth, board, color);
    let time = start.elapsed();

    PerftRes { time, nodes, depth }
}

/// Like [`perft`], but also reports the node count below each legal root move.
/// A depth of 0 is treated as 1.
pub fn split_perft(depth: usize, board: &mut Chessboard, color: Color) -> SplitPerftRes {
    let depth = depth.max(1);
    let mut nodes = 0;
    let mut res = SplitPerftRes::default();
    let start = Instant::now();
    for mov in board.legal_moves(color) {
        let undo = board.relocate(mov.from_square(), mov.to_square());
        let child_nodes = do_perft(depth - 1, board, color.other());
        board.undo(undo);
        res.children.push((mov, child_nodes));
        nodes += child_nodes;
    }
    let time = start.elapsed();
    res.children
        .sort_by(|a, b| a.0.to_string().cmp(&b.0.to_string()));
    res.perft_res = PerftRes { time, nodes, depth };
    res
}
