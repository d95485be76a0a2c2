use std::fmt::Write;

use colored::{Color, Colorize};
use itertools::Itertools;

use crate::games::chess::moves::ChessMove;
use crate::games::chess::pieces::ChessPiece;
use crate::games::chess::squares::{ChessSquare, NUM_COLUMNS, NUM_ROWS};
use crate::games::Color::White;
use crate::ui::{BoardView, Graphics};

#[derive(Debug, Default)]
pub struct PrettyUI {}

fn color(piece: Option<ChessPiece>, square: ChessSquare, last_move: Option<ChessMove>) -> String {
    let white_bg_col = Color::White;
    let black_bg_col = Color::Black;
    let white_piece_col = Color::Green;
    let black_piece_col = Color::Cyan;
    let move_bg_color = Color::Red;
    let bg_color = if last_move.is_some_and(|m| m.from_square() == square || m.to_square() == square)
    {
        move_bg_color
    } else if (square.row() + square.column()) % 2 == 0 {
        white_bg_col
    } else {
        black_bg_col
    };

    match piece {
        None => "  ".color(Color::Black),
        Some(piece) if piece.color == White => {
            (piece.to_utf8_char().to_string() + " ").color(white_piece_col)
        }
        Some(piece) => (piece.to_utf8_char().to_string() + " ").color(black_piece_col),
    }
    .on_color(bg_color)
    .to_string()
}

impl Graphics for PrettyUI {
    fn as_string(&self, view: &BoardView) -> String {
        let mut res = match view.last_move {
            None => "Starting new game!\n".to_string(),
            Some(mov) => format!("Ply {0}: {mov}\n", view.ply),
        };
        for row in 0..NUM_ROWS {
            res.push(' ');
            for column in 0..NUM_COLUMNS {
                let square = ChessSquare::unchecked(row, column);
                res += &color(view.board.piece_on(square), square, view.last_move);
            }
            _ = writeln!(res, " {0}", NUM_ROWS - row);
        }
        _ = writeln!(res, " {0}", ('A'..='H').join(" "));
        res
    }
}
