use crate::games::chess::moves::ChessMove;
use crate::games::chess::pieces::ChessPiece;
use crate::games::chess::pieces::UncoloredChessPiece::*;
use crate::games::chess::squares::ChessSquare;
use crate::games::chess::{BoardError, Chessboard};
use crate::games::Color;
use crate::games::Color::*;
use crate::output::display_message;
use crate::output::Message::Error;

const KNIGHT_OFFSETS: [(isize, isize); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_OFFSETS: [(isize, isize); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

const ROOK_DIRECTIONS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

const BISHOP_DIRECTIONS: [(isize, isize); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

enum SliderMove {
    Bishop,
    Rook,
}

impl SliderMove {
    fn directions(self) -> &'static [(isize, isize)] {
        match self {
            SliderMove::Bishop => &BISHOP_DIRECTIONS,
            SliderMove::Rook => &ROOK_DIRECTIONS,
        }
    }
}

impl Color {
    /// Row delta of a single pawn push.
    fn pawn_direction(self) -> isize {
        match self {
            White => -1,
            Black => 1,
        }
    }

    fn pawn_home_row(self) -> usize {
        match self {
            White => 6,
            Black => 1,
        }
    }
}

impl Chessboard {
    /// Pseudo-legal moves of a piece with raw value `value` standing on `(row, column)`.
    /// The piece doesn't have to actually be on the board. Empty or invalid values and
    /// coordinates outside the board have no moves.
    pub fn pseudolegal_moves(&self, row: usize, column: usize, value: i8) -> Vec<ChessMove> {
        match (ChessSquare::new(row, column), ChessPiece::from_value(value)) {
            (Some(square), Some(piece)) => self.pseudolegal_moves_for(square, piece),
            _ => vec![],
        }
    }

    pub fn pseudolegal_moves_for(&self, square: ChessSquare, piece: ChessPiece) -> Vec<ChessMove> {
        let mut list = vec![];
        let color = piece.color;
        match piece.kind {
            Pawn => self.gen_pawn_moves(&mut list, square, color),
            Knight => self.gen_step_moves(&mut list, square, color, &KNIGHT_OFFSETS),
            King => self.gen_step_moves(&mut list, square, color, &KING_OFFSETS),
            Bishop => self.gen_slider_moves(&mut list, square, color, SliderMove::Bishop),
            Rook => self.gen_slider_moves(&mut list, square, color, SliderMove::Rook),
            Queen => {
                self.gen_slider_moves(&mut list, square, color, SliderMove::Rook);
                self.gen_slider_moves(&mut list, square, color, SliderMove::Bishop);
            }
        }
        list
    }

    fn gen_pawn_moves(&self, list: &mut Vec<ChessMove>, square: ChessSquare, color: Color) {
        let dir = color.pawn_direction();
        if let Some(single) = square.offset(dir, 0).filter(|s| self.is_empty(*s)) {
            list.push(ChessMove::new(square, single));
            if square.row() == color.pawn_home_row() {
                if let Some(double) = single.offset(dir, 0).filter(|s| self.is_empty(*s)) {
                    list.push(ChessMove::new(square, double));
                }
            }
        }
        for d_column in [-1, 1] {
            if let Some(target) = square.offset(dir, d_column) {
                if color.other().owns(self.value_at(target)) {
                    list.push(ChessMove::new(square, target));
                }
            }
        }
    }

    fn gen_step_moves(
        &self,
        list: &mut Vec<ChessMove>,
        square: ChessSquare,
        color: Color,
        offsets: &[(isize, isize)],
    ) {
        for &(d_row, d_column) in offsets {
            if let Some(target) = square.offset(d_row, d_column) {
                if !color.owns(self.value_at(target)) {
                    list.push(ChessMove::new(square, target));
                }
            }
        }
    }

    fn gen_slider_moves(
        &self,
        list: &mut Vec<ChessMove>,
        square: ChessSquare,
        color: Color,
        slider: SliderMove,
    ) {
        for &(d_row, d_column) in slider.directions() {
            let mut current = square;
            while let Some(target) = current.offset(d_row, d_column) {
                let value = self.value_at(target);
                if color.owns(value) {
                    break;
                }
                list.push(ChessMove::new(square, target));
                if value != 0 {
                    break;
                }
                current = target;
            }
        }
    }

    /// Pseudo-legal moves of all pieces of `color`, squares scanned from a8 to h1.
    pub fn all_pseudolegal_moves(&self, color: Color) -> Vec<ChessMove> {
        ChessSquare::iter()
            .filter_map(|square| {
                self.piece_on(square)
                    .filter(|piece| piece.color == color)
                    .map(|piece| self.pseudolegal_moves_for(square, piece))
            })
            .flatten()
            .collect()
    }

    /// The pseudo-legal moves of `color` that don't leave its own king attacked, in generation order.
    ///
    /// Each candidate is played with a raw relocation (so a king move from e1 to g1 is *not*
    /// treated as castling here), tested, and taken back. The board is unchanged afterwards.
    /// If `color` has no king, this is reported and all pseudo-legal moves are returned.
    pub fn legal_moves(&mut self, color: Color) -> Vec<ChessMove> {
        let pseudolegal = self.all_pseudolegal_moves(color);
        if self.king_square(color).is_none() {
            display_message(
                Error,
                &format!("{}, can't filter out illegal moves", BoardError::MissingKing(color)),
            );
            return pseudolegal;
        }
        pseudolegal
            .into_iter()
            .filter(|&mov| {
                let undo = self.relocate(mov.from_square(), mov.to_square());
                let in_check = matches!(self.try_is_in_check(color), Ok(true));
                self.undo(undo);
                !in_check
            })
            .collect()
    }

    /// The first king of `color` in row-major order.
    pub fn king_square(&self, color: Color) -> Option<ChessSquare> {
        let king = ChessPiece::new(color, King).value();
        ChessSquare::iter().find(|&square| self.value_at(square) == king)
    }

    /// Is any pseudo-legal move of the opponent aimed at the king of `color`?
    ///
    /// Only pseudo-legal moves are considered, so this never depends on [`Chessboard::legal_moves`].
    pub fn try_is_in_check(&self, color: Color) -> Result<bool, BoardError> {
        let king = self
            .king_square(color)
            .ok_or(BoardError::MissingKing(color))?;
        Ok(self
            .all_pseudolegal_moves(color.other())
            .iter()
            .any(|mov| mov.to_square() == king))
    }

    /// Like [`Chessboard::try_is_in_check`], but a side without a king is reported and treated as not in check.
    pub fn is_in_check(&self, color: Color) -> bool {
        self.try_is_in_check(color).unwrap_or_else(|err| {
            display_message(Error, &err.to_string());
            false
        })
    }
}
