use std::fmt::{Display, Formatter};
use std::str::FromStr;

use strum_macros::EnumIter;

use crate::games::chess::pieces::UncoloredChessPiece;
use crate::games::chess::squares::{ChessSquare, NotationError, A_FILE_NO, H_FILE_NO};

#[derive(Copy, Clone, Eq, PartialEq, Debug, EnumIter)]
pub enum CastleSide {
    Queenside,
    Kingside,
}

impl CastleSide {
    pub fn rook_file(self) -> usize {
        match self {
            CastleSide::Queenside => A_FILE_NO,
            CastleSide::Kingside => H_FILE_NO,
        }
    }
}

impl Display for CastleSide {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CastleSide::Queenside => write!(f, "queenside"),
            CastleSide::Kingside => write!(f, "kingside"),
        }
    }
}

/// What `Chessboard::apply` actually did with a move.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum AppliedMove {
    Normal,
    Castle(CastleSide),
}

/// A move from one square to another.
///
/// The promotion piece only exists so that engine tokens like `e7e8q` survive being stored
/// in the move history. The board never generates or interprets promotions.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct ChessMove {
    from: ChessSquare,
    to: ChessSquare,
    promo: Option<UncoloredChessPiece>,
}

impl ChessMove {
    pub fn new(from: ChessSquare, to: ChessSquare) -> Self {
        Self {
            from,
            to,
            promo: None,
        }
    }

    pub fn from_coordinates(
        from_row: usize,
        from_column: usize,
        to_row: usize,
        to_column: usize,
    ) -> Option<Self> {
        Some(Self::new(
            ChessSquare::new(from_row, from_column)?,
            ChessSquare::new(to_row, to_column)?,
        ))
    }

    pub fn with_promo(mut self, piece: UncoloredChessPiece) -> Self {
        self.promo = Some(piece);
        self
    }

    pub fn from_square(self) -> ChessSquare {
        self.from
    }

    pub fn to_square(self) -> ChessSquare {
        self.to
    }

    pub fn promo(self) -> Option<UncoloredChessPiece> {
        self.promo
    }

    /// Same from and to square, ignoring the promotion piece.
    pub fn same_squares(self, other: ChessMove) -> bool {
        self.from == other.from && self.to == other.to
    }
}

impl Display for ChessMove {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{0}{1}", self.from, self.to)?;
        if let Some(piece) = self.promo {
            write!(f, "{}", piece.to_ascii_char())?;
        }
        Ok(())
    }
}

impl FromStr for ChessMove {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || NotationError::InvalidMove(s.to_string());
        let s = s.trim();
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(err());
        }
        let from = ChessSquare::from_str(&s[0..2]).map_err(|_| err())?;
        let to = ChessSquare::from_str(&s[2..4]).map_err(|_| err())?;
        let mov = Self::new(from, to);
        match s[4..].chars().next() {
            None => Ok(mov),
            Some(c) => UncoloredChessPiece::from_ascii_char(c)
                .map(|piece| mov.with_promo(piece))
                .ok_or_else(err),
        }
    }
}

/// Token for the move between two raw coordinates, e.g. `(6, 4, 4, 4)` is `e2e4`.
pub fn to_move_token(
    from_row: usize,
    from_column: usize,
    to_row: usize,
    to_column: usize,
) -> Option<String> {
    ChessMove::from_coordinates(from_row, from_column, to_row, to_column).map(|m| m.to_string())
}
