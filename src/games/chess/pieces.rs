use std::fmt::{Display, Formatter};

use strum_macros::{EnumIter, FromRepr};

use crate::games::chess::pieces::UncoloredChessPiece::*;
use crate::games::Color;

pub const MAX_PIECE_VALUE: i8 = 6;

// normal unicode symbols
pub const UNICODE_WHITE_PAWN: char = '♙';
pub const UNICODE_WHITE_KNIGHT: char = '♘';
pub const UNICODE_WHITE_BISHOP: char = '♗';
pub const UNICODE_WHITE_ROOK: char = '♖';
pub const UNICODE_WHITE_QUEEN: char = '♕';
pub const UNICODE_WHITE_KING: char = '♔';

pub const UNICODE_BLACK_PAWN: char = '\u{265F}'; // the '♟︎' character seems to give some editors trouble
pub const UNICODE_BLACK_KNIGHT: char = '♞';
pub const UNICODE_BLACK_BISHOP: char = '♝';
pub const UNICODE_BLACK_ROOK: char = '♜';
pub const UNICODE_BLACK_QUEEN: char = '♛';
pub const UNICODE_BLACK_KING: char = '♚';

/// The discriminants are the magnitudes used in the raw board grid.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, EnumIter, FromRepr)]
#[repr(i8)]
pub enum UncoloredChessPiece {
    Pawn = 1,
    Rook = 2,
    Knight = 3,
    Bishop = 4,
    Queen = 5,
    King = 6,
}

impl UncoloredChessPiece {
    pub fn magnitude(self) -> i8 {
        self as i8
    }

    /// Lowercase letter, as used for promotions in move tokens.
    pub fn to_ascii_char(self) -> char {
        match self {
            Pawn => 'p',
            Rook => 'r',
            Knight => 'n',
            Bishop => 'b',
            Queen => 'q',
            King => 'k',
        }
    }

    pub fn from_ascii_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'p' => Some(Pawn),
            'r' => Some(Rook),
            'n' => Some(Knight),
            'b' => Some(Bishop),
            'q' => Some(Queen),
            'k' => Some(King),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ChessPiece {
    pub kind: UncoloredChessPiece,
    pub color: Color,
}

impl ChessPiece {
    pub fn new(color: Color, kind: UncoloredChessPiece) -> Self {
        Self { kind, color }
    }

    /// Decodes a raw grid value. Returns `None` for empty squares and for values outside -6..=6.
    pub fn from_value(value: i8) -> Option<Self> {
        if value == 0 || !(-MAX_PIECE_VALUE..=MAX_PIECE_VALUE).contains(&value) {
            return None;
        }
        let color = if value > 0 { Color::White } else { Color::Black };
        UncoloredChessPiece::from_repr(value.abs()).map(|kind| Self { kind, color })
    }

    pub fn value(self) -> i8 {
        self.kind.magnitude() * self.color.sign()
    }

    pub fn to_ascii_char(self) -> char {
        let c = self.kind.to_ascii_char();
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    pub fn from_ascii_char(c: char) -> Option<Self> {
        let kind = UncoloredChessPiece::from_ascii_char(c)?;
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Self { kind, color })
    }

    pub fn to_utf8_char(self) -> char {
        match (self.color, self.kind) {
            (Color::White, Pawn) => UNICODE_WHITE_PAWN,
            (Color::White, Knight) => UNICODE_WHITE_KNIGHT,
            (Color::White, Bishop) => UNICODE_WHITE_BISHOP,
            (Color::White, Rook) => UNICODE_WHITE_ROOK,
            (Color::White, Queen) => UNICODE_WHITE_QUEEN,
            (Color::White, King) => UNICODE_WHITE_KING,
            (Color::Black, Pawn) => UNICODE_BLACK_PAWN,
            (Color::Black, Knight) => UNICODE_BLACK_KNIGHT,
            (Color::Black, Bishop) => UNICODE_BLACK_BISHOP,
            (Color::Black, Rook) => UNICODE_BLACK_ROOK,
            (Color::Black, Queen) => UNICODE_BLACK_QUEEN,
            (Color::Black, King) => UNICODE_BLACK_KING,
        }
    }
}

impl Display for ChessPiece {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_utf8_char())
    }
}
