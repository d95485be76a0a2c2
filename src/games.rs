use std::fmt::{self, Display, Formatter};

use strum_macros::EnumIter;

pub mod chess;

/// The two sides. White's pieces are stored as positive values, Black's as negative ones.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, EnumIter)]
pub enum Color {
    #[default]
    White = 0,
    Black = 1,
}

impl Color {
    pub fn other(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub fn sign(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Does the raw square value belong to this side? Empty squares belong to nobody.
    pub fn owns(self, value: i8) -> bool {
        match self {
            Color::White => value > 0,
            Color::Black => value < 0,
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}
