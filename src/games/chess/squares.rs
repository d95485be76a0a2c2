use std::fmt::{Display, Formatter};
use std::str::FromStr;

use thiserror::Error;

pub const NUM_ROWS: usize = 8;
pub const NUM_COLUMNS: usize = 8;
pub const NUM_SQUARES: usize = NUM_ROWS * NUM_COLUMNS;
pub const A_FILE_NO: usize = 0;
pub const C_FILE_NO: usize = 2;
pub const D_FILE_NO: usize = 3;
pub const E_FILE_NO: usize = 4;
pub const F_FILE_NO: usize = 5;
pub const G_FILE_NO: usize = 6;
pub const H_FILE_NO: usize = 7;

#[derive(Debug, Error, Eq, PartialEq, Clone)]
pub enum NotationError {
    #[error("'{0}' is not a square on a chess board (expected a file 'a'-'h' followed by a rank '1'-'8')")]
    InvalidSquare(String),
    #[error("'{0}' is not a move token (expected two squares like 'e2e4', optionally followed by a promotion piece)")]
    InvalidMove(String),
}

/// A square given as (row, column), where row 0 is rank 8 and column 0 is the a-file.
#[derive(Default, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Copy, Clone)]
pub struct ChessSquare {
    row: u8,
    column: u8,
}

impl ChessSquare {
    pub fn new(row: usize, column: usize) -> Option<Self> {
        if row < NUM_ROWS && column < NUM_COLUMNS {
            Some(Self::unchecked(row, column))
        } else {
            None
        }
    }

    pub const fn unchecked(row: usize, column: usize) -> Self {
        debug_assert!(row < NUM_ROWS && column < NUM_COLUMNS);
        Self {
            row: row as u8,
            column: column as u8,
        }
    }

    pub fn row(self) -> usize {
        self.row as usize
    }

    pub fn column(self) -> usize {
        self.column as usize
    }

    /// Row-major index, `0` is a8 and `63` is h1.
    pub fn index(self) -> usize {
        self.row() * NUM_COLUMNS + self.column()
    }

    pub fn file_char(self) -> char {
        (b'a' + self.column) as char
    }

    pub fn rank(self) -> usize {
        NUM_ROWS - self.row()
    }

    /// The square `d_row` rows and `d_column` columns away, if that is still on the board.
    pub fn offset(self, d_row: isize, d_column: isize) -> Option<Self> {
        let row = self.row().checked_add_signed(d_row)?;
        let column = self.column().checked_add_signed(d_column)?;
        Self::new(row, column)
    }

    /// All squares in row-major order.
    pub fn iter() -> impl Iterator<Item = ChessSquare> {
        (0..NUM_ROWS).flat_map(|row| (0..NUM_COLUMNS).map(move |column| Self::unchecked(row, column)))
    }
}

impl FromStr for ChessSquare {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || NotationError::InvalidSquare(s.to_string());
        let mut chars = s.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(err());
        };
        if !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
            return Err(err());
        }
        let column = file as usize - 'a' as usize;
        let row = NUM_ROWS - (rank as usize - '0' as usize);
        Ok(Self::unchecked(row, column))
    }
}

impl Display for ChessSquare {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{0}{1}", self.file_char(), self.rank())
    }
}

/// Algebraic name of the square at (row, column), e.g. `(6, 4)` is `e2`.
pub fn to_square(row: usize, column: usize) -> Option<String> {
    ChessSquare::new(row, column).map(|square| square.to_string())
}

/// Inverse of [`to_square`].
pub fn from_square(name: &str) -> Option<(usize, usize)> {
    ChessSquare::from_str(name)
        .ok()
        .map(|square| (square.row(), square.column()))
}
