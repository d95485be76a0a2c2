use std::fmt::{Display, Formatter, Write};

use thiserror::Error;

use crate::games::chess::moves::{AppliedMove, CastleSide, ChessMove};
use crate::games::chess::pieces::UncoloredChessPiece::{King, Rook};
use crate::games::chess::pieces::{ChessPiece, MAX_PIECE_VALUE};
use crate::games::chess::squares::{
    ChessSquare, C_FILE_NO, D_FILE_NO, E_FILE_NO, F_FILE_NO, G_FILE_NO, NUM_COLUMNS, NUM_ROWS,
    NUM_SQUARES,
};
use crate::games::Color;
use crate::output::Message::Warning;
use crate::output::{display_message, Message};

pub mod movegen;
pub mod moves;
pub mod pieces;
pub mod squares;

/// Raw board contents: `[row][column]`, see [`ChessPiece::from_value`] for the encoding.
pub type Grid = [[i8; NUM_COLUMNS]; NUM_ROWS];

/// Length of [`Chessboard::flatten`]: all squares plus the evaluation slot.
pub const FLAT_LEN: usize = NUM_SQUARES + 1;

/// Index of the evaluation score in [`Chessboard::flatten`]. Nothing fills it in yet, so it's always 0.
pub const EVAL_SLOT: usize = NUM_SQUARES;

const START_POS: Grid = [
    [-2, -3, -4, -5, -6, -4, -3, -2],
    [-1, -1, -1, -1, -1, -1, -1, -1],
    [0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0],
    [1, 1, 1, 1, 1, 1, 1, 1],
    [2, 3, 4, 5, 6, 4, 3, 2],
];

#[derive(Debug, Error, Eq, PartialEq, Clone)]
pub enum BoardError {
    #[error("Coordinates ({row}, {column}) lie outside of the chess board")]
    OutOfRange { row: usize, column: usize },
    #[error("No piece found at the source square {0}")]
    NoPieceAtSource(ChessSquare),
    #[error("{0} is not a valid piece value (expected a value between -6 and 6)")]
    InvalidPieceValue(i8),
    #[error("The {0} player does not have a king on the board")]
    MissingKing(Color),
    #[error("Invalid board diagram: {0}")]
    InvalidDiagram(String),
}

/// The state needed to take back a raw relocation.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) struct Undo {
    pub from: ChessSquare,
    pub to: ChessSquare,
    pub moved: i8,
    pub captured: i8,
}

/// The 8x8 mailbox board together with the side to move.
///
/// Row 0 is Black's back rank, row 7 is White's. The board is a plain `Copy` value:
/// whoever owns it may mutate it, everybody else gets a copy.
#[derive(Eq, PartialEq, Debug, Copy, Clone)]
pub struct Chessboard {
    squares: Grid,
    active_player: Color,
}

impl Default for Chessboard {
    fn default() -> Self {
        Self::startpos()
    }
}

impl Chessboard {
    pub fn startpos() -> Self {
        Self {
            squares: START_POS,
            active_player: Color::White,
        }
    }

    pub fn empty() -> Self {
        Self {
            squares: Grid::default(),
            active_player: Color::White,
        }
    }

    pub fn from_grid(grid: Grid, active_player: Color) -> Result<Self, BoardError> {
        if let Some(&value) = grid
            .iter()
            .flatten()
            .find(|v| !(-MAX_PIECE_VALUE..=MAX_PIECE_VALUE).contains(*v))
        {
            return Err(BoardError::InvalidPieceValue(value));
        }
        Ok(Self {
            squares: grid,
            active_player,
        })
    }

    /// Parses a diagram in the format of [`Chessboard::render`]: one row per entry, rank 8 first,
    /// `PNBRQK` for white, `pnbrqk` for black, and `*` or `.` for empty squares.
    pub fn from_rows(rows: [&str; NUM_ROWS], active_player: Color) -> Result<Self, BoardError> {
        let mut board = Self::empty();
        board.active_player = active_player;
        for (row, line) in rows.iter().enumerate() {
            let chars: Vec<char> = line.trim().chars().collect();
            if chars.len() != NUM_COLUMNS {
                return Err(BoardError::InvalidDiagram(format!(
                    "row {row} ('{line}') doesn't contain exactly {NUM_COLUMNS} squares"
                )));
            }
            for (column, c) in chars.into_iter().enumerate() {
                board.squares[row][column] = match c {
                    '*' | '.' => 0,
                    c => ChessPiece::from_ascii_char(c)
                        .ok_or_else(|| {
                            BoardError::InvalidDiagram(format!("unrecognized piece '{c}'"))
                        })?
                        .value(),
                };
            }
        }
        Ok(board)
    }

    pub fn active_player(&self) -> Color {
        self.active_player
    }

    pub fn advance_turn(&mut self) {
        self.active_player = self.active_player.other();
    }

    pub fn value_at(&self, square: ChessSquare) -> i8 {
        self.squares[square.row()][square.column()]
    }

    pub fn piece_on(&self, square: ChessSquare) -> Option<ChessPiece> {
        ChessPiece::from_value(self.value_at(square))
    }

    pub fn is_empty(&self, square: ChessSquare) -> bool {
        self.value_at(square) == 0
    }

    /// An independent copy of the grid.
    pub fn snapshot(&self) -> Grid {
        self.squares
    }

    /// All squares in row-major order, followed by the (always 0) evaluation slot.
    pub fn flatten(&self) -> [i32; FLAT_LEN] {
        let mut res = [0; FLAT_LEN];
        for square in ChessSquare::iter() {
            res[square.index()] = self.value_at(square) as i32;
        }
        res
    }

    /// Applies a move given as raw coordinates, see [`Chessboard::apply`].
    pub fn apply_move(
        &mut self,
        from_row: usize,
        from_column: usize,
        to_row: usize,
        to_column: usize,
    ) -> Result<AppliedMove, BoardError> {
        let from = checked_square(from_row, from_column)?;
        let to = checked_square(to_row, to_column)?;
        self.apply(ChessMove::new(from, to))
    }

    /// Plays a move without checking it for legality.
    ///
    /// A king moving from the e-file to the c- or g-file always castles, see
    /// [`castle_side_from_shape`]. Moving from an empty square is reported and ignored.
    pub fn apply(&mut self, mov: ChessMove) -> Result<AppliedMove, BoardError> {
        let from = mov.from_square();
        let Some(piece) = self.piece_on(from) else {
            return Err(skipped(BoardError::NoPieceAtSource(from)));
        };
        if let Some(side) = castle_side_from_shape(piece, mov) {
            self.castle(piece, from.row(), side);
            display_message(
                Message::Debug,
                &format!("{0} castles {side} with {mov}", piece.color),
            );
            return Ok(AppliedMove::Castle(side));
        }
        self.relocate(from, mov.to_square());
        Ok(AppliedMove::Normal)
    }

    /// Moves the king and "the" rook. Doesn't check that the rook exists or that castling is allowed.
    fn castle(&mut self, king: ChessPiece, row: usize, side: CastleSide) {
        let (king_file, rook_file) = match side {
            CastleSide::Queenside => (C_FILE_NO, D_FILE_NO),
            CastleSide::Kingside => (G_FILE_NO, F_FILE_NO),
        };
        let squares = &mut self.squares[row];
        squares[E_FILE_NO] = 0;
        squares[king_file] = king.value();
        squares[side.rook_file()] = 0;
        squares[rook_file] = ChessPiece::new(king.color, Rook).value();
    }

    pub fn place_piece(&mut self, row: usize, column: usize, value: i8) -> Result<(), BoardError> {
        let square = checked_square(row, column)?;
        if !(-MAX_PIECE_VALUE..=MAX_PIECE_VALUE).contains(&value) {
            return Err(skipped(BoardError::InvalidPieceValue(value)));
        }
        self.squares[square.row()][square.column()] = value;
        Ok(())
    }

    pub fn clear_square(&mut self, row: usize, column: usize) -> Result<(), BoardError> {
        self.place_piece(row, column, 0)
    }

    /// Moves whatever is on `from` to `to`, overwriting the destination. Never castles.
    pub(crate) fn relocate(&mut self, from: ChessSquare, to: ChessSquare) -> Undo {
        let moved = self.value_at(from);
        let captured = self.value_at(to);
        self.squares[to.row()][to.column()] = moved;
        self.squares[from.row()][from.column()] = 0;
        Undo {
            from,
            to,
            moved,
            captured,
        }
    }

    pub(crate) fn undo(&mut self, undo: Undo) {
        self.squares[undo.from.row()][undo.from.column()] = undo.moved;
        self.squares[undo.to.row()][undo.to.column()] = undo.captured;
    }

    fn square_char(&self, square: ChessSquare, empty: char) -> char {
        self.piece_on(square)
            .map_or(empty, |piece| piece.to_ascii_char())
    }

    /// One line per row, rank 8 first, `*` for empty squares.
    pub fn render(&self) -> String {
        let mut res = String::with_capacity(NUM_SQUARES + NUM_ROWS);
        for square in ChessSquare::iter() {
            res.push(self.square_char(square, '*'));
            if square.column() == NUM_COLUMNS - 1 {
                res.push('\n');
            }
        }
        res
    }

    /// Like [`Chessboard::render`], but with row and column indices and `.` for empty squares.
    pub fn render_with_indices(&self) -> String {
        let mut res = "  0 1 2 3 4 5 6 7\n".to_string();
        for row in 0..NUM_ROWS {
            _ = write!(res, "{row} ");
            for column in 0..NUM_COLUMNS {
                _ = write!(
                    res,
                    "{} ",
                    self.square_char(ChessSquare::unchecked(row, column), '.')
                );
            }
            res.push('\n');
        }
        res
    }

    pub fn as_unicode_diagram(&self) -> String {
        let mut res = String::new();
        for row in 0..NUM_ROWS {
            for column in 0..NUM_COLUMNS {
                let square = ChessSquare::unchecked(row, column);
                res.push(self.piece_on(square).map_or('.', |p| p.to_utf8_char()));
                res.push(' ');
            }
            _ = writeln!(res, "{}", NUM_ROWS - row);
        }
        res + "a b c d e f g h\n"
    }
}

impl Display for Chessboard {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// Decides whether a move is castling purely from its shape: a king leaving the e-file for the
/// c-file (queenside) or the g-file (kingside). Neither the row, the rook, nor whether the king or
/// rook have moved before are looked at.
pub fn castle_side_from_shape(piece: ChessPiece, mov: ChessMove) -> Option<CastleSide> {
    if piece.kind != King || mov.from_square().column() != E_FILE_NO {
        return None;
    }
    match mov.to_square().column() {
        C_FILE_NO => Some(CastleSide::Queenside),
        G_FILE_NO => Some(CastleSide::Kingside),
        _ => None,
    }
}

fn skipped(err: BoardError) -> BoardError {
    display_message(Warning, &format!("{err}, ignoring it"));
    err
}

fn checked_square(row: usize, column: usize) -> Result<ChessSquare, BoardError> {
    ChessSquare::new(row, column).ok_or_else(|| skipped(BoardError::OutOfRange { row, column }))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use proptest::prelude::*;

    use crate::games::chess::*;

    const STARTPOS_DIAGRAM: &str = "rnbqkbnr\n\
                                    pppppppp\n\
                                    ********\n\
                                    ********\n\
                                    ********\n\
                                    ********\n\
                                    PPPPPPPP\n\
                                    RNBQKBNR\n";

    fn mov(token: &str) -> ChessMove {
        ChessMove::from_str(token).unwrap()
    }

    #[test]
    fn startpos_test() {
        let board = Chessboard::default();
        assert_eq!(board.render(), STARTPOS_DIAGRAM);
        assert_eq!(board.active_player(), Color::White);
        assert_eq!(board.snapshot(), START_POS);
        assert_eq!(board.to_string(), board.render());
        let e1 = ChessSquare::from_str("e1").unwrap();
        assert_eq!(board.piece_on(e1), Some(ChessPiece::new(Color::White, King)));
        assert_eq!(board.value_at(ChessSquare::from_str("d8").unwrap()), -5);
    }

    #[test]
    fn snapshot_is_independent_test() {
        let mut board = Chessboard::default();
        let mut snapshot = board.snapshot();
        snapshot[6][4] = 0;
        snapshot[0][0] = 5;
        assert_eq!(board.snapshot(), START_POS);
        board.clear_square(7, 0).unwrap();
        assert_eq!(snapshot[7][0], 2);
    }

    #[test]
    fn flatten_test() {
        let board = Chessboard::default();
        let flat = board.flatten();
        assert_eq!(flat.len(), 65);
        assert_eq!(flat[0], -2);
        assert_eq!(flat[4], -6);
        assert_eq!(flat[8 * 6 + 3], 1);
        assert_eq!(flat[63], 2);
        assert_eq!(flat[EVAL_SLOT], 0);
        assert_eq!(flat[16..48].iter().filter(|v| **v != 0).count(), 0);
    }

    #[test]
    fn turn_test() {
        let mut board = Chessboard::default();
        board.advance_turn();
        assert_eq!(board.active_player(), Color::Black);
        board.advance_turn();
        assert_eq!(board.active_player(), Color::White);
        // applying moves never changes the turn
        board.apply(mov("e2e4")).unwrap();
        assert_eq!(board.active_player(), Color::White);
    }

    #[test]
    fn plain_move_test() {
        let mut board = Chessboard::default();
        assert_eq!(board.apply_move(6, 4, 4, 4), Ok(AppliedMove::Normal));
        assert_eq!(board.snapshot()[4][4], 1);
        assert_eq!(board.snapshot()[6][4], 0);
        // captures simply overwrite the destination
        assert_eq!(board.apply(mov("d8d2")), Ok(AppliedMove::Normal));
        assert_eq!(board.snapshot()[6][3], -5);
        assert_eq!(board.snapshot()[0][3], 0);
    }

    #[test]
    fn skipped_operations_test() {
        let mut board = Chessboard::default();
        let before = board;
        assert_eq!(
            board.apply_move(4, 4, 3, 4),
            Err(BoardError::NoPieceAtSource(ChessSquare::unchecked(4, 4)))
        );
        assert_eq!(
            board.apply_move(6, 4, 8, 4),
            Err(BoardError::OutOfRange { row: 8, column: 4 })
        );
        assert_eq!(
            board.place_piece(3, 9, 1),
            Err(BoardError::OutOfRange { row: 3, column: 9 })
        );
        assert_eq!(
            board.clear_square(12, 0),
            Err(BoardError::OutOfRange { row: 12, column: 0 })
        );
        assert_eq!(
            board.place_piece(3, 3, 7),
            Err(BoardError::InvalidPieceValue(7))
        );
        assert_eq!(board, before);
        board.place_piece(3, 3, -5).unwrap();
        assert_eq!(board.snapshot()[3][3], -5);
        board.clear_square(3, 3).unwrap();
        assert_eq!(board, before);
    }

    #[test]
    fn castling_test() {
        let mut board = Chessboard::from_rows(
            [
                "r***k**r", "********", "********", "********", "********", "********",
                "********", "R***K**R",
            ],
            Color::White,
        )
        .unwrap();
        assert_eq!(
            board.apply(mov("e1g1")),
            Ok(AppliedMove::Castle(CastleSide::Kingside))
        );
        assert_eq!(
            board.apply(mov("e8c8")),
            Ok(AppliedMove::Castle(CastleSide::Queenside))
        );
        assert_eq!(
            board.render(),
            "**kr***r\n********\n********\n********\n********\n********\n********\nR****RK*\n"
        );
    }

    #[test]
    fn castling_without_rook_test() {
        // The castling shape is applied even though there is no rook to castle with.
        let mut board = Chessboard::empty();
        board.place_piece(7, E_FILE_NO, 6).unwrap();
        assert_eq!(
            board.apply_move(7, E_FILE_NO, 7, G_FILE_NO),
            Ok(AppliedMove::Castle(CastleSide::Kingside))
        );
        assert_eq!(board.snapshot()[7], [0, 0, 0, 0, 0, 2, 6, 0]);

        let mut board = Chessboard::empty();
        board.place_piece(0, E_FILE_NO, -6).unwrap();
        board.place_piece(0, 0, -3).unwrap();
        board.apply_move(0, E_FILE_NO, 0, C_FILE_NO).unwrap();
        // whatever stood in the corner disappears and a rook shows up next to the king
        assert_eq!(board.snapshot()[0], [0, 0, -6, -2, 0, 0, 0, 0]);
    }

    #[test]
    fn castle_shape_test() {
        let king = ChessPiece::new(Color::White, King);
        let rook = ChessPiece::new(Color::White, Rook);
        assert_eq!(
            castle_side_from_shape(king, mov("e1g1")),
            Some(CastleSide::Kingside)
        );
        assert_eq!(
            castle_side_from_shape(king, mov("e1c1")),
            Some(CastleSide::Queenside)
        );
        // only the files matter
        assert_eq!(
            castle_side_from_shape(king, mov("e4g4")),
            Some(CastleSide::Kingside)
        );
        assert_eq!(castle_side_from_shape(king, mov("e1f1")), None);
        assert_eq!(castle_side_from_shape(king, mov("d1f1")), None);
        assert_eq!(castle_side_from_shape(rook, mov("e1g1")), None);
    }

    #[test]
    fn relocate_and_undo_test() {
        let mut board = Chessboard::default();
        let before = board;
        // the raw relocation never castles
        board.clear_square(7, F_FILE_NO).unwrap();
        board.clear_square(7, G_FILE_NO).unwrap();
        let cleared = board;
        let undo = board.relocate(
            ChessSquare::from_str("e1").unwrap(),
            ChessSquare::from_str("g1").unwrap(),
        );
        assert_eq!(board.snapshot()[7], [2, 3, 4, 5, 0, 0, 6, 2]);
        board.undo(undo);
        assert_eq!(board, cleared);
        let undo = board.relocate(
            ChessSquare::from_str("a1").unwrap(),
            ChessSquare::from_str("a7").unwrap(),
        );
        assert_eq!(undo.captured, -1);
        board.undo(undo);
        assert_eq!(board, cleared);
        assert_ne!(board, before);
    }

    #[test]
    fn diagram_test() {
        let board = Chessboard::from_rows(
            [
                "rnbqkbnr", "pppppppp", "........", "........", "....P...", "........",
                "PPPP.PPP", "RNBQKBNR",
            ],
            Color::Black,
        )
        .unwrap();
        assert_eq!(board.active_player(), Color::Black);
        assert_eq!(board.snapshot()[4][4], 1);
        assert!(matches!(
            Chessboard::from_rows(["rnbqkbnr"; 8].map(|r| &r[1..]), Color::White),
            Err(BoardError::InvalidDiagram(_))
        ));
        assert!(matches!(
            Chessboard::from_rows(["xnbqkbnr"; 8], Color::White),
            Err(BoardError::InvalidDiagram(_))
        ));
        let mut grid = START_POS;
        grid[3][3] = -9;
        assert_eq!(
            Chessboard::from_grid(grid, Color::White),
            Err(BoardError::InvalidPieceValue(-9))
        );
    }

    #[test]
    fn indices_diagram_test() {
        let board = Chessboard::default();
        let diagram = board.render_with_indices();
        let lines: Vec<_> = diagram.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "  0 1 2 3 4 5 6 7");
        assert_eq!(lines[1], "0 r n b q k b n r ");
        assert_eq!(lines[4], "3 . . . . . . . . ");
        assert_eq!(lines[8], "7 R N B Q K B N R ");
        let unicode = board.as_unicode_diagram();
        assert!(unicode.starts_with("♜ ♞ ♝ ♛ ♚ ♝ ♞ ♜ 8\n"));
        assert!(unicode.ends_with("a b c d e f g h\n"));
    }

    proptest! {
        #[test]
        fn snapshot_independence(row in 0..8_usize, column in 0..8_usize, value in -6..=6_i8) {
            let mut board = Chessboard::default();
            let mut snapshot = board.snapshot();
            snapshot[row][column] = value;
            prop_assert_eq!(board.snapshot(), START_POS);
            board.place_piece(row, column, value).unwrap();
            prop_assert_eq!(board.snapshot(), snapshot);
            let mut copy = board;
            copy.clear_square(row, column).unwrap();
            prop_assert_eq!(board.snapshot()[row][column], value);
        }
    }
}
