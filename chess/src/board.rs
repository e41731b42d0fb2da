//! Board and related things

use crate::bitboard::Bitboard;
use crate::movegen::{self, MoveList};
use crate::piece::Piece;
use crate::types::{Player, Square};

use std::fmt::{self, Display};
use std::str::FromStr;

use log::trace;
use thiserror::Error;

/// Error returned by board queries and board mutations
#[derive(Debug, Copy, Clone, Error, Eq, PartialEq)]
pub enum BoardError {
    /// The piece is not placed on this board
    ///
    /// It is either a handle from another board, or the piece was knocked off by another
    /// piece moved onto its square.
    #[error("piece {0} is not on the board")]
    PieceNotFound(PieceId),
    /// There is no piece to move on the source square
    #[error("no piece on square {0}")]
    EmptySquare(Square),
}

/// Error parsing a board diagram
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum DiagramParseError {
    /// Row is too long
    #[error("too many items in row {0}")]
    RowOverflow(u8),
    /// Row is too short
    #[error("not enough items in row {0}")]
    RowUnderflow(u8),
    /// Too many rows
    #[error("too many rows")]
    Overflow,
    /// Not enough rows
    #[error("not enough rows")]
    Underflow,
    /// Unexpected character
    #[error("unexpected char {0:?}")]
    UnexpectedChar(char),
}

/// Stable handle of a piece placed on a [`Board`]
///
/// Handles are never reused within one board, so a handle keeps denoting the same piece
/// after any number of moves.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PieceId(u32);

impl PieceId {
    #[inline]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

impl Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "#{}", self.0)
    }
}

/// Chess board
///
/// The board owns all the pieces placed on it and is the only place which knows where each
/// piece stands. Pieces are addressed by [`PieceId`] handles returned from [`Board::set_piece()`].
///
/// # Example
///
/// ```
/// # use chessington::{Board, Piece, Player, Square};
/// #
/// let mut board = Board::empty();
/// let pawn = board.set_piece(Square::at(1, 4), Piece::pawn(Player::White));
///
/// let moves = board.available_moves(pawn).unwrap();
/// assert_eq!(moves.as_slice(), [Square::at(2, 4), Square::at(3, 4)]);
///
/// board.move_to(pawn, Square::at(3, 4)).unwrap();
/// assert_eq!(board.find_piece(pawn), Ok(Square::at(3, 4)));
/// assert!(board.is_square_empty(Square::at(1, 4)));
/// ```
#[derive(Debug, Clone)]
pub struct Board {
    cells: [Option<PieceId>; Square::COUNT],
    pieces: Vec<Piece>,
    squares: Vec<Option<Square>>,
    occupied: Bitboard,
    current_player: Player,
}

impl Board {
    /// Returns a board without any pieces, with White to move
    #[inline]
    pub fn empty() -> Board {
        Board {
            cells: [None; Square::COUNT],
            pieces: Vec::new(),
            squares: Vec::new(),
            occupied: Bitboard::EMPTY,
            current_player: Player::White,
        }
    }

    /// Parses a board from diagram
    ///
    /// Does the same as [`Board::from_str`]. It is recommended to use this function instead of
    /// `from_str()` for better readability.
    #[inline]
    pub fn from_diagram(s: &str) -> Result<Board, DiagramParseError> {
        Board::from_str(s)
    }

    /// Places `piece` on square `sq` and returns its handle
    ///
    /// If `sq` was occupied, its previous occupant is removed from the board.
    pub fn set_piece(&mut self, sq: Square, piece: Piece) -> PieceId {
        let id = PieceId(self.pieces.len() as u32);
        self.pieces.push(piece);
        self.squares.push(Some(sq));
        if let Some(old) = self.cells[sq.index()].replace(id) {
            self.squares[old.index()] = None;
        }
        self.occupied.set(sq);
        id
    }

    /// Returns the handle of the piece standing on `sq`
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<PieceId> {
        self.cells[sq.index()]
    }

    /// Returns the piece with handle `id`
    ///
    /// Pieces which were knocked off the board are still returned.
    #[inline]
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.index())
    }

    #[inline]
    pub(crate) fn piece_mut(&mut self, id: PieceId) -> Option<&mut Piece> {
        self.pieces.get_mut(id.index())
    }

    /// Iterates over all the pieces currently placed on the board, in the order of squares
    pub fn pieces(&self) -> impl Iterator<Item = (Square, PieceId, &Piece)> + '_ {
        self.occupied.into_iter().filter_map(move |sq| {
            let id = self.cells[sq.index()]?;
            Some((sq, id, &self.pieces[id.index()]))
        })
    }

    #[inline]
    pub fn is_square_empty(&self, sq: Square) -> bool {
        !self.occupied.has(sq)
    }

    /// Returns the set of all the occupied squares
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.occupied
    }

    /// Returns the square on which the piece with handle `id` stands
    pub fn find_piece(&self, id: PieceId) -> Result<Square, BoardError> {
        match self.squares.get(id.index()).copied().flatten() {
            Some(sq) => Ok(sq),
            None => {
                trace!("piece {} is not on the board", id);
                Err(BoardError::PieceNotFound(id))
            }
        }
    }

    /// Moves whatever stands on `src` to `dst`
    ///
    /// The previous occupant of `dst`, if any, is removed from the board. No chess rules are
    /// checked here.
    pub fn move_piece(&mut self, src: Square, dst: Square) -> Result<(), BoardError> {
        let id = self.cells[src.index()]
            .take()
            .ok_or(BoardError::EmptySquare(src))?;
        if let Some(old) = self.cells[dst.index()].replace(id) {
            trace!("piece {} on {} is knocked off by {}", old, dst, id);
            self.squares[old.index()] = None;
        }
        self.squares[id.index()] = Some(dst);
        self.occupied.unset(src);
        self.occupied.set(dst);

        #[cfg(feature = "selftest")]
        self.selftest();

        Ok(())
    }

    /// Returns the side to move
    ///
    /// This is pure bookkeeping for the caller. Move generation never looks at it.
    #[inline]
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    #[inline]
    pub fn set_current_player(&mut self, p: Player) {
        self.current_player = p;
    }

    /// Convenience alias for [`movegen::available_moves`]
    #[inline]
    pub fn available_moves(&self, id: PieceId) -> Result<MoveList, BoardError> {
        movegen::available_moves(self, id)
    }

    /// Convenience alias for [`movegen::move_to`]
    #[inline]
    pub fn move_to(&mut self, id: PieceId, dst: Square) -> Result<(), BoardError> {
        movegen::move_to(self, id, dst)
    }

    /// Converts the board into a diagram string
    ///
    /// Does the same as `Board::to_string()`. It is recommended to use this function instead of
    /// `to_string()` for better readability.
    #[inline]
    pub fn as_diagram(&self) -> String {
        self.to_string()
    }

    #[cfg(feature = "selftest")]
    fn selftest(&self) {
        let mut occupied = Bitboard::EMPTY;
        for sq in Square::iter() {
            if let Some(id) = self.cells[sq.index()] {
                assert_eq!(
                    self.squares[id.index()],
                    Some(sq),
                    "square of piece {} diverged",
                    id
                );
                occupied.set(sq);
            }
        }
        assert_eq!(occupied, self.occupied, "occupancy diverged");
    }
}

impl Default for Board {
    #[inline]
    fn default() -> Board {
        Board::empty()
    }
}

fn parse_cells(s: &str) -> Result<[Option<Piece>; Square::COUNT], DiagramParseError> {
    type Error = DiagramParseError;

    let mut row = 7_u8;
    let mut col = 0_u8;
    let mut done = 0_usize;
    let mut cells = [None; Square::COUNT];
    for c in s.chars() {
        match c {
            '/' => {
                if col < 8 {
                    return Err(Error::RowUnderflow(row));
                }
                if row == 0 {
                    return Err(Error::Overflow);
                }
                row -= 1;
                col = 0;
            }
            _ => {
                if col >= 8 {
                    return Err(Error::RowOverflow(row));
                }
                if c != '.' {
                    let piece = Piece::from_char(c).ok_or(Error::UnexpectedChar(c))?;
                    cells[Square::at(row, col).index()] = Some(piece);
                }
                col += 1;
                done += 1;
            }
        }
    }

    if col < 8 {
        return Err(Error::RowUnderflow(row));
    }
    if row > 0 {
        return Err(Error::Underflow);
    }
    debug_assert_eq!(done, Square::COUNT);

    Ok(cells)
}

impl FromStr for Board {
    type Err = DiagramParseError;

    fn from_str(s: &str) -> Result<Board, Self::Err> {
        let mut res = Board::empty();
        for (idx, cell) in parse_cells(s.trim())?.into_iter().enumerate() {
            if let Some(piece) = cell {
                res.set_piece(Square::from_index(idx), piece);
            }
        }
        Ok(res)
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for row in (0..8).rev() {
            for col in 0..8 {
                match self.piece_at(Square::at(row, col)) {
                    Some(id) => write!(f, "{}", self.pieces[id.index()])?,
                    None => write!(f, ".")?,
                }
            }
            if row != 0 {
                write!(f, "/")?;
            }
        }
        Ok(())
    }
}
