use std::fmt::{self, Display};
use std::str::FromStr;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::Serialize;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum SquareParseError {
    #[error("unexpected column char {0:?}")]
    UnexpectedColChar(char),
    #[error("unexpected row char {0:?}")]
    UnexpectedRowChar(char),
    #[error("invalid string length")]
    BadLength,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlayerParseError {
    #[error("unexpected player {0:?}")]
    Unexpected(String),
}

/// Cell of the 8x8 board, addressed by `(row, col)` with both axes in `0..8`
///
/// Row 0 is White's back row and row 7 is Black's back row. Internally the square is
/// packed into a single byte as `row * 8 + col`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square(u8);

impl Square {
    pub const COUNT: usize = 64;

    pub const fn at(row: u8, col: u8) -> Square {
        assert!(row < 8 && col < 8, "row and column must be between 0 and 7");
        Square((row << 3) | col)
    }

    pub const fn try_at(row: u8, col: u8) -> Option<Square> {
        if row < 8 && col < 8 {
            Some(Square((row << 3) | col))
        } else {
            None
        }
    }

    pub const fn from_index(val: usize) -> Square {
        assert!(val < 64, "square index must be between 0 and 63");
        Square(val as u8)
    }

    pub const fn row(&self) -> u8 {
        self.0 >> 3
    }

    pub const fn col(&self) -> u8 {
        self.0 & 7
    }

    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Returns the square shifted by `d_row` rows and `d_col` columns, or `None` if it
    /// falls off the board
    pub const fn shift(self, d_row: i8, d_col: i8) -> Option<Square> {
        let row = self.row() as i8 + d_row;
        let col = self.col() as i8 + d_col;
        if row < 0 || col < 0 {
            return None;
        }
        Self::try_at(row as u8, col as u8)
    }

    pub fn iter() -> impl Iterator<Item = Self> {
        (0_u8..64_u8).map(Square)
    }

    pub fn col_char(&self) -> char {
        (b'a' + self.col()) as char
    }

    pub fn row_char(&self) -> char {
        (b'1' + self.row()) as char
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        if self.0 < 64 {
            return write!(f, "Square({}, {})", self.row(), self.col());
        }
        write!(f, "Square(?{:?})", self.0)
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.col_char(), self.row_char())
    }
}

impl FromStr for Square {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 2 {
            return Err(SquareParseError::BadLength);
        }
        let bytes = s.as_bytes();
        let col = match bytes[0] {
            b @ b'a'..=b'h' => b - b'a',
            b => return Err(SquareParseError::UnexpectedColChar(b as char)),
        };
        let row = match bytes[1] {
            b @ b'1'..=b'8' => b - b'1',
            b => return Err(SquareParseError::UnexpectedRowChar(b as char)),
        };
        Ok(Square::at(row, col))
    }
}

#[cfg(feature = "serde")]
impl Serialize for Square {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        (self.row(), self.col()).serialize(s)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum Player {
    White = 0,
    Black = 1,
}

impl Player {
    pub const fn inv(&self) -> Player {
        match *self {
            Player::White => Player::Black,
            Player::Black => Player::White,
        }
    }

    pub const fn name(&self) -> &'static str {
        match *self {
            Player::White => "white",
            Player::Black => "black",
        }
    }

    pub fn as_char(&self) -> char {
        match *self {
            Player::White => 'w',
            Player::Black => 'b',
        }
    }

    pub fn from_char(c: char) -> Option<Player> {
        match c {
            'w' => Some(Player::White),
            'b' => Some(Player::Black),
            _ => None,
        }
    }
}

impl Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Player {
    type Err = PlayerParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "white" | "w" => Ok(Player::White),
            "black" | "b" => Ok(Player::Black),
            _ => Err(PlayerParseError::Unexpected(s.to_string())),
        }
    }
}
