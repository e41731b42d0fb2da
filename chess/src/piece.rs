//! Pieces and their per-variant state

use crate::types::Player;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Error parsing [`Piece`] from its diagram char
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum PieceParseError {
    /// Char doesn't denote any piece
    #[error("unexpected piece char {0:?}")]
    UnexpectedChar(char),
    /// String is not exactly one char long
    #[error("invalid string length")]
    BadLength,
}

/// Kind of the piece, together with the state specific to this kind
///
/// Only pawns carry state: `has_moved` starts as `false` and becomes `true` after the first
/// relocation of the pawn, which disables the double step.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn { has_moved: bool },
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Name of the kind, as used in the exchange format
    pub const fn name(&self) -> &'static str {
        match *self {
            Self::Pawn { .. } => "Pawn",
            Self::Knight => "Knight",
            Self::Bishop => "Bishop",
            Self::Rook => "Rook",
            Self::Queen => "Queen",
            Self::King => "King",
        }
    }

    const fn as_lower_char(&self) -> char {
        match *self {
            Self::Pawn { .. } => 'p',
            Self::Knight => 'n',
            Self::Bishop => 'b',
            Self::Rook => 'r',
            Self::Queen => 'q',
            Self::King => 'k',
        }
    }
}

/// Chess piece
///
/// The piece doesn't know where it stands. Its square is always looked up on the
/// [`Board`](crate::board::Board) which owns it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    owner: Player,
    pub(crate) kind: PieceKind,
}

impl Piece {
    #[inline]
    pub const fn new(owner: Player, kind: PieceKind) -> Piece {
        Piece { owner, kind }
    }

    #[inline]
    pub const fn pawn(owner: Player) -> Piece {
        Piece::new(owner, PieceKind::Pawn { has_moved: false })
    }

    #[inline]
    pub const fn knight(owner: Player) -> Piece {
        Piece::new(owner, PieceKind::Knight)
    }

    #[inline]
    pub const fn bishop(owner: Player) -> Piece {
        Piece::new(owner, PieceKind::Bishop)
    }

    #[inline]
    pub const fn rook(owner: Player) -> Piece {
        Piece::new(owner, PieceKind::Rook)
    }

    #[inline]
    pub const fn queen(owner: Player) -> Piece {
        Piece::new(owner, PieceKind::Queen)
    }

    #[inline]
    pub const fn king(owner: Player) -> Piece {
        Piece::new(owner, PieceKind::King)
    }

    #[inline]
    pub const fn owner(&self) -> Player {
        self.owner
    }

    #[inline]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Returns `true` if this is a pawn which has already been moved
    ///
    /// For all the other pieces, returns `false`.
    #[inline]
    pub const fn has_moved(&self) -> bool {
        matches!(self.kind, PieceKind::Pawn { has_moved: true })
    }

    /// Records that the piece has been relocated
    ///
    /// Returns `true` if the state of the piece changed.
    pub(crate) fn mark_moved(&mut self) -> bool {
        match &mut self.kind {
            PieceKind::Pawn { has_moved } if !*has_moved => {
                *has_moved = true;
                true
            }
            _ => false,
        }
    }

    /// Converts the piece into a diagram char: uppercase for White, lowercase for Black
    pub fn as_char(&self) -> char {
        let c = self.kind.as_lower_char();
        match self.owner {
            Player::White => c.to_ascii_uppercase(),
            Player::Black => c,
        }
    }

    /// Parses a diagram char into a fresh piece
    ///
    /// Pawns parsed this way are considered to be not moved yet.
    pub fn from_char(c: char) -> Option<Piece> {
        let owner = if c.is_ascii_uppercase() {
            Player::White
        } else {
            Player::Black
        };
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn { has_moved: false },
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };
        Some(Piece::new(owner, kind))
    }

    /// Projects the piece into the exchange format
    ///
    /// # Example
    ///
    /// ```
    /// # use chessington::{Piece, Player};
    /// #
    /// let rec = Piece::pawn(Player::White).record();
    /// assert_eq!(rec.piece, "Pawn");
    /// assert_eq!(rec.player, "white");
    /// ```
    #[inline]
    pub fn record(&self) -> PieceRecord {
        PieceRecord {
            piece: self.name(),
            player: self.owner.name(),
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Piece {
    type Err = PieceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Piece::from_char(c).ok_or(PieceParseError::UnexpectedChar(c)),
            _ => Err(PieceParseError::BadLength),
        }
    }
}

/// Piece as seen from outside: its kind name and its owner
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PieceRecord {
    pub piece: &'static str,
    pub player: &'static str,
}
