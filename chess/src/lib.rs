//! # Chessington
//!
//! Rules of piece movement on an 8x8 chess board. Given a piece placed on a [`Board`], the crate
//! answers which squares the piece may go to, and moves it there on request.
//!
//! Turn order, check and checkmate, captures, castling, en passant and promotion are not
//! handled here. See [`movegen`] for the exact movement rules.
//!
//! # Example
//!
//! ```
//! use chessington::{Board, Square};
//!
//! let board = Board::from_diagram(
//!     "......../......../......../......../...R..p./......../......../........",
//! )
//! .unwrap();
//! let rook = board.piece_at(Square::at(3, 3)).unwrap();
//! let moves = board.available_moves(rook).unwrap();
//! assert_eq!(moves.len(), 12);
//! assert!(!moves.contains(&Square::at(3, 6)));
//! ```
//!
//! # Logging
//!
//! Moving a piece is reported through the [`log`](https://docs.rs/log) facade at `debug` level,
//! and failed lookups at `trace` level. No logger is installed by this crate.

pub mod board;
pub mod movegen;
pub mod piece;

pub use chessington_base::{bitboard, geometry, types};

pub use bitboard::Bitboard;
pub use board::{Board, BoardError, PieceId};
pub use movegen::MoveList;
pub use piece::{Piece, PieceKind, PieceRecord};
pub use types::{Player, Square};
