//! Move generation
//!
//! Generated squares are the ones a piece may go to, not the moves of a whole position. Nothing
//! here knows whose turn it is, and nothing checks king safety.
//!
//! Captures are not modeled: sliding pieces stop before the first occupied square in each
//! direction and the king never goes to an occupied square, whoever owns the piece standing there.

use crate::board::{Board, BoardError, PieceId};
use crate::geometry::{self, Direction};
use crate::piece::{Piece, PieceKind};
use crate::types::{Player, Square};

use std::ops::{Deref, DerefMut};
use std::slice;

use arrayvec::ArrayVec;
use log::{debug, trace};

/// List of destination squares
///
/// The capacity is enough for any single piece: a queen in the center of an empty board
/// reaches 27 squares.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct MoveList(ArrayVec<Square, 32>);

impl Deref for MoveList {
    type Target = ArrayVec<Square, 32>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for MoveList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Square;
    type IntoIter = slice::Iter<'a, Square>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for MoveList {
    type Item = Square;
    type IntoIter = arrayvec::IntoIter<Square, 32>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl MoveList {
    pub fn new() -> MoveList {
        MoveList(ArrayVec::new())
    }
}

fn gen_ray(b: &Board, src: Square, (d_row, d_col): Direction, dst: &mut MoveList) {
    for dist in 1..=geometry::MAX_DISTANCE {
        let sq = match src.shift(d_row * dist, d_col * dist) {
            Some(sq) => sq,
            None => break,
        };
        if !b.is_square_empty(sq) {
            break;
        }
        dst.push(sq);
    }
}

fn gen_slider(b: &Board, src: Square, dirs: &[Direction], dst: &mut MoveList) {
    for &dir in dirs {
        gen_ray(b, src, dir, dst);
    }
}

fn gen_king(b: &Board, src: Square, dst: &mut MoveList) {
    for (d_row, d_col) in geometry::KING_OFFSETS {
        if let Some(sq) = src.shift(d_row, d_col) {
            if b.is_square_empty(sq) {
                dst.push(sq);
            }
        }
    }
}

fn gen_pawn(b: &Board, src: Square, owner: Player, has_moved: bool, dst: &mut MoveList) {
    let forward = geometry::pawn_forward(owner);
    match src.shift(forward, 0) {
        Some(sq) if b.is_square_empty(sq) => dst.push(sq),
        _ => return,
    }
    if has_moved {
        return;
    }
    if let Some(sq) = src.shift(2 * forward, 0) {
        if b.is_square_empty(sq) {
            dst.push(sq);
        }
    }
}

fn gen_knight(_b: &Board, _src: Square, _dst: &mut MoveList) {
    // TODO: generate the eight L-shaped jumps, each allowed if it lands on an empty square
}

fn gen_moves(b: &Board, src: Square, piece: &Piece, dst: &mut MoveList) {
    match piece.kind() {
        PieceKind::Pawn { has_moved } => gen_pawn(b, src, piece.owner(), has_moved, dst),
        PieceKind::Knight => gen_knight(b, src, dst),
        PieceKind::Bishop => gen_slider(b, src, &geometry::DIAGONAL, dst),
        PieceKind::Rook => gen_slider(b, src, &geometry::ORTHOGONAL, dst),
        PieceKind::Queen => gen_slider(b, src, &geometry::ALL_DIRECTIONS, dst),
        PieceKind::King => gen_king(b, src, dst),
    }
}

/// Returns all the squares the piece with handle `id` may go to
///
/// The current square of the piece is looked up on the board. The squares are listed direction
/// by direction, from the nearest to the farthest one; callers must not rely on this order.
///
/// Fails with [`BoardError::PieceNotFound`] if the piece is not on the board.
pub fn available_moves(b: &Board, id: PieceId) -> Result<MoveList, BoardError> {
    let src = b.find_piece(id)?;
    let piece = b.piece(id).ok_or(BoardError::PieceNotFound(id))?;
    let mut res = MoveList::new();
    gen_moves(b, src, piece, &mut res);
    trace!("{} {} on {} has {} moves", piece.name(), id, src, res.len());
    Ok(res)
}

/// Moves the piece with handle `id` to `dst`
///
/// The move is not validated against [`available_moves()`]: enforcing the rules is the
/// caller's job. Any piece standing on `dst` is removed from the board. Moving a pawn
/// disables its double step.
///
/// Fails with [`BoardError::PieceNotFound`] if the piece is not on the board.
pub fn move_to(b: &mut Board, id: PieceId, dst: Square) -> Result<(), BoardError> {
    let src = b.find_piece(id)?;
    b.move_piece(src, dst)?;
    let piece = b.piece_mut(id).ok_or(BoardError::PieceNotFound(id))?;
    debug!("{} {} moved from {} to {}", piece.name(), id, src, dst);
    if piece.mark_moved() {
        trace!("pawn {} has lost its double step", id);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::BTreeSet;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn sq(row: u8, col: u8) -> Square {
        Square::at(row, col)
    }

    fn on_empty(piece: Piece, at: Square) -> (Board, PieceId) {
        let mut b = Board::empty();
        let id = b.set_piece(at, piece);
        (b, id)
    }

    fn moves_set(b: &Board, id: PieceId) -> BTreeSet<Square> {
        available_moves(b, id).unwrap().into_iter().collect()
    }

    #[test]
    fn test_white_pawn() {
        let (b, pawn) = on_empty(Piece::pawn(Player::White), sq(1, 4));
        assert_eq!(available_moves(&b, pawn).unwrap().as_slice(), [sq(2, 4), sq(3, 4)]);
    }

    #[test]
    fn test_black_pawn() {
        let (b, pawn) = on_empty(Piece::pawn(Player::Black), sq(6, 4));
        assert_eq!(available_moves(&b, pawn).unwrap().as_slice(), [sq(5, 4), sq(4, 4)]);
    }

    #[test]
    fn test_pawn_after_move() {
        init_logger();
        let (mut b, pawn) = on_empty(Piece::pawn(Player::White), sq(1, 4));
        move_to(&mut b, pawn, sq(2, 4)).unwrap();
        assert!(b.piece(pawn).unwrap().has_moved());
        assert_eq!(available_moves(&b, pawn).unwrap().as_slice(), [sq(3, 4)]);

        let (mut b, pawn) = on_empty(Piece::pawn(Player::Black), sq(6, 4));
        b.set_current_player(Player::Black);
        move_to(&mut b, pawn, sq(5, 4)).unwrap();
        assert_eq!(available_moves(&b, pawn).unwrap().as_slice(), [sq(4, 4)]);
    }

    #[test]
    fn test_pawn_after_double_step() {
        let (mut b, pawn) = on_empty(Piece::pawn(Player::White), sq(1, 2));
        move_to(&mut b, pawn, sq(3, 2)).unwrap();
        assert_eq!(available_moves(&b, pawn).unwrap().as_slice(), [sq(4, 2)]);
        move_to(&mut b, pawn, sq(4, 2)).unwrap();
        assert!(b.piece(pawn).unwrap().has_moved());
        assert_eq!(available_moves(&b, pawn).unwrap().as_slice(), [sq(5, 2)]);
    }

    #[test]
    fn test_pawn_marked_on_any_move() {
        // Even a move the pawn could never make disables the double step
        let (mut b, pawn) = on_empty(Piece::pawn(Player::White), sq(1, 0));
        move_to(&mut b, pawn, sq(1, 5)).unwrap();
        assert_eq!(b.find_piece(pawn), Ok(sq(1, 5)));
        assert!(b.piece(pawn).unwrap().has_moved());
        assert_eq!(available_moves(&b, pawn).unwrap().as_slice(), [sq(2, 5)]);
    }

    #[test]
    fn test_pawn_blocked() {
        let mut b = Board::empty();
        let pawn = b.set_piece(sq(1, 4), Piece::pawn(Player::White));
        b.set_piece(sq(2, 4), Piece::knight(Player::Black));
        assert!(available_moves(&b, pawn).unwrap().is_empty());

        let mut b = Board::empty();
        let pawn = b.set_piece(sq(1, 4), Piece::pawn(Player::White));
        b.set_piece(sq(3, 4), Piece::bishop(Player::White));
        assert_eq!(available_moves(&b, pawn).unwrap().as_slice(), [sq(2, 4)]);

        let mut b = Board::empty();
        let pawn = b.set_piece(sq(6, 3), Piece::pawn(Player::Black));
        b.set_piece(sq(5, 3), Piece::pawn(Player::White));
        assert!(available_moves(&b, pawn).unwrap().is_empty());
    }

    #[test]
    fn test_pawn_no_diagonal() {
        let mut b = Board::empty();
        let pawn = b.set_piece(sq(3, 3), Piece::pawn(Player::White));
        b.set_piece(sq(4, 2), Piece::rook(Player::Black));
        b.set_piece(sq(4, 4), Piece::rook(Player::Black));
        assert_eq!(moves_set(&b, pawn), BTreeSet::from([sq(4, 3), sq(5, 3)]));
    }

    #[test]
    fn test_pawn_board_edge() {
        let (b, pawn) = on_empty(Piece::pawn(Player::White), sq(7, 1));
        assert!(available_moves(&b, pawn).unwrap().is_empty());

        let (b, pawn) = on_empty(Piece::pawn(Player::White), sq(6, 1));
        assert_eq!(available_moves(&b, pawn).unwrap().as_slice(), [sq(7, 1)]);

        let (b, pawn) = on_empty(Piece::pawn(Player::Black), sq(0, 6));
        assert!(available_moves(&b, pawn).unwrap().is_empty());

        let (b, pawn) = on_empty(Piece::pawn(Player::Black), sq(1, 6));
        assert_eq!(available_moves(&b, pawn).unwrap().as_slice(), [sq(0, 6)]);
    }

    #[test]
    fn test_pawn_ignores_side_to_move() {
        for owner in [Player::White, Player::Black] {
            let home = sq(geometry::pawn_home_row(owner), 0);
            for side in [Player::White, Player::Black] {
                let (mut b, pawn) = on_empty(Piece::pawn(owner), home);
                b.set_current_player(side);
                let moves = available_moves(&b, pawn).unwrap();
                assert_eq!(moves.len(), 2);
                for m in &moves {
                    assert_eq!(
                        m.row() as i8 - home.row() as i8 > 0,
                        owner == Player::White
                    );
                }
            }
        }
    }

    #[test]
    fn test_king() {
        let (b, king) = on_empty(Piece::king(Player::White), sq(3, 3));
        let moves = moves_set(&b, king);
        assert_eq!(moves.len(), 8);
        assert!(moves.contains(&sq(2, 2)));
        assert!(moves.contains(&sq(2, 3)));

        let (b, king) = on_empty(Piece::king(Player::Black), sq(0, 0));
        assert_eq!(
            moves_set(&b, king),
            BTreeSet::from([sq(0, 1), sq(1, 0), sq(1, 1)])
        );

        let (b, king) = on_empty(Piece::king(Player::Black), sq(7, 4));
        assert_eq!(moves_set(&b, king).len(), 5);
    }

    #[test]
    fn test_king_blocked() {
        let mut b = Board::empty();
        let king = b.set_piece(sq(3, 3), Piece::king(Player::White));
        b.set_piece(sq(4, 4), Piece::queen(Player::Black));
        b.set_piece(sq(2, 3), Piece::pawn(Player::White));
        let moves = moves_set(&b, king);
        assert_eq!(moves.len(), 6);
        assert!(!moves.contains(&sq(4, 4)));
        assert!(!moves.contains(&sq(2, 3)));
    }

    #[test]
    fn test_rook() {
        let (b, rook) = on_empty(Piece::rook(Player::White), sq(3, 3));
        assert_eq!(
            available_moves(&b, rook).unwrap().as_slice(),
            [
                sq(4, 3),
                sq(5, 3),
                sq(6, 3),
                sq(7, 3),
                sq(2, 3),
                sq(1, 3),
                sq(0, 3),
                sq(3, 4),
                sq(3, 5),
                sq(3, 6),
                sq(3, 7),
                sq(3, 2),
                sq(3, 1),
                sq(3, 0),
            ]
        );

        let (b, rook) = on_empty(Piece::rook(Player::Black), sq(0, 0));
        assert_eq!(available_moves(&b, rook).unwrap().len(), 14);
    }

    #[test]
    fn test_rook_blocked() {
        let mut b = Board::empty();
        let rook = b.set_piece(sq(3, 3), Piece::rook(Player::White));
        b.set_piece(sq(5, 3), Piece::pawn(Player::Black));
        b.set_piece(sq(3, 1), Piece::pawn(Player::White));
        b.set_piece(sq(3, 4), Piece::king(Player::Black));
        assert_eq!(
            moves_set(&b, rook),
            BTreeSet::from([sq(4, 3), sq(2, 3), sq(1, 3), sq(0, 3), sq(3, 2)])
        );
    }

    #[test]
    fn test_bishop() {
        let (b, bishop) = on_empty(Piece::bishop(Player::White), sq(3, 3));
        let moves = moves_set(&b, bishop);
        assert_eq!(moves.len(), 13);
        assert!(moves.contains(&sq(0, 0)));
        assert!(moves.contains(&sq(7, 7)));
        assert!(moves.contains(&sq(6, 0)));
        assert!(moves.contains(&sq(0, 6)));

        let (b, bishop) = on_empty(Piece::bishop(Player::Black), sq(7, 0));
        assert_eq!(
            moves_set(&b, bishop),
            (1..8).map(|i| sq(7 - i, i)).collect::<BTreeSet<_>>()
        );
    }

    #[test]
    fn test_bishop_blocked() {
        let b = Board::from_diagram(
            "......../......../.....p../......../...B..../......../.P....../........",
        )
        .unwrap();
        let bishop = b.piece_at(sq(3, 3)).unwrap();
        assert_eq!(
            moves_set(&b, bishop),
            BTreeSet::from([
                sq(4, 4),
                sq(4, 2),
                sq(5, 1),
                sq(6, 0),
                sq(2, 4),
                sq(1, 5),
                sq(0, 6),
                sq(2, 2),
            ])
        );
    }

    #[test]
    fn test_queen() {
        let (b, queen) = on_empty(Piece::queen(Player::White), sq(3, 3));
        let moves = moves_set(&b, queen);
        assert_eq!(moves.len(), 27);
        assert!(moves.contains(&sq(0, 3)));
        assert!(moves.contains(&sq(0, 0)));

        let (b, queen) = on_empty(Piece::queen(Player::Black), sq(7, 7));
        assert_eq!(moves_set(&b, queen).len(), 21);
    }

    #[test]
    fn test_queen_surrounded() {
        let b = Board::from_diagram(
            "......../......../......../..nnn.../..nQn.../..nnn.../......../........",
        )
        .unwrap();
        let queen = b.piece_at(sq(3, 3)).unwrap();
        assert!(available_moves(&b, queen).unwrap().is_empty());
    }

    #[test]
    fn test_knight() {
        let (b, knight) = on_empty(Piece::knight(Player::White), sq(3, 3));
        assert!(available_moves(&b, knight).unwrap().is_empty());

        let (b, knight) = on_empty(Piece::knight(Player::Black), sq(0, 1));
        assert!(available_moves(&b, knight).unwrap().is_empty());
    }

    #[test]
    fn test_move_to_unchecked() {
        init_logger();
        let mut b = Board::empty();
        let rook = b.set_piece(sq(0, 0), Piece::rook(Player::White));
        let bishop = b.set_piece(sq(5, 5), Piece::bishop(Player::Black));
        move_to(&mut b, rook, sq(5, 5)).unwrap();
        assert_eq!(b.find_piece(rook), Ok(sq(5, 5)));
        assert!(b.is_square_empty(sq(0, 0)));
        assert_eq!(b.piece(rook), Some(&Piece::rook(Player::White)));

        assert_eq!(
            available_moves(&b, bishop),
            Err(BoardError::PieceNotFound(bishop))
        );
        assert_eq!(
            move_to(&mut b, bishop, sq(0, 0)),
            Err(BoardError::PieceNotFound(bishop))
        );
        assert!(b.is_square_empty(sq(0, 0)));
    }

    #[test]
    fn test_generation_is_pure() {
        let b = Board::from_diagram(
            "rnbqkbnr/pppppppp/......../......../......../......../PPPPPPPP/RNBQKBNR",
        )
        .unwrap();
        let before = b.as_diagram();
        for (_, id, piece) in b.pieces() {
            let piece = *piece;
            available_moves(&b, id).unwrap();
            assert_eq!(b.piece(id), Some(&piece));
        }
        assert_eq!(b.as_diagram(), before);
    }

    fn random_board(rng: &mut StdRng, src: Square, piece: Piece) -> (Board, PieceId) {
        const CHARS: &[u8] = b"PNBRQKpnbrqk";
        let mut b = Board::empty();
        let id = b.set_piece(src, piece);
        for sq in Square::iter() {
            if sq != src && rng.gen_bool(0.3) {
                let c = CHARS[rng.gen_range(0..CHARS.len())] as char;
                b.set_piece(sq, Piece::from_char(c).unwrap());
            }
        }
        (b, id)
    }

    #[test]
    fn test_rays_random() {
        let mut rng = StdRng::seed_from_u64(0x5EED_CAFE);
        for _ in 0..500 {
            let src = Square::from_index(rng.gen_range(0..Square::COUNT));
            let owner = if rng.gen_bool(0.5) {
                Player::White
            } else {
                Player::Black
            };
            let (piece, dirs): (Piece, &[Direction]) = match rng.gen_range(0..3) {
                0 => (Piece::bishop(owner), &geometry::DIAGONAL[..]),
                1 => (Piece::rook(owner), &geometry::ORTHOGONAL[..]),
                _ => (Piece::queen(owner), &geometry::ALL_DIRECTIONS[..]),
            };
            let (b, id) = random_board(&mut rng, src, piece);
            let moves = moves_set(&b, id);

            let mut total = 0;
            for &(d_row, d_col) in dirs {
                let mut dist = 1;
                while let Some(sq) = src.shift(d_row * dist, d_col * dist) {
                    if !b.is_square_empty(sq) {
                        break;
                    }
                    assert!(moves.contains(&sq));
                    dist += 1;
                }
                // The ray ends at the board edge or right before an obstacle
                if let Some(sq) = src.shift(d_row * dist, d_col * dist) {
                    assert!(!moves.contains(&sq));
                }
                total += dist as usize - 1;
            }
            assert_eq!(moves.len(), total);
            assert!(moves.iter().all(|&sq| b.is_square_empty(sq)));
        }
    }

    #[test]
    fn test_leapers_random() {
        let mut rng = StdRng::seed_from_u64(0x0DD_BA11);
        for _ in 0..500 {
            let src = Square::from_index(rng.gen_range(0..Square::COUNT));

            let (b, knight) = random_board(&mut rng, src, Piece::knight(Player::White));
            assert!(available_moves(&b, knight).unwrap().is_empty());

            let (b, king) = random_board(&mut rng, src, Piece::king(Player::Black));
            let expected: BTreeSet<_> = Square::iter()
                .filter(|&sq| {
                    sq != src
                        && b.is_square_empty(sq)
                        && (sq.row() as i8 - src.row() as i8).abs() <= 1
                        && (sq.col() as i8 - src.col() as i8).abs() <= 1
                })
                .collect();
            assert_eq!(moves_set(&b, king), expected);
        }
    }
}
