use crate::types::Player;

/// Unit step as `(d_row, d_col)`
pub type Direction = (i8, i8);

/// Longest ray on an 8x8 board
pub const MAX_DISTANCE: i8 = 7;

pub const DIAGONAL: [Direction; 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

pub const ORTHOGONAL: [Direction; 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

pub const ALL_DIRECTIONS: [Direction; 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

pub const KING_OFFSETS: [Direction; 8] = ALL_DIRECTIONS;

pub const fn pawn_forward(p: Player) -> i8 {
    match p {
        Player::White => 1,
        Player::Black => -1,
    }
}

pub const fn pawn_home_row(p: Player) -> u8 {
    match p {
        Player::White => 1,
        Player::Black => 6,
    }
}
