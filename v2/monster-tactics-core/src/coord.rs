//! Tile coordinates and the file-rank label codec.
//!
//! # Encoding
//!
//! ```text
//! Pos(u8) = row * 8 + col
//!   row = rank - 1   (rank 1 -> row 0, rank 8 -> row 7)
//!   col = file index (A -> 0, H -> 7)
//!
//!   rank 8 | 56 57 58 59 60 61 62 63
//!   ...    | ...
//!   rank 2 |  8  9 10 11 12 13 14 15
//!   rank 1 |  0  1  2  3  4  5  6  7
//!          +------------------------
//!             A  B  C  D  E  F  G  H
//! ```
//!
//! Ascending `Pos` order (A1, B1, ..., H1, A2, ..., H8) is the canonical
//! enumeration order everywhere a deterministic tie-break is needed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{TacticsError, TacticsResult};

/// Number of files and ranks.
pub const BOARD_SIZE: u8 = 8;

/// Number of tiles on the board.
pub const TILE_COUNT: usize = 64;

const FILES: &[u8; 8] = b"ABCDEFGH";

/// A tile on the 8x8 board. Outside this crate a `Pos` only comes from the
/// checked constructors, so every value indexes a 64-entry array.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Pos(pub(crate) u8);

impl Pos {
    /// Create a position from row and column (0-7 each).
    #[inline]
    pub const fn from_row_col(row: u8, col: u8) -> Pos {
        debug_assert!(row < BOARD_SIZE && col < BOARD_SIZE);
        Pos(row * BOARD_SIZE + col)
    }

    /// Create a position from signed coordinates, rejecting anything off the board.
    #[inline]
    pub fn new(row: i8, col: i8) -> Option<Pos> {
        if (0..BOARD_SIZE as i8).contains(&row) && (0..BOARD_SIZE as i8).contains(&col) {
            Some(Pos::from_row_col(row as u8, col as u8))
        } else {
            None
        }
    }

    /// Position for a raw 0-63 index.
    #[inline]
    pub fn from_index(index: u8) -> Option<Pos> {
        Pos(index).is_valid().then_some(Pos(index))
    }

    /// Get the row (0-7, rank minus one).
    #[inline]
    pub const fn row(self) -> u8 {
        self.0 / BOARD_SIZE
    }

    /// Get the column (0-7, file index).
    #[inline]
    pub const fn col(self) -> u8 {
        self.0 % BOARD_SIZE
    }

    /// Index into a 64-entry array.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Check if this is a valid position (0-63).
    #[inline]
    pub const fn is_valid(self) -> bool {
        (self.0 as usize) < TILE_COUNT
    }

    /// Step by a row/column delta, or `None` if that leaves the board.
    #[inline]
    pub fn offset(self, d_row: i8, d_col: i8) -> Option<Pos> {
        Pos::new(self.row() as i8 + d_row, self.col() as i8 + d_col)
    }

    /// Chebyshev distance: the number of King steps between two tiles.
    #[inline]
    pub fn distance(self, other: Pos) -> u8 {
        let dr = (self.row() as i8 - other.row() as i8).unsigned_abs();
        let dc = (self.col() as i8 - other.col() as i8).unsigned_abs();
        dr.max(dc)
    }

    /// Two distinct tiles that touch, orthogonally or diagonally.
    #[inline]
    pub fn is_adjacent(self, other: Pos) -> bool {
        self.distance(other) == 1
    }

    /// The up-to-8 tiles touching this one, in ascending order.
    pub fn neighbors(self) -> impl Iterator<Item = Pos> {
        Pos::all().filter(move |&p| self.is_adjacent(p))
    }

    /// Iterate over all 64 positions in ascending order.
    pub fn all() -> impl Iterator<Item = Pos> {
        (0..TILE_COUNT as u8).map(Pos)
    }

    /// Parse a file-rank label such as `"D4"` (file letter is case-insensitive).
    pub fn from_label(label: &str) -> TacticsResult<Pos> {
        let invalid = || TacticsError::InvalidLabel {
            label: label.to_string(),
        };
        let bytes = label.trim().as_bytes();
        if bytes.len() != 2 {
            return Err(invalid());
        }
        let file = bytes[0].to_ascii_uppercase();
        let rank = bytes[1];
        if !(b'A'..=b'H').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return Err(invalid());
        }
        Ok(Pos::from_row_col(rank - b'1', file - b'A'))
    }

    /// Render as a file-rank label, e.g. `"D4"`.
    pub fn label(self) -> String {
        let mut s = String::with_capacity(2);
        s.push(FILES[self.col() as usize] as char);
        s.push((b'1' + self.row()) as char);
        s
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            FILES[self.col() as usize] as char,
            self.row() + 1
        )
    }
}

impl TryFrom<u8> for Pos {
    type Error = TacticsError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Pos::from_index(index).ok_or(TacticsError::OutOfBounds {
            row: (index / BOARD_SIZE) as i32,
            col: (index % BOARD_SIZE) as i32,
        })
    }
}

impl From<Pos> for u8 {
    fn from(pos: Pos) -> u8 {
        pos.0
    }
}

impl FromStr for Pos {
    type Err = TacticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pos::from_label(s)
    }
}

/// Convert a label to `(row, col)`.
pub fn position_to_coordinates(label: &str) -> TacticsResult<(u8, u8)> {
    let pos = Pos::from_label(label)?;
    Ok((pos.row(), pos.col()))
}

/// Convert `(row, col)` to a label, rejecting out-of-bounds coordinates.
pub fn coordinates_to_position(row: i32, col: i32) -> TacticsResult<String> {
    if !(0..BOARD_SIZE as i32).contains(&row) || !(0..BOARD_SIZE as i32).contains(&col) {
        return Err(TacticsError::OutOfBounds { row, col });
    }
    Ok(Pos::from_row_col(row as u8, col as u8).label())
}
