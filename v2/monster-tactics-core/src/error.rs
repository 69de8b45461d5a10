//! Error types for board construction and position parsing.
//!
//! Rule violations during play (illegal moves, unaffordable abilities) are not
//! errors: they are rejected with a `bool` and a turn-log entry. Only
//! malformed input and broken setup invariants surface here.

use crate::piece::Team;

/// Errors raised by fallible constructors and parsers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TacticsError {
    /// A tile label that is not a file A-H followed by a rank 1-8.
    #[error("Invalid position label: {label:?}")]
    InvalidLabel { label: String },

    /// Row/column pair outside the 8x8 board.
    #[error("Coordinates out of bounds: ({row}, {col})")]
    OutOfBounds { row: i32, col: i32 },

    /// A template id that the catalog does not know.
    #[error("Unknown piece template: {id}")]
    UnknownTemplate { id: String },

    /// Two living pieces would share a tile.
    #[error("Tile {label} is already occupied")]
    OccupiedTile { label: String },

    /// A team was assembled without a King.
    #[error("{team} team has no King")]
    MissingKing { team: Team },

    /// A team was assembled with more than one King.
    #[error("{team} team has {count} Kings")]
    MultipleKings { team: Team, count: usize },

    /// A piece id that does not refer to a live arena slot.
    #[error("No piece with id {id}")]
    UnknownPiece { id: usize },
}

/// Result alias for core operations.
pub type TacticsResult<T> = Result<T, TacticsError>;
