//! Monster Tactics rules engine.
//!
//! Chess movement on an 8x8 board, with pieces that carry health, energy,
//! abilities, passives and pack synergies. A match ends when a King is
//! eliminated.
//!
//! # Layout
//!
//! ```text
//! coord      Pos(u8) and the "D4" label codec
//! catalog    read-only templates, costs, descriptions, evolutions
//! piece      Piece value type and its classifying enums
//! movement   legal destinations per piece geometry (MoveList, Occupancy)
//! board      arena-backed match state, moves, win detection, threats
//! combat     damage / heal / tile damage accounting
//! abilities  ability costs and effect dispatch
//! passives   start-of-turn passive triggers
//! tiles      ambient and entry tile effects
//! evolution  XP, levels, ultimate charge, evolution, promotion
//! synergy    pack bonuses
//! snapshot   save / restore / rewind
//! team       standard layout and roster generation
//! report     end-of-match report
//! ```
//!
//! Every `Board` method that mutates state appends to the board's turn log;
//! rule violations are rejected with a `bool` and a log entry, never an
//! error. `TacticsError` is reserved for malformed input and broken setup.

pub mod abilities;
pub mod board;
pub mod catalog;
pub mod combat;
pub mod coord;
pub mod error;
pub mod evolution;
pub mod movement;
pub mod passives;
pub mod piece;
pub mod report;
pub mod snapshot;
pub mod synergy;
pub mod team;
pub mod tiles;

pub use abilities::Ability;
pub use board::{Board, Outcome, PieceArena, PreviewGroup};
pub use catalog::{Catalog, Personality, PieceTemplate, TemplateId};
pub use coord::{coordinates_to_position, position_to_coordinates, Pos};
pub use error::{TacticsError, TacticsResult};
pub use movement::{is_legal, legal_moves, legal_moves_among, MoveList, Occupancy};
pub use passives::Passive;
pub use piece::{Pack, Piece, PieceId, PieceKind, Team};
pub use report::MatchReport;
pub use snapshot::{Snapshot, SnapshotHistory};
pub use tiles::TileEffect;
