//! Board snapshots for rewinding a match.

use serde::{Deserialize, Serialize};

use crate::board::{Board, PieceArena};
use crate::tiles::TileMap;

/// Frozen copy of the mutable parts of a board. The turn log is not
/// captured: rewinding appends to it rather than rewriting history.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Snapshot {
    pub turn: u32,
    pub pieces: PieceArena,
    pub tile_effects: TileMap,
}

impl Board {
    pub fn save_snapshot(&self) -> Snapshot {
        Snapshot {
            turn: self.turn(),
            pieces: self.arena().clone(),
            tile_effects: self.tile_effects().clone(),
        }
    }

    /// Restore pieces, tiles and turn counter from a snapshot.
    pub fn restore_snapshot(&mut self, snapshot: &Snapshot) {
        self.restore_state(
            snapshot.turn,
            snapshot.pieces.clone(),
            snapshot.tile_effects.clone(),
        );
        self.log_turn(format!("Board rewound to turn {}.", snapshot.turn));
    }
}

/// Every snapshot taken during a match, oldest first. Never evicts.
#[derive(Clone, Debug, Default)]
pub struct SnapshotHistory {
    snapshots: Vec<Snapshot>,
}

impl SnapshotHistory {
    pub fn new() -> SnapshotHistory {
        SnapshotHistory::default()
    }

    pub fn record(&mut self, board: &Board) {
        self.snapshots.push(board.save_snapshot());
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    /// Most recent snapshot taken at `turn`.
    pub fn at_turn(&self, turn: u32) -> Option<&Snapshot> {
        self.snapshots.iter().rev().find(|s| s.turn == turn)
    }

    /// Restore `board` to `turn`. Returns `false` if no snapshot matches.
    pub fn rewind(&self, board: &mut Board, turn: u32) -> bool {
        match self.at_turn(turn) {
            Some(snapshot) => {
                board.restore_snapshot(snapshot);
                true
            }
            None => false,
        }
    }
}
