//! Movement rules: legal destinations per piece geometry.
//!
//! Generation works against an [`Occupancy`] grid built from living pieces
//! only, so eliminated pieces never block or get captured. Destinations are
//! returned in ascending `Pos` order.

use crate::coord::{Pos, TILE_COUNT};
use crate::piece::{Piece, PieceKind, Team};

/// A queen in the centre of an empty board has 27 destinations.
pub const MAX_MOVES: usize = 32;

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const DIAGONALS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const ORTHOGONALS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// A fixed-size destination list that avoids heap allocation.
#[derive(Clone, Copy)]
pub struct MoveList {
    moves: [Pos; MAX_MOVES],
    len: u8,
}

impl MoveList {
    /// Create an empty move list.
    #[inline]
    pub const fn new() -> MoveList {
        MoveList {
            moves: [Pos(0); MAX_MOVES],
            len: 0,
        }
    }

    /// Add a destination to the list.
    #[inline]
    pub fn push(&mut self, to: Pos) {
        debug_assert!((self.len as usize) < MAX_MOVES);
        self.moves[self.len as usize] = to;
        self.len += 1;
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub const fn get(&self, idx: usize) -> Pos {
        self.moves[idx]
    }

    pub fn contains(&self, to: Pos) -> bool {
        self.as_slice().contains(&to)
    }

    pub fn as_slice(&self) -> &[Pos] {
        &self.moves[..self.len as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = Pos> + '_ {
        self.as_slice().iter().copied()
    }

    fn sort(&mut self) {
        self.moves[..self.len as usize].sort_unstable();
    }
}

impl Default for MoveList {
    fn default() -> Self {
        MoveList::new()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Which team, if any, holds each tile. Built from living pieces only.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Occupancy {
    cells: [Option<Team>; TILE_COUNT],
}

impl Occupancy {
    pub const fn empty() -> Occupancy {
        Occupancy {
            cells: [None; TILE_COUNT],
        }
    }

    pub fn from_pieces<'a>(pieces: impl IntoIterator<Item = &'a Piece>) -> Occupancy {
        let mut occ = Occupancy::empty();
        for piece in pieces.into_iter().filter(|p| p.is_alive()) {
            occ.cells[piece.pos.index()] = Some(piece.team);
        }
        occ
    }

    #[inline]
    pub fn team_at(&self, pos: Pos) -> Option<Team> {
        self.cells[pos.index()]
    }

    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        self.cells[pos.index()].is_none()
    }

    #[inline]
    pub fn set(&mut self, pos: Pos, team: Option<Team>) {
        self.cells[pos.index()] = team;
    }
}

/// Enumerate every legal destination for `piece`.
pub fn legal_moves(piece: &Piece, occ: &Occupancy) -> MoveList {
    let mut moves = MoveList::new();
    if !piece.is_alive() {
        return moves;
    }
    let from = piece.pos;
    let team = piece.team;

    match piece.kind {
        PieceKind::Pawn => {
            let fwd = team.forward();
            if let Some(to) = from.offset(fwd, 0) {
                if occ.is_empty(to) {
                    moves.push(to);
                }
            }
            for d_col in [-1, 1] {
                if let Some(to) = from.offset(fwd, d_col) {
                    if occ.team_at(to) == Some(team.opponent()) {
                        moves.push(to);
                    }
                }
            }
        }
        PieceKind::Knight => push_steps(&mut moves, from, team, occ, &KNIGHT_OFFSETS),
        PieceKind::King => push_steps(&mut moves, from, team, occ, &KING_OFFSETS),
        PieceKind::Bishop => push_rays(&mut moves, from, team, occ, &DIAGONALS),
        PieceKind::Rook => push_rays(&mut moves, from, team, occ, &ORTHOGONALS),
        PieceKind::Queen => {
            push_rays(&mut moves, from, team, occ, &DIAGONALS);
            push_rays(&mut moves, from, team, occ, &ORTHOGONALS);
        }
    }

    moves.sort();
    moves
}

/// Convenience form that builds the occupancy grid from a piece set.
pub fn legal_moves_among<'a>(piece: &Piece, pieces: impl IntoIterator<Item = &'a Piece>) -> MoveList {
    legal_moves(piece, &Occupancy::from_pieces(pieces))
}

/// Membership in the legal-move set.
pub fn is_legal(piece: &Piece, to: Pos, occ: &Occupancy) -> bool {
    legal_moves(piece, occ).contains(to)
}

fn push_steps(moves: &mut MoveList, from: Pos, team: Team, occ: &Occupancy, offsets: &[(i8, i8)]) {
    for &(dr, dc) in offsets {
        if let Some(to) = from.offset(dr, dc) {
            if occ.team_at(to) != Some(team) {
                moves.push(to);
            }
        }
    }
}

fn push_rays(moves: &mut MoveList, from: Pos, team: Team, occ: &Occupancy, dirs: &[(i8, i8)]) {
    for &(dr, dc) in dirs {
        let mut cur = from;
        while let Some(to) = cur.offset(dr, dc) {
            match occ.team_at(to) {
                None => moves.push(to),
                Some(owner) => {
                    if owner != team {
                        moves.push(to);
                    }
                    break;
                }
            }
            cur = to;
        }
    }
}
