//! Authoritative match state.
//!
//! # Storage
//!
//! Pieces live in a [`PieceArena`]: a slot vector plus a free list.
//! `PieceId` is the slot index, so cloning a board for search is a flat copy
//! of `Copy` pieces with no object graph to walk.
//!
//! Eliminated pieces (health 0) stay in their slot. Every occupancy,
//! movement, threat, passive, synergy and win query filters on
//! `is_alive()`; reporting sees all pieces.
//!
//! Sub-systems (combat, abilities, passives, tiles, progression, synergy,
//! snapshots) extend `Board` from their own modules.

use std::fmt;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, TemplateId};
use crate::coord::Pos;
use crate::error::{TacticsError, TacticsResult};
use crate::movement::{self, MoveList, Occupancy};
use crate::piece::{Pack, Piece, PieceId, PieceKind, Team};
use crate::tiles::TileMap;

/// Target for turn-log events in `tracing` output.
pub const TURN_LOG_TARGET: &str = "monster_tactics::turn";

// ============================================================================
// Arena
// ============================================================================

/// Slot storage for pieces with index reuse.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct PieceArena {
    slots: Vec<Option<Piece>>,
    free: Vec<u16>,
}

impl PieceArena {
    pub fn new() -> PieceArena {
        PieceArena::default()
    }

    /// Store a piece, reusing a freed slot if there is one.
    pub fn insert(&mut self, piece: Piece) -> PieceId {
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot as usize] = Some(piece);
                PieceId(slot)
            }
            None => {
                self.slots.push(Some(piece));
                PieceId((self.slots.len() - 1) as u16)
            }
        }
    }

    pub fn remove(&mut self, id: PieceId) -> Option<Piece> {
        let taken = self.slots.get_mut(id.index())?.take();
        if taken.is_some() {
            self.free.push(id.0);
        }
        taken
    }

    #[inline]
    pub fn get(&self, id: PieceId) -> Option<&Piece> {
        self.slots.get(id.index())?.as_ref()
    }

    #[inline]
    pub fn get_mut(&mut self, id: PieceId) -> Option<&mut Piece> {
        self.slots.get_mut(id.index())?.as_mut()
    }

    /// Occupied slots in id order.
    pub fn iter(&self) -> impl Iterator<Item = (PieceId, &Piece)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|p| (PieceId(i as u16), p)))
    }

    /// Number of stored pieces, eliminated ones included.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// Outcome
// ============================================================================

/// How a match ended.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Outcome {
    Winner(Team),
    /// Both Kings eliminated.
    Draw,
}

impl Outcome {
    /// "Player Wins!", "AI Wins!" or "Draw!".
    pub fn label(self) -> String {
        match self {
            Outcome::Winner(team) => format!("{team} Wins!"),
            Outcome::Draw => "Draw!".to_string(),
        }
    }

    pub fn winner(self) -> Option<Team> {
        match self {
            Outcome::Winner(team) => Some(team),
            Outcome::Draw => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// One team/pack group in a team preview.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct PreviewGroup {
    pub team: Team,
    pub pack: Pack,
    pub synergy_active: bool,
    /// `"FireKnight1 (Knight) at B1"` entries in id order.
    pub members: Vec<String>,
}

// ============================================================================
// Board
// ============================================================================

/// Match state: pieces, turn log, tile effects and the board's own RNG.
///
/// `Clone` is a full, independent deep copy; search works exclusively on
/// clones.
#[derive(Clone, Debug)]
pub struct Board {
    catalog: Arc<Catalog>,
    pieces: PieceArena,
    turn_log: Vec<String>,
    tiles: TileMap,
    turn: u32,
    rng: StdRng,
    /// Off on search scratch copies.
    recording: bool,
}

impl Board {
    /// An empty board. `seed` drives every random tile effect.
    pub fn new(catalog: Arc<Catalog>, seed: u64) -> Board {
        Board {
            catalog,
            pieces: PieceArena::new(),
            turn_log: Vec::new(),
            tiles: TileMap::new(),
            turn: 0,
            rng: StdRng::seed_from_u64(seed),
            recording: true,
        }
    }

    /// A copy for hypothetical play: same pieces, tiles and RNG state, but
    /// an empty turn log that stays empty.
    pub fn scratch(&self) -> Board {
        Board {
            catalog: Arc::clone(&self.catalog),
            pieces: self.pieces.clone(),
            turn_log: Vec::new(),
            tiles: self.tiles.clone(),
            turn: self.turn,
            rng: self.rng.clone(),
            recording: false,
        }
    }

    /// Build a board from two team rosters.
    ///
    /// Each roster must contain exactly one King and no two pieces may share
    /// a tile. Piece teams are overwritten to match the roster they came in.
    pub fn from_teams(
        catalog: Arc<Catalog>,
        player: Vec<Piece>,
        ai: Vec<Piece>,
        seed: u64,
    ) -> TacticsResult<Board> {
        for (team, roster) in [(Team::Player, &player), (Team::Ai, &ai)] {
            let kings = roster.iter().filter(|p| p.kind == PieceKind::King).count();
            match kings {
                0 => return Err(TacticsError::MissingKing { team }),
                1 => {}
                count => return Err(TacticsError::MultipleKings { team, count }),
            }
        }

        let mut board = Board::new(catalog, seed);
        for (team, roster) in [(Team::Player, player), (Team::Ai, ai)] {
            for mut piece in roster {
                piece.team = team;
                board.add_piece(piece)?;
            }
        }
        Ok(board)
    }

    // ========== Pieces ==========

    /// Place a piece. Fails if a living piece already holds the tile.
    pub fn add_piece(&mut self, piece: Piece) -> TacticsResult<PieceId> {
        if piece.is_alive() && self.piece_at(piece.pos).is_some() {
            return Err(TacticsError::OccupiedTile {
                label: piece.pos.label(),
            });
        }
        Ok(self.pieces.insert(piece))
    }

    /// Instantiate a catalog template by name and place it.
    pub fn spawn(&mut self, template: &str, team: Team, pos: Pos) -> TacticsResult<PieceId> {
        let id = self.catalog.template_by_name(template)?;
        let piece = self.catalog.instantiate(id, team, pos)?;
        self.add_piece(piece)
    }

    /// Take a piece out of the arena entirely.
    pub fn remove_piece(&mut self, id: PieceId) -> TacticsResult<Piece> {
        self.pieces
            .remove(id)
            .ok_or(TacticsError::UnknownPiece { id: id.index() })
    }

    #[inline]
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id)
    }

    #[inline]
    pub fn piece_mut(&mut self, id: PieceId) -> Option<&mut Piece> {
        self.pieces.get_mut(id)
    }

    /// Every piece, eliminated ones included.
    pub fn pieces(&self) -> impl Iterator<Item = (PieceId, &Piece)> {
        self.pieces.iter()
    }

    pub fn living(&self) -> impl Iterator<Item = (PieceId, &Piece)> {
        self.pieces.iter().filter(|(_, p)| p.is_alive())
    }

    pub fn living_of(&self, team: Team) -> impl Iterator<Item = (PieceId, &Piece)> {
        self.living().filter(move |(_, p)| p.team == team)
    }

    /// Living piece on a tile.
    pub fn piece_at(&self, pos: Pos) -> Option<PieceId> {
        self.living().find(|(_, p)| p.pos == pos).map(|(id, _)| id)
    }

    pub fn king_of(&self, team: Team) -> Option<PieceId> {
        self.living_of(team)
            .find(|(_, p)| p.kind == PieceKind::King)
            .map(|(id, _)| id)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn shared_catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    /// Template name of a piece.
    pub fn template_name(&self, id: PieceId) -> &str {
        self.piece(id)
            .map(|p| self.catalog.name_of(p.template))
            .unwrap_or("?")
    }

    /// `"Player FireKnight1"`: how the turn log names a piece.
    pub fn describe(&self, id: PieceId) -> String {
        match self.piece(id) {
            Some(p) => format!("{} {}", p.team, self.catalog.name_of(p.template)),
            None => format!("piece {id}"),
        }
    }

    // ========== Turn Log ==========

    /// Append an event to the turn log.
    pub fn log_turn(&mut self, entry: String) {
        if !self.recording {
            return;
        }
        tracing::debug!(target: TURN_LOG_TARGET, turn = self.turn, "{entry}");
        self.turn_log.push(entry);
    }

    pub fn turn_log(&self) -> &[String] {
        &self.turn_log
    }

    /// Turns begun so far.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Open a new turn for `team`.
    pub fn begin_turn(&mut self, team: Team) {
        self.turn += 1;
        self.log_turn(format!("--- Turn {}: {team} ---", self.turn));
    }

    // ========== Crate Internals ==========

    pub(crate) fn tile_effects(&self) -> &TileMap {
        &self.tiles
    }

    pub(crate) fn tiles_mut(&mut self) -> &mut TileMap {
        &mut self.tiles
    }

    pub(crate) fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub(crate) fn arena(&self) -> &PieceArena {
        &self.pieces
    }

    pub(crate) fn restore_state(&mut self, turn: u32, pieces: PieceArena, tiles: TileMap) {
        self.turn = turn;
        self.pieces = pieces;
        self.tiles = tiles;
    }

    /// Swap a piece's template in place, keeping id, team, position,
    /// energy, progression and counters.
    pub(crate) fn replace_with_template(&mut self, id: PieceId, template: TemplateId) -> TacticsResult<()> {
        let current = *self
            .piece(id)
            .ok_or(TacticsError::UnknownPiece { id: id.index() })?;
        let mut fresh = self.catalog.instantiate(template, current.team, current.pos)?;
        fresh.energy = current.energy;
        fresh.energy_cost_modifier = current.energy_cost_modifier;
        fresh.level = current.level;
        fresh.experience = current.experience;
        fresh.ultimate_unlocked = current.ultimate_unlocked;
        fresh.ultimate_charge = current.ultimate_charge;
        fresh.damage_dealt = current.damage_dealt;
        fresh.kills = current.kills;
        if let Some(slot) = self.piece_mut(id) {
            *slot = fresh;
        }
        Ok(())
    }

    // ========== Movement ==========

    /// Occupancy grid of living pieces.
    pub fn occupancy(&self) -> Occupancy {
        Occupancy::from_pieces(self.living().map(|(_, p)| p))
    }

    pub fn legal_moves(&self, id: PieceId) -> MoveList {
        match self.piece(id) {
            Some(piece) => movement::legal_moves(piece, &self.occupancy()),
            None => MoveList::new(),
        }
    }

    pub fn is_legal(&self, id: PieceId, to: Pos) -> bool {
        self.legal_moves(id).contains(to)
    }

    /// Relocate a piece. Legality is the caller's concern.
    ///
    /// A living enemy on `to` is captured through `damage_piece` for its full
    /// remaining health. Then the entry tile effect applies, and a Pawn
    /// reaching the far rank is promoted. Moving onto a friendly piece is
    /// refused and logged.
    pub fn move_piece(&mut self, id: PieceId, to: Pos) {
        let Some(mover) = self.piece(id).copied() else {
            return;
        };
        if !mover.is_alive() {
            return;
        }
        let who = self.describe(id);

        let occupant = self.piece_at(to).filter(|&o| o != id);
        if let Some(other) = occupant {
            if self.piece(other).is_some_and(|p| p.team == mover.team) {
                tracing::warn!(piece = %who, to = %to, "move onto a friendly piece refused");
                self.log_turn(format!("{who} cannot move onto an ally at {to}."));
                return;
            }
        }

        self.log_turn(format!("{who} moved from {} to {to}", mover.pos));

        if let Some(target) = occupant {
            let remaining = self.piece(target).map_or(0, |p| p.health);
            let name = self.describe(target);
            self.log_turn(format!("{who} captures {name} at {to}!"));
            self.damage_piece(id, target, remaining);
            self.charge_ultimate(id, remaining);
        }

        if let Some(p) = self.piece_mut(id) {
            p.pos = to;
        }
        self.apply_entry_effect(id, to);

        if let Some(p) = self.piece(id).copied() {
            if p.is_alive() && p.kind == PieceKind::Pawn && p.pos.row() == p.team.promotion_row() {
                self.promote(id);
            }
        }
    }

    // ========== Win Detection ==========

    /// `None` while both Kings live.
    pub fn check_win_condition(&self) -> Option<Outcome> {
        match (self.king_of(Team::Player), self.king_of(Team::Ai)) {
            (Some(_), Some(_)) => None,
            (Some(_), None) => Some(Outcome::Winner(Team::Player)),
            (None, Some(_)) => Some(Outcome::Winner(Team::Ai)),
            (None, None) => Some(Outcome::Draw),
        }
    }

    // ========== Turn Effects ==========

    /// For every living piece of `team`: ambient tile effect, then passive.
    pub fn apply_start_of_turn_effects(&mut self, team: Team) {
        let ids: Vec<PieceId> = self.living_of(team).map(|(id, _)| id).collect();
        for id in ids {
            self.apply_ambient_effect(id);
            self.trigger_passive(id);
        }
    }

    /// Alias of [`Board::apply_start_of_turn_effects`].
    pub fn process_start_of_turn_effects(&mut self, team: Team) {
        self.apply_start_of_turn_effects(team);
    }

    // ========== Threats & Adjacency ==========

    /// Living enemies of `team` with `pos` in their legal-move set.
    pub fn threats_to(&self, pos: Pos, team: Team) -> Vec<PieceId> {
        let occ = self.occupancy();
        self.living_of(team.opponent())
            .filter(|(_, p)| movement::is_legal(p, pos, &occ))
            .map(|(id, _)| id)
            .collect()
    }

    /// Recomputes every enemy's legal moves.
    pub fn is_tile_under_threat(&self, pos: Pos, team: Team) -> bool {
        !self.threats_to(pos, team).is_empty()
    }

    pub fn is_tile_safe(&self, pos: Pos, team: Team) -> bool {
        !self.is_tile_under_threat(pos, team)
    }

    /// A defensive tile effect, or next to the friendly King, or next to
    /// two or more living allies.
    pub fn is_tile_defensive(&self, pos: Pos, team: Team) -> bool {
        if self.tile_effect(pos).is_some_and(|e| e.is_defensive()) {
            return true;
        }
        let mut allies = 0;
        for (_, p) in self.living_of(team) {
            if p.pos.is_adjacent(pos) {
                if p.kind == PieceKind::King {
                    return true;
                }
                allies += 1;
            }
        }
        allies >= 2
    }

    pub fn is_adjacent(&self, a: PieceId, b: PieceId) -> bool {
        match (self.piece(a), self.piece(b)) {
            (Some(a), Some(b)) => a.pos.is_adjacent(b.pos),
            _ => false,
        }
    }

    /// Living enemies touching `id`, in id order.
    pub fn adjacent_enemies(&self, id: PieceId) -> Vec<PieceId> {
        self.adjacent_where(id, |me, other| other.team != me.team)
    }

    /// Living allies touching `id`, in id order.
    pub fn adjacent_allies(&self, id: PieceId) -> Vec<PieceId> {
        self.adjacent_where(id, |me, other| other.team == me.team)
    }

    fn adjacent_where(&self, id: PieceId, keep: impl Fn(&Piece, &Piece) -> bool) -> Vec<PieceId> {
        let Some(me) = self.piece(id) else {
            return Vec::new();
        };
        self.living()
            .filter(|&(other, p)| other != id && p.pos.is_adjacent(me.pos) && keep(me, p))
            .map(|(other, _)| other)
            .collect()
    }

    // ========== Preview ==========

    /// Living pieces grouped by team, then pack.
    pub fn team_preview(&self) -> Vec<PreviewGroup> {
        let mut groups = Vec::new();
        for team in Team::all() {
            for pack in Pack::all() {
                let members: Vec<String> = self
                    .living_of(team)
                    .filter(|(_, p)| p.pack == pack)
                    .map(|(id, p)| format!("{} ({}) at {}", self.template_name(id), p.kind, p.pos))
                    .collect();
                if members.is_empty() {
                    continue;
                }
                groups.push(PreviewGroup {
                    team,
                    pack,
                    synergy_active: self.synergy_active(team, pack),
                    members,
                });
            }
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{board_with, spawn};
    use crate::tiles::TileEffect;

    fn at(label: &str) -> Pos {
        label.parse().unwrap()
    }

    #[test]
    fn test_arena_reuses_slots() {
        let catalog = Catalog::standard();
        let id = catalog.template_by_name("StarterPawn").unwrap();
        let pawn = catalog.instantiate(id, Team::Player, at("A2")).unwrap();
        let mut arena = PieceArena::new();
        let a = arena.insert(pawn);
        let b = arena.insert(pawn);
        assert_eq!(arena.len(), 2);
        assert!(arena.remove(a).is_some());
        assert!(arena.remove(a).is_none());
        assert_eq!(arena.insert(pawn), a);
        assert_ne!(a, b);
    }

    #[test]
    fn test_from_teams_requires_one_king_each() {
        let catalog = Arc::new(Catalog::standard());
        let make = |name: &str, label: &str| {
            let id = catalog.template_by_name(name).unwrap();
            catalog.instantiate(id, Team::Player, at(label)).unwrap()
        };
        let player = vec![make("StarterKing", "E1"), make("StarterPawn", "E2")];

        let err = Board::from_teams(catalog.clone(), player.clone(), vec![make("StarterPawn", "E7")], 1);
        assert_eq!(err.unwrap_err(), TacticsError::MissingKing { team: Team::Ai });

        let two = vec![make("StarterKing", "E8"), make("CyberKing1", "D8")];
        let err = Board::from_teams(catalog.clone(), player.clone(), two, 1);
        assert_eq!(
            err.unwrap_err(),
            TacticsError::MultipleKings { team: Team::Ai, count: 2 }
        );

        let clash = vec![make("StarterKing", "E2")];
        let err = Board::from_teams(catalog.clone(), player.clone(), clash, 1);
        assert!(matches!(err, Err(TacticsError::OccupiedTile { .. })));

        let ai = vec![make("StarterKing", "E8")];
        let board = Board::from_teams(catalog, player, ai, 1).unwrap();
        assert_eq!(board.living_of(Team::Ai).count(), 1);
        assert!(board.check_win_condition().is_none());
    }

    #[test]
    fn test_win_condition_outcomes() {
        let mut board = board_with(&[
            ("StarterKing", Team::Player, "E1"),
            ("StarterKing", Team::Ai, "E8"),
        ]);
        assert_eq!(board.check_win_condition(), None);

        let ai_king = board.king_of(Team::Ai).unwrap();
        board.piece_mut(ai_king).unwrap().health = 0;
        let outcome = board.check_win_condition().unwrap();
        assert_eq!(outcome.label(), "Player Wins!");

        let player_king = board.king_of(Team::Player).unwrap();
        board.piece_mut(player_king).unwrap().health = 0;
        assert_eq!(board.check_win_condition(), Some(Outcome::Draw));
        assert_eq!(Outcome::Draw.label(), "Draw!");
        assert_eq!(Outcome::Winner(Team::Ai).to_string(), "AI Wins!");
    }

    #[test]
    fn test_move_captures_through_combat() {
        let mut board = board_with(&[]);
        let rook = spawn(&mut board, "StarterRook", Team::Player, "A1");
        let pawn = spawn(&mut board, "StarterPawn", Team::Ai, "A5");
        assert!(board.is_legal(rook, at("A5")));
        board.move_piece(rook, at("A5"));

        assert_eq!(board.piece(pawn).unwrap().health, 0);
        let r = board.piece(rook).unwrap();
        assert_eq!(r.pos, at("A5"));
        assert_eq!(r.kills, 1);
        assert_eq!(r.damage_dealt, 20);
        assert_eq!(board.piece_at(at("A5")), Some(rook));
        assert!(board.turn_log().iter().any(|e| e.contains("was eliminated by Player StarterRook")));
    }

    #[test]
    fn test_move_onto_ally_refused() {
        let mut board = board_with(&[]);
        let rook = spawn(&mut board, "StarterRook", Team::Player, "A1");
        spawn(&mut board, "StarterPawn", Team::Player, "A2");
        board.move_piece(rook, at("A2"));
        assert_eq!(board.piece(rook).unwrap().pos, at("A1"));
    }

    #[test]
    fn test_pawn_promotes_on_far_rank() {
        let mut board = board_with(&[]);
        let pawn = spawn(&mut board, "SparkPawn1", Team::Player, "C7");
        board.piece_mut(pawn).unwrap().kills = 2;
        board.move_piece(pawn, at("C8"));
        let p = board.piece(pawn).unwrap();
        assert_eq!(p.kind, PieceKind::Queen);
        assert_eq!(board.template_name(pawn), "PlasmaQueen1");
        assert_eq!(p.pos, at("C8"));
        assert_eq!(p.kills, 2);
    }

    #[test]
    fn test_clone_is_isolated() {
        let mut board = board_with(&[("StarterQueen", Team::Player, "D1")]);
        let queen = board.piece_at(at("D1")).unwrap();
        let snapshot_log = board.turn_log().len();

        let mut clone = board.clone();
        clone.move_piece(queen, at("D5"));
        clone.set_tile_effect(at("A1"), TileEffect::Burning);

        assert_eq!(board.piece(queen).unwrap().pos, at("D1"));
        assert_eq!(board.turn_log().len(), snapshot_log);
        assert_eq!(board.tile_effect(at("A1")), None);
        board.move_piece(queen, at("D2"));
        assert_eq!(clone.piece(queen).unwrap().pos, at("D5"));
    }

    #[test]
    fn test_scratch_copy_does_not_log() {
        let mut board = board_with(&[("StarterQueen", Team::Player, "D1")]);
        board.log_turn("opening".to_string());
        let queen = board.piece_at(at("D1")).unwrap();
        let mut scratch = board.scratch();
        assert!(scratch.turn_log().is_empty());
        scratch.move_piece(queen, at("D5"));
        assert!(scratch.turn_log().is_empty());
        assert_eq!(scratch.piece(queen).unwrap().pos, at("D5"));
        assert_eq!(board.turn_log().len(), 1);
    }

    #[test]
    fn test_start_of_turn_applies_tile_then_passive() {
        let mut board = board_with(&[]);
        let knight = spawn(&mut board, "FireKnight1", Team::Player, "C3");
        board.apply_start_of_turn_effects(Team::Player);
        // Tile was not burning when the ambient step ran.
        assert_eq!(board.piece(knight).unwrap().health, 35);
        assert_eq!(board.tile_effect(at("C3")), Some(TileEffect::Burning));
        board.process_start_of_turn_effects(Team::Player);
        assert_eq!(board.piece(knight).unwrap().health, 30);
    }

    #[test]
    fn test_threat_detection() {
        let mut board = board_with(&[]);
        spawn(&mut board, "StarterRook", Team::Ai, "H4");
        spawn(&mut board, "StarterPawn", Team::Player, "F4");
        assert!(board.is_tile_under_threat(at("F4"), Team::Player));
        assert!(board.is_tile_under_threat(at("H1"), Team::Player));
        assert!(!board.is_tile_under_threat(at("E4"), Team::Player));
        assert!(board.is_tile_safe(at("A1"), Team::Player));
        assert_eq!(board.threats_to(at("H8"), Team::Player).len(), 1);
    }

    #[test]
    fn test_defensive_tiles() {
        let mut board = board_with(&[]);
        spawn(&mut board, "StarterKing", Team::Player, "E1");
        spawn(&mut board, "StarterPawn", Team::Player, "A2");
        spawn(&mut board, "StarterPawn", Team::Player, "C2");
        assert!(board.is_tile_defensive(at("D2"), Team::Player));
        assert!(board.is_tile_defensive(at("B1"), Team::Player));
        assert!(!board.is_tile_defensive(at("H5"), Team::Player));
        board.set_tile_effect(at("H5"), TileEffect::Shielded);
        assert!(board.is_tile_defensive(at("H5"), Team::Player));
    }

    #[test]
    fn test_adjacency_queries_skip_eliminated() {
        let mut board = board_with(&[]);
        let me = spawn(&mut board, "StarterKnight", Team::Player, "D4");
        let ally = spawn(&mut board, "StarterPawn", Team::Player, "D5");
        let foe = spawn(&mut board, "StarterPawn", Team::Ai, "E5");
        let dead = spawn(&mut board, "StarterPawn", Team::Ai, "C5");
        board.piece_mut(dead).unwrap().health = 0;
        assert_eq!(board.adjacent_allies(me), vec![ally]);
        assert_eq!(board.adjacent_enemies(me), vec![foe]);
        assert!(board.is_adjacent(me, foe));
    }

    #[test]
    fn test_team_preview_groups() {
        let board = board_with(&[
            ("StarterKing", Team::Player, "E1"),
            ("FireKnight1", Team::Player, "B1"),
            ("CyberKing1", Team::Ai, "E8"),
        ]);
        let groups = board.team_preview();
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].team, Team::Player);
        assert_eq!(groups[0].pack, Pack::Starter);
        assert_eq!(groups[1].members, vec!["FireKnight1 (Knight) at B1".to_string()]);
        assert!(groups.iter().all(|g| !g.synergy_active));
    }
}
