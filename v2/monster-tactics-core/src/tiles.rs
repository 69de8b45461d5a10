//! Tile effects: a sparse position -> effect map with ambient and
//! entry-triggered semantics.
//!
//! Ambient effects apply each time a piece's turn starts on the tile (and on
//! the optional whole-board sweep). Entry effects apply once, when a piece
//! moves onto the tile. Effects persist until cleared.

use std::collections::BTreeMap;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::coord::Pos;
use crate::piece::PieceId;

/// Sparse tile-effect map. Absent entries mean no effect.
pub type TileMap = BTreeMap<Pos, TileEffect>;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum TileEffect {
    // Ambient
    Burning,
    Healing,
    Poisoned,
    Energized,
    Shielded,
    Cursed,
    Blessed,
    // Entry-triggered
    Spiked,
    Warp,
    Frozen,
}

impl TileEffect {
    pub fn name(self) -> &'static str {
        match self {
            TileEffect::Burning => "Burning",
            TileEffect::Healing => "Healing",
            TileEffect::Poisoned => "Poisoned",
            TileEffect::Energized => "Energized",
            TileEffect::Shielded => "Shielded",
            TileEffect::Cursed => "Cursed",
            TileEffect::Blessed => "Blessed",
            TileEffect::Spiked => "Spiked",
            TileEffect::Warp => "Warp",
            TileEffect::Frozen => "Frozen",
        }
    }

    /// Applies at start of turn while standing on the tile.
    #[inline]
    pub fn is_ambient(self) -> bool {
        !self.is_entry()
    }

    /// Applies once when a piece moves onto the tile.
    #[inline]
    pub fn is_entry(self) -> bool {
        matches!(self, TileEffect::Spiked | TileEffect::Warp | TileEffect::Frozen)
    }

    /// Tiles a defensive piece likes to stand on.
    #[inline]
    pub fn is_defensive(self) -> bool {
        matches!(self, TileEffect::Shielded | TileEffect::Healing | TileEffect::Blessed)
    }
}

impl fmt::Display for TileEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Board {
    // ========== Map Mutation ==========

    /// Tag a tile with an effect, replacing any previous one.
    pub fn set_tile_effect(&mut self, pos: Pos, effect: TileEffect) {
        self.tiles_mut().insert(pos, effect);
        self.log_turn(format!("Tile {pos} is now {effect}!"));
    }

    /// Remove a tile's effect. Returns the removed effect, if there was one.
    pub fn clear_tile_effect(&mut self, pos: Pos) -> Option<TileEffect> {
        let removed = self.tiles_mut().remove(&pos);
        if removed.is_some() {
            self.log_turn(format!("Tile {pos} is no longer affected."));
        }
        removed
    }

    /// Effect on a tile, if any.
    #[inline]
    pub fn tile_effect(&self, pos: Pos) -> Option<TileEffect> {
        self.tile_effects().get(&pos).copied()
    }

    // ========== Application ==========

    /// Apply the ambient effect under one living piece, if any.
    pub fn apply_ambient_effect(&mut self, id: PieceId) {
        let Some(piece) = self.piece(id).copied() else {
            return;
        };
        if !piece.is_alive() {
            return;
        }
        let Some(effect) = self.tile_effect(piece.pos).filter(|e| e.is_ambient()) else {
            return;
        };
        let who = self.describe(id);
        let at = piece.pos;

        match effect {
            TileEffect::Burning => self.tile_damage(id, 5, effect),
            TileEffect::Poisoned => self.tile_damage(id, 3, effect),
            TileEffect::Healing => {
                if let Some(p) = self.piece_mut(id) {
                    p.health = (p.health + 3).min(p.max_health.max(p.health));
                }
                self.log_turn(format!("{who} healed 3 HP from Healing Tile at {at}!"));
            }
            TileEffect::Energized => {
                self.restore_energy(id, 1);
                self.log_turn(format!("{who} restored 1 energy from Energized Tile at {at}!"));
            }
            TileEffect::Shielded => {
                if let Some(p) = self.piece_mut(id) {
                    p.defense += 2;
                }
                self.log_turn(format!("{who} gained +2 defense from Shielded Tile at {at}!"));
            }
            TileEffect::Cursed => {
                if let Some(p) = self.piece_mut(id) {
                    p.energy_cost_modifier = 1;
                }
                self.log_turn(format!("{who} suffers +1 energy cost from Cursed Tile at {at}!"));
            }
            TileEffect::Blessed => {
                if let Some(p) = self.piece_mut(id) {
                    p.energy_cost_modifier = -1;
                }
                self.log_turn(format!("{who} gains -1 energy cost from Blessed Tile at {at}!"));
            }
            TileEffect::Spiked | TileEffect::Warp | TileEffect::Frozen => {}
        }
    }

    /// Apply the entry effect of `pos` to a piece that just moved there.
    ///
    /// Warp relocates to a uniformly random empty tile drawn from the
    /// board's own RNG; the destination's entry effect is not chained.
    pub fn apply_entry_effect(&mut self, id: PieceId, pos: Pos) {
        let Some(effect) = self.tile_effect(pos).filter(|e| e.is_entry()) else {
            return;
        };
        if !self.piece(id).is_some_and(|p| p.is_alive()) {
            return;
        }
        let who = self.describe(id);

        match effect {
            TileEffect::Spiked => self.tile_damage(id, 5, effect),
            TileEffect::Frozen => {
                if let Some(p) = self.piece_mut(id) {
                    p.speed = p.speed.saturating_sub(1).max(1);
                }
                self.log_turn(format!("{who} has reduced speed due to Frozen Tile at {pos}!"));
            }
            TileEffect::Warp => {
                let occupancy = self.occupancy();
                let empty: Vec<Pos> = Pos::all()
                    .filter(|&p| p != pos && occupancy.team_at(p).is_none())
                    .collect();
                if empty.is_empty() {
                    self.log_turn(format!("{who} resists the Warp at {pos}: no empty tile."));
                    return;
                }
                let to = empty[self.rng_mut().random_range(0..empty.len())];
                if let Some(p) = self.piece_mut(id) {
                    p.pos = to;
                }
                self.log_turn(format!("{who} was warped from {pos} to {to}!"));
            }
            _ => {}
        }
    }

    /// Sweep every living piece on the board through its tile's ambient
    /// effect, regardless of team. Distinct from the per-team start-of-turn
    /// pass; used as an end-of-round phase.
    pub fn apply_effects_to_all_pieces(&mut self) {
        let ids: Vec<PieceId> = self.living().map(|(id, _)| id).collect();
        for id in ids {
            self.apply_ambient_effect(id);
        }
    }
}
