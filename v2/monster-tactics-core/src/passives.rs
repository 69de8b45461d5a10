//! Passive traits that fire automatically at the start of the owner's turn.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::piece::{PieceId, PieceKind};
use crate::tiles::TileEffect;

/// Other living same-pack allies needed for Pack Instinct.
pub const PACK_INSTINCT_ALLIES: usize = 3;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Passive {
    BlazingStride,
    WaterWard,
    RootedResilience,
    CommandingPresence,
    PackInstinct,
    EnergySurge,
    SystemReboot,
    ImmovableObject,
    AdaptiveShielding,
    ShadowStep,
}

impl Passive {
    const ALL: [Passive; 10] = [
        Passive::BlazingStride,
        Passive::WaterWard,
        Passive::RootedResilience,
        Passive::CommandingPresence,
        Passive::PackInstinct,
        Passive::EnergySurge,
        Passive::SystemReboot,
        Passive::ImmovableObject,
        Passive::AdaptiveShielding,
        Passive::ShadowStep,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Passive::BlazingStride => "Blazing Stride",
            Passive::WaterWard => "Water Ward",
            Passive::RootedResilience => "Rooted Resilience",
            Passive::CommandingPresence => "Commanding Presence",
            Passive::PackInstinct => "Pack Instinct",
            Passive::EnergySurge => "Energy Surge",
            Passive::SystemReboot => "System Reboot",
            Passive::ImmovableObject => "Immovable Object",
            Passive::AdaptiveShielding => "Adaptive Shielding",
            Passive::ShadowStep => "Shadow Step",
        }
    }

    pub fn from_name(name: &str) -> Option<Passive> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Passive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Board {
    /// Fire the start-of-turn passive of one living piece.
    ///
    /// System Reboot fires on kills instead (see `damage_piece`), and
    /// Shadow Step has no start-of-turn effect.
    pub fn trigger_passive(&mut self, id: PieceId) {
        let Some(piece) = self.piece(id).copied() else {
            return;
        };
        if !piece.is_alive() {
            return;
        }
        let Some(passive) = piece.passive else {
            return;
        };
        let who = self.describe(id);

        match passive {
            Passive::WaterWard => {
                for ally in self.adjacent_allies(id) {
                    self.heal_piece(id, ally, 2);
                }
            }
            Passive::RootedResilience => {
                let rooted = self
                    .adjacent_allies(id)
                    .into_iter()
                    .any(|a| self.piece(a).is_some_and(|p| p.kind == PieceKind::Pawn));
                if rooted {
                    if let Some(p) = self.piece_mut(id) {
                        p.defense += 2;
                    }
                    self.log_turn(format!("{who} gains +2 Defense from {passive}!"));
                }
            }
            Passive::BlazingStride => {
                self.set_tile_effect(piece.pos, TileEffect::Burning);
            }
            Passive::CommandingPresence => {
                for ally in self.adjacent_allies(id) {
                    let name = self.describe(ally);
                    if let Some(a) = self.piece_mut(ally) {
                        a.attack += 5;
                    }
                    self.log_turn(format!("{who} boosts {name}'s Attack by 5 with {passive}!"));
                }
            }
            Passive::PackInstinct => {
                let pack_mates = self
                    .living_of(piece.team)
                    .filter(|&(other, p)| other != id && p.pack == piece.pack)
                    .count();
                if pack_mates >= PACK_INSTINCT_ALLIES {
                    if let Some(p) = self.piece_mut(id) {
                        p.attack += 2;
                    }
                    self.log_turn(format!("{who} gains +2 Attack from {passive}!"));
                }
            }
            Passive::EnergySurge => {
                self.restore_energy(id, 1);
                self.log_turn(format!("{who} restores 1 energy from {passive}."));
            }
            Passive::ImmovableObject => {
                if let Some(p) = self.piece_mut(id) {
                    p.defense += 1;
                }
                self.log_turn(format!("{who} digs in: +1 Defense from {passive}."));
            }
            Passive::AdaptiveShielding => {
                if self.is_tile_under_threat(piece.pos, piece.team) {
                    if let Some(p) = self.piece_mut(id) {
                        p.defense += 2;
                    }
                    self.log_turn(format!("{who} gains +2 Defense from {passive}!"));
                }
            }
            Passive::SystemReboot | Passive::ShadowStep => {}
        }
    }
}
