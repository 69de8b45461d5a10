//! Active abilities and ultimates: cost resolution and effect dispatch.
//!
//! Effect families:
//! - strike: damage the first adjacent enemy (Shock Pulse, Psychic Blast, Dark Strike)
//! - barrage: damage several enemies (Plasma Barrage, Arcane Pulse, Sky Strike)
//! - rally: boost or heal adjacent allies (Overdrive Command, Healing Mist)
//! - self-buff (Blitz Protocol, Stonewall, Fortress Mode)
//! - reposition (Fire Leap)
//! - team-wide debuff (Mind Hack, Mind Collapse)
//! - scan (Tactical Scan)

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::coord::Pos;
use crate::movement::legal_moves;
use crate::piece::{PieceId, PieceKind, MAX_ENERGY};

/// XP for spending energy on an ability.
pub const ABILITY_XP: u32 = 2;

/// Every ability and ultimate the rules know how to resolve.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Ability {
    ShockPulse,
    BlitzProtocol,
    MindHack,
    PlasmaBarrage,
    OverdriveCommand,
    FireLeap,
    HealingMist,
    Stonewall,
    PsychicBlast,
    DarkStrike,
    ArcanePulse,
    TacticalScan,
    // Ultimates
    SkyStrike,
    BlessingOfTheStars,
    MindCollapse,
    SwarmAssault,
    FortressMode,
}

impl Ability {
    const ALL: [Ability; 17] = [
        Ability::ShockPulse,
        Ability::BlitzProtocol,
        Ability::MindHack,
        Ability::PlasmaBarrage,
        Ability::OverdriveCommand,
        Ability::FireLeap,
        Ability::HealingMist,
        Ability::Stonewall,
        Ability::PsychicBlast,
        Ability::DarkStrike,
        Ability::ArcanePulse,
        Ability::TacticalScan,
        Ability::SkyStrike,
        Ability::BlessingOfTheStars,
        Ability::MindCollapse,
        Ability::SwarmAssault,
        Ability::FortressMode,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Ability::ShockPulse => "Shock Pulse",
            Ability::BlitzProtocol => "Blitz Protocol",
            Ability::MindHack => "Mind Hack",
            Ability::PlasmaBarrage => "Plasma Barrage",
            Ability::OverdriveCommand => "Overdrive Command",
            Ability::FireLeap => "Fire Leap",
            Ability::HealingMist => "Healing Mist",
            Ability::Stonewall => "Stonewall",
            Ability::PsychicBlast => "Psychic Blast",
            Ability::DarkStrike => "Dark Strike",
            Ability::ArcanePulse => "Arcane Pulse",
            Ability::TacticalScan => "Tactical Scan",
            Ability::SkyStrike => "Sky Strike",
            Ability::BlessingOfTheStars => "Blessing of the Stars",
            Ability::MindCollapse => "Mind Collapse",
            Ability::SwarmAssault => "Swarm Assault",
            Ability::FortressMode => "Fortress Mode",
        }
    }

    /// Resolve a catalog name. Text after an en dash is a description and ignored.
    pub fn from_name(name: &str) -> Option<Ability> {
        let name = name.split('\u{2013}').next().unwrap_or("").trim();
        Self::ALL
            .iter()
            .copied()
            .find(|a| a.name().eq_ignore_ascii_case(name))
    }

    pub fn all() -> impl Iterator<Item = Ability> {
        Self::ALL.into_iter()
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Board {
    // ========== Cost Resolution ==========

    /// Energy the piece would pay for its own ability right now, or `None`
    /// if it has no ability or the catalog has no cost for it.
    pub fn ability_cost(&self, id: PieceId) -> Option<u8> {
        let piece = self.piece(id)?;
        let ability = piece.ability?;
        let base = self.catalog().ability_cost(ability)?;
        let adjusted = (base as i32 + piece.energy_cost_modifier as i32).max(1);
        Some(adjusted.min(u8::MAX as i32) as u8)
    }

    /// A living piece with a priced ability and enough energy to pay for it.
    pub fn can_use_ability(&self, id: PieceId) -> bool {
        match (self.piece(id), self.ability_cost(id)) {
            (Some(piece), Some(cost)) => piece.is_alive() && piece.energy >= cost,
            _ => false,
        }
    }

    // ========== Invocation ==========

    /// Spend energy on the piece's own ability and resolve it.
    ///
    /// Returns `false` (with a turn-log entry, state otherwise unchanged) if
    /// the piece has no ability, the ability has no catalog cost, or the
    /// piece cannot afford it.
    pub fn use_ability(&mut self, id: PieceId) -> bool {
        let Some(piece) = self.piece(id).copied() else {
            return false;
        };
        if !piece.is_alive() {
            return false;
        }
        let who = self.describe(id);

        let Some(ability) = piece.ability else {
            self.log_turn(format!("{who} tried to use an undefined ability."));
            return false;
        };

        let Some(base) = self.catalog().ability_cost(ability) else {
            tracing::warn!(ability = ability.name(), "no energy cost in catalog");
            self.log_turn(format!("{who} tried to use unknown ability: {ability}."));
            return false;
        };

        let cost = (base as i32 + piece.energy_cost_modifier as i32).max(1) as u8;
        if piece.energy < cost {
            self.log_turn(format!(
                "{who} does not have enough energy to use {ability} ({} < {cost}).",
                piece.energy
            ));
            return false;
        }

        if let Some(p) = self.piece_mut(id) {
            p.energy -= cost;
        }
        self.log_turn(format!("{who} uses {ability}!"));

        let dealt = self.apply_ability_effect(id, ability);
        self.award_xp(id, ABILITY_XP);
        if dealt > 0 {
            self.charge_ultimate(id, dealt);
        }
        true
    }

    /// Resolve an ability's effect for `id` without paying for it.
    ///
    /// Returns the total damage dealt, which callers use for ultimate charge.
    pub fn apply_ability_effect(&mut self, id: PieceId, ability: Ability) -> u32 {
        let Some(caster) = self.piece(id).copied() else {
            return 0;
        };
        if !caster.is_alive() {
            return 0;
        }
        let who = self.describe(id);

        match ability {
            Ability::ShockPulse => {
                let target = self.first_adjacent_enemy(id);
                let dealt = self.strike_first_adjacent_enemy(id, 5);
                if let Some(t) = target.and_then(|t| self.piece_mut(t)) {
                    t.speed = t.speed.saturating_sub(1);
                }
                dealt
            }
            Ability::PsychicBlast => self.strike_first_adjacent_enemy(id, 8),
            Ability::DarkStrike => {
                let amount = caster.attack / 2 + 3;
                self.strike_first_adjacent_enemy(id, amount)
            }
            Ability::PlasmaBarrage => {
                let targets: Vec<PieceId> = self.adjacent_enemies(id).into_iter().take(3).collect();
                self.hit_all(id, &targets, 10)
            }
            Ability::ArcanePulse => {
                let row = caster.pos.row();
                let targets: Vec<PieceId> = self
                    .living_of(caster.team.opponent())
                    .filter(|(_, p)| p.pos.row() == row)
                    .map(|(eid, _)| eid)
                    .collect();
                self.hit_all(id, &targets, 6)
            }
            Ability::SkyStrike => {
                let targets = self.adjacent_enemies(id);
                self.hit_all(id, &targets, 15)
            }
            Ability::OverdriveCommand => {
                for ally in self.adjacent_allies(id) {
                    let name = self.describe(ally);
                    if let Some(a) = self.piece_mut(ally) {
                        a.attack += 5;
                        a.speed += 2;
                    }
                    self.log_turn(format!("{who} boosts {name} with +5 Attack and +2 Speed."));
                }
                0
            }
            Ability::HealingMist => {
                for ally in self.adjacent_allies(id) {
                    self.heal_piece(id, ally, 10);
                }
                0
            }
            Ability::BlessingOfTheStars => {
                let allies: Vec<PieceId> = self.living_of(caster.team).map(|(aid, _)| aid).collect();
                for ally in allies {
                    self.heal_piece(id, ally, 10);
                }
                0
            }
            Ability::SwarmAssault => {
                let pawns: Vec<PieceId> = self
                    .living_of(caster.team)
                    .filter(|(_, p)| p.kind == PieceKind::Pawn)
                    .map(|(pid, _)| pid)
                    .collect();
                for pawn in pawns {
                    if let Some(p) = self.piece_mut(pawn) {
                        p.attack += 3;
                    }
                }
                self.log_turn(format!("{who} rallies every allied Pawn with +3 Attack!"));
                0
            }
            Ability::BlitzProtocol => {
                self.buff_self(id, |p| p.attack += 5, "+5 Attack");
                0
            }
            Ability::Stonewall => {
                self.buff_self(id, |p| p.defense += 3, "+3 Defense");
                0
            }
            Ability::FortressMode => {
                self.buff_self(id, |p| p.defense += 10, "+10 Defense");
                0
            }
            Ability::FireLeap => self.fire_leap(id),
            Ability::MindHack => {
                self.debuff_enemy_team(id, 1, 0);
                0
            }
            Ability::MindCollapse => {
                self.debuff_enemy_team(id, 1, 2);
                0
            }
            Ability::TacticalScan => {
                let threats = self.threats_to(caster.pos, caster.team);
                let names: Vec<String> = threats.iter().map(|&t| self.describe(t)).collect();
                if names.is_empty() {
                    self.log_turn(format!("{who} scans the field: no enemy threatens {}.", caster.pos));
                } else {
                    self.log_turn(format!(
                        "{who} scans the field: {} threatened by {}.",
                        caster.pos,
                        names.join(", ")
                    ));
                }
                0
            }
        }
    }

    // ========== Effect Helpers ==========

    /// First living adjacent enemy in arena order.
    fn first_adjacent_enemy(&self, id: PieceId) -> Option<PieceId> {
        self.adjacent_enemies(id).into_iter().next()
    }

    fn strike_first_adjacent_enemy(&mut self, id: PieceId, amount: u32) -> u32 {
        match self.first_adjacent_enemy(id) {
            Some(target) => {
                self.damage_piece(id, target, amount);
                amount
            }
            None => {
                let who = self.describe(id);
                self.log_turn(format!("{who} finds no adjacent enemy to strike."));
                0
            }
        }
    }

    fn hit_all(&mut self, id: PieceId, targets: &[PieceId], amount: u32) -> u32 {
        if targets.is_empty() {
            let who = self.describe(id);
            self.log_turn(format!("{who} hits nothing."));
            return 0;
        }
        for &target in targets {
            self.damage_piece(id, target, amount);
        }
        amount * targets.len() as u32
    }

    fn buff_self(&mut self, id: PieceId, apply: impl FnOnce(&mut crate::piece::Piece), what: &str) {
        if let Some(p) = self.piece_mut(id) {
            apply(p);
        }
        let who = self.describe(id);
        self.log_turn(format!("{who} gains {what}!"));
    }

    fn debuff_enemy_team(&mut self, id: PieceId, cost_penalty: i8, energy_drain: u8) {
        let Some(team) = self.piece(id).map(|p| p.team) else {
            return;
        };
        let enemies: Vec<PieceId> = self.living_of(team.opponent()).map(|(eid, _)| eid).collect();
        for enemy in &enemies {
            if let Some(e) = self.piece_mut(*enemy) {
                e.energy_cost_modifier = e.energy_cost_modifier.saturating_add(cost_penalty);
                e.energy = e.energy.saturating_sub(energy_drain);
            }
        }
        let who = self.describe(id);
        self.log_turn(format!(
            "{who} disrupts {} enemies: ability costs +{cost_penalty}, energy -{energy_drain}.",
            enemies.len()
        ));
    }

    /// Leap to the empty legal destination touching the most enemies (first
    /// such tile in ascending order), then hit every adjacent enemy for 5.
    fn fire_leap(&mut self, id: PieceId) -> u32 {
        let Some(caster) = self.piece(id).copied() else {
            return 0;
        };
        let occupancy = self.occupancy();
        let enemy_positions: Vec<Pos> = self
            .living_of(caster.team.opponent())
            .map(|(_, p)| p.pos)
            .collect();

        let mut best: Option<(Pos, usize)> = None;
        for to in legal_moves(&caster, &occupancy).iter() {
            if occupancy.team_at(to).is_some() {
                continue;
            }
            let touching = enemy_positions.iter().filter(|e| e.is_adjacent(to)).count();
            if best.map_or(true, |(_, n)| touching > n) {
                best = Some((to, touching));
            }
        }

        if let Some((to, _)) = best {
            self.move_piece(id, to);
        }
        if !self.piece(id).is_some_and(|p| p.is_alive()) {
            return 0;
        }
        let targets = self.adjacent_enemies(id);
        self.hit_all(id, &targets, 5)
    }

    /// Refill energy, capped.
    pub fn restore_energy(&mut self, id: PieceId, amount: u8) {
        if let Some(p) = self.piece_mut(id) {
            p.energy = p.energy.saturating_add(amount).min(MAX_ENERGY);
        }
    }
}
