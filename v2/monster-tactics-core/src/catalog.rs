//! Static, read-only game data: piece templates, ability costs and
//! descriptions, pack bonuses, AI personalities, evolution chains.
//!
//! A `Catalog` is built once and shared behind `Arc`. Templates are value
//! records; every in-play `Piece` is an independent copy made by
//! [`Catalog::instantiate`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::abilities::Ability;
use crate::coord::Pos;
use crate::error::{TacticsError, TacticsResult};
use crate::passives::Passive;
use crate::piece::{Pack, Piece, PieceKind, Team, MAX_ENERGY};

/// Index of a template in its catalog.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct TemplateId(pub u16);

/// How an AI side prefers to play. Picked from the pack of its King.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum Personality {
    #[default]
    Balanced,
    Aggressive,
    Defensive,
    Sneaky,
    SynergyHunter,
}

impl Personality {
    pub fn name(self) -> &'static str {
        match self {
            Personality::Balanced => "Balanced",
            Personality::Aggressive => "Aggressive",
            Personality::Defensive => "Defensive",
            Personality::Sneaky => "Sneaky",
            Personality::SynergyHunter => "SynergyHunter",
        }
    }
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable base record a piece is instantiated from.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PieceTemplate {
    pub name: String,
    pub kind: PieceKind,
    pub pack: Pack,
    pub health: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
    pub ability: Option<Ability>,
    pub passive: Option<Passive>,
    pub ultimate: Option<Ability>,
}

/// Raw template row, capabilities still as display strings.
struct TemplateRow {
    name: &'static str,
    kind: PieceKind,
    pack: Pack,
    stats: [u32; 4],
    ability: &'static str,
    passive: &'static str,
    ultimate: &'static str,
}

const fn row(
    name: &'static str,
    kind: PieceKind,
    pack: Pack,
    stats: [u32; 4],
    ability: &'static str,
    passive: &'static str,
    ultimate: &'static str,
) -> TemplateRow {
    TemplateRow {
        name,
        kind,
        pack,
        stats,
        ability,
        passive,
        ultimate,
    }
}

use PieceKind::{Bishop, King, Knight, Pawn, Queen, Rook};

// stats = [health, attack, defense, speed]
const STANDARD_TEMPLATES: &[TemplateRow] = &[
    // Starter Pack
    row("StarterPawn", Pawn, Pack::Starter, [20, 5, 2, 3], "", "", ""),
    row("StarterKnight", Knight, Pack::Starter, [30, 8, 3, 5], "Shock Pulse", "", ""),
    row("StarterBishop", Bishop, Pack::Starter, [28, 7, 3, 4], "Arcane Pulse", "", ""),
    row("StarterRook", Rook, Pack::Starter, [40, 8, 5, 3], "Stonewall", "", ""),
    row("StarterQueen", Queen, Pack::Starter, [45, 12, 5, 4], "Psychic Blast", "", ""),
    row("StarterKing", King, Pack::Starter, [50, 6, 6, 2], "Tactical Scan", "", ""),
    // Fire Pack
    row("FirePawn1", Pawn, Pack::Fire, [22, 7, 2, 4], "", "Pack Instinct", ""),
    row("FireKnight1", Knight, Pack::Fire, [35, 9, 4, 6], "Fire Leap", "Blazing Stride", "Sky Strike"),
    row("InfernoKing1", King, Pack::Fire, [55, 10, 6, 2], "Tactical Scan", "Commanding Presence", "Sky Strike"),
    // Water Pack
    row("TidePawn1", Pawn, Pack::Water, [24, 5, 3, 4], "Healing Mist", "Water Ward", ""),
    row("AquaBishop1", Bishop, Pack::Water, [30, 7, 3, 5], "Healing Mist", "Water Ward", "Blessing of the Stars"),
    // Earth Pack
    row("EarthRook1", Rook, Pack::Earth, [40, 8, 5, 4], "Stonewall", "Immovable Object", "Fortress Mode"),
    row("StoneRook1", Rook, Pack::Earth, [42, 7, 6, 3], "Stonewall", "Rooted Resilience", ""),
    row("IronRook1", Rook, Pack::Earth, [48, 9, 8, 3], "Stonewall", "Rooted Resilience", "Fortress Mode"),
    row("ObsidianRook1", Rook, Pack::Earth, [55, 11, 10, 3], "Stonewall", "Immovable Object", "Fortress Mode"),
    // Shadow Pack
    row("ShadowPawn1", Pawn, Pack::Shadow, [25, 6, 2, 5], "Dark Strike", "Shadow Step", "Swarm Assault"),
    row("ShadowBishop1", Bishop, Pack::Shadow, [28, 9, 2, 6], "Arcane Pulse", "Shadow Step", "Mind Collapse"),
    row("ShadowKing1", King, Pack::Shadow, [50, 8, 5, 3], "Psychic Blast", "Adaptive Shielding", "Mind Collapse"),
    // Cyber Pack
    row("SparkPawn1", Pawn, Pack::Cyber, [22, 6, 2, 4], "Shock Pulse", "Energy Surge", ""),
    row("ThunderPawn1", Pawn, Pack::Cyber, [28, 8, 3, 5], "Shock Pulse", "Energy Surge", "Swarm Assault"),
    row("StormPawn1", Pawn, Pack::Cyber, [34, 11, 4, 6], "Plasma Barrage", "Energy Surge", "Swarm Assault"),
    row("OverclockKnight1", Knight, Pack::Cyber, [40, 17, 4, 5], "Blitz Protocol", "System Reboot", ""),
    row("PlasmaQueen1", Queen, Pack::Cyber, [45, 21, 5, 4], "Plasma Barrage", "Energy Surge", ""),
    row("CyberKing1", King, Pack::Cyber, [52, 7, 7, 2], "Mind Hack", "Adaptive Shielding", "Fortress Mode"),
];

const ABILITY_COSTS: &[(Ability, u8)] = &[
    (Ability::ShockPulse, 2),
    (Ability::BlitzProtocol, 4),
    (Ability::MindHack, 5),
    (Ability::PlasmaBarrage, 6),
    (Ability::OverdriveCommand, 5),
    (Ability::FireLeap, 3),
    (Ability::HealingMist, 3),
    (Ability::Stonewall, 2),
    (Ability::PsychicBlast, 5),
    (Ability::DarkStrike, 2),
    (Ability::ArcanePulse, 4),
    (Ability::TacticalScan, 1),
];

const DESCRIPTIONS: &[(&str, &str)] = &[
    ("Shock Pulse", "Deals 5 damage and reduces target's Speed by 1."),
    ("Blitz Protocol", "Gain +5 Attack."),
    ("Mind Hack", "Every enemy pays +1 energy for abilities."),
    ("Plasma Barrage", "Deal 10 damage to up to 3 adjacent enemies."),
    ("Overdrive Command", "Adjacent allies gain +2 Speed and +5 Attack."),
    ("Fire Leap", "Leap to a target location and deal 5 damage to adjacent enemies."),
    ("Healing Mist", "Heals all allies within 1 tile for 10 HP."),
    ("Stonewall", "Gain +3 Defense."),
    ("Psychic Blast", "Deals 8 damage to an adjacent enemy."),
    ("Dark Strike", "A shadow-infused strike for half Attack plus 3."),
    ("Arcane Pulse", "Fires a wave that deals 6 damage to all enemies in a line."),
    ("Tactical Scan", "Reports every enemy threatening this tile."),
    ("Sky Strike", "Deals 15 damage to every adjacent enemy."),
    ("Blessing of the Stars", "Heals every ally for 10 HP."),
    ("Mind Collapse", "Every enemy pays +1 energy and loses 2 energy."),
    ("Swarm Assault", "Every allied Pawn gains +3 Attack."),
    ("Fortress Mode", "Gain +10 Defense."),
    ("Shadow Step", "Allows the piece to reposition once per turn without using energy."),
    ("Energy Surge", "Gains +1 Energy at the start of each turn."),
    ("System Reboot", "Heals 5 HP after every kill."),
    ("Blazing Stride", "Sets its own tile burning."),
    ("Water Ward", "Heals adjacent allies for 2 HP each turn."),
    ("Rooted Resilience", "+2 Defense while next to an allied Pawn."),
    ("Commanding Presence", "Adjacent allies gain +5 Attack each turn."),
    ("Pack Instinct", "+2 Attack while 3 or more pack mates live."),
    ("Immovable Object", "+1 Defense each turn."),
    ("Adaptive Shielding", "+2 Defense while its tile is threatened."),
];

const PACK_BONUSES: &[(Pack, &str)] = &[
    (Pack::Fire, "All Fire Pack members gain +5% Attack when 3 or more are on the team."),
    (Pack::Cyber, "All Cyber Pack members gain +2 Defense when 3 or more are on the team."),
    (Pack::Shadow, "All Shadow Pack members gain +1 Speed when 3 or more are on the team."),
    (Pack::Water, "All Water Pack members gain +5 Health when 3 or more are on the team."),
    (Pack::Earth, "All Earth Pack members gain +1 Defense when 3 or more are on the team."),
];

const PACK_PERSONALITIES: &[(Pack, Personality)] = &[
    (Pack::Starter, Personality::Balanced),
    (Pack::Fire, Personality::Aggressive),
    (Pack::Cyber, Personality::Defensive),
    (Pack::Shadow, Personality::Sneaky),
    (Pack::Water, Personality::SynergyHunter),
    (Pack::Earth, Personality::Defensive),
];

const EVOLUTIONS: &[(&str, &[(u8, &str)])] = &[
    ("SparkPawn1", &[(5, "ThunderPawn1"), (10, "StormPawn1")]),
    ("StoneRook1", &[(5, "IronRook1"), (10, "ObsidianRook1")]),
];

/// Template a Pawn becomes on the far rank when its pack has no Queen.
const DEFAULT_PROMOTION: &str = "StarterQueen";

/// Read-only game data shared by every board of a match.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    templates: Vec<PieceTemplate>,
    by_name: BTreeMap<String, TemplateId>,
    ability_costs: BTreeMap<Ability, u8>,
    descriptions: BTreeMap<String, String>,
    pack_bonuses: BTreeMap<Pack, String>,
    personalities: BTreeMap<Pack, Personality>,
    evolutions: BTreeMap<TemplateId, Vec<(u8, TemplateId)>>,
    /// Evolved stage to the first template of its chain.
    chain_roots: BTreeMap<TemplateId, TemplateId>,
}

impl Catalog {
    /// The built-in data set.
    pub fn standard() -> Catalog {
        let mut catalog = Catalog::default();
        for r in STANDARD_TEMPLATES {
            catalog.push_template(r);
        }
        catalog.ability_costs = ABILITY_COSTS.iter().copied().collect();
        catalog.descriptions = DESCRIPTIONS
            .iter()
            .map(|&(k, v)| (k.to_string(), v.to_string()))
            .collect();
        catalog.pack_bonuses = PACK_BONUSES
            .iter()
            .map(|&(p, d)| (p, d.to_string()))
            .collect();
        catalog.personalities = PACK_PERSONALITIES.iter().copied().collect();
        for &(from, stages) in EVOLUTIONS {
            for &(level, to) in stages {
                catalog.add_evolution(from, level, to);
            }
        }
        catalog
    }

    fn push_template(&mut self, r: &TemplateRow) {
        let [health, attack, defense, speed] = r.stats;
        let template = PieceTemplate {
            name: r.name.to_string(),
            kind: r.kind,
            pack: r.pack,
            health,
            attack,
            defense,
            speed,
            ability: parse_capability(r.name, r.ability, Ability::from_name),
            passive: parse_capability(r.name, r.passive, Passive::from_name),
            ultimate: parse_capability(r.name, r.ultimate, Ability::from_name),
        };
        let id = TemplateId(self.templates.len() as u16);
        self.by_name.insert(template.name.clone(), id);
        self.templates.push(template);
    }

    /// Register an evolution stage. `from` may be the chain's first template
    /// or any stage already in it. Unknown names are skipped with a warning.
    pub fn add_evolution(&mut self, from: &str, level: u8, to: &str) {
        match (self.template_by_name(from), self.template_by_name(to)) {
            (Ok(from), Ok(to)) => {
                let root = self.chain_root(from);
                let stages = self.evolutions.entry(root).or_default();
                stages.push((level, to));
                stages.sort_by_key(|&(lvl, _)| lvl);
                self.chain_roots.insert(to, root);
            }
            _ => tracing::warn!(from, to, level, "evolution chain references unknown template"),
        }
    }

    // ========== Templates ==========

    pub fn template(&self, id: TemplateId) -> TacticsResult<&PieceTemplate> {
        self.templates
            .get(id.0 as usize)
            .ok_or_else(|| TacticsError::UnknownTemplate {
                id: format!("{}", id.0),
            })
    }

    pub fn template_by_name(&self, name: &str) -> TacticsResult<TemplateId> {
        self.by_name
            .get(name.trim())
            .copied()
            .ok_or_else(|| TacticsError::UnknownTemplate {
                id: name.to_string(),
            })
    }

    /// Template name, or `"?"` for an id from another catalog.
    pub fn name_of(&self, id: TemplateId) -> &str {
        self.template(id).map(|t| t.name.as_str()).unwrap_or("?")
    }

    /// All templates in catalog order.
    pub fn templates(&self) -> impl Iterator<Item = (TemplateId, &PieceTemplate)> {
        self.templates
            .iter()
            .enumerate()
            .map(|(i, t)| (TemplateId(i as u16), t))
    }

    /// Templates of one kind, optionally restricted to one pack.
    pub fn templates_of(&self, kind: PieceKind, pack: Option<Pack>) -> Vec<TemplateId> {
        self.templates()
            .filter(|(_, t)| t.kind == kind && pack.map_or(true, |p| t.pack == p))
            .map(|(id, _)| id)
            .collect()
    }

    /// Build a fresh piece: full energy, level 1, no history.
    pub fn instantiate(&self, id: TemplateId, team: Team, pos: Pos) -> TacticsResult<Piece> {
        let t = self.template(id)?;
        Ok(Piece {
            template: id,
            kind: t.kind,
            team,
            pack: t.pack,
            pos,
            health: t.health,
            max_health: t.health,
            attack: t.attack,
            defense: t.defense,
            speed: t.speed,
            energy: MAX_ENERGY,
            energy_cost_modifier: 0,
            level: 1,
            experience: 0,
            ultimate_unlocked: false,
            ultimate_charge: 0,
            ability: t.ability,
            passive: t.passive,
            ultimate: t.ultimate,
            damage_dealt: 0,
            kills: 0,
        })
    }

    // ========== Abilities ==========

    pub fn ability_cost(&self, ability: Ability) -> Option<u8> {
        self.ability_costs.get(&ability).copied()
    }

    /// Display text for an ability or passive name.
    pub fn description(&self, name: &str) -> Option<&str> {
        self.descriptions.get(name).map(String::as_str)
    }

    // ========== Packs ==========

    pub fn pack_bonus(&self, pack: Pack) -> Option<&str> {
        self.pack_bonuses.get(&pack).map(String::as_str)
    }

    pub fn personality_for(&self, pack: Pack) -> Personality {
        self.personalities.get(&pack).copied().unwrap_or_default()
    }

    // ========== Progression ==========

    /// First template of the chain `id` belongs to, or `id` itself.
    pub fn chain_root(&self, id: TemplateId) -> TemplateId {
        self.chain_roots.get(&id).copied().unwrap_or(id)
    }

    /// Template `id` evolves into on reaching `level`, if any. Evolved
    /// stages look up the chain they came from.
    pub fn evolution_at(&self, id: TemplateId, level: u8) -> Option<TemplateId> {
        self.evolution_chain(id)
            .iter()
            .find(|&&(lvl, to)| lvl == level && to != id)
            .map(|&(_, to)| to)
    }

    /// Every stage of the chain `id` belongs to, by level.
    pub fn evolution_chain(&self, id: TemplateId) -> &[(u8, TemplateId)] {
        self.evolutions
            .get(&self.chain_root(id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Promotion target for a Pawn of `pack`: that pack's first Queen,
    /// otherwise the Starter Queen.
    pub fn promotion_template(&self, pack: Pack) -> Option<TemplateId> {
        self.templates_of(PieceKind::Queen, Some(pack))
            .first()
            .copied()
            .or_else(|| self.template_by_name(DEFAULT_PROMOTION).ok())
    }
}

fn parse_capability<T>(owner: &str, raw: &str, parse: fn(&str) -> Option<T>) -> Option<T> {
    if raw.trim().is_empty() {
        return None;
    }
    let parsed = parse(raw);
    if parsed.is_none() {
        tracing::warn!(template = owner, name = raw, "unknown capability in catalog");
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_a_template() {
        let catalog = Catalog::standard();
        for kind in PieceKind::all() {
            assert!(!catalog.templates_of(kind, None).is_empty(), "{kind}");
            assert_eq!(catalog.templates_of(kind, Some(Pack::Starter)).len(), 1);
        }
    }

    #[test]
    fn test_capabilities_parsed() {
        let catalog = Catalog::standard();
        let id = catalog.template_by_name("FireKnight1").unwrap();
        let t = catalog.template(id).unwrap();
        assert_eq!(t.kind, PieceKind::Knight);
        assert_eq!(t.pack, Pack::Fire);
        assert_eq!(t.ability, Some(Ability::FireLeap));
        assert_eq!(t.passive, Some(Passive::BlazingStride));
        assert_eq!(t.ultimate, Some(Ability::SkyStrike));
        assert!(catalog.templates().all(|(_, t)| t.ability.is_some() || t.kind == PieceKind::Pawn));
    }

    #[test]
    fn test_unknown_template() {
        let catalog = Catalog::standard();
        assert!(matches!(
            catalog.template_by_name("DragonKing9"),
            Err(TacticsError::UnknownTemplate { .. })
        ));
        assert!(catalog.template(TemplateId(999)).is_err());
    }

    #[test]
    fn test_instantiate_is_fresh_copy() {
        let catalog = Catalog::standard();
        let id = catalog.template_by_name("PlasmaQueen1").unwrap();
        let mut piece = catalog.instantiate(id, Team::Ai, "D8".parse().unwrap()).unwrap();
        assert_eq!(piece.energy, MAX_ENERGY);
        assert_eq!(piece.level, 1);
        assert_eq!(piece.max_health, 45);
        piece.health = 1;
        assert_eq!(catalog.template(id).unwrap().health, 45);
    }

    #[test]
    fn test_costs_and_ultimates() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.ability_cost(Ability::PlasmaBarrage), Some(6));
        assert_eq!(catalog.ability_cost(Ability::SkyStrike), None);
        assert!(catalog.description("System Reboot").is_some());
    }

    #[test]
    fn test_evolution_chain() {
        let catalog = Catalog::standard();
        let spark = catalog.template_by_name("SparkPawn1").unwrap();
        let thunder = catalog.template_by_name("ThunderPawn1").unwrap();
        assert_eq!(catalog.evolution_at(spark, 5), Some(thunder));
        assert_eq!(catalog.evolution_at(spark, 6), None);
        assert_eq!(catalog.evolution_chain(spark).len(), 2);
    }

    #[test]
    fn test_evolved_stage_follows_its_chain() {
        let catalog = Catalog::standard();
        let spark = catalog.template_by_name("SparkPawn1").unwrap();
        let thunder = catalog.template_by_name("ThunderPawn1").unwrap();
        let storm = catalog.template_by_name("StormPawn1").unwrap();
        assert_eq!(catalog.chain_root(thunder), spark);
        assert_eq!(catalog.chain_root(storm), spark);
        assert_eq!(catalog.evolution_at(thunder, 10), Some(storm));
        assert_eq!(catalog.evolution_at(thunder, 5), None);
        assert_eq!(catalog.evolution_chain(storm).len(), 2);
    }

    #[test]
    fn test_unknown_evolution_is_skipped() {
        let mut catalog = Catalog::standard();
        let spark = catalog.template_by_name("SparkPawn1").unwrap();
        catalog.add_evolution("SparkPawn1", 7, "Nonexistent");
        assert_eq!(catalog.evolution_at(spark, 7), None);
    }

    #[test]
    fn test_pack_data() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.personality_for(Pack::Fire), Personality::Aggressive);
        assert_eq!(catalog.personality_for(Pack::Starter), Personality::Balanced);
        assert!(catalog.pack_bonus(Pack::Starter).is_none());
        let queen = catalog.promotion_template(Pack::Cyber).unwrap();
        assert_eq!(catalog.name_of(queen), "PlasmaQueen1");
        let fallback = catalog.promotion_template(Pack::Shadow).unwrap();
        assert_eq!(catalog.name_of(fallback), "StarterQueen");
    }
}
