//! Piece identity, stats and the enums that classify pieces.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::abilities::Ability;
use crate::catalog::TemplateId;
use crate::coord::Pos;
use crate::passives::Passive;

/// Maximum energy a piece can hold.
pub const MAX_ENERGY: u8 = 10;

/// Maximum level a piece can reach.
pub const MAX_LEVEL: u8 = 10;

/// Ultimate charge at which the ultimate fires.
pub const ULTIMATE_CHARGE_FULL: u8 = 100;

/// Side identifier.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Team {
    Player,
    #[serde(rename = "AI")]
    Ai,
}

impl Team {
    /// Get the opposing team.
    #[inline]
    pub fn opponent(self) -> Team {
        match self {
            Team::Player => Team::Ai,
            Team::Ai => Team::Player,
        }
    }

    /// Row delta of a forward pawn step. Player advances up the ranks.
    #[inline]
    pub fn forward(self) -> i8 {
        match self {
            Team::Player => 1,
            Team::Ai => -1,
        }
    }

    /// Row a pawn promotes on.
    #[inline]
    pub fn promotion_row(self) -> u8 {
        match self {
            Team::Player => 7,
            Team::Ai => 0,
        }
    }

    /// Display label used in the turn log and winner strings.
    pub fn label(self) -> &'static str {
        match self {
            Team::Player => "Player",
            Team::Ai => "AI",
        }
    }

    /// Both teams, Player first.
    pub fn all() -> impl Iterator<Item = Team> {
        [Team::Player, Team::Ai].into_iter()
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Movement class of a piece.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub fn name(self) -> &'static str {
        match self {
            PieceKind::Pawn => "Pawn",
            PieceKind::Knight => "Knight",
            PieceKind::Bishop => "Bishop",
            PieceKind::Rook => "Rook",
            PieceKind::Queen => "Queen",
            PieceKind::King => "King",
        }
    }

    /// Case-insensitive parse of a kind name.
    pub fn from_name(name: &str) -> Option<PieceKind> {
        PieceKind::all().find(|k| k.name().eq_ignore_ascii_case(name.trim()))
    }

    pub fn all() -> impl Iterator<Item = PieceKind> {
        [
            PieceKind::Pawn,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Rook,
            PieceKind::Queen,
            PieceKind::King,
        ]
        .into_iter()
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Synergy grouping. Three or more living members of one pack on a team
/// activate that pack's bonus.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Pack {
    Starter,
    Fire,
    Water,
    Earth,
    Shadow,
    Cyber,
}

impl Pack {
    pub fn name(self) -> &'static str {
        match self {
            Pack::Starter => "Starter Pack",
            Pack::Fire => "Fire Pack",
            Pack::Water => "Water Pack",
            Pack::Earth => "Earth Pack",
            Pack::Shadow => "Shadow Pack",
            Pack::Cyber => "Cyber Pack",
        }
    }

    /// Accepts both `"Fire Pack"` and `"Fire"`, case-insensitively.
    pub fn from_name(name: &str) -> Option<Pack> {
        let name = name.trim();
        Pack::all().find(|p| {
            p.name().eq_ignore_ascii_case(name)
                || p.name().trim_end_matches(" Pack").eq_ignore_ascii_case(name)
        })
    }

    pub fn all() -> impl Iterator<Item = Pack> {
        [
            Pack::Starter,
            Pack::Fire,
            Pack::Water,
            Pack::Earth,
            Pack::Shadow,
            Pack::Cyber,
        ]
        .into_iter()
    }
}

impl fmt::Display for Pack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Index of a piece in a board's arena. Stable for the piece's lifetime;
/// in-place replacement (promotion, evolution) keeps the id.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct PieceId(pub u16);

impl PieceId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One unit in play.
///
/// A plain value: built from a catalog template, never aliased, copied
/// wholesale whenever a board is cloned.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Piece {
    /// Catalog template this piece was built from.
    pub template: TemplateId,
    pub kind: PieceKind,
    pub team: Team,
    pub pack: Pack,
    pub pos: Pos,

    // Combat stats. Health 0 means eliminated.
    pub health: u32,
    pub max_health: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,

    // Economy.
    pub energy: u8,
    /// Added to every ability cost (Cursed +1, Blessed -1, Mind Hack +1).
    pub energy_cost_modifier: i8,

    // Progression.
    pub level: u8,
    pub experience: u32,
    pub ultimate_unlocked: bool,
    pub ultimate_charge: u8,

    // Capabilities.
    pub ability: Option<Ability>,
    pub passive: Option<Passive>,
    pub ultimate: Option<Ability>,

    // Cumulative counters for reporting.
    pub damage_dealt: u32,
    pub kills: u32,
}

impl Piece {
    /// Still on the board.
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// On the other side (says nothing about health).
    #[inline]
    pub fn is_enemy_of(&self, other: &Piece) -> bool {
        self.team != other.team
    }
}
