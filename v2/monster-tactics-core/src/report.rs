//! End-of-match report: a read-only, serializable view of a finished board.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::piece::{Pack, Team};

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct PiecePerformance {
    pub team: Team,
    pub name: String,
    pub level: u8,
    pub kills: u32,
    pub damage_dealt: u32,
    pub survived: bool,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct TeamTotals {
    pub team: Team,
    pub kills: u32,
    pub damage_dealt: u32,
    pub remaining: usize,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct SynergyEntry {
    pub team: Team,
    pub pack: Pack,
    pub description: String,
}

/// Everything the reporting layer needs after a match.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct MatchReport {
    /// "Player Wins!", "AI Wins!", "Draw!" or "Turn limit reached".
    pub result: String,
    pub turns: u32,
    pub log_entries: usize,
    pub pieces: Vec<PiecePerformance>,
    pub totals: Vec<TeamTotals>,
    /// `"Player FireKnight1"` of the piece with the most damage dealt.
    pub mvp: Option<String>,
    pub synergies: Vec<SynergyEntry>,
    /// Ability name -> times used, read back from the turn log.
    pub ability_usage: BTreeMap<String, u32>,
    /// Evolution and promotion entries from the turn log.
    pub evolutions: Vec<String>,
    pub turn_log: Vec<String>,
}

impl MatchReport {
    pub fn from_board(board: &Board, result: &str) -> MatchReport {
        let pieces: Vec<PiecePerformance> = board
            .pieces()
            .map(|(id, p)| PiecePerformance {
                team: p.team,
                name: board.template_name(id).to_string(),
                level: p.level,
                kills: p.kills,
                damage_dealt: p.damage_dealt,
                survived: p.is_alive(),
            })
            .collect();

        let totals = Team::all()
            .map(|team| {
                let mine = pieces.iter().filter(|p| p.team == team);
                TeamTotals {
                    team,
                    kills: mine.clone().map(|p| p.kills).sum(),
                    damage_dealt: mine.clone().map(|p| p.damage_dealt).sum(),
                    remaining: mine.filter(|p| p.survived).count(),
                }
            })
            .collect();

        // First maximum wins ties.
        let mvp = board
            .pieces()
            .filter(|(_, p)| p.damage_dealt > 0)
            .fold(None, |best: Option<(u32, String)>, (id, p)| match best {
                Some((top, _)) if top >= p.damage_dealt => best,
                _ => Some((p.damage_dealt, board.describe(id))),
            })
            .map(|(_, who)| who);

        let synergies = Team::all()
            .flat_map(|team| {
                board.active_synergies(team).into_iter().map(move |pack| (team, pack))
            })
            .map(|(team, pack)| SynergyEntry {
                team,
                pack,
                description: board.catalog().pack_bonus(pack).unwrap_or_default().to_string(),
            })
            .collect();

        let log = board.turn_log();
        MatchReport {
            result: result.to_string(),
            turns: board.turn(),
            log_entries: log.len(),
            pieces,
            totals,
            mvp,
            synergies,
            ability_usage: ability_usage(log),
            evolutions: log
                .iter()
                .filter(|e| e.contains(" evolved into ") || e.contains(" promoted to "))
                .cloned()
                .collect(),
            turn_log: log.to_vec(),
        }
    }

    /// Short human-readable summary.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![format!("{} after {} turns", self.result, self.turns)];
        for t in &self.totals {
            lines.push(format!(
                "{}: {} kills, {} damage, {} pieces remaining",
                t.team, t.kills, t.damage_dealt, t.remaining
            ));
        }
        if let Some(mvp) = &self.mvp {
            lines.push(format!("MVP: {mvp}"));
        }
        for s in &self.synergies {
            lines.push(format!("{} {}: {}", s.team, s.pack, s.description));
        }
        for (ability, count) in &self.ability_usage {
            lines.push(format!("{ability} used {count}x"));
        }
        lines
    }
}

/// Count `"<piece> uses <ability>!"` entries.
fn ability_usage(log: &[String]) -> BTreeMap<String, u32> {
    let mut usage = BTreeMap::new();
    for entry in log {
        let Some((_, rest)) = entry.split_once(" uses ") else {
            continue;
        };
        let Some(name) = rest.strip_suffix('!') else {
            continue;
        };
        *usage.entry(name.to_string()).or_insert(0) += 1;
    }
    usage
}
