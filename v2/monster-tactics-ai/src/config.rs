//! Search and match parameters.

use serde::{Deserialize, Serialize};

/// How hard the AI thinks.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum Difficulty {
    /// Personality heuristic only.
    Easy,
    /// Heuristic plus alpha-beta.
    #[default]
    Medium,
    /// Heuristic plus Monte Carlo rollouts.
    Hard,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Alpha-beta plies below each candidate.
    pub depth: u8,
    /// Rollouts per candidate.
    pub simulations: u32,
    /// A rollout still undecided after this many plies counts as a non-win.
    pub max_rollout_plies: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            depth: 2,
            simulations: 50,
            max_rollout_plies: 200,
        }
    }
}

impl SearchConfig {
    pub fn for_difficulty(difficulty: Difficulty) -> SearchConfig {
        match difficulty {
            Difficulty::Easy => SearchConfig {
                depth: 0,
                simulations: 0,
                ..SearchConfig::default()
            },
            Difficulty::Medium => SearchConfig {
                simulations: 0,
                ..SearchConfig::default()
            },
            Difficulty::Hard => SearchConfig {
                depth: 0,
                ..SearchConfig::default()
            },
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Controller turns (Player and AI each count one) before the match is
    /// called off.
    pub max_turns: u32,
    pub seed: u64,
    /// Sweep every living piece's ambient tile effect after each full round.
    pub round_end_tile_sweep: bool,
    /// Grant pack synergy bonuses before the first turn.
    pub apply_synergy: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            max_turns: 200,
            seed: 0,
            round_end_tile_sweep: true,
            apply_synergy: true,
        }
    }
}
