//! Monster Tactics AI: alpha-beta and Monte Carlo search, personality
//! heuristics, controllers and the match runner behind the `tactics` binary.
//!
//! Search only ever reads the live [`Board`](monster_tactics_core::Board);
//! every hypothetical line is played on a scratch copy.

pub mod config;
pub mod controller;
pub mod error;
pub mod game;
pub mod personality;
pub mod report;
pub mod rollout;
pub mod search;
pub mod stats;

pub use config::{Difficulty, MatchConfig, SearchConfig};
pub use controller::{apply_command, parse_command, Action, AiController, Controller, PlayerController};
pub use error::{AiError, AiResult, CommandError};
pub use game::{setup_board, Match};
pub use rollout::{best_move_monte_carlo, monte_carlo_scores, rollout};
pub use search::{alpha_beta, best_move_alpha_beta, evaluate, Candidate, SearchContext};
pub use stats::SearchStats;
