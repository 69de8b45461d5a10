//! Match runner: board setup and the alternating turn loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use monster_tactics_core::team::{balanced_team, random_team};
use monster_tactics_core::{Board, Catalog, MatchReport, Pack, SnapshotHistory, Team};

use crate::config::MatchConfig;
use crate::controller::Controller;
use crate::error::AiResult;

/// Result string when `max_turns` runs out.
pub const TURN_LIMIT: &str = "Turn limit reached";
/// Result string when the running flag is cleared.
pub const INTERRUPTED: &str = "Interrupted";

/// Two full rosters on a fresh board. A side with a pack gets a balanced
/// team from it; a side without one gets random templates.
pub fn setup_board(
    catalog: Arc<Catalog>,
    player_pack: Option<Pack>,
    ai_pack: Option<Pack>,
    seed: u64,
) -> AiResult<Board> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut roster = |team: Team, pack: Option<Pack>| match pack {
        Some(pack) => balanced_team(&catalog, team, pack, &mut rng),
        None => random_team(&catalog, team, &mut rng),
    };
    let player = roster(Team::Player, player_pack)?;
    let ai = roster(Team::Ai, ai_pack)?;
    Ok(Board::from_teams(catalog, player, ai, seed)?)
}

/// One match between a Player-side and an AI-side controller.
pub struct Match {
    board: Board,
    player: Box<dyn Controller>,
    ai: Box<dyn Controller>,
    config: MatchConfig,
    history: SnapshotHistory,
    running: Arc<AtomicBool>,
}

impl Match {
    pub fn new(
        board: Board,
        player: Box<dyn Controller>,
        ai: Box<dyn Controller>,
        config: MatchConfig,
        running: Arc<AtomicBool>,
    ) -> Match {
        Match {
            board,
            player,
            ai,
            config,
            history: SnapshotHistory::new(),
            running,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn history(&self) -> &SnapshotHistory {
        &self.history
    }

    /// Rewind the board to the snapshot taken at the start of `turn`.
    pub fn rewind(&mut self, turn: u32) -> bool {
        self.history.rewind(&mut self.board, turn)
    }

    /// Play until a King falls, the turn limit, or interruption.
    ///
    /// Player moves on odd turns, AI on even ones. Each turn is snapshotted
    /// before its controller acts; after every AI turn the ambient tile
    /// sweep runs if enabled.
    pub fn run(&mut self) -> MatchReport {
        if self.config.apply_synergy {
            self.board.apply_synergy_bonuses();
        }
        tracing::info!(
            max_turns = self.config.max_turns,
            seed = self.config.seed,
            pieces = self.board.living().count(),
            "match started"
        );

        let result = loop {
            if let Some(outcome) = self.board.check_win_condition() {
                let label = outcome.label();
                self.board.log_turn(label.clone());
                break label;
            }
            if !self.running.load(Ordering::SeqCst) {
                self.board.log_turn(format!("{INTERRUPTED}."));
                break INTERRUPTED.to_string();
            }
            if self.board.turn() >= self.config.max_turns {
                self.board.log_turn(format!("{TURN_LIMIT}."));
                break TURN_LIMIT.to_string();
            }

            let controller = if self.board.turn() % 2 == 0 {
                &mut self.player
            } else {
                &mut self.ai
            };
            let team = controller.team();
            self.board.begin_turn(team);
            self.history.record(&self.board);
            controller.take_turn(&mut self.board);

            if team == Team::Ai
                && self.config.round_end_tile_sweep
                && self.board.check_win_condition().is_none()
            {
                self.board.apply_effects_to_all_pieces();
            }
        };

        tracing::info!(result = %result, turns = self.board.turn(), "match finished");
        self.player.log_summary();
        self.ai.log_summary();
        MatchReport::from_board(&self.board, &result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use monster_tactics_core::PieceKind;

    #[test]
    fn test_setup_board_full_rosters() {
        let board = setup_board(Arc::new(Catalog::standard()), Some(Pack::Earth), None, 4).unwrap();
        assert_eq!(board.living_of(Team::Player).count(), 16);
        assert_eq!(board.living_of(Team::Ai).count(), 16);
        let king = board.king_of(Team::Player).unwrap();
        assert_eq!(board.piece(king).unwrap().kind, PieceKind::King);
        assert!(board.check_win_condition().is_none());
    }

    #[test]
    fn test_setup_is_seeded() {
        let catalog = Arc::new(Catalog::standard());
        let a = setup_board(catalog.clone(), None, None, 8).unwrap();
        let b = setup_board(catalog, None, None, 8).unwrap();
        let pieces = |board: &Board| board.pieces().map(|(_, p)| *p).collect::<Vec<_>>();
        assert_eq!(pieces(&a), pieces(&b));
    }
}
