//! Pack synergy: three or more living members of one pack on a team grant
//! that pack's bonus once, at match start.

use crate::board::Board;
use crate::piece::{Pack, PieceId, Team};

/// Living pack members needed to activate a bonus.
pub const SYNERGY_THRESHOLD: usize = 3;

impl Board {
    /// Living members of `pack` on `team`.
    pub fn pack_count(&self, team: Team, pack: Pack) -> usize {
        self.living_of(team).filter(|(_, p)| p.pack == pack).count()
    }

    /// Threshold met and the pack has a bonus (Starter Pack has none).
    pub fn synergy_active(&self, team: Team, pack: Pack) -> bool {
        pack != Pack::Starter && self.pack_count(team, pack) >= SYNERGY_THRESHOLD
    }

    pub fn active_synergies(&self, team: Team) -> Vec<Pack> {
        Pack::all().filter(|&p| self.synergy_active(team, p)).collect()
    }

    /// Grant every active pack bonus on both teams.
    pub fn apply_synergy_bonuses(&mut self) {
        for team in Team::all() {
            for pack in self.active_synergies(team) {
                let members: Vec<PieceId> = self
                    .living_of(team)
                    .filter(|(_, p)| p.pack == pack)
                    .map(|(id, _)| id)
                    .collect();
                for id in members {
                    if let Some(p) = self.piece_mut(id) {
                        match pack {
                            Pack::Fire => p.attack = p.attack * 105 / 100,
                            Pack::Cyber => p.defense += 2,
                            Pack::Shadow => p.speed += 1,
                            Pack::Water => {
                                p.health += 5;
                                p.max_health += 5;
                            }
                            Pack::Earth => p.defense += 1,
                            Pack::Starter => {}
                        }
                    }
                    let who = self.describe(id);
                    self.log_turn(format!("{who} benefits from {pack} Synergy!"));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::board_with;

    #[test]
    fn test_cyber_synergy_needs_three_living() {
        let mut board = board_with(&[
            ("CyberKing1", Team::Ai, "E8"),
            ("PlasmaQueen1", Team::Ai, "D8"),
            ("OverclockKnight1", Team::Ai, "B8"),
            ("StarterKing", Team::Player, "E1"),
        ]);
        assert!(board.synergy_active(Team::Ai, Pack::Cyber));
        assert!(!board.synergy_active(Team::Player, Pack::Starter));

        board.apply_synergy_bonuses();
        let queen = board.piece_at("D8".parse().unwrap()).unwrap();
        assert_eq!(board.piece(queen).unwrap().defense, 5 + 2);
        assert_eq!(
            board.turn_log().iter().filter(|e| e.contains("Cyber Pack Synergy")).count(),
            3
        );
    }

    #[test]
    fn test_dead_members_do_not_count() {
        let mut board = board_with(&[
            ("FireKnight1", Team::Player, "B1"),
            ("FireKnight1", Team::Player, "G1"),
            ("InfernoKing1", Team::Player, "E1"),
        ]);
        assert!(board.synergy_active(Team::Player, Pack::Fire));
        let king = board.king_of(Team::Player).unwrap();
        board.piece_mut(king).unwrap().health = 0;
        assert!(!board.synergy_active(Team::Player, Pack::Fire));
        board.apply_synergy_bonuses();
        assert!(board.turn_log().is_empty());
    }

    #[test]
    fn test_water_raises_max_health() {
        let mut board = board_with(&[
            ("AquaBishop1", Team::Player, "C1"),
            ("TidePawn1", Team::Player, "A2"),
            ("TidePawn1", Team::Player, "B2"),
        ]);
        board.apply_synergy_bonuses();
        let bishop = board.piece_at("C1".parse().unwrap()).unwrap();
        let p = board.piece(bishop).unwrap();
        assert_eq!((p.health, p.max_health), (35, 35));
    }
}
