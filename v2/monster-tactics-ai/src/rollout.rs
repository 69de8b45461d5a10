//! Monte Carlo playouts.
//!
//! Each ply draws a random living piece from either side and plays one of
//! its legal moves at random. A drawn piece with no moves spends the ply. A
//! playout ends when a King falls or after `max_plies` plies, in which case
//! it counts as a non-win.

use rand::seq::IndexedRandom;
use rand::Rng;

use monster_tactics_core::{Board, Outcome, PieceId, Team};

use crate::search::{candidates, child_after, first_max, Candidate, SearchContext};

/// Play random moves on a scratch copy of `board` until a King falls.
/// `None` if the ply cap came first.
pub fn rollout(board: &Board, max_plies: u32, rng: &mut impl Rng) -> Option<Outcome> {
    let mut board = board.scratch();
    for _ in 0..max_plies {
        if let Some(outcome) = board.check_win_condition() {
            return Some(outcome);
        }
        random_ply(&mut board, rng);
    }
    board.check_win_condition()
}

/// One playout ply. Returns the move played, or `None` when the drawn piece
/// had nowhere to go.
pub fn random_ply(board: &mut Board, rng: &mut impl Rng) -> Option<Candidate> {
    let living: Vec<PieceId> = board.living().map(|(id, _)| id).collect();
    let &piece = living.choose(rng)?;
    let moves = board.legal_moves(piece);
    let &to = moves.as_slice().choose(rng)?;
    board.move_piece(piece, to);
    Some(Candidate { piece, to })
}

/// Fraction of `simulations` playouts from `board` that `team` wins.
pub fn win_rate(
    board: &Board,
    team: Team,
    simulations: u32,
    max_plies: u32,
    rng: &mut impl Rng,
    ctx: &mut SearchContext,
) -> f64 {
    if simulations == 0 {
        return 0.0;
    }
    let mut wins = 0u32;
    for _ in 0..simulations {
        if !ctx.is_running() {
            break;
        }
        let outcome = rollout(board, max_plies, rng);
        let won = outcome.and_then(Outcome::winner) == Some(team);
        ctx.stats.record_rollout(outcome, won);
        if won {
            wins += 1;
        }
    }
    wins as f64 / simulations as f64
}

/// Win rate of every legal move of `team`, in enumeration order.
pub fn monte_carlo_scores(
    board: &Board,
    team: Team,
    simulations: u32,
    max_plies: u32,
    rng: &mut impl Rng,
    ctx: &mut SearchContext,
) -> Vec<(Candidate, f64)> {
    let mut scores = Vec::new();
    for candidate in candidates(board, team) {
        let child = child_after(board, candidate);
        let rate = win_rate(&child, team, simulations, max_plies, rng, ctx);
        scores.push((candidate, rate));
        ctx.maybe_log();
    }
    scores
}

/// Move with the highest win rate. The first maximum wins ties.
pub fn best_move_monte_carlo(
    board: &Board,
    team: Team,
    simulations: u32,
    max_plies: u32,
    rng: &mut impl Rng,
    ctx: &mut SearchContext,
) -> Option<(Candidate, f64)> {
    first_max(monte_carlo_scores(board, team, simulations, max_plies, rng, ctx))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use monster_tactics_core::Catalog;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_decided_board_returns_immediately() {
        let mut board = Board::new(Arc::new(Catalog::standard()), 1);
        board.spawn("StarterKing", Team::Player, "E1".parse().unwrap()).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(rollout(&board, 0, &mut rng), Some(Outcome::Winner(Team::Player)));
    }

    #[test]
    fn test_ply_cap_is_undecided() {
        let mut board = Board::new(Arc::new(Catalog::standard()), 1);
        board.spawn("StarterKing", Team::Player, "A1".parse().unwrap()).unwrap();
        board.spawn("StarterKing", Team::Ai, "H8".parse().unwrap()).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(rollout(&board, 1, &mut rng), None);
    }

    #[test]
    fn test_stuck_piece_spends_the_ply() {
        let mut board = Board::new(Arc::new(Catalog::standard()), 1);
        board.spawn("StarterKing", Team::Player, "A1".parse().unwrap()).unwrap();
        let pawn = board.spawn("StarterPawn", Team::Player, "E2".parse().unwrap()).unwrap();
        let blocker = board.spawn("StarterPawn", Team::Ai, "E3".parse().unwrap()).unwrap();
        board.spawn("StarterKing", Team::Ai, "H8".parse().unwrap()).unwrap();
        assert!(board.legal_moves(pawn).is_empty());
        assert!(board.legal_moves(blocker).is_empty());

        let mut rng = StdRng::seed_from_u64(5);
        let mut spent = 0;
        for _ in 0..200 {
            let mut copy = board.scratch();
            match random_ply(&mut copy, &mut rng) {
                Some(played) => assert!(played.piece != pawn && played.piece != blocker),
                None => {
                    spent += 1;
                    let before: Vec<_> = board.pieces().map(|(_, p)| p.pos).collect();
                    let after: Vec<_> = copy.pieces().map(|(_, p)| p.pos).collect();
                    assert_eq!(before, after);
                }
            }
        }
        // Half the living pieces are stuck
        assert!(spent > 50 && spent < 150, "spent {spent}");
    }

    #[test]
    fn test_zero_simulations() {
        let board = Board::new(Arc::new(Catalog::standard()), 1);
        let mut rng = StdRng::seed_from_u64(1);
        let mut ctx = SearchContext::unbounded();
        assert_eq!(win_rate(&board, Team::Ai, 0, 10, &mut rng, &mut ctx), 0.0);
        assert_eq!(ctx.stats.rollouts, 0);
    }

    #[test]
    fn test_rollout_does_not_touch_board() {
        let mut board = Board::new(Arc::new(Catalog::standard()), 1);
        board.spawn("StarterKing", Team::Player, "A1".parse().unwrap()).unwrap();
        board.spawn("StarterQueen", Team::Ai, "C3".parse().unwrap()).unwrap();
        board.spawn("StarterKing", Team::Ai, "H8".parse().unwrap()).unwrap();
        let before: Vec<_> = board.pieces().map(|(id, p)| (id, *p)).collect();
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..10 {
            rollout(&board, 50, &mut rng);
        }
        let after: Vec<_> = board.pieces().map(|(id, p)| (id, *p)).collect();
        assert_eq!(before, after);
    }
}
