//! Depth-bounded alpha-beta minimax over board clones.
//!
//! The live board is never touched: every child is a [`Board::scratch`]
//! copy with the candidate move applied. Scores are material sums from the
//! maximizer's point of view, see [`evaluate`].

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use monster_tactics_core::{Board, PieceId, Pos, Team};

use crate::stats::SearchStats;

/// Seconds between progress lines at `debug`.
const LOG_INTERVAL_SECS: u64 = 5;

/// One legal (piece, destination) pair.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Candidate {
    pub piece: PieceId,
    pub to: Pos,
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.piece, self.to)
    }
}

/// Every legal move of `team`, piece-id order then ascending destination.
pub fn candidates(board: &Board, team: Team) -> Vec<Candidate> {
    board
        .living_of(team)
        .flat_map(|(piece, _)| {
            board
                .legal_moves(piece)
                .iter()
                .map(move |to| Candidate { piece, to })
                .collect::<Vec<_>>()
        })
        .collect()
}

/// `board` with `candidate` played, on a scratch copy.
pub fn child_after(board: &Board, candidate: Candidate) -> Board {
    let mut child = board.scratch();
    child.move_piece(candidate.piece, candidate.to);
    child
}

/// Cancellation flag plus counters, shared by every search call of one
/// controller.
#[derive(Debug, Clone)]
pub struct SearchContext {
    running: Arc<AtomicBool>,
    pub stats: SearchStats,
}

impl SearchContext {
    pub fn new(running: Arc<AtomicBool>) -> SearchContext {
        SearchContext {
            running,
            stats: SearchStats::new(),
        }
    }

    /// A context nobody can interrupt.
    pub fn unbounded() -> SearchContext {
        SearchContext::new(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub(crate) fn maybe_log(&mut self) {
        if self.stats.should_log(LOG_INTERVAL_SECS) {
            self.stats.log_progress();
        }
    }
}

/// Sum of `health + attack` over living pieces, positive for `maximizer`.
pub fn evaluate(board: &Board, maximizer: Team) -> i32 {
    board
        .living()
        .map(|(_, p)| {
            let material = (p.health + p.attack) as i32;
            if p.team == maximizer {
                material
            } else {
                -material
            }
        })
        .sum()
}

/// Minimax score of `board` with `to_move` to play, `depth` plies deep.
///
/// Stops and evaluates statically when the depth is spent, a King has
/// fallen, the side to move has no legal move, or the search was
/// interrupted.
pub fn alpha_beta(
    board: &Board,
    depth: u8,
    alpha: i32,
    beta: i32,
    to_move: Team,
    maximizer: Team,
    ctx: &mut SearchContext,
) -> i32 {
    search(board, depth, alpha, beta, to_move, maximizer, 0, ctx)
}

#[allow(clippy::too_many_arguments)]
fn search(
    board: &Board,
    depth: u8,
    mut alpha: i32,
    mut beta: i32,
    to_move: Team,
    maximizer: Team,
    ply: u64,
    ctx: &mut SearchContext,
) -> i32 {
    ctx.stats.nodes += 1;
    ctx.stats.record_depth(ply);

    if board.check_win_condition().is_some() {
        ctx.stats.record_terminal();
        return evaluate(board, maximizer);
    }
    if depth == 0 || !ctx.is_running() {
        ctx.stats.record_leaf();
        return evaluate(board, maximizer);
    }

    let mut moves = candidates(board, to_move);
    if moves.is_empty() {
        ctx.stats.record_leaf();
        return evaluate(board, maximizer);
    }
    // Captures first (stable sort keeps enumeration order within a class)
    moves.sort_by_key(|c| if board.piece_at(c.to).is_some() { 0u8 } else { 1 });

    let maximizing = to_move == maximizer;
    let mut best = if maximizing { i32::MIN } else { i32::MAX };
    for candidate in moves {
        let child = child_after(board, candidate);
        let score = search(
            &child,
            depth - 1,
            alpha,
            beta,
            to_move.opponent(),
            maximizer,
            ply + 1,
            ctx,
        );
        if maximizing {
            best = best.max(score);
            alpha = alpha.max(best);
        } else {
            best = best.min(score);
            beta = beta.min(best);
        }
        if alpha >= beta {
            ctx.stats.cutoffs += 1;
            break;
        }
    }
    best
}

/// Exact score of every root move of `team`, in enumeration order.
///
/// `depth` counts the root ply. At depth 0 nothing is played and every
/// move carries the static evaluation of `board`. Otherwise each root move
/// is searched with a full window so the scores can be compared with each
/// other and mixed with heuristic bonuses.
pub fn root_scores(board: &Board, team: Team, depth: u8, ctx: &mut SearchContext) -> Vec<(Candidate, i32)> {
    if depth == 0 {
        let score = evaluate(board, team);
        ctx.stats.record_leaf();
        return candidates(board, team).into_iter().map(|c| (c, score)).collect();
    }

    let mut scores = Vec::new();
    for candidate in candidates(board, team) {
        let child = child_after(board, candidate);
        let score = alpha_beta(
            &child,
            depth - 1,
            i32::MIN,
            i32::MAX,
            team.opponent(),
            team,
            ctx,
        );
        scores.push((candidate, score));
        ctx.maybe_log();
    }
    scores
}

/// Best root move for `team` and its score. The first maximum wins ties,
/// so depth 0 yields the first legal move at the static evaluation.
pub fn best_move_alpha_beta(
    board: &Board,
    team: Team,
    depth: u8,
    ctx: &mut SearchContext,
) -> Option<(Candidate, i32)> {
    first_max(root_scores(board, team, depth, ctx))
}

/// First entry holding the maximum score.
pub(crate) fn first_max<T: PartialOrd + Copy>(
    scores: impl IntoIterator<Item = (Candidate, T)>,
) -> Option<(Candidate, T)> {
    let mut best: Option<(Candidate, T)> = None;
    for (candidate, score) in scores {
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((candidate, score)),
        }
    }
    best
}
