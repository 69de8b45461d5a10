//! Turn-taking controllers: the search-backed AI and a command-driven
//! player.

use std::fmt;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use monster_tactics_core::{Board, Personality, PieceId, PieceKind, Pos, Team};

use crate::config::{Difficulty, SearchConfig};
use crate::error::CommandError;
use crate::personality::{ability_score, capture_value, move_bonus};
use crate::rollout::win_rate;
use crate::search::{alpha_beta, candidates, child_after, SearchContext};
use crate::stats::SearchStats;

/// Weight of a Monte Carlo win rate against heuristic points.
const WIN_RATE_WEIGHT: f64 = 100.0;

/// What a controller did with its turn.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Action {
    Move { piece: PieceId, to: Pos },
    Ability { piece: PieceId },
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Move { piece, to } => write!(f, "move {piece} to {to}"),
            Action::Ability { piece } => write!(f, "ability of {piece}"),
        }
    }
}

/// One side of a match.
pub trait Controller {
    fn team(&self) -> Team;

    /// Run start-of-turn effects for this side, then act once. `None` means
    /// the turn passed without an action.
    fn take_turn(&mut self, board: &mut Board) -> Option<Action>;

    /// Report whatever the controller tracked over the match.
    fn log_summary(&self) {}
}

// ============================================================================
// AI
// ============================================================================

pub struct AiController {
    team: Team,
    difficulty: Difficulty,
    config: SearchConfig,
    personality: Personality,
    rng: StdRng,
    ctx: SearchContext,
}

impl AiController {
    /// Personality comes from the pack of `team`'s King on `board`.
    pub fn new(
        team: Team,
        difficulty: Difficulty,
        board: &Board,
        seed: u64,
        running: Arc<AtomicBool>,
    ) -> AiController {
        let personality = board
            .king_of(team)
            .and_then(|k| board.piece(k))
            .map(|k| board.catalog().personality_for(k.pack))
            .unwrap_or_default();
        AiController {
            team,
            difficulty,
            config: SearchConfig::for_difficulty(difficulty),
            personality,
            rng: StdRng::seed_from_u64(seed),
            ctx: SearchContext::new(running),
        }
    }

    pub fn with_config(mut self, config: SearchConfig) -> AiController {
        self.config = config;
        self
    }

    pub fn with_personality(mut self, personality: Personality) -> AiController {
        self.personality = personality;
        self
    }

    pub fn personality(&self) -> Personality {
        self.personality
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn stats(&self) -> &SearchStats {
        &self.ctx.stats
    }

    /// Highest-scoring action and its score. Moves come first (piece-id
    /// order, ascending destination), then abilities; the first maximum
    /// wins ties.
    pub fn choose_action(&mut self, board: &Board) -> Option<(Action, f64)> {
        let mut best: Option<(Action, f64)> = None;
        let mut consider = |action: Action, score: f64| match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((action, score)),
        };

        for candidate in candidates(board, self.team) {
            let child = child_after(board, candidate);
            let heuristic = move_bonus(self.personality, board, &child, candidate.piece, candidate.to)
                + capture_value(board, candidate.piece, candidate.to);
            let score = heuristic as f64 + self.search_score(&child);
            consider(
                Action::Move {
                    piece: candidate.piece,
                    to: candidate.to,
                },
                score,
            );
        }

        let casters: Vec<PieceId> = board
            .living_of(self.team)
            .filter(|&(id, _)| board.can_use_ability(id))
            .map(|(id, _)| id)
            .collect();
        for piece in casters {
            let mut child = board.scratch();
            if !child.use_ability(piece) {
                continue;
            }
            let score = ability_score(board, &child, piece) as f64 + self.search_score(&child);
            consider(Action::Ability { piece }, score);
        }

        best
    }

    /// Difficulty-dependent look-ahead for a position this side just
    /// produced.
    fn search_score(&mut self, child: &Board) -> f64 {
        match self.difficulty {
            Difficulty::Easy => 0.0,
            Difficulty::Medium => alpha_beta(
                child,
                self.config.depth.saturating_sub(1),
                i32::MIN,
                i32::MAX,
                self.team.opponent(),
                self.team,
                &mut self.ctx,
            ) as f64,
            Difficulty::Hard => {
                WIN_RATE_WEIGHT
                    * win_rate(
                        child,
                        self.team,
                        self.config.simulations,
                        self.config.max_rollout_plies,
                        &mut self.rng,
                        &mut self.ctx,
                    )
            }
        }
    }
}

impl Controller for AiController {
    fn team(&self) -> Team {
        self.team
    }

    fn take_turn(&mut self, board: &mut Board) -> Option<Action> {
        board.apply_start_of_turn_effects(self.team);
        if board.check_win_condition().is_some() {
            return None;
        }

        let Some((action, score)) = self.choose_action(board) else {
            board.log_turn(format!("{} has no legal action and passes.", self.team));
            return None;
        };
        tracing::debug!(team = %self.team, %action, score, personality = %self.personality, "AI action");

        match action {
            Action::Move { piece, to } => board.move_piece(piece, to),
            Action::Ability { piece } => {
                board.use_ability(piece);
            }
        }
        Some(action)
    }

    fn log_summary(&self) {
        tracing::info!(team = %self.team, difficulty = ?self.difficulty, personality = %self.personality, "AI summary");
        self.ctx.stats.log_summary();
    }
}

// ============================================================================
// Player
// ============================================================================

/// A parsed player command.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Command {
    pub kind: PieceKind,
    pub at: Pos,
    pub order: Order,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Order {
    MoveTo(Pos),
    Ability,
}

/// Parse `"<Kind> at <Pos> to <Pos>"` or `"<Kind> at <Pos> ability"`,
/// case-insensitively.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let malformed = || CommandError::Malformed(line.trim().to_string());
    let words: Vec<&str> = line.split_whitespace().collect();

    let (kind, at, rest) = match words.as_slice() {
        [kind, at_kw, at, rest @ ..] if at_kw.eq_ignore_ascii_case("at") => (kind, at, rest),
        _ => return Err(malformed()),
    };
    let kind = PieceKind::from_name(kind).ok_or_else(malformed)?;
    let at = parse_pos(at)?;

    let order = match rest {
        [to_kw, to] if to_kw.eq_ignore_ascii_case("to") => Order::MoveTo(parse_pos(to)?),
        [ability] if ability.eq_ignore_ascii_case("ability") => Order::Ability,
        _ => return Err(malformed()),
    };
    Ok(Command { kind, at, order })
}

fn parse_pos(label: &str) -> Result<Pos, CommandError> {
    Pos::from_label(label).map_err(|_| CommandError::InvalidPosition(label.to_string()))
}

/// Validate one command line for `team` and apply it.
pub fn apply_command(board: &mut Board, team: Team, line: &str) -> Result<Action, CommandError> {
    let command = parse_command(line)?;
    let piece = board
        .piece_at(command.at)
        .filter(|&id| board.piece(id).is_some_and(|p| p.team == team && p.kind == command.kind))
        .ok_or_else(|| CommandError::NoSuchPiece {
            kind: command.kind.to_string(),
            at: command.at.label(),
        })?;

    match command.order {
        Order::MoveTo(to) => {
            if !board.is_legal(piece, to) {
                return Err(CommandError::IllegalMove { to: to.label() });
            }
            board.move_piece(piece, to);
            Ok(Action::Move { piece, to })
        }
        Order::Ability => {
            if !board.can_use_ability(piece) {
                return Err(CommandError::AbilityRejected);
            }
            board.use_ability(piece);
            Ok(Action::Ability { piece })
        }
    }
}

/// Plays whatever a line source says. Rejected lines leave the board as it
/// was and the next line is tried.
pub struct PlayerController<I> {
    team: Team,
    commands: I,
}

impl<I: Iterator<Item = String>> PlayerController<I> {
    pub fn new(team: Team, commands: I) -> PlayerController<I> {
        PlayerController { team, commands }
    }
}

impl<I: Iterator<Item = String>> Controller for PlayerController<I> {
    fn team(&self) -> Team {
        self.team
    }

    fn take_turn(&mut self, board: &mut Board) -> Option<Action> {
        board.apply_start_of_turn_effects(self.team);
        if board.check_win_condition().is_some() {
            return None;
        }

        for line in self.commands.by_ref() {
            match apply_command(board, self.team, &line) {
                Ok(action) => return Some(action),
                Err(e) => tracing::warn!(command = %line.trim(), error = %e, "command rejected"),
            }
        }
        board.log_turn(format!("{} has no more commands and passes.", self.team));
        None
    }
}
