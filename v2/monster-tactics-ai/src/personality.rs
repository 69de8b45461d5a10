//! Personality-weighted heuristics for the AI controller.

use monster_tactics_core::{Board, Personality, Piece, PieceId, Pos};

/// Flat bonus for a tile a personality likes.
const TILE_BONUS: i32 = 10;
const CAPTURE_BONUS: i32 = 15;
const ENGAGE_BONUS: i32 = 5;
const ENEMY_HIT_SCORE: i32 = 10;
const ALLY_HELPED_SCORE: i32 = 5;

/// Raw value of whatever sits on `to` for `id`'s team: an enemy's
/// `health + attack`, otherwise 0.
pub fn capture_value(board: &Board, id: PieceId, to: Pos) -> i32 {
    let Some(mover) = board.piece(id) else {
        return 0;
    };
    board
        .piece_at(to)
        .and_then(|t| board.piece(t))
        .filter(|t| t.team != mover.team)
        .map_or(0, |t| (t.health + t.attack) as i32)
}

/// Heuristic bonus for moving `id` to `to`.
///
/// `before` is the position being decided on; `after` is a scratch copy
/// with the move already played, so tile judgements see the piece on its
/// new square.
pub fn move_bonus(personality: Personality, before: &Board, after: &Board, id: PieceId, to: Pos) -> i32 {
    let Some(mover) = before.piece(id).copied() else {
        return 0;
    };
    let team = mover.team;

    match personality {
        Personality::Balanced => 0,
        Personality::Aggressive => {
            let target = before
                .piece_at(to)
                .and_then(|t| before.piece(t))
                .filter(|t| t.team != team);
            match target {
                Some(t) => CAPTURE_BONUS + (t.health / 2) as i32,
                None if !after.adjacent_enemies(id).is_empty() => ENGAGE_BONUS,
                None => 0,
            }
        }
        Personality::Defensive => {
            if after.is_tile_defensive(to, team) {
                TILE_BONUS
            } else if after.is_tile_under_threat(to, team) {
                -TILE_BONUS
            } else {
                0
            }
        }
        Personality::Sneaky => {
            if after.is_tile_safe(to, team) {
                TILE_BONUS
            } else {
                0
            }
        }
        Personality::SynergyHunter => {
            let near_pack = after
                .adjacent_allies(id)
                .into_iter()
                .filter_map(|a| after.piece(a))
                .any(|a| a.pack == mover.pack);
            if near_pack {
                TILE_BONUS
            } else {
                0
            }
        }
    }
}

/// Score of `id` using its ability, judged by diffing `before` against
/// `after` (where the ability has been used): +10 per enemy whose combat
/// stats changed, +5 per ally (the caster included) whose stats changed.
pub fn ability_score(before: &Board, after: &Board, id: PieceId) -> i32 {
    let Some(caster) = before.piece(id) else {
        return 0;
    };
    let mut score = 0;
    for (other, was) in before.living() {
        let Some(now) = after.piece(other) else {
            continue;
        };
        let is_caster = other == id;
        if !combat_changed(was, now, !is_caster) {
            continue;
        }
        score += if was.team == caster.team {
            ALLY_HELPED_SCORE
        } else {
            ENEMY_HIT_SCORE
        };
    }
    score
}

/// Combat-relevant fields differ. The caster pays energy and earns XP for
/// every use, so its energy is ignored.
fn combat_changed(was: &Piece, now: &Piece, count_energy: bool) -> bool {
    was.health != now.health
        || was.max_health != now.max_health
        || was.attack != now.attack
        || was.defense != now.defense
        || was.speed != now.speed
        || was.pos != now.pos
        || was.energy_cost_modifier != now.energy_cost_modifier
        || (count_energy && was.energy != now.energy)
}
