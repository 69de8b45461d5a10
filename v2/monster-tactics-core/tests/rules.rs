//! Rule properties checked through the public API.

use std::collections::HashSet;
use std::sync::Arc;

use monster_tactics_core::team::{balanced_team, random_team};
use monster_tactics_core::{
    coordinates_to_position, position_to_coordinates, Board, Catalog, Outcome, Pack, PieceId,
    PieceKind, Pos, Team, TileEffect,
};
use rand::prelude::*;
use rand::rngs::StdRng;

fn at(label: &str) -> Pos {
    label.parse().unwrap()
}

fn empty_board() -> Board {
    Board::new(Arc::new(Catalog::standard()), 1)
}

fn full_board(seed: u64) -> Board {
    let catalog = Arc::new(Catalog::standard());
    let mut rng = StdRng::seed_from_u64(seed);
    let player = random_team(&catalog, Team::Player, &mut rng).unwrap();
    let ai = balanced_team(&catalog, Team::Ai, Pack::Cyber, &mut rng).unwrap();
    Board::from_teams(catalog, player, ai, seed).unwrap()
}

#[test]
fn test_label_roundtrip() {
    for pos in Pos::all() {
        let label = pos.label();
        let (row, col) = position_to_coordinates(&label).unwrap();
        assert_eq!(coordinates_to_position(row as i32, col as i32).unwrap(), label);
    }
}

#[test]
fn test_knight_scenario() {
    let mut board = empty_board();
    let knight = board.spawn("StarterKnight", Team::Player, at("D4")).unwrap();
    assert_eq!(board.legal_moves(knight).len(), 8);
    let corner = board.spawn("StarterKnight", Team::Ai, at("A1")).unwrap();
    assert_eq!(board.legal_moves(corner).len(), 2);
}

#[test]
fn test_sliders_stop_at_first_occupied_tile() {
    let board = full_board(3);
    let occ = board.occupancy();
    for (id, piece) in board.living() {
        let dirs: &[(i8, i8)] = match piece.kind {
            PieceKind::Rook => &[(1, 0), (-1, 0), (0, 1), (0, -1)],
            PieceKind::Bishop => &[(1, 1), (1, -1), (-1, 1), (-1, -1)],
            PieceKind::Queen => &[
                (1, 0),
                (-1, 0),
                (0, 1),
                (0, -1),
                (1, 1),
                (1, -1),
                (-1, 1),
                (-1, -1),
            ],
            _ => continue,
        };
        let moves = board.legal_moves(id);
        for &(dr, dc) in dirs {
            let mut cur = piece.pos;
            let mut blocked = false;
            while let Some(next) = cur.offset(dr, dc) {
                let owner = occ.team_at(next);
                if blocked {
                    assert!(!moves.contains(next), "{next} beyond a blocker");
                } else if let Some(team) = owner {
                    assert_eq!(moves.contains(next), team != piece.team);
                    blocked = true;
                } else {
                    assert!(moves.contains(next));
                }
                cur = next;
            }
        }
    }
}

#[test]
fn test_pawn_move_rules() {
    let board = full_board(5);
    let occ = board.occupancy();
    for (id, piece) in board.living().filter(|(_, p)| p.kind == PieceKind::Pawn) {
        for to in board.legal_moves(id).iter() {
            if to.col() == piece.pos.col() {
                assert!(occ.is_empty(to));
            } else {
                assert_eq!(occ.team_at(to), Some(piece.team.opponent()));
            }
        }
    }
}

#[test]
fn test_clone_isolation() {
    let board = full_board(9);
    let mut clone = board.clone();
    let before_pieces: Vec<_> = board.pieces().map(|(id, p)| (id, *p)).collect();
    let before_log = board.turn_log().to_vec();

    let movers: Vec<PieceId> = clone.living_of(Team::Player).map(|(id, _)| id).collect();
    for id in movers {
        if let Some(to) = clone.legal_moves(id).iter().next() {
            clone.move_piece(id, to);
        }
    }
    clone.set_tile_effect(at("D5"), TileEffect::Warp);
    clone.apply_effects_to_all_pieces();

    let after_pieces: Vec<_> = board.pieces().map(|(id, p)| (id, *p)).collect();
    assert_eq!(before_pieces, after_pieces);
    assert_eq!(before_log, board.turn_log());
    assert_eq!(board.tile_effect(at("D5")), None);
}

#[test]
fn test_kill_credited_once() {
    let mut board = empty_board();
    let attacker = board.spawn("StarterRook", Team::Player, at("A1")).unwrap();
    let target = board.spawn("EarthRook1", Team::Ai, at("H8")).unwrap();
    for _ in 0..10 {
        board.damage_piece(attacker, target, 17);
    }
    assert_eq!(board.piece(attacker).unwrap().kills, 1);
    assert_eq!(board.piece(target).unwrap().health, 0);
}

#[test]
fn test_win_scenario() {
    let mut board = full_board(11);
    assert_eq!(board.check_win_condition(), None);
    let king = board.king_of(Team::Ai).unwrap();
    board.remove_piece(king).unwrap();
    let outcome = board.check_win_condition();
    assert_eq!(outcome, Some(Outcome::Winner(Team::Player)));
    assert_eq!(outcome.unwrap().label(), "Player Wins!");
}

/// Random legal play must keep living pieces on distinct tiles and the
/// win condition consistent with the Kings on the board.
#[test]
fn test_random_play_fuzz() {
    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut board = full_board(seed);
        board.apply_synergy_bonuses();
        board.set_tile_effect(at("D4"), TileEffect::Warp);
        board.set_tile_effect(at("E5"), TileEffect::Spiked);
        board.set_tile_effect(at("C6"), TileEffect::Burning);
        let mut team = Team::Player;

        for _ in 0..200 {
            if board.check_win_condition().is_some() {
                break;
            }
            board.begin_turn(team);
            board.apply_start_of_turn_effects(team);
            let options: Vec<(PieceId, Pos)> = board
                .living_of(team)
                .flat_map(|(id, _)| board.legal_moves(id).iter().map(move |to| (id, to)).collect::<Vec<_>>())
                .collect();
            if let Some(&(id, to)) = options.choose(&mut rng) {
                assert!(board.is_legal(id, to));
                board.move_piece(id, to);
            }

            let mut seen = HashSet::new();
            for (_, p) in board.living() {
                assert!(seen.insert(p.pos), "two living pieces on {}", p.pos);
                assert!(p.energy <= 10);
                assert!(p.level >= 1 && p.level <= 10);
            }
            let kings = |t| board.living_of(t).filter(|(_, p)| p.kind == PieceKind::King).count();
            assert!(kings(Team::Player) <= 1 && kings(Team::Ai) <= 1);
            team = team.opponent();
        }
    }
}
