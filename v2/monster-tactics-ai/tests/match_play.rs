//! Search, controllers and full matches through the public API.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use monster_tactics_ai::rollout::monte_carlo_scores;
use monster_tactics_ai::{
    alpha_beta, apply_command, best_move_alpha_beta, evaluate, setup_board, Action, AiController,
    CommandError, Controller, Difficulty, Match, MatchConfig, PlayerController, SearchConfig,
    SearchContext,
};
use monster_tactics_core::{Board, Catalog, Outcome, Pack, Personality, Pos, Team};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn at(label: &str) -> Pos {
    label.parse().unwrap()
}

fn board_with(pieces: &[(&str, Team, &str)]) -> Board {
    let mut board = Board::new(Arc::new(Catalog::standard()), 17);
    for &(name, team, label) in pieces {
        board.spawn(name, team, at(label)).unwrap();
    }
    board
}

fn running() -> Arc<AtomicBool> {
    Arc::new(AtomicBool::new(true))
}

/// Player Rook on an open file with the AI King.
fn king_on_open_file() -> Board {
    board_with(&[
        ("StarterKing", Team::Player, "A1"),
        ("StarterRook", Team::Player, "E1"),
        ("StarterKing", Team::Ai, "E8"),
    ])
}

#[test]
fn test_depth_zero_is_static_evaluation() {
    let board = setup_board(Arc::new(Catalog::standard()), None, None, 21).unwrap();
    for team in [Team::Player, Team::Ai] {
        let mut ctx = SearchContext::unbounded();
        let score = alpha_beta(&board, 0, i32::MIN, i32::MAX, team, team, &mut ctx);
        assert_eq!(score, evaluate(&board, team));
    }
}

#[test]
fn test_best_move_at_depth_zero_is_static() {
    let board = king_on_open_file();
    let mut ctx = SearchContext::unbounded();
    let (first, score) = best_move_alpha_beta(&board, Team::Player, 0, &mut ctx).unwrap();
    assert_eq!(score, evaluate(&board, Team::Player));
    assert_eq!(first.to, at("B1"));
    assert_eq!(ctx.stats.nodes, 0);

    let (best, score) = best_move_alpha_beta(&board, Team::Player, 1, &mut ctx).unwrap();
    assert_eq!(best.to, at("E8"));
    assert!(score > evaluate(&board, Team::Player));
}

#[test]
fn test_alpha_beta_finds_king_capture() {
    let board = king_on_open_file();
    let mut ctx = SearchContext::unbounded();
    let (best, score) = best_move_alpha_beta(&board, Team::Player, 2, &mut ctx).unwrap();
    assert_eq!(best.to, at("E8"));
    // The AI King's material is gone; the Rook may also have levelled up
    assert!(score >= evaluate(&board, Team::Player) + 56);
}

#[test]
fn test_monte_carlo_king_capture_wins() {
    let board = king_on_open_file();
    let mut rng = StdRng::seed_from_u64(2024);
    let mut ctx = SearchContext::unbounded();
    let scores = monte_carlo_scores(&board, Team::Player, 100, 50, &mut rng, &mut ctx);
    let (_, rate) = scores.iter().find(|(c, _)| c.to == at("E8")).unwrap();
    assert!(*rate >= 0.9, "win rate {rate}");
    assert!(ctx.stats.rollouts >= 100);
}

#[test]
fn test_easy_ai_takes_free_queen() {
    let mut board = board_with(&[
        ("StarterKing", Team::Player, "H1"),
        ("StarterQueen", Team::Player, "A3"),
        ("StarterKing", Team::Ai, "E8"),
        ("StarterRook", Team::Ai, "A8"),
    ]);
    let queen = board.piece_at(at("A3")).unwrap();
    let rook = board.piece_at(at("A8")).unwrap();
    let mut ai = AiController::new(Team::Ai, Difficulty::Easy, &board, 1, running())
        .with_personality(Personality::Balanced);

    let action = ai.take_turn(&mut board);
    assert_eq!(action, Some(Action::Move { piece: rook, to: at("A3") }));
    assert_eq!(board.piece(queen).unwrap().health, 0);
}

#[test]
fn test_medium_ai_takes_the_king() {
    let mut board = board_with(&[
        ("StarterKing", Team::Player, "A1"),
        ("StarterKing", Team::Ai, "H8"),
        ("StarterRook", Team::Ai, "A8"),
    ]);
    let mut ai = AiController::new(Team::Ai, Difficulty::Medium, &board, 1, running());
    ai.take_turn(&mut board);
    assert_eq!(board.check_win_condition(), Some(Outcome::Winner(Team::Ai)));
    assert!(ai.stats().nodes > 0);
}

#[test]
fn test_ai_with_nothing_to_do_passes() {
    let mut board = board_with(&[("StarterKing", Team::Player, "A1")]);
    let mut ai = AiController::new(Team::Ai, Difficulty::Hard, &board, 1, running());
    assert_eq!(ai.choose_action(&board), None);
    board.spawn("StarterKing", Team::Ai, at("H8")).unwrap();
    assert!(ai.choose_action(&board).is_some());
}

#[test]
fn test_rejected_commands_leave_board_unchanged() {
    let mut board = board_with(&[
        ("StarterKing", Team::Player, "E1"),
        ("StarterPawn", Team::Player, "A2"),
        ("StarterKing", Team::Ai, "E8"),
    ]);
    let before: Vec<_> = board.pieces().map(|(id, p)| (id, *p)).collect();
    let log_len = board.turn_log().len();

    assert_eq!(
        apply_command(&mut board, Team::Player, "Pawn at A2 to A4"),
        Err(CommandError::IllegalMove { to: "A4".to_string() })
    );
    assert!(matches!(
        apply_command(&mut board, Team::Player, "Knight at A2 to A3"),
        Err(CommandError::NoSuchPiece { .. })
    ));
    assert!(matches!(
        apply_command(&mut board, Team::Player, "King at E8 to E7"),
        Err(CommandError::NoSuchPiece { .. })
    ));
    assert_eq!(
        apply_command(&mut board, Team::Player, "Pawn at A2 ability"),
        Err(CommandError::AbilityRejected)
    );

    let after: Vec<_> = board.pieces().map(|(id, p)| (id, *p)).collect();
    assert_eq!(before, after);
    assert_eq!(board.turn_log().len(), log_len);
}

#[test]
fn test_player_retries_until_valid() {
    let mut board = board_with(&[
        ("StarterKing", Team::Player, "E1"),
        ("StarterPawn", Team::Player, "A2"),
        ("StarterKing", Team::Ai, "E8"),
    ]);
    let pawn = board.piece_at(at("A2")).unwrap();
    let commands = ["pawn at a2 to a4", "go north", "Pawn at A2 to A3", "King at E1 to E2"]
        .into_iter()
        .map(String::from);
    let mut player = PlayerController::new(Team::Player, commands);

    assert_eq!(player.take_turn(&mut board), Some(Action::Move { piece: pawn, to: at("A3") }));
    assert_eq!(board.piece(pawn).unwrap().pos, at("A3"));

    // One command left, then the source is dry
    assert!(player.take_turn(&mut board).is_some());
    assert_eq!(player.take_turn(&mut board), None);
    assert!(board.turn_log().last().unwrap().contains("passes"));
}

#[test]
fn test_short_match_terminates_and_repeats() {
    let play = || {
        let board = setup_board(Arc::new(Catalog::standard()), Some(Pack::Fire), Some(Pack::Cyber), 3).unwrap();
        let player = AiController::new(Team::Player, Difficulty::Easy, &board, 4, running());
        let ai = AiController::new(Team::Ai, Difficulty::Easy, &board, 5, running());
        let config = MatchConfig {
            max_turns: 30,
            seed: 3,
            ..MatchConfig::default()
        };
        let mut game = Match::new(board, Box::new(player), Box::new(ai), config, running());
        let report = game.run();
        assert_eq!(game.history().len(), report.turns as usize);
        report
    };

    let report = play();
    assert!(report.turns <= 30);
    assert!(
        ["Player Wins!", "AI Wins!", "Draw!", "Turn limit reached"].contains(&report.result.as_str()),
        "{}",
        report.result
    );
    assert_eq!(report, play());
}

#[test]
fn test_hard_match_runs() {
    let board = setup_board(Arc::new(Catalog::standard()), None, None, 12).unwrap();
    let search = SearchConfig {
        depth: 0,
        simulations: 2,
        max_rollout_plies: 10,
    };
    let player = AiController::new(Team::Player, Difficulty::Hard, &board, 1, running()).with_config(search);
    let ai = AiController::new(Team::Ai, Difficulty::Medium, &board, 2, running()).with_config(SearchConfig {
        depth: 1,
        ..search
    });
    let config = MatchConfig {
        max_turns: 4,
        ..MatchConfig::default()
    };
    let mut game = Match::new(board, Box::new(player), Box::new(ai), config, running());
    let report = game.run();
    assert_eq!(report.turns, 4);
    assert_eq!(report.result, "Turn limit reached");
    assert!(game.rewind(1));
    assert_eq!(game.board().turn(), 1);
}

#[test]
fn test_interrupted_match_stops_immediately() {
    let board = setup_board(Arc::new(Catalog::standard()), None, None, 1).unwrap();
    let stop = Arc::new(AtomicBool::new(false));
    let player = AiController::new(Team::Player, Difficulty::Easy, &board, 1, stop.clone());
    let ai = AiController::new(Team::Ai, Difficulty::Easy, &board, 2, stop.clone());
    let mut game = Match::new(board, Box::new(player), Box::new(ai), MatchConfig::default(), stop);
    let report = game.run();
    assert_eq!(report.result, "Interrupted");
    assert_eq!(report.turns, 0);
    assert!(game.history().is_empty());
}
