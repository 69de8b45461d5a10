//! Monster Tactics
//!
//! Runs one match: AI against AI, or a human typing commands against the AI.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use monster_tactics_ai::{
    report, setup_board, AiController, AiResult, Controller, Difficulty, Match, MatchConfig,
    PlayerController,
};
use monster_tactics_core::{Board, Catalog, Pack, Team};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Both sides played by the AI
    AiVsAi,
    /// Player side reads commands from stdin
    PlayerVsAi,
}

#[derive(Parser, Debug)]
#[command(name = "tactics", version, about = "Chess-derived tactics with health, energy and abilities")]
struct Args {
    #[arg(long, value_enum, default_value_t = Mode::AiVsAi)]
    mode: Mode,

    /// Difficulty of every AI side
    #[arg(long, value_enum, default_value_t = Difficulty::Medium)]
    difficulty: Difficulty,

    /// Seed for rosters, tiles and AI randomness
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Pack for the Player side (random templates when omitted)
    #[arg(long, value_parser = parse_pack)]
    player_pack: Option<Pack>,

    /// Pack for the AI side (random templates when omitted)
    #[arg(long, value_parser = parse_pack)]
    ai_pack: Option<Pack>,

    /// Turns before the match is called off
    #[arg(long, default_value_t = 200)]
    max_turns: u32,

    /// Write the JSON match report here
    #[arg(long)]
    report: Option<PathBuf>,

    /// Skip the ambient tile sweep after each round
    #[arg(long)]
    no_tile_sweep: bool,
}

fn parse_pack(s: &str) -> Result<Pack, String> {
    Pack::from_name(s).ok_or_else(|| format!("unknown pack: {s}"))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    // Set up SIGINT handler for graceful shutdown
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        tracing::warn!("interrupt received, stopping after the current turn");
        r.store(false, Ordering::SeqCst);
    }) {
        tracing::warn!(error = %e, "could not install Ctrl-C handler");
    }

    match run(&args, running) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "match failed");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args, running: Arc<AtomicBool>) -> AiResult<()> {
    let catalog = Arc::new(Catalog::standard());
    let board = setup_board(catalog, args.player_pack, args.ai_pack, args.seed)?;
    print_preview(&board);

    let player: Box<dyn Controller> = match args.mode {
        Mode::AiVsAi => Box::new(AiController::new(
            Team::Player,
            args.difficulty,
            &board,
            args.seed.wrapping_add(1),
            running.clone(),
        )),
        Mode::PlayerVsAi => {
            println!("Commands: \"Pawn at A2 to A3\" or \"Queen at D1 ability\"");
            Box::new(PlayerController::new(Team::Player, prompt_lines()))
        }
    };
    let ai: Box<dyn Controller> = Box::new(AiController::new(
        Team::Ai,
        args.difficulty,
        &board,
        args.seed.wrapping_add(2),
        running.clone(),
    ));

    let config = MatchConfig {
        max_turns: args.max_turns,
        seed: args.seed,
        round_end_tile_sweep: !args.no_tile_sweep,
        ..MatchConfig::default()
    };
    let mut game = Match::new(board, player, ai, config, running);
    let summary = game.run();

    println!();
    for line in summary.summary_lines() {
        println!("{line}");
    }

    if let Some(path) = &args.report {
        report::save(path, &summary)?;
        tracing::info!(path = %path.display(), "report written");
    }
    Ok(())
}

fn print_preview(board: &Board) {
    for group in board.team_preview() {
        let synergy = if group.synergy_active { " (synergy active)" } else { "" };
        println!("{} - {}{synergy}", group.team, group.pack);
        for member in &group.members {
            println!("  {member}");
        }
    }
}

/// Stdin lines, each preceded by a prompt.
fn prompt_lines() -> impl Iterator<Item = String> {
    let mut lines = io::stdin().lock().lines();
    std::iter::from_fn(move || {
        print!("> ");
        io::stdout().flush().ok();
        lines.next()?.ok()
    })
}
