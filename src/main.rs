//! tetrs-sim - headless runner for the TETRS engine
//!
//! Plays a game with the placement bot at the fixed tick rate, without
//! sleeping, and reports how it went.

use std::path::PathBuf;

use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use tetrs_engine::autoplay::{Autoplay, Weights};
use tetrs_engine::config::TICK_RATE;
use tetrs_engine::settings::Settings;
use tetrs_engine::{Action, Error, Event, Game, Mode, TICK};

#[derive(Parser, Debug)]
#[command(name = "tetrs-sim", version, about = "Run a headless TETRS game with the placement bot")]
struct Cli {
    /// Simulated seconds to play before stopping
    #[arg(long, default_value_t = 120)]
    seconds: u64,

    /// Bag seed, overrides the one in settings
    #[arg(long)]
    seed: Option<u64>,

    /// Print every event as a JSON line
    #[arg(long)]
    events: bool,

    /// Don't record the result or write settings
    #[arg(long)]
    no_save: bool,
}

/// Get the tetrs temp directory, creating it if needed
fn tetrs_temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join("tetrs");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn main() -> Result<(), Error> {
    let cli = Cli::parse();

    // Generate session ID for this run
    let session_id: u32 = rand::random();
    let tetrs_dir = tetrs_temp_dir();
    let log_file = format!("{:08x}.log", session_id);

    // Setup tracing to log file
    let file_appender = tracing_appender::rolling::never(&tetrs_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tetrs_engine=debug,tetrs_sim=debug")),
        )
        .with_ansi(false)
        .init();

    info!(
        "tetrs-sim starting up, session={:08x}, log={}",
        session_id,
        tetrs_dir.join(&log_file).display()
    );

    let mut settings = Settings::load();
    let mut config = settings.gameplay.to_config();
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }

    let mut game = Game::new(config);
    let rules = game.config();
    info!(
        "rules: lock_delay={:?}, max_lock_resets={}, soft_drop_factor={}, seed={:?}",
        rules.lock_delay, rules.max_lock_resets, rules.soft_drop_factor, rules.seed
    );
    let bot = Autoplay::new(Weights::default());
    game.enqueue(Action::StartGame);

    let total_ticks = cli.seconds.saturating_mul(TICK_RATE);
    for tick in 0..total_ticks {
        let events = game.tick(TICK);

        if cli.events {
            for event in &events {
                println!("{}", serde_json::to_string(event)?);
            }
        }

        // Plan once per piece, right after it appears
        if events.iter().any(|e| matches!(e, Event::PieceSpawned { .. })) {
            if let (Some(board), Some(piece)) = (game.board(), game.active_piece()) {
                for action in bot.plan(board, piece) {
                    game.enqueue(action);
                }
            }
        }

        if game.mode() == Mode::GameOver {
            debug!(tick, "game over, stopping");
            break;
        }
    }

    println!("\n🦀 Thanks for playing TETRS! 🦀");
    let Some(stats) = game.final_stats() else {
        return Ok(());
    };

    println!("Result: {}", game.mode().name());
    println!("Final Score: {}", stats.score);
    println!("Level: {} | Lines: {}", stats.level, stats.lines);
    println!(
        "Pieces: {} | Time: {:.1}s",
        stats.pieces,
        stats.elapsed_ms as f64 / 1000.0
    );

    if !cli.no_save {
        if let Some(rank) = settings.high_scores.insert(&stats) {
            println!("New high score! Rank #{}", rank + 1);
        }
        if let Err(e) = settings.save() {
            warn!("could not save settings: {}", e);
            eprintln!("Warning: Could not save settings: {}", e);
        }
    }

    game.apply(Action::Quit);
    info!("tetrs-sim done, score={}", stats.score);
    Ok(())
}
