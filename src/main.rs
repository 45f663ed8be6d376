//! Fruit Mania headless runner
//!
//! Plays the game with the autopilot, forwards audio cues to a logging sink
//! and records finished rounds in the score database.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use fruit_mania::audio::{AudioSink, LogAudio};
use fruit_mania::autopilot::Autopilot;
use fruit_mania::consts::{FPS, MAX_SUBSTEPS, SIM_DT};
use fruit_mania::persistence::{MemoryStore, ScoreStore, SqliteStore};
use fruit_mania::renderer::draw_list;
use fruit_mania::sim::{Game, GameEvent, ModeKind};
use fruit_mania::{Settings, Tuning};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Classic,
    Arcade,
}

impl From<ModeArg> for ModeKind {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Classic => ModeKind::Classic,
            ModeArg::Arcade => ModeKind::Arcade,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless Fruit Mania runner", long_about = None)]
struct Args {
    /// RNG seed; the same seed replays the same run
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Simulated seconds to play
    #[arg(long, default_value_t = 90.0)]
    seconds: f32,
    /// Mode the autopilot picks on the menu
    #[arg(long, value_enum, default_value_t = ModeArg::Classic)]
    mode: ModeArg,
    /// Score database
    #[arg(long, default_value = "fruit-mania.db")]
    db: PathBuf,
    /// Keep scores in memory instead of the database
    #[arg(long)]
    memory: bool,
    /// Settings JSON
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Tuning JSON
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Pace the simulation at wall-clock speed
    #[arg(long)]
    realtime: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    log::info!("Fruit Mania (headless) starting, seed {}", args.seed);

    let settings = args
        .settings
        .as_deref()
        .map(Settings::load)
        .unwrap_or_default();
    let tuning = args.tuning.as_deref().map(Tuning::load).unwrap_or_default();

    let mut store: Box<dyn ScoreStore> = if args.memory {
        Box::new(MemoryStore::new())
    } else {
        Box::new(
            SqliteStore::open(&args.db)
                .with_context(|| format!("opening score database {}", args.db.display()))?,
        )
    };

    let mut game = Game::new(args.seed, tuning);
    let mut pilot = Autopilot::new(args.mode.into());
    let mut audio = LogAudio::new(&settings);
    let mut rounds = Vec::new();

    let total_ticks = (args.seconds.max(0.0) * FPS as f32).round() as u64;
    let started = Instant::now();
    let mut last = started;
    let mut accumulator = 0.0f32;
    let mut ticks = 0u64;

    while ticks < total_ticks && !game.should_quit() {
        let mut substeps = 1;
        if args.realtime {
            let now = Instant::now();
            accumulator += now.duration_since(last).as_secs_f32().min(0.1);
            last = now;
            substeps = 0;
            while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                accumulator -= SIM_DT;
                substeps += 1;
            }
        }

        for _ in 0..substeps {
            let input = pilot.input(&game);
            game.tick(&input, SIM_DT, store.as_mut())
                .with_context(|| format!("tick {}", ticks))?;
            ticks += 1;

            for event in game.drain_events() {
                match event {
                    GameEvent::Audio(command) => audio.dispatch(command),
                    GameEvent::ScoreSaved { mode, score } => {
                        log::info!("{} round finished with {}", mode.name(), score);
                        rounds.push(serde_json::json!({ "mode": mode.name(), "score": score }));
                    }
                    GameEvent::ScreenChanged(screen) => log::debug!("now on {:?}", screen),
                }
            }
        }

        if args.realtime {
            std::thread::sleep(Duration::from_secs_f32(SIM_DT / 2.0));
        }
    }

    let summary = serde_json::json!({
        "seed": args.seed,
        "ticks": ticks,
        "screen": format!("{:?}", game.screen_kind()),
        "score": game.mode().map(|m| m.ledger().score()),
        "rounds": rounds,
        "cues_played": audio.played(),
        "draw_commands": draw_list(&game, &settings).len(),
        "wall_ms": started.elapsed().as_millis() as u64,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("encoding summary")?
    );
    Ok(())
}
