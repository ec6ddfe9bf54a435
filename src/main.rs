//! Echo Duel - headless round runner
//!
//! Plays one round against the enemy AI with the scripted player standing in
//! for a human. Cues go to the log (`RUST_LOG=trace` to hear them), discrete
//! events optionally to stdout as JSON lines.

use std::path::PathBuf;

use clap::Parser;

use echo_duel::audio::LogAudioBackend;
use echo_duel::autoplay::{AutoPlayer, Defense};
use echo_duel::consts::MAX_FRAME_DT;
use echo_duel::cues::CueRouter;
use echo_duel::haptics::LogHapticBackend;
use echo_duel::persistence::{FileStore, KeyValueStore, MemoryStore};
use echo_duel::platform::{FixedStep, FrameClock};
use echo_duel::sim::{CombatEngine, CombatEvent, Difficulty, EventSink, RoundResult};
use echo_duel::{Settings, WinStreak};

/// Host frame rate being simulated
const FRAME_MS: f64 = 1000.0 / 60.0;

#[derive(Parser, Debug)]
#[command(name = "echo-duel")]
#[command(about = "Run an audio-first duel round headlessly", long_about = None)]
#[command(version)]
struct Args {
    /// Enemy difficulty (easy, normal, hard); defaults to the saved preference
    #[arg(short, long, value_parser = parse_difficulty)]
    difficulty: Option<Difficulty>,

    /// RNG seed for a reproducible round
    #[arg(short, long)]
    seed: Option<u64>,

    /// Give up after this much simulated time
    #[arg(long, default_value_t = 300.0)]
    max_seconds: f32,

    /// Print discrete events as JSON lines
    #[arg(long)]
    json: bool,

    /// Scripted player sidesteps strikes instead of guarding
    #[arg(long)]
    sidestep: bool,

    /// Scripted player reaction time in seconds
    #[arg(long, default_value_t = 0.18)]
    reaction: f32,

    /// Directory for settings and streak records (in-memory if omitted)
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn parse_difficulty(s: &str) -> Result<Difficulty, String> {
    Difficulty::from_str(s).ok_or_else(|| format!("unknown difficulty `{s}` (easy, normal, hard)"))
}

fn open_store(data_dir: Option<PathBuf>) -> Box<dyn KeyValueStore> {
    match data_dir {
        Some(dir) => match FileStore::open(dir.clone()) {
            Ok(store) => {
                log::info!("Using data directory {}", dir.display());
                Box::new(store)
            }
            Err(e) => {
                log::warn!("Falling back to in-memory storage: {}", e);
                Box::new(MemoryStore::new())
            }
        },
        None => Box::new(MemoryStore::new()),
    }
}

/// Everything the round's events fan out to
struct Listeners {
    cues: CueRouter<LogAudioBackend, LogHapticBackend>,
    player: AutoPlayer,
    json: bool,
}

impl Listeners {
    fn dispatch(&mut self, events: &[CombatEvent], elapsed: f32) {
        for event in events {
            self.cues.handle(event);
            self.player.observe(event);
            if self.json && event.is_discrete() {
                let line = serde_json::json!({ "t": elapsed, "event": event });
                println!("{line}");
            }
        }
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut store = open_store(args.data_dir);
    let settings = Settings::load(store.as_ref());
    let difficulty = args.difficulty.unwrap_or(settings.difficulty);
    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("Difficulty {}, seed {}", difficulty.as_str(), seed);

    let mut engine = CombatEngine::with_seed(difficulty, Vec::new(), seed);
    let defense = if args.sidestep {
        Defense::Sidestep
    } else {
        Defense::Guard
    };
    let mut cues = CueRouter::new(LogAudioBackend, LogHapticBackend);
    cues.apply_settings(&settings);
    let mut listeners = Listeners {
        cues,
        player: AutoPlayer::new(args.reaction, 0.12, defense, seed.wrapping_add(1)),
        json: args.json,
    };

    let mut clock = FrameClock::new();
    let mut fixed = FixedStep::default();
    let mut time_ms = 0.0;

    engine.start_round();
    let events: Vec<CombatEvent> = engine.sink_mut().drain(..).collect();
    listeners.dispatch(&events, 0.0);

    let max_seconds = args.max_seconds.max(MAX_FRAME_DT);
    while !engine.state().is_resolved() && engine.state().elapsed_time < max_seconds {
        time_ms += FRAME_MS;
        let frame_dt = clock.tick(time_ms);

        fixed.advance(frame_dt, |step| {
            engine.update(step);
            let actions = listeners.player.poll(step, engine.state());
            for action in actions {
                engine.handle_player_action(action);
            }
            let events: Vec<CombatEvent> = engine.sink_mut().drain(..).collect();
            listeners.dispatch(&events, engine.state().elapsed_time);
        });
    }

    let state = engine.state();
    let Some(result) = state.result else {
        println!(
            "Round unresolved after {:.1}s (player {}/{}, enemy {}/{})",
            state.elapsed_time,
            state.player.hp(),
            state.player.max_hp(),
            state.enemy.hp(),
            state.enemy.max_hp()
        );
        return;
    };

    let mut streak = WinStreak::load(store.as_ref());
    let new_best = streak.record(result, difficulty);
    streak.save(store.as_mut());

    let verdict = match result {
        RoundResult::PlayerWon => "Victory",
        RoundResult::PlayerLost => "Defeat",
    };
    println!(
        "{} on {} in {:.1}s (player {}/{}, enemy {}/{})",
        verdict,
        difficulty.as_str(),
        state.elapsed_time,
        state.player.hp(),
        state.player.max_hp(),
        state.enemy.hp(),
        state.enemy.max_hp()
    );
    println!(
        "Streak {} (best {}{}), record {}-{}",
        streak.current,
        streak.best,
        if new_best { ", new best" } else { "" },
        streak.wins,
        streak.losses
    );
}
