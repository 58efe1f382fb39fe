//! Minigolf entry point
//!
//! Runs a full session with two auto-players, headless by default.
//!
//! Usage: `minigolf [settings.json] [--seed N] [--realtime] [--max-ticks N] [--snapshot out.json]`

use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use minigolf::sim::{GameEvent, PLAYER_COLORS, Player, Snapshot, Sphere, TickInput, step};
use minigolf::sim::{Game, default_catalog};
use minigolf::{AutoPlayer, Settings, SimulationHandle};

const DEFAULT_MAX_TICKS: u64 = 200_000;
const PLAYER_NAMES: [&str; 2] = ["Player 1", "Player 2"];

#[derive(Debug, Default)]
struct Args {
    settings: Option<PathBuf>,
    seed: u64,
    realtime: bool,
    max_ticks: Option<u64>,
    snapshot: Option<PathBuf>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => parsed.seed = parse_value(&arg, args.next())?,
            "--max-ticks" => parsed.max_ticks = Some(parse_value(&arg, args.next())?),
            "--realtime" => parsed.realtime = true,
            "--snapshot" => {
                let path = args.next().ok_or("--snapshot needs a path")?;
                parsed.snapshot = Some(path.into());
            }
            flag if flag.starts_with("--") => return Err(format!("unknown flag {flag}")),
            path => parsed.settings = Some(path.into()),
        }
    }
    Ok(parsed)
}

fn parse_value(flag: &str, value: Option<String>) -> Result<u64, String> {
    let value = value.ok_or_else(|| format!("{flag} needs a value"))?;
    value
        .parse()
        .map_err(|e| format!("invalid value for {flag}: {value} ({e})"))
}

fn load_settings(path: Option<&PathBuf>) -> Settings {
    let Some(path) = path else {
        return Settings::default();
    };
    Settings::load(path).unwrap_or_else(|e| {
        log::error!("{e}; using default settings");
        Settings::default()
    })
}

fn new_game(settings: &Settings) -> Game {
    let players = PLAYER_NAMES
        .iter()
        .zip(PLAYER_COLORS)
        .map(|(name, color)| Player::new(*name).with_ball(Sphere::default().with_color(color)))
        .collect();
    Game::new(players, default_catalog(), settings.rules.clone())
}

/// Print events; `true` once the session is over
fn report(events: Vec<GameEvent>) -> bool {
    let mut over = false;
    for event in events {
        match &event {
            GameEvent::HoleCompleted { .. } | GameEvent::LevelStarted { .. } => println!("{event}"),
            GameEvent::GameOver { .. } => {
                println!("{event}");
                over = true;
            }
            _ => log::debug!("{event}"),
        }
    }
    over
}

fn run_headless(settings: &Settings, args: &Args) -> Snapshot {
    let mut game = new_game(settings);
    let mut auto = AutoPlayer::new(args.seed);
    let dt = settings.physics.delta_time();
    let max_ticks = args.max_ticks.unwrap_or(DEFAULT_MAX_TICKS);

    for _ in 0..max_ticks {
        let input = TickInput {
            shot: auto.aim(&game, &settings.physics),
        };
        step(&mut game, &input, &settings.physics, dt);
        if report(game.drain_events()) {
            return game.snapshot(&settings.debug);
        }
    }
    log::warn!("Stopped after {max_ticks} ticks");
    game.snapshot(&settings.debug)
}

fn run_realtime(settings: &Settings, args: &Args) -> Snapshot {
    let mut auto = AutoPlayer::new(args.seed);
    let physics = settings.physics.clone();
    let mut handle = SimulationHandle::spawn(new_game(settings), settings.clone());
    let poll = Duration::from_secs_f32(settings.physics.delta_time());
    let mut polls = 0;

    loop {
        thread::sleep(poll);
        if let Some(shot) = handle.with_game(|game| auto.aim(game, &physics)) {
            handle.shoot(shot);
        }
        if report(handle.drain_events()) {
            break;
        }
        polls += 1;
        if args.max_ticks.is_some_and(|max| polls >= max) {
            log::warn!("Stopped after {polls} polls");
            break;
        }
    }

    let snapshot = handle.snapshot();
    handle.stop();
    snapshot
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            log::error!("{e}");
            eprintln!(
                "usage: minigolf [settings.json] [--seed N] [--realtime] [--max-ticks N] [--snapshot out.json]"
            );
            return ExitCode::from(2);
        }
    };

    let settings = load_settings(args.settings.as_ref());
    log::info!("Minigolf starting (seed {})", args.seed);

    let snapshot = if args.realtime {
        run_realtime(&settings, &args)
    } else {
        run_headless(&settings, &args)
    };

    if let Some(path) = &args.snapshot {
        let written = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| e.to_string())
            .and_then(|json| std::fs::write(path, json).map_err(|e| e.to_string()));
        match written {
            Ok(()) => log::info!("Snapshot written to {}", path.display()),
            Err(e) => {
                log::error!("Failed to write snapshot {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}
