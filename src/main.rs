//! Arcade Sim headless runner
//!
//! Plays one seeded game with a simple built-in autopilot and prints a JSON
//! summary. Useful for balance checks and for confirming that a seed replays
//! identically.

use std::path::PathBuf;
use std::process::ExitCode;

use arcade_sim::sim::{GameEvent, MoveKeys};
use arcade_sim::{BossFight, BossInput, ShooterGame, ShooterInput, Tuning};
use clap::{Parser, ValueEnum};
use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum GameKind {
    Boss,
    Shooter,
}

#[derive(Parser, Debug)]
#[command(name = "arcade-sim", version)]
#[command(about = "Play one seeded arcade game headlessly and print a JSON summary")]
struct Args {
    /// Game to simulate
    #[arg(long, value_enum, default_value_t = GameKind::Boss)]
    game: GameKind,
    /// RNG seed
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Maximum ticks to run at 60 Hz
    #[arg(long, default_value_t = 36_000)]
    ticks: u64,
    /// First shooter wave
    #[arg(long, default_value_t = 1)]
    start_wave: u32,
    /// JSON balance overrides
    #[arg(long)]
    tuning: Option<PathBuf>,
}

fn load_tuning(path: Option<&PathBuf>) -> Result<Tuning, String> {
    let Some(path) = path else {
        return Ok(Tuning::default());
    };
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let tuning = Tuning::from_json(&json).map_err(|e| format!("{}: {e}", path.display()))?;
    log::info!("Loaded tuning from {}", path.display());
    Ok(tuning)
}

/// Strafe under the boss and keep firing at it, healing below half health
fn boss_autopilot(fight: &BossFight) -> BossInput {
    let strafe = if (fight.time_ticks / 90) % 2 == 0 { 1.0 } else { -1.0 };
    let target = Vec2::new(fight.boss.pos.x + strafe * 200.0, fight.bounds.height() - 160.0);
    BossInput {
        movement: MoveKeys::toward(fight.player.pos, target, 4.0),
        pointer: fight.boss.pos,
        fire: true,
        fire_held: true,
        heal: fight.player.health.ratio() < 0.5,
    }
}

/// Chase the nearest pickup, otherwise sweep along the bottom
fn shooter_autopilot(game: &ShooterGame) -> ShooterInput {
    let ship = game.ship.pos;
    let target = game
        .pickups
        .iter()
        .min_by(|a, b| {
            a.pos
                .distance_squared(ship)
                .total_cmp(&b.pos.distance_squared(ship))
        })
        .map(|p| p.pos)
        .unwrap_or_else(|| {
            let w = game.bounds.width();
            let x = if (game.time_ticks / 120) % 2 == 0 { w * 0.125 } else { w * 0.875 };
            Vec2::new(x, game.bounds.height() - 72.0)
        });
    ShooterInput {
        movement: MoveKeys::toward(ship, target, 4.0),
    }
}

#[derive(Debug, Default)]
struct EventTally {
    total: usize,
    modes: usize,
    heals: usize,
    boosts: usize,
    waves_cleared: usize,
    bosses: usize,
}

impl EventTally {
    fn add(&mut self, events: Vec<GameEvent>) {
        for event in events {
            self.total += 1;
            match event {
                GameEvent::ModeActivated { .. } => self.modes += 1,
                GameEvent::HealUsed { .. } => self.heals += 1,
                GameEvent::BoostCollected { .. } => self.boosts += 1,
                GameEvent::WaveCleared { .. } => self.waves_cleared += 1,
                GameEvent::BossSpawned { .. } => self.bosses += 1,
                _ => {}
            }
        }
    }
}

fn run_boss(args: &Args, tuning: Tuning) -> serde_json::Value {
    let mut fight = BossFight::new(args.seed, tuning.boss);
    let mut tally = EventTally::default();
    while fight.time_ticks < args.ticks && !fight.is_over() {
        let input = boss_autopilot(&fight);
        fight.tick(&input);
        tally.add(fight.drain_events());
    }
    serde_json::json!({
        "game": "boss",
        "seed": args.seed,
        "ticks": fight.time_ticks,
        "outcome": fight.outcome(),
        "player_health": fight.player.health.current(),
        "boss_health": fight.boss.health.current(),
        "active_mode": fight.player.weapons.active(),
        "modes_activated": tally.modes,
        "heals_used": tally.heals,
        "events": tally.total,
    })
}

fn run_shooter(args: &Args, tuning: Tuning) -> serde_json::Value {
    let mut game = ShooterGame::new(args.seed, args.start_wave, tuning.shooter);
    let mut tally = EventTally::default();
    while game.time_ticks < args.ticks && !game.is_over() {
        let input = shooter_autopilot(&game);
        game.tick(&input);
        tally.add(game.drain_events());
    }
    serde_json::json!({
        "game": "shooter",
        "seed": args.seed,
        "ticks": game.time_ticks,
        "outcome": game.outcome(),
        "wave": game.wave(),
        "waves_cleared": tally.waves_cleared,
        "bosses_spawned": tally.bosses,
        "score": game.score(),
        "lives": game.lives(),
        "boosts_collected": tally.boosts,
        "events": tally.total,
    })
}

fn main() -> ExitCode {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let args = Args::parse();
    let tuning = match load_tuning(args.tuning.as_ref()) {
        Ok(tuning) => tuning,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    log::info!("Arcade Sim: {:?}, seed {}, up to {} ticks", args.game, args.seed, args.ticks);
    let summary = match args.game {
        GameKind::Boss => run_boss(&args, tuning),
        GameKind::Shooter => run_shooter(&args, tuning),
    };
    let outcome = summary["outcome"].clone();
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    }
    log::info!("Finished: {outcome}");
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("arcade-sim").chain(args.iter().copied()))
    }

    fn args_with_ticks(ticks: u64) -> Args {
        let mut args = parse(&[]).unwrap();
        args.ticks = ticks;
        args
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.game, GameKind::Boss);
        assert_eq!(args.seed, 1);
        assert_eq!(args.ticks, 36_000);
        assert_eq!(args.start_wave, 1);
        assert!(args.tuning.is_none());
    }

    #[test]
    fn test_full_command_line() {
        let args = parse(&[
            "--game", "shooter", "--seed", "99", "--ticks", "600", "--start-wave", "5",
        ])
        .unwrap();
        assert_eq!(args.game, GameKind::Shooter);
        assert_eq!(args.seed, 99);
        assert_eq!(args.ticks, 600);
        assert_eq!(args.start_wave, 5);
    }

    #[test]
    fn test_equals_form_is_accepted() {
        let args = parse(&["--seed=5", "--tuning=balance.json"]).unwrap();
        assert_eq!(args.seed, 5);
        assert_eq!(args.tuning, Some(PathBuf::from("balance.json")));
    }

    #[test]
    fn test_help_version_and_errors() {
        use clap::error::ErrorKind;

        assert_eq!(parse(&["--help"]).unwrap_err().kind(), ErrorKind::DisplayHelp);
        assert_eq!(parse(&["--version"]).unwrap_err().kind(), ErrorKind::DisplayVersion);
        assert_eq!(parse(&["--game", "pong"]).unwrap_err().kind(), ErrorKind::InvalidValue);
        assert!(parse(&["--seed"]).is_err());
        assert_eq!(parse(&["--ticks", "lots"]).unwrap_err().kind(), ErrorKind::ValueValidation);
        assert_eq!(parse(&["--fast"]).unwrap_err().kind(), ErrorKind::UnknownArgument);
        assert_eq!(
            parse(&["--seed", "1", "--seed", "2"]).unwrap_err().kind(),
            ErrorKind::ArgumentConflict
        );
    }

    #[test]
    fn test_short_runs_summarize() {
        let args = args_with_ticks(300);
        let boss = run_boss(&args, Tuning::default());
        assert_eq!(boss["ticks"], 300);
        let shooter = run_shooter(&args, Tuning::default());
        assert_eq!(shooter["outcome"], "Running");
    }
}
