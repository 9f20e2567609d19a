//! Headless orrery session.
//!
//! Loads `config.ron` (created with defaults on first run), applies CLI
//! overrides and runtime settings, then simulates a fixed number of frames
//! and prints where the camera ended up.
//!
//! Run with `cargo run -p orrery-app -- --orbit Mars --frames 2000`.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use orrery_app::{AppError, FIXED_DT, GameLoop, Orrery, PlatformDirs};
use orrery_config::{CliArgs, Config};
use orrery_flight::{FreeMode, Setting};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "orrery", about = "Fly a camera through the solar system")]
struct AppArgs {
    #[command(flatten)]
    cli: CliArgs,

    /// Number of fixed-step frames to simulate.
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Fly to this body, then return to the menu.
    #[arg(long, conflicts_with = "orbit")]
    fly_to: Option<String>,

    /// Fly to this body, then orbit it.
    #[arg(long)]
    orbit: Option<String>,

    /// Runtime setting, `key=value`. May be repeated.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    settings: Vec<Setting>,

    /// Pace frames at wall-clock speed.
    #[arg(long)]
    realtime: bool,
}

fn main() -> ExitCode {
    let args = AppArgs::parse();

    let dirs = match &args.cli.config {
        Some(dir) => PlatformDirs::from_config_dir(dir),
        None => match PlatformDirs::resolve() {
            Ok(dirs) => dirs,
            Err(e) => {
                eprintln!("Failed to resolve platform directories: {e}");
                return ExitCode::FAILURE;
            }
        },
    };
    if let Err(e) = dirs.create_dirs() {
        eprintln!("Failed to create platform directories: {e}");
        return ExitCode::FAILURE;
    }

    let mut config = Config::load_or_create(&dirs.config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args.cli);
    config.ephemeris.data_dir = dirs.ephemeris_dir(&config.ephemeris.data_dir);

    orrery_log::init_logging(Some(&dirs.log_dir), config.debug.log_to_file, Some(&config));

    match run(&args, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &AppArgs, config: Config) -> Result<(), AppError> {
    let mut orrery = Orrery::headless_from_config(config)?;

    for setting in &args.settings {
        orrery.apply_setting(*setting)?;
    }

    if let Some(body) = &args.orbit {
        orrery.orbit(body)?;
    } else if let Some(body) = &args.fly_to {
        orrery.fly_to(body, None)?;
    } else {
        orrery.set_mode(FreeMode::NAME)?;
        orrery.on_pointer_lock_change(true)?;
    }

    let mut game_loop = GameLoop::new();
    let mut failure = None;
    while game_loop.update_count() < args.frames && failure.is_none() {
        let mut update = |dt: f64, _sim_time: f64| {
            if failure.is_none()
                && let Err(e) = orrery.frame(dt)
            {
                failure = Some(e);
            }
        };
        if args.realtime {
            game_loop.tick(&mut update, |_| {});
            std::thread::sleep(Duration::from_secs_f64(FIXED_DT));
        } else {
            game_loop.step_once(&mut update, |_| {});
        }
    }
    if let Some(e) = failure {
        return Err(e);
    }

    info!(
        "Simulated {} frames ({:.1}s)",
        game_loop.update_count(),
        game_loop.total_sim_time()
    );
    println!("{}", orrery.summary());
    Ok(())
}
