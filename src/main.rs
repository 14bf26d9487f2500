//! Headless session runner
//!
//! Plays one match with a scripted human (or the autopilot) against the
//! configured mode and logs what happens.

use std::path::PathBuf;

use astro_clash::audio::{AudioManager, LogSink};
use astro_clash::consts::SIM_DT;
use astro_clash::render::vertex::as_bytes;
use astro_clash::render::{DrawList, banner, colors};
use astro_clash::sim::{Seat, Session, TickInput, tick};
use astro_clash::{ConfigError, Difficulty, Mode, SessionConfig};
use clap::Parser;
use rand::SeedableRng;
use rand_pcg::Pcg32;

/// Astro Clash headless runner
#[derive(Parser)]
#[command(version, about = "Run an Astro Clash session without a window")]
struct Cli {
    /// Original, cooperative, race or versus
    #[arg(long)]
    mode: Option<String>,

    /// Easy, medium or hard
    #[arg(long)]
    difficulty: Option<String>,

    /// Spare lives per ship
    #[arg(long)]
    lives: Option<u32>,

    /// Seed for the random stream
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Ticks to simulate (60 per second)
    #[arg(long, default_value_t = 3600)]
    ticks: u64,

    /// JSON session config; flags override its fields
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Let a cpu brain fly seat one
    #[arg(long)]
    autopilot: bool,

    /// Build a draw list every N ticks (0 disables)
    #[arg(long, default_value_t = 60)]
    frame_every: u64,
}

fn build_config(cli: &Cli) -> Result<SessionConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };
    if let Some(mode) = &cli.mode {
        config.mode = Mode::parse(mode)?;
    }
    if let Some(difficulty) = &cli.difficulty {
        config.difficulty = Difficulty::parse(difficulty)?;
    }
    if let Some(lives) = cli.lives {
        config.lives = lives;
    }
    config.autopilot |= cli.autopilot;
    config.validate()?;
    Ok(config)
}

/// Key edges for the scripted pilot: a two second loop of thrust, turns
/// and steady fire
fn scripted_input(t: u64) -> TickInput {
    let mut input = TickInput::default();
    match t % 120 {
        0 => {
            input.pressed.thrust = true;
            input.pressed.turn_left = true;
        }
        30 => input.released.thrust = true,
        45 => input.released.turn_left = true,
        60 => input.pressed.turn_right = true,
        90 => input.released.turn_right = true,
        _ => {}
    }
    input.pressed.fire = t % 15 == 0;
    input
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let mut rng = Pcg32::seed_from_u64(cli.seed);
    let mut session = match Session::new(&config, &mut rng) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Could not start session: {e}");
            std::process::exit(1);
        }
    };
    let mut audio = AudioManager::new(LogSink::default(), config.audio_enabled);

    for t in 0..cli.ticks {
        let input = if config.autopilot {
            TickInput::default()
        } else {
            scripted_input(t)
        };
        tick(&mut session, &input, SIM_DT, &mut rng);

        audio.dispatch(&session.drain_events());
        audio.set_thrusting(
            session
                .ship_in_seat(Seat::One)
                .is_some_and(|ship| ship.speeding && !ship.is_dead()),
        );

        if cli.frame_every > 0 && t % cli.frame_every == 0 {
            let frame = DrawList::build(&session);
            let vertices = frame.vertices();
            log::debug!(
                "tick {t}: {} shapes, {} vertex bytes on {:?}, hud {:?}",
                frame.shapes.len(),
                as_bytes(&vertices).len(),
                colors::BACKGROUND,
                frame.text.iter().map(|line| line.text.as_str()).collect::<Vec<_>>()
            );
        }

        if session.is_over() {
            break;
        }
    }

    let result = session
        .outcome
        .map(banner)
        .unwrap_or_else(|| "Still playing".to_string());
    log::info!(
        "{} after {} ticks, level {}: {}",
        session.mode.as_str(),
        session.time_ticks,
        session.level,
        result
    );
    for ship in &session.ships {
        log::info!(
            "{}: {} kills, {} lives left",
            ship.seat.label(),
            ship.kills,
            ship.lives
        );
    }
    log::info!("{} sound cues played", audio.sink().played);
}
