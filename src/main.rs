//! Brick Breaker headless driver
//!
//! Runs a session with a ball-tracking autopilot on a fixed 60 Hz clock and
//! prints the final snapshot as JSON. Pass a settings JSON file as the first
//! argument to override the defaults.

use std::process::ExitCode;

use brick_breaker::consts::FRAME_DT;
use brick_breaker::sim::{GameEvent, GameSession, ManualClock, PaddleDirection, SessionStatus};
use brick_breaker::{EngineError, Settings};

/// Stop after this many frames even if lives remain (10 minutes at 60 Hz)
const MAX_FRAMES: u64 = 60 * 60 * 10;

/// Dead zone around the paddle center where the autopilot holds still
const AUTOPILOT_DEAD_ZONE: f32 = 6.0;

fn load_settings() -> Result<Settings, EngineError> {
    match std::env::args().nth(1) {
        Some(path) => Settings::from_file(path),
        None => Ok(Settings::default()),
    }
}

fn autopilot(session: &GameSession<ManualClock>) -> PaddleDirection {
    let round = session.round();
    let offset = round.ball().pos.x - round.paddle().center_x();
    if offset < -AUTOPILOT_DEAD_ZONE {
        PaddleDirection::Left
    } else if offset > AUTOPILOT_DEAD_ZONE {
        PaddleDirection::Right
    } else {
        PaddleDirection::Stop
    }
}

fn run(settings: Settings) -> Result<(), EngineError> {
    let clock = ManualClock::new();
    let mut session = GameSession::with_clock(settings, clock.clone())?;

    session.on(|event| match event {
        GameEvent::Step { .. } => {}
        GameEvent::BrickDestroyed { column, row } => {
            log::debug!("brick ({column}, {row}) down")
        }
        other => match serde_json::to_string(other) {
            Ok(json) => log::info!("event {json}"),
            Err(err) => log::warn!("unserializable event {other:?}: {err}"),
        },
    });

    session.start();
    let mut frames = 0;
    while frames < MAX_FRAMES {
        session.set_paddle_direction(autopilot(&session));
        if session.update() == SessionStatus::Ended {
            break;
        }
        clock.advance(FRAME_DT);
        frames += 1;
    }

    let snapshot = session.snapshot();
    log::info!(
        "Finished after {} frames: score {}, lives {}",
        snapshot.frame,
        snapshot.score,
        snapshot.lives
    );
    println!("{}", snapshot.to_json()?);
    Ok(())
}

fn main() -> ExitCode {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();
    log::info!("Brick Breaker (headless) starting...");

    match load_settings().and_then(run) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
