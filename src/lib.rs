//! Brick Breaker - A deterministic Breakout-style arcade engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (motion, collisions, rounds, sessions)
//! - `settings`: Data-driven arena, paddle, ball and brick layout
//! - `error`: Construction-time failures
//!
//! Rendering and input capture live outside this crate. The engine consumes
//! [`sim::PaddleDirection`] intents and produces [`sim::Snapshot`] values.

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{EngineError, Result};
pub use settings::{BallSettings, BrickLayout, PaddleSettings, Settings};

use std::f32::consts::TAU;

/// Game configuration constants
pub mod consts {
    use std::time::Duration;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 480.0;
    pub const ARENA_HEIGHT: f32 = 320.0;

    /// Ball defaults (speed is in pixels per frame)
    pub const BALL_RADIUS: f32 = 10.0;
    pub const BALL_START_SPEED: f32 = 4.0;
    /// Start position as a divisor of the arena size: (w / 2, h / 1.5)
    pub const BALL_START_X_DIVISOR: f32 = 2.0;
    pub const BALL_START_Y_DIVISOR: f32 = 1.5;

    /// Speed gained on every brick hit
    pub const BRICK_HIT_ACCEL: f32 = 0.1;
    /// Extra speed gained when the grid is cleared
    pub const ALL_CLEAR_ACCEL: f32 = 0.5;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 75.0;
    pub const PADDLE_HEIGHT: f32 = 10.0;
    /// Gap between the paddle bottom and the arena floor
    pub const PADDLE_BOTTOM_MARGIN: f32 = 10.0;
    pub const PADDLE_SPEED: f32 = 7.0;
    /// Keeps edge hits short of a horizontal heading
    pub const PADDLE_BOUNCE_DAMPING: f32 = 0.8;

    /// Brick grid layout
    pub const BRICK_COLUMNS: usize = 5;
    pub const BRICK_ROWS: usize = 3;
    pub const BRICK_WIDTH: f32 = 75.0;
    pub const BRICK_HEIGHT: f32 = 20.0;
    pub const BRICK_PADDING: f32 = 10.0;
    pub const BRICK_OFFSET_TOP: f32 = 30.0;
    pub const BRICK_OFFSET_LEFT: f32 = 30.0;
    /// Upper bound on columns x rows accepted from settings
    pub const MAX_BRICK_CELLS: usize = 4096;

    /// Scoring
    pub const BASE_SCORE: u32 = 1;
    pub const ALL_CLEAR_BONUS: u32 = 10;

    /// Lives at session start
    pub const INITIAL_LIVES: i32 = 2;

    /// Delay between an all-clear and the fresh grid
    pub const GRID_REGEN_DELAY: Duration = Duration::from_millis(500);

    /// Frame period used by fixed-step drivers (60 Hz)
    pub const FRAME_DT: Duration = Duration::from_micros(16_667);
}

/// Normalize an angle to [0, 2π)
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid may round tiny negatives up to exactly TAU
    if wrapped >= TAU { 0.0 } else { wrapped }
}
