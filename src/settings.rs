//! Engine settings
//!
//! Arena, ball, paddle and brick layout, loadable from JSON. Missing keys
//! fall back to the defaults in [`crate::consts`].

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{EngineError, Result};

/// Ball spawn parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallSettings {
    pub radius: f32,
    /// Speed in pixels per frame
    pub speed: f32,
    /// Spawn x = arena width / this
    pub start_x_divisor: f32,
    /// Spawn y = arena height / this
    pub start_y_divisor: f32,
}

impl Default for BallSettings {
    fn default() -> Self {
        Self {
            radius: BALL_RADIUS,
            speed: BALL_START_SPEED,
            start_x_divisor: BALL_START_X_DIVISOR,
            start_y_divisor: BALL_START_Y_DIVISOR,
        }
    }
}

/// Paddle geometry and speed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaddleSettings {
    pub width: f32,
    pub height: f32,
    /// Gap between the paddle bottom and the arena floor
    pub bottom_margin: f32,
    /// Horizontal speed in pixels per frame
    pub speed: f32,
}

impl Default for PaddleSettings {
    fn default() -> Self {
        Self {
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
            bottom_margin: PADDLE_BOTTOM_MARGIN,
            speed: PADDLE_SPEED,
        }
    }
}

/// Fixed brick grid layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrickLayout {
    pub columns: usize,
    pub rows: usize,
    pub width: f32,
    pub height: f32,
    pub padding: f32,
    pub offset_top: f32,
    pub offset_left: f32,
}

impl Default for BrickLayout {
    fn default() -> Self {
        Self {
            columns: BRICK_COLUMNS,
            rows: BRICK_ROWS,
            width: BRICK_WIDTH,
            height: BRICK_HEIGHT,
            padding: BRICK_PADDING,
            offset_top: BRICK_OFFSET_TOP,
            offset_left: BRICK_OFFSET_LEFT,
        }
    }
}

impl BrickLayout {
    /// Total number of cells in the grid, `None` on overflow
    pub fn cell_count(&self) -> Option<usize> {
        self.columns.checked_mul(self.rows)
    }

    /// Reject empty or oversized grids and non-positive cell sizes
    pub fn validate(&self) -> Result<()> {
        if self.columns == 0 || self.rows == 0 {
            return Err(EngineError::InvalidSettings {
                field: "bricks",
                reason: "grid needs at least one column and one row",
            });
        }
        match self.cell_count() {
            Some(cells) if cells <= MAX_BRICK_CELLS => {}
            _ => {
                return Err(EngineError::InvalidSettings {
                    field: "bricks",
                    reason: "grid has too many cells",
                });
            }
        }
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(EngineError::InvalidBrickSize {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// Engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub arena_width: f32,
    pub arena_height: f32,
    pub initial_lives: i32,
    /// Milliseconds between an all-clear and the fresh grid
    pub regen_delay_ms: u64,
    /// Fixed seed for reproducible spawn headings (random when absent)
    pub seed: Option<u64>,
    pub ball: BallSettings,
    pub paddle: PaddleSettings,
    pub bricks: BrickLayout,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            initial_lives: INITIAL_LIVES,
            regen_delay_ms: GRID_REGEN_DELAY.as_millis() as u64,
            seed: None,
            ball: BallSettings::default(),
            paddle: PaddleSettings::default(),
            bricks: BrickLayout::default(),
        }
    }
}

impl Settings {
    /// Default settings with a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        log::debug!("Loaded settings: {}x{} arena", settings.arena_width, settings.arena_height);
        Ok(settings)
    }

    /// Read, parse and validate a settings file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::info!("Loading settings from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Render as pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Grid regeneration delay
    pub fn regen_delay(&self) -> Duration {
        Duration::from_millis(self.regen_delay_ms)
    }

    /// Reject values no engine can be built from
    pub fn validate(&self) -> Result<()> {
        fn positive(value: f32, field: &'static str) -> Result<()> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(EngineError::InvalidSettings {
                    field,
                    reason: "must be a positive number",
                })
            }
        }

        positive(self.arena_width, "arena_width")?;
        positive(self.arena_height, "arena_height")?;
        positive(self.ball.start_x_divisor, "ball.start_x_divisor")?;
        positive(self.ball.start_y_divisor, "ball.start_y_divisor")?;

        if self.initial_lives <= 0 {
            return Err(EngineError::InvalidSettings {
                field: "initial_lives",
                reason: "must be at least 1",
            });
        }
        if !(self.ball.radius.is_finite() && self.ball.radius > 0.0) {
            return Err(EngineError::InvalidBallRadius {
                radius: self.ball.radius,
            });
        }
        if !(self.ball.speed.is_finite() && self.ball.speed >= 0.0) {
            return Err(EngineError::NegativeBallSpeed {
                speed: self.ball.speed,
            });
        }
        if !(self.paddle.width >= 0.0 && self.paddle.height >= 0.0) {
            return Err(EngineError::InvalidPaddleSize {
                width: self.paddle.width,
                height: self.paddle.height,
            });
        }
        if !(self.paddle.speed.is_finite() && self.paddle.speed >= 0.0) {
            return Err(EngineError::InvalidSettings {
                field: "paddle.speed",
                reason: "must not be negative",
            });
        }
        self.bricks.validate()
    }
}
