//! Moving entities and value trackers
//!
//! Ball and paddle live here together with the score and lives counters.

use std::f32::consts::FRAC_PI_2;
use std::ops::Add;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::angle::Angle;
use super::collision::{Bounce, Collidable, CollisionRect};
use crate::consts::{ALL_CLEAR_BONUS, BASE_SCORE, PADDLE_BOUNCE_DAMPING};
use crate::error::{EngineError, Result};
use crate::settings::Settings;

/// A ball entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    /// Center in screen space
    pub pos: Vec2,
    /// Pixels per frame, never negative
    speed: f32,
    pub heading: Angle,
    radius: f32,
    /// Inactive balls pass through bricks (all-clear ghost state)
    active: bool,
}

impl Ball {
    pub fn new(pos: Vec2, speed: f32, heading: Angle, radius: f32) -> Result<Self> {
        if !(speed.is_finite() && speed >= 0.0) {
            return Err(EngineError::NegativeBallSpeed { speed });
        }
        if !(radius.is_finite() && radius > 0.0) {
            return Err(EngineError::InvalidBallRadius { radius });
        }
        Ok(Self {
            pos,
            speed,
            heading,
            radius,
            active: true,
        })
    }

    /// Fresh ball at the standard start position with a random upward heading
    pub fn spawn<R: Rng + ?Sized>(settings: &Settings, rng: &mut R) -> Result<Self> {
        let pos = Vec2::new(
            settings.arena_width / settings.ball.start_x_divisor,
            settings.arena_height / settings.ball.start_y_divisor,
        );
        Self::new(pos, settings.ball.speed, Angle::spawn(rng), settings.ball.radius)
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn diameter(&self) -> f32 {
        self.radius * 2.0
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Advance one frame along the heading (screen y is inverted)
    pub fn advance(&mut self) {
        self.pos.x += self.speed * self.heading.cos_component();
        self.pos.y -= self.speed * self.heading.sin_component();
    }

    /// Speed only ever grows within a round
    pub fn accelerate(&mut self, delta: f32) {
        self.speed += delta.max(0.0);
    }

    pub fn reflect_x(&mut self) {
        self.heading = self.heading.reverse_across_vertical();
    }

    pub fn reflect_y(&mut self) {
        self.heading = self.heading.reverse_across_horizontal();
    }

    pub fn turn_upward(&mut self) {
        self.heading = self.heading.to_upward_bias();
    }

    pub fn is_facing_right(&self) -> bool {
        self.heading.is_facing_right()
    }

    pub fn is_facing_left(&self) -> bool {
        self.heading.is_facing_left()
    }

    pub fn is_facing_top(&self) -> bool {
        self.heading.is_facing_top()
    }

    pub fn is_facing_bottom(&self) -> bool {
        self.heading.is_facing_bottom()
    }
}

impl Collidable for Ball {
    fn collision_rect(&self) -> CollisionRect {
        CollisionRect {
            left: self.pos.x - self.radius,
            right: self.pos.x + self.radius,
            top: self.pos.y - self.radius,
            bottom: self.pos.y + self.radius,
        }
    }
}

/// Control intent for the paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaddleDirection {
    Left,
    Right,
    Stop,
}

impl TryFrom<u8> for PaddleDirection {
    type Error = EngineError;

    /// Classifier output: 0 = left, 1 = right
    fn try_from(class: u8) -> Result<Self> {
        match class {
            0 => Ok(PaddleDirection::Left),
            1 => Ok(PaddleDirection::Right),
            other => Err(EngineError::UnknownControlClass(other)),
        }
    }
}

/// The player's paddle. Only `x` and `dx` change after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    /// Left edge
    pub x: f32,
    /// Top edge
    y: f32,
    width: f32,
    height: f32,
    /// Magnitude applied on a direction intent
    speed: f32,
    /// Current horizontal velocity: -speed, 0 or +speed
    dx: f32,
}

impl Paddle {
    pub fn new(x: f32, y: f32, width: f32, height: f32, speed: f32) -> Result<Self> {
        if !(width >= 0.0 && height >= 0.0) {
            return Err(EngineError::InvalidPaddleSize { width, height });
        }
        if !(speed.is_finite() && speed >= 0.0) {
            return Err(EngineError::InvalidSettings {
                field: "paddle.speed",
                reason: "must not be negative",
            });
        }
        Ok(Self {
            x,
            y,
            width,
            height,
            speed,
            dx: 0.0,
        })
    }

    /// Centered paddle resting above the arena floor
    pub fn for_arena(settings: &Settings) -> Result<Self> {
        let p = &settings.paddle;
        Self::new(
            (settings.arena_width - p.width) / 2.0,
            settings.arena_height - p.height - p.bottom_margin,
            p.width,
            p.height,
            p.speed,
        )
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    #[inline]
    pub fn dx(&self) -> f32 {
        self.dx
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Last write wins
    pub fn set_direction(&mut self, direction: PaddleDirection) {
        self.dx = match direction {
            PaddleDirection::Left => -self.speed,
            PaddleDirection::Right => self.speed,
            PaddleDirection::Stop => 0.0,
        };
    }

    pub fn stop(&mut self) {
        self.dx = 0.0;
    }

    pub fn advance(&mut self) {
        self.x += self.dx;
    }

    pub fn is_collided(&self, ball: &Ball) -> bool {
        self.overlaps(ball)
    }

    /// Heading for a ball struck at this point of the paddle: straight up in
    /// the middle, skewed toward the struck side near the edges
    pub fn deflection_angle(&self, ball: &Ball) -> Angle {
        // -1 at the far left contact, +1 at the far right
        let offset = (ball.pos.x - self.center_x()) * 2.0 / (self.width + ball.diameter());
        Angle::from_radians(FRAC_PI_2 - FRAC_PI_2 * offset * PADDLE_BOUNCE_DAMPING)
    }
}

impl Collidable for Paddle {
    fn collision_rect(&self) -> CollisionRect {
        CollisionRect::from_origin_size(self.x, self.y, self.width, self.height)
    }
}

impl Bounce for Paddle {
    fn bounce(&self, ball: &mut Ball) {
        if self.is_collided(ball) {
            ball.heading = self.deflection_angle(ball);
            ball.turn_upward();
        }
    }
}

/// Points, combined by value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Score(u32);

impl Score {
    pub const ZERO: Score = Score(0);
    pub const BASE: Score = Score(BASE_SCORE);
    pub const ALL_CLEAR_BONUS: Score = Score(ALL_CLEAR_BONUS);

    #[inline]
    pub fn value(self) -> u32 {
        self.0
    }
}

impl Add for Score {
    type Output = Score;

    fn add(self, rhs: Score) -> Score {
        Score(self.0.saturating_add(rhs.0))
    }
}

/// Remaining attempts in a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lives(i32);

impl Lives {
    pub fn new(lives: i32) -> Self {
        Self(lives)
    }

    #[inline]
    pub fn remaining(self) -> i32 {
        self.0
    }

    /// Take one life, returning what is left
    pub fn lose_one(&mut self) -> i32 {
        self.0 -= 1;
        self.0
    }

    pub fn is_exhausted(self) -> bool {
        self.0 <= 0
    }
}
