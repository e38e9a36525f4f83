//! Ball heading as a normalized angle
//!
//! Headings follow the math convention (0 = right, π/2 = up). The ball
//! moves in screen space, so the y component is subtracted when moving.

use std::f32::consts::{FRAC_PI_2, PI};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::normalize_angle;

/// A direction in radians, always in [0, 2π)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct Angle(f32);

impl Angle {
    pub const UP: Angle = Angle(FRAC_PI_2);
    pub const DOWN: Angle = Angle(1.5 * PI);

    pub fn from_radians(radians: f32) -> Self {
        Self(normalize_angle(radians))
    }

    #[inline]
    pub fn radians(self) -> f32 {
        self.0
    }

    /// Bounce off a vertical surface: π − θ
    pub fn reverse_across_vertical(self) -> Self {
        Self::from_radians(PI - self.0)
    }

    /// Bounce off a horizontal surface: −θ
    pub fn reverse_across_horizontal(self) -> Self {
        Self::from_radians(-self.0)
    }

    /// Fold the heading into the upper half-plane.
    ///
    /// Upward headings are kept. Down-left headings rotate a quarter turn
    /// clockwise, down-right ones a quarter turn counter-clockwise, so the
    /// horizontal sense survives the fold.
    pub fn to_upward_bias(self) -> Self {
        let theta = self.0;
        if theta <= PI {
            self
        } else if theta <= 1.5 * PI {
            Self::from_radians(theta - FRAC_PI_2)
        } else {
            Self::from_radians(theta + FRAC_PI_2)
        }
    }

    #[inline]
    pub fn cos_component(self) -> f32 {
        self.0.cos()
    }

    #[inline]
    pub fn sin_component(self) -> f32 {
        self.0.sin()
    }

    /// Randomized spawn heading: one of two upward fans, either side of
    /// straight up, each a quarter of π wide
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let side: f32 = rng.random();
        let spread: f32 = rng.random();
        let turns = if side > 0.5 {
            0.5 - spread * 0.25 + 0.125
        } else {
            0.5 + spread * 0.25 + 0.125
        };
        Self::from_radians(PI * turns)
    }

    pub fn is_facing_right(self) -> bool {
        self.0 <= FRAC_PI_2 || self.0 >= 1.5 * PI
    }

    pub fn is_facing_left(self) -> bool {
        self.0 >= FRAC_PI_2 && self.0 <= 1.5 * PI
    }

    pub fn is_facing_top(self) -> bool {
        self.0 <= PI
    }

    pub fn is_facing_bottom(self) -> bool {
        self.0 >= PI
    }
}

impl From<f32> for Angle {
    fn from(radians: f32) -> Self {
        Self::from_radians(radians)
    }
}

impl From<Angle> for f32 {
    fn from(angle: Angle) -> Self {
        angle.0
    }
}
