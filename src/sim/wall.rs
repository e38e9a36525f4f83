//! Arena bounds
//!
//! The floor is never bounced off: touching it is the ball-drop condition.

use serde::{Deserialize, Serialize};

use super::collision::{Bounce, Collidable, CollisionRect};
use super::state::Ball;

/// The playfield rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Wall {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            top: 0.0,
            right: width,
            bottom: height,
            left: 0.0,
        }
    }

    /// Touching the left, top or right edge
    pub fn is_collided<T: Collidable + ?Sized>(&self, body: &T) -> bool {
        let rect = body.collision_rect();
        rect.left <= self.left || rect.top <= self.top || rect.right >= self.right
    }

    pub fn is_collided_left<T: Collidable + ?Sized>(&self, body: &T) -> bool {
        body.collision_rect().left <= self.left
    }

    pub fn is_collided_right<T: Collidable + ?Sized>(&self, body: &T) -> bool {
        body.collision_rect().right >= self.right
    }

    /// Ball drop: bottom edge reached the floor
    pub fn is_collided_bottom<T: Collidable + ?Sized>(&self, body: &T) -> bool {
        body.collision_rect().bottom >= self.bottom
    }
}

impl Collidable for Wall {
    fn collision_rect(&self) -> CollisionRect {
        CollisionRect {
            left: self.left,
            right: self.right,
            top: self.top,
            bottom: self.bottom,
        }
    }
}

impl Bounce for Wall {
    /// Side walls reflect only a ball still heading into them; the ceiling
    /// always reflects.
    fn bounce(&self, ball: &mut Ball) {
        let rect = ball.collision_rect();
        if (rect.left <= self.left && ball.is_facing_left())
            || (rect.right >= self.right && ball.is_facing_right())
        {
            ball.reflect_x();
        }
        if rect.top <= self.top {
            ball.reflect_y();
        }
    }
}
