//! Collision detection primitives
//!
//! Every body is approximated by its axis-aligned bounding rectangle (the
//! ball by its bounding square). Two rectangles touch when their projected
//! intervals overlap on both axes; no other shape math exists.

use serde::{Deserialize, Serialize};

use super::bricks::Brick;
use super::state::{Ball, Paddle};
use super::wall::Wall;

/// Axis-aligned bounds in screen space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionRect {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl CollisionRect {
    pub fn from_origin_size(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            left: x,
            right: x + width,
            top: y,
            bottom: y + height,
        }
    }

    /// Overlap test on both axes (touching edges count)
    pub fn intersects(&self, other: &CollisionRect) -> bool {
        intervals_intersect((self.left, self.right), (other.left, other.right))
            && intervals_intersect((self.top, self.bottom), (other.top, other.bottom))
    }
}

/// Whether two closed intervals overlap.
///
/// The pair is ordered by lower bound, then the earlier interval must reach
/// the later one's start.
#[inline]
pub fn intervals_intersect(a: (f32, f32), b: (f32, f32)) -> bool {
    let (first, second) = if a.0 <= b.0 { (a, b) } else { (b, a) };
    first.1 >= second.0
}

/// Anything with a bounding rectangle
pub trait Collidable {
    fn collision_rect(&self) -> CollisionRect;

    fn overlaps<T: Collidable + ?Sized>(&self, other: &T) -> bool {
        self.collision_rect().intersects(&other.collision_rect())
    }
}

/// Surfaces that redirect the ball on contact
pub trait Bounce {
    fn bounce(&self, ball: &mut Ball);
}

/// The closed set of bodies in an arena
#[derive(Debug, Clone, Copy)]
pub enum Body<'a> {
    Ball(&'a Ball),
    Paddle(&'a Paddle),
    Brick(&'a Brick),
    Wall(&'a Wall),
}

impl Collidable for Body<'_> {
    fn collision_rect(&self) -> CollisionRect {
        match self {
            Body::Ball(ball) => ball.collision_rect(),
            Body::Paddle(paddle) => paddle.collision_rect(),
            Body::Brick(brick) => brick.collision_rect(),
            Body::Wall(wall) => wall.collision_rect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_overlapping_intervals() {
        assert!(intervals_intersect((1.0, 3.0), (2.0, 4.0)));
        assert!(intervals_intersect((2.0, 4.0), (1.0, 3.0)));
    }

    #[test]
    fn test_disjoint_intervals() {
        assert!(!intervals_intersect((1.0, 2.0), (3.0, 4.0)));
        assert!(!intervals_intersect((3.0, 4.0), (1.0, 2.0)));
    }

    #[test]
    fn test_touching_and_nested_intervals() {
        assert!(intervals_intersect((1.0, 2.0), (2.0, 3.0)));
        assert!(intervals_intersect((0.0, 10.0), (4.0, 5.0)));
    }

    #[test]
    fn test_rects_need_overlap_on_both_axes() {
        let a = CollisionRect::from_origin_size(0.0, 0.0, 10.0, 10.0);
        let b = CollisionRect::from_origin_size(5.0, 5.0, 10.0, 10.0);
        let c = CollisionRect::from_origin_size(5.0, 20.0, 10.0, 10.0);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    proptest! {
        #[test]
        fn prop_argument_order_is_irrelevant(
            a0 in -100.0f32..100.0, a_len in 0.0f32..50.0,
            b0 in -100.0f32..100.0, b_len in 0.0f32..50.0,
        ) {
            let a = (a0, a0 + a_len);
            let b = (b0, b0 + b_len);
            prop_assert_eq!(intervals_intersect(a, b), intervals_intersect(b, a));
        }
    }
}
