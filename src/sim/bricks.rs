//! Bricks and the fixed brick grid

use serde::{Deserialize, Serialize};

use super::collision::{Bounce, Collidable, CollisionRect};
use super::state::Ball;
use crate::error::Result;
use crate::settings::BrickLayout;

/// A static rectangular obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub column: usize,
    pub row: usize,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    /// Flips true -> false once, never back within a grid
    is_remain: bool,
}

impl Brick {
    pub fn new(column: usize, row: usize, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            column,
            row,
            x,
            y,
            width,
            height,
            is_remain: true,
        }
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.x
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
    pub fn is_remain(&self) -> bool {
        self.is_remain
    }

    pub fn destroy(&mut self) {
        self.is_remain = false;
    }

    /// Geometric overlap only; callers skip destroyed bricks
    pub fn is_collided(&self, ball: &Ball) -> bool {
        self.overlaps(ball)
    }
}

impl Collidable for Brick {
    fn collision_rect(&self) -> CollisionRect {
        CollisionRect::from_origin_size(self.x, self.y, self.width, self.height)
    }
}

impl Bounce for Brick {
    /// Reflect on each axis where the ball center lies past the brick edge it
    /// is heading into. A ball already moving away keeps its heading.
    fn bounce(&self, ball: &mut Ball) {
        let rect = self.collision_rect();
        let (cx, cy) = (ball.pos.x, ball.pos.y);

        if (cx <= rect.left && ball.is_facing_right()) || (cx >= rect.right && ball.is_facing_left())
        {
            ball.reflect_x();
        }
        if (cy <= rect.top && ball.is_facing_bottom()) || (cy >= rect.bottom && ball.is_facing_top())
        {
            ball.reflect_y();
        }
    }
}

/// Fixed columns x rows arrangement, stored column-major
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrickGrid {
    layout: BrickLayout,
    bricks: Vec<Brick>,
    /// Bumped every time the grid is rebuilt
    generation: u32,
}

impl BrickGrid {
    pub fn new(layout: BrickLayout) -> Result<Self> {
        layout.validate()?;
        let bricks = Self::build(&layout);
        Ok(Self {
            layout,
            bricks,
            generation: 0,
        })
    }

    /// Layout must already be validated
    fn build(layout: &BrickLayout) -> Vec<Brick> {
        let mut bricks = Vec::with_capacity(layout.cell_count().unwrap_or_default());
        for column in 0..layout.columns {
            for row in 0..layout.rows {
                let x = column as f32 * (layout.width + layout.padding) + layout.offset_left;
                let y = row as f32 * (layout.height + layout.padding) + layout.offset_top;
                bricks.push(Brick::new(column, row, x, y, layout.width, layout.height));
            }
        }
        bricks
    }

    /// Replace every brick with a fresh, intact one
    pub fn regenerate(&mut self) {
        self.bricks = Self::build(&self.layout);
        self.generation += 1;
    }

    pub fn layout(&self) -> &BrickLayout {
        &self.layout
    }

    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// All bricks in iteration order (column-major)
    pub fn iter(&self) -> impl Iterator<Item = &Brick> {
        self.bricks.iter()
    }

    pub fn len(&self) -> usize {
        self.bricks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bricks.is_empty()
    }

    pub fn get(&self, column: usize, row: usize) -> Option<&Brick> {
        if column >= self.layout.columns || row >= self.layout.rows {
            return None;
        }
        self.bricks.get(column * self.layout.rows + row)
    }

    pub fn remaining(&self) -> usize {
        self.bricks.iter().filter(|b| b.is_remain()).count()
    }

    pub fn is_all_clear(&self) -> bool {
        self.bricks.iter().all(|b| !b.is_remain())
    }

    /// Index of the first remaining brick the ball touches, in grid order
    pub fn first_hit(&self, ball: &Ball) -> Option<usize> {
        self.bricks
            .iter()
            .position(|b| b.is_remain() && b.is_collided(ball))
    }

    pub(crate) fn brick_mut(&mut self, index: usize) -> Option<&mut Brick> {
        self.bricks.get_mut(index)
    }

    #[cfg(test)]
    pub(crate) fn destroy_where(&mut self, mut pred: impl FnMut(&Brick) -> bool) {
        for brick in self.bricks.iter_mut().filter(|b| pred(b)) {
            brick.destroy();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::angle::Angle;
    use glam::Vec2;
    use std::f32::consts::PI;

    fn ball_at(x: f32, y: f32, heading: f32) -> Ball {
        Ball::new(Vec2::new(x, y), 4.0, Angle::from_radians(heading), 10.0).unwrap()
    }

    #[test]
    fn test_grid_layout_is_column_major() {
        let grid = BrickGrid::new(BrickLayout::default()).unwrap();
        assert_eq!(grid.len(), 15);
        assert_eq!(grid.remaining(), 15);

        let order: Vec<(usize, usize)> = grid.iter().map(|b| (b.column, b.row)).take(4).collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (0, 2), (1, 0)]);

        let last = grid.get(4, 2).unwrap();
        assert_eq!((last.x(), last.y()), (370.0, 90.0));
        assert!(grid.get(5, 0).is_none());
    }

    #[test]
    fn test_bounce_from_below_reflects_vertically() {
        let brick = Brick::new(0, 0, 30.0, 30.0, 75.0, 20.0);
        // Center below the brick, moving up
        let mut ball = ball_at(60.0, 55.0, PI / 2.0);
        assert!(brick.is_collided(&ball));
        brick.bounce(&mut ball);
        assert!((ball.heading.radians() - 1.5 * PI).abs() < 1e-5);
    }

    #[test]
    fn test_bounce_from_side_reflects_horizontally() {
        let brick = Brick::new(0, 0, 30.0, 30.0, 75.0, 20.0);
        // Center left of the brick, moving right and slightly up
        let mut ball = ball_at(25.0, 40.0, 0.1);
        brick.bounce(&mut ball);
        assert!((ball.heading.radians() - (PI - 0.1)).abs() < 1e-5);
    }

    #[test]
    fn test_bounce_keeps_receding_ball() {
        let brick = Brick::new(0, 0, 30.0, 30.0, 75.0, 20.0);
        // Below the brick but already moving down
        let mut ball = ball_at(60.0, 55.0, 1.5 * PI);
        brick.bounce(&mut ball);
        assert!((ball.heading.radians() - 1.5 * PI).abs() < 1e-5);
    }

    #[test]
    fn test_first_hit_skips_destroyed_and_picks_grid_order() {
        let mut grid = BrickGrid::new(BrickLayout::default()).unwrap();
        // Straddles column 0 rows 0 and 1 (y 30..50 and 60..80)
        let ball = ball_at(60.0, 55.0, PI / 2.0);
        assert_eq!(grid.first_hit(&ball), Some(0));

        grid.brick_mut(0).unwrap().destroy();
        assert_eq!(grid.first_hit(&ball), Some(1));

        grid.brick_mut(1).unwrap().destroy();
        assert_eq!(grid.first_hit(&ball), None);
    }

    #[test]
    fn test_regenerate_restores_all_bricks() {
        let mut grid = BrickGrid::new(BrickLayout::default()).unwrap();
        grid.destroy_where(|_| true);
        assert!(grid.is_all_clear());

        grid.regenerate();
        assert_eq!(grid.remaining(), 15);
        assert_eq!(grid.generation(), 1);
        assert!(!grid.is_all_clear());
    }

    #[test]
    fn test_oversized_layout_is_rejected() {
        let layout = BrickLayout {
            columns: usize::MAX,
            rows: 3,
            ..BrickLayout::default()
        };
        assert!(BrickGrid::new(layout).is_err());
    }
}
