//! Read-only render view
//!
//! A snapshot is a plain value copy of everything a renderer draws. Nothing
//! in it points back into the engine.

use serde::Serialize;

use super::clock::Clock;
use super::round::{Round, RoundPhase};
use super::session::SessionStatus;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BallView {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PaddleView {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BrickView {
    pub column: usize,
    pub row: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub remaining: bool,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub frame: u64,
    pub status: SessionStatus,
    pub phase: RoundPhase,
    pub ball: BallView,
    pub paddle: PaddleView,
    /// Column-major, destroyed bricks included
    pub bricks: Vec<BrickView>,
    pub grid_generation: u32,
    pub score: u32,
    pub lives: i32,
}

impl Snapshot {
    pub fn capture<C: Clock>(round: &Round<C>, lives: i32, status: SessionStatus) -> Self {
        let ball = round.ball();
        let paddle = round.paddle();
        Self {
            frame: round.frame(),
            status,
            phase: round.phase(),
            ball: BallView {
                x: ball.pos.x,
                y: ball.pos.y,
                radius: ball.radius(),
                active: ball.is_active(),
            },
            paddle: PaddleView {
                x: paddle.x,
                y: paddle.y(),
                width: paddle.width(),
                height: paddle.height(),
            },
            bricks: round
                .bricks()
                .iter()
                .map(|b| BrickView {
                    column: b.column,
                    row: b.row,
                    x: b.x(),
                    y: b.y(),
                    width: b.width(),
                    height: b.height(),
                    remaining: b.is_remain(),
                })
                .collect(),
            grid_generation: round.bricks().generation(),
            score: round.score().value(),
            lives,
        }
    }

    /// Bricks still standing
    pub fn remaining_bricks(&self) -> impl Iterator<Item = &BrickView> {
        self.bricks.iter().filter(|b| b.remaining)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
