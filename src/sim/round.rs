//! Round state machine
//!
//! One round owns the ball, paddle, brick grid, arena bounds and score, and
//! advances them one frame per [`Round::update`]. Collision resolution runs
//! in a fixed order every frame:
//!
//! 1. ball vs. walls
//! 2. paddle vs. side walls (stop a paddle pushing into a wall)
//! 3. ball vs. paddle (bounce and reactivate)
//! 4. ball vs. bricks, first remaining hit in grid order only, active balls only
//! 5. move the ball
//! 6. move the paddle
//!
//! A ball reactivated in step 3 may score in step 4 of the same frame.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::bricks::BrickGrid;
use super::clock::{Clock, SystemClock};
use super::collision::{Body, Bounce};
use super::events::GameEvent;
use super::state::{Ball, Paddle, PaddleDirection, Score};
use super::wall::Wall;
use crate::consts::{ALL_CLEAR_ACCEL, BRICK_HIT_ACCEL};
use crate::error::Result;
use crate::settings::Settings;

/// Identity of a round instance, unique within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoundId(pub u64);

/// Where the round is in its play cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Normal play
    Active,
    /// Grid cleared, ball ghosted, waiting for the fresh grid
    AllClearTransition,
    /// The ball reached the floor
    RoundOver,
}

/// Grid regeneration scheduled by an all-clear
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeferredRegen {
    /// Round the regeneration belongs to
    pub round: RoundId,
    /// Clock time at which it may fire
    pub due_at: Duration,
}

impl DeferredRegen {
    /// Fires only for its own round, and only once its time has come
    pub fn is_due(&self, round: RoundId, now: Duration) -> bool {
        self.round == round && now >= self.due_at
    }
}

/// A playable round
#[derive(Debug)]
pub struct Round<C: Clock = SystemClock> {
    id: RoundId,
    clock: C,
    settings: Settings,
    ball: Ball,
    paddle: Paddle,
    bricks: BrickGrid,
    wall: Wall,
    score: Score,
    in_transition: bool,
    pending_regen: Option<DeferredRegen>,
    frame: u64,
}

impl<C: Clock> Round<C> {
    pub fn new<R: Rng + ?Sized>(
        id: RoundId,
        settings: &Settings,
        clock: C,
        rng: &mut R,
    ) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            id,
            clock,
            ball: Ball::spawn(settings, rng)?,
            paddle: Paddle::for_arena(settings)?,
            bricks: BrickGrid::new(settings.bricks.clone())?,
            wall: Wall::new(settings.arena_width, settings.arena_height),
            score: Score::ZERO,
            in_transition: false,
            pending_regen: None,
            frame: 0,
            settings: settings.clone(),
        })
    }

    /// Advance one frame, returning what happened
    pub fn update(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();

        self.apply_deferred(&mut events);
        self.resolve_collisions(&mut events);

        self.ball.advance();
        self.paddle.advance();
        self.frame += 1;

        log::trace!(
            "round {} frame {}: ball ({:.1}, {:.1}) v={:.2}",
            self.id.0,
            self.frame,
            self.ball.pos.x,
            self.ball.pos.y,
            self.ball.speed()
        );

        events
    }

    fn apply_deferred(&mut self, events: &mut Vec<GameEvent>) {
        let Some(regen) = self.pending_regen else {
            return;
        };
        if regen.round != self.id {
            log::warn!(
                "Dropping grid regeneration for round {} (current round {})",
                regen.round.0,
                self.id.0
            );
            self.pending_regen = None;
            return;
        }
        if regen.is_due(self.id, self.clock.now()) {
            self.pending_regen = None;
            self.bricks.regenerate();
            self.in_transition = false;
            log::info!(
                "Round {}: grid regenerated (generation {})",
                self.id.0,
                self.bricks.generation()
            );
            events.push(GameEvent::GridRegenerated {
                generation: self.bricks.generation(),
            });
        }
    }

    fn resolve_collisions(&mut self, events: &mut Vec<GameEvent>) {
        // Ball and walls
        if self.wall.is_collided(&self.ball) {
            self.wall.bounce(&mut self.ball);
        }

        // Paddle and walls
        if (self.wall.is_collided_left(&self.paddle) && self.paddle.dx() < 0.0)
            || (self.wall.is_collided_right(&self.paddle) && self.paddle.dx() > 0.0)
        {
            self.paddle.stop();
        }

        // Ball and paddle
        if self.paddle.is_collided(&self.ball) {
            self.paddle.bounce(&mut self.ball);
            self.ball.activate();
        }

        // Ball and bricks
        if !self.ball.is_active() {
            return;
        }
        let Some(index) = self.bricks.first_hit(&self.ball) else {
            return;
        };
        let Some(brick) = self.bricks.brick_mut(index) else {
            return;
        };
        brick.bounce(&mut self.ball);
        brick.destroy();
        let (column, row) = (brick.column, brick.row);

        self.ball.accelerate(BRICK_HIT_ACCEL);
        self.score = self.score + Score::BASE;
        log::debug!(
            "Round {}: brick ({}, {}) destroyed, score {}",
            self.id.0,
            column,
            row,
            self.score.value()
        );
        events.push(GameEvent::BrickDestroyed { column, row });

        if self.bricks.is_all_clear() {
            self.score = self.score + Score::ALL_CLEAR_BONUS;
            self.ball.accelerate(ALL_CLEAR_ACCEL);
            self.ball.deactivate();
            self.in_transition = true;

            let due_at = self.clock.now() + self.settings.regen_delay();
            self.pending_regen = Some(DeferredRegen {
                round: self.id,
                due_at,
            });
            log::info!(
                "Round {}: all clear! score {}, ball speed {:.2}",
                self.id.0,
                self.score.value(),
                self.ball.speed()
            );
            events.push(GameEvent::AllClear {
                score: self.score.value(),
            });
        }
    }

    /// Replace the ball after a drop. Paddle, bricks and score persist.
    pub fn respawn_ball<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        self.ball = Ball::spawn(&self.settings, rng)?;
        Ok(())
    }

    pub fn set_paddle_direction(&mut self, direction: PaddleDirection) {
        self.paddle.set_direction(direction);
    }

    /// Ball bottom has reached the floor
    pub fn is_game_over(&self) -> bool {
        self.wall.is_collided_bottom(&self.ball)
    }

    pub fn is_all_clear(&self) -> bool {
        self.bricks.is_all_clear()
    }

    pub fn phase(&self) -> RoundPhase {
        if self.is_game_over() {
            RoundPhase::RoundOver
        } else if self.in_transition {
            RoundPhase::AllClearTransition
        } else {
            RoundPhase::Active
        }
    }

    /// Every live body: walls, paddle, ball, then remaining bricks
    pub fn bodies(&self) -> impl Iterator<Item = Body<'_>> {
        [
            Body::Wall(&self.wall),
            Body::Paddle(&self.paddle),
            Body::Ball(&self.ball),
        ]
        .into_iter()
        .chain(
            self.bricks
                .iter()
                .filter(|b| b.is_remain())
                .map(Body::Brick),
        )
    }

    #[inline]
    pub fn id(&self) -> RoundId {
        self.id
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn paddle(&self) -> &Paddle {
        &self.paddle
    }

    pub fn bricks(&self) -> &BrickGrid {
        &self.bricks
    }

    pub fn wall(&self) -> &Wall {
        &self.wall
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn pending_regen(&self) -> Option<DeferredRegen> {
        self.pending_regen
    }

    #[cfg(test)]
    pub(crate) fn ball_mut(&mut self) -> &mut Ball {
        &mut self.ball
    }

    #[cfg(test)]
    pub(crate) fn paddle_mut(&mut self) -> &mut Paddle {
        &mut self.paddle
    }

    #[cfg(test)]
    pub(crate) fn bricks_mut(&mut self) -> &mut BrickGrid {
        &mut self.bricks
    }

    #[cfg(test)]
    pub(crate) fn set_pending_regen(&mut self, regen: DeferredRegen) {
        self.pending_regen = Some(regen);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::BrickLayout;
    use crate::sim::angle::Angle;
    use crate::sim::clock::ManualClock;
    use crate::sim::collision::Collidable;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn round_with(settings: &Settings) -> (Round<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let mut rng = Pcg32::seed_from_u64(12345);
        let round = Round::new(RoundId(1), settings, clock.clone(), &mut rng).unwrap();
        (round, clock)
    }

    fn place_ball(round: &mut Round<ManualClock>, x: f32, y: f32, heading: f32) {
        let ball = round.ball_mut();
        ball.pos = Vec2::new(x, y);
        ball.heading = Angle::from_radians(heading);
    }

    #[test]
    fn test_new_round_starts_active() {
        let (round, _) = round_with(&Settings::default());
        assert_eq!(round.phase(), RoundPhase::Active);
        assert_eq!(round.score(), Score::ZERO);
        assert_eq!(round.bricks().remaining(), 15);
        assert!(!round.is_game_over());
        assert!(!round.is_all_clear());
        // wall + paddle + ball + 15 bricks
        assert_eq!(round.bodies().count(), 18);
    }

    #[test]
    fn test_new_round_rejects_bad_settings() {
        let mut settings = Settings::default();
        settings.ball.speed = -2.0;
        let mut rng = Pcg32::seed_from_u64(1);
        assert!(Round::new(RoundId(1), &settings, ManualClock::new(), &mut rng).is_err());
    }

    #[test]
    fn test_one_brick_per_frame() {
        let (mut round, _) = round_with(&Settings::default());
        // Overlaps bricks (0, 0) and (0, 1)
        place_ball(&mut round, 60.0, 55.0, FRAC_PI_2);

        let events = round.update();
        assert_eq!(events, vec![GameEvent::BrickDestroyed { column: 0, row: 0 }]);
        assert_eq!(round.bricks().remaining(), 14);
        assert_eq!(round.score().value(), 1);
        assert!((round.ball().speed() - 4.1).abs() < 1e-5);
        // Bounced off the underside: heading down
        assert!(round.ball().is_facing_bottom());
    }

    #[test]
    fn test_destroyed_brick_never_scores_again() {
        let (mut round, _) = round_with(&Settings::default());
        round.bricks_mut().destroy_where(|b| (b.column, b.row) == (0, 0));
        // Only touches brick (0, 0)
        place_ball(&mut round, 60.0, 45.0, FRAC_PI_2);
        assert!(round.bricks().get(0, 0).unwrap().overlaps(round.ball()));

        let events = round.update();
        assert!(events.is_empty());
        assert_eq!(round.score(), Score::ZERO);
    }

    #[test]
    fn test_all_clear_sequence_and_delayed_regen() {
        let (mut round, clock) = round_with(&Settings::default());
        round
            .bricks_mut()
            .destroy_where(|b| (b.column, b.row) != (4, 2));
        // Just below the last brick (370..445, 90..110), moving up
        place_ball(&mut round, 400.0, 115.0, FRAC_PI_2);
        let speed_before = round.ball().speed();

        let events = round.update();
        assert_eq!(
            events,
            vec![
                GameEvent::BrickDestroyed { column: 4, row: 2 },
                GameEvent::AllClear { score: 11 },
            ]
        );
        assert_eq!(round.score().value(), 11);
        assert!((round.ball().speed() - speed_before - 0.6).abs() < 1e-5);
        assert!(!round.ball().is_active());
        assert!(round.is_all_clear());
        assert_eq!(round.phase(), RoundPhase::AllClearTransition);
        assert_eq!(
            round.pending_regen(),
            Some(DeferredRegen {
                round: RoundId(1),
                due_at: Duration::from_millis(500),
            })
        );

        // Not yet
        clock.advance(Duration::from_millis(499));
        assert!(round.update().is_empty());
        assert!(round.is_all_clear());

        clock.advance(Duration::from_millis(1));
        let events = round.update();
        assert_eq!(events, vec![GameEvent::GridRegenerated { generation: 1 }]);
        assert_eq!(round.bricks().remaining(), 15);
        assert!(round.bricks().iter().all(|b| b.is_remain()));
        assert_eq!(round.phase(), RoundPhase::Active);
        assert!(round.pending_regen().is_none());
    }

    #[test]
    fn test_ghost_ball_passes_through_bricks() {
        let (mut round, _) = round_with(&Settings::default());
        round.ball_mut().deactivate();
        place_ball(&mut round, 60.0, 55.0, FRAC_PI_2);

        assert!(round.update().is_empty());
        assert_eq!(round.bricks().remaining(), 15);
    }

    #[test]
    fn test_regen_for_another_round_is_dropped() {
        let (mut round, clock) = round_with(&Settings::default());
        round.bricks_mut().destroy_where(|_| true);
        round.set_pending_regen(DeferredRegen {
            round: RoundId(99),
            due_at: Duration::ZERO,
        });
        clock.advance(Duration::from_secs(1));

        assert!(round.update().is_empty());
        assert!(round.is_all_clear());
        assert!(round.pending_regen().is_none());
    }

    #[test]
    fn test_deferred_regen_is_due() {
        let regen = DeferredRegen {
            round: RoundId(3),
            due_at: Duration::from_millis(500),
        };
        assert!(!regen.is_due(RoundId(3), Duration::from_millis(499)));
        assert!(regen.is_due(RoundId(3), Duration::from_millis(500)));
        assert!(!regen.is_due(RoundId(4), Duration::from_secs(10)));
    }

    #[test]
    fn test_paddle_stops_at_wall() {
        let (mut round, _) = round_with(&Settings::default());
        round.paddle_mut().x = 0.0;
        round.set_paddle_direction(PaddleDirection::Left);
        round.update();
        assert_eq!(round.paddle().x, 0.0);
        assert_eq!(round.paddle().dx(), 0.0);

        // Moving away from the wall is allowed
        round.set_paddle_direction(PaddleDirection::Right);
        round.update();
        assert_eq!(round.paddle().x, 7.0);
    }

    #[test]
    fn test_paddle_stops_at_right_wall() {
        let (mut round, _) = round_with(&Settings::default());
        let flush_right = 480.0 - round.paddle().width();
        round.paddle_mut().x = flush_right;
        round.set_paddle_direction(PaddleDirection::Right);
        round.update();
        assert_eq!(round.paddle().x, flush_right);
        assert_eq!(round.paddle().dx(), 0.0);

        round.set_paddle_direction(PaddleDirection::Left);
        round.update();
        assert_eq!(round.paddle().x, flush_right - 7.0);
    }

    #[test]
    fn test_paddle_bounce_reactivates_ball() {
        let (mut round, _) = round_with(&Settings::default());
        let center = round.paddle().center_x();
        round.ball_mut().deactivate();
        place_ball(&mut round, center, 295.0, 1.5 * PI);

        round.update();
        assert!(round.ball().is_active());
        assert!(round.ball().is_facing_top());
        assert!((round.ball().pos.y - 291.0).abs() < 1e-4);
    }

    #[test]
    fn test_reactivated_ball_can_score_same_frame() {
        let settings = Settings {
            bricks: BrickLayout {
                columns: 1,
                rows: 1,
                width: 80.0,
                height: 10.0,
                padding: 0.0,
                offset_top: 285.0,
                offset_left: 200.0,
            },
            ..Settings::default()
        };
        let (mut round, _) = round_with(&settings);
        round.ball_mut().deactivate();
        // Touches the paddle (y 300..310) and the brick (y 285..295)
        place_ball(&mut round, 240.0, 297.0, 1.5 * PI);

        let events = round.update();
        assert_eq!(events[0], GameEvent::BrickDestroyed { column: 0, row: 0 });
        assert_eq!(round.score().value(), 11);
    }

    #[test]
    fn test_game_over_is_a_query() {
        let (mut round, _) = round_with(&Settings::default());
        place_ball(&mut round, 20.0, 308.0, 1.5 * PI);
        assert!(!round.is_game_over());

        round.update();
        assert!(round.is_game_over());
        assert_eq!(round.phase(), RoundPhase::RoundOver);

        let mut rng = Pcg32::seed_from_u64(5);
        round.respawn_ball(&mut rng).unwrap();
        assert!(!round.is_game_over());
        assert_eq!(round.ball().speed(), 4.0);
    }

    #[test]
    fn test_same_seed_same_frames() {
        let (mut a, _) = round_with(&Settings::default());
        let (mut b, _) = round_with(&Settings::default());
        for i in 0..120 {
            let dir = if i % 40 < 20 {
                PaddleDirection::Left
            } else {
                PaddleDirection::Right
            };
            a.set_paddle_direction(dir);
            b.set_paddle_direction(dir);
            assert_eq!(a.update(), b.update());
        }
        assert_eq!(a.ball(), b.ball());
        assert_eq!(a.paddle(), b.paddle());
        assert_eq!(a.score(), b.score());
    }
}
