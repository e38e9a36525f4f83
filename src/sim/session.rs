//! Game session: lives, the current round, and observers
//!
//! The session is the engine's outer surface. An external scheduler calls
//! [`GameSession::update`] once per animation frame; input sources call
//! [`GameSession::set_paddle_direction`] between frames.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::{Clock, SystemClock};
use super::events::{GameEvent, Observers};
use super::round::{Round, RoundId};
use super::snapshot::Snapshot;
use super::state::{Lives, PaddleDirection, Score};
use crate::error::Result;
use crate::settings::Settings;

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Built, waiting for `start`
    Ready,
    /// Accepting updates
    Running,
    /// Out of lives; terminal until `reset`
    Ended,
}

/// A full game from first serve to game over
pub struct GameSession<C: Clock + Clone = SystemClock> {
    settings: Settings,
    clock: C,
    rng: Pcg32,
    lives: Lives,
    round: Round<C>,
    last_round_id: u64,
    status: SessionStatus,
    observers: Observers,
}

impl GameSession<SystemClock> {
    /// Session timed by the wall clock
    pub fn new(settings: Settings) -> Result<Self> {
        Self::with_clock(settings, SystemClock::new())
    }
}

impl<C: Clock + Clone> GameSession<C> {
    pub fn with_clock(settings: Settings, clock: C) -> Result<Self> {
        settings.validate()?;
        let seed = settings.seed.unwrap_or_else(rand::random);
        let mut rng = Pcg32::seed_from_u64(seed);
        let round = Round::new(RoundId(1), &settings, clock.clone(), &mut rng)?;
        log::info!(
            "New session: seed {}, {} lives, {}x{} bricks",
            seed,
            settings.initial_lives,
            settings.bricks.columns,
            settings.bricks.rows
        );

        Ok(Self {
            lives: Lives::new(settings.initial_lives),
            settings,
            clock,
            rng,
            round,
            last_round_id: 1,
            status: SessionStatus::Ready,
            observers: Observers::new(),
        })
    }

    /// Begin accepting updates. Scheduling frames is the caller's job.
    pub fn start(&mut self) {
        match self.status {
            SessionStatus::Ready => {
                log::info!("Session started");
                self.status = SessionStatus::Running;
            }
            SessionStatus::Running => {}
            SessionStatus::Ended => log::debug!("start() ignored: session has ended"),
        }
    }

    /// Advance one frame. A no-op unless the session is running.
    pub fn update(&mut self) -> SessionStatus {
        if self.status != SessionStatus::Running {
            log::debug!("update() ignored in {:?}", self.status);
            return self.status;
        }

        for event in self.round.update() {
            self.observers.emit(&event);
        }
        self.observers.emit(&GameEvent::Step {
            frame: self.round.frame(),
        });

        if self.round.is_game_over() {
            self.lose_life();
        }
        self.status
    }

    fn lose_life(&mut self) {
        let lives_remaining = self.lives.lose_one();
        log::info!("Ball lost, {} lives remaining", lives_remaining);
        self.observers.emit(&GameEvent::RoundOver { lives_remaining });

        if self.lives.is_exhausted() {
            self.end();
            return;
        }
        if let Err(err) = self.round.respawn_ball(&mut self.rng) {
            log::error!("Failed to respawn ball: {err}");
            self.end();
        }
    }

    fn end(&mut self) {
        if self.status == SessionStatus::Ended {
            return;
        }
        self.status = SessionStatus::Ended;
        let final_score = self.round.score().value();
        log::info!("GAME OVER - final score {}", final_score);
        self.observers.emit(&GameEvent::SessionEnded { final_score });
    }

    /// Discard the round and lives and build fresh ones. Listeners stay.
    pub fn reset(&mut self) -> Result<()> {
        self.last_round_id += 1;
        self.round = Round::new(
            RoundId(self.last_round_id),
            &self.settings,
            self.clock.clone(),
            &mut self.rng,
        )?;
        self.lives = Lives::new(self.settings.initial_lives);
        self.status = SessionStatus::Ready;
        log::info!("Session reset (round {})", self.last_round_id);
        Ok(())
    }

    /// Control intent, applied before the next update reads it
    pub fn set_paddle_direction(&mut self, direction: PaddleDirection) {
        if self.status == SessionStatus::Ended {
            log::debug!("Ignoring {:?}: session has ended", direction);
            return;
        }
        self.round.set_paddle_direction(direction);
    }

    /// Classifier output: 0 = left, 1 = right. Other ids are an error.
    pub fn apply_control_class(&mut self, class: u8) -> Result<()> {
        let direction = PaddleDirection::try_from(class)?;
        self.set_paddle_direction(direction);
        Ok(())
    }

    /// Register a listener, called synchronously for every event
    pub fn on(&mut self, listener: impl FnMut(&GameEvent) + 'static) {
        self.observers.subscribe(listener);
    }

    pub fn clear_listeners(&mut self) {
        self.observers.clear();
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.round, self.lives.remaining(), self.status)
    }

    pub fn is_game_over(&self) -> bool {
        self.round.is_game_over()
    }

    pub fn is_all_clear(&self) -> bool {
        self.round.is_all_clear()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_ended(&self) -> bool {
        self.status == SessionStatus::Ended
    }

    pub fn lives(&self) -> i32 {
        self.lives.remaining()
    }

    pub fn score(&self) -> Score {
        self.round.score()
    }

    pub fn round(&self) -> &Round<C> {
        &self.round
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[cfg(test)]
    pub(crate) fn round_mut(&mut self) -> &mut Round<C> {
        &mut self.round
    }
}

impl<C: Clock + Clone> std::fmt::Debug for GameSession<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("status", &self.status)
            .field("lives", &self.lives)
            .field("round", &self.round.id())
            .field("observers", &self.observers)
            .finish()
    }
}
