//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One `update` per frame, never re-entrant
//! - Seeded RNG only
//! - Stable iteration order (bricks are column-major)
//! - No rendering or platform dependencies

pub mod angle;
pub mod bricks;
pub mod clock;
pub mod collision;
pub mod events;
pub mod round;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod wall;

pub use angle::Angle;
pub use bricks::{Brick, BrickGrid};
pub use clock::{Clock, ManualClock, SystemClock};
pub use collision::{Body, Bounce, Collidable, CollisionRect, intervals_intersect};
pub use events::{GameEvent, Listener, Observers};
pub use round::{DeferredRegen, Round, RoundId, RoundPhase};
pub use session::{GameSession, SessionStatus};
pub use snapshot::{BallView, BrickView, PaddleView, Snapshot};
pub use state::{Ball, Lives, Paddle, PaddleDirection, Score};
pub use wall::Wall;
