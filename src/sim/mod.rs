//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep, no wall clock
//! - Seeded RNG only
//! - Stable iteration order (course order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod course;
pub mod player;
pub mod pursuer;
pub mod session;
pub mod state;
pub mod tick;
pub mod trap;

pub use collision::{BoxExtent, overlaps};
pub use course::{Course, CourseId, Gem, Hazard, HazardKind, LevelConfig};
pub use player::{Intents, Maneuver, PlayerBody};
pub use pursuer::Pursuer;
pub use session::{GUEST_NAME, Session, TUTORIAL_PAGES};
pub use state::{Countdown, GameOverCause, LevelSummary, RunState, Screen, Stage};
pub use tick::{TickInput, tick};
pub use trap::{Glyph, TrapChallenge, TrapFailure, TrapStatus};
