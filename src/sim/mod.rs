//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes from an injected `Clock`
//! - Seeded RNG only
//! - Stable iteration order (screen definition order, never sorted)
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod geom;
pub mod hazard;
pub mod obstacle;
pub mod platform;
pub mod player;
pub mod rope;
pub mod screens;
pub mod spawner;
pub mod state;
pub mod swing;
pub mod tick;

pub use clock::{Clock, ManualClock, WallClock};
pub use collision::{CollisionPolicy, OverlapKind, PassOutcome, run_obstacle_pass};
pub use geom::Rect;
pub use obstacle::{Obstacle, ObstacleBody, ObstacleId, ObstacleKind};
pub use player::{Attachment, Player, PlayerConfig};
pub use rope::{RopeChain, RopeConfig, RopePoint};
pub use screens::build_screen;
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, autopilot, tick};
