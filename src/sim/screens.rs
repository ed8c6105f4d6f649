//! Numbered screen layouts
//!
//! Each screen is an ordered obstacle list: supports (platforms, leaves,
//! springs, ropes) first, then barriers, then hazards and pickups. Ids follow
//! list order. The strip left of `SPAWN_CLEARANCE` is kept free so a fresh
//! player never starts inside something.

use glam::Vec2;

use super::geom::Rect;
use super::hazard::{Blocker, BlockerKind, Pool, PoolSize};
use super::obstacle::{Obstacle, ObstacleBody, ObstacleId};
use super::platform::{Fountain, LotusLeaf, Spring, Stump};
use super::rope::RopeConfig;
use super::spawner::{SpawnKind, Spawner};
use super::swing::TarzanRope;
use crate::consts::*;

/// Nothing is placed left of this x
pub const SPAWN_CLEARANCE: f32 = 120.0;

const CANOPY_Y: f32 = 60.0;
const ROPE_PIVOT_Y: f32 = 100.0;
const LEAF_Y: f32 = FLOOR_Y - 8.0;

/// Builds one screen's list, numbering obstacles as they are pushed
struct Layout {
    screen: u32,
    seed: u64,
    obstacles: Vec<Obstacle>,
}

impl Layout {
    fn new(screen: u32, seed: u64) -> Self {
        Self {
            screen,
            seed,
            obstacles: Vec::new(),
        }
    }

    fn next_id(&self) -> ObstacleId {
        ObstacleId(self.obstacles.len() as u32 + 1)
    }

    fn push(mut self, body: ObstacleBody) -> Self {
        let id = self.next_id();
        self.obstacles.push(Obstacle::new(id, body));
        self
    }

    fn stump(self, left: f32, width: f32, top: f32) -> Self {
        self.push(ObstacleBody::Stump(Stump::new(Rect::new(
            left,
            top,
            width,
            FLOOR_Y - top,
        ))))
    }

    fn fountain(self, left: f32, rest_top: f32, amplitude: f32, period_ms: u64) -> Self {
        self.push(ObstacleBody::Fountain(Fountain::new(
            left, 60.0, rest_top, amplitude, period_ms,
        )))
    }

    fn spring(self, left: f32) -> Self {
        self.push(ObstacleBody::Spring(Spring::new(left, 50.0, 20.0)))
    }

    fn lotus(self, center_x: f32, drift: f32, period_ms: u64) -> Self {
        self.push(ObstacleBody::Lotus(LotusLeaf::new(
            Vec2::new(center_x, LEAF_Y),
            drift,
            period_ms,
        )))
    }

    fn rope(self, pivot_x: f32, config: &RopeConfig) -> Self {
        self.push(ObstacleBody::Rope(TarzanRope::new(
            Vec2::new(pivot_x, ROPE_PIVOT_Y),
            *config,
        )))
    }

    fn blocker(self, left: f32, kind: BlockerKind) -> Self {
        self.push(ObstacleBody::Blocker(Blocker::new(left, kind)))
    }

    fn pool(self, left: f32, size: PoolSize) -> Self {
        self.push(ObstacleBody::Pool(Pool::new(left, size)))
    }

    fn spawner(self, kind: SpawnKind, x: f32, y: f32) -> Self {
        let seed = spawner_seed(self.seed, self.screen, self.next_id());
        self.push(ObstacleBody::Spawner(Spawner::new(kind, x, y, seed)))
    }

    fn build(self) -> Vec<Obstacle> {
        self.obstacles
    }
}

/// Per-spawner seed mixed from the session seed, screen and id
fn spawner_seed(seed: u64, screen: u32, id: ObstacleId) -> u64 {
    seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ ((screen as u64) << 32 | id.0 as u64)
}

/// Obstacles for screen `index`; indices past the last layout wrap around
pub fn build_screen(index: u32, seed: u64, rope: &RopeConfig) -> Vec<Obstacle> {
    let screen = index % SCREEN_COUNT;
    let layout = Layout::new(screen, seed);

    let layout = match screen {
        0 => layout
            .stump(260.0, 60.0, 450.0)
            .blocker(460.0, BlockerKind::Rock)
            .pool(600.0, PoolSize::Small)
            .spawner(SpawnKind::Apple, 400.0, CANOPY_Y),
        1 => layout
            .stump(200.0, 60.0, 440.0)
            .stump(440.0, 60.0, 420.0)
            .blocker(340.0, BlockerKind::Signboard)
            .pool(580.0, PoolSize::Small)
            .spawner(SpawnKind::Chestnut, 520.0, CANOPY_Y),
        2 => layout
            .lotus(380.0, 40.0, 4000)
            .pool(300.0, PoolSize::Large)
            .blocker(620.0, BlockerKind::Rock)
            .spawner(SpawnKind::Bee, 0.0, 420.0),
        3 => layout
            .rope(400.0, rope)
            .stump(600.0, 60.0, 440.0)
            .pool(300.0, PoolSize::Large)
            .spawner(SpawnKind::RollingRock, 0.0, 0.0),
        4 => layout
            .fountain(300.0, 420.0, 50.0, 3000)
            .spring(540.0)
            .pool(380.0, PoolSize::Small)
            .spawner(SpawnKind::Chestnut, 330.0, CANOPY_Y)
            .spawner(SpawnKind::Apple, 650.0, CANOPY_Y),
        _ => layout
            .spring(180.0)
            .rope(330.0, rope)
            .lotus(560.0, 30.0, 3500)
            .blocker(700.0, BlockerKind::Signboard)
            .pool(480.0, PoolSize::Large)
            .spawner(SpawnKind::Bee, 0.0, 400.0)
            .spawner(SpawnKind::RollingRock, 0.0, 0.0)
            .spawner(SpawnKind::Apple, 250.0, CANOPY_Y),
    };

    layout.build()
}
