//! Obstacle sum type and its uniform update / collision / reset contract
//!
//! Each variant keeps its own behaviour in its module; this file only
//! dispatches. Screens hold obstacles in a `Vec` whose order is load-bearing
//! (see `collision::run_obstacle_pass`), so nothing here sorts or reorders.

use serde::{Deserialize, Serialize};

use super::collision::{CollisionPolicy, OverlapKind};
use super::geom::Rect;
use super::hazard::{Blocker, Pool};
use super::platform::{Fountain, LotusLeaf, Spring, Stump};
use super::player::Player;
use super::spawner::{SpawnKind, Spawner};
use super::state::GameEvent;
use super::swing::TarzanRope;

/// Identifier of an obstacle, unique within its screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObstacleId(pub u32);

/// Coarse category of an obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleKind {
    Blocker,
    Hazard,
    Platform,
    AttachSurface,
    Rope,
    Spring,
    Collectible,
}

/// Per-kind state
#[derive(Debug, Clone)]
pub enum ObstacleBody {
    Blocker(Blocker),
    Pool(Pool),
    Stump(Stump),
    Fountain(Fountain),
    Spring(Spring),
    Lotus(LotusLeaf),
    Rope(TarzanRope),
    Spawner(Spawner),
}

/// An interactive entity on a screen
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub id: ObstacleId,
    pub body: ObstacleBody,
}

impl Obstacle {
    pub fn new(id: ObstacleId, body: ObstacleBody) -> Self {
        Self { id, body }
    }

    pub fn kind(&self) -> ObstacleKind {
        match &self.body {
            ObstacleBody::Blocker(_) => ObstacleKind::Blocker,
            ObstacleBody::Pool(_) => ObstacleKind::Hazard,
            ObstacleBody::Stump(_) | ObstacleBody::Fountain(_) => ObstacleKind::Platform,
            ObstacleBody::Spring(_) => ObstacleKind::Spring,
            ObstacleBody::Lotus(_) => ObstacleKind::AttachSurface,
            ObstacleBody::Rope(_) => ObstacleKind::Rope,
            ObstacleBody::Spawner(s) => match s.kind {
                SpawnKind::Apple => ObstacleKind::Collectible,
                _ => ObstacleKind::Hazard,
            },
        }
    }

    /// How this obstacle combines with others in a collision pass
    pub fn policy(&self) -> CollisionPolicy {
        match self.kind() {
            ObstacleKind::Blocker => CollisionPolicy::Barrier,
            ObstacleKind::Hazard => CollisionPolicy::Hazard,
            ObstacleKind::Collectible => CollisionPolicy::Pickup,
            ObstacleKind::Platform
            | ObstacleKind::AttachSurface
            | ObstacleKind::Rope
            | ObstacleKind::Spring => CollisionPolicy::Support,
        }
    }

    /// Advance internal motion and timers
    pub fn update(&mut self, now_ms: u64) {
        match &mut self.body {
            ObstacleBody::Blocker(_) | ObstacleBody::Pool(_) | ObstacleBody::Stump(_) => {}
            ObstacleBody::Fountain(f) => f.update(now_ms),
            ObstacleBody::Spring(s) => s.update(now_ms),
            ObstacleBody::Lotus(l) => l.update(now_ms),
            ObstacleBody::Rope(r) => r.update(now_ms),
            ObstacleBody::Spawner(s) => s.update(now_ms),
        }
    }

    /// Classify contact with the player without touching anything
    pub fn query_overlap(&self, player: &Player, now_ms: u64) -> OverlapKind {
        match &self.body {
            ObstacleBody::Blocker(b) => b.query(player),
            ObstacleBody::Pool(p) => p.query(player),
            ObstacleBody::Stump(s) => s.query(player),
            ObstacleBody::Fountain(f) => f.query(player),
            ObstacleBody::Spring(s) => s.query(player),
            ObstacleBody::Lotus(l) => l.query(player),
            ObstacleBody::Rope(r) => r.query(self.id, player, now_ms),
            ObstacleBody::Spawner(s) => s.query(player),
        }
    }

    /// Apply a verdict from `query_overlap`
    pub fn resolve(
        &mut self,
        overlap: OverlapKind,
        player: &mut Player,
        now_ms: u64,
        events: &mut Vec<GameEvent>,
    ) {
        let id = self.id;
        match &mut self.body {
            ObstacleBody::Lotus(l) => l.resolve(id, overlap, player),
            ObstacleBody::Spring(s) => s.resolve(id, overlap, player, now_ms, events),
            ObstacleBody::Rope(r) => r.resolve(id, overlap, player, events),
            ObstacleBody::Spawner(s) => s.resolve(overlap, events),
            ObstacleBody::Blocker(_)
            | ObstacleBody::Pool(_)
            | ObstacleBody::Stump(_)
            | ObstacleBody::Fountain(_) => apply_common(id, overlap, player),
        }
    }

    /// Query then resolve in one call. Returns true when the obstacle
    /// interacted with the player this frame.
    pub fn check_collision(
        &mut self,
        player: &mut Player,
        now_ms: u64,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        let overlap = self.query_overlap(player, now_ms);
        if overlap == OverlapKind::None {
            return false;
        }
        self.resolve(overlap, player, now_ms, events);
        true
    }

    /// Back to the screen's initial configuration
    pub fn reset(&mut self) {
        match &mut self.body {
            ObstacleBody::Blocker(_) | ObstacleBody::Pool(_) | ObstacleBody::Stump(_) => {}
            ObstacleBody::Fountain(f) => f.reset(),
            ObstacleBody::Spring(s) => s.reset(),
            ObstacleBody::Lotus(l) => l.reset(),
            ObstacleBody::Rope(r) => r.reset(),
            ObstacleBody::Spawner(s) => s.reset(),
        }
    }

    /// Current footprint for the host's drawing; None when nothing is shown
    pub fn bounds(&self) -> Option<Rect> {
        match &self.body {
            ObstacleBody::Blocker(b) => Some(b.rect),
            ObstacleBody::Pool(p) => Some(p.rect),
            ObstacleBody::Stump(s) => Some(s.rect),
            ObstacleBody::Fountain(f) => Some(f.surface()),
            ObstacleBody::Spring(s) => Some(s.surface()),
            ObstacleBody::Lotus(l) => Some(l.surface()),
            ObstacleBody::Rope(r) => r.bounds(),
            ObstacleBody::Spawner(s) => s.bounds(),
        }
    }
}

/// Resolution shared by surfaces, walls and hazards
pub(crate) fn apply_common(id: ObstacleId, overlap: OverlapKind, player: &mut Player) {
    use super::player::Attachment;

    match overlap {
        OverlapKind::Land { top } => player.land_on(Attachment::Platform { id, top }),
        OverlapKind::Side { x } => player.push_to_x(x),
        OverlapKind::Below { y } => player.push_below(y),
        // Fatal contacts and walls are collected by the pass and handled by
        // the frame loop
        _ => {}
    }
}
