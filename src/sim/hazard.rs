//! Static blockers and ground pools

use serde::{Deserialize, Serialize};

use super::collision::{OverlapKind, push_out_x};
use super::geom::Rect;
use super::player::Player;
use crate::consts::FLOOR_Y;

/// Depth of a pool's kill region above the floor line
const POOL_DEPTH: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockerKind {
    Rock,
    Signboard,
}

impl BlockerKind {
    /// (width, height) of the footprint
    pub fn size(self) -> (f32, f32) {
        match self {
            BlockerKind::Rock => (40.0, 30.0),
            BlockerKind::Signboard => (20.0, 60.0),
        }
    }
}

/// Solid wall standing on the floor
#[derive(Debug, Clone)]
pub struct Blocker {
    pub kind: BlockerKind,
    pub rect: Rect,
}

impl Blocker {
    pub fn new(left: f32, kind: BlockerKind) -> Self {
        let (width, height) = kind.size();
        Self {
            kind,
            rect: Rect::on_floor(left, width, height, FLOOR_Y),
        }
    }

    pub fn query(&self, player: &Player) -> OverlapKind {
        if !player.bounds().overlaps(&self.rect) {
            return OverlapKind::None;
        }
        OverlapKind::Blocking {
            x: push_out_x(player, &self.rect),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolSize {
    Small,
    Large,
}

impl PoolSize {
    pub fn width(self) -> f32 {
        match self {
            PoolSize::Small => 80.0,
            PoolSize::Large => 160.0,
        }
    }
}

/// Water sunk into the floor; touching it is fatal unless the player stands
/// on a leaf or platform above it
#[derive(Debug, Clone)]
pub struct Pool {
    pub size: PoolSize,
    pub rect: Rect,
}

impl Pool {
    pub fn new(left: f32, size: PoolSize) -> Self {
        Self {
            size,
            rect: Rect::on_floor(left, size.width(), POOL_DEPTH, FLOOR_Y),
        }
    }

    pub fn query(&self, player: &Player) -> OverlapKind {
        // Escape conditions come before the overlap test
        if player.is_on_lotus() || player.is_on_platform() {
            return OverlapKind::None;
        }
        if player.bounds().overlaps(&self.rect) {
            OverlapKind::Fatal
        } else {
            OverlapKind::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::obstacle::ObstacleId;
    use crate::sim::player::{Attachment, PlayerConfig};

    #[test]
    fn test_blocker_pushes_to_near_edge() {
        let rock = Blocker::new(300.0, BlockerKind::Rock);
        let mut player = Player::new(PlayerConfig::default());

        player.pos.x = 330.0;
        assert_eq!(rock.query(&player), OverlapKind::Blocking { x: 355.0 });

        player.pos.x = 310.0;
        assert_eq!(rock.query(&player), OverlapKind::Blocking { x: 285.0 });

        player.pos.x = 360.0;
        assert_eq!(rock.query(&player), OverlapKind::None);
    }

    #[test]
    fn test_jumping_clears_a_rock() {
        let rock = Blocker::new(300.0, BlockerKind::Rock);
        let mut player = Player::new(PlayerConfig::default());
        player.pos = glam::Vec2::new(320.0, 440.0);
        assert_eq!(rock.query(&player), OverlapKind::None);
    }

    #[test]
    fn test_pool_is_fatal_on_contact() {
        let pool = Pool::new(200.0, PoolSize::Small);
        let mut player = Player::new(PlayerConfig::default());
        player.pos.x = 240.0;
        assert_eq!(pool.query(&player), OverlapKind::Fatal);

        // Past the right edge
        player.pos.x = 300.0;
        assert_eq!(pool.query(&player), OverlapKind::None);
    }

    #[test]
    fn test_pool_escape_on_platform() {
        let pool = Pool::new(200.0, PoolSize::Large);
        let mut player = Player::new(PlayerConfig::default());
        player.pos.x = 240.0;
        player.attachment = Attachment::Platform {
            id: ObstacleId(1),
            top: 495.0,
        };
        assert_eq!(pool.query(&player), OverlapKind::None);
    }
}
