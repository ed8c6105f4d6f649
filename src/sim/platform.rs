//! Standable surfaces: stumps, fountains, spring boards and lotus leaves
//!
//! All of them classify contact with [`classify_surface`]; they differ in how
//! the surface moves and what landing on it does.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{OverlapKind, classify_surface};
use super::geom::Rect;
use super::obstacle::{ObstacleId, apply_common};
use super::player::{Attachment, Player};
use super::state::GameEvent;
use crate::consts::*;
use crate::oscillate;

/// Tree stump: a fixed block the player can stand on
#[derive(Debug, Clone)]
pub struct Stump {
    pub rect: Rect,
}

impl Stump {
    pub fn new(rect: Rect) -> Self {
        Self { rect }
    }

    pub fn query(&self, player: &Player) -> OverlapKind {
        classify_surface(player, &self.rect)
    }
}

/// Water column whose board rises and falls
#[derive(Debug, Clone)]
pub struct Fountain {
    pub left: f32,
    pub width: f32,
    /// Board height at the middle of the swing
    pub rest_top: f32,
    pub amplitude: f32,
    pub period_ms: u64,
    pub phase: f32,
    top: f32,
}

impl Fountain {
    pub fn new(left: f32, width: f32, rest_top: f32, amplitude: f32, period_ms: u64) -> Self {
        Self {
            left,
            width,
            rest_top,
            amplitude,
            period_ms,
            phase: 0.0,
            top: rest_top,
        }
    }

    pub fn update(&mut self, now_ms: u64) {
        self.top = self.rest_top + self.amplitude * oscillate(now_ms, self.period_ms, self.phase);
    }

    pub fn top(&self) -> f32 {
        self.top
    }

    /// Board plus the water column under it
    pub fn surface(&self) -> Rect {
        Rect::new(self.left, self.top, self.width, FLOOR_Y - self.top)
    }

    pub fn query(&self, player: &Player) -> OverlapKind {
        classify_surface(player, &self.surface())
    }

    pub fn reset(&mut self) {
        self.top = self.rest_top + self.amplitude * self.phase.sin();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpringState {
    Idle,
    Compressed { since_ms: u64 },
}

/// Spring board: launches the player once per compression cycle
#[derive(Debug, Clone)]
pub struct Spring {
    pub rect: Rect,
    pub state: SpringState,
    pub impulse: f32,
    pub compress_ms: u64,
}

impl Spring {
    pub fn new(left: f32, width: f32, height: f32) -> Self {
        Self {
            rect: Rect::on_floor(left, width, height, FLOOR_Y),
            state: SpringState::Idle,
            impulse: SPRING_IMPULSE,
            compress_ms: SPRING_COMPRESS_MS,
        }
    }

    pub fn is_compressed(&self) -> bool {
        matches!(self.state, SpringState::Compressed { .. })
    }

    pub fn update(&mut self, now_ms: u64) {
        if let SpringState::Compressed { since_ms } = self.state {
            if now_ms.saturating_sub(since_ms) >= self.compress_ms {
                self.state = SpringState::Idle;
            }
        }
    }

    pub fn surface(&self) -> Rect {
        self.rect
    }

    pub fn query(&self, player: &Player) -> OverlapKind {
        match classify_surface(player, &self.rect) {
            OverlapKind::Land { top } if !self.is_compressed() => OverlapKind::SpringLaunch { top },
            other => other,
        }
    }

    pub fn resolve(
        &mut self,
        id: ObstacleId,
        overlap: OverlapKind,
        player: &mut Player,
        now_ms: u64,
        events: &mut Vec<GameEvent>,
    ) {
        match overlap {
            OverlapKind::SpringLaunch { top } => {
                self.state = SpringState::Compressed { since_ms: now_ms };
                player.launch(top, self.impulse);
                log::debug!("Spring {:?} launched player", id);
                events.push(GameEvent::SpringLaunched { spring: id });
            }
            other => apply_common(id, other, player),
        }
    }

    pub fn reset(&mut self) {
        self.state = SpringState::Idle;
    }
}

/// Half width of a lotus leaf
const LEAF_HALF_WIDTH: f32 = 35.0;
const LEAF_THICKNESS: f32 = 6.0;

/// Leaf drifting over a pool; carries whoever stands on it
#[derive(Debug, Clone)]
pub struct LotusLeaf {
    /// Top centre at the middle of the drift
    pub rest: Vec2,
    pub drift_range: f32,
    pub period_ms: u64,
    center_x: f32,
    /// Horizontal displacement during the last update
    dx: f32,
}

impl LotusLeaf {
    pub fn new(rest: Vec2, drift_range: f32, period_ms: u64) -> Self {
        Self {
            rest,
            drift_range,
            period_ms,
            center_x: rest.x,
            dx: 0.0,
        }
    }

    pub fn update(&mut self, now_ms: u64) {
        let x = self.rest.x + self.drift_range * oscillate(now_ms, self.period_ms, 0.0);
        self.dx = x - self.center_x;
        self.center_x = x;
    }

    pub fn surface(&self) -> Rect {
        Rect::new(
            self.center_x - LEAF_HALF_WIDTH,
            self.rest.y,
            LEAF_HALF_WIDTH * 2.0,
            LEAF_THICKNESS,
        )
    }

    pub fn displacement(&self) -> f32 {
        self.dx
    }

    pub fn query(&self, player: &Player) -> OverlapKind {
        classify_surface(player, &self.surface())
    }

    pub fn resolve(&mut self, id: ObstacleId, overlap: OverlapKind, player: &mut Player) {
        match overlap {
            OverlapKind::Land { top } => {
                if player.surface_id() == Some(id) {
                    player.pos.x += self.dx;
                }
                player.land_on(Attachment::Lotus { id, top });
            }
            other => apply_common(id, other, player),
        }
    }

    pub fn reset(&mut self) {
        self.center_x = self.rest.x;
        self.dx = 0.0;
    }
}
