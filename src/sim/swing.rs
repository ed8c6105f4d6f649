//! Tarzan rope: a swinging pivot driving a [`RopeChain`]
//!
//! The pivot sways on a wall-clock sine; the chain simulates independently of
//! any collision call. Only the chain tip is grabbable.

use glam::Vec2;

use super::collision::OverlapKind;
use super::geom::Rect;
use super::obstacle::ObstacleId;
use super::player::Player;
use super::rope::{RopeChain, RopeConfig};
use super::state::GameEvent;
use crate::oscillate;

/// Peak swing angle (radians)
const MAX_SWING_ANGLE: f32 = 0.6;
const SWING_PERIOD_MS: u64 = 3000;
/// Horizontal sway of the pivot at peak swing
const PIVOT_SWAY: f32 = 6.0;

#[derive(Debug, Clone)]
pub struct TarzanRope {
    pub pivot: Vec2,
    pub max_angle: f32,
    pub period_ms: u64,
    swing_angle: f32,
    chain: RopeChain,
}

impl TarzanRope {
    pub fn new(pivot: Vec2, config: RopeConfig) -> Self {
        Self {
            pivot,
            max_angle: MAX_SWING_ANGLE,
            period_ms: SWING_PERIOD_MS,
            swing_angle: 0.0,
            chain: RopeChain::new(pivot, config),
        }
    }

    /// Anchor position for the current swing angle
    fn anchor(&self) -> Vec2 {
        self.pivot + Vec2::new(self.swing_angle.sin() * PIVOT_SWAY, 0.0)
    }

    pub fn update(&mut self, now_ms: u64) {
        self.swing_angle = self.max_angle * oscillate(now_ms, self.period_ms, 0.0);
        let anchor = self.anchor();
        self.chain.step(anchor, self.swing_angle);
    }

    pub fn swing_angle(&self) -> f32 {
        self.swing_angle
    }

    pub fn chain(&self) -> &RopeChain {
        &self.chain
    }

    /// Tip test only; the rope body never collides
    pub fn query(&self, id: ObstacleId, player: &Player, now_ms: u64) -> OverlapKind {
        let Some(tip) = self.chain.tip() else {
            return OverlapKind::None;
        };

        if player.rope_id() == Some(id) {
            return OverlapKind::RopeFollow;
        }

        let cfg = self.chain.config();
        let reachable = player.is_airborne()
            && player.pos.y < cfg.grab_max_y
            && self.chain.can_grab(now_ms)
            && player.pos.distance(tip) <= cfg.grab_radius;
        if reachable {
            OverlapKind::RopeGrab
        } else {
            OverlapKind::None
        }
    }

    pub fn resolve(
        &mut self,
        id: ObstacleId,
        overlap: OverlapKind,
        player: &mut Player,
        events: &mut Vec<GameEvent>,
    ) {
        let Some(tip) = self.chain.tip() else {
            return;
        };
        let tip_velocity = self.chain.tip_velocity();

        match overlap {
            OverlapKind::RopeGrab => {
                self.chain.grab();
                player.attach_rope(id, tip, tip_velocity);
                log::debug!("Grabbed rope {:?} at ({:.1}, {:.1})", id, tip.x, tip.y);
                events.push(GameEvent::RopeGrabbed { rope: id });
            }
            OverlapKind::RopeFollow => player.follow_rope(tip, tip_velocity),
            _ => {}
        }
    }

    /// Let go of the chain, opening its grace window
    pub fn release(&mut self, now_ms: u64) {
        self.chain.release(now_ms);
    }

    pub fn reset(&mut self) {
        self.swing_angle = 0.0;
        self.chain.reset(self.pivot);
    }

    /// Box around the chain once it has simulated
    pub fn bounds(&self) -> Option<Rect> {
        if !self.chain.is_initialized() {
            return None;
        }
        let points = self.chain.points();
        let (min, max) = points.iter().fold(
            (Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)),
            |(lo, hi), p| (lo.min(p.pos), hi.max(p.pos)),
        );
        Some(Rect::new(min.x, min.y, max.x - min.x, max.y - min.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::player::PlayerConfig;
    use crate::sim::tick::TickInput;

    fn rope() -> TarzanRope {
        TarzanRope::new(Vec2::new(400.0, 100.0), RopeConfig::default())
    }

    fn player_at(pos: Vec2) -> Player {
        let mut player = Player::new(PlayerConfig::default());
        player.pos = pos;
        player.velocity_y = 1.0;
        player.on_ground = false;
        player
    }

    #[test]
    fn test_no_grab_before_first_update() {
        let rope = rope();
        let player = player_at(Vec2::new(400.0, 300.0));
        assert_eq!(rope.query(ObstacleId(1), &player, 0), OverlapKind::None);
    }

    #[test]
    fn test_grounded_player_cannot_grab() {
        let mut rope = rope();
        rope.update(0);
        let tip = rope.chain().tip().unwrap();
        let mut player = player_at(tip);
        player.on_ground = true;
        assert_eq!(rope.query(ObstacleId(1), &player, 0), OverlapKind::None);
    }

    #[test]
    fn test_rope_grab_release_cycle() {
        let id = ObstacleId(1);
        let mut rope = rope();
        let mut events = Vec::new();
        rope.update(0);

        // Airborne within reach of the tip
        let tip = rope.chain().tip().unwrap();
        let mut player = player_at(tip + Vec2::new(10.0, 5.0));
        let overlap = rope.query(id, &player, 0);
        assert_eq!(overlap, OverlapKind::RopeGrab);
        rope.resolve(id, overlap, &mut player, &mut events);
        assert!(player.is_on_rope());
        assert!(rope.chain().is_held());
        assert_eq!(player.pos, tip);
        assert_eq!(events, vec![GameEvent::RopeGrabbed { rope: id }]);

        // Follows the tip while attached
        rope.update(16);
        let overlap = rope.query(id, &player, 16);
        assert_eq!(overlap, OverlapKind::RopeFollow);
        rope.resolve(id, overlap, &mut player, &mut events);
        assert_eq!(player.pos, rope.chain().tip().unwrap());

        // Jump lets go at 80% of the jump force
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        player.update(&jump, 32, 2);
        assert!(!player.is_on_rope());
        assert!((player.velocity_y - JUMP_FORCE * ROPE_JUMP_FACTOR).abs() < 1e-6);
        assert!(player.take_events().contains(&GameEvent::RopeReleased { rope: id }));
        rope.release(32);

        // Still overlapping the tip, but inside the grace window
        rope.update(48);
        let mut player = player_at(rope.chain().tip().unwrap());
        assert_eq!(rope.query(id, &player, 48), OverlapKind::None);
        assert_eq!(rope.query(id, &player, 32 + ROPE_RELEASE_GRACE_MS - 1), OverlapKind::None);

        // After the window the same position grabs again
        let later = 32 + ROPE_RELEASE_GRACE_MS;
        rope.update(later);
        player.pos = rope.chain().tip().unwrap();
        assert_eq!(rope.query(id, &player, later), OverlapKind::RopeGrab);
    }

    #[test]
    fn test_reset_reseeds_chain() {
        let mut rope = rope();
        for t in 0..50 {
            rope.update(t * FRAME_MS);
        }
        rope.reset();
        assert!(rope.chain().tip().is_none());
        assert!(rope.bounds().is_none());
        assert_eq!(rope.chain().anchor(), Vec2::new(400.0, 100.0));
    }
}
