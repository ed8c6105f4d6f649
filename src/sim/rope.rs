//! Rope particle chain
//!
//! A Jakobsen-style chain of point masses relaxed toward fixed segment
//! lengths with a fixed number of Gauss-Seidel passes. The result only
//! approximately satisfies the segment constraints.
//!
//! Point 0 is the anchor, driven from outside and never simulated.
//! The last point is the tip the player grabs.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Rope solver tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RopeConfig {
    pub points: usize,
    pub segment_length: f32,
    pub gravity: f32,
    /// Velocity retained per step (< 1)
    pub damping: f32,
    pub iterations: usize,
    /// Correction applied to the first segment (anchor side only)
    pub anchor_tension: f32,
    /// Symmetric correction for every other segment
    pub tension: f32,
    /// Scale of the lateral kick given to the point next to the anchor
    pub swing_amplitude: f32,
    pub swing_force: f32,
    /// Share of each constraint displacement folded back into velocity.
    /// Zero runs the plain solver; positive values are opt-in.
    pub velocity_feedback: f32,
    /// Velocity kept (reflected) when a point hits the floor
    pub bounce: f32,
    pub floor_y: f32,
    pub grab_radius: f32,
    pub grab_max_y: f32,
    pub release_grace_ms: u64,
}

impl Default for RopeConfig {
    fn default() -> Self {
        Self {
            points: ROPE_POINTS,
            segment_length: ROPE_SEGMENT_LENGTH,
            gravity: 0.02,
            damping: 0.98,
            iterations: 5,
            anchor_tension: 0.95,
            tension: 0.7,
            swing_amplitude: 1.0,
            swing_force: 0.8,
            velocity_feedback: 0.0,
            bounce: 0.3,
            floor_y: FLOOR_Y,
            grab_radius: ROPE_GRAB_RADIUS,
            grab_max_y: ROPE_GRAB_MAX_Y,
            release_grace_ms: ROPE_RELEASE_GRACE_MS,
        }
    }
}

/// One point mass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RopePoint {
    pub pos: Vec2,
    pub vel: Vec2,
}

/// A constrained chain of point masses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RopeChain {
    points: Vec<RopePoint>,
    config: RopeConfig,
    /// False until the first `step`; no tip is reported before that
    initialized: bool,
    held: bool,
    released_at_ms: Option<u64>,
    /// Tip displacement during the last step
    tip_motion: Vec2,
}

impl RopeChain {
    /// Chain hanging straight down from `anchor`
    ///
    /// Panics if the configuration asks for no points at all.
    pub fn new(anchor: Vec2, config: RopeConfig) -> Self {
        assert!(config.points > 0, "rope needs at least one point");
        let mut chain = Self {
            points: Vec::with_capacity(config.points),
            config,
            initialized: false,
            held: false,
            released_at_ms: None,
            tip_motion: Vec2::ZERO,
        };
        chain.reset(anchor);
        chain
    }

    /// Re-seed to rest positions below `anchor`
    pub fn reset(&mut self, anchor: Vec2) {
        self.points.clear();
        self.points.extend((0..self.config.points).map(|i| RopePoint {
            pos: anchor + Vec2::new(0.0, i as f32 * self.config.segment_length),
            vel: Vec2::ZERO,
        }));
        self.initialized = false;
        self.held = false;
        self.released_at_ms = None;
        self.tip_motion = Vec2::ZERO;
    }

    /// Advance one step with the anchor driven to `anchor`
    pub fn step(&mut self, anchor: Vec2, swing_angle: f32) {
        let cfg = self.config;
        let n = self.points.len();
        let tip_before = self.tip();

        // Anchor is positioned from outside
        self.pin_anchor(anchor);

        // The swing is driven by a lateral force, not scripted positions
        if n > 1 {
            self.points[1].vel.x += swing_angle.sin() * cfg.swing_amplitude * cfg.swing_force;
        }

        let mut predicted = Vec::with_capacity(n);
        for p in self.points.iter_mut().skip(1) {
            p.vel.y += cfg.gravity;
            p.pos += p.vel;
            p.vel *= cfg.damping;
            predicted.push(p.pos);
        }

        self.relax();

        if cfg.velocity_feedback != 0.0 {
            for (p, before) in self.points.iter_mut().skip(1).zip(&predicted) {
                p.vel += (p.pos - *before) * cfg.velocity_feedback;
            }
        }

        self.pin_anchor(anchor);

        let floor = cfg.floor_y.min(SCREEN_HEIGHT);
        for p in self.points.iter_mut().skip(1) {
            if p.pos.y > floor {
                p.pos.y = floor;
                if p.vel.y > 0.0 {
                    p.vel.y = -p.vel.y * cfg.bounce;
                }
            }
        }

        self.initialized = true;
        if let (Some(before), Some(after)) = (tip_before, self.tip()) {
            self.tip_motion = after - before;
        }
    }

    fn pin_anchor(&mut self, anchor: Vec2) {
        if let Some(first) = self.points.first_mut() {
            first.pos = anchor;
            first.vel = Vec2::ZERO;
        }
    }

    /// Fixed number of Gauss-Seidel passes over the segment constraints
    fn relax(&mut self) {
        let cfg = self.config;
        for _ in 0..cfg.iterations {
            for i in 0..self.points.len().saturating_sub(1) {
                let delta = self.points[i + 1].pos - self.points[i].pos;
                let dist = delta.length();
                if dist < 1e-6 {
                    continue;
                }
                let diff = (dist - cfg.segment_length) / dist;

                if i == 0 {
                    self.points[1].pos -= delta * diff * cfg.anchor_tension;
                } else {
                    let offset = delta * diff * 0.5 * cfg.tension;
                    self.points[i].pos += offset;
                    self.points[i + 1].pos -= offset;
                }
            }
        }
    }

    /// Grabbable end, once the chain has simulated at least once
    pub fn tip(&self) -> Option<Vec2> {
        if !self.initialized {
            return None;
        }
        self.points.last().map(|p| p.pos)
    }

    /// How far the tip moved during the last step
    pub fn tip_velocity(&self) -> Vec2 {
        self.tip_motion
    }

    pub fn anchor(&self) -> Vec2 {
        self.points.first().map(|p| p.pos).unwrap_or(Vec2::ZERO)
    }

    pub fn points(&self) -> &[RopePoint] {
        &self.points
    }

    pub fn config(&self) -> &RopeConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    /// A player took hold of the tip
    pub fn grab(&mut self) {
        self.held = true;
    }

    /// The player let go; opens the grace window
    pub fn release(&mut self, now_ms: u64) {
        self.held = false;
        self.released_at_ms = Some(now_ms);
    }

    /// Free and outside the post-release grace window
    pub fn can_grab(&self, now_ms: u64) -> bool {
        if self.held {
            return false;
        }
        match self.released_at_ms {
            Some(at) => now_ms.saturating_sub(at) >= self.config.release_grace_ms,
            None => true,
        }
    }

    /// Sum of current segment lengths
    pub fn current_length(&self) -> f32 {
        self.points
            .windows(2)
            .map(|w| w[0].pos.distance(w[1].pos))
            .sum()
    }

    /// Length the chain relaxes toward
    pub fn rest_length(&self) -> f32 {
        self.points.len().saturating_sub(1) as f32 * self.config.segment_length
    }
}
