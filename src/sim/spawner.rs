//! Timed spawners: falling chestnuts, bees, rolling rocks and apples
//!
//! Each spawner owns at most one live entity. When it is inactive the next
//! spawn is scheduled on the wall clock from its own seeded RNG, so a screen
//! replays identically for the same seed and timings.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::OverlapKind;
use super::geom::{Rect, circle_overlaps_rect};
use super::player::Player;
use super::state::GameEvent;
use crate::consts::*;

const CHESTNUT_RADIUS: f32 = 8.0;
const CHESTNUT_GRAVITY: f32 = 0.3;
const BEE_HALF_SIZE: Vec2 = Vec2::new(10.0, 7.0);
const BEE_SPEED: f32 = 2.5;
const BEE_BOB: f32 = 20.0;
const BEE_BOB_PERIOD_MS: u64 = 800;
const ROCK_RADIUS: f32 = 14.0;
const ROCK_SPEED: f32 = 3.0;
const ROCK_GRAVITY: f32 = 0.4;
const ROCK_BOUNCE: f32 = 0.6;
const APPLE_RADIUS: f32 = 10.0;
const APPLE_GRAVITY: f32 = 0.25;
const APPLE_LIFETIME_MS: u64 = 4000;
/// Entities start and vanish this far past the screen edge
const OFFSCREEN_MARGIN: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnKind {
    Chestnut,
    Bee,
    RollingRock,
    Apple,
}

impl SpawnKind {
    /// Delay range between one entity leaving and the next appearing (ms)
    fn interval_ms(self) -> (u64, u64) {
        match self {
            SpawnKind::Chestnut => (1500, 3500),
            SpawnKind::Bee => (3000, 6000),
            SpawnKind::RollingRock => (4000, 7000),
            SpawnKind::Apple => (5000, 9000),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Spawner {
    pub kind: SpawnKind,
    /// Spawn reference point (canopy for falling kinds, flight line for bees)
    pub origin: Vec2,
    pub active: bool,
    pub pos: Vec2,
    pub vel: Vec2,
    seed: u64,
    rng: Pcg32,
    /// None until the first update after a reset or an entity leaving
    next_spawn_ms: Option<u64>,
    spawned_at_ms: u64,
    landed: bool,
}

impl Spawner {
    pub fn new(kind: SpawnKind, origin_x: f32, origin_y: f32, seed: u64) -> Self {
        Self {
            kind,
            origin: Vec2::new(origin_x, origin_y),
            active: false,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            next_spawn_ms: None,
            spawned_at_ms: 0,
            landed: false,
        }
    }

    pub fn next_spawn_ms(&self) -> Option<u64> {
        self.next_spawn_ms
    }

    pub fn update(&mut self, now_ms: u64) {
        if !self.active {
            match self.next_spawn_ms {
                None => self.schedule(now_ms),
                Some(at) if now_ms >= at => self.spawn(now_ms),
                Some(_) => {}
            }
            return;
        }

        let alive = match self.kind {
            SpawnKind::Chestnut => self.step_chestnut(),
            SpawnKind::Bee => self.step_bee(now_ms),
            SpawnKind::RollingRock => self.step_rock(),
            SpawnKind::Apple => self.step_apple(now_ms),
        };
        if !alive {
            self.despawn(now_ms);
        }
    }

    fn schedule(&mut self, now_ms: u64) {
        let (lo, hi) = self.kind.interval_ms();
        self.next_spawn_ms = Some(now_ms + self.rng.random_range(lo..hi));
    }

    fn spawn(&mut self, now_ms: u64) {
        self.active = true;
        self.landed = false;
        self.spawned_at_ms = now_ms;
        self.next_spawn_ms = None;
        self.vel = Vec2::ZERO;
        self.pos = match self.kind {
            SpawnKind::Chestnut | SpawnKind::Apple => {
                let offset = self.rng.random_range(-40.0f32..40.0);
                Vec2::new(self.origin.x + offset, self.origin.y)
            }
            SpawnKind::Bee => Vec2::new(SCREEN_WIDTH + OFFSCREEN_MARGIN, self.origin.y),
            SpawnKind::RollingRock => {
                self.vel.y = -self.rng.random_range(2.0f32..6.0);
                Vec2::new(SCREEN_WIDTH + OFFSCREEN_MARGIN, FLOOR_Y - ROCK_RADIUS)
            }
        };
        log::debug!("Spawned {:?} at ({:.1}, {:.1})", self.kind, self.pos.x, self.pos.y);
    }

    fn despawn(&mut self, now_ms: u64) {
        self.active = false;
        self.schedule(now_ms);
    }

    fn step_chestnut(&mut self) -> bool {
        self.vel.y += CHESTNUT_GRAVITY;
        self.pos += self.vel;
        self.pos.y - CHESTNUT_RADIUS < FLOOR_Y
    }

    fn step_bee(&mut self, now_ms: u64) -> bool {
        let elapsed = now_ms.saturating_sub(self.spawned_at_ms);
        self.pos.x -= BEE_SPEED;
        self.pos.y = self.origin.y + BEE_BOB * crate::oscillate(elapsed, BEE_BOB_PERIOD_MS, 0.0);
        self.pos.x > -OFFSCREEN_MARGIN
    }

    fn step_rock(&mut self) -> bool {
        self.vel.x = -ROCK_SPEED;
        self.vel.y += ROCK_GRAVITY;
        self.pos += self.vel;
        let rest_y = FLOOR_Y - ROCK_RADIUS;
        if self.pos.y > rest_y {
            self.pos.y = rest_y;
            self.vel.y = -self.vel.y * ROCK_BOUNCE;
        }
        self.pos.x > -OFFSCREEN_MARGIN
    }

    fn step_apple(&mut self, now_ms: u64) -> bool {
        if !self.landed {
            self.vel.y += APPLE_GRAVITY;
            self.pos += self.vel;
            let rest_y = FLOOR_Y - APPLE_RADIUS;
            if self.pos.y >= rest_y {
                self.pos.y = rest_y;
                self.vel = Vec2::ZERO;
                self.landed = true;
                self.spawned_at_ms = now_ms;
            }
            return true;
        }
        now_ms.saturating_sub(self.spawned_at_ms) < APPLE_LIFETIME_MS
    }

    fn touches(&self, body: &Rect) -> bool {
        match self.kind {
            SpawnKind::Chestnut => circle_overlaps_rect(self.pos, CHESTNUT_RADIUS, body),
            SpawnKind::RollingRock => circle_overlaps_rect(self.pos, ROCK_RADIUS, body),
            SpawnKind::Apple => circle_overlaps_rect(self.pos, APPLE_RADIUS, body),
            SpawnKind::Bee => {
                Rect::from_center(self.pos, BEE_HALF_SIZE.x, BEE_HALF_SIZE.y).overlaps(body)
            }
        }
    }

    pub fn query(&self, player: &Player) -> OverlapKind {
        if !self.active || !self.touches(&player.bounds()) {
            return OverlapKind::None;
        }
        match self.kind {
            SpawnKind::Apple => OverlapKind::Collect {
                points: APPLE_POINTS,
            },
            _ => OverlapKind::Fatal,
        }
    }

    pub fn resolve(&mut self, overlap: OverlapKind, events: &mut Vec<GameEvent>) {
        if let OverlapKind::Collect { points } = overlap {
            self.active = false;
            self.next_spawn_ms = None;
            events.push(GameEvent::ItemCollected { points });
        }
    }

    /// Back to the freshly seeded state
    pub fn reset(&mut self) {
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.active = false;
        self.next_spawn_ms = None;
        self.pos = Vec2::ZERO;
        self.vel = Vec2::ZERO;
        self.landed = false;
    }

    pub fn bounds(&self) -> Option<Rect> {
        if !self.active {
            return None;
        }
        let half = match self.kind {
            SpawnKind::Chestnut => Vec2::splat(CHESTNUT_RADIUS),
            SpawnKind::RollingRock => Vec2::splat(ROCK_RADIUS),
            SpawnKind::Apple => Vec2::splat(APPLE_RADIUS),
            SpawnKind::Bee => BEE_HALF_SIZE,
        };
        Some(Rect::from_center(self.pos, half.x, half.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::player::PlayerConfig;

    /// Run updates every frame until the spawner goes live
    fn run_until_active(spawner: &mut Spawner, mut now: u64) -> u64 {
        for _ in 0..2000 {
            spawner.update(now);
            if spawner.active {
                return now;
            }
            now += FRAME_MS;
        }
        panic!("{:?} never spawned", spawner.kind);
    }

    #[test]
    fn test_spawn_waits_for_interval() {
        let mut spawner = Spawner::new(SpawnKind::Chestnut, 300.0, 80.0, 1);
        spawner.update(1000);
        let at = spawner.next_spawn_ms().unwrap();
        assert!((1000 + 1500..1000 + 3500).contains(&at));
        assert!(!spawner.active);

        spawner.update(at - 1);
        assert!(!spawner.active);
        spawner.update(at);
        assert!(spawner.active);
        assert!(spawner.bounds().is_some());
    }

    #[test]
    fn test_chestnut_falls_and_despawns() {
        let mut spawner = Spawner::new(SpawnKind::Chestnut, 300.0, 80.0, 2);
        let mut now = run_until_active(&mut spawner, 0);
        let y0 = spawner.pos.y;
        let mut ticks = 0;
        while spawner.active {
            now += FRAME_MS;
            spawner.update(now);
            ticks += 1;
            assert!(ticks < 500);
        }
        assert!(ticks > 10);
        assert!(y0 < FLOOR_Y);
        assert!(spawner.next_spawn_ms().unwrap() > now);
    }

    #[test]
    fn test_chestnut_is_fatal() {
        let mut spawner = Spawner::new(SpawnKind::Chestnut, 300.0, 80.0, 3);
        run_until_active(&mut spawner, 0);
        let mut player = Player::new(PlayerConfig::default());
        player.pos = spawner.pos;
        assert_eq!(spawner.query(&player), OverlapKind::Fatal);

        player.pos.x += 200.0;
        assert_eq!(spawner.query(&player), OverlapKind::None);
    }

    #[test]
    fn test_bee_crosses_screen_right_to_left() {
        let mut spawner = Spawner::new(SpawnKind::Bee, 0.0, 420.0, 4);
        let mut now = run_until_active(&mut spawner, 0);
        assert!(spawner.pos.x > SCREEN_WIDTH);
        let mut last_x = spawner.pos.x;
        while spawner.active {
            now += FRAME_MS;
            spawner.update(now);
            if spawner.active {
                assert!(spawner.pos.x < last_x);
                assert!((spawner.pos.y - 420.0).abs() <= BEE_BOB + 1e-3);
                last_x = spawner.pos.x;
            }
        }
        assert!(last_x < 0.0);
    }

    #[test]
    fn test_rolling_rock_stays_above_floor() {
        let mut spawner = Spawner::new(SpawnKind::RollingRock, 0.0, 0.0, 5);
        let mut now = run_until_active(&mut spawner, 0);
        while spawner.active {
            now += FRAME_MS;
            spawner.update(now);
            assert!(spawner.pos.y <= FLOOR_Y - ROCK_RADIUS + 1e-3);
        }
    }

    #[test]
    fn test_apple_collected_once() {
        let mut spawner = Spawner::new(SpawnKind::Apple, 300.0, 200.0, 6);
        let mut now = run_until_active(&mut spawner, 0);
        while !spawner.landed {
            now += FRAME_MS;
            spawner.update(now);
        }

        let mut player = Player::new(PlayerConfig::default());
        player.pos.x = spawner.pos.x;
        let overlap = spawner.query(&player);
        assert_eq!(
            overlap,
            OverlapKind::Collect {
                points: APPLE_POINTS
            }
        );

        let mut events = Vec::new();
        spawner.resolve(overlap, &mut events);
        assert_eq!(
            events,
            vec![GameEvent::ItemCollected {
                points: APPLE_POINTS
            }]
        );
        assert!(!spawner.active);
        assert_eq!(spawner.query(&player), OverlapKind::None);
    }

    #[test]
    fn test_apple_expires() {
        let mut spawner = Spawner::new(SpawnKind::Apple, 300.0, 200.0, 7);
        let mut now = run_until_active(&mut spawner, 0);
        while !spawner.landed {
            now += FRAME_MS;
            spawner.update(now);
        }
        spawner.update(now + APPLE_LIFETIME_MS - 1);
        assert!(spawner.active);
        spawner.update(now + APPLE_LIFETIME_MS);
        assert!(!spawner.active);
    }

    #[test]
    fn test_reset_replays_schedule() {
        let mut a = Spawner::new(SpawnKind::Bee, 0.0, 400.0, 42);
        a.update(0);
        let first = a.next_spawn_ms();
        run_until_active(&mut a, 0);

        a.reset();
        assert!(!a.active);
        a.update(0);
        assert_eq!(a.next_spawn_ms(), first);
    }
}
