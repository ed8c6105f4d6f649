//! Player kinematic state machine
//!
//! One `update` per tick resolves the player's motion from input intents and
//! the current attachment:
//! - Dead: frozen until the wall-clock death timer expires
//! - OnRope: follows the rope tip, jump lets go
//! - OnPlatform / OnLotus: pinned to the surface top, jump leaves it
//! - Free: gravity plus direct or momentum-driven horizontal motion
//!
//! Obstacles mutate the player afterwards through the `land_on`,
//! `attach_rope`, `push_*` family; the frame loop finishes with
//! `apply_ground_clamp`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use super::obstacle::ObstacleId;
use super::state::GameEvent;
use super::tick::TickInput;
use crate::consts::*;

/// Player motion tuning (all per-tick quantities unless noted)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub gravity: f32,
    pub jump_force: f32,
    pub move_speed: f32,
    pub max_fall_speed: f32,
    pub momentum_decay: f32,
    pub jump_cooldown_frames: u32,
    pub rope_jump_factor: f32,
    /// Cap on horizontal carry when letting go of a swinging rope
    pub rope_carry_max: f32,
    pub death_duration_ms: u64,
    pub half_width: f32,
    pub half_height: f32,
    pub start_x: f32,
    pub screen_width: f32,
}

impl PlayerConfig {
    /// Centre height of a player standing on the floor. Follows the obstacle
    /// floor line so it cannot disagree with pools and blockers.
    pub fn ground_y(&self) -> f32 {
        FLOOR_Y - self.half_height
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_force: JUMP_FORCE,
            move_speed: MOVE_SPEED,
            max_fall_speed: MAX_FALL_SPEED,
            momentum_decay: MOMENTUM_DECAY,
            jump_cooldown_frames: JUMP_COOLDOWN_FRAMES,
            rope_jump_factor: ROPE_JUMP_FACTOR,
            rope_carry_max: MOVE_SPEED * 1.5,
            death_duration_ms: DEATH_DURATION_MS,
            half_width: PLAYER_HALF_WIDTH,
            half_height: PLAYER_HALF_HEIGHT,
            start_x: PLAYER_START_X,
            screen_width: SCREEN_WIDTH,
        }
    }
}

/// What currently overrides free-fall motion. A single field, so at most one
/// attachment can ever hold.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Attachment {
    #[default]
    None,
    /// Standing on a stump, fountain or spring board
    Platform { id: ObstacleId, top: f32 },
    /// Hanging from a rope tip
    Rope {
        id: ObstacleId,
        tip: Vec2,
        tip_velocity: Vec2,
    },
    /// Riding a lotus leaf
    Lotus { id: ObstacleId, top: f32 },
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Position at the start of the current tick
    pub prev_pos: Vec2,
    pub velocity_y: f32,
    /// Facing, -1 or +1
    pub direction: i8,
    pub attachment: Attachment,
    /// Standing on the floor line
    pub on_ground: bool,
    pub move_momentum: f32,
    /// Direction the momentum carries, -1, 0 or +1
    pub last_move_direction: i8,
    /// Tick of the current update, from [`Clock::tick_count`](super::clock::Clock::tick_count)
    pub tick: u64,
    /// Tick until which no surface may catch the player again
    pub jump_cooldown_until: u64,
    pub is_dead: bool,
    pub death_at_ms: u64,
    /// Final screen passed; landing triggers a celebratory re-jump
    pub game_cleared: bool,
    pub config: PlayerConfig,
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl Player {
    /// Fresh player standing on the floor at the screen's start position
    pub fn new(config: PlayerConfig) -> Self {
        let pos = Vec2::new(config.start_x, config.ground_y());
        Self {
            pos,
            prev_pos: pos,
            velocity_y: 0.0,
            direction: 1,
            attachment: Attachment::None,
            on_ground: true,
            move_momentum: 0.0,
            last_move_direction: 0,
            tick: 0,
            jump_cooldown_until: 0,
            is_dead: false,
            death_at_ms: 0,
            game_cleared: false,
            config,
            events: Vec::new(),
        }
    }

    /// Advance one tick. `now_ms` drives the wall-clock timers and `tick`
    /// the frame-counted ones.
    pub fn update(&mut self, input: &TickInput, now_ms: u64, tick: u64) {
        self.tick = tick;
        if self.is_dead {
            let elapsed = now_ms.saturating_sub(self.death_at_ms);
            if elapsed >= self.config.death_duration_ms {
                self.is_dead = false;
                self.events.push(GameEvent::DeathFinished);
            }
            return;
        }

        self.prev_pos = self.pos;

        match self.attachment {
            Attachment::Rope {
                id,
                tip,
                tip_velocity,
            } => self.update_on_rope(input, id, tip, tip_velocity),
            Attachment::Platform { top, .. } | Attachment::Lotus { top, .. } => {
                self.update_on_surface(input, top)
            }
            Attachment::None => self.update_free(input),
        }

        self.handle_screen_edges();
        self.apply_ground_clamp();
    }

    fn update_on_rope(&mut self, input: &TickInput, id: ObstacleId, tip: Vec2, tip_velocity: Vec2) {
        self.pos = tip;
        self.velocity_y = 0.0;

        if input.jump {
            self.attachment = Attachment::None;
            self.velocity_y = self.config.jump_force * self.config.rope_jump_factor;

            // Carry the swing into the fall
            let carry = tip_velocity.x.abs().min(self.config.rope_carry_max);
            if carry > 0.0 {
                self.last_move_direction = if tip_velocity.x < 0.0 { -1 } else { 1 };
                self.direction = self.last_move_direction;
            }
            self.move_momentum = carry;

            log::debug!("Released rope {:?} at ({:.1}, {:.1})", id, tip.x, tip.y);
            self.events.push(GameEvent::RopeReleased { rope: id });
        }
    }

    fn update_on_surface(&mut self, input: &TickInput, top: f32) {
        let dir = input.horizontal();

        if input.jump {
            self.attachment = Attachment::None;
            self.jump_cooldown_until = self.tick + self.config.jump_cooldown_frames as u64;
            self.velocity_y = self.config.jump_force;
            self.move_direct(dir);
            return;
        }

        self.move_direct(dir);
        self.velocity_y = 0.0;
        if self.jump_cooldown() == 0 {
            self.pos.y = top - self.config.half_height;
        }
    }

    fn update_free(&mut self, input: &TickInput) {
        let dir = input.horizontal();

        if input.jump && self.on_ground {
            self.on_ground = false;
            self.velocity_y = self.config.jump_force;
            self.move_direct(dir);
            return;
        }

        let falling = self.velocity_y > 0.0 && !self.on_ground;
        if falling {
            self.drift(dir);
        } else {
            self.move_direct(dir);
        }

        let was_rising = self.velocity_y < 0.0;
        self.pos.y += self.velocity_y;
        self.velocity_y = (self.velocity_y + self.config.gravity).min(self.config.max_fall_speed);

        if was_rising && self.velocity_y >= 0.0 && dir == 0 {
            self.move_momentum = 0.0;
        }
    }

    /// Direct horizontal motion; a held key also seeds the fall momentum
    fn move_direct(&mut self, dir: i8) {
        if dir == 0 {
            return;
        }
        self.pos.x += dir as f32 * self.config.move_speed;
        self.direction = dir;
        self.last_move_direction = dir;
        self.move_momentum = self.config.move_speed;
    }

    /// Momentum-driven motion while falling
    fn drift(&mut self, dir: i8) {
        if dir != 0 {
            self.direction = dir;
            self.last_move_direction = dir;
            self.move_momentum = self.config.move_speed;
        }
        self.pos.x += self.last_move_direction as f32 * self.move_momentum;
        self.move_momentum *= self.config.momentum_decay;
    }

    fn handle_screen_edges(&mut self) {
        let half_w = self.config.half_width;
        if self.pos.x - half_w < 0.0 {
            self.pos.x = half_w;
        }

        let right_limit = self.config.screen_width - half_w;
        if self.pos.x > right_limit {
            self.pos.x = right_limit;
            if !self.game_cleared {
                self.events.push(GameEvent::ScreenAdvance);
            }
        }
    }

    /// Pin the player to the floor when falling through it. Idempotent once
    /// grounded; skipped while attached or dead.
    pub fn apply_ground_clamp(&mut self) {
        if self.is_dead || self.attachment != Attachment::None {
            return;
        }

        let ground_y = self.config.ground_y();
        if self.pos.y >= ground_y && self.velocity_y >= 0.0 {
            let landed = !self.on_ground;
            self.pos.y = ground_y;
            self.velocity_y = 0.0;
            self.on_ground = true;

            if landed {
                self.move_momentum = 0.0;
                if self.game_cleared {
                    self.on_ground = false;
                    self.velocity_y = self.config.jump_force;
                }
            }
        } else if self.pos.y < ground_y {
            self.on_ground = false;
        }
    }

    // --- Obstacle-facing mutations ---

    /// Snap onto a surface top and attach to it
    pub fn land_on(&mut self, attachment: Attachment) {
        let top = match attachment {
            Attachment::Platform { top, .. } | Attachment::Lotus { top, .. } => top,
            _ => return,
        };
        if self.surface_id().is_none() {
            self.move_momentum = 0.0;
        }
        self.pos.y = top - self.config.half_height;
        self.velocity_y = 0.0;
        self.on_ground = false;
        self.attachment = attachment;
    }

    /// Take hold of a rope tip
    pub fn attach_rope(&mut self, id: ObstacleId, tip: Vec2, tip_velocity: Vec2) {
        self.attachment = Attachment::Rope {
            id,
            tip,
            tip_velocity,
        };
        self.pos = tip;
        self.velocity_y = 0.0;
        self.on_ground = false;
        self.move_momentum = 0.0;
    }

    /// Re-sync to a rope tip that moved this tick
    pub fn follow_rope(&mut self, tip: Vec2, tip_velocity: Vec2) {
        if let Attachment::Rope { id, .. } = self.attachment {
            self.attach_rope(id, tip, tip_velocity);
        }
    }

    /// Launch upward off a spring, leaving any surface
    pub fn launch(&mut self, top: f32, impulse: f32) {
        self.attachment = Attachment::None;
        self.on_ground = false;
        self.pos.y = top - self.config.half_height;
        self.velocity_y = impulse;
    }

    /// Push sideways out of an obstacle
    pub fn push_to_x(&mut self, x: f32) {
        self.pos.x = x;
    }

    /// Push below an obstacle hit from underneath
    pub fn push_below(&mut self, y: f32) {
        self.pos.y = y;
        self.velocity_y = self.velocity_y.max(0.0);
    }

    /// Drop whatever surface the player stands on
    pub fn detach(&mut self) {
        if self.surface_id().is_some() {
            self.attachment = Attachment::None;
        }
    }

    /// Start the death sequence
    pub fn die(&mut self, now_ms: u64, cause: ObstacleId) {
        if self.is_dead {
            return;
        }
        self.is_dead = true;
        self.death_at_ms = now_ms;
        self.velocity_y = 0.0;
        self.move_momentum = 0.0;
        self.attachment = Attachment::None;
        self.events.push(GameEvent::PlayerDied { cause });
    }

    /// Drain events produced since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // --- Queries ---

    pub fn position(&self) -> Vec2 {
        self.pos
    }

    pub fn velocity_y(&self) -> f32 {
        self.velocity_y
    }

    pub fn direction(&self) -> i8 {
        self.direction
    }

    pub fn is_dead(&self) -> bool {
        self.is_dead
    }

    /// Frames left before a surface may catch the player again
    pub fn jump_cooldown(&self) -> u32 {
        self.jump_cooldown_until.saturating_sub(self.tick) as u32
    }

    /// Body rectangle
    pub fn bounds(&self) -> Rect {
        Rect::from_center(self.pos, self.config.half_width, self.config.half_height)
    }

    /// On the floor or standing on a surface
    pub fn is_grounded(&self) -> bool {
        self.on_ground || self.surface_id().is_some()
    }

    /// Off the floor and not attached to anything
    pub fn is_airborne(&self) -> bool {
        !self.on_ground && self.attachment == Attachment::None
    }

    pub fn is_on_platform(&self) -> bool {
        matches!(self.attachment, Attachment::Platform { .. })
    }

    pub fn is_on_rope(&self) -> bool {
        matches!(self.attachment, Attachment::Rope { .. })
    }

    pub fn is_on_lotus(&self) -> bool {
        matches!(self.attachment, Attachment::Lotus { .. })
    }

    /// Id of the platform or leaf being stood on
    pub fn surface_id(&self) -> Option<ObstacleId> {
        match self.attachment {
            Attachment::Platform { id, .. } | Attachment::Lotus { id, .. } => Some(id),
            _ => None,
        }
    }

    /// Id of the rope being held
    pub fn rope_id(&self) -> Option<ObstacleId> {
        match self.attachment {
            Attachment::Rope { id, .. } => Some(id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn idle() -> TickInput {
        TickInput::default()
    }

    fn jump() -> TickInput {
        TickInput {
            jump: true,
            ..Default::default()
        }
    }

    fn airborne_player(y: f32, velocity_y: f32) -> Player {
        let mut player = Player::new(PlayerConfig::default());
        player.pos = Vec2::new(300.0, y);
        player.velocity_y = velocity_y;
        player.on_ground = false;
        player
    }

    #[test]
    fn test_basic_jump_arc() {
        let mut player = Player::new(PlayerConfig::default());
        assert_eq!(player.pos.y, 480.0);
        assert!(player.is_grounded());

        player.update(&jump(), 0, 0);
        assert_eq!(player.velocity_y, -12.0);
        assert!(!player.is_grounded());

        // 24 applications of gravity bring the player to the apex
        for _ in 0..23 {
            player.update(&idle(), 0, 0);
            assert!(player.velocity_y < 0.0);
        }
        player.update(&idle(), 0, 0);
        assert!(player.velocity_y >= 0.0);
        assert_eq!(player.pos.y, 480.0 - 150.0);

        let mut ticks = 0;
        while !player.on_ground && ticks < 100 {
            player.update(&idle(), 0, 0);
            ticks += 1;
        }
        assert!(player.on_ground);
        assert_eq!(player.pos.y, 480.0);
        assert_eq!(player.velocity_y, 0.0);
    }

    #[test]
    fn test_ground_line_follows_floor() {
        assert_eq!(PlayerConfig::default().ground_y(), GROUND_Y);

        let tall = PlayerConfig {
            half_height: 30.0,
            ..Default::default()
        };
        let player = Player::new(tall);
        assert_eq!(player.bounds().bottom(), FLOOR_Y);
    }

    #[test]
    fn test_jump_while_airborne_is_noop() {
        let mut player = airborne_player(300.0, 2.0);
        player.update(&jump(), 0, 0);
        // Gravity only: no new jump impulse
        assert_eq!(player.velocity_y, 2.5);
    }

    #[test]
    fn test_ground_clamp_idempotent() {
        let mut player = airborne_player(485.0, 3.0);
        player.apply_ground_clamp();
        let (pos, vel, grounded) = (player.pos, player.velocity_y, player.on_ground);
        player.apply_ground_clamp();
        assert_eq!(player.pos, pos);
        assert_eq!(player.velocity_y, vel);
        assert_eq!(player.on_ground, grounded);
        assert_eq!(pos.y, 480.0);
        assert!(grounded);
    }

    #[test]
    fn test_ground_clamp_ignores_rising_player() {
        let mut player = airborne_player(490.0, -3.0);
        player.apply_ground_clamp();
        assert_eq!(player.pos.y, 490.0);
        assert_eq!(player.velocity_y, -3.0);
    }

    #[test]
    fn test_momentum_carries_falling_player() {
        let mut player = airborne_player(100.0, 1.0);
        player.move_momentum = 4.0;
        player.last_move_direction = 1;
        let x0 = player.pos.x;
        player.update(&idle(), 0, 0);
        assert_eq!(player.pos.x, x0 + 4.0);
        assert!((player.move_momentum - 4.0 * MOMENTUM_DECAY).abs() < 1e-6);
    }

    #[test]
    fn test_momentum_cleared_at_apex_without_input() {
        let mut player = airborne_player(200.0, -0.5);
        player.move_momentum = 4.0;
        player.last_move_direction = 1;
        player.update(&idle(), 0, 0);
        assert_eq!(player.move_momentum, 0.0);
    }

    #[test]
    fn test_momentum_kept_at_apex_with_key_held() {
        let mut player = airborne_player(200.0, -0.5);
        let input = TickInput {
            move_right: true,
            ..Default::default()
        };
        player.update(&input, 0, 0);
        assert_eq!(player.move_momentum, MOVE_SPEED);
    }

    #[test]
    fn test_momentum_cleared_on_landing() {
        let mut player = airborne_player(475.0, 8.0);
        player.move_momentum = 3.0;
        player.last_move_direction = -1;
        player.update(&idle(), 0, 0);
        assert!(player.on_ground);
        assert_eq!(player.move_momentum, 0.0);
    }

    #[test]
    fn test_surface_pin_and_jump_cooldown() {
        let mut player = Player::new(PlayerConfig::default());
        player.land_on(Attachment::Platform {
            id: ObstacleId(3),
            top: 400.0,
        });
        assert!(player.is_on_platform());
        assert_eq!(player.pos.y, 380.0);

        player.pos.y = 377.0;
        player.update(&idle(), 0, 0);
        assert_eq!(player.pos.y, 380.0);

        player.update(&jump(), 0, 0);
        assert!(!player.is_on_platform());
        assert_eq!(player.jump_cooldown(), JUMP_COOLDOWN_FRAMES);
        assert_eq!(player.velocity_y, JUMP_FORCE);
    }

    #[test]
    fn test_jump_cooldown_counts_clock_ticks() {
        let mut player = Player::new(PlayerConfig::default());
        player.land_on(Attachment::Platform {
            id: ObstacleId(3),
            top: 400.0,
        });
        player.update(&jump(), 0, 100);
        assert_eq!(player.jump_cooldown(), JUMP_COOLDOWN_FRAMES);

        // Skipped frames count against the cooldown
        player.update(&idle(), 0, 104);
        assert_eq!(player.jump_cooldown(), JUMP_COOLDOWN_FRAMES - 4);
        player.update(&idle(), 0, 100 + JUMP_COOLDOWN_FRAMES as u64);
        assert_eq!(player.jump_cooldown(), 0);
    }

    #[test]
    fn test_rope_release() {
        let mut player = airborne_player(300.0, 1.0);
        player.attach_rope(ObstacleId(7), Vec2::new(400.0, 310.0), Vec2::new(-3.0, 0.0));
        assert!(player.is_on_rope());

        // Horizontal input is ignored on the rope
        let input = TickInput {
            move_right: true,
            ..Default::default()
        };
        player.update(&input, 0, 0);
        assert_eq!(player.pos, Vec2::new(400.0, 310.0));

        player.update(&jump(), 0, 0);
        assert!(!player.is_on_rope());
        assert!((player.velocity_y - JUMP_FORCE * 0.8).abs() < 1e-6);
        assert_eq!(player.last_move_direction, -1);
        assert_eq!(player.move_momentum, 3.0);
        let events = player.take_events();
        assert!(events.contains(&GameEvent::RopeReleased {
            rope: ObstacleId(7)
        }));
    }

    #[test]
    fn test_death_timer() {
        let mut player = airborne_player(300.0, 2.0);
        player.die(1000, ObstacleId(1));
        assert!(player.is_dead());
        let frozen = player.pos;

        player.update(&jump(), 2500, 0);
        assert!(player.is_dead());
        assert_eq!(player.pos, frozen);

        player.update(&idle(), 3000, 0);
        assert!(!player.is_dead());
        let events = player.take_events();
        assert_eq!(
            events,
            vec![
                GameEvent::PlayerDied {
                    cause: ObstacleId(1)
                },
                GameEvent::DeathFinished
            ]
        );
    }

    #[test]
    fn test_screen_edges() {
        let mut player = Player::new(PlayerConfig::default());
        player.pos.x = 5.0;
        player.update(&idle(), 0, 0);
        assert_eq!(player.pos.x, PLAYER_HALF_WIDTH);

        player.pos.x = SCREEN_WIDTH - 10.0;
        player.update(&idle(), 0, 0);
        assert_eq!(player.pos.x, SCREEN_WIDTH - PLAYER_HALF_WIDTH);
        assert!(player.take_events().contains(&GameEvent::ScreenAdvance));

        player.game_cleared = true;
        player.pos.x = SCREEN_WIDTH - 10.0;
        player.update(&idle(), 0, 0);
        assert!(!player.take_events().contains(&GameEvent::ScreenAdvance));
    }

    #[test]
    fn test_game_cleared_rejumps_on_landing() {
        let mut player = airborne_player(475.0, 6.0);
        player.game_cleared = true;
        player.update(&idle(), 0, 0);
        assert_eq!(player.pos.y, 480.0);
        assert_eq!(player.velocity_y, JUMP_FORCE);
        assert!(!player.on_ground);
    }

    proptest! {
        #[test]
        fn prop_momentum_decays_geometrically(m0 in 0.01f32..8.0, k in 1usize..20) {
            let mut player = airborne_player(100.0, 0.5);
            player.move_momentum = m0;
            player.last_move_direction = 1;

            let mut expected = m0;
            let mut previous = m0;
            for _ in 0..k {
                player.update(&TickInput::default(), 0, 0);
                expected *= MOMENTUM_DECAY;
                prop_assert!(player.move_momentum <= previous);
                prop_assert!(player.move_momentum >= 0.0);
                previous = player.move_momentum;
            }
            prop_assert!((player.move_momentum - m0 * MOMENTUM_DECAY.powi(k as i32)).abs() < 1e-4);
            prop_assert_eq!(player.move_momentum, expected);
        }

        #[test]
        fn prop_ground_clamp_idempotent(y in 300.0f32..600.0, vy in -14.0f32..14.0) {
            let mut once = airborne_player(y, vy);
            once.apply_ground_clamp();
            let mut twice = once.clone();
            twice.apply_ground_clamp();
            prop_assert_eq!(once.pos, twice.pos);
            prop_assert_eq!(once.velocity_y, twice.velocity_y);
            prop_assert_eq!(once.on_ground, twice.on_ground);
        }
    }
}
