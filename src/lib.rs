//! Jungle Dash - A side-scrolling jungle platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player kinematics, obstacles, rope physics)
//! - `settings`: Data-driven tuning (player and rope configuration)
//! - `highscores`: The single persisted high score

pub mod highscores;
pub mod settings;
pub mod sim;

pub use highscores::HighScore;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Screen dimensions (pixels, y grows downward)
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Walkable floor surface
    pub const FLOOR_Y: f32 = 500.0;

    /// Player body half extents
    pub const PLAYER_HALF_WIDTH: f32 = 15.0;
    pub const PLAYER_HALF_HEIGHT: f32 = 20.0;
    /// Player centre when standing on the floor
    pub const GROUND_Y: f32 = FLOOR_Y - PLAYER_HALF_HEIGHT;
    /// Spawn x on every screen
    pub const PLAYER_START_X: f32 = 60.0;

    /// Player motion (per tick)
    pub const GRAVITY: f32 = 0.5;
    pub const JUMP_FORCE: f32 = -12.0;
    pub const MOVE_SPEED: f32 = 4.0;
    pub const MAX_FALL_SPEED: f32 = 14.0;
    pub const MOMENTUM_DECAY: f32 = 0.92;
    /// Frames a platform jump blocks re-attachment
    pub const JUMP_COOLDOWN_FRAMES: u32 = 10;
    /// Fraction of the jump force applied when letting go of the rope
    pub const ROPE_JUMP_FACTOR: f32 = 0.8;
    pub const DEATH_DURATION_MS: u64 = 2000;

    /// Landing band around a surface top (player bottom must fall inside)
    pub const LAND_ABOVE: f32 = 5.0;
    pub const LAND_BELOW: f32 = 15.0;

    /// Spring board
    pub const SPRING_IMPULSE: f32 = -18.0;
    pub const SPRING_COMPRESS_MS: u64 = 300;

    /// Rope
    pub const ROPE_POINTS: usize = 14;
    pub const ROPE_SEGMENT_LENGTH: f32 = 16.0;
    pub const ROPE_GRAB_RADIUS: f32 = 35.0;
    pub const ROPE_RELEASE_GRACE_MS: u64 = 500;
    /// Player must be at least this far above the floor line to grab
    pub const ROPE_GRAB_MAX_Y: f32 = GROUND_Y - 20.0;

    /// Scoring
    pub const SCREEN_BONUS: u64 = 200;
    pub const APPLE_POINTS: u32 = 100;
    pub const STARTING_LIVES: u8 = 3;

    /// Number of numbered screens; advancing past the last clears the game
    pub const SCREEN_COUNT: u32 = 6;

    /// Nominal frame length used by the headless runner
    pub const FRAME_MS: u64 = 16;
}

/// Point on a sine oscillation with the given period, sampled at `now_ms`
#[inline]
pub fn oscillate(now_ms: u64, period_ms: u64, phase: f32) -> f32 {
    if period_ms == 0 {
        return phase.sin();
    }
    let t = (now_ms % period_ms) as f32 / period_ms as f32;
    (t * std::f32::consts::TAU + phase).sin()
}
