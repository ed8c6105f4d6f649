//! Per-frame simulation tick
//!
//! One call advances the session by one frame:
//! player update → route player events → obstacle pass → wall and death
//! handling → ground clamp.
//!
//! Once the run is cleared the session is final: the victory lap keeps
//! animating but contacts can no longer kill the player.

use super::clock::Clock;
use super::collision::CollisionPolicy;
use super::obstacle::ObstacleKind;
use super::player::Attachment;
use super::state::{GameEvent, GamePhase, GameState};

/// Distance ahead of the player at which the demo jumps
const DEMO_LOOKAHEAD: f32 = 24.0;

/// Input intents for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
    /// Pause toggle
    pub pause: bool,
    /// Idle/demo mode - autopilot plays the game
    pub demo: bool,
}

impl TickInput {
    /// Horizontal intent as -1, 0 or +1; opposing keys cancel
    pub fn horizontal(&self) -> i8 {
        self.move_right as i8 - self.move_left as i8
    }
}

/// Advance the game by one frame
pub fn tick(state: &mut GameState, input: &TickInput, clock: &dyn Clock) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            _ => {}
        }
    }

    // Don't tick if paused or game over
    match state.phase {
        GamePhase::Paused | GamePhase::GameOver => return,
        GamePhase::Playing | GamePhase::Cleared => {}
    }

    let input = if input.demo {
        autopilot(state)
    } else {
        input.clone()
    };

    state.time_ticks += 1;
    let now_ms = clock.now_ms();

    state.player.update(&input, now_ms, clock.tick_count());
    route_player_events(state, now_ms);
    if state.phase == GamePhase::GameOver {
        return;
    }

    let first_new = state.events().len();
    let outcome = state.run_collisions(now_ms);
    if let Some(x) = outcome.wall_x {
        state.player.push_to_x(x);
    }
    if let Some(cause) = outcome.fatal {
        if state.phase == GamePhase::Cleared {
            log::trace!("Ignoring fatal contact with {:?} after clear", cause);
        } else {
            log::info!("Player killed by {:?} on screen {}", cause, state.screen);
            state.player.die(now_ms, cause);
        }
    }
    state.player.apply_ground_clamp();

    let points: u64 = state.events()[first_new..]
        .iter()
        .map(|event| match event {
            GameEvent::ItemCollected { points } => *points as u64,
            _ => 0,
        })
        .sum();
    state.score += points;

    route_player_events(state, now_ms);
}

/// Forward player events to the host and act on the ones the session owns
fn route_player_events(state: &mut GameState, now_ms: u64) {
    for event in state.player.take_events() {
        log::debug!("{:?}", event);
        state.push_event(event.clone());
        match event {
            GameEvent::RopeReleased { rope } => state.release_rope(rope, now_ms),
            GameEvent::DeathFinished => state.handle_death(),
            GameEvent::ScreenAdvance => state.handle_screen_advance(),
            _ => {}
        }
    }
}

/// Demo input policy: walk right, hop over whatever is just ahead, ride ropes
/// and let go on the forward swing
pub fn autopilot(state: &GameState) -> TickInput {
    let player = &state.player;
    if player.is_dead {
        return TickInput::default();
    }

    let mut input = TickInput {
        move_right: true,
        ..Default::default()
    };

    if let Attachment::Rope { tip_velocity, .. } = player.attachment {
        // Let go on the forward swing
        input.jump = tip_velocity.x > 0.0;
        return input;
    }

    if !player.is_grounded() {
        return input;
    }

    let front = player.pos.x + player.config.half_width;
    let standing_on = player.surface_id();
    input.jump = state.obstacles.iter().any(|obstacle| {
        if Some(obstacle.id) == standing_on
            || obstacle.policy() == CollisionPolicy::Pickup
            || obstacle.kind() == ObstacleKind::Rope
        {
            return false;
        }
        obstacle
            .bounds()
            .map(|b| (0.0..=DEMO_LOOKAHEAD).contains(&(b.left - front)))
            .unwrap_or(false)
    });

    input
}
