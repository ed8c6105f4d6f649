//! Game state and session bookkeeping
//!
//! Everything the frame loop mutates lives here: the player, the ordered
//! obstacle list of the current screen, lives/score and the event queue the
//! host drains each frame.

use serde::{Deserialize, Serialize};

use super::collision::{PassOutcome, run_obstacle_pass};
use super::obstacle::{Obstacle, ObstacleBody, ObstacleId};
use super::player::Player;
use super::screens::build_screen;
use crate::consts::*;
use crate::settings::Settings;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Out of lives
    GameOver,
    /// Last screen passed; the player keeps hopping for the victory lap
    Cleared,
}

/// Notifications for the host (audio, UI, transitions)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PlayerDied { cause: ObstacleId },
    /// Death timer expired
    DeathFinished,
    /// Right screen edge reached
    ScreenAdvance,
    ScreenEntered { screen: u32 },
    ItemCollected { points: u32 },
    SpringLaunched { spring: ObstacleId },
    RopeGrabbed { rope: ObstacleId },
    RopeReleased { rope: ObstacleId },
    LifeLost { lives_left: u8 },
    GameOver { score: u64 },
    GameCleared { score: u64 },
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed; spawners derive theirs from it
    pub seed: u64,
    pub settings: Settings,
    /// Current screen index (0-based)
    pub screen: u32,
    pub lives: u8,
    pub score: u64,
    /// Best score known to the host, raised when a run ends higher
    pub high_score: u64,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    /// Obstacles of the current screen in definition order. Collision
    /// resolution depends on this order; it is never sorted.
    pub obstacles: Vec<Obstacle>,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Fresh session on the first screen
    pub fn new(settings: Settings) -> Self {
        let seed = settings.seed;
        Self {
            seed,
            screen: 0,
            lives: settings.starting_lives,
            score: 0,
            high_score: 0,
            phase: GamePhase::Playing,
            time_ticks: 0,
            player: Player::new(settings.player),
            obstacles: build_screen(0, seed, &settings.rope),
            events: Vec::new(),
            settings,
        }
    }

    pub fn with_high_score(mut self, high_score: u64) -> Self {
        self.high_score = high_score;
        self
    }

    /// Load a screen and put a fresh player at its start
    pub fn enter_screen(&mut self, screen: u32) {
        self.screen = screen;
        self.obstacles = build_screen(screen, self.seed, &self.settings.rope);
        self.player = Player::new(self.settings.player);
        log::info!("Entered screen {}", screen);
        self.events.push(GameEvent::ScreenEntered { screen });
    }

    /// Recreate the player and return the screen to its initial configuration
    pub fn respawn(&mut self) {
        self.player = Player::new(self.settings.player);
        self.player.game_cleared = self.phase == GamePhase::Cleared;
        for obstacle in &mut self.obstacles {
            obstacle.reset();
        }
    }

    /// Lose a life after the death sequence; respawn or end the run
    pub(crate) fn handle_death(&mut self) {
        if self.phase == GamePhase::Cleared {
            self.respawn();
            return;
        }
        self.lives = self.lives.saturating_sub(1);
        log::info!("Life lost, {} left", self.lives);
        self.events.push(GameEvent::LifeLost {
            lives_left: self.lives,
        });

        if self.lives == 0 {
            self.phase = GamePhase::GameOver;
            self.record_high_score();
            log::info!("Game over with score {}", self.score);
            self.events.push(GameEvent::GameOver { score: self.score });
        } else {
            self.respawn();
        }
    }

    /// Move past the right edge of the current screen
    pub(crate) fn handle_screen_advance(&mut self) {
        if self.phase == GamePhase::Cleared {
            return;
        }
        self.score += SCREEN_BONUS;
        let next = self.screen + 1;
        if next >= SCREEN_COUNT {
            self.phase = GamePhase::Cleared;
            self.player.game_cleared = true;
            self.record_high_score();
            log::info!("All screens cleared with score {}", self.score);
            self.events.push(GameEvent::GameCleared { score: self.score });
        } else {
            self.enter_screen(next);
        }
    }

    /// Free the rope the player just let go of
    pub(crate) fn release_rope(&mut self, id: ObstacleId, now_ms: u64) {
        for obstacle in &mut self.obstacles {
            if obstacle.id != id {
                continue;
            }
            if let ObstacleBody::Rope(rope) = &mut obstacle.body {
                rope.release(now_ms);
            }
        }
    }

    fn record_high_score(&mut self) {
        self.high_score = self.high_score.max(self.score);
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// One ordered collision pass of the current screen against the player
    pub(crate) fn run_collisions(&mut self, now_ms: u64) -> PassOutcome {
        run_obstacle_pass(&mut self.obstacles, &mut self.player, now_ms, &mut self.events)
    }

    /// Events produced since the last call
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Drain events produced since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session() {
        let state = GameState::new(Settings::default());
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.lives, STARTING_LIVES);
        assert_eq!(state.screen, 0);
        assert!(!state.obstacles.is_empty());
        assert_eq!(state.player.pos.x, PLAYER_START_X);
    }

    #[test]
    fn test_handle_death_respawns_until_out_of_lives() {
        let mut state = GameState::new(Settings::default());
        state.player.pos.x = 400.0;

        state.handle_death();
        assert_eq!(state.lives, STARTING_LIVES - 1);
        assert_eq!(state.player.pos.x, PLAYER_START_X);
        assert_eq!(state.phase, GamePhase::Playing);

        state.lives = 1;
        state.score = 900;
        state.handle_death();
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.high_score, 900);
        let events = state.take_events();
        assert!(events.contains(&GameEvent::GameOver { score: 900 }));
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn test_advancing_past_last_screen_clears() {
        let mut state = GameState::new(Settings::default());
        state.enter_screen(SCREEN_COUNT - 1);
        state.take_events();

        state.handle_screen_advance();
        assert_eq!(state.phase, GamePhase::Cleared);
        assert!(state.player.game_cleared);
        assert_eq!(state.score, SCREEN_BONUS);
        assert_eq!(
            state.take_events(),
            vec![GameEvent::GameCleared {
                score: SCREEN_BONUS
            }]
        );
    }

    #[test]
    fn test_cleared_run_is_final() {
        let mut state = GameState::new(Settings::default());
        state.enter_screen(SCREEN_COUNT - 1);
        state.handle_screen_advance();
        state.take_events();

        state.handle_screen_advance();
        state.handle_death();
        assert_eq!(state.phase, GamePhase::Cleared);
        assert_eq!(state.score, SCREEN_BONUS);
        assert_eq!(state.lives, STARTING_LIVES);
        assert!(state.player.game_cleared);
        assert!(state.take_events().is_empty());
    }
}
