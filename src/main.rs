//! Jungle Dash entry point
//!
//! Headless run: loads settings and the high score, lets the demo autopilot
//! play on a manual clock and logs what happens.
//!
//! Usage: `jungle-dash [settings.json] [highscore.json]`

use std::path::PathBuf;

use jungle_dash::consts::FRAME_MS;
use jungle_dash::sim::{Clock, GameEvent, GamePhase, GameState, ManualClock, TickInput, tick};
use jungle_dash::{HighScore, Settings};

/// Ten minutes of frames at the nominal frame length
const MAX_TICKS: u64 = 10 * 60 * 1000 / FRAME_MS;

fn main() {
    env_logger::init();
    log::info!("Jungle Dash (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings_path = args.next().map(PathBuf::from);
    let highscore_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("highscore.json"));

    let settings = match &settings_path {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };
    let mut high_score = HighScore::load(&highscore_path).unwrap_or_else(|err| {
        log::warn!("Ignoring high score file: {err:#}");
        HighScore::new()
    });

    let mut state = GameState::new(settings).with_high_score(high_score.best);
    let mut clock = ManualClock::new();
    let input = TickInput {
        demo: true,
        ..Default::default()
    };

    for _ in 0..MAX_TICKS {
        clock.advance(FRAME_MS);
        tick(&mut state, &input, &clock);

        for event in state.take_events() {
            match event {
                GameEvent::ScreenEntered { screen } => println!("screen {screen}"),
                GameEvent::LifeLost { lives_left } => println!("life lost, {lives_left} left"),
                GameEvent::ItemCollected { points } => println!("+{points}"),
                other => log::debug!("{:?}", other),
            }
        }

        if matches!(state.phase, GamePhase::GameOver | GamePhase::Cleared) {
            break;
        }
    }

    println!(
        "{:?} on screen {} with score {} after {} ticks",
        state.phase, state.screen, state.score, state.time_ticks
    );

    if high_score.submit(state.score, clock.now_ms()) {
        println!("New high score: {}", high_score.best);
        if let Err(err) = high_score.save(&highscore_path) {
            log::error!("Failed to save high score: {err:#}");
        }
    }
}
