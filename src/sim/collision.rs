//! Collision protocol between the player and the ordered obstacle list
//!
//! Every obstacle answers in two phases:
//! 1. `query_overlap` - pure classification into an [`OverlapKind`]
//! 2. `resolve` - applies that verdict to the player and the obstacle
//!
//! The pass walks obstacles in list order. That order is part of the screen
//! contract: supports and barriers are first-match-wins, so an earlier entry
//! shadows a later one even when the later one is closer. Hazards and pickups
//! are any-match: every instance is checked and fatal results are OR-ed.

use super::geom::Rect;
use super::obstacle::{Obstacle, ObstacleId};
use super::player::Player;
use super::state::GameEvent;
use crate::consts::{LAND_ABOVE, LAND_BELOW};

/// Classified contact between the player and one obstacle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverlapKind {
    None,
    /// Bottom of the player reached a surface top while falling
    Land { top: f32 },
    /// Horizontal contact; push the player's centre to `x`
    Side { x: f32 },
    /// Hit from underneath; push the player's centre down to `y`
    Below { y: f32 },
    /// Solid blocker overlap; `x` is the nearer flush centre. The obstacle
    /// itself leaves the player alone, the frame loop applies the wall.
    Blocking { x: f32 },
    /// Contact that kills the player
    Fatal,
    /// Idle spring stepped on
    SpringLaunch { top: f32 },
    /// Rope tip within reach
    RopeGrab,
    /// Player already holds this rope
    RopeFollow,
    /// Collectible picked up
    Collect { points: u32 },
}

impl OverlapKind {
    /// Whether this verdict settles the player onto something
    pub fn is_support(&self) -> bool {
        matches!(
            self,
            OverlapKind::Land { .. }
                | OverlapKind::SpringLaunch { .. }
                | OverlapKind::RopeGrab
                | OverlapKind::RopeFollow
        )
    }
}

/// How an obstacle category combines with its neighbours in a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionPolicy {
    /// Platforms, leaves, springs, ropes: the first that supports the player wins
    Support,
    /// Blockers: the first overlapping one is reported, the rest are skipped
    Barrier,
    /// Every instance is checked, results are OR-ed
    Hazard,
    /// Every instance is checked, each may award points
    Pickup,
}

/// Result of one obstacle pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PassOutcome {
    /// First obstacle whose contact was fatal
    pub fatal: Option<ObstacleId>,
    /// Obstacle that supports the player after the pass
    pub support: Option<ObstacleId>,
    pub blocked_by: Option<ObstacleId>,
    /// Centre x that puts the player flush against `blocked_by`
    pub wall_x: Option<f32>,
}

/// Classify the player against a standable surface
///
/// Landing needs horizontal overlap, a non-rising player and the player's
/// bottom inside the band around the top. Landing is withheld while the jump
/// cooldown runs. Otherwise an overlap is either from below (centre under the
/// surface) or from the side.
pub fn classify_surface(player: &Player, surface: &Rect) -> OverlapKind {
    if surface.is_degenerate() {
        return OverlapKind::None;
    }

    let body = player.bounds();
    if !body.overlaps_x(surface) {
        return OverlapKind::None;
    }

    let bottom = body.bottom();
    let in_band = bottom >= surface.top - LAND_ABOVE && bottom <= surface.top + LAND_BELOW;
    if player.velocity_y >= 0.0 && in_band {
        if player.jump_cooldown() > 0 {
            return OverlapKind::None;
        }
        return OverlapKind::Land { top: surface.top };
    }

    if !body.overlaps(surface) {
        return OverlapKind::None;
    }

    if player.pos.y > surface.bottom() {
        return OverlapKind::Below {
            y: surface.bottom() + player.config.half_height,
        };
    }

    OverlapKind::Side {
        x: push_out_x(player, surface),
    }
}

/// Centre x that puts the player flush against the nearer vertical edge
pub fn push_out_x(player: &Player, rect: &Rect) -> f32 {
    let half_w = player.config.half_width;
    if player.pos.x < rect.center().x {
        rect.left - half_w
    } else {
        rect.right() + half_w
    }
}

/// Update every obstacle, then let it interact with the player
///
/// Obstacles are visited in slice order. Updates always run; interactions are
/// skipped while the player is dead. A surface the player stood on that no
/// longer supports them is let go at the end of the pass.
pub fn run_obstacle_pass(
    obstacles: &mut [Obstacle],
    player: &mut Player,
    now_ms: u64,
    events: &mut Vec<GameEvent>,
) -> PassOutcome {
    let mut outcome = PassOutcome::default();
    let standing_on = player.surface_id();

    for obstacle in obstacles.iter_mut() {
        obstacle.update(now_ms);

        if player.is_dead {
            continue;
        }

        let policy = obstacle.policy();
        let shadowed = match policy {
            CollisionPolicy::Support => outcome.support.is_some(),
            CollisionPolicy::Barrier => outcome.blocked_by.is_some(),
            CollisionPolicy::Hazard | CollisionPolicy::Pickup => false,
        };
        if shadowed {
            continue;
        }

        let overlap = obstacle.query_overlap(player, now_ms);
        if overlap == OverlapKind::None {
            continue;
        }

        log::trace!("{:?} {:?} -> {:?}", obstacle.kind(), obstacle.id, overlap);
        obstacle.resolve(overlap, player, now_ms, events);

        match overlap {
            OverlapKind::Fatal => {
                outcome.fatal.get_or_insert(obstacle.id);
            }
            OverlapKind::Blocking { x } => {
                outcome.blocked_by = Some(obstacle.id);
                outcome.wall_x = Some(x);
            }
            // A spring launch leaves the player airborne but still ends the
            // search for support this pass
            kind if kind.is_support() => outcome.support = Some(obstacle.id),
            _ => {}
        }
    }

    if let Some(id) = standing_on {
        if player.surface_id() == Some(id) && outcome.support != Some(id) {
            player.detach();
        }
    }

    outcome
}
