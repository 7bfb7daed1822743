//! Horizontal scrolling of obstacles and power-ups

use super::body::{Body, EntityId, PhysicsSpace};
use super::state::{GameEvent, GameState};
use crate::tuning::Tuning;

/// Whether an obstacle is far enough left of the player to count as passed
pub fn passed(player_x: f32, obstacle: &Body, tuning: &Tuning) -> bool {
    obstacle.pos.x < player_x - tuning.pass_offset
}

/// Move every scrolling entity left, award passed obstacles and flag the
/// ones that left the screen
pub fn scroll<P: PhysicsSpace>(state: &mut GameState<P>, scale: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();
    let dx = state.tuning.scroll_speed * scale;
    let offscreen_x = state.tuning.offscreen_x;

    let scrolling: Vec<EntityId> = state
        .world
        .entities
        .iter()
        .filter(|e| e.scrolls())
        .map(|e| e.id())
        .collect();

    let mut offscreen = Vec::new();
    for &id in &scrolling {
        if let Some(body) = state.world.body_mut(id) {
            body.pos.x -= dx;
            if body.pos.x < offscreen_x {
                offscreen.push(id);
            }
        }
    }
    for id in offscreen {
        if let Some(o) = state.world.entities.obstacle_mut(id) {
            o.destroyed = true;
        } else if let Some(p) = state.world.entities.power_up_mut(id) {
            p.destroyed = true;
        }
    }

    let Some(player_body) = state.world.player_body() else {
        return events;
    };
    let player_x = player_body.pos.x;
    let passed_ids: Vec<EntityId> = state
        .world
        .entities
        .obstacles()
        .filter(|o| !o.scored && o.awards_points())
        .filter(|o| {
            state
                .world
                .body(o.id)
                .is_some_and(|b| passed(player_x, b, &state.tuning))
        })
        .map(|o| o.id)
        .collect();
    for id in passed_ids {
        events.extend(state.score_obstacle(id));
    }

    events
}
