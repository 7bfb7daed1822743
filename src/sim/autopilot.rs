//! Demo-mode controller that plays the game on its own
//!
//! Reads the state and decides whether to press this tick. Used by the
//! headless runner and by the demo toggle in the browser binding.

use super::body::{Body, PhysicsSpace};
use super::entity::ObstaclePart;
use super::state::GameState;

/// Distance kept from the ceiling and floor when picking a target height
const EDGE_MARGIN: f32 = 60.0;
/// How far below the target the player may sink before pressing
const DEADBAND: f32 = 10.0;
/// Emergency press when this close to the floor
const FLOOR_PANIC: f32 = 20.0;

/// Whether to press on this tick
pub fn should_press<P: PhysicsSpace>(state: &GameState<P>) -> bool {
    let Some((player, body)) = state.world.player_parts() else {
        return false;
    };
    if !player.accepts_input() {
        return false;
    }

    let t = &state.tuning;
    // Keep a full jump's rise, plus the player's top half, below the ceiling
    let rise = if t.gravity > 0.0 {
        t.jump_velocity * t.jump_velocity / (2.0 * t.gravity)
    } else {
        0.0
    };
    let lo = t.ceiling_y + EDGE_MARGIN.max(rise + body.half_extents().y + DEADBAND);
    let hi = t.floor_y - EDGE_MARGIN;
    let target = if lo <= hi {
        target_height(state, body).clamp(lo, hi)
    } else {
        (t.ceiling_y + t.floor_y) / 2.0
    };

    let sinking_below = body.pos.y > target + DEADBAND && body.vel.y >= 0.0;
    let near_floor = body.bottom() > t.floor_y - FLOOR_PANIC;
    sinking_below || near_floor
}

/// Height of the safest line through the nearest column ahead
fn target_height<P: PhysicsSpace>(state: &GameState<P>, player: &Body) -> f32 {
    let t = &state.tuning;
    let middle = (t.ceiling_y + t.floor_y) / 2.0;
    let player_left = player.pos.x - player.half_extents().x;

    let mut column: Vec<(ObstaclePart, &Body)> = state
        .world
        .entities
        .obstacles()
        .filter(|o| !o.destroyed)
        .filter_map(|o| state.world.body(o.id).map(|b| (o.part, b)))
        .filter(|(_, b)| b.pos.x + b.half_extents().x > player_left)
        .collect();
    let Some(nearest_x) = column.iter().map(|(_, b)| b.pos.x).reduce(f32::min) else {
        return middle;
    };
    column.retain(|(_, b)| (b.pos.x - nearest_x).abs() < 1.0);

    let top = column.iter().find(|(part, _)| *part == ObstaclePart::Top);
    let bottom = column.iter().find(|(part, _)| *part == ObstaclePart::Bottom);
    match (top, bottom) {
        (Some((_, top)), Some((_, bottom))) => (top.bottom() + bottom.top()) / 2.0,
        (Some((_, top)), None) => (top.bottom() + t.floor_y) / 2.0,
        (None, Some((_, bottom))) => (t.ceiling_y + bottom.top()) / 2.0,
        (None, None) => {
            let Some((_, single)) = column.first() else {
                return middle;
            };
            let above = single.top() - t.ceiling_y;
            let below = t.floor_y - single.bottom();
            if above >= below {
                (t.ceiling_y + single.top()) / 2.0
            } else {
                (single.bottom() + t.floor_y) / 2.0
            }
        }
    }
}
