//! Per-frame simulation tick
//!
//! Order within an active tick: due timers, input, collision/rules (with
//! physics integration), spawner, scroller, garbage collector. The order is
//! the same for both game variants.

use super::body::PhysicsSpace;
use super::state::{GameEvent, GamePhase, GameState};
use super::{collision, gc, scroll};
use crate::delta_scale;

/// Input gathered since the previous tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Taps/presses queued by the host. Any number of presses in one tick
    /// set the same jump velocity.
    pub presses: u32,
}

impl TickInput {
    pub fn press() -> Self {
        Self { presses: 1 }
    }
}

/// Advance the game by `delta_ms` of wall-clock time.
///
/// Timers run on the raw delta; motion uses the delta clamped to one 60 fps
/// frame. Menu and game-over ticks are no-ops, as is any tick without a
/// player.
pub fn tick<P: PhysicsSpace>(state: &mut GameState<P>, input: &TickInput, delta_ms: f64) -> Vec<GameEvent> {
    let mut events = Vec::new();
    match state.phase {
        GamePhase::Menu | GamePhase::GameOver => return events,
        GamePhase::Countdown | GamePhase::Playing => {}
    }
    if state.world.player().is_none() {
        log::warn!("tick in {:?} without a player", state.phase);
        return events;
    }

    let delta_ms = if delta_ms.is_finite() && delta_ms > 0.0 {
        delta_ms
    } else {
        0.0
    };
    state.time_ticks += 1;
    state.clock_ms += delta_ms;

    while let Some((effect, due_ms)) = state.timers.pop_due(state.clock_ms) {
        events.extend(state.apply_deferred(effect, due_ms));
    }
    if state.phase != GamePhase::Playing {
        return events;
    }

    let scale = delta_scale(delta_ms);
    if input.presses > 0 {
        state.jump();
    }

    events.extend(collision::resolve(state, scale));

    if !state.world.player().is_some_and(|p| p.is_falling) {
        state
            .spawner
            .update(&mut state.world, &state.tuning, state.variant, state.clock_ms);
    }

    events.extend(scroll::scroll(state, scale));
    gc::collect_garbage(&mut state.world, state.tuning.offscreen_x);

    events
}
