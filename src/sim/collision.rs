//! Collision detection and gameplay rules
//!
//! Runs once per active tick: integrates the physics space, then tests the
//! player against every other body and applies the hit, power-up and
//! scoring rules. Bodies are never added or removed here; a collected
//! power-up is only flagged and the garbage collector removes it.

use super::body::{BodyCategory, EntityId, PhysicsSpace, StepParams};
use super::entity::Entity;
use super::scroll::passed;
use super::state::{GameEvent, GameState};
use super::timers::Deferred;
use crate::consts::{MAX_LIVES, POWER_UP_POINTS};

/// Integrate one (already clamped) step and resolve the player's contacts
pub fn resolve<P: PhysicsSpace>(state: &mut GameState<P>, scale: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();
    let Some(player) = state.world.player() else {
        return events;
    };
    let player_id = player.id;
    let falling = player.is_falling;

    let t = &state.tuning;
    let max_fall_speed = if falling {
        t.terminal_velocity * t.fall_multiplier
    } else {
        t.terminal_velocity
    };
    state.world.physics.step(StepParams {
        gravity: if state.gravity_enabled { t.gravity } else { 0.0 },
        max_fall_speed,
        scale,
    });
    update_player_angle(state);

    let Some((player, body)) = state.world.player_parts() else {
        return events;
    };
    // The hit reaction cannot be interrupted, the countdown never registers
    // contacts, and a falling player is already out
    if player.is_wobbling || player.is_in_countdown_phase || player.is_falling {
        return events;
    }

    let t = &state.tuning;
    if body.top() < t.ceiling_y || body.bottom() > t.floor_y {
        log::debug!("player left the band at y={:.1}", body.pos.y);
        events.extend(state.begin_fall());
        return events;
    }

    let player_x = body.pos.x;
    for id in state.world.physics.overlapping(player_id) {
        match state.world.entities.get(id).map(Entity::category) {
            Some(BodyCategory::Obstacle) => hit_obstacle(state, id, player_x, &mut events),
            Some(BodyCategory::PowerUp) => collect_power_up(state, id, &mut events),
            _ => {}
        }
    }

    events
}

fn hit_obstacle<P: PhysicsSpace>(
    state: &mut GameState<P>,
    id: EntityId,
    player_x: f32,
    events: &mut Vec<GameEvent>,
) {
    // Passing and colliding can happen on the same tick
    if state
        .world
        .body(id)
        .is_some_and(|b| passed(player_x, b, &state.tuning))
    {
        events.extend(state.score_obstacle(id));
    }

    let Some(player) = state.world.player_mut() else {
        return;
    };
    if player.is_invincible || player.is_wobbling || player.is_falling {
        return;
    }
    player.lives = player.lives.saturating_sub(1);
    let lives = player.lives;
    log::debug!("obstacle {:?} hit, {} lives left", id, lives);

    if lives == 0 {
        events.extend(state.begin_fall());
    } else {
        state.begin_wobble();
        events.push(GameEvent::Hit { lives });
    }
}

fn collect_power_up<P: PhysicsSpace>(state: &mut GameState<P>, id: EntityId, events: &mut Vec<GameEvent>) {
    if state.world.player().is_none_or(|p| p.is_falling) {
        return;
    }
    let Some(power_up) = state.world.entities.power_up_mut(id) else {
        return;
    };
    if power_up.collected {
        return;
    }
    power_up.collected = true;

    let due = state.clock_ms + state.tuning.invincibility_ms;
    if let Some(player) = state.world.player_mut() {
        player.lives = MAX_LIVES;
        player.is_invincible = true;
    }
    // A second pickup refreshes the window instead of stacking
    state.timers.reschedule(Deferred::InvincibilityEnd, due);
    log::debug!("power-up {:?} collected", id);

    events.push(GameEvent::PowerUpCollected { lives: MAX_LIVES });
    events.push(state.add_score(POWER_UP_POINTS));
}

/// Wobble rocks negative, positive, then back to level; otherwise the
/// player tilts with its vertical speed
fn update_player_angle<P: PhysicsSpace>(state: &mut GameState<P>) {
    let Some(player) = state.world.player() else {
        return;
    };
    let t = &state.tuning;
    let angle = match player.wobble_started_ms {
        Some(start) if player.is_wobbling => {
            let progress = (state.clock_ms - start) / t.wobble_ms;
            if progress < 1.0 / 3.0 {
                -t.wobble_angle
            } else if progress < 2.0 / 3.0 {
                t.wobble_angle
            } else {
                0.0
            }
        }
        _ => {
            let Some(body) = state.world.player_body() else {
                return;
            };
            (body.vel.y / t.terminal_velocity).clamp(-1.0, 1.0) * 0.5
        }
    };
    if let Some(body) = state.world.player_body_mut() {
        body.angle = angle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::GameVariant;
    use crate::sim::body::Body;
    use crate::sim::entity::{Obstacle, ObstacleKind, ObstaclePart, PowerUp};
    use crate::sim::state::GamePhase;
    use crate::tuning::Tuning;
    use glam::Vec2;

    /// A state in Playing with the player hovering mid-band, gravity off
    fn playing() -> GameState {
        let mut state = GameState::new(1, GameVariant::FlappyShot, Tuning::default());
        state.start();
        state.timers.clear();
        state.phase = GamePhase::Playing;
        let player = state.world.player_mut().unwrap();
        player.is_in_countdown_phase = false;
        state.world.player_body_mut().unwrap().is_static = false;
        state
    }

    fn place_obstacle(state: &mut GameState, x: f32) -> EntityId {
        let y = state.world.player_body().unwrap().pos.y;
        let id = state.world.entities.next_entity_id();
        state.world.spawn(
            Entity::Obstacle(Obstacle::new(id, ObstacleKind::Beer, ObstaclePart::Single)),
            Body::new(id, BodyCategory::Obstacle, Vec2::new(x, y), Vec2::new(52.0, 80.0)),
        )
    }

    fn place_power_up(state: &mut GameState) -> EntityId {
        let pos = state.world.player_body().unwrap().pos;
        let id = state.world.entities.next_entity_id();
        state.world.spawn(
            Entity::PowerUp(PowerUp::new(id)),
            Body::new(id, BodyCategory::PowerUp, pos, Vec2::splat(30.0)),
        )
    }

    #[test]
    fn test_hit_costs_a_life_and_wobbles() {
        let mut state = playing();
        place_obstacle(&mut state, 110.0);
        let events = resolve(&mut state, 1.0);
        assert_eq!(events, vec![GameEvent::Hit { lives: 2 }]);
        let player = state.world.player().unwrap();
        assert!(player.is_wobbling);
        assert!(state.timers.is_pending(Deferred::WobbleEnd));

        // Still overlapping, but wobbling skips collisions entirely
        assert!(resolve(&mut state, 1.0).is_empty());
        assert_eq!(state.lives(), 2);
    }

    #[test]
    fn test_last_life_starts_fall() {
        let mut state = playing();
        state.world.player_mut().unwrap().lives = 1;
        place_obstacle(&mut state, 110.0);
        let events = resolve(&mut state, 1.0);
        assert_eq!(events, vec![GameEvent::Falling]);

        let (player, body) = state.world.player_parts().unwrap();
        assert_eq!(player.lives, 0);
        assert!(player.is_falling);
        assert!(!player.is_wobbling);
        assert_eq!(body.vel.y, 12.0 * 1.5);
        assert!(state.timers.is_pending(Deferred::GameOver));
    }

    #[test]
    fn test_invincible_ignores_obstacles() {
        let mut state = playing();
        state.world.player_mut().unwrap().is_invincible = true;
        place_obstacle(&mut state, 110.0);
        assert!(resolve(&mut state, 1.0).is_empty());
        assert_eq!(state.lives(), 3);
    }

    #[test]
    fn test_pass_and_hit_same_tick() {
        let mut state = playing();
        // Obstacle already past the pass line but still overlapping
        let id = place_obstacle(&mut state, 65.0);
        let events = resolve(&mut state, 1.0);
        assert_eq!(
            events,
            vec![
                GameEvent::Scored { points: 1, total: 1 },
                GameEvent::Hit { lives: 2 }
            ]
        );
        assert!(state.world.entities.obstacle_mut(id).unwrap().scored);
    }

    #[test]
    fn test_contact_before_pass_line_does_not_score() {
        let mut state = playing();
        // Center behind the player, but not yet past the pass line
        let id = place_obstacle(&mut state, 80.0);
        let events = resolve(&mut state, 1.0);
        assert_eq!(events, vec![GameEvent::Hit { lives: 2 }]);
        assert!(!state.world.entities.obstacle_mut(id).unwrap().scored);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_power_up_restores_lives() {
        let mut state = playing();
        state.world.player_mut().unwrap().lives = 1;
        let id = place_power_up(&mut state);
        let events = resolve(&mut state, 1.0);
        assert_eq!(
            events,
            vec![
                GameEvent::PowerUpCollected { lives: 3 },
                GameEvent::Scored { points: 3, total: 3 }
            ]
        );
        let player = state.world.player().unwrap();
        assert!(player.is_invincible);
        assert_eq!(player.lives, 3);
        assert!(state.world.entities.get(id).unwrap().is_spent());
        // Removal is left to the garbage collector
        assert!(state.world.physics.contains(id));

        // Collected power-ups are not collected again
        assert!(resolve(&mut state, 1.0).is_empty());
    }

    #[test]
    fn test_second_power_up_refreshes_window() {
        let mut state = playing();
        place_power_up(&mut state);
        resolve(&mut state, 1.0);
        state.clock_ms += 3000.0;
        place_power_up(&mut state);
        resolve(&mut state, 1.0);

        assert_eq!(state.timers.len(), 1);
        assert_eq!(state.timers.pop_due(7000.0), None);
        assert!(state.timers.pop_due(8000.0).is_some());
    }

    #[test]
    fn test_leaving_band_is_fatal() {
        let mut state = playing();
        state.world.player_body_mut().unwrap().pos.y = state.tuning.floor_y;
        assert_eq!(resolve(&mut state, 1.0), vec![GameEvent::Falling]);
        assert_eq!(state.lives(), 0);

        let mut state = playing();
        state.world.player_body_mut().unwrap().pos.y = -5.0;
        assert_eq!(resolve(&mut state, 0.0), vec![GameEvent::Falling]);
    }

    #[test]
    fn test_band_edges_are_symmetric() {
        let half = Tuning::default().player_height / 2.0;

        // Top edge poking through the ceiling is out, just like the floor
        let mut state = playing();
        state.world.player_body_mut().unwrap().pos.y = half - 1.0;
        assert_eq!(resolve(&mut state, 0.0), vec![GameEvent::Falling]);

        let mut state = playing();
        state.world.player_body_mut().unwrap().pos.y = half;
        assert!(resolve(&mut state, 0.0).is_empty());

        let mut state = playing();
        let floor = state.tuning.floor_y;
        state.world.player_body_mut().unwrap().pos.y = floor - half;
        assert!(resolve(&mut state, 0.0).is_empty());
        state.world.player_body_mut().unwrap().pos.y = floor - half + 1.0;
        assert_eq!(resolve(&mut state, 0.0), vec![GameEvent::Falling]);
    }

    #[test]
    fn test_countdown_registers_nothing() {
        let mut state = GameState::new(1, GameVariant::FlappyShot, Tuning::default());
        state.start();
        place_obstacle(&mut state, 110.0);
        let before = state.world.player_body().unwrap().pos;
        assert!(resolve(&mut state, 1.0).is_empty());
        assert_eq!(state.world.player_body().unwrap().pos, before);
        assert_eq!(state.lives(), 3);
    }

    #[test]
    fn test_wobble_angle_sequence() {
        let mut state = playing();
        state.begin_wobble();
        resolve(&mut state, 0.0);
        assert_eq!(state.world.player_body().unwrap().angle, -0.35);
        state.clock_ms += 200.0;
        resolve(&mut state, 0.0);
        assert_eq!(state.world.player_body().unwrap().angle, 0.35);
        state.clock_ms += 150.0;
        resolve(&mut state, 0.0);
        assert_eq!(state.world.player_body().unwrap().angle, 0.0);
    }
}
