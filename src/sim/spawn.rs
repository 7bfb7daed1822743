//! Obstacle and power-up spawning
//!
//! Two independent cadences driven by the simulation clock. Neither runs
//! while the player is still in the countdown.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::body::{Body, BodyCategory, EntityId, PhysicsSpace};
use super::entity::{Entity, Obstacle, ObstacleKind, ObstaclePart, PowerUp};
use super::world::World;
use crate::settings::GameVariant;
use crate::tuning::Tuning;

/// Spawn timing and the randomness behind placement
#[derive(Debug, Clone)]
pub struct Spawner {
    rng: Pcg32,
    last_obstacle_ms: f64,
    last_power_up_check_ms: f64,
    last_power_up_ms: f64,
    last_single: Option<ObstacleKind>,
    last_top: Option<ObstacleKind>,
    last_bottom: Option<ObstacleKind>,
}

impl Spawner {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            last_obstacle_ms: 0.0,
            last_power_up_check_ms: 0.0,
            last_power_up_ms: 0.0,
            last_single: None,
            last_top: None,
            last_bottom: None,
        }
    }

    /// Restart both cadences from `now_ms`. The RNG stream carries on so
    /// consecutive sessions differ.
    pub fn reset(&mut self, now_ms: f64) {
        self.last_obstacle_ms = now_ms;
        self.last_power_up_check_ms = now_ms;
        self.last_power_up_ms = now_ms;
        self.last_single = None;
        self.last_top = None;
        self.last_bottom = None;
    }

    /// Spawn whatever is due at `now_ms`. Returns the new entity ids.
    pub fn update<P: PhysicsSpace>(
        &mut self,
        world: &mut World<P>,
        tuning: &Tuning,
        variant: GameVariant,
        now_ms: f64,
    ) -> Vec<EntityId> {
        let mut spawned = Vec::new();
        if world.player().is_none_or(|p| p.is_in_countdown_phase) {
            return spawned;
        }

        if now_ms - self.last_obstacle_ms >= tuning.obstacle_interval_ms {
            self.last_obstacle_ms = now_ms;
            if variant.paired_obstacles() {
                spawned.extend(self.spawn_pair(world, tuning));
            } else {
                spawned.push(self.spawn_single(world, tuning));
            }
        }

        if now_ms - self.last_power_up_check_ms >= tuning.power_up_check_ms {
            self.last_power_up_check_ms = now_ms;
            let spaced = now_ms - self.last_power_up_ms >= tuning.power_up_min_spacing_ms;
            if spaced && self.rng.random_bool(tuning.power_up_chance.clamp(0.0, 1.0)) {
                self.last_power_up_ms = now_ms;
                spawned.push(self.spawn_power_up(world, tuning));
            }
        }

        spawned
    }

    /// One obstacle of random size and height
    pub fn spawn_single<P: PhysicsSpace>(&mut self, world: &mut World<P>, tuning: &Tuning) -> EntityId {
        let kind = pick_kind(&mut self.rng, &ObstacleKind::SINGLE, &mut self.last_single);
        let height = random_between(
            &mut self.rng,
            tuning.obstacle_min_height,
            tuning.obstacle_max_height,
        );
        let (lo, hi) = tuning.spawn_band();
        let y = random_between(&mut self.rng, lo + height / 2.0, hi - height / 2.0);
        let size = Vec2::new(tuning.obstacle_width, height);
        let x = tuning.world_width + tuning.obstacle_width;

        let id = world.entities.next_entity_id();
        log::debug!("spawn {:?} obstacle at y={:.0} h={:.0}", kind, y, height);
        world.spawn(
            Entity::Obstacle(Obstacle::new(id, kind, ObstaclePart::Single)),
            Body::new(id, BodyCategory::Obstacle, Vec2::new(x, y), size),
        )
    }

    /// A top/bottom pair around a random gap
    pub fn spawn_pair<P: PhysicsSpace>(&mut self, world: &mut World<P>, tuning: &Tuning) -> [EntityId; 2] {
        let top_kind = pick_kind(&mut self.rng, &ObstacleKind::TOP, &mut self.last_top);
        let bottom_kind = pick_kind(&mut self.rng, &ObstacleKind::BOTTOM, &mut self.last_bottom);
        let gap = random_between(&mut self.rng, tuning.min_gap, tuning.max_gap);
        let (lo, hi) = tuning.spawn_band();
        let center = random_between(&mut self.rng, lo + gap / 2.0, hi - gap / 2.0);
        let x = tuning.world_width + tuning.obstacle_width;

        let gap_top = center - gap / 2.0;
        let gap_bottom = center + gap / 2.0;
        let top_height = (gap_top - tuning.ceiling_y).max(0.0);
        let bottom_height = (tuning.floor_y - gap_bottom).max(0.0);
        log::debug!("spawn pair gap={:.0} at y={:.0}", gap, center);

        let top_id = world.entities.next_entity_id();
        world.spawn(
            Entity::Obstacle(Obstacle::new(top_id, top_kind, ObstaclePart::Top)),
            Body::new(
                top_id,
                BodyCategory::Obstacle,
                Vec2::new(x, tuning.ceiling_y + top_height / 2.0),
                Vec2::new(tuning.obstacle_width, top_height),
            ),
        );
        let bottom_id = world.entities.next_entity_id();
        world.spawn(
            Entity::Obstacle(Obstacle::new(bottom_id, bottom_kind, ObstaclePart::Bottom)),
            Body::new(
                bottom_id,
                BodyCategory::Obstacle,
                Vec2::new(x, gap_bottom + bottom_height / 2.0),
                Vec2::new(tuning.obstacle_width, bottom_height),
            ),
        );
        [top_id, bottom_id]
    }

    pub fn spawn_power_up<P: PhysicsSpace>(&mut self, world: &mut World<P>, tuning: &Tuning) -> EntityId {
        let (lo, hi) = tuning.spawn_band();
        let y = random_between(&mut self.rng, lo, hi);
        let x = tuning.world_width + tuning.power_up_size;
        let id = world.entities.next_entity_id();
        log::debug!("spawn power-up at y={:.0}", y);
        world.spawn(
            Entity::PowerUp(PowerUp::new(id)),
            Body::new(
                id,
                BodyCategory::PowerUp,
                Vec2::new(x, y),
                Vec2::splat(tuning.power_up_size),
            ),
        )
    }
}

/// Uniform value in `[lo, hi)`, or `lo` when the range is empty
fn random_between(rng: &mut Pcg32, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}

/// Random kind from `pool` that differs from the previous pick
fn pick_kind(rng: &mut Pcg32, pool: &[ObstacleKind], previous: &mut Option<ObstacleKind>) -> ObstacleKind {
    let candidates: Vec<ObstacleKind> = pool
        .iter()
        .copied()
        .filter(|k| Some(*k) != *previous)
        .collect();
    let kind = if candidates.is_empty() {
        pool[0]
    } else {
        candidates[rng.random_range(0..candidates.len())]
    };
    *previous = Some(kind);
    kind
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Skin;
    use crate::sim::entity::Player;

    fn playing_world(tuning: &Tuning) -> World {
        let mut world: World = World::new();
        let id = world.entities.next_entity_id();
        let mut player = Player::new(id, Skin::Classic);
        player.is_in_countdown_phase = false;
        world.spawn(
            Entity::Player(player),
            Body::new(
                id,
                BodyCategory::Player,
                Vec2::new(tuning.player_x, 300.0),
                Vec2::new(tuning.player_width, tuning.player_height),
            ),
        );
        world
    }

    #[test]
    fn test_no_spawn_during_countdown() {
        let tuning = Tuning::default();
        let mut world = playing_world(&tuning);
        world.player_mut().unwrap().is_in_countdown_phase = true;
        let mut spawner = Spawner::new(1);
        spawner.reset(0.0);

        let spawned = spawner.update(&mut world, &tuning, GameVariant::FlappyShot, 60_000.0);
        assert!(spawned.is_empty());
        assert_eq!(world.entities.len(), 1);
    }

    #[test]
    fn test_obstacle_cadence() {
        let tuning = Tuning::default();
        let mut world = playing_world(&tuning);
        let mut spawner = Spawner::new(1);
        spawner.reset(0.0);

        let interval = tuning.obstacle_interval_ms;
        assert!(spawner.update(&mut world, &tuning, GameVariant::FlappyShot, interval - 1.0).is_empty());
        assert_eq!(spawner.update(&mut world, &tuning, GameVariant::FlappyShot, interval).len(), 1);
        // Nothing again until another full interval
        assert!(spawner.update(&mut world, &tuning, GameVariant::FlappyShot, interval + 10.0).is_empty());
    }

    #[test]
    fn test_single_obstacle_in_band_and_offscreen() {
        let tuning = Tuning::default();
        let mut world = playing_world(&tuning);
        let mut spawner = Spawner::new(99);
        let (lo, hi) = tuning.spawn_band();
        for _ in 0..50 {
            let id = spawner.spawn_single(&mut world, &tuning);
            let body = world.body(id).unwrap();
            assert!(body.top() >= lo - 0.001 && body.bottom() <= hi + 0.001);
            assert!(body.pos.x > tuning.world_width);
            assert!(body.size.y >= tuning.obstacle_min_height && body.size.y <= tuning.obstacle_max_height);
        }
    }

    #[test]
    fn test_pair_gap_bounds() {
        let tuning = Tuning::for_variant(GameVariant::SloppyBirds);
        let mut world = playing_world(&tuning);
        let mut spawner = Spawner::new(5);
        for _ in 0..50 {
            let [top, bottom] = spawner.spawn_pair(&mut world, &tuning);
            let top = world.body(top).unwrap();
            let bottom = world.body(bottom).unwrap();
            let gap = bottom.top() - top.bottom();
            assert!(gap >= tuning.min_gap - 0.01 && gap <= tuning.max_gap + 0.01);
            assert!((top.top() - tuning.ceiling_y).abs() < 0.01);
            assert!((bottom.bottom() - tuning.floor_y).abs() < 0.01);
        }
    }

    #[test]
    fn test_kinds_never_repeat_back_to_back() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut previous = None;
        let mut last = None;
        for _ in 0..200 {
            let kind = pick_kind(&mut rng, &ObstacleKind::TOP, &mut previous);
            assert_ne!(Some(kind), last);
            last = Some(kind);
        }
    }

    #[test]
    fn test_power_up_spacing() {
        let mut tuning = Tuning::default();
        tuning.power_up_chance = 1.0;
        tuning.obstacle_interval_ms = 1.0e9;
        let mut world = playing_world(&tuning);
        let mut spawner = Spawner::new(1);
        spawner.reset(0.0);

        // 4s check passes but spacing (8s) is not met yet
        assert!(spawner.update(&mut world, &tuning, GameVariant::FlappyShot, 4000.0).is_empty());
        assert_eq!(spawner.update(&mut world, &tuning, GameVariant::FlappyShot, 8000.0).len(), 1);
        assert!(spawner.update(&mut world, &tuning, GameVariant::FlappyShot, 12_000.0).is_empty());
        assert_eq!(spawner.update(&mut world, &tuning, GameVariant::FlappyShot, 16_000.0).len(), 1);
    }
}
