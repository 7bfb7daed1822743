//! Removal of spent and off-screen entities
//!
//! This is the only place scrolling entities leave the world, and it goes
//! through [`World::despawn`] so the store and the physics space stay in
//! step.

use super::body::{EntityId, PhysicsSpace};
use super::world::World;

/// Despawn scrolling entities that are spent or left of `offscreen_x`, and
/// any body with no entity behind it. Returns how many were removed.
pub fn collect_garbage<P: PhysicsSpace>(world: &mut World<P>, offscreen_x: f32) -> usize {
    let mut doomed: Vec<EntityId> = world
        .entities
        .iter()
        .filter(|e| e.scrolls())
        .filter(|e| {
            e.is_spent()
                || world
                    .body(e.id())
                    .is_none_or(|b| b.pos.x < offscreen_x)
        })
        .map(|e| e.id())
        .collect();

    doomed.extend(
        world
            .physics
            .ids()
            .into_iter()
            .filter(|id| !world.entities.contains(*id)),
    );

    let removed = doomed.into_iter().filter(|id| world.despawn(*id)).count();
    if removed > 0 {
        log::debug!("collected {} entities", removed);
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Skin;
    use crate::sim::body::{Body, BodyCategory};
    use crate::sim::entity::{Entity, Obstacle, ObstacleKind, ObstaclePart, Player, PowerUp};
    use glam::Vec2;

    fn world() -> (World, EntityId, EntityId, EntityId) {
        let mut world: World = World::new();
        let player = world.entities.next_entity_id();
        world.spawn(
            Entity::Player(Player::new(player, Skin::Classic)),
            Body::new(player, BodyCategory::Player, Vec2::new(-500.0, 0.0), Vec2::splat(20.0)),
        );
        let obstacle = world.entities.next_entity_id();
        world.spawn(
            Entity::Obstacle(Obstacle::new(obstacle, ObstacleKind::Pint, ObstaclePart::Bottom)),
            Body::new(obstacle, BodyCategory::Obstacle, Vec2::new(-150.0, 0.0), Vec2::splat(20.0)),
        );
        let power_up = world.entities.next_entity_id();
        world.spawn(
            Entity::PowerUp(PowerUp::new(power_up)),
            Body::new(power_up, BodyCategory::PowerUp, Vec2::new(200.0, 0.0), Vec2::splat(20.0)),
        );
        (world, player, obstacle, power_up)
    }

    #[test]
    fn test_removes_offscreen_but_never_player() {
        let (mut world, player, obstacle, power_up) = world();
        assert_eq!(collect_garbage(&mut world, -100.0), 1);
        assert!(!world.entities.contains(obstacle));
        assert!(!world.physics.contains(obstacle));
        assert!(world.entities.contains(player));
        assert!(world.entities.contains(power_up));
    }

    #[test]
    fn test_removes_collected() {
        let (mut world, _, _, power_up) = world();
        world.entities.power_up_mut(power_up).unwrap().collected = true;
        assert_eq!(collect_garbage(&mut world, -100.0), 2);
        assert!(!world.physics.contains(power_up));
    }

    #[test]
    fn test_idempotent() {
        let (mut world, _, _, _) = world();
        collect_garbage(&mut world, -100.0);
        assert_eq!(collect_garbage(&mut world, -100.0), 0);
        assert_eq!(world.entities.len(), world.physics.len());
    }

    #[test]
    fn test_removes_orphan_bodies() {
        let (mut world, _, _, _) = world();
        world.physics.insert(Body::new(
            EntityId(999),
            BodyCategory::Obstacle,
            Vec2::new(100.0, 0.0),
            Vec2::splat(10.0),
        ));
        assert_eq!(collect_garbage(&mut world, -100.0), 2);
        assert!(!world.physics.contains(EntityId(999)));
    }
}
