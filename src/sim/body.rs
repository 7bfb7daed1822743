//! Physical bodies and the physics space they live in
//!
//! Gameplay rules only talk to [`PhysicsSpace`]; [`AabbSpace`] is the
//! built-in axis-aligned box backend.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Stable entity/body identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Collision category; fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyCategory {
    Player,
    Obstacle,
    PowerUp,
}

/// A rectangular body. `pos` is the center of the box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Orientation in radians (visual only, the box stays axis-aligned)
    pub angle: f32,
    /// Full width and height of the collision box
    pub size: Vec2,
    category: BodyCategory,
    /// Static bodies ignore gravity and integration
    pub is_static: bool,
}

impl Body {
    pub fn new(id: EntityId, category: BodyCategory, pos: Vec2, size: Vec2) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            angle: 0.0,
            size,
            category,
            is_static: true,
        }
    }

    #[inline]
    pub fn category(&self) -> BodyCategory {
        self.category
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        self.size * 0.5
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y - self.size.y * 0.5
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y * 0.5
    }

    /// Strict box overlap (touching edges do not count)
    pub fn intersects(&self, other: &Body) -> bool {
        let delta = (self.pos - other.pos).abs();
        let reach = self.half_extents() + other.half_extents();
        delta.x < reach.x && delta.y < reach.y
    }
}

/// Parameters for one integration step
#[derive(Debug, Clone, Copy)]
pub struct StepParams {
    /// Downward acceleration per frame² (0 disables gravity)
    pub gravity: f32,
    /// Maximum downward speed per frame
    pub max_fall_speed: f32,
    /// Fraction of a 60 fps frame to advance (already clamped)
    pub scale: f32,
}

/// The simulation space bodies are registered into.
///
/// Adding and removing bodies is left to the world's spawn and despawn
/// paths; rules only read poses and change velocity/angle.
pub trait PhysicsSpace {
    fn insert(&mut self, body: Body);
    /// Remove a body; `None` if it was not registered
    fn remove(&mut self, id: EntityId) -> Option<Body>;
    fn get(&self, id: EntityId) -> Option<&Body>;
    fn get_mut(&mut self, id: EntityId) -> Option<&mut Body>;
    fn len(&self) -> usize;
    fn clear(&mut self);
    /// Registered ids in ascending order
    fn ids(&self) -> Vec<EntityId>;
    /// Advance every dynamic body by one (scaled) step
    fn step(&mut self, params: StepParams);
    /// Ids of all bodies overlapping `id`, ascending, excluding `id` itself
    fn overlapping(&self, id: EntityId) -> Vec<EntityId>;

    fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Brute-force axis-aligned box space.
///
/// A session holds at most a few dozen bodies, so the broad phase is a
/// plain scan in id order.
#[derive(Debug, Clone, Default)]
pub struct AabbSpace {
    bodies: BTreeMap<EntityId, Body>,
}

impl AabbSpace {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PhysicsSpace for AabbSpace {
    fn insert(&mut self, body: Body) {
        self.bodies.insert(body.id, body);
    }

    fn remove(&mut self, id: EntityId) -> Option<Body> {
        self.bodies.remove(&id)
    }

    fn get(&self, id: EntityId) -> Option<&Body> {
        self.bodies.get(&id)
    }

    fn get_mut(&mut self, id: EntityId) -> Option<&mut Body> {
        self.bodies.get_mut(&id)
    }

    fn len(&self) -> usize {
        self.bodies.len()
    }

    fn clear(&mut self) {
        self.bodies.clear();
    }

    fn ids(&self) -> Vec<EntityId> {
        self.bodies.keys().copied().collect()
    }

    fn step(&mut self, params: StepParams) {
        for body in self.bodies.values_mut().filter(|b| !b.is_static) {
            // Semi-implicit Euler: velocity first, then position
            body.vel.y += params.gravity * params.scale;
            body.vel.y = body.vel.y.min(params.max_fall_speed);
            body.pos += body.vel * params.scale;
        }
    }

    fn overlapping(&self, id: EntityId) -> Vec<EntityId> {
        let Some(subject) = self.bodies.get(&id) else {
            return Vec::new();
        };
        self.bodies
            .values()
            .filter(|other| other.id != id && subject.intersects(other))
            .map(|other| other.id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed(id: u32, category: BodyCategory, x: f32, y: f32) -> Body {
        Body::new(EntityId(id), category, Vec2::new(x, y), Vec2::new(20.0, 20.0))
    }

    #[test]
    fn test_intersects() {
        let a = boxed(1, BodyCategory::Player, 0.0, 0.0);
        assert!(a.intersects(&boxed(2, BodyCategory::Obstacle, 15.0, 15.0)));
        // Touching edges is not an overlap
        assert!(!a.intersects(&boxed(3, BodyCategory::Obstacle, 20.0, 0.0)));
        assert!(!a.intersects(&boxed(4, BodyCategory::Obstacle, 0.0, 40.0)));
    }

    #[test]
    fn test_step_skips_static_bodies() {
        let mut space = AabbSpace::new();
        let mut player = boxed(1, BodyCategory::Player, 0.0, 0.0);
        player.is_static = false;
        space.insert(player);
        space.insert(boxed(2, BodyCategory::Obstacle, 100.0, 0.0));

        let params = StepParams {
            gravity: 0.5,
            max_fall_speed: 12.0,
            scale: 1.0,
        };
        space.step(params);

        assert_eq!(space.get(EntityId(1)).unwrap().pos.y, 0.5);
        assert_eq!(space.get(EntityId(2)).unwrap().pos, Vec2::new(100.0, 0.0));
    }

    #[test]
    fn test_step_clamps_fall_speed() {
        let mut space = AabbSpace::new();
        let mut player = boxed(1, BodyCategory::Player, 0.0, 0.0);
        player.is_static = false;
        player.vel.y = 11.9;
        space.insert(player);

        space.step(StepParams {
            gravity: 0.5,
            max_fall_speed: 12.0,
            scale: 1.0,
        });
        assert_eq!(space.get(EntityId(1)).unwrap().vel.y, 12.0);
    }

    #[test]
    fn test_overlapping_is_sorted_and_excludes_self() {
        let mut space = AabbSpace::new();
        space.insert(boxed(5, BodyCategory::Obstacle, 5.0, 0.0));
        space.insert(boxed(1, BodyCategory::Player, 0.0, 0.0));
        space.insert(boxed(3, BodyCategory::PowerUp, -5.0, 0.0));
        space.insert(boxed(9, BodyCategory::Obstacle, 500.0, 0.0));

        assert_eq!(space.overlapping(EntityId(1)), vec![EntityId(3), EntityId(5)]);
        assert!(space.overlapping(EntityId(42)).is_empty());
    }

    #[test]
    fn test_remove_missing_is_none() {
        let mut space = AabbSpace::new();
        assert!(space.remove(EntityId(1)).is_none());
        assert!(space.is_empty());
    }
}
