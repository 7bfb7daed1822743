//! Entity store and physics space kept in lockstep
//!
//! Every entity has exactly one body with the same id. Spawning and
//! despawning always touch both sides.

use super::body::{AabbSpace, Body, EntityId, PhysicsSpace};
use super::entity::{Entity, EntityStore, Player};

#[derive(Debug, Clone, Default)]
pub struct World<P: PhysicsSpace = AabbSpace> {
    pub entities: EntityStore,
    pub physics: P,
}

impl<P: PhysicsSpace + Default> World<P> {
    pub fn new() -> Self {
        Self {
            entities: EntityStore::new(),
            physics: P::default(),
        }
    }
}

impl<P: PhysicsSpace> World<P> {
    /// Register an entity together with its body
    pub fn spawn(&mut self, entity: Entity, mut body: Body) -> EntityId {
        let id = entity.id();
        debug_assert_eq!(entity.category(), body.category());
        body.id = id;
        self.physics.insert(body);
        self.entities.insert(entity);
        id
    }

    /// Remove an entity and its body. Returns false if neither existed.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        let entity = self.entities.remove(id).is_some();
        let body = self.physics.remove(id).is_some();
        if entity != body {
            log::warn!("entity {:?} was only half registered", id);
        }
        entity || body
    }

    pub fn clear(&mut self) {
        self.entities.clear();
        self.physics.clear();
    }

    pub fn body(&self, id: EntityId) -> Option<&Body> {
        self.physics.get(id)
    }

    pub fn body_mut(&mut self, id: EntityId) -> Option<&mut Body> {
        self.physics.get_mut(id)
    }

    pub fn player(&self) -> Option<&Player> {
        self.entities.player()
    }

    pub fn player_mut(&mut self) -> Option<&mut Player> {
        self.entities.player_mut()
    }

    /// Player record and body, if both exist
    pub fn player_parts(&self) -> Option<(&Player, &Body)> {
        let player = self.entities.player()?;
        let body = self.physics.get(player.id)?;
        Some((player, body))
    }

    pub fn player_body(&self) -> Option<&Body> {
        self.entities.player_id().and_then(|id| self.physics.get(id))
    }

    pub fn player_body_mut(&mut self) -> Option<&mut Body> {
        let id = self.entities.player_id()?;
        self.physics.get_mut(id)
    }
}
