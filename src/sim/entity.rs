//! Gameplay entities and the store that owns them

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::body::{BodyCategory, EntityId};
use crate::consts::MAX_LIVES;
use crate::settings::Skin;

/// Obstacle skins. Single obstacles use the drink set, pairs use bottles on
/// top and glasses on the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    Cocktail,
    Beer,
    Wine,
    Bottle,
    Shaker,
    Tap,
    Pint,
    Tumbler,
    Flute,
}

impl ObstacleKind {
    pub const SINGLE: [ObstacleKind; 3] = [ObstacleKind::Cocktail, ObstacleKind::Beer, ObstacleKind::Wine];
    pub const TOP: [ObstacleKind; 3] = [ObstacleKind::Bottle, ObstacleKind::Shaker, ObstacleKind::Tap];
    pub const BOTTOM: [ObstacleKind; 3] = [ObstacleKind::Pint, ObstacleKind::Tumbler, ObstacleKind::Flute];
}

/// Position of an obstacle within its spawn group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstaclePart {
    Single,
    Top,
    Bottom,
}

/// The player entity, one per session
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: EntityId,
    pub lives: u8,
    pub is_invincible: bool,
    /// Hit reaction in progress
    pub is_wobbling: bool,
    /// Set once the session is lost; never cleared
    pub is_falling: bool,
    pub is_in_countdown_phase: bool,
    pub skin: Skin,
    /// Clock time the current wobble started
    pub wobble_started_ms: Option<f64>,
}

impl Player {
    pub fn new(id: EntityId, skin: Skin) -> Self {
        Self {
            id,
            lives: MAX_LIVES,
            is_invincible: false,
            is_wobbling: false,
            is_falling: false,
            is_in_countdown_phase: true,
            skin,
            wobble_started_ms: None,
        }
    }

    /// Whether a press changes the player's velocity
    pub fn accepts_input(&self) -> bool {
        !self.is_falling && !self.is_in_countdown_phase
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub id: EntityId,
    pub kind: ObstacleKind,
    pub part: ObstaclePart,
    /// Set the first time the player passes this obstacle
    pub scored: bool,
    /// Flagged for removal by the garbage collector
    pub destroyed: bool,
}

impl Obstacle {
    pub fn new(id: EntityId, kind: ObstacleKind, part: ObstaclePart) -> Self {
        Self {
            id,
            kind,
            part,
            scored: false,
            destroyed: false,
        }
    }

    /// The bottom half of a pair is passed together with its top half and
    /// does not score on its own
    pub fn awards_points(&self) -> bool {
        self.part != ObstaclePart::Bottom
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PowerUp {
    pub id: EntityId,
    pub collected: bool,
    pub destroyed: bool,
}

impl PowerUp {
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            collected: false,
            destroyed: false,
        }
    }
}

/// Closed set of simulation objects
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Player(Player),
    Obstacle(Obstacle),
    PowerUp(PowerUp),
}

impl Entity {
    pub fn id(&self) -> EntityId {
        match self {
            Entity::Player(p) => p.id,
            Entity::Obstacle(o) => o.id,
            Entity::PowerUp(p) => p.id,
        }
    }

    pub fn category(&self) -> BodyCategory {
        match self {
            Entity::Player(_) => BodyCategory::Player,
            Entity::Obstacle(_) => BodyCategory::Obstacle,
            Entity::PowerUp(_) => BodyCategory::PowerUp,
        }
    }

    /// Obstacles and power-ups move with the background
    pub fn scrolls(&self) -> bool {
        !matches!(self, Entity::Player(_))
    }

    /// Consumed or flagged entities waiting for removal
    pub fn is_spent(&self) -> bool {
        match self {
            Entity::Player(_) => false,
            Entity::Obstacle(o) => o.destroyed,
            Entity::PowerUp(p) => p.collected || p.destroyed,
        }
    }
}

/// Owns every entity record, ordered by id
#[derive(Debug, Clone)]
pub struct EntityStore {
    entities: BTreeMap<EntityId, Entity>,
    player: Option<EntityId>,
    next_id: u32,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self {
            entities: BTreeMap::new(),
            player: None,
            next_id: 1,
        }
    }
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Insert an entity. A second player replaces the tracked player id.
    pub fn insert(&mut self, entity: Entity) {
        let id = entity.id();
        if matches!(entity, Entity::Player(_)) {
            self.player = Some(id);
        }
        self.entities.insert(id, entity);
    }

    /// Remove an entity; absent ids are a no-op returning `None`
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let removed = self.entities.remove(&id);
        if self.player == Some(id) {
            self.player = None;
        }
        removed
    }

    pub fn clear(&mut self) {
        self.entities.clear();
        self.player = None;
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn player_id(&self) -> Option<EntityId> {
        self.player
    }

    pub fn player(&self) -> Option<&Player> {
        match self.player.and_then(|id| self.entities.get(&id)) {
            Some(Entity::Player(p)) => Some(p),
            _ => None,
        }
    }

    pub fn player_mut(&mut self) -> Option<&mut Player> {
        match self.player.and_then(|id| self.entities.get_mut(&id)) {
            Some(Entity::Player(p)) => Some(p),
            _ => None,
        }
    }

    pub fn obstacles(&self) -> impl Iterator<Item = &Obstacle> {
        self.entities.values().filter_map(|e| match e {
            Entity::Obstacle(o) => Some(o),
            _ => None,
        })
    }

    pub fn power_ups(&self) -> impl Iterator<Item = &PowerUp> {
        self.entities.values().filter_map(|e| match e {
            Entity::PowerUp(p) => Some(p),
            _ => None,
        })
    }

    pub fn obstacle_mut(&mut self, id: EntityId) -> Option<&mut Obstacle> {
        match self.entities.get_mut(&id) {
            Some(Entity::Obstacle(o)) => Some(o),
            _ => None,
        }
    }

    pub fn power_up_mut(&mut self, id: EntityId) -> Option<&mut PowerUp> {
        match self.entities.get_mut(&id) {
            Some(Entity::PowerUp(p)) => Some(p),
            _ => None,
        }
    }
}
