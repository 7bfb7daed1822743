//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - Scheduled effects fire from the simulation clock, never from wall time
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod body;
pub mod collision;
pub mod entity;
pub mod gc;
pub mod scroll;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod timers;
pub mod world;

pub use autopilot::should_press;
pub use body::{AabbSpace, Body, BodyCategory, EntityId, PhysicsSpace, StepParams};
pub use entity::{Entity, EntityStore, Obstacle, ObstacleKind, ObstaclePart, Player, PowerUp};
pub use gc::collect_garbage;
pub use snapshot::{ObstacleView, PlayerView, PowerUpView, Snapshot};
pub use spawn::Spawner;
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
pub use timers::{Deferred, Timers};
pub use world::World;
