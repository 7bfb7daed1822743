//! Read-only view of the simulation for renderers

use serde::Serialize;

use super::body::PhysicsSpace;
use super::entity::{ObstacleKind, ObstaclePart};
use super::state::{GamePhase, GameState};
use crate::settings::Skin;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub width: f32,
    pub height: f32,
    pub lives: u8,
    pub invincible: bool,
    pub wobbling: bool,
    pub falling: bool,
    pub skin: Skin,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObstacleView {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub kind: ObstacleKind,
    pub part: ObstaclePart,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerUpView {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

/// Everything a frame needs to draw
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub score: u32,
    pub best_score: u32,
    pub lives: u8,
    pub countdown: u8,
    pub player: Option<PlayerView>,
    pub obstacles: Vec<ObstacleView>,
    pub power_ups: Vec<PowerUpView>,
}

impl<P: PhysicsSpace> GameState<P> {
    pub fn snapshot(&self) -> Snapshot {
        let player = self.world.player_parts().map(|(p, b)| PlayerView {
            x: b.pos.x,
            y: b.pos.y,
            angle: b.angle,
            width: b.size.x,
            height: b.size.y,
            lives: p.lives,
            invincible: p.is_invincible,
            wobbling: p.is_wobbling,
            falling: p.is_falling,
            skin: p.skin,
        });

        let obstacles = self
            .world
            .entities
            .obstacles()
            .filter(|o| !o.destroyed)
            .filter_map(|o| {
                let b = self.world.body(o.id)?;
                Some(ObstacleView {
                    id: o.id.0,
                    x: b.pos.x,
                    y: b.pos.y,
                    width: b.size.x,
                    height: b.size.y,
                    kind: o.kind,
                    part: o.part,
                })
            })
            .collect();

        let power_ups = self
            .world
            .entities
            .power_ups()
            .filter(|p| !p.collected && !p.destroyed)
            .filter_map(|p| {
                let b = self.world.body(p.id)?;
                Some(PowerUpView {
                    id: p.id.0,
                    x: b.pos.x,
                    y: b.pos.y,
                    size: b.size.x,
                })
            })
            .collect();

        Snapshot {
            phase: self.phase,
            score: self.score,
            best_score: self.best_score,
            lives: self.lives(),
            countdown: self.countdown,
            player,
            obstacles,
            power_ups,
        }
    }
}
