//! Game state, phases and the screen-level state machine
//!
//! Everything a session needs lives in [`GameState`]; there is no
//! module-level mutable state, so sessions never bleed into each other.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{AabbSpace, Body, BodyCategory, EntityId, PhysicsSpace};
use super::entity::{Entity, Player};
use super::spawn::Spawner;
use super::timers::{Deferred, Timers};
use super::world::World;
use crate::consts::*;
use crate::settings::{GameVariant, Skin};
use crate::tuning::Tuning;

/// Screen-level phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for start; nothing simulates
    Menu,
    /// Player placed but frozen while 3-2-1 counts down
    Countdown,
    /// Active gameplay
    Playing,
    /// Session ended; waiting for restart or menu
    GameOver,
}

/// Domain events raised by transitions and ticks, consumed by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    CountdownTick { value: u8 },
    /// Countdown done, gravity on
    Launched,
    Scored { points: u32, total: u32 },
    /// Obstacle hit that cost a life but did not end the session
    Hit { lives: u8 },
    PowerUpCollected { lives: u8 },
    PowerUpExpired,
    /// Terminal plummet started; `GameOver` follows after the fall delay
    Falling,
    GameOver { score: u32 },
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState<P: PhysicsSpace = AabbSpace> {
    /// Run seed for reproducibility
    pub seed: u64,
    pub variant: GameVariant,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub world: World<P>,
    pub spawner: Spawner,
    pub timers: Timers,
    pub score: u32,
    /// Best score known to the host, mirrored for presentation
    pub best_score: u32,
    /// Value currently shown by the countdown (0 during the grace pause)
    pub countdown: u8,
    /// Simulation clock (ms); advances by the raw frame delta
    pub clock_ms: f64,
    pub gravity_enabled: bool,
    pub time_ticks: u64,
    /// Skin the next session's player gets
    pub skin: Skin,
    /// Incremented on every reset
    pub session: u32,
}

impl<P: PhysicsSpace + Default> GameState<P> {
    /// Create a state sitting in the menu
    pub fn new(seed: u64, variant: GameVariant, tuning: Tuning) -> Self {
        Self {
            seed,
            variant,
            tuning,
            phase: GamePhase::Menu,
            world: World::new(),
            spawner: Spawner::new(seed),
            timers: Timers::new(),
            score: 0,
            best_score: 0,
            countdown: 0,
            clock_ms: 0.0,
            gravity_enabled: false,
            time_ticks: 0,
            skin: Skin::default(),
            session: 0,
        }
    }
}

impl<P: PhysicsSpace> GameState<P> {
    /// Menu -> Countdown. Returns the first countdown event.
    pub fn start(&mut self) -> Vec<GameEvent> {
        if self.phase != GamePhase::Menu {
            log::debug!("start ignored in {:?}", self.phase);
            return Vec::new();
        }
        self.begin_countdown()
    }

    /// GameOver -> Countdown with a fresh session
    pub fn restart(&mut self) -> Vec<GameEvent> {
        if self.phase != GamePhase::GameOver {
            log::debug!("restart ignored in {:?}", self.phase);
            return Vec::new();
        }
        self.begin_countdown()
    }

    /// Any phase -> Menu. Stops the session and cancels its timers.
    pub fn to_menu(&mut self) {
        self.world.clear();
        self.timers.clear();
        self.gravity_enabled = false;
        self.countdown = 0;
        self.phase = GamePhase::Menu;
        log::info!("Back to menu");
    }

    /// Wipe all session state and place a fresh, frozen player
    pub fn reset(&mut self) {
        self.world.clear();
        self.timers.clear();
        self.score = 0;
        self.countdown = 0;
        self.gravity_enabled = false;
        self.spawner.reset(self.clock_ms);
        self.session += 1;

        let id = self.world.entities.next_entity_id();
        let t = &self.tuning;
        let pos = Vec2::new(t.player_x, (t.ceiling_y + t.floor_y) / 2.0);
        let size = Vec2::new(t.player_width, t.player_height);
        self.world.spawn(
            Entity::Player(Player::new(id, self.skin)),
            Body::new(id, BodyCategory::Player, pos, size),
        );
    }

    fn begin_countdown(&mut self) -> Vec<GameEvent> {
        self.reset();
        self.phase = GamePhase::Countdown;
        self.countdown = COUNTDOWN_START;
        self.timers
            .schedule(Deferred::CountdownStep, self.clock_ms + COUNTDOWN_STEP_MS);
        log::info!(
            "Session {} counting down ({})",
            self.session,
            self.variant.game_name()
        );
        vec![GameEvent::CountdownTick {
            value: COUNTDOWN_START,
        }]
    }

    /// Countdown finished: unfreeze the player and turn gravity on
    fn launch(&mut self) -> Option<GameEvent> {
        if self.phase != GamePhase::Countdown {
            return None;
        }
        let player = self.world.player_mut()?;
        player.is_in_countdown_phase = false;
        if let Some(body) = self.world.player_body_mut() {
            body.is_static = false;
            body.vel = Vec2::ZERO;
        }
        self.gravity_enabled = true;
        self.phase = GamePhase::Playing;
        self.spawner.reset(self.clock_ms);
        log::info!("Session {} launched", self.session);
        Some(GameEvent::Launched)
    }

    /// Apply a fired timer. `due_ms` is when it was meant to fire.
    pub fn apply_deferred(&mut self, effect: Deferred, due_ms: f64) -> Option<GameEvent> {
        match effect {
            Deferred::CountdownStep => {
                if self.phase != GamePhase::Countdown {
                    return None;
                }
                self.countdown = self.countdown.saturating_sub(1);
                if self.countdown > 0 {
                    self.timers
                        .schedule(Deferred::CountdownStep, due_ms + COUNTDOWN_STEP_MS);
                    Some(GameEvent::CountdownTick {
                        value: self.countdown,
                    })
                } else {
                    self.timers
                        .schedule(Deferred::Launch, due_ms + self.tuning.countdown_grace_ms);
                    None
                }
            }
            Deferred::Launch => self.launch(),
            Deferred::WobbleEnd => {
                let player = self.world.player_mut()?;
                player.is_wobbling = false;
                player.wobble_started_ms = None;
                if let Some(body) = self.world.player_body_mut() {
                    body.angle = 0.0;
                }
                None
            }
            Deferred::InvincibilityEnd => {
                let player = self.world.player_mut()?;
                if !player.is_invincible {
                    return None;
                }
                player.is_invincible = false;
                Some(GameEvent::PowerUpExpired)
            }
            Deferred::GameOver => {
                if self.phase != GamePhase::Playing {
                    return None;
                }
                self.phase = GamePhase::GameOver;
                self.timers.clear();
                log::info!("Session {} over, score {}", self.session, self.score);
                Some(GameEvent::GameOver { score: self.score })
            }
        }
    }

    /// Set the player's vertical velocity to the jump impulse
    pub fn jump(&mut self) -> bool {
        if !self.world.player().is_some_and(|p| p.accepts_input()) {
            return false;
        }
        let jump = self.tuning.jump_velocity;
        match self.world.player_body_mut() {
            Some(body) => {
                body.vel.y = jump;
                true
            }
            None => false,
        }
    }

    /// Award an obstacle's points the first time it is passed
    pub fn score_obstacle(&mut self, id: EntityId) -> Option<GameEvent> {
        if self.world.player().is_none_or(|p| p.is_falling) {
            return None;
        }
        let obstacle = self.world.entities.obstacle_mut(id)?;
        if obstacle.scored || !obstacle.awards_points() {
            return None;
        }
        obstacle.scored = true;
        Some(self.add_score(OBSTACLE_POINTS))
    }

    pub fn add_score(&mut self, points: u32) -> GameEvent {
        self.score = self.score.saturating_add(points);
        GameEvent::Scored {
            points,
            total: self.score,
        }
    }

    /// Enter the terminal plummet. Only the first call per session acts.
    pub fn begin_fall(&mut self) -> Option<GameEvent> {
        let player = self.world.player_mut()?;
        if player.is_falling {
            return None;
        }
        player.is_falling = true;
        player.lives = 0;
        let plummet = self.tuning.terminal_velocity * self.tuning.fall_multiplier;
        if let Some(body) = self.world.player_body_mut() {
            body.vel.y = plummet;
        }
        self.timers
            .schedule(Deferred::GameOver, self.clock_ms + self.tuning.fall_delay_ms);
        log::debug!("Player falling at {:.0}ms", self.clock_ms);
        Some(GameEvent::Falling)
    }

    /// Start the hit reaction; clears itself after `wobble_ms`
    pub fn begin_wobble(&mut self) {
        let now = self.clock_ms;
        if let Some(player) = self.world.player_mut() {
            player.is_wobbling = true;
            player.wobble_started_ms = Some(now);
            self.timers
                .reschedule(Deferred::WobbleEnd, now + self.tuning.wobble_ms);
        }
    }

    pub fn lives(&self) -> u8 {
        self.world.player().map(|p| p.lives).unwrap_or(0)
    }
}
