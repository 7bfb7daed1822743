//! Data-driven game balance
//!
//! Motion values are per 60 fps frame (px/frame, px/frame²); durations are in
//! milliseconds of wall-clock time.

use serde::{Deserialize, Serialize};

use crate::error::TuningError;
use crate::settings::GameVariant;

/// Tunable constants for one game variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Tuning {
    // === World ===
    pub world_width: f32,
    /// Top of the playable band (player above this is out)
    pub ceiling_y: f32,
    /// Bottom of the playable band (ground)
    pub floor_y: f32,
    /// Obstacles are kept this far from the ceiling and floor
    pub spawn_margin: f32,
    /// Scrolling entities left of this x are removed
    pub offscreen_x: f32,

    // === Player ===
    pub player_x: f32,
    pub player_width: f32,
    pub player_height: f32,
    pub gravity: f32,
    /// Vertical velocity set by a press (negative is up)
    pub jump_velocity: f32,
    pub terminal_velocity: f32,
    /// Terminal velocity multiplier while plummeting after the last life
    pub fall_multiplier: f32,

    // === Obstacles ===
    pub scroll_speed: f32,
    pub obstacle_interval_ms: f64,
    pub obstacle_width: f32,
    /// Single obstacle height range
    pub obstacle_min_height: f32,
    pub obstacle_max_height: f32,
    /// Paired obstacle gap range
    pub min_gap: f32,
    pub max_gap: f32,
    /// An obstacle counts as passed once it is this far left of the player
    pub pass_offset: f32,

    // === Power-ups ===
    pub power_up_size: f32,
    pub power_up_check_ms: f64,
    pub power_up_chance: f64,
    pub power_up_min_spacing_ms: f64,

    // === Timed effects ===
    pub wobble_ms: f64,
    /// Peak rotation of the hit reaction (radians)
    pub wobble_angle: f32,
    pub invincibility_ms: f64,
    /// Delay between the fatal hit and the game-over event
    pub fall_delay_ms: f64,
    /// Pause after the countdown reaches zero before play starts
    pub countdown_grace_ms: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self::for_variant(GameVariant::FlappyShot)
    }
}

impl Tuning {
    /// Balance used by each mini-game
    pub fn for_variant(variant: GameVariant) -> Self {
        let base = Self {
            world_width: 400.0,
            ceiling_y: 0.0,
            floor_y: 640.0,
            spawn_margin: 80.0,
            offscreen_x: -100.0,

            player_x: 100.0,
            player_width: 34.0,
            player_height: 24.0,
            gravity: 0.5,
            jump_velocity: -9.0,
            terminal_velocity: 12.0,
            fall_multiplier: 1.5,

            scroll_speed: 3.0,
            obstacle_interval_ms: 1800.0,
            obstacle_width: 52.0,
            obstacle_min_height: 60.0,
            obstacle_max_height: 140.0,
            min_gap: 150.0,
            max_gap: 220.0,
            pass_offset: 30.0,

            power_up_size: 30.0,
            power_up_check_ms: 4000.0,
            power_up_chance: 0.2,
            power_up_min_spacing_ms: 8000.0,

            wobble_ms: 400.0,
            wobble_angle: 0.35,
            invincibility_ms: 5000.0,
            fall_delay_ms: 1000.0,
            countdown_grace_ms: 500.0,
        };

        match variant {
            GameVariant::FlappyShot => base,
            GameVariant::SloppyBirds => Self {
                gravity: 0.8,
                jump_velocity: -12.0,
                scroll_speed: 4.0,
                obstacle_interval_ms: 1500.0,
                obstacle_width: 64.0,
                ..base
            },
        }
    }

    /// Apply a JSON object of overrides on top of `variant`'s balance.
    /// Fields left out keep that variant's values; unknown fields are errors.
    pub fn from_json(variant: GameVariant, json: &str) -> Result<Self, TuningError> {
        let overrides: serde_json::Value = serde_json::from_str(json)?;
        let serde_json::Value::Object(overrides) = overrides else {
            return Err(TuningError::NotAnObject);
        };

        let mut merged = serde_json::to_value(Self::for_variant(variant))?;
        if let serde_json::Value::Object(fields) = &mut merged {
            fields.extend(overrides);
        }
        let tuning: Self = serde_json::from_value(merged)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that cannot produce a playable session
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive: [(&'static str, f64); 12] = [
            ("world_width", self.world_width as f64),
            ("player_width", self.player_width as f64),
            ("player_height", self.player_height as f64),
            ("gravity", self.gravity as f64),
            ("terminal_velocity", self.terminal_velocity as f64),
            ("scroll_speed", self.scroll_speed as f64),
            ("obstacle_interval_ms", self.obstacle_interval_ms),
            ("obstacle_width", self.obstacle_width as f64),
            ("obstacle_min_height", self.obstacle_min_height as f64),
            ("power_up_check_ms", self.power_up_check_ms),
            ("wobble_ms", self.wobble_ms),
            ("invincibility_ms", self.invincibility_ms),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(TuningError::NotPositive { field, value });
            }
        }

        let non_negative: [(&'static str, f64); 5] = [
            ("spawn_margin", self.spawn_margin as f64),
            ("pass_offset", self.pass_offset as f64),
            ("power_up_min_spacing_ms", self.power_up_min_spacing_ms),
            ("fall_delay_ms", self.fall_delay_ms),
            ("countdown_grace_ms", self.countdown_grace_ms),
        ];
        for (field, value) in non_negative {
            if !(value >= 0.0) {
                return Err(TuningError::Negative { field, value });
            }
        }

        if !(self.jump_velocity < 0.0) {
            return Err(TuningError::JumpNotUpward(self.jump_velocity));
        }

        if self.ceiling_y >= self.floor_y {
            return Err(TuningError::Band {
                ceiling: self.ceiling_y,
                floor: self.floor_y,
            });
        }
        if self.obstacle_min_height > self.obstacle_max_height {
            return Err(TuningError::HeightRange {
                min: self.obstacle_min_height,
                max: self.obstacle_max_height,
            });
        }
        if self.min_gap > self.max_gap {
            return Err(TuningError::GapRange {
                min: self.min_gap,
                max: self.max_gap,
            });
        }
        if self.min_gap <= self.player_height {
            return Err(TuningError::GapTooSmall {
                gap: self.min_gap,
                player: self.player_height,
            });
        }
        let (lo, hi) = self.spawn_band();
        if self.max_gap > hi - lo {
            return Err(TuningError::GapExceedsBand {
                gap: self.max_gap,
                band: hi - lo,
            });
        }
        if !(0.0..=1.0).contains(&self.power_up_chance) {
            return Err(TuningError::Chance(self.power_up_chance));
        }
        Ok(())
    }

    /// Vertical range obstacles and power-ups are placed in
    pub fn spawn_band(&self) -> (f32, f32) {
        (
            self.ceiling_y + self.spawn_margin,
            self.floor_y - self.spawn_margin,
        )
    }
}
