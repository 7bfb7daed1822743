//! Flappy Sim - simulation core for the tap-to-jump bar mini-games
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, entities, collisions, game state)
//! - `screen`: Host-side controller (input queue, persistence, teardown)
//! - `persistence`: Score storage collaborator with local fallback
//! - `tuning`: Data-driven game balance per variant
//! - `settings`: Player preferences (skin, variant)

pub mod error;
pub mod highscores;
pub mod persistence;
pub mod screen;
pub mod settings;
pub mod sim;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::{PersistenceError, TuningError};
pub use highscores::HighScores;
pub use screen::GameScreen;
pub use settings::{GameVariant, Settings, Skin};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Frame length the motion constants are expressed in (60 fps)
    pub const MAX_DELTA_MS: f64 = 1000.0 / 60.0;

    /// Lives at session start and after a power-up
    pub const MAX_LIVES: u8 = 3;

    /// Points for passing an obstacle
    pub const OBSTACLE_POINTS: u32 = 1;
    /// Points for collecting a power-up
    pub const POWER_UP_POINTS: u32 = 3;

    /// First value shown by the countdown (3 -> 2 -> 1)
    pub const COUNTDOWN_START: u8 = 3;
    /// Countdown step length
    pub const COUNTDOWN_STEP_MS: f64 = 1000.0;
}

/// Normalized motion scale for one tick.
///
/// The elapsed time is clamped to one 60 fps frame, then expressed as a
/// fraction of that frame. Non-finite or negative deltas yield 0.
#[inline]
pub fn delta_scale(delta_ms: f64) -> f32 {
    if !delta_ms.is_finite() || delta_ms <= 0.0 {
        return 0.0;
    }
    (delta_ms.min(consts::MAX_DELTA_MS) / consts::MAX_DELTA_MS) as f32
}
