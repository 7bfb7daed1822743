//! Error types for the crate boundaries
//!
//! The simulation itself never fails; these cover the score store and
//! tuning data loaded from outside.

use thiserror::Error;

/// Failure reported by a score store.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("score store unavailable: {0}")]
    Unavailable(String),
    #[error("no score recorded for {user} in {game}")]
    NotFound { user: String, game: String },
    #[error("score data is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Tuning values that cannot drive a playable session.
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tuning overrides must be a JSON object")]
    NotAnObject,
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[error("jump velocity must point up (negative), got {0}")]
    JumpNotUpward(f32),
    #[error("obstacle height range is inverted: min {min} > max {max}")]
    HeightRange { min: f32, max: f32 },
    #[error("gap {gap} does not fit the spawn band of height {band}")]
    GapExceedsBand { gap: f32, band: f32 },
    #[error("gap range is inverted: min {min} > max {max}")]
    GapRange { min: f32, max: f32 },
    #[error("gap {gap} is too small for a player of height {player}")]
    GapTooSmall { gap: f32, player: f32 },
    #[error("power-up chance must be within 0..=1, got {0}")]
    Chance(f64),
    #[error("playable band is empty: ceiling {ceiling} >= floor {floor}")]
    Band { ceiling: f32, floor: f32 },
}
