//! Score persistence
//!
//! Features:
//! - `ScoreStore` trait for the save/read score collaborator
//! - `LocalScoreStore`: per-user, per-game leaderboards in LocalStorage
//!   (in memory on native)
//! - `ScoreKeeper`: cached best score that survives store failures

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;
use crate::highscores::HighScores;
use crate::settings::Skin;

/// Extra data saved alongside a score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreMetadata {
    pub user_id: String,
    pub skin: Skin,
    /// Unix timestamp (ms)
    pub timestamp: f64,
}

/// Save/read collaborator for session scores
pub trait ScoreStore {
    fn save_score(&mut self, score: u32, game: &str, metadata: &ScoreMetadata) -> Result<(), PersistenceError>;

    /// Best score recorded for `user_id` in `game`
    fn high_score(&self, user_id: &str, game: &str) -> Result<u32, PersistenceError>;
}

/// Leaderboards keyed by user and game
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalScoreStore {
    boards: HashMap<String, HighScores>,
}

impl LocalScoreStore {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "flappy_sim_scores";

    pub fn new() -> Self {
        Self::default()
    }

    fn key(user_id: &str, game: &str) -> String {
        format!("{}:{}", user_id, game)
    }

    pub fn board(&self, user_id: &str, game: &str) -> Option<&HighScores> {
        self.boards.get(&Self::key(user_id, game))
    }

    /// Load all boards from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str::<LocalScoreStore>(&json) {
                    Ok(store) => {
                        log::info!("Loaded {} score boards", store.boards.len());
                        return store;
                    }
                    Err(e) => log::warn!("Discarding corrupt score data: {}", e),
                }
            }
        }

        log::info!("No scores found, starting fresh");
        Self::new()
    }

    /// Write all boards to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> Result<(), PersistenceError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| PersistenceError::Unavailable("no LocalStorage".to_string()))?;

        let json = serde_json::to_string(self)?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|e| PersistenceError::Unavailable(format!("{:?}", e)))?;
        log::info!("Scores saved ({} boards)", self.boards.len());
        Ok(())
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) -> Result<(), PersistenceError> {
        // No-op for native
        Ok(())
    }
}

impl ScoreStore for LocalScoreStore {
    fn save_score(&mut self, score: u32, game: &str, metadata: &ScoreMetadata) -> Result<(), PersistenceError> {
        let board = self
            .boards
            .entry(Self::key(&metadata.user_id, game))
            .or_default();
        if let Some(rank) = board.add_score(score, metadata.skin, metadata.timestamp) {
            log::info!("{} scored {} in {} (rank {})", metadata.user_id, score, game, rank);
        }
        self.save()
    }

    fn high_score(&self, user_id: &str, game: &str) -> Result<u32, PersistenceError> {
        self.board(user_id, game)
            .and_then(HighScores::top_score)
            .ok_or_else(|| PersistenceError::NotFound {
                user: user_id.to_string(),
                game: game.to_string(),
            })
    }
}

/// Cached best score in front of a [`ScoreStore`].
///
/// Store failures are logged and swallowed; the cached value only ever
/// goes up.
#[derive(Debug)]
pub struct ScoreKeeper<S: ScoreStore> {
    store: S,
    user_id: String,
    game: &'static str,
    best: u32,
}

impl<S: ScoreStore> ScoreKeeper<S> {
    pub fn new(store: S, user_id: impl Into<String>, game: &'static str) -> Self {
        Self {
            store,
            user_id: user_id.into(),
            game,
            best: 0,
        }
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    pub fn game(&self) -> &'static str {
        self.game
    }

    /// Switch to another game's board. The cache restarts from 0 until the
    /// next refresh.
    pub fn set_game(&mut self, game: &'static str) {
        if self.game != game {
            self.game = game;
            self.best = 0;
        }
    }

    /// Re-read the best score from the store
    pub fn refresh(&mut self) -> u32 {
        match self.store.high_score(&self.user_id, self.game) {
            Ok(score) => self.best = self.best.max(score),
            Err(PersistenceError::NotFound { .. }) => {
                log::debug!("No {} score for {} yet", self.game, self.user_id);
            }
            Err(e) => log::warn!("High score fetch failed, keeping {}: {}", self.best, e),
        }
        self.best
    }

    /// Save `score` if it beats the cached best. Returns whether a save was
    /// attempted; the cache is updated even when the store fails.
    pub fn record(&mut self, score: u32, skin: Skin, timestamp: f64) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        let metadata = ScoreMetadata {
            user_id: self.user_id.clone(),
            skin,
            timestamp,
        };
        if let Err(e) = self.store.save_score(score, self.game, &metadata) {
            log::warn!("Saving score {} failed: {}", score, e);
        }
        true
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

/// Wall-clock time in Unix milliseconds, for score timestamps only
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}
