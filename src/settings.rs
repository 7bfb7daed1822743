//! Player settings and preferences
//!
//! Persisted separately from scores in LocalStorage.

use serde::{Deserialize, Serialize};

/// Player skin. The simulation only stores and forwards it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Skin {
    #[default]
    Classic,
    Lime,
    Cherry,
    Midnight,
}

impl Skin {
    pub const ALL: [Skin; 4] = [Skin::Classic, Skin::Lime, Skin::Cherry, Skin::Midnight];

    pub fn as_str(&self) -> &'static str {
        match self {
            Skin::Classic => "classic",
            Skin::Lime => "lime",
            Skin::Cherry => "cherry",
            Skin::Midnight => "midnight",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|skin| skin.as_str().eq_ignore_ascii_case(s))
    }

    /// Next skin in the selection wheel (wraps around)
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

/// Which of the two mini-games is being played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GameVariant {
    /// Single obstacles of random size
    #[default]
    FlappyShot,
    /// Paired top/bottom obstacles with a random gap
    SloppyBirds,
}

impl GameVariant {
    /// Game name used by the score store
    pub fn game_name(&self) -> &'static str {
        match self {
            GameVariant::FlappyShot => "flappy-shot",
            GameVariant::SloppyBirds => "sloppy-birds",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "flappy-shot" | "flappy" => Some(GameVariant::FlappyShot),
            "sloppy-birds" | "sloppy" => Some(GameVariant::SloppyBirds),
            _ => None,
        }
    }

    /// Whether obstacles come in top/bottom pairs
    pub fn paired_obstacles(&self) -> bool {
        matches!(self, GameVariant::SloppyBirds)
    }
}

/// Player settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Selected player skin
    pub skin: Skin,
    /// Selected game
    pub variant: GameVariant,
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "flappy_sim_settings";

    /// Advance to the next skin
    pub fn cycle_skin(&mut self) -> Skin {
        self.skin = self.skin.next();
        self.skin
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
