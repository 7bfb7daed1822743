//! Browser binding
//!
//! JS owns the animation frame loop and the canvas; it calls `frame` with
//! the elapsed time and draws the returned snapshot JSON.

use wasm_bindgen::prelude::*;

use crate::GameScreen;
use crate::persistence::LocalScoreStore;
use crate::settings::{GameVariant, Settings};

#[wasm_bindgen]
pub struct WebGame {
    screen: GameScreen<LocalScoreStore>,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(user_id: &str) -> WebGame {
        console_error_panic_hook::set_once();
        // Fails only when a logger is already installed
        let _ = console_log::init_with_level(log::Level::Info);

        let seed = js_sys::Date::now() as u64;
        let settings = Settings::load();
        log::info!("Flappy Sim starting (seed {})", seed);
        WebGame {
            screen: GameScreen::new(seed, settings, LocalScoreStore::load(), user_id),
        }
    }

    /// Advance by `delta_ms`; returns the frame's events as JSON
    pub fn frame(&mut self, delta_ms: f64) -> String {
        to_json(&self.screen.frame(delta_ms))
    }

    pub fn snapshot(&self) -> String {
        to_json(&self.screen.snapshot())
    }

    pub fn press(&mut self) {
        self.screen.press();
    }

    pub fn start(&mut self) -> String {
        to_json(&self.screen.start())
    }

    pub fn restart(&mut self) -> String {
        to_json(&self.screen.restart())
    }

    pub fn to_menu(&mut self) {
        self.screen.to_menu();
    }

    /// Returns the new skin name, or an empty string outside the menu
    pub fn cycle_skin(&mut self) -> String {
        self.screen
            .cycle_skin()
            .map(|s| s.as_str().to_string())
            .unwrap_or_default()
    }

    pub fn select_variant(&mut self, name: &str) -> bool {
        match GameVariant::from_str(name) {
            Some(variant) => self.screen.select_variant(variant),
            None => {
                log::warn!("Unknown game variant: {}", name);
                false
            }
        }
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.screen.set_autopilot(enabled);
    }

    /// Call when the screen unmounts
    pub fn teardown(&mut self) {
        self.screen.teardown();
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        log::error!("Serialization failed: {}", e);
        "null".to_string()
    })
}
