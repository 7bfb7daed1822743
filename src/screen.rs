//! Host-side game screen
//!
//! Owns one [`GameState`] plus everything around it the simulation stays
//! out of: the queued input, settings, the best-score cache and the
//! running flag that teardown clears.

use crate::error::TuningError;
use crate::persistence::{LocalScoreStore, ScoreKeeper, ScoreStore, now_ms};
use crate::settings::{GameVariant, Settings, Skin};
use crate::sim::{GameEvent, GamePhase, GameState, Snapshot, TickInput, should_press, tick};
use crate::tuning::Tuning;

/// One mounted game screen
pub struct GameScreen<S: ScoreStore = LocalScoreStore> {
    state: GameState,
    scores: ScoreKeeper<S>,
    settings: Settings,
    /// Tuning overrides (JSON object) reapplied on every variant change
    overrides: Option<String>,
    /// Presses queued since the last frame
    pending_presses: u32,
    /// Cleared by teardown; frames after that do nothing
    running: bool,
    autopilot: bool,
}

impl<S: ScoreStore> GameScreen<S> {
    /// Mount a screen in the menu and fetch the best score
    pub fn new(seed: u64, settings: Settings, store: S, user_id: impl Into<String>) -> Self {
        let variant = settings.variant;
        let mut state = GameState::new(seed, variant, Tuning::for_variant(variant));
        state.skin = settings.skin;
        let mut scores = ScoreKeeper::new(store, user_id, variant.game_name());
        state.best_score = scores.refresh();
        log::info!(
            "Game screen mounted ({}, best {})",
            variant.game_name(),
            state.best_score
        );
        Self {
            state,
            scores,
            settings,
            overrides: None,
            pending_presses: 0,
            running: true,
            autopilot: false,
        }
    }

    /// Apply tuning overrides on top of the current variant's balance.
    /// They stay in effect when the variant changes.
    pub fn with_overrides(mut self, json: &str) -> Result<Self, TuningError> {
        self.state.tuning = Tuning::from_json(self.state.variant, json)?;
        self.overrides = Some(json.to_string());
        Ok(self)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn scores(&self) -> &ScoreKeeper<S> {
        &self.scores
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.autopilot = enabled;
        log::info!("Autopilot: {}", enabled);
    }

    /// Menu -> Countdown
    pub fn start(&mut self) -> Vec<GameEvent> {
        if !self.running {
            return Vec::new();
        }
        self.pending_presses = 0;
        self.state.start()
    }

    /// GameOver -> Countdown
    pub fn restart(&mut self) -> Vec<GameEvent> {
        if !self.running {
            return Vec::new();
        }
        self.pending_presses = 0;
        self.state.restart()
    }

    /// Back to the menu; the best score is re-read from the store
    pub fn to_menu(&mut self) {
        self.pending_presses = 0;
        self.state.to_menu();
        self.state.best_score = self.scores.refresh();
    }

    /// Queue a tap for the next frame
    pub fn press(&mut self) {
        if self.running {
            self.pending_presses = self.pending_presses.saturating_add(1);
        }
    }

    /// Advance the skin selection. Only allowed in the menu.
    pub fn cycle_skin(&mut self) -> Option<Skin> {
        if self.state.phase != GamePhase::Menu {
            return None;
        }
        let skin = self.settings.cycle_skin();
        self.settings.save();
        self.state.skin = skin;
        Some(skin)
    }

    /// Switch game. Only allowed in the menu.
    pub fn select_variant(&mut self, variant: GameVariant) -> bool {
        if self.state.phase != GamePhase::Menu {
            return false;
        }
        self.settings.variant = variant;
        self.settings.save();
        self.state.variant = variant;
        self.state.tuning = self.tuning_for(variant);
        self.scores.set_game(variant.game_name());
        self.state.best_score = self.scores.refresh();
        true
    }

    fn tuning_for(&self, variant: GameVariant) -> Tuning {
        let Some(json) = &self.overrides else {
            return Tuning::for_variant(variant);
        };
        Tuning::from_json(variant, json).unwrap_or_else(|e| {
            log::warn!("Tuning overrides rejected for {}, using defaults: {}", variant.game_name(), e);
            Tuning::for_variant(variant)
        })
    }

    /// Run one frame of `delta_ms`. Queued presses are consumed here; a
    /// finished session is recorded with the score store.
    pub fn frame(&mut self, delta_ms: f64) -> Vec<GameEvent> {
        if !self.running {
            return Vec::new();
        }
        let mut presses = std::mem::take(&mut self.pending_presses);
        if self.autopilot && should_press(&self.state) {
            presses += 1;
        }

        let events = tick(&mut self.state, &TickInput { presses }, delta_ms);

        let final_score = events.iter().find_map(|e| match e {
            GameEvent::GameOver { score } => Some(*score),
            _ => None,
        });
        if let Some(score) = final_score {
            if self.scores.record(score, self.state.skin, now_ms()) {
                log::info!("New best score: {}", score);
            }
            self.state.best_score = self.scores.best();
        }
        events
    }

    /// Stop the loop and cancel everything pending
    pub fn teardown(&mut self) {
        self.running = false;
        self.pending_presses = 0;
        self.state.timers.clear();
        log::info!("Game screen torn down");
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::testing::RecordingStore;

    const FRAME: f64 = 16.0;

    fn screen(store: RecordingStore) -> GameScreen<RecordingStore> {
        GameScreen::new(99, Settings::default(), store, "player-1")
    }

    fn run_until_launch(screen: &mut GameScreen<RecordingStore>) {
        for _ in 0..1000 {
            if screen.frame(FRAME).contains(&GameEvent::Launched) {
                return;
            }
        }
        panic!("never launched");
    }

    fn run_until_game_over(screen: &mut GameScreen<RecordingStore>) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for _ in 0..1000 {
            events.extend(screen.frame(FRAME));
            if screen.state().phase == GamePhase::GameOver {
                break;
            }
        }
        events
    }

    #[test]
    fn test_new_best_saved_once() {
        let mut screen = screen(RecordingStore::with_best(30));
        assert_eq!(screen.state().best_score, 30);

        screen.start();
        run_until_launch(&mut screen);
        screen.state_mut().score = 42;
        screen.state_mut().begin_fall();
        let events = run_until_game_over(&mut screen);
        assert!(events.contains(&GameEvent::GameOver { score: 42 }));

        // Further frames in game over do not save again
        for _ in 0..10 {
            screen.frame(FRAME);
        }
        let saved: Vec<u32> = screen.scores().store().saved.iter().map(|s| s.0).collect();
        assert_eq!(saved, vec![42]);
        assert_eq!(screen.scores().best(), 42);
        assert_eq!(screen.state().best_score, 42);
    }

    #[test]
    fn test_lower_score_not_saved() {
        let mut screen = screen(RecordingStore::with_best(30));
        screen.start();
        run_until_launch(&mut screen);
        screen.state_mut().score = 12;
        screen.state_mut().begin_fall();
        run_until_game_over(&mut screen);
        assert!(screen.scores().store().saved.is_empty());
        assert_eq!(screen.scores().best(), 30);
    }

    #[test]
    fn test_store_failure_is_swallowed() {
        let mut screen = screen(RecordingStore::failing());
        assert_eq!(screen.state().best_score, 0);

        screen.start();
        run_until_launch(&mut screen);
        screen.state_mut().score = 5;
        screen.state_mut().begin_fall();
        let events = run_until_game_over(&mut screen);
        assert!(events.contains(&GameEvent::GameOver { score: 5 }));
        assert_eq!(screen.state().best_score, 5);

        screen.to_menu();
        assert_eq!(screen.state().best_score, 5);
    }

    #[test]
    fn test_presses_drained_into_one_tick() {
        let mut screen = screen(RecordingStore::default());
        screen.start();
        run_until_launch(&mut screen);
        screen.press();
        screen.press();
        screen.frame(FRAME);
        assert!(screen.state().world.player_body().unwrap().vel.y < 0.0);

        // Nothing queued, gravity wins again
        let vy = screen.state().world.player_body().unwrap().vel.y;
        screen.frame(FRAME);
        assert!(screen.state().world.player_body().unwrap().vel.y > vy);
    }

    #[test]
    fn test_presses_during_countdown_dropped() {
        let mut screen = screen(RecordingStore::default());
        screen.start();
        screen.press();
        screen.frame(FRAME);
        assert_eq!(screen.state().world.player_body().unwrap().vel.y, 0.0);
    }

    #[test]
    fn test_teardown_stops_everything() {
        let mut screen = screen(RecordingStore::default());
        screen.start();
        screen.frame(FRAME);
        screen.teardown();

        assert!(!screen.is_running());
        assert!(screen.state().timers.is_empty());
        let clock = screen.state().clock_ms;
        for _ in 0..500 {
            assert!(screen.frame(FRAME).is_empty());
        }
        assert_eq!(screen.state().clock_ms, clock);
        assert_eq!(screen.state().phase, GamePhase::Countdown);
        assert!(screen.start().is_empty());
    }

    #[test]
    fn test_skin_and_variant_only_in_menu() {
        let mut screen = screen(RecordingStore::default());
        assert_eq!(screen.cycle_skin(), Some(Skin::Lime));
        assert!(screen.select_variant(GameVariant::SloppyBirds));
        assert_eq!(screen.scores().game(), "sloppy-birds");
        assert_eq!(screen.state().tuning.gravity, 0.8);

        screen.start();
        assert_eq!(screen.state().world.player().unwrap().skin, Skin::Lime);
        assert_eq!(screen.cycle_skin(), None);
        assert!(!screen.select_variant(GameVariant::FlappyShot));
    }

    #[test]
    fn test_overrides_survive_variant_change() {
        let mut screen = screen(RecordingStore::default())
            .with_overrides(r#"{ "scroll_speed": 4.5 }"#)
            .unwrap();
        assert_eq!(screen.state().tuning.scroll_speed, 4.5);
        assert_eq!(screen.state().tuning.gravity, 0.5);

        assert!(screen.select_variant(GameVariant::SloppyBirds));
        assert_eq!(screen.state().tuning.scroll_speed, 4.5);
        assert_eq!(screen.state().tuning.gravity, 0.8);
        assert_eq!(screen.state().tuning.obstacle_width, 64.0);

        assert!(screen.select_variant(GameVariant::FlappyShot));
        assert_eq!(screen.state().tuning.scroll_speed, 4.5);
        assert_eq!(screen.state().tuning.gravity, 0.5);
    }

    #[test]
    fn test_invalid_overrides_rejected() {
        let result = screen(RecordingStore::default()).with_overrides(r#"{ "gravity": -1 }"#);
        assert!(matches!(result, Err(TuningError::NotPositive { field: "gravity", .. })));
    }

    #[test]
    fn test_to_menu_refreshes_best() {
        let mut screen = screen(RecordingStore::default());
        screen.start();
        screen.scores.store_mut().high_score = Some(77);
        screen.to_menu();
        assert_eq!(screen.state().best_score, 77);
        assert_eq!(screen.state().phase, GamePhase::Menu);
    }

    #[test]
    fn test_autopilot_keeps_session_alive() {
        let mut screen = screen(RecordingStore::default());
        screen.set_autopilot(true);
        screen.start();
        for _ in 0..400 {
            screen.frame(FRAME);
        }
        assert_eq!(screen.state().phase, GamePhase::Playing);
    }
}
