//! Browser bindings
//!
//! Thin wasm-bindgen wrapper around [`RoundController`]. The page drives it
//! from `requestAnimationFrame`: call `advance` with the frame delta, forward
//! clicks and key presses, and render whatever `drain_events` returns (a JSON
//! array of tagged [`GameEvent`]s).

use wasm_bindgen::prelude::*;

use crate::highscores::HighScores;
use crate::settings::Settings;
use crate::sim::{GameEvent, HitOutcome, RoundController};

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Tank Math starting...");
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// One game session plus its leaderboard
#[wasm_bindgen]
pub struct WebGame {
    controller: RoundController,
    high_scores: HighScores,
    /// Rank from the last finished game, if it made the board
    last_rank: Option<usize>,
}

#[wasm_bindgen]
impl WebGame {
    /// New session with settings from LocalStorage. Pass `Date.now()` as the
    /// seed for a fresh question sequence.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: f64) -> Result<WebGame, JsValue> {
        let controller = RoundController::new(Settings::load(), seed as u64).map_err(to_js)?;
        log::info!("Game initialized with seed: {}", controller.seed());
        Ok(Self {
            controller,
            high_scores: HighScores::load(),
            last_rank: None,
        })
    }

    /// Start or restart the game
    pub fn start(&mut self) -> Result<(), JsValue> {
        self.last_rank = None;
        self.controller.start_game().map_err(to_js)
    }

    pub fn advance(&mut self, dt_ms: f64) -> Result<(), JsValue> {
        self.controller
            .advance(dt_ms.max(0.0) as u64)
            .map_err(to_js)
    }

    /// Click on an option button (0-based)
    pub fn select_option(&mut self, index: usize) -> bool {
        self.controller.select_option(index)
    }

    /// Keyboard input; only "1" to "3" do anything
    pub fn press_key(&mut self, key: &str) -> bool {
        match key.chars().next() {
            Some(c) if key.len() == 1 => self.controller.press_key(c),
            _ => false,
        }
    }

    /// The player's shell hit the enemy; true if that destroyed it
    pub fn projectile_landed(&mut self) -> bool {
        self.controller.projectile_landed() == HitOutcome::Destroyed
    }

    /// Returns the new paused state
    pub fn toggle_pause(&mut self) -> bool {
        self.controller.toggle_pause()
    }

    pub fn is_game_over(&self) -> bool {
        self.controller.is_game_over()
    }

    /// Pending events as a JSON array. A game over is recorded on the
    /// leaderboard before it is handed out.
    pub fn drain_events(&mut self) -> Result<String, JsValue> {
        let events = self.controller.drain_events();
        for event in &events {
            if let GameEvent::GameOver { summary } = event {
                self.last_rank = self.high_scores.add_score(summary, js_sys::Date::now());
                if self.last_rank.is_some() {
                    self.high_scores.save();
                }
            }
        }
        serde_json::to_string(&events).map_err(to_js)
    }

    /// Leaderboard as a JSON array, best first
    pub fn high_scores(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.high_scores.entries).map_err(to_js)
    }

    pub fn last_rank(&self) -> Option<usize> {
        self.last_rank
    }

    pub fn settings(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.controller.settings()).map_err(to_js)
    }
}

/// Validate and persist settings from the options screen. They apply to the
/// next `WebGame`.
#[wasm_bindgen]
pub fn save_settings(json: &str) -> Result<(), JsValue> {
    let settings: Settings = serde_json::from_str(json).map_err(to_js)?;
    settings.operations.validate().map_err(to_js)?;
    settings.save();
    Ok(())
}
