//! Session state: score, high score, pause and game over
//!
//! One session lives for the whole run. The high score is the only value that
//! outlives it, through the preferences store.

use serde::{Deserialize, Serialize};

use crate::audio::SoundEffect;
use crate::persistence::{KeyValueStore, save_or_warn};
use crate::platform::Collaborators;
use crate::settings::ScoreSettings;

/// Preferences key for the persisted high score
pub const HIGH_SCORE_KEY: &str = "HighScore";

/// Score and flow state for one run of the game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    current_score: u64,
    high_score: u64,
    is_paused: bool,
    is_game_over: bool,
    /// Seconds accumulated toward the next per-second award. f64 so long
    /// runs of small frame deltas do not drift.
    score_timer: f64,
    /// Best score when this run began; beating it (if non-zero) plays the cue
    #[serde(default)]
    best_to_beat: u64,
    /// Set once the high score has been beaten this run
    #[serde(default)]
    high_score_announced: bool,
    scoring: ScoreSettings,
}

impl SessionState {
    /// Create a session with the given high score
    pub fn new(scoring: ScoreSettings, high_score: u64) -> Self {
        Self {
            current_score: 0,
            high_score,
            is_paused: false,
            is_game_over: false,
            score_timer: 0.0,
            best_to_beat: high_score,
            high_score_announced: false,
            scoring,
        }
    }

    /// Create a session, reading the high score back from the store
    pub fn load(scoring: ScoreSettings, store: Option<&dyn KeyValueStore>) -> Self {
        let high_score = store
            .and_then(|s| s.get_int(HIGH_SCORE_KEY))
            .map(|v| v.max(0) as u64)
            .unwrap_or(0);
        log::info!("Session started, high score {}", high_score);
        Self::new(scoring, high_score)
    }

    /// Push the initial score and high score to the display and hide the
    /// pause menu
    pub fn start(&self, ctx: &mut Collaborators) {
        self.show_score(ctx);
        self.show_high_score(ctx);
        if let Some(hud) = ctx.hud() {
            hud.show_pause_menu(false);
            hud.hide_final_score();
        }
    }

    pub fn current_score(&self) -> u64 {
        self.current_score
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    pub fn is_game_over(&self) -> bool {
        self.is_game_over
    }

    pub fn score_timer(&self) -> f64 {
        self.score_timer
    }

    /// True when gameplay time should advance
    pub fn is_running(&self) -> bool {
        !self.is_paused && !self.is_game_over
    }

    /// Add to the score, raising and persisting the high score if beaten
    pub fn add_score(&mut self, amount: u64, ctx: &mut Collaborators) {
        self.current_score = self.current_score.saturating_add(amount);
        self.show_score(ctx);

        if self.current_score > self.high_score {
            self.high_score = self.current_score;
            self.show_high_score(ctx);
            self.save_high_score(ctx);
            if self.best_to_beat > 0 && !self.high_score_announced {
                self.high_score_announced = true;
                log::info!("New high score this run");
                ctx.play(SoundEffect::HighScore);
            }
        }
    }

    /// Award the fixed pickup score
    pub fn add_pickup_score(&mut self, ctx: &mut Collaborators) {
        self.add_score(self.scoring.score_per_pickup, ctx);
    }

    /// Accumulate time and award `score_per_second` for each whole second.
    /// Several seconds elapsed in one call are awarded together.
    pub fn tick(&mut self, dt: f32, ctx: &mut Collaborators) {
        if !self.is_running() {
            return;
        }
        let dt = if dt.is_finite() { f64::from(dt.max(0.0)) } else { 0.0 };

        self.score_timer += dt;
        let whole = self.score_timer.floor();
        if whole < 1.0 {
            return;
        }
        self.score_timer -= whole;
        // `as` saturates for values beyond u64
        let seconds = whole as u64;
        self.add_score(self.scoring.score_per_second.saturating_mul(seconds), ctx);
    }

    /// Pause gameplay. Ignored after game over.
    pub fn pause(&mut self, ctx: &mut Collaborators) {
        if self.is_game_over {
            return;
        }
        self.is_paused = true;
        if let Some(time) = ctx.time() {
            time.set_time_scale(0.0);
            time.set_cursor_captured(false);
        }
        if let Some(hud) = ctx.hud() {
            hud.show_pause_menu(true);
        }
        log::debug!("Paused");
    }

    /// Resume gameplay
    pub fn resume(&mut self, ctx: &mut Collaborators) {
        self.is_paused = false;
        if let Some(time) = ctx.time() {
            time.set_time_scale(1.0);
            time.set_cursor_captured(true);
        }
        if let Some(hud) = ctx.hud() {
            hud.show_pause_menu(false);
        }
        log::debug!("Resumed");
    }

    /// Pause key handler
    pub fn toggle_pause(&mut self, ctx: &mut Collaborators) {
        if self.is_game_over {
            return;
        }
        if self.is_paused {
            self.resume(ctx);
        } else {
            self.pause(ctx);
        }
    }

    /// End the run and show the final score
    pub fn game_over(&mut self, ctx: &mut Collaborators) {
        if self.is_game_over {
            return;
        }
        self.is_game_over = true;
        if let Some(time) = ctx.time() {
            time.set_time_scale(0.0);
        }
        if let Some(hud) = ctx.hud() {
            hud.show_final_score(&format!("Final Score: {}", self.current_score));
        }
        ctx.play(SoundEffect::GameOver);
        log::info!("Game Over! Final Score: {}", self.current_score);
    }

    /// Reset the run and reload the current scene. The high score is kept.
    pub fn restart(&mut self, ctx: &mut Collaborators) {
        self.reset_flow(ctx);
        self.current_score = 0;
        self.score_timer = 0.0;
        self.best_to_beat = self.high_score;
        self.high_score_announced = false;
        self.show_score(ctx);
        if let Some(scene) = ctx.scene() {
            scene.reload_current();
        }
        log::info!("Restarting");
    }

    /// Leave for the main menu
    pub fn main_menu(&mut self, ctx: &mut Collaborators) {
        self.reset_flow(ctx);
        if let Some(scene) = ctx.scene() {
            scene.load_main_menu();
        }
        log::info!("Returning to main menu");
    }

    /// Ask the host to exit
    pub fn quit(&mut self, ctx: &mut Collaborators) {
        log::info!("Quit requested");
        if let Some(scene) = ctx.scene() {
            scene.quit();
        }
    }

    /// Forget the persisted high score
    pub fn reset_high_score(&mut self, ctx: &mut Collaborators) {
        self.high_score = 0;
        self.best_to_beat = 0;
        self.high_score_announced = false;
        self.save_high_score(ctx);
        self.show_high_score(ctx);
        log::info!("High score reset");
    }

    /// Flush the store at process exit
    pub fn shutdown(&self, ctx: &mut Collaborators) {
        if let Some(store) = ctx.store() {
            save_or_warn(store);
        }
        log::info!(
            "Session ended: score {}, high score {}",
            self.current_score,
            self.high_score
        );
    }

    fn reset_flow(&mut self, ctx: &mut Collaborators) {
        if let Some(time) = ctx.time() {
            time.set_time_scale(1.0);
        }
        self.is_paused = false;
        self.is_game_over = false;
        if let Some(hud) = ctx.hud() {
            hud.show_pause_menu(false);
            hud.hide_final_score();
        }
    }

    fn save_high_score(&self, ctx: &mut Collaborators) {
        if let Some(store) = ctx.store() {
            store.set_int(HIGH_SCORE_KEY, self.high_score.min(i64::MAX as u64) as i64);
            save_or_warn(store);
        }
    }

    fn show_score(&self, ctx: &mut Collaborators) {
        if let Some(hud) = ctx.hud() {
            hud.set_score(&format!("Score: {}", self.current_score));
        }
    }

    fn show_high_score(&self, ctx: &mut Collaborators) {
        if let Some(hud) = ctx.hud() {
            hud.set_high_score(&format!("High Score: {}", self.high_score));
        }
    }
}
