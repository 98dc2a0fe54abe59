//! Browser bindings
//!
//! The page's JavaScript owns rendering and physics and drives the game
//! through [`WebGame`]: one `tick` per animation frame, one `contact` per
//! collision/trigger callback. Forces and scene requests queue up here for
//! JS to drain after each call.

use wasm_bindgen::prelude::*;
use web_sys::Document;

use crate::audio::AudioManager;
use crate::consts::MAX_FRAME_DT;
use crate::persistence::{KeyValueStore, LocalStore};
use crate::platform::{Collaborators, ForceMode, Hud, PhysicsBody, SceneLoader, TimeControl};
use crate::settings::Settings;
use crate::sim::{ContactEvent, ContactTag, GameState, TickInput, dispatch_contact, tick};
use crate::sim::contact::ContactOutcome;

/// LocalStorage key prefix
const STORAGE_PREFIX: &str = "roll_ball_";

/// Writes HUD text into DOM elements by id
struct DomHud {
    document: Option<Document>,
}

impl DomHud {
    fn new() -> Self {
        Self {
            document: web_sys::window().and_then(|w| w.document()),
        }
    }

    fn set_text(&self, id: &str, text: &str) {
        if let Some(el) = self.document.as_ref().and_then(|d| d.get_element_by_id(id)) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(&self, id: &str, visible: bool) {
        if let Some(el) = self.document.as_ref().and_then(|d| d.get_element_by_id(id)) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }
}

impl Hud for DomHud {
    fn set_max_health(&mut self, max: u32) {
        if let Some(el) = self
            .document
            .as_ref()
            .and_then(|d| d.get_element_by_id("hud-health"))
        {
            let _ = el.set_attribute("data-max", &max.to_string());
        }
    }

    fn set_health(&mut self, health: u32) {
        self.set_text("hud-health", &health.to_string());
    }

    fn set_score(&mut self, text: &str) {
        self.set_text("hud-score", text);
    }

    fn set_high_score(&mut self, text: &str) {
        self.set_text("hud-high-score", text);
    }

    fn show_pause_menu(&mut self, visible: bool) {
        self.set_visible("pause-menu", visible);
    }

    fn show_final_score(&mut self, text: &str) {
        self.set_text("final-score", text);
        self.set_visible("game-over", true);
    }

    fn hide_final_score(&mut self) {
        self.set_visible("game-over", false);
    }
}

/// Forces queued for the JS physics engine
#[derive(Default)]
struct BodyQueue {
    /// Flattened (x, y, z, mode) quadruples
    forces: Vec<f32>,
}

impl PhysicsBody for BodyQueue {
    fn add_force(&mut self, force: glam::Vec3, mode: ForceMode) {
        let mode = match mode {
            ForceMode::Force => 0.0,
            ForceMode::Impulse => 1.0,
            ForceMode::Acceleration => 2.0,
        };
        self.forces.extend_from_slice(&[force.x, force.y, force.z, mode]);
    }
}

struct TimeState {
    scale: f32,
    cursor_captured: bool,
}

impl TimeControl for TimeState {
    fn set_time_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    fn set_cursor_captured(&mut self, captured: bool) {
        self.cursor_captured = captured;
    }
}

#[derive(Default)]
struct SceneQueue {
    request: Option<&'static str>,
}

impl SceneLoader for SceneQueue {
    fn reload_current(&mut self) {
        self.request = Some("reload");
    }

    fn load_main_menu(&mut self) {
        self.request = Some("main_menu");
    }

    fn quit(&mut self) {
        self.request = Some("quit");
    }
}

/// Game handle exported to JavaScript
#[wasm_bindgen]
pub struct WebGame {
    state: GameState,
    store: LocalStore,
    audio: AudioManager,
    hud: DomHud,
    body: BodyQueue,
    time: TimeState,
    scene: SceneQueue,
}

impl WebGame {
    fn with_ctx<R>(&mut self, f: impl FnOnce(&mut GameState, &mut Collaborators) -> R) -> R {
        let mut ctx = Collaborators {
            hud: Some(&mut self.hud),
            audio: Some(&mut self.audio),
            body: Some(&mut self.body),
            time: Some(&mut self.time),
            scene: Some(&mut self.scene),
            store: Some(&mut self.store),
        };
        f(&mut self.state, &mut ctx)
    }
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebGame {
        console_error_panic_hook::set_once();
        // Fails only if a logger is already installed
        let _ = console_log::init_with_level(log::Level::Info);

        let store = LocalStore::new(STORAGE_PREFIX);
        let settings = Settings::load(&store);
        let state = GameState::new(&settings, Some(&store as &dyn KeyValueStore));

        let mut game = WebGame {
            state,
            store,
            audio: AudioManager::new(&settings.audio),
            hud: DomHud::new(),
            body: BodyQueue::default(),
            time: TimeState {
                scale: 1.0,
                cursor_captured: true,
            },
            scene: SceneQueue::default(),
        };
        game.with_ctx(|state, ctx| state.start(ctx));
        log::info!("Roll Ball ready");
        game
    }

    /// Advance one animation frame
    pub fn tick(&mut self, dt: f32, move_x: f32, move_y: f32, jump: bool, pause: bool) {
        let input = TickInput {
            movement: glam::Vec2::new(move_x, move_y),
            jump,
            pause,
        };
        let dt = dt.min(MAX_FRAME_DT);
        self.with_ctx(|state, ctx| tick(state, &input, dt, ctx));
    }

    /// Report a contact. `kind`: 0 collision begin, 1 collision end,
    /// 2 trigger enter, 3 trigger exit. Returns true if JS should destroy
    /// the other object.
    pub fn contact(&mut self, kind: u8, tag: &str) -> bool {
        let Some(tag) = ContactTag::from_str(tag) else {
            return false;
        };
        let event = match kind {
            0 => ContactEvent::CollisionBegin(tag),
            1 => ContactEvent::CollisionEnd(tag),
            2 => ContactEvent::TriggerEnter(tag),
            3 => ContactEvent::TriggerExit(tag),
            _ => return false,
        };
        let outcome = self.with_ctx(|state, ctx| dispatch_contact(state, event, ctx));
        outcome == ContactOutcome::Consume
    }

    pub fn restart(&mut self) {
        self.with_ctx(|state, ctx| state.restart(ctx));
    }

    pub fn main_menu(&mut self) {
        self.with_ctx(|state, ctx| state.session.main_menu(ctx));
    }

    pub fn quit(&mut self) {
        self.with_ctx(|state, ctx| state.session.quit(ctx));
    }

    pub fn reset_high_score(&mut self) {
        self.with_ctx(|state, ctx| state.session.reset_high_score(ctx));
    }

    pub fn add_pickup_score(&mut self) {
        self.with_ctx(|state, ctx| state.session.add_pickup_score(ctx));
    }

    /// Drain queued forces as flattened (x, y, z, mode) quadruples
    pub fn take_forces(&mut self) -> Vec<f32> {
        std::mem::take(&mut self.body.forces)
    }

    /// Drain the pending scene request: "reload", "main_menu" or "quit"
    pub fn take_scene_request(&mut self) -> Option<String> {
        self.scene.request.take().map(str::to_string)
    }

    pub fn score(&self) -> f64 {
        self.state.session.current_score() as f64
    }

    pub fn high_score(&self) -> f64 {
        self.state.session.high_score() as f64
    }

    pub fn health(&self) -> u32 {
        self.state.actor.health()
    }

    pub fn is_paused(&self) -> bool {
        self.state.session.is_paused()
    }

    pub fn is_game_over(&self) -> bool {
        self.state.session.is_game_over()
    }

    pub fn time_scale(&self) -> f32 {
        self.time.scale
    }

    pub fn cursor_captured(&self) -> bool {
        self.time.cursor_captured
    }

    /// Ball colour as RGBA
    pub fn tint(&self) -> Vec<f32> {
        self.state.actor.tint().to_array().to_vec()
    }
}

impl Default for WebGame {
    fn default() -> Self {
        Self::new()
    }
}
