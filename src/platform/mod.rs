//! Platform abstraction layer
//!
//! The host engine owns rendering, physics, audio output and scene loading.
//! Gameplay code reaches it only through the traits below, bundled per call in
//! [`Collaborators`]. Every field is optional: a missing collaborator means the
//! corresponding side effect is skipped.

use glam::Vec3;

use crate::audio::SoundEffect;
use crate::persistence::KeyValueStore;

/// How a force is applied to a rigid body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForceMode {
    /// Continuous force, scaled by mass and frame time
    Force,
    /// Instant velocity change scaled by mass
    Impulse,
    /// Continuous acceleration, ignores mass
    Acceleration,
}

/// Text display for health and score
pub trait Hud {
    fn set_max_health(&mut self, max: u32);
    fn set_health(&mut self, health: u32);
    fn set_score(&mut self, text: &str);
    fn set_high_score(&mut self, text: &str);
    fn show_pause_menu(&mut self, visible: bool);
    fn show_final_score(&mut self, text: &str);
    /// Take down the game-over panel when a new run begins
    fn hide_final_score(&mut self);
}

/// One-shot sound playback
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
}

/// Rigid body the actor pushes around
pub trait PhysicsBody {
    fn add_force(&mut self, force: Vec3, mode: ForceMode);
}

/// Global time scale and cursor capture
pub trait TimeControl {
    fn set_time_scale(&mut self, scale: f32);
    fn set_cursor_captured(&mut self, captured: bool);
}

/// Scene transitions
pub trait SceneLoader {
    fn reload_current(&mut self);
    fn load_main_menu(&mut self);
    fn quit(&mut self);
}

/// Everything gameplay may call out to during one tick or contact
#[derive(Default)]
pub struct Collaborators<'a> {
    pub hud: Option<&'a mut dyn Hud>,
    pub audio: Option<&'a mut dyn AudioSink>,
    pub body: Option<&'a mut dyn PhysicsBody>,
    pub time: Option<&'a mut dyn TimeControl>,
    pub scene: Option<&'a mut dyn SceneLoader>,
    pub store: Option<&'a mut dyn KeyValueStore>,
}

impl<'a> Collaborators<'a> {
    /// No collaborators at all (headless)
    pub fn none() -> Self {
        Self::default()
    }

    pub fn hud(&mut self) -> Option<&mut (dyn Hud + 'a)> {
        self.hud.as_deref_mut()
    }

    pub fn body(&mut self) -> Option<&mut (dyn PhysicsBody + 'a)> {
        self.body.as_deref_mut()
    }

    pub fn time(&mut self) -> Option<&mut (dyn TimeControl + 'a)> {
        self.time.as_deref_mut()
    }

    pub fn scene(&mut self) -> Option<&mut (dyn SceneLoader + 'a)> {
        self.scene.as_deref_mut()
    }

    pub fn store(&mut self) -> Option<&mut (dyn KeyValueStore + 'a)> {
        self.store.as_deref_mut()
    }

    /// Play a sound if an audio sink is attached
    pub fn play(&mut self, effect: SoundEffect) {
        if let Some(audio) = self.audio.as_deref_mut() {
            audio.play(effect);
        }
    }

    /// Push the body if one is attached
    pub fn add_force(&mut self, force: Vec3, mode: ForceMode) {
        if let Some(body) = self.body() {
            body.add_force(force, mode);
        }
    }
}
