//! Roll Ball - gameplay state for a 3D rolling-ball game
//!
//! Core modules:
//! - `sim`: Session and actor state, contact dispatch, timed effects, animation
//! - `platform`: Traits for the host engine (display, audio, physics, scenes)
//! - `persistence`: Key-value preferences (memory, file, LocalStorage)
//! - `settings`: Data-driven tuning and audio preferences
//! - `ui`: Menu panel tweens

pub mod audio;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod ui;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use settings::Settings;
pub use sim::{GameState, TickInput, dispatch_contact, tick};

/// Game configuration constants
pub mod consts {
    /// Frame step used by the headless driver (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Largest frame delta accepted from the host, to avoid huge jumps after a stall
    pub const MAX_FRAME_DT: f32 = 0.1;
}
