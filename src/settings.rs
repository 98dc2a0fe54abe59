//! Game settings and tuning
//!
//! Persisted as JSON through the preferences store, separately from the
//! high score.

use serde::{Deserialize, Serialize};

use crate::persistence::KeyValueStore;

/// Ball movement tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementSettings {
    /// Rolling force per unit of axis input
    pub move_speed: f32,
    /// Extra upward impulse on jump
    pub jump_force: f32,
    /// Upward impulse applied every grounded tick
    pub bounce_force: f32,
    /// Upward acceleration while in water
    pub water_float_force: f32,
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            jump_force: 8.0,
            bounce_force: 5.0,
            water_float_force: 7.0,
        }
    }
}

/// Health and contact tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthSettings {
    pub max_health: u32,
    /// Damage taken when touching a spike
    pub spike_damage: u32,
    /// Health restored by a heart pickup
    pub heart_heal: u32,
    /// Red flash length after taking damage (seconds)
    pub flash_duration: f32,
}

impl Default for HealthSettings {
    fn default() -> Self {
        Self {
            max_health: 3,
            spike_damage: 1,
            heart_heal: 1,
            flash_duration: 0.2,
        }
    }
}

/// Scoring tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreSettings {
    pub score_per_pickup: u64,
    pub score_per_second: u64,
}

impl Default for ScoreSettings {
    fn default() -> Self {
        Self {
            score_per_pickup: 10,
            score_per_second: 1,
        }
    }
}

/// Audio preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

/// All game settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub movement: MovementSettings,
    pub health: HealthSettings,
    pub score: ScoreSettings,
    pub audio: AudioSettings,
}

impl Settings {
    /// Preferences key
    pub const STORAGE_KEY: &'static str = "roll_ball_settings";

    /// Parse settings from JSON; absent fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    /// Clamp values that would break gameplay invariants
    pub fn sanitize(&mut self) {
        self.health.max_health = self.health.max_health.max(1);
        self.health.flash_duration = self.health.flash_duration.max(0.0);
        self.audio.master_volume = self.audio.master_volume.clamp(0.0, 1.0);
        self.audio.sfx_volume = self.audio.sfx_volume.clamp(0.0, 1.0);
    }

    /// Load settings from the store, falling back to defaults
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let Some(json) = store.get_string(Self::STORAGE_KEY) else {
            log::info!("Using default settings");
            return Self::default();
        };
        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from preferences");
                settings
            }
            Err(e) => {
                log::warn!("Stored settings are invalid, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Write settings into the store and flush it
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(json) => {
                store.set_string(Self::STORAGE_KEY, &json);
                crate::persistence::save_or_warn(store);
                log::info!("Settings saved");
            }
            Err(e) => log::warn!("Failed to serialize settings: {}", e),
        }
    }
}
