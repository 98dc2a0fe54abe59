//! Audio cues
//!
//! On the web, sound effects are generated procedurally with the Web Audio
//! API - no external files needed. Native builds have no output device and
//! only log the cue.

#[cfg(target_arch = "wasm32")]
use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::platform::AudioSink;
use crate::settings::AudioSettings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Grounded auto-bounce
    Bounce,
    /// Jump off the ground
    Jump,
    /// Took damage
    Damage,
    /// Entered water
    Water,
    /// Game over
    GameOver,
    /// New high score
    HighScore,
}

/// Audio manager for the game
pub struct AudioManager {
    #[cfg(target_arch = "wasm32")]
    ctx: Option<AudioContext>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(&AudioSettings::default())
    }
}

impl AudioManager {
    pub fn new(settings: &AudioSettings) -> Self {
        #[cfg(target_arch = "wasm32")]
        let ctx = {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            ctx
        };
        Self {
            #[cfg(target_arch = "wasm32")]
            ctx,
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            muted: settings.muted,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    #[cfg(not(target_arch = "wasm32"))]
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        log::trace!("Sound {:?} ({} notes) at volume {:.2}", effect, cue(effect).len(), vol);
    }

    /// Play a sound effect
    #[cfg(target_arch = "wasm32")]
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Browsers suspend the context until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        for note in cue(effect) {
            self.schedule(ctx, note, vol);
        }
    }
}

impl AudioSink for AudioManager {
    fn play(&mut self, effect: SoundEffect) {
        AudioManager::play(self, effect);
    }
}

// === Cue tables ===

/// Oscillator shape of a note
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    Sine,
    Triangle,
    Sawtooth,
    Square,
}

/// One synthesized note of a cue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    /// Start pitch in Hz
    pub freq: f32,
    /// Pitch reached at the end of the note, if it glides
    pub glide_to: Option<f32>,
    /// Delay from the cue start (seconds)
    pub offset: f64,
    /// Length (seconds)
    pub length: f64,
    /// Peak gain before the master volume
    pub gain: f32,
    pub wave: Wave,
}

const fn note(freq: f32, offset: f64, length: f64, gain: f32, wave: Wave) -> Note {
    Note {
        freq,
        glide_to: None,
        offset,
        length,
        gain,
        wave,
    }
}

const fn glide(freq: f32, to: f32, offset: f64, length: f64, gain: f32, wave: Wave) -> Note {
    Note {
        freq,
        glide_to: Some(to),
        offset,
        length,
        gain,
        wave,
    }
}

// Quiet, since it fires every grounded tick
const BOUNCE: &[Note] = &[glide(140.0, 90.0, 0.0, 0.06, 0.08, Wave::Sine)];

const JUMP: &[Note] = &[glide(260.0, 720.0, 0.0, 0.18, 0.25, Wave::Triangle)];

const DAMAGE: &[Note] = &[
    glide(220.0, 70.0, 0.0, 0.22, 0.3, Wave::Square),
    note(110.0, 0.0, 0.12, 0.15, Wave::Sawtooth),
];

// Three bubbles
const WATER: &[Note] = &[
    glide(420.0, 620.0, 0.0, 0.07, 0.18, Wave::Sine),
    glide(380.0, 560.0, 0.07, 0.07, 0.15, Wave::Sine),
    glide(460.0, 700.0, 0.14, 0.07, 0.12, Wave::Sine),
];

// Minor descent ending on a long low glide
const GAME_OVER: &[Note] = &[
    note(392.0, 0.0, 0.25, 0.25, Wave::Triangle),
    note(311.1, 0.25, 0.25, 0.25, Wave::Triangle),
    note(261.6, 0.5, 0.25, 0.25, Wave::Triangle),
    glide(196.0, 98.0, 0.75, 0.7, 0.3, Wave::Sine),
];

// Major arpeggio, C6 to C7
const HIGH_SCORE: &[Note] = &[
    note(1046.5, 0.0, 0.15, 0.2, Wave::Square),
    note(1318.5, 0.07, 0.15, 0.2, Wave::Square),
    note(1568.0, 0.14, 0.15, 0.2, Wave::Square),
    note(2093.0, 0.21, 0.35, 0.22, Wave::Triangle),
];

/// Notes making up a sound effect
pub fn cue(effect: SoundEffect) -> &'static [Note] {
    match effect {
        SoundEffect::Bounce => BOUNCE,
        SoundEffect::Jump => JUMP,
        SoundEffect::Damage => DAMAGE,
        SoundEffect::Water => WATER,
        SoundEffect::GameOver => GAME_OVER,
        SoundEffect::HighScore => HIGH_SCORE,
    }
}

#[cfg(target_arch = "wasm32")]
impl AudioManager {
    /// Build one oscillator voice with a decaying gain envelope
    fn schedule(&self, ctx: &AudioContext, note: &Note, vol: f32) {
        let Some((osc, gain)) = voice(ctx, note) else {
            return;
        };
        let t = ctx.current_time() + note.offset;

        gain.gain().set_value_at_time(vol * note.gain, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.001, t + note.length)
            .ok();
        if let Some(to) = note.glide_to {
            osc.frequency().set_value_at_time(note.freq, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(to, t + note.length)
                .ok();
        }

        osc.start_with_when(t).ok();
        osc.stop_with_when(t + note.length + 0.02).ok();
    }
}

#[cfg(target_arch = "wasm32")]
fn voice(ctx: &AudioContext, note: &Note) -> Option<(OscillatorNode, GainNode)> {
    let osc = ctx.create_oscillator().ok()?;
    let gain = ctx.create_gain().ok()?;
    osc.set_type(match note.wave {
        Wave::Sine => OscillatorType::Sine,
        Wave::Triangle => OscillatorType::Triangle,
        Wave::Sawtooth => OscillatorType::Sawtooth,
        Wave::Square => OscillatorType::Square,
    });
    osc.frequency().set_value(note.freq);
    osc.connect_with_audio_node(&gain).ok()?;
    gain.connect_with_audio_node(&ctx.destination()).ok()?;
    Some((osc, gain))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_volume() {
        let mut audio = AudioManager::default();
        assert!((audio.effective_volume() - 0.8).abs() < 1e-6);
        audio.set_sfx_volume(0.5);
        assert!((audio.effective_volume() - 0.4).abs() < 1e-6);
        audio.set_master_volume(7.0);
        assert!((audio.effective_volume() - 0.5).abs() < 1e-6);
        audio.set_muted(true);
        assert_eq!(audio.effective_volume(), 0.0);
    }

    #[test]
    fn test_cues_are_audible_and_bounded() {
        for effect in [
            SoundEffect::Bounce,
            SoundEffect::Jump,
            SoundEffect::Damage,
            SoundEffect::Water,
            SoundEffect::GameOver,
            SoundEffect::HighScore,
        ] {
            let notes = cue(effect);
            assert!(!notes.is_empty(), "{:?}", effect);
            for n in notes {
                assert!(n.freq > 20.0 && n.length > 0.0 && n.offset >= 0.0);
                assert!(n.gain > 0.0 && n.gain <= 1.0);
            }
        }
    }

    #[test]
    fn test_high_score_rises_and_game_over_falls() {
        let rising: Vec<f32> = cue(SoundEffect::HighScore).iter().map(|n| n.freq).collect();
        assert!(rising.windows(2).all(|w| w[1] > w[0]));
        let falling: Vec<f32> = cue(SoundEffect::GameOver).iter().map(|n| n.freq).collect();
        assert!(falling.windows(2).all(|w| w[1] < w[0]));
    }
}
