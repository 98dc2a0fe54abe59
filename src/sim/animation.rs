//! Procedural object animation
//!
//! Continuous motions (spin, bob, pulse, colour fade, follow) are recomputed
//! every tick from the animator's clock. One-shot animations (collect, damage
//! shake, scale pop) run on an [`EffectScheduler`] and are applied after the
//! continuous ones, so they win for the frames they are active.

use glam::{EulerRot, Quat, Vec3, Vec4};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effects::{EffectPhase, EffectScheduler};

/// Collect animation length (seconds)
pub const COLLECT_DURATION: f32 = 0.5;
/// Damage shake length (seconds)
pub const SHAKE_DURATION: f32 = 0.3;
/// Max shake offset per axis
pub const SHAKE_MAGNITUDE: f32 = 0.1;
/// Duration of each half of the scale pop (seconds)
pub const POP_HALF_DURATION: f32 = 0.2;
/// Peak scale multiplier of the scale pop
pub const POP_SCALE: f32 = 1.3;

/// Position, rotation and scale of an animated object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
}

/// Constant spin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spin {
    /// Degrees per second around each axis
    pub speed: Vec3,
    /// Rotate about world axes instead of the object's own axes
    pub world_space: bool,
}

impl Default for Spin {
    fn default() -> Self {
        Self {
            speed: Vec3::new(0.0, 100.0, 0.0),
            world_space: true,
        }
    }
}

/// Vertical sine bob around the start height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bob {
    pub height: f32,
    pub speed: f32,
}

impl Default for Bob {
    fn default() -> Self {
        Self {
            height: 0.5,
            speed: 2.0,
        }
    }
}

/// Sine scale pulse around the original scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pulse {
    /// Peak multiplier
    pub scale: f32,
    pub speed: f32,
}

impl Default for Pulse {
    fn default() -> Self {
        Self {
            scale: 1.2,
            speed: 1.0,
        }
    }
}

/// Ping-pong blend between two colours
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorFade {
    pub from: Vec4,
    pub to: Vec4,
    pub speed: f32,
}

impl Default for ColorFade {
    fn default() -> Self {
        Self {
            from: Vec4::ONE,
            // Stock yellow
            to: Vec4::new(1.0, 0.92, 0.016, 1.0),
            speed: 1.0,
        }
    }
}

/// Exponential chase toward a target position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Follow {
    pub speed: f32,
    pub offset: Vec3,
}

impl Default for Follow {
    fn default() -> Self {
        Self {
            speed: 5.0,
            offset: Vec3::ZERO,
        }
    }
}

/// Which continuous animations run. `None` disables one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub spin: Option<Spin>,
    pub bob: Option<Bob>,
    pub pulse: Option<Pulse>,
    pub fade: Option<ColorFade>,
    pub follow: Option<Follow>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            spin: Some(Spin::default()),
            bob: None,
            pulse: None,
            fade: None,
            follow: None,
        }
    }
}

/// One-shot animations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OneShot {
    /// Grow-shrink, rise and fade out, then despawn
    Collect { start_scale: Vec3, start_position: Vec3 },
    /// Random jitter around a fixed point, then snap back
    Shake { origin: Vec3 },
    /// Scale up to [`POP_SCALE`] and back
    Pop { original_scale: Vec3 },
}

/// Drives one animated object
#[derive(Debug, Clone)]
pub struct Animator {
    pub config: AnimationConfig,
    pub transform: Transform,
    /// Render colour; `None` if the object has nothing to tint
    pub color: Option<Vec4>,
    start_position: Vec3,
    original_scale: Vec3,
    time: f32,
    despawn: bool,
    rng: Pcg32,
    one_shots: EffectScheduler<OneShot>,
}

/// Ping-pong `t` between 0 and `length`
pub fn ping_pong(t: f32, length: f32) -> f32 {
    if length <= 0.0 {
        return 0.0;
    }
    let t = t.rem_euclid(length * 2.0);
    length - (t - length).abs()
}

impl Animator {
    /// Capture the starting transform; `seed` drives the shake jitter
    pub fn new(config: AnimationConfig, transform: Transform, color: Option<Vec4>, seed: u64) -> Self {
        Self {
            config,
            transform,
            color,
            start_position: transform.position,
            original_scale: transform.scale,
            time: 0.0,
            despawn: false,
            rng: Pcg32::seed_from_u64(seed),
            one_shots: EffectScheduler::new(),
        }
    }

    /// True once a collect animation has completed; the host removes the object
    pub fn should_despawn(&self) -> bool {
        self.despawn
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn is_playing_one_shot(&self) -> bool {
        !self.one_shots.is_empty()
    }

    /// Advance by `dt`. `follow_target` is the followed object's position, if any.
    pub fn update(&mut self, dt: f32, follow_target: Option<Vec3>) {
        let dt = dt.max(0.0);
        self.time += dt;
        let t = self.time;

        if let Some(spin) = self.config.spin {
            let degrees = spin.speed * dt;
            let delta = Quat::from_euler(
                EulerRot::ZXY,
                degrees.z.to_radians(),
                degrees.x.to_radians(),
                degrees.y.to_radians(),
            );
            let rotated = if spin.world_space {
                delta * self.transform.rotation
            } else {
                self.transform.rotation * delta
            };
            self.transform.rotation = rotated.normalize();
        }

        if let Some(bob) = self.config.bob {
            self.transform.position.y = self.start_position.y + (t * bob.speed).sin() * bob.height;
        }

        if let Some(pulse) = self.config.pulse {
            let scale = 1.0 + (t * pulse.speed).sin() * (pulse.scale - 1.0);
            self.transform.scale = self.original_scale * scale;
        }

        if let (Some(fade), Some(color)) = (self.config.fade, self.color.as_mut()) {
            let blend = ping_pong(t * fade.speed, 1.0);
            *color = fade.from.lerp(fade.to, blend);
        }

        if let (Some(follow), Some(target)) = (self.config.follow, follow_target) {
            let goal = target + follow.offset;
            let s = (follow.speed * dt).clamp(0.0, 1.0);
            self.transform.position = self.transform.position.lerp(goal, s);
        }

        self.advance_one_shots(dt);
    }

    /// Pickup collected: pop, rise and fade, then despawn
    pub fn play_collect(&mut self) {
        let kind = OneShot::Collect {
            start_scale: self.transform.scale,
            start_position: self.transform.position,
        };
        self.one_shots.start(kind, COLLECT_DURATION);
    }

    /// Jitter in place briefly
    pub fn play_damage_shake(&mut self) {
        let kind = OneShot::Shake {
            origin: self.transform.position,
        };
        self.one_shots.start(kind, SHAKE_DURATION);
    }

    /// Quick grow-and-return
    pub fn play_scale_pop(&mut self) {
        let kind = OneShot::Pop {
            original_scale: self.transform.scale,
        };
        self.one_shots.start(kind, POP_HALF_DURATION * 2.0);
    }

    fn advance_one_shots(&mut self, dt: f32) {
        let transform = &mut self.transform;
        let color = &mut self.color;
        let rng = &mut self.rng;
        let despawn = &mut self.despawn;

        self.one_shots.advance(dt, |shot, phase| match (*shot, phase) {
            (
                OneShot::Collect {
                    start_scale,
                    start_position,
                },
                phase,
            ) => {
                let p = match phase {
                    EffectPhase::Running(p) => p,
                    EffectPhase::Finished => 1.0,
                };
                let scale = (p * std::f32::consts::PI).sin() * 0.5 + 1.0;
                transform.scale = start_scale * scale;
                transform.position = start_position + Vec3::Y * (p * 2.0);
                if let Some(c) = color.as_mut() {
                    c.w = 1.0 - p;
                }
                if phase == EffectPhase::Finished {
                    *despawn = true;
                }
            }
            (OneShot::Shake { origin }, EffectPhase::Running(_)) => {
                let jitter = Vec3::new(
                    rng.random_range(-1.0..=1.0),
                    rng.random_range(-1.0..=1.0),
                    rng.random_range(-1.0..=1.0),
                );
                transform.position = origin + jitter * SHAKE_MAGNITUDE;
            }
            (OneShot::Shake { origin }, EffectPhase::Finished) => {
                transform.position = origin;
            }
            (OneShot::Pop { original_scale }, EffectPhase::Running(p)) => {
                // First half scales up, second half back down
                let scale = if p < 0.5 {
                    1.0 + (POP_SCALE - 1.0) * (p * 2.0)
                } else {
                    POP_SCALE + (1.0 - POP_SCALE) * ((p - 0.5) * 2.0)
                };
                transform.scale = original_scale * scale;
            }
            (OneShot::Pop { original_scale }, EffectPhase::Finished) => {
                transform.scale = original_scale;
            }
        });
    }
}
