//! Player ball: health, ground/water flags and per-tick forces

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

use super::effects::{EffectPhase, EffectScheduler};
use crate::audio::SoundEffect;
use crate::platform::{Collaborators, ForceMode};
use crate::settings::{HealthSettings, MovementSettings};

/// Ball base colour
pub const BASE_TINT: Vec4 = Vec4::new(1.0, 1.0, 1.0, 1.0);
/// Colour shown while the damage flash runs
pub const DAMAGE_TINT: Vec4 = Vec4::new(1.0, 0.0, 0.0, 1.0);

/// Health reached zero. Returned by [`ActorState::apply_damage`] once per
/// depletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Depleted;

/// Visual feedback run on the actor's effect scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorEffect {
    /// Tint red for the effect's duration
    FlashRed,
}

/// Per-tick player intent
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ActorInput {
    /// Horizontal (x) and vertical (y) axes, each in [-1, 1]
    pub movement: glam::Vec2,
    /// Jump key went down this tick
    pub jump: bool,
}

/// The player-controlled ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorState {
    health: u32,
    max_health: u32,
    is_grounded: bool,
    in_water: bool,
    /// Guards against reporting the same depletion twice
    depleted: bool,
    tint: Vec4,
    movement: MovementSettings,
    health_cfg: HealthSettings,
    effects: EffectScheduler<ActorEffect>,
}

impl ActorState {
    /// Spawn with full health
    pub fn new(movement: MovementSettings, health: HealthSettings) -> Self {
        let max_health = health.max_health.max(1);
        Self {
            health: max_health,
            max_health,
            is_grounded: false,
            in_water: false,
            depleted: false,
            tint: BASE_TINT,
            movement,
            health_cfg: health,
            effects: EffectScheduler::new(),
        }
    }

    /// Tell the display the health bar size and current value
    pub fn spawn(&self, ctx: &mut Collaborators) {
        if let Some(hud) = ctx.hud() {
            hud.set_max_health(self.max_health);
            hud.set_health(self.health);
        }
    }

    /// Restore full health and clear all transient state
    pub fn respawn(&mut self, ctx: &mut Collaborators) {
        self.health = self.max_health;
        self.is_grounded = false;
        self.in_water = false;
        self.depleted = false;
        self.tint = BASE_TINT;
        self.effects.cancel_all();
        self.spawn(ctx);
        log::debug!("Actor respawned with {} health", self.health);
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    pub fn is_grounded(&self) -> bool {
        self.is_grounded
    }

    pub fn in_water(&self) -> bool {
        self.in_water
    }

    /// Current render colour (red while the damage flash runs)
    pub fn tint(&self) -> Vec4 {
        self.tint
    }

    pub fn health_settings(&self) -> &HealthSettings {
        &self.health_cfg
    }

    /// Lose health, flash red, and report depletion when health hits zero
    pub fn apply_damage(&mut self, amount: u32, ctx: &mut Collaborators) -> Option<Depleted> {
        self.health = self.health.saturating_sub(amount);
        if let Some(hud) = ctx.hud() {
            hud.set_health(self.health);
        }
        ctx.play(SoundEffect::Damage);
        self.effects
            .start(ActorEffect::FlashRed, self.health_cfg.flash_duration);
        self.tint = DAMAGE_TINT;
        log::debug!("Took {} damage, health {}", amount, self.health);

        if self.health == 0 && !self.depleted {
            self.depleted = true;
            log::info!("Health depleted");
            return Some(Depleted);
        }
        None
    }

    /// Gain health up to the maximum
    pub fn heal(&mut self, amount: u32, ctx: &mut Collaborators) {
        self.health = self.health.saturating_add(amount).min(self.max_health);
        if self.health > 0 {
            self.depleted = false;
        }
        if let Some(hud) = ctx.hud() {
            hud.set_health(self.health);
        }
        log::debug!("Healed {}, health {}", amount, self.health);
    }

    pub fn on_ground_contact_begin(&mut self) {
        self.is_grounded = true;
    }

    pub fn on_ground_contact_end(&mut self) {
        self.is_grounded = false;
    }

    pub fn on_water_enter(&mut self, ctx: &mut Collaborators) {
        self.in_water = true;
        ctx.play(SoundEffect::Water);
    }

    pub fn on_water_exit(&mut self) {
        self.in_water = false;
    }

    /// Apply this tick's forces and advance visual effects
    pub fn tick(&mut self, dt: f32, input: &ActorInput, ctx: &mut Collaborators) {
        let axes = input.movement.clamp(glam::Vec2::splat(-1.0), glam::Vec2::splat(1.0));
        let movement = Vec3::new(axes.x, 0.0, axes.y) * self.movement.move_speed;
        ctx.add_force(movement, ForceMode::Force);

        // Auto-bounce: an impulse on every grounded tick, not only on landing
        if self.is_grounded {
            ctx.add_force(Vec3::Y * self.movement.bounce_force, ForceMode::Impulse);
            ctx.play(SoundEffect::Bounce);
        }

        if input.jump && self.is_grounded {
            ctx.add_force(Vec3::Y * self.movement.jump_force, ForceMode::Impulse);
            ctx.play(SoundEffect::Jump);
        }

        if self.in_water {
            ctx.add_force(
                Vec3::Y * self.movement.water_float_force,
                ForceMode::Acceleration,
            );
        }

        self.advance_effects(dt);
    }

    fn advance_effects(&mut self, dt: f32) {
        // Overlapping flashes keep the ball red until the last one ends
        let mut flashing = false;
        self.effects.advance(dt, |effect, phase| match (effect, phase) {
            (ActorEffect::FlashRed, EffectPhase::Running(_)) => flashing = true,
            (ActorEffect::FlashRed, EffectPhase::Finished) => {}
        });
        self.tint = if flashing { DAMAGE_TINT } else { BASE_TINT };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::testing::*;
    use glam::Vec2;
    use proptest::prelude::*;

    fn actor(max_health: u32) -> ActorState {
        ActorState::new(
            MovementSettings::default(),
            HealthSettings {
                max_health,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_damage_scenario() {
        let mut hud = RecordingHud::default();
        let mut a = actor(3);
        let mut depleted = 0;
        {
            let mut ctx = Collaborators {
                hud: Some(&mut hud),
                ..Default::default()
            };
            a.spawn(&mut ctx);
            assert!(a.apply_damage(1, &mut ctx).is_none());
            assert_eq!(a.health(), 2);
            if a.apply_damage(5, &mut ctx).is_some() {
                depleted += 1;
            }
            if a.apply_damage(1, &mut ctx).is_some() {
                depleted += 1;
            }
        }
        assert_eq!(a.health(), 0);
        assert_eq!(depleted, 1);
        assert_eq!(hud.max_health, Some(3));
        assert_eq!(hud.health, vec![3, 2, 0, 0]);
    }

    #[test]
    fn test_heal_clamps_and_rearms_depletion() {
        let mut a = actor(3);
        let mut ctx = Collaborators::none();
        a.heal(10, &mut ctx);
        assert_eq!(a.health(), 3);
        assert!(a.apply_damage(3, &mut ctx).is_some());
        a.heal(1, &mut ctx);
        assert_eq!(a.health(), 1);
        assert!(a.apply_damage(1, &mut ctx).is_some());
    }

    #[test]
    fn test_damage_flash_restores_tint() {
        let mut a = actor(3);
        let mut ctx = Collaborators::none();
        a.apply_damage(1, &mut ctx);
        assert_eq!(a.tint(), DAMAGE_TINT);

        let input = ActorInput::default();
        a.tick(0.125, &input, &mut ctx);
        assert_eq!(a.tint(), DAMAGE_TINT);
        a.tick(0.125, &input, &mut ctx);
        assert_eq!(a.tint(), BASE_TINT);
    }

    #[test]
    fn test_overlapping_flashes_end_on_base_tint() {
        let mut a = actor(5);
        let mut ctx = Collaborators::none();
        let input = ActorInput::default();
        a.apply_damage(1, &mut ctx);
        a.tick(0.125, &input, &mut ctx);
        a.apply_damage(1, &mut ctx);
        a.tick(0.125, &input, &mut ctx);
        assert_eq!(a.tint(), DAMAGE_TINT);
        a.tick(0.125, &input, &mut ctx);
        assert_eq!(a.tint(), BASE_TINT);
    }

    #[test]
    fn test_grounded_tick_bounces_every_tick() {
        let mut body = RecordingBody::default();
        let mut audio = RecordingAudio::default();
        let mut a = actor(3);
        a.on_ground_contact_begin();
        {
            let mut ctx = Collaborators {
                body: Some(&mut body),
                audio: Some(&mut audio),
                ..Default::default()
            };
            let idle = ActorInput::default();
            a.tick(0.016, &idle, &mut ctx);
            a.tick(0.016, &idle, &mut ctx);
        }
        let impulses: Vec<_> = body
            .forces
            .iter()
            .filter(|(_, mode)| *mode == ForceMode::Impulse)
            .collect();
        assert_eq!(impulses.len(), 2);
        assert_eq!(impulses[0].0, Vec3::Y * 5.0);
        assert_eq!(audio.played, vec![SoundEffect::Bounce, SoundEffect::Bounce]);
    }

    #[test]
    fn test_jump_requires_ground() {
        let mut body = RecordingBody::default();
        let mut a = actor(3);
        let jump = ActorInput {
            movement: Vec2::ZERO,
            jump: true,
        };
        {
            let mut ctx = Collaborators {
                body: Some(&mut body),
                ..Default::default()
            };
            a.tick(0.016, &jump, &mut ctx);
        }
        assert!(body.forces.iter().all(|(_, m)| *m == ForceMode::Force));

        a.on_ground_contact_begin();
        body.forces.clear();
        {
            let mut ctx = Collaborators {
                body: Some(&mut body),
                ..Default::default()
            };
            a.tick(0.016, &jump, &mut ctx);
        }
        assert!(body.forces.contains(&(Vec3::Y * 8.0, ForceMode::Impulse)));
        assert!(body.forces.contains(&(Vec3::Y * 5.0, ForceMode::Impulse)));
    }

    #[test]
    fn test_movement_and_water_forces() {
        let mut body = RecordingBody::default();
        let mut audio = RecordingAudio::default();
        let mut a = actor(3);
        {
            let mut ctx = Collaborators {
                body: Some(&mut body),
                audio: Some(&mut audio),
                ..Default::default()
            };
            a.on_water_enter(&mut ctx);
            let input = ActorInput {
                movement: Vec2::new(2.0, -1.0),
                jump: false,
            };
            a.tick(0.016, &input, &mut ctx);
            a.on_water_exit();
            a.tick(0.016, &input, &mut ctx);
        }
        assert_eq!(audio.played, vec![SoundEffect::Water]);
        assert_eq!(body.forces[0], (Vec3::new(5.0, 0.0, -5.0), ForceMode::Force));
        assert_eq!(body.forces[1], (Vec3::Y * 7.0, ForceMode::Acceleration));
        assert_eq!(body.forces.len(), 3);
    }

    #[test]
    fn test_missing_body_is_skipped() {
        let mut a = actor(3);
        a.on_ground_contact_begin();
        a.tick(0.016, &ActorInput::default(), &mut Collaborators::none());
        assert!(a.is_grounded());
    }

    #[test]
    fn test_respawn_resets() {
        let mut a = actor(3);
        let mut ctx = Collaborators::none();
        a.on_ground_contact_begin();
        a.on_water_enter(&mut ctx);
        a.apply_damage(3, &mut ctx);
        a.respawn(&mut ctx);
        assert_eq!(a.health(), 3);
        assert!(!a.is_grounded());
        assert!(!a.in_water());
        assert_eq!(a.tint(), BASE_TINT);
        assert!(a.apply_damage(3, &mut ctx).is_some());
    }

    proptest! {
        #[test]
        fn prop_health_stays_in_range(
            max in 1u32..20,
            ops in prop::collection::vec((any::<bool>(), 0u32..50), 0..60),
        ) {
            let mut a = actor(max);
            let mut ctx = Collaborators::none();
            for (is_damage, amount) in ops {
                if is_damage {
                    a.apply_damage(amount, &mut ctx);
                } else {
                    a.heal(amount, &mut ctx);
                }
                prop_assert!(a.health() <= a.max_health());
            }
        }
    }
}
