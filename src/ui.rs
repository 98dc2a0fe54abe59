//! Menu panel tweens
//!
//! Fades and slides for HUD panels. These run on unscaled time so menus keep
//! animating while gameplay is paused.

use glam::Vec2;

use crate::sim::effects::{EffectPhase, EffectScheduler};

/// Default tween length (seconds)
pub const DEFAULT_TWEEN: f32 = 0.3;

/// Animatable properties of one panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Panel {
    pub alpha: f32,
    /// Anchored position in layout units
    pub position: Vec2,
}

impl Default for Panel {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            position: Vec2::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Tween {
    Alpha { panel: usize, from: f32, to: f32 },
    Slide { panel: usize, from: Vec2, to: Vec2 },
}

/// Owns a set of panels and their running tweens
#[derive(Debug, Clone, Default)]
pub struct UiAnimator {
    panels: Vec<Panel>,
    tweens: EffectScheduler<Tween>,
}

impl UiAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a panel, returning its handle
    pub fn add_panel(&mut self, panel: Panel) -> usize {
        self.panels.push(panel);
        self.panels.len() - 1
    }

    pub fn panel(&self, handle: usize) -> Option<&Panel> {
        self.panels.get(handle)
    }

    /// Fade alpha 0 -> 1
    pub fn fade_in(&mut self, panel: usize, duration: f32) {
        self.fade(panel, 0.0, 1.0, duration);
    }

    /// Fade alpha 1 -> 0
    pub fn fade_out(&mut self, panel: usize, duration: f32) {
        self.fade(panel, 1.0, 0.0, duration);
    }

    /// Slide from the panel's current position to `target`
    pub fn slide_in(&mut self, panel: usize, target: Vec2, duration: f32) {
        let Some(p) = self.panels.get_mut(panel) else {
            log::warn!("slide_in on unknown panel {}", panel);
            return;
        };
        let from = p.position;
        self.tweens.start(
            Tween::Slide {
                panel,
                from,
                to: target,
            },
            duration,
        );
    }

    fn fade(&mut self, panel: usize, from: f32, to: f32, duration: f32) {
        let Some(p) = self.panels.get_mut(panel) else {
            log::warn!("fade on unknown panel {}", panel);
            return;
        };
        p.alpha = from;
        self.tweens.start(Tween::Alpha { panel, from, to }, duration);
    }

    pub fn is_animating(&self) -> bool {
        !self.tweens.is_empty()
    }

    /// Advance all tweens by unscaled frame time
    pub fn update(&mut self, unscaled_dt: f32) {
        let panels = &mut self.panels;
        self.tweens.advance(unscaled_dt, |tween, phase| {
            let t = match phase {
                EffectPhase::Running(p) => p,
                EffectPhase::Finished => 1.0,
            };
            match *tween {
                Tween::Alpha { panel, from, to } => {
                    if let Some(p) = panels.get_mut(panel) {
                        p.alpha = from + (to - from) * t;
                    }
                }
                Tween::Slide { panel, from, to } => {
                    if let Some(p) = panels.get_mut(panel) {
                        p.position = from.lerp(to, t);
                    }
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fade_in_ends_at_one() {
        let mut ui = UiAnimator::new();
        let menu = ui.add_panel(Panel::default());
        ui.fade_in(menu, DEFAULT_TWEEN);
        assert_eq!(ui.panel(menu).unwrap().alpha, 0.0);

        ui.update(0.1);
        let a = ui.panel(menu).unwrap().alpha;
        assert!(a > 0.0 && a < 1.0);

        ui.update(0.5);
        assert_eq!(ui.panel(menu).unwrap().alpha, 1.0);
        assert!(!ui.is_animating());
    }

    #[test]
    fn test_fade_out_ends_at_zero() {
        let mut ui = UiAnimator::new();
        let menu = ui.add_panel(Panel::default());
        ui.fade_out(menu, 0.2);
        for _ in 0..10 {
            ui.update(0.05);
        }
        assert_eq!(ui.panel(menu).unwrap().alpha, 0.0);
    }

    #[test]
    fn test_slide_in() {
        let mut ui = UiAnimator::new();
        let menu = ui.add_panel(Panel {
            alpha: 1.0,
            position: Vec2::new(0.0, -400.0),
        });
        ui.slide_in(menu, Vec2::ZERO, 0.5);
        ui.update(0.25);
        let y = ui.panel(menu).unwrap().position.y;
        assert!((y + 200.0).abs() < 1e-3);
        ui.update(0.25);
        assert_eq!(ui.panel(menu).unwrap().position, Vec2::ZERO);
    }

    #[test]
    fn test_unknown_panel_is_ignored() {
        let mut ui = UiAnimator::new();
        ui.fade_in(3, DEFAULT_TWEEN);
        ui.slide_in(3, Vec2::ONE, DEFAULT_TWEEN);
        assert!(!ui.is_animating());
    }
}
