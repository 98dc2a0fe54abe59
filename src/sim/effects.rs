//! Timed effect scheduler
//!
//! Short visual sequences (damage flash, scale pop, collect) are data: a
//! kind plus its elapsed time and duration. The owner advances the scheduler once
//! per tick and applies each live effect from its progress.

use serde::{Deserialize, Serialize};

/// Progress report for one effect during [`EffectScheduler::advance`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectPhase {
    /// Still running; progress in (0, 1]
    Running(f32),
    /// Duration elapsed; reported once, then the effect is removed
    Finished,
}

/// A scheduled effect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimedEffect<K> {
    pub id: u32,
    pub kind: K,
    /// Seconds since the effect started
    pub elapsed: f32,
    pub duration: f32,
}

/// List of running effects advanced by the owner's clock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectScheduler<K> {
    effects: Vec<TimedEffect<K>>,
    next_id: u32,
}

impl<K> Default for EffectScheduler<K> {
    fn default() -> Self {
        Self {
            effects: Vec::new(),
            next_id: 1,
        }
    }
}

impl<K> EffectScheduler<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule an effect starting now. Returns its id.
    pub fn start(&mut self, kind: K, duration: f32) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.effects.push(TimedEffect {
            id,
            kind,
            elapsed: 0.0,
            duration: duration.max(0.0),
        });
        id
    }

    /// Advance every effect by `dt` and report it to `apply`, in
    /// scheduling order. Finished effects are removed afterwards.
    pub fn advance(&mut self, dt: f32, mut apply: impl FnMut(&K, EffectPhase)) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.effects.retain_mut(|effect| {
            effect.elapsed += dt;
            if effect.elapsed >= effect.duration {
                apply(&effect.kind, EffectPhase::Finished);
                false
            } else {
                apply(&effect.kind, EffectPhase::Running(effect.elapsed / effect.duration));
                true
            }
        });
    }

    /// Drop every effect without reporting it
    pub fn cancel_all(&mut self) {
        self.effects.clear();
    }

    /// Drop one effect by id. Returns true if it was running.
    pub fn cancel(&mut self, id: u32) -> bool {
        let before = self.effects.len();
        self.effects.retain(|e| e.id != id);
        self.effects.len() != before
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimedEffect<K>> {
        self.effects.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finished_reported_once() {
        let mut fx = EffectScheduler::new();
        fx.start("flash", 0.25);

        let mut finished = 0;
        let mut running = 0;
        for _ in 0..10 {
            fx.advance(0.0625, |_, phase| match phase {
                EffectPhase::Running(_) => running += 1,
                EffectPhase::Finished => finished += 1,
            });
        }
        assert_eq!(finished, 1);
        assert_eq!(running, 3);
        assert!(fx.is_empty());
    }

    #[test]
    fn test_progress_is_monotonic() {
        let mut fx = EffectScheduler::new();
        fx.start((), 1.0);
        let mut last = 0.0;
        for _ in 0..4 {
            fx.advance(0.2, |_, phase| {
                if let EffectPhase::Running(p) = phase {
                    assert!(p > last && p <= 1.0);
                    last = p;
                }
            });
        }
        assert!((last - 0.8).abs() < 1e-5);
    }

    #[test]
    fn test_effects_start_at_current_clock() {
        let mut fx = EffectScheduler::new();
        fx.advance(5.0, |_, _| {});
        fx.start(1, 1.0);
        let mut seen = Vec::new();
        fx.advance(0.5, |k, phase| seen.push((*k, phase)));
        assert_eq!(seen, vec![(1, EffectPhase::Running(0.5))]);
    }

    #[test]
    fn test_effects_finish_after_a_long_run() {
        let mut fx = EffectScheduler::new();
        // Days of play before the effect starts
        fx.advance(1.0e8, |_, _| {});
        fx.start("flash", 0.25);
        let mut finished = 0;
        for _ in 0..4 {
            fx.advance(0.0625, |_, phase| {
                if phase == EffectPhase::Finished {
                    finished += 1;
                }
            });
        }
        assert_eq!(finished, 1);
        assert!(fx.is_empty());
    }

    #[test]
    fn test_cancel() {
        let mut fx = EffectScheduler::new();
        let a = fx.start('a', 1.0);
        fx.start('b', 1.0);
        assert!(fx.cancel(a));
        assert!(!fx.cancel(a));
        assert_eq!(fx.len(), 1);
        fx.cancel_all();
        let mut called = false;
        fx.advance(2.0, |_, _| called = true);
        assert!(!called);
    }

    #[test]
    fn test_zero_duration_finishes_next_advance() {
        let mut fx = EffectScheduler::new();
        fx.start((), 0.0);
        let mut phases = Vec::new();
        fx.advance(0.0, |_, p| phases.push(p));
        assert_eq!(phases, vec![EffectPhase::Finished]);
    }
}
