//! Per-frame driver and contact dispatch

use glam::Vec2;

use super::actor::ActorInput;
use super::contact::{ContactEvent, ContactOutcome, ContactTag};
use super::state::GameState;
use crate::platform::Collaborators;

/// Input polled once per tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Horizontal (x) and vertical (y) movement axes
    pub movement: Vec2,
    /// Jump key pressed this tick
    pub jump: bool,
    /// Pause key pressed this tick
    pub pause: bool,
}

/// Advance the game by one frame of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32, ctx: &mut Collaborators) {
    if input.pause {
        state.session.toggle_pause(ctx);
    }

    // Time scale is zero while paused or after game over
    if !state.session.is_running() {
        return;
    }

    state.time_ticks += 1;
    state.session.tick(dt, ctx);

    let actor_input = ActorInput {
        movement: input.movement,
        jump: input.jump,
    };
    state.actor.tick(dt, &actor_input, ctx);
}

/// Apply a contact reported by the physics host
pub fn dispatch_contact(
    state: &mut GameState,
    event: ContactEvent,
    ctx: &mut Collaborators,
) -> ContactOutcome {
    log::debug!("Contact {:?}", event);
    match event {
        ContactEvent::CollisionBegin(ContactTag::Ground | ContactTag::Obstacle) => {
            state.actor.on_ground_contact_begin();
        }
        ContactEvent::CollisionEnd(ContactTag::Ground | ContactTag::Obstacle) => {
            state.actor.on_ground_contact_end();
        }
        ContactEvent::CollisionBegin(ContactTag::Spike) => {
            let damage = state.actor.health_settings().spike_damage;
            if state.actor.apply_damage(damage, ctx).is_some() {
                state.session.game_over(ctx);
            }
        }
        ContactEvent::TriggerEnter(ContactTag::Heart) => {
            let heal = state.actor.health_settings().heart_heal;
            state.actor.heal(heal, ctx);
            return ContactOutcome::Consume;
        }
        ContactEvent::TriggerEnter(ContactTag::Water) => {
            state.actor.on_water_enter(ctx);
        }
        ContactEvent::TriggerExit(ContactTag::Water) => {
            state.actor.on_water_exit();
        }
        _ => {}
    }
    ContactOutcome::Keep
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{KeyValueStore, MemoryStore};
    use crate::platform::ForceMode;
    use crate::platform::testing::*;
    use crate::settings::Settings;
    use crate::sim::session::HIGH_SCORE_KEY;

    fn game() -> GameState {
        GameState::new(&Settings::default(), None)
    }

    #[test]
    fn test_tick_scores_and_counts() {
        let mut state = game();
        let mut ctx = Collaborators::none();
        for _ in 0..4 {
            tick(&mut state, &TickInput::default(), 0.5, &mut ctx);
        }
        assert_eq!(state.session.current_score(), 2);
        assert_eq!(state.time_ticks, 4);
    }

    #[test]
    fn test_pause_key_toggles_and_freezes_actor() {
        let mut body = RecordingBody::default();
        let mut state = game();
        dispatch_contact(
            &mut state,
            ContactEvent::CollisionBegin(ContactTag::Ground),
            &mut Collaborators::none(),
        );
        {
            let mut ctx = Collaborators {
                body: Some(&mut body),
                ..Default::default()
            };
            let pause = TickInput {
                pause: true,
                ..Default::default()
            };
            tick(&mut state, &pause, 0.5, &mut ctx);
            assert!(state.session.is_paused());
            for _ in 0..10 {
                tick(&mut state, &TickInput::default(), 0.5, &mut ctx);
            }
        }
        assert!(body.forces.is_empty());
        assert_eq!(state.session.current_score(), 0);

        {
            let mut ctx = Collaborators {
                body: Some(&mut body),
                ..Default::default()
            };
            let pause = TickInput {
                pause: true,
                ..Default::default()
            };
            tick(&mut state, &pause, 0.5, &mut ctx);
        }
        assert!(!state.session.is_paused());
        assert!(body.forces.contains(&(glam::Vec3::Y * 5.0, ForceMode::Impulse)));
    }

    #[test]
    fn test_spikes_until_game_over() {
        let mut hud = RecordingHud::default();
        let mut time = RecordingTime::default();
        let mut state = game();
        {
            let mut ctx = Collaborators {
                hud: Some(&mut hud),
                time: Some(&mut time),
                ..Default::default()
            };
            state.start(&mut ctx);
            tick(&mut state, &TickInput::default(), 2.0, &mut ctx);
            for _ in 0..4 {
                dispatch_contact(&mut state, ContactEvent::CollisionBegin(ContactTag::Spike), &mut ctx);
            }
            tick(&mut state, &TickInput::default(), 5.0, &mut ctx);
        }
        assert_eq!(state.actor.health(), 0);
        assert!(state.session.is_game_over());
        assert_eq!(state.session.current_score(), 2);
        assert_eq!(hud.final_score.as_deref(), Some("Final Score: 2"));
        assert_eq!(time.scale, 0.0);
    }

    #[test]
    fn test_heart_heals_and_is_consumed() {
        let mut state = game();
        let mut ctx = Collaborators::none();
        dispatch_contact(&mut state, ContactEvent::CollisionBegin(ContactTag::Spike), &mut ctx);
        assert_eq!(state.actor.health(), 2);
        let outcome = dispatch_contact(&mut state, ContactEvent::TriggerEnter(ContactTag::Heart), &mut ctx);
        assert_eq!(outcome, ContactOutcome::Consume);
        assert_eq!(state.actor.health(), 3);
        let outcome = dispatch_contact(&mut state, ContactEvent::TriggerEnter(ContactTag::Heart), &mut ctx);
        assert_eq!(outcome, ContactOutcome::Consume);
        assert_eq!(state.actor.health(), 3);
    }

    #[test]
    fn test_contact_table() {
        let mut state = game();
        let mut ctx = Collaborators::none();

        dispatch_contact(&mut state, ContactEvent::CollisionBegin(ContactTag::Obstacle), &mut ctx);
        assert!(state.actor.is_grounded());
        dispatch_contact(&mut state, ContactEvent::CollisionEnd(ContactTag::Obstacle), &mut ctx);
        assert!(!state.actor.is_grounded());

        dispatch_contact(&mut state, ContactEvent::TriggerEnter(ContactTag::Water), &mut ctx);
        assert!(state.actor.in_water());
        dispatch_contact(&mut state, ContactEvent::TriggerExit(ContactTag::Water), &mut ctx);
        assert!(!state.actor.in_water());

        // Triggers on walkable tags and collisions with water do nothing
        let outcome = dispatch_contact(&mut state, ContactEvent::TriggerEnter(ContactTag::Ground), &mut ctx);
        assert_eq!(outcome, ContactOutcome::Keep);
        dispatch_contact(&mut state, ContactEvent::CollisionBegin(ContactTag::Water), &mut ctx);
        assert!(!state.actor.is_grounded());
        assert!(!state.actor.in_water());
        dispatch_contact(&mut state, ContactEvent::CollisionEnd(ContactTag::Spike), &mut ctx);
        assert_eq!(state.actor.health(), 3);
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut store = MemoryStore::new();
        let mut scene = RecordingScene::default();
        let mut state = game();
        {
            let mut ctx = Collaborators {
                store: Some(&mut store),
                scene: Some(&mut scene),
                ..Default::default()
            };
            tick(&mut state, &TickInput::default(), 3.0, &mut ctx);
            for _ in 0..3 {
                dispatch_contact(&mut state, ContactEvent::CollisionBegin(ContactTag::Spike), &mut ctx);
            }
            assert!(state.session.is_game_over());
            state.restart(&mut ctx);
        }
        assert!(!state.session.is_game_over());
        assert_eq!(state.session.current_score(), 0);
        assert_eq!(state.session.high_score(), 3);
        assert_eq!(state.actor.health(), 3);
        assert_eq!(scene.reloads, 1);
        assert_eq!(store.get_int(HIGH_SCORE_KEY), Some(3));

        // High score carries into a fresh game loaded from the same store
        let next = GameState::new(&Settings::default(), Some(&store));
        assert_eq!(next.session.high_score(), 3);
    }
}
