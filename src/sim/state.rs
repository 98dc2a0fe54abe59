//! Top-level game state
//!
//! Owns the session and the player actor. The driver creates one at startup
//! and passes it by `&mut` to [`super::tick`] and [`super::dispatch_contact`].

use serde::{Deserialize, Serialize};

use super::actor::ActorState;
use super::session::SessionState;
use crate::persistence::KeyValueStore;
use crate::platform::Collaborators;
use crate::settings::Settings;

/// Complete gameplay state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub session: SessionState,
    pub actor: ActorState,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl GameState {
    /// Create a game with settings applied and the high score read from `store`
    pub fn new(settings: &Settings, store: Option<&dyn KeyValueStore>) -> Self {
        Self {
            session: SessionState::load(settings.score.clone(), store),
            actor: ActorState::new(settings.movement.clone(), settings.health.clone()),
            time_ticks: 0,
        }
    }

    /// Push initial display state
    pub fn start(&self, ctx: &mut Collaborators) {
        self.session.start(ctx);
        self.actor.spawn(ctx);
    }

    /// Restart the run: reset the session, reload the scene, respawn the actor
    pub fn restart(&mut self, ctx: &mut Collaborators) {
        self.session.restart(ctx);
        self.actor.respawn(ctx);
        self.time_ticks = 0;
    }
}
