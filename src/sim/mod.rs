//! Gameplay simulation
//!
//! All gameplay logic lives here:
//! - One tick per rendered frame, driven by the host
//! - Contacts dispatched synchronously between ticks
//! - No rendering, physics or platform dependencies; side effects go through
//!   [`crate::platform::Collaborators`]

pub mod actor;
pub mod animation;
pub mod contact;
pub mod effects;
pub mod session;
pub mod state;
pub mod tick;

pub use actor::{ActorInput, ActorState, Depleted};
pub use animation::{AnimationConfig, Animator, Transform};
pub use contact::{ContactEvent, ContactOutcome, ContactTag};
pub use effects::{EffectPhase, EffectScheduler};
pub use session::{HIGH_SCORE_KEY, SessionState};
pub use state::GameState;
pub use tick::{TickInput, dispatch_contact, tick};
