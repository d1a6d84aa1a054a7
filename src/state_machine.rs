//! Assistant conversation state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;


pub use effect::{Effect, TimerKind};
pub use event::Event;
pub use state::{
    AssistantContext, ConversationState, EngagementPhase, PendingNavigation, PendingReply,
    Visibility,
};
pub use transition::{transition, TransitionError, TransitionResult};
