//! Effects produced by state transitions

use super::Event;
use crate::navigation::PageId;
use crate::rules::Rule;
use crate::store::NewMessage;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// The delayed callbacks an assistant can have in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    Engagement,
    Reply,
    Navigation,
}

impl fmt::Display for TimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TimerKind::Engagement => "engagement",
            TimerKind::Reply => "reply",
            TimerKind::Navigation => "navigation",
        })
    }
}

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Append a message to the store
    AppendMessage { message: NewMessage },

    /// Deliver `fire` back to the assistant after `delay`
    ArmTimer {
        kind: TimerKind,
        delay: Duration,
        fire: Event,
    },

    /// Drop a pending timer so it never fires
    CancelTimer { kind: TimerKind },

    /// Hand a page to the host navigator
    Navigate { page: PageId },

    /// Publish the new state to the host
    PublishState,

    /// Stop the runtime
    Shutdown,
}

impl Effect {
    pub fn append_user_message(text: impl Into<String>) -> Self {
        Effect::AppendMessage {
            message: NewMessage::user(text),
        }
    }

    pub fn append_bot_reply(rule: &Rule) -> Self {
        Effect::AppendMessage {
            message: NewMessage::bot(rule.response_text.clone(), rule.options.clone()),
        }
    }

    pub fn arm(kind: TimerKind, delay: Duration, fire: Event) -> Self {
        Effect::ArmTimer { kind, delay, fire }
    }

    pub fn cancel(kind: TimerKind) -> Self {
        Effect::CancelTimer { kind }
    }
}
