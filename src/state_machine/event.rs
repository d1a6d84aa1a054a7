//! Events that drive the assistant

use crate::navigation::PageId;
use crate::rules::QuickReply;

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    Mount,
    Unmount,

    // Visibility
    Open,
    Close,
    Minimize,
    Restore,

    // User input
    UserMessage { text: String },
    OptionSelected { option: QuickReply },

    // Timers
    EngagementTimeout,
    ReplyReady { reply_id: u64 },
    NavigationReady { navigation_id: u64, page: PageId },
}

impl Event {
    pub fn user_message(text: impl Into<String>) -> Self {
        Event::UserMessage { text: text.into() }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Event::Mount => "mount",
            Event::Unmount => "unmount",
            Event::Open => "open",
            Event::Close => "close",
            Event::Minimize => "minimize",
            Event::Restore => "restore",
            Event::UserMessage { .. } => "user_message",
            Event::OptionSelected { .. } => "option_selected",
            Event::EngagementTimeout => "engagement_timeout",
            Event::ReplyReady { .. } => "reply_ready",
            Event::NavigationReady { .. } => "navigation_ready",
        }
    }
}
